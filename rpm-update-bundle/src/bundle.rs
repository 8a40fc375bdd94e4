use crate::archiver;
use crate::compressor;
use crate::config::Config;
use crate::context::RunContext;
use crate::prompter::Prompter;
use crate::scanner;
use crate::selector;
use crate::snapshot_store::SnapshotStore;
use crate::types::{DateWindow, Selection};
use camino::{Utf8Path, Utf8PathBuf};
use common::types::Opts;
use time::Date;

/// One whole run, from choosing a date to compressing the archive. Returns the path of whatever
/// was produced, or None if the user chose not to bundle anything.
///
pub fn run(
    ctx: &mut RunContext,
    config: &Config,
    prompter: &mut dyn Prompter,
    today: Date,
) -> anyhow::Result<Option<Utf8PathBuf>> {
    let store = SnapshotStore::new(&config.metadata_dir);
    let start = selector::start_date(prompter, &store, config.since.as_deref(), today)?;
    let window = DateWindow { start, today };

    let candidates = scanner::scan(ctx, config, &store, &window)?;
    println!(
        "New packages since {} in: {}",
        window.start_name(),
        candidates.join(", ")
    );

    let selection = if config.all_repos {
        Selection::Repos(candidates)
    } else {
        selector::select_repos(prompter, &candidates)?
    };

    let repos = match selection {
        Selection::Nothing => {
            println!("Nothing to bundle.");
            return Ok(None);
        }
        Selection::Repos(repos) => repos,
    };

    let archive = archiver::archive(ctx, config, &repos, &window)?;
    println!("{}", written(&archive, &config.opts));

    let Some(compression) = compressor::choose(prompter, config.compression)? else {
        return Ok(Some(archive));
    };

    let compressed = compressor::compress(
        ctx,
        &archive,
        compression,
        config.keep_tar,
        config.force,
        &config.opts,
    )?;

    println!("{}", written(&compressed, &config.opts));
    Ok(Some(compressed))
}

fn written(path: &Utf8Path, opts: &Opts) -> String {
    if opts.noop {
        format!("Would write {}", path)
    } else {
        format!("Wrote {}", path)
    }
}
