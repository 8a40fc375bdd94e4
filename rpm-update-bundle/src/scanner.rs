use crate::config::Config;
use crate::context::RunContext;
use crate::differ;
use crate::errors::Fatal;
use crate::selector::{ALL, NONE};
use crate::snapshot_store::SnapshotStore;
use crate::types::{DateWindow, RepoList};
use anyhow::Context;
use camino::Utf8Path;
use common::{verbose, warning};

/// Every repository directory directly under `base`, sorted. Hidden directories and `skip` (the
/// output directory, which may well live under the base) are not repositories.
///
pub fn repo_names(base: &Utf8Path, skip: &Utf8Path) -> anyhow::Result<RepoList> {
    let mut ret = RepoList::new();

    for entry in base
        .read_dir_utf8()
        .with_context(|| format!("failed to read repository directory {}", base))?
    {
        let entry = entry?;
        let path = entry.path();

        if !path.is_dir() || path == skip || entry.file_name().starts_with('.') {
            continue;
        }

        ret.push(entry.file_name().to_string());
    }

    ret.sort();
    Ok(ret)
}

/// Diffs each repository's start-date listing against today's, leaving the results in the
/// context's scratch space. Returns the repositories which gained files.
///
pub fn scan(
    ctx: &mut RunContext,
    config: &Config,
    store: &SnapshotStore,
    window: &DateWindow,
) -> anyhow::Result<RepoList> {
    let start = window.start_name();
    let today = window.today_name();
    let mut candidates = RepoList::new();

    for repo in repo_names(&config.repo_base_dir, &config.output_dir)? {
        if config.omit.omits(&repo) {
            verbose!(config.opts, "{}: omitted", repo);
            continue;
        }

        if repo == ALL || repo == NONE {
            warning!("a repository called '{}' cannot be selected, skipping", repo);
            continue;
        }

        let old = store.listing(&start, &repo);
        let new = store.listing(&today, &repo);

        if let Some(missing) = [&old, &new].into_iter().find(|l| !l.exists()) {
            warning!("skipping {}: no snapshot at {}", repo, missing);
            continue;
        }

        let scratch_dir = ctx.scratch_dir_for(&repo)?;
        let new_files = differ::diff_into(&scratch_dir, &old, &new)?;
        verbose!(config.opts, "{}: {} new file(s)", repo, new_files.len());

        if !new_files.is_empty() {
            candidates.push(repo);
        }
    }

    if candidates.is_empty() {
        return Err(Fatal::NoQualifyingRepos { start, today }.into());
    }

    Ok(candidates)
}
