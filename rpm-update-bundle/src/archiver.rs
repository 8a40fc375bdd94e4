//! Builds the bundle: one tarball, appended to one member at a time, with paths relative to the
//! repository base directory so it can be unpacked straight into the mirror's copy.
//!
use crate::config::Config;
use crate::context::RunContext;
use crate::differ::{self, NewFiles};
use crate::types::DateWindow;
use anyhow::{Context, bail};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use common::command_helpers::run_checked;
use common::types::Opts;
use common::{verbose, warning};
use std::fs;
use std::process::Command;

pub const TAR: &str = "tar";
pub const ARCHIVE_PREFIX: &str = "disconnected-rpm-update";
pub const REPODATA: &str = "repodata";

pub fn archive_name(window: &DateWindow) -> String {
    format!(
        "{}-from-{}-to-{}.tar",
        ARCHIVE_PREFIX,
        window.start_name(),
        window.today_name()
    )
}

/// What goes into the archive for one repository: each new file, in order, then its metadata.
/// New files which aren't under `base` can't be restored relative to it, so are skipped. That
/// includes anything which climbs out of `base` with `..`.
///
pub fn members(base: &Utf8Path, repo: &str, new_files: &NewFiles) -> Vec<Utf8PathBuf> {
    let mut ret: Vec<Utf8PathBuf> = new_files
        .iter()
        .filter_map(|f| match relative_to(base, Utf8Path::new(f)) {
            Some(relative) => Some(relative),
            None => {
                warning!("{} is not under {}, leaving it out", f, base);
                None
            }
        })
        .collect();

    ret.push(Utf8Path::new(repo).join(REPODATA));
    ret
}

// strip_prefix() works on components, so doesn't see that a/../.. leaves the base
fn relative_to(base: &Utf8Path, file: &Utf8Path) -> Option<Utf8PathBuf> {
    let relative = file.strip_prefix(base).ok()?;

    if relative.as_str().is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Utf8Component::Normal(_)))
    {
        return None;
    }

    Some(relative.to_path_buf())
}

/// Appends every confirmed repository's new files, and its repodata, to the archive. Repositories
/// are done in name order. If anything fails, the partial archive goes when the context does.
///
pub fn archive(
    ctx: &RunContext,
    config: &Config,
    repos: &[String],
    window: &DateWindow,
) -> anyhow::Result<Utf8PathBuf> {
    let archive = config.output_dir.join(archive_name(window));
    prepare_output(&archive, config)?;

    let mut repos = repos.to_vec();
    repos.sort();

    ctx.track(&archive);

    for repo in &repos {
        let scratch_dir = ctx
            .scratch_dir(repo)
            .with_context(|| format!("{} was never scanned", repo))?;

        let new_files = differ::load_new_files(scratch_dir)?;
        verbose!(config.opts, "{}: archiving {} new file(s)", repo, new_files.len());

        for member in members(&config.repo_base_dir, repo, &new_files) {
            append(&archive, &config.repo_base_dir, &member, &config.opts)?;
        }
    }

    ctx.release(&archive);
    Ok(archive)
}

fn prepare_output(archive: &Utf8Path, config: &Config) -> anyhow::Result<()> {
    if !config.output_dir.exists() {
        verbose!(config.opts, "creating {}", config.output_dir);
        if !config.opts.noop {
            fs::create_dir_all(&config.output_dir)
                .with_context(|| format!("failed to create {}", config.output_dir))?;
        }
    }

    if archive.exists() {
        if !config.force {
            bail!("{} already exists: use --force to replace it", archive);
        }

        verbose!(config.opts, "removing existing {}", archive);
        if !config.opts.noop {
            fs::remove_file(archive).with_context(|| format!("failed to remove {}", archive))?;
        }
    }

    Ok(())
}

fn append(archive: &Utf8Path, base: &Utf8Path, member: &Utf8Path, opts: &Opts) -> anyhow::Result<()> {
    let mut cmd = Command::new(TAR);
    cmd.arg("-C")
        .arg(base.as_str())
        .arg("-rf")
        .arg(archive.as_str())
        .arg("--")
        .arg(member.as_str());

    run_checked(cmd, opts)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bundle::test_support::Sandbox;
    use crate::scanner;
    use common::command_helpers::output_as_lines;
    use common::spec_helper::touch;

    fn tar_contents(archive: &Utf8Path) -> Vec<String> {
        let mut cmd = Command::new(TAR);
        cmd.arg("-tf").arg(archive.as_str());
        output_as_lines(cmd).unwrap()
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(
            "disconnected-rpm-update-from-2025-01-03-to-2025-03-01.tar",
            archive_name(&Sandbox::window())
        );
    }

    #[test]
    fn test_members() {
        let base = Utf8Path::new("/data/repos");
        let new_files: NewFiles = [
            "/data/repos/baseos/Packages/b.rpm",
            "/data/repos/baseos/Packages/a.rpm",
            "/elsewhere/baseos/c.rpm",
            "/data/repos/baseos/../../etc/passwd",
            "/data/repos/baseos/./Packages/../d.rpm",
            "/data/repos",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(
            vec![
                Utf8PathBuf::from("baseos/Packages/a.rpm"),
                Utf8PathBuf::from("baseos/Packages/b.rpm"),
                Utf8PathBuf::from("baseos/repodata"),
            ],
            members(base, "baseos", &new_files)
        );

        assert_eq!(
            vec![Utf8PathBuf::from("extras/repodata")],
            members(base, "extras", &NewFiles::new())
        );
    }

    #[test]
    fn test_archive() {
        let sandbox = Sandbox::new();
        sandbox.add_repo("repoA", &["pkg1.rpm", "old.rpm"]);
        sandbox.add_repo("repoB", &["pkg2.rpm"]);
        sandbox.snapshot(Sandbox::START, "repoA", &["old.rpm"]);
        sandbox.snapshot(Sandbox::TODAY, "repoA", &["old.rpm", "pkg1.rpm"]);
        sandbox.snapshot(Sandbox::START, "repoB", &[]);
        sandbox.snapshot(Sandbox::TODAY, "repoB", &["pkg2.rpm"]);

        let mut ctx = RunContext::new().unwrap();
        let window = Sandbox::window();
        scanner::scan(&mut ctx, &sandbox.config, &sandbox.store(), &window).unwrap();

        let archive = archive(&ctx, &sandbox.config, &["repoA".to_string()], &window).unwrap();

        assert_eq!(sandbox.config.output_dir.join(archive_name(&window)), archive);
        assert!(!ctx.is_tracked(&archive));

        let contents = tar_contents(&archive);
        assert!(contents.contains(&"repoA/pkg1.rpm".to_string()));
        assert!(contents.contains(&"repoA/repodata/".to_string()));
        assert!(contents.contains(&"repoA/repodata/repomd.xml".to_string()));
        assert!(!contents.iter().any(|m| m.starts_with("repoB")));
        assert!(!contents.iter().any(|m| m.ends_with("old.rpm")));
    }

    #[test]
    fn test_archive_refuses_to_clobber() {
        let mut sandbox = Sandbox::new();
        let window = Sandbox::window();
        let existing = sandbox.config.output_dir.join(archive_name(&window));
        touch(&existing);

        let ctx = RunContext::new().unwrap();
        let err = archive(&ctx, &sandbox.config, &[], &window).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(existing.exists());

        sandbox.config.force = true;
        sandbox.config.opts.noop = true;
        assert!(archive(&ctx, &sandbox.config, &[], &window).is_ok());
    }

    #[test]
    fn test_failed_append_removes_partial_archive() {
        let sandbox = Sandbox::new();
        sandbox.add_repo("repoA", &["pkg1.rpm"]);
        sandbox.snapshot(Sandbox::START, "repoA", &[]);
        sandbox.snapshot(Sandbox::TODAY, "repoA", &["pkg1.rpm", "vanished.rpm"]);

        let window = Sandbox::window();
        let expected = sandbox.config.output_dir.join(archive_name(&window));

        {
            let mut ctx = RunContext::new().unwrap();
            scanner::scan(&mut ctx, &sandbox.config, &sandbox.store(), &window).unwrap();
            assert!(archive(&ctx, &sandbox.config, &["repoA".to_string()], &window).is_err());
        }

        assert!(!expected.exists());
    }

    #[test]
    fn test_archive_leaves_out_paths_escaping_the_base() {
        let sandbox = Sandbox::new();
        sandbox.add_repo("repoA", &["pkg1.rpm"]);
        touch(&sandbox.config.repo_base_dir.join("../secret.key"));
        sandbox.snapshot(Sandbox::START, "repoA", &[]);
        sandbox.snapshot(Sandbox::TODAY, "repoA", &["pkg1.rpm", "../../secret.key"]);

        let mut ctx = RunContext::new().unwrap();
        let window = Sandbox::window();
        scanner::scan(&mut ctx, &sandbox.config, &sandbox.store(), &window).unwrap();

        let archive = archive(&ctx, &sandbox.config, &["repoA".to_string()], &window).unwrap();
        let contents = tar_contents(&archive);

        assert!(contents.contains(&"repoA/pkg1.rpm".to_string()));
        assert!(!contents.iter().any(|m| m.contains("secret.key")));
    }

    #[test]
    fn test_archive_repo_named_like_an_option() {
        let sandbox = Sandbox::new();
        sandbox.add_repo("-epel", &["pkg1.rpm"]);
        sandbox.snapshot(Sandbox::START, "-epel", &[]);
        sandbox.snapshot(Sandbox::TODAY, "-epel", &["pkg1.rpm"]);

        let mut ctx = RunContext::new().unwrap();
        let window = Sandbox::window();
        let candidates =
            scanner::scan(&mut ctx, &sandbox.config, &sandbox.store(), &window).unwrap();
        assert_eq!(vec!["-epel".to_string()], candidates);

        let archive = archive(&ctx, &sandbox.config, &candidates, &window).unwrap();
        let contents = tar_contents(&archive);

        assert!(contents.contains(&"-epel/pkg1.rpm".to_string()));
        assert!(contents.contains(&"-epel/repodata/".to_string()));
    }

    #[test]
    fn test_noop_writes_nothing() {
        let mut sandbox = Sandbox::new();
        sandbox.add_repo("repoA", &["pkg1.rpm"]);
        sandbox.snapshot(Sandbox::START, "repoA", &[]);
        sandbox.snapshot(Sandbox::TODAY, "repoA", &["pkg1.rpm"]);
        sandbox.config.opts.noop = true;

        let window = Sandbox::window();
        let mut ctx = RunContext::new().unwrap();
        scanner::scan(&mut ctx, &sandbox.config, &sandbox.store(), &window).unwrap();

        let archive = archive(&ctx, &sandbox.config, &["repoA".to_string()], &window).unwrap();
        assert!(!archive.exists());
        assert!(!sandbox.config.output_dir.exists());
    }
}
