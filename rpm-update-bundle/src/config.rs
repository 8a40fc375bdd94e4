use crate::cli::Cli;
use crate::compressor::CompressionRequest;
use anyhow::anyhow;
use camino::{Utf8Path, Utf8PathBuf};
use common::rules::OmitRules;
use common::types::Opts;
use std::env;

pub const DEFAULT_METADATA_DIR: &str = "/var/log/example-data";
pub const DEFAULT_REPO_BASE_DIR: &str = "/data/repos";
pub const DEFAULT_OUTPUT_SUBDIR: &str = "patch-diffs";

/// Everything a run needs to know, resolved from flags, the environment, and defaults. All
/// directories are absolute.
#[derive(Clone, Debug)]
pub struct Config {
    pub metadata_dir: Utf8PathBuf,
    pub repo_base_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub since: Option<String>,
    pub all_repos: bool,
    pub omit: OmitRules,
    pub compression: CompressionRequest,
    pub keep_tar: bool,
    pub force: bool,
    pub fzf: bool,
    pub opts: Opts,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = current_dir()?;
        let repo_base_dir = absolute(&cwd, &cli.repo_base_dir);

        let output_dir = match &cli.output_dir {
            Some(dir) => absolute(&cwd, dir),
            None => repo_base_dir.join(DEFAULT_OUTPUT_SUBDIR),
        };

        let compression = match (cli.no_compress, cli.compress) {
            (true, _) => CompressionRequest::Skip,
            (false, Some(compression)) => CompressionRequest::Use(compression),
            (false, None) => CompressionRequest::Ask,
        };

        Ok(Self {
            metadata_dir: absolute(&cwd, &cli.metadata_dir),
            repo_base_dir,
            output_dir,
            since: cli.since.clone(),
            all_repos: cli.all_repos,
            omit: cli.omit.as_deref().map(OmitRules::parse).unwrap_or_default(),
            compression,
            keep_tar: cli.keep_tar,
            force: cli.force,
            fzf: cli.fzf,
            opts: Opts {
                verbose: cli.verbose,
                noop: cli.noop,
            },
        })
    }

    /// Everything under one directory, the way the tests want it.
    #[cfg(test)]
    pub fn sandboxed(root: &Utf8Path) -> Self {
        let repo_base_dir = root.join("repos");

        Self {
            metadata_dir: root.join("metadata"),
            output_dir: repo_base_dir.join(DEFAULT_OUTPUT_SUBDIR),
            repo_base_dir,
            since: None,
            all_repos: false,
            omit: OmitRules::default(),
            compression: CompressionRequest::Skip,
            keep_tar: false,
            force: false,
            fzf: false,
            opts: Opts::default(),
        }
    }
}

fn current_dir() -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(env::current_dir()?)
        .map_err(|p| anyhow!("working directory {} is not UTF-8", p.display()))
}

// tar is run with -C, so relative paths would break
fn absolute(cwd: &Utf8Path, dir: &Utf8Path) -> Utf8PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        cwd.join(dir)
    }
}
