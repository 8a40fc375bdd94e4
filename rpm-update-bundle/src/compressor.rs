//! Optional last step: squash the finished tarball with an external compressor.
//!
use crate::context::RunContext;
use crate::errors::Fatal;
use crate::prompter::Prompter;
use anyhow::{Context, anyhow, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use common::command_helpers::{find_in_path, run_checked};
use common::types::Opts;
use common::{verbose, warning};
use std::fs;
use std::process::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Compression {
    Gzip,
    Bzip2,
    Xz,
    Zstd,
    Zip,
    #[value(name = "7z")]
    SevenZip,
}

/// What the command line said about compression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressionRequest {
    Ask,
    Skip,
    Use(Compression),
}

impl Compression {
    pub fn name(self) -> &'static str {
        match self {
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
            Compression::Xz => "xz",
            Compression::Zstd => "zstd",
            Compression::Zip => "zip",
            Compression::SevenZip => "7z",
        }
    }

    /// Zip and 7z are reserved, but not implemented.
    pub fn suffix(self) -> Result<&'static str, Fatal> {
        match self {
            Compression::Gzip => Ok("gz"),
            Compression::Bzip2 => Ok("bz2"),
            Compression::Xz => Ok("xz"),
            Compression::Zstd => Ok("zst"),
            Compression::Zip | Compression::SevenZip => {
                Err(Fatal::UnsupportedCompression(self.name().into()))
            }
        }
    }

    pub fn output_path(self, archive: &Utf8Path) -> Result<Utf8PathBuf, Fatal> {
        Ok(Utf8PathBuf::from(format!("{}.{}", archive, self.suffix()?)))
    }

    /// The source is kept or removed according to `keep_source`, never according to whatever
    /// the program happens to do by default.
    pub fn command(self, archive: &Utf8Path, keep_source: bool) -> Result<Command, Fatal> {
        let mut cmd = Command::new(self.name());

        match self {
            Compression::Gzip | Compression::Bzip2 | Compression::Xz => {
                if keep_source {
                    cmd.arg("--keep");
                }
                cmd.arg(archive.as_str());
            }
            Compression::Zstd => {
                cmd.arg("-q");
                if !keep_source {
                    cmd.arg("--rm");
                }
                cmd.arg(archive.as_str())
                    .arg("-o")
                    .arg(self.output_path(archive)?.as_str());
            }
            Compression::Zip | Compression::SevenZip => {
                return Err(Fatal::UnsupportedCompression(self.name().into()));
            }
        }

        Ok(cmd)
    }
}

pub fn is_installed(compression: Compression) -> bool {
    find_in_path(compression.name()).is_some()
}

/// Decides which program, if any, to compress with. A program which isn't installed sends the
/// user back to the menu; one which isn't supported ends the run.
///
pub fn choose(
    prompter: &mut dyn Prompter,
    request: CompressionRequest,
) -> anyhow::Result<Option<Compression>> {
    choose_with(prompter, request, &is_installed)
}

fn choose_with(
    prompter: &mut dyn Prompter,
    request: CompressionRequest,
    installed: &dyn Fn(Compression) -> bool,
) -> anyhow::Result<Option<Compression>> {
    match request {
        CompressionRequest::Skip => return Ok(None),
        CompressionRequest::Ask => {
            if !prompter.confirm("Compress the archive?")? {
                return Ok(None);
            }
        }
        CompressionRequest::Use(compression) => {
            compression.suffix()?;
            if installed(compression) {
                return Ok(Some(compression));
            }
            warning!("{} is not installed", compression.name());
        }
    }

    let menu: Vec<String> = Compression::value_variants()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    loop {
        let choice = prompter.pick_one(&menu, "Compress with")?;
        let compression = Compression::from_str(&choice, false)
            .map_err(|_| anyhow!("unknown compression program '{}'", choice))?;

        compression.suffix()?;

        if installed(compression) {
            return Ok(Some(compression));
        }

        warning!("{} is not installed: choose another program", compression.name());
    }
}

/// Compresses `archive`, returning the path of the compressed file. If the program fails, its
/// partial output is removed.
///
pub fn compress(
    ctx: &RunContext,
    archive: &Utf8Path,
    compression: Compression,
    keep_source: bool,
    force: bool,
    opts: &Opts,
) -> anyhow::Result<Utf8PathBuf> {
    let output = compression.output_path(archive)?;

    if output.exists() {
        if !force {
            bail!("{} already exists: use --force to replace it", output);
        }

        verbose!(opts, "removing existing {}", output);
        if !opts.noop {
            fs::remove_file(&output).with_context(|| format!("failed to remove {}", output))?;
        }
    }

    let cmd = compression.command(archive, keep_source)?;

    ctx.track(&output);
    run_checked(cmd, opts)?;
    ctx.release(&output);

    Ok(output)
}
