use crate::compressor::Compression;
use crate::config::{DEFAULT_METADATA_DIR, DEFAULT_REPO_BASE_DIR};
use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser)]
#[clap(
    version,
    about = "Bundles RPMs added to local repositories since a given date, for copying to \
    disconnected mirrors",
    long_about = None
)]
pub struct Cli {
    /// Directory of dated package listings
    #[clap(long, env = "METADATA_DIR", default_value = DEFAULT_METADATA_DIR)]
    pub metadata_dir: Utf8PathBuf,
    /// Directory holding one subdirectory per repository
    #[clap(long, env = "REPO_BASE_DIR", default_value = DEFAULT_REPO_BASE_DIR)]
    pub repo_base_dir: Utf8PathBuf,
    /// Where to write the bundle [default: <REPO_BASE_DIR>/patch-diffs]
    #[clap(long, env = "OUTPUT_DIR")]
    pub output_dir: Option<Utf8PathBuf>,
    /// Compare against this snapshot date (YYYY-MM-DD) rather than choosing one
    #[clap(short, long)]
    pub since: Option<String>,
    /// Bundle every repository with new packages, without asking
    #[clap(short, long)]
    pub all_repos: bool,
    /// Comma-separated list of repositories to ignore. Accepts * as a wildcard.
    #[clap(short, long)]
    pub omit: Option<String>,
    /// Compress the bundle with this program, without asking
    #[clap(short, long, value_enum, conflicts_with = "no_compress")]
    pub compress: Option<Compression>,
    /// Leave the bundle uncompressed, without asking
    #[clap(short = 'C', long)]
    pub no_compress: bool,
    /// Keep the uncompressed tarball after compressing it
    #[clap(short, long)]
    pub keep_tar: bool,
    /// Replace an existing bundle for the same dates
    #[clap(short, long)]
    pub force: bool,
    /// Use fzf for menus
    #[clap(long)]
    pub fzf: bool,
    /// Print what would happen, without doing it
    #[clap(short, long)]
    pub noop: bool,
    /// Be verbose
    #[clap(short, long)]
    pub verbose: bool,
}
