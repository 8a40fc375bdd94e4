//! Works out which RPMs have turned up in a set of local repositories since a given date, and
//! bundles them, with fresh repository metadata, into one tarball for a disconnected mirror.
//!
pub mod archiver;
pub mod bundle;
pub mod cli;
pub mod compressor;
pub mod config;
pub mod context;
pub mod differ;
pub mod errors;
pub mod prompter;
pub mod scanner;
pub mod selector;
pub mod snapshot_store;
pub mod types;
