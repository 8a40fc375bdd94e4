//! Per-run state: scratch space for each repository's diff, and the list of paths which must not
//! outlive the run if it fails or is interrupted.
//!
use crate::errors::Fatal;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use std::collections::BTreeMap;
use std::fs;
use std::sync::{Arc, Mutex, MutexGuard};

pub type TransientPaths = Arc<Mutex<Vec<Utf8PathBuf>>>;

pub struct RunContext {
    scratch_root: Utf8TempDir,
    scratch_dirs: BTreeMap<String, Utf8PathBuf>,
    transient: TransientPaths,
}

impl RunContext {
    pub fn new() -> anyhow::Result<Self> {
        let scratch_root = camino_tempfile::Builder::new()
            .prefix("rpm-update-bundle.")
            .tempdir()
            .context("failed to create scratch directory")?;

        let transient = Arc::new(Mutex::new(vec![scratch_root.path().to_path_buf()]));

        Ok(Self {
            scratch_root,
            scratch_dirs: BTreeMap::new(),
            transient,
        })
    }

    pub fn scratch_root(&self) -> &Utf8Path {
        self.scratch_root.path()
    }

    /// Creates, and remembers, an empty scratch directory for the repo.
    pub fn scratch_dir_for(&mut self, repo: &str) -> anyhow::Result<Utf8PathBuf> {
        let dir = self.scratch_root.path().join(repo);
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir))?;
        self.scratch_dirs.insert(repo.to_string(), dir.clone());
        Ok(dir)
    }

    pub fn scratch_dir(&self, repo: &str) -> Option<&Utf8Path> {
        self.scratch_dirs.get(repo).map(|d| d.as_path())
    }

    /// `path` will be removed if the run ends before it is released.
    pub fn track(&self, path: &Utf8Path) {
        lock(&self.transient).push(path.to_path_buf());
    }

    /// `path` is complete, and is to be kept.
    pub fn release(&self, path: &Utf8Path) {
        lock(&self.transient).retain(|p| p != path);
    }

    pub fn is_tracked(&self, path: &Utf8Path) -> bool {
        lock(&self.transient).iter().any(|p| p == path)
    }

    /// On SIGINT or SIGTERM, remove everything still tracked and exit. Must only be called once
    /// per process.
    pub fn install_interrupt_handler(&self) -> anyhow::Result<()> {
        let transient = Arc::clone(&self.transient);

        ctrlc::set_handler(move || {
            eprintln!();
            remove_all(&transient);
            std::process::exit(Fatal::Interrupted.exit_code());
        })
        .context("failed to install interrupt handler")
    }
}

impl Drop for RunContext {
    fn drop(&mut self) {
        remove_all(&self.transient);
    }
}

// A poisoned lock still holds a usable list, and cleanup has to happen regardless.
fn lock(paths: &TransientPaths) -> MutexGuard<'_, Vec<Utf8PathBuf>> {
    paths.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn remove_all(paths: &TransientPaths) {
    for path in lock(paths).drain(..) {
        let _ = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
    }
}
