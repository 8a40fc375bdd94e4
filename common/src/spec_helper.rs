//! Helpers for tests. Everything here panics on failure.
//!
use camino::{Utf8Path, Utf8PathBuf};
use std::{env, fs};

/// Static test data lives in `test/resources` under the crate being tested.
pub fn fixture(dir: &str) -> Utf8PathBuf {
    Utf8PathBuf::try_from(env::current_dir().unwrap())
        .unwrap()
        .join("test/resources")
        .join(dir)
}

/// Writes one line per path to `file`, creating any missing parent directories.
pub fn write_lines(file: &Utf8Path, lines: &[&str]) {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(file, content).unwrap();
}

/// Creates an empty file, and any directories it needs.
pub fn touch(file: &Utf8Path) {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    fs::write(file, "").unwrap();
}
