//! The snapshot store is a directory of dated directories, each holding one listing per
//! repository: `<root>/<YYYY-MM-DD>/<repo>.txt`. It is written by something else; we only read
//! it.
//!
use crate::errors::Fatal;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub struct SnapshotStore {
    root: Utf8PathBuf,
}

impl SnapshotStore {
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Names of every snapshot directory, newest first. Names aren't checked here: they are
    /// only validated once the user has chosen one.
    pub fn dates(&self) -> anyhow::Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("failed to read snapshot store {}", self.root))?;

        let mut ret = Vec::new();

        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }

            if let Ok(name) = entry.file_name().into_string()
                && !name.starts_with('.')
            {
                ret.push(name);
            }
        }

        ret.sort_by(|a, b| b.cmp(a));
        Ok(ret)
    }

    pub fn listing(&self, date: &str, repo: &str) -> Utf8PathBuf {
        self.root.join(date).join(format!("{}.txt", repo))
    }
}

/// Dates must be real calendar dates in ISO-8601 form.
pub fn parse_date(input: &str) -> Result<Date, Fatal> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| Fatal::InvalidDate(input.trim().into()))
}

pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
