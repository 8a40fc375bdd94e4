//! Works out which paths appear in a newer listing but not an older one.
//!
use anyhow::Context;
use camino::Utf8Path;
use std::collections::BTreeSet;
use std::fs;

pub type NewFiles = BTreeSet<String>;

pub const OLD_SORTED: &str = "old.sorted";
pub const NEW_SORTED: &str = "new.sorted";
pub const NEW_FILES: &str = "new-files";

/// Reads a listing, returning its non-blank lines sorted and without duplicates.
///
pub fn read_listing(file: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let raw = fs::read_to_string(file).with_context(|| format!("failed to read {}", file))?;
    let mut ret: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    ret.sort();
    ret.dedup();
    Ok(ret)
}

/// Both inputs must be sorted and de-duplicated. A single pass over each.
///
pub fn subtract(old: &[String], new: &[String]) -> NewFiles {
    let mut old_iter = old.iter().peekable();
    let mut ret = NewFiles::new();

    for path in new {
        while old_iter.next_if(|o| *o < path).is_some() {}

        if old_iter.peek() != Some(&path) {
            ret.insert(path.clone());
        }
    }

    ret
}

pub fn diff(old_listing: &Utf8Path, new_listing: &Utf8Path) -> anyhow::Result<NewFiles> {
    let old = read_listing(old_listing)?;
    let new = read_listing(new_listing)?;
    Ok(subtract(&old, &new))
}

/// As diff(), but leaves the sorted listings and the result in `scratch_dir`, where
/// load_new_files() can pick the result up again later.
///
pub fn diff_into(
    scratch_dir: &Utf8Path,
    old_listing: &Utf8Path,
    new_listing: &Utf8Path,
) -> anyhow::Result<NewFiles> {
    let old = read_listing(old_listing)?;
    let new = read_listing(new_listing)?;
    let ret = subtract(&old, &new);

    write_list(&scratch_dir.join(OLD_SORTED), old.iter())?;
    write_list(&scratch_dir.join(NEW_SORTED), new.iter())?;
    write_list(&scratch_dir.join(NEW_FILES), ret.iter())?;

    Ok(ret)
}

pub fn load_new_files(scratch_dir: &Utf8Path) -> anyhow::Result<NewFiles> {
    Ok(read_listing(&scratch_dir.join(NEW_FILES))?.into_iter().collect())
}

fn write_list<'a>(file: &Utf8Path, lines: impl Iterator<Item = &'a String>) -> anyhow::Result<()> {
    let content: String = lines.map(|l| format!("{}\n", l)).collect();
    fs::write(file, content).with_context(|| format!("failed to write {}", file))
}

#[cfg(test)]
mod test {
    use super::*;
    use camino_tempfile::tempdir;
    use common::spec_helper::{fixture, write_lines};

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_listing() {
        let listing = read_listing(&fixture("listings/old.txt")).unwrap();

        assert_eq!(
            strings(&[
                "/data/repos/baseos/Packages/a/acl-2.3.1-3.el9.x86_64.rpm",
                "/data/repos/baseos/Packages/b/bash-5.1.8-6.el9.x86_64.rpm",
                "/data/repos/baseos/Packages/c/coreutils-8.32-34.el9.x86_64.rpm",
            ]),
            listing
        );
    }

    #[test]
    fn test_diff() {
        let actual = diff(
            &fixture("listings/old.txt"),
            &fixture("listings/new.txt"),
        )
        .unwrap();

        let expected: NewFiles = [
            "/data/repos/baseos/Packages/c/coreutils-8.32-35.el9.x86_64.rpm",
            "/data/repos/baseos/Packages/z/zlib-1.2.11-40.el9.x86_64.rpm",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_diff_with_itself_is_empty() {
        let listing = fixture("listings/new.txt");
        assert!(diff(&listing, &listing).unwrap().is_empty());
    }

    #[test]
    fn test_diff_never_reports_removals() {
        let removed_only = diff(
            &fixture("listings/new.txt"),
            &fixture("listings/old.txt"),
        )
        .unwrap();

        assert!(removed_only.is_empty());
    }

    #[test]
    fn test_diff_missing_listing() {
        assert!(diff(&fixture("listings/old.txt"), &fixture("listings/nope.txt")).is_err());
    }

    #[test]
    fn test_subtract() {
        assert!(subtract(&[], &[]).is_empty());

        assert_eq!(
            strings(&["/a", "/b"]),
            subtract(&[], &strings(&["/a", "/b"]))
                .into_iter()
                .collect::<Vec<_>>()
        );

        assert_eq!(
            strings(&["/b", "/d"]),
            subtract(
                &strings(&["/a", "/c", "/e", "/f"]),
                &strings(&["/a", "/b", "/c", "/d", "/e"])
            )
            .into_iter()
            .collect::<Vec<_>>()
        );

        // everything in old sorts after everything in new
        assert_eq!(
            strings(&["/a"]),
            subtract(&strings(&["/x", "/y"]), &strings(&["/a", "/x"]))
                .into_iter()
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_diff_into() {
        let tmp = tempdir().unwrap();
        let old = tmp.path().join("old.txt");
        let new = tmp.path().join("new.txt");
        let scratch = tmp.path().join("scratch");
        fs::create_dir(&scratch).unwrap();

        write_lines(&old, &["/r/b.rpm", "/r/a.rpm"]);
        write_lines(&new, &["/r/c.rpm", "/r/a.rpm", "/r/b.rpm", "/r/c.rpm"]);

        let result = diff_into(&scratch, &old, &new).unwrap();
        assert_eq!(result, load_new_files(&scratch).unwrap());
        assert_eq!(
            "/r/a.rpm\n/r/b.rpm\n",
            fs::read_to_string(scratch.join(OLD_SORTED)).unwrap()
        );
        assert_eq!(
            "/r/a.rpm\n/r/b.rpm\n/r/c.rpm\n",
            fs::read_to_string(scratch.join(NEW_SORTED)).unwrap()
        );
        assert_eq!(
            "/r/c.rpm\n",
            fs::read_to_string(scratch.join(NEW_FILES)).unwrap()
        );
    }

    #[test]
    fn test_load_new_files_empty_result() {
        let tmp = tempdir().unwrap();
        let listing = tmp.path().join("same.txt");
        write_lines(&listing, &["/r/a.rpm"]);

        assert!(diff_into(tmp.path(), &listing, &listing).unwrap().is_empty());
        assert!(load_new_files(tmp.path()).unwrap().is_empty());
    }
}
