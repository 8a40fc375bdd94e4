use crate::prompter::Prompter;
use crate::snapshot_store::{SnapshotStore, parse_date};
use crate::types::Selection;
use anyhow::bail;
use common::warning;
use time::Date;

pub const ALL: &str = "all";
pub const NONE: &str = "none";

/// The date to compare today's snapshot against. Either given on the command line, or picked
/// from the snapshots in the store. Whichever it is, it has to be a real date.
///
pub fn start_date(
    prompter: &mut dyn Prompter,
    store: &SnapshotStore,
    since: Option<&str>,
    today: Date,
) -> anyhow::Result<Date> {
    if let Some(date) = since {
        return Ok(parse_date(date)?);
    }

    let today_name = today.to_string();
    let dates: Vec<String> = store
        .dates()?
        .into_iter()
        .filter(|d| *d != today_name)
        .collect();

    if dates.is_empty() {
        bail!("no snapshots older than today in {}", store.root());
    }

    let choice = prompter.pick_one(&dates, "How far back?")?;
    Ok(parse_date(&choice)?)
}

/// Offers the candidates, with 'all' and 'none' ahead of them, until the user picks something.
///
pub fn select_repos(prompter: &mut dyn Prompter, candidates: &[String]) -> anyhow::Result<Selection> {
    let menu: Vec<String> = [ALL, NONE]
        .iter()
        .map(|s| s.to_string())
        .chain(candidates.iter().cloned())
        .collect();

    loop {
        let chosen = prompter.pick_many(&menu, "Repositories to bundle", None)?;

        match interpret(&chosen, candidates) {
            Some(selection) => return Ok(selection),
            None => warning!("nothing selected: choose at least one repository, or '{}'", NONE),
        }
    }
}

// 'none' beats everything, 'all' beats everything else. None means nothing useful was chosen.
fn interpret(chosen: &[String], candidates: &[String]) -> Option<Selection> {
    if chosen.iter().any(|c| c == NONE) {
        return Some(Selection::Nothing);
    }

    if chosen.iter().any(|c| c == ALL) {
        return Some(Selection::Repos(candidates.to_vec()));
    }

    let repos: Vec<String> = candidates
        .iter()
        .filter(|c| chosen.contains(c))
        .cloned()
        .collect();

    if repos.is_empty() {
        None
    } else {
        Some(Selection::Repos(repos))
    }
}
