use crate::errors::Fatal;
use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use colored::Colorize;
use common::command_helpers::{find_in_path, format_command};
use regex::Regex;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::process::{Command, Stdio};

/// Everything the tool needs to ask the user goes through one of these.
pub trait Prompter {
    /// Returns exactly one of `options`.
    fn pick_one(&mut self, options: &[String], header: &str) -> anyhow::Result<String>;

    /// Returns the chosen subset of `options`, in menu order. It may be empty. `limit` caps the
    /// number of choices.
    fn pick_many(
        &mut self,
        options: &[String],
        header: &str,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<String>>;

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool>;
}

/// A numbered menu on any reader and writer. End of input counts as an interruption.
pub struct StdinPrompter<R, W> {
    input: R,
    output: W,
}

impl StdinPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn print_menu(&mut self, options: &[String]) -> io::Result<()> {
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "{:>3} {}", index.to_string().bold(), option)?;
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{} > ", prompt)?;
        self.output.flush()?;

        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Err(Fatal::Interrupted.into());
        }

        Ok(buffer.trim().to_string())
    }

    fn complain(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }
}

impl<R: BufRead, W: Write> Prompter for StdinPrompter<R, W> {
    fn pick_one(&mut self, options: &[String], header: &str) -> anyhow::Result<String> {
        loop {
            self.print_menu(options)?;
            let answer = self.ask(header)?;

            if let Some(option) = options.iter().find(|o| **o == answer) {
                return Ok(option.clone());
            }

            match answer.parse::<usize>().ok().and_then(|i| options.get(i)) {
                Some(option) => return Ok(option.clone()),
                None => self.complain(&format!("'{}' is not one of the choices", answer))?,
            }
        }
    }

    fn pick_many(
        &mut self,
        options: &[String],
        header: &str,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<String>> {
        loop {
            self.print_menu(options)?;
            let answer = self.ask(&format!("{} (e.g. 1 3-5)", header))?;

            let Some(indices) = parse_selection(&answer, options.len()) else {
                self.complain(&format!("cannot understand '{}'", answer))?;
                continue;
            };

            if let Some(max) = limit
                && indices.len() > max
            {
                self.complain(&format!("choose at most {}", max))?;
                continue;
            }

            return Ok(indices.into_iter().map(|i| options[i].clone()).collect());
        }
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        loop {
            match self.ask(&format!("{} [y/n]", question))?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.complain("please answer y or n")?,
            }
        }
    }
}

/// Turns something like "0, 2 4-6" into a set of menu indices, all of which must be below
/// `count`. An empty answer is an empty selection. None means the input made no sense.
pub fn parse_selection(input: &str, count: usize) -> Option<BTreeSet<usize>> {
    let pattern = Regex::new(r"^(\d+)(?:-(\d+))?$").ok()?;
    let mut ret = BTreeSet::new();

    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }

        let captures = pattern.captures(token)?;
        let from = captures.get(1)?.as_str().parse::<usize>().ok()?;
        let to = match captures.get(2) {
            Some(m) => m.as_str().parse::<usize>().ok()?,
            None => from,
        };

        if from > to || to >= count {
            return None;
        }

        ret.extend(from..=to);
    }

    Some(ret)
}

/// Hands the choosing over to fzf.
pub struct FzfPrompter {
    program: Utf8PathBuf,
}

impl FzfPrompter {
    pub fn new() -> anyhow::Result<Self> {
        let program = find_in_path("fzf").context("fzf was requested but is not on the PATH")?;
        Ok(Self { program })
    }

    /// `multi` is None for a single choice, otherwise the optional cap on how many.
    fn command(&self, header: &str, multi: Option<Option<usize>>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--header").arg(header).arg("--reverse");

        match multi {
            Some(Some(limit)) => cmd.arg(format!("--multi={}", limit)),
            Some(None) => cmd.arg("--multi"),
            None => cmd.arg("--no-multi"),
        };

        cmd
    }

    fn run(
        &self,
        options: &[String],
        header: &str,
        multi: Option<Option<usize>>,
    ) -> anyhow::Result<Vec<String>> {
        let mut cmd = self.command(header, multi);
        let printable = format_command(&cmd);
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to run '{}'", printable))?;

        {
            let mut stdin = child.stdin.take().context("no stdin for fzf")?;
            for option in options {
                writeln!(stdin, "{}", option)?;
            }
        }

        let output = child.wait_with_output()?;
        fzf_choices(output.status.code(), output.stdout, &printable)
    }
}

// fzf exits 1 when nothing matched, and 130 on ^C or Esc
fn fzf_choices(code: Option<i32>, stdout: Vec<u8>, printable: &str) -> anyhow::Result<Vec<String>> {
    match code {
        Some(0) => Ok(String::from_utf8(stdout)?
            .lines()
            .map(String::from)
            .collect()),
        Some(1) => Ok(Vec::new()),
        Some(130) | None => Err(Fatal::Interrupted.into()),
        Some(code) => bail!("'{}' exited {}", printable, code),
    }
}

impl Prompter for FzfPrompter {
    fn pick_one(&mut self, options: &[String], header: &str) -> anyhow::Result<String> {
        loop {
            if let Some(choice) = self.run(options, header, None)?.into_iter().next() {
                return Ok(choice);
            }
        }
    }

    fn pick_many(
        &mut self,
        options: &[String],
        header: &str,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<String>> {
        let chosen = self.run(options, header, Some(limit))?;
        Ok(options
            .iter()
            .filter(|o| chosen.contains(o))
            .cloned()
            .collect())
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answers = ["yes".to_string(), "no".to_string()];
        Ok(self.pick_one(&answers, question)? == "yes")
    }
}

/// Plays back canned answers. Running out of answers looks like the user hitting ^C.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedPrompter {
    pub picks: std::collections::VecDeque<String>,
    pub multi_picks: std::collections::VecDeque<Vec<String>>,
    pub confirmations: std::collections::VecDeque<bool>,
    pub menus_seen: Vec<Vec<String>>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn with_picks(picks: &[&str]) -> Self {
        Self {
            picks: picks.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_multi_picks(multi_picks: &[&[&str]]) -> Self {
        Self {
            multi_picks: multi_picks
                .iter()
                .map(|p| p.iter().map(|s| s.to_string()).collect())
                .collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn pick_one(&mut self, options: &[String], _header: &str) -> anyhow::Result<String> {
        self.menus_seen.push(options.to_vec());
        self.picks.pop_front().ok_or_else(|| Fatal::Interrupted.into())
    }

    fn pick_many(
        &mut self,
        options: &[String],
        _header: &str,
        _limit: Option<usize>,
    ) -> anyhow::Result<Vec<String>> {
        self.menus_seen.push(options.to_vec());
        self.multi_picks
            .pop_front()
            .ok_or_else(|| Fatal::Interrupted.into())
    }

    fn confirm(&mut self, _question: &str) -> anyhow::Result<bool> {
        self.confirmations
            .pop_front()
            .ok_or_else(|| Fatal::Interrupted.into())
    }
}
