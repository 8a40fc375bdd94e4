use crate::types::Opts;
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::process::Command;

/// Returns a printable string of the given command
///
pub fn format_command(cmd: &Command) -> String {
    format!(
        "{} {}",
        cmd.get_program().to_string_lossy(),
        cmd.get_args()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    )
}

/// Takes a Command output and returns it as a Vec of strings.
///
pub fn output_as_lines(mut cmd: Command) -> anyhow::Result<Vec<String>> {
    let raw_output = cmd
        .output()
        .with_context(|| format!("failed to run '{}'", format_command(&cmd)))?;
    let string_output = String::from_utf8(raw_output.stdout)?;
    let lines: Vec<String> = string_output.lines().map(String::from).collect();

    Ok(lines)
}

/// Runs the command, echoing it first if we're verbose or in noop mode. Anything other than a
/// zero exit is an error. In noop mode nothing is run at all.
///
pub fn run_checked(mut cmd: Command, opts: &Opts) -> anyhow::Result<()> {
    let printable = format_command(&cmd);

    if opts.verbose || opts.noop {
        println!("{}", printable);
    }

    if opts.noop {
        return Ok(());
    }

    let status = cmd
        .status()
        .with_context(|| format!("failed to run '{}'", printable))?;

    if !status.success() {
        bail!("'{}' failed: {}", printable, status);
    }

    Ok(())
}

/// Looks for an executable called `program` in each directory of $PATH.
///
pub fn find_in_path(program: &str) -> Option<Utf8PathBuf> {
    let search_path = env::var_os("PATH")?;

    env::split_paths(&search_path)
        .filter_map(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(file: &Utf8Path) -> bool {
    fs::metadata(file)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
