use clap::Parser;
use colored::Colorize;
use rpm_update_bundle::cli::Cli;
use rpm_update_bundle::config::Config;
use rpm_update_bundle::context::RunContext;
use rpm_update_bundle::prompter::{FzfPrompter, Prompter, StdinPrompter};
use rpm_update_bundle::{bundle, errors, snapshot_store};

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(cli)?;

    // Must come before the interrupt handler starts a thread, or the local offset is unknowable.
    let today = snapshot_store::today();

    let mut ctx = RunContext::new()?;
    ctx.install_interrupt_handler()?;

    let mut prompter: Box<dyn Prompter> = if config.fzf {
        Box::new(FzfPrompter::new()?)
    } else {
        Box::new(StdinPrompter::stdio())
    };

    bundle::run(&mut ctx, &config, prompter.as_mut(), today)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let status = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {:#}", "ERROR:".red().bold(), e);
            errors::exit_code(&e)
        }
    };

    std::process::exit(status);
}
