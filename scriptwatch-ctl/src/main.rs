//! scriptwatch control CLI - Gate and run monitoring scripts with live output

mod cli;
mod commands;
mod logging;
mod runner;

use std::path::PathBuf;

use clap::Parser;
use console::style;

use cli::{Cli, Commands};
use commands::{check_requirements, list_keywords};
use runner::{run_watch, RunConfig};
use scriptwatch::supervisor::DEFAULT_INTERPRETER;

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose);

    let interpreter = cli
        .interpreter
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INTERPRETER));

    if cli.list_keywords {
        list_keywords();
        return;
    }

    if cli.check {
        check_requirements(&interpreter);
        return;
    }

    if let Some(command) = cli.command {
        match command {
            Commands::Run { script } => {
                let config = RunConfig {
                    script,
                    interpreter: cli.interpreter,
                    max_size: cli.max_size,
                    failure_log: cli.failure_log,
                    no_speech: cli.no_speech,
                };
                if let Err(e) = run_watch(config) {
                    eprintln!("{} {}", style("error:").red().bold(), e);
                    std::process::exit(1);
                }
            }
            Commands::Keywords => list_keywords(),
            Commands::Check => check_requirements(&interpreter),
        }
        return;
    }

    let Some(script) = cli.script else {
        eprintln!("{} No script specified", style("error:").red().bold());
        eprintln!(
            "Try {} for more information",
            style("scriptwatch-ctl --help").cyan()
        );
        std::process::exit(1);
    };

    let config = RunConfig {
        script,
        interpreter: cli.interpreter,
        max_size: cli.max_size,
        failure_log: cli.failure_log,
        no_speech: cli.no_speech,
    };
    if let Err(e) = run_watch(config) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_keywords_runs() {
        list_keywords();
    }

    #[test]
    fn check_requirements_runs() {
        check_requirements(std::path::Path::new("sh"));
    }
}
