use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scriptwatch-ctl")]
#[command(version, about = "Gate and run a monitoring script with live output and alerts", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Direct mode: gate and run a script
    scriptwatch-ctl scan.ps1
    scriptwatch-ctl --interpreter /usr/bin/pwsh scan.ps1
    scriptwatch-ctl --no-speech --failure-log watch-failures.log scan.ps1

    # Using subcommands
    scriptwatch-ctl run scan.ps1
    scriptwatch-ctl keywords
    scriptwatch-ctl check

    # Listing without running
    scriptwatch-ctl --list-keywords
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Script to gate and run (direct mode)
    #[arg(value_name = "SCRIPT", global = true)]
    pub script: Option<PathBuf>,

    /// Interpreter executable (default: pwsh)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub interpreter: Option<PathBuf>,

    /// Gate size threshold in bytes
    #[arg(long, value_name = "BYTES", global = true)]
    pub max_size: Option<u64>,

    /// Append spawn failures to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub failure_log: Option<PathBuf>,

    /// Skip the spoken announcement on alerts
    #[arg(long, global = true)]
    pub no_speech: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// List the denylisted keywords
    #[arg(long)]
    pub list_keywords: bool,

    /// Check interpreter and speech requirements
    #[arg(long)]
    pub check: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Gate and run a script
    Run {
        /// Script path
        script: PathBuf,
    },

    /// List the denylisted keywords
    Keywords,

    /// Check host requirements
    Check,
}
