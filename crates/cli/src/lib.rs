pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "procsight",
    about = "Procsight operator CLI",
    long_about = "Run analyses and agent pipelines from the terminal, inspect effective configuration, and validate runtime readiness.",
    after_help = "Examples:\n  procsight analyze --query \"Show weekly bottlenecks\"\n  procsight run --no-narrate\n  procsight doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run one analysis (fetch, model call, parse) and print the result as JSON")]
    Analyze {
        #[arg(long, default_value = "Show weekly bottlenecks", help = "Free-text analysis query")]
        query: String,
        #[arg(long, help = "Override the configured model for this invocation")]
        model: Option<String>,
    },
    #[command(about = "Run the full agent pipeline including slide and narration rendering")]
    Run {
        #[arg(long, default_value = "Show weekly bottlenecks", help = "Free-text analysis query")]
        query: String,
        #[arg(long, help = "Skip slide-deck rendering")]
        no_slides: bool,
        #[arg(long, help = "Skip narration synthesis")]
        no_narrate: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, credential readiness, and output-directory writability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze { query, model } => commands::analyze::run(&query, model.as_deref()),
        Command::Run { query, no_slides, no_narrate } => {
            commands::run::run(&query, !no_slides, !no_narrate)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
