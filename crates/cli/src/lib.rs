pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use roster_core::config::{AppConfig, LoadOptions};
use roster_core::ApplicationError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "roster",
    about = "Roster organisation directory CLI",
    long_about = "Inspect configuration and drive the organisation directory from operation scripts.",
    after_help = "Examples:\n  roster config\n  roster apply org.toml --json\n  roster demo"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Apply an operation script to a fresh organisation and report each outcome")]
    Apply {
        #[arg(help = "Path to a TOML script of [[operation]] tables")]
        path: PathBuf,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the reference team-move scenario and print the resulting teams")]
    Demo,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::from(error);
            let result = commands::CommandResult::failure(
                cli.command.name(),
                error.error_class(),
                format!("config validation failed: {error}"),
                commands::EXIT_CONFIG,
            );
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Config => commands::config::run(&config),
        Command::Apply { path, json } => commands::apply::run(&config, &path, json),
        Command::Demo => commands::demo::run(&config),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Apply { .. } => "apply",
            Self::Demo => "demo",
        }
    }
}

/// Logs go to stderr so command output on stdout stays parseable.
fn init_logging(config: &AppConfig) {
    use roster_core::config::LogFormat::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}
