mod command;
mod config;
mod error;
mod executor;
mod input_provider;
mod io_handler;
mod menu;
mod output;
mod session;
mod tool_model;
mod tools;
mod ui;
mod validation;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DEFAULT_CONFIG_PATH};
use executor::{CommandExecutor, ShellExecutor};
use io_handler::{IoHandler, RealIoHandler};
use menu::MenuController;
use tool_model::ToolCategory;

#[derive(Parser, Debug)]
#[command(name = "reconmux")]
#[command(version)]
#[command(
    about = "Reconnaissance automation launcher",
    long_about = "reconmux runs directory brute-forcers, subdomain enumerators, network mappers and
password crackers inside dedicated tmux sessions, one session per tool, and saves their output
to text files.

Leave both output prompts blank to save into <target>_<YYYY-MM-DD_HH-MM-SS>/<tool>_<target>.txt."
)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Verbose logging to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Print the supported tools and whether they are installed, then exit
    #[arg(long, default_value_t = false)]
    pub list_tools: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("reconmux={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn print_tool_list(executor: &dyn CommandExecutor, io: &dyn IoHandler) {
    for category in ToolCategory::ALL {
        io.println(&format!("\n{}", category.title().magenta().bold()));
        for tool in tools::by_category(category) {
            let status = if executor.locate(tool.binary).is_some() {
                "installed".green()
            } else {
                "missing".red()
            };
            io.println(&format!("  {:<16} {:<32} {}", tool.name, tool.label, status));
        }
    }
}

/// Preflight, then the menu. Returns the process exit code.
pub fn run_app(config: &Config, executor: &dyn CommandExecutor, io: &dyn IoHandler) -> u8 {
    for name in config.wordlists.keys() {
        if tools::find(name).is_none() {
            tracing::warn!("ignoring wordlist override for unknown tool '{}'", name);
        }
    }

    if let Err(e) = session::preflight(executor, &config.session) {
        tracing::error!("{}", e);
        io.println(&format!("{} {}", "Error:".red().bold(), e));
        return 1;
    }

    let mut controller = MenuController::new(io, executor, config);
    controller.run();
    0
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let executor = ShellExecutor;

    let io = match RealIoHandler::new() {
        Ok(io) => io,
        Err(e) => {
            eprintln!("{} cannot install interrupt handler: {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.list_tools {
        print_tool_list(&executor, &io);
        return ExitCode::SUCCESS;
    }

    ExitCode::from(run_app(&config, &executor, &io))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
