use std::fs;
use std::path::PathBuf;

use colored::*;

use crate::command::CommandBuilder;
use crate::config::Config;
use crate::error::{LauncherError, Result};
use crate::executor::CommandExecutor;
use crate::input_provider::{CliInputProvider, InputProvider};
use crate::io_handler::IoHandler;
use crate::output::{OutputLocation, OutputResolver};
use crate::session::SessionManager;
use crate::tool_model::{
    HashSource, RunParameters, ScanMode, ToolCategory, ToolInput, ToolSpec, FLAG_FILTER_SIZE,
    FLAG_FILTER_WORDS, FLAG_HASH_MODE, FLAG_MODE,
};
use crate::tools;
use crate::ui::{self, MenuItem, MenuResult};
use crate::validation::{
    validate_filter, validate_hash, validate_hash_file, validate_hashcat_mode, validate_host,
    validate_port, validate_target, validate_wordlist,
};

const EXIT_KEY: &str = "0";
const BACK_KEY: &str = "b";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Stay,
    Exit,
}

/// Everything gathered from the operator before anything touches disk.
#[derive(Debug)]
pub struct CollectedRun {
    pub params: RunParameters,
    pub hash: Option<HashSource>,
}

pub struct MenuController<'a> {
    io: &'a dyn IoHandler,
    executor: &'a dyn CommandExecutor,
    config: &'a Config,
    resolver: OutputResolver,
    builder: CommandBuilder,
    sessions: SessionManager<'a>,
}

impl<'a> MenuController<'a> {
    pub fn new(io: &'a dyn IoHandler, executor: &'a dyn CommandExecutor, config: &'a Config) -> Self {
        Self {
            io,
            executor,
            config,
            resolver: OutputResolver::new(config.output.root.clone()),
            builder: CommandBuilder::new(&config.session.pause_prompt),
            sessions: SessionManager::new(executor, &config.session),
        }
    }

    /// Main menu loop. Returns when the operator exits.
    pub fn run(&mut self) {
        ui::print_main_menu_banner(self.io);

        let items: Vec<MenuItem<ToolCategory>> = ToolCategory::ALL
            .iter()
            .map(|c| MenuItem::new(c.title(), *c))
            .collect();

        loop {
            match ui::show_menu(self.io, "Main Menu", &items, &[("Exit", EXIT_KEY)]) {
                MenuResult::Item(idx) => {
                    if self.category_menu(items[idx].value) == Flow::Exit {
                        break;
                    }
                }
                MenuResult::Extra(_) | MenuResult::Cancelled => break,
            }
        }

        tracing::debug!(active = self.sessions.active_sessions(), "leaving main menu");
        self.io.println(&format!("\n{}", "Exiting Recon Automation Tool. Goodbye!".green().bold()));
    }

    fn category_menu(&mut self, category: ToolCategory) -> Flow {
        let tools = tools::by_category(category);

        loop {
            let items: Vec<MenuItem<&ToolSpec>> = tools
                .iter()
                .map(|t| MenuItem::new(&self.tool_label(t), *t))
                .collect();

            match ui::show_menu(
                self.io,
                category.title(),
                &items,
                &[("Back", BACK_KEY), ("Exit", EXIT_KEY)],
            ) {
                MenuResult::Item(idx) => {
                    let tool = items[idx].value;
                    self.launch_reporting(tool);
                }
                MenuResult::Extra(key) if key == EXIT_KEY => return Flow::Exit,
                MenuResult::Extra(_) => return Flow::Stay,
                MenuResult::Cancelled => {
                    ui::warn(self.io, "Returning to main menu.");
                    return Flow::Stay;
                }
            }
        }
    }

    fn tool_label(&self, tool: &ToolSpec) -> String {
        if self.executor.locate(tool.binary).is_some() {
            tool.label.to_string()
        } else {
            format!("{} {}", tool.label, "(not installed)".dimmed())
        }
    }

    /// Runs one tool and turns every recoverable error into a message.
    fn launch_reporting(&mut self, tool: &ToolSpec) {
        match self.launch(tool) {
            Ok(location) => {
                ui::success(
                    self.io,
                    &format!("{} session ended. Output saved to {}", tool.name, location.full_path.display()),
                );
            }
            Err(LauncherError::Interrupted) => {
                ui::warn(self.io, "Cancelled. Returning to menu.");
            }
            Err(e) => {
                tracing::warn!(tool = tool.name, "run failed: {}", e);
                ui::error(self.io, &e.to_string());
            }
        }
    }

    /// Collect, resolve, build, run. Nothing is written until collection finishes.
    pub fn launch(&mut self, tool: &ToolSpec) -> Result<OutputLocation> {
        let provider = CliInputProvider::new(self.io);
        let CollectedRun { mut params, hash } = self.collect_parameters(tool, &provider)?;

        let location = self.resolver.resolve(
            tool.name,
            params.identifier(),
            params.explicit_filename.as_deref(),
            params.explicit_directory.as_deref(),
        )?;

        if let Some(hash) = &hash {
            params.target = stage_hash(tool, hash, &location)?;
        }

        let command = self.builder.build(tool, &params, &location);
        tracing::debug!(tool = tool.name, program = ?command.program(), "command: {}", command);

        ui::success(self.io, &format!("Saving output to {}", location.full_path.display()));
        let outcome = self.sessions.run(tool.name, &command)?;
        tracing::debug!(session = %outcome.session_id, status = %outcome.status, "run finished");
        Ok(location)
    }

    pub fn collect_parameters(&self, tool: &ToolSpec, provider: &dyn InputProvider) -> Result<CollectedRun> {
        let mut params = RunParameters::default();
        let mut hash = None;

        for input in tool.inputs {
            match input {
                ToolInput::Target => {
                    params.target = provider.resolve_validated("Target IP/Host", None, validate_host)?;
                }
                ToolInput::Domain => {
                    params.target = provider.resolve_validated("Target domain", None, validate_host)?;
                }
                ToolInput::Network => {
                    params.target =
                        provider.resolve_validated("Target (IP, host or CIDR range)", None, validate_target)?;
                }
                ToolInput::Port => {
                    params.port = Some(provider.resolve_validated("Port", Some("80"), validate_port)?);
                }
                ToolInput::Wordlist => {
                    params.wordlist = Some(self.collect_wordlist(tool, provider)?);
                }
                ToolInput::ScanMode => {
                    let modes = [ScanMode::Fast.as_str(), ScanMode::Deep.as_str()];
                    let mode = provider.choose("Scan mode", &modes, ScanMode::default().as_str())?;
                    params.set_flag(FLAG_MODE, &mode);
                }
                ToolInput::Filters => {
                    let size = provider.resolve_validated("Filter size (-fs), blank for none", None, validate_filter)?;
                    let words = provider.resolve_validated("Filter words (-fw), blank for none", None, validate_filter)?;
                    params.set_flag(FLAG_FILTER_SIZE, &size);
                    params.set_flag(FLAG_FILTER_WORDS, &words);
                }
                ToolInput::HashSource => {
                    let source = collect_hash_source(provider)?;
                    params.identifier = Some(source.identifier());
                    if let HashSource::File(path) = &source {
                        params.target = path.to_string_lossy().into_owned();
                    }
                    hash = Some(source);
                }
                ToolInput::HashMode => {
                    let mode = provider.resolve_validated("Hashcat mode (e.g. 0 for MD5)", Some("0"), validate_hashcat_mode)?;
                    params.set_flag(FLAG_HASH_MODE, &mode);
                }
            }
        }

        if params.identifier.is_none() {
            params.identifier = tools::implicit_identifier(tool).map(str::to_string);
        }

        let filename = provider.resolve_text(
            &format!("Output filename for {} (without extension, blank for auto)", tool.name),
            None,
        )?;
        let directory = provider.resolve_text("Output directory (blank for auto)", None)?;
        params.explicit_filename = Some(filename).filter(|f| !f.is_empty());
        params.explicit_directory = Some(directory).filter(|d| !d.is_empty());

        Ok(CollectedRun { params, hash })
    }

    fn collect_wordlist(&self, tool: &ToolSpec, provider: &dyn InputProvider) -> Result<String> {
        let default = self
            .config
            .wordlist_override(tool.name)
            .or(tool.default_wordlist);

        if let Some(default) = default {
            if provider.confirm(&format!("Use default wordlist for {} ({})?", tool.name, default), true)? {
                return Ok(default.to_string());
            }
        }
        provider.resolve_validated("Path to your custom wordlist", None, validate_wordlist)
    }
}

fn collect_hash_source(provider: &dyn InputProvider) -> Result<HashSource> {
    let kind = provider.choose("Provide hash or file?", &["hash", "file"], "hash")?;
    if kind == "file" {
        let path = provider.resolve_validated("Path to hash file", None, validate_hash_file)?;
        Ok(HashSource::File(PathBuf::from(path)))
    } else {
        let value = provider.resolve_validated("Hash value", None, validate_hash)?;
        Ok(HashSource::Value(value))
    }
}

/// Writes an inline hash next to the output so the cracker can read it.
/// Returns the path the command should target.
pub fn stage_hash(tool: &ToolSpec, hash: &HashSource, location: &OutputLocation) -> Result<String> {
    match hash {
        HashSource::File(path) => Ok(path.to_string_lossy().into_owned()),
        HashSource::Value(value) => {
            let path = location.directory.join(format!(".{}_hash", tool.name));
            fs::write(&path, format!("{}\n", value)).map_err(|e| LauncherError::io(&path, e))?;
            Ok(path.to_string_lossy().into_owned())
        }
    }
}

#[cfg(test)]
#[path = "menu_tests.rs"]
mod tests;
