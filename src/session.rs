use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use crate::command::CommandLine;
use crate::config::SessionConfig;
use crate::error::{LauncherError, Result};
use crate::executor::CommandExecutor;
use crate::tool_model::session_id;
use crate::ui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Absent,
    Starting,
    Running,
    Ended,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub tool_name: String,
    pub session_id: String,
    pub command_line: String,
    pub state: SessionState,
}

impl Session {
    fn new(tool_name: &str, command_line: &CommandLine) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            session_id: session_id(tool_name),
            command_line: command_line.render(),
            state: SessionState::Absent,
        }
    }
}

/// What happened to a previous session of the same tool.
#[derive(Debug, PartialEq, Eq)]
enum StaleKill {
    Replaced,
    NoneRunning,
    Failed(String),
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub session_id: String,
    pub status: ExitStatus,
}

/// Verifies the multiplexer is on PATH. Run once before any menu is shown.
pub fn preflight(executor: &dyn CommandExecutor, config: &SessionConfig) -> Result<PathBuf> {
    match executor.locate(&config.multiplexer) {
        Some(path) => {
            tracing::debug!("found {} at {}", config.multiplexer, path.display());
            Ok(path)
        }
        None => Err(LauncherError::Configuration(format!(
            "{} is not installed or not on PATH. Install it with 'sudo apt install {}'.",
            config.multiplexer, config.multiplexer
        ))),
    }
}

/// Owns the one-session-per-tool slot and drives tmux in the foreground.
pub struct SessionManager<'a> {
    executor: &'a dyn CommandExecutor,
    multiplexer: String,
    shell: String,
    spawn_delay: Duration,
    sessions: HashMap<String, Session>,
}

impl<'a> SessionManager<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, config: &SessionConfig) -> Self {
        Self {
            executor,
            multiplexer: config.multiplexer.clone(),
            shell: config.shell.clone(),
            spawn_delay: config.spawn_delay(),
            sessions: HashMap::new(),
        }
    }

    pub fn state(&self, tool_name: &str) -> SessionState {
        self.sessions
            .get(tool_name)
            .map(|s| s.state)
            .unwrap_or(SessionState::Absent)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions
            .values()
            .filter(|s| matches!(s.state, SessionState::Starting | SessionState::Running))
            .count()
    }

    /// Replaces any live session of this tool, attaches the terminal to a new
    /// one running `command`, and blocks until it exits.
    pub fn run(&mut self, tool_name: &str, command: &CommandLine) -> Result<SessionOutcome> {
        let mut session = Session::new(tool_name, command);
        tracing::debug!(tool = tool_name, state = ?self.state(tool_name), "run requested");

        if let StaleKill::Failed(reason) = self.kill_stale(&session.session_id) {
            tracing::debug!(session = %session.session_id, "continuing after failed kill: {}", reason);
        }

        session.state = SessionState::Starting;
        self.sessions.insert(tool_name.to_string(), session.clone());
        ui::spawn_spinner("Spawning tmux session...", self.spawn_delay);

        tracing::info!(tool = %session.tool_name, session = %session.session_id, command = %session.command_line, "starting session");
        self.set_state(tool_name, SessionState::Running);
        let args = [
            "new-session",
            "-s",
            session.session_id.as_str(),
            self.shell.as_str(),
            "-c",
            session.command_line.as_str(),
        ];
        let result = self.executor.execute(&self.multiplexer, &args);

        // The record stays as Ended until the next run of this tool replaces it.
        self.set_state(tool_name, SessionState::Ended);

        match result {
            Ok(status) if status.success() => {
                tracing::info!(session = %session.session_id, "session ended");
                Ok(SessionOutcome {
                    session_id: session.session_id,
                    status,
                })
            }
            Ok(status) => Err(LauncherError::Session {
                session: session.session_id,
                reason: format!("{} exited with {}", self.multiplexer, status),
            }),
            Err(e) => Err(LauncherError::Session {
                session: session.session_id,
                reason: format!("could not start {}: {}", self.multiplexer, e),
            }),
        }
    }

    fn kill_stale(&self, session_id: &str) -> StaleKill {
        let args = ["kill-session", "-t", session_id];
        match self.executor.execute_silent(&self.multiplexer, &args) {
            Ok(status) if status.success() => {
                tracing::info!("replaced previous session {}", session_id);
                StaleKill::Replaced
            }
            // No such session is the normal case.
            Ok(_) => {
                tracing::debug!("no previous session named {}", session_id);
                StaleKill::NoneRunning
            }
            Err(e) => {
                tracing::warn!("could not run {} kill-session for {}: {}", self.multiplexer, session_id, e);
                StaleKill::Failed(e.to_string())
            }
        }
    }

    fn set_state(&mut self, tool_name: &str, state: SessionState) {
        if let Some(session) = self.sessions.get_mut(tool_name) {
            tracing::trace!(tool = tool_name, from = ?session.state, to = ?state, "session state");
            session.state = state;
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
