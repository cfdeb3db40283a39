use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "reconmux.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub output: OutputConfig,
    /// Per-tool wordlist overrides, keyed by tool name.
    pub wordlists: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub multiplexer: String,
    pub shell: String,
    pub spawn_delay_ms: u64,
    pub pause_prompt: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            multiplexer: "tmux".to_string(),
            shell: "sh".to_string(),
            spawn_delay_ms: 1000,
            pause_prompt: "Press enter to return to menu...".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn spawn_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base for auto folders and for manual runs without a directory.
    /// Empty means the working directory.
    pub root: PathBuf,
}

impl Config {
    /// Load config from file, or use defaults if file doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn wordlist_override(&self, tool: &str) -> Option<&str> {
        self.wordlists.get(tool).map(String::as_str)
    }
}
