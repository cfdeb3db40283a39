use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::command::CommandLine;
use crate::output::OutputLocation;

pub const FLAG_MODE: &str = "mode";
pub const FLAG_FILTER_SIZE: &str = "fs";
pub const FLAG_FILTER_WORDS: &str = "fw";
pub const FLAG_HASH_MODE: &str = "hash_mode";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolCategory {
    Subdomain,
    Network,
    Directory,
    Hash,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 4] = [
        ToolCategory::Subdomain,
        ToolCategory::Network,
        ToolCategory::Directory,
        ToolCategory::Hash,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ToolCategory::Subdomain => "Subdomain Enumeration",
            ToolCategory::Network => "Network Mapping",
            ToolCategory::Directory => "Directory Traversal",
            ToolCategory::Hash => "Hash Cracking",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One operator prompt a tool needs before it can be launched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolInput {
    /// Host or IP, validated.
    Target,
    /// Domain name, validated like a target.
    Domain,
    /// Address or CIDR range.
    Network,
    Port,
    Wordlist,
    ScanMode,
    /// ffuf `-fs` / `-fw` response filters.
    Filters,
    HashSource,
    HashMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanMode {
    #[default]
    Fast,
    Deep,
}

impl ScanMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fast" => Some(ScanMode::Fast),
            "deep" => Some(ScanMode::Deep),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Fast => "fast",
            ScanMode::Deep => "deep",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HashSource {
    Value(String),
    File(PathBuf),
}

impl HashSource {
    /// Name used for output paths: the hash itself or the file stem.
    pub fn identifier(&self) -> String {
        match self {
            HashSource::Value(hash) => hash.clone(),
            HashSource::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        }
    }
}

/// Builds a tool's invocation. The builder adds output capture and the pause.
pub type ArgumentTemplate = fn(&RunParameters, &OutputLocation) -> CommandLine;

pub struct ToolSpec {
    /// Unique key. Drives the session id and default file names.
    pub name: &'static str,
    pub label: &'static str,
    pub category: ToolCategory,
    /// Executable checked on PATH for the availability marker.
    pub binary: &'static str,
    pub inputs: &'static [ToolInput],
    pub default_wordlist: Option<&'static str>,
    /// False means output is captured through `tee` instead of a tool flag.
    pub supports_output_flag: bool,
    /// Captured output is appended (`tee -a`), since the template also writes to the file.
    pub append_output: bool,
    pub template: ArgumentTemplate,
}

impl fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("inputs", &self.inputs)
            .field("supports_output_flag", &self.supports_output_flag)
            .finish()
    }
}

pub fn session_id(tool_name: &str) -> String {
    format!("{}_session", tool_name)
}

/// Operator input for one run. Dropped once the session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunParameters {
    pub target: String,
    /// Overrides `target` for output naming.
    pub identifier: Option<String>,
    pub port: Option<String>,
    pub wordlist: Option<String>,
    pub extra_flags: BTreeMap<String, String>,
    pub explicit_filename: Option<String>,
    pub explicit_directory: Option<String>,
}

impl RunParameters {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..Default::default()
        }
    }

    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.target)
    }

    pub fn port_or_default(&self) -> &str {
        self.port.as_deref().unwrap_or("80")
    }

    pub fn wordlist_or_empty(&self) -> &str {
        self.wordlist.as_deref().unwrap_or("")
    }

    pub fn flag(&self, key: &str) -> Option<&str> {
        self.extra_flags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set_flag(&mut self, key: &str, value: &str) {
        self.extra_flags.insert(key.to_string(), value.to_string());
    }

    pub fn mode(&self) -> ScanMode {
        self.flag(FLAG_MODE)
            .and_then(ScanMode::parse)
            .unwrap_or_default()
    }
}
