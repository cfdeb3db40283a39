use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::{LauncherError, Result};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const OUTPUT_EXTENSION: &str = "txt";

/// Where one run writes its capture. `directory` exists once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub directory: PathBuf,
    pub filename: String,
    pub full_path: PathBuf,
}

impl OutputLocation {
    fn new(directory: PathBuf, filename: String) -> Self {
        let full_path = directory.join(format!("{}.{}", filename, OUTPUT_EXTENSION));
        Self {
            directory,
            filename,
            full_path,
        }
    }
}

/// Folder names lose dots and slashes: `10.10.10.10` -> `10_10_10_10`.
pub fn sanitize_folder(target: &str) -> String {
    target.replace(['.', '/'], "_")
}

/// File names keep dots but never contain a path separator.
pub fn sanitize_filename(name: &str) -> String {
    name.replace('/', "_")
}

pub fn auto_folder_name(target: &str, now: NaiveDateTime) -> String {
    format!("{}_{}", sanitize_folder(target), now.format(TIMESTAMP_FORMAT))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub struct OutputResolver {
    root: PathBuf,
}

impl OutputResolver {
    /// An empty root keeps auto folders relative to the working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(
        &self,
        tool_name: &str,
        target: &str,
        explicit_filename: Option<&str>,
        explicit_directory: Option<&str>,
    ) -> Result<OutputLocation> {
        self.resolve_at(
            tool_name,
            target,
            explicit_filename,
            explicit_directory,
            Local::now().naive_local(),
        )
    }

    pub fn resolve_at(
        &self,
        tool_name: &str,
        target: &str,
        explicit_filename: Option<&str>,
        explicit_directory: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<OutputLocation> {
        let filename = non_empty(explicit_filename);
        let directory = non_empty(explicit_directory);

        let location = match (filename, directory) {
            (None, None) => {
                let dir = self.root.join(auto_folder_name(target, now));
                let name = sanitize_filename(&format!("{}_{}", tool_name, target));
                tracing::debug!("auto output mode: {}", dir.display());
                OutputLocation::new(dir, name)
            }
            (filename, directory) => {
                let dir = match directory {
                    Some(d) => PathBuf::from(d),
                    None if self.root.as_os_str().is_empty() => PathBuf::from("."),
                    None => self.root.clone(),
                };
                let name = match filename {
                    Some(f) => sanitize_filename(f),
                    None => format!("{}_output", tool_name),
                };
                OutputLocation::new(dir, name)
            }
        };

        ensure_dir(&location.directory)?;
        Ok(location)
    }
}

impl Default for OutputResolver {
    fn default() -> Self {
        Self::new(PathBuf::new())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| LauncherError::io(dir, e))
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
