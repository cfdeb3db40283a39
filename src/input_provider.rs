use colored::*;

use crate::error::{LauncherError, Result};
use crate::io_handler::IoHandler;

pub type Validator = fn(&str) -> std::result::Result<(), String>;

/// Abstraction for gathering run parameters.
/// Every method returns `LauncherError::Interrupted` when the operator cancels.
pub trait InputProvider {
    /// Free text. Empty input yields the default, or an empty string.
    fn resolve_text(&self, label: &str, default: Option<&str>) -> Result<String>;

    /// Re-asks until `validator` accepts the answer.
    fn resolve_validated(&self, label: &str, default: Option<&str>, validator: Validator) -> Result<String>;

    fn confirm(&self, label: &str, default: bool) -> Result<bool>;

    /// One of `choices`, case-insensitive.
    fn choose(&self, label: &str, choices: &[&str], default: &str) -> Result<String>;
}

/// Standard CLI implementation using prompts
pub struct CliInputProvider<'a> {
    pub io: &'a dyn IoHandler,
}

impl<'a> CliInputProvider<'a> {
    pub fn new(io: &'a dyn IoHandler) -> Self {
        Self { io }
    }

    fn prompt_styled(&self, label: &str, default: Option<&str>) -> Result<String> {
        let hint = match default {
            Some(d) if !d.is_empty() => format!(" [{}]", d).dimmed().to_string(),
            _ => String::new(),
        };
        self.io.print(&format!(
            "\n{}{} {} ",
            label.cyan().bold(),
            hint,
            ">>".bright_magenta().bold()
        ));
        self.io.flush();

        let line = self.io.read_line().ok_or(LauncherError::Interrupted)?;
        let val = line.trim();
        if val.is_empty() {
            Ok(default.unwrap_or("").to_string())
        } else {
            Ok(val.to_string())
        }
    }
}

impl<'a> InputProvider for CliInputProvider<'a> {
    fn resolve_text(&self, label: &str, default: Option<&str>) -> Result<String> {
        self.prompt_styled(label, default)
    }

    fn resolve_validated(&self, label: &str, default: Option<&str>, validator: Validator) -> Result<String> {
        loop {
            let val = self.prompt_styled(label, default)?;
            match validator(&val) {
                Ok(()) => return Ok(val),
                Err(e) => {
                    let err = LauncherError::Validation(e);
                    tracing::debug!("rejected input for '{}': {}", label, err);
                    self.io.println(&format!("{} {}", "[!]".red().bold(), err.to_string().red()));
                }
            }
        }
    }

    fn confirm(&self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            let val = self.prompt_styled(&format!("{} ({})", label, hint), None)?;
            match val.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.io.println(&format!("{}", "[!] Please answer y or n.".red())),
            }
        }
    }

    fn choose(&self, label: &str, choices: &[&str], default: &str) -> Result<String> {
        let label = format!("{} ({})", label, choices.join("/"));
        loop {
            let val = self.prompt_styled(&label, Some(default))?.to_ascii_lowercase();
            if let Some(choice) = choices.iter().find(|c| c.eq_ignore_ascii_case(&val)) {
                return Ok(choice.to_string());
            }
            self.io.println(&format!(
                "{} {}",
                "[!] Choose one of:".red(),
                choices.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_handler::MockIoHandler;
    use crate::validation::validate_port;

    #[test]
    fn test_resolve_text_default() {
        let io = MockIoHandler::new();
        io.add_input("\n");
        let provider = CliInputProvider::new(&io);
        assert_eq!(provider.resolve_text("Port", Some("80")).unwrap(), "80");
    }

    #[test]
    fn test_resolve_validated_reprompts() {
        let io = MockIoHandler::new();
        io.add_inputs(&["abc\n", "8080\n"]);
        let provider = CliInputProvider::new(&io);
        assert_eq!(provider.resolve_validated("Port", Some("80"), validate_port).unwrap(), "8080");
        assert!(io.get_output().contains("Invalid port 'abc'"));
    }

    #[test]
    fn test_interrupt_maps_to_error() {
        let io = MockIoHandler::new();
        let provider = CliInputProvider::new(&io);
        assert!(matches!(provider.resolve_text("Target", None), Err(LauncherError::Interrupted)));
        assert!(matches!(provider.confirm("Sure?", true), Err(LauncherError::Interrupted)));
    }

    #[test]
    fn test_confirm() {
        let io = MockIoHandler::new();
        io.add_inputs(&["\n", "n\n", "maybe\n", "YES\n"]);
        let provider = CliInputProvider::new(&io);
        assert!(provider.confirm("Use default?", true).unwrap());
        assert!(!provider.confirm("Use default?", true).unwrap());
        assert!(provider.confirm("Use default?", false).unwrap());
    }

    #[test]
    fn test_choose() {
        let io = MockIoHandler::new();
        io.add_inputs(&["Deep\n", "medium\n", "\n"]);
        let provider = CliInputProvider::new(&io);
        assert_eq!(provider.choose("Mode", &["fast", "deep"], "fast").unwrap(), "deep");
        assert_eq!(provider.choose("Mode", &["fast", "deep"], "fast").unwrap(), "fast");
    }
}
