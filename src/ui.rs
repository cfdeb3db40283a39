use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::io_handler::IoHandler;

pub fn print_main_menu_banner(io: &dyn IoHandler) {
    io.println(&format!("{}", "╔══════════════════════════════════════════╗".cyan().bold()));
    io.println(&format!("{}", "║      Reconnaissance Automation Tool      ║".cyan().bold()));
    io.println(&format!("{}", "║        tools in tmux, output on disk     ║".cyan().bold()));
    io.println(&format!("{}", "╚══════════════════════════════════════════╝".cyan().bold()));
}

pub fn print_header(io: &dyn IoHandler, title: &str) {
    let width = 44;
    let border = "═".repeat(width).magenta().bold();

    io.println("");
    io.println(&format!("{}", border));
    io.println(&format!("{}", format!("{:^width$}", title, width = width).magenta().bold()));
    io.println(&format!("{}", border));
}

pub fn success(io: &dyn IoHandler, msg: &str) {
    io.println(&format!("{} {}", "[+]".green().bold(), msg));
}

pub fn warn(io: &dyn IoHandler, msg: &str) {
    io.println(&format!("{} {}", "[!]".yellow().bold(), msg.yellow()));
}

pub fn error(io: &dyn IoHandler, msg: &str) {
    io.println(&format!("{} {}", "[-]".red().bold(), msg.red()));
}

pub struct MenuItem<T> {
    pub label: String,
    pub value: T,
}

impl<T> MenuItem<T> {
    pub fn new(label: &str, value: T) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MenuResult {
    Item(usize),
    Extra(String), // Key of the extra option
    Cancelled,
}

/// Renders the menu and reads until the operator picks something valid.
pub fn show_menu<T>(
    io: &dyn IoHandler,
    title: &str,
    items: &[MenuItem<T>],
    extra_options: &[(&str, &str)],
) -> MenuResult {
    loop {
        print_header(io, title);

        for (i, item) in items.iter().enumerate() {
            io.println(&format!(
                " {} {} {}",
                format!("[{}]", i + 1).cyan().bold(),
                "-".dimmed(),
                item.label
            ));
        }

        if !extra_options.is_empty() {
            io.println("");
            for (label, key) in extra_options {
                io.println(&format!(
                    " {} {} {}",
                    format!("[{}]", key).yellow().bold(),
                    "-".dimmed(),
                    label
                ));
            }
        }

        io.print(&format!("\n{}", "Select an option >> ".magenta().bold()));
        io.flush();

        let input = match io.read_line() {
            Some(line) => line,
            None => return MenuResult::Cancelled,
        };
        let trimmed = input.trim();

        if let Ok(idx) = trimmed.parse::<usize>() {
            if idx > 0 && idx <= items.len() {
                return MenuResult::Item(idx - 1);
            }
        }

        for (_, key) in extra_options {
            if trimmed.eq_ignore_ascii_case(key) {
                return MenuResult::Extra(key.to_string());
            }
        }

        error(io, "Invalid selection. Choose an option from the menu.");
    }
}

/// Cosmetic pause while the session is being set up.
pub fn spawn_spinner(message: &str, duration: Duration) {
    if duration.is_zero() {
        return;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    std::thread::sleep(duration);
    spinner.finish_and_clear();
}
