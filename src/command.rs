use std::fmt;
use std::path::Path;

use crate::output::OutputLocation;
use crate::tool_model::{RunParameters, ToolSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Program name or argument. Always quoted on render.
    Word(String),
    /// Shell syntax. Only crate constants end up here.
    Op(&'static str),
}

/// A shell command kept as words until it is handed to the session shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<Token>,
}

impl CommandLine {
    pub fn new(program: &str) -> Self {
        Self {
            tokens: vec![Token::Word(program.to_string())],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.tokens.push(Token::Word(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens
            .extend(args.into_iter().map(|a| Token::Word(a.into())));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// `self && next`
    pub fn and_then(mut self, next: CommandLine) -> Self {
        self.tokens.push(Token::Op("&&"));
        self.tokens.extend(next.tokens);
        self
    }

    /// `self >> path`
    pub fn append_stdout_to(mut self, path: &Path) -> Self {
        self.tokens.push(Token::Op(">>"));
        self.tokens
            .push(Token::Word(path.to_string_lossy().into_owned()));
        self
    }

    /// `{ self; } 2>&1 | tee [-a] path`
    pub fn tee_into(self, path: &Path, append: bool) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 8);
        tokens.push(Token::Op("{"));
        tokens.extend(self.tokens);
        tokens.push(Token::Op(";"));
        tokens.push(Token::Op("}"));
        tokens.push(Token::Op("2>&1"));
        tokens.push(Token::Op("|"));
        tokens.push(Token::Word("tee".to_string()));
        if append {
            tokens.push(Token::Word("-a".to_string()));
        }
        tokens.push(Token::Word(path.to_string_lossy().into_owned()));
        Self { tokens }
    }

    /// `self; printf '%s' prompt; read -r _`
    pub fn then_pause(mut self, prompt: &str) -> Self {
        self.tokens.push(Token::Op(";"));
        self.tokens.push(Token::Word("printf".to_string()));
        self.tokens.push(Token::Word("%s".to_string()));
        self.tokens.push(Token::Word(prompt.to_string()));
        self.tokens.push(Token::Op(";"));
        self.tokens.push(Token::Word("read".to_string()));
        self.tokens.push(Token::Word("-r".to_string()));
        self.tokens.push(Token::Word("_".to_string()));
        self
    }

    pub fn program(&self) -> Option<&str> {
        self.tokens.iter().find_map(|t| match t {
            Token::Word(w) => Some(w.as_str()),
            Token::Op(_) => None,
        })
    }

    /// Unquoted words, operators skipped.
    pub fn words(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word(w) => Some(w.as_str()),
                Token::Op(_) => None,
            })
            .collect()
    }

    /// POSIX `sh` source for this command, every word quoted as needed.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Op(";") => out.push(';'),
                Token::Op(op) => {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(op);
                }
                Token::Word(word) => {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(&shell_words::quote(word));
                }
            }
        }
        out
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Turns a tool template plus run input into the full session command.
/// Pure: no filesystem or process access.
pub struct CommandBuilder {
    pause_prompt: String,
}

impl CommandBuilder {
    pub fn new(pause_prompt: &str) -> Self {
        Self {
            pause_prompt: pause_prompt.to_string(),
        }
    }

    pub fn build(
        &self,
        tool: &ToolSpec,
        params: &RunParameters,
        location: &OutputLocation,
    ) -> CommandLine {
        let invocation = (tool.template)(params, location);

        let captured = if tool.supports_output_flag {
            invocation
        } else {
            invocation.tee_into(&location.full_path, tool.append_output)
        };

        captured.then_pause(&self.pause_prompt)
    }
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new("Press enter to return to menu...")
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
