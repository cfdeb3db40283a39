use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::{HashSet, VecDeque};

pub trait CommandExecutor {
    /// Runs in the foreground with the caller's terminal attached.
    fn execute(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus>;
    fn execute_silent(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus>;
    /// Resolves a binary on PATH.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
    }

    fn execute_silent(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

// Mock for testing
#[cfg(test)]
pub struct ExecutedCall {
    pub command: String,
    pub args: Vec<String>,
}

#[cfg(test)]
pub struct MockExecutor {
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
    pub mock_status: RefCell<VecDeque<io::Result<ExitStatus>>>,
    pub missing: RefCell<HashSet<String>>,
}

#[cfg(test)]
impl MockExecutor {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            mock_status: RefCell::new(VecDeque::new()),
            missing: RefCell::new(HashSet::new()),
        }
    }

    pub fn add_status(&self, code: i32) {
        // Raw wait status: exit code lives in the high byte.
        let status = std::os::unix::process::ExitStatusExt::from_raw(code << 8);
        self.mock_status.borrow_mut().push_back(Ok(status));
    }

    pub fn add_error(&self, kind: io::ErrorKind, msg: &str) {
        self.mock_status
            .borrow_mut()
            .push_back(Err(io::Error::new(kind, msg.to_string())));
    }

    pub fn mark_missing(&self, program: &str) {
        self.missing.borrow_mut().insert(program.to_string());
    }

    pub fn get_calls(&self) -> Vec<ExecutedCall> {
        self.calls
            .borrow()
            .iter()
            .map(|(cmd, args)| ExecutedCall {
                command: cmd.clone(),
                args: args.clone(),
            })
            .collect()
    }

    fn record(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus> {
        self.calls.borrow_mut().push((
            program.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
        ));

        match self.mock_status.borrow_mut().pop_front() {
            Some(result) => result,
            None => Ok(std::os::unix::process::ExitStatusExt::from_raw(0)),
        }
    }
}

#[cfg(test)]
impl CommandExecutor for MockExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus> {
        self.record(program, args)
    }

    fn execute_silent(&self, program: &str, args: &[&str]) -> io::Result<ExitStatus> {
        self.record(program, args)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        if self.missing.borrow().contains(program) {
            None
        } else {
            Some(PathBuf::from(format!("/usr/bin/{}", program)))
        }
    }
}
