use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::os::fd::AsFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags};
use signal_hook::consts::SIGINT;

const POLL_INTERVAL_MS: i32 = 200;

/// Console seam. `read_line` yields `None` when the operator cancels
/// (Ctrl+C or end of input).
pub trait IoHandler {
    fn println(&self, msg: &str);
    fn print(&self, msg: &str);
    fn flush(&self);
    fn read_line(&self) -> Option<String>;
}

/// Line reader that remembers what it already pulled off the descriptor.
/// Piped input often arrives several answers per read, and those must be
/// served without waiting on the descriptor again.
struct BufferedInput<R> {
    reader: BufReader<R>,
}

impl<R: Read> BufferedInput<R> {
    fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    fn has_buffered_line(&self) -> bool {
        self.reader.buffer().contains(&b'\n')
    }

    /// `wait` runs only when no complete line is buffered. Returning false
    /// from it cancels the read.
    fn read_line_with<W>(&mut self, wait: W) -> Option<String>
    where
        W: FnOnce(&R) -> bool,
    {
        if !self.has_buffered_line() && !wait(self.reader.get_ref()) {
            return None;
        }

        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input),
            Err(e) => {
                tracing::warn!("failed to read stdin: {}", e);
                None
            }
        }
    }
}

pub struct RealIoHandler {
    interrupted: Arc<AtomicBool>,
    input: Mutex<BufferedInput<File>>,
}

impl RealIoHandler {
    /// Installs a SIGINT handler that only raises a flag, so Ctrl+C at a
    /// prompt cancels the prompt instead of killing the process.
    pub fn new() -> io::Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGINT, Arc::clone(&interrupted))?;

        // Own a duplicate of fd 0 so polling and reading share one buffer.
        let stdin = File::from(io::stdin().as_fd().try_clone_to_owned()?);

        Ok(Self {
            interrupted,
            input: Mutex::new(BufferedInput::new(stdin)),
        })
    }

    fn wait_for_input(&self, fd: &impl AsFd) -> bool {
        loop {
            if self.interrupted.swap(false, Ordering::SeqCst) {
                return false;
            }
            let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
            match poll(&mut fds, POLL_INTERVAL_MS) {
                Ok(0) | Err(Errno::EINTR) => continue,
                Ok(_) => return true,
                Err(e) => {
                    tracing::debug!("poll on stdin failed, falling back to blocking read: {}", e);
                    return true;
                }
            }
        }
    }
}

impl IoHandler for RealIoHandler {
    fn println(&self, msg: &str) {
        println!("{}", msg);
    }

    fn print(&self, msg: &str) {
        print!("{}", msg);
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }

    fn read_line(&self) -> Option<String> {
        // A Ctrl+C from an earlier, non-prompt phase must not cancel this prompt.
        self.interrupted.store(false, Ordering::SeqCst);

        let mut input = match self.input.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match input.read_line_with(|fd| self.wait_for_input(fd)) {
            None => {
                println!();
                None
            }
            Some(_) if self.interrupted.swap(false, Ordering::SeqCst) => None,
            line => line,
        }
    }
}

#[cfg(test)]
const MOCK_INTERRUPT: &str = "\u{3}";

/// Scripted console for tests. An exhausted input queue reads as a cancel.
#[cfg(test)]
pub struct MockIoHandler {
    pub output: Mutex<Vec<String>>,
    pub input_queue: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockIoHandler {
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Vec::new()),
            input_queue: Mutex::new(Vec::new()),
        }
    }

    pub fn add_input(&self, input: &str) {
        self.input_queue.lock().unwrap().push(input.to_string());
    }

    pub fn add_inputs(&self, inputs: &[&str]) {
        for input in inputs {
            self.add_input(input);
        }
    }

    /// Queues a Ctrl+C at this point of the script.
    pub fn add_interrupt(&self) {
        self.add_input(MOCK_INTERRUPT);
    }

    pub fn get_output(&self) -> String {
        self.output.lock().unwrap().join("")
    }

    pub fn remaining_inputs(&self) -> usize {
        self.input_queue.lock().unwrap().len()
    }
}

#[cfg(test)]
impl Default for MockIoHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl IoHandler for MockIoHandler {
    fn println(&self, msg: &str) {
        self.output.lock().unwrap().push(format!("{}\n", msg));
    }

    fn print(&self, msg: &str) {
        self.output.lock().unwrap().push(msg.to_string());
    }

    fn flush(&self) {
        // No-op for mock
    }

    fn read_line(&self) -> Option<String> {
        let mut queue = self.input_queue.lock().unwrap();
        if queue.is_empty() {
            return None;
        }
        Some(queue.remove(0)).filter(|line| line != MOCK_INTERRUPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_buffered_lines_are_served_without_waiting() {
        let mut input = BufferedInput::new(Cursor::new(b"3\n1\n".to_vec()));

        assert_eq!(input.read_line_with(|_| true), Some("3\n".to_string()));
        assert!(input.has_buffered_line());
        assert_eq!(
            input.read_line_with(|_| panic!("second answer was already buffered")),
            Some("1\n".to_string())
        );
    }

    #[test]
    fn test_waits_when_buffer_is_empty() {
        let mut input = BufferedInput::new(Cursor::new(b"deep\n".to_vec()));
        let mut waited = false;

        let line = input.read_line_with(|_| {
            waited = true;
            true
        });

        assert!(waited);
        assert_eq!(line, Some("deep\n".to_string()));
    }

    #[test]
    fn test_partial_line_still_waits() {
        let mut input = BufferedInput::new(Cursor::new(b"1\nexample.c".to_vec()));
        assert_eq!(input.read_line_with(|_| true), Some("1\n".to_string()));
        assert!(!input.has_buffered_line());
        assert_eq!(input.read_line_with(|_| false), None);
    }

    #[test]
    fn test_cancelled_wait_and_eof_yield_none() {
        let mut input = BufferedInput::new(Cursor::new(Vec::new()));
        assert_eq!(input.read_line_with(|_| false), None);
        assert_eq!(input.read_line_with(|_| true), None);
    }
}
