use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Output of a single tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Whether the process exited with a zero status
    pub success: bool,
    /// Exit code, absent when the process could not start, was killed, or timed out
    pub exit_code: Option<i32>,
}

impl Capture {
    /// Capture for a process that never started or could not be waited on
    pub fn failed() -> Self {
        Self::default()
    }

    /// The stream that carries probe data.
    ///
    /// ffmpeg prints stream information on stderr, and a bare `-i <input>` probe
    /// exits non-zero because no output is given. Stdout is only trusted when the
    /// process succeeded and actually wrote something there.
    pub fn select(&self) -> &[u8] {
        if self.success && !self.stdout.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }

    pub fn selected_text(&self) -> String {
        String::from_utf8_lossy(self.select()).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs the external tool and collects its output
#[cfg_attr(test, mockall::automock)]
pub trait ToolRunner: Send + Sync {
    fn run(&self, program: &Path, args: &[String]) -> Capture;
}

/// Runs the tool as a child process, blocking until it exits
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child if it is still running after `timeout`
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn spawn_and_capture(&self, program: &Path, args: &[String]) -> io::Result<Capture> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Both pipes are drained concurrently so a chatty child never blocks on a full pipe
        let stdout_reader = drain(child.stdout.take());
        let stderr_reader = drain(child.stderr.take());

        let status = match self.timeout {
            Some(limit) => match child.wait_timeout(limit)? {
                Some(status) => Some(status),
                None => {
                    warn!("{} did not finish within {:?}, killing it", program.display(), limit);
                    let _ = child.kill();
                    let _ = child.wait();
                    None
                }
            },
            None => Some(child.wait()?),
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        Ok(Capture {
            stdout,
            stderr,
            success: status.map(|s| s.success()).unwrap_or(false),
            exit_code: status.and_then(|s| s.code()),
        })
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> Capture {
        debug!("Executing media tool: {} {:?}", program.display(), args);

        match self.spawn_and_capture(program, args) {
            Ok(capture) => {
                debug!(
                    "{} exited with {:?} ({} bytes stdout, {} bytes stderr)",
                    program.display(),
                    capture.exit_code,
                    capture.stdout.len(),
                    capture.stderr.len()
                );
                capture
            }
            Err(e) => {
                warn!("Failed to execute {}: {}", program.display(), e);
                Capture::failed()
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}
