//! Program-under-test execution
//!
//! Runs the program command line through the platform shell with piped
//! stdio, feeds it the normalized input, and captures stdout and stderr
//! under a wall-clock timeout. A program that overruns the timeout is
//! killed together with anything it spawned.

use crate::error::{RunError, RunResult};
use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Default per-test timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// How often to poll for process exit once both pipes have closed
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Shell exit codes meaning the command could not be found or executed
#[cfg(unix)]
const LAUNCH_FAILURE_CODES: &[i32] = &[126, 127];
#[cfg(windows)]
const LAUNCH_FAILURE_CODES: &[i32] = &[9009];

/// Output captured from one run of the program under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Everything written to standard output
    pub stdout: String,
    /// Everything written to standard error
    pub stderr: String,
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
    /// Wall-clock time from spawn to exit
    pub duration: Duration,
}

impl ExecutionResult {
    /// Whether the shell exited with its "command not runnable" status.
    ///
    /// Only a hint for diagnostics: the program may exit this way on its own.
    pub fn shell_launch_failed(&self) -> bool {
        self.exit_code
            .is_some_and(|code| LAUNCH_FAILURE_CODES.contains(&code))
    }
}

/// Runner for the program under test
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Shell command line used to launch the program
    program: String,
    /// Timeout for a single run
    timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl ProcessRunner {
    /// Create a runner for a command line with the default timeout
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the timeout for each run
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command line this runner launches
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The per-run timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Launch a fresh instance of the program, write `stdin_payload` to it,
    /// and collect its output.
    ///
    /// The child never outlives this call: on timeout or I/O failure it is
    /// killed and reaped before the error is returned.
    pub fn run(&self, stdin_payload: &str) -> RunResult<ExecutionResult> {
        let start = Instant::now();
        let deadline = start + self.timeout;

        let mut child = self
            .command()
            .spawn()
            .map_err(|e| RunError::launch(&self.program, e))?;

        tracing::debug!(program = %self.program, pid = child.id(), "spawned program under test");

        if let Some(stdin) = child.stdin.take() {
            spawn_writer(stdin, stdin_payload.as_bytes().to_vec());
        }

        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            spawn_reader(stdout, Stream::Stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_reader(stderr, Stream::Stderr, tx);
        } else {
            drop(tx);
        }

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Readers hang up once both pipes reach EOF
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((Stream::Stdout, Ok(bytes))) => stdout = bytes,
                Ok((Stream::Stderr, Ok(bytes))) => stderr = bytes,
                Ok((_, Err(e))) => {
                    terminate(&mut child);
                    return Err(RunError::Io(e));
                }
                Err(RecvTimeoutError::Timeout) => return Err(self.timed_out(&mut child)),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => return Err(self.timed_out(&mut child)),
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    terminate(&mut child);
                    return Err(RunError::Io(e));
                }
            }
        };

        let result = ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code: status.code(),
            duration: start.elapsed(),
        };

        tracing::debug!(
            program = %self.program,
            exit_code = ?result.exit_code,
            elapsed = ?result.duration,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "program under test exited"
        );

        Ok(result)
    }

    /// Build the shell invocation for the program
    fn command(&self) -> Command {
        #[cfg(unix)]
        let mut cmd = {
            use std::os::unix::process::CommandExt;

            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.program);
            // Own process group, so a timeout can take down the whole pipeline
            cmd.process_group(0);
            cmd
        };

        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.program);
            cmd
        };

        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn timed_out(&self, child: &mut Child) -> RunError {
        tracing::debug!(
            program = %self.program,
            timeout = ?self.timeout,
            "program under test timed out"
        );
        terminate(child);
        RunError::Timeout {
            timeout: self.timeout,
        }
    }
}

/// Write the payload and close stdin.
///
/// A child that exits without reading its input is not an error.
fn spawn_writer(mut stdin: impl Write + Send + 'static, payload: Vec<u8>) {
    thread::spawn(move || {
        if let Err(e) = stdin.write_all(&payload) {
            if e.kind() != io::ErrorKind::BrokenPipe {
                tracing::debug!(error = %e, "failed to write program input");
            }
        }
    });
}

fn spawn_reader(
    mut pipe: impl Read + Send + 'static,
    stream: Stream,
    tx: Sender<(Stream, io::Result<Vec<u8>>)>,
) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf).map(|_| buf);
        // Receiver is gone if the run already timed out
        let _ = tx.send((stream, result));
    });
}

/// Forcibly kill the child (and its process group on Unix) and reap it
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        // The child leads its own group, so the group id is its pid
        if let Err(e) = killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
            tracing::debug!(error = %e, "process group already gone");
        }
    }

    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "kill on already-exited child");
    }
    if let Err(e) = child.wait() {
        tracing::warn!(error = %e, "failed to reap program under test");
    }
}
