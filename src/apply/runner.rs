use crate::apply::ApplyError;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Cancellation signal shared between the caller owning a request and the
/// runner executing it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub executable: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct ProcessOutcome {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: i32,
    pub error: Option<ApplyError>,
}

impl ProcessOutcome {
    fn without_output(error: ApplyError) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: -1,
            error: Some(error),
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none() && self.exit_code == 0
    }
}

pub fn run_process(spec: &RunSpec, cancel: &CancelToken) -> ProcessOutcome {
    if cancel.is_canceled() {
        return ProcessOutcome::without_output(ApplyError::Canceled);
    }

    let mut command = Command::new(&spec.executable);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = &spec.cwd {
        command.current_dir(cwd);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(source) => {
            return ProcessOutcome::without_output(ApplyError::Spawn {
                executable: spec.executable.clone(),
                source,
            })
        }
    };

    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    match wait_for_exit(&mut child, spec, cancel) {
        Ok(status) => {
            let (exit_code, error) = classify_exit(status);
            ProcessOutcome {
                stdout: join_reader(stdout_reader),
                stderr: join_reader(stderr_reader),
                exit_code,
                error,
            }
        }
        // Grandchildren may still hold the pipes open after a kill, so the
        // readers are left detached instead of joined.
        Err(error) => ProcessOutcome::without_output(error),
    }
}

fn wait_for_exit(
    child: &mut Child,
    spec: &RunSpec,
    cancel: &CancelToken,
) -> Result<ExitStatus, ApplyError> {
    let wait_error = |source| ApplyError::Wait {
        executable: spec.executable.clone(),
        source,
    };
    let start = Instant::now();

    loop {
        if let Some(status) = child.try_wait().map_err(wait_error)? {
            return Ok(status);
        }

        if cancel.is_canceled() {
            terminate(child);
            return Err(ApplyError::Canceled);
        }

        if let Some(timeout) = spec.timeout {
            if start.elapsed() > timeout {
                terminate(child);
                return Err(ApplyError::TimedOut {
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn classify_exit(status: ExitStatus) -> (i32, Option<ApplyError>) {
    if status.success() {
        return (0, None);
    }
    match status.code() {
        Some(code) => (code, Some(ApplyError::ProcessExit { code })),
        None => (-1, Some(ApplyError::ProcessSignaled)),
    }
}

fn drain<R: Read + Send + 'static>(pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let mut reader = BufReader::new(pipe);
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
