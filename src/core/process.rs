//! Subprocess execution on the host or inside a container.
//!
//! In `Stream` mode the child's stdout is inherited and its stderr is relayed
//! chunk by chunk while being retained for classification. Partial lines are
//! relayed as soon as they are read. Because the two streams travel separate
//! paths, the interleaving of stdout and stderr on the terminal can differ
//! from the order the child wrote them.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::target::{ExecutionTarget, APP_ROOT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// stdout passes through to the terminal; stderr is echoed live and retained.
    Stream,
    /// Both streams are captured in full and nothing reaches the terminal.
    Capture,
}

impl OutputMode {
    pub fn from_suppress(suppress_output: bool) -> Self {
        if suppress_output {
            OutputMode::Capture
        } else {
            OutputMode::Stream
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Result for a child that never started.
    pub fn spawn_failure(message: impl Into<String>) -> Self {
        Self {
            exit_code: -1,
            stdout: String::new(),
            stderr: message.into(),
        }
    }
}

/// Subprocess facility. One call spawns exactly one child and blocks until it exits.
pub trait ProcessRunner {
    fn spawn(&self, argv: &[String], target: &ExecutionTarget, mode: OutputMode) -> RunResult;
}

/// Runs children on this machine, or through `docker exec` for containers.
pub struct SystemProcess {
    pub workspace: PathBuf,
}

impl SystemProcess {
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    fn build(&self, argv: &[String], target: &ExecutionTarget) -> Option<Command> {
        let (program, args) = argv.split_first()?;

        let cmd = match target {
            ExecutionTarget::LocalHost => {
                let mut cmd = Command::new(program);
                cmd.args(args).current_dir(&self.workspace);
                cmd
            }
            ExecutionTarget::Container(handle) => {
                let mut cmd = Command::new("docker");
                cmd.args(["exec", "-w", APP_ROOT, handle.id.as_str()])
                    .arg(program)
                    .args(args);
                cmd
            }
        };
        Some(cmd)
    }
}

impl ProcessRunner for SystemProcess {
    fn spawn(&self, argv: &[String], target: &ExecutionTarget, mode: OutputMode) -> RunResult {
        let Some(mut cmd) = self.build(argv, target) else {
            return RunResult::spawn_failure("Command error: empty argument vector");
        };
        cmd.stdin(Stdio::inherit());

        match mode {
            OutputMode::Capture => run_captured(cmd),
            OutputMode::Stream => run_streamed(cmd),
        }
    }
}

fn run_captured(mut cmd: Command) -> RunResult {
    match cmd.output() {
        Ok(out) => RunResult {
            exit_code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        },
        Err(e) => RunResult::spawn_failure(format!("Command error: {}", e)),
    }
}

fn run_streamed(mut cmd: Command) -> RunResult {
    cmd.stdout(Stdio::inherit()).stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return RunResult::spawn_failure(format!("Command error: {}", e)),
    };

    let mut captured = Vec::new();
    if let Some(pipe) = child.stderr.take() {
        relay_stderr(pipe, &mut io::stderr(), &mut captured);
    }
    let mut stderr = String::from_utf8_lossy(&captured).into_owned();

    let exit_code = match child.wait() {
        Ok(status) => status.code().unwrap_or(-1),
        Err(e) => {
            stderr.push_str(&format!("Command error: {}", e));
            -1
        }
    };

    RunResult {
        exit_code,
        stdout: String::new(),
        stderr,
    }
}

/// Copy the pipe to `echo` until EOF, keeping every byte. Encoding is not inspected.
fn relay_stderr(mut pipe: impl Read, echo: &mut impl Write, captured: &mut Vec<u8>) {
    let mut chunk = [0u8; 4096];
    loop {
        match pipe.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let _ = echo.write_all(&chunk[..n]);
                let _ = echo.flush();
                captured.extend_from_slice(&chunk[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log_status!("process", "stderr relay stopped: {}", e);
                break;
            }
        }
    }
}
