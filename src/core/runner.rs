//! Announced, classified subprocess runs against an execution target.

use crate::classify::classify;
use crate::console::IoContext;
use crate::error::Result;
use crate::process::{OutputMode, ProcessRunner, RunResult};
use crate::target::ExecutionTarget;

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub argv: Vec<String>,
    pub target: ExecutionTarget,
    pub label: Option<String>,
    pub suppress_output: bool,
}

impl RunRequest {
    pub fn new(argv: Vec<String>, target: ExecutionTarget) -> Self {
        Self {
            argv,
            target,
            label: None,
            suppress_output: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn suppress_output(mut self, suppress: bool) -> Self {
        self.suppress_output = suppress;
        self
    }

    /// Program name used in failure messages.
    pub fn tool(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("command")
    }
}

pub fn run(process: &dyn ProcessRunner, request: &RunRequest, io: &IoContext) -> RunResult {
    if let Some(label) = &request.label {
        io.announce_line(label);
    }
    log_status!(
        "run",
        "{} on {}",
        crate::utils::shell::quote_args(&request.argv),
        request.target.describe()
    );

    let result = process.spawn(
        &request.argv,
        &request.target,
        OutputMode::from_suppress(request.suppress_output),
    );

    if !result.success() {
        log_status!("run", "{} exited with {}", request.tool(), result.exit_code);
    }
    result
}

/// Run and fail with `command.failed` on a non-zero exit.
pub fn run_checked(process: &dyn ProcessRunner, request: &RunRequest, io: &IoContext) -> Result<RunResult> {
    let result = run(process, request, io);
    classify(&result, request.tool())?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        calls: RefCell<Vec<(Vec<String>, OutputMode)>>,
        exit_code: i32,
    }

    impl ProcessRunner for Recorder {
        fn spawn(&self, argv: &[String], _: &ExecutionTarget, mode: OutputMode) -> RunResult {
            self.calls.borrow_mut().push((argv.to_vec(), mode));
            RunResult {
                exit_code: self.exit_code,
                stdout: String::new(),
                stderr: String::new(),
            }
        }
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn run_announces_label_before_spawning() {
        let process = Recorder {
            calls: RefCell::new(Vec::new()),
            exit_code: 0,
        };
        let io = IoContext::capture();
        let request = RunRequest::new(argv(&["npm", "run", "lint"]), ExecutionTarget::LocalHost)
            .label("Linting");

        let result = run(&process, &request, &io);
        assert!(result.success());
        assert_eq!(io.transcript(), vec!["Linting"]);
        assert_eq!(
            process.calls.borrow()[0],
            (argv(&["npm", "run", "lint"]), OutputMode::Stream)
        );
    }

    #[test]
    fn suppressed_requests_capture() {
        let process = Recorder {
            calls: RefCell::new(Vec::new()),
            exit_code: 0,
        };
        let request =
            RunRequest::new(argv(&["npm", "ls"]), ExecutionTarget::LocalHost).suppress_output(true);

        run(&process, &request, &IoContext::capture());
        assert_eq!(process.calls.borrow()[0].1, OutputMode::Capture);
    }

    #[test]
    fn run_checked_names_the_program() {
        let process = Recorder {
            calls: RefCell::new(Vec::new()),
            exit_code: 9,
        };
        let request = RunRequest::new(argv(&["yarn", "add"]), ExecutionTarget::LocalHost);

        let err = run_checked(&process, &request, &IoContext::capture()).unwrap_err();
        assert_eq!(err.message, "yarn command failed with exit code 9");
    }
}
