use crate::error::{Error, Result};
use crate::process::RunResult;

/// Turn a finished run into success or `command.failed`.
///
/// Only the exit status decides. stderr output from a successful run is ignored.
pub fn classify(result: &RunResult, tool: &str) -> Result<()> {
    if result.success() {
        return Ok(());
    }

    Err(Error::command_failed(
        failure_message(result, tool),
        tool,
        result.exit_code,
    ))
}

/// stderr verbatim when it has any visible content, otherwise a generic line.
pub fn failure_message(result: &RunResult, tool: &str) -> String {
    if result.stderr.trim().is_empty() {
        format!("{} command failed with exit code {}", tool, result.exit_code)
    } else {
        result.stderr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(exit_code: i32, stderr: &str) -> RunResult {
        RunResult {
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn zero_exit_is_ok_despite_stderr() {
        assert!(classify(&result(0, "npm WARN deprecated request@2.88.2"), "npm").is_ok());
    }

    #[test]
    fn nonzero_exit_uses_stderr_verbatim() {
        let err = classify(&result(1, "npm ERR! code E404\n"), "npm").unwrap_err();
        assert_eq!(err.message, "npm ERR! code E404\n");
        assert_eq!(err.details["exitCode"], 1);
    }

    #[test]
    fn nonzero_exit_without_stderr_uses_generic_message() {
        let err = classify(&result(127, ""), "npm").unwrap_err();
        assert_eq!(err.message, "npm command failed with exit code 127");
    }

    #[test]
    fn whitespace_only_stderr_counts_as_empty() {
        let err = classify(&result(2, "\n  \n"), "npm").unwrap_err();
        assert_eq!(err.message, "npm command failed with exit code 2");
    }
}
