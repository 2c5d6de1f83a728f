//! The JSON envelope printed on stdout and the process exit status it implies.

use std::io::{self, Write};
use std::process::ExitCode;

use dockhand::error::Hint;
use dockhand::{Error, ErrorCode, Result};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    pub exit_code: u8,
}

impl Envelope {
    fn succeeded(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(err: Error, exit_code: u8) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: err.code.as_str(),
                message: err.message,
                details: err.details,
                hints: err.hints,
                exit_code,
            }),
        }
    }
}

/// Exit status for each error family.
pub fn exit_code_for(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ConfigIdCollision
        | ErrorCode::ValidationMissingArgument
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::EnvironmentNotFound | ErrorCode::CommandUnknown => 4,

        ErrorCode::CommandFailed | ErrorCode::SyncFailed => 20,

        ErrorCode::InternalIoError | ErrorCode::InternalJsonError | ErrorCode::InternalUnexpected => 1,
    }
}

/// Envelope and exit status for a command outcome. Success statuses are clamped to 0..=255.
pub fn envelope_for<T: Serialize>(result: Result<(T, i32)>) -> (Envelope, u8) {
    let serialized = result.and_then(|(data, status)| {
        serde_json::to_value(data)
            .map(|value| (value, status))
            .map_err(|e| Error::internal_json(e.to_string(), Some("serialize response".to_string())))
    });

    match serialized {
        Ok((value, status)) => (Envelope::succeeded(value), status.clamp(0, 255) as u8),
        Err(err) => {
            let status = exit_code_for(err.code);
            (Envelope::failed(err, status), status)
        }
    }
}

/// Print the envelope for `result` and return the status the process should exit with.
pub fn emit<T: Serialize>(result: Result<(T, i32)>) -> ExitCode {
    let (envelope, status) = envelope_for(result);
    if let Err(err) = print(&envelope) {
        eprintln!("dockhand: {} ({})", err.message, err.details);
    }
    ExitCode::from(status)
}

fn print(envelope: &Envelope) -> Result<()> {
    let payload = serde_json::to_string_pretty(envelope)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize response".to_string())))?;

    let mut stdout = io::stdout().lock();
    match writeln!(stdout, "{}", payload) {
        Ok(()) => Ok(()),
        // Reader went away (`dockhand list | head`).
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(Error::internal_io(e.to_string(), Some("write stdout".to_string()))),
    }
}
