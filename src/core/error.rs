use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,
    ConfigIdCollision,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    EnvironmentNotFound,
    CommandUnknown,
    CommandFailed,
    SyncFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",
            ErrorCode::ConfigIdCollision => "config.id_collision",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::EnvironmentNotFound => "environment.not_found",
            ErrorCode::CommandUnknown => "command.unknown",
            ErrorCode::CommandFailed => "command.failed",
            ErrorCode::SyncFailed => "sync.failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigIdCollisionDetails {
    pub id: String,
    pub existing: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentNotFoundDetails {
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownCommandDetails {
    pub command: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub tool: String,
    pub exit_code: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailedDetails {
    pub container: String,
    pub remote_path: String,
    pub local_path: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        let message = format!("Missing required argument: {}", args.join(", "));
        Self::new(
            ErrorCode::ValidationMissingArgument,
            message,
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            id,
            tried,
        });

        Self::new(ErrorCode::ValidationInvalidArgument, problem, details)
    }

    /// No running execution target exists for the environment.
    pub fn environment_not_found(environment: impl Into<String>, container: Option<String>) -> Self {
        let environment = environment.into();
        let message = format!("No deployed container found for environment '{}'", environment);
        let expected = container
            .as_ref()
            .map(|name| format!("Expected a running container named '{}'", name));

        let mut err = Self::new(
            ErrorCode::EnvironmentNotFound,
            message,
            to_details(EnvironmentNotFoundDetails {
                environment: environment.clone(),
                container,
            }),
        );
        if let Some(hint) = expected {
            err = err.with_hint(hint);
        }
        err.with_hint(format!(
            "Deploy the application to '{}' before running commands against it",
            environment
        ))
    }

    pub fn unknown_command(command: impl Into<String>, suggestions: Vec<String>) -> Self {
        let command = command.into();
        let hints: Vec<String> = suggestions
            .iter()
            .map(|s| format!("Did you mean '{}'?", s))
            .collect();

        let mut err = Self::new(
            ErrorCode::CommandUnknown,
            format!("Command '{}' is not registered", command),
            to_details(UnknownCommandDetails {
                command,
                suggestions,
            }),
        );
        for hint in hints {
            err = err.with_hint(hint);
        }
        err.with_hint("Run 'dockhand list' to see available commands")
    }

    /// A subprocess exited non-zero. The message is surfaced to the user as-is.
    pub fn command_failed(message: impl Into<String>, tool: impl Into<String>, exit_code: i32) -> Self {
        Self::new(
            ErrorCode::CommandFailed,
            message,
            to_details(CommandFailedDetails {
                tool: tool.into(),
                exit_code,
            }),
        )
    }

    pub fn sync_failed(details: SyncFailedDetails) -> Self {
        let message = format!(
            "Failed to copy {} from container '{}' to {}: {}",
            details.remote_path, details.container, details.local_path, details.problem
        );
        Self::new(ErrorCode::SyncFailed, message, to_details(details))
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.clone(),
        });

        Self::new(ErrorCode::ConfigInvalidValue, problem, details)
    }

    pub fn config_id_collision(id: impl Into<String>, existing: impl Into<String>) -> Self {
        let id = id.into();
        let existing = existing.into();
        let message = format!("Name '{}' is already registered by '{}'", id, existing);
        Self::new(
            ErrorCode::ConfigIdCollision,
            message,
            to_details(ConfigIdCollisionDetails { id, existing }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
