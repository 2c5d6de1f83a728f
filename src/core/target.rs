//! Execution targets and environment resolution.
//!
//! A target is either the local host or the live container deployed for a
//! logical environment (`local`, `prod`, ...). Targets are resolved fresh for
//! every command invocation: the container behind an environment can be
//! redeployed between calls, so nothing here is cached.

use serde::Serialize;

use crate::console::IoContext;
use crate::error::{Error, Result};

/// Application root inside every deployed container.
pub const APP_ROOT: &str = "/app/html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerHandle {
    pub id: String,
    pub name: String,
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionTarget {
    LocalHost,
    Container(ContainerHandle),
}

impl ExecutionTarget {
    pub fn describe(&self) -> String {
        match self {
            ExecutionTarget::LocalHost => "local host".to_string(),
            ExecutionTarget::Container(handle) => {
                format!("container '{}' ({})", handle.name, handle.environment)
            }
        }
    }

    pub fn container(&self) -> Option<&ContainerHandle> {
        match self {
            ExecutionTarget::Container(handle) => Some(handle),
            ExecutionTarget::LocalHost => None,
        }
    }
}

/// Outcome of reading one file out of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCopy {
    Contents(Vec<u8>),
    /// The runtime could not produce the file; carries its reason verbatim.
    Unavailable(String),
}

/// Container runtime client.
pub trait ContainerRuntime {
    /// The running container deployed for `environment`, if any.
    fn find_running_target_for(&self, environment: &str) -> Result<Option<ContainerHandle>>;

    /// Container name an environment is expected to map to, when the runtime knows it.
    fn container_name_for(&self, _environment: &str) -> Option<String> {
        None
    }

    fn copy_file_from(&self, handle: &ContainerHandle, remote_path: &str) -> Result<FileCopy>;
}

/// Resolve a logical environment name to its live container.
pub fn resolve(
    runtime: &dyn ContainerRuntime,
    environment: &str,
    io: &IoContext,
) -> Result<ExecutionTarget> {
    validate_environment_name(environment)?;

    let handle = runtime
        .find_running_target_for(environment)?
        .ok_or_else(|| {
            Error::environment_not_found(environment, runtime.container_name_for(environment))
        })?;

    log_status!(
        "target",
        "Resolved '{}' -> {} ({})",
        environment,
        handle.name,
        handle.id
    );
    io.announce_line(&format!("[{}] Using container {}", environment, handle.name));

    Ok(ExecutionTarget::Container(handle))
}

pub fn validate_environment_name(environment: &str) -> Result<()> {
    let valid = !environment.is_empty()
        && environment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(Error::validation_invalid_argument(
            "env",
            format!("Invalid environment name '{}'", environment),
            Some(environment.to_string()),
            None,
        )
        .with_hint("Environment names may contain letters, digits, '-', '_' and '.'"))
    }
}
