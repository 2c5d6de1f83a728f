use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Base dockhand config directory (universal ~/.config/dockhand/ on all platforms)
pub fn dockhand() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("dockhand"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("dockhand"))
    }
}

/// Global dockhand.json config file path
pub fn dockhand_json() -> Result<PathBuf> {
    Ok(dockhand()?.join("dockhand.json"))
}

/// Workspace-local config file, which replaces the global one when present
pub fn workspace_json(workspace: &Path) -> PathBuf {
    workspace.join(".dockhand.json")
}

/// Resolve the workspace root from an optional `--workspace` value.
///
/// Expands `~` and falls back to the current directory.
pub fn workspace(dir: Option<&str>) -> Result<PathBuf> {
    match dir {
        Some(dir) if !dir.trim().is_empty() => {
            let expanded = shellexpand::tilde(dir).to_string();
            let path = PathBuf::from(expanded);
            if !path.is_dir() {
                return Err(Error::validation_invalid_argument(
                    "workspace",
                    format!("Workspace directory does not exist: {}", path.display()),
                    Some(dir.to_string()),
                    None,
                ));
            }
            Ok(path)
        }
        _ => env::current_dir().map_err(|e| {
            Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
        }),
    }
}
