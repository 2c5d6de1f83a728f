use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::sync::SyncStep;
use crate::utils::template::{self, TemplateVars};

/// Root configuration structure for dockhand.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DockhandConfig {
    /// Environment used when a command receives no `--env`.
    #[serde(default = "default_environment")]
    pub default_environment: String,

    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub container: ContainerConfig,

    #[serde(default)]
    pub hooks: HookSyncConfig,
}

impl Default for DockhandConfig {
    fn default() -> Self {
        Self {
            default_environment: default_environment(),
            tool: ToolConfig::default(),
            container: ContainerConfig::default(),
            hooks: HookSyncConfig::default(),
        }
    }
}

/// The package-manager program and the script entry points it exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default)]
    pub scripts: ScriptNames,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            scripts: ScriptNames::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptNames {
    #[serde(default = "default_lint_script")]
    pub lint: String,
    #[serde(default = "default_test_script")]
    pub test: String,
    #[serde(default = "default_unit_script")]
    pub unit: String,
    #[serde(default = "default_e2e_script")]
    pub e2e: String,
    #[serde(default = "default_e2e_headless_script")]
    pub e2e_headless: String,
}

impl Default for ScriptNames {
    fn default() -> Self {
        Self {
            lint: default_lint_script(),
            test: default_test_script(),
            unit: default_unit_script(),
            e2e: default_e2e_script(),
            e2e_headless: default_e2e_headless_script(),
        }
    }
}

/// How an environment name maps to a running container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerConfig {
    /// Application name used in the name template. Defaults to the workspace directory name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    #[serde(default = "default_name_template")]
    pub name_template: String,

    /// Explicit container names per environment, bypassing the template.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub environments: HashMap<String, String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            application: None,
            name_template: default_name_template(),
            environments: HashMap::new(),
        }
    }
}

/// Which artifact syncs follow each dependency hook, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookSyncConfig {
    #[serde(default = "default_install_syncs")]
    pub install: Vec<SyncStep>,
    #[serde(default = "default_uninstall_syncs")]
    pub uninstall: Vec<SyncStep>,
    #[serde(default = "default_update_syncs")]
    pub update: Vec<SyncStep>,
}

impl Default for HookSyncConfig {
    fn default() -> Self {
        Self {
            install: default_install_syncs(),
            uninstall: default_uninstall_syncs(),
            update: default_update_syncs(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_environment() -> String {
    "local".to_string()
}

fn default_program() -> String {
    "npm".to_string()
}

fn default_lint_script() -> String {
    "lint".to_string()
}

fn default_test_script() -> String {
    "test".to_string()
}

fn default_unit_script() -> String {
    "test:unit".to_string()
}

fn default_e2e_script() -> String {
    "test:e2e".to_string()
}

fn default_e2e_headless_script() -> String {
    "test:e2e:headless".to_string()
}

// Rendered with `application` and `environment`.
fn default_name_template() -> String {
    "{{application}}-{{environment}}".to_string()
}

fn default_install_syncs() -> Vec<SyncStep> {
    vec![SyncStep::Manifest, SyncStep::Lockfile]
}

fn default_uninstall_syncs() -> Vec<SyncStep> {
    vec![SyncStep::Manifest, SyncStep::Lockfile]
}

fn default_update_syncs() -> Vec<SyncStep> {
    vec![SyncStep::Lockfile]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Where the effective configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Workspace,
    Global,
    Builtin,
}

/// Locate the config file for a workspace: `.dockhand.json` wins over the global file.
pub fn config_file(workspace: &Path) -> crate::Result<(PathBuf, ConfigSource)> {
    let local = paths::workspace_json(workspace);
    if local.exists() {
        return Ok((local, ConfigSource::Workspace));
    }
    Ok((paths::dockhand_json()?, ConfigSource::Global))
}

/// Load the effective config for a workspace.
///
/// A missing file yields built-in defaults; an unreadable or invalid file is an error.
pub fn load_config(workspace: &Path) -> crate::Result<(DockhandConfig, ConfigSource)> {
    let (path, source) = config_file(workspace)?;

    if !path.exists() {
        return Ok((DockhandConfig::default(), ConfigSource::Builtin));
    }

    let config = load_config_from_file(&path)?;
    log_status!("config", "Loaded {}", path.display());
    Ok((config, source))
}

fn load_config_from_file(path: &Path) -> crate::Result<DockhandConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: DockhandConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &DockhandConfig) -> crate::Result<()> {
    if config.default_environment.trim().is_empty() {
        return Err(crate::Error::config_invalid_value(
            "default_environment",
            None,
            "default_environment must not be empty",
        ));
    }
    if config.tool.program.trim().is_empty() {
        return Err(crate::Error::config_invalid_value(
            "tool.program",
            None,
            "tool.program must name an executable",
        ));
    }

    let scripts = &config.tool.scripts;
    for (key, value) in [
        ("tool.scripts.lint", &scripts.lint),
        ("tool.scripts.test", &scripts.test),
        ("tool.scripts.unit", &scripts.unit),
        ("tool.scripts.e2e", &scripts.e2e),
        ("tool.scripts.e2e_headless", &scripts.e2e_headless),
    ] {
        if value.trim().is_empty() {
            return Err(crate::Error::config_invalid_value(
                key,
                Some(value.clone()),
                format!("{} must name a package script", key),
            ));
        }
    }

    let unknown = template::unknown_placeholders(&config.container.name_template, &TemplateVars::ALL);
    if !unknown.is_empty() {
        return Err(crate::Error::config_invalid_value(
            "container.name_template",
            Some(config.container.name_template.clone()),
            format!("Unknown placeholder(s): {}", unknown.join(", ")),
        )
        .with_hint("Only {{application}} and {{environment}} are available"));
    }
    Ok(())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> DockhandConfig {
    DockhandConfig::default()
}
