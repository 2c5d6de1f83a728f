use clap::{Args, Subcommand};
use serde::Serialize;

use dockhand::defaults::{self, ConfigSource, DockhandConfig};
use dockhand::paths;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display the effective configuration for the workspace
    Show {
        /// Show only built-in defaults (ignore config files)
        #[arg(long)]
        builtin: bool,
    },
    /// Show which config file applies to the workspace
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<DockhandConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<ConfigSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin } => show(builtin, global),
        ConfigCommand::Path => path(global),
    }
}

fn show(builtin: bool, global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let (config, source) = if builtin {
        (defaults::builtin_defaults(), ConfigSource::Builtin)
    } else {
        let workspace = paths::workspace(global.workspace.as_deref())?;
        defaults::load_config(&workspace)?
    };

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(config),
            source: Some(source),
            path: None,
            exists: None,
        },
        0,
    ))
}

fn path(global: &GlobalArgs) -> CmdResult<ConfigOutput> {
    let workspace = paths::workspace(global.workspace.as_deref())?;
    let (file, source) = defaults::config_file(&workspace)?;

    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            config: None,
            exists: Some(file.exists()),
            path: Some(file.display().to_string()),
            source: Some(source),
        },
        0,
    ))
}
