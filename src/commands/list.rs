use serde::Serialize;

use dockhand::command::{ArgSpec, OptionSpec};
use dockhand::dispatch::Dispatcher;

use super::CmdResult;

#[derive(Debug, Serialize)]
pub struct CommandEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub about: String,
    pub usage: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub command: String,
    pub commands: Vec<CommandEntry>,
}

pub fn run(dispatcher: &Dispatcher) -> CmdResult<ListOutput> {
    let commands = dispatcher
        .registry()
        .specs()
        .map(|spec| CommandEntry {
            name: spec.name.clone(),
            aliases: spec.aliases.clone(),
            about: spec.about.clone(),
            usage: spec.usage(),
            arguments: spec.arguments.clone(),
            options: spec.options.clone(),
        })
        .collect();

    Ok((
        ListOutput {
            command: "list".to_string(),
            commands,
        },
        0,
    ))
}
