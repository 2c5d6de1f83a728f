use serde::Serialize;

use dockhand::dispatch::Dispatcher;
use dockhand::hooks::HookSummary;

use super::CmdResult;

#[derive(Debug, Serialize)]
pub struct HooksOutput {
    pub command: String,
    pub hooks: Vec<HookSummary>,
}

pub fn run(dispatcher: &Dispatcher) -> CmdResult<HooksOutput> {
    let hooks = dispatcher
        .hooks()
        .bindings()
        .iter()
        .map(|binding| binding.summary())
        .collect();

    Ok((
        HooksOutput {
            command: "hooks".to_string(),
            hooks,
        },
        0,
    ))
}
