use dockhand::console::IoContext;
use dockhand::defaults;
use dockhand::dispatch::{Context, Dispatcher, InvocationReport};
use dockhand::docker::{ContainerNaming, DockerCli};
use dockhand::paths;
use dockhand::process::SystemProcess;

use super::{CmdResult, GlobalArgs};

/// Run one registered command with live docker and process adapters.
pub fn run(
    name: &str,
    args: &[String],
    global: &GlobalArgs,
    dispatcher: &Dispatcher,
) -> CmdResult<InvocationReport> {
    let workspace = paths::workspace(global.workspace.as_deref())?;
    let (config, _source) = defaults::load_config(&workspace)?;

    let io = IoContext::terminal(global.quiet);
    let runtime = DockerCli::new(ContainerNaming::from_config(&config.container, &workspace));
    let process = SystemProcess::new(&workspace);

    crate::tty::status(&format!("dockhand {}...", name));

    let ctx = Context::new(dispatcher, &io, &config, &process, &runtime, &workspace);
    let report = ctx.execute(name, args)?;
    Ok((report, 0))
}
