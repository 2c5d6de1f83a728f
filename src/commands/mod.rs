use clap::Args;
use std::process::ExitCode;

use dockhand::dispatch::Dispatcher;

pub type CmdResult<T> = dockhand::Result<(T, i32)>;

#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    /// Workspace root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<String>,

    /// Suppress section titles and progress lines
    #[arg(long, short)]
    pub quiet: bool,
}

pub mod config;
pub mod hooks;
pub mod list;
pub mod run;

/// Run a built-in subcommand and print its envelope.
macro_rules! dispatch {
    ($module:ident, $($arg:expr),*) => {
        crate::output::emit($module::run($($arg),*))
    };
}

pub(crate) fn run_builtin(
    command: crate::Commands,
    global: &GlobalArgs,
    dispatcher: &Dispatcher,
) -> ExitCode {
    match command {
        crate::Commands::List => dispatch!(list, dispatcher),
        crate::Commands::Hooks => dispatch!(hooks, dispatcher),
        crate::Commands::Config(args) => dispatch!(config, args, global),
    }
}
