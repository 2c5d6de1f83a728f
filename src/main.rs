use clap::{Arg, ArgMatches, Command, CommandFactory, FromArgMatches, Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{config, run};
use dockhand::command::CommandSpec;
use dockhand::dispatch::Dispatcher;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(version = VERSION)]
#[command(about = "Run node tooling inside deployed application containers")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered commands with their aliases and usage
    List,
    /// Show lifecycle hook bindings in execution order
    Hooks,
    /// Inspect dockhand configuration
    Config(config::ConfigArgs),
}

struct RegisteredInvocation {
    name: String,
    args: Vec<String>,
}

/// Adds one subcommand per registered command. Everything after the name is
/// handed to the dispatcher untouched.
fn build_augmented_command<'a>(specs: impl Iterator<Item = &'a CommandSpec>) -> Command {
    let mut cmd = Cli::command();

    for spec in specs {
        cmd = cmd.subcommand(
            Command::new(spec.name.clone())
                .about(spec.about.clone())
                .visible_aliases(spec.aliases.clone())
                .override_usage(format!("dockhand {}", spec.usage()))
                .arg(
                    Arg::new("args")
                        .help("Arguments and options for the command")
                        .num_args(0..)
                        .allow_hyphen_values(true)
                        .trailing_var_arg(true),
                ),
        );
    }

    cmd
}

fn try_parse_registered_command(
    matches: &ArgMatches,
    dispatcher: &Dispatcher,
) -> Option<RegisteredInvocation> {
    let (name, sub_matches) = matches.subcommand()?;
    dispatcher.registry().lookup(name).ok()?;

    let args: Vec<String> = sub_matches
        .get_many::<String>("args")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();

    Some(RegisteredInvocation {
        name: name.to_string(),
        args,
    })
}

fn main() -> std::process::ExitCode {
    let dispatcher = match dockhand::app::build_dispatcher() {
        Ok(dispatcher) => dispatcher,
        Err(err) => return output::emit::<()>(Err(err)),
    };

    let cmd = build_augmented_command(dispatcher.registry().specs());
    let matches = cmd.get_matches();

    let global = match GlobalArgs::from_arg_matches(&matches) {
        Ok(global) => global,
        Err(e) => e.exit(),
    };

    if let Some(invocation) = try_parse_registered_command(&matches, &dispatcher) {
        return output::emit(run::run(
            &invocation.name,
            &invocation.args,
            &global,
            &dispatcher,
        ));
    }

    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    commands::run_builtin(cli.command, &cli.global, &dispatcher)
}
