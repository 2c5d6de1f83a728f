//! Host lifecycle commands.
//!
//! Their bodies only announce completion. The real work happens in the hooks
//! other command groups bind to them.

use crate::command::{ArgSpec, Command, CommandSpec, Input, OptionSpec};
use crate::dispatch::Context;
use crate::error::Result;
use crate::hooks::events;
use crate::registry::CommandRegistry;

pub struct HostCommand {
    spec: CommandSpec,
    done: &'static str,
}

impl Command for HostCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn execute(&self, _input: &Input, ctx: &Context<'_>) -> Result<()> {
        ctx.io.announce_line(self.done);
        Ok(())
    }
}

fn env_option() -> OptionSpec {
    OptionSpec::value("env", "The environment to operate on")
}

pub fn commands() -> Vec<HostCommand> {
    vec![
        HostCommand {
            spec: CommandSpec::new(events::INSTALL, "Add dependencies to the application")
                .argument(ArgSpec::variadic("dependencies", "Packages to install"))
                .option(OptionSpec::value(
                    "only",
                    "Save under a dependency category (dev, optional, peer, ...)",
                ))
                .option(env_option()),
            done: "Dependencies installed.",
        },
        HostCommand {
            spec: CommandSpec::new(events::UNINSTALL, "Remove dependencies from the application")
                .argument(ArgSpec::variadic("dependencies", "Packages to remove"))
                .option(env_option()),
            done: "Dependencies removed.",
        },
        HostCommand {
            spec: CommandSpec::new(events::UPDATE, "Update the application and its dependencies")
                .option(env_option()),
            done: "Update complete.",
        },
        HostCommand {
            spec: CommandSpec::new(events::TEST_ALL, "Run every test suite"),
            done: "Tests complete.",
        },
        HostCommand {
            spec: CommandSpec::new(events::TEST_UNIT, "Run unit tests"),
            done: "Unit tests complete.",
        },
        HostCommand {
            spec: CommandSpec::new(events::TEST_E2E, "Run end-to-end tests")
                .option(OptionSpec::flag("headless", "Run browsers without a display")),
            done: "End-to-end tests complete.",
        },
    ]
}

pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    for command in commands() {
        registry.register(Box::new(command))?;
    }
    Ok(())
}
