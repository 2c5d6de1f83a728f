//! npm scripts run on the host, outside any container.

use crate::command::{Command, CommandSpec, Input};
use crate::defaults::DockhandConfig;
use crate::dispatch::Context;
use crate::error::Result;
use crate::hooks::{events, HookHandler, HookTable, Timing};
use crate::registry::CommandRegistry;
use crate::runner::RunRequest;
use crate::target::ExecutionTarget;

pub const LINT: &str = "node:npm:lint";

fn run_script(ctx: &Context<'_>, script: &str, label: &str) -> Result<()> {
    let argv = vec![
        ctx.config.tool.program.clone(),
        "run".to_string(),
        script.to_string(),
    ];
    ctx.run_checked(&RunRequest::new(argv, ExecutionTarget::LocalHost).label(label))?;
    Ok(())
}

pub struct LintCommand {
    spec: CommandSpec,
}

impl LintCommand {
    pub fn new() -> Self {
        Self {
            spec: CommandSpec::new(LINT, "Lint this application's source code")
                .alias("npm-lint")
                .alias("lint"),
        }
    }
}

impl Default for LintCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for LintCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn execute(&self, _input: &Input, ctx: &Context<'_>) -> Result<()> {
        run_script(ctx, &ctx.config.tool.scripts.lint, "Linting source code")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestSuite {
    All,
    Unit,
    EndToEnd,
}

/// Runs the npm test script matching the triggering test command.
pub struct ScriptHook {
    pub suite: TestSuite,
}

impl ScriptHook {
    /// Script name and announcement for this suite.
    pub fn script_for<'c>(&self, input: &Input, config: &'c DockhandConfig) -> (&'c str, &'static str) {
        let scripts = &config.tool.scripts;
        match self.suite {
            TestSuite::All => (scripts.test.as_str(), "Running tests"),
            TestSuite::Unit => (scripts.unit.as_str(), "Running unit tests"),
            TestSuite::EndToEnd if input.flag("headless") => {
                (scripts.e2e_headless.as_str(), "Running end-to-end tests")
            }
            TestSuite::EndToEnd => (scripts.e2e.as_str(), "Running end-to-end tests"),
        }
    }
}

impl HookHandler for ScriptHook {
    fn describe(&self) -> String {
        match self.suite {
            TestSuite::All => "npm run <tool.scripts.test>".to_string(),
            TestSuite::Unit => "npm run <tool.scripts.unit>".to_string(),
            TestSuite::EndToEnd => {
                "npm run <tool.scripts.e2e> (or e2e_headless with --headless)".to_string()
            }
        }
    }

    fn handle(&self, input: &Input, ctx: &Context<'_>) -> Result<()> {
        let (script, label) = self.script_for(input, ctx.config);
        run_script(ctx, script, label)
    }
}

pub fn register(registry: &mut CommandRegistry, hooks: &mut HookTable) -> Result<()> {
    registry.register(Box::new(LintCommand::new()))?;

    for (event, suite) in [
        (events::TEST_ALL, TestSuite::All),
        (events::TEST_UNIT, TestSuite::Unit),
        (events::TEST_E2E, TestSuite::EndToEnd),
    ] {
        hooks.on(event, Timing::Post, Box::new(ScriptHook { suite }));
    }
    Ok(())
}
