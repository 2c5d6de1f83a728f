//! npm inside the application's deployed container.
//!
//! Provides `node:npm` plus the two artifact sync commands, and binds the
//! dependency hooks that chain them from `install`, `uninstall` and `update`.

use crate::command::{ArgSpec, Command, CommandSpec, Input, OptionSpec};
use crate::defaults::DockhandConfig;
use crate::dispatch::Context;
use crate::error::{Error, Result};
use crate::hooks::{events, run_chain, ChainedInvocation, HookHandler, HookTable, Timing};
use crate::registry::CommandRegistry;
use crate::runner::RunRequest;
use crate::sync::{self, Artifact, SyncStep};

pub const NPM: &str = "node:npm";
pub const WRITE_PACKAGE: &str = "node:npm:write-package";
pub const WRITE_LOCK: &str = "node:npm:write-lock";

fn env_option() -> OptionSpec {
    OptionSpec::value("env", "The environment to run in (defaults to the configured environment)")
}

/// Command that performs a sync step.
pub fn sync_command(step: SyncStep) -> &'static str {
    match step {
        SyncStep::Manifest => WRITE_PACKAGE,
        SyncStep::Lockfile => WRITE_LOCK,
    }
}

pub struct NpmCommand {
    spec: CommandSpec,
}

impl NpmCommand {
    pub fn new() -> Self {
        Self {
            spec: CommandSpec::new(NPM, "Run npm inside the environment's container")
                .alias("npm")
                .alias("run-tool")
                .argument(ArgSpec::raw("args", "The command and arguments to pass to npm"))
                .option(env_option()),
        }
    }
}

impl Default for NpmCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for NpmCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn execute(&self, input: &Input, ctx: &Context<'_>) -> Result<()> {
        let env = ctx.environment(input);
        ctx.io.announce_section("NPM");

        let target = ctx.resolve_target(&env)?;
        let args = input.arguments("args");
        let program = &ctx.config.tool.program;

        let mut argv = vec![program.clone()];
        argv.extend(args.iter().cloned());

        let label = format!("[{}] Running '{} {}'...", env, program, args.join(" "));
        ctx.run_checked(&RunRequest::new(argv, target).label(label))?;
        Ok(())
    }
}

/// Copies one fixed artifact out of the container into `build/`.
pub struct SyncCommand {
    spec: CommandSpec,
    artifact: &'static Artifact,
}

impl SyncCommand {
    pub fn new(step: SyncStep) -> Self {
        let spec = match step {
            SyncStep::Manifest => CommandSpec::new(
                sync_command(step),
                "Write the application's package file back to the repository",
            )
            .alias("npm-write-package")
            .alias("sync-manifest"),
            SyncStep::Lockfile => CommandSpec::new(
                sync_command(step),
                "Write the application's package lockfile back to the repository",
            )
            .alias("npm-write-lock")
            .alias("sync-lockfile"),
        };

        Self {
            spec: spec.option(env_option()),
            artifact: step.artifact(),
        }
    }
}

impl Command for SyncCommand {
    fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn execute(&self, input: &Input, ctx: &Context<'_>) -> Result<()> {
        let env = ctx.environment(input);
        let target = ctx.resolve_target(&env)?;
        let handle = target.container().ok_or_else(|| {
            Error::internal_unexpected(format!("'{}' did not resolve to a container", env))
        })?;

        ctx.io.announce_section(self.artifact.title);
        sync::sync_back(
            ctx.runtime,
            handle,
            self.artifact.remote_path,
            &self.artifact.local_path_in(ctx.workspace),
            ctx.io,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyOperation {
    Install,
    Uninstall,
    Update,
}

impl DependencyOperation {
    fn verb(self) -> &'static str {
        match self {
            DependencyOperation::Install => "install",
            DependencyOperation::Uninstall => "uninstall",
            DependencyOperation::Update => "update",
        }
    }

    fn syncs(self, config: &DockhandConfig) -> &[SyncStep] {
        match self {
            DependencyOperation::Install => &config.hooks.install,
            DependencyOperation::Uninstall => &config.hooks.uninstall,
            DependencyOperation::Update => &config.hooks.update,
        }
    }
}

/// Runs npm for a dependency change, then the configured syncs.
pub struct DependencyHook {
    pub operation: DependencyOperation,
}

impl DependencyHook {
    /// Invocations for one triggering input, in execution order.
    ///
    /// `--env` is forwarded to every step only when the trigger received it.
    pub fn steps(&self, input: &Input, config: &DockhandConfig) -> Result<Vec<ChainedInvocation>> {
        let env_arg: Vec<String> = input
            .option("env")
            .map(|env| format!("--env={}", env))
            .into_iter()
            .collect();

        let mut npm_args = env_arg.clone();
        npm_args.push(self.operation.verb().to_string());

        if self.operation != DependencyOperation::Update {
            npm_args.extend(input.arguments("dependencies").iter().cloned());
        }

        if self.operation == DependencyOperation::Install {
            if let Some(only) = input.option("only") {
                if only.trim().is_empty() {
                    return Err(Error::validation_invalid_argument(
                        "only",
                        "Dependency category must not be empty",
                        None,
                        Some(vec!["dev".to_string(), "optional".to_string(), "peer".to_string()]),
                    ));
                }
                npm_args.push("--".to_string());
                npm_args.push(format!("--save-{}", only));
            }
        }

        let mut steps = vec![ChainedInvocation::new(NPM, npm_args)];
        for step in self.operation.syncs(config) {
            steps.push(ChainedInvocation::new(sync_command(*step), env_arg.clone()));
        }
        Ok(steps)
    }
}

impl HookHandler for DependencyHook {
    fn describe(&self) -> String {
        let deps = match self.operation {
            DependencyOperation::Update => "",
            _ => " <dependencies>...",
        };
        format!(
            "{} {}{}, then syncs from hooks.{}",
            NPM,
            self.operation.verb(),
            deps,
            self.operation.verb()
        )
    }

    fn handle(&self, input: &Input, ctx: &Context<'_>) -> Result<()> {
        let steps = self.steps(input, ctx.config)?;
        run_chain(&steps, ctx)
    }
}

pub fn register(registry: &mut CommandRegistry, hooks: &mut HookTable) -> Result<()> {
    registry.register(Box::new(NpmCommand::new()))?;
    registry.register(Box::new(SyncCommand::new(SyncStep::Manifest)))?;
    registry.register(Box::new(SyncCommand::new(SyncStep::Lockfile)))?;

    hooks.on(
        events::INSTALL,
        Timing::Pre,
        Box::new(DependencyHook {
            operation: DependencyOperation::Install,
        }),
    );
    hooks.on(
        events::UNINSTALL,
        Timing::Pre,
        Box::new(DependencyHook {
            operation: DependencyOperation::Uninstall,
        }),
    );
    hooks.on(
        events::UPDATE,
        Timing::Post,
        Box::new(DependencyHook {
            operation: DependencyOperation::Update,
        }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_input(args: &[&str]) -> Input {
        CommandSpec::new("install", "test")
            .argument(ArgSpec::variadic("dependencies", "deps"))
            .option(OptionSpec::value("only", "category"))
            .option(env_option())
            .parse(&args.iter().map(|s| s.to_string()).collect::<Vec<_>>())
            .unwrap()
    }

    fn hook(operation: DependencyOperation) -> DependencyHook {
        DependencyHook { operation }
    }

    #[test]
    fn install_chains_npm_then_both_syncs() {
        let steps = hook(DependencyOperation::Install)
            .steps(&install_input(&["left-pad"]), &DockhandConfig::default())
            .unwrap();

        assert_eq!(
            steps,
            vec![
                ChainedInvocation::new(NPM, ["install", "left-pad"]),
                ChainedInvocation::bare(WRITE_PACKAGE),
                ChainedInvocation::bare(WRITE_LOCK),
            ]
        );
    }

    #[test]
    fn install_only_appends_save_flag() {
        let steps = hook(DependencyOperation::Install)
            .steps(&install_input(&["left-pad", "--only=dev"]), &DockhandConfig::default())
            .unwrap();
        assert_eq!(
            steps[0],
            ChainedInvocation::new(NPM, ["install", "left-pad", "--", "--save-dev"])
        );
    }

    #[test]
    fn explicit_env_is_forwarded_to_every_step() {
        let steps = hook(DependencyOperation::Uninstall)
            .steps(&install_input(&["--env=prod", "left-pad"]), &DockhandConfig::default())
            .unwrap();

        assert_eq!(
            steps,
            vec![
                ChainedInvocation::new(NPM, ["--env=prod", "uninstall", "left-pad"]),
                ChainedInvocation::new(WRITE_PACKAGE, ["--env=prod"]),
                ChainedInvocation::new(WRITE_LOCK, ["--env=prod"]),
            ]
        );
    }

    #[test]
    fn update_uses_configured_syncs() {
        let mut config = DockhandConfig::default();
        let input = install_input(&["ignored"]);

        let steps = hook(DependencyOperation::Update).steps(&input, &config).unwrap();
        assert_eq!(
            steps,
            vec![
                ChainedInvocation::new(NPM, ["update"]),
                ChainedInvocation::bare(WRITE_LOCK),
            ]
        );

        config.hooks.update = vec![SyncStep::Manifest, SyncStep::Lockfile];
        let steps = hook(DependencyOperation::Update).steps(&input, &config).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1], ChainedInvocation::bare(WRITE_PACKAGE));
    }

    #[test]
    fn empty_category_is_rejected() {
        let err = hook(DependencyOperation::Install)
            .steps(&install_input(&["left-pad", "--only="]), &DockhandConfig::default())
            .unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn sync_commands_copy_their_step_artifact() {
        let manifest = SyncCommand::new(SyncStep::Manifest);
        assert_eq!(manifest.spec().name, WRITE_PACKAGE);
        assert_eq!(manifest.artifact.remote_path, "/app/html/package.json");

        let lockfile = SyncCommand::new(SyncStep::Lockfile);
        assert_eq!(lockfile.spec().aliases, ["npm-write-lock", "sync-lockfile"]);
        assert_eq!(lockfile.artifact.title, "Copying Lockfile");
    }
}
