//! In-process command dispatch with lifecycle hooks.
//!
//! `invoke` resolves a name or alias, parses the argument vector against the
//! command's spec, then runs pre-hooks, the body and post-hooks. Everything is
//! synchronous and depth-first: a chained command finishes before the hook
//! that started it continues, and the first failure unwinds the whole chain.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::path::Path;

use crate::command::{Command, Input};
use crate::console::IoContext;
use crate::defaults::DockhandConfig;
use crate::error::{Error, Result};
use crate::hooks::{ChainedInvocation, HookBinding, HookTable, Timing};
use crate::process::{ProcessRunner, RunResult};
use crate::registry::CommandRegistry;
use crate::runner::{self, RunRequest};
use crate::target::{self, ContainerRuntime, ExecutionTarget};
use crate::utils::shell;

/// Chains deeper than this are assumed to be cyclic.
pub const MAX_CHAIN_DEPTH: usize = 16;

pub struct Dispatcher {
    registry: CommandRegistry,
    hooks: HookTable,
}

impl Dispatcher {
    /// Hook keys are rewritten to canonical command names; binding an unknown name fails.
    pub fn new(registry: CommandRegistry, hooks: HookTable) -> Result<Self> {
        let mut canonical = HookTable::new();
        for HookBinding {
            command,
            timing,
            handlers,
        } in hooks.into_bindings()
        {
            let name = registry.canonical_name(&command)?.to_string();
            for handler in handlers {
                canonical.on(&name, timing, handler);
            }
        }

        Ok(Self {
            registry,
            hooks: canonical,
        })
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub fn invoke(&self, name: &str, args: &[String], ctx: &Context<'_>) -> Result<()> {
        let command = self.registry.lookup(name)?;
        let spec = command.spec();
        let input = spec.parse(args)?;

        let depth = ctx.depth.get();
        if depth >= MAX_CHAIN_DEPTH {
            return Err(Error::internal_unexpected(format!(
                "Command chain exceeded {} levels at '{}'",
                MAX_CHAIN_DEPTH, spec.name
            ))
            .with_hint("Check hook bindings for a cycle"));
        }

        ctx.trail.borrow_mut().push(TrailEntry {
            command: spec.name.clone(),
            args: args.to_vec(),
            depth,
        });
        log_status!(
            "dispatch",
            "{}{} {}",
            "  ".repeat(depth),
            spec.name,
            shell::quote_args(args)
        );

        ctx.depth.set(depth + 1);
        let outcome = self.run_lifecycle(command, &input, ctx);
        ctx.depth.set(depth);
        outcome
    }

    fn run_lifecycle(&self, command: &dyn Command, input: &Input, ctx: &Context<'_>) -> Result<()> {
        let name = &command.spec().name;

        for handler in self.hooks.handlers(name, Timing::Pre) {
            handler.handle(input, ctx)?;
        }

        command.execute(input, ctx)?;

        for handler in self.hooks.handlers(name, Timing::Post) {
            handler.handle(input, ctx)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailEntry {
    pub command: String,
    pub args: Vec<String>,
    pub depth: usize,
}

/// What one top-level invocation ran, in start order.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationReport {
    pub command: String,
    pub trail: Vec<TrailEntry>,
}

/// Collaborators shared by every command in one chain.
pub struct Context<'a> {
    pub io: &'a IoContext,
    pub config: &'a DockhandConfig,
    pub process: &'a dyn ProcessRunner,
    pub runtime: &'a dyn ContainerRuntime,
    pub workspace: &'a Path,
    dispatcher: &'a Dispatcher,
    depth: Cell<usize>,
    trail: RefCell<Vec<TrailEntry>>,
}

impl<'a> Context<'a> {
    pub fn new(
        dispatcher: &'a Dispatcher,
        io: &'a IoContext,
        config: &'a DockhandConfig,
        process: &'a dyn ProcessRunner,
        runtime: &'a dyn ContainerRuntime,
        workspace: &'a Path,
    ) -> Self {
        Self {
            io,
            config,
            process,
            runtime,
            workspace,
            dispatcher,
            depth: Cell::new(0),
            trail: RefCell::new(Vec::new()),
        }
    }

    /// Run a top-level command and report everything it chained.
    pub fn execute(&self, name: &str, args: &[String]) -> Result<InvocationReport> {
        self.dispatcher.invoke(name, args, self)?;
        Ok(InvocationReport {
            command: self.dispatcher.registry().canonical_name(name)?.to_string(),
            trail: self.trail(),
        })
    }

    /// Run another registered command as if the user had invoked it.
    pub fn invoke(&self, invocation: &ChainedInvocation) -> Result<()> {
        self.dispatcher
            .invoke(&invocation.command, &invocation.args, self)
    }

    /// `--env` if given, else the configured default.
    pub fn environment(&self, input: &Input) -> String {
        input
            .option("env")
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_environment.clone())
    }

    pub fn resolve_target(&self, environment: &str) -> Result<ExecutionTarget> {
        target::resolve(self.runtime, environment, self.io)
    }

    pub fn run_checked(&self, request: &RunRequest) -> Result<RunResult> {
        runner::run_checked(self.process, request, self.io)
    }

    pub fn trail(&self) -> Vec<TrailEntry> {
        self.trail.borrow().clone()
    }
}
