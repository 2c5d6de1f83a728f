//! Lifecycle hook table.
//!
//! Command groups bind handlers to `(command, timing)` pairs at startup. The
//! dispatcher runs pre-hooks before a command's body and post-hooks after it,
//! each list in binding order. A handler usually chains further commands via
//! [`ChainedInvocation`], which run to completion before the handler returns.
//!
//! Event naming convention: `pre:<command>` / `post:<command>`
//! Examples: `pre:install`, `post:update`, `post:test:e2e`

use serde::Serialize;

use crate::command::Input;
use crate::dispatch::Context;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Pre,
    Post,
}

impl Timing {
    pub fn event(self, command: &str) -> String {
        match self {
            Timing::Pre => format!("pre:{}", command),
            Timing::Post => format!("post:{}", command),
        }
    }
}

/// Another registered command to run, with its full argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainedInvocation {
    pub command: String,
    pub args: Vec<String>,
}

impl ChainedInvocation {
    pub fn new<I, S>(command: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bare(command: &str) -> Self {
        Self {
            command: command.to_string(),
            args: Vec::new(),
        }
    }
}

pub trait HookHandler {
    /// Short text for the `hooks` listing.
    fn describe(&self) -> String;

    fn handle(&self, input: &Input, ctx: &Context<'_>) -> Result<()>;
}

/// Run chained invocations in order, stopping at the first failure.
pub fn run_chain(steps: &[ChainedInvocation], ctx: &Context<'_>) -> Result<()> {
    for step in steps {
        ctx.invoke(step)?;
    }
    Ok(())
}

/// Fixed list of invocations, independent of the triggering input.
pub struct ChainHook {
    pub steps: Vec<ChainedInvocation>,
}

impl HookHandler for ChainHook {
    fn describe(&self) -> String {
        self.steps
            .iter()
            .map(|s| {
                if s.args.is_empty() {
                    s.command.clone()
                } else {
                    format!("{} {}", s.command, s.args.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    fn handle(&self, _input: &Input, ctx: &Context<'_>) -> Result<()> {
        run_chain(&self.steps, ctx)
    }
}

pub struct HookBinding {
    pub command: String,
    pub timing: Timing,
    pub handlers: Vec<Box<dyn HookHandler>>,
}

/// Serializable view of one binding.
#[derive(Debug, Clone, Serialize)]
pub struct HookSummary {
    pub event: String,
    pub command: String,
    pub timing: Timing,
    pub handlers: Vec<String>,
}

impl HookBinding {
    pub fn summary(&self) -> HookSummary {
        HookSummary {
            event: self.timing.event(&self.command),
            command: self.command.clone(),
            timing: self.timing,
            handlers: self.handlers.iter().map(|h| h.describe()).collect(),
        }
    }
}

#[derive(Default)]
pub struct HookTable {
    bindings: Vec<HookBinding>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; handlers for the same pair run in the order they were bound.
    pub fn on(&mut self, command: &str, timing: Timing, handler: Box<dyn HookHandler>) {
        match self
            .bindings
            .iter_mut()
            .find(|b| b.command == command && b.timing == timing)
        {
            Some(binding) => binding.handlers.push(handler),
            None => self.bindings.push(HookBinding {
                command: command.to_string(),
                timing,
                handlers: vec![handler],
            }),
        }
    }

    pub fn handlers(&self, command: &str, timing: Timing) -> &[Box<dyn HookHandler>] {
        self.bindings
            .iter()
            .find(|b| b.command == command && b.timing == timing)
            .map(|b| b.handlers.as_slice())
            .unwrap_or(&[])
    }

    pub fn bindings(&self) -> &[HookBinding] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<HookBinding> {
        self.bindings
    }
}

/// Host lifecycle commands that hooks attach to.
pub mod events {
    pub const INSTALL: &str = "install";
    pub const UNINSTALL: &str = "uninstall";
    pub const UPDATE: &str = "update";
    pub const TEST_ALL: &str = "test:all";
    pub const TEST_UNIT: &str = "test:unit";
    pub const TEST_E2E: &str = "test:e2e";
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop(&'static str);

    impl HookHandler for Noop {
        fn describe(&self) -> String {
            self.0.to_string()
        }

        fn handle(&self, _: &Input, _: &Context<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn handlers_keep_binding_order_per_pair() {
        let mut table = HookTable::new();
        table.on(events::INSTALL, Timing::Pre, Box::new(Noop("first")));
        table.on(events::INSTALL, Timing::Post, Box::new(Noop("after")));
        table.on(events::INSTALL, Timing::Pre, Box::new(Noop("second")));

        let pre: Vec<String> = table
            .handlers(events::INSTALL, Timing::Pre)
            .iter()
            .map(|h| h.describe())
            .collect();
        assert_eq!(pre, vec!["first", "second"]);
        assert_eq!(table.handlers(events::INSTALL, Timing::Post).len(), 1);
        assert!(table.handlers(events::UPDATE, Timing::Pre).is_empty());
    }

    #[test]
    fn summary_names_event() {
        let mut table = HookTable::new();
        table.on(
            events::UPDATE,
            Timing::Post,
            Box::new(ChainHook {
                steps: vec![
                    ChainedInvocation::new("node:npm", ["update"]),
                    ChainedInvocation::bare("node:npm:write-lock"),
                ],
            }),
        );

        let summary = table.bindings()[0].summary();
        assert_eq!(summary.event, "post:update");
        assert_eq!(summary.handlers, vec!["node:npm update -> node:npm:write-lock"]);
    }
}
