//! Startup wiring: every command group registers its commands and hooks here.

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::hooks::HookTable;
use crate::registry::CommandRegistry;
use crate::{lifecycle, npm, npm_local};

pub fn build_dispatcher() -> Result<Dispatcher> {
    let mut registry = CommandRegistry::new();
    let mut hooks = HookTable::new();

    lifecycle::register(&mut registry)?;
    npm::register(&mut registry, &mut hooks)?;
    npm_local::register(&mut registry, &mut hooks)?;

    Dispatcher::new(registry, hooks)
}
