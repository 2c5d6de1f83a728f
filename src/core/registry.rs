use std::collections::HashMap;

use crate::command::{Command, CommandSpec};
use crate::error::{Error, Result};
use crate::utils::suggest;

/// Closed set of commands addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Names and aliases share one namespace.
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<()> {
        let spec = command.spec();
        let slot = self.commands.len();

        let mut keys = vec![spec.name.clone()];
        keys.extend(spec.aliases.iter().cloned());

        for key in &keys {
            if let Some(&existing) = self.index.get(key) {
                return Err(Error::config_id_collision(
                    key.clone(),
                    self.commands[existing].spec().name.clone(),
                ));
            }
        }
        for key in keys {
            self.index.insert(key, slot);
        }

        self.commands.push(command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&dyn Command> {
        match self.index.get(name) {
            Some(&slot) => Ok(self.commands[slot].as_ref()),
            None => {
                let known: Vec<String> = self.index.keys().cloned().collect();
                Err(Error::unknown_command(
                    name,
                    suggest::suggestions(name, &known, 3),
                ))
            }
        }
    }

    pub fn canonical_name(&self, name: &str) -> Result<&str> {
        Ok(self.lookup(name)?.spec().name.as_str())
    }

    /// Specs in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter().map(|c| c.spec())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Input;
    use crate::dispatch::Context;

    struct Named(CommandSpec);

    impl Command for Named {
        fn spec(&self) -> &CommandSpec {
            &self.0
        }

        fn execute(&self, _: &Input, _: &Context<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn named(name: &str, aliases: &[&str]) -> Box<dyn Command> {
        let mut spec = CommandSpec::new(name, "test command");
        for alias in aliases {
            spec = spec.alias(alias);
        }
        Box::new(Named(spec))
    }

    #[test]
    fn lookup_by_alias_returns_canonical_command() {
        let mut registry = CommandRegistry::new();
        registry.register(named("node:npm", &["npm", "run-tool"])).unwrap();

        assert_eq!(registry.canonical_name("npm").unwrap(), "node:npm");
        assert_eq!(registry.canonical_name("run-tool").unwrap(), "node:npm");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn alias_collision_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(named("node:npm:lint", &["lint"])).unwrap();

        let err = registry.register(named("eslint", &["lint"])).err().unwrap();
        assert_eq!(err.code.as_str(), "config.id_collision");
        assert_eq!(err.details["existing"], "node:npm:lint");
        assert!(registry.lookup("eslint").is_err());
    }

    #[test]
    fn unknown_name_carries_suggestions() {
        let mut registry = CommandRegistry::new();
        registry.register(named("install", &[])).unwrap();

        let err = registry.lookup("instal").err().unwrap();
        assert_eq!(err.code.as_str(), "command.unknown");
        assert_eq!(err.details["suggestions"][0], "install");
    }
}
