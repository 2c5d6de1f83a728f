//! Command declarations and argument parsing.
//!
//! A [`CommandSpec`] describes what a command accepts. [`CommandSpec::parse`]
//! builds a `clap::Command` from it and turns a raw argument vector into an
//! [`Input`]:
//!
//! - Declared options are accepted as `--name=value`, `--name value` or `--flag`.
//! - A leading bare `--` ends option parsing and is consumed.
//! - A raw trailing argument starts at the first token that is not a declared
//!   option; every later token (including `--` and hyphenated tokens) is kept
//!   verbatim.
//! - Commands without a raw trailing argument reject unknown options.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::dispatch::Context;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    /// Collects every remaining positional token. Options may still follow.
    Variadic,
    /// Verbatim tail, forwarded to another program.
    Raw,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgSpec {
    pub name: String,
    pub help: String,
    pub kind: ArgKind,
    pub required: bool,
}

impl ArgSpec {
    pub fn variadic(name: &str, help: &str) -> Self {
        Self::new(name, help, ArgKind::Variadic, true)
    }

    pub fn raw(name: &str, help: &str) -> Self {
        Self::new(name, help, ArgKind::Raw, false)
    }

    fn new(name: &str, help: &str, kind: ArgKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind,
            required,
        }
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name.clone())
            .help(self.help.clone())
            .action(ArgAction::Append)
            .num_args(1..);
        match self.kind {
            ArgKind::Variadic => arg,
            ArgKind::Raw => arg.trailing_var_arg(true).allow_hyphen_values(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Flag,
    Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionSpec {
    pub name: String,
    pub help: String,
    pub kind: OptionKind,
}

impl OptionSpec {
    pub fn flag(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind: OptionKind::Flag,
        }
    }

    pub fn value(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind: OptionKind::Value,
        }
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(self.help.clone());
        match self.kind {
            OptionKind::Flag => arg.action(ArgAction::SetTrue),
            OptionKind::Value => arg.action(ArgAction::Set).value_name(self.name.clone()),
        }
    }
}

/// Declared interface of a registered command. Immutable once registered.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub about: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
}

impl CommandSpec {
    pub fn new(name: &str, about: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            about: about.to_string(),
            arguments: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// At most one positional per command; a raw tail must be the last.
    pub fn argument(mut self, arg: ArgSpec) -> Self {
        self.arguments.push(arg);
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// One-line usage, e.g. `install <dependencies>... [--only=<only>] [--env=<env>]`.
    pub fn usage(&self) -> String {
        let mut parts = vec![self.name.clone()];
        for arg in &self.arguments {
            let body = format!("<{}>...", arg.name);
            parts.push(if arg.required { body } else { format!("[{}]", body) });
        }
        for opt in &self.options {
            parts.push(match opt.kind {
                OptionKind::Flag => format!("[--{}]", opt.name),
                OptionKind::Value => format!("[--{}=<{}>]", opt.name, opt.name),
            });
        }
        parts.join(" ")
    }

    /// Parser for this command's arguments. No binary name, help or version flags.
    pub fn clap_command(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name.clone())
            .about(self.about.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true);
        for opt in &self.options {
            cmd = cmd.arg(opt.to_arg());
        }
        for arg in &self.arguments {
            cmd = cmd.arg(arg.to_arg());
        }
        cmd
    }

    pub fn parse(&self, args: &[String]) -> Result<Input> {
        let matches = self
            .clap_command()
            .try_get_matches_from(args.iter())
            .map_err(|e| self.input_error(e))?;

        let mut input = Input::default();
        for opt in &self.options {
            match opt.kind {
                OptionKind::Flag => {
                    if matches.get_flag(&opt.name) {
                        input.flags.insert(opt.name.clone());
                    }
                }
                OptionKind::Value => {
                    if let Some(value) = matches.get_one::<String>(&opt.name) {
                        input.options.insert(opt.name.clone(), value.clone());
                    }
                }
            }
        }

        let mut missing = Vec::new();
        for arg in &self.arguments {
            let values: Vec<String> = matches
                .get_many::<String>(&arg.name)
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            if values.is_empty() && arg.required {
                missing.push(arg.name.clone());
            }
            input.arguments.insert(arg.name.clone(), values);
        }

        if !missing.is_empty() {
            return Err(Error::validation_missing_argument(missing));
        }
        Ok(input)
    }

    fn input_error(&self, err: clap::Error) -> Error {
        let field = match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(arg)) => arg.clone(),
            _ => "arguments".to_string(),
        };
        let rendered = err.render().to_string();
        let problem = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        let tried = (err.kind() == ErrorKind::UnknownArgument)
            .then(|| self.options.iter().map(|o| format!("--{}", o.name)).collect());

        Error::validation_invalid_argument(
            field,
            format!("{} ('{}')", problem, self.name),
            Some(self.name.clone()),
            tried,
        )
    }
}

/// Parsed arguments and options for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    arguments: HashMap<String, Vec<String>>,
    options: HashMap<String, String>,
    flags: HashSet<String>,
}

impl Input {
    pub fn arguments(&self, name: &str) -> &[String] {
        self.arguments.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Option value, present only when the caller supplied it.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

/// A registered, user-invokable command.
pub trait Command {
    fn spec(&self) -> &CommandSpec;

    fn execute(&self, input: &Input, ctx: &Context<'_>) -> Result<()>;
}
