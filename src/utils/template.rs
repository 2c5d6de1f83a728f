//! `{{name}}` placeholder templates for container names.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

pub struct TemplateVars;

impl TemplateVars {
    pub const APPLICATION: &'static str = "application";
    pub const ENVIRONMENT: &'static str = "environment";

    pub const ALL: [&'static str; 2] = [Self::APPLICATION, Self::ENVIRONMENT];
}

/// Substitute every known placeholder. Unknown ones are left in place.
pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            variables
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Placeholder names used by `template` that are not in `known`, in order of appearance.
pub fn unknown_placeholders(template: &str, known: &[&str]) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|name| !known.contains(&name.as_str()))
        .collect()
}
