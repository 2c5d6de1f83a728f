//! Shell quoting, used to show argument vectors the way a user would type them.

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Embedded single quotes are escaped
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", escape_single_quote_content(arg))
}

/// Quote and join an argument vector.
pub fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_package_names_stay_bare() {
        assert_eq!(quote_arg("left-pad"), "left-pad");
        assert_eq!(quote_arg("--save-dev"), "--save-dev");
        assert_eq!(quote_arg("@scope/pkg"), "@scope/pkg");
    }

    #[test]
    fn version_ranges_are_quoted() {
        assert_eq!(quote_arg("react@>=18 <19"), "'react@>=18 <19'");
    }

    #[test]
    fn embedded_single_quote() {
        assert_eq!(quote_arg("it's"), "'it'\\''s'");
    }

    #[test]
    fn empty_arg() {
        assert_eq!(quote_arg(""), "''");
    }

    #[test]
    fn quote_args_joins_with_spaces() {
        let args = vec!["npm".to_string(), "install".to_string(), "a b".to_string()];
        assert_eq!(quote_args(&args), "npm install 'a b'");
    }
}
