//! Single-pass action detection over a raw kubectl argument vector.

use super::Action;

/// Global and common subcommand flags whose value is the following token.
///
/// The scanner has no per-subcommand grammar: a value-taking flag missing
/// from this list makes its value look like the command verb.
const FLAGS_WITH_VALUES: &[&str] = &[
    "-n",
    "--namespace",
    "-l",
    "--selector",
    "-o",
    "--output",
    "-f",
    "--filename",
    "--context",
    "--kubeconfig",
    "--cluster",
    "--user",
    "-c",
    "--container",
    "--field-selector",
    "--sort-by",
    "--template",
    "-p",
    "--patch",
    "--type",
    "--replicas",
    "--timeout",
    "--grace-period",
];

/// Whether `flag` consumes the next argument as its value.
pub fn takes_value(flag: &str) -> bool {
    FLAGS_WITH_VALUES.contains(&flag)
}

/// Classify a kubectl invocation by its first non-flag argument.
///
/// `["-n", "default", "delete", "pod", "x"]` → [`Action::Delete`];
/// `["get", "pods"]` → `Action::Other("get")`; flag-only → [`Action::Unknown`].
pub fn classify<S: AsRef<str>>(args: &[S]) -> Action {
    let mut skip_next = false;
    for arg in args {
        let arg = arg.as_ref();
        if skip_next {
            skip_next = false;
            continue;
        }
        // --flag=value carries its own value
        if arg.starts_with("--") && arg.contains('=') {
            continue;
        }
        if arg.starts_with('-') {
            skip_next = takes_value(arg);
            continue;
        }
        return Action::from_verb(arg).unwrap_or_else(|| Action::Other(arg.to_string()));
    }
    Action::Unknown
}
