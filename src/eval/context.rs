use std::ffi::{OsStr, OsString};

/// Flags consumed by the wrapper itself; never passed to kubectl.
const SKIP_CONFIRMATION_FLAGS: &[&str] = &["--yes", "-y"];

fn is_skip_confirmation_flag(arg: &OsStr) -> bool {
    SKIP_CONFIRMATION_FLAGS.iter().any(|flag| arg == *flag)
}

/// Raw arguments for kubectl with wrapper flags removed, bytes untouched.
pub fn passthrough_args(raw: &[OsString]) -> Vec<OsString> {
    raw.iter()
        .filter(|arg| !is_skip_confirmation_flag(arg))
        .cloned()
        .collect()
}

/// A wrapper invocation: kubectl arguments plus wrapper-only switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Arguments for kubectl, with wrapper flags removed.
    pub args: Vec<String>,
    /// `--yes` / `-y` was given anywhere on the command line.
    pub skip_confirmation: bool,
}

impl Invocation {
    /// Split raw arguments into kubectl arguments and wrapper flags.
    pub fn from_args<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Vec::new();
        let mut skip_confirmation = false;
        for arg in raw {
            let arg = arg.into();
            if SKIP_CONFIRMATION_FLAGS.contains(&arg.as_str()) {
                skip_confirmation = true;
            } else {
                args.push(arg);
            }
        }
        Self {
            args,
            skip_confirmation,
        }
    }

    /// Namespace given with `-n` / `--namespace`, in either spaced or `=` form.
    pub fn namespace(&self) -> Option<&str> {
        let mut iter = self.args.iter();
        while let Some(arg) = iter.next() {
            if arg == "-n" || arg == "--namespace" {
                return iter.next().map(String::as_str);
            }
            if let Some(ns) = arg
                .strip_prefix("-n=")
                .or_else(|| arg.strip_prefix("--namespace="))
            {
                return Some(ns);
            }
        }
        None
    }
}
