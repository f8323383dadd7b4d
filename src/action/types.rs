//! Action tags produced by the classifier and consumed by the policy layer.

use std::fmt;

/// Canonical classification of what a kubectl invocation intends to do.
///
/// The named variants are the verbs policy rules can talk about. Any other
/// verb (`get`, `describe`, `logs`, ...) is carried through verbatim as
/// [`Action::Other`] so rules can still match it by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Delete,
    Drain,
    /// `cordon` and `uncordon`.
    Cordon,
    Scale,
    Edit,
    Patch,
    Apply,
    Create,
    Exec,
    Rollout,
    /// No command verb was found (empty or flag-only arguments).
    Unknown,
    /// A verb outside the destructive set, kept as typed.
    Other(String),
}

impl Action {
    /// Map a kubectl verb to its destructive action tag, if it is one.
    pub fn from_verb(verb: &str) -> Option<Self> {
        let action = match verb {
            "delete" => Action::Delete,
            "drain" => Action::Drain,
            "cordon" | "uncordon" => Action::Cordon,
            "scale" => Action::Scale,
            "edit" => Action::Edit,
            "patch" => Action::Patch,
            "apply" => Action::Apply,
            "create" => Action::Create,
            "exec" => Action::Exec,
            "rollout" => Action::Rollout,
            _ => return None,
        };
        Some(action)
    }

    /// The tag as it appears in config files and log lines.
    pub fn as_str(&self) -> &str {
        match self {
            Action::Delete => "delete",
            Action::Drain => "drain",
            Action::Cordon => "cordon",
            Action::Scale => "scale",
            Action::Edit => "edit",
            Action::Patch => "patch",
            Action::Apply => "apply",
            Action::Create => "create",
            Action::Exec => "exec",
            Action::Rollout => "rollout",
            Action::Unknown => "unknown",
            Action::Other(verb) => verb,
        }
    }

    /// Coarse severity used when rendering prompts.
    pub fn severity(&self) -> Severity {
        match self {
            Action::Delete | Action::Drain => Severity::High,
            Action::Scale | Action::Cordon => Severity::Medium,
            Action::Edit | Action::Patch | Action::Rollout => Severity::Medium,
            Action::Apply | Action::Create => Severity::Low,
            _ => Severity::None,
        }
    }

    /// Human-readable label, e.g. "Drain node (evict all pods)".
    pub fn description(&self) -> &str {
        match self {
            Action::Delete => "Delete resources",
            Action::Drain => "Drain node (evict all pods)",
            Action::Cordon => "Cordon/uncordon node",
            Action::Scale => "Scale deployment replicas",
            Action::Edit => "Edit resource configuration",
            Action::Patch => "Patch resource",
            Action::Apply => "Apply configuration",
            Action::Create => "Create resource",
            Action::Exec => "Execute command in pod",
            Action::Rollout => "Manage rollout",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncordon_maps_to_cordon() {
        assert_eq!(Action::from_verb("uncordon"), Some(Action::Cordon));
    }

    #[test]
    fn read_only_verbs_are_not_destructive() {
        assert_eq!(Action::from_verb("get"), None);
        assert_eq!(Action::from_verb("describe"), None);
    }

    #[test]
    fn verb_lookup_is_case_sensitive() {
        assert_eq!(Action::from_verb("DELETE"), None);
    }

    #[test]
    fn passthrough_keeps_verb() {
        assert_eq!(Action::Other("port-forward".into()).as_str(), "port-forward");
        assert_eq!(Action::Other("logs".into()).to_string(), "logs");
    }

    #[test]
    fn severity_levels() {
        assert_eq!(Action::Delete.severity(), Severity::High);
        assert_eq!(Action::Drain.severity(), Severity::High);
        assert_eq!(Action::Cordon.severity(), Severity::Medium);
        assert_eq!(Action::Scale.severity(), Severity::Medium);
        assert_eq!(Action::Patch.severity(), Severity::Medium);
        assert_eq!(Action::Rollout.severity(), Severity::Medium);
        assert_eq!(Action::Apply.severity(), Severity::Low);
        assert_eq!(Action::Create.severity(), Severity::Low);
        assert_eq!(Action::Exec.severity(), Severity::None);
        assert_eq!(Action::Unknown.severity(), Severity::None);
        assert_eq!(Action::Other("get".into()).severity(), Severity::None);
    }

    #[test]
    fn descriptions() {
        assert_eq!(Action::Drain.description(), "Drain node (evict all pods)");
        assert_eq!(Action::Exec.description(), "Execute command in pod");
        assert_eq!(Action::Other("logs".into()).description(), "logs");
        assert_eq!(Action::Unknown.description(), "unknown");
    }
}
