pub mod context;
pub mod decision;
pub mod policy;

pub use context::{Invocation, passthrough_args};
pub use decision::{Decision, Outcome};
pub use policy::{Verdict, decide, is_blocked, requires_confirmation, rule_covers};

use crate::action;
use crate::config::Config;

/// Classify, resolve, and decide for one invocation against a loaded config.
pub struct Gate {
    config: Config,
}

impl Gate {
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate `invocation` on the cluster named by `context`.
    pub fn evaluate(&self, context: &str, invocation: &Invocation) -> Outcome {
        let action = action::classify(invocation.args.as_slice());
        let rules = self.config.resolve(context);
        let decision = decide(&action, &rules, invocation.skip_confirmation);
        log::debug!(
            "{context}: action={action} tier={} source={} -> {}",
            rules.tier,
            rules.source,
            decision.as_str()
        );
        Outcome {
            action,
            rules,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    fn gate() -> Gate {
        Gate::from_config(Config::default_config())
    }

    #[test]
    fn production_delete_needs_confirmation() {
        let outcome = gate().evaluate("prod-us-east-1", &Invocation::from_args(["delete", "pod", "foo"]));
        assert_eq!(outcome.action, Action::Delete);
        assert_eq!(outcome.rules.tier, "production");
        assert!(matches!(
            outcome.decision,
            Decision::ConfirmationRequired { ref tier, .. } if tier == "production"
        ));
    }

    #[test]
    fn yes_flag_allows() {
        let outcome = gate().evaluate("prod-us-east-1", &Invocation::from_args(["delete", "pod", "foo", "--yes"]));
        assert_eq!(outcome.decision, Decision::Allowed);
    }

    #[test]
    fn config_blocks_even_with_yes() {
        let mut config = Config::default_config();
        config.defaults.blocked_actions = vec!["exec".into()];
        let gate = Gate::from_config(config);
        let outcome = gate.evaluate("unknown-ctx", &Invocation::from_args(["exec", "-it", "pod", "--", "sh", "-y"]));
        assert!(matches!(outcome.decision, Decision::Blocked { .. }));
    }
}
