//! Rule-token matching against classified actions.

use crate::action::Action;
use crate::config::ResolvedRules;

use super::Decision;

/// Whether a single rule token covers `action`.
///
/// Case-insensitive. Some tokens stand for a family of verbs:
/// `drain` covers `cordon`, `edit` covers `patch`, `apply` covers `create`.
pub fn rule_covers(rule: &str, action: &str) -> bool {
    let rule = rule.to_lowercase();
    let action = action.to_lowercase();
    if rule == action {
        return true;
    }
    matches!(
        (rule.as_str(), action.as_str()),
        ("drain", "cordon") | ("edit", "patch") | ("apply", "create")
    )
}

fn any_covers<'a>(rules: impl IntoIterator<Item = &'a String>, action: &Action) -> bool {
    rules.into_iter().any(|rule| rule_covers(rule, action.as_str()))
}

pub fn is_blocked(action: &Action, rules: &ResolvedRules) -> bool {
    any_covers(&rules.blocked_actions, action)
}

pub fn requires_confirmation(action: &Action, rules: &ResolvedRules) -> bool {
    any_covers(&rules.require_confirmation, action)
}

/// The two independent policy predicates for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub is_blocked: bool,
    pub needs_confirmation: bool,
}

impl Verdict {
    pub fn of(action: &Action, rules: &ResolvedRules) -> Self {
        Self {
            is_blocked: is_blocked(action, rules),
            needs_confirmation: requires_confirmation(action, rules),
        }
    }
}

/// Combine the predicates into a decision.
///
/// A block always wins; `skip_confirmation` only lifts the confirmation step.
pub fn decide(action: &Action, rules: &ResolvedRules, skip_confirmation: bool) -> Decision {
    let verdict = Verdict::of(action, rules);
    if verdict.is_blocked {
        return Decision::Blocked {
            reason: format!(
                "action '{action}' is configured as blocked for tier '{}' ({})",
                rules.tier, rules.source
            ),
        };
    }
    if verdict.needs_confirmation && !skip_confirmation {
        return Decision::ConfirmationRequired {
            description: action.description().to_string(),
            tier: rules.tier.clone(),
        };
    }
    Decision::Allowed
}
