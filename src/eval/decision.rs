use crate::action::Action;
use crate::config::ResolvedRules;

/// What should happen to a kubectl invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Blocked { reason: String },
    ConfirmationRequired { description: String, tier: String },
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "allow",
            Decision::Blocked { .. } => "block",
            Decision::ConfirmationRequired { .. } => "confirm",
        }
    }

    /// One-line explanation for logs.
    pub fn reason(&self) -> String {
        match self {
            Decision::Allowed => "allowed".into(),
            Decision::Blocked { reason } => reason.clone(),
            Decision::ConfirmationRequired { description, tier } => {
                format!("{description} requires confirmation on tier '{tier}'")
            }
        }
    }
}

/// Everything the evaluation produced, for rendering and logging.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub action: Action,
    pub rules: ResolvedRules,
    pub decision: Decision,
}
