//! Resolve a context name to the single rule set that governs it.
//!
//! Order, first match wins, no merging:
//! 1. a `clusters` key equal to the context name
//! 2. the first `clusters` key (document order) whose glob matches
//! 3. the first tier (document order) with a pattern (list order) that matches
//! 4. the global `defaults`

use std::collections::BTreeSet;
use std::fmt;

use glob::Pattern;

use super::Config;

/// Tier name reported when nothing in `clusters` or `tiers` matched.
pub const DEFAULT_TIER: &str = "default";

/// Actions confirmed on unmatched clusters when `defaults.require_confirmation` is set.
const DEFAULT_CONFIRMATION: &[&str] = &["delete", "drain"];

/// Which part of the config produced a [`ResolvedRules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// `clusters` key equal to the context name.
    Cluster(String),
    /// `clusters` key used as a glob.
    ClusterPattern(String),
    /// A pattern listed under a tier.
    TierPattern(String),
    /// Global defaults.
    Defaults,
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Cluster(name) => write!(f, "cluster entry '{name}'"),
            RuleSource::ClusterPattern(pattern) => write!(f, "cluster pattern '{pattern}'"),
            RuleSource::TierPattern(pattern) => write!(f, "tier pattern '{pattern}'"),
            RuleSource::Defaults => f.write_str("global defaults"),
        }
    }
}

/// The concrete policy for one context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRules {
    pub tier: String,
    pub require_confirmation: BTreeSet<String>,
    pub blocked_actions: BTreeSet<String>,
    pub source: RuleSource,
}

impl ResolvedRules {
    pub fn new<C, B>(tier: impl Into<String>, require_confirmation: C, blocked_actions: B, source: RuleSource) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            tier: tier.into(),
            require_confirmation: require_confirmation.into_iter().map(Into::into).collect(),
            blocked_actions: blocked_actions.into_iter().map(Into::into).collect(),
            source,
        }
    }
}

impl Config {
    /// Resolve the rules that apply to `context`.
    pub fn resolve(&self, context: &str) -> ResolvedRules {
        if let Some(rules) = self.clusters.get(context) {
            log::debug!("context {context}: exact cluster entry");
            return ResolvedRules::new(
                rules.tier.as_str(),
                rules.require_confirmation.iter().cloned(),
                rules.blocked_actions.iter().cloned(),
                RuleSource::Cluster(context.to_string()),
            );
        }

        for (pattern, rules) in self.clusters.iter() {
            if glob_matches(pattern, context) {
                log::debug!("context {context}: cluster pattern {pattern}");
                return ResolvedRules::new(
                    rules.tier.as_str(),
                    rules.require_confirmation.iter().cloned(),
                    rules.blocked_actions.iter().cloned(),
                    RuleSource::ClusterPattern(pattern.to_string()),
                );
            }
        }

        for (tier, rules) in self.tiers.iter() {
            if let Some(pattern) = rules.patterns.iter().find(|p| glob_matches(p, context)) {
                log::debug!("context {context}: tier {tier} via {pattern}");
                return ResolvedRules::new(
                    tier,
                    rules.require_confirmation.iter().cloned(),
                    rules.blocked_actions.iter().cloned(),
                    RuleSource::TierPattern(pattern.clone()),
                );
            }
        }

        log::debug!("context {context}: no match, using defaults");
        let confirm: &[&str] = if self.defaults.require_confirmation {
            DEFAULT_CONFIRMATION
        } else {
            &[]
        };
        ResolvedRules::new(
            DEFAULT_TIER,
            confirm.iter().copied(),
            self.defaults.blocked_actions.iter().cloned(),
            RuleSource::Defaults,
        )
    }
}

/// Case-sensitive shell-glob match of a whole context name.
///
/// `*` also crosses `/` so ARN-style names match suffix patterns, and a run
/// of stars (`**-prod`) means the same as one.
/// A pattern the glob parser rejects is compared literally.
pub fn glob_matches(pattern: &str, name: &str) -> bool {
    match Pattern::new(&collapse_stars(pattern)) {
        Ok(compiled) => compiled.matches(name),
        Err(e) => {
            log::debug!("invalid glob {pattern:?} ({e}), comparing literally");
            pattern == name
        }
    }
}

/// `glob` only accepts `**` as a whole path component; context names have none.
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}
