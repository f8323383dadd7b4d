//! Interactive `init` wizard.
//!
//! The wizard is a queue of [`Step`]s. Each step becomes a [`Prompt`], the
//! [`Prompter`] turns the user's reply into an [`Answer`], and applying the
//! answer may queue follow-up steps. One loop in [`Wizard::run`] drives it,
//! so the whole flow can be exercised with an in-memory reader.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::config::{ClusterRules, Config, TierRules};
use crate::error::InitError;
use crate::output::Renderer;

use super::{Options, parse_list};

/// Actions offered in multi-select prompts, numbered from 1.
pub const ACTION_CHOICES: &[&str] = &["delete", "drain", "scale", "edit", "apply", "exec", "rollout"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Production,
    Staging,
    Development,
}

impl TierKind {
    pub const ALL: [TierKind; 3] = [TierKind::Production, TierKind::Staging, TierKind::Development];

    pub fn name(self) -> &'static str {
        match self {
            TierKind::Production => "production",
            TierKind::Staging => "staging",
            TierKind::Development => "development",
        }
    }

    /// Confirmation set a cluster gets when assigned to this tier by name.
    fn default_actions(tier: &str) -> Vec<String> {
        match tier {
            "production" => vec!["delete".into(), "drain".into()],
            "staging" => vec!["delete".into()],
            _ => Vec::new(),
        }
    }
}

/// One question in the wizard flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ConfigureClusters,
    ClusterTier(usize),
    CustomizeClusterActions(usize),
    SelectClusterActions(usize),
    IncludeTier(TierKind),
    ModifyPatterns(TierKind),
    EnterPatterns(TierKind),
    ModifyActions(TierKind),
    SelectTierActions(TierKind),
    RequireConfirmation,
    BlockActions,
    SelectBlocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    YesNo { question: String, default: bool },
    Text { question: String, default: String },
    Select { question: String, selected: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Bool(bool),
    Text(String),
    Actions(Vec<String>),
}

/// Line-oriented terminal I/O for prompts.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    renderer: Renderer,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, renderer: Renderer) -> Self {
        Self {
            input,
            output,
            renderer,
        }
    }

    pub fn renderer(&self) -> Renderer {
        self.renderer
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Next line, trimmed. End of input reads as an empty answer.
    fn read_line(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    pub fn ask(&mut self, prompt: &Prompt) -> io::Result<Answer> {
        match prompt {
            Prompt::YesNo { question, default } => {
                let hint = if *default { "Y/n" } else { "y/N" };
                write!(self.output, "{question} [{hint}]: ")?;
                let reply = self.read_line()?.to_lowercase();
                let yes = if reply.is_empty() {
                    *default
                } else {
                    reply == "y" || reply == "yes"
                };
                Ok(Answer::Bool(yes))
            }
            Prompt::Text { question, default } => {
                if default.is_empty() {
                    write!(self.output, "{question}: ")?;
                } else {
                    write!(self.output, "{question} [{default}]: ")?;
                }
                let reply = self.read_line()?;
                Ok(Answer::Text(if reply.is_empty() { default.clone() } else { reply }))
            }
            Prompt::Select { question, selected } => {
                writeln!(self.output, "{question}:")?;
                for (i, action) in ACTION_CHOICES.iter().enumerate() {
                    let marker = if selected.iter().any(|s| s == action) { "[x]" } else { "[ ]" };
                    writeln!(self.output, "  {}. {marker} {action}", i + 1)?;
                }
                write!(
                    self.output,
                    "Enter numbers (comma-separated) or 'none' [{}]: ",
                    selection_numbers(selected)
                )?;
                let reply = self.read_line()?;
                Ok(Answer::Actions(parse_selection(&reply, selected)))
            }
        }
    }
}

/// `"1,2"` for `[delete, drain]`; `"none"` when nothing is selected.
fn selection_numbers(selected: &[String]) -> String {
    let numbers: Vec<String> = selected
        .iter()
        .filter_map(|s| ACTION_CHOICES.iter().position(|a| a == s))
        .map(|i| (i + 1).to_string())
        .collect();
    if numbers.is_empty() {
        "none".into()
    } else {
        numbers.join(",")
    }
}

/// Parse a multi-select reply. Empty keeps `current`; out-of-range numbers are ignored.
pub fn parse_selection(reply: &str, current: &[String]) -> Vec<String> {
    let reply = reply.trim();
    if reply.is_empty() {
        return current.to_vec();
    }
    if reply.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    let mut selected: Vec<String> = Vec::new();
    for part in reply.split(',') {
        let Ok(n) = part.trim().parse::<usize>() else {
            continue;
        };
        if let Some(action) = n.checked_sub(1).and_then(|i| ACTION_CHOICES.get(i)) {
            if !selected.iter().any(|s| s == action) {
                selected.push(action.to_string());
            }
        }
    }
    selected
}

/// State of an interactive `init` session.
pub struct Wizard {
    contexts: Vec<String>,
    pending: VecDeque<Step>,
    tier_defaults: Vec<(TierKind, TierRules)>,
    config: Config,
}

impl Wizard {
    pub fn new(opts: &Options, contexts: Vec<String>) -> Self {
        let mut pending = VecDeque::new();
        if !contexts.is_empty() {
            pending.push_back(Step::ConfigureClusters);
        }
        pending.extend(TierKind::ALL.map(Step::IncludeTier));
        pending.push_back(Step::RequireConfirmation);
        pending.push_back(Step::BlockActions);

        let tier_defaults = vec![
            (TierKind::Production, tier_rules(&opts.prod_patterns, &opts.prod_actions)),
            (TierKind::Staging, tier_rules(&opts.staging_patterns, &opts.staging_actions)),
            (TierKind::Development, tier_rules(&opts.dev_patterns, &[])),
        ];

        Self {
            contexts,
            pending,
            tier_defaults,
            config: Config::default(),
        }
    }

    pub fn next_step(&mut self) -> Option<Step> {
        self.pending.pop_front()
    }

    /// Queue `steps` to run next, in the given order.
    fn then(&mut self, steps: &[Step]) {
        for step in steps.iter().rev() {
            self.pending.push_front(*step);
        }
    }

    fn context(&self, index: usize) -> &str {
        self.contexts.get(index).map(String::as_str).unwrap_or_default()
    }

    fn tier(&self, kind: TierKind) -> Option<&TierRules> {
        self.config.tiers.get(kind.name())
    }

    fn tier_mut(&mut self, kind: TierKind) -> Option<&mut TierRules> {
        self.config.tiers.get_mut(kind.name())
    }

    /// The question to ask for `step`, reflecting answers so far.
    pub fn prompt(&self, step: Step) -> Prompt {
        let yes_no = |question: String, default: bool| Prompt::YesNo { question, default };
        match step {
            Step::ConfigureClusters => yes_no(
                "Would you like to configure rules for specific clusters?".into(),
                true,
            ),
            Step::ClusterTier(i) => Prompt::Text {
                question: format!(
                    "Tier for cluster '{}' (production/staging/development/skip)",
                    self.context(i)
                ),
                default: "skip".into(),
            },
            Step::CustomizeClusterActions(i) => {
                yes_no(format!("  Customize actions for {}?", self.context(i)), false)
            }
            Step::SelectClusterActions(i) => Prompt::Select {
                question: "  Select actions requiring confirmation".into(),
                selected: self
                    .config
                    .clusters
                    .get(self.context(i))
                    .map(|c| c.require_confirmation.clone())
                    .unwrap_or_default(),
            },
            Step::IncludeTier(kind) => yes_no(format!("Configure {} tier patterns?", kind.name()), true),
            Step::ModifyPatterns(kind) => yes_no(
                format!(
                    "  Modify {} patterns (currently {})?",
                    kind.name(),
                    display_list(self.tier(kind).map(|t| t.patterns.as_slice()).unwrap_or_default())
                ),
                false,
            ),
            Step::EnterPatterns(kind) => Prompt::Text {
                question: format!("  Enter {} patterns (comma-separated)", kind.name()),
                default: self.tier(kind).map(|t| t.patterns.join(",")).unwrap_or_default(),
            },
            Step::ModifyActions(kind) => yes_no(
                format!(
                    "  Modify actions requiring confirmation (currently {})?",
                    display_list(
                        self.tier(kind)
                            .map(|t| t.require_confirmation.as_slice())
                            .unwrap_or_default()
                    )
                ),
                false,
            ),
            Step::SelectTierActions(kind) => Prompt::Select {
                question: "  Select actions requiring confirmation".into(),
                selected: self
                    .tier(kind)
                    .map(|t| t.require_confirmation.clone())
                    .unwrap_or_default(),
            },
            Step::RequireConfirmation => yes_no(
                "Require confirmation for delete/drain on clusters matching no rule?".into(),
                false,
            ),
            Step::BlockActions => yes_no("Would you like to block any actions globally?".into(), false),
            Step::SelectBlocked => Prompt::Select {
                question: "Select actions to block globally".into(),
                selected: self.config.defaults.blocked_actions.clone(),
            },
        }
    }

    /// Record `answer` for `step` and queue any follow-up questions.
    pub fn apply(&mut self, step: Step, answer: Answer) {
        match (step, answer) {
            (Step::ConfigureClusters, Answer::Bool(true)) => {
                let steps: Vec<Step> = (0..self.contexts.len()).map(Step::ClusterTier).collect();
                self.then(&steps);
            }
            (Step::ClusterTier(i), Answer::Text(tier)) => {
                let tier = tier.trim();
                if tier.is_empty() || tier == "skip" {
                    return;
                }
                let name = self.context(i).to_string();
                self.config.clusters.insert(
                    name,
                    ClusterRules {
                        tier: tier.to_string(),
                        require_confirmation: TierKind::default_actions(tier),
                        blocked_actions: Vec::new(),
                    },
                );
                self.then(&[Step::CustomizeClusterActions(i)]);
            }
            (Step::CustomizeClusterActions(i), Answer::Bool(true)) => {
                self.then(&[Step::SelectClusterActions(i)]);
            }
            (Step::SelectClusterActions(i), Answer::Actions(actions)) => {
                let name = self.context(i).to_string();
                if let Some(cluster) = self.config.clusters.get_mut(&name) {
                    cluster.require_confirmation = actions;
                }
            }
            (Step::IncludeTier(kind), Answer::Bool(true)) => {
                let defaults = self
                    .tier_defaults
                    .iter()
                    .find(|(k, _)| *k == kind)
                    .map(|(_, rules)| rules.clone())
                    .unwrap_or_default();
                self.config.tiers.insert(kind.name(), defaults);
                self.then(&[Step::ModifyPatterns(kind), Step::ModifyActions(kind)]);
            }
            (Step::ModifyPatterns(kind), Answer::Bool(true)) => self.then(&[Step::EnterPatterns(kind)]),
            (Step::EnterPatterns(kind), Answer::Text(text)) => {
                if let Some(tier) = self.tier_mut(kind) {
                    tier.patterns = parse_list(&text);
                }
            }
            (Step::ModifyActions(kind), Answer::Bool(true)) => self.then(&[Step::SelectTierActions(kind)]),
            (Step::SelectTierActions(kind), Answer::Actions(actions)) => {
                if let Some(tier) = self.tier_mut(kind) {
                    tier.require_confirmation = actions;
                }
            }
            (Step::RequireConfirmation, Answer::Bool(yes)) => {
                self.config.defaults.require_confirmation = yes;
            }
            (Step::BlockActions, Answer::Bool(true)) => self.then(&[Step::SelectBlocked]),
            (Step::SelectBlocked, Answer::Actions(actions)) => {
                self.config.defaults.blocked_actions = actions;
            }
            _ => {}
        }
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Drive the wizard to completion.
    pub fn run<R: BufRead, W: Write>(mut self, prompter: &mut Prompter<R, W>) -> Result<Config, InitError> {
        let renderer = prompter.renderer();
        let out = prompter.output();
        renderer.info(out, "kubectl-enhanced configuration wizard")?;
        renderer.sublog(out, "Answers build a config file you can edit by hand later.")?;
        if !self.contexts.is_empty() {
            renderer.info(out, "Detected kubectl contexts:")?;
            for (i, ctx) in self.contexts.iter().enumerate() {
                writeln!(out, "  {}. {ctx}", i + 1)?;
            }
        }

        while let Some(step) = self.next_step() {
            let prompt = self.prompt(step);
            let answer = prompter.ask(&prompt)?;
            log::debug!("init wizard: {step:?} -> {answer:?}");
            self.apply(step, answer);
        }
        Ok(self.into_config())
    }
}

fn tier_rules(patterns: &[String], actions: &[String]) -> TierRules {
    TierRules {
        patterns: patterns.to_vec(),
        require_confirmation: actions.to_vec(),
        blocked_actions: Vec::new(),
    }
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".into()
    } else {
        items.join(", ")
    }
}
