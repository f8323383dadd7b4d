//! kubectl-enhanced: a kubectl wrapper that blocks or confirms risky actions per cluster.
//!
//! Each invocation is classified into an [`action::Action`], the active kube
//! context is resolved to a rule set (explicit cluster entries first, then
//! tier patterns, then global defaults), and the policy yields one of three
//! decisions: [`eval::Decision::Allowed`], [`eval::Decision::Blocked`], or
//! [`eval::Decision::ConfirmationRequired`].
//!
//! # Architecture
//!
//! - **[`action`]**: kubectl argument classification.
//! - **[`config`]**: policy file types, loading, and context resolution.
//! - **[`eval`]**: block/confirm policy and the [`eval::Gate`] tying it together.
//! - **[`kubectl`]**: current-context lookup and command passthrough.
//! - **[`output`]**: banners and confirmation prompts.
//! - **[`init`]**: `kctl init` config generation.
//! - **[`logging`]**: decision log at `~/.local/share/kubectl-enhanced/decisions.log`.

/// kubectl argument classification.
pub mod action;
/// Policy file types, loading, and context resolution.
pub mod config;
/// Error types.
pub mod error;
/// Policy evaluation.
pub mod eval;
/// Config file generation.
pub mod init;
/// The wrapped kubectl binary.
pub mod kubectl;
/// File-based decision logging.
pub mod logging;
/// Terminal output.
pub mod output;

use eval::{Gate, Invocation, Outcome};

/// Evaluate kubectl arguments against the built-in default config.
///
/// `--yes`/`-y` in `args` skip confirmation, as on the command line.
/// The binary loads the user's config and builds a [`Gate`] directly.
pub fn evaluate(context: &str, args: &[&str]) -> Outcome {
    let gate = Gate::from_config(config::Config::default_config());
    gate.evaluate(context, &Invocation::from_args(args.iter().copied()))
}
