use std::path::PathBuf;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::eval::Outcome;

/// Directory holding `decisions.log`: `~/.local/share/kubectl-enhanced`.
pub fn log_dir() -> Option<PathBuf> {
    let dirs = directories::BaseDirs::new()?;
    Some(dirs.home_dir().join(".local/share/kubectl-enhanced"))
}

/// Route `log` records to ~/.local/share/kubectl-enhanced/decisions.log.
/// Best-effort: failures leave logging disabled (logging must never block kubectl).
pub fn init() {
    let level = match std::env::var_os("KCTL_DEBUG") {
        Some(v) if !v.is_empty() => LevelFilter::Debug,
        _ => LevelFilter::Info,
    };
    let Some(dir) = log_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("decisions.log"))
    else {
        return;
    };
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, config, file);
}

/// Record an evaluated invocation at info level.
pub fn log_decision(context: &str, args: &[String], outcome: &Outcome) {
    log::info!("{}", decision_record(context, args, outcome));
}

/// `decision<TAB>context<TAB>tier<TAB>command<TAB>reason`, single line.
pub fn decision_record(context: &str, args: &[String], outcome: &Outcome) -> String {
    let command: String = one_line(&args.join(" ")).chars().take(200).collect();
    format!(
        "{decision}\t{context}\t{tier}\t{command}\t{reason}",
        decision = outcome.decision.as_str(),
        context = one_line(context),
        tier = one_line(&outcome.rules.tier),
        reason = one_line(&outcome.decision.reason()),
    )
}

/// Escape line breaks and tabs so a field cannot split the record.
fn one_line(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
