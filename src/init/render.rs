//! Commented YAML output for `kctl init`.

use std::fmt::Write as _;

use crate::config::Config;

/// Render `config` as a commented YAML document that loads back unchanged.
pub fn render_yaml(config: &Config) -> String {
    let mut out = String::new();
    out.push_str("# kubectl-enhanced configuration\n");
    out.push_str("# Generated by 'kctl init'\n");
    out.push_str("#\n");
    out.push_str("# Controls which kubectl actions are blocked or need confirmation,\n");
    out.push_str("# per cluster context or per tier of clusters.\n\n");

    out.push_str("# Applied to contexts that match no cluster entry and no tier\n");
    out.push_str("defaults:\n");
    let _ = writeln!(out, "  require_confirmation: {}", config.defaults.require_confirmation);
    write_list(&mut out, 1, "blocked_actions", &config.defaults.blocked_actions);

    out.push_str("\n# Explicit cluster rules (highest priority)\n");
    out.push_str("# Keys are exact context names or glob patterns; the first match wins\n");
    out.push_str("clusters:\n");
    if config.clusters.is_empty() {
        out.push_str("  # Example:\n");
        out.push_str("  # \"my-prod-cluster\":\n");
        out.push_str("  #   tier: \"production\"\n");
        out.push_str("  #   require_confirmation: [delete, drain]\n");
        out.push_str("  #   blocked_actions: []\n");
    }
    for (name, rules) in config.clusters.iter() {
        let _ = writeln!(out, "  {}:", quote(name));
        let _ = writeln!(out, "    tier: {}", quote(&rules.tier));
        write_list(&mut out, 2, "require_confirmation", &rules.require_confirmation);
        write_list(&mut out, 2, "blocked_actions", &rules.blocked_actions);
    }

    out.push_str("\n# Tier rules, checked in the order listed when no cluster entry matches\n");
    out.push_str("tiers:\n");
    for (name, tier) in config.tiers.iter() {
        let _ = writeln!(out, "  {}:", quote(name));
        write_list(&mut out, 2, "patterns", &tier.patterns);
        write_list(&mut out, 2, "require_confirmation", &tier.require_confirmation);
        write_list(&mut out, 2, "blocked_actions", &tier.blocked_actions);
        out.push('\n');
    }
    out
}

fn write_list(out: &mut String, depth: usize, key: &str, values: &[String]) {
    let indent = "  ".repeat(depth);
    if values.is_empty() {
        let _ = writeln!(out, "{indent}{key}: []");
        return;
    }
    let _ = writeln!(out, "{indent}{key}:");
    for value in values {
        let _ = writeln!(out, "{indent}  - {}", quote(value));
    }
}

/// Double-quoted YAML scalar. Patterns start with `*`, which is YAML alias syntax.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
