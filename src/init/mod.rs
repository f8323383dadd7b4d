//! `kctl init`: write a starter config file, from flags or an interactive wizard.

pub mod render;
pub mod wizard;

pub use render::render_yaml;
pub use wizard::{Prompter, Step, Wizard};

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{self, Config, TierRules};
use crate::error::InitError;

/// Inputs to `init`. `Default` reproduces the shipped tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub non_interactive: bool,
    pub force: bool,
    /// Target file; `~` is expanded. `None` means the standard config path.
    pub output: Option<String>,
    pub prod_patterns: Vec<String>,
    pub staging_patterns: Vec<String>,
    pub dev_patterns: Vec<String>,
    pub prod_actions: Vec<String>,
    pub staging_actions: Vec<String>,
    pub blocked_actions: Vec<String>,
}

pub const DEFAULT_PROD_PATTERNS: &str = "*-prod,*-production,prod-*,production-*";
pub const DEFAULT_STAGING_PATTERNS: &str = "*-staging,*-stg,staging-*,stg-*";
pub const DEFAULT_DEV_PATTERNS: &str =
    "*-dev,*-development,dev-*,development-*,local*,minikube,docker-desktop,kind-*";
pub const DEFAULT_PROD_ACTIONS: &str = "delete,drain";
pub const DEFAULT_STAGING_ACTIONS: &str = "delete";

impl Default for Options {
    fn default() -> Self {
        Self {
            non_interactive: false,
            force: false,
            output: None,
            prod_patterns: parse_list(DEFAULT_PROD_PATTERNS),
            staging_patterns: parse_list(DEFAULT_STAGING_PATTERNS),
            dev_patterns: parse_list(DEFAULT_DEV_PATTERNS),
            prod_actions: parse_list(DEFAULT_PROD_ACTIONS),
            staging_actions: parse_list(DEFAULT_STAGING_ACTIONS),
            blocked_actions: Vec::new(),
        }
    }
}

/// Split a comma-separated list, trimming items and dropping blanks.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Config for non-interactive mode. Tiers with no patterns are left out.
pub fn build_config(opts: &Options) -> Config {
    let mut config = Config::default();
    config.defaults.blocked_actions = opts.blocked_actions.clone();
    let tiers = [
        ("production", &opts.prod_patterns, opts.prod_actions.as_slice()),
        ("staging", &opts.staging_patterns, opts.staging_actions.as_slice()),
        ("development", &opts.dev_patterns, &[][..]),
    ];
    for (name, patterns, actions) in tiers {
        if patterns.is_empty() {
            continue;
        }
        config.tiers.insert(
            name,
            TierRules {
                patterns: patterns.clone(),
                require_confirmation: actions.to_vec(),
                blocked_actions: Vec::new(),
            },
        );
    }
    config
}

/// Where `init` writes: the expanded `--output`, else the standard config path.
pub fn target_path(opts: &Options) -> Result<PathBuf, InitError> {
    match &opts.output {
        Some(output) => Ok(PathBuf::from(shellexpand::tilde(output).as_ref())),
        None => config::config_path().ok_or(InitError::NoConfigPath),
    }
}

/// Write `config` as commented YAML, creating parent directories.
pub fn write_config(config: &Config, path: &Path) -> Result<(), InitError> {
    let write_err = |source| InitError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, render_yaml(config)).map_err(write_err)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Written(PathBuf),
    Cancelled,
}

/// Run `init`. `contexts` seeds the wizard's per-cluster questions.
pub fn run<R: BufRead, W: Write>(
    opts: &Options,
    contexts: Vec<String>,
    prompter: &mut Prompter<R, W>,
) -> Result<InitOutcome, InitError> {
    let path = target_path(opts)?;
    let renderer = prompter.renderer();

    if path.exists() && !opts.force {
        if opts.non_interactive {
            return Err(InitError::AlreadyExists(path));
        }
        renderer.warning(
            prompter.output(),
            &format!("Config file already exists: {}", path.display()),
        )?;
        let overwrite = prompter.ask(&wizard::Prompt::YesNo {
            question: "Do you want to overwrite it?".into(),
            default: false,
        })?;
        if overwrite != wizard::Answer::Bool(true) {
            renderer.sublog(prompter.output(), "Initialization cancelled")?;
            return Ok(InitOutcome::Cancelled);
        }
    }

    let config = if opts.non_interactive {
        build_config(opts)
    } else {
        Wizard::new(opts, contexts).run(prompter)?
    };

    write_config(&config, &path)?;
    log::info!("init: wrote {}", path.display());
    renderer.success(prompter.output(), &format!("Configuration written to {}", path.display()))?;
    Ok(InitOutcome::Written(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Renderer;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<String>, Vec<u8>> {
        Prompter::new(Cursor::new(input.to_string()), Vec::new(), Renderer::new(false))
    }

    fn options_for(path: &Path) -> Options {
        Options {
            non_interactive: true,
            output: Some(path.display().to_string()),
            ..Options::default()
        }
    }

    #[test]
    fn list_parsing() {
        assert_eq!(parse_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn default_options_build_shipped_tiers() {
        let config = build_config(&Options::default());
        assert_eq!(config, Config::default_config());
    }

    #[test]
    fn empty_patterns_drop_tier() {
        let opts = Options {
            staging_patterns: Vec::new(),
            blocked_actions: vec!["exec".into()],
            ..Options::default()
        };
        let config = build_config(&opts);
        let tiers: Vec<&str> = config.tiers.keys().collect();
        assert_eq!(tiers, vec!["production", "development"]);
        assert_eq!(config.defaults.blocked_actions, vec!["exec"]);
    }

    #[test]
    fn non_interactive_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/config.yaml");
        let outcome = run(&options_for(&path), Vec::new(), &mut prompter("")).unwrap();
        assert_eq!(outcome, InitOutcome::Written(path.clone()));
        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded, build_config(&Options::default()));
    }

    #[test]
    fn existing_file_without_force_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "keep me").unwrap();
        let err = run(&options_for(&path), Vec::new(), &mut prompter("")).unwrap_err();
        assert!(matches!(err, InitError::AlreadyExists(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "old").unwrap();
        let opts = Options {
            force: true,
            ..options_for(&path)
        };
        run(&opts, Vec::new(), &mut prompter("")).unwrap();
        assert!(Config::load_from_path(&path).unwrap().is_some());
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn interactive_overwrite_declined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "keep me").unwrap();
        let opts = Options {
            non_interactive: false,
            ..options_for(&path)
        };
        let mut p = prompter("\n");
        let outcome = run(&opts, Vec::new(), &mut p).unwrap();
        assert_eq!(outcome, InitOutcome::Cancelled);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
        let text = String::from_utf8(p.output().clone()).unwrap();
        assert!(text.contains("Initialization cancelled"));
    }

    #[test]
    fn interactive_overwrite_accepted_runs_wizard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "old").unwrap();
        let opts = Options {
            non_interactive: false,
            ..options_for(&path)
        };
        // overwrite: yes, then Enter through every wizard question
        let outcome = run(&opts, Vec::new(), &mut prompter("y\n")).unwrap();
        assert_eq!(outcome, InitOutcome::Written(path.clone()));
        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded.tiers, Config::default_config().tiers);
    }

    #[test]
    fn tilde_output_expands() {
        let opts = Options {
            output: Some("~/kctl.yaml".into()),
            ..Options::default()
        };
        let path = target_path(&opts).unwrap();
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("kctl.yaml"));
    }
}
