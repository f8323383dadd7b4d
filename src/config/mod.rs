//! Policy configuration: types, file location, loading, and built-in defaults.
//!
//! A config file has three sections:
//!
//! ```yaml
//! defaults:
//!   require_confirmation: false
//!   blocked_actions: []
//! clusters:            # exact context names or glob patterns, first match wins
//!   my-prod-cluster:
//!     tier: production
//!     require_confirmation: [delete, drain]
//! tiers:               # pattern-matched when no cluster entry applies
//!   production:
//!     patterns: ["*-prod", "prod-*"]
//!     require_confirmation: [delete, drain]
//! ```

/// Document-ordered keyed rule lists.
pub mod ordered;
/// Context → rule set resolution and glob matching.
pub mod resolve;

pub use ordered::OrderedRules;
pub use resolve::{DEFAULT_TIER, ResolvedRules, RuleSource, glob_matches};

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::output::Renderer;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../config.default.yaml");

/// Directory name under the user's config root.
pub const APP_DIR: &str = "kubectl-enhanced";
/// File name inside [`APP_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// The full policy document.
///
/// `Config::default()` is an empty document (everything resolves to the
/// global defaults); [`Config::default_config`] is the shipped policy with
/// production/staging/development tiers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_default")]
    pub defaults: Defaults,
    #[serde(default)]
    pub clusters: OrderedRules<ClusterRules>,
    #[serde(default)]
    pub tiers: OrderedRules<TierRules>,
}

/// Global fallback applied when no cluster or tier matches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    /// When true, unmatched clusters confirm `delete` and `drain`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub require_confirmation: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocked_actions: Vec<String>,
}

/// Rules for one context name or context-name glob.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ClusterRules {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub require_confirmation: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocked_actions: Vec<String>,
}

/// Rules shared by every context matching one of `patterns`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TierRules {
    #[serde(default, deserialize_with = "null_as_default")]
    pub patterns: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub require_confirmation: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocked_actions: Vec<String>,
}

/// Treat an explicit YAML `null` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Config {
    /// Load the embedded default configuration.
    pub fn default_config() -> Self {
        serde_yaml_ng::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Parse a YAML document. Blank input is an empty config.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml_ng::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content)
    }

    /// Load from `path`. `Ok(None)` when the file does not exist.
    pub fn load_from_path(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_yaml(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load `path`, or the built-in config when there is no path or no file.
    ///
    /// A file that cannot be read or parsed is reported on `err` and the
    /// built-in config is used instead.
    pub fn load_or_default(path: Option<&Path>, err: &mut impl Write, renderer: Renderer) -> io::Result<Self> {
        let loaded = match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(None),
        };
        match loaded {
            Ok(Some(config)) => Ok(config),
            Ok(None) => Ok(Self::default_config()),
            Err(e) => {
                log::warn!("{e}");
                renderer.warning(err, &e.to_string())?;
                renderer.sublog(err, "Using default configuration")?;
                Ok(Self::default_config())
            }
        }
    }
}

/// Location of the user config file.
///
/// `$XDG_CONFIG_HOME/kubectl-enhanced/config.yaml` when the variable is set,
/// otherwise `~/.config/kubectl-enhanced/config.yaml`.
pub fn config_path() -> Option<PathBuf> {
    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    config_path_from(std::env::var_os("XDG_CONFIG_HOME"), home)
}

/// [`config_path`] with the environment supplied by the caller.
pub fn config_path_from(xdg_config_home: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    let root = match xdg_config_home {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home?.join(".config"),
    };
    Some(root.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert!(config.clusters.is_empty());
        assert!(!config.defaults.require_confirmation);
        assert!(config.defaults.blocked_actions.is_empty());
        let tiers: Vec<&str> = config.tiers.keys().collect();
        assert_eq!(tiers, vec!["production", "staging", "development"]);
    }

    #[test]
    fn default_tier_patterns() {
        let config = Config::default_config();
        let prod = config.tiers.get("production").unwrap();
        assert_eq!(prod.patterns, strings(&["*-prod", "*-production", "prod-*", "production-*"]));
        assert_eq!(prod.require_confirmation, strings(&["delete", "drain"]));

        let staging = config.tiers.get("staging").unwrap();
        assert_eq!(staging.patterns, strings(&["*-staging", "*-stg", "staging-*", "stg-*"]));
        assert_eq!(staging.require_confirmation, strings(&["delete"]));

        let dev = config.tiers.get("development").unwrap();
        assert_eq!(
            dev.patterns,
            strings(&[
                "*-dev",
                "*-development",
                "dev-*",
                "development-*",
                "local*",
                "minikube",
                "docker-desktop",
                "kind-*",
            ])
        );
        assert!(dev.require_confirmation.is_empty());
        assert!(dev.blocked_actions.is_empty());
    }

    #[test]
    fn load_full_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
defaults:
  require_confirmation: true
  blocked_actions:
    - exec

clusters:
  my-prod-cluster:
    tier: production
    require_confirmation:
      - delete
      - drain
    blocked_actions: []

tiers:
  production:
    patterns:
      - "*-prod"
    require_confirmation:
      - delete
    blocked_actions: []
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        assert!(config.defaults.require_confirmation);
        assert_eq!(config.defaults.blocked_actions, strings(&["exec"]));
        assert_eq!(config.clusters.get("my-prod-cluster").unwrap().tier, "production");
        assert_eq!(config.tiers.get("production").unwrap().patterns, strings(&["*-prod"]));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from_path(&dir.path().join("nope.yaml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn invalid_yaml_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"invalid: yaml: content: [").unwrap();
        let err = Config::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn unreadable_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_path(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "{err}");
    }

    fn load_or_default(path: Option<&Path>) -> (Config, String) {
        let mut out = Vec::new();
        let config = Config::load_or_default(path, &mut out, Renderer::new(false)).unwrap();
        (config, String::from_utf8(out).unwrap())
    }

    #[test]
    fn fallback_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_or_default(Some(dir.path().join("config.yaml").as_path()));
        assert_eq!(config, Config::default_config());
        assert!(warnings.is_empty(), "{warnings}");

        let (config, warnings) = load_or_default(None);
        assert_eq!(config, Config::default_config());
        assert!(warnings.is_empty(), "{warnings}");
    }

    #[test]
    fn fallback_on_malformed_file_warns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"tiers: [unclosed").unwrap();
        let (config, warnings) = load_or_default(Some(file.path()));
        assert_eq!(config, Config::default_config());
        assert!(warnings.contains(&file.path().display().to_string()), "{warnings}");
        assert!(warnings.contains("Using default configuration"), "{warnings}");
    }

    #[test]
    fn fallback_on_unreadable_path_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_or_default(Some(dir.path()));
        assert_eq!(config, Config::default_config());
        assert!(warnings.contains("failed to read config file"), "{warnings}");
    }

    #[test]
    fn valid_file_returned_as_written() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"defaults:\n  blocked_actions: [exec]\n").unwrap();
        let (config, warnings) = load_or_default(Some(file.path()));
        assert!(warnings.is_empty(), "{warnings}");
        assert_eq!(config.defaults.blocked_actions, strings(&["exec"]));
        assert!(config.tiers.is_empty());
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        let err = Config::from_yaml("tiers:\n  production:\n    patterns: 42\n");
        assert!(err.is_err());
    }

    #[test]
    fn empty_file_is_empty_config() {
        let config = Config::from_yaml("  \n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn null_sections_are_empty() {
        let config = Config::from_yaml(
            "defaults:\n  require_confirmation: true\n  blocked_actions:\nclusters:\n  # none yet\ntiers:\n",
        )
        .unwrap();
        assert!(config.defaults.require_confirmation);
        assert!(config.defaults.blocked_actions.is_empty());
        assert!(config.clusters.is_empty());
        assert!(config.tiers.is_empty());
    }

    #[test]
    fn unknown_keys_ignored() {
        let config = Config::from_yaml("version: 2\ndefaults:\n  require_confirmation: true\n").unwrap();
        assert!(config.defaults.require_confirmation);
    }

    #[test]
    fn path_prefers_xdg() {
        let path = config_path_from(Some("/custom/config".into()), Some("/home/me".into()));
        assert_eq!(path, Some(PathBuf::from("/custom/config/kubectl-enhanced/config.yaml")));
    }

    #[test]
    fn path_falls_back_to_home() {
        let expected = Some(PathBuf::from("/home/me/.config/kubectl-enhanced/config.yaml"));
        assert_eq!(config_path_from(None, Some("/home/me".into())), expected);
        assert_eq!(config_path_from(Some("".into()), Some("/home/me".into())), expected);
    }

    #[test]
    fn path_without_home() {
        assert_eq!(config_path_from(None, None), None);
    }
}
