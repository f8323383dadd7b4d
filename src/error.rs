use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the config file. A missing file is not an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// The active kube context could not be determined.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to run kubectl: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{0}")]
    Kubectl(String),

    #[error("no current context is set")]
    Empty,
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("config file already exists at {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("could not determine a config path (set XDG_CONFIG_HOME or HOME)")]
    NoConfigPath,

    #[error("failed to write config to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read answer: {0}")]
    Prompt(#[from] std::io::Error),
}
