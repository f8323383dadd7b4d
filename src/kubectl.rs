//! The wrapped kubectl binary: context lookup and command passthrough.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::error::ContextError;

/// Source of the active cluster context name.
pub trait ContextSource {
    fn current_context(&self) -> Result<String, ContextError>;
}

/// Handle on the kubectl executable.
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: OsString,
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::with_program("kubectl")
    }
}

impl Kubectl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (name on `PATH` or explicit path).
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Whether the program can be found.
    pub fn is_available(&self) -> bool {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file();
        }
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
            .unwrap_or(false)
    }

    /// Run kubectl with captured output: `(stdout, stderr, status)`.
    fn capture(&self, args: &[&str]) -> std::io::Result<(String, String, ExitStatus)> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok((
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
            output.status,
        ))
    }

    /// All context names from the kubeconfig.
    pub fn contexts(&self) -> Result<Vec<String>, ContextError> {
        let (stdout, stderr, status) = self.capture(&["config", "get-contexts", "-o", "name"])?;
        if !status.success() {
            return Err(failure_message(&stderr, "failed to list contexts"));
        }
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// Namespace configured on the current context, if any.
    pub fn default_namespace(&self) -> Option<String> {
        let (stdout, _, status) = self
            .capture(&[
                "config",
                "view",
                "--minify",
                "-o",
                "jsonpath={.contexts[0].context.namespace}",
            ])
            .ok()?;
        let ns = stdout.trim();
        (status.success() && !ns.is_empty()).then(|| ns.to_string())
    }

    /// Run kubectl attached to this process's stdio and return its exit code.
    pub fn execute<S: AsRef<OsStr>>(&self, args: &[S]) -> i32 {
        match Command::new(&self.program).args(args).status() {
            Ok(status) => exit_code(status),
            Err(e) => {
                log::warn!("failed to start {}: {e}", self.program.to_string_lossy());
                1
            }
        }
    }
}

impl ContextSource for Kubectl {
    fn current_context(&self) -> Result<String, ContextError> {
        let (stdout, stderr, status) = self.capture(&["config", "current-context"])?;
        if !status.success() {
            return Err(failure_message(&stderr, "failed to get current context"));
        }
        let context = stdout.trim();
        if context.is_empty() {
            return Err(ContextError::Empty);
        }
        Ok(context.to_string())
    }
}

fn failure_message(stderr: &str, fallback: &str) -> ContextError {
    let msg = stderr.trim();
    ContextError::Kubectl(if msg.is_empty() { fallback.into() } else { msg.into() })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
