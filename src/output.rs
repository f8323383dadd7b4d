//! Terminal rendering for block banners, confirmation prompts, and status lines.
//!
//! Color is a field on [`Renderer`] rather than process state, so callers
//! decide once (usually via [`Renderer::from_env`]) and tests render plain text.

use std::io::{self, BufRead, IsTerminal, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const SUBLOG: &str = "\x1b[38;5;244m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Renderer for stderr: colors only when `NO_COLOR` is unset or empty and stderr is a terminal.
    pub fn from_env() -> Self {
        Self::for_terminal(io::stderr().is_terminal())
    }

    /// Renderer for a stream whose terminal status the caller checked.
    pub fn for_terminal(is_terminal: bool) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(!no_color && is_terminal)
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, out: &mut impl Write, message: &str) -> io::Result<()> {
        writeln!(out, "{}", self.paint(RED, &format!("❌ {message}")))
    }

    pub fn warning(&self, out: &mut impl Write, message: &str) -> io::Result<()> {
        writeln!(out, "{}", self.paint(YELLOW, &format!("⚠️  {message}")))
    }

    pub fn info(&self, out: &mut impl Write, message: &str) -> io::Result<()> {
        writeln!(out, "{}", self.paint(CYAN, &format!("ℹ️  {message}")))
    }

    pub fn success(&self, out: &mut impl Write, message: &str) -> io::Result<()> {
        writeln!(out, "{}", self.paint(GREEN, &format!("✅ {message}")))
    }

    /// Indented detail line under a heading.
    pub fn sublog(&self, out: &mut impl Write, message: &str) -> io::Result<()> {
        writeln!(out, "{}", self.paint(SUBLOG, &format!("│ {message}")))
    }

    pub fn blocked(&self, out: &mut impl Write, action: &str, cluster: &str, reason: &str) -> io::Result<()> {
        let headline = format!("Action '{action}' is not allowed on cluster '{cluster}'");
        if self.colors {
            writeln!(out, "{RED}🚫 BLOCKED:{BOLD} {headline}{RESET}")?;
        } else {
            writeln!(out, "🚫 BLOCKED: {headline}")?;
        }
        self.sublog(out, &format!("Reason: {reason}"))
    }

    pub fn confirmation_header(&self, out: &mut impl Write, description: &str, cluster: &str, tier: &str) -> io::Result<()> {
        if self.colors {
            writeln!(out, "{YELLOW}{BOLD}⚠️  CONFIRMATION REQUIRED{RESET}")?;
            writeln!(out, "{SUBLOG}│ Action:  {description}{RESET}")?;
            writeln!(out, "{SUBLOG}│ Cluster: {CYAN}{cluster} ({tier}){RESET}")
        } else {
            writeln!(out, "⚠️  CONFIRMATION REQUIRED")?;
            writeln!(out, "│ Action:  {description}")?;
            writeln!(out, "│ Cluster: {cluster} ({tier})")
        }
    }

    /// Ask a `[y/N]` question. Anything but `y`/`yes` is a no.
    ///
    /// When `interactive` is false nothing is read and the answer is no.
    pub fn confirm(
        &self,
        input: &mut impl BufRead,
        out: &mut impl Write,
        prompt: &str,
        interactive: bool,
    ) -> io::Result<bool> {
        if !interactive {
            self.error(
                out,
                "Cannot prompt for confirmation: stdin is not a terminal. Use --yes to skip confirmation.",
            )?;
            return Ok(false);
        }
        write!(out, "{}", self.paint(YELLOW, &format!("{prompt} [y/N]: ")))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// Shell-quoted command line for display, e.g. `kubectl delete pod 'my pod'`.
pub fn format_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    let words = std::iter::once(program).chain(args.iter().map(|a| a.as_ref()));
    shlex::try_join(words.clone()).unwrap_or_else(|_| words.collect::<Vec<_>>().join(" "))
}
