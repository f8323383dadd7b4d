//! kctl: kubectl wrapper that blocks or confirms risky actions per cluster.
//!
//! Runs as `kctl <kubectl args>` or, installed as `kubectl-enhanced` on PATH,
//! as the kubectl plugin `kubectl enhanced <kubectl args>`.

use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Context as _;
use clap::Parser;

use kubectl_enhanced::config::{self, Config};
use kubectl_enhanced::eval::{Decision, Gate, Invocation, passthrough_args};
use kubectl_enhanced::init::{self, InitOutcome, Options, Prompter, parse_list};
use kubectl_enhanced::kubectl::{ContextSource, Kubectl};
use kubectl_enhanced::logging;
use kubectl_enhanced::output::{Renderer, format_command};

const PLUGIN_NAME: &str = "kubectl-enhanced";

// ─── init ────────────────────────────────────────────

/// Create a kubectl-enhanced config file.
#[derive(Debug, Parser)]
#[command(name = "kctl init")]
struct InitArgs {
    /// Use flag values instead of asking questions
    #[arg(short = 'n', long)]
    non_interactive: bool,
    /// Overwrite an existing config file
    #[arg(short = 'f', long)]
    force: bool,
    /// Write to this path instead of the standard location
    #[arg(short = 'o', long)]
    output: Option<String>,
    /// Comma-separated production context patterns
    #[arg(long, default_value = init::DEFAULT_PROD_PATTERNS)]
    prod_patterns: String,
    /// Comma-separated staging context patterns
    #[arg(long, default_value = init::DEFAULT_STAGING_PATTERNS)]
    staging_patterns: String,
    /// Comma-separated development context patterns
    #[arg(long, default_value = init::DEFAULT_DEV_PATTERNS)]
    dev_patterns: String,
    /// Actions requiring confirmation on production
    #[arg(long, default_value = init::DEFAULT_PROD_ACTIONS)]
    prod_actions: String,
    /// Actions requiring confirmation on staging
    #[arg(long, default_value = init::DEFAULT_STAGING_ACTIONS)]
    staging_actions: String,
    /// Actions blocked on every cluster
    #[arg(long, default_value = "")]
    blocked_actions: String,
}

impl From<InitArgs> for Options {
    fn from(args: InitArgs) -> Self {
        Options {
            non_interactive: args.non_interactive,
            force: args.force,
            output: args.output,
            prod_patterns: parse_list(&args.prod_patterns),
            staging_patterns: parse_list(&args.staging_patterns),
            dev_patterns: parse_list(&args.dev_patterns),
            prod_actions: parse_list(&args.prod_actions),
            staging_actions: parse_list(&args.staging_actions),
            blocked_actions: parse_list(&args.blocked_actions),
        }
    }
}

fn run_init(args: &[String]) -> anyhow::Result<InitOutcome> {
    let argv = std::iter::once("kctl init").chain(args.iter().map(String::as_str));
    let opts: Options = InitArgs::try_parse_from(argv).unwrap_or_else(|e| e.exit()).into();

    let contexts = if opts.non_interactive {
        Vec::new()
    } else {
        Kubectl::new().contexts().unwrap_or_else(|e| {
            log::debug!("init: no contexts detected: {e}");
            Vec::new()
        })
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let renderer = Renderer::for_terminal(stdout.is_terminal());
    let mut prompter = Prompter::new(stdin.lock(), stdout, renderer);
    init::run(&opts, contexts, &mut prompter).context("init failed")
}

// ─── Wrapper ─────────────────────────────────────────

fn print_usage(plugin: bool) {
    let cmd = if plugin { "kubectl enhanced" } else { "kctl" };
    println!(
        "\
kubectl-enhanced: a kubectl wrapper with per-cluster safety rules

Usage:
  {cmd} [kubectl arguments...] [--yes|-y]
  {cmd} init [--non-interactive] [--force] [--output PATH]

Wrapper flags:
  -y, --yes          Skip confirmation prompts (blocked actions stay blocked)
  -h, --help         Show this help
  -v, --version      Show version
      --config-path  Print the config file location

Commands:
  init               Create a config file (run '{cmd} init --help' for options)

Examples:
  {cmd} get pods
  {cmd} delete pod my-pod
  {cmd} delete pod my-pod --yes"
    );
}

fn run(plugin: bool, raw: Vec<OsString>, renderer: Renderer) -> io::Result<i32> {
    let mut err = io::stderr();
    let args: Vec<String> = raw.iter().map(|a| a.to_string_lossy().into_owned()).collect();

    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") => {
            print_usage(plugin);
            return Ok(0);
        }
        Some("--version") | Some("-v") => {
            println!("{PLUGIN_NAME} {}", env!("CARGO_PKG_VERSION"));
            return Ok(0);
        }
        Some("--config-path") => {
            return match config::config_path() {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(0)
                }
                None => {
                    renderer.error(&mut err, "Could not determine config path (HOME is not set)")?;
                    Ok(1)
                }
            };
        }
        Some("init") => {
            return match run_init(&args[1..]) {
                Ok(_) => Ok(0),
                Err(e) => {
                    renderer.error(&mut err, &format!("{e:#}"))?;
                    Ok(1)
                }
            };
        }
        _ => {}
    }

    let kubectl = Kubectl::new();
    if !kubectl.is_available() {
        renderer.error(&mut err, "kubectl not found in PATH")?;
        renderer.sublog(&mut err, "Install kubectl: https://kubernetes.io/docs/tasks/tools/")?;
        return Ok(1);
    }

    let config = Config::load_or_default(config::config_path().as_deref(), &mut err, renderer)?;

    let context = match kubectl.current_context() {
        Ok(context) => context,
        Err(e) => {
            renderer.error(&mut err, &format!("Failed to get current kubectl context: {e}"))?;
            renderer.sublog(&mut err, "Set one with: kubectl config use-context <name>")?;
            return Ok(1);
        }
    };

    let invocation = Invocation::from_args(args);
    let outcome = Gate::from_config(config).evaluate(&context, &invocation);
    logging::log_decision(&context, &invocation.args, &outcome);

    match &outcome.decision {
        Decision::Allowed => {}
        Decision::Blocked { reason } => {
            renderer.blocked(&mut err, outcome.action.as_str(), &context, reason)?;
            return Ok(1);
        }
        Decision::ConfirmationRequired { description, tier } => {
            renderer.confirmation_header(&mut err, description, &context, tier)?;
            let namespace = invocation
                .namespace()
                .map(String::from)
                .or_else(|| kubectl.default_namespace())
                .unwrap_or_else(|| "default".into());
            renderer.sublog(&mut err, &format!("Namespace: {namespace}"))?;
            renderer.sublog(
                &mut err,
                &format!("Command: {}", format_command("kubectl", invocation.args.as_slice())),
            )?;

            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            let confirmed = renderer.confirm(&mut stdin.lock(), &mut err, "Do you want to proceed?", interactive)?;
            if !confirmed {
                renderer.info(&mut err, "Operation cancelled by user")?;
                return Ok(0);
            }
        }
    }

    Ok(kubectl.execute(passthrough_args(&raw).as_slice()))
}

fn main() {
    logging::init();

    let mut argv = std::env::args_os();
    let plugin = argv
        .next()
        .and_then(|arg0| Path::new(&arg0).file_stem().map(|s| s == PLUGIN_NAME))
        .unwrap_or(false);
    let raw: Vec<OsString> = argv.collect();

    let code = run(plugin, raw, Renderer::from_env()).unwrap_or_else(|e| {
        eprintln!("kctl: {e}");
        1
    });
    std::process::exit(code);
}

// ─── Tests ───────────────────────────────────────────
