//! pod2boot - Workload Spec to Boot Manifest CLI
//!
//! Reads one orchestration workload document (YAML, from a file or
//! stdin), resolves its (group, version, kind), translates the embedded
//! pod spec, and writes the boot manifest YAML to stdout.
//!
//! ## Usage
//!
//! ```sh
//! pod2boot deployment.yaml > boot.yml
//! cat pod.yaml | pod2boot > boot.yml
//! ```
//!
//! Translation warnings (unimplemented env indirection, ignored ports,
//! unknown limit names) go to stderr; any fatal error exits non-zero
//! with no output written.

use std::io::Read;
use std::process::ExitCode;

use pod2boot::{resolve, translate_pod};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

// =============================================================================
// CLI Parsing
// =============================================================================

#[derive(Debug)]
enum Command {
    /// Translate a document from the given file, or stdin when `None`.
    Translate { input: Option<String> },
    Version,
    Help,
}

fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut input = None;
    for arg in &args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "-" => input = None,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown flag: {flag}"));
            }
            path => {
                if input.is_some() {
                    return Err("expected at most one input file".to_string());
                }
                input = Some(path.to_string());
            }
        }
    }

    Ok(Command::Translate { input })
}

// =============================================================================
// Translation Driver
// =============================================================================

fn read_input(input: Option<&str>) -> std::io::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run_translate(input: Option<&str>) -> Result<String, pod2boot::Error> {
    let raw = read_input(input)?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&raw)?;

    let api_version = doc
        .get("apiVersion")
        .and_then(|v| v.as_str())
        .ok_or_else(|| pod2boot::Error::Decode("missing apiVersion".to_string()))?;
    let kind = doc
        .get("kind")
        .and_then(|v| v.as_str())
        .ok_or_else(|| pod2boot::Error::Decode("missing kind".to_string()))?;

    let (group, version) = resolve::split_api_version(api_version);
    let extract = resolve::lookup(group, version, kind)?;

    let pod_spec = extract(&doc)?;
    let manifest = translate_pod(&pod_spec)?;

    Ok(serde_yaml::to_string(&manifest)?)
}

// =============================================================================
// Main
// =============================================================================

fn cmd_version() {
    println!("pod2boot version {}", env!("CARGO_PKG_VERSION"));
}

fn cmd_help() {
    println!(
        r#"pod2boot - translate a workload spec into a boot-image manifest

USAGE:
    pod2boot [FILE]

Reads a workload document (Pod, Deployment, ReplicaSet, or DaemonSet)
from FILE or stdin and writes the boot manifest YAML to stdout.

OPTIONS:
    -h, --help       Show this help
    -V, --version    Show version info

EXAMPLES:
    pod2boot deployment.yaml > boot.yml
    kubectl get pod web -o yaml | pod2boot
"#
    );
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return ExitCode::FAILURE;
    }

    match parse_args() {
        Ok(Command::Translate { input }) => match run_translate(input.as_deref()) {
            Ok(rendered) => {
                print!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("failed to convert: {e}");
                ExitCode::FAILURE
            }
        },
        Ok(Command::Version) => {
            cmd_version();
            ExitCode::SUCCESS
        }
        Ok(Command::Help) => {
            cmd_help();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            cmd_help();
            ExitCode::FAILURE
        }
    }
}
