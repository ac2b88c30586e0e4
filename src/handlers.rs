//! CLI command handlers, separated from main.rs to enable unit
//! testing.
//!
//! Exit code policy: 0 for a clean run (including an inaccessible
//! repository, which is user-facing but not a crash), 1 when findings
//! exist, 2 for fatal startup errors (missing or malformed policy or
//! signature files).

use crate::cli::{OutputFormat, TargetArgs};
use crate::config::{PolicyConfig, SignatureDefs};
use crate::error::{AuditError, Result};
use crate::findings::ScanReport;
use crate::provider::{DEFAULT_REQUEST_TIMEOUT_SECS, GitHubProvider};
use crate::reporter::{Reporter, json::JsonReporter, terminal::TerminalReporter};
use crate::scan::{CancelToken, ScanOptions, run_scan};
use crate::signatures::SignatureStore;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

pub const EXIT_FINDINGS: u8 = 1;
pub const EXIT_STARTUP_ERROR: u8 = 2;

pub fn handle_scan(
    target: &TargetArgs,
    format: OutputFormat,
    output: &std::path::Path,
    verbose: bool,
) -> ExitCode {
    let report = match execute(target) {
        Outcome::Report(report) => report,
        Outcome::Exit(code) => return code,
    };

    if let Err(e) = persist(&report, output) {
        error!(error = %e, "Failed to write results");
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_STARTUP_ERROR);
    }
    info!(path = %output.display(), "Results written");

    let rendered = match format {
        OutputFormat::Terminal => TerminalReporter::new(verbose).report(&report),
        OutputFormat::Json => JsonReporter::new().report(&report),
    };
    print!("{}", rendered);

    exit_for(&report)
}

pub fn handle_list(target: &TargetArgs, verbose: bool) -> ExitCode {
    let report = match execute(target) {
        Outcome::Report(report) => report,
        Outcome::Exit(code) => return code,
    };
    print!("{}", TerminalReporter::new(verbose).report(&report));
    exit_for(&report)
}

enum Outcome {
    Report(ScanReport),
    Exit(ExitCode),
}

fn execute(target: &TargetArgs) -> Outcome {
    let (policy, signatures) = match load_startup_config(target) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Outcome::Exit(ExitCode::from(EXIT_STARTUP_ERROR));
        }
    };

    let provider = GitHubProvider::with_settings(
        &target.repo,
        target.token.clone(),
        target.jobs,
        DEFAULT_REQUEST_TIMEOUT_SECS,
    );

    // Repository-level access failure ends the run with a clear
    // message and zero findings, not a crash.
    let repository = match provider.verify_repo() {
        Ok(full_name) => full_name,
        Err(e) => {
            eprintln!("Error accessing repository {}: {}", target.repo, e);
            return Outcome::Exit(ExitCode::SUCCESS);
        }
    };

    let options = ScanOptions {
        jobs: target.jobs,
        timeout: target.timeout.map(Duration::from_secs),
    };

    match run_scan(
        &provider,
        &repository,
        &policy,
        &signatures,
        &options,
        CancelToken::new(),
    ) {
        Ok(report) => Outcome::Report(report),
        Err(e) => {
            eprintln!("Error accessing repository {}: {}", repository, e);
            Outcome::Exit(ExitCode::SUCCESS)
        }
    }
}

fn load_startup_config(target: &TargetArgs) -> Result<(PolicyConfig, SignatureStore)> {
    let policy = PolicyConfig::load(&target.policy)?;
    let defs = SignatureDefs::load(&target.signatures)?;
    Ok((policy, SignatureStore::build(&defs)))
}

fn persist(report: &ScanReport, path: &std::path::Path) -> Result<()> {
    let payload = JsonReporter::new().report(report);
    std::fs::write(path, payload).map_err(|e| AuditError::WriteError {
        path: path.display().to_string(),
        source: e,
    })
}

fn exit_for(report: &ScanReport) -> ExitCode {
    if report.findings.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FINDINGS)
    }
}
