//! Scan orchestration.
//!
//! Pipeline: list the root, traverse under policy, keep files matching
//! the file-of-interest globs, then resolve + audit the candidates on a
//! bounded worker pool. Findings land in a shared [`ResultStore`];
//! per-file failures downgrade to warnings. Finding order across files
//! is arbitrary under concurrency, but each file's findings are
//! appended as one batch so their relative order survives.

use crate::audit::AuditEngine;
use crate::config::PolicyConfig;
use crate::error::Result;
use crate::findings::{ResultStore, ScanReport};
use crate::provider::{ContentProvider, DEFAULT_REQUEST_CONCURRENCY};
use crate::resolver::ContentResolver;
use crate::signatures::SignatureStore;
use crate::traversal::{FileRef, ScanWarning, TraversalEngine};
use rayon::prelude::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cooperative cancellation signal. Cancelling stops new provider
/// requests; work already done is kept and reported.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Arms a watchdog that cancels this token after `timeout`, unless
    /// the returned guard is dropped first.
    pub fn arm_timeout(&self, timeout: Duration) -> WatchdogGuard {
        let token = self.clone();
        let disarmed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&disarmed);
        std::thread::spawn(move || {
            let step = Duration::from_millis(50);
            let mut elapsed = Duration::ZERO;
            while elapsed < timeout {
                if flag.load(Ordering::Relaxed) {
                    return;
                }
                std::thread::sleep(step);
                elapsed += step;
            }
            if !flag.load(Ordering::Relaxed) {
                warn!("Scan timeout reached; cancelling");
                token.cancel();
            }
        });
        WatchdogGuard { disarmed }
    }
}

/// Disarms the timeout watchdog when dropped.
pub struct WatchdogGuard {
    disarmed: Arc<AtomicBool>,
}

impl Drop for WatchdogGuard {
    fn drop(&mut self) {
        self.disarmed.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Worker pool size for the resolve + audit phase.
    pub jobs: usize,
    /// Overall scan deadline.
    pub timeout: Option<Duration>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_REQUEST_CONCURRENCY,
            timeout: None,
        }
    }
}

/// Runs a full scan of `repository` through `provider` and returns the
/// report. Only root-listing failure is an error; everything below the
/// root degrades to warnings.
pub fn run_scan(
    provider: &dyn ContentProvider,
    repository: &str,
    policy: &PolicyConfig,
    signatures: &SignatureStore,
    options: &ScanOptions,
    cancel: CancelToken,
) -> Result<ScanReport> {
    let _watchdog = options.timeout.map(|t| cancel.arm_timeout(t));

    let root = provider.list_directory("")?;
    info!(repository, entries = root.len(), "Root listing complete");

    let outcome = TraversalEngine::new(provider, policy)
        .with_cancel(cancel.clone())
        .traverse(root);
    let mut warnings = outcome.warnings;

    let candidates: Vec<FileRef> = outcome
        .files
        .into_iter()
        .filter(|f| signatures.matches_file(f.path()).is_some())
        .collect();
    info!(candidates = candidates.len(), "Files of interest selected");

    let store = ResultStore::new();
    let skipped: Mutex<Vec<ScanWarning>> = Mutex::new(Vec::new());
    let resolver = ContentResolver::new(provider);
    let engine = AuditEngine::new(signatures, repository);

    let process = |file: &FileRef| {
        if cancel.is_cancelled() {
            return;
        }
        match resolver.resolve(file) {
            Ok(content) => {
                let findings = engine.audit(file.path(), &content);
                debug!(path = file.path(), findings = findings.len(), "File audited");
                store.append_batch(findings);
            }
            Err(e) => {
                warn!(path = file.path(), error = %e, "Skipping unreadable file");
                skipped
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .push(ScanWarning::FileSkipped {
                        path: file.path().to_string(),
                        reason: e.to_string(),
                    });
            }
        }
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.max(1))
        .build()
    {
        Ok(pool) => pool.install(|| candidates.par_iter().for_each(process)),
        Err(e) => {
            warn!(error = %e, "Worker pool unavailable; auditing sequentially");
            candidates.iter().for_each(process);
        }
    }

    warnings.extend(skipped.into_inner().unwrap_or_else(|p| p.into_inner()));
    if cancel.is_cancelled() {
        warnings.push(ScanWarning::SubtreeFailed {
            path: String::new(),
            reason: "scan cancelled; results are partial".to_string(),
        });
    }

    let report = ScanReport::new(
        repository.to_string(),
        store.into_findings(),
        warnings.iter().map(|w| w.to_string()).collect(),
    );
    info!(
        findings = report.findings.len(),
        warnings = report.warnings.len(),
        "Scan complete"
    );
    Ok(report)
}
