//! Depth-limited hybrid tree traversal.
//!
//! Below the configured depth ceiling the engine walks the repository
//! directory-by-directory, one listing request per directory. At the
//! ceiling it switches strategy: one flat recursive snapshot request
//! for the whole subtree, decomposed into synthesized file references.
//! The trade is round-trip economy against directory-boundary fidelity,
//! so ignore filtering inside a snapshot is path-segment-wise (the
//! snapshot has no directory boundaries left to test names against).
//!
//! A remote failure on one subtree downgrades to a warning and the
//! siblings keep going. Truncated snapshots likewise: the files the
//! provider did return are kept, the gap is reported.

use crate::config::PolicyConfig;
use crate::provider::{ContentProvider, DirEntry, EntryKind, TreeEntryKind};
use crate::scan::CancelToken;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

/// Handle to a repository file discovered during traversal.
///
/// Native entries come straight from a directory listing and may carry
/// embedded base64 content. Synthesized entries are reconstructed from
/// a flat snapshot and never do; their content must be fetched by path.
#[derive(Debug, Clone)]
pub enum FileRef {
    Native(DirEntry),
    Synthesized { path: String, sha: String },
}

impl FileRef {
    pub fn path(&self) -> &str {
        match self {
            FileRef::Native(e) => &e.path,
            FileRef::Synthesized { path, .. } => path,
        }
    }

    pub fn sha(&self) -> &str {
        match self {
            FileRef::Native(e) => &e.sha,
            FileRef::Synthesized { sha, .. } => sha,
        }
    }

    /// Embedded base64 content, when the listing already carried it.
    pub fn embedded_content(&self) -> Option<&str> {
        match self {
            FileRef::Native(e) => e.content.as_deref(),
            FileRef::Synthesized { .. } => None,
        }
    }
}

/// Non-fatal conditions surfaced by a scan. Each one means the result
/// may be incomplete, not that it is wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// Snapshot exceeded the provider's size ceiling; files under this
    /// subtree are silently missing.
    Truncated { path: String },
    /// Listing or snapshot fetch failed; the subtree contributed
    /// nothing.
    SubtreeFailed { path: String, reason: String },
    /// Content fetch or decode failed; the file yielded no findings.
    FileSkipped { path: String, reason: String },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanWarning::Truncated { path } => write!(
                f,
                "subtree {} was truncated by the provider; some files were missed",
                path
            ),
            ScanWarning::SubtreeFailed { path, reason } => {
                write!(f, "subtree {} could not be read: {}", path, reason)
            }
            ScanWarning::FileSkipped { path, reason } => {
                write!(f, "file {} skipped: {}", path, reason)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TraversalOutcome {
    pub files: Vec<FileRef>,
    pub warnings: Vec<ScanWarning>,
}

pub struct TraversalEngine<'a> {
    provider: &'a dyn ContentProvider,
    policy: &'a PolicyConfig,
    cancel: CancelToken,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(provider: &'a dyn ContentProvider, policy: &'a PolicyConfig) -> Self {
        Self {
            provider,
            policy,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Walks the tree under the given root listing and returns every
    /// reachable file-kind entry, deduplicated by path.
    pub fn traverse(&self, root_listing: Vec<DirEntry>) -> TraversalOutcome {
        let mut outcome = TraversalOutcome::default();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        self.walk(root_listing, 0, &mut outcome, &mut seen);
        outcome
    }

    fn walk(
        &self,
        listing: Vec<DirEntry>,
        depth: usize,
        outcome: &mut TraversalOutcome,
        seen: &mut FxHashSet<String>,
    ) {
        for entry in listing {
            if self.cancel.is_cancelled() {
                debug!("Traversal cancelled; returning partial file set");
                return;
            }
            if self.policy.is_ignored(&entry.name) {
                debug!(path = %entry.path, "Skipping ignored entry");
                continue;
            }

            match entry.kind {
                EntryKind::Dir if depth < self.policy.max_depth => {
                    match self.provider.list_directory(&entry.path) {
                        Ok(sub) => self.walk(sub, depth + 1, outcome, seen),
                        Err(e) => {
                            warn!(path = %entry.path, error = %e, "Directory listing failed");
                            outcome.warnings.push(ScanWarning::SubtreeFailed {
                                path: entry.path,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                // Depth ceiling: one snapshot for the whole subtree
                // instead of a listing per directory.
                EntryKind::Dir => self.snapshot_subtree(&entry, outcome, seen),
                EntryKind::File => {
                    if seen.insert(entry.path.clone()) {
                        outcome.files.push(FileRef::Native(entry));
                    }
                }
            }
        }
    }

    fn snapshot_subtree(
        &self,
        dir: &DirEntry,
        outcome: &mut TraversalOutcome,
        seen: &mut FxHashSet<String>,
    ) {
        debug!(path = %dir.path, "Snapshotting subtree");
        let snapshot = match self.provider.recursive_tree(&dir.sha) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %dir.path, error = %e, "Subtree snapshot failed");
                outcome.warnings.push(ScanWarning::SubtreeFailed {
                    path: dir.path.clone(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        if snapshot.truncated {
            warn!(path = %dir.path, "Snapshot truncated; some files will be missed");
            outcome.warnings.push(ScanWarning::Truncated {
                path: dir.path.clone(),
            });
        }

        for element in snapshot.entries {
            if element.kind != TreeEntryKind::Blob {
                continue;
            }
            // The flat snapshot lost directory boundaries, so the
            // ignore rule applies to every segment of the relative path.
            if element.path.split('/').any(|seg| self.policy.is_ignored(seg)) {
                continue;
            }
            let full_path = format!("{}/{}", dir.path, element.path);
            if seen.insert(full_path.clone()) {
                outcome.files.push(FileRef::Synthesized {
                    path: full_path,
                    sha: element.sha,
                });
            }
        }
    }
}
