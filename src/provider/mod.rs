//! Remote repository content access.
//!
//! The traversal and resolver layers never talk to the network
//! directly; everything goes through the [`ContentProvider`] trait.
//! [`github::GitHubProvider`] is the production implementation against
//! the GitHub REST v3 API. Tests substitute an in-memory provider.

pub mod error;
pub mod github;
pub mod limiter;

pub use error::ProviderError;
pub use github::GitHubProvider;
pub use limiter::RequestLimiter;

use serde::Deserialize;

/// Default bound on concurrent provider requests.
pub const DEFAULT_REQUEST_CONCURRENCY: usize = 4;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry from a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub sha: String,
    pub kind: EntryKind,
    /// Base64 content, present only when the API embedded it.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    Blob,
    Tree,
    Commit,
}

/// One entry from a flat recursive tree snapshot. Paths are relative to
/// the snapshotted subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
}

/// A recursively-listed subtree returned as one flat list of entries.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeSnapshot {
    pub truncated: bool,
    #[serde(rename = "tree")]
    pub entries: Vec<TreeEntry>,
}

/// Capability interface over the remote repository.
pub trait ContentProvider: Send + Sync {
    /// Lists one directory. `path` is repo-relative; empty means root.
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, ProviderError>;

    /// Fetches a flat recursive snapshot of the subtree rooted at the
    /// given tree object.
    fn recursive_tree(&self, tree_sha: &str) -> Result<TreeSnapshot, ProviderError>;

    /// Fetches a file's raw bytes by repo-relative path.
    fn file_content(&self, path: &str) -> Result<Vec<u8>, ProviderError>;
}
