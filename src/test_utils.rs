//! Shared fixtures for unit tests: an in-memory content provider that
//! records every call it serves, plus small builders for policies,
//! signature stores, and directory entries.

use crate::config::{FileSignatureDef, PolicyConfig, SignatureDefs, VulnPatternDef};
use crate::provider::{
    ContentProvider, DirEntry, EntryKind, ProviderError, TreeEntry, TreeEntryKind, TreeSnapshot,
};
use crate::signatures::SignatureStore;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    List(String),
    Tree(String),
    Content(String),
}

/// In-memory [`ContentProvider`] over a scripted repository tree.
#[derive(Default)]
pub struct MockProvider {
    dirs: HashMap<String, Vec<DirEntry>>,
    dir_errors: HashMap<String, ProviderError>,
    trees: HashMap<String, TreeSnapshot>,
    tree_errors: HashMap<String, ProviderError>,
    files: HashMap<String, Vec<u8>>,
    file_errors: HashMap<String, ProviderError>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(self, entries: Vec<DirEntry>) -> Self {
        self.with_dir("", entries)
    }

    pub fn with_dir(mut self, path: &str, entries: Vec<DirEntry>) -> Self {
        self.dirs.insert(path.to_string(), entries);
        self
    }

    pub fn with_dir_error(mut self, path: &str, error: ProviderError) -> Self {
        self.dir_errors.insert(path.to_string(), error);
        self
    }

    /// Registers a snapshot of `(relative_path, sha)` blobs under a tree sha.
    pub fn with_tree(mut self, sha: &str, truncated: bool, blobs: &[(&str, &str)]) -> Self {
        let entries = blobs
            .iter()
            .map(|(path, blob_sha)| TreeEntry {
                path: path.to_string(),
                sha: blob_sha.to_string(),
                kind: TreeEntryKind::Blob,
            })
            .collect();
        self.trees
            .insert(sha.to_string(), TreeSnapshot { truncated, entries });
        self
    }

    pub fn with_tree_error(mut self, sha: &str, error: ProviderError) -> Self {
        self.tree_errors.insert(sha.to_string(), error);
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.with_file_bytes(path, content.as_bytes().to_vec())
    }

    pub fn with_file_bytes(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), bytes);
        self
    }

    pub fn with_file_error(mut self, path: &str, error: ProviderError) -> Self {
        self.file_errors.insert(path.to_string(), error);
        self
    }

    /// The root listing, for handing directly to a traversal engine.
    pub fn root(&self) -> Vec<DirEntry> {
        self.dirs.get("").cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ContentProvider for MockProvider {
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, ProviderError> {
        self.record(ProviderCall::List(path.to_string()));
        if let Some(err) = self.dir_errors.get(path) {
            return Err(err.clone());
        }
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))
    }

    fn recursive_tree(&self, tree_sha: &str) -> Result<TreeSnapshot, ProviderError> {
        self.record(ProviderCall::Tree(tree_sha.to_string()));
        if let Some(err) = self.tree_errors.get(tree_sha) {
            return Err(err.clone());
        }
        self.trees
            .get(tree_sha)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(tree_sha.to_string()))
    }

    fn file_content(&self, path: &str) -> Result<Vec<u8>, ProviderError> {
        self.record(ProviderCall::Content(path.to_string()));
        if let Some(err) = self.file_errors.get(path) {
            return Err(err.clone());
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))
    }
}

pub fn dir_entry(name: &str, path: &str, sha: &str) -> DirEntry {
    DirEntry {
        name: name.to_string(),
        path: path.to_string(),
        sha: sha.to_string(),
        kind: EntryKind::Dir,
        content: None,
    }
}

pub fn file_entry(name: &str, path: &str) -> DirEntry {
    DirEntry {
        name: name.to_string(),
        path: path.to_string(),
        sha: format!("sha-{}", name),
        kind: EntryKind::File,
        content: None,
    }
}

pub fn policy(ignore_dirs: &[&str], max_depth: usize) -> PolicyConfig {
    PolicyConfig {
        ignore_dirs: ignore_dirs.iter().map(|s| s.to_string()).collect(),
        max_depth,
    }
}

pub fn vuln_pattern(id: &str, name: &str, risk: &str, pattern: &str) -> VulnPatternDef {
    VulnPatternDef {
        id: id.to_string(),
        name: name.to_string(),
        risk_level: Some(risk.to_string()),
        description: Some(format!("{} detected", name)),
        pattern: pattern.to_string(),
    }
}

pub fn signature_store(patterns: Vec<VulnPatternDef>, globs: &[&str]) -> SignatureStore {
    SignatureStore::build(&SignatureDefs {
        vulnerability_patterns: patterns,
        file_signatures: vec![FileSignatureDef {
            target_files: globs.iter().map(|s| s.to_string()).collect(),
        }],
        dependency_files: vec![],
    })
}
