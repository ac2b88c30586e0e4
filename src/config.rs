//! Policy and signature sources.
//!
//! Both files are required at startup: a missing or malformed policy or
//! signature file aborts the run before any traversal starts. Per-entry
//! problems inside a well-formed signature file (a regex that fails to
//! compile, a bad glob) are handled later, during the store build, and
//! are never fatal.

use crate::error::{AuditError, Result};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::path::Path;

/// Static traversal limits. Immutable after load.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Entry names skipped entirely during traversal (files and dirs).
    pub ignore_dirs: FxHashSet<String>,
    /// Depth at which per-directory listing switches to a flat snapshot.
    pub max_depth: usize,
}

impl PolicyConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_required(path, |p| AuditError::PolicyNotFound(p))?;
        serde_json::from_str(&raw).map_err(|e| AuditError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.contains(name)
    }
}

/// Raw signature definitions as they appear in the signatures file.
/// Compiled into a [`crate::signatures::SignatureStore`] at startup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SignatureDefs {
    #[serde(default)]
    pub vulnerability_patterns: Vec<VulnPatternDef>,
    #[serde(default)]
    pub file_signatures: Vec<FileSignatureDef>,
    #[serde(default)]
    pub dependency_files: Vec<DependencyFileDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VulnPatternDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileSignatureDef {
    #[serde(default)]
    pub target_files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DependencyFileDef {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl SignatureDefs {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_required(path, |p| AuditError::SignaturesNotFound(p))?;
        serde_json::from_str(&raw).map_err(|e| AuditError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

fn read_required(path: &Path, not_found: impl Fn(String) -> AuditError) -> Result<String> {
    if !path.exists() {
        return Err(not_found(path.display().to_string()));
    }
    std::fs::read_to_string(path).map_err(|e| AuditError::ReadError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_policy_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(
            &path,
            r#"{"ignore_dirs": ["node_modules", ".git"], "max_depth": 2}"#,
        )
        .unwrap();

        let policy = PolicyConfig::load(&path).unwrap();
        assert_eq!(policy.max_depth, 2);
        assert!(policy.is_ignored("node_modules"));
        assert!(policy.is_ignored(".git"));
        assert!(!policy.is_ignored("src"));
    }

    #[test]
    fn test_policy_missing_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = PolicyConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AuditError::PolicyNotFound(_)));
    }

    #[test]
    fn test_policy_malformed_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(&path, "{not json").unwrap();
        let err = PolicyConfig::load(&path).unwrap_err();
        assert!(matches!(err, AuditError::ParseError { .. }));
    }

    #[test]
    fn test_signatures_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signatures.json");
        fs::write(
            &path,
            r#"{
                "vulnerability_patterns": [
                    {"id": "flask", "name": "Flask", "risk_level": "High",
                     "description": "Known vulnerable release line", "pattern": "flask"}
                ],
                "file_signatures": [{"target_files": ["*.env", "*config*"]}],
                "dependency_files": [{"patterns": ["*requirements*.txt"]}]
            }"#,
        )
        .unwrap();

        let defs = SignatureDefs::load(&path).unwrap();
        assert_eq!(defs.vulnerability_patterns.len(), 1);
        assert_eq!(defs.vulnerability_patterns[0].id, "flask");
        assert_eq!(defs.file_signatures[0].target_files.len(), 2);
        assert_eq!(defs.dependency_files[0].patterns[0], "*requirements*.txt");
    }

    #[test]
    fn test_signatures_missing_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = SignatureDefs::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AuditError::SignaturesNotFound(_)));
    }

    #[test]
    fn test_signatures_sections_default_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signatures.json");
        fs::write(&path, "{}").unwrap();
        let defs = SignatureDefs::load(&path).unwrap();
        assert!(defs.vulnerability_patterns.is_empty());
        assert!(defs.file_signatures.is_empty());
        assert!(defs.dependency_files.is_empty());
    }
}
