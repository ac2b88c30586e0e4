//! Compiled detection knowledge.
//!
//! The store is built once at startup from the raw definitions in the
//! signatures file. A vulnerability pattern whose regex fails to compile
//! is dropped with a warning; the build itself never fails. Filename
//! globs from the sensitive-file and dependency-file sections are merged
//! into one flat list consulted as a first-match membership test.

use crate::config::SignatureDefs;
use crate::findings::RiskLevel;
use glob::Pattern;
use regex::{Regex, RegexBuilder};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct VulnSignature {
    pub id: String,
    pub name: String,
    pub risk: RiskLevel,
    pub description: String,
    pub regex: Regex,
}

#[derive(Debug, Default)]
pub struct SignatureStore {
    vuln_signatures: Vec<VulnSignature>,
    file_globs: Vec<Pattern>,
    /// Diagnostics for definitions dropped during the build.
    dropped: Vec<String>,
}

impl SignatureStore {
    pub fn build(defs: &SignatureDefs) -> Self {
        let mut store = SignatureStore::default();

        for def in &defs.vulnerability_patterns {
            match RegexBuilder::new(&def.pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
            {
                Ok(regex) => store.vuln_signatures.push(VulnSignature {
                    id: def.id.clone(),
                    name: def.name.clone(),
                    risk: RiskLevel::parse_or_default(def.risk_level.as_deref()),
                    description: def
                        .description
                        .clone()
                        .unwrap_or_else(|| "No description".to_string()),
                    regex,
                }),
                Err(e) => {
                    warn!(id = %def.id, error = %e, "Dropping signature with invalid regex");
                    store
                        .dropped
                        .push(format!("signature {}: {}", def.id, e));
                }
            }
        }

        let raw_globs = defs
            .file_signatures
            .iter()
            .flat_map(|s| s.target_files.iter())
            .chain(defs.dependency_files.iter().flat_map(|d| d.patterns.iter()));

        for raw in raw_globs {
            match Pattern::new(raw) {
                Ok(pattern) => store.file_globs.push(pattern),
                Err(e) => {
                    warn!(glob = %raw, error = %e, "Dropping invalid file glob");
                    store.dropped.push(format!("glob {}: {}", raw, e));
                }
            }
        }

        info!(
            signatures = store.vuln_signatures.len(),
            globs = store.file_globs.len(),
            "Signature store built"
        );
        store
    }

    pub fn vuln_signatures(&self) -> &[VulnSignature] {
        &self.vuln_signatures
    }

    pub fn glob_count(&self) -> usize {
        self.file_globs.len()
    }

    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// First glob matching the path, or None. The search short-circuits:
    /// a file matched by several globs is still audited once.
    pub fn matches_file(&self, path: &str) -> Option<&Pattern> {
        self.file_globs.iter().find(|g| g.matches(path))
    }
}
