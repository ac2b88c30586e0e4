//! Signature-based file classification.
//!
//! Two mutually exclusive modes, selected by exact basename match:
//! dependency manifests are parsed line-by-line and their dependency
//! names compared against the signature database; every other matched
//! file gets a full regex pass, one finding per non-overlapping match.

use crate::findings::Finding;
use crate::signatures::{SignatureStore, VulnSignature};

/// Dependency manifest filename audited in manifest mode.
pub const DEPENDENCY_MANIFEST: &str = "requirements.txt";

/// Version-operator delimiters; the dependency name is whatever comes
/// before the first one on the line.
const VERSION_DELIMITERS: [&str; 3] = ["==", ">=", "<"];

pub struct AuditEngine<'a> {
    store: &'a SignatureStore,
    repository: String,
}

impl<'a> AuditEngine<'a> {
    pub fn new(store: &'a SignatureStore, repository: &str) -> Self {
        Self {
            store,
            repository: repository.to_string(),
        }
    }

    /// Applies the signature store to one file's content. Deterministic:
    /// the same content and store always yield the same ordered list.
    pub fn audit(&self, file_path: &str, content: &str) -> Vec<Finding> {
        let basename = file_path.rsplit('/').next().unwrap_or(file_path);
        if basename == DEPENDENCY_MANIFEST {
            self.audit_manifest(file_path, content)
        } else {
            self.audit_patterns(file_path, content)
        }
    }

    /// Every line of the manifest is checked, not only the last one.
    fn audit_manifest(&self, file_path: &str, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (line_num, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let lib_name = extract_dependency_name(line);
            if lib_name.is_empty() {
                continue;
            }

            for sig in self.store.vuln_signatures() {
                if sig.id.to_lowercase() == lib_name || sig.name.to_lowercase() == lib_name {
                    findings.push(self.finding(sig, file_path, None, Some(line_num + 1)));
                }
            }
        }

        findings
    }

    fn audit_patterns(&self, file_path: &str, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for sig in self.store.vuln_signatures() {
            for m in sig.regex.find_iter(content) {
                let line = content[..m.start()].matches('\n').count() + 1;
                findings.push(self.finding(
                    sig,
                    file_path,
                    Some(m.as_str().to_string()),
                    Some(line),
                ));
            }
        }

        findings
    }

    fn finding(
        &self,
        sig: &VulnSignature,
        file_path: &str,
        evidence: Option<String>,
        line: Option<usize>,
    ) -> Finding {
        Finding {
            rule_id: sig.id.clone(),
            name: sig.name.clone(),
            file_path: file_path.to_string(),
            risk: sig.risk,
            description: sig.description.clone(),
            repository: self.repository.clone(),
            evidence,
            line,
            timestamp: Finding::timestamp_now(),
        }
    }
}

/// `Flask==1.0.2` -> `flask`; `requests>=2.0` -> `requests`.
fn extract_dependency_name(line: &str) -> String {
    let mut name = line;
    for delim in VERSION_DELIMITERS {
        if let Some(idx) = name.find(delim) {
            name = &name[..idx];
        }
    }
    name.trim().to_lowercase()
}
