use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Parses a definition-file risk label. Unknown or absent labels fall
    /// back to Medium, matching the signature format's default.
    pub fn parse_or_default(label: Option<&str>) -> Self {
        match label.map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("low") => RiskLevel::Low,
            Some("medium") => RiskLevel::Medium,
            Some("high") => RiskLevel::High,
            Some("critical") => RiskLevel::Critical,
            _ => RiskLevel::Medium,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// One reported occurrence of a risky pattern or vulnerable dependency.
/// Immutable once appended to the [`ResultStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub name: String,
    pub file_path: String,
    pub risk: RiskLevel,
    pub description: String,
    pub repository: String,
    /// Literal matched substring. Absent for manifest-based matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    /// 1-based line of the match, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub timestamp: String,
}

impl Finding {
    pub fn timestamp_now() -> String {
        Utc::now().to_rfc3339()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Summary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl Summary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        findings.iter().fold(Summary::default(), |mut s, f| {
            match f.risk {
                RiskLevel::Critical => s.critical += 1,
                RiskLevel::High => s.high += 1,
                RiskLevel::Medium => s.medium += 1,
                RiskLevel::Low => s.low += 1,
            }
            s
        })
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Append-only accumulator for findings, insertion order preserved.
/// Appends are synchronized so parallel audit workers can share one
/// store; there is no removal operation.
#[derive(Debug, Default)]
pub struct ResultStore {
    findings: Mutex<Vec<Finding>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one file's findings as a single batch, preserving their
    /// relative order even when multiple workers append concurrently.
    pub fn append_batch(&self, batch: Vec<Finding>) {
        if batch.is_empty() {
            return;
        }
        let mut guard = self.findings.lock().unwrap_or_else(|e| e.into_inner());
        guard.extend(batch);
    }

    pub fn count(&self) -> usize {
        self.findings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

/// Full outcome of one scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub repository: String,
    pub scanned_at: String,
    pub summary: Summary,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ScanReport {
    pub fn new(repository: String, findings: Vec<Finding>, warnings: Vec<String>) -> Self {
        Self {
            repository,
            scanned_at: Utc::now().to_rfc3339(),
            summary: Summary::from_findings(&findings),
            findings,
            warnings,
        }
    }
}
