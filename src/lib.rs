pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod findings;
pub mod handlers;
pub mod provider;
pub mod reporter;
pub mod resolver;
pub mod scan;
pub mod signatures;
pub mod traversal;

#[cfg(test)]
pub mod test_utils;

pub use audit::AuditEngine;
pub use cli::{Cli, Command, OutputFormat};
pub use config::{PolicyConfig, SignatureDefs};
pub use error::{AuditError, Result};
pub use findings::{Finding, ResultStore, RiskLevel, ScanReport, Summary};
pub use provider::{ContentProvider, GitHubProvider, ProviderError};
pub use reporter::{Reporter, json::JsonReporter, terminal::TerminalReporter};
pub use resolver::ContentResolver;
pub use scan::{CancelToken, ScanOptions, run_scan};
pub use signatures::SignatureStore;
pub use traversal::{FileRef, ScanWarning, TraversalEngine};
