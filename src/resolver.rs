//! Lazy file content materialization.
//!
//! Native entries from a direct listing sometimes carry embedded
//! base64 content; those decode in place with no network round trip.
//! Everything else costs one content fetch by path. Either way the
//! result is decoded UTF-8 text; binary files fail per-file with
//! `ContentUnavailable` and never abort the run.

use crate::error::{AuditError, Result};
use crate::provider::github::decode_base64_content;
use crate::provider::ContentProvider;
use crate::traversal::FileRef;
use tracing::debug;

pub struct ContentResolver<'a> {
    provider: &'a dyn ContentProvider,
}

impl<'a> ContentResolver<'a> {
    pub fn new(provider: &'a dyn ContentProvider) -> Self {
        Self { provider }
    }

    pub fn resolve(&self, file: &FileRef) -> Result<String> {
        let path = file.path();

        let bytes = match file.embedded_content() {
            Some(encoded) => {
                decode_base64_content(path, encoded).map_err(|e| unavailable(path, &e))?
            }
            None => {
                debug!(path, "Fetching content");
                self.provider
                    .file_content(path)
                    .map_err(|e| unavailable(path, &e))?
            }
        };

        String::from_utf8(bytes).map_err(|_| AuditError::ContentUnavailable {
            path: path.to_string(),
            reason: "content is not valid UTF-8".to_string(),
        })
    }
}

fn unavailable(path: &str, err: &dyn std::fmt::Display) -> AuditError {
    AuditError::ContentUnavailable {
        path: path.to_string(),
        reason: err.to_string(),
    }
}
