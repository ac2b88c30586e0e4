//! GitHub REST v3 content provider.
//!
//! Three endpoints back the [`ContentProvider`] interface:
//! `GET /repos/{repo}/contents/{path}` for directory listings and file
//! content, and `GET /repos/{repo}/git/trees/{sha}?recursive=1` for
//! flat subtree snapshots. Every outgoing request holds a permit from
//! the shared [`RequestLimiter`], so parallel workers cannot exceed the
//! configured in-flight bound.

use super::error::ProviderError;
use super::limiter::RequestLimiter;
use super::{
    ContentProvider, DEFAULT_REQUEST_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS, DirEntry,
    EntryKind, TreeSnapshot,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_ROOT: &str = "https://api.github.com";

pub struct GitHubProvider {
    agent: ureq::Agent,
    api_root: String,
    repo: String,
    token: Option<String>,
    limiter: RequestLimiter,
}

/// Raw contents-API entry. `type` can also be `symlink` or `submodule`,
/// which the traversal has no use for.
#[derive(Debug, Deserialize)]
struct RawContentEntry {
    name: String,
    path: String,
    sha: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    full_name: String,
}

impl GitHubProvider {
    pub fn new(repo: &str, token: Option<String>) -> Self {
        Self::with_settings(
            repo,
            token,
            DEFAULT_REQUEST_CONCURRENCY,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )
    }

    pub fn with_settings(
        repo: &str,
        token: Option<String>,
        max_in_flight: usize,
        timeout_secs: u64,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();
        Self {
            agent,
            api_root: API_ROOT.to_string(),
            repo: repo.to_string(),
            token,
            limiter: RequestLimiter::new(max_in_flight),
        }
    }

    /// Point the provider at a different API root. Used by tests.
    pub fn with_api_root(mut self, root: &str) -> Self {
        self.api_root = root.trim_end_matches('/').to_string();
        self
    }

    /// Resolves the repository, returning its canonical `full_name`.
    /// Separates "repository inaccessible" from later per-path errors.
    pub fn verify_repo(&self) -> Result<String, ProviderError> {
        let url = format!("{}/repos/{}", self.api_root, self.repo);
        let raw: RawRepo = self.get_json(&url)?;
        debug!(repo = %raw.full_name, "Repository resolved");
        Ok(raw.full_name)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let _permit = self.limiter.acquire();
        let mut request = self
            .agent
            .get(url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", concat!("gitrisk/", env!("CARGO_PKG_VERSION")));
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        let response = request.call().map_err(|e| Self::map_error(url, e))?;
        response
            .into_json::<T>()
            .map_err(|e| ProviderError::Transport(format!("invalid response body: {}", e)))
    }

    fn map_error(url: &str, err: ureq::Error) -> ProviderError {
        match err {
            ureq::Error::Status(404, _) => ProviderError::NotFound(url.to_string()),
            ureq::Error::Status(status @ (401 | 403), response) => {
                let remaining = response.header("x-ratelimit-remaining");
                if status == 403 && remaining == Some("0") {
                    ProviderError::RateLimited {
                        reset_at: response.header("x-ratelimit-reset").map(String::from),
                    }
                } else {
                    ProviderError::AccessDenied(url.to_string())
                }
            }
            ureq::Error::Status(status, response) => ProviderError::Http {
                status,
                message: response.status_text().to_string(),
            },
            ureq::Error::Transport(t) => ProviderError::Transport(t.to_string()),
        }
    }
}

impl ContentProvider for GitHubProvider {
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, ProviderError> {
        let url = format!("{}/repos/{}/contents/{}", self.api_root, self.repo, path);
        let raw: Vec<RawContentEntry> = self.get_json(&url)?;
        Ok(raw
            .into_iter()
            .filter_map(|e| {
                let kind = match e.kind.as_str() {
                    "file" => EntryKind::File,
                    "dir" => EntryKind::Dir,
                    other => {
                        debug!(path = %e.path, kind = other, "Skipping unsupported entry kind");
                        return None;
                    }
                };
                Some(DirEntry {
                    name: e.name,
                    path: e.path,
                    sha: e.sha,
                    kind,
                    content: e.content.filter(|c| !c.is_empty()),
                })
            })
            .collect())
    }

    fn recursive_tree(&self, tree_sha: &str) -> Result<TreeSnapshot, ProviderError> {
        let url = format!(
            "{}/repos/{}/git/trees/{}?recursive=1",
            self.api_root, self.repo, tree_sha
        );
        self.get_json(&url)
    }

    fn file_content(&self, path: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/repos/{}/contents/{}", self.api_root, self.repo, path);
        let raw: RawContentEntry = self.get_json(&url)?;

        let encoded = raw.content.ok_or_else(|| ProviderError::Decode {
            path: path.to_string(),
            reason: "no content in response (file too large?)".to_string(),
        })?;
        if let Some(encoding) = &raw.encoding {
            if encoding != "base64" {
                return Err(ProviderError::Decode {
                    path: path.to_string(),
                    reason: format!("unsupported encoding {}", encoding),
                });
            }
        }

        decode_base64_content(path, &encoded)
    }
}

/// Contents-API payloads wrap base64 at 60 columns; strip the
/// whitespace before decoding.
pub fn decode_base64_content(path: &str, encoded: &str) -> Result<Vec<u8>, ProviderError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| ProviderError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
}
