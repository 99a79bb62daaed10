//! Loading the tip document.
//!
//! The document is read once, in full, from a file path or an http(s) URL
//! and parsed as JSON. Redistribution only ever sees a completely parsed
//! document.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::domain::RawTip;

/// Message shown to the user for any load failure
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load tips. Please refresh the page.";

/// Errors that can occur while loading the document
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O, network, size cap, or non-success HTTP status
    #[error("Failed to load tips from {location}: {reason}")]
    Load { location: String, reason: String },

    /// Body is not a valid tip document
    #[error("Failed to parse tips from {location}: {error}")]
    Parse {
        location: String,
        #[source]
        error: serde_json::Error,
    },
}

impl LoadError {
    fn load(location: &Source, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this is a parse failure (as opposed to a read failure)
    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse { .. })
    }
}

/// Where the tip document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Local file
    Path(PathBuf),

    /// http(s) URL
    Url(String),
}

impl Source {
    /// Interpret a location string: http(s) URLs are fetched, anything else
    /// is a path (a leading `~/` expands to the home directory)
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Source::Url(trimmed.to_string());
        }

        if let Some(rest) = trimmed.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return Source::Path(home.join(rest));
            }
        }

        Source::Path(PathBuf::from(trimmed))
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Limits applied while loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// HTTP request timeout in seconds (default: 10)
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,

    /// Maximum document size in bytes (default: 5MB)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_http_timeout() -> u64 {
    10
}
fn default_max_bytes() -> usize {
    5 * 1024 * 1024
} // 5MB

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            http_timeout_seconds: default_http_timeout(),
            max_bytes: default_max_bytes(),
        }
    }
}

/// A fully parsed tip document
#[derive(Debug, Clone)]
pub struct LoadedTips {
    pub tips: Vec<RawTip>,

    /// Where the document came from
    pub source: Source,

    pub loaded_at: DateTime<Utc>,
}

/// Read and parse the tip document
#[instrument(skip_all, fields(source = %source))]
pub async fn load(source: &Source, settings: &LoaderSettings) -> Result<LoadedTips, LoadError> {
    let body = match source {
        Source::Path(path) => read_file(source, path, settings).await?,
        Source::Url(url) => fetch(source, url, settings).await?,
    };
    debug!(bytes = body.len(), "Read tip document");

    let tips = parse(source, &body)?;
    info!(tips = tips.len(), "Loaded tips");

    Ok(LoadedTips {
        tips,
        source: source.clone(),
        loaded_at: Utc::now(),
    })
}

/// Parse a tip document body
pub fn parse(source: &Source, body: &[u8]) -> Result<Vec<RawTip>, LoadError> {
    serde_json::from_slice(body).map_err(|error| LoadError::Parse {
        location: source.to_string(),
        error,
    })
}

fn check_size(source: &Source, len: u64, settings: &LoaderSettings) -> Result<(), LoadError> {
    if len > settings.max_bytes as u64 {
        return Err(LoadError::load(
            source,
            format!("document is {} bytes (limit {})", len, settings.max_bytes),
        ));
    }
    Ok(())
}

async fn read_file(source: &Source, path: &Path, settings: &LoaderSettings) -> Result<Vec<u8>, LoadError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| LoadError::load(source, e))?;
    check_size(source, metadata.len(), settings)?;

    let body = tokio::fs::read(path)
        .await
        .map_err(|e| LoadError::load(source, e))?;

    // The file may have grown since the metadata check
    check_size(source, body.len() as u64, settings)?;
    Ok(body)
}

async fn fetch(source: &Source, url: &str, settings: &LoaderSettings) -> Result<Vec<u8>, LoadError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.http_timeout_seconds))
        .build()
        .map_err(|e| LoadError::load(source, e))?;

    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LoadError::load(source, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::load(source, format!("HTTP error! status: {}", status)));
    }

    if let Some(len) = response.content_length() {
        check_size(source, len, settings)?;
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| LoadError::load(source, e))?
    {
        body.extend_from_slice(&chunk);
        check_size(source, body.len() as u64, settings)?;
    }

    Ok(body)
}
