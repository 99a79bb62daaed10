//! Configuration for the cheatsheet.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CHEATSHEET_SOURCE, CHEATSHEET_OUTPUT)
//! 2. Config file (.cheatsheet/config.yaml)
//! 3. Defaults (./data/tips.json, stdout)
//!
//! Config file discovery:
//! - Searches current directory and parents for .cheatsheet/config.yaml
//! - Relative paths in the config file are relative to the directory
//!   containing .cheatsheet/

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::loader::{LoaderSettings, Source};
use crate::view::NavigationSettings;

/// Default location of the tip document
pub const DEFAULT_SOURCE: &str = "./data/tips.json";

pub const ENV_SOURCE: &str = "CHEATSHEET_SOURCE";
pub const ENV_OUTPUT: &str = "CHEATSHEET_OUTPUT";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub page: Option<PageConfig>,
    #[serde(default)]
    pub navigation: Option<NavigationSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Tip document path or http(s) URL
    pub source: Option<String>,
    /// Where `render` writes the page
    pub output: Option<String>,
    #[serde(default)]
    pub loader: Option<LoaderSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub title: Option<String>,
    pub contribute_href: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Tip document location
    pub source: Source,
    /// Output file for rendered pages (stdout if None)
    pub output: Option<PathBuf>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub loader: LoaderSettings,
    pub navigation: NavigationSettings,
    pub page_title: Option<String>,
    pub contribute_href: Option<String>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".cheatsheet").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a source location from the config file; URLs and absolute paths
/// are kept, relative paths are joined onto `base`
fn resolve_source(base: &Path, location: &str) -> Source {
    match Source::parse(location) {
        Source::Path(path) if path.is_relative() => Source::Path(base.join(path)),
        other => other,
    }
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Build configuration from an optional config file and env overrides
fn resolve(
    config_file: Option<PathBuf>,
    env_source: Option<String>,
    env_output: Option<String>,
) -> Result<ResolvedConfig> {
    let file = config_file
        .as_deref()
        .map(load_config_file)
        .transpose()?;

    // Base directory is the parent of .cheatsheet/
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let source = match (&env_source, file.as_ref().and_then(|f| f.data.source.as_deref())) {
        (Some(location), _) => Source::parse(location),
        (None, Some(location)) => resolve_source(&base_dir, location),
        (None, None) => Source::parse(DEFAULT_SOURCE),
    };

    let output = match (&env_output, file.as_ref().and_then(|f| f.data.output.as_deref())) {
        (Some(path), _) => Some(PathBuf::from(path)),
        (None, Some(path)) => Some(resolve_path(&base_dir, path)),
        (None, None) => None,
    };

    let loader = file
        .as_ref()
        .and_then(|f| f.data.loader.clone())
        .unwrap_or_default();

    let navigation = file
        .as_ref()
        .and_then(|f| f.navigation.clone())
        .unwrap_or_default();

    let page = file.as_ref().and_then(|f| f.page.clone());

    Ok(ResolvedConfig {
        source,
        output,
        config_file,
        loader,
        navigation,
        page_title: page.as_ref().and_then(|p| p.title.clone()),
        contribute_href: page.and_then(|p| p.contribute_href),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve(
        find_config_file(),
        std::env::var(ENV_SOURCE).ok(),
        std::env::var(ENV_OUTPUT).ok(),
    )
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, yaml: &str) -> PathBuf {
        let dir = temp.path().join(".cheatsheet");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", yaml).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, None, None).unwrap();

        assert_eq!(config.source, Source::parse(DEFAULT_SOURCE));
        assert!(config.output.is_none());
        assert!(config.config_file.is_none());
        assert_eq!(config.navigation.expand_delay_ms, 300);
        assert_eq!(config.loader.http_timeout_seconds, 10);
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
data:
  source: data/tips.json
  output: site/index.html
  loader:
    max_bytes: 1024
page:
  title: Team Tips
navigation:
  highlight_ms: 1500
"#,
        );

        let config = resolve(Some(path), None, None).unwrap();
        assert_eq!(config.source, Source::Path(temp.path().join("data/tips.json")));
        assert_eq!(config.output, Some(temp.path().join("site/index.html")));
        assert_eq!(config.loader.max_bytes, 1024);
        assert_eq!(config.loader.http_timeout_seconds, 10);
        assert_eq!(config.navigation.highlight_ms, 1500);
        assert_eq!(config.page_title.as_deref(), Some("Team Tips"));
    }

    #[test]
    fn test_minimal_config_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
data:
  source: data/tips.json
"#,
        );

        let config = resolve(Some(path), None, None).unwrap();
        assert_eq!(config.source, Source::Path(temp.path().join("data/tips.json")));
        assert!(config.output.is_none());
        assert!(config.page_title.is_none());
        assert_eq!(config.navigation.scroll_delay_ms, 400);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
data:
  source: data/tips.json
"#,
        );

        let config = resolve(
            Some(path),
            Some("https://example.com/tips.json".to_string()),
            Some("/tmp/out.html".to_string()),
        )
        .unwrap();

        assert_eq!(config.source, Source::Url("https://example.com/tips.json".to_string()));
        assert_eq!(config.output, Some(PathBuf::from("/tmp/out.html")));
    }

    #[test]
    fn test_url_source_in_file_is_kept() {
        let base = PathBuf::from("/project");
        assert_eq!(
            resolve_source(&base, "https://example.com/tips.json"),
            Source::Url("https://example.com/tips.json".to_string())
        );
        assert_eq!(
            resolve_source(&base, "/abs/tips.json"),
            Source::Path(PathBuf::from("/abs/tips.json"))
        );
    }
}
