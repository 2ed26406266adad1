//! Persisted API secrets (`secrets.toml`) and API-key precedence.
//!
//! ```toml
//! GOOGLE_API_KEY = "..."
//! ```

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Contents of `secrets.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Secrets {
    #[serde(rename = "GOOGLE_API_KEY", default)]
    pub google_api_key: Option<String>,
}

impl Secrets {
    /// Load from `path`; a missing file yields empty secrets.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Pick the API key for this session.
///
/// Precedence: per-session override (flag or environment), then the key in
/// `settings.toml`, then `secrets.toml`. Blank values are skipped.
pub fn resolve_api_key(
    session_override: Option<&str>,
    configured: Option<&str>,
    secrets: &Secrets,
) -> Option<String> {
    [session_override, configured, secrets.google_api_key.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn secrets(key: Option<&str>) -> Secrets {
        Secrets {
            google_api_key: key.map(str::to_string),
        }
    }

    #[test]
    fn override_wins() {
        let key = resolve_api_key(Some("flag"), Some("config"), &secrets(Some("secret")));
        assert_eq!(key.as_deref(), Some("flag"));
    }

    #[test]
    fn blank_override_falls_through() {
        let key = resolve_api_key(Some("  "), None, &secrets(Some("secret")));
        assert_eq!(key.as_deref(), Some("secret"));
    }

    #[test]
    fn config_before_secrets() {
        let key = resolve_api_key(None, Some("config"), &secrets(Some("secret")));
        assert_eq!(key.as_deref(), Some("config"));
    }

    #[test]
    fn nothing_configured() {
        assert_eq!(resolve_api_key(None, Some(""), &secrets(None)), None);
    }

    #[test]
    fn loads_secrets_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GOOGLE_API_KEY = \"abc123\"\n").expect("write");

        let loaded = Secrets::load_from(&path).expect("load");
        assert_eq!(loaded.google_api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_secrets_file_is_empty() {
        let dir = tempdir().expect("temp dir");
        let loaded = Secrets::load_from(&dir.path().join("secrets.toml")).expect("load");
        assert!(loaded.google_api_key.is_none());
    }
}
