//! Site configuration read from `config.json`.

use std::path::Path;

use serde::Deserialize;

use crate::config::StartupMode;
use crate::error::LoadError;

/// Display values shown on the public pages.
///
/// ```json
/// { "Greeting": "Hello", "Username": "howie", "DeviceModel": "S9" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(rename = "Greeting", alias = "greeting")]
    pub greeting: String,

    #[serde(rename = "Username", alias = "username")]
    pub username: String,

    #[serde(rename = "DeviceModel", alias = "deviceModel", alias = "device_model")]
    pub device_model: String,
}

impl SiteConfig {
    /// Parse the site JSON at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`, falling back to empty values in [`StartupMode::Degrade`].
    pub fn load_with_mode(path: &Path, mode: StartupMode) -> Result<Self, LoadError> {
        let site = match Self::load(path) {
            Ok(site) => site,
            Err(err) if mode == StartupMode::Degrade => {
                tracing::warn!(error = %err, "site config unavailable, using empty values");
                Self::default()
            }
            Err(err) => return Err(err),
        };

        tracing::info!(
            greeting = %site.greeting,
            username = %site.username,
            device_model = %site.device_model,
            "site config loaded"
        );

        Ok(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_pascal_case_keys() {
        let file = write_json(
            r#"{"Greeting": "Welcome", "Username": "howie", "DeviceModel": "Antminer S9"}"#,
        );
        let site = SiteConfig::load(file.path()).unwrap();
        assert_eq!(site.greeting, "Welcome");
        assert_eq!(site.username, "howie");
        assert_eq!(site.device_model, "Antminer S9");
    }

    #[test]
    fn accepts_lowercase_keys_and_missing_fields() {
        let file = write_json(r#"{"greeting": "hi", "extra": 5}"#);
        let site = SiteConfig::load(file.path()).unwrap();
        assert_eq!(site.greeting, "hi");
        assert_eq!(site.username, "");
        assert_eq!(site.device_model, "");
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let site = SiteConfig::load_with_mode(&path, StartupMode::Degrade).unwrap();
        assert_eq!(site, SiteConfig::default());
    }

    #[test]
    fn missing_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let err = SiteConfig::load_with_mode(&path, StartupMode::FailFast).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn invalid_json_degrades_or_fails() {
        let file = write_json("{ not json");
        assert_eq!(
            SiteConfig::load_with_mode(file.path(), StartupMode::Degrade).unwrap(),
            SiteConfig::default()
        );
        assert!(matches!(
            SiteConfig::load_with_mode(file.path(), StartupMode::FailFast),
            Err(LoadError::Json { .. })
        ));
    }
}
