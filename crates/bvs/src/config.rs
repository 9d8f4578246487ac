//! Settings store
//!
//! Base URLs and API keys per resource kind, plus the request knobs shared by
//! every kind. Values come from a TOML settings file, then `BVS_*` environment
//! variables, then command-line overrides, each layer replacing the previous.

use crate::prelude::*;
use bvs_core::tables::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_LANGUAGE: &str = bvs_core::multilingual::DEFAULT_LANGUAGE;

/// One upstream endpoint as written in the settings store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Endpoint with every required value present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub base_url: String,
    pub api_key: String,
}

/// Configuration passed explicitly to the client and data functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BvsConfig {
    pub timeout_secs: u64,
    pub verify_tls: bool,
    pub language: String,
    pub cache_ttl_secs: u64,
    pub connectivity_probe: bool,
    /// Shown next to configuration errors
    pub settings_url: Option<String>,
    /// Shared token for endpoints without their own
    pub api_key: Option<String>,
    /// Built-in kinds, keyed by settings key
    pub endpoints: BTreeMap<String, Endpoint>,
    /// Arbitrary-named generic resource lists
    pub resources: BTreeMap<String, Endpoint>,
}

impl Default for BvsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
            language: DEFAULT_LANGUAGE.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            connectivity_probe: true,
            settings_url: None,
            api_key: None,
            endpoints: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }
}

impl BvsConfig {
    /// Default settings file location (`<config dir>/bvs/settings.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("bvs").join("settings.toml"))
    }

    /// Load settings from an explicit file, or from the default location when it exists,
    /// then apply the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(std::env::vars()).map_err(|e| eyre!(e))
    }

    /// Parse a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_toml(&body).map_err(|e| eyre!(e))
    }

    pub fn from_toml(body: &str) -> std::result::Result<Self, Error> {
        toml::from_str(body).map_err(|e| Error::Settings(e.to_string()))
    }

    /// Overlay `BVS_*` variables
    ///
    /// `BVS_<KEY>_URL` and `BVS_<KEY>_API_KEY` target the endpoint whose settings
    /// key is `<KEY>` lower-cased with `_` turned into `-`; unknown keys become
    /// generic resources.
    pub fn apply_env<I>(mut self, vars: I) -> std::result::Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            match name.as_str() {
                "BVS_API_KEY" => self.api_key = Some(value),
                "BVS_LANGUAGE" => self.language = value,
                "BVS_SETTINGS_URL" => self.settings_url = Some(value),
                "BVS_TIMEOUT" => self.timeout_secs = parse_env(&name, &value)?,
                "BVS_VERIFY_TLS" => self.verify_tls = parse_env(&name, &value)?,
                "BVS_CACHE_TTL" => self.cache_ttl_secs = parse_env(&name, &value)?,
                _ => {
                    let Some(rest) = name.strip_prefix("BVS_") else {
                        continue;
                    };
                    if let Some(key) = rest.strip_suffix("_API_KEY") {
                        self.endpoint_entry(key).api_key = Some(value);
                    } else if let Some(key) = rest.strip_suffix("_URL") {
                        self.endpoint_entry(key).base_url = Some(value);
                    }
                }
            }
        }
        Ok(self)
    }

    /// Apply command-line overrides for one kind
    pub fn with_overrides(
        mut self,
        kind: &ResourceKind,
        base_url: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        let entry = self.entry_for(kind);
        if let Some(url) = base_url {
            entry.base_url = Some(url);
        }
        if let Some(key) = api_key {
            entry.api_key = Some(key);
        }
        self
    }

    /// Resolve the endpoint of a kind
    ///
    /// Generic resources are looked up in `resources` first, then in `endpoints`.
    pub fn endpoint(&self, kind: &ResourceKind) -> std::result::Result<ResolvedEndpoint, BvsError> {
        let key = kind.settings_key();
        let entry = match kind {
            ResourceKind::Generic(_) => self.resources.get(key).or_else(|| self.endpoints.get(key)),
            _ => self.endpoints.get(key),
        };

        let base_url = entry
            .and_then(|e| non_empty(e.base_url.as_deref()))
            .ok_or_else(|| BvsError::configuration(key, "base URL is not set"))?;
        let api_key = entry
            .and_then(|e| non_empty(e.api_key.as_deref()))
            .or_else(|| non_empty(self.api_key.as_deref()))
            .ok_or_else(|| BvsError::configuration(key, "API key is not set"))?;

        Ok(ResolvedEndpoint {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint_entry(&mut self, env_key: &str) -> &mut Endpoint {
        let key = env_key.to_lowercase().replace('_', "-");
        let kind = ResourceKind::from_settings_key(&key);
        self.entry_for(&kind)
    }

    fn entry_for(&mut self, kind: &ResourceKind) -> &mut Endpoint {
        let key = kind.settings_key().to_string();
        match kind {
            ResourceKind::Generic(_) => self.resources.entry(key).or_default(),
            _ => self.endpoints.entry(key).or_default(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> std::result::Result<T, Error> {
    value.trim().parse().map_err(|_| Error::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SETTINGS: &str = r#"
language = "pt-br"
timeout_secs = 30
api_key = "shared-token"
settings_url = "/wp-admin/options-general.php?page=bvs"

[endpoints.journals]
base_url = "https://api.example.org/title/v1"

[endpoints.events]
base_url = "https://api.example.org/events/v1"
api_key = "events-token"

[resources.clinical-guides]
base_url = "https://api.example.org/guides/v1"
"#;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = BvsConfig::default();
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.language, "en");
        assert!(config.verify_tls);
        assert!(config.connectivity_probe);
    }

    #[test]
    fn test_from_toml() {
        let config = BvsConfig::from_toml(SETTINGS).unwrap();
        assert_eq!(config.language, "pt-br");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.cache_ttl_secs, DEFAULT_CACHE_TTL_SECS);

        let journals = config.endpoint(&ResourceKind::Journal).unwrap();
        assert_eq!(journals.base_url, "https://api.example.org/title/v1");
        assert_eq!(journals.api_key, "shared-token");

        let events = config.endpoint(&ResourceKind::Event).unwrap();
        assert_eq!(events.api_key, "events-token");

        let guides = config
            .endpoint(&ResourceKind::Generic("clinical-guides".into()))
            .unwrap();
        assert_eq!(guides.base_url, "https://api.example.org/guides/v1");
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = BvsConfig::from_toml("timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Settings(_)));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, SETTINGS).unwrap();

        let config = BvsConfig::from_file(&path).unwrap();
        assert_eq!(config.language, "pt-br");
        assert!(BvsConfig::from_file(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_missing_endpoint_is_configuration_error() {
        let config = BvsConfig::default();
        let err = config.endpoint(&ResourceKind::Legislation).unwrap_err();
        assert_eq!(
            err,
            BvsError::configuration("legislations", "base URL is not set")
        );
    }

    #[test]
    fn test_missing_token_is_configuration_error() {
        let config = BvsConfig::default()
            .apply_env(env(&[("BVS_MULTIMEDIA_URL", "https://m.example")]))
            .unwrap();
        let err = config.endpoint(&ResourceKind::Multimedia).unwrap_err();
        assert_eq!(err, BvsError::configuration("multimedia", "API key is not set"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = BvsConfig::default()
            .apply_env(env(&[("BVS_EVENTS_URL", "  "), ("BVS_API_KEY", "t")]))
            .unwrap();
        assert!(config.endpoint(&ResourceKind::Event).is_err());
    }

    #[test]
    fn test_apply_env_overrides_file() {
        let config = BvsConfig::from_toml(SETTINGS)
            .unwrap()
            .apply_env(env(&[
                ("BVS_JOURNALS_URL", "https://override.example/title"),
                ("BVS_WEB_RESOURCES_URL", "https://lis.example"),
                ("BVS_WEB_RESOURCES_API_KEY", "lis-token"),
                ("BVS_BIBLIOGRAPHIC_DATABASES_URL", "https://db.example"),
                ("BVS_NURSING_GUIDES_URL", "https://guides.example"),
                ("BVS_LANGUAGE", "es"),
                ("BVS_TIMEOUT", "5"),
                ("HOME", "/root"),
            ]))
            .unwrap();

        assert_eq!(config.language, "es");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(
            config.endpoint(&ResourceKind::Journal).unwrap().base_url,
            "https://override.example/title"
        );
        assert_eq!(
            config.endpoint(&ResourceKind::WebResource).unwrap(),
            ResolvedEndpoint {
                base_url: "https://lis.example".into(),
                api_key: "lis-token".into()
            }
        );
        assert!(config.endpoints.contains_key("bibliographic-databases"));
        assert!(config.resources.contains_key("nursing-guides"));
    }

    #[test]
    fn test_apply_env_invalid_number() {
        let err = BvsConfig::default()
            .apply_env(env(&[("BVS_TIMEOUT", "fast")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { .. }));
    }

    #[test]
    fn test_with_overrides() {
        let kind = ResourceKind::Legislation;
        let config = BvsConfig::default().with_overrides(
            &kind,
            Some("https://leisref.example".into()),
            Some("cli-token".into()),
        );
        let endpoint = config.endpoint(&kind).unwrap();
        assert_eq!(endpoint.base_url, "https://leisref.example");
        assert_eq!(endpoint.api_key, "cli-token");
    }
}
