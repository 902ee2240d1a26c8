use redirgen_core::ResolveError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Root of the site configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SitesConfig {
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub identifier: String,
    /// Absolute base URL of the site, e.g. `https://example.com/`.
    pub base: String,
    pub languages: Vec<LanguageConfig>,
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    pub id: u32,
    pub code: String,
    pub title: String,
    /// Path prefix of the language below the site base.
    #[serde(default = "root_path")]
    pub base: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    pub id: u64,
    /// Slug in the default language.
    pub slug: String,
    /// Slugs of translated pages keyed by language code.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

fn root_path() -> String {
    "/".to_string()
}

impl SitesConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ResolveError> {
        toml::from_str(source).map_err(|e| ResolveError::InvalidSiteConfig(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ResolveError::InvalidSiteConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }
}
