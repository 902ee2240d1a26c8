use crate::config::{PageConfig, SiteConfig, SitesConfig};
use async_trait::async_trait;
use redirgen_core::{Language, LinkResolver, ResolveError, ResolvedLink};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;
use url::Url;

type Result<T> = std::result::Result<T, ResolveError>;

const PAGE_LINK_SCHEME: &str = "t3";
const PAGE_LINK_HOST: &str = "page";

#[derive(Debug, Clone)]
struct SiteLanguage {
    language: Language,
    /// Site base path joined with the language base, always ending in `/`.
    prefix: String,
}

#[derive(Debug, Clone)]
struct Site {
    identifier: String,
    /// Scheme, host and port of the site base.
    origin: String,
    host: String,
    languages: Vec<SiteLanguage>,
    pages: BTreeMap<u64, PageConfig>,
}

impl Site {
    fn from_config(config: SiteConfig) -> Result<Self> {
        let invalid = |message: String| {
            ResolveError::InvalidSiteConfig(format!("site '{}': {message}", config.identifier))
        };

        let base = Url::parse(&config.base)
            .map_err(|e| invalid(format!("invalid base '{}': {e}", config.base)))?;
        let host = base
            .host_str()
            .ok_or_else(|| invalid(format!("base '{}' has no host", config.base)))?
            .to_string();
        let origin = base.origin().ascii_serialization();

        if config.languages.is_empty() {
            return Err(invalid("at least one language is required".to_string()));
        }

        let mut language_ids = HashSet::new();
        let mut languages = Vec::with_capacity(config.languages.len());
        for language in &config.languages {
            if !language_ids.insert(language.id) {
                return Err(invalid(format!("duplicate language id {}", language.id)));
            }
            languages.push(SiteLanguage {
                language: Language {
                    id: language.id,
                    code: language.code.clone(),
                    title: language.title.clone(),
                },
                prefix: directory_path(&format!("{}/{}", base.path(), language.base)),
            });
        }

        let mut pages = BTreeMap::new();
        for page in &config.pages {
            if let Some(code) = page
                .translations
                .keys()
                .find(|code| !languages.iter().any(|l| &l.language.code == *code))
            {
                return Err(invalid(format!(
                    "page {} has a translation for unknown language '{code}'",
                    page.id
                )));
            }
            if pages.insert(page.id, page.clone()).is_some() {
                return Err(invalid(format!("duplicate page id {}", page.id)));
            }
        }

        Ok(Self {
            identifier: config.identifier,
            origin,
            host,
            languages,
            pages,
        })
    }

    fn default_language(&self) -> &SiteLanguage {
        self.languages
            .iter()
            .find(|l| l.language.id == 0)
            .unwrap_or(&self.languages[0])
    }

    fn language_by_id(&self, id: u32) -> Option<&SiteLanguage> {
        self.languages.iter().find(|l| l.language.id == id)
    }

    /// The language whose prefix is the longest match for `path`, together
    /// with the page slug left after the prefix.
    fn match_language(&self, path: &str) -> Option<(&SiteLanguage, String)> {
        self.languages
            .iter()
            .filter_map(|language| {
                let rest = if path == language.prefix.trim_end_matches('/') {
                    ""
                } else {
                    path.strip_prefix(language.prefix.as_str())?
                };
                Some((language, slug_path(rest)))
            })
            .max_by_key(|(language, _)| language.prefix.len())
    }

    fn page_by_slug(&self, language: &SiteLanguage, slug: &str) -> Option<&PageConfig> {
        self.pages
            .values()
            .find(|page| slug_path(page_slug(page, language)) == slug)
    }

    fn link(&self, language: &SiteLanguage, page: &PageConfig) -> String {
        let slug = slug_path(page_slug(page, language));
        format!(
            "{}{}{}",
            self.origin,
            language.prefix,
            slug.trim_start_matches('/')
        )
    }
}

fn page_slug<'a>(page: &'a PageConfig, language: &SiteLanguage) -> &'a str {
    page.translations
        .get(&language.language.code)
        .map(String::as_str)
        .unwrap_or(&page.slug)
}

/// Collapses repeated slashes and makes `path` start and end with `/`.
fn directory_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Collapses repeated slashes and makes `slug` start with `/` and not end
/// with one, except for the root slug.
fn slug_path(slug: &str) -> String {
    let segments: Vec<&str> = slug.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// A reference to a page by id, optionally in a given language.
#[derive(Debug, PartialEq, Eq)]
struct PageReference {
    page_id: u64,
    language_id: Option<u32>,
}

impl PageReference {
    /// Accepts a bare page id (`42`) or a page link (`t3://page?uid=42&L=1`).
    fn parse(raw: &str) -> Option<Self> {
        if let Ok(page_id) = raw.parse::<u64>() {
            return Some(Self {
                page_id,
                language_id: None,
            });
        }

        let url = Url::parse(raw).ok()?;
        if url.scheme() != PAGE_LINK_SCHEME || url.host_str() != Some(PAGE_LINK_HOST) {
            return None;
        }

        let mut page_id = None;
        let mut language_id = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "uid" => page_id = value.parse().ok(),
                "L" => language_id = value.parse().ok(),
                _ => {}
            }
        }

        Some(Self {
            page_id: page_id?,
            language_id,
        })
    }
}

/// Resolves targets against a static description of the installation's sites.
#[derive(Debug, Clone)]
pub struct SiteResolver {
    sites: Vec<Site>,
}

impl SiteResolver {
    /// Builds a resolver, validating the configuration.
    ///
    /// Fails with [`ResolveError::InvalidSiteConfig`] for unparseable base
    /// URLs, sites without languages, duplicate language or page ids and
    /// translations for unknown languages.
    pub fn new(config: SitesConfig) -> Result<Self> {
        let sites = config
            .sites
            .into_iter()
            .map(Site::from_config)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sites })
    }

    /// Loads and validates a TOML site configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(SitesConfig::from_path(path)?)
    }

    /// Resolves a page id, page link or frontend URL to a canonical link.
    pub fn resolve_target(&self, raw_target: &str) -> Result<ResolvedLink> {
        let target = raw_target.trim();
        let unresolvable = || ResolveError::UnresolvableTarget(raw_target.to_string());

        let resolved = match PageReference::parse(target) {
            Some(reference) => self.resolve_reference(&reference),
            None => self.resolve_url(target),
        }
        .ok_or_else(unresolvable)?;

        debug!(
            raw_target,
            page_id = resolved.page_id,
            language = %resolved.language.code,
            link = %resolved.canonical_link,
            "resolved redirect target"
        );
        Ok(resolved)
    }

    fn resolve_reference(&self, reference: &PageReference) -> Option<ResolvedLink> {
        let (site, page) = self
            .sites
            .iter()
            .find_map(|site| Some((site, site.pages.get(&reference.page_id)?)))?;

        let language = match reference.language_id {
            Some(id) => site.language_by_id(id)?,
            None => site.default_language(),
        };

        debug!(site = %site.identifier, page_id = page.id, "matched page reference");
        Some(ResolvedLink {
            canonical_link: site.link(language, page),
            page_id: page.id,
            language: language.language.clone(),
        })
    }

    fn resolve_url(&self, target: &str) -> Option<ResolvedLink> {
        let url = Url::parse(target).ok()?;
        let host = url.host_str()?;
        let origin = url.origin().ascii_serialization();

        self.sites
            .iter()
            .filter(|site| site.host == host && site.origin == origin)
            .find_map(|site| {
                let (language, slug) = site.match_language(url.path())?;
                let page = site.page_by_slug(language, &slug)?;

                let mut canonical_link = site.link(language, page);
                if let Some(query) = url.query().filter(|q| !q.is_empty()) {
                    canonical_link.push('?');
                    canonical_link.push_str(query);
                }

                debug!(site = %site.identifier, page_id = page.id, "matched frontend url");
                Some(ResolvedLink {
                    canonical_link,
                    page_id: page.id,
                    language: language.language.clone(),
                })
            })
    }
}

#[async_trait]
impl LinkResolver for SiteResolver {
    async fn resolve(&self, raw_target: &str) -> Result<ResolvedLink> {
        self.resolve_target(raw_target)
    }
}
