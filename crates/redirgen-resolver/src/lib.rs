//! Resolution of redirect targets against the host platform's site tree.
//!
//! The [`SiteResolver`] reads a TOML description of the sites, languages
//! and page slugs of an installation and turns page ids, page links
//! (`t3://page?uid=42`) or frontend URLs into canonical links.
//!
//! ```toml
//! [[sites]]
//! identifier = "main"
//! base = "https://example.com/"
//!
//! [[sites.languages]]
//! id = 0
//! code = "en"
//! title = "English"
//! base = "/"
//!
//! [[sites.languages]]
//! id = 1
//! code = "de"
//! title = "German"
//! base = "/de/"
//!
//! [[sites.pages]]
//! id = 42
//! slug = "/about"
//! translations = { de = "/ueber-uns" }
//! ```

pub mod config;
pub mod site;

pub use config::{LanguageConfig, PageConfig, SiteConfig, SitesConfig};
pub use site::SiteResolver;
