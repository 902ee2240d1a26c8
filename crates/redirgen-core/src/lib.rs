//! Core types and traits for the redirect generator.
//!
//! This crate provides the shared model (redirect rows, configuration,
//! decision outcomes) and the seams to the host platform: the row store
//! ([`Repository`]) and the link resolver ([`LinkResolver`]).

pub mod clock;
pub mod config;
pub mod error;
pub mod outcome;
pub mod redirect;
pub mod repository;
pub mod resolver;
pub mod url_info;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Configuration, StatusCode};
pub use error::{CoreError, ResolveError, StorageError};
pub use outcome::Outcome;
pub use redirect::{
    NewRedirect, Redirect, RedirectFlags, RedirectId, RedirectUpdate, CREATION_TYPE, WILDCARD_HOST,
};
pub use repository::{ReadRepository, Repository};
pub use resolver::{Language, LinkResolver, ResolvedLink};
pub use url_info::UrlInfo;
