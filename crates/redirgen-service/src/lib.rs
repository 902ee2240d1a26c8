//! Adding redirects to the host platform's redirect table.
//!
//! The [`RedirectStore`] owns the duplicate check applied before a redirect
//! is written. [`RedirectGenerator`] puts target resolution in front of it
//! and [`report`] renders the results for the command line.

pub mod error;
pub mod generator;
pub mod report;
pub mod store;

pub use error::{CommandError, RedirectError};
pub use generator::{AddRedirect, AddRedirectReport, RedirectGenerator};
pub use store::RedirectStore;
