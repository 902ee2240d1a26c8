use crate::error::{CoreError, Result};
use crate::redirect::RedirectFlags;
use std::fmt::Display;
use typed_builder::TypedBuilder;

/// HTTP status codes a redirect may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusCode {
    MovedPermanently,
    Found,
    SeeOther,
    #[default]
    TemporaryRedirect,
}

impl StatusCode {
    pub const ALLOWED: [StatusCode; 4] = [
        StatusCode::MovedPermanently,
        StatusCode::Found,
        StatusCode::SeeOther,
        StatusCode::TemporaryRedirect,
    ];

    pub fn as_u16(self) -> u16 {
        match self {
            StatusCode::MovedPermanently => 301,
            StatusCode::Found => 302,
            StatusCode::SeeOther => 303,
            StatusCode::TemporaryRedirect => 307,
        }
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = CoreError;

    fn try_from(code: u16) -> Result<Self> {
        Self::ALLOWED
            .into_iter()
            .find(|status| status.as_u16() == code)
            .ok_or(CoreError::InvalidStatusCode(code))
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.as_u16()
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Options applied when a redirect is created or overwritten.
///
/// Built once per invocation. A raw status code is only accepted through
/// [`Configuration::build`] or [`StatusCode::try_from`], so an existing
/// configuration always carries an allowed status code.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct Configuration {
    /// Replace the target of an existing redirect for the same source.
    #[builder(default)]
    pub overwrite_existing: bool,
    #[builder(default)]
    pub target_status_code: StatusCode,
    #[builder(default)]
    pub keep_query_parameters: bool,
    #[builder(default)]
    pub is_regexp: bool,
    #[builder(default)]
    pub force_https: bool,
    #[builder(default)]
    pub disable_hitcount: bool,
    #[builder(default)]
    pub respect_query_parameters: bool,
}

impl Configuration {
    /// Creates a configuration with all flags unset.
    ///
    /// Fails with [`CoreError::InvalidStatusCode`] unless `status_code` is
    /// one of 301, 302, 303 or 307.
    pub fn build(status_code: u16, overwrite_existing: bool) -> Result<Self> {
        let target_status_code = StatusCode::try_from(status_code)?;
        Ok(Self::builder()
            .overwrite_existing(overwrite_existing)
            .target_status_code(target_status_code)
            .build())
    }

    pub fn flags(&self) -> RedirectFlags {
        RedirectFlags {
            keep_query_parameters: self.keep_query_parameters,
            is_regexp: self.is_regexp,
            force_https: self.force_https,
            disable_hitcount: self.disable_hitcount,
            respect_query_parameters: self.respect_query_parameters,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::builder().build()
    }
}
