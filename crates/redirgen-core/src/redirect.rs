use crate::config::StatusCode;
use jiff::Timestamp;

/// `creation_type` tag marking redirects created by this tool.
pub const CREATION_TYPE: u32 = 6332;

/// `source_host` value matching any host.
pub const WILDCARD_HOST: &str = "*";

/// Primary key of a stored redirect.
pub type RedirectId = u64;

/// Behavioural switches stored alongside a redirect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectFlags {
    pub keep_query_parameters: bool,
    pub is_regexp: bool,
    pub force_https: bool,
    pub disable_hitcount: bool,
    pub respect_query_parameters: bool,
}

/// A redirect row of the host platform's redirect table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub id: RedirectId,
    /// A host name or [`WILDCARD_HOST`].
    pub source_host: String,
    /// Path and query of the source URL.
    pub source_path: String,
    pub target: String,
    pub status_code: StatusCode,
    pub flags: RedirectFlags,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub creation_type: u32,
}

impl Redirect {
    pub fn is_wildcard_host(&self) -> bool {
        self.source_host == WILDCARD_HOST
    }

    /// The source rendered as `host/path`, or just the path for wildcard hosts.
    pub fn source(&self) -> String {
        if self.is_wildcard_host() {
            self.source_path.clone()
        } else {
            format!("{}{}", self.source_host, self.source_path)
        }
    }
}

/// Insert payload for a new redirect row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRedirect {
    pub source_host: String,
    pub source_path: String,
    pub target: String,
    pub status_code: StatusCode,
    pub flags: RedirectFlags,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub creation_type: u32,
}

impl NewRedirect {
    pub fn into_redirect(self, id: RedirectId) -> Redirect {
        Redirect {
            id,
            source_host: self.source_host,
            source_path: self.source_path,
            target: self.target,
            status_code: self.status_code,
            flags: self.flags,
            created_at: self.created_at,
            updated_at: self.updated_at,
            creation_type: self.creation_type,
        }
    }
}

/// The fields an overwrite replaces on an existing row.
///
/// Identity (`id`, source) and `created_at` are never part of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUpdate {
    pub target: String,
    pub status_code: StatusCode,
    pub flags: RedirectFlags,
    pub updated_at: Timestamp,
}

impl RedirectUpdate {
    pub fn apply_to(self, redirect: &mut Redirect) {
        redirect.target = self.target;
        redirect.status_code = self.status_code;
        redirect.flags = self.flags;
        redirect.updated_at = self.updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect(host: &str) -> Redirect {
        NewRedirect {
            source_host: host.to_string(),
            source_path: "/old?x=1".to_string(),
            target: "https://example.com/new".to_string(),
            status_code: StatusCode::MovedPermanently,
            flags: RedirectFlags::default(),
            created_at: Timestamp::from_second(100).unwrap(),
            updated_at: Timestamp::from_second(100).unwrap(),
            creation_type: CREATION_TYPE,
        }
        .into_redirect(7)
    }

    #[test]
    fn source_rendering() {
        assert_eq!(redirect(WILDCARD_HOST).source(), "/old?x=1");
        assert_eq!(redirect("example.com").source(), "example.com/old?x=1");
    }

    #[test]
    fn update_keeps_identity_and_creation_time() {
        let mut row = redirect(WILDCARD_HOST);
        RedirectUpdate {
            target: "https://example.com/other".to_string(),
            status_code: StatusCode::Found,
            flags: RedirectFlags {
                force_https: true,
                ..RedirectFlags::default()
            },
            updated_at: Timestamp::from_second(200).unwrap(),
        }
        .apply_to(&mut row);

        assert_eq!(row.id, 7);
        assert_eq!(row.source_path, "/old?x=1");
        assert_eq!(row.created_at, Timestamp::from_second(100).unwrap());
        assert_eq!(row.updated_at, Timestamp::from_second(200).unwrap());
        assert_eq!(row.target, "https://example.com/other");
        assert_eq!(row.status_code, StatusCode::Found);
        assert!(row.flags.force_https);
    }
}
