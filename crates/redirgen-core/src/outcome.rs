use crate::redirect::Redirect;

/// The terminal state of adding a redirect.
///
/// Every variant is a regular result of the duplicate check. Only
/// [`Outcome::Conflict`] represents a rejected write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry run: no redirect exists for the source, one would be created.
    WouldCreate,
    /// A new redirect row was inserted.
    Created(Redirect),
    /// Dry run: the existing redirect would be overwritten.
    WouldOverwrite { existing: Redirect },
    /// The existing row was updated in place.
    Overwritten { previous: Redirect, current: Redirect },
    /// A redirect with a different target exists and overwriting is disabled.
    Conflict { existing: Redirect },
    /// A redirect with the same target exists already.
    AlreadyPresent { existing: Redirect },
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Conflict { .. })
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Outcome::WouldCreate | Outcome::WouldOverwrite { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatusCode;
    use crate::redirect::{RedirectFlags, CREATION_TYPE, WILDCARD_HOST};
    use jiff::Timestamp;

    fn row() -> Redirect {
        Redirect {
            id: 1,
            source_host: WILDCARD_HOST.to_string(),
            source_path: "/old".to_string(),
            target: "https://example.com/new".to_string(),
            status_code: StatusCode::TemporaryRedirect,
            flags: RedirectFlags::default(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            creation_type: CREATION_TYPE,
        }
    }

    #[test]
    fn only_conflict_is_rejected() {
        assert!(Outcome::Conflict { existing: row() }.is_rejected());
        assert!(!Outcome::WouldCreate.is_rejected());
        assert!(!Outcome::Created(row()).is_rejected());
        assert!(!Outcome::AlreadyPresent { existing: row() }.is_rejected());
        assert!(!Outcome::Overwritten {
            previous: row(),
            current: row()
        }
        .is_rejected());
    }

    #[test]
    fn dry_run_variants() {
        assert!(Outcome::WouldCreate.is_dry_run());
        assert!(Outcome::WouldOverwrite { existing: row() }.is_dry_run());
        assert!(!Outcome::Created(row()).is_dry_run());
        assert!(!Outcome::Conflict { existing: row() }.is_dry_run());
    }
}
