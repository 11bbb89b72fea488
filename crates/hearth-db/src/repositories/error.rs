//! Error handling utilities for repositories
//!
//! Storage faults are sorted into the domain taxonomy: uniqueness conflicts,
//! broken references, rejected input, transient outages and everything else.

use hearth_core::error::DomainError;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::Error as SqlxError;

/// SQLSTATEs that clear up on their own: connection exceptions (class 08),
/// admin/crash shutdown, too many connections, serialization failure and
/// deadlock.
fn is_transient_sqlstate(code: &str) -> bool {
    code.starts_with("08")
        || matches!(code, "57P01" | "57P02" | "57P03" | "53300" | "40001" | "40P01")
}

fn constraint_label(db_err: &dyn DatabaseError) -> String {
    db_err
        .constraint()
        .map_or_else(|| db_err.message().to_string(), str::to_string)
}

fn map_database_error(db_err: &dyn DatabaseError) -> DomainError {
    if let Some(code) = db_err.code() {
        if is_transient_sqlstate(&code) {
            return DomainError::Unavailable(db_err.message().to_string());
        }
    }

    match db_err.kind() {
        ErrorKind::UniqueViolation => DomainError::Conflict(constraint_label(db_err)),
        ErrorKind::ForeignKeyViolation => DomainError::InvalidReference(constraint_label(db_err)),
        ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
            DomainError::ValidationError(constraint_label(db_err))
        }
        _ => DomainError::DatabaseError(db_err.message().to_string()),
    }
}

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    match &e {
        SqlxError::Database(db_err) => map_database_error(db_err.as_ref()),
        SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::WorkerCrashed => DomainError::Unavailable(e.to_string()),
        _ => DomainError::DatabaseError(e.to_string()),
    }
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Name of the constraint a database error tripped, if any
pub fn violated_constraint(e: &SqlxError) -> Option<&str> {
    e.as_database_error().and_then(|db_err| db_err.constraint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;
    use std::io;

    #[derive(Debug)]
    struct FakeDbError {
        code: &'static str,
        kind: ErrorKind,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake error {}", self.code)
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                ErrorKind::NotNullViolation => ErrorKind::NotNullViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(code: &'static str, kind: ErrorKind, constraint: Option<&'static str>) -> SqlxError {
        SqlxError::Database(Box::new(FakeDbError {
            code,
            kind,
            constraint,
        }))
    }

    #[test]
    fn test_transient_sqlstates() {
        for code in ["08000", "08006", "57P01", "57P03", "53300", "40001", "40P01"] {
            assert!(is_transient_sqlstate(code), "{code} should be transient");
        }
        for code in ["23505", "23503", "42P01", "57014"] {
            assert!(!is_transient_sqlstate(code), "{code} should not be transient");
        }
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = map_db_error(db_error(
            "23505",
            ErrorKind::UniqueViolation,
            Some("roles_guild_default_key"),
        ));

        assert!(err.is_conflict());
        assert!(!err.is_transient());
        assert!(matches!(err, DomainError::Conflict(ref c) if c == "roles_guild_default_key"));
    }

    #[test]
    fn test_foreign_key_violation_is_invalid_reference() {
        let err = map_db_error(db_error(
            "23503",
            ErrorKind::ForeignKeyViolation,
            Some("guilds_owner_id_fkey"),
        ));
        assert!(err.is_invalid_reference());
    }

    #[test]
    fn test_check_and_not_null_are_validation() {
        let check = map_db_error(db_error(
            "23514",
            ErrorKind::CheckViolation,
            Some("dm_channels_pair_check"),
        ));
        let not_null = map_db_error(db_error("23502", ErrorKind::NotNullViolation, None));

        assert!(check.is_validation());
        assert!(not_null.is_validation());
    }

    #[test]
    fn test_connection_failures_are_transient() {
        let shutdown = map_db_error(db_error("57P01", ErrorKind::Other, None));
        assert!(shutdown.is_transient());

        let deadlock = map_db_error(db_error("40P01", ErrorKind::Other, None));
        assert!(deadlock.is_transient());

        assert!(map_db_error(SqlxError::PoolTimedOut).is_transient());
        assert!(map_db_error(SqlxError::PoolClosed).is_transient());
        assert!(map_db_error(SqlxError::WorkerCrashed).is_transient());

        let io = SqlxError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(map_db_error(io).is_transient());
    }

    #[test]
    fn test_other_failures_are_database_errors() {
        let err = map_db_error(db_error("42P01", ErrorKind::Other, None));
        assert!(matches!(err, DomainError::DatabaseError(_)));
        assert!(!err.is_transient());

        assert!(matches!(map_db_error(SqlxError::RowNotFound), DomainError::DatabaseError(_)));
    }

    #[test]
    fn test_map_unique_violation_uses_call_site_variant() {
        let err = map_unique_violation(
            db_error("23505", ErrorKind::UniqueViolation, Some("bans_pkey")),
            || DomainError::AlreadyBanned,
        );
        assert!(matches!(err, DomainError::AlreadyBanned));

        // Anything else falls through to the general classification
        let err = map_unique_violation(
            db_error("23503", ErrorKind::ForeignKeyViolation, Some("bans_user_id_fkey")),
            || DomainError::AlreadyBanned,
        );
        assert!(err.is_invalid_reference());

        let err = map_unique_violation(SqlxError::PoolTimedOut, || DomainError::AlreadyBanned);
        assert!(err.is_transient());
    }

    #[test]
    fn test_violated_constraint() {
        let e = db_error("23505", ErrorKind::UniqueViolation, Some("dm_channels_pair_key"));
        assert_eq!(violated_constraint(&e), Some("dm_channels_pair_key"));

        assert_eq!(violated_constraint(&SqlxError::PoolClosed), None);
    }
}
