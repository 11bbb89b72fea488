//! Domain errors - the error taxonomy shared by every repository contract
//!
//! Absence is never an error: point lookups return `Option`, listings return
//! an empty `Vec`, and updates/deletes report whether a row was touched.
//! What remains are uniqueness conflicts, broken references, rejected input
//! and infrastructure faults.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Channel name already taken in guild: {0}")]
    ChannelNameTaken(String),

    #[error("Already a member of this guild")]
    AlreadyMember,

    #[error("User is already banned from this guild")]
    AlreadyBanned,

    #[error("Invite code already exists: {0}")]
    InviteCodeExists(String),

    #[error("User is already a recipient of this channel")]
    DuplicateRecipient,

    #[error("A direct message channel already exists between these users")]
    DmChannelExists,

    /// Any other unique constraint, identified by constraint name
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    // =========================================================================
    // Reference Errors
    // =========================================================================
    #[error("Referenced row does not exist: {0}")]
    InvalidReference(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    /// Connectivity, pool exhaustion or I/O. Safe to retry.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            // Conflict
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::ChannelNameTaken(_) => "CHANNEL_NAME_TAKEN",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyBanned => "ALREADY_BANNED",
            Self::InviteCodeExists(_) => "INVITE_CODE_EXISTS",
            Self::DuplicateRecipient => "DUPLICATE_RECIPIENT",
            Self::DmChannelExists => "DM_CHANNEL_EXISTS",
            Self::Conflict(_) => "CONFLICT",

            // Reference
            Self::InvalidReference(_) => "INVALID_REFERENCE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Infrastructure
            Self::Unavailable(_) => "STORAGE_UNAVAILABLE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a uniqueness conflict ("already exists")
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken(_)
                | Self::ChannelNameTaken(_)
                | Self::AlreadyMember
                | Self::AlreadyBanned
                | Self::InviteCodeExists(_)
                | Self::DuplicateRecipient
                | Self::DmChannelExists
                | Self::Conflict(_)
        )
    }

    /// Check if the write pointed at a row that does not exist
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if the failure is transient and the caller may retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::UsernameTaken("alice".to_string());
        assert_eq!(err.code(), "USERNAME_TAKEN");

        let err = DomainError::Unavailable("pool timed out".to_string());
        assert_eq!(err.code(), "STORAGE_UNAVAILABLE");
    }

    #[test]
    fn test_is_conflict() {
        assert!(DomainError::AlreadyMember.is_conflict());
        assert!(DomainError::AlreadyBanned.is_conflict());
        assert!(DomainError::DmChannelExists.is_conflict());
        assert!(DomainError::Conflict("roles_pkey".to_string()).is_conflict());
        assert!(!DomainError::DatabaseError("boom".to_string()).is_conflict());
        assert!(!DomainError::Unavailable("down".to_string()).is_conflict());
    }

    #[test]
    fn test_conflict_is_not_transient() {
        // Callers must be able to tell "already exists" from "try again"
        let conflict = DomainError::AlreadyMember;
        let outage = DomainError::Unavailable("connection refused".to_string());

        assert!(conflict.is_conflict() && !conflict.is_transient());
        assert!(outage.is_transient() && !outage.is_conflict());
    }

    #[test]
    fn test_is_invalid_reference() {
        let err = DomainError::InvalidReference("messages_channel_id_fkey".to_string());
        assert!(err.is_invalid_reference());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::InviteCodeExists("abc123".to_string());
        assert_eq!(err.to_string(), "Invite code already exists: abc123");

        let err = DomainError::ValidationError("need two recipients".to_string());
        assert_eq!(err.to_string(), "Validation error: need two recipients");
    }
}
