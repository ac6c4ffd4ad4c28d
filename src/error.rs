//! Error types for geodir operations.

use crate::types::{ActivityId, BuildingId, OrganizationId};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Errors produced by directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A referenced building id does not exist.
    #[error("building {0} not found")]
    BuildingNotFound(BuildingId),

    /// A referenced activity id does not exist.
    #[error("activity {0} not found")]
    ActivityNotFound(ActivityId),

    /// A referenced organization id does not exist.
    #[error("organization {0} not found")]
    OrganizationNotFound(OrganizationId),

    /// Building addresses are unique; the given address is already taken.
    #[error("building address '{0}' already in use")]
    DuplicateAddress(String),

    /// The activity parent graph contains a cycle. The offending id is the
    /// node that was reached a second time during closure traversal.
    #[error("activity hierarchy is corrupt: cycle through activity {0}")]
    CorruptHierarchy(ActivityId),

    /// Malformed input rejected at the store boundary.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with a message.
    #[error("{0}")]
    Other(String),
}
