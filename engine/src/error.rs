//! Error types for the fleet engine.

use crate::{CrewMemberId, ShipId};
use thiserror::Error;

/// All possible errors from the fleet engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("incorrect role: {0}")]
    InvalidRole(String),

    #[error("invalid query parameter '{param}': {reason}")]
    InvalidQuery { param: String, reason: String },

    // Lookup errors
    #[error("ship not found: {0}")]
    ShipNotFound(ShipId),

    #[error("crew member {crew_member_id} not found on ship {ship_id}")]
    CrewMemberNotFound {
        ship_id: ShipId,
        crew_member_id: CrewMemberId,
    },
}

impl Error {
    pub(crate) fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_query(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidQuery {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Whether the input failed a declared constraint.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidField { .. } | Error::InvalidRole(_) | Error::InvalidQuery { .. }
        )
    }

    /// Whether a referenced key does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ShipNotFound(_) | Error::CrewMemberNotFound { .. }
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
