use thiserror::Error;

/// Errors raised when editing the allocations of a position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Allocation {index} not found in position {position}")]
    NotFound { position: u32, index: u32 },

    #[error("Allocation {index} of position {position} cannot be deleted: {reason}")]
    NotDeletable {
        position: u32,
        index: u32,
        reason: String,
    },

    #[error("Invoice {0} does not support cost allocation")]
    NotSupported(String),
}
