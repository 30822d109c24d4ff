use feebook_domain::EntityId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Student not found: {0}")]
    StudentNotFound(EntityId),
    #[error("Payment not found: {0}")]
    PaymentNotFound(EntityId),
    #[error("Skipped month not found: {0}")]
    SkippedMonthNotFound(EntityId),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Caller supplied an out-of-range or malformed value.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    /// A referenced identifier does not resolve to an existing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::StudentNotFound(_)
                | CoreError::PaymentNotFound(_)
                | CoreError::SkippedMonthNotFound(_)
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::Conflict(_))
    }
}
