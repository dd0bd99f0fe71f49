use entity::ValidationError;
use thiserror::Error;

/// Shared store result type.
pub type StoreResult<T> = Result<T, StoreError>;

/// Every failure is scoped to the single request; the store never retries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
