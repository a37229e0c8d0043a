use thiserror::Error;

use crate::forms::products::ProductFormError;
use crate::repository::errors::RepositoryError;

/// Outcomes of the product workflow that are not a success.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation; nothing was sent to storage.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    /// The targeted product does not exist.
    #[error("product not found")]
    NotFound,
    /// Another product already uses this SKU.
    #[error("Duplicate SKU value: {sku}")]
    Conflict { sku: String },
    /// Storage failed while loading the record a write depends on.
    #[error(transparent)]
    Lookup(RepositoryError),
    /// Opaque failure from the persistence layer.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(err: ProductFormError) -> Self {
        ServiceError::Validation(err.messages().to_vec())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
