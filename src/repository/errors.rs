use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The targeted row does not exist.
    #[error("record not found")]
    NotFound,
    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    ConstraintViolation(String),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(DieselError),
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// A stored value could not be mapped onto the domain model.
    #[error("invalid stored value: {0}")]
    InvalidData(String),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::ConstraintViolation(info.message().to_string())
            }
            other => RepositoryError::Database(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err = RepositoryError::from(DieselError::NotFound);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn other_diesel_errors_are_opaque() {
        let err = RepositoryError::from(DieselError::RollbackTransaction);
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
