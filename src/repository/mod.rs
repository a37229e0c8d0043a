use uuid::Uuid;

use crate::db::{DbConnection, DbPool};
use crate::domain::product::Product;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    fn get_product_by_id(&self, id: Uuid) -> RepositoryResult<Option<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    /// Insert `product`, or replace the row with the same id.
    ///
    /// A SKU already used by another row yields
    /// [`RepositoryError::ConstraintViolation`](errors::RepositoryError::ConstraintViolation).
    fn save_product(&self, product: &Product) -> RepositoryResult<Product>;
    /// Remove the product, returning `NotFound` when nothing was deleted.
    fn delete_product(&self, id: Uuid) -> RepositoryResult<()>;
}
