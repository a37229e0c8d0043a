use mockall::mock;
use uuid::Uuid;

use super::{ProductReader, ProductWriter};
use crate::domain::product::Product;
use crate::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn list_products(&self) -> RepositoryResult<Vec<Product>>;
        fn get_product_by_id(&self, id: Uuid) -> RepositoryResult<Option<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn save_product(&self, product: &Product) -> RepositoryResult<Product>;
        fn delete_product(&self, id: Uuid) -> RepositoryResult<()>;
    }
}
