use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::product::Product as DomainProduct,
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, ProductReader, ProductWriter},
};

impl ProductReader for DieselRepository {
    fn list_products(&self) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let rows = products::table
            .order((products::created_at.asc(), products::sku.asc()))
            .load::<DbProduct>(&mut conn)?;

        rows.into_iter().map(DomainProduct::try_from).collect()
    }

    fn get_product_by_id(&self, id: Uuid) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .find(id.hyphenated().to_string())
            .first::<DbProduct>(&mut conn)
            .optional()?;

        product.map(DomainProduct::try_from).transpose()
    }
}

impl ProductWriter for DieselRepository {
    fn save_product(&self, product: &DomainProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_new = DbNewProduct::try_from(product)?;
        let db_updates = DbUpdateProduct::try_from(product)?;
        let key = db_new.id.clone();

        let saved = conn.transaction::<DbProduct, RepositoryError, _>(|conn| {
            diesel::insert_into(products::table)
                .values(&db_new)
                .on_conflict(products::id)
                .do_update()
                .set(&db_updates)
                .execute(conn)?;

            Ok(products::table.find(key).first::<DbProduct>(conn)?)
        })?;

        DomainProduct::try_from(saved)
    }

    fn delete_product(&self, id: Uuid) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(products::table.find(id.hyphenated().to_string())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
