use chrono::Utc;
use uuid::Uuid;

use crate::domain::product::Product;
use crate::forms::products::ProductForm;
use crate::repository::errors::RepositoryError;
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Returns every stored product.
pub fn list_products<R>(repo: &R) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    repo.list_products().map_err(ServiceError::from)
}

/// Looks up a single product; `None` means it does not exist.
pub fn get_product<R>(repo: &R, id: Uuid) -> ServiceResult<Option<Product>>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(id)
        .map_err(ServiceError::Repository)
}

/// Validates the payload and stores a new product.
pub fn create_product<R>(repo: &R, form: ProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let draft = form.into_draft()?;
    let product = Product::create(draft, Utc::now().naive_utc());

    let saved = persist_product(repo, &product)?;
    log::info!("Created product {} ({})", saved.id, saved.sku);
    Ok(saved)
}

/// Replaces an existing product with the validated payload.
///
/// `created_at` is preserved; `last_quantity_change` only moves when the
/// quantity differs from the stored one.
pub fn update_product<R>(repo: &R, form: ProductForm) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let (id, draft) = form.into_update()?;

    let existing = repo
        .get_product_by_id(id)
        .map_err(ServiceError::Repository)?
        .ok_or(ServiceError::NotFound)?;

    let product = existing.revise(draft, Utc::now().naive_utc());

    let saved = persist_product(repo, &product)?;
    log::info!("Updated product {} ({})", saved.id, saved.sku);
    Ok(saved)
}

/// Deletes a product after checking that it exists.
///
/// A storage failure during the existence check is reported as
/// [`ServiceError::Lookup`], one during the removal as
/// [`ServiceError::Repository`].
pub fn delete_product<R>(repo: &R, id: Uuid) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    if repo
        .get_product_by_id(id)
        .map_err(ServiceError::Lookup)?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    repo.delete_product(id).map_err(ServiceError::from)?;
    log::info!("Deleted product {id}");
    Ok(())
}

fn persist_product<R>(repo: &R, product: &Product) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    repo.save_product(product).map_err(|err| match err {
        RepositoryError::ConstraintViolation(detail) => {
            log::warn!("Rejected duplicate SKU {}: {detail}", product.sku);
            ServiceError::Conflict {
                sku: product.sku.clone(),
            }
        }
        other => ServiceError::Repository(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    use crate::domain::product::ProductDraft;
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockProductReader, MockProductWriter};

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    fn sample_product(sku: &str, quantity: i32) -> Product {
        let draft = ProductDraft {
            sku: sku.to_string(),
            name: "Widget".to_string(),
            description: None,
            category: None,
            price: Decimal::new(999, 2),
            quantity,
        };
        Product::create(draft, fixed_datetime())
    }

    fn form_for(product: &Product, quantity: i32) -> ProductForm {
        ProductForm {
            id: Some(product.id.to_string()),
            sku: Some(product.sku.clone()),
            name: Some("Widget v2".to_string()),
            description: None,
            category: Some("Tools".to_string()),
            price: Some(Decimal::new(1250, 2)),
            quantity: Some(quantity),
        }
    }

    fn assert_recent(timestamp: NaiveDateTime) {
        let drift = Utc::now().naive_utc() - timestamp;
        assert!(
            drift >= Duration::zero() && drift < Duration::seconds(1),
            "timestamp {timestamp} is not within a second of now"
        );
    }

    struct FakeRepo {
        product_reader: MockProductReader,
        product_writer: MockProductWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                product_reader: MockProductReader::new(),
                product_writer: MockProductWriter::new(),
            }
        }

        fn echo_saves(&mut self) {
            self.product_writer
                .expect_save_product()
                .times(1)
                .returning(|product| Ok(product.clone()));
        }
    }

    impl ProductReader for FakeRepo {
        fn list_products(&self) -> RepositoryResult<Vec<Product>> {
            self.product_reader.list_products()
        }

        fn get_product_by_id(&self, id: Uuid) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(id)
        }
    }

    impl ProductWriter for FakeRepo {
        fn save_product(&self, product: &Product) -> RepositoryResult<Product> {
            self.product_writer.save_product(product)
        }

        fn delete_product(&self, id: Uuid) -> RepositoryResult<()> {
            self.product_writer.delete_product(id)
        }
    }

    #[test]
    fn list_products_returns_repository_rows() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .times(1)
            .returning(|| Ok(vec![sample_product("A", 1), sample_product("B", 2)]));

        let products = list_products(&repo).expect("expected success");
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn list_products_surfaces_storage_failures() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_list_products()
            .returning(|| Err(RepositoryError::InvalidData("broken".to_string())));

        let result = list_products(&repo);
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }

    #[test]
    fn get_product_treats_absence_as_a_value() {
        let mut repo = FakeRepo::new();
        let id = Uuid::new_v4();
        repo.product_reader
            .expect_get_product_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let result = get_product(&repo, id).expect("expected success");
        assert!(result.is_none());
    }

    #[test]
    fn create_product_stamps_timestamps_and_saves() {
        let mut repo = FakeRepo::new();
        repo.product_writer
            .expect_save_product()
            .times(1)
            .withf(|product| {
                assert_eq!(product.sku, "SKU1");
                assert_eq!(product.quantity, 5);
                true
            })
            .returning(|product| Ok(product.clone()));

        let form = ProductForm {
            id: None,
            sku: Some("SKU1".to_string()),
            name: Some("Widget".to_string()),
            description: None,
            category: None,
            price: Some(Decimal::new(999, 2)),
            quantity: Some(5),
        };

        let created = create_product(&repo, form).expect("expected success");
        assert_eq!(created.created_at, created.last_quantity_change);
        assert_recent(created.created_at);
    }

    #[test]
    fn create_product_rejects_invalid_payload_before_storage() {
        let repo = FakeRepo::new();

        let result = create_product(&repo, ProductForm::default());

        match result {
            Err(ServiceError::Validation(messages)) => assert_eq!(messages.len(), 5),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_product_translates_unique_violation_into_conflict() {
        let mut repo = FakeRepo::new();
        repo.product_writer.expect_save_product().returning(|_| {
            Err(RepositoryError::ConstraintViolation(
                "UNIQUE constraint failed: products.sku".to_string(),
            ))
        });

        let form = ProductForm {
            sku: Some("SKU1".to_string()),
            name: Some("Widget".to_string()),
            price: Some(Decimal::ONE),
            quantity: Some(1),
            ..ProductForm::default()
        };

        let err = create_product(&repo, form).expect_err("expected conflict");
        assert!(matches!(&err, ServiceError::Conflict { sku } if sku == "SKU1"));
        assert_eq!(err.to_string(), "Duplicate SKU value: SKU1");
    }

    #[test]
    fn update_product_keeps_timestamp_when_quantity_is_unchanged() {
        let mut repo = FakeRepo::new();
        let existing = sample_product("SKU1", 5);
        let stored = existing.clone();
        repo.product_reader
            .expect_get_product_by_id()
            .with(eq(existing.id))
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        repo.echo_saves();

        let updated = update_product(&repo, form_for(&existing, 5)).expect("expected success");

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.created_at, existing.created_at);
        assert_eq!(updated.last_quantity_change, existing.last_quantity_change);
        assert_eq!(updated.name, "Widget v2");
        assert_eq!(updated.price, Decimal::new(1250, 2));
    }

    #[test]
    fn update_product_refreshes_timestamp_when_quantity_changes() {
        let mut repo = FakeRepo::new();
        let existing = sample_product("SKU1", 5);
        let stored = existing.clone();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.echo_saves();

        let updated = update_product(&repo, form_for(&existing, 10)).expect("expected success");

        assert_eq!(updated.created_at, existing.created_at);
        assert!(updated.last_quantity_change > existing.last_quantity_change);
        assert_recent(updated.last_quantity_change);
    }

    #[test]
    fn update_product_requires_existing_product() {
        let mut repo = FakeRepo::new();
        let existing = sample_product("SKU1", 5);
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_| Ok(None));

        let result = update_product(&repo, form_for(&existing, 5));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_product_reports_sku_collision() {
        let mut repo = FakeRepo::new();
        let existing = sample_product("SKU1", 5);
        let stored = existing.clone();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.product_writer
            .expect_save_product()
            .returning(|_| Err(RepositoryError::ConstraintViolation("sku".to_string())));

        let mut form = form_for(&existing, 5);
        form.sku = Some("TAKEN".to_string());

        let result = update_product(&repo, form);
        assert!(matches!(result, Err(ServiceError::Conflict { sku }) if sku == "TAKEN"));
    }

    #[test]
    fn update_product_validates_identifier() {
        let repo = FakeRepo::new();
        let mut form = form_for(&sample_product("SKU1", 5), 5);
        form.id = Some("12345".to_string());

        let result = update_product(&repo, form);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn delete_product_of_unknown_id_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_| Ok(None));
        repo.product_writer.expect_delete_product().never();

        let result = delete_product(&repo, Uuid::new_v4());
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn delete_product_removes_existing_product() {
        let mut repo = FakeRepo::new();
        let existing = sample_product("SKU1", 5);
        let id = existing.id;
        repo.product_reader
            .expect_get_product_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.product_writer
            .expect_delete_product()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        assert!(delete_product(&repo, id).is_ok());
    }

    #[test]
    fn delete_product_reports_failed_existence_check_as_lookup() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_| Err(RepositoryError::InvalidData("broken".to_string())));
        repo.product_writer.expect_delete_product().never();

        let result = delete_product(&repo, Uuid::new_v4());
        assert!(matches!(result, Err(ServiceError::Lookup(_))));
    }

    #[test]
    fn delete_product_reports_failed_removal_as_repository_error() {
        let mut repo = FakeRepo::new();
        let existing = sample_product("SKU1", 5);
        let id = existing.id;
        repo.product_reader
            .expect_get_product_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.product_writer
            .expect_delete_product()
            .times(1)
            .returning(|_| Err(RepositoryError::InvalidData("locked".to_string())));

        let result = delete_product(&repo, id);
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }
}
