use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::product::Product as DomainProduct;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: i64,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
    pub last_quantity_change: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub id: String,
    pub sku: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price_cents: i64,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
    pub last_quantity_change: NaiveDateTime,
}

/// Columns rewritten when an existing row is replaced. `created_at` is never touched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub sku: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price_cents: i64,
    pub quantity: i32,
    pub last_quantity_change: NaiveDateTime,
}

/// Convert a decimal price into whole cents.
pub fn price_to_cents(price: Decimal) -> Result<i64, RepositoryError> {
    let mut scaled = price;
    scaled.rescale(2);
    i64::try_from(scaled.mantissa())
        .map_err(|_| RepositoryError::InvalidData(format!("price {price} is out of range")))
}

/// Convert stored cents back into a decimal price.
pub fn cents_to_price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

impl TryFrom<Product> for DomainProduct {
    type Error = RepositoryError;

    fn try_from(value: Product) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id).map_err(|err| {
            RepositoryError::InvalidData(format!("product id `{}`: {err}", value.id))
        })?;

        Ok(Self {
            id,
            sku: value.sku,
            name: value.name,
            description: value.description,
            category: value.category,
            price: cents_to_price(value.price_cents),
            quantity: value.quantity,
            created_at: value.created_at,
            last_quantity_change: value.last_quantity_change,
        })
    }
}

impl<'a> TryFrom<&'a DomainProduct> for NewProduct<'a> {
    type Error = RepositoryError;

    fn try_from(value: &'a DomainProduct) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.hyphenated().to_string(),
            sku: value.sku.as_str(),
            name: value.name.as_str(),
            description: value.description.as_deref(),
            category: value.category.as_deref(),
            price_cents: price_to_cents(value.price)?,
            quantity: value.quantity,
            created_at: value.created_at,
            last_quantity_change: value.last_quantity_change,
        })
    }
}

impl<'a> TryFrom<&'a DomainProduct> for UpdateProduct<'a> {
    type Error = RepositoryError;

    fn try_from(value: &'a DomainProduct) -> Result<Self, Self::Error> {
        Ok(Self {
            sku: value.sku.as_str(),
            name: value.name.as_str(),
            description: value.description.as_deref(),
            category: value.category.as_deref(),
            price_cents: price_to_cents(value.price)?,
            quantity: value.quantity,
            last_quantity_change: value.last_quantity_change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_round_trips_through_cents() {
        let price = Decimal::new(999, 2);
        assert_eq!(price_to_cents(price).ok(), Some(999));
        assert_eq!(cents_to_price(999), price);
    }

    #[test]
    fn whole_prices_are_scaled_up() {
        assert_eq!(price_to_cents(Decimal::from(12)).ok(), Some(1200));
        assert_eq!(price_to_cents(Decimal::new(15, 1)).ok(), Some(150));
    }

    #[test]
    fn corrupt_ids_are_reported() {
        let row = Product {
            id: "not-a-uuid".to_string(),
            sku: "SKU".to_string(),
            name: "Name".to_string(),
            description: None,
            category: None,
            price_cents: 100,
            quantity: 1,
            created_at: NaiveDateTime::default(),
            last_quantity_change: NaiveDateTime::default(),
        };

        let result = DomainProduct::try_from(row);
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }
}
