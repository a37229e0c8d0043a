use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Domain representation of a warehouse product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier assigned when the product is first stored.
    pub id: Uuid,
    /// Stock keeping unit, unique across all products.
    pub sku: String,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Optional free-form category label.
    pub category: Option<String>,
    /// Unit price with at most two fractional digits.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    /// Units currently in stock.
    pub quantity: i32,
    /// Timestamp for when the product record was created.
    #[serde(with = "timestamp_format")]
    #[schema(value_type = String, example = "2024-05-01 12:00:00")]
    pub created_at: NaiveDateTime,
    /// Timestamp of the last save that changed `quantity`.
    #[serde(with = "timestamp_format")]
    #[schema(value_type = String, example = "2024-05-01 12:00:00")]
    pub last_quantity_change: NaiveDateTime,
}

/// Validated business fields used to create or replace a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
}

impl Product {
    /// Build a brand new product stamped with `now`.
    pub fn create(draft: ProductDraft, now: NaiveDateTime) -> Self {
        Self::from_draft(Uuid::new_v4(), draft, now, now)
    }

    /// Build the replacement for `self` from `draft`.
    ///
    /// `id` and `created_at` are carried over. `last_quantity_change` moves to
    /// `now` only when the quantity differs from the stored one.
    pub fn revise(&self, draft: ProductDraft, now: NaiveDateTime) -> Self {
        let last_quantity_change = if draft.quantity != self.quantity {
            now
        } else {
            self.last_quantity_change
        };
        Self::from_draft(self.id, draft, self.created_at, last_quantity_change)
    }

    fn from_draft(
        id: Uuid,
        draft: ProductDraft,
        created_at: NaiveDateTime,
        last_quantity_change: NaiveDateTime,
    ) -> Self {
        let ProductDraft {
            sku,
            name,
            description,
            category,
            price,
            quantity,
        } = draft;

        Self {
            id,
            sku,
            name,
            description,
            category,
            price,
            quantity,
            created_at,
            last_quantity_change,
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` encoding used for timestamps on the wire.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}
