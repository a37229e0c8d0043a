use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::product::ProductDraft;

/// Upper bound (exclusive) for the integer part of a price: ten digits.
const PRICE_INTEGER_LIMIT: i64 = 10_000_000_000;
/// Maximum number of fractional digits in a price.
const PRICE_FRACTION_DIGITS: u32 = 2;

lazy_static! {
    /// Canonical 8-4-4-4-12 textual UUID form.
    static ref UUID_PATTERN: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap_or_else(|err| panic!("invalid UUID pattern: {err}"));
}

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product payloads.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// One or more fields failed validation.
    #[error("validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ProductFormError {
    /// Human-readable messages, one per failed rule.
    pub fn messages(&self) -> &[String] {
        match self {
            ProductFormError::Invalid(messages) => messages,
        }
    }

    fn merge(self, other: ProductFormError) -> Self {
        let ProductFormError::Invalid(mut messages) = self;
        messages.extend(other.messages().iter().cloned());
        ProductFormError::Invalid(messages)
    }
}

impl From<ValidationErrors> for ProductFormError {
    fn from(errors: ValidationErrors) -> Self {
        ProductFormError::Invalid(collect_messages(&errors))
    }
}

/// Flatten field errors into messages ordered by field name.
fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect()
}

/// Payload carrying only a product identifier (get and delete).
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductIdForm {
    /// Product UUID in canonical hyphenated form.
    #[validate(
        required(message = "UUID must not be null"),
        regex(path = *UUID_PATTERN, message = "Invalid UUID format")
    )]
    #[schema(example = "3f2b8c1e-9d4a-4e7b-8f00-1a2b3c4d5e6f")]
    pub id: Option<String>,
}

impl ProductIdForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// Validate the identifier profile and parse the UUID.
    pub fn into_id(self) -> ProductFormResult<Uuid> {
        self.validate()?;

        let raw = self.id.unwrap_or_default();
        Uuid::parse_str(&raw)
            .map_err(|_| ProductFormError::Invalid(vec!["Invalid UUID format".to_string()]))
    }
}

/// Product payload accepted by create and update.
///
/// `id` is only read by update, where it selects the product to replace.
#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    /// Target product UUID (update only).
    pub id: Option<String>,
    #[validate(
        required(message = "SKU must not be null"),
        custom(function = "validate_sku")
    )]
    pub sku: Option<String>,
    #[validate(
        required(message = "Name is mandatory"),
        custom(function = "validate_name")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(
        required(message = "Price must not be null"),
        custom(function = "validate_price")
    )]
    #[schema(value_type = Option<f64>, example = 9.99)]
    pub price: Option<Decimal>,
    #[validate(
        required(message = "Quantity must not be null"),
        range(min = 0, message = "Quantity must be positive or zero")
    )]
    pub quantity: Option<i32>,
}

impl ProductForm {
    /// Validate the full profile and convert into a domain draft.
    pub fn into_draft(self) -> ProductFormResult<ProductDraft> {
        self.validate_full()?;

        let ProductForm {
            sku,
            name,
            description,
            category,
            price,
            quantity,
            ..
        } = self;

        match (sku, name, price, quantity) {
            (Some(sku), Some(name), Some(price), Some(quantity)) => Ok(ProductDraft {
                sku,
                name,
                description,
                category,
                price: price.normalize(),
                quantity,
            }),
            _ => Err(ProductFormError::Invalid(vec![
                "Required product fields are missing".to_string(),
            ])),
        }
    }

    /// Validate the identifier and the full profile, reporting both at once.
    pub fn into_update(self) -> ProductFormResult<(Uuid, ProductDraft)> {
        let id = ProductIdForm {
            id: self.id.clone(),
        }
        .into_id();
        let draft = self.into_draft();

        match (id, draft) {
            (Ok(id), Ok(draft)) => Ok((id, draft)),
            (Err(id_err), Err(draft_err)) => Err(id_err.merge(draft_err)),
            (Err(err), _) | (_, Err(err)) => Err(err),
        }
    }
}

impl ProductForm {
    /// Derived rules plus the blank check on a missing SKU, which `required`
    /// alone does not report.
    fn validate_full(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_default();
        if self.sku.is_none() {
            errors.add(
                "sku",
                ValidationError::new("blank").with_message("SKU is mandatory".into()),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_not_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(message.into()));
    }
    Ok(())
}

fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    validate_not_blank(sku, "SKU is mandatory")
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_not_blank(name, "Name is mandatory")
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(
            ValidationError::new("range").with_message("Price must be positive or zero".into())
        );
    }

    let normalized = price.normalize();
    if normalized.scale() > PRICE_FRACTION_DIGITS
        || normalized.trunc() >= Decimal::from(PRICE_INTEGER_LIMIT)
    {
        return Err(ValidationError::new("digits").with_message(
            "Price must be a number with up to 10 integer digits and 2 fractional digits".into(),
        ));
    }

    Ok(())
}
