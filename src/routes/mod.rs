use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use utoipa::ToSchema;

use crate::domain::product::Product;

pub mod docs;
pub mod products;

/// Generic response body: a message plus optional details.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_details(message, vec![detail.into()])
    }

    pub fn with_details(message: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Response body for successful writes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

impl ProductResponse {
    pub fn new(message: impl Into<String>, product: Product) -> Self {
        Self {
            message: message.into(),
            product,
        }
    }
}

/// `400 Bad Request` carrying validation messages.
pub fn validation_error(details: Vec<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(MessageResponse::with_details("Validation error.", details))
}

/// Decode a JSON request body.
///
/// Type mismatches are reported as validation errors naming the offending
/// field and the expected type.
pub fn parse_json<T>(body: &[u8]) -> Result<T, HttpResponse>
where
    T: DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let inner = err.inner();
        match inner.classify() {
            Category::Data => {
                let field = err.path().to_string();
                let expected = expected_type(&inner.to_string());
                validation_error(vec![format!(
                    "Invalid format for field: '{field}'. Expected: {expected}"
                )])
            }
            _ => HttpResponse::BadRequest().json(MessageResponse::with_detail(
                "Malformed JSON payload.",
                inner.to_string(),
            )),
        }
    })
}

/// Pull the "expected ..." clause out of a serde_json data error message.
fn expected_type(message: &str) -> String {
    let Some(start) = message.find("expected ") else {
        return "unknown".to_string();
    };
    let tail = &message[start + "expected ".len()..];
    let end = tail.find(" at line").unwrap_or(tail.len());
    tail[..end].to_string()
}

/// Register every route under `/api` plus the OpenAPI document.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(products::show_products)
            // literal `:id` segment must be registered before `{id}`
            .service(products::show_product_by_body)
            .service(products::show_product)
            .service(products::add_product)
            .service(products::edit_product)
            .service(products::delete_product),
    )
    .service(docs::openapi_json);
}
