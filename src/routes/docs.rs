use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::domain::product::Product;
use crate::forms::products::{ProductForm, ProductIdForm};
use crate::routes::{MessageResponse, ProductResponse, products};

/// OpenAPI description of the product endpoints.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warehouse products API",
        description = "CRUD operations over warehouse product records."
    ),
    paths(
        products::show_products,
        products::show_product,
        products::show_product_by_body,
        products::add_product,
        products::edit_product,
        products::delete_product,
    ),
    components(schemas(Product, ProductForm, ProductIdForm, MessageResponse, ProductResponse)),
    tags((name = "products", description = "Warehouse product management"))
)]
pub struct ApiDoc;

#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
