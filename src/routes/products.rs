use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use uuid::Uuid;

use crate::forms::products::{ProductForm, ProductIdForm};
use crate::repository::DieselRepository;
use crate::routes::{MessageResponse, ProductResponse, parse_json, validation_error};
use crate::services::{ServiceError, products as product_service};

fn not_found(id: Uuid) -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new(format!(
        "Product with id {id} not found."
    )))
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses(
        (status = 200, description = "All products, or a message when there are none", body = Vec<crate::domain::product::Product>),
        (status = 500, description = "Products could not be retrieved", body = MessageResponse)
    )
)]
#[get("/products")]
pub async fn show_products(repo: web::Data<DieselRepository>) -> impl Responder {
    match product_service::list_products(repo.get_ref()) {
        Ok(products) if products.is_empty() => {
            HttpResponse::Ok().json(MessageResponse::new("No products found."))
        }
        Ok(products) => HttpResponse::Ok().json(products),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().json(MessageResponse::with_detail(
                "An error occurred while retrieving the products.",
                err.to_string(),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "The product", body = crate::domain::product::Product),
        (status = 400, description = "Malformed identifier", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse),
        (status = 500, description = "Product could not be retrieved", body = MessageResponse)
    )
)]
#[get("/products/{id}")]
pub async fn show_product(
    path: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    render_product(repo.get_ref(), ProductIdForm::new(path.into_inner()))
}

/// Body-carrying variant of [`show_product`] kept for older clients.
#[utoipa::path(
    get,
    path = "/api/products/:id",
    tag = "products",
    operation_id = "show_product_by_body",
    request_body = ProductIdForm,
    responses(
        (status = 200, description = "The product", body = crate::domain::product::Product),
        (status = 400, description = "Malformed identifier", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse),
        (status = 500, description = "Product could not be retrieved", body = MessageResponse)
    )
)]
#[get("/products/:id")]
pub async fn show_product_by_body(
    body: web::Bytes,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match parse_json::<ProductIdForm>(&body) {
        Ok(form) => render_product(repo.get_ref(), form),
        Err(response) => response,
    }
}

fn render_product(repo: &DieselRepository, form: ProductIdForm) -> HttpResponse {
    let id = match form.into_id() {
        Ok(id) => id,
        Err(err) => return validation_error(err.messages().to_vec()),
    };

    match product_service::get_product(repo, id) {
        Ok(Some(product)) => HttpResponse::Ok().json(product),
        Ok(None) => not_found(id),
        Err(err) => {
            log::error!("Failed to load product {id}: {err}");
            retrieval_failed(&err)
        }
    }
}

fn retrieval_failed(err: &ServiceError) -> HttpResponse {
    HttpResponse::InternalServerError().json(MessageResponse::with_detail(
        "An error occurred while retrieving the product.",
        err.to_string(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = ProductForm,
    responses(
        (status = 200, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid payload or duplicate SKU", body = MessageResponse)
    )
)]
#[post("/products")]
pub async fn add_product(body: web::Bytes, repo: web::Data<DieselRepository>) -> impl Responder {
    let form = match parse_json::<ProductForm>(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match product_service::create_product(repo.get_ref(), form) {
        Ok(product) => {
            HttpResponse::Ok().json(ProductResponse::new("Product created successfully.", product))
        }
        Err(ServiceError::Validation(messages)) => validation_error(messages),
        Err(err) => {
            if let ServiceError::Repository(_) = err {
                log::error!("Failed to create product: {err}");
            }
            HttpResponse::BadRequest().json(MessageResponse::with_detail(
                "Failed to create product.",
                err.to_string(),
            ))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/products",
    tag = "products",
    request_body = ProductForm,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid payload or duplicate SKU", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse)
    )
)]
#[put("/products")]
pub async fn edit_product(body: web::Bytes, repo: web::Data<DieselRepository>) -> impl Responder {
    let form = match parse_json::<ProductForm>(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let target = form.id.as_deref().and_then(|raw| Uuid::parse_str(raw).ok());

    match product_service::update_product(repo.get_ref(), form) {
        Ok(product) => {
            HttpResponse::Ok().json(ProductResponse::new("Product updated successfully.", product))
        }
        Err(ServiceError::Validation(messages)) => validation_error(messages),
        Err(ServiceError::NotFound) => match target {
            Some(id) => not_found(id),
            None => HttpResponse::NotFound().json(MessageResponse::new("Product not found.")),
        },
        Err(err) => {
            if let ServiceError::Repository(_) = err {
                log::error!("Failed to update product {target:?}: {err}");
            }
            HttpResponse::BadRequest().json(MessageResponse::with_detail(
                "Failed to update product.",
                err.to_string(),
            ))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/products",
    tag = "products",
    request_body = ProductIdForm,
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, description = "Invalid identifier or deletion failure", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse),
        (status = 500, description = "Product could not be retrieved", body = MessageResponse)
    )
)]
#[delete("/products")]
pub async fn delete_product(
    body: web::Bytes,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match parse_json::<ProductIdForm>(&body).map(ProductIdForm::into_id) {
        Ok(Ok(id)) => id,
        Ok(Err(err)) => return validation_error(err.messages().to_vec()),
        Err(response) => return response,
    };

    match product_service::delete_product(repo.get_ref(), id) {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(format!(
            "Product with id {id} has been deleted successfully."
        ))),
        Err(ServiceError::NotFound) => not_found(id),
        Err(err @ ServiceError::Lookup(_)) => {
            log::error!("Failed to load product {id} for deletion: {err}");
            retrieval_failed(&err)
        }
        Err(err) => {
            log::error!("Failed to delete product {id}: {err}");
            HttpResponse::BadRequest().json(MessageResponse::new(format!(
                "Failed to delete product with id {id}: {err}"
            )))
        }
    }
}
