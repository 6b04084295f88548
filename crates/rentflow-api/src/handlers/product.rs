//! Product handlers

use crate::dto::{ApiResponse, ProductResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use rentflow_core::AppError;
use tracing::{debug, instrument};

/// List active products
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products: Vec<ProductResponse> = state
        .store
        .active_products()
        .map(ProductResponse::from)
        .collect();

    debug!(count = products.len(), "Listing products");
    Ok(HttpResponse::Ok().json(ApiResponse::success(products)))
}

/// Get an active product by type
///
/// GET /api/products/{product_type}
#[instrument(skip(state))]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product_type = path.into_inner();
    let product = state
        .store
        .find_active_product(&product_type)
        .ok_or(AppError::ProductNotFound(product_type))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(ProductResponse::from(product))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("/{product_type}", web::get().to(get_product)),
    );
}
