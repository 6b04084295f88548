//! Location handlers
//!
//! Read-only views over the catalog. Unknown names are 404 here; the booking
//! endpoints report them as validation failures instead.

use crate::dto::{ApiResponse, LocationDetail, LocationQuery, LocationSummary};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use rentflow_core::{models::Location, AppError};
use tracing::{debug, instrument};

fn find_location<'a>(state: &'a AppState, name: &str) -> Result<&'a Location, AppError> {
    state
        .store
        .find_location(name)
        .ok_or_else(|| AppError::LocationNotFound(name.to_string()))
}

/// List locations, optionally only those serving pickup or drop
///
/// GET /api/locations?capability=pickup|drop
#[instrument(skip(state))]
pub async fn list_locations(
    state: web::Data<AppState>,
    query: web::Query<LocationQuery>,
) -> Result<HttpResponse, AppError> {
    let locations: Vec<LocationSummary> = match query.capability {
        Some(direction) => state
            .store
            .locations_with(direction)
            .map(LocationSummary::from)
            .collect(),
        None => state
            .store
            .locations()
            .iter()
            .map(LocationSummary::from)
            .collect(),
    };

    debug!(count = locations.len(), capability = ?query.capability, "Listing locations");
    Ok(HttpResponse::Ok().json(ApiResponse::success(locations)))
}

/// Catalog totals
///
/// GET /api/locations/summary
#[instrument(skip(state))]
pub async fn get_summary(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.store.summary())))
}

/// Get a location by name
///
/// GET /api/locations/{name}
#[instrument(skip(state))]
pub async fn get_location(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let location = find_location(&state, &path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(LocationDetail::from(location))))
}

/// Named pickup/drop points of a location
///
/// GET /api/locations/{name}/pickup-drop-points
#[instrument(skip(state))]
pub async fn get_pickup_drop_points(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let location = find_location(&state, &path)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(&location.pickup_drop_points)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/locations")
            .route("", web::get().to(list_locations))
            .route("/summary", web::get().to(get_summary))
            .route("/{name}", web::get().to(get_location))
            .route("/{name}/pickup-drop-points", web::get().to(get_pickup_drop_points)),
    );
}
