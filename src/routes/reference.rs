use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, NearestQuery, NearestResponse, ReferenceResponse, SampleQuery};
use crate::routes::estimate::AppState;
use crate::services::ReferenceDataset;
use std::sync::Arc;

/// Configure reference dataset routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/reference/sample", web::get().to(sample))
        .route("/reference/nearest", web::get().to(nearest));
}

fn not_loaded() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Reference dataset unavailable".to_string(),
        message: "Sample CSV not found or can't be read".to_string(),
        status_code: 404,
    })
}

fn invalid(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn dataset(state: &AppState) -> Option<&Arc<ReferenceDataset>> {
    state.reference.as_ref()
}

/// Sample preview
///
/// GET /api/v1/reference/sample?limit={n}
///
/// `limit` above 100 is capped at 100.
async fn sample(
    state: web::Data<AppState>,
    query: web::Query<SampleQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return invalid(errors);
    }

    let Some(reference) = dataset(&state) else {
        return not_loaded();
    };

    HttpResponse::Ok().json(ReferenceResponse {
        columns: reference.columns().to_vec(),
        cars: reference.sample(query.capped_limit()),
    })
}

/// Nearest-price lookup
///
/// GET /api/v1/reference/nearest?price={usd}&limit={n}
async fn nearest(
    state: web::Data<AppState>,
    query: web::Query<NearestQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return invalid(errors);
    }

    let Some(reference) = dataset(&state) else {
        return not_loaded();
    };

    HttpResponse::Ok().json(NearestResponse {
        price: query.price,
        cars: reference.nearest_by_price(query.price, query.limit),
    })
}
