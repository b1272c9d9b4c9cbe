use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::features::CATEGORICAL_FEATURES;
use crate::core::Estimator;
use crate::models::{EstimateResponse, ErrorResponse, HealthResponse, OptionsResponse, RawInputs, FUEL_TYPES, MAX_SEATS, MIN_SEATS};
use crate::services::{ModelContext, ReferenceDataset};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ModelContext>,
    pub reference: Option<Arc<ReferenceDataset>>,
    pub estimator: Estimator,
    /// Reference cars attached to each estimate
    pub comparables: usize,
}

/// Configure estimate-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/options", web::get().to(form_options))
        .route("/estimate", web::post().to(estimate_price));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        feature_count: state.context.feature_order().len(),
        reference_loaded: state.reference.is_some(),
        timestamp: chrono::Utc::now(),
    })
}

/// Choices offered by the input form
async fn form_options(state: web::Data<AppState>) -> impl Responder {
    let encoders = state.context.encoders();
    let known_labels = CATEGORICAL_FEATURES
        .iter()
        .filter_map(|&feature| {
            encoders
                .get(feature)
                .map(|encoder| (feature.to_string(), encoder.classes().to_vec()))
        })
        .collect();

    HttpResponse::Ok().json(OptionsResponse {
        fuel_types: FUEL_TYPES.iter().map(|f| f.to_string()).collect(),
        min_seats: MIN_SEATS,
        max_seats: MAX_SEATS,
        feature_order: state.context.feature_order().names().to_vec(),
        known_labels,
    })
}

/// Estimate price endpoint
///
/// POST /api/v1/estimate
///
/// Request body:
/// ```json
/// {
///   "company": "Toyota",
///   "model": "Corolla",
///   "engine": "I4",
///   "capacity": "1998 cc",
///   "horsepower": "150 hp",
///   "topSpeed": "220 km/h",
///   "accel": "8.5 sec",
///   "torque": "240 Nm",
///   "seats": 5,
///   "fuel": "Petrol"
/// }
/// ```
async fn estimate_price(
    state: web::Data<AppState>,
    req: web::Json<RawInputs>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for estimate request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let estimate = match state.estimator.estimate(&state.context, &req) {
        Ok(estimate) => estimate,
        Err(e) => {
            tracing::error!("Prediction failed for {} {}: {}", req.company, req.model, e);
            return HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Prediction failed".to_string(),
                message: e.to_string(),
                status_code: 422,
            });
        }
    };

    if !estimate.warnings.is_empty() {
        tracing::warn!("Estimate for {} {} built from incomplete inputs", req.company, req.model);
    }

    let comparables = state
        .reference
        .as_ref()
        .map(|reference| reference.nearest_by_price(estimate.price, state.comparables))
        .unwrap_or_default();

    let response = EstimateResponse {
        estimate_id: uuid::Uuid::new_v4().to_string(),
        price_usd: estimate.price,
        price_local: estimate.local_price,
        display_price: estimate.display_price,
        band: estimate.band,
        band_display: estimate.band_display,
        tier: estimate.tier,
        suggestion: estimate.tier.suggestion().to_string(),
        warnings: estimate.warnings,
        unseen_categories: estimate.unseen,
        features: estimate.features,
        comparables,
        timestamp: chrono::Utc::now(),
    };

    tracing::info!(
        "Estimated {} for {} {} ({} comparables)",
        response.display_price,
        req.company,
        req.model,
        response.comparables.len()
    );

    HttpResponse::Ok().json(response)
}
