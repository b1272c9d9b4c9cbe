use actix_web::{error, HttpRequest, HttpResponse};
use crate::models::ErrorResponse;

/// Turn an extractor failure into a 400 with the usual [`ErrorResponse`] body
fn bad_request<E>(err: E, kind: &str, message: String) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: kind.to_string(),
        message,
        status_code: 400,
    });
    error::InternalError::from_response(err, response).into()
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let message = format!("Invalid JSON: {}", err);
    bad_request(err, "invalid_json", message)
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    let message = format!("Invalid query: {}", err);
    bad_request(err, "invalid_query", message)
}
