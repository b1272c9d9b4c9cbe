// Route exports
pub mod errors;
pub mod estimate;
pub mod reference;

use actix_web::web;

pub use errors::{handle_json_payload_error, handle_query_payload_error};
pub use estimate::AppState;

/// JSON and query extractor settings that answer malformed input with a JSON 400
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(estimate::configure)
            .configure(reference::configure),
    );
}
