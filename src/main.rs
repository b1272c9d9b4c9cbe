use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use car_price_estimator::config::Settings;
use car_price_estimator::core::Estimator;
use car_price_estimator::routes::{self, AppState};
use car_price_estimator::services::{ModelContext, ReferenceDataset};
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Read config first so its [logging] section applies; errors are reported below
    // CARPRICE_CONFIG points at an explicit file; otherwise config/default + config/local
    let settings = Settings::from_env();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();

    // Initialize logging (LOG_LEVEL / LOG_FORMAT override the config file)
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(logging.level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(logging.format);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting car price estimator...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    // Artifacts are required; nothing can be estimated without them
    let context = ModelContext::load(
        &settings.artifacts.model_path,
        &settings.artifacts.encoders_path,
        &settings.artifacts.features_path,
    )
    .map_err(|e| {
        error!(
            "Model files not found or failed to load ({}). Expected {}, {}, {}",
            e,
            settings.artifacts.model_path,
            settings.artifacts.encoders_path,
            settings.artifacts.features_path
        );
        std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string())
    })?;

    // Reference dataset is optional - estimates work without it
    let reference = match &settings.reference.path {
        Some(path) => match ReferenceDataset::load(path, &settings.reference.price_column) {
            Ok(dataset) => Some(Arc::new(dataset)),
            Err(e) => {
                warn!("Reference dataset unavailable ({}), continuing without it", e);
                None
            }
        },
        None => None,
    };

    let estimator = Estimator::new(settings.pricing_policy());

    info!("Estimator initialized with pricing policy: {:?}", estimator.policy());

    let app_state = AppState {
        context: Arc::new(context),
        reference,
        estimator,
        comparables: settings.reference.comparables,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_extractors)
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
