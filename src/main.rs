use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use rental_match::config::{LoggingSettings, Settings};
use rental_match::core::{MatchScorer, ScoringTables};
use rental_match::routes::{self, AppState};
use rental_match::services::{CacheManager, Catalog};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging isn't up until settings load, so report this failure directly
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(config_error(e));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Rental Match ranking service...");

    let tables = match &settings.catalog.tables_path {
        Some(path) => ScoringTables::load(path).map_err(|e| {
            error!("Failed to load scoring tables: {}", e);
            config_error(e)
        })?,
        None => ScoringTables::default(),
    };

    let weights = settings.scoring_weights();
    let scorer = MatchScorer::with_weights(tables, weights).map_err(|e| {
        error!("Invalid scoring weights: {}", e);
        config_error(e)
    })?;

    info!("Scorer initialized with weights: {:?}", weights);

    let catalog = Catalog::load(&settings.catalog.path).map_err(|e| {
        error!("Failed to load listing catalog: {}", e);
        config_error(e)
    })?;

    let cache = if settings.cache.enabled {
        info!(
            "Ranking cache enabled ({} entries, TTL: {}s)",
            settings.cache.max_entries, settings.cache.ttl_secs
        );
        Some(Arc::new(CacheManager::new(
            settings.cache.max_entries,
            settings.cache.ttl_secs,
        )))
    } else {
        info!("Ranking cache disabled");
        None
    };

    let app_state = AppState {
        catalog: Arc::new(catalog),
        scorer: Arc::new(scorer),
        cache,
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
