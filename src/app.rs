use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{self, categories, health, products, users};

/// Shared per-request state. Cloning is cheap; the store is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
}

impl AppState {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .merge(api_routes())
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health).fallback(handlers::method_not_allowed))
        .route("/api/categories", get(categories::list).fallback(handlers::method_not_allowed))
        .route(
            "/api/products",
            get(products::list)
                .post(products::create)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/products/:id",
            get(products::get)
                .put(products::update)
                .fallback(handlers::method_not_allowed),
        )
        .route("/api/users", get(users::list).fallback(handlers::method_not_allowed))
        .route("/api/users/:id", get(users::get).fallback(handlers::method_not_allowed))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
