use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::NoteRepository;
use crate::handlers::{health, notes, root};
use crate::middleware::strict_status_codes;

/// Shared by every handler: the process-wide store handle and the loaded config
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteRepository>, config: AppConfig) -> Self {
        Self {
            notes,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(root::get))
        .route("/index", get(root::get))
        .route("/index.html", get(root::get))
        .route("/health", get(health::get))
        // Private (authorization handled upstream)
        .merge(note_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.strict_status_codes {
        router = router.layer(from_fn(strict_status_codes));
    }
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn note_routes() -> Router<AppState> {
    Router::new().route(
        "/notes",
        get(notes::notes_get)
            .post(notes::notes_post)
            .patch(notes::notes_patch)
            .delete(notes::notes_delete),
    )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
