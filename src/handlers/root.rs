use axum::response::Json;
use serde_json::{json, Value};

/// GET /, /index, /index.html - Service descriptor
pub async fn get() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Notes API",
            "version": version,
            "description": "List, create, update and delete notes",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "notes": "GET|POST|PATCH|DELETE /notes (private)",
            }
        }
    }))
}
