use axum::{extract::Extension, response::Json, response::Response};
use serde_json::{json, Value};

use crate::{error::AppError, request_id::XRequestId};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Fallback for paths no module mounted.
pub async fn not_found(
    rid: Option<Extension<XRequestId>>,
    uri: axum::http::Uri,
) -> Response {
    let rid = rid.map(|Extension(XRequestId(id))| id);
    AppError::NotFound(format!("no route for {}", uri.path())).into_response_with(rid.as_deref())
}
