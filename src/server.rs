use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::MediaDirs;
use crate::date::EmbeddedReader;
use crate::walk::organize;

#[derive(Clone)]
pub struct AppState {
    pub dirs: MediaDirs,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(process_request))
        .with_state(state)
}

/// POST /
///
/// The one supported request kind runs the full walk synchronously and
/// reports a success message. Failures and unknown kinds both come back
/// as a 400 with the cause and the original request payload embedded.
async fn process_request(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!("received organize request");

    let req_type = body.get("req_type").and_then(Value::as_str);

    let outcome = match req_type {
        Some("organize_media_folder") => {
            let dirs = state.dirs.clone();
            tokio::task::spawn_blocking(move || {
                organize(&dirs.input, &dirs.output, &EmbeddedReader)
            })
            .await
            .map_err(anyhow::Error::from)
            .and_then(|r| r)
        }
        _ => Err(anyhow::anyhow!("Unexpected req_type.")),
    };

    match outcome {
        Ok(summary) => Ok(Json(MessageResponse {
            message: format!(
                "Successful media file organization. {} files processed.",
                summary.files_seen
            ),
        })),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "Media organization failed: {e:#}, request received: {body}."
                ),
            }),
        )),
    }
}
