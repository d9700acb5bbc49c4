//! HTTP API server.
//!
//! Exposes the transcript, indexing, and streaming answer endpoints the web
//! UI talks to. Pre-stream failures return a structured JSON error with a
//! status mapped from the error taxonomy; once streaming has begun, a
//! provider failure terminates the body.

use crate::error::{LekseError, Result};
use crate::orchestrator::{IndexOutcome, Orchestrator};
use crate::rag::AnswerRequest;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
pub struct AppState {
    orchestrator: Orchestrator,
}

/// Build the application router.
pub fn app(orchestrator: Orchestrator) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/transcript", post(transcript))
        .route("/index", post(index_video))
        .route("/answer", post(answer))
        .layer(cors)
        .with_state(Arc::new(AppState { orchestrator }))
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, orchestrator: Orchestrator) -> anyhow::Result<()> {
    let app = app(orchestrator);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Serialize)]
struct TranscriptResponse {
    success: bool,
    transcript: Vec<crate::transcript::TranscriptSegment>,
}

#[derive(Serialize)]
struct IndexResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Short label per error variant, forwarded alongside the message.
fn error_label(e: &LekseError) -> &'static str {
    match e {
        LekseError::Validation(_) | LekseError::InvalidInput(_) => "Invalid request",
        LekseError::Auth(_) => "Invalid or missing API key",
        LekseError::PermissionDenied(_) => "Permission denied",
        LekseError::RateLimited(_) => "Rate limited",
        LekseError::TranscriptUnavailable(_) => "Transcript unavailable",
        LekseError::ProviderUnavailable(_) => "Provider unavailable",
        _ => "Internal error",
    }
}

/// Map an error to its JSON response. Raw provider traces never leak;
/// the error's own message is forwarded for diagnostics.
fn error_response(e: &LekseError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: error_label(e).to_string(),
            details: Some(e.to_string()),
        }),
    )
        .into_response()
}

/// Extract the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| LekseError::Auth("Missing Authorization header".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| LekseError::Auth("Authorization header must be a bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(LekseError::Auth("Empty bearer token".to_string()));
    }

    Ok(token.to_string())
}

/// Pull a required string field out of a JSON body.
fn required_field(body: &serde_json::Value, field: &str) -> Result<String> {
    body.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| LekseError::Validation(format!("{} is required", field)))
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn transcript(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let video_id = match required_field(&body, "videoId") {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    match state.orchestrator.transcripts().get_transcript(&video_id).await {
        Ok(segments) => Json(TranscriptResponse {
            success: true,
            transcript: segments.as_ref().clone(),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn index_video(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let video_id = match required_field(&body, "videoId") {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    match state.orchestrator.ensure_indexed(&video_id).await {
        Ok(IndexOutcome::Indexed {
            chunks_indexed,
            segments_indexed,
        }) => Json(IndexResponse {
            success: true,
            message: format!(
                "Video stored successfully ({} chunks, {} segments)",
                chunks_indexed, segments_indexed
            ),
        })
        .into_response(),
        Ok(IndexOutcome::AlreadyIndexed { .. }) => Json(IndexResponse {
            success: false,
            message: "Video already stored".to_string(),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn answer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let api_key = match bearer_token(&headers) {
        Ok(key) => key,
        Err(e) => return error_response(&e),
    };

    let request: AnswerRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(e) => return error_response(&LekseError::Validation(e.to_string())),
    };

    let stream = match state.orchestrator.answer_stream(&request, &api_key).await {
        Ok(stream) => stream,
        Err(e) => return error_response(&e),
    };

    // Mid-stream failures end the body; the client sees a terminated
    // stream rather than an endless pending response.
    let body_stream = stream.map(|item| match item {
        Ok(fragment) => Ok(bytes::Bytes::from(fragment)),
        Err(e) => {
            error!("Provider stream failed: {}", e);
            Err(axum::Error::new(e))
        }
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body_stream))
        .unwrap_or_else(|e| {
            error_response(&LekseError::Unknown(format!(
                "Failed to build response: {}",
                e
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer sk-test-123".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "sk-test-123");
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(LekseError::Auth(_))));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Err(LekseError::Auth(_))));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer   ".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Err(LekseError::Auth(_))));
    }

    #[test]
    fn test_required_field() {
        let body = serde_json::json!({ "videoId": "dpw9EHDh2bM" });
        assert_eq!(required_field(&body, "videoId").unwrap(), "dpw9EHDh2bM");

        let body = serde_json::json!({ "videoId": "" });
        assert!(matches!(
            required_field(&body, "videoId"),
            Err(LekseError::Validation(_))
        ));

        let body = serde_json::json!({});
        assert!(matches!(
            required_field(&body, "videoId"),
            Err(LekseError::Validation(_))
        ));
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(
            error_label(&LekseError::Auth("bad".into())),
            "Invalid or missing API key"
        );
        assert_eq!(
            error_label(&LekseError::RateLimited("quota".into())),
            "Rate limited"
        );
        assert_eq!(error_label(&LekseError::VectorStore("x".into())), "Internal error");
    }
}
