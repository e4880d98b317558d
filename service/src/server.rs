//! HTTP routing and the suggestTask handler.
//!
//! API endpoints:
//! - POST /suggestTask - classify an utterance and call the dependency

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use suggest_resilience::{FailureProbability, Retrier};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::error::{ApiError, Error, Result};
use crate::observe::TracingObserver;
use crate::request::{SuggestTaskRequest, SuggestTaskResponse};
use crate::state::AppState;

/// Per-request override of the dependency failure probability.
pub const FAILURE_PROBABILITY_HEADER: &str = "x-failure-probability";

/// Build the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/suggestTask", post(suggest_task))
        .with_state(state)
}

/// Serve until Ctrl+C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    info!(addr = %listener.local_addr()?, "suggestTask service listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("suggestTask service stopped");
    Ok(())
}

/// Parse an address; a leading `:` means every interface.
pub fn parse_addr(addr: &str) -> Result<SocketAddr> {
    let full = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    };
    full.parse().map_err(|source| Error::Addr {
        addr: addr.to_string(),
        source,
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}

async fn suggest_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<SuggestTaskRequest>, JsonRejection>,
) -> std::result::Result<Json<SuggestTaskResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = request.validate().map_err(ApiError::Validation)?;
    let failure_probability = failure_probability(&headers)?;

    let task = state.classifier().classify(&request.utterance);
    debug!(
        user_id = %request.user_id,
        session_id = %request.session_id,
        %task,
        "classified utterance"
    );

    let dependency = match failure_probability {
        Some(p) => state.dependency().with_failure_probability(p),
        None => *state.dependency(),
    };
    let mut rng = state.rng().fork();

    let outcome = Retrier::new(*state.retry())
        .with_observer(TracingObserver::new(&request.session_id))
        .call_dependency(&dependency, &mut rng)
        .await;

    if !outcome.success {
        return Err(ApiError::DependencyUnavailable {
            attempts: outcome.attempts,
        });
    }
    Ok(Json(SuggestTaskResponse::new(task, Utc::now())))
}

fn failure_probability(
    headers: &HeaderMap,
) -> std::result::Result<Option<FailureProbability>, ApiError> {
    let Some(value) = headers.get(FAILURE_PROBABILITY_HEADER) else {
        return Ok(None);
    };
    let bad_header = |source: suggest_resilience::Error| ApiError::BadHeader {
        header: "X-Failure-Probability",
        source,
    };
    let text = value
        .to_str()
        .map_err(|_| bad_header(suggest_resilience::Error::UnparsableProbability(
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        )))?;
    text.parse().map(Some).map_err(bad_header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr(":8080").unwrap(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(
            parse_addr("127.0.0.1:3000").unwrap(),
            "127.0.0.1:3000".parse().unwrap()
        );
        assert!(matches!(parse_addr("localhost"), Err(Error::Addr { .. })));
    }

    #[test]
    fn test_failure_probability_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(failure_probability(&headers).unwrap(), None);

        headers.insert(FAILURE_PROBABILITY_HEADER, HeaderValue::from_static("0.0"));
        assert_eq!(
            failure_probability(&headers).unwrap(),
            Some(FailureProbability::NEVER)
        );

        headers.insert(FAILURE_PROBABILITY_HEADER, HeaderValue::from_static("1.01"));
        assert!(matches!(
            failure_probability(&headers),
            Err(ApiError::BadHeader { .. })
        ));

        headers.insert(FAILURE_PROBABILITY_HEADER, HeaderValue::from_static("half"));
        assert!(matches!(
            failure_probability(&headers),
            Err(ApiError::BadHeader { .. })
        ));
    }
}
