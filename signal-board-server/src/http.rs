use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use signal_board::{IngestError, Ingestor, SnapshotReader, StoreSnapshot};
use thiserror::Error;
use tracing::error;

/// Handles shared by every request. The [`Ingestor`] is the only writer.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ingestor: Ingestor,
    pub reader: SnapshotReader,
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/snapshot", get(snapshot))
        .route("/health", get(health))
        .with_state(state)
}

/// Failure of a webhook request, mapped to a status code in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("ingestion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Ingest(IngestError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Ingest(IngestError::UnrecognizedInterval { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Ingest(IngestError::Storage(_)) | ApiError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// `POST /webhook`. The body is parsed as JSON whatever the declared content type.
async fn webhook(State(state): State<AppState>, body: Bytes) -> Result<&'static str, ApiError> {
    let received_at = Utc::now();
    let ingestor = state.ingestor.clone();

    tokio::task::spawn_blocking(move || ingestor.ingest(&body, received_at))
        .await
        .inspect_err(|error| error!(%error, "ingestion task panicked"))??;

    Ok("OK")
}

/// `GET /snapshot`: full ticker -> record map
async fn snapshot(State(state): State<AppState>) -> Json<StoreSnapshot> {
    Json(state.reader.snapshot())
}

/// `GET /health`
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "symbols": state.reader.snapshot().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use signal_board::{IntervalTable, SignalStore};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup() -> (TempDir, Arc<SignalStore>, Router) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            SignalStore::open(dir.path().join("market_data.json"), IntervalTable::default())
                .unwrap(),
        );
        let app = router(AppState {
            ingestor: Ingestor::new(Arc::clone(&store)),
            reader: SnapshotReader::new(Arc::clone(&store)),
        });
        (dir, store, app)
    }

    async fn post_webhook(app: &Router, body: &'static str) -> (StatusCode, String) {
        let request = Request::post("/webhook")
            .header("content-type", "text/plain; charset=utf-8")
            .body(Body::from(body))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_webhook_status_codes() {
        struct TestCase {
            input: &'static str,
            expected: StatusCode,
        }

        let tests = vec![
            TestCase {
                // TC0: accepted
                input: r#"{"ticker":"NVDA","interval":"240","signal":"strong-buy","price":130.5}"#,
                expected: StatusCode::OK,
            },
            TestCase {
                // TC1: missing ticker
                input: r#"{"interval":"240","signal":"buy"}"#,
                expected: StatusCode::BAD_REQUEST,
            },
            TestCase {
                // TC2: unparseable body
                input: "{{ticker}} crossed up",
                expected: StatusCode::BAD_REQUEST,
            },
            TestCase {
                // TC3: unrecognized interval
                input: r#"{"ticker":"AAPL","interval":"weird","signal":"buy"}"#,
                expected: StatusCode::UNPROCESSABLE_ENTITY,
            },
        ];

        let (_dir, _store, app) = setup();
        for (index, test) in tests.into_iter().enumerate() {
            let (actual, _) = post_webhook(&app, test.input).await;
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[tokio::test]
    async fn test_webhook_then_snapshot() {
        let (_dir, _store, app) = setup();

        let (status, body) = post_webhook(
            &app,
            r#"{"ticker":"NVDA","interval":"240","signal":"strong-buy","price":130.5}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");

        let (status, body) =
            post_webhook(&app, r#"{"ticker":"AAPL","interval":"weird","signal":"buy"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, "unrecognized interval: weird");

        let (status, snapshot) = get_json(&app, "/snapshot").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["NVDA"]["signals"]["4h"], "strong-buy");
        assert!(snapshot["NVDA"]["signals"]["1d"].is_null());
        assert!(snapshot.get("AAPL").is_none());

        let (status, health) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["symbols"], 1);
    }

    #[tokio::test]
    async fn test_webhook_storage_failure_is_server_error() {
        let (dir, store, app) = setup();
        std::fs::remove_dir_all(dir.path()).unwrap();

        let (status, _) =
            post_webhook(&app, r#"{"ticker":"NVDA","interval":"15","signal":"buy"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_api_error_status() {
        use signal_board::{StorageError, ValidationError};

        struct TestCase {
            input: ApiError,
            expected: StatusCode,
        }

        let tests = vec![
            TestCase {
                // TC0: validation
                input: ApiError::from(IngestError::from(ValidationError::MissingField("ticker"))),
                expected: StatusCode::BAD_REQUEST,
            },
            TestCase {
                // TC1: unrecognized interval
                input: ApiError::from(IngestError::UnrecognizedInterval {
                    token: "2h".to_string(),
                }),
                expected: StatusCode::UNPROCESSABLE_ENTITY,
            },
            TestCase {
                // TC2: storage
                input: ApiError::from(IngestError::from(StorageError::Write {
                    path: "market_data.json".into(),
                    reason: "read-only file system".to_string(),
                })),
                expected: StatusCode::INTERNAL_SERVER_ERROR,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.input.status();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }
}
