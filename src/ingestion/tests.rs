//! Ingestion API Tests
//!
//! Exercises the HTTP boundary through the axum router.
//!
//! ## Test Scopes
//! - **Validation**: Range checks and malformed bodies map to 400; empty id lists are accepted.
//! - **Status**: Unknown ids map to 404, known ids report derived status and batches.
//! - **Liveness**: Health and root endpoints.

#[cfg(test)]
mod tests {
    use crate::config::SchedulerConfig;
    use crate::error::ValidationError;
    use crate::ingestion::handlers::{router, validate_ids};
    use crate::ingestion::types::*;
    use crate::scheduler::service::Scheduler;
    use crate::scheduler::types::BatchStatus;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = SchedulerConfig::default()
            .with_item_latency(Duration::from_millis(1))
            .with_min_batch_duration(Duration::from_millis(5));
        router(Scheduler::new(config).unwrap())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_ingest(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ingest")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    // ============================================================
    // VALIDATION
    // ============================================================

    #[test]
    fn test_validate_ids_bounds() {
        assert_eq!(validate_ids(&[1, 1_000_000_007]).unwrap(), vec![1, 1_000_000_007]);
        assert_eq!(
            validate_ids(&[1, 0, 3]),
            Err(ValidationError::ItemIdOutOfRange { id: 0 })
        );
        assert_eq!(
            validate_ids(&[-5]),
            Err(ValidationError::ItemIdOutOfRange { id: -5 })
        );
        assert_eq!(
            validate_ids(&[1_000_000_008]),
            Err(ValidationError::ItemIdOutOfRange { id: 1_000_000_008 })
        );
        assert_eq!(validate_ids(&[]).unwrap(), Vec::<u64>::new());
    }

    #[tokio::test]
    async fn test_ingest_invalid_ids() {
        let app = test_app();

        let (status, body) =
            send(&app, post_ingest(serde_json::json!({"ids": [0, 2, 3], "priority": "HIGH"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("out of range"));
    }

    #[tokio::test]
    async fn test_ingest_unknown_priority() {
        let app = test_app();

        let (status, _) =
            send(&app, post_ingest(serde_json::json!({"ids": [1], "priority": "URGENT"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ingest_empty_ids() {
        let app = test_app();

        // ACT: submit without ids
        let (status, body) =
            send(&app, post_ingest(serde_json::json!({"ids": [], "priority": "LOW"}))).await;

        // ASSERT: accepted, known, no batches and nothing started
        assert_eq!(status, StatusCode::OK);
        let uri = format!("/status/{}", body["ingestion_id"].as_str().unwrap());
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "not_started");
        assert_eq!(body["batches"], serde_json::json!([]));
    }

    // ============================================================
    // INGEST + STATUS
    // ============================================================

    #[tokio::test]
    async fn test_ingest_valid_request() {
        let app = test_app();

        let (status, body) =
            send(&app, post_ingest(serde_json::json!({"ids": [1, 2, 3, 4, 5], "priority": "HIGH"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body["ingestion_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_invalid_id() {
        let app = test_app();

        let (status, _) = send(&app, get("/status/invalid_id")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_batch_size_and_completion() {
        // ARRANGE
        let app = test_app();
        let (_, body) =
            send(&app, post_ingest(serde_json::json!({"ids": [1, 2, 3, 4, 5, 6, 7], "priority": "MEDIUM"}))).await;
        let ingestion_id = body["ingestion_id"].as_str().unwrap().to_string();
        let uri = format!("/status/{}", ingestion_id);

        // ACT: first poll
        let (status, body) = send(&app, get(&uri)).await;

        // ASSERT: three batches of [3, 3, 1] ids
        assert_eq!(status, StatusCode::OK);
        let parsed: IngestionStatusResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.ingestion_id.0, ingestion_id);
        let sizes: Vec<usize> = parsed.batches.iter().map(|b| b.ids.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert!(matches!(parsed.status, BatchStatus::NotStarted | BatchStatus::Triggered));

        // ACT: poll until completed
        let mut last = parsed.status;
        for _ in 0..500 {
            let (_, body) = send(&app, get(&uri)).await;
            last = serde_json::from_value::<IngestionStatusResponse>(body).unwrap().status;
            if last == BatchStatus::Completed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // ASSERT
        assert_eq!(last, BatchStatus::Completed);
        let (_, body) = send(&app, get(&uri)).await;
        assert_eq!(body["status"], "completed");
        assert!(body["batches"].as_array().unwrap().iter().all(|b| b["status"] == "completed"));
    }

    // ============================================================
    // LIVENESS
    // ============================================================

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();

        let (status, body) = send(&app, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "OK"}));
    }

    #[tokio::test]
    async fn test_root() {
        let app = test_app();

        let (status, body) = send(&app, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());
    }
}
