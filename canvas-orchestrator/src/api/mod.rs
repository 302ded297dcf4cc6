//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod auth;
pub mod catalog;
pub mod endpoint;
pub mod error;
pub mod health;
pub mod inference;
pub mod signal;
pub mod upload;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        // Submission endpoints
        .route("/inference", post(inference::submit_inference))
        .route(
            "/inference/run-sagemaker-inference",
            post(inference::run_sagemaker_inference),
        )
        .route(
            "/inference/deploy-sagemaker-endpoint",
            post(endpoint::deploy_endpoint),
        )
        // Query endpoints
        .route(
            "/inference/list-inference-jobs",
            get(inference::list_inference_jobs),
        )
        .route(
            "/inference/get-inference-job",
            get(inference::get_inference_job),
        )
        .route(
            "/inference/get-inference-job-image-output",
            get(inference::get_inference_job_output),
        )
        .route(
            "/inference/list-endpoint-deployment-jobs",
            get(endpoint::list_endpoint_deployment_jobs),
        )
        .route(
            "/inference/get-endpoint-deployment-job",
            get(endpoint::get_endpoint_deployment_job),
        )
        // Model catalogs
        .route(
            "/inference/get-texual-inversion-list",
            get(catalog::textual_inversion_list),
        )
        .route("/inference/get-lora-list", get(catalog::lora_list))
        .route(
            "/inference/get-hypernetwork-list",
            get(catalog::hypernetwork_list),
        )
        .route(
            "/inference/get-controlnet-model-list",
            get(catalog::controlnet_model_list),
        )
        // Uploads
        .route(
            "/inference/generate-s3-presigned-url-for-uploading",
            get(upload::presigned_upload_url),
        )
        // Asynchronous signals
        .route(
            "/inference/completion-signal",
            post(signal::completion_signal),
        )
        .route(
            "/inference/endpoint-deployment-signal",
            post(signal::endpoint_deployment_signal),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .merge(protected)
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use canvas_core::domain::catalog::ModelCatalog;
    use canvas_core::domain::status::JobStatus;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::repository::RecordStore;
    use crate::testing::{Behavior, Harness, TEST_API_KEY};

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(auth::API_KEY_HEADER, TEST_API_KEY);
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn submission() -> Value {
        json!({
            "endpoint_name": "sd-endpoint",
            "payload_ref": "s3://bucket/in1.png",
            "parameters": {
                "checkpoint": "v1-5-pruned-emaonly.safetensors",
                "sampler": "Euler a",
                "width": 512,
                "height": 512,
                "steps": 20
            }
        })
    }

    fn sagemaker_notification(job_id: Uuid) -> Value {
        json!({
            "awsRegion": "us-west-2",
            "eventTime": "2023-05-01T10:00:00.000Z",
            "invocationStatus": "Completed",
            "requestParameters": {
                "endpointName": "sd-endpoint",
                "inputLocation": "s3://bucket/in1.png"
            },
            "responseParameters": {
                "contentType": "application/json",
                "outputLocation": "s3://bucket/out1.png"
            },
            "inferenceId": job_id.to_string(),
            "eventSource": "aws:sagemaker"
        })
    }

    #[tokio::test]
    async fn test_health_needs_no_key() {
        let harness = Harness::new();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(create_router(harness.state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["uploads"], true);
    }

    #[tokio::test]
    async fn test_missing_or_wrong_key_is_forbidden() {
        let harness = Harness::new();
        let router = create_router(harness.state);

        let missing = Request::builder()
            .uri("/inference/list-inference-jobs")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router.clone(), missing).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Forbidden" }));

        let wrong = Request::builder()
            .method(Method::POST)
            .uri("/inference")
            .header(auth::API_KEY_HEADER, "nope")
            .header("content-type", "application/json")
            .body(Body::from(submission().to_string()))
            .unwrap();
        let (status, _) = send(router, wrong).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(harness.jobs.len().await, 0);
    }

    #[tokio::test]
    async fn test_submit_signal_and_query() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());

        let (status, body) = send(
            router.clone(),
            request(Method::POST, "/inference", Some(submission())),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "submitted");
        let job_id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();

        // SNS envelope around the SageMaker notification
        let envelope = json!({
            "Type": "Notification",
            "MessageId": "0b1f6f36-8c4f-5e0c-9d6f-1a1a1a1a1a1a",
            "TopicArn": "arn:aws:sns:us-west-2:123456789012:sd-success",
            "Message": sagemaker_notification(job_id).to_string()
        });
        let (status, body) = send(
            router.clone(),
            request(Method::POST, "/inference/completion-signal", Some(envelope)),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["disposition"], "applied");

        let uri = format!("/inference/get-inference-job?job_id={}", job_id);
        let (status, body) = send(router, request(Method::GET, &uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "succeeded");
        assert_eq!(body["result_payload_ref"], "s3://bucket/out1.png");
    }

    #[tokio::test]
    async fn test_duplicate_signal_is_acknowledged() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());
        let (_, body) = send(
            router.clone(),
            request(Method::POST, "/inference", Some(submission())),
        )
        .await;
        let job_id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();

        let signal = sagemaker_notification(job_id);
        send(
            router.clone(),
            request(Method::POST, "/inference/completion-signal", Some(signal.clone())),
        )
        .await;
        let (status, body) = send(
            router,
            request(Method::POST, "/inference/completion-signal", Some(signal)),
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["disposition"], "already_terminal");
    }

    #[tokio::test]
    async fn test_completed_signal_without_output_location_succeeds() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());
        let (_, body) = send(
            router.clone(),
            request(Method::POST, "/inference", Some(submission())),
        )
        .await;
        let job_id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();

        let signal = json!({
            "invocationStatus": "Completed",
            "inferenceId": job_id.to_string()
        });
        let (status, body) = send(
            router,
            request(Method::POST, "/inference/completion-signal", Some(signal)),
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["disposition"], "applied");
        let job = harness.jobs.get(job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Succeeded);
        assert_eq!(job.result_payload_ref, Some(job.output_location.clone()));
    }

    #[tokio::test]
    async fn test_image_output_after_success() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());
        let (_, body) = send(
            router.clone(),
            request(Method::POST, "/inference", Some(submission())),
        )
        .await;
        let job_id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();
        let uri = format!("/inference/get-inference-job-image-output?job_id={}", job_id);

        let (status, _) = send(router.clone(), request(Method::GET, &uri, None)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        send(
            router.clone(),
            request(
                Method::POST,
                "/inference/completion-signal",
                Some(sagemaker_notification(job_id)),
            ),
        )
        .await;
        let (status, body) = send(router, request(Method::GET, &uri, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result_ref"], "s3://bucket/out1.png");
        assert!(
            body["download_url"]
                .as_str()
                .unwrap()
                .starts_with("https://bucket.s3.amazonaws.com/out1.png")
        );
    }

    #[tokio::test]
    async fn test_unknown_correlation_is_acknowledged() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());

        let (status, body) = send(
            router,
            request(
                Method::POST,
                "/inference/completion-signal",
                Some(sagemaker_notification(Uuid::new_v4())),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["disposition"], "ignored");
        assert_eq!(harness.jobs.len().await, 0);
    }

    #[tokio::test]
    async fn test_missing_parameter_is_bad_request() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());
        let mut body = submission();
        body["parameters"]
            .as_object_mut()
            .unwrap()
            .remove("checkpoint");

        let (status, body) = send(router, request(Method::POST, "/inference", Some(body))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("checkpoint"));
        assert_eq!(harness.jobs.len().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let harness = Harness::new();
        let uri = format!("/inference/get-inference-job?job_id={}", Uuid::new_v4());

        let (status, body) = send(
            create_router(harness.state),
            request(Method::GET, &uri, None),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_rejected_invocation_is_bad_gateway() {
        let harness = Harness::with_backend(Behavior::Reject);

        let (status, body) = send(
            create_router(harness.state.clone()),
            request(Method::POST, "/inference", Some(submission())),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let job_id: Uuid = body["job_id"].as_str().unwrap().parse().unwrap();
        assert_eq!(body["failure_recorded"], true);
        assert_eq!(
            harness.jobs.get(job_id).await.unwrap().status,
            JobStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_list_inference_jobs_pages() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());
        for _ in 0..3 {
            send(
                router.clone(),
                request(Method::POST, "/inference", Some(submission())),
            )
            .await;
        }

        let (status, body) = send(
            router.clone(),
            request(Method::GET, "/inference/list-inference-jobs?limit=2", None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        let token = body["next_page_token"].as_str().unwrap().to_string();

        let uri = format!("/inference/list-inference-jobs?limit=2&page_token={}", token);
        let (_, body) = send(router, request(Method::GET, &uri, None)).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert!(body.get("next_page_token").is_none());
    }

    #[tokio::test]
    async fn test_deploy_and_signal_endpoint() {
        let harness = Harness::new();
        let router = create_router(harness.state.clone());

        let (status, body) = send(
            router.clone(),
            request(
                Method::POST,
                "/inference/deploy-sagemaker-endpoint",
                Some(json!({ "endpoint_name": "sd-endpoint", "instance_type": "ml.g5.2xlarge" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let job_id = body["job_id"].as_str().unwrap().to_string();

        let (status, _) = send(
            router.clone(),
            request(
                Method::POST,
                "/inference/endpoint-deployment-signal",
                Some(json!({ "endpoint_deployment_id": job_id, "outcome": "succeeded" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let uri = format!("/inference/get-endpoint-deployment-job?job_id={}", job_id);
        let (_, body) = send(router.clone(), request(Method::GET, &uri, None)).await;
        assert_eq!(body["status"], "succeeded");

        let (_, body) = send(
            router,
            request(Method::GET, "/inference/list-endpoint-deployment-jobs", None),
        )
        .await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_model_lists() {
        let harness = Harness::with_catalog(ModelCatalog {
            textual_inversion: vec!["easynegative".to_string()],
            ..Default::default()
        });

        let (status, body) = send(
            create_router(harness.state),
            request(Method::GET, "/inference/get-texual-inversion-list", None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "textual_inversion");
        assert_eq!(body["models"], json!(["easynegative"]));
    }

    #[tokio::test]
    async fn test_presigned_upload_url() {
        let harness = Harness::new();

        let (status, body) = send(
            create_router(harness.state),
            request(
                Method::GET,
                "/inference/generate-s3-presigned-url-for-uploading?name=aigc",
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "config/aigc.json");
    }
}
