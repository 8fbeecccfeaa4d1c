pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1", get(health::banner_handler))
        // Chat API
        .route("/api/v1/chat/session", post(handlers::handle_create_session))
        .route("/api/v1/chat/session/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/chat/session/:id/export",
            get(handlers::handle_export_session),
        )
        .route("/api/v1/chat/send", post(handlers::handle_send_message))
        // Recruiter API
        .route("/api/v1/candidates", get(handlers::handle_list_candidates))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::screening::engine::{ConversationEngine, EnginePolicy};
    use crate::screening::question_generator::QuestionGenerator;
    use crate::screening::service::ScreeningService;
    use crate::store::MemorySessionStore;

    fn app() -> Router {
        let engine = ConversationEngine::new(
            Arc::new(QuestionGenerator::bank_only(Duration::from_secs(1))),
            EnginePolicy::default(),
        );
        let screening = Arc::new(ScreeningService::new(
            Arc::new(MemorySessionStore::new()),
            engine,
        ));
        build_router(AppState { screening })
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_banner() {
        let app = app();
        let (status, body) = call(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");

        let (status, body) = call(&app, get_req("/api/v1")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("Hiring Assistant"));
    }

    #[tokio::test]
    async fn test_session_lifecycle_over_http() {
        let app = app();
        let (status, created) = call(&app, post_json("/api/v1/chat/session", json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["step"], "name");
        let id = created["session_id"].as_str().unwrap().to_string();

        let (status, turn) = call(
            &app,
            post_json(
                "/api/v1/chat/send",
                json!({"session_id": id, "message": "Jane Doe"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["step"], "email");
        assert_eq!(turn["profile"]["full_name"], "Jane Doe");
        assert!(turn["progress"].as_u64().unwrap() > 0);

        let (status, session) = call(&app, get_req(&format!("/api/v1/chat/session/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["transcript"].as_array().unwrap().len(), 3);

        let (status, export) =
            call(&app, get_req(&format!("/api/v1/chat/session/{id}/export"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(export["profile"]["full_name"], "Jane Doe");
        assert!(export["questions_and_answers"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_404_with_error_body() {
        let app = app();
        let missing = Uuid::new_v4();
        let (status, body) = call(
            &app,
            post_json(
                "/api/v1/chat/send",
                json!({"session_id": missing, "message": "hello"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");

        let (status, _) = call(&app, get_req(&format!("/api/v1/chat/session/{missing}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_message_is_a_normal_turn() {
        let app = app();
        let (_, created) = call(&app, post_json("/api/v1/chat/session", json!({}))).await;
        let (status, body) = call(
            &app,
            post_json(
                "/api/v1/chat/send",
                json!({"session_id": created["session_id"], "message": "  "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["step"], "name");
        assert_eq!(body["bot_messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_message_is_400() {
        let app = app();
        let (_, created) = call(&app, post_json("/api/v1/chat/session", json!({}))).await;
        let (status, body) = call(
            &app,
            post_json(
                "/api/v1/chat/send",
                json!({"session_id": created["session_id"], "message": "x".repeat(5000)}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_candidates_starts_empty() {
        let app = app();
        let (status, body) = call(&app, get_req("/api/v1/candidates")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
