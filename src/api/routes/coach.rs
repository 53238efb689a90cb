use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::GameTitle;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub game: Option<GameTitle>,
    /// Report data the caller already has, passed through as model context
    /// instead of refetching.
    #[serde(default)]
    pub context_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.is_empty() {
        return Err(ApiError::BadRequest(
            "message must not be empty".to_string(),
        ));
    }

    let response = state
        .service
        .coach_chat(
            &request.message,
            request.team_id.as_deref(),
            request.game,
            request.context_data.as_ref(),
        )
        .await?;

    Ok(Json(ChatResponse { response }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::GridConfig;
    use crate::fetch::{GridClient, MatchFetcher, SeriesSource};
    use crate::service::ScoutingService;
    use crate::strategy::backend::{DisabledBackend, MockBackend, TextBackend};
    use crate::strategy::StrategySynthesizer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn state_with_backend(backend: Arc<dyn TextBackend>) -> AppState {
        let config = GridConfig {
            use_mock: true,
            ..GridConfig::default()
        };
        let client = Arc::new(GridClient::new(config).unwrap());
        let fetcher = MatchFetcher::new(Arc::clone(&client) as Arc<dyn SeriesSource>, 3);
        let synthesizer = StrategySynthesizer::new(backend, 2048);
        AppState::new(Arc::new(ScoutingService::new(client, fetcher, synthesizer)))
    }

    #[tokio::test]
    async fn test_chat_returns_model_text() {
        let app = build_router(state_with_backend(Arc::new(MockBackend::new(
            "Focus on winning your pistol rounds.",
        ))));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/coach/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"message": "How do we start the match?", "context_data": {"playstyle": "Aggressive"}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["response"], "Focus on winning your pistol rounds.");
    }

    #[tokio::test]
    async fn test_chat_with_dead_backend_is_bad_gateway() {
        let app = build_router(state_with_backend(Arc::new(DisabledBackend)));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/coach/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "Any advice?"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let app = build_router(state_with_backend(Arc::new(DisabledBackend)));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/coach/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
