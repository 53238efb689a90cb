use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GameTitle, StrategyBrief};
use crate::service::{DEFAULT_OPPONENT_MATCHES, DEFAULT_OUR_MATCHES};

#[derive(Debug, Deserialize)]
pub struct CounterStrategyRequest {
    pub opponent_team_id: String,
    pub our_team_id: String,
    pub game: GameTitle,
    #[serde(default = "default_opponent_matches")]
    pub num_opponent_matches: usize,
    #[serde(default = "default_our_matches")]
    pub num_our_matches: usize,
}

fn default_opponent_matches() -> usize {
    DEFAULT_OPPONENT_MATCHES
}

fn default_our_matches() -> usize {
    DEFAULT_OUR_MATCHES
}

pub async fn counter_strategy(
    State(state): State<AppState>,
    Json(request): Json<CounterStrategyRequest>,
) -> Result<Json<StrategyBrief>, ApiError> {
    if request.opponent_team_id.is_empty() || request.our_team_id.is_empty() {
        return Err(ApiError::BadRequest(
            "opponent_team_id and our_team_id must not be empty".to_string(),
        ));
    }

    let brief = state
        .service
        .generate_counter_strategy(
            &request.opponent_team_id,
            &request.our_team_id,
            request.game,
            request.num_opponent_matches,
            request.num_our_matches,
        )
        .await?;

    Ok(Json(brief))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::GridConfig;
    use crate::fetch::{GridClient, MatchFetcher, SeriesSource};
    use crate::service::ScoutingService;
    use crate::strategy::backend::DisabledBackend;
    use crate::strategy::StrategySynthesizer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn mock_state() -> AppState {
        let config = GridConfig {
            use_mock: true,
            ..GridConfig::default()
        };
        let client = Arc::new(GridClient::new(config).unwrap());
        let fetcher = MatchFetcher::new(Arc::clone(&client) as Arc<dyn SeriesSource>, 3);
        let synthesizer = StrategySynthesizer::new(Arc::new(DisabledBackend), 2048);
        AppState::new(Arc::new(ScoutingService::new(client, fetcher, synthesizer)))
    }

    #[tokio::test]
    async fn test_counter_strategy_route_falls_back() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/strategy/counter")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"opponent_team_id": "team_001", "our_team_id": "team_002", "game": "valorant"}"#,
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

        assert_eq!(body["via_fallback"], true);
        assert_eq!(body["opponent_team_id"], "team_001");
        assert!(!body["recommendations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_team_ids_rejected() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/strategy/counter")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"opponent_team_id": "", "our_team_id": "t2", "game": "lol"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
