use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GameTitle, MapStatsReport, TeamComparison, TeamSearchResult};
use crate::service::DEFAULT_OPPONENT_MATCHES;

#[derive(Debug, Deserialize)]
pub struct TeamSearchQuery {
    pub name: String,
    pub game: GameTitle,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
pub struct TeamSearchResponse {
    pub query: String,
    pub game: GameTitle,
    pub results: Vec<TeamSearchResult>,
    pub total_count: usize,
}

pub async fn search_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamSearchQuery>,
) -> Result<Json<TeamSearchResponse>, ApiError> {
    if query.name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let results = state
        .service
        .search_teams(&query.name, query.limit, query.game)
        .await?;

    Ok(Json(TeamSearchResponse {
        query: query.name,
        game: query.game,
        total_count: results.len(),
        results,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub team_a_id: String,
    pub team_b_id: String,
    pub game: GameTitle,
    #[serde(default = "default_num_matches")]
    pub num_matches: usize,
}

fn default_num_matches() -> usize {
    DEFAULT_OPPONENT_MATCHES
}

pub async fn compare_teams(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<TeamComparison>, ApiError> {
    if request.team_a_id.is_empty() || request.team_b_id.is_empty() {
        return Err(ApiError::BadRequest(
            "team_a_id and team_b_id must not be empty".to_string(),
        ));
    }
    if request.num_matches == 0 {
        return Err(ApiError::BadRequest(
            "num_matches must be greater than 0".to_string(),
        ));
    }

    let comparison = state
        .service
        .compare_teams(
            &request.team_a_id,
            &request.team_b_id,
            request.num_matches,
            request.game,
        )
        .await?;

    Ok(Json(comparison))
}

#[derive(Debug, Deserialize)]
pub struct MapStatsQuery {
    #[serde(default = "default_map_limit")]
    pub limit: usize,
}

fn default_map_limit() -> usize {
    DEFAULT_OPPONENT_MATCHES
}

pub async fn map_stats(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(query): Query<MapStatsQuery>,
) -> Result<Json<MapStatsReport>, ApiError> {
    if query.limit == 0 {
        return Err(ApiError::BadRequest(
            "limit must be greater than 0".to_string(),
        ));
    }

    let report = state.service.map_stats(&team_id, query.limit).await?;
    Ok(Json(report))
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

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_route_finds_canned_team() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/teams/search?name=mock&game=valorant")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["results"][0]["team_id"], "team_001");
        assert_eq!(body["query"], "mock");
    }

    #[tokio::test]
    async fn test_compare_route() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/compare")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"team_a_id": "team_001", "team_b_id": "team_002", "game": "valorant"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["advantage"], "Mock Team");
        assert_eq!(body["team_a"]["team_name"], "Mock Team");
        assert!(body["matchup_prediction"]
            .as_str()
            .unwrap()
            .contains("favored to win"));
    }

    #[tokio::test]
    async fn test_compare_rejects_empty_ids() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/compare")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"team_a_id": "", "team_b_id": "t2", "game": "lol"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_map_stats_route() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/maps/stats/team_001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["team_name"], "Mock Team");
        assert_eq!(body["maps"].as_array().unwrap().len(), 5);
        assert!(body["best_map"].is_string());
    }
}
