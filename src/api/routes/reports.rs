use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GameTitle, ScoutingReport};
use crate::service::DEFAULT_OPPONENT_MATCHES;

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub team_id: String,
    pub game: GameTitle,
    #[serde(default = "default_num_matches")]
    pub num_matches: usize,
}

fn default_num_matches() -> usize {
    DEFAULT_OPPONENT_MATCHES
}

pub async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<ScoutingReport>, ApiError> {
    if request.team_id.is_empty() {
        return Err(ApiError::BadRequest("team_id must not be empty".to_string()));
    }
    if request.num_matches == 0 {
        return Err(ApiError::BadRequest(
            "num_matches must be greater than 0".to_string(),
        ));
    }

    let report = state
        .service
        .scouting_report(&request.team_id, request.num_matches, request.game)
        .await?;

    info!(report_id = %report.report_id, team_id = %request.team_id, "stored scouting report");

    let mut reports = state.reports.write().await;
    reports.insert(report.report_id.clone(), report.clone());

    Ok(Json(report))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Json<ScoutingReport>, ApiError> {
    let reports = state.reports.read().await;
    reports
        .get(&report_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("report {}", report_id)))
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub report_id: String,
    pub team_id: String,
    pub team_name: String,
    pub matches_analyzed: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReportHistoryResponse {
    pub reports: Vec<ReportSummary>,
}

pub async fn report_history(
    State(state): State<AppState>,
) -> Result<Json<ReportHistoryResponse>, ApiError> {
    let reports = state.reports.read().await;

    let mut summaries: Vec<ReportSummary> = reports
        .values()
        .map(|report| ReportSummary {
            report_id: report.report_id.clone(),
            team_id: report.opponent_team.team_id.clone(),
            team_name: report.opponent_team.team_name.clone(),
            matches_analyzed: report.matches_analyzed,
            generated_at: report.generated_at,
        })
        .collect();
    summaries.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));

    Ok(Json(ReportHistoryResponse { reports: summaries }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
    pub report_id: String,
}

pub async fn delete_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut reports = state.reports.write().await;
    if reports.remove(&report_id).is_none() {
        return Err(ApiError::NotFound(format!("report {}", report_id)));
    }

    Ok(Json(DeleteResponse {
        status: "deleted",
        report_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
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
    async fn test_generate_then_fetch_report() {
        let state = mock_state();
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reports/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"team_id": "team_001", "game": "valorant", "num_matches": 5}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        let report_id = report["report_id"].as_str().unwrap().to_string();
        assert_eq!(report["matches_analyzed"], 5);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/reports/{}", report_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_report_is_404() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/reports/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_empty_team_id_rejected() {
        let app = build_router(mock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reports/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"team_id": "", "game": "lol"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_report() {
        let state = mock_state();
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reports/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"team_id": "team_001", "game": "valorant"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let report = body_json(response).await;
        let report_id = report["report_id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/reports/{}", report_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/reports/{}", report_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_lists_generated_reports() {
        let state = mock_state();
        let app = build_router(state.clone());

        for _ in 0..2 {
            app.clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/reports/generate")
                        .header("content-type", "application/json")
                        .body(Body::from(r#"{"team_id": "team_001", "game": "valorant"}"#))
                        .unwrap(),
                )
                .await
                .unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/reports/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["reports"].as_array().unwrap().len(), 2);
        assert_eq!(body["reports"][0]["team_name"], "Mock Team");
    }
}
