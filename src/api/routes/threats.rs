use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{GameTitle, ThreatRanking};
use crate::service::DEFAULT_OPPONENT_MATCHES;

#[derive(Debug, Deserialize)]
pub struct ThreatQuery {
    pub game: GameTitle,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_OPPONENT_MATCHES
}

pub async fn threat_ranking(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(query): Query<ThreatQuery>,
) -> Result<Json<ThreatRanking>, ApiError> {
    if query.limit == 0 {
        return Err(ApiError::BadRequest("limit must be greater than 0".to_string()));
    }

    let ranking = state
        .service
        .threat_ranking(&team_id, query.limit, query.game)
        .await?;

    Ok(Json(ranking))
}
