//! Match-data API client.
//!
//! Talks GraphQL to two endpoints: Central Data for series listings and team
//! metadata, Series State for per-game statistics. All remote access goes
//! through the [`SeriesSource`] trait so the rest of the pipeline can be
//! tested without a network.

pub mod coordinator;
pub mod mock;

pub use coordinator::MatchFetcher;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::GridConfig;
use crate::models::{GameTitle, TeamSearchResult};

/// Errors from the match-data API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("API key not set (expected in {0})")]
    MissingApiKey(String),

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

/// Read access to series listings and per-series state.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Most recent series ids for a team, newest first.
    async fn list_series_by_team(
        &self,
        team_id: &str,
        limit: usize,
        title: GameTitle,
    ) -> Result<Vec<String>, FetchError>;

    /// Full post-game state for one series.
    async fn series_state(&self, series_id: &str) -> Result<Value, FetchError>;

    /// Team display name, if the API knows the team.
    async fn team_name(&self, team_id: &str) -> Option<String>;

    /// Teams whose name contains the query, case-insensitive.
    async fn search_teams(
        &self,
        name: &str,
        limit: usize,
        title: GameTitle,
    ) -> Result<Vec<TeamSearchResult>, FetchError>;
}

const LIST_SERIES_QUERY: &str = r#"
query ListSeriesByTeam($teamIds: [ID!], $titleIds: [ID!], $first: Int) {
  allSeries(
    filter: { teamIds: { in: $teamIds }, titleIds: { in: $titleIds } }
    first: $first
    orderBy: StartTimeScheduled
    orderDirection: DESC
  ) {
    edges {
      node {
        id
        startTimeScheduled
      }
    }
  }
}
"#;

const TEAM_QUERY: &str = r#"
query GetTeam($teamId: ID!) {
  team(id: $teamId) {
    id
    name
  }
}
"#;

const SEARCH_TEAMS_QUERY: &str = r#"
query SearchTeams($first: Int!, $filter: TeamFilter) {
  teams(first: $first, filter: $filter) {
    edges {
      node {
        id
        name
        nameShortened
        colorPrimary
        logoUrl
      }
    }
  }
}
"#;

const SERIES_STATE_QUERY: &str = r#"
query GetSeriesState($seriesId: ID!) {
  seriesState(id: $seriesId) {
    id
    finished
    teams {
      id
      name
      score
      won
    }
    games {
      id
      sequenceNumber
      finished
      map {
        name
      }
      teams {
        id
        name
        side
        score
        won
        players {
          id
          name
          kills
          deaths
          killAssistsGiven
          character {
            name
          }
        }
      }
    }
  }
}
"#;

/// GraphQL client for the match-data API.
///
/// Responses are cached for the lifetime of the client, keyed by endpoint
/// and variables. Scouting workflows re-request the same series repeatedly,
/// so the cache saves most of the round trips.
pub struct GridClient {
    http: reqwest::Client,
    config: GridConfig,
    api_key: Option<String>,
    cache: Mutex<HashMap<String, Value>>,
}

impl GridClient {
    /// Build a client from configuration. The API key is read from the
    /// environment variable named in the config; it may be absent when
    /// running in mock mode.
    pub fn new(config: GridConfig) -> Result<Self, FetchError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() && !config.use_mock {
            return Err(FetchError::MissingApiKey(config.api_key_env.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            config,
            api_key,
            cache: Mutex::new(HashMap::new()),
        })
    }

    async fn post_graphql(
        &self,
        url: &str,
        query: &str,
        variables: Value,
    ) -> Result<Value, FetchError> {
        let cache_key = cache_key(url, query, &variables);
        {
            let cache = self.cache.lock().await;
            if let Some(hit) = cache.get(&cache_key) {
                debug!(url, "cache hit");
                return Ok(hit.clone());
            }
        }

        let body = json!({ "query": query, "variables": variables });
        let mut request = self.http.post(url).json(&body);

        if let Some(key) = &self.api_key {
            request = match self.config.auth_method.as_str() {
                "bearer" => request.bearer_auth(key),
                _ => request.header("x-api-key", key),
            };
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;

        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(FetchError::Api(message));
            }
        }

        let data = payload
            .get("data")
            .cloned()
            .ok_or_else(|| FetchError::Shape("response has no data field".to_string()))?;

        let mut cache = self.cache.lock().await;
        cache.insert(cache_key, data.clone());
        Ok(data)
    }
}

/// Cache key for one GraphQL request. The full query text goes in so two
/// different queries against the same endpoint can never collide.
fn cache_key(url: &str, query: &str, variables: &Value) -> String {
    format!("{}|{}|{}", url, query, variables)
}

#[async_trait]
impl SeriesSource for GridClient {
    async fn list_series_by_team(
        &self,
        team_id: &str,
        limit: usize,
        title: GameTitle,
    ) -> Result<Vec<String>, FetchError> {
        if self.config.use_mock {
            return Ok(mock::series_ids(team_id, limit));
        }

        let variables = json!({
            "teamIds": [team_id],
            "titleIds": [title.title_id()],
            "first": limit,
        });

        let data = self
            .post_graphql(&self.config.central_data_url, LIST_SERIES_QUERY, variables)
            .await?;

        let edges = data
            .get("allSeries")
            .and_then(|s| s.get("edges"))
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Shape("allSeries.edges missing".to_string()))?;

        let ids = edges
            .iter()
            .filter_map(|e| e.get("node").and_then(|n| n.get("id")))
            .filter_map(Value::as_str)
            .map(|s| s.to_string())
            .collect();

        Ok(ids)
    }

    async fn series_state(&self, series_id: &str) -> Result<Value, FetchError> {
        if self.config.use_mock {
            return Ok(mock::series_state(series_id));
        }

        let variables = json!({ "seriesId": series_id });
        let data = self
            .post_graphql(&self.config.series_state_url, SERIES_STATE_QUERY, variables)
            .await?;

        data.get("seriesState")
            .filter(|s| !s.is_null())
            .cloned()
            .ok_or_else(|| FetchError::Shape(format!("no state for series {}", series_id)))
    }

    async fn team_name(&self, team_id: &str) -> Option<String> {
        if self.config.use_mock {
            return Some(mock::team_name(team_id));
        }

        let variables = json!({ "teamId": team_id });
        let data = match self
            .post_graphql(&self.config.central_data_url, TEAM_QUERY, variables)
            .await
        {
            Ok(data) => data,
            Err(err) => {
                warn!(team_id, error = %err, "team lookup failed");
                return None;
            }
        };

        data.get("team")
            .and_then(|t| t.get("name"))
            .and_then(Value::as_str)
            .map(|s| s.to_string())
    }

    async fn search_teams(
        &self,
        name: &str,
        limit: usize,
        title: GameTitle,
    ) -> Result<Vec<TeamSearchResult>, FetchError> {
        if self.config.use_mock {
            return Ok(mock::search_teams(name, limit));
        }

        let variables = json!({
            "first": limit,
            "filter": {
                "name": { "contains": name },
                "titleId": title.title_id(),
            },
        });

        let data = self
            .post_graphql(&self.config.central_data_url, SEARCH_TEAMS_QUERY, variables)
            .await?;

        let edges = data
            .get("teams")
            .and_then(|t| t.get("edges"))
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::Shape("teams.edges missing".to_string()))?;

        let as_string = |node: &Value, key: &str| {
            node.get(key)
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        };

        let results = edges
            .iter()
            .filter_map(|e| e.get("node"))
            .map(|node| TeamSearchResult {
                team_id: as_string(node, "id").unwrap_or_default(),
                team_name: as_string(node, "name").unwrap_or_else(|| "Unknown".to_string()),
                name_shortened: as_string(node, "nameShortened"),
                logo_url: as_string(node, "logoUrl"),
                primary_color: as_string(node, "colorPrimary"),
            })
            .filter(|team| !team.team_id.is_empty())
            .collect();

        Ok(results)
    }
}
