//! Assembled scouting artifacts returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CompositionProfile, PlayerProfile, PlayerThreat, TeamProfile};

/// Complete scouting report for one opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutingReport {
    pub report_id: String,
    pub opponent_team: TeamProfile,
    #[serde(default)]
    pub player_profiles: Vec<PlayerProfile>,
    #[serde(default)]
    pub compositions: Vec<CompositionProfile>,
    pub key_findings: Vec<String>,
    pub preparation_priorities: Vec<String>,
    pub executive_summary: String,
    pub matches_analyzed: usize,
    pub generated_at: DateTime<Utc>,
}

/// Single team returned by a name search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSearchResult {
    pub team_id: String,
    pub team_name: String,
    #[serde(default)]
    pub name_shortened: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
}

/// Head-to-head comparison of two teams' recent form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamComparison {
    pub team_a: TeamProfile,
    pub team_b: TeamProfile,
    pub comparison_summary: String,
    pub advantage: Option<String>,
    pub key_differences: Vec<String>,
    pub matchup_prediction: String,
    pub generated_at: DateTime<Utc>,
}

/// Per-map record with approximated attack/defense round splits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedMapStats {
    pub map_name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub attack_rounds_won: u32,
    pub attack_rounds_total: u32,
    pub attack_win_rate: f64,
    pub defense_rounds_won: u32,
    pub defense_rounds_total: u32,
    pub defense_win_rate: f64,
    pub avg_rounds_per_game: f64,
}

/// Map pool breakdown for one team, most played first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapStatsReport {
    pub team_id: String,
    pub team_name: String,
    pub maps: Vec<DetailedMapStats>,
    pub best_map: Option<String>,
    pub worst_map: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Players ranked by threat score, highest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatRanking {
    pub team_id: String,
    pub team_name: String,
    pub players: Vec<PlayerThreat>,
    pub top_threat: Option<String>,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}
