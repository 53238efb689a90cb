//! Derived team and player profiles.
//!
//! Profiles are read-only snapshots built once from fully-folded
//! accumulators. Every rate field lies in [0.0, 1.0].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Threat classification for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatLevel::High => write!(f, "high"),
            ThreatLevel::Medium => write!(f, "medium"),
            ThreatLevel::Low => write!(f, "low"),
            ThreatLevel::Unknown => write!(f, "unknown"),
        }
    }
}

/// Win/loss record across analyzed games.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OverallRecord {
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
}

/// Per-map statistics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MapStats {
    pub played: u32,
    pub win_rate: f64,
}

/// Stats for one champion/agent pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterStats {
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub average_kda: f64,
}

/// Complete team analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team_id: String,
    pub team_name: String,
    pub overall_record: OverallRecord,
    pub playstyle: String,
    pub identity: String,

    /// VALORANT map pool; empty for LoL
    #[serde(default)]
    pub map_preferences: BTreeMap<String, MapStats>,

    // LoL phase patterns
    #[serde(default)]
    pub early_game_patterns: Vec<String>,
    #[serde(default)]
    pub mid_game_patterns: Vec<String>,
    #[serde(default)]
    pub late_game_patterns: Vec<String>,

    // VALORANT side tendencies
    #[serde(default)]
    pub attack_tendencies: Vec<String>,
    #[serde(default)]
    pub defense_tendencies: Vec<String>,
    #[serde(default)]
    pub economy_patterns: Vec<String>,

    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Averaged per-game player numbers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AverageStats {
    pub kills: f64,
    pub deaths: f64,
    pub assists: f64,
    pub kda: f64,
    pub win_rate: f64,
    pub games_played: u32,
}

/// Individual player analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub player_name: String,
    pub primary_picks: Vec<CharacterStats>,
    pub playstyle: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub tendencies: Vec<String>,
    pub threat_level: ThreatLevel,
    pub average_stats: AverageStats,
}

/// Player threat assessment for ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerThreat {
    pub player_id: String,
    pub player_name: String,
    pub threat_level: ThreatLevel,
    /// Continuous score in [0.0, 1.0]
    pub threat_score: f64,
    pub primary_picks: Vec<String>,
    pub avg_kda: f64,
    pub games_analyzed: u32,
    pub key_strengths: Vec<String>,
    pub exploitable_weaknesses: Vec<String>,
}
