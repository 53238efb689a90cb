//! Counter-strategy brief shapes.
//!
//! The same shape is produced by both generation paths (text model and
//! deterministic fallback) so callers never care which one executed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One actionable counter-strategy recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    /// "High", "Medium" or "Low"
    pub priority: String,
    /// e.g. "Draft", "Early Game", "Macro"
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub execution_steps: Vec<String>,
}

/// Player-vs-player matchup note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMatchup {
    #[serde(default)]
    pub our_player: String,
    #[serde(default)]
    pub their_player: String,
    /// "Favorable", "Unfavorable" or "Even"
    #[serde(default)]
    pub advantage: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Complete counter-strategy brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyBrief {
    pub opponent_team_id: String,
    pub our_team_id: String,
    pub recommendations: Vec<Recommendation>,
    pub win_conditions: Vec<String>,
    /// Draft advice for LoL, map veto advice for VALORANT
    pub draft_map_advice: Vec<String>,
    pub key_matchups: Vec<KeyMatchup>,
    pub summary: String,
    /// True when the deterministic fallback produced this brief
    pub via_fallback: bool,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_roundtrip() {
        let brief = StrategyBrief {
            opponent_team_id: "t1".to_string(),
            our_team_id: "t2".to_string(),
            recommendations: vec![Recommendation {
                title: "Exploit slow rotations".to_string(),
                priority: "Medium".to_string(),
                category: "General".to_string(),
                description: "Focus on their slow rotations".to_string(),
                execution_steps: vec!["Fake one site, hit the other".to_string()],
            }],
            win_conditions: vec!["Win pistol rounds".to_string()],
            draft_map_advice: vec!["Veto their best map".to_string()],
            key_matchups: vec![],
            summary: "Plan".to_string(),
            via_fallback: true,
            generated_at: Utc::now(),
        };

        let json = serde_json::to_string(&brief).unwrap();
        let parsed: StrategyBrief = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.recommendations.len(), 1);
        assert!(parsed.via_fallback);
    }

    #[test]
    fn test_matchup_defaults() {
        let parsed: KeyMatchup = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.advantage, "");
        assert!(parsed.tips.is_empty());
    }
}
