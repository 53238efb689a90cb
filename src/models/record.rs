//! Raw match telemetry records.
//!
//! The remote API returns loosely-typed nested JSON. These types are the
//! explicit record shapes the rest of the pipeline works with, populated by
//! a defaulting decoder: absent numeric fields become zero, absent identity
//! fields become placeholder labels. The decoder never fails on a missing
//! field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for missing names in raw records.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One completed series between two teams. Immutable once decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub series_id: String,
    pub teams: Vec<SeriesTeam>,
    pub games: Vec<GameRecord>,
}

/// Series-level team identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesTeam {
    pub id: String,
    pub name: String,
}

/// One map/game within a series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub finished: bool,
    pub map_name: Option<String>,
    pub teams: Vec<TeamGameStats>,
}

/// Per-game team line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamGameStats {
    pub id: String,
    pub name: String,
    /// "attack"/"defense" or "blue"/"red"; absent for some titles
    pub side: Option<String>,
    pub score: u32,
    pub players: Vec<PlayerGameStats>,
}

/// Per-game player line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerGameStats {
    pub id: String,
    pub name: String,
    /// Champion or agent picked
    pub character: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    /// Title-specific extras, defaulted to zero when absent
    #[serde(default)]
    pub headshots: u32,
    #[serde(default)]
    pub damage_dealt: u64,
    #[serde(default)]
    pub net_worth: u64,
}

impl MatchRecord {
    /// Decode a series state payload into a record.
    ///
    /// Total over all inputs: anything that is not the expected shape
    /// decodes to empty lists or placeholder values.
    pub fn from_state(series_id: impl Into<String>, state: &Value) -> Self {
        let teams = array_of(state, "teams")
            .iter()
            .map(|t| SeriesTeam {
                id: str_field(t, "id"),
                name: name_field(t),
            })
            .collect();

        let games = array_of(state, "games").iter().map(decode_game).collect();

        Self {
            series_id: series_id.into(),
            teams,
            games,
        }
    }

    /// Locate a game-level team line by identity, never by position.
    pub fn team_in_game<'a>(game: &'a GameRecord, team_id: &str) -> Option<&'a TeamGameStats> {
        game.teams.iter().find(|t| t.id == team_id)
    }
}

fn decode_game(game: &Value) -> GameRecord {
    let map_name = game
        .get("map")
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    GameRecord {
        finished: game.get("finished").and_then(Value::as_bool).unwrap_or(false),
        map_name,
        teams: array_of(game, "teams").iter().map(decode_team).collect(),
    }
}

fn decode_team(team: &Value) -> TeamGameStats {
    let side = team
        .get("side")
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    TeamGameStats {
        id: str_field(team, "id"),
        name: name_field(team),
        side,
        score: u32_field(team, "score"),
        players: array_of(team, "players").iter().map(decode_player).collect(),
    }
}

fn decode_player(player: &Value) -> PlayerGameStats {
    // Assists appear as killAssistsGiven on some titles, assists on others.
    let assists = player
        .get("killAssistsGiven")
        .and_then(Value::as_u64)
        .filter(|&n| n > 0)
        .or_else(|| player.get("assists").and_then(Value::as_u64))
        .unwrap_or(0) as u32;

    PlayerGameStats {
        id: str_field(player, "id"),
        name: name_field(player),
        character: character_name(player),
        kills: u32_field(player, "kills"),
        deaths: u32_field(player, "deaths"),
        assists,
        headshots: u32_field(player, "headshots"),
        damage_dealt: u64_field(player, "damageDealt"),
        net_worth: u64_field(player, "netWorth"),
    }
}

/// The picked character appears as {"character": {"name": ..}} or under a
/// title-specific key ("agent", "champion").
fn character_name(player: &Value) -> String {
    for key in ["character", "agent", "champion"] {
        if let Some(name) = player
            .get(key)
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
        {
            return name.to_string();
        }
    }
    UNKNOWN_LABEL.to_string()
}

fn array_of<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

fn str_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        // Some feeds emit numeric ids
        Some(Value::Number(n)) => n.to_string(),
        _ => "unknown".to_string(),
    }
}

fn name_field(value: &Value) -> String {
    value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_LABEL)
        .to_string()
}

fn u32_field(value: &Value, key: &str) -> u32 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0) as u32
}

fn u64_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}
