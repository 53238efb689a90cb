//! Canned series data for offline development.
//!
//! Shapes match the live Series State responses exactly, so everything
//! downstream of the decoder behaves identically in mock mode. Content is
//! derived deterministically from the series id, giving stable but varied
//! results across a listing.

use serde_json::{json, Value};

use crate::models::TeamSearchResult;

const MOCK_TEAM_ID: &str = "team_001";
const MOCK_TEAM_NAME: &str = "Mock Team";
const RIVAL_TEAM_ID: &str = "team_002";
const RIVAL_TEAM_NAME: &str = "Rival Esports";

const MAPS: [&str; 5] = ["Ascent", "Haven", "Bind", "Split", "Lotus"];

const MOCK_ROSTER: [(&str, &str, &str); 5] = [
    ("p_101", "blaze", "Jett"),
    ("p_102", "wall", "Omen"),
    ("p_103", "scan", "Sova"),
    ("p_104", "lock", "Killjoy"),
    ("p_105", "flash", "Breach"),
];

const RIVAL_ROSTER: [(&str, &str, &str); 5] = [
    ("p_201", "rush", "Raze"),
    ("p_202", "haze", "Brimstone"),
    ("p_203", "ping", "Fade"),
    ("p_204", "hold", "Cypher"),
    ("p_205", "pop", "Skye"),
];

/// Canned series listing for a team.
pub fn series_ids(team_id: &str, limit: usize) -> Vec<String> {
    (1..=limit)
        .map(|i| format!("mock-series-{}-{}", team_id, i))
        .collect()
}

/// Display name for a canned team.
pub fn team_name(team_id: &str) -> String {
    match team_id {
        RIVAL_TEAM_ID => RIVAL_TEAM_NAME.to_string(),
        MOCK_TEAM_ID => MOCK_TEAM_NAME.to_string(),
        other => format!("Team {}", other),
    }
}

/// Case-insensitive substring search over the canned teams.
pub fn search_teams(name: &str, limit: usize) -> Vec<TeamSearchResult> {
    let needle = name.to_lowercase();
    [
        (MOCK_TEAM_ID, MOCK_TEAM_NAME),
        (RIVAL_TEAM_ID, RIVAL_TEAM_NAME),
    ]
    .iter()
    .filter(|(_, team_name)| team_name.to_lowercase().contains(&needle))
    .take(limit)
    .map(|(id, team_name)| TeamSearchResult {
        team_id: id.to_string(),
        team_name: team_name.to_string(),
        name_shortened: None,
        logo_url: None,
        primary_color: None,
    })
    .collect()
}

/// Canned series state. The trailing number in the id drives which team
/// wins and how lopsided the scoreline is.
pub fn series_state(series_id: &str) -> Value {
    let seed = series_id
        .rsplit('-')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);

    // Mock Team wins two of every three series.
    let mock_wins = seed % 3 != 0;
    let map = MAPS[(seed as usize) % MAPS.len()];
    let loser_score = 5 + (seed % 8);

    let (s1, s2) = if mock_wins {
        (13, loser_score)
    } else {
        (loser_score, 13)
    };

    json!({
        "id": series_id,
        "finished": true,
        "teams": [
            { "id": MOCK_TEAM_ID, "name": MOCK_TEAM_NAME, "score": if mock_wins { 1 } else { 0 }, "won": mock_wins },
            { "id": RIVAL_TEAM_ID, "name": RIVAL_TEAM_NAME, "score": if mock_wins { 0 } else { 1 }, "won": !mock_wins }
        ],
        "games": [{
            "id": format!("{}-g1", series_id),
            "sequenceNumber": 1,
            "finished": true,
            "map": { "name": map },
            "teams": [
                team_game(MOCK_TEAM_ID, MOCK_TEAM_NAME, "attack", s1, &MOCK_ROSTER, seed, mock_wins),
                team_game(RIVAL_TEAM_ID, RIVAL_TEAM_NAME, "defense", s2, &RIVAL_ROSTER, seed, !mock_wins)
            ]
        }]
    })
}

fn team_game(
    id: &str,
    name: &str,
    side: &str,
    score: u32,
    roster: &[(&str, &str, &str)],
    seed: u32,
    won: bool,
) -> Value {
    let players: Vec<Value> = roster
        .iter()
        .enumerate()
        .map(|(i, (pid, pname, agent))| {
            let idx = i as u32;
            let base = if won { 16 } else { 11 };
            json!({
                "id": pid,
                "name": pname,
                "kills": base + (seed + idx * 3) % 9,
                "deaths": 10 + (seed + idx) % 7,
                "killAssistsGiven": 3 + (seed + idx * 2) % 8,
                "character": { "name": agent }
            })
        })
        .collect();

    json!({
        "id": id,
        "name": name,
        "side": side,
        "score": score,
        "won": won,
        "players": players
    })
}
