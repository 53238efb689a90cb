//! Composition extraction and archetype analysis.
//!
//! Compositions are derived from game records by grouping each finished
//! game's picks into a sorted character set. Classification walks the
//! archetype rules in fixed precedence order, so a comp matching several
//! archetypes always lands on the same one.

pub mod tables;

use std::collections::BTreeMap;

use crate::models::{Archetype, CompositionProfile, GameTitle, MatchRecord};

use tables::{any_in, count_in, LOL_TABLES, VALORANT_TABLES};

/// One distinct character set and its record.
#[derive(Debug, Clone)]
pub struct CompositionCount {
    /// Sorted character names
    pub characters: Vec<String>,
    pub games: u32,
    pub wins: u32,
    /// First map the set was observed on (VALORANT)
    pub map: Option<String>,
}

/// Group a team's finished games by character set, most played first.
///
/// Returns at most the ten most common sets; ties break on the character
/// names so output order is deterministic.
pub fn extract_compositions(team_id: &str, records: &[MatchRecord]) -> Vec<CompositionCount> {
    let mut grouped: BTreeMap<Vec<String>, CompositionCount> = BTreeMap::new();

    for record in records {
        for game in &record.games {
            if !game.finished {
                continue;
            }
            let Some(our_team) = MatchRecord::team_in_game(game, team_id) else {
                continue;
            };
            if our_team.players.is_empty() {
                continue;
            }

            let mut characters: Vec<String> = our_team
                .players
                .iter()
                .map(|p| p.character.clone())
                .collect();
            characters.sort();

            let enemy_score = game
                .teams
                .iter()
                .find(|t| t.id != team_id)
                .map(|t| t.score)
                .unwrap_or(0);
            let won = our_team.score > enemy_score;

            let entry = grouped
                .entry(characters.clone())
                .or_insert_with(|| CompositionCount {
                    characters,
                    games: 0,
                    wins: 0,
                    map: None,
                });
            entry.games += 1;
            if won {
                entry.wins += 1;
            }
            if entry.map.is_none() {
                entry.map = game.map_name.clone();
            }
        }
    }

    let mut comps: Vec<CompositionCount> = grouped.into_values().collect();
    comps.sort_by(|a, b| b.games.cmp(&a.games).then(a.characters.cmp(&b.characters)));
    comps.truncate(10);
    comps
}

/// Analyze extracted compositions into full profiles.
pub fn analyze(title: GameTitle, comps: &[CompositionCount]) -> Vec<CompositionProfile> {
    comps
        .iter()
        .map(|comp| match title {
            GameTitle::Lol => analyze_lol(comp),
            GameTitle::Valorant => analyze_valorant(comp),
        })
        .collect()
}

/// Classify a character set into its archetype.
pub fn classify(title: GameTitle, characters: &[String]) -> Archetype {
    match title {
        GameTitle::Lol => {
            if count_in(characters, LOL_TABLES.engage) >= 2 {
                Archetype::TeamfightEngage
            } else if count_in(characters, LOL_TABLES.poke) >= 2 {
                Archetype::PokeSiege
            } else if count_in(characters, LOL_TABLES.split) >= 1 {
                Archetype::SplitPush
            } else {
                Archetype::StandardSkirmish
            }
        }
        GameTitle::Valorant => {
            if count_in(characters, VALORANT_TABLES.duelists) >= 2 {
                Archetype::EntryFocused
            } else if count_in(characters, VALORANT_TABLES.controllers) >= 2 {
                Archetype::ControlExecute
            } else if count_in(characters, VALORANT_TABLES.initiators) >= 2 {
                Archetype::InformationBased
            } else {
                Archetype::StandardBalanced
            }
        }
    }
}

fn win_rate(comp: &CompositionCount) -> f64 {
    if comp.games == 0 {
        0.0
    } else {
        f64::from(comp.wins) / f64::from(comp.games)
    }
}

fn analyze_lol(comp: &CompositionCount) -> CompositionProfile {
    let archetype = classify(GameTitle::Lol, &comp.characters);

    let strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if count_in(&comp.characters, LOL_TABLES.ap_heavy) >= 3 {
        weaknesses.push("AP-heavy, vulnerable to MR stacking".to_string());
    }
    if count_in(&comp.characters, LOL_TABLES.ad_heavy) >= 3 {
        weaknesses.push("AD-heavy, vulnerable to armor stacking".to_string());
    }

    let mut power_spikes = Vec::new();
    if count_in(&comp.characters, LOL_TABLES.early_game) >= 2 {
        power_spikes.push("Strong levels 1-10".to_string());
    }
    if count_in(&comp.characters, LOL_TABLES.mid_game) >= 2 {
        power_spikes.push("2-item power spike (~20-25 min)".to_string());
    }
    if count_in(&comp.characters, LOL_TABLES.late_game) >= 2 {
        power_spikes.push("Strong 35+ minutes".to_string());
    }
    if power_spikes.is_empty() {
        power_spikes.push("Moderate scaling throughout game".to_string());
    }

    let mut counter_strategies = Vec::new();
    match archetype {
        Archetype::TeamfightEngage => counter_strategies.extend([
            "Pick disengage/peel compositions".to_string(),
            "Avoid 5v5 fights, focus on side lanes".to_string(),
            "Split map pressure to prevent grouping".to_string(),
        ]),
        Archetype::PokeSiege => counter_strategies.extend([
            "Hard engage to close distance quickly".to_string(),
            "Flank angles to bypass poke zones".to_string(),
            "1-3-1 to prevent siege grouping".to_string(),
        ]),
        Archetype::SplitPush => counter_strategies.extend([
            "Force fights before they split".to_string(),
            "Strong waveclear to match side pressure".to_string(),
            "Collapse quickly with globals".to_string(),
        ]),
        _ => {}
    }

    CompositionProfile {
        composition: comp.characters.clone(),
        games_played: comp.games,
        win_rate: win_rate(comp),
        archetype,
        strengths,
        weaknesses,
        power_spikes,
        counter_strategies,
        map: None,
    }
}

fn analyze_valorant(comp: &CompositionCount) -> CompositionProfile {
    let archetype = classify(GameTitle::Valorant, &comp.characters);

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if any_in(&comp.characters, VALORANT_TABLES.smokes) {
        strengths.push("Has smoke coverage for executes".to_string());
    } else {
        weaknesses.push("No smoke agent - limited execute options".to_string());
    }

    if any_in(&comp.characters, VALORANT_TABLES.flashes) {
        strengths.push("Flash utility for entries".to_string());
    } else {
        weaknesses.push("No flash utility - harder entries".to_string());
    }

    if any_in(&comp.characters, VALORANT_TABLES.info) {
        strengths.push("Information gathering capability".to_string());
    } else {
        weaknesses.push("Limited information gathering".to_string());
    }

    let mut counter_strategies = Vec::new();
    if comp.characters.iter().any(|c| c == "Viper") {
        counter_strategies.push("Push through Viper wall early before lineup".to_string());
    }
    if comp.characters.iter().any(|c| c == "Killjoy") {
        counter_strategies.push("Hunt for Killjoy utility pre-execute".to_string());
    }
    if comp.characters.iter().any(|c| c == "Sova") {
        counter_strategies.push("Avoid common recon positions".to_string());
    }
    if count_in(&comp.characters, VALORANT_TABLES.duelists) >= 2 {
        counter_strategies.push("Expect aggressive entries - hold angles passively".to_string());
    }

    CompositionProfile {
        composition: comp.characters.clone(),
        games_played: comp.games,
        win_rate: win_rate(comp),
        archetype,
        strengths,
        weaknesses,
        power_spikes: Vec::new(),
        counter_strategies,
        map: comp.map.clone(),
    }
}
