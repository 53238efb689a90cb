//! Deterministic profile classification.
//!
//! Pure functions from fully-folded accumulators to profiles. No I/O, no
//! randomness: the same accumulator always produces the same profile, so
//! every rule here is directly unit-testable.

use crate::aggregate::{PlayerAccumulator, TeamAccumulator};
use crate::models::{
    AverageStats, CharacterStats, GameTitle, MapStats, OverallRecord, PlayerProfile, PlayerThreat,
    TeamProfile, ThreatLevel,
};

/// Aggregate KDA with the zero-death floor.
pub fn kda(kills: u64, deaths: u64, assists: u64) -> f64 {
    (kills + assists) as f64 / deaths.max(1) as f64
}

/// Threat classification from aggregate KDA and win rate.
///
/// The same thresholds apply to every title.
pub fn threat_level(kda: f64, win_rate: f64) -> ThreatLevel {
    if kda > 3.0 && win_rate > 0.55 {
        ThreatLevel::High
    } else if kda < 2.0 || win_rate < 0.45 {
        ThreatLevel::Low
    } else {
        ThreatLevel::Medium
    }
}

/// Continuous threat score in [0.0, 1.0].
///
/// Starts at the 0.5 baseline; KDA and best-pick win rate add bonuses,
/// capped at 1.0. Monotone in both inputs.
pub fn threat_score(avg_kda: f64, best_pick_win_rate: Option<f64>) -> f64 {
    let mut score: f64 = 0.5;

    if avg_kda > 3.0 {
        score += 0.3;
    } else if avg_kda > 2.0 {
        score += 0.2;
    } else if avg_kda > 1.5 {
        score += 0.1;
    }

    if let Some(best_wr) = best_pick_win_rate {
        if best_wr > 0.6 {
            score += 0.15;
        } else if best_wr > 0.5 {
            score += 0.05;
        }
    }

    score.min(1.0)
}

/// Threat level from a continuous score.
pub fn threat_level_from_score(score: f64) -> ThreatLevel {
    if score >= 0.75 {
        ThreatLevel::High
    } else if score >= 0.5 {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}

fn percent(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

/// Build a team profile from accumulated stats.
pub fn team_profile(team_name: &str, acc: &TeamAccumulator) -> TeamProfile {
    match acc.title {
        GameTitle::Lol => lol_team_profile(team_name, acc),
        GameTitle::Valorant => valorant_team_profile(team_name, acc),
    }
}

fn lol_team_profile(team_name: &str, acc: &TeamAccumulator) -> TeamProfile {
    let games_played = acc.games_played();
    let win_rate = acc.win_rate();
    let avg_kills = acc.average_kills();
    let avg_deaths = acc.average_deaths();

    let playstyle = if avg_kills > avg_deaths * 1.2 {
        "Aggressive"
    } else if avg_deaths > avg_kills * 1.2 {
        "Passive/Scaling"
    } else {
        "Balanced"
    };

    let identity = if win_rate > 0.6 {
        format!("Strong team with {} win rate", percent(win_rate))
    } else if win_rate < 0.4 {
        format!("Struggling team with {} win rate", percent(win_rate))
    } else {
        format!("Competitive team with {} win rate", percent(win_rate))
    };

    let mut early_game_patterns = Vec::new();
    let mut mid_game_patterns = Vec::new();

    if avg_kills > 15.0 {
        early_game_patterns.push("High kill activity in laning phase".to_string());
    }
    if games_played > 0 {
        let kd_ratio = avg_kills / avg_deaths.max(1.0);
        if kd_ratio > 1.3 {
            mid_game_patterns.push("Strong mid-game team fighting".to_string());
        } else if kd_ratio < 0.8 {
            mid_game_patterns.push("Struggles in mid-game skirmishes".to_string());
        }
    }

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if win_rate > 0.55 {
        strengths.push("Consistent winner".to_string());
    }
    if avg_kills > 20.0 {
        strengths.push("High kill threat".to_string());
    }
    if avg_deaths < 10.0 {
        strengths.push("Clean gameplay, few deaths".to_string());
    }

    if win_rate < 0.45 {
        weaknesses.push("Inconsistent results".to_string());
    }
    if avg_deaths > 15.0 {
        weaknesses.push("Prone to giving up kills".to_string());
    }
    if games_played < 3 {
        weaknesses.push("Limited recent match data".to_string());
    }

    if strengths.is_empty() {
        strengths.push("No clear strengths identified".to_string());
    }
    if weaknesses.is_empty() {
        weaknesses.push("No clear weaknesses identified".to_string());
    }

    TeamProfile {
        team_id: acc.team_id.clone(),
        team_name: team_name.to_string(),
        overall_record: OverallRecord {
            wins: acc.record.wins,
            losses: acc.record.losses,
            games_played,
        },
        playstyle: playstyle.to_string(),
        identity,
        map_preferences: Default::default(),
        early_game_patterns,
        mid_game_patterns,
        late_game_patterns: Vec::new(),
        attack_tendencies: Vec::new(),
        defense_tendencies: Vec::new(),
        economy_patterns: Vec::new(),
        strengths,
        weaknesses,
    }
}

fn valorant_team_profile(team_name: &str, acc: &TeamAccumulator) -> TeamProfile {
    let games_played = acc.games_played();
    let win_rate = acc.win_rate();
    let avg_kills = acc.average_kills();
    let avg_deaths = acc.average_deaths();

    let attack_wr = acc.rounds.attack_rate();
    let defense_wr = acc.rounds.defense_rate();
    let pistol_wr = acc.rounds.pistol_rate();

    let playstyle = if attack_wr > defense_wr + 0.1 {
        "Attack-sided"
    } else if defense_wr > attack_wr + 0.1 {
        "Defense-sided"
    } else {
        "Balanced"
    };

    let identity = if win_rate > 0.6 {
        format!("{} team with strong {} win rate", playstyle, percent(win_rate))
    } else if win_rate < 0.4 {
        format!("{} team struggling with {} win rate", playstyle, percent(win_rate))
    } else {
        format!("{} team with competitive {} win rate", playstyle, percent(win_rate))
    };

    let map_preferences: std::collections::BTreeMap<String, MapStats> = acc
        .maps
        .iter()
        .filter(|(_, wl)| wl.games > 0)
        .map(|(name, wl)| {
            (
                name.clone(),
                MapStats {
                    played: wl.games,
                    win_rate: wl.rate_or(0.0),
                },
            )
        })
        .collect();

    let attack_tendencies = vec![if attack_wr > 0.55 {
        "Strong attack executes".to_string()
    } else if attack_wr < 0.45 {
        "Struggles to convert attack rounds".to_string()
    } else {
        "Average attack round performance".to_string()
    }];

    let defense_tendencies = vec![if defense_wr > 0.55 {
        "Strong defensive setups".to_string()
    } else if defense_wr < 0.45 {
        "Vulnerable on defense".to_string()
    } else {
        "Average defensive performance".to_string()
    }];

    let mut economy_patterns = Vec::new();
    if pistol_wr > 0.55 {
        economy_patterns.push("Strong pistol round conversion".to_string());
    } else if pistol_wr < 0.45 {
        economy_patterns.push("Weak pistol rounds - economy disadvantages likely".to_string());
    }

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if pistol_wr > 0.55 {
        strengths.push("Strong pistol rounds".to_string());
    } else if pistol_wr < 0.45 {
        weaknesses.push("Inconsistent pistol rounds".to_string());
    }

    if attack_wr > 0.55 {
        strengths.push("Effective attack executes".to_string());
    } else if attack_wr < 0.45 {
        weaknesses.push("Struggles on attack".to_string());
    }

    if defense_wr > 0.55 {
        strengths.push("Solid defensive play".to_string());
    } else if defense_wr < 0.45 {
        weaknesses.push("Vulnerable on defense".to_string());
    }

    if win_rate > 0.55 {
        strengths.push(format!(
            "Strong overall record ({}W-{}L)",
            acc.record.wins, acc.record.losses
        ));
    } else if win_rate < 0.45 {
        weaknesses.push(format!(
            "Poor recent form ({}W-{}L)",
            acc.record.wins, acc.record.losses
        ));
    }

    if avg_kills > avg_deaths * 1.2 {
        strengths.push("Positive K/D ratio".to_string());
    } else if avg_deaths > avg_kills * 1.2 {
        weaknesses.push("Negative K/D ratio".to_string());
    }

    if let Some((best_map, best)) = map_preferences
        .iter()
        .max_by(|a, b| a.1.win_rate.total_cmp(&b.1.win_rate))
    {
        if best.win_rate > 0.6 {
            strengths.push(format!("Strong on {} ({} WR)", best_map, percent(best.win_rate)));
        }
    }
    if let Some((worst_map, worst)) = map_preferences
        .iter()
        .min_by(|a, b| a.1.win_rate.total_cmp(&b.1.win_rate))
    {
        if worst.win_rate < 0.4 {
            weaknesses.push(format!("Weak on {} ({} WR)", worst_map, percent(worst.win_rate)));
        }
    }

    if games_played < 3 {
        weaknesses.push("Limited recent match data".to_string());
    }

    if strengths.is_empty() {
        strengths.push("No clear strengths - limited data".to_string());
    }
    if weaknesses.is_empty() {
        weaknesses.push("No clear weaknesses - limited data".to_string());
    }

    TeamProfile {
        team_id: acc.team_id.clone(),
        team_name: team_name.to_string(),
        overall_record: OverallRecord {
            wins: acc.record.wins,
            losses: acc.record.losses,
            games_played,
        },
        playstyle: playstyle.to_string(),
        identity,
        map_preferences,
        early_game_patterns: Vec::new(),
        mid_game_patterns: Vec::new(),
        late_game_patterns: Vec::new(),
        attack_tendencies,
        defense_tendencies,
        economy_patterns,
        strengths,
        weaknesses,
    }
}

const DUELISTS: [&str; 7] = ["Jett", "Raze", "Reyna", "Phoenix", "Yoru", "Neon", "Iso"];

fn primary_pick_stats(acc: &PlayerAccumulator) -> Vec<CharacterStats> {
    acc.primary_picks(5)
        .into_iter()
        .map(|(name, character)| CharacterStats {
            name: name.to_string(),
            games_played: character.record.games,
            wins: character.record.wins,
            losses: character.record.losses,
            win_rate: character.record.rate_or(0.0),
            average_kda: character.average_kda(),
        })
        .collect()
}

/// Build a player profile from accumulated stats.
pub fn player_profile(title: GameTitle, acc: &PlayerAccumulator) -> PlayerProfile {
    if acc.games_played() == 0 {
        return PlayerProfile {
            player_id: acc.player_id.clone(),
            player_name: acc.player_name.clone(),
            primary_picks: Vec::new(),
            playstyle: "unknown".to_string(),
            strengths: Vec::new(),
            weaknesses: vec!["No performance data available".to_string()],
            tendencies: Vec::new(),
            threat_level: ThreatLevel::Unknown,
            average_stats: AverageStats::default(),
        };
    }

    match title {
        GameTitle::Lol => lol_player_profile(acc),
        GameTitle::Valorant => valorant_player_profile(acc),
    }
}

fn average_stats(acc: &PlayerAccumulator) -> AverageStats {
    AverageStats {
        kills: acc.average_kills(),
        deaths: acc.average_deaths(),
        assists: acc.average_assists(),
        kda: acc.kda(),
        win_rate: acc.win_rate(),
        games_played: acc.games_played(),
    }
}

fn lol_player_profile(acc: &PlayerAccumulator) -> PlayerProfile {
    let avg_kills = acc.average_kills();
    let avg_deaths = acc.average_deaths();
    let avg_assists = acc.average_assists();
    let win_rate = acc.win_rate();
    let kda = acc.kda();

    let playstyle = if avg_kills > avg_assists {
        "aggressive"
    } else if avg_deaths > (avg_kills + avg_assists) / 3.0 {
        "high-risk"
    } else {
        "supportive"
    };

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut tendencies = Vec::new();

    if kda > 3.5 {
        strengths.push("Excellent KDA".to_string());
    } else if kda < 2.0 {
        weaknesses.push("Low KDA - dies frequently".to_string());
    }

    if win_rate > 0.55 {
        strengths.push(format!("Strong win rate ({})", percent(win_rate)));
    } else if win_rate < 0.45 {
        weaknesses.push(format!("Low win rate ({})", percent(win_rate)));
    }

    if avg_kills > 8.0 {
        tendencies.push("High kill threat".to_string());
    }
    if avg_deaths > 5.0 {
        tendencies.push("Prone to dying".to_string());
    }
    if avg_assists > 10.0 {
        tendencies.push("Team-oriented player".to_string());
    }

    finish_player_profile(acc, playstyle, strengths, weaknesses, tendencies)
}

fn valorant_player_profile(acc: &PlayerAccumulator) -> PlayerProfile {
    let avg_kills = acc.average_kills();
    let avg_deaths = acc.average_deaths();
    let win_rate = acc.win_rate();
    let kda = acc.kda();

    let duelist_games: u32 = DUELISTS
        .iter()
        .filter_map(|agent| acc.characters.get(*agent))
        .map(|c| c.record.games)
        .sum();
    let total_games: u32 = acc.characters.values().map(|c| c.record.games).sum();
    let is_duelist = total_games > 0 && duelist_games * 2 > total_games;

    let playstyle = if is_duelist && avg_kills > avg_deaths {
        "aggressive"
    } else if avg_deaths > avg_kills {
        "passive"
    } else {
        "adaptive"
    };

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut tendencies = Vec::new();

    if kda > 2.5 {
        strengths.push("Strong KDA performance".to_string());
    } else if kda < 1.5 {
        weaknesses.push("Low impact - poor KDA".to_string());
    }

    if win_rate > 0.55 {
        strengths.push(format!("Winning player ({} WR)", percent(win_rate)));
    } else if win_rate < 0.45 {
        weaknesses.push(format!("Struggling recently ({} WR)", percent(win_rate)));
    }

    if avg_kills > 18.0 {
        tendencies.push("High fragging output".to_string());
        strengths.push("Carries through kills".to_string());
    } else if avg_kills < 12.0 {
        tendencies.push("Low frag count".to_string());
    }

    if avg_deaths > 15.0 {
        tendencies.push("Dies frequently - exploitable".to_string());
        weaknesses.push("High death count".to_string());
    }

    if is_duelist {
        tendencies.push("Primary duelist/entry player".to_string());
    } else {
        tendencies.push("Support/utility role".to_string());
    }

    finish_player_profile(acc, playstyle, strengths, weaknesses, tendencies)
}

fn finish_player_profile(
    acc: &PlayerAccumulator,
    playstyle: &str,
    mut strengths: Vec<String>,
    mut weaknesses: Vec<String>,
    mut tendencies: Vec<String>,
) -> PlayerProfile {
    if strengths.is_empty() {
        strengths.push("No notable strengths".to_string());
    }
    if weaknesses.is_empty() {
        weaknesses.push("No notable weaknesses".to_string());
    }
    if tendencies.is_empty() {
        tendencies.push("Standard play patterns".to_string());
    }

    PlayerProfile {
        player_id: acc.player_id.clone(),
        player_name: acc.player_name.clone(),
        primary_picks: primary_pick_stats(acc),
        playstyle: playstyle.to_string(),
        strengths,
        weaknesses,
        tendencies,
        threat_level: threat_level(acc.kda(), acc.win_rate()),
        average_stats: average_stats(acc),
    }
}

/// Build a threat entry from a player profile.
pub fn player_threat(profile: &PlayerProfile) -> PlayerThreat {
    let best_pick_wr = profile
        .primary_picks
        .iter()
        .map(|p| p.win_rate)
        .max_by(f64::total_cmp);

    let score = threat_score(profile.average_stats.kda, best_pick_wr);

    PlayerThreat {
        player_id: profile.player_id.clone(),
        player_name: profile.player_name.clone(),
        threat_level: threat_level_from_score(score),
        threat_score: (score * 100.0).round() / 100.0,
        primary_picks: profile
            .primary_picks
            .iter()
            .take(3)
            .map(|p| p.name.clone())
            .collect(),
        avg_kda: profile.average_stats.kda,
        games_analyzed: profile.average_stats.games_played,
        key_strengths: profile.strengths.iter().take(2).cloned().collect(),
        exploitable_weaknesses: profile.weaknesses.iter().take(2).cloned().collect(),
    }
}
