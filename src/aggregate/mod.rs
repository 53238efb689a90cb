//! Order-independent statistics accumulation.
//!
//! Records fold into accumulators commutatively: any permutation of the same
//! match set produces identical totals. Only finished games count, and team
//! lines are located by id, never by position in the array.

use std::collections::BTreeMap;

use crate::models::{GameTitle, MatchRecord};

/// Plain win/loss tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinLoss {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn record(&mut self, won: bool) {
        self.games += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    /// Win rate, or `default` when no games were played.
    pub fn rate_or(&self, default: f64) -> f64 {
        if self.games == 0 {
            default
        } else {
            f64::from(self.wins) / f64::from(self.games)
        }
    }
}

/// Attack/defense/pistol round splits, approximated from map scorelines.
///
/// Per-round data is not in the feed, so splits are derived from the final
/// score: each half contributes `total / 2` rounds to each side, wins are
/// split evenly between sides, and the two pistol rounds are credited when
/// the score clears 1 and 7 respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSplits {
    pub attack_wins: u32,
    pub attack_total: u32,
    pub defense_wins: u32,
    pub defense_total: u32,
    pub pistol_wins: u32,
    pub pistol_total: u32,
    pub approximated: bool,
}

impl RoundSplits {
    pub fn absorb_approximate(&mut self, our_score: u32, enemy_score: u32) {
        let total_rounds = our_score + enemy_score;
        if total_rounds == 0 {
            return;
        }

        let half = total_rounds / 2;
        self.attack_total += half;
        self.defense_total += half;
        self.attack_wins += our_score / 2;
        self.defense_wins += (our_score + 1) / 2;

        self.pistol_total += 2;
        if our_score >= 1 {
            self.pistol_wins += 1;
        }
        if our_score >= 7 {
            self.pistol_wins += 1;
        }
        self.approximated = true;
    }

    /// Rates default to 0.5 when no rounds were absorbed.
    pub fn attack_rate(&self) -> f64 {
        rate_or_half(self.attack_wins, self.attack_total)
    }

    pub fn defense_rate(&self) -> f64 {
        rate_or_half(self.defense_wins, self.defense_total)
    }

    pub fn pistol_rate(&self) -> f64 {
        rate_or_half(self.pistol_wins, self.pistol_total)
    }
}

fn rate_or_half(wins: u32, total: u32) -> f64 {
    if total == 0 {
        0.5
    } else {
        f64::from(wins) / f64::from(total)
    }
}

/// Accumulated team statistics across a match set.
#[derive(Debug, Clone)]
pub struct TeamAccumulator {
    pub team_id: String,
    pub title: GameTitle,
    pub record: WinLoss,
    pub total_kills: u64,
    pub total_deaths: u64,
    pub total_assists: u64,
    pub rounds: RoundSplits,
    /// Per-map win/loss, keyed by map name
    pub maps: BTreeMap<String, WinLoss>,
}

impl TeamAccumulator {
    pub fn new(team_id: impl Into<String>, title: GameTitle) -> Self {
        Self {
            team_id: team_id.into(),
            title,
            record: WinLoss::default(),
            total_kills: 0,
            total_deaths: 0,
            total_assists: 0,
            rounds: RoundSplits::default(),
            maps: BTreeMap::new(),
        }
    }

    /// Fold one match into the accumulator.
    pub fn fold(&mut self, record: &MatchRecord) {
        for game in &record.games {
            if !game.finished {
                continue;
            }

            let Some(our_team) = MatchRecord::team_in_game(game, &self.team_id) else {
                continue;
            };
            let enemy_score = game
                .teams
                .iter()
                .find(|t| t.id != self.team_id)
                .map(|t| t.score)
                .unwrap_or(0);

            // Ties count as losses.
            let won = our_team.score > enemy_score;
            self.record.record(won);

            for player in &our_team.players {
                self.total_kills += u64::from(player.kills);
                self.total_deaths += u64::from(player.deaths);
                self.total_assists += u64::from(player.assists);
            }

            if self.title.round_based() {
                let map_name = game.map_name.clone().unwrap_or_else(|| "Unknown".to_string());
                self.maps.entry(map_name).or_default().record(won);
                self.rounds.absorb_approximate(our_team.score, enemy_score);
            }
        }
    }

    pub fn games_played(&self) -> u32 {
        self.record.games
    }

    /// Team win rate, defaulting to 0.5 before any games fold in.
    pub fn win_rate(&self) -> f64 {
        self.record.rate_or(0.5)
    }

    pub fn average_kills(&self) -> f64 {
        per_game(self.total_kills, self.record.games)
    }

    pub fn average_deaths(&self) -> f64 {
        per_game(self.total_deaths, self.record.games)
    }

    pub fn average_assists(&self) -> f64 {
        per_game(self.total_assists, self.record.games)
    }
}

fn per_game(total: u64, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        total as f64 / f64::from(games)
    }
}

/// Per-map record with round splits, for the map pool breakdown.
///
/// Uses the same score-derived approximation as [`RoundSplits`] but caps
/// each side's half at the regulation 12 rounds, so overtime maps do not
/// inflate the side totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapRoundAccumulator {
    pub record: WinLoss,
    pub attack_wins: u32,
    pub attack_total: u32,
    pub defense_wins: u32,
    pub defense_total: u32,
    pub total_rounds: u32,
}

impl MapRoundAccumulator {
    pub fn absorb(&mut self, our_score: u32, enemy_score: u32) {
        self.record.record(our_score > enemy_score);

        let total_rounds = our_score + enemy_score;
        self.total_rounds += total_rounds;

        let half = (total_rounds / 2).min(12);
        self.attack_total += half;
        self.defense_total += half;
        self.attack_wins += our_score / 2;
        self.defense_wins += (our_score + 1) / 2;
    }

    pub fn attack_rate(&self) -> f64 {
        f64::from(self.attack_wins) / f64::from(self.attack_total.max(1))
    }

    pub fn defense_rate(&self) -> f64 {
        f64::from(self.defense_wins) / f64::from(self.defense_total.max(1))
    }

    pub fn average_rounds(&self) -> f64 {
        if self.record.games == 0 {
            0.0
        } else {
            f64::from(self.total_rounds) / f64::from(self.record.games)
        }
    }
}

/// Fold a match set into per-map round accumulators for one team.
pub fn fold_map_rounds(team_id: &str, records: &[MatchRecord]) -> BTreeMap<String, MapRoundAccumulator> {
    let mut maps: BTreeMap<String, MapRoundAccumulator> = BTreeMap::new();

    for record in records {
        for game in &record.games {
            if !game.finished {
                continue;
            }
            let Some(our_team) = MatchRecord::team_in_game(game, team_id) else {
                continue;
            };
            let enemy_score = game
                .teams
                .iter()
                .find(|t| t.id != team_id)
                .map(|t| t.score)
                .unwrap_or(0);

            let map_name = game.map_name.clone().unwrap_or_else(|| "Unknown".to_string());
            maps.entry(map_name)
                .or_default()
                .absorb(our_team.score, enemy_score);
        }
    }

    maps
}

/// Accumulated per-character stats for one player.
#[derive(Debug, Clone, Default)]
pub struct CharacterAccumulator {
    pub record: WinLoss,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
}

impl CharacterAccumulator {
    /// Aggregate KDA over every game on this character.
    pub fn average_kda(&self) -> f64 {
        (self.kills + self.assists) as f64 / self.deaths.max(1) as f64
    }
}

/// Accumulated statistics for one player across a match set.
#[derive(Debug, Clone)]
pub struct PlayerAccumulator {
    pub player_id: String,
    pub player_name: String,
    pub record: WinLoss,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub characters: BTreeMap<String, CharacterAccumulator>,
}

impl PlayerAccumulator {
    fn new(player_id: impl Into<String>, player_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            record: WinLoss::default(),
            kills: 0,
            deaths: 0,
            assists: 0,
            characters: BTreeMap::new(),
        }
    }

    pub fn games_played(&self) -> u32 {
        self.record.games
    }

    /// Per-character rates default to 0.0, unlike team rates.
    pub fn win_rate(&self) -> f64 {
        self.record.rate_or(0.0)
    }

    pub fn average_kills(&self) -> f64 {
        per_game(self.kills, self.record.games)
    }

    pub fn average_deaths(&self) -> f64 {
        per_game(self.deaths, self.record.games)
    }

    pub fn average_assists(&self) -> f64 {
        per_game(self.assists, self.record.games)
    }

    /// Aggregate KDA: total kills plus assists over total deaths.
    pub fn kda(&self) -> f64 {
        (self.kills + self.assists) as f64 / self.deaths.max(1) as f64
    }

    /// Most-played characters, ordered by games descending then name.
    pub fn primary_picks(&self, limit: usize) -> Vec<(&str, &CharacterAccumulator)> {
        let mut picks: Vec<_> = self
            .characters
            .iter()
            .map(|(name, acc)| (name.as_str(), acc))
            .collect();
        picks.sort_by(|a, b| b.1.record.games.cmp(&a.1.record.games).then(a.0.cmp(b.0)));
        picks.truncate(limit);
        picks
    }
}

/// Fold a full match set into a team accumulator.
pub fn fold_team(team_id: &str, title: GameTitle, records: &[MatchRecord]) -> TeamAccumulator {
    let mut acc = TeamAccumulator::new(team_id, title);
    for record in records {
        acc.fold(record);
    }
    acc
}

/// Fold a match set into per-player accumulators for one team's roster.
///
/// Output order is deterministic (sorted by player id) regardless of the
/// order records arrive in.
pub fn fold_players(team_id: &str, records: &[MatchRecord]) -> Vec<PlayerAccumulator> {
    let mut players: BTreeMap<String, PlayerAccumulator> = BTreeMap::new();

    for record in records {
        for game in &record.games {
            if !game.finished {
                continue;
            }

            let Some(our_team) = MatchRecord::team_in_game(game, team_id) else {
                continue;
            };
            let enemy_score = game
                .teams
                .iter()
                .find(|t| t.id != team_id)
                .map(|t| t.score)
                .unwrap_or(0);
            let won = our_team.score > enemy_score;

            for line in &our_team.players {
                let acc = players
                    .entry(line.id.clone())
                    .or_insert_with(|| PlayerAccumulator::new(&line.id, &line.name));

                acc.record.record(won);
                acc.kills += u64::from(line.kills);
                acc.deaths += u64::from(line.deaths);
                acc.assists += u64::from(line.assists);

                let character = acc.characters.entry(line.character.clone()).or_default();
                character.record.record(won);
                character.kills += u64::from(line.kills);
                character.deaths += u64::from(line.deaths);
                character.assists += u64::from(line.assists);
            }
        }
    }

    players.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn valorant_match(series_id: &str, our_score: u32, enemy_score: u32, map: &str) -> MatchRecord {
        let state = json!({
            "teams": [
                {"id": "t1", "name": "Alpha"},
                {"id": "t2", "name": "Beta"}
            ],
            "games": [{
                "finished": true,
                "map": {"name": map},
                "teams": [
                    {
                        "id": "t1", "name": "Alpha", "score": our_score,
                        "players": [
                            {"id": "p1", "name": "ace", "character": {"name": "Jett"},
                             "kills": 20, "deaths": 12, "killAssistsGiven": 4},
                            {"id": "p2", "name": "anchor", "character": {"name": "Killjoy"},
                             "kills": 12, "deaths": 10, "killAssistsGiven": 9}
                        ]
                    },
                    {"id": "t2", "name": "Beta", "score": enemy_score, "players": []}
                ]
            }]
        });
        MatchRecord::from_state(series_id, &state)
    }

    #[test]
    fn test_fold_is_order_independent() {
        let records = vec![
            valorant_match("s1", 13, 7, "Ascent"),
            valorant_match("s2", 9, 13, "Haven"),
            valorant_match("s3", 13, 11, "Ascent"),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let a = fold_team("t1", GameTitle::Valorant, &records);
        let b = fold_team("t1", GameTitle::Valorant, &reversed);

        assert_eq!(a.record, b.record);
        assert_eq!(a.rounds, b.rounds);
        assert_eq!(a.maps, b.maps);
        assert_eq!(a.total_kills, b.total_kills);
    }

    #[test]
    fn test_team_fold_totals() {
        let records = vec![
            valorant_match("s1", 13, 7, "Ascent"),
            valorant_match("s2", 9, 13, "Haven"),
        ];
        let acc = fold_team("t1", GameTitle::Valorant, &records);

        assert_eq!(acc.record.games, 2);
        assert_eq!(acc.record.wins, 1);
        assert_eq!(acc.record.losses, 1);
        assert_eq!(acc.total_kills, 64);
        assert_eq!(acc.maps["Ascent"].wins, 1);
        assert_eq!(acc.maps["Haven"].losses, 1);
    }

    #[test]
    fn test_round_approximation() {
        let mut splits = RoundSplits::default();
        splits.absorb_approximate(13, 7);

        // 20 rounds: 10 per side, 6 attack wins, 7 defense wins.
        assert_eq!(splits.attack_total, 10);
        assert_eq!(splits.defense_total, 10);
        assert_eq!(splits.attack_wins, 6);
        assert_eq!(splits.defense_wins, 7);
        // Score of 13 clears both pistol thresholds.
        assert_eq!(splits.pistol_total, 2);
        assert_eq!(splits.pistol_wins, 2);
        assert!(splits.approximated);
    }

    #[test]
    fn test_round_approximation_skips_empty_games() {
        let mut splits = RoundSplits::default();
        splits.absorb_approximate(0, 0);

        assert_eq!(splits.pistol_total, 0);
        assert!(!splits.approximated);
        assert_eq!(splits.attack_rate(), 0.5);
        assert_eq!(splits.pistol_rate(), 0.5);
    }

    #[test]
    fn test_map_rounds_cap_halves_at_twelve() {
        let mut acc = MapRoundAccumulator::default();
        // Overtime map: 30 rounds, half capped at 12.
        acc.absorb(16, 14);

        assert_eq!(acc.attack_total, 12);
        assert_eq!(acc.defense_total, 12);
        assert_eq!(acc.attack_wins, 8);
        assert_eq!(acc.defense_wins, 8);
        assert_eq!(acc.total_rounds, 30);
        assert_eq!(acc.record.wins, 1);
    }

    #[test]
    fn test_fold_map_rounds_groups_by_map() {
        let records = vec![
            valorant_match("s1", 13, 7, "Ascent"),
            valorant_match("s2", 13, 11, "Ascent"),
            valorant_match("s3", 9, 13, "Haven"),
        ];
        let maps = fold_map_rounds("t1", &records);

        assert_eq!(maps.len(), 2);
        let ascent = &maps["Ascent"];
        assert_eq!(ascent.record.games, 2);
        assert_eq!(ascent.record.wins, 2);
        // 10 + 12 attack rounds, 6 + 6 attack wins.
        assert_eq!(ascent.attack_total, 22);
        assert_eq!(ascent.attack_wins, 12);
        assert!((ascent.average_rounds() - 22.0).abs() < 1e-9);

        assert_eq!(maps["Haven"].record.losses, 1);
    }

    #[test]
    fn test_zero_game_defaults() {
        let acc = TeamAccumulator::new("t1", GameTitle::Lol);

        assert_eq!(acc.win_rate(), 0.5);
        assert_eq!(acc.average_kills(), 0.0);
    }

    #[test]
    fn test_lol_fold_ignores_rounds_and_maps() {
        let records = vec![valorant_match("s1", 1, 0, "Ascent")];
        let acc = fold_team("t1", GameTitle::Lol, &records);

        assert_eq!(acc.record.wins, 1);
        assert!(acc.maps.is_empty());
        assert!(!acc.rounds.approximated);
    }

    #[test]
    fn test_tie_counts_as_loss() {
        let records = vec![valorant_match("s1", 10, 10, "Bind")];
        let acc = fold_team("t1", GameTitle::Valorant, &records);

        assert_eq!(acc.record.losses, 1);
    }

    #[test]
    fn test_fold_players_aggregates_and_sorts() {
        let records = vec![
            valorant_match("s1", 13, 7, "Ascent"),
            valorant_match("s2", 9, 13, "Haven"),
        ];
        let players = fold_players("t1", &records);

        assert_eq!(players.len(), 2);
        assert_eq!(players[0].player_id, "p1");

        let ace = &players[0];
        assert_eq!(ace.games_played(), 2);
        assert_eq!(ace.kills, 40);
        assert_eq!(ace.record.wins, 1);
        // (40 + 8) / 24
        assert!((ace.kda() - 2.0).abs() < 1e-9);

        let picks = ace.primary_picks(5);
        assert_eq!(picks[0].0, "Jett");
        assert_eq!(picks[0].1.record.games, 2);
    }

    #[test]
    fn test_kda_floors_deaths_at_one() {
        let mut acc = PlayerAccumulator::new("p", "deathless");
        acc.kills = 5;
        acc.assists = 3;
        acc.record.record(true);

        assert_eq!(acc.kda(), 8.0);
    }

    #[test]
    fn test_unfinished_games_skipped() {
        let state = json!({
            "teams": [{"id": "t1", "name": "Alpha"}],
            "games": [{
                "finished": false,
                "teams": [{"id": "t1", "name": "Alpha", "score": 5, "players": []}]
            }]
        });
        let record = MatchRecord::from_state("s1", &state);
        let acc = fold_team("t1", GameTitle::Valorant, &[record]);

        assert_eq!(acc.record.games, 0);
    }
}
