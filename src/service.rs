//! Scouting workflows.
//!
//! Each operation fetches a team's recent series once, folds them into
//! accumulators, and derives the requested artifact. The source cache means
//! operations that share a team's match set do not refetch it.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregate::{fold_map_rounds, fold_players, fold_team};
use crate::classify::{player_profile, player_threat, team_profile};
use crate::composition;
use crate::fetch::{FetchError, MatchFetcher, SeriesSource};
use crate::models::{
    CompositionProfile, DetailedMapStats, GameTitle, MapStatsReport, MatchRecord, OverallRecord,
    PlayerProfile, ScoutingReport, StrategyBrief, TeamComparison, TeamProfile, TeamSearchResult,
    ThreatLevel, ThreatRanking,
};
use crate::strategy::{StrategySynthesizer, SynthError};

/// Default series to analyze for an opponent.
pub const DEFAULT_OPPONENT_MATCHES: usize = 10;
/// Default series to analyze for our own team.
pub const DEFAULT_OUR_MATCHES: usize = 5;

/// Coordinates fetching, aggregation, classification, and synthesis.
pub struct ScoutingService {
    source: Arc<dyn SeriesSource>,
    fetcher: MatchFetcher,
    synthesizer: StrategySynthesizer,
}

impl ScoutingService {
    pub fn new(
        source: Arc<dyn SeriesSource>,
        fetcher: MatchFetcher,
        synthesizer: StrategySynthesizer,
    ) -> Self {
        Self {
            source,
            fetcher,
            synthesizer,
        }
    }

    async fn fetch(
        &self,
        team_id: &str,
        num_matches: usize,
        title: GameTitle,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        self.fetcher.recent_matches(team_id, num_matches, title).await
    }

    async fn display_name(&self, team_id: &str) -> String {
        match self.source.team_name(team_id).await {
            Some(name) => name,
            None => format!("Team {}", team_id),
        }
    }

    /// Analyze a team's recent form into a profile.
    pub async fn analyze_team(
        &self,
        team_id: &str,
        num_matches: usize,
        title: GameTitle,
    ) -> Result<TeamProfile, FetchError> {
        let records = self.fetch(team_id, num_matches, title).await?;
        let name = self.display_name(team_id).await;
        let acc = fold_team(team_id, title, &records);

        info!(team_id, games = acc.games_played(), "analyzed team");
        Ok(team_profile(&name, &acc))
    }

    /// Profile every player on the team's recent roster.
    pub async fn profile_team_players(
        &self,
        team_id: &str,
        num_matches: usize,
        title: GameTitle,
    ) -> Result<Vec<PlayerProfile>, FetchError> {
        let records = self.fetch(team_id, num_matches, title).await?;
        Ok(fold_players(team_id, &records)
            .iter()
            .map(|acc| player_profile(title, acc))
            .collect())
    }

    /// Analyze the team's composition patterns.
    pub async fn analyze_compositions(
        &self,
        team_id: &str,
        num_matches: usize,
        title: GameTitle,
    ) -> Result<Vec<CompositionProfile>, FetchError> {
        let records = self.fetch(team_id, num_matches, title).await?;
        let comps = composition::extract_compositions(team_id, &records);
        Ok(composition::analyze(title, &comps))
    }

    /// Rank the team's players by threat score, highest first.
    pub async fn threat_ranking(
        &self,
        team_id: &str,
        num_matches: usize,
        title: GameTitle,
    ) -> Result<ThreatRanking, FetchError> {
        let profiles = self.profile_team_players(team_id, num_matches, title).await?;
        let team_name = self.display_name(team_id).await;

        let mut players: Vec<_> = profiles.iter().map(player_threat).collect();
        players.sort_by(|a, b| b.threat_score.total_cmp(&a.threat_score));

        let top_threat = players.first().map(|p| p.player_name.clone());

        let high_threats: Vec<&str> = players
            .iter()
            .filter(|p| p.threat_level == ThreatLevel::High)
            .map(|p| p.player_name.as_str())
            .collect();

        let mut summary = format!("Analysis of {} players. ", players.len());
        if !high_threats.is_empty() {
            summary.push_str(&format!(
                "High threat players: {}. ",
                high_threats.join(", ")
            ));
        }
        summary.push_str("Focus defensive preparation on these players.");

        Ok(ThreatRanking {
            team_id: team_id.to_string(),
            team_name,
            players,
            top_threat,
            summary,
            generated_at: Utc::now(),
        })
    }

    /// Generate a counter-strategy brief against an opponent.
    ///
    /// The fetch stage can fail; synthesis cannot. A dead or rambling text
    /// model still yields a rules-based brief.
    pub async fn generate_counter_strategy(
        &self,
        opponent_team_id: &str,
        our_team_id: &str,
        title: GameTitle,
        num_opponent_matches: usize,
        num_our_matches: usize,
    ) -> Result<StrategyBrief, FetchError> {
        let opponent = self
            .analyze_team(opponent_team_id, num_opponent_matches, title)
            .await?;
        let ours = self.analyze_team(our_team_id, num_our_matches, title).await?;

        Ok(self.synthesizer.counter_strategy(&opponent, &ours, title).await)
    }

    /// Search teams by name fragment.
    pub async fn search_teams(
        &self,
        name: &str,
        limit: usize,
        title: GameTitle,
    ) -> Result<Vec<TeamSearchResult>, FetchError> {
        self.source.search_teams(name, limit, title).await
    }

    /// Compare two teams' recent form head to head.
    pub async fn compare_teams(
        &self,
        team_a_id: &str,
        team_b_id: &str,
        num_matches: usize,
        title: GameTitle,
    ) -> Result<TeamComparison, FetchError> {
        let team_a = self.analyze_team(team_a_id, num_matches, title).await?;
        let team_b = self.analyze_team(team_b_id, num_matches, title).await?;
        Ok(compare_profiles(team_a, team_b))
    }

    /// Per-map record and round splits for a round-based team.
    pub async fn map_stats(
        &self,
        team_id: &str,
        num_matches: usize,
    ) -> Result<MapStatsReport, FetchError> {
        let records = self
            .fetch(team_id, num_matches, GameTitle::Valorant)
            .await?;
        let team_name = self.display_name(team_id).await;

        let mut maps: Vec<DetailedMapStats> = fold_map_rounds(team_id, &records)
            .into_iter()
            .map(|(map_name, acc)| DetailedMapStats {
                map_name,
                games_played: acc.record.games,
                wins: acc.record.wins,
                losses: acc.record.losses,
                win_rate: round2(acc.record.rate_or(0.0)),
                attack_rounds_won: acc.attack_wins,
                attack_rounds_total: acc.attack_total,
                attack_win_rate: round2(acc.attack_rate()),
                defense_rounds_won: acc.defense_wins,
                defense_rounds_total: acc.defense_total,
                defense_win_rate: round2(acc.defense_rate()),
                avg_rounds_per_game: round1(acc.average_rounds()),
            })
            .collect();
        maps.sort_by(|a, b| b.games_played.cmp(&a.games_played).then(a.map_name.cmp(&b.map_name)));

        let best_map = maps
            .iter()
            .max_by(|a, b| a.win_rate.total_cmp(&b.win_rate))
            .filter(|m| m.win_rate > 0.0)
            .map(|m| m.map_name.clone());
        let worst_map = maps
            .iter()
            .min_by(|a, b| a.win_rate.total_cmp(&b.win_rate))
            .filter(|m| m.win_rate < 1.0)
            .map(|m| m.map_name.clone());

        Ok(MapStatsReport {
            team_id: team_id.to_string(),
            team_name,
            maps,
            best_map,
            worst_map,
            generated_at: Utc::now(),
        })
    }

    /// Answer a coaching question, grounding the model in report context
    /// supplied by the caller or in a freshly fetched team profile.
    pub async fn coach_chat(
        &self,
        message: &str,
        team_id: Option<&str>,
        title: Option<GameTitle>,
        context: Option<&Value>,
    ) -> Result<String, SynthError> {
        let context_str = match (context, team_id, title) {
            (Some(value), _, _) => serde_json::to_string_pretty(value)
                .unwrap_or_else(|_| value.to_string()),
            (None, Some(team_id), Some(title)) => {
                match self.analyze_team(team_id, DEFAULT_OUR_MATCHES, title).await {
                    Ok(profile) => serde_json::to_string_pretty(&profile)
                        .unwrap_or_else(|_| "Could not fetch specific team data.".to_string()),
                    Err(err) => {
                        warn!(team_id, error = %err, "profile fetch for coach context failed");
                        "Could not fetch specific team data.".to_string()
                    }
                }
            }
            _ => "No specific team selected.".to_string(),
        };

        self.synthesizer.coach_answer(message, &context_str).await
    }

    /// Build the full scouting report: team profile, player profiles,
    /// compositions, and derived findings, from a single match set.
    pub async fn scouting_report(
        &self,
        team_id: &str,
        num_matches: usize,
        title: GameTitle,
    ) -> Result<ScoutingReport, FetchError> {
        let records = self.fetch(team_id, num_matches, title).await?;
        let team_name = self.display_name(team_id).await;

        let team_acc = fold_team(team_id, title, &records);
        let opponent_team = team_profile(&team_name, &team_acc);

        let player_profiles: Vec<PlayerProfile> = fold_players(team_id, &records)
            .iter()
            .map(|acc| player_profile(title, acc))
            .collect();

        let comps = composition::extract_compositions(team_id, &records);
        let compositions = composition::analyze(title, &comps);

        let key_findings = key_findings(&opponent_team, &player_profiles, &compositions);
        let preparation_priorities = preparation_priorities(&opponent_team, title);
        let executive_summary = executive_summary(&opponent_team, &player_profiles);

        info!(
            team_id,
            matches = records.len(),
            players = player_profiles.len(),
            "built scouting report"
        );

        Ok(ScoutingReport {
            report_id: Uuid::new_v4().to_string(),
            opponent_team,
            player_profiles,
            compositions,
            key_findings,
            preparation_priorities,
            executive_summary,
            matches_analyzed: records.len(),
            generated_at: Utc::now(),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn overall_win_rate(record: &OverallRecord) -> f64 {
    let games = record.wins + record.losses;
    if games > 0 {
        f64::from(record.wins) / f64::from(games)
    } else {
        0.5
    }
}

/// Pure comparison of two already-built profiles.
fn compare_profiles(team_a: TeamProfile, team_b: TeamProfile) -> TeamComparison {
    let a_wr = overall_win_rate(&team_a.overall_record);
    let b_wr = overall_win_rate(&team_b.overall_record);

    let mut key_differences = Vec::new();

    if (a_wr - b_wr).abs() > 0.1 {
        let (leader, lead_wr, trail_wr) = if a_wr > b_wr {
            (&team_a.team_name, a_wr, b_wr)
        } else {
            (&team_b.team_name, b_wr, a_wr)
        };
        key_differences.push(format!(
            "{} has higher win rate ({:.0}% vs {:.0}%)",
            leader,
            lead_wr * 100.0,
            trail_wr * 100.0
        ));
    }

    if team_a.playstyle != team_b.playstyle {
        key_differences.push(format!(
            "Different playstyles: {} ({}) vs {} ({})",
            team_a.team_name, team_a.playstyle, team_b.team_name, team_b.playstyle
        ));
    }

    for a_strength in team_a.strengths.iter().take(2) {
        let strength_lower = a_strength.to_lowercase();
        for b_weakness in team_b.weaknesses.iter().take(2) {
            let overlaps = b_weakness
                .to_lowercase()
                .split_whitespace()
                .any(|word| strength_lower.contains(word));
            if overlaps {
                key_differences.push(format!(
                    "{}'s {} exploits {}'s {}",
                    team_a.team_name, a_strength, team_b.team_name, b_weakness
                ));
            }
        }
    }

    let advantage = if a_wr > b_wr + 0.15 {
        Some(team_a.team_name.clone())
    } else if b_wr > a_wr + 0.15 {
        Some(team_b.team_name.clone())
    } else {
        None
    };

    let mut summary = format!(
        "Comparison of {} ({}) vs {} ({}). ",
        team_a.team_name, team_a.playstyle, team_b.team_name, team_b.playstyle
    );
    match &advantage {
        Some(name) => summary.push_str(&format!(
            "{} appears to have the edge based on recent performance. ",
            name
        )),
        None => summary.push_str("This appears to be an evenly matched contest. "),
    }
    if let Some(first) = key_differences.first() {
        summary.push_str(&format!("Key difference: {}.", first));
    }

    let matchup_prediction = match &advantage {
        Some(name) => format!("{} favored to win", name),
        None => "Too close to call - expect a competitive match".to_string(),
    };

    TeamComparison {
        team_a,
        team_b,
        comparison_summary: summary,
        advantage,
        key_differences,
        matchup_prediction,
        generated_at: Utc::now(),
    }
}

fn high_threat_names(player_profiles: &[PlayerProfile]) -> Vec<&str> {
    player_profiles
        .iter()
        .filter(|p| p.threat_level == ThreatLevel::High)
        .map(|p| p.player_name.as_str())
        .collect()
}

fn key_findings(
    team: &TeamProfile,
    player_profiles: &[PlayerProfile],
    compositions: &[CompositionProfile],
) -> Vec<String> {
    let mut findings = Vec::new();

    if let Some(strength) = team.strengths.first() {
        findings.push(format!("Team strength: {}", strength));
    }
    if let Some(weakness) = team.weaknesses.first() {
        findings.push(format!("Exploitable weakness: {}", weakness));
    }

    let high_threat = high_threat_names(player_profiles);
    if !high_threat.is_empty() {
        findings.push(format!("High threat player(s): {}", high_threat.join(", ")));
    }

    if let Some(top_comp) = compositions.iter().max_by_key(|c| c.games_played) {
        let named: Vec<&str> = top_comp
            .composition
            .iter()
            .take(3)
            .map(|s| s.as_str())
            .collect();
        findings.push(format!(
            "Most played composition ({} games): {}...",
            top_comp.games_played,
            named.join(", ")
        ));
    }

    findings
}

fn preparation_priorities(team: &TeamProfile, title: GameTitle) -> Vec<String> {
    let mut priorities = Vec::new();

    for weakness in team.weaknesses.iter().take(2) {
        priorities.push(format!("Practice exploiting: {}", weakness));
    }
    for strength in team.strengths.iter().take(2) {
        priorities.push(format!("Prepare defense against: {}", strength));
    }

    match title {
        GameTitle::Lol => {
            priorities.push("Review their draft tendencies".to_string());
            priorities.push("Study objective timing and setups".to_string());
        }
        GameTitle::Valorant => {
            priorities.push("Review map preferences and veto strategy".to_string());
            priorities.push("Study default setups on likely maps".to_string());
        }
    }

    priorities
}

fn executive_summary(team: &TeamProfile, player_profiles: &[PlayerProfile]) -> String {
    let record = &team.overall_record;
    let win_rate = if record.games_played > 0 {
        f64::from(record.wins) / f64::from(record.games_played)
    } else {
        0.5
    };

    let mut parts = vec![format!(
        "{} is a {} team with a {:.0}% win rate in recent matches.",
        team.team_name,
        team.playstyle.to_lowercase(),
        win_rate * 100.0
    )];

    if !team.identity.is_empty() {
        parts.push(format!("Team identity: {}.", team.identity));
    }

    let high_threat = high_threat_names(player_profiles);
    if !high_threat.is_empty() {
        parts.push(format!(
            "Key player(s) to watch: {}.",
            high_threat.join(", ")
        ));
    }

    if let Some(weakness) = team.weaknesses.first() {
        parts.push(format!("Primary weakness to exploit: {}.", weakness));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::fetch::GridClient;
    use crate::strategy::backend::DisabledBackend;

    fn mock_service() -> ScoutingService {
        let config = GridConfig {
            use_mock: true,
            ..GridConfig::default()
        };
        let client = Arc::new(GridClient::new(config).unwrap());
        let fetcher = MatchFetcher::new(Arc::clone(&client) as Arc<dyn SeriesSource>, 3);
        let synthesizer = StrategySynthesizer::new(Arc::new(DisabledBackend), 2048);
        ScoutingService::new(client, fetcher, synthesizer)
    }

    #[tokio::test]
    async fn test_analyze_team_end_to_end() {
        let service = mock_service();
        let profile = service
            .analyze_team("team_001", 10, GameTitle::Valorant)
            .await
            .unwrap();

        assert_eq!(profile.team_name, "Mock Team");
        assert_eq!(profile.overall_record.games_played, 10);
        assert!(!profile.strengths.is_empty());
        assert!(!profile.map_preferences.is_empty());
    }

    #[tokio::test]
    async fn test_player_profiles_from_mock() {
        let service = mock_service();
        let profiles = service
            .profile_team_players("team_001", 10, GameTitle::Valorant)
            .await
            .unwrap();

        assert_eq!(profiles.len(), 5);
        assert!(profiles.iter().all(|p| p.average_stats.games_played == 10));
        assert!(profiles.iter().all(|p| !p.primary_picks.is_empty()));
    }

    #[tokio::test]
    async fn test_compositions_from_mock() {
        let service = mock_service();
        let comps = service
            .analyze_compositions("team_001", 10, GameTitle::Valorant)
            .await
            .unwrap();

        // The canned roster always fields the same five agents.
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].games_played, 10);
        assert_eq!(comps[0].composition.len(), 5);
    }

    #[tokio::test]
    async fn test_threat_ranking_sorted() {
        let service = mock_service();
        let ranking = service
            .threat_ranking("team_001", 10, GameTitle::Valorant)
            .await
            .unwrap();

        assert_eq!(ranking.players.len(), 5);
        assert!(ranking.top_threat.is_some());
        for pair in ranking.players.windows(2) {
            assert!(pair[0].threat_score >= pair[1].threat_score);
        }
        assert!(ranking.summary.starts_with("Analysis of 5 players."));
    }

    #[tokio::test]
    async fn test_counter_strategy_with_disabled_backend() {
        let service = mock_service();
        let brief = service
            .generate_counter_strategy(
                "team_001",
                "team_002",
                GameTitle::Valorant,
                DEFAULT_OPPONENT_MATCHES,
                DEFAULT_OUR_MATCHES,
            )
            .await
            .unwrap();

        assert!(brief.via_fallback);
        assert_eq!(brief.opponent_team_id, "team_001");
        assert!(!brief.recommendations.is_empty());
    }

    fn comparison_profile(name: &str, wins: u32, losses: u32, playstyle: &str) -> TeamProfile {
        TeamProfile {
            team_id: name.to_lowercase(),
            team_name: name.to_string(),
            overall_record: OverallRecord {
                wins,
                losses,
                games_played: wins + losses,
            },
            playstyle: playstyle.to_string(),
            identity: String::new(),
            map_preferences: Default::default(),
            early_game_patterns: vec![],
            mid_game_patterns: vec![],
            late_game_patterns: vec![],
            attack_tendencies: vec![],
            defense_tendencies: vec![],
            economy_patterns: vec![],
            strengths: vec!["Strong attack side".to_string()],
            weaknesses: vec!["Weak attack rounds".to_string()],
        }
    }

    #[test]
    fn test_compare_finds_advantage_and_differences() {
        let team_a = comparison_profile("Alpha", 8, 2, "Aggressive");
        let team_b = comparison_profile("Beta", 4, 6, "Balanced");

        let comparison = compare_profiles(team_a, team_b);

        assert_eq!(comparison.advantage.as_deref(), Some("Alpha"));
        assert_eq!(comparison.matchup_prediction, "Alpha favored to win");
        assert!(comparison
            .key_differences
            .contains(&"Alpha has higher win rate (80% vs 40%)".to_string()));
        assert!(comparison
            .key_differences
            .contains(&"Different playstyles: Alpha (Aggressive) vs Beta (Balanced)".to_string()));
        // "attack" from Beta's weakness appears in Alpha's strength.
        assert!(comparison
            .key_differences
            .iter()
            .any(|d| d.contains("exploits")));
        assert!(comparison
            .comparison_summary
            .contains("appears to have the edge"));
    }

    #[test]
    fn test_compare_even_matchup() {
        let team_a = comparison_profile("Alpha", 5, 5, "Balanced");
        let mut team_b = comparison_profile("Beta", 5, 5, "Balanced");
        team_b.strengths = vec!["Objective control".to_string()];
        team_b.weaknesses = vec!["Slow rotations".to_string()];

        let comparison = compare_profiles(team_a, team_b);

        assert!(comparison.advantage.is_none());
        assert_eq!(
            comparison.matchup_prediction,
            "Too close to call - expect a competitive match"
        );
        assert!(comparison
            .comparison_summary
            .contains("evenly matched contest"));
    }

    #[tokio::test]
    async fn test_compare_teams_end_to_end() {
        let service = mock_service();
        let comparison = service
            .compare_teams("team_001", "team_002", 10, GameTitle::Valorant)
            .await
            .unwrap();

        // The canned data has the mock team winning 7 of 10.
        assert_eq!(comparison.advantage.as_deref(), Some("Mock Team"));
        assert_eq!(comparison.team_a.overall_record.wins, 7);
        assert_eq!(comparison.team_b.overall_record.wins, 3);
        assert!(!comparison.key_differences.is_empty());
    }

    #[tokio::test]
    async fn test_map_stats_from_mock() {
        let service = mock_service();
        let report = service.map_stats("team_001", 10).await.unwrap();

        assert_eq!(report.team_name, "Mock Team");
        // The canned rotation cycles five maps over ten series.
        assert_eq!(report.maps.len(), 5);
        assert!(report.maps.iter().all(|m| m.games_played == 2));
        assert!(report.best_map.is_some());
        for map in &report.maps {
            assert!(map.attack_rounds_total > 0);
            assert!(map.win_rate >= 0.0 && map.win_rate <= 1.0);
        }
    }

    #[tokio::test]
    async fn test_search_teams_via_mock() {
        let service = mock_service();
        let results = service
            .search_teams("mock", 10, GameTitle::Valorant)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].team_name, "Mock Team");
    }

    #[tokio::test]
    async fn test_coach_chat_uses_provided_context() {
        let config = GridConfig {
            use_mock: true,
            ..GridConfig::default()
        };
        let client = Arc::new(GridClient::new(config).unwrap());
        let fetcher = MatchFetcher::new(Arc::clone(&client) as Arc<dyn SeriesSource>, 3);
        let backend = Arc::new(crate::strategy::backend::MockBackend::new(
            "Target their worst map.",
        ));
        let synthesizer = StrategySynthesizer::new(backend, 2048);
        let service = ScoutingService::new(client, fetcher, synthesizer);

        let context = serde_json::json!({"weaknesses": ["Weak attack rounds"]});
        let answer = service
            .coach_chat("Where do we attack?", None, None, Some(&context))
            .await
            .unwrap();
        assert_eq!(answer, "Target their worst map.");
    }

    #[tokio::test]
    async fn test_coach_chat_surfaces_disabled_backend() {
        let service = mock_service();
        let result = service
            .coach_chat("Any advice?", Some("team_001"), Some(GameTitle::Valorant), None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_scouting_report_assembly() {
        let service = mock_service();
        let report = service
            .scouting_report("team_001", 10, GameTitle::Valorant)
            .await
            .unwrap();

        assert_eq!(report.matches_analyzed, 10);
        assert_eq!(report.player_profiles.len(), 5);
        assert!(!report.key_findings.is_empty());
        assert!(!report.preparation_priorities.is_empty());
        assert!(report.executive_summary.contains("Mock Team"));
        assert!(!report.report_id.is_empty());
    }
}
