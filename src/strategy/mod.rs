//! Counter-strategy synthesis.
//!
//! Primary path prompts a text model for a structured brief; any failure
//! there (backend down, malformed JSON) drops to a deterministic rules-based
//! brief built from the opponent profile. The operation itself never fails.

pub mod backend;

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{GameTitle, KeyMatchup, Recommendation, StrategyBrief, TeamProfile};

pub use backend::{backend_from_config, SynthError, TextBackend};

const SYSTEM_PROMPT: &str = "You are a world-class esports coach and analyst.\n\
Your goal is to provide specific, actionable, and data-driven counter-strategies to defeat an opponent.\n\
You analyze opponent weaknesses, team strengths, and statistical patterns to formulate a winning game plan.\n\
Your output must be in valid JSON format.";

const USER_PROMPT_TEMPLATE: &str = r#"
Analyze the following match-up and generate a comprehensive counter-strategy.

Game: {game}
Opponent: {opponent_name} ({opponent_playstyle})
Our Team: {our_name} ({our_playstyle})

OPPONENT ANALYSIS:
Weaknesses: {opponent_weaknesses}
Strengths: {opponent_strengths}
Key Patterns: {opponent_patterns}
Map/Mode Preferences: {opponent_preferences}

OUR TEAM PROFILE:
Strengths: {our_strengths}
Playstyle: {our_playstyle}

TASK:
Generate a strategic report in the following JSON format:
{
    "summary": "2-3 sentences executive summary of the match-up and how we win.",
    "win_conditions": ["Specific condition 1", "Specific condition 2"],
    "recommendations": [
        {
            "title": "Short actionable title",
            "description": "Detailed explanation of why this works based on the data.",
            "priority": "High",
            "category": "Draft",
            "execution_steps": ["Step 1", "Step 2"]
        }
    ],
    "draft_map_advice": ["Specific draft pick, ban, or map veto advice"],
    "key_matchups": [
        {
            "our_player": "Role/Name",
            "their_player": "Role/Name",
            "advantage": "Favorable",
            "tips": ["Tip 1"]
        }
    ]
}

Ensure the advice is specific to the data provided (e.g., if they are weak early game, suggest early aggression).
"#;

const COACH_SYSTEM_PROMPT: &str = "You are an expert esports analyst and coach.\n\
You are helpful, encouraging, and extremely knowledgeable about League of Legends and VALORANT.\n\
You have access to data about the opponent team. Use this data to answer the user's questions.\n\
\n\
Data context provided:\n\
{context}\n\
\n\
If the user asks about something not in the data, use your general game knowledge but mention you don't have specific stats for it.\n\
Keep answers concise (under 3-4 sentences) unless asked for a detailed explanation.";

const COACH_MAX_TOKENS: u32 = 500;

/// Strip markdown code fences from a model response.
///
/// Models regularly wrap JSON output in ``` or ```json fences despite being
/// told not to.
pub fn extract_json(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Model response shape. Every field is optional; missing values take the
/// same defaults whichever path produced the brief.
#[derive(Debug, Deserialize)]
struct BriefPayload {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    win_conditions: Vec<String>,
    #[serde(default)]
    recommendations: Vec<RecommendationPayload>,
    #[serde(default)]
    draft_map_advice: Vec<String>,
    #[serde(default)]
    key_matchups: Vec<KeyMatchup>,
}

#[derive(Debug, Deserialize)]
struct RecommendationPayload {
    #[serde(default = "default_rec_title")]
    title: String,
    #[serde(default = "default_rec_priority")]
    priority: String,
    #[serde(default = "default_rec_category")]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    execution_steps: Vec<String>,
}

fn default_rec_title() -> String {
    "Strategy".to_string()
}

fn default_rec_priority() -> String {
    "Medium".to_string()
}

fn default_rec_category() -> String {
    "General".to_string()
}

/// Generates counter-strategy briefs from team profiles.
pub struct StrategySynthesizer {
    backend: Arc<dyn TextBackend>,
    max_tokens: u32,
}

impl StrategySynthesizer {
    pub fn new(backend: Arc<dyn TextBackend>, max_tokens: u32) -> Self {
        Self {
            backend,
            max_tokens,
        }
    }

    /// Generate a counter-strategy brief. Infallible: when the model path
    /// fails for any reason the deterministic fallback produces the brief.
    pub async fn counter_strategy(
        &self,
        opponent: &TeamProfile,
        our_team: &TeamProfile,
        title: GameTitle,
    ) -> StrategyBrief {
        match self.generate_with_model(opponent, our_team, title).await {
            Ok(brief) => brief,
            Err(err) => {
                warn!(
                    backend = self.backend.name(),
                    error = %err,
                    "strategy generation failed, using rules-based fallback"
                );
                fallback_brief(opponent, our_team, title)
            }
        }
    }

    /// Answer a free-form coaching question with the given data context.
    ///
    /// Unlike brief generation there is no structured fallback here; a
    /// backend failure surfaces to the caller.
    pub async fn coach_answer(&self, message: &str, context: &str) -> Result<String, SynthError> {
        let system = COACH_SYSTEM_PROMPT.replace("{context}", context);
        self.backend
            .generate(message, &system, COACH_MAX_TOKENS.min(self.max_tokens))
            .await
    }

    async fn generate_with_model(
        &self,
        opponent: &TeamProfile,
        our_team: &TeamProfile,
        title: GameTitle,
    ) -> Result<StrategyBrief, SynthError> {
        let prompt = build_prompt(opponent, our_team, title);

        let response = self
            .backend
            .generate(&prompt, SYSTEM_PROMPT, self.max_tokens)
            .await?;

        let cleaned = extract_json(&response);
        let payload: BriefPayload = serde_json::from_str(&cleaned)
            .map_err(|e| SynthError::ResponseParse(e.to_string()))?;

        info!(
            backend = self.backend.name(),
            recommendations = payload.recommendations.len(),
            "generated counter-strategy"
        );

        Ok(StrategyBrief {
            opponent_team_id: opponent.team_id.clone(),
            our_team_id: our_team.team_id.clone(),
            recommendations: payload
                .recommendations
                .into_iter()
                .map(|rec| Recommendation {
                    title: rec.title,
                    priority: rec.priority,
                    category: rec.category,
                    description: rec.description,
                    execution_steps: rec.execution_steps,
                })
                .collect(),
            win_conditions: payload.win_conditions,
            draft_map_advice: payload.draft_map_advice,
            key_matchups: payload.key_matchups,
            summary: payload.summary,
            via_fallback: false,
            generated_at: Utc::now(),
        })
    }
}

fn format_patterns(profile: &TeamProfile) -> String {
    let patterns: Vec<&String> = profile
        .early_game_patterns
        .iter()
        .chain(&profile.mid_game_patterns)
        .chain(&profile.late_game_patterns)
        .chain(&profile.attack_tendencies)
        .chain(&profile.defense_tendencies)
        .collect();

    if patterns.is_empty() {
        "No clear patterns".to_string()
    } else {
        patterns
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn format_preferences(profile: &TeamProfile, title: GameTitle) -> String {
    if title.round_based() && !profile.map_preferences.is_empty() {
        let best = profile
            .map_preferences
            .iter()
            .max_by(|a, b| a.1.win_rate.total_cmp(&b.1.win_rate));
        let worst = profile
            .map_preferences
            .iter()
            .min_by(|a, b| a.1.win_rate.total_cmp(&b.1.win_rate));
        if let (Some((best_map, best_stats)), Some((worst_map, worst_stats))) = (best, worst) {
            return format!(
                "Best Map: {} ({:.0}%), Worst Map: {} ({:.0}%)",
                best_map,
                best_stats.win_rate * 100.0,
                worst_map,
                worst_stats.win_rate * 100.0
            );
        }
    }
    "N/A".to_string()
}

fn build_prompt(opponent: &TeamProfile, our_team: &TeamProfile, title: GameTitle) -> String {
    USER_PROMPT_TEMPLATE
        .replace("{game}", &title.to_string())
        .replace("{opponent_name}", &opponent.team_name)
        .replace("{opponent_playstyle}", &opponent.playstyle)
        .replace("{our_name}", &our_team.team_name)
        .replace("{our_playstyle}", &our_team.playstyle)
        .replace("{opponent_weaknesses}", &opponent.weaknesses.join(", "))
        .replace("{opponent_strengths}", &opponent.strengths.join(", "))
        .replace("{opponent_patterns}", &format_patterns(opponent))
        .replace("{opponent_preferences}", &format_preferences(opponent, title))
        .replace("{our_strengths}", &our_team.strengths.join(", "))
}

/// Deterministic rules-based brief built from the opponent's weaknesses.
pub fn fallback_brief(
    opponent: &TeamProfile,
    our_team: &TeamProfile,
    title: GameTitle,
) -> StrategyBrief {
    let recommendations: Vec<Recommendation> = opponent
        .weaknesses
        .iter()
        .map(|weakness| Recommendation {
            title: format!("Exploit {}", weakness),
            priority: default_rec_priority(),
            category: default_rec_category(),
            description: format!("Focus on their {}", weakness),
            execution_steps: Vec::new(),
        })
        .collect();

    let (win_conditions, draft_map_advice) = match title {
        GameTitle::Lol => (
            vec!["Control objectives".to_string(), "Don't feed".to_string()],
            vec!["Ban their best champ".to_string()],
        ),
        GameTitle::Valorant => (
            vec![
                "Win pistol rounds".to_string(),
                "Trade efficiently".to_string(),
            ],
            vec!["Veto their best map".to_string()],
        ),
    };

    StrategyBrief {
        opponent_team_id: opponent.team_id.clone(),
        our_team_id: our_team.team_id.clone(),
        recommendations,
        win_conditions,
        draft_map_advice,
        key_matchups: Vec::new(),
        summary: "Static fallback summary.".to_string(),
        via_fallback: true,
        generated_at: Utc::now(),
    }
}
