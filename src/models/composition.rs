//! Composition archetypes and analysis results.

use serde::{Deserialize, Serialize};

/// Strategic shape of a team composition.
///
/// Classification precedence is fixed per title: engage > poke > split >
/// standard for LoL, duelist > controller > initiator > balanced for
/// VALORANT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    // LoL
    #[serde(rename = "Teamfight/Engage")]
    TeamfightEngage,
    #[serde(rename = "Poke/Siege")]
    PokeSiege,
    #[serde(rename = "Split-push")]
    SplitPush,
    #[serde(rename = "Standard/Skirmish")]
    StandardSkirmish,

    // VALORANT
    #[serde(rename = "Aggressive/Entry-focused")]
    EntryFocused,
    #[serde(rename = "Control/Execute")]
    ControlExecute,
    #[serde(rename = "Information-based")]
    InformationBased,
    #[serde(rename = "Standard/Balanced")]
    StandardBalanced,
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Archetype::TeamfightEngage => "Teamfight/Engage",
            Archetype::PokeSiege => "Poke/Siege",
            Archetype::SplitPush => "Split-push",
            Archetype::StandardSkirmish => "Standard/Skirmish",
            Archetype::EntryFocused => "Aggressive/Entry-focused",
            Archetype::ControlExecute => "Control/Execute",
            Archetype::InformationBased => "Information-based",
            Archetype::StandardBalanced => "Standard/Balanced",
        };
        write!(f, "{}", label)
    }
}

/// A distinct character set observed across games.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionProfile {
    /// Sorted character names
    pub composition: Vec<String>,
    pub games_played: u32,
    pub win_rate: f64,
    pub archetype: Archetype,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub power_spikes: Vec<String>,
    pub counter_strategies: Vec<String>,
    /// Map the composition was observed on (VALORANT only)
    pub map: Option<String>,
}
