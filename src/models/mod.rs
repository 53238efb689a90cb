//! Core data structures.

mod composition;
mod profile;
mod record;
mod report;
mod strategy;

pub use composition::*;
pub use profile::*;
pub use record::*;
pub use report::*;
pub use strategy::*;

use serde::{Deserialize, Serialize};

/// Supported esports titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameTitle {
    Lol,
    Valorant,
}

impl GameTitle {
    /// Title id used by the match-data API.
    pub fn title_id(&self) -> &'static str {
        match self {
            GameTitle::Lol => "3",
            GameTitle::Valorant => "6",
        }
    }

    /// Whether scores represent rounds rather than a single map win.
    pub fn round_based(&self) -> bool {
        matches!(self, GameTitle::Valorant)
    }
}

impl std::fmt::Display for GameTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameTitle::Lol => write!(f, "lol"),
            GameTitle::Valorant => write!(f, "valorant"),
        }
    }
}

impl std::str::FromStr for GameTitle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lol" | "league" => Ok(GameTitle::Lol),
            "valorant" | "val" => Ok(GameTitle::Valorant),
            other => Err(format!("Unknown title: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_parse() {
        assert_eq!("lol".parse::<GameTitle>().unwrap(), GameTitle::Lol);
        assert_eq!("Valorant".parse::<GameTitle>().unwrap(), GameTitle::Valorant);
        assert!("dota".parse::<GameTitle>().is_err());
    }

    #[test]
    fn test_title_ids() {
        assert_eq!(GameTitle::Lol.title_id(), "3");
        assert_eq!(GameTitle::Valorant.title_id(), "6");
    }

    #[test]
    fn test_title_serde() {
        let json = serde_json::to_string(&GameTitle::Valorant).unwrap();
        assert_eq!(json, "\"valorant\"");

        let parsed: GameTitle = serde_json::from_str("\"lol\"").unwrap();
        assert_eq!(parsed, GameTitle::Lol);
    }
}
