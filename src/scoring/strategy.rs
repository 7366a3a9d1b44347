//! Scoring strategies and their weight vectors.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Relative weight of each score component. Each strategy's weights sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub unlock: f64,
}

impl Weights {
    pub fn total(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.unlock
    }
}

/// A named weighting of urgency, importance, effort, and unlock weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Even spread with a lean towards deadlines and importance.
    #[default]
    SmartBalance,
    /// Favor short tasks.
    FastestWins,
    /// Favor important tasks.
    HighImpact,
    /// Favor tasks with the nearest due date.
    DeadlineDriven,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    pub fn weights(&self) -> Weights {
        match self {
            Strategy::SmartBalance => Weights {
                urgency: 0.35,
                importance: 0.30,
                effort: 0.15,
                unlock: 0.20,
            },
            Strategy::FastestWins => Weights {
                urgency: 0.15,
                importance: 0.15,
                effort: 0.55,
                unlock: 0.15,
            },
            Strategy::HighImpact => Weights {
                urgency: 0.20,
                importance: 0.55,
                effort: 0.10,
                unlock: 0.15,
            },
            Strategy::DeadlineDriven => Weights {
                urgency: 0.60,
                importance: 0.20,
                effort: 0.10,
                unlock: 0.10,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::SmartBalance => "balances deadlines, importance, effort and blocked work",
            Strategy::FastestWins => "quick wins first",
            Strategy::HighImpact => "most important work first",
            Strategy::DeadlineDriven => "nearest deadlines first",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == name)
            .ok_or_else(|| Error::InvalidStrategy {
                name: name.to_string(),
            })
    }
}
