//! Per-task score components, each normalized to [0, 1].

use crate::core::task::Task;
use crate::scoring::strategy::Weights;
use chrono::NaiveDate;

/// Value used for any component whose input was not provided.
pub const NEUTRAL: f64 = 0.5;

/// Number of unlocked tasks at which the unlock component saturates.
pub const UNLOCK_SATURATION: f64 = 5.0;

/// Urgency horizon in days; anything due this far out or later scores 0.
pub const URGENCY_HORIZON_DAYS: f64 = 30.0;

pub const URGENCY_OVERDUE: f64 = 1.0;
pub const URGENCY_DUE_TODAY: f64 = 0.95;
/// Ceiling for dates after today, keeping them below "due today".
pub const URGENCY_FUTURE_MAX: f64 = 0.9;

/// Days from `today` until `due`; negative when overdue.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

pub fn urgency(due: Option<NaiveDate>, today: NaiveDate) -> f64 {
    let Some(due) = due else {
        return NEUTRAL;
    };
    match days_until(due, today) {
        d if d < 0 => URGENCY_OVERDUE,
        0 => URGENCY_DUE_TODAY,
        d => (1.0 - d as f64 / URGENCY_HORIZON_DAYS).clamp(0.0, URGENCY_FUTURE_MAX),
    }
}

/// Map the 1-10 importance scale onto [0, 1].
pub fn importance(importance: Option<u8>) -> f64 {
    match importance {
        Some(i) => ((f64::from(i) - 1.0) / 9.0).clamp(0.0, 1.0),
        None => NEUTRAL,
    }
}

/// Shorter tasks score higher.
pub fn effort(hours: Option<f64>) -> f64 {
    match hours {
        Some(h) if h >= 0.0 => 1.0 / (1.0 + h),
        _ => NEUTRAL,
    }
}

pub fn unlock(unlocks_count: usize) -> f64 {
    (unlocks_count as f64 / UNLOCK_SATURATION).min(1.0)
}

/// One of the four score inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    Urgency,
    Importance,
    Effort,
    Unlock,
}

/// The normalized components for one task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Components {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub unlock: f64,
}

impl Components {
    /// Compute components for `task`. Tasks on a dependency cycle get no
    /// unlock credit.
    pub fn for_task(task: &Task, today: NaiveDate, unlocks_count: usize, in_cycle: bool) -> Self {
        Self {
            urgency: urgency(task.due_date, today),
            importance: importance(task.importance),
            effort: effort(task.estimated_hours),
            unlock: if in_cycle { 0.0 } else { unlock(unlocks_count) },
        }
    }

    /// Weighted contribution of each factor, in fixed factor order.
    pub fn contributions(&self, weights: &Weights) -> [(Factor, f64); 4] {
        [
            (Factor::Urgency, weights.urgency * self.urgency),
            (Factor::Importance, weights.importance * self.importance),
            (Factor::Effort, weights.effort * self.effort),
            (Factor::Unlock, weights.unlock * self.unlock),
        ]
    }

    /// Weighted sum clamped to [0, 1], unrounded.
    pub fn weighted_sum(&self, weights: &Weights) -> f64 {
        self.contributions(weights)
            .iter()
            .map(|(_, c)| c)
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }
}

/// Round a score to two decimals for display.
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
