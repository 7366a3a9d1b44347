//! Human-readable explanations for task scores.
//!
//! An explanation names the one or two factors that contributed most to a
//! task's score under the active strategy. Output depends only on the task,
//! its graph position, and the request's reference date.

use crate::core::task::Task;
use crate::scoring::components::{days_until, Components, Factor};
use crate::scoring::strategy::Weights;
use chrono::NaiveDate;

/// Scores at or above this read as high priority.
pub const HIGH_PRIORITY: f64 = 0.7;
/// Scores at or above this read as medium priority.
pub const MEDIUM_PRIORITY: f64 = 0.4;

/// Effort at or below this many hours reads as a quick win.
const QUICK_WIN_HOURS: f64 = 2.0;
/// Importance at or above this reads as high importance.
const HIGH_IMPORTANCE: u8 = 8;

const CYCLE_NOTE: &str = " Unlock credit withheld: part of a circular dependency.";

/// Graph facts about a task that feed its explanation.
#[derive(Debug, Clone, Copy)]
pub struct ExplainContext {
    pub today: NaiveDate,
    pub unlocks_count: usize,
    pub in_cycle: bool,
}

pub fn priority_label(score: f64) -> &'static str {
    if score >= HIGH_PRIORITY {
        "High"
    } else if score >= MEDIUM_PRIORITY {
        "Medium"
    } else {
        "Low"
    }
}

pub fn explain(
    task: &Task,
    components: &Components,
    weights: &Weights,
    score: f64,
    ctx: ExplainContext,
) -> String {
    let mut ranked = components.contributions(weights);
    // Stable, so equal contributions keep factor order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    // Neutral defaults for absent inputs are never named.
    let phrases: Vec<String> = ranked
        .iter()
        .filter(|(_, contribution)| *contribution > 0.0)
        .filter_map(|(factor, _)| describe(*factor, task, ctx))
        .take(2)
        .collect();

    let mut sentence = format!("{} priority: ", priority_label(score));
    if phrases.is_empty() {
        sentence.push_str("no strong factors.");
    } else {
        sentence.push_str(&phrases.join(" and "));
        sentence.push('.');
    }
    if ctx.in_cycle {
        sentence.push_str(CYCLE_NOTE);
    }
    sentence
}

/// Phrase for one factor, or `None` when the caller left its input out.
fn describe(factor: Factor, task: &Task, ctx: ExplainContext) -> Option<String> {
    let phrase = match factor {
        Factor::Urgency => match days_until(task.due_date?, ctx.today) {
            d if d < 0 => format!("overdue by {}", plural(-d as usize, "day")),
            0 => "due today".to_string(),
            1 => "due tomorrow".to_string(),
            d => format!("due in {} days", d),
        },
        Factor::Importance => match task.importance? {
            i if i >= HIGH_IMPORTANCE => format!("high importance ({}/10)", i),
            i => format!("importance {}/10", i),
        },
        Factor::Effort => match task.estimated_hours? {
            h if h <= QUICK_WIN_HOURS => format!("quick win at {}h", h),
            h => format!("estimated at {}h", h),
        },
        Factor::Unlock => format!("unlocks {}", plural(ctx.unlocks_count, "other task")),
    };
    Some(phrase)
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}
