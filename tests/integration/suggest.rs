//! Suggestion view tests.
//!
//! Suggestions reuse the full analyze pipeline and keep only the top
//! entries, so they must agree with analyze on order and warnings.

use taskrank::scoring::{resolve_strategy, Strategy, DEFAULT_SUGGEST_LIMIT};
use taskrank::{Task, TaskBatch};

use crate::fixtures::{engine, project_plan, ranked_ids};

#[test]
fn test_suggest_returns_top_three_by_default() {
    let e = engine(Strategy::SmartBalance);
    let full = e.analyze(project_plan());
    let top = e.suggest(project_plan(), DEFAULT_SUGGEST_LIMIT);
    assert_eq!(top.count, 3);
    assert_eq!(ranked_ids(&top), ranked_ids(&full)[..3].to_vec());
    assert_eq!(top.tasks, full.tasks[..3].to_vec());
}

#[test]
fn test_suggest_keeps_all_warnings() {
    let mut tasks = project_plan();
    tasks.push(Task::new("orphan", "orphan").with_dependencies(&["missing"]));
    tasks.push(Task::new("loop-a", "a").with_dependencies(&["loop-b"]));
    tasks.push(Task::new("loop-b", "b").with_dependencies(&["loop-a"]));
    let e = engine(Strategy::HighImpact);
    let full = e.analyze(tasks.clone());
    let top = e.suggest(tasks, 1);
    assert_eq!(top.count, 1);
    assert_eq!(top.warnings, full.warnings);
    assert_eq!(top.warnings.len(), 2);
}

#[test]
fn test_suggest_limit_larger_than_batch() {
    let top = engine(Strategy::FastestWins).suggest(project_plan(), 50);
    assert_eq!(top.count, 5);
}

#[test]
fn test_suggest_from_query_string() {
    // [{"id":"a","title":"Slow","estimated_hours":8},{"id":"b","title":"Quick fix","estimated_hours":0.5}]
    let query = "tasks=%5B%7B%22id%22%3A%22a%22%2C%22title%22%3A%22Slow%22%2C%22estimated_hours%22%3A8%7D%2C\
%7B%22id%22%3A%22b%22%2C%22title%22%3A%22Quick+fix%22%2C%22estimated_hours%22%3A0.5%7D%5D\
&strategy=fastest_wins";
    let batch = TaskBatch::from_query(query).unwrap();
    let strategy = resolve_strategy(None, batch.strategy.as_deref(), Strategy::default()).unwrap();
    assert_eq!(strategy, Strategy::FastestWins);

    let top = engine(strategy).suggest_batch(batch, 1).unwrap();
    assert_eq!(ranked_ids(&top), vec!["b"]);
    assert_eq!(top.tasks[0].task.title, "Quick fix");
    assert!(top.tasks[0].explanation.contains("quick win at 0.5h"));
}

#[test]
fn test_suggest_query_with_leading_unrelated_parameter() {
    // ?limit=3&tasks=[{"id":"A","title":"x"}]
    let query = "?limit=3&tasks=%5B%7B%22id%22%3A%22A%22%2C%22title%22%3A%22x%22%7D%5D";
    let batch = TaskBatch::from_query(query).unwrap();
    assert!(batch.strategy.is_none());

    let top = engine(Strategy::SmartBalance)
        .suggest_batch(batch, DEFAULT_SUGGEST_LIMIT)
        .unwrap();
    assert_eq!(ranked_ids(&top), vec!["A"]);
}

#[test]
fn test_suggest_empty_batch() {
    let top = engine(Strategy::SmartBalance).suggest(Vec::new(), DEFAULT_SUGGEST_LIMIT);
    assert!(top.tasks.is_empty());
    assert!(top.warnings.is_empty());
}
