//! End-to-end analyze tests.
//!
//! These tests feed JSON batches through parsing, validation, graph
//! analysis, and scoring, and check the ranked output.

use taskrank::scoring::Strategy;
use taskrank::Error;

use crate::fixtures::{
    analyze_json, bare_tasks, date_str, engine, project_plan, ranked_ids, warning_strings,
};

/// Given an overdue important task and a quick low-importance task due later
/// When analyzed with deadline_driven
/// Then the overdue task ranks first
#[test]
fn test_deadline_driven_prefers_overdue() {
    let json = format!(
        r#"[
            {{"id": "T1", "title": "Overdue report", "due_date": "{}", "importance": 9, "estimated_hours": 4, "dependencies": []}},
            {{"id": "T2", "title": "Quick tidy-up", "due_date": "{}", "importance": 3, "estimated_hours": 1, "dependencies": []}}
        ]"#,
        date_str(-1),
        date_str(25)
    );
    let analysis = analyze_json(&json, Some("deadline_driven")).unwrap();
    assert_eq!(ranked_ids(&analysis), vec!["T1", "T2"]);
    assert!(analysis.warnings.is_empty());
}

#[test]
fn test_unknown_strategy_is_rejected() {
    let json = r#"[{"id": "T1", "title": "a"}]"#;
    let err = analyze_json(json, Some("foo")).unwrap_err();
    match err {
        Error::InvalidStrategy { name } => assert_eq!(name, "foo"),
        other => panic!("expected InvalidStrategy, got {:?}", other),
    }
}

#[test]
fn test_unknown_strategy_in_document_is_rejected() {
    let json = r#"{"tasks": [{"title": "a"}], "strategy": "whatever"}"#;
    assert!(matches!(
        analyze_json(json, None),
        Err(Error::InvalidStrategy { .. })
    ));
}

#[test]
fn test_empty_batch_serializes_empty() {
    let analysis = analyze_json("[]", None).unwrap();
    let value = serde_json::to_value(&analysis).unwrap();
    assert_eq!(value["tasks"], serde_json::json!([]));
    assert_eq!(value["warnings"], serde_json::json!([]));
    assert_eq!(value["count"], 0);
}

#[test]
fn test_document_strategy_and_override() {
    let json = r#"{"tasks": [{"id": "A", "title": "a"}], "strategy": "high_impact"}"#;
    assert_eq!(
        analyze_json(json, None).unwrap().strategy,
        Strategy::HighImpact
    );
    assert_eq!(
        analyze_json(json, Some("fastest_wins")).unwrap().strategy,
        Strategy::FastestWins
    );
}

#[test]
fn test_validation_failure_returns_nothing() {
    let missing_title = r#"[{"id": "A", "title": "fine"}, {"id": "B", "importance": 4}]"#;
    assert!(matches!(
        analyze_json(missing_title, None),
        Err(Error::Validation(_))
    ));

    let bad_hours = r#"[{"id": "A", "title": "a", "estimated_hours": "lots"}]"#;
    assert!(matches!(
        analyze_json(bad_hours, None),
        Err(Error::Validation(_))
    ));

    let bad_importance = r#"[{"id": "A", "title": "a", "importance": 42}]"#;
    assert!(matches!(
        analyze_json(bad_importance, None),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_scores_bounded_for_every_strategy() {
    let mut tasks = project_plan();
    tasks.extend(bare_tasks(3));
    for strategy in Strategy::ALL {
        let analysis = engine(strategy).analyze(tasks.clone());
        assert_eq!(analysis.count, tasks.len());
        for scored in &analysis.tasks {
            assert!(
                (0.0..=1.0).contains(&scored.score),
                "{} scored {} under {}",
                scored.task.id,
                scored.score,
                strategy
            );
            assert!(!scored.explanation.is_empty());
        }
        // Sorted descending.
        for pair in analysis.tasks.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

#[test]
fn test_repeat_calls_are_identical() {
    let e = engine(Strategy::SmartBalance);
    let first = e.analyze(project_plan());
    let second = e.analyze(project_plan());
    assert_eq!(first.tasks, second.tasks);
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn test_project_plan_unlock_counts() {
    let analysis = engine(Strategy::SmartBalance).analyze(project_plan());
    let unlocks = |id: &str| {
        analysis
            .tasks
            .iter()
            .find(|t| t.task.id.as_str() == id)
            .map(|t| t.unlocks_count)
            .unwrap()
    };
    assert_eq!(unlocks("design"), 4);
    assert_eq!(unlocks("build"), 3);
    assert_eq!(unlocks("test"), 1);
    assert_eq!(unlocks("docs"), 0);
    assert_eq!(unlocks("release"), 0);
    assert_eq!(ranked_ids(&analysis)[0], "design");
}

#[test]
fn test_equal_scores_keep_submission_order() {
    let analysis = engine(Strategy::DeadlineDriven).analyze(bare_tasks(6));
    assert_eq!(
        ranked_ids(&analysis),
        vec!["T0", "T1", "T2", "T3", "T4", "T5"]
    );
}

#[test]
fn test_response_carries_input_fields() {
    let json = format!(
        r#"[{{"id": 12, "title": "Numeric id", "due_date": "{}", "estimated_hours": 1.5, "importance": 6, "dependencies": [13], "owner": "sam"}},
            {{"id": 13, "title": "Prerequisite"}}]"#,
        date_str(3)
    );
    let analysis = analyze_json(&json, None).unwrap();
    let value = serde_json::to_value(&analysis).unwrap();
    let first = value["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == "12")
        .unwrap()
        .clone();
    assert_eq!(first["title"], "Numeric id");
    assert_eq!(first["due_date"], date_str(3));
    assert_eq!(first["estimated_hours"], 1.5);
    assert_eq!(first["importance"], 6);
    assert_eq!(first["dependencies"], serde_json::json!(["13"]));
    assert!(first["score"].is_f64());
    assert!(first["explanation"].as_str().unwrap().contains("priority"));
    assert_eq!(first["has_cycle"], false);
    assert_eq!(first["owner"], "sam");
}

#[test]
fn test_auto_ids_assigned_and_distinct() {
    let analysis = analyze_json(r#"[{"title": "a"}, {"title": "b"}]"#, None).unwrap();
    let ids = ranked_ids(&analysis);
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(warning_strings(&analysis).is_empty());
}
