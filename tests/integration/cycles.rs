//! Dependency graph anomalies: cycles, dangling references, duplicates.

use taskrank::scoring::Strategy;
use taskrank::Task;

use crate::fixtures::{analyze_json, engine, ranked_ids, warning_strings};

/// Given A -> B -> C -> A
/// When analyzed
/// Then the cycle is reported and no member gets unlock credit
#[test]
fn test_three_way_cycle_reported_and_penalized() {
    let tasks = vec![
        Task::new("A", "a").with_dependencies(&["B"]),
        Task::new("B", "b").with_dependencies(&["C"]),
        Task::new("C", "c").with_dependencies(&["A"]),
    ];
    let analysis = engine(Strategy::SmartBalance).analyze(tasks);

    assert_eq!(
        warning_strings(&analysis),
        vec!["circular dependency detected: A -> B -> C -> A".to_string()]
    );
    for scored in &analysis.tasks {
        assert!(scored.has_cycle, "{} should be flagged", scored.task.id);
        assert_eq!(scored.unlocks_count, 0);
        assert!(scored.explanation.contains("circular dependency"));
    }
}

#[test]
fn test_cycle_does_not_abort_other_tasks() {
    let tasks = vec![
        Task::new("T3", "loop a").with_dependencies(&["T4"]),
        Task::new("T4", "loop b").with_dependencies(&["T3"]),
        Task::new("base", "base"),
        Task::new("top", "top").with_dependencies(&["base"]),
    ];
    let analysis = engine(Strategy::SmartBalance).analyze(tasks);
    assert_eq!(analysis.count, 4);
    assert_eq!(
        warning_strings(&analysis),
        vec!["circular dependency detected: T3 -> T4 -> T3".to_string()]
    );

    let base = analysis
        .tasks
        .iter()
        .find(|t| t.task.id.as_str() == "base")
        .unwrap();
    assert!(!base.has_cycle);
    assert_eq!(base.unlocks_count, 1);
    assert_eq!(ranked_ids(&analysis)[0], "base");
}

#[test]
fn test_cycle_member_loses_unlock_bonus() {
    // Same shape twice: X is on a loop, Y is not. Both have three dependents.
    let mut tasks = vec![
        Task::new("X", "on loop").with_dependencies(&["X2"]),
        Task::new("X2", "loop partner").with_dependencies(&["X"]),
        Task::new("Y", "free"),
    ];
    for i in 0..3 {
        tasks.push(Task::new(&format!("x{}", i), "dep").with_dependencies(&["X"]));
        tasks.push(Task::new(&format!("y{}", i), "dep").with_dependencies(&["Y"]));
    }
    let analysis = engine(Strategy::SmartBalance).analyze(tasks);
    let get = |id: &str| {
        analysis
            .tasks
            .iter()
            .find(|t| t.task.id.as_str() == id)
            .unwrap()
            .clone()
    };
    let x = get("X");
    let y = get("Y");
    assert_eq!(x.unlocks_count, 3);
    assert_eq!(y.unlocks_count, 3);
    assert!(x.score < y.score);
    // 0.4 neutral base plus 0.2 * 3/5
    assert_eq!(y.score, 0.52);
    assert_eq!(x.score, 0.4);
}

#[test]
fn test_dangling_dependency_warns_and_continues() {
    let json = r#"[
        {"id": "T1", "title": "a", "dependencies": ["T9"]},
        {"id": "T2", "title": "b", "dependencies": ["T1"]}
    ]"#;
    let analysis = analyze_json(json, None).unwrap();
    assert_eq!(
        warning_strings(&analysis),
        vec!["unknown dependency: T9 referenced by T1".to_string()]
    );
    let t1 = &analysis.tasks[0];
    assert_eq!(t1.task.id.as_str(), "T1");
    assert_eq!(t1.unlocks_count, 1);
}

#[test]
fn test_self_and_repeated_dependencies() {
    let json = r#"[
        {"id": "A", "title": "a", "dependencies": ["A", "B", "B"]},
        {"id": "B", "title": "b"}
    ]"#;
    let analysis = analyze_json(json, None).unwrap();
    assert_eq!(
        warning_strings(&analysis),
        vec![
            "self dependency ignored: A".to_string(),
            "duplicate dependency: B listed more than once by A".to_string(),
        ]
    );
    for scored in &analysis.tasks {
        assert!(!scored.has_cycle);
    }
}

#[test]
fn test_duplicate_task_ids_keep_last() {
    let json = r#"[
        {"id": "A", "title": "first", "importance": 10},
        {"id": "B", "title": "b", "dependencies": ["A"]},
        {"id": "A", "title": "second", "importance": 2}
    ]"#;
    let analysis = analyze_json(json, Some("high_impact")).unwrap();
    assert_eq!(analysis.count, 2);
    assert_eq!(
        warning_strings(&analysis),
        vec!["duplicate task id: A (keeping last occurrence)".to_string()]
    );
    let a = analysis
        .tasks
        .iter()
        .find(|t| t.task.id.as_str() == "A")
        .unwrap();
    assert_eq!(a.task.title, "second");
    // B still resolves its dependency against the retained A.
    assert_eq!(a.unlocks_count, 1);
}
