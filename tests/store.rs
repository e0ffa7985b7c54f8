use std::fs;

use chrono::{Duration, NaiveDate};
use taskrank::error::Error;
use taskrank::store::{TaskStore, DEFAULT_TOP_COUNT};
use taskrank::task::{NewTask, Task, TaskUpdate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("date")
}

fn new_task(title: &str, priority: u8, days: i64, effort: i64, category: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        priority,
        due_date: (today() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string(),
        effort,
        category: category.to_string(),
    }
}

fn assert_ranked(store: &TaskStore) {
    let all = store.tasks();
    let mut expected: Vec<i64> = all.iter().map(Task::score).collect();
    expected.sort_by(|a, b| b.cmp(a));

    for n in 0..=all.len() {
        let top: Vec<i64> = store.top_tasks(n).iter().map(Task::score).collect();
        assert_eq!(top, expected[..n].to_vec(), "top_tasks({n})");
    }
    for task in &all {
        if task.completed {
            assert_eq!(task.score(), 0, "{} is completed", task.title);
        }
    }
}

#[test]
fn ordering_holds_across_mutations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = TaskStore::open(dir.path().join("tasks.json"), today()).expect("open");

    let seeds = [
        ("Taxes", 5, -2, 4, "Home"),
        ("Groceries", 2, 1, 1, "Home"),
        ("Refactor", 3, 20, 12, "Work"),
        ("Email", 1, 0, 0, "Work"),
        ("Dentist", 4, 6, 2, "Health"),
        ("Novel", 1, 90, 40, "Fun"),
    ];
    for (title, priority, days, effort, category) in seeds {
        store
            .add(new_task(title, priority, days, effort, category))
            .expect("add");
        assert_ranked(&store);
    }

    assert!(store.mark_completed("taxes").expect("complete"));
    assert_ranked(&store);

    let bump = TaskUpdate {
        priority: Some(5),
        effort: Some(0),
        ..TaskUpdate::default()
    };
    assert!(store.edit("NOVEL", &bump).expect("edit"));
    assert_ranked(&store);

    let reopen = TaskUpdate {
        completed: Some(false),
        due_date: Some("2026-10-01".to_string()),
        ..TaskUpdate::default()
    };
    assert!(store.edit("Taxes", &reopen).expect("reopen"));
    assert_ranked(&store);
    assert_eq!(store.top_tasks(1)[0].title, "Taxes");

    assert!(store.delete("groceries").expect("delete"));
    assert_ranked(&store);

    store.set_today(today() + Duration::days(30));
    assert_ranked(&store);

    assert_eq!(store.len(), 5);
    assert_eq!(store.top_tasks(DEFAULT_TOP_COUNT).len(), 5);
}

#[test]
fn round_trip_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");

    let store = TaskStore::open(&path, today()).expect("open");
    store.save().expect("save");
    assert_eq!(fs::read_to_string(&path).expect("read").trim(), "[]");

    let reloaded = TaskStore::open(&path, today()).expect("reopen");
    assert!(reloaded.is_empty());
}

#[test]
fn round_trip_reproduces_collection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");

    let mut store = TaskStore::open(&path, today()).expect("open");
    store.add(new_task("Write Report", 5, 10, 2, "Work")).expect("add");
    store.add(new_task("Quick Fix", 1, 1, 1, "Bugs")).expect("add");
    store.add(new_task("Stretch", 2, 3, 0, "Health")).expect("add");
    store.mark_completed("Stretch").expect("complete");

    let reloaded = TaskStore::open(&path, today()).expect("reopen");
    assert_eq!(reloaded.tasks(), store.tasks());
}

#[test]
fn reload_rescores_for_new_day() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");

    let mut store = TaskStore::open(&path, today()).expect("open");
    store.add(new_task("Write Report", 5, 10, 2, "Work")).expect("add");

    let later = TaskStore::open(&path, today() + Duration::days(5)).expect("reopen");
    // five days left: 5 * 5 - 2
    assert_eq!(later.get("write report").expect("task").score(), 23);
}

#[test]
fn every_mutation_is_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");
    let reopen = || TaskStore::open(&path, today()).expect("reopen");

    let mut store = TaskStore::open(&path, today()).expect("open");
    store.add(new_task("Alpha", 3, 2, 1, "A")).expect("add");
    assert!(reopen().get("alpha").is_some());

    let changes = TaskUpdate {
        category: Some("Renamed".to_string()),
        ..TaskUpdate::default()
    };
    store.edit("alpha", &changes).expect("edit");
    assert_eq!(reopen().get("alpha").expect("task").category, "Renamed");

    store.mark_completed("alpha").expect("complete");
    assert!(reopen().get("alpha").expect("task").completed);

    store.delete("alpha").expect("delete");
    assert!(reopen().is_empty());
}

#[test]
fn corrupt_file_fails_to_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");
    fs::write(&path, "not json at all").expect("write");

    match TaskStore::open(&path, today()) {
        Err(Error::Persistence { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected persistence error, got {other:?}"),
    }
}

#[test]
fn legacy_duplicates_resolve_to_highest_score() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[
  {"title": "Twin", "priority": 1, "due_date": "2026-12-01", "effort": 0, "category": "low"},
  {"title": "twin", "priority": 5, "due_date": "2026-10-18", "effort": 0, "category": "high"}
]"#,
    )
    .expect("write");

    let mut store = TaskStore::open(&path, today()).expect("open");
    assert_eq!(store.len(), 2);
    assert_eq!(
        store.load_warnings(),
        ["duplicate task title 'twin' in task file".to_string()]
    );
    assert_eq!(store.get("TWIN").expect("task").category, "high");

    assert!(store.delete("twin").expect("delete"));
    assert_eq!(store.get("twin").expect("task").category, "low");
}

#[test]
fn search_keeps_ranking_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = TaskStore::open(dir.path().join("tasks.json"), today()).expect("open");
    store.add(new_task("Fix login", 2, 9, 0, "Bugs")).expect("add");
    store.add(new_task("Fix crash", 5, 1, 0, "Bugs")).expect("add");
    store.add(new_task("Plan sprint", 3, 2, 0, "Work")).expect("add");

    let titles: Vec<String> = store
        .search("fix")
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(titles, vec!["Fix crash", "Fix login"]);
    assert_eq!(store.search("").len(), 3);
}

#[test]
fn clean_file_has_no_load_warnings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");
    let mut store = TaskStore::open(&path, today()).expect("open");
    store.add(new_task("One", 1, 1, 0, "x")).expect("add");
    store.add(new_task("Two", 1, 1, 0, "x")).expect("add");

    let reloaded = TaskStore::open(&path, today()).expect("reopen");
    assert!(reloaded.load_warnings().is_empty());
}

#[test]
fn extreme_effort_in_file_does_not_overflow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[{"title":"Neg","priority":1,"due_date":"2026-10-18","effort":-9223372036854775807,"category":"x"},
            {"title":"Heavy","priority":5,"due_date":"2026-10-10","effort":9223372036854775807,"category":"x"}]"#,
    )
    .expect("write");

    let store = TaskStore::open(&path, today()).expect("open");
    assert_eq!(store.get("neg").expect("task").score(), i64::MAX);
    assert_eq!(store.top_tasks(1)[0].title, "Neg");
    assert_eq!(store.top_tasks(2)[1].title, "Heavy");
    store.save().expect("save");
}
