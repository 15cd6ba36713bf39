//! Integration tests for history persistence.
//!
//! These tests verify that history written by one store instance reads back
//! through another, as happens between an interactive session and a later
//! `--history` run.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use timer_lib::{
    HistoryRecord, HistoryStore, PipeFileStore, TIMESTAMP_FORMAT, Task, write_report,
};
use tempfile::tempdir;

#[test]
fn history_round_trips_across_store_instances() {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("timer_history.log");

    {
        let store = PipeFileStore::new(history_path.clone());
        let task = Task::new("Focus", Duration::from_secs(90));
        store
            .append(&HistoryRecord::from_task(&task, Local::now()))
            .unwrap();
    }

    let contents = std::fs::read_to_string(&history_path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("Focus|1m30s|"));

    let store = PipeFileStore::new(history_path);
    let records = store.load_all().unwrap().expect("history exists");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Focus");
    assert_eq!(records[0].duration, "1m30s");
    assert!(NaiveDateTime::parse_from_str(&records[0].logged_at, TIMESTAMP_FORMAT).is_ok());

    let mut out = Vec::new();
    write_report(&mut out, Some(&records)).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Task: Focus\n"));
    assert!(text.contains("Duration: 1m30s\n"));
    assert!(text.contains(&format!("Completed: {}\n", records[0].logged_at)));
}

#[test]
fn history_accumulates_across_sessions() {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("timer_history.log");

    for (name, secs) in [("first", 60), ("second", 3723)] {
        let store = PipeFileStore::new(history_path.clone());
        let task = Task::new(name, Duration::from_secs(secs));
        store
            .append(&HistoryRecord::from_task(&task, Local::now()))
            .unwrap();
    }

    let store = PipeFileStore::new(history_path);
    let records = store.load_all().unwrap().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "first");
    assert_eq!(records[0].duration, "1m0s");
    assert_eq!(records[1].name, "second");
    assert_eq!(records[1].duration, "1h2m3s");
}

#[test]
fn hand_edited_lines_are_tolerated() {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("timer_history.log");
    std::fs::write(
        &history_path,
        "Focus|25m0s|2024-03-05 09:07:01\nnot a record\nBreak|5m0s|2024-03-05 09:32:01\n",
    )
    .unwrap();

    let store = PipeFileStore::new(history_path);
    let names: Vec<String> = store
        .load_all()
        .unwrap()
        .unwrap()
        .into_iter()
        .map(|record| record.name)
        .collect();
    assert_eq!(names, ["Focus", "Break"]);
}

#[test]
fn missing_history_reads_as_none() {
    let dir = tempdir().unwrap();
    let store = PipeFileStore::new(dir.path().join("never-written.log"));
    assert!(store.load_all().unwrap().is_none());
}

#[test]
fn unreadable_history_is_an_error() {
    let dir = tempdir().unwrap();
    // A directory exists at the path but cannot be read as a file.
    let store = PipeFileStore::new(dir.path().to_path_buf());
    assert!(store.load_all().is_err());
}
