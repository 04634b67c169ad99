#![allow(clippy::unwrap_used)]

use super::*;
use serial_test::serial;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tempfile::TempDir;

#[test]
fn test_flush_writes_buffered_lines_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.log");
    let sink = LogFile::new(Some(path.clone()));

    sink.append("first");
    sink.append("second");
    sink.flush();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "first\nsecond\n");
}

#[test]
fn test_appends_accumulate_across_flushes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.log");
    let sink = LogFile::new(Some(path.clone()));

    sink.append("one");
    sink.flush();
    sink.append("two");
    sink.flush();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "one\ntwo\n");
}

#[test]
fn test_deferred_task_flushes_without_explicit_flush() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.log");
    let sink = LogFile::new(Some(path.clone()));

    sink.append("deferred");

    // the background task fires after FLUSH_WINDOW; poll with margin
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !path.exists() && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
    }
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "deferred\n");
}

#[test]
fn test_unwritable_path_falls_back_to_temp_dir() {
    let name = format!("stagehand-fallback-{}.log", std::process::id());
    let missing_dir = std::env::temp_dir().join("stagehand-no-such-dir");
    let sink = LogFile::new(Some(missing_dir.join(&name)));

    sink.append("rescued");
    sink.flush();

    let fallback = std::env::temp_dir().join(&name);
    let content = std::fs::read_to_string(&fallback).unwrap();
    assert_eq!(content, "rescued\n");
    assert_eq!(sink.path(), Some(fallback.clone()));
    std::fs::remove_file(fallback).unwrap();
}

#[test]
fn test_second_failure_disables_silently() {
    // a path ending in ".." has no file name, so no fallback exists either
    let impossible = std::env::temp_dir().join("stagehand-no-such-dir").join("..");
    let sink = LogFile::new(Some(impossible));

    sink.append("lost");
    sink.flush();

    assert_eq!(sink.path(), None);
    // later appends are ignored, not errors
    sink.append("still lost");
    sink.flush();
    assert_eq!(sink.path(), None);
}

#[test]
fn test_disabled_sink_ignores_appends() {
    let sink = LogFile::disabled();
    sink.append("nothing");
    sink.flush();
    assert_eq!(sink.path(), None);
}

#[test]
#[serial]
fn test_relay_delivers_in_subscription_order() {
    let seen = Arc::new(StdMutex::new(Vec::new()));

    let first = {
        let seen = Arc::clone(&seen);
        relay::subscribe(move |line| seen.lock().unwrap().push(format!("a:{line}")))
    };
    let second = {
        let seen = Arc::clone(&seen);
        relay::subscribe(move |line| seen.lock().unwrap().push(format!("b:{line}")))
    };

    relay::broadcast("hello");
    relay::unsubscribe(first);
    relay::unsubscribe(second);

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec!["a:hello".to_string(), "b:hello".to_string()]);
}

#[test]
#[serial]
fn test_relay_unsubscribe_stops_delivery() {
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let token = {
        let seen = Arc::clone(&seen);
        relay::subscribe(move |line| seen.lock().unwrap().push(line.to_string()))
    };

    relay::broadcast("before");
    relay::unsubscribe(token);
    relay::broadcast("after");

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec!["before".to_string()]);
}

#[test]
#[serial]
fn test_relay_unknown_token_is_ignored() {
    let token = {
        let seen: Arc<StdMutex<Vec<String>>> = Arc::new(StdMutex::new(Vec::new()));
        let seen = Arc::clone(&seen);
        relay::subscribe(move |line| seen.lock().unwrap().push(line.to_string()))
    };
    relay::unsubscribe(token);
    relay::unsubscribe(token);
}
