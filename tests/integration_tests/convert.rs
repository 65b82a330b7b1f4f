//! Integration tests for the otel2chrome binary.

use serde_json::{Value, json};

use crate::common::{
    SAMPLE_JSONL, batch_line, converter, run_with_stdin, span, stdout_json, with_events,
};

fn phases_and_names(trace: &Value) -> Vec<(String, String)> {
    trace["traceEvents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["ph"].as_str().unwrap().to_string(),
                e["name"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

/// A root and a child that starts before it: the root is widened.
#[test]
fn test_convert_skewed_child_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let input = batch_line(vec![
        span("R", "root", "", 1000, 5000),
        span("C", "child", "R", 900, 4000),
    ]);

    let output = run_with_stdin(converter(dir.path()), &input);
    let trace = stdout_json(&output);

    assert_eq!(
        phases_and_names(&trace),
        [
            ("B".to_string(), "root (R)".to_string()),
            ("B".to_string(), "child (C)".to_string()),
            ("E".to_string(), "child (C)".to_string()),
            ("E".to_string(), "root (R)".to_string()),
        ]
    );
    let events = trace["traceEvents"].as_array().unwrap();
    assert_eq!(events[2]["ts"], json!(3.298));
    assert_eq!(events[3]["ts"], json!(4.299));
    assert_eq!(trace["displayTimeUnit"], "ns");
    assert_eq!(
        trace["stackFrames"],
        json!({
            "0": { "name": "root" },
            "1000001": { "name": "child", "parent": 0 },
        })
    );
}

#[test]
fn test_convert_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_stdin(converter(dir.path()), "");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\"traceEvents\":[],\"displayTimeUnit\":\"ns\",\"stackFrames\":{}}\n"
    );
}

#[test]
fn test_convert_point_events_and_missing_parent() {
    let dir = tempfile::tempdir().unwrap();
    let input = batch_line(vec![with_events(
        span("s1", "fetch", "missing", 1000, 2000),
        &[(1200, "dns"), (1800, "tls")],
    )]);

    let trace = stdout_json(&run_with_stdin(converter(dir.path()), &input));
    let events = trace["traceEvents"].as_array().unwrap();

    let phases: Vec<_> = events.iter().map(|e| e["ph"].as_str().unwrap()).collect();
    assert_eq!(phases, ["B", "i", "i", "E"]);
    assert!(events.iter().all(|e| e["sf"] == json!(0)));
    assert_eq!(events[1]["name"], "dns (s1)");
    assert_eq!(events[1]["s"], "t");
    assert_eq!(trace["stackFrames"], json!({ "0": { "name": "fetch" } }));
}

#[test]
fn test_convert_sample_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = converter(dir.path())
        .arg(SAMPLE_JSONL)
        .output()
        .expect("Failed to run otel2chrome");
    let trace = stdout_json(&output);

    // 4 spans as Begin/End pairs plus 3 point-events
    assert_eq!(trace["traceEvents"].as_array().unwrap().len(), 11);
    assert_eq!(
        trace["stackFrames"],
        json!({
            "0": { "name": "GET /orders" },
            "3": { "name": "cron.tick" },
            "1000001": { "name": "db.query", "parent": 0 },
            "1000002": { "name": "render", "parent": 0 },
        })
    );
    let first = &trace["traceEvents"][0];
    assert_eq!(first["name"], "GET /orders (eee19b7ec3c1b174)");
    assert_eq!(first["ts"], json!(0.0));
}

#[test]
fn test_convert_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let run = || {
        converter(dir.path())
            .arg(SAMPLE_JSONL)
            .output()
            .expect("Failed to run otel2chrome")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_convert_malformed_line_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = format!(
        "{}\n{}\n",
        batch_line(vec![span("a", "ok", "", 1, 2)]),
        r#"{"resourceSpans":[{"scopeSpans":[{"spans":[{"spanId":"b"}]}]}]}"#
    );

    let output = run_with_stdin(converter(dir.path()), &input);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "no partial output on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed batch on line 2"), "{stderr}");
}

#[test]
fn test_convert_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = converter(dir.path())
        .arg("/nonexistent/path/to/spans.jsonl")
        .output()
        .expect("Failed to run otel2chrome");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open"), "{stderr}");
}

#[test]
fn test_convert_writes_output_file_pretty() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("trace.json");

    let output = converter(dir.path())
        .arg(SAMPLE_JSONL)
        .arg("--pretty")
        .arg("-o")
        .arg(&out_path)
        .output()
        .expect("Failed to run otel2chrome");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("{\n  \"traceEvents\": ["));
    let trace: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(trace["displayTimeUnit"], "ns");
}

#[test]
fn test_convert_stats_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let output = converter(dir.path())
        .arg(SAMPLE_JSONL)
        .arg("--stats")
        .output()
        .expect("Failed to run otel2chrome");

    let trace = stdout_json(&output);
    assert!(trace["traceEvents"].is_array());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SPAN TIME SUMMARY"), "{stderr}");
    assert!(stderr.contains("4 spans, 3 point events"), "{stderr}");
    assert!(stderr.contains("db.query"), "{stderr}");
}

#[test]
fn test_convert_non_batch_line_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_stdin(converter(dir.path()), "{\"foo\":1}\n");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed batch on line 1"), "{stderr}");
    assert!(stderr.contains("missing field `resourceSpans`"), "{stderr}");
    // Each cause is printed once
    assert_eq!(stderr.matches("missing field").count(), 1, "{stderr}");
}
