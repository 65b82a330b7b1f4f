//! Configuration file handling in the binary.

use serde_json::Value;

use crate::common::{batch_line, converter, run_with_stdin, span};

fn sample_input() -> String {
    batch_line(vec![span("a", "main", "", 100, 400)])
}

#[test]
fn test_discovered_config_sets_output_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("otel2chrome.toml"),
        "[output]\npretty = true\npath = \"from-config.json\"\n",
    )
    .unwrap();

    let output = run_with_stdin(converter(dir.path()), &sample_input());

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let written = std::fs::read_to_string(dir.path().join("from-config.json")).unwrap();
    assert!(written.contains("\n  \"displayTimeUnit\": \"ns\""));
}

#[test]
fn test_cli_output_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");
    std::fs::write(&config_path, "[output]\npath = \"ignored.json\"\n").unwrap();

    let mut cmd = converter(dir.path());
    cmd.arg("--config").arg(&config_path).arg("-o").arg("chosen.json");
    let output = run_with_stdin(cmd, &sample_input());

    assert!(output.status.success());
    assert!(!dir.path().join("ignored.json").exists());
    let written = std::fs::read_to_string(dir.path().join("chosen.json")).unwrap();
    let trace: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(trace["traceEvents"].as_array().unwrap().len(), 2);
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("otel2chrome.toml"), "[output]\nunknown = 1\n").unwrap();

    let output = run_with_stdin(converter(dir.path()), &sample_input());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse config file"), "{stderr}");
}
