use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;
use serde_json::json;
use tempfile::TempDir;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn codesearch_command(home: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("codesearch")?;
    cmd.env("CODESEARCH_HOME", home);
    cmd.env_remove("CODESEARCH_URL");
    cmd.env_remove("CODESEARCH_CODEBASE");
    Ok(cmd)
}

fn hit(file_path: &str, from: u32, to: u32, snippet: &str) -> JsonValue {
    json!({
        "context": {
            "file_name": file_path.rsplit('/').next().unwrap_or(file_path),
            "file_path": file_path,
            "module": "",
            "snippet": snippet,
        },
        "line": from,
        "line_from": from,
        "line_to": to,
        "name": "",
        "signature": "",
        "match_type": "text",
        "matched_field": "function_name",
    })
}

async fn search_server(results: JsonValue) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("query", "load config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": results })))
        .mount(&server)
        .await;
    server
}

#[test]
fn help_lists_commands() -> Result<()> {
    let home = TempDir::new()?;
    codesearch_command(home.path())?
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("search").and(contains("structure")).and(contains("embed")));
    Ok(())
}

#[test]
fn empty_query_is_rejected_before_any_request() -> Result<()> {
    let home = TempDir::new()?;
    // Nothing listens on this port; reaching the network would fail differently.
    codesearch_command(home.path())?
        .args(["--base-url", "http://127.0.0.1:9/", "search", "   "])
        .assert()
        .failure()
        .stderr(contains("Please enter a query"));
    Ok(())
}

#[test]
fn local_file_window_grows_in_both_directions() -> Result<()> {
    let home = TempDir::new()?;
    let codebase = TempDir::new()?;
    std::fs::create_dir_all(codebase.path().join("pkg"))?;
    let body: Vec<String> = (1..=30).map(|n| format!("row {n:02}")).collect();
    std::fs::write(codebase.path().join("pkg/app.py"), body.join("\n"))?;

    let output = codesearch_command(home.path())?
        .arg("--codebase")
        .arg(codebase.path())
        .args([
            "file", "pkg/app.py", "--from", "15", "--to", "16", "--up", "1", "--down", "1",
            "--step", "3", "--local",
        ])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;

    // Up: max(1, 15 - 3 - 1) = 11. Down: 16 + 3 = 19.
    assert!(stdout.contains("row 11"));
    assert!(!stdout.contains("row 10"));
    assert!(stdout.contains("row 19"));
    assert!(!stdout.contains("row 20"));
    assert!(stdout.contains("@@ 1 - 10 of app.py"));
    assert!(stdout.contains("@@ 20 - 30 of app.py"));
    Ok(())
}

#[test]
fn local_file_missing_reports_error() -> Result<()> {
    let home = TempDir::new()?;
    let codebase = TempDir::new()?;
    codesearch_command(home.path())?
        .arg("--codebase")
        .arg(codebase.path())
        .args(["file", "nope.py", "--local"])
        .assert()
        .failure()
        .stderr(contains("File not found: nope.py"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn search_prints_compressed_tree() -> Result<()> {
    let server = search_server(json!([
        hit("src/config/loader.py", 3, 4, "def load():\n    pass"),
        hit("src/config/env.py", 1, 1, "import os"),
        hit("README.md", 1, 1, "# readme"),
    ]))
    .await;
    let home = TempDir::new()?;

    let output = codesearch_command(home.path())?
        .args(["--base-url", &server.uri(), "search", "load config", "--no-code"])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("src/config"));
    assert!(stdout.contains("loader.py"));
    assert!(stdout.contains("Text Match | Function"));
    assert!(stdout.contains("README.md"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn search_json_includes_tree() -> Result<()> {
    let server = search_server(json!([
        hit("a/b/c.py", 1, 2, "x\ny"),
        hit("a/b/d.py", 5, 5, "z"),
    ]))
    .await;
    let home = TempDir::new()?;

    let output = codesearch_command(home.path())?
        .args(["--base-url", &server.uri(), "search", "load config", "--json"])
        .output()?;
    assert!(output.status.success());
    let value: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["tree"][0]["label"], json!("a/b"));
    assert_eq!(value["tree"][0]["children"][1]["id"], json!("a/b/d.py"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn paths_are_unique_and_ordered() -> Result<()> {
    let server = search_server(json!([
        hit("b.py", 1, 1, "1"),
        hit("a.py", 1, 1, "2"),
        hit("b.py", 9, 9, "3"),
    ]))
    .await;
    let home = TempDir::new()?;

    let output = codesearch_command(home.path())?
        .args(["--base-url", &server.uri(), "paths", "load config"])
        .output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "b.py\na.py\n");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn backend_search_error_is_shown_verbatim() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "result": [], "error": "Embeddings not generated" })),
        )
        .mount(&server)
        .await;
    let home = TempDir::new()?;

    codesearch_command(home.path())?
        .args(["--base-url", &server.uri(), "search", "anything"])
        .assert()
        .failure()
        .stderr(contains("Embeddings not generated"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn models_fall_back_when_backend_is_down() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/available-embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let home = TempDir::new()?;

    codesearch_command(home.path())?
        .args(["--base-url", &server.uri(), "models"])
        .assert()
        .success()
        .stdout(contains("Qodo Embed").and(contains("Nomic Embed")));
    Ok(())
}
