#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

use std::fs;

use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{pinedocs_cmd, ALERTS_PAGE, REFERENCE_PAGE, WELCOME_PAGE};

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/pine-script-reference/v6/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REFERENCE_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pine-script-docs/welcome/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WELCOME_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pine-script-docs/concepts/alerts/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALERTS_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn run_produces_all_four_documents() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let out = tempdir().expect("tempdir");

    pinedocs_cmd()
        .args([
            "--reference-url",
            &format!("{}/pine-script-reference/v6/", server.uri()),
            "--docs-url",
            &format!("{}/pine-script-docs/welcome/", server.uri()),
            "--delay-ms",
            "0",
            "--output-dir",
        ])
        .arg(out.path())
        .arg("run")
        .assert()
        .success();

    for file in [
        "reference_urls.md",
        "docs_urls.md",
        "reference_content.md",
        "docs_content.md",
    ] {
        assert!(out.path().join(file).exists(), "{file} should be written");
    }

    let reference = fs::read_to_string(out.path().join("reference_content.md")).expect("read");
    assert!(reference.contains("# Pine Script V6 Reference - Complete Content"));
    assert!(reference.contains("### alert()"));
    assert!(reference.contains("**Syntax**"));
    assert!(reference.contains("```pine"));
    // Functions section precedes Variables.
    let functions = reference.find("## Functions").expect("functions");
    let variables = reference.find("## Variables").expect("variables");
    assert!(functions < variables);

    let docs = fs::read_to_string(out.path().join("docs_content.md")).expect("read");
    assert!(docs.contains("# Pine Script V6 Documentation - Complete Content"));
    let welcome = docs.find("## Welcome").expect("welcome section");
    let concepts = docs.find("## Concepts").expect("concepts section");
    assert!(welcome < concepts);
    assert!(docs.contains("Alerts fire when their condition is met."));
    // Boilerplate never reaches the output.
    assert!(!docs.contains("On this page"));
}

#[tokio::test]
async fn content_reuses_a_previously_written_urls_index() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pine-script-docs/welcome/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WELCOME_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pine-script-docs/concepts/alerts/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALERTS_PAGE))
        .mount(&server)
        .await;

    let out = tempdir().expect("tempdir");
    let docs_url = format!("{}/pine-script-docs/welcome/", server.uri());

    pinedocs_cmd()
        .args(["--docs-url", &docs_url, "--delay-ms", "0", "--output-dir"])
        .arg(out.path())
        .args(["urls", "docs"])
        .assert()
        .success();

    let urls = fs::read_to_string(out.path().join("docs_urls.md")).expect("read");
    assert!(urls.contains("# Pine Script V6 Documentation - URL Index"));
    assert!(urls.contains("- [Alerts]("));
    assert!(urls.contains("**Total: 2 items**"));

    // Swap the welcome page for one without the Alerts link: if the content
    // step rebuilt the index instead of reusing docs_urls.md, Alerts would
    // disappear from the output.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/pine-script-docs/welcome/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><main><h1>Welcome</h1><p>Trimmed nav.</p></main></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pine-script-docs/concepts/alerts/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALERTS_PAGE))
        .mount(&server)
        .await;

    pinedocs_cmd()
        .args(["--docs-url", &docs_url, "--delay-ms", "0", "--output-dir"])
        .arg(out.path())
        .args(["content", "docs"])
        .assert()
        .success();

    let docs = fs::read_to_string(out.path().join("docs_content.md")).expect("read");
    assert!(docs.contains("### Alerts"));
    assert!(docs.contains("Alerts fire when their condition is met."));
}

#[tokio::test]
async fn failed_pages_are_reported_but_do_not_abort_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pine-script-docs/welcome/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WELCOME_PAGE))
        .mount(&server)
        .await;
    // Permanent failure: no retries, recorded in the summary.
    Mock::given(method("GET"))
        .and(path("/pine-script-docs/concepts/alerts/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let out = tempdir().expect("tempdir");

    pinedocs_cmd()
        .args([
            "--docs-url",
            &format!("{}/pine-script-docs/welcome/", server.uri()),
            "--delay-ms",
            "0",
            "--output-dir",
        ])
        .arg(out.path())
        .args(["content", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"));

    let docs = fs::read_to_string(out.path().join("docs_content.md")).expect("read");
    assert!(docs.contains("Introduction to Pine Script."));
    assert!(!docs.contains("Alerts fire"));
}

#[test]
fn missing_explicit_config_is_a_hard_error() {
    pinedocs_cmd()
        .args(["--config", "/nonexistent/pinedocs.toml", "urls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config"));
}
