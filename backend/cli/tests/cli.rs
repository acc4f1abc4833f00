use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// A `texplain` invocation isolated from the user's config and keys.
fn cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("texplain").unwrap();
    cmd.env("TEXPLAIN_CONFIG_DIR", config_dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("CEREBRAS_API_KEY")
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("TEXPLAIN_PROVIDER")
        .env_remove("TEXPLAIN_MODEL")
        .env_remove("TEXPLAIN_MAX_TOKENS")
        .env_remove("TEXPLAIN_OCR_BIN")
        .env_remove("TEXPLAIN_BASE_URL");
    cmd
}

/// An image whose path, echoed back, looks like labelled pix2tex output.
fn labelled_image(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("eq: x^2");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();
    path
}

#[test]
fn no_arguments_prints_usage() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path())
        .assert()
        .code(1)
        .stderr(contains("Usage"));
}

#[test]
fn two_images_print_usage() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path())
        .args(["a.png", "b.png"])
        .assert()
        .code(1)
        .stderr(contains("Usage"));
}

#[test]
fn help_exits_zero() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--latex-only"));
}

#[test]
fn missing_image_fails() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path())
        .arg(dir.path().join("nope.png"))
        .assert()
        .code(1)
        .stderr(contains("image not found"));
}

#[test]
fn missing_api_key_fails_before_ocr() {
    let dir = TempDir::new().unwrap();
    let image = labelled_image(&dir);
    cmd(dir.path())
        .args(["--ocr-bin", "texplain-no-such-ocr-tool"])
        .arg(&image)
        .assert()
        .code(1)
        .stderr(contains("CEREBRAS_API_KEY"))
        .stdout(contains("Converting").not());
}

#[test]
fn print_config_masks_key() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "llm:\n  api_key: ${CEREBRAS_API_KEY}\n  max_tokens: 256\n",
    )
    .unwrap();

    cmd(dir.path())
        .env("CEREBRAS_API_KEY", "csk-abcdefghijklmnopqrstuv")
        .arg("--print-config")
        .assert()
        .success()
        .stdout(contains("max_tokens: 256"))
        .stdout(contains("qwen-3-235b-a22b-instruct-2507"))
        .stdout(contains("csk-abcdefghijklmnopqrstuv").not());
}

#[test]
fn print_config_takes_precedence_over_image() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path())
        .arg(dir.path().join("never-read.png"))
        .arg("--print-config")
        .assert()
        .success()
        .stdout(contains("model: qwen-3-235b-a22b-instruct-2507"))
        .stdout(contains("Converting").not());
}

#[test]
fn print_config_shows_env_key_masked() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path())
        .env("CEREBRAS_API_KEY", "csk-abcdefghijklmnopqrstuv")
        .arg("--print-config")
        .assert()
        .success()
        .stdout(contains("csk-***"))
        .stdout(contains("api_key: null").not())
        .stdout(contains("csk-abcdefghijklmnopqrstuv").not());
}

#[test]
fn rejected_env_overrides_are_reported() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path())
        .env("TEXPLAIN_PROVIDER", "gpt4")
        .env("TEXPLAIN_MAX_TOKENS", "abc")
        .arg("--print-config")
        .assert()
        .success()
        .stdout(contains("provider: cerebras"))
        .stdout(contains("max_tokens: 500"))
        .stderr(contains("TEXPLAIN_PROVIDER"))
        .stderr(contains("TEXPLAIN_MAX_TOKENS"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.yaml"), "llm:\n  max_tokens: 0\n").unwrap();

    cmd(dir.path())
        .arg("--print-config")
        .assert()
        .code(1)
        .stderr(contains("llm.max_tokens"));
}

#[cfg(unix)]
#[test]
fn ocr_failure_exits_one_without_request() {
    let dir = TempDir::new().unwrap();
    let image = labelled_image(&dir);
    cmd(dir.path())
        .env("CEREBRAS_API_KEY", "csk-test")
        // Nothing listens here; a request would fail with a different message.
        .env("TEXPLAIN_BASE_URL", "http://127.0.0.1:9/v1")
        .args(["--ocr-bin", "false"])
        .arg(&image)
        .assert()
        .code(1)
        .stderr(contains("Error converting image to LaTeX"))
        .stdout(contains("Asking").not());
}

#[cfg(unix)]
#[test]
fn latex_only_prints_markup() {
    let dir = TempDir::new().unwrap();
    let image = labelled_image(&dir);
    cmd(dir.path())
        .args(["--ocr-bin", "echo", "--latex-only"])
        .arg(&image)
        .assert()
        .success()
        .stdout(contains("📄 LaTeX Output:\n\nx^2\n"))
        .stdout(contains("Explanation").not());
}

#[cfg(unix)]
#[test]
fn latex_only_json() {
    let dir = TempDir::new().unwrap();
    let image = labelled_image(&dir);
    let output = cmd(dir.path())
        .args(["--ocr-bin", "echo", "--latex-only", "--json"])
        .arg(&image)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["latex"], "x^2");
    assert!(value["explanation"].is_null());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn explains_against_local_endpoint() {
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    let app = Router::new().route(
        "/v1/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or("").to_string();
            let content = if prompt == "Explain this equation to me:\n\nx^2" {
                "This is a quadratic term."
            } else {
                "unexpected prompt"
            };
            Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dir = TempDir::new().unwrap();
    let image = labelled_image(&dir);
    let mut command = cmd(dir.path());
    command
        .env("CEREBRAS_API_KEY", "csk-test")
        .env("TEXPLAIN_BASE_URL", format!("http://{addr}/v1"))
        .args(["--ocr-bin", "echo"])
        .arg(&image);

    let output = tokio::task::spawn_blocking(move || command.output().unwrap())
        .await
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("🤖 Asking Cerebras for an explanation..."));
    assert!(stdout.ends_with("🤖 Explanation:\n\nThis is a quadratic term.\n"));
}
