//! Integration tests for bookworm-cli
//!
//! These tests verify the CLI commands work end-to-end without a server:
//! everything here either stops at a local gate or never leaves the machine.
//! Each test gets its own config and session files.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the bookworm binary, isolated in `dir`
fn bookworm(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bookworm").unwrap();
    cmd.env("BOOKWORM_CONFIG", dir.path().join("config.json"))
        .env("BOOKWORM_SESSION_PATH", dir.path().join("session.json"))
        .env("BOOKWORM_API_URL", "http://127.0.0.1:9")
        .env_remove("BOOKWORM_API_VERSION")
        .env_remove("BOOKWORM_TIMEOUT_SECS")
        .env_remove("BOOKWORM_PASSWORD");
    cmd
}

fn workspace() -> TempDir {
    TempDir::new().unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
#[serial]
fn test_cli_help() {
    let dir = workspace();
    bookworm(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookworm"))
        .stdout(predicate::str::contains("COMMAND").or(predicate::str::contains("Commands")));
}

#[test]
#[serial]
fn test_cli_version() {
    let dir = workspace();
    bookworm(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookworm"));
}

#[test]
#[serial]
fn test_subcommand_help() {
    let dir = workspace();
    for area in ["auth", "books", "authors", "publishers", "borrowings", "profile", "config"] {
        bookworm(&dir)
            .args([area, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

#[test]
#[serial]
fn test_books_list_help_shows_filters() {
    let dir = workspace();
    bookworm(&dir)
        .args(["books", "list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--search"))
        .stdout(predicate::str::contains("--genre"))
        .stdout(predicate::str::contains("--sort"));
}

#[test]
#[serial]
fn test_invalid_genre_rejected() {
    let dir = workspace();
    bookworm(&dir)
        .args(["books", "list", "--genre", "cyberpunk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown genre"));
}

// =============================================================================
// Session Gate Tests
// =============================================================================

#[test]
#[serial]
fn test_gated_commands_require_login() {
    let dir = workspace();
    let gated: [&[&str]; 5] = [
        &["borrowings", "list"],
        &["dashboard"],
        &["profile", "show"],
        &["authors", "list"],
        &["publishers", "list"],
    ];
    for args in gated {
        bookworm(&dir)
            .args(args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("log in"));
    }
}

#[test]
#[serial]
fn test_change_password_requires_login() {
    let dir = workspace();
    bookworm(&dir)
        .args([
            "auth",
            "change-password",
            "--old-password",
            "Old#Pass1",
            "--new-password",
            "New@Pass1",
            "--confirm-password",
            "New@Pass1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("log in"));
}

#[test]
#[serial]
fn test_borrow_requires_login() {
    let dir = workspace();
    bookworm(&dir)
        .args(["books", "borrow", "1", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please log in to borrow books"));
}

#[test]
#[serial]
fn test_request_action_points_to_borrow() {
    let dir = workspace();
    bookworm(&dir)
        .args(["borrowings", "act", "request", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("books borrow"));
}

// =============================================================================
// Auth Command Tests
// =============================================================================

#[test]
#[serial]
fn test_whoami_signed_out() {
    let dir = workspace();
    bookworm(&dir)
        .args(["auth", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
#[serial]
fn test_logout_signed_out() {
    let dir = workspace();
    bookworm(&dir)
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
#[serial]
fn test_login_rejects_bad_email_before_sending() {
    let dir = workspace();
    bookworm(&dir)
        .args(["auth", "login", "--email", "not-an-email", "--password", "whatever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid email address"));
}

#[test]
#[serial]
fn test_register_rejects_mismatched_passwords() {
    let dir = workspace();
    bookworm(&dir)
        .args([
            "auth",
            "register",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--password",
            "Engine@1843",
            "--confirm-password",
            "Engine@1842",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passwords don't match"));
}

#[test]
#[serial]
fn test_corrupt_session_file_is_discarded() {
    let dir = workspace();
    let session = dir.path().join("session.json");
    std::fs::write(&session, "{ not json").unwrap();

    bookworm(&dir)
        .args(["auth", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
#[serial]
fn test_stored_session_is_restored() {
    let dir = workspace();
    let user = r#"{"userId":7,"userName":"Ada","userRole":"Admin","imageUrl":null,"accessToken":"tok"}"#;
    std::fs::write(
        dir.path().join("session.json"),
        serde_json::json!({ "accessToken": "tok", "user": user }).to_string(),
    )
    .unwrap();

    bookworm(&dir)
        .args(["auth", "whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("Admin"));
}

#[test]
#[serial]
fn test_session_without_token_is_signed_out() {
    let dir = workspace();
    let session = dir.path().join("session.json");
    let user = r#"{"userId":7,"userName":"Ada","userRole":"User","imageUrl":null,"accessToken":"tok"}"#;
    std::fs::write(&session, serde_json::json!({ "user": user }).to_string()).unwrap();

    bookworm(&dir)
        .args(["borrowings", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("log in"));
    assert!(!session.exists(), "half a session should be cleared");
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
#[serial]
fn test_config_show() {
    let dir = workspace();
    bookworm(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_url"))
        .stdout(predicate::str::contains("session_path"))
        .stdout(predicate::str::contains("env (BOOKWORM_API_URL)"));
}

#[test]
#[serial]
fn test_config_show_flag_overrides_env() {
    let dir = workspace();
    bookworm(&dir)
        .args(["--api-url", "https://books.example.org", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://books.example.org"))
        .stdout(predicate::str::contains("flag"));
}

#[test]
#[serial]
fn test_config_show_reads_file() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"api_version": "v2", "timeout_secs": 5}"#,
    )
    .unwrap();

    bookworm(&dir)
        .args(["config", "get", "api_version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_version = v2"));
}

#[test]
#[serial]
fn test_config_show_json() {
    let dir = workspace();
    bookworm(&dir)
        .args(["--format", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\""))
        .stdout(predicate::str::contains("\"source\""));
}

#[test]
#[serial]
fn test_invalid_config_file_fails() {
    let dir = workspace();
    std::fs::write(dir.path().join("config.json"), "timeout = 5").unwrap();

    bookworm(&dir)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
#[serial]
fn test_config_path() {
    let dir = workspace();
    bookworm(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}
