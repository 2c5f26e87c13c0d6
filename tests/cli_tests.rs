//! CLI Integration Tests for Toolbelt
//!
//! Runs the built binary with an isolated working directory and environment so
//! no real credentials or `.env` files leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use toolbelt::CredentialKey;

/// `toolbelt` in an empty temp dir with every credential variable removed
fn toolbelt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("toolbelt").unwrap();
    cmd.current_dir(dir.path()).arg("--no-color");
    for key in CredentialKey::ALL {
        cmd.env_remove(key.env_var());
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    toolbelt(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("call"))
        .stdout(predicate::str::contains("setup"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    toolbelt(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("toolbelt"));
}

// =============================================================================
// list / info
// =============================================================================

#[test]
fn test_list_without_credentials_shows_keyless_tools() {
    let dir = TempDir::new().unwrap();
    toolbelt(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("get_fear_greed_index"))
        .stdout(predicate::str::contains("yields_get_top_pools"))
        .stdout(predicate::str::contains("coingecko_get_price").not());
}

#[test]
fn test_list_with_credentials_from_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("toolbelt.toml"),
        "[credentials]\ncoingecko_api_key = \"CG-test\"\n",
    )
    .unwrap();

    toolbelt(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("coingecko_get_price"));
}

#[test]
fn test_info_prints_definition_json() {
    let dir = TempDir::new().unwrap();
    let output = toolbelt(&dir)
        .args(["info", "get_swap_quote"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let definition: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(definition["name"], "get_swap_quote");
    assert_eq!(definition["parameters"]["type"], "object");
    assert!(definition["supportedChains"].is_array());
}

#[test]
fn test_info_unknown_tool_fails() {
    let dir = TempDir::new().unwrap();
    let output = toolbelt(&dir)
        .args(["info", "no_such_tool"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown tool 'no_such_tool'"));
    assert!(serde_json::from_slice::<serde_json::Value>(&output.stdout).is_err());
}

// =============================================================================
// call
// =============================================================================

#[test]
fn test_call_offline_tool() {
    let dir = TempDir::new().unwrap();
    let output = toolbelt(&dir)
        .args(["call", "get_supported_chains"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(result["chains"].as_array().unwrap().len() >= 10);
}

#[test]
fn test_call_with_malformed_args() {
    let dir = TempDir::new().unwrap();
    toolbelt(&dir)
        .args(["call", "get_fear_greed_index", "--args", "{limit: 3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_call_with_invalid_args() {
    let dir = TempDir::new().unwrap();
    toolbelt(&dir)
        .args(["call", "get_fear_greed_index", "--args", r#"{"limit": 0}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit"));
}

// =============================================================================
// setup
// =============================================================================

#[test]
fn test_setup_reports_on_stderr() {
    let dir = TempDir::new().unwrap();
    toolbelt(&dir)
        .arg("setup")
        .env("PINATA_JWT", "jwt-from-env")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("PINATA_JWT"))
        .stderr(predicate::str::contains("set (env)"))
        .stderr(predicate::str::contains("COINGECKO_API_KEY"))
        .stderr(predicate::str::contains("not set"))
        .stderr(predicate::str::contains("Pinata JWT (IPFS pinning)"))
        .stderr(predicate::str::contains("jwt-from-env").not());
}

#[test]
fn test_setup_reports_file_source() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("custom.toml"),
        "chains = [8453]\n\n[credentials]\nfireworks_api_key = \"fw\"\n",
    )
    .unwrap();

    toolbelt(&dir)
        .args(["setup", "--config", "custom.toml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("set (file (custom.toml))"))
        .stderr(predicate::str::contains("Base (8453)"));
}

#[test]
fn test_malformed_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("toolbelt.toml"), "chains = [1,").unwrap();

    toolbelt(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
