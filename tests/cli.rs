use assert_cmd::prelude::*;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &Path, api_key: Option<&str>) -> PathBuf {
    let path = dir.join("config.yaml");
    let mut contents = format!(
        "data_dir: {}\nqueue:\n  calls_per_minute: 600\n  inter_call_delay_ms: 0\n  request_timeout_secs: 5\n",
        dir.join("data").display()
    );
    if let Some(key) = api_key {
        contents.push_str(&format!("api_key: {key}\n"));
    }
    fs::write(&path, contents).expect("failed to write config");
    path
}

/// The binary with config, key, host and cache locations pinned to `dir`.
fn tornboard(dir: &Path, config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tornboard"));
    cmd.arg("--config")
        .arg(config)
        .env_remove("TORNBOARD_API_KEY")
        .env_remove("TORNBOARD_API_HOST")
        .env_remove("TORNBOARD_FORMAT")
        .env_remove("RUST_LOG")
        .env("XDG_CACHE_HOME", dir.join("cache"));
    cmd
}

fn json_data(stdout: &[u8]) -> serde_json::Value {
    let value: serde_json::Value = serde_json::from_slice(stdout).expect("stdout is not JSON");
    value["data"].clone()
}

#[test]
fn version_prints_crate_version() {
    Command::new(assert_cmd::cargo::cargo_bin!("tornboard"))
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), Some("test-key"));

    let assert = tornboard(temp.path(), &config_path)
        .env_remove("TORNBOARD_CONFIG")
        .arg("status")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("API key configured"));
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));
    assert!(stdout.contains("600 calls/min"));

    Ok(())
}

/// A missing config file points at `tornboard init`.
#[test]
fn missing_config_shows_helpful_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let nonexistent = temp.path().join("does-not-exist.yaml");

    let assert = tornboard(temp.path(), &nonexistent)
        .arg("player")
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(
        stderr.contains("tornboard init"),
        "Expected error to mention 'tornboard init', got: {}",
        stderr
    );

    Ok(())
}

#[test]
fn config_without_key_is_rejected_before_any_call() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    tornboard(temp.path(), &config_path)
        .arg("player")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not configured"));

    Ok(())
}

#[test]
fn bazaar_rejects_unknown_sort() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), Some("test-key"));

    tornboard(temp.path(), &config_path)
        .args(["bazaar", "--sort", "cheapest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort"));

    Ok(())
}

#[test]
fn bazaar_sellers_import_and_remove() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), Some("test-key"));
    let csv = temp.path().join("traders.csv");
    fs::write(
        &csv,
        "name,player_id,networth\nDuke,1234567,1500000\nAlice,2345678,9876543\nDuke,1234567,1\n",
    )?;

    let assert = tornboard(temp.path(), &config_path)
        .args(["--format", "json", "bazaar", "sellers", "import"])
        .arg(&csv)
        .assert()
        .success();
    let report = json_data(&assert.get_output().stdout);
    assert_eq!(report["added"], serde_json::json!([1234567, 2345678]));

    let assert = tornboard(temp.path(), &config_path)
        .args(["--format", "json", "bazaar", "sellers", "remove", "1234567"])
        .assert()
        .success();
    let report = json_data(&assert.get_output().stdout);
    assert_eq!(report["removed"], 1);
    assert_eq!(report["sellers"], serde_json::json!([2345678]));

    let saved = fs::read_to_string(&config_path)?;
    assert!(saved.contains("2345678"));
    assert!(!saved.contains("1234567"));
    assert!(saved.contains("test-key"));

    Ok(())
}

/// Crawler settings and cursor survive between invocations.
#[test]
fn crawler_config_persists_between_runs() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    let assert = tornboard(temp.path(), &config_path)
        .args(["--format", "json", "crawler", "config"])
        .args(["--range-start", "10", "--range-end", "20", "--batch-size", "5"])
        .assert()
        .success();
    let saved = json_data(&assert.get_output().stdout);
    assert_eq!(saved["range_start"], 10);
    assert_eq!(saved["batch_size"], 5);
    assert_eq!(saved["enabled"], false);

    let assert = tornboard(temp.path(), &config_path)
        .args(["--format", "json", "crawler", "status"])
        .assert()
        .success();
    let status = json_data(&assert.get_output().stdout);
    assert_eq!(status["state"], "idle");
    assert_eq!(status["current_position"], 10);
    assert_eq!(status["total_count"], 11);

    Ok(())
}

#[test]
fn crawler_rejects_inverted_range() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    tornboard(temp.path(), &config_path)
        .args(["crawler", "config", "--range-start", "50", "--range-end", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid crawler configuration"));

    Ok(())
}

#[test]
fn crawler_batch_requires_a_key() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    tornboard(temp.path(), &config_path)
        .args(["crawler", "batch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key available"));

    Ok(())
}

#[test]
fn empty_index_search_returns_no_players() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    let assert = tornboard(temp.path(), &config_path)
        .args(["--format", "json", "crawler", "search", "--name", "duke"])
        .assert()
        .success();
    assert_eq!(json_data(&assert.get_output().stdout), serde_json::json!([]));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn key_check_reports_rejected_key() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _basic = server
        .mock("GET", "/user/")
        .match_query(Matcher::UrlEncoded("selections".into(), "basic".into()))
        .with_status(200)
        .with_body(r#"{"error": {"code": 2, "error": "Incorrect key"}}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), Some("bad-key"));

    let assert = tornboard(temp.path(), &config_path)
        .env("TORNBOARD_API_HOST", server.url())
        .args(["--format", "json", "key", "check"])
        .assert()
        .success();

    let check = json_data(&assert.get_output().stdout);
    assert_eq!(check["status"], "invalid");
    assert_eq!(check["error"], "Incorrect key");
    assert_eq!(check["player_id"], 0);

    Ok(())
}

/// The key given on the command line wins over the config file.
#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn player_uses_command_line_key() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let profile = server
        .mock("GET", "/user/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("selections".into(), "profile,battlestats,bars,money".into()),
            Matcher::UrlEncoded("key".into(), "flag-key".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
                "player_id": 4, "name": "Duke", "level": 100,
                "strength": 10.0, "defense": 20.0, "speed": 30.0, "dexterity": 40.0,
                "life": {"current": 7500, "maximum": 7500},
                "money_onhand": 1250
            }"#,
        )
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), Some("config-key"));

    let assert = tornboard(temp.path(), &config_path)
        .env("TORNBOARD_API_HOST", server.url())
        .args(["--format", "json", "--api-key", "flag-key", "player"])
        .assert()
        .success();

    let player = json_data(&assert.get_output().stdout);
    assert_eq!(player["name"], "Duke");
    assert_eq!(player["battle_stats"]["total"], 100.0);
    assert_eq!(player["money_on_hand"], 1250);
    assert_eq!(player["company_name"], "N/A");
    profile.assert();

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn crawler_batch_indexes_and_skips_missing_players() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _one = server
        .mock("GET", "/user/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"player_id": 1, "name": "Chedburn", "level": 15}"#)
        .create();
    let _two = server
        .mock("GET", "/user/2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"error": {"code": 6, "error": "Incorrect ID"}}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), Some("crawl-key"));

    tornboard(temp.path(), &config_path)
        .args(["crawler", "config", "--range-start", "1", "--range-end", "2"])
        .args(["--batch-size", "2", "--delay-ms", "0"])
        .assert()
        .success();

    let assert = tornboard(temp.path(), &config_path)
        .env("TORNBOARD_API_HOST", server.url())
        .args(["--format", "json", "crawler", "batch"])
        .assert()
        .success();
    let batch = json_data(&assert.get_output().stdout);
    assert_eq!(batch["processed"], 2);
    assert_eq!(batch["indexed"], 1);
    assert_eq!(batch["skipped"], 1);
    assert_eq!(batch["wrapped"], true);

    let assert = tornboard(temp.path(), &config_path)
        .args(["--format", "json", "crawler", "search", "--name", "ched"])
        .assert()
        .success();
    let players = json_data(&assert.get_output().stdout);
    assert_eq!(players[0]["id"], 1);
    assert_eq!(players[0]["level"], 15);

    let assert = tornboard(temp.path(), &config_path)
        .args(["--format", "json", "crawler", "runs"])
        .assert()
        .success();
    let runs = json_data(&assert.get_output().stdout);
    assert_eq!(runs[0]["outcome"], "completed");

    Ok(())
}
