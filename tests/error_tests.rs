//! Error scenario integration tests

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mic_recorder_bin(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mic-recorder"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("HOME", home)
        .env_remove("MIC_RECORDER_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn unsupported_rate_is_usage_error() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["--rate", "22050"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("22050"));
}

#[test]
fn invalid_byte_order_is_usage_error() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["--byte-order", "middle"])
        .assert()
        .code(2);
}

#[test]
fn invalid_duration_is_usage_error() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["--duration", "invalid"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn zero_duration_is_usage_error() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["--duration", "0s"])
        .assert()
        .code(2);
}

#[test]
fn overflowing_duration_is_usage_error() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["--duration", "307445734561825861m"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn unwritable_output_dir_is_denied() {
    let home = TempDir::new().unwrap();
    let blocker = home.path().join("not-a-dir");
    fs::write(&blocker, b"x").unwrap();

    // Without an input device the microphone check fails first; both
    // outcomes are permission denials.
    mic_recorder_bin(home.path())
        .arg("--output-dir")
        .arg(blocker.join("music"))
        .args(["--duration", "1s"])
        .assert()
        .code(3)
        .stderr(
            predicate::str::contains("Cannot write recordings")
                .or(predicate::str::contains("Microphone access denied")),
        );
    assert!(!blocker.join("music").exists());
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["config", "get", "unknown_key"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn config_set_rate_index_out_of_range() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["config", "set", "sample_rate_index", "9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sample_rate_index"));
}

#[test]
fn config_set_invalid_collision_policy() {
    let home = TempDir::new().unwrap();
    mic_recorder_bin(home.path())
        .args(["config", "set", "on_collision", "append"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("uniquify"));
}

#[cfg(target_os = "linux")]
#[test]
fn malformed_config_file_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("config").join("mic-recorder");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "sample_rate_index = \"fast\"\n").unwrap();

    mic_recorder_bin(home.path())
        .args(["config", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config"));
}
