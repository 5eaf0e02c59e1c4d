use std::{fs, path::Path, process::Command};

fn level_path() -> &'static Path {
    Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../levels/graveyard.toml"
    ))
}

fn survivor() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_survivor"));
    let _ = command.env("RUST_LOG", "warn").arg("--level").arg(level_path());
    command
}

#[test]
fn passing_the_level_stores_chest_coins() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let coins = dir.path().join("coins.json");
    fs::write(&coins, r#"{ "coins": 7 }"#).expect("seed coin file");

    let output = survivor()
        .args(["--fps", "30", "--coins-per-chest", "2"])
        .arg("--coin-file")
        .arg(&coins)
        .output()
        .expect("failed to run survivor binary");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("level passed"), "{stdout}");

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&coins).expect("coin file written"))
            .expect("coin file is json");
    // Fourteen chests at two coins each on top of the seeded seven.
    assert_eq!(stored["coins"], 35);
}

#[test]
fn scripted_death_fails_the_level() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let coins = dir.path().join("coins.json");

    let output = survivor()
        .args(["--die-at", "30"])
        .arg("--coin-file")
        .arg(&coins)
        .output()
        .expect("failed to run survivor binary");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("level failed"), "{stdout}");
    assert!(coins.exists(), "coins persist on a loss too");
}

#[test]
fn missing_level_file_fails() {
    let dir = tempfile::tempdir().expect("temporary directory");

    let output = Command::new(env!("CARGO_BIN_EXE_survivor"))
        .arg("--level")
        .arg(dir.path().join("nowhere.toml"))
        .arg("--coin-file")
        .arg(dir.path().join("coins.json"))
        .output()
        .expect("failed to run survivor binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nowhere.toml"), "{stderr}");
}
