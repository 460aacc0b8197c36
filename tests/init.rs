use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_smellscope"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "smellscope init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".smellscope.toml");
    assert!(config_path.exists(), ".smellscope.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[diff]"));
    assert!(content.contains("[context]"));

    // Verify it's valid TOML that smellscope-core can parse
    let _config: smellscope_core::SmellscopeConfig = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".smellscope.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_smellscope"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success(), "init should refuse to overwrite");

    let content = std::fs::read_to_string(dir.path().join(".smellscope.toml")).unwrap();
    assert_eq!(content, "# existing");
}
