use assert_cmd::Command;

fn shelf() -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_ENV", "local")
        .env("SHELF_CONFIG_DIR", env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn help_lists_subcommands() {
    let stdout = stdout_of(shelf().arg("--help"));
    for subcommand in ["serve", "migrate", "config"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in:\n{stdout}");
    }
}

#[test]
fn config_prints_resolved_settings() {
    let stdout = stdout_of(shelf().arg("config").env("SHELF_SERVER__PORT", "9191"));
    let settings: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(settings["environment"], "local");
    assert_eq!(settings["server"]["port"], 9191);
    assert_eq!(settings["database"]["url"], "sqlite://shelf.db?mode=rwc");
}

#[test]
fn unknown_environment_fails() {
    let output = shelf()
        .arg("config")
        .env("SHELF_ENV", "qa")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&output).contains("unsupported environment"));
}

#[test]
fn migrate_against_in_memory_database_succeeds() {
    shelf()
        .arg("migrate")
        .env("SHELF_DATABASE__URL", "sqlite::memory:")
        .assert()
        .success();
}
