use predicates::str::contains;

macro_rules! ccase {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!("ccase")
    };
}

#[test]
fn help_lists_subcommands() {
    ccase!()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("status"))
        .stdout(contains("revert"))
        .stdout(contains("restore"));
}

#[test]
fn missing_subcommand_is_rejected() {
    ccase!().assert().failure().stderr(contains("Usage"));
}

#[test]
fn revert_requires_paths() {
    ccase!()
        .arg("revert")
        .assert()
        .failure()
        .stderr(contains("<PATHS>"));
}

#[test]
fn restore_requires_paths() {
    ccase!()
        .arg("restore")
        .assert()
        .failure()
        .stderr(contains("<PATHS>"));
}

#[test]
fn unknown_start_path_is_reported_with_cause() {
    ccase!()
        .args(["-C", "/definitely/not/a/view", "status"])
        .assert()
        .failure()
        .stderr(contains("error: view error"))
        .stderr(contains("caused by:"));
}
