use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("statline").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("statline"));
}

#[test]
fn eurostat_subcommand_shows_help() {
    let mut cmd = Command::cargo_bin("statline").unwrap();
    cmd.args(["eurostat", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--geo"));
}

#[test]
fn cso_rejects_malformed_rename() {
    let mut cmd = Command::cargo_bin("statline").unwrap();
    cmd.args(["cso", "--dataset", "NDQ01", "--rename", "nodash"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("SRC=DST"));
}

// Live tests (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_olive_oil() {
    let mut cmd = Command::cargo_bin("statline").unwrap();
    cmd.args([
        "eurostat",
        "--dataset",
        "tag00070",
        "--geo",
        "IE,DK,NL",
        "--stats",
    ]);
    cmd.assert().success();
}
