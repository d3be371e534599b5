mod common;

use assert_cmd::Command;
use common::{sample_store, write_store};
use predicates::str::contains;
use tempfile::tempdir;

fn shell(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").unwrap();
    cmd.env("FINANCE_CORE_CLI_SCRIPT", "1")
        .env("FINANCE_CORE_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_reports_on_a_loaded_ledger() {
    let dir = tempdir().unwrap();
    let path = write_store(dir.path(), &sample_store());
    let input = format!(
        "load {} user-1\ntoday 2026-10-18\nsummary\nbudgets\nvendors 2026-10\nflow thisMonth\nexit\n",
        path.display()
    );

    shell(dir.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Loaded 5 expenses"))
        .stdout(contains("Corner Market"))
        .stdout(contains("pacing ahead"))
        .stdout(contains("Unspent Income"))
        .stdout(contains("Salary"));
}

#[test]
fn script_mode_survives_bad_commands() {
    let dir = tempdir().unwrap();
    shell(dir.path())
        .write_stdin("summary\nsumary\nmonthly extra\nexit\n")
        .assert()
        .success()
        .stdout(contains("no ledger loaded"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn help_lists_report_commands() {
    let dir = tempdir().unwrap();
    shell(dir.path())
        .write_stdin("help\nhelp flow\nexit\n")
        .assert()
        .success()
        .stdout(contains("categories [YYYY-MM]"))
        .stdout(contains("usage: flow [preset | from [to]]"));
}
