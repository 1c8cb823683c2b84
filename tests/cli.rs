use assert_cmd::Command;
use predicates::prelude::*;

mod common;

#[test]
fn errors_when_no_window_selected() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  common::cmd(td.path(), &fixture)
    .args(["--repos", "octo/widgets"])
    .assert()
    .code(22)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("--date or --range argument is required"))
    .stderr(predicate::str::contains("Usage"));
}

#[test]
fn errors_when_no_repos_given() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  common::cmd(td.path(), &fixture)
    .args(["--range", "today"])
    .assert()
    .code(22)
    .stderr(predicate::str::contains("--repo or --repos argument is required"));
}

#[test]
fn unknown_flag_is_invalid_argument() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  common::cmd(td.path(), &fixture)
    .args(["--range", "today", "--repos", "octo/widgets", "--bogus"])
    .assert()
    .code(22);
}

#[test]
fn malformed_range_fails_before_touching_the_source() {
  let td = tempfile::TempDir::new().unwrap();
  // never created: reading it would be a fault (exit 1), not EINVAL
  let missing = td.path().join("missing.json");
  common::cmd(td.path(), &missing)
    .args(["--range", "3 fortnights", "--repos", "octo/widgets"])
    .assert()
    .code(22)
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("Invalid date range: 3 fortnights"))
    .stderr(predicate::str::contains("Usage"))
    .stderr(predicate::str::contains("Fetching results").not());
}

#[test]
fn malformed_date_is_invalid_argument() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  common::cmd(td.path(), &fixture)
    .args(["--date", "2023-13-45", "--repos", "octo/widgets"])
    .assert()
    .code(22)
    .stderr(predicate::str::contains("Invalid date range: 2023-13-45"))
    .stderr(predicate::str::contains("Usage"));
}

#[test]
fn today_renders_prs_then_branch_commits() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  let out = common::cmd(td.path(), &fixture)
    .args(["--range", "today", "--repos", "octo/widgets"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let stdout = String::from_utf8(out.stdout).unwrap();
  assert_eq!(
    stdout,
    "- widgets // [Add knobs](https://github.com/octo/widgets/pull/7)\n\
     \t- add knob\n\
     \t\n\
     \twith a body line [↗](https://github.com/octo/widgets/commit/p1)\n\
     - [widgets](https://github.com/octo/widgets)\n\
     \t- fix typo [↗](https://github.com/octo/widgets/commit/c1)\n"
  );

  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Fetching results..."));
  assert!(stderr.contains("Completed in"));
}

#[test]
fn shared_commit_is_rendered_once() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  let out = common::cmd(td.path(), &fixture)
    .args(["--range", "1 day ago", "--repo", "octo/widgets"])
    .output()
    .unwrap();

  assert!(out.status.success());
  let stdout = String::from_utf8(out.stdout).unwrap();
  assert_eq!(stdout.matches("/commit/p1)").count(), 1);
  assert!(!stdout.contains("Merge pull request"));
  assert!(stdout.contains("\t- prep [↗](https://github.com/octo/widgets/commit/p0) • 2025-08-14\n"));
  assert!(stdout.contains("\t- yesterday's work [↗](https://github.com/octo/widgets/commit/c0) • 2025-08-14\n"));
}

#[test]
fn absolute_date_keeps_only_that_day() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  common::cmd(td.path(), &fixture)
    .args(["--date", "2023-10-07", "--repos", "octo/widgets"])
    .assert()
    .success()
    .stdout(
      "- widgets // [Old work](https://github.com/octo/widgets/pull/5)\n\
       \t- midday [↗](https://github.com/octo/widgets/commit/q2) • 2023-10-07\n\
       - [widgets](https://github.com/octo/widgets)\n\
       \t- midday [↗](https://github.com/octo/widgets/commit/b2) • 2023-10-07\n",
    );
}

#[test]
fn empty_repository_is_not_an_error() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  common::cmd(td.path(), &fixture)
    .args(["--range", "today", "--repos", "octo/quiet"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("octo/quiet: Nothing in the provided range..."));
}

#[test]
fn unknown_repository_is_a_fault_after_earlier_output() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  common::cmd(td.path(), &fixture)
    .args(["--range", "today", "--repos", "octo/widgets", "octo/nope"])
    .assert()
    .code(1)
    .stdout(predicate::str::contains("fix typo"))
    .stderr(predicate::str::contains("octo/nope"))
    .stderr(predicate::str::contains("repository not found"));
}

#[test]
fn debug_only_changes_stderr() {
  let td = tempfile::TempDir::new().unwrap();
  let fixture = common::write_fixture(td.path());
  let plain = common::cmd(td.path(), &fixture)
    .args(["--range", "1 week", "--repos", "octo/widgets", "octo/quiet"])
    .output()
    .unwrap();
  let debug = common::cmd(td.path(), &fixture)
    .args(["--range", "1 week", "--repos", "octo/widgets", "octo/quiet", "--debug"])
    .output()
    .unwrap();

  assert!(plain.status.success());
  assert!(debug.status.success());
  assert_eq!(plain.stdout, debug.stdout);

  let stderr = String::from_utf8_lossy(&debug.stderr);
  assert!(stderr.contains("resolved window"));
  assert!(stderr.contains("merge commit"));
  assert!(stderr.contains("run summary"));
  assert!(!String::from_utf8_lossy(&plain.stderr).contains("run summary"));
}

#[test]
fn cli_generates_man_page() {
  let mut cmd = Command::cargo_bin("gitactivity2md").unwrap();
  let out = cmd.args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  assert!(s.contains(".TH"));
  assert!(s.contains("gitactivity2md"));
}
