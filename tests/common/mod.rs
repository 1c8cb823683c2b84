use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub const NOW: &str = "2025-08-15T12:00:00Z";

#[allow(dead_code)]
pub fn commit(sha: &str, message: &str, authored_at: &str, parents: usize) -> serde_json::Value {
  serde_json::json!({
    "sha": sha,
    "message": message,
    "authored_at": authored_at,
    "parent_count": parents,
    "html_url": format!("https://github.com/octo/widgets/commit/{}", sha),
  })
}

/// Two repositories: `octo/widgets` with one PR and branch commits around 2025-08-15,
/// and `octo/quiet` with nothing in it.
#[allow(dead_code)]
pub fn write_fixture(dir: &Path) -> PathBuf {
  let doc = serde_json::json!({
    "repositories": [
      {
        "full_name": "octo/widgets",
        "pull_requests": [
          {
            "number": 7,
            "title": "Add knobs",
            "created_at": "2025-08-15T08:00:00Z",
            "html_url": "https://github.com/octo/widgets/pull/7",
            "commits": [
              commit("p0", "prep", "2025-08-14T18:00:00Z", 1),
              commit("p1", "add knob\n\nwith a body line", "2025-08-15T09:00:00Z", 1)
            ]
          },
          {
            "number": 5,
            "title": "Old work",
            "created_at": "2023-10-07T08:00:00Z",
            "html_url": "https://github.com/octo/widgets/pull/5",
            "commits": [
              commit("q1", "late night", "2023-10-06T23:59:00Z", 1),
              commit("q2", "midday", "2023-10-07T12:00:00Z", 1),
              commit("q3", "after midnight", "2023-10-08T00:30:00Z", 1)
            ]
          }
        ],
        "commits": [
          commit("m1", "Merge pull request #7", "2025-08-15T10:30:00Z", 2),
          commit("p1", "add knob\n\nwith a body line", "2025-08-15T09:00:00Z", 1),
          commit("c1", "fix typo", "2025-08-15T07:00:00Z", 1),
          commit("c0", "yesterday's work", "2025-08-14T11:00:00Z", 1),
          commit("b3", "after midnight", "2023-10-08T00:30:00Z", 1),
          commit("b2", "midday", "2023-10-07T12:00:00Z", 1),
          commit("b1", "late night", "2023-10-06T23:59:00Z", 1)
        ]
      },
      { "full_name": "octo/quiet" }
    ]
  });

  let path = dir.join("fixture.json");
  std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
  path
}

/// The binary pinned to UTC, a fixed "now" and a fixture source, run from `dir`.
#[allow(dead_code)]
pub fn cmd(dir: &Path, fixture: &Path) -> Command {
  let mut cmd = Command::cargo_bin("gitactivity2md").unwrap();
  cmd
    .current_dir(dir)
    .env("TZ", "UTC")
    .env("GITACTIVITY2MD_FIXTURE", fixture)
    .env("GH_TOKEN", "test-token")
    .env_remove("RUST_LOG")
    .args(["--now-override", NOW]);
  cmd
}
