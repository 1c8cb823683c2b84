// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Discover credentials, account name, API base and fixture path from .env / environment / gh CLI
// role: configuration
// inputs: env GIT_PERSONAL_ACCESS_TOKEN, GITHUB_TOKEN, GH_TOKEN, GIT_USERNAME, GITHUB_API_URL, GITACTIVITY2MD_FIXTURE; optional `gh` CLI
// outputs: SourceSettings
// side_effects: Spawns `gh auth token` when no token variable is set
// invariants:
// - token precedence: GIT_PERSONAL_ACCESS_TOKEN > GITHUB_TOKEN > GH_TOKEN > `gh auth token`
// - blank values are treated as absent
// - api_base never ends with '/'
// errors: None; missing values stay None and surface later as source errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const FIXTURE_ENV: &str = "GITACTIVITY2MD_FIXTURE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
  pub token: Option<String>,
  pub account: Option<String>,
  pub api_base: String,
  pub fixture: Option<PathBuf>,
}

impl SourceSettings {
  pub fn from_env() -> Self {
    let api_base = non_blank_env("GITHUB_API_URL")
      .map(|u| u.trim_end_matches('/').to_string())
      .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    Self {
      token: discover_token(),
      account: non_blank_env("GIT_USERNAME"),
      api_base,
      fixture: non_blank_env(FIXTURE_ENV).map(PathBuf::from),
    }
  }
}

/// Load `.env` from the working directory when present.
pub fn load_dotenv() {
  match dotenv::dotenv() {
    Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
    Err(e) if e.not_found() => {}
    Err(e) => tracing::warn!("ignoring unreadable .env: {}", e),
  }
}

fn non_blank_env(key: &str) -> Option<String> {
  std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn discover_token() -> Option<String> {
  for key in ["GIT_PERSONAL_ACCESS_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"] {
    if let Some(t) = non_blank_env(key) {
      return Some(t);
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const VARS: [&str; 6] = [
    "GIT_PERSONAL_ACCESS_TOKEN",
    "GITHUB_TOKEN",
    "GH_TOKEN",
    "GIT_USERNAME",
    "GITHUB_API_URL",
    FIXTURE_ENV,
  ];

  fn clear_env() {
    for k in VARS {
      std::env::remove_var(k);
    }
  }

  #[test]
  #[serial]
  fn token_env_precedence() {
    clear_env();
    std::env::set_var("GIT_PERSONAL_ACCESS_TOKEN", "pat");
    std::env::set_var("GITHUB_TOKEN", "primary-token");
    std::env::set_var("GH_TOKEN", "secondary-token");
    assert_eq!(discover_token().as_deref(), Some("pat"));

    std::env::remove_var("GIT_PERSONAL_ACCESS_TOKEN");
    assert_eq!(discover_token().as_deref(), Some("primary-token"));

    std::env::set_var("GITHUB_TOKEN", "   ");
    assert_eq!(discover_token().as_deref(), Some("secondary-token"));
    clear_env();
  }

  #[cfg(not(target_os = "windows"))]
  #[test]
  #[serial]
  fn token_falls_back_to_gh_cli() {
    use std::os::unix::fs::PermissionsExt;

    clear_env();
    let td = tempfile::TempDir::new().unwrap();
    let gh_path = td.path().join("gh");
    std::fs::write(&gh_path, "#!/bin/sh\necho token-from-gh\n").unwrap();
    let mut perms = std::fs::metadata(&gh_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&gh_path, perms).unwrap();

    let old_path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{}", td.path().display(), old_path));
    assert_eq!(discover_token().as_deref(), Some("token-from-gh"));

    std::fs::write(&gh_path, "#!/bin/sh\necho\n").unwrap();
    assert_eq!(discover_token(), None);

    std::env::set_var("PATH", old_path);
  }

  #[test]
  #[serial]
  fn settings_from_env() {
    clear_env();
    std::env::set_var("GITHUB_TOKEN", "t");
    std::env::set_var("GIT_USERNAME", "octo");
    std::env::set_var("GITHUB_API_URL", "https://ghe.example.com/api/v3/");
    std::env::set_var(FIXTURE_ENV, "/tmp/fixture.json");

    let s = SourceSettings::from_env();
    assert_eq!(s.token.as_deref(), Some("t"));
    assert_eq!(s.account.as_deref(), Some("octo"));
    assert_eq!(s.api_base, "https://ghe.example.com/api/v3");
    assert_eq!(s.fixture, Some(PathBuf::from("/tmp/fixture.json")));

    std::env::remove_var("GITHUB_API_URL");
    std::env::remove_var(FIXTURE_ENV);
    let s = SourceSettings::from_env();
    assert_eq!(s.api_base, DEFAULT_API_BASE);
    assert_eq!(s.fixture, None);
    clear_env();
  }
}
