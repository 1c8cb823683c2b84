// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Offline ActivitySource backed by a JSON document (CLI tests, demos, dry runs)
// role: source/fixture
// inputs: JSON file { "repositories": [ { full_name, name?, html_url?, pull_requests[], commits[] } ] }
// outputs: RepositoryRecord and listings in the order written in the document
// side_effects: Reads one file at construction
// invariants:
// - lookup matches full_name exactly, or the short name when no owner is given
// - commit listings apply since/until the way the remote API does; PR listings are returned as written
// errors: Unreadable/invalid file at construction; unknown repository at lookup
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ActivitySource, Listing};
use crate::model::{CommitQuery, CommitRecord, PullRequestRecord, RepositoryRecord};

#[derive(Debug, Deserialize)]
struct FixtureDocument {
  repositories: Vec<FixtureRepository>,
}

#[derive(Debug, Deserialize)]
struct FixtureRepository {
  full_name: String,
  name: Option<String>,
  html_url: Option<String>,
  #[serde(default)]
  pull_requests: Vec<FixturePull>,
  #[serde(default)]
  commits: Vec<CommitRecord>,
}

#[derive(Debug, Deserialize)]
struct FixturePull {
  number: u64,
  title: String,
  created_at: DateTime<Utc>,
  html_url: String,
  #[serde(default)]
  commits: Vec<CommitRecord>,
}

impl FixtureRepository {
  fn record(&self) -> RepositoryRecord {
    let short = self
      .full_name
      .rsplit('/')
      .next()
      .unwrap_or(&self.full_name)
      .to_string();

    RepositoryRecord {
      full_name: self.full_name.clone(),
      name: self.name.clone().unwrap_or(short),
      html_url: self
        .html_url
        .clone()
        .unwrap_or_else(|| format!("https://github.com/{}", self.full_name)),
    }
  }

  fn matches(&self, name: &str) -> bool {
    if name.contains('/') {
      return self.full_name == name;
    }
    self.record().name == name
  }
}

#[derive(Debug)]
pub struct FixtureSource {
  repositories: Vec<FixtureRepository>,
}

impl FixtureSource {
  pub fn from_path(path: &Path) -> Result<Self> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading fixture {}", path.display()))?;
    Self::from_json(&text).with_context(|| format!("parsing fixture {}", path.display()))
  }

  pub fn from_json(text: &str) -> Result<Self> {
    let doc: FixtureDocument = serde_json::from_str(text)?;
    Ok(Self {
      repositories: doc.repositories,
    })
  }

  fn find(&self, full_name: &str) -> Option<&FixtureRepository> {
    self.repositories.iter().find(|r| r.full_name == full_name)
  }
}

fn in_query(commit: &CommitRecord, query: &CommitQuery) -> bool {
  let after_since = query.since.map_or(true, |s| commit.authored_at >= s);
  let before_until = query.until.map_or(true, |u| commit.authored_at <= u);
  after_since && before_until
}

impl ActivitySource for FixtureSource {
  fn repository(&self, name: &str) -> Result<RepositoryRecord> {
    self
      .repositories
      .iter()
      .find(|r| r.matches(name))
      .map(FixtureRepository::record)
      .ok_or_else(|| anyhow!("repository not found: {}", name))
  }

  fn pull_requests<'a>(&'a self, repo: &RepositoryRecord) -> Listing<'a, PullRequestRecord> {
    let pulls = self.find(&repo.full_name).map(|r| r.pull_requests.as_slice()).unwrap_or_default();

    Box::new(pulls.iter().map(|p| {
      Ok(PullRequestRecord {
        number: p.number,
        title: p.title.clone(),
        created_at: p.created_at,
        html_url: p.html_url.clone(),
      })
    }))
  }

  fn pull_request_commits<'a>(&'a self, repo: &RepositoryRecord, pr: &PullRequestRecord) -> Listing<'a, CommitRecord> {
    let commits = self
      .find(&repo.full_name)
      .and_then(|r| r.pull_requests.iter().find(|p| p.number == pr.number))
      .map(|p| p.commits.as_slice())
      .unwrap_or_default();

    Box::new(commits.iter().cloned().map(Ok))
  }

  fn commits<'a>(&'a self, repo: &RepositoryRecord, query: &CommitQuery) -> Listing<'a, CommitRecord> {
    let commits = self.find(&repo.full_name).map(|r| r.commits.as_slice()).unwrap_or_default();
    let query = *query;

    Box::new(commits.iter().filter(move |c| in_query(c, &query)).cloned().map(Ok))
  }
}
