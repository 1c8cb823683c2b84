// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Read-only projections of remote repository activity consumed by filtering and rendering
// role: model/types
// outputs: RepositoryRecord, PullRequestRecord, CommitRecord, CommitQuery, RepositoryActivity
// invariants: Records are sourced fresh per run and never mutated by the core; instants are stored in UTC
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryRecord {
  /// `owner/name`, used to address the repository on the source.
  pub full_name: String,
  /// Short name shown in the report.
  pub name: String,
  pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestRecord {
  pub number: u64,
  pub title: String,
  pub created_at: DateTime<Utc>,
  pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitRecord {
  pub sha: String,
  pub message: String,
  pub authored_at: DateTime<Utc>,
  pub parent_count: usize,
  pub html_url: String,
}

impl CommitRecord {
  pub fn is_merge(&self) -> bool {
    self.parent_count > 1
  }

  pub fn authored_local(&self) -> DateTime<Local> {
    self.authored_at.with_timezone(&Local)
  }
}

/// Server-side bounds for a default-branch commit listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitQuery {
  pub since: Option<DateTime<Local>>,
  pub until: Option<DateTime<Local>>,
}

/// A pull request together with the commits that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestActivity {
  pub pull_request: PullRequestRecord,
  pub commits: Vec<CommitRecord>,
}

/// Everything rendered for one repository: PR blocks first, then branch commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryActivity {
  pub repository: RepositoryRecord,
  pub pull_requests: Vec<PullRequestActivity>,
  pub commits: Vec<CommitRecord>,
}

impl RepositoryActivity {
  pub fn new(repository: RepositoryRecord) -> Self {
    Self {
      repository,
      pull_requests: Vec::new(),
      commits: Vec::new(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.pull_requests.is_empty() && self.commits.is_empty()
  }

  pub fn commit_count(&self) -> usize {
    self.commits.len() + self.pull_requests.iter().map(|p| p.commits.len()).sum::<usize>()
  }
}
