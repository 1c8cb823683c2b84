// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Seam between the run and wherever repository activity comes from (GitHub REST, JSON fixtures)
// role: source/trait
// inputs: SourceSettings (token, account, api base, optional fixture path)
// outputs: Boxed ActivitySource; lazy fallible listings of PRs and commits
// invariants:
// - listings are single-pass and lazy: items are fetched only as the consumer pulls them
// - pull requests are listed newest-first by creation time
// - the source is read-only; nothing here mutates remote state
// errors: anyhow errors with request/file context; callers classify them as SourceUnavailable
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod fixture;
pub mod github;

use anyhow::Result;

use crate::config::SourceSettings;
use crate::model::{CommitQuery, CommitRecord, PullRequestRecord, RepositoryRecord};

/// A lazy, single-pass, fallible listing.
pub type Listing<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

pub trait ActivitySource {
  /// Look up a repository by `name` (resolved against the configured account) or `owner/name`.
  fn repository(&self, name: &str) -> Result<RepositoryRecord>;

  /// All pull requests, any state, newest-first by creation time.
  fn pull_requests<'a>(&'a self, repo: &RepositoryRecord) -> Listing<'a, PullRequestRecord>;

  /// Commits of one pull request, in the order the source reports them.
  fn pull_request_commits<'a>(&'a self, repo: &RepositoryRecord, pr: &PullRequestRecord) -> Listing<'a, CommitRecord>;

  /// Default-branch commits, newest-first, bounded server-side by `query`.
  fn commits<'a>(&'a self, repo: &RepositoryRecord, query: &CommitQuery) -> Listing<'a, CommitRecord>;
}

/// Pick the fixture source when one is configured, otherwise GitHub.
pub fn build_source(settings: &SourceSettings) -> Result<Box<dyn ActivitySource>> {
  if let Some(path) = &settings.fixture {
    tracing::debug!(path = %path.display(), "using fixture source");
    return Ok(Box::new(fixture::FixtureSource::from_path(path)?));
  }

  tracing::debug!(
    api = %settings.api_base,
    authenticated = settings.token.is_some(),
    account = settings.account.as_deref().unwrap_or("-"),
    "using GitHub source"
  );
  Ok(Box::new(github::GithubSource::new(settings)))
}
