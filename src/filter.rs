// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decide which commits enter the report: window bounds, merge exclusion, once-per-run de-duplication
// role: filtering/commits
// inputs: A single-pass fallible commit iterator, a DateWindow, the run's EmittedShaRegistry
// outputs: Lazy iterator of accepted commits (source errors passed through)
// side_effects: Inserts every accepted sha into the registry
// invariants:
// - merge commits (parent_count > 1) never pass, in either scan policy
// - a sha is accepted at most once per registry
// - StopAtOlder stops consuming the source at the first commit before `since`; SkipOlder never stops early
// - the source is pulled at most once per item; no second pass over raw input
// errors: Source errors are yielded as-is; filtering itself cannot fail
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;

use crate::model::CommitRecord;
use crate::window::{DateWindow, ScanPolicy};

/// Commit identifiers already rendered during this run.
#[derive(Debug, Default)]
pub struct EmittedShaRegistry {
  seen: HashSet<String>,
}

impl EmittedShaRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, sha: &str) -> bool {
    self.seen.contains(sha)
  }

  /// Returns false when the sha was already present.
  pub fn insert(&mut self, sha: &str) -> bool {
    self.seen.insert(sha.to_string())
  }

  pub fn len(&self) -> usize {
    self.seen.len()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
  Accept,
  Skip(&'static str),
  Stop,
}

fn judge(commit: &CommitRecord, window: &DateWindow, registry: &EmittedShaRegistry) -> Verdict {
  let authored = commit.authored_local();

  if window.is_before(&authored) {
    return match window.policy {
      ScanPolicy::StopAtOlder => Verdict::Stop,
      ScanPolicy::SkipOlder => Verdict::Skip("before window"),
    };
  }
  if window.is_after(&authored) {
    return Verdict::Skip("after window");
  }
  if commit.is_merge() {
    return Verdict::Skip("merge commit");
  }
  if registry.contains(&commit.sha) {
    return Verdict::Skip("already emitted");
  }

  Verdict::Accept
}

/// Iterator adapter returned by [`filter_commits`].
pub struct FilteredCommits<'a, I> {
  source: I,
  window: &'a DateWindow,
  registry: &'a mut EmittedShaRegistry,
  done: bool,
}

impl<I> Iterator for FilteredCommits<'_, I>
where
  I: Iterator<Item = anyhow::Result<CommitRecord>>,
{
  type Item = anyhow::Result<CommitRecord>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    for item in self.source.by_ref() {
      let commit = match item {
        Ok(c) => c,
        Err(e) => return Some(Err(e)),
      };

      match judge(&commit, self.window, &*self.registry) {
        Verdict::Accept => {
          self.registry.insert(&commit.sha);
          tracing::debug!(sha = %commit.sha, "accepted");
          return Some(Ok(commit));
        }
        Verdict::Skip(reason) => {
          tracing::debug!(sha = %commit.sha, authored = %commit.authored_local(), reason, "skipping");
        }
        Verdict::Stop => {
          tracing::debug!(
            sha = %commit.sha,
            authored = %commit.authored_local(),
            since = %self.window.since,
            "older than window; stopping scan"
          );
          self.done = true;
          return None;
        }
      }
    }

    self.done = true;
    None
  }
}

/// Lazily filter `commits` against `window`, recording accepted shas in `registry`.
pub fn filter_commits<'a, I>(
  commits: I,
  window: &'a DateWindow,
  registry: &'a mut EmittedShaRegistry,
) -> FilteredCommits<'a, I::IntoIter>
where
  I: IntoIterator<Item = anyhow::Result<CommitRecord>>,
{
  FilteredCommits {
    source: commits.into_iter(),
    window,
    registry,
    done: false,
  }
}
