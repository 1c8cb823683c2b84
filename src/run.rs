// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate a run: resolve window, then per repository fetch PRs and commits, filter, render, write
// role: processing/orchestrator
// inputs: EffectiveConfig; an ActivitySource; a writer for the report
// outputs: Markdown on the writer; RunSummary; diagnostics on stderr via tracing
// side_effects: Network/file reads through the source; writes to stdout
// invariants:
// - the window is resolved before any source is built or contacted
// - repositories are processed in argument order, one at a time
// - one EmittedShaRegistry spans the whole run (PR commits and branch commits, all repositories)
// - a repository's text is written only after it was collected completely
// errors: FormatError before any fetch; SourceUnavailable for the first failing repository (run stops)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::time::Instant;

use chrono::NaiveDate;

use crate::cli::{EffectiveConfig, WindowSpec};
use crate::config::SourceSettings;
use crate::error::ActivityError;
use crate::filter::{filter_commits, EmittedShaRegistry};
use crate::model::{PullRequestActivity, PullRequestRecord, RepositoryActivity};
use crate::render::render_activity;
use crate::source::{build_source, ActivitySource};
use crate::util;
use crate::window::{self, DateWindow, ScanPolicy};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
  pub repositories: usize,
  pub with_activity: usize,
  pub pull_requests: usize,
  pub commits: usize,
}

pub struct RunController<'s> {
  source: &'s dyn ActivitySource,
  window: DateWindow,
  today: NaiveDate,
  registry: EmittedShaRegistry,
}

enum PullDecision {
  Include,
  Skip,
  Stop,
}

fn judge_pull(pr: &PullRequestRecord, window: &DateWindow) -> PullDecision {
  if window.contains(&pr.created_at) {
    return PullDecision::Include;
  }
  match window.policy {
    ScanPolicy::StopAtOlder if window.is_before(&pr.created_at) => PullDecision::Stop,
    _ => PullDecision::Skip,
  }
}

impl<'s> RunController<'s> {
  pub fn new(source: &'s dyn ActivitySource, window: DateWindow, today: NaiveDate) -> Self {
    Self {
      source,
      window,
      today,
      registry: EmittedShaRegistry::new(),
    }
  }

  /// Fetch and filter everything for one repository. Nothing is written here.
  pub fn collect_repository(&mut self, name: &str) -> Result<RepositoryActivity, ActivityError> {
    let fail = |e| ActivityError::source_unavailable(name, e);

    let repo = self.source.repository(name).map_err(fail)?;
    let mut activity = RepositoryActivity::new(repo);

    let pr_window = self.window.skipping();
    for pr in self.source.pull_requests(&activity.repository) {
      let pr = pr.map_err(fail)?;

      match judge_pull(&pr, &self.window) {
        PullDecision::Stop => {
          tracing::debug!(number = pr.number, created = %pr.created_at, "older pull request; stopping scan");
          break;
        }
        PullDecision::Skip => {
          tracing::debug!(number = pr.number, created = %pr.created_at, "pull request outside window");
          continue;
        }
        PullDecision::Include => {}
      }

      let listing = self.source.pull_request_commits(&activity.repository, &pr);
      let commits = filter_commits(listing, &pr_window, &mut self.registry)
        .collect::<anyhow::Result<Vec<_>>>()
        .map_err(fail)?;

      tracing::debug!(number = pr.number, commits = commits.len(), "pull request included");
      activity.pull_requests.push(PullRequestActivity {
        pull_request: pr,
        commits,
      });
    }

    let listing = self.source.commits(&activity.repository, &self.window.query());
    activity.commits = filter_commits(listing, &self.window, &mut self.registry)
      .collect::<anyhow::Result<Vec<_>>>()
      .map_err(fail)?;

    Ok(activity)
  }

  /// Process `repos` in order, writing each repository's report as soon as it is complete.
  pub fn run<W: Write>(&mut self, repos: &[String], out: &mut W) -> Result<RunSummary, ActivityError> {
    let mut summary = RunSummary::default();

    for name in repos {
      let activity = self.collect_repository(name)?;
      summary.repositories += 1;

      if activity.is_empty() {
        tracing::info!("{}: Nothing in the provided range...", name);
        continue;
      }

      summary.with_activity += 1;
      summary.pull_requests += activity.pull_requests.len();
      summary.commits += activity.commit_count();

      out.write_all(render_activity(&activity, self.today).as_bytes())?;
      out.flush()?;
    }

    tracing::debug!(emitted = self.registry.len(), "distinct commits emitted");
    Ok(summary)
  }
}

/// Resolve the configured window against `anchor`.
pub fn resolve_window(spec: &WindowSpec, anchor: chrono::DateTime<chrono::Local>) -> Result<DateWindow, ActivityError> {
  let window = match spec {
    WindowSpec::Date { date } => window::resolve_date(date)?,
    WindowSpec::Range { expression } => window::resolve_range(expression, anchor)?,
  };
  Ok(window)
}

pub fn execute(cfg: &EffectiveConfig) -> Result<RunSummary, ActivityError> {
  let anchor = util::effective_now(window::parse_now_override(cfg.now_override.as_deref()));
  let window = resolve_window(&cfg.window, anchor)?;
  tracing::debug!(since = %window.since, until = ?window.until, policy = ?window.policy, "resolved window");

  tracing::info!("Fetching results...");
  let started = Instant::now();

  let settings = SourceSettings::from_env();
  let source = build_source(&settings).map_err(|e| ActivityError::Config(format!("{:#}", e)))?;

  let mut controller = RunController::new(source.as_ref(), window, anchor.date_naive());
  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  let summary = controller.run(&cfg.repos, &mut out)?;

  tracing::debug!(
    repositories = summary.repositories,
    with_activity = summary.with_activity,
    pull_requests = summary.pull_requests,
    commits = summary.commits,
    "run summary"
  );
  tracing::info!("Completed in {}", util::format_elapsed(started.elapsed()));

  Ok(summary)
}
