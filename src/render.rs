// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render filtered pull requests and commits as a nested markdown bullet list
// role: rendering/markdown
// inputs: RepositoryActivity (already filtered), the anchor's local date
// outputs: Markdown text; None/empty when there is nothing to show
// invariants:
// - commit line: "- <message> [↗](<url>)" plus " • YYYY-MM-DD" only when authored before `today` (local)
// - messages are verbatim; a nested block is trimmed and every line is prefixed with one tab
// - PR blocks precede the repository commit block; input order is preserved
// errors: None; rendering is infallible
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;

use crate::model::{CommitRecord, PullRequestRecord, RepositoryActivity, RepositoryRecord};

const LINK_MARKER: &str = "↗";
const DATE_SEPARATOR: &str = "•";

pub fn render_commit(commit: &CommitRecord, today: NaiveDate) -> String {
  let authored = commit.authored_local();
  let mut line = format!("- {} [{}]({})", commit.message, LINK_MARKER, commit.html_url);

  if authored.date_naive() < today {
    line.push_str(&format!(" {} {}", DATE_SEPARATOR, authored.format("%Y-%m-%d")));
  }

  line
}

/// Prefix every line of the trimmed block with a tab.
pub fn indent_block(block: &str) -> String {
  block
    .trim()
    .split('\n')
    .map(|line| format!("\t{}", line))
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_commit_block(commits: &[CommitRecord], today: NaiveDate) -> Option<String> {
  if commits.is_empty() {
    return None;
  }

  let lines: Vec<String> = commits.iter().map(|c| render_commit(c, today)).collect();
  Some(indent_block(&lines.join("\n")))
}

pub fn render_pull_request_header(repo_name: &str, pr: &PullRequestRecord) -> String {
  format!("- {} // [{}]({})", repo_name, pr.title, pr.html_url)
}

pub fn render_pull_request(
  repo_name: &str,
  pr: &PullRequestRecord,
  commits: &[CommitRecord],
  today: NaiveDate,
) -> String {
  let header = render_pull_request_header(repo_name, pr);

  match render_commit_block(commits, today) {
    Some(block) => format!("{}\n{}", header, block),
    None => header,
  }
}

/// Repository-level commit block; absent when nothing survived filtering.
pub fn render_repository_block(repo: &RepositoryRecord, commits: &[CommitRecord], today: NaiveDate) -> Option<String> {
  let block = render_commit_block(commits, today)?;
  Some(format!("- [{}]({})\n{}", repo.name, repo.html_url, block))
}

/// Full text for one repository, newline-terminated; empty when there is no activity.
pub fn render_activity(activity: &RepositoryActivity, today: NaiveDate) -> String {
  let mut out = String::new();
  let repo = &activity.repository;

  for pr in &activity.pull_requests {
    out.push_str(&render_pull_request(&repo.name, &pr.pull_request, &pr.commits, today));
    out.push('\n');
  }

  if let Some(block) = render_repository_block(repo, &activity.commits, today) {
    out.push_str(&block);
    out.push('\n');
  }

  out
}
