// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub REST implementation of ActivitySource with lazy Link-header pagination
// role: source/github
// inputs: SourceSettings (api base, optional token, optional account name)
// outputs: RepositoryRecord, paged PullRequestRecord / CommitRecord listings
// side_effects: Network calls to the configured GitHub API base
// invariants:
// - a page is requested only when the consumer has drained the previous one
// - after a failed page the listing ends (the error is yielded once)
// - pulls are requested with state=all, sort=created, direction=desc
// - commit listings forward since/until as RFC3339 UTC
// errors: Request failures carry the URL; non-2xx statuses are errors; no retries
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

use super::{ActivitySource, Listing};
use crate::config::SourceSettings;
use crate::model::{CommitQuery, CommitRecord, PullRequestRecord, RepositoryRecord};

const PER_PAGE: u32 = 100;
const USER_AGENT: &str = "gitactivity2md";

#[derive(Debug, Deserialize)]
struct ApiRepository {
  name: String,
  full_name: String,
  html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiPull {
  number: u64,
  title: String,
  created_at: DateTime<Utc>,
  html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiSignature {
  date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
  message: String,
  author: Option<ApiSignature>,
  committer: Option<ApiSignature>,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
  sha: String,
  html_url: String,
  commit: ApiCommitDetail,
  #[serde(default)]
  parents: Vec<IgnoredAny>,
}

impl From<ApiRepository> for RepositoryRecord {
  fn from(r: ApiRepository) -> Self {
    RepositoryRecord {
      full_name: r.full_name,
      name: r.name,
      html_url: r.html_url,
    }
  }
}

fn pull_record(p: ApiPull) -> Result<PullRequestRecord> {
  Ok(PullRequestRecord {
    number: p.number,
    title: p.title,
    created_at: p.created_at,
    html_url: p.html_url,
  })
}

fn commit_record(c: ApiCommit) -> Result<CommitRecord> {
  let signed = |s: &Option<ApiSignature>| s.as_ref().and_then(|s| s.date);
  let authored_at = signed(&c.commit.author)
    .or_else(|| signed(&c.commit.committer))
    .ok_or_else(|| anyhow!("commit {} has no author date", c.sha))?;

  Ok(CommitRecord {
    parent_count: c.parents.len(),
    sha: c.sha,
    message: c.commit.message,
    authored_at,
    html_url: c.html_url,
  })
}

/// Extract the `rel="next"` target from a GitHub `Link` header.
fn next_link(header: &str) -> Option<String> {
  static RE_NEXT: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).unwrap());

  RE_NEXT
    .captures(header)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_string())
}

fn rfc3339(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub struct GithubSource {
  agent: ureq::Agent,
  api_base: String,
  token: Option<String>,
  account: Option<String>,
}

impl GithubSource {
  pub fn new(settings: &SourceSettings) -> Self {
    Self {
      agent: ureq::AgentBuilder::new().build(),
      api_base: settings.api_base.clone(),
      token: settings.token.clone(),
      account: settings.account.clone(),
    }
  }

  fn full_name(&self, name: &str) -> Result<String> {
    if name.contains('/') {
      return Ok(name.to_string());
    }

    let account = self
      .account
      .as_deref()
      .ok_or_else(|| anyhow!("no account name configured for '{}' (set GIT_USERNAME or pass owner/name)", name))?;

    Ok(format!("{}/{}", account, name))
  }

  fn get(&self, url: &str) -> Result<ureq::Response> {
    tracing::debug!(%url, "GET");
    let mut req = self
      .agent
      .get(url)
      .set("Accept", "application/vnd.github+json")
      .set("X-GitHub-Api-Version", "2022-11-28")
      .set("User-Agent", USER_AGENT);

    if let Some(token) = &self.token {
      req = req.set("Authorization", &format!("Bearer {}", token));
    }

    req.call().with_context(|| format!("GET {}", url))
  }

  fn get_page<D: DeserializeOwned>(&self, url: &str) -> Result<(Vec<D>, Option<String>)> {
    let resp = self.get(url)?;
    let next = resp.header("link").and_then(next_link);
    let items: Vec<D> = resp
      .into_json()
      .with_context(|| format!("decoding response from {}", url))?;

    Ok((items, next))
  }

  fn paged<'a, D, T>(&'a self, first_url: String, convert: fn(D) -> Result<T>) -> Listing<'a, T>
  where
    D: DeserializeOwned + 'a,
    T: 'a,
  {
    Box::new(Pages {
      source: self,
      next_url: Some(first_url),
      buffered: Vec::new().into_iter(),
      convert,
    })
  }
}

/// Lazily walks `rel="next"` links, one page per drained buffer.
struct Pages<'a, D, T> {
  source: &'a GithubSource,
  next_url: Option<String>,
  buffered: std::vec::IntoIter<D>,
  convert: fn(D) -> Result<T>,
}

impl<D: DeserializeOwned, T> Iterator for Pages<'_, D, T> {
  type Item = Result<T>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some(raw) = self.buffered.next() {
        return Some((self.convert)(raw));
      }

      let url = self.next_url.take()?;

      match self.source.get_page::<D>(&url) {
        Ok((items, next)) => {
          self.buffered = items.into_iter();
          self.next_url = next;
        }
        Err(e) => return Some(Err(e)),
      }
    }
  }
}

impl ActivitySource for GithubSource {
  fn repository(&self, name: &str) -> Result<RepositoryRecord> {
    let full_name = self.full_name(name)?;
    let url = format!("{}/repos/{}", self.api_base, full_name);
    let repo: ApiRepository = self
      .get(&url)?
      .into_json()
      .with_context(|| format!("decoding repository {}", full_name))?;

    Ok(repo.into())
  }

  fn pull_requests<'a>(&'a self, repo: &RepositoryRecord) -> Listing<'a, PullRequestRecord> {
    let url = format!(
      "{}/repos/{}/pulls?state=all&sort=created&direction=desc&per_page={}",
      self.api_base, repo.full_name, PER_PAGE
    );
    self.paged::<ApiPull, _>(url, pull_record)
  }

  fn pull_request_commits<'a>(&'a self, repo: &RepositoryRecord, pr: &PullRequestRecord) -> Listing<'a, CommitRecord> {
    let url = format!(
      "{}/repos/{}/pulls/{}/commits?per_page={}",
      self.api_base, repo.full_name, pr.number, PER_PAGE
    );
    self.paged::<ApiCommit, _>(url, commit_record)
  }

  fn commits<'a>(&'a self, repo: &RepositoryRecord, query: &CommitQuery) -> Listing<'a, CommitRecord> {
    let mut url = format!("{}/repos/{}/commits?per_page={}", self.api_base, repo.full_name, PER_PAGE);

    if let Some(since) = query.since {
      url.push_str(&format!("&since={}", rfc3339(since.with_timezone(&Utc))));
    }
    if let Some(until) = query.until {
      url.push_str(&format!("&until={}", rfc3339(until.with_timezone(&Utc))));
    }

    self.paged::<ApiCommit, _>(url, commit_record)
  }
}
