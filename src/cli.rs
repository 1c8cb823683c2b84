use clap::Parser;

use crate::error::ActivityError;

#[derive(Parser, Debug)]
#[command(
    name = "gitactivity2md",
    version,
    about = "Returns a list of GitHub pull requests and commits in markdown",
    long_about = None
)]
pub struct Cli {
  /// Date to get activity for, in ISO format (e.g. 2023-10-07)
  #[arg(long)]
  pub date: Option<String>,

  /// Relative date range, e.g. "today", "yesterday", "3 days ago", "2 weeks ago".
  /// Activity is counted from local midnight of the day requested.
  #[arg(long)]
  pub range: Option<String>,

  /// Repositories to get activity for: `name` (under GIT_USERNAME) or `owner/name`
  #[arg(long, alias = "repo", num_args = 1..)]
  pub repos: Vec<String>,

  /// Verbose diagnostics on stderr (stdout is unaffected)
  #[arg(long)]
  pub debug: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used as the anchor (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowSpec {
  Date { date: String },
  Range { expression: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
  pub window: WindowSpec,
  pub repos: Vec<String>,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig, ActivityError> {
  let window = match (cli.date, cli.range) {
    (Some(date), None) => WindowSpec::Date { date },
    (None, Some(expression)) => WindowSpec::Range { expression },
    (None, None) => {
      return Err(ActivityError::InvalidArgument(
        "--date or --range argument is required".into(),
      ))
    }
    (Some(_), Some(_)) => {
      return Err(ActivityError::InvalidArgument(
        "choose only one of --date | --range".into(),
      ))
    }
  };

  let repos: Vec<String> = cli
    .repos
    .into_iter()
    .map(|r| r.trim().to_string())
    .filter(|r| !r.is_empty())
    .collect();

  if repos.is_empty() {
    return Err(ActivityError::InvalidArgument(
      "--repo or --repos argument is required".into(),
    ));
  }

  Ok(EffectiveConfig {
    window,
    repos,
    now_override: cli.now_override,
  })
}
