// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve relative range expressions and absolute dates into concrete local-time windows
// role: windowing/resolution
// inputs: Expression strings ("today", "3 days ago", "2023-10-07") and an anchor instant
// outputs: DateWindow with since/until/fetch_until and the scan policy the filter must follow
// invariants:
// - since is always local midnight of the resolved day
// - until (bounded windows only) is 23:59:59 local of the target day, inclusive
// - fetch_until is one day past until and only bounds the remote query
// - relative windows are open-ended and scan with StopAtOlder; bounded windows scan with SkipOlder
// errors: FormatError carrying the original expression; never panics
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Days, Local, Months, NaiveDate, TimeZone};

use crate::error::FormatError;
use crate::model::CommitQuery;

/// What to do with an item older than `since`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanPolicy {
  /// The listing is newest-first: the first older item ends the scan.
  StopAtOlder,
  /// Ordering is not relied upon: older items are skipped and scanning continues.
  SkipOlder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateWindow {
  pub since: DateTime<Local>,
  pub until: Option<DateTime<Local>>,
  pub fetch_until: Option<DateTime<Local>>,
  pub policy: ScanPolicy,
}

impl DateWindow {
  /// Relative window: everything on or after `since`.
  pub fn open_ended(since: DateTime<Local>) -> Self {
    Self {
      since,
      until: None,
      fetch_until: None,
      policy: ScanPolicy::StopAtOlder,
    }
  }

  pub fn bounded(since: DateTime<Local>, until: DateTime<Local>, fetch_until: DateTime<Local>) -> Self {
    Self {
      since,
      until: Some(until),
      fetch_until: Some(fetch_until),
      policy: ScanPolicy::SkipOlder,
    }
  }

  pub fn is_before<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
    *at < self.since
  }

  pub fn is_after<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
    self.until.as_ref().is_some_and(|until| at > until)
  }

  pub fn contains<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
    !self.is_before(at) && !self.is_after(at)
  }

  /// Bounds to hand to the remote commit listing.
  pub fn query(&self) -> CommitQuery {
    CommitQuery {
      since: Some(self.since),
      until: self.fetch_until,
    }
  }

  /// Same bounds, but never terminating early on an older item.
  pub fn skipping(&self) -> Self {
    Self {
      policy: ScanPolicy::SkipOlder,
      ..self.clone()
    }
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Unit {
  Day,
  Week,
  Month,
  Year,
}

fn parse_unit(token: &str) -> Option<Unit> {
  match token {
    "day" | "days" | "d" => Some(Unit::Day),
    "week" | "weeks" | "wk" | "wks" | "w" => Some(Unit::Week),
    "month" | "months" | "mon" | "mons" | "m" => Some(Unit::Month),
    "year" | "years" | "yr" | "yrs" | "y" => Some(Unit::Year),
    _ => None,
  }
}

fn step_back(day: NaiveDate, n: u32, unit: Unit) -> Option<NaiveDate> {
  match unit {
    Unit::Day => day.checked_sub_days(Days::new(n.into())),
    Unit::Week => day.checked_sub_days(Days::new(u64::from(n) * 7)),
    // chrono clamps to the last day of the target month (Mar 31 - 1 month = Feb 28/29)
    Unit::Month => day.checked_sub_months(Months::new(n)),
    Unit::Year => day.checked_sub_months(Months::new(n.checked_mul(12)?)),
  }
}

/// First valid local instant of `day`; skips forward over a DST gap at midnight.
pub fn start_of_day(day: NaiveDate) -> Option<DateTime<Local>> {
  (0..24).find_map(|h| day.and_hms_opt(h, 0, 0)?.and_local_timezone(Local).earliest())
}

/// 23:59:59 local of `day` (or the closest earlier valid second-59 instant).
pub fn end_of_day(day: NaiveDate) -> Option<DateTime<Local>> {
  (0..24)
    .rev()
    .find_map(|h| day.and_hms_opt(h, 59, 59)?.and_local_timezone(Local).latest())
}

/// Resolve a relative range expression against `anchor`.
///
/// Accepts `today`, `yesterday`, `<N> <unit>` and `<N> <unit> ago`, case-insensitive.
/// The result is open-ended and starts at local midnight of the resolved day.
pub fn resolve_range(expression: &str, anchor: DateTime<Local>) -> Result<DateWindow, FormatError> {
  let lowered = expression.trim().to_lowercase();
  let tokens: Vec<&str> = lowered.split_whitespace().collect();
  let today = anchor.date_naive();
  let fail = || FormatError::new(expression);

  let day = match tokens.as_slice() {
    ["today"] => today,
    ["yesterday"] => step_back(today, 1, Unit::Day).ok_or_else(fail)?,
    [count, unit] | [count, unit, "ago"] => {
      let n: u32 = count.parse().map_err(|_| fail())?;
      let unit = parse_unit(unit).ok_or_else(fail)?;
      step_back(today, n, unit).ok_or_else(fail)?
    }
    _ => return Err(fail()),
  };

  let since = start_of_day(day).ok_or_else(fail)?;
  Ok(DateWindow::open_ended(since))
}

/// Resolve an ISO calendar date (`YYYY-MM-DD`) into a single-day bounded window.
pub fn resolve_date(expression: &str) -> Result<DateWindow, FormatError> {
  let fail = || FormatError::new(expression);
  let day = NaiveDate::parse_from_str(expression.trim(), "%Y-%m-%d").map_err(|_| fail())?;
  let next = day.succ_opt().ok_or_else(fail)?;

  let since = start_of_day(day).ok_or_else(fail)?;
  let until = end_of_day(day).ok_or_else(fail)?;
  let fetch_until = end_of_day(next).ok_or_else(fail)?;

  Ok(DateWindow::bounded(since, until, fetch_until))
}

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Local>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Local))
      .or_else(|| {
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .and_then(|ndt| ndt.and_local_timezone(Local).single())
      })
  })
}
