// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Small helpers: effective "now", elapsed-time formatting, man page rendering
// role: utilities/helpers
// inputs: Optional now override; Duration; clap CommandFactory
// outputs: DateTime<Local>, display strings, man page text
// invariants: effective_now never consults the clock when an override is given
// errors: render_man_page surfaces IO errors from the renderer
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use chrono::{DateTime, Local};
use clap::CommandFactory;

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current local time is used. Centralizes our handling of test
/// determinism without sprinkling `Local::now()` throughout the code.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

pub fn format_elapsed(elapsed: Duration) -> String {
  format!("{:.2}s", elapsed.as_secs_f64())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
