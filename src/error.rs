// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Error taxonomy for a run and its mapping onto process exit codes
// role: errors/contract
// outputs: FormatError (resolver failures), ActivityError (run failures), exit codes
// invariants:
// - InvalidArgument and Format map to EINVAL; every other failure maps to FAULT
// - "ran, found nothing" is not an error and never reaches this module
// errors: n/a (this module defines them)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

/// Exit code for a clean run, including runs that found nothing.
pub const EXIT_OK: i32 = 0;
/// Exit code for missing flags or a malformed date/range expression (errno EINVAL).
pub const EXIT_INVALID_ARGUMENT: i32 = 22;
/// Exit code for an unreachable source, unknown repository, or output failure.
pub const EXIT_FAULT: i32 = 1;

/// A date or range expression that the resolver could not interpret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date range: {expression}")]
pub struct FormatError {
  pub expression: String,
}

impl FormatError {
  pub fn new(expression: impl Into<String>) -> Self {
    Self {
      expression: expression.into(),
    }
  }
}

#[derive(Debug, Error)]
pub enum ActivityError {
  #[error("{0}")]
  InvalidArgument(String),

  #[error(transparent)]
  Format(#[from] FormatError),

  #[error("{repo}: {source:#}")]
  SourceUnavailable {
    repo: String,
    #[source]
    source: anyhow::Error,
  },

  #[error("configuration error: {0}")]
  Config(String),

  #[error("writing report: {0}")]
  Output(#[from] std::io::Error),
}

impl ActivityError {
  pub fn source_unavailable(repo: &str, source: anyhow::Error) -> Self {
    ActivityError::SourceUnavailable {
      repo: repo.to_string(),
      source,
    }
  }

  pub fn exit_code(&self) -> i32 {
    match self {
      ActivityError::InvalidArgument(_) | ActivityError::Format(_) => EXIT_INVALID_ARGUMENT,
      ActivityError::SourceUnavailable { .. } | ActivityError::Config(_) | ActivityError::Output(_) => EXIT_FAULT,
    }
  }

  /// Whether usage help should accompany the message on stderr.
  pub fn wants_usage(&self) -> bool {
    matches!(self, ActivityError::InvalidArgument(_) | ActivityError::Format(_))
  }
}
