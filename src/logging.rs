use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Route all diagnostics to stderr. `RUST_LOG` wins over `--debug`.
pub fn init(debug: bool) {
  let fallback = if debug { "info,gitactivity2md=debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .with_target(false)
    .without_time()
    .try_init();
}
