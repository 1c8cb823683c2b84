use std::process::ExitCode;

use clap::{CommandFactory, Parser};

mod cli;
mod config;
mod error;
mod filter;
mod logging;
mod model;
mod render;
mod run;
mod source;
mod util;
mod window;

use crate::cli::{normalize, Cli};
use crate::error::{ActivityError, EXIT_FAULT, EXIT_INVALID_ARGUMENT, EXIT_OK};

fn exit_with(code: i32) -> ExitCode {
  ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn report(err: &ActivityError) {
  eprintln!("gitactivity2md: {:#}", err);
  if err.wants_usage() {
    eprintln!("{}", Cli::command().render_usage());
  }
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      let _ = e.print();
      return exit_with(if e.use_stderr() { EXIT_INVALID_ARGUMENT } else { EXIT_OK });
    }
  };

  if cli.gen_man {
    return match util::render_man_page::<Cli>() {
      Ok(page) => {
        print!("{}", page);
        exit_with(EXIT_OK)
      }
      Err(e) => {
        eprintln!("gitactivity2md: {:#}", e);
        exit_with(EXIT_FAULT)
      }
    };
  }

  logging::init(cli.debug);
  config::load_dotenv();

  // Phase 1: normalize CLI
  let cfg = match normalize(cli) {
    Ok(cfg) => cfg,
    Err(e) => {
      report(&e);
      return exit_with(e.exit_code());
    }
  };

  // Phase 2: resolve the window, fetch, render
  match run::execute(&cfg) {
    Ok(_) => exit_with(EXIT_OK),
    Err(e) => {
      tracing::debug!(error = ?e, "run failed");
      report(&e);
      exit_with(e.exit_code())
    }
  }
}
