/*!
# Mindful - A Mood and Stress Journal

This file contains the main application flow: logging setup, login, optional
import, and then either one command or an interactive session on stdin.

## Usage

```
mindful [OPTIONS] [COMMAND]

Options:
  -u, --user <USER>              Username to log in as [env: MINDFUL_USER]
  -p, --password <PASSWORD>      Password [env: MINDFUL_PASSWORD]
      --import <FILE>            Seed the session from a JSON export file
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
      --log-level <LOG_LEVEL>    Log level when RUST_LOG is not set [default: info]
```

## Configuration

- `MINDFUL_API_KEY` or `GEMINI_API_KEY`: generative-AI credential (needed only for AI commands)
- `MINDFUL_MODEL`, `MINDFUL_API_BASE`, `MINDFUL_TIMEOUT_SECS`,
  `MINDFUL_MAX_RETRIES`, `MINDFUL_RETRY_DELAY_MS`: service tuning
*/

use chrono::Local;
use clap::Parser;
use mindful::cli::dispatch::{run_command, run_session};
use mindful::cli::CliArgs;
use mindful::config::Config;
use mindful::constants::{
    LOG_FORMAT_JSON, SESSION_PROMPT, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use mindful::errors::{AppError, AppResult};
use mindful::ops::{self, AppContext};
use mindful::session::Session;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

fn init_tracing(args: &CliArgs) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .map_err(|e| AppError::Config(format!("Invalid log level '{}': {}", args.log_level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    let result = if args.log_format == LOG_FORMAT_JSON {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.with_target(false).try_init()
    };
    result.map_err(|e| AppError::Config(format!("Failed to initialise logging: {}", e)))
}

fn read_username() -> AppResult<String> {
    eprint!("Username: ");
    io::stderr().flush()?;
    let mut username = String::new();
    io::stdin().lock().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

fn run(args: CliArgs) -> AppResult<()> {
    info!("Loading configuration");
    let config = Config::load()?;
    debug!("Configuration: {:?}", config);

    let username = match &args.user {
        Some(user) => user.clone(),
        None => read_username()?,
    };
    let password = match &args.password {
        Some(password) => zeroize::Zeroizing::new(password.clone()),
        None => zeroize::Zeroizing::new(rpassword::prompt_password("Password: ")?),
    };

    let session = Session::login(&username, &password)?;
    let mut ctx = AppContext::new(config, session);

    if let Some(path) = &args.import {
        let count = ops::import_entries(&mut ctx, path)?;
        info!("Imported {} entries", count);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Some(command) => {
            run_command(&mut ctx, command, Local::now().date_naive(), &mut out)?;
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal().then_some(SESSION_PROMPT);
            let mut input = stdin.lock();
            run_session(&mut ctx, &mut input, &mut out, prompt, &|| {
                Local::now().date_naive()
            })?;
        }
    }

    out.flush()?;
    Ok(())
}

/// The main entry point for the mindful application.
///
/// Parses arguments, initialises logging inside a root span carrying a fresh
/// correlation ID, and runs the session. Errors are logged once here and
/// reported on stderr with a non-zero exit code.
fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let correlation_id = uuid::Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    info!("Starting mindful");
    match run(args) {
        Ok(()) => {
            info!("Finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
