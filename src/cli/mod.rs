//! Command-line and session-command parsing.
//!
//! The process arguments select the user, logging, and optionally one command
//! to run. Without a command, each line read from stdin is tokenised with
//! [`split_command_line`] and parsed as a [`SessionCommand`].

pub mod dispatch;

use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_LOG_LEVEL, ENV_VAR_PASSWORD, ENV_VAR_USER, LOG_FORMAT_JSON,
    LOG_FORMAT_TEXT,
};
use crate::errors::{AppError, AppResult};
use crate::store::ExportFormat;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::str::FromStr;

/// A mood and stress journal with AI-generated insights
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Username to log in as (prompted for when omitted)
    #[clap(short = 'u', long, env = ENV_VAR_USER)]
    pub user: Option<String>,

    /// Password (prompted for without echo when omitted)
    #[clap(short = 'p', long, env = ENV_VAR_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Seed the session from a JSON export file
    #[clap(long, value_name = "FILE")]
    pub import: Option<String>,

    /// Log output format
    #[clap(long, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Log level when RUST_LOG is not set
    #[clap(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Run a single command and exit; without one, commands are read from stdin
    #[clap(subcommand)]
    pub command: Option<SessionCommand>,
}

/// One command of an interactive session.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Record how you feel (1 = very low, 10 = excellent)
    Mood {
        #[clap(value_parser = clap::value_parser!(i32).range(1..=10))]
        score: i32,
        /// Entry date (YYYY-MM-DD or YYYYMMDD), default today
        #[clap(short = 'd', long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// What's on your mind
        #[clap(allow_hyphen_values = true)]
        notes: Vec<String>,
    },

    /// Record a stress level (1 = calm, 10 = overwhelmed) and what you were doing
    Stress {
        #[clap(value_parser = clap::value_parser!(i32).range(1..=10))]
        level: i32,
        #[clap(short = 'd', long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Comma-separated activities, e.g. "work, commute"
        #[clap(allow_hyphen_values = true)]
        activities: Vec<String>,
    },

    /// Write a journal entry
    Journal {
        #[clap(short = 't', long)]
        title: String,
        /// How you feel, e.g. "Calm"
        #[clap(short = 'm', long)]
        mood: Option<String>,
        #[clap(short = 'd', long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[clap(allow_hyphen_values = true)]
        content: Vec<String>,
    },

    /// Show charts, weekly summary, average mood and activity impact
    Dashboard,

    /// Show the last seven days
    Weekly,

    /// AI insights over your recent moods
    Insights,

    /// AI analysis of your stress patterns
    StressAnalysis,

    /// Suggest a journaling prompt
    JournalPrompt {
        #[clap(short = 'm', long)]
        mood: Option<String>,
    },

    /// Today's affirmation
    Affirmation {
        /// Generate a fresh one instead of reusing today's
        #[clap(long)]
        new: bool,
    },

    /// Browse the affirmation library
    Affirmations {
        #[clap(short = 'c', long)]
        category: Option<String>,
    },

    /// Wellness tips for an area you want to improve
    Tips {
        #[clap(required = true)]
        focus: Vec<String>,
    },

    /// Music for a mood (Relaxed, Happy, Focused, Sleepy)
    Music {
        mood: String,
        /// Recommend the next track
        #[clap(long)]
        another: bool,
    },

    /// Export all your entries
    Export {
        #[clap(short = 'f', long, value_enum, default_value = "json")]
        format: ExportFormatArg,
        /// Write to a file instead of stdout
        #[clap(short = 'o', long)]
        output: Option<String>,
    },

    /// End the session
    #[clap(alias = "exit")]
    Quit,
}

/// Export format as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// Pretty-printed JSON
    Json,
    /// One CSV block per entry kind
    Csv,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Csv => ExportFormat::Csv,
        }
    }
}

/// Parser for one line of an interactive session.
#[derive(Parser, Debug)]
#[clap(name = "mindful", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[clap(subcommand)]
    command: SessionCommand,
}

/// Parses a date given as YYYY-MM-DD or YYYYMMDD.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::from_str(raw.trim())
        .or_else(|_| NaiveDate::parse_from_str(raw.trim(), "%Y%m%d"))
        .map_err(|_| format!("'{}' is not a date (use YYYY-MM-DD or YYYYMMDD)", raw))
}

/// Parses one interactive line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns `AppError::Cli` with clap's rendered message (which is the help
/// text for `help`) when the line is not a valid command.
pub fn parse_session_line(line: &str) -> AppResult<Option<SessionCommand>> {
    let tokens = split_command_line(line)?;
    if tokens.is_empty() {
        return Ok(None);
    }

    SessionLine::try_parse_from(tokens)
        .map(|parsed| Some(parsed.command))
        .map_err(|e| AppError::Cli(e.render().to_string().trim_end().to_string()))
}

/// Splits a line into words, honouring single and double quotes and backslash escapes.
///
/// # Errors
///
/// Returns `AppError::Cli` for an unterminated quote.
pub fn split_command_line(line: &str) -> AppResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            },
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    in_token = true;
                }
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(AppError::Cli("Unterminated quote in command".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
