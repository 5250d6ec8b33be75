//! Runs session commands against an [`AppContext`] and renders the results.

use super::{parse_session_line, SessionCommand};
use crate::ai::Completion;
use crate::errors::{AppError, AppResult};
use crate::metrics::{weekly_summary_at, Insight};
use crate::ops::{self, AppContext};
use crate::store::UserExport;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::{error, info, info_span};

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// The user asked to end the session.
    Quit,
}

fn join(words: &[String]) -> String {
    words.join(" ")
}

fn write_completion(out: &mut dyn Write, completion: &Completion) -> AppResult<()> {
    if let Some(notice) = &completion.notice {
        writeln!(out, "[!] {}", notice)?;
    }
    writeln!(out, "{}", completion.text)?;
    Ok(())
}

fn write_insight(out: &mut dyn Write, insight: &Insight<Completion>) -> AppResult<()> {
    match insight {
        Insight::Ready(completion) => write_completion(out, completion),
        Insight::InsufficientData(message) => {
            writeln!(out, "{}", message)?;
            Ok(())
        }
    }
}

/// Executes one command. `today` is the default entry date and the end of the weekly window.
///
/// # Errors
///
/// Returns any error from the operation; the caller decides whether it ends the session.
pub fn run_command(
    ctx: &mut AppContext,
    command: SessionCommand,
    today: NaiveDate,
    out: &mut dyn Write,
) -> AppResult<Flow> {
    match command {
        SessionCommand::Mood { score, date, notes } => {
            let entry = ops::record_mood(ctx, date.unwrap_or(today), score, &join(&notes));
            writeln!(out, "Your mood has been recorded: {}/10 on {}", entry.mood, entry.date)?;
        }
        SessionCommand::Stress {
            level,
            date,
            activities,
        } => {
            let entry = ops::record_stress(ctx, date.unwrap_or(today), level, &join(&activities));
            writeln!(
                out,
                "Your stress level has been recorded: {}/10 on {}",
                entry.level, entry.date
            )?;
        }
        SessionCommand::Journal {
            title,
            mood,
            date,
            content,
        } => {
            let entry =
                ops::record_journal(ctx, date.unwrap_or(today), &title, &join(&content), mood)?;
            writeln!(out, "Journal entry saved for {}", entry.date)?;
        }
        SessionCommand::Dashboard => {
            write!(out, "{}", ops::session_dashboard(ctx, today))?;
        }
        SessionCommand::Weekly => {
            let username = ctx.session.username().to_string();
            let summary = weekly_summary_at(
                ctx.store.list_mood(&username),
                ctx.store.list_stress(&username),
                today,
            );
            match summary {
                Insight::Ready(summary) => {
                    write!(out, "{}", ops::dashboard::summary_table(&summary))?
                }
                Insight::InsufficientData(message) => writeln!(out, "{}", message)?,
            }
        }
        SessionCommand::Insights => write_insight(out, &ops::mood_insights(ctx)?)?,
        SessionCommand::StressAnalysis => write_insight(out, &ops::analyze_stress(ctx)?)?,
        SessionCommand::JournalPrompt { mood } => {
            write_completion(out, &ops::generate_journal_prompt(ctx, mood.as_deref())?)?
        }
        SessionCommand::Affirmation { new } => {
            write_completion(out, &ops::daily_affirmation(ctx, today, new)?)?
        }
        SessionCommand::Affirmations { category } => {
            let categories: Vec<_> = match category {
                Some(name) => vec![*ops::find_category(&name).ok_or_else(|| {
                    AppError::Cli(format!("No affirmation category named '{}'", name))
                })?],
                None => ops::affirmation_library().to_vec(),
            };
            for category in categories {
                writeln!(out, "{}", category.name)?;
                for affirmation in category.affirmations {
                    writeln!(out, "  - {}", affirmation)?;
                }
            }
        }
        SessionCommand::Tips { focus } => {
            write_completion(out, &ops::wellness_tips(ctx, &join(&focus))?)?
        }
        SessionCommand::Music { mood, another } => {
            let track = ops::recommend_track(ctx, &mood, another)?;
            writeln!(out, "{} - {}", track.title, track.artist)?;
            writeln!(out, "{}", track.url)?;
        }
        SessionCommand::Export { format, output } => {
            let export = ops::export_entries(ctx, format.into(), output.as_deref())?;
            match (&output, export) {
                (Some(path), _) => writeln!(out, "Export written to {}", path)?,
                (None, UserExport::Structured(json)) => writeln!(out, "{}", json)?,
                (None, tabular) => write!(out, "{}", tabular)?,
            }
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Reads commands line by line until `quit` or end of input.
///
/// Errors from individual commands are reported and the session continues.
/// `prompt` is written before each line when set. `today` is called per command
/// so a session that crosses midnight uses the new date.
///
/// # Errors
///
/// Returns an error only when reading input or writing output fails.
pub fn run_session(
    ctx: &mut AppContext,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    prompt: Option<&str>,
    today: &dyn Fn() -> NaiveDate,
) -> AppResult<()> {
    let span = info_span!("session", session_id = %ctx.session.id());
    let _guard = span.enter();
    info!("Interactive session started");

    let mut line = String::new();
    loop {
        if let Some(prompt) = prompt {
            write!(out, "{}", prompt)?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_session_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        match run_command(ctx, command, today(), out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                error!("Command failed: {}", e);
                writeln!(out, "Error: {}", e)?;
            }
        }
    }

    info!("Interactive session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::constants::{NOT_ENOUGH_MOOD_DATA, NOT_ENOUGH_WEEKLY_DATA};
    use crate::ops::test_support::context;
    use crate::session::Session;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 10).unwrap()
    }

    fn run_script(ctx: &mut AppContext, script: &str) -> String {
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        run_session(ctx, &mut input, &mut out, None, &today).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_session_records_and_summarises() {
        let (mut ctx, _) = context(Some("Keep going."));
        let output = run_script(
            &mut ctx,
            "mood 4 tired\nmood 8 --date 2024-09-09 rested\nstress 5 work\nweekly\ninsights\nquit\nmood 9\n",
        );

        assert!(output.contains("Your mood has been recorded: 4/10 on 2024-09-10"));
        assert!(output.contains("Your mood has been recorded: 8/10 on 2024-09-09"));
        assert!(output.contains("Your stress level has been recorded: 5/10"));
        assert!(output.contains(NOT_ENOUGH_WEEKLY_DATA));
        assert!(output.contains("Keep going."));
        // Nothing after quit runs
        assert_eq!(ctx.store.list_mood("ana").len(), 2);
    }

    #[test]
    fn test_session_reports_errors_and_continues() {
        let (mut ctx, _) = context(None);
        let output = run_script(&mut ctx, "mood 42\nfly away\ninsights\nmusic Angry\n");

        assert!(output.contains("42"));
        assert!(output.contains(NOT_ENOUGH_MOOD_DATA));
        assert!(output.contains("Error: Unknown mood 'Angry'"));
    }

    #[test]
    fn test_missing_key_fails_fast_per_command() {
        let config = Config {
            api_key: None,
            ..Config::default()
        };
        let mut ctx = AppContext::new(config, Session::login("ana", "pw").unwrap());
        let output = run_script(&mut ctx, "affirmation\naffirmations --category confidence\n");

        assert!(output.contains("Error: Configuration error"));
        assert!(output.contains("I trust my abilities and embrace new challenges."));
    }

    #[test]
    fn test_fallback_shows_notice_and_text() {
        let (mut ctx, _) = context(None);
        let mut out = Vec::new();
        run_command(&mut ctx, SessionCommand::Affirmation { new: false }, today(), &mut out)
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("[!] Error connecting to the AI service"));
        assert!(output.contains(crate::constants::COMPLETION_FALLBACK_TEXT));
    }

    #[test]
    fn test_export_to_stdout_as_csv() {
        let (mut ctx, _) = context(None);
        let output = run_script(&mut ctx, "stress 3 \"yoga, reading\"\nexport --format csv\n");
        assert!(output.contains("# stress_data\ndate,level,activities\n2024-09-10,3,\"yoga, reading\"\n"));
        assert!(output.contains("# mood_data\nNo mood data\n"));
    }

    #[test]
    fn test_prompt_written_before_each_line() {
        let (mut ctx, _) = context(None);
        let mut input = "dashboard\n".as_bytes();
        let mut out = Vec::new();
        run_session(&mut ctx, &mut input, &mut out, Some("> "), &today).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("> Dashboard for ana"));
        assert!(output.ends_with("> "));
    }
}
