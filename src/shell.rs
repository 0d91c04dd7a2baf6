//! Line-oriented control surface over a [`Session`].
//!
//! Each command mutates the session or recomputes views from it. Errors are
//! reported to the user and the shell keeps running.

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::analyzers::hashtags::TopN;
use crate::filter::RangeSelection;
use crate::output::{ExportOptions, render_text, to_json, write_export};
use crate::record::Account;
use crate::session::Session;

const HELP: &str = "\
commands:
  load <account> <path>       load an account CSV (ppoohkt | pavelphoom)
  range <start> [<end>]       select dates (YYYY-MM-DD); one date selects nothing yet
  range clear                 drop the date selection
  top <account> <n>           hashtags to show for an account (5-20)
  span                        print the selectable date span
  show [json]                 render the dashboard
  export <account> <dir> [gzip]
  reset                       discard all data and settings
  help
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load(Account, PathBuf),
    Range(RangeSelection),
    Top(Account, usize),
    Span,
    Show { json: bool },
    Export { account: Account, dir: PathBuf, gzip: bool },
    Reset,
    Help,
    Quit,
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

fn parse_account(raw: Option<&str>) -> Result<Account> {
    raw.ok_or_else(|| anyhow!("missing account"))?
        .parse::<Account>()
        .map_err(|e| anyhow!(e))
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };

    let command = match name {
        "load" => {
            let account = parse_account(words.next())?;
            let rest: Vec<&str> = words.collect();
            if rest.is_empty() {
                bail!("usage: load <account> <path>");
            }
            Command::Load(account, PathBuf::from(rest.join(" ")))
        }
        "range" => match (words.next(), words.next()) {
            (Some("clear"), None) => Command::Range(RangeSelection::Unset),
            (start, end) => {
                let start = start.map(parse_date_arg).transpose()?;
                let end = end.map(parse_date_arg).transpose()?;
                Command::Range(RangeSelection::from_endpoints(start, end))
            }
        },
        "top" => {
            let account = parse_account(words.next())?;
            let n = words
                .next()
                .ok_or_else(|| anyhow!("usage: top <account> <n>"))?
                .parse::<usize>()
                .context("top count must be a number")?;
            Command::Top(account, n)
        }
        "span" => Command::Span,
        "show" => Command::Show {
            json: words.next() == Some("json"),
        },
        "export" => {
            let account = parse_account(words.next())?;
            let dir = words
                .next()
                .ok_or_else(|| anyhow!("usage: export <account> <dir> [gzip]"))?;
            Command::Export {
                account,
                dir: PathBuf::from(dir),
                gzip: words.next() == Some("gzip"),
            }
        }
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{}', try 'help'", other),
    };

    Ok(Some(command))
}

/// Applies a command to the session and returns the text to show.
pub fn execute(session: &mut Session, command: Command) -> Result<String> {
    debug!(?command, "Executing command");
    match command {
        Command::Load(account, path) => {
            session.load(account, &path)?;
            let rows = session.dataset(account).map_or(0, |d| d.len());
            let mut msg = format!("loaded {} rows for @{}", rows, account);
            if session.dataset(account.other()).is_none() {
                msg.push_str(&format!(
                    "\nboth files are required; load {} next",
                    account.other().file_name()
                ));
            }
            Ok(msg)
        }
        Command::Range(selection) => {
            session.config.range = selection;
            Ok(match selection {
                RangeSelection::Unset => "date selection cleared".to_string(),
                RangeSelection::Single(d) => format!("start {} selected, pick an end date", d),
                RangeSelection::Both(s, e) => format!("range {} to {}", s, e),
            })
        }
        Command::Top(account, n) => {
            let top = TopN::new(n);
            if top.get() != n {
                warn!(requested = n, applied = top.get(), "Top-N clamped");
            }
            session.config.set_top_n(account, top);
            Ok(format!("showing top {} hashtags for @{}", top.get(), account))
        }
        Command::Span => Ok(match session.span()? {
            Some(span) => format!("{} to {}", span.start, span.end),
            None => "no parseable dates".to_string(),
        }),
        Command::Show { json } => {
            let dashboard = session.dashboard()?;
            if json {
                to_json(&dashboard)
            } else {
                Ok(render_text(&dashboard))
            }
        }
        Command::Export { account, dir, gzip } => {
            let (a, b) = session.filtered()?;
            let dataset = if account == a.account { a } else { b };
            let path = write_export(
                &dir,
                &dataset,
                ExportOptions {
                    mention_target: Some(account.other()),
                    gzip,
                },
            )?;
            Ok(format!("wrote {}", path.display()))
        }
        Command::Reset => {
            session.reset();
            Ok("session reset".to_string())
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
    }
}

/// Reads commands from `input` until EOF or `quit`.
pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> Result<()> {
    let mut session = Session::new();
    writeln!(output, "engagement dashboard, type 'help' for commands")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "error: {:#}", e)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        match execute(&mut session, command) {
            Ok(text) => writeln!(output, "{}", text)?,
            Err(e) => writeln!(output, "error: {:#}", e)?,
        }
        output.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(
            parse_command("load ppoohkt data/a b.csv").unwrap(),
            Some(Command::Load(Account::Ppoohkt, PathBuf::from("data/a b.csv")))
        );
        assert_eq!(
            parse_command("range 2024-01-01 2024-01-09").unwrap(),
            Some(Command::Range(RangeSelection::Both(day(1), day(9))))
        );
        assert_eq!(
            parse_command("range 2024-01-03").unwrap(),
            Some(Command::Range(RangeSelection::Single(day(3))))
        );
        assert_eq!(
            parse_command("range clear").unwrap(),
            Some(Command::Range(RangeSelection::Unset))
        );
        assert_eq!(
            parse_command("top pavelphoom 7").unwrap(),
            Some(Command::Top(Account::Pavelphoom, 7))
        );
        assert_eq!(
            parse_command("show json").unwrap(),
            Some(Command::Show { json: true })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("frobnicate").is_err());
        assert!(parse_command("load nobody x.csv").is_err());
        assert!(parse_command("load ppoohkt").is_err());
        assert!(parse_command("range 01-2024").is_err());
        assert!(parse_command("top ppoohkt lots").is_err());
    }

    #[test]
    fn test_show_requires_both_files() {
        let mut session = Session::new();
        let err = execute(&mut session, Command::Show { json: false }).unwrap_err();
        assert!(err.to_string().contains("both CSV files are required"));
    }

    #[test]
    fn test_top_is_clamped() {
        let mut session = Session::new();
        let msg = execute(&mut session, Command::Top(Account::Ppoohkt, 50)).unwrap();
        assert_eq!(msg, "showing top 20 hashtags for @ppoohkt");
        assert_eq!(session.config.top_ppoohkt.get(), 20);
    }

    #[test]
    fn test_run_reports_errors_and_continues() {
        let input = "bogus\nhelp\nshow\nquit\nhelp\n";
        let mut out = Vec::new();
        run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("error: unknown command 'bogus'"));
        assert!(text.contains("commands:"));
        assert!(text.contains("error: both CSV files are required"));
        // nothing after quit is executed
        assert_eq!(text.matches("commands:").count(), 1);
    }
}
