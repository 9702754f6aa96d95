mod app;
mod calendar;
mod events;
mod form;
mod help;
mod theme;
use crate::app::App;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::io;
use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime, Weekday,
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run { date: Option<Date>, monday: bool },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut monday = false;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('m') | Arg::Long("monday") => monday = true,
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { date, monday })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { date, monday } => {
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let week_start = if monday {
                    Weekday::Monday
                } else {
                    Weekday::Sunday
                };
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    let mut app = App::new(today, week_start);
                    if let Some(date) = date {
                        app = app.start_date(date);
                    }
                    app.run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: evcal [--monday] [YYYY-MM-DD]");
                println!();
                println!("Terminal month calendar with quick event entry");
                println!();
                println!("Options:");
                println!("  -m, --monday      Start weeks on Monday instead of Sunday");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    // Mouse capture is best-effort; everything stays reachable from the
    // keyboard without it.
    let _ = execute!(io::stdout(), EnableMouseCapture);
    let r = func(terminal);
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    r
}
