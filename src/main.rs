mod app;
mod calendar;
mod help;
mod logging;
mod picker;
mod theme;
use crate::app::App;
use crate::calendar::{build_month_grid, plain_text, render_tree, CalendarDate};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Output {
    #[default]
    Interactive,
    Print,
    Tree,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        date: Option<CalendarDate>,
        output: Output,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut date = None;
        let mut output = Output::default();
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('p') | Arg::Long("print") => output = Output::Print,
                Arg::Short('t') | Arg::Long("tree") => output = Output::Tree,
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match CalendarDate::parse(&value) {
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
        Ok(Command::Run {
            date,
            output,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                date,
                output,
                log_file,
            } => {
                if let Some(path) = log_file {
                    logging::init_file_logging(&path)?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let date = date.unwrap_or_else(|| CalendarDate::from(today));
                tracing::info!(?date, ?output, "starting");
                match output {
                    Output::Interactive => {
                        let app = App::new(today, date)?;
                        with_terminal(|mut terminal| {
                            terminal.hide_cursor().context("failed to hide cursor")?;
                            app.run(terminal).context("terminal I/O failed")
                        })
                    }
                    Output::Print => {
                        print!("{}", plain_text(&render_tree(&build_month_grid(date)?)));
                        Ok(())
                    }
                    Output::Tree => {
                        print!("{}", render_tree(&build_month_grid(date)?));
                        Ok(())
                    }
                }
            }
            Command::Help => {
                println!("Usage: monthgrid [<options>] [YYYY-MM-DD]");
                println!();
                println!("Terminal month-view calendar with the given date (default: today) selected");
                println!();
                println!("Options:");
                println!("  -p, --print           Print the month as plain text and exit");
                println!("  -t, --tree            Print the month's accessibility tree and exit");
                println!("      --log-file <PATH> Write logs to the given file (filter with $MONTHGRID_LOG)");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
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
    let r = func(terminal);
    ratatui::restore();
    r
}
