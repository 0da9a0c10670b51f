//! `datecalc`: calendar-aware date arithmetic from the command line.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use date_engine::{CalendarUnit, DateEngine, Instant, ZonedCalendar};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

#[derive(Parser)]
#[command(name = "datecalc", version, about = "Calendar-aware date shifting, breakdowns, and comparison")]
struct Cli {
    /// IANA timezone whose wall clock dates are read and written in
    #[arg(long, global = true, env = "DATECALC_TZ", default_value = "UTC")]
    tz: String,

    /// Date pattern for inputs and outputs
    #[arg(long, global = true, env = "DATECALC_PATTERN", default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shift a date by a whole number of years, months, weeks, or days
    Add {
        date: String,
        /// Amount to add; negative values subtract
        #[arg(allow_negative_numbers = true)]
        amount: i64,
        /// year, month, week, or day (plural and short forms accepted)
        unit: CalendarUnit,
    },
    /// The same date one year later
    NextYear { date: String },
    /// The same date one year earlier
    PreviousYear { date: String },
    /// Break the distance between two dates into years, months, weeks, days, and time
    Between { start: String, end: String },
    /// Whether OTHER lies in the future, past, or same instant as REFERENCE
    Compare { reference: String, other: String },
}

#[derive(Serialize)]
struct Shifted {
    input: String,
    result: String,
}

struct App {
    engine: DateEngine<ZonedCalendar<Tz>>,
    pattern: String,
    json: bool,
}

impl App {
    fn parse(&self, text: &str) -> Result<Instant> {
        self.engine
            .parse(text, &self.pattern)
            .with_context(|| format!("failed to read date '{text}'"))
    }

    fn format(&self, instant: Instant) -> Result<String> {
        self.engine
            .format(instant, &self.pattern)
            .context("failed to format date")
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    fn emit_shifted(&self, input: &str, shifted: Instant) -> Result<()> {
        let result = self.format(shifted)?;
        let out = Shifted {
            input: input.to_string(),
            result,
        };
        self.emit(&out, || out.result.clone())
    }

    fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Add { date, amount, unit } => {
                let instant = self.parse(&date)?;
                let shifted = self
                    .engine
                    .add_units(instant, unit, amount)
                    .with_context(|| format!("cannot add {amount} {unit}(s) to '{date}'"))?;
                self.emit_shifted(&date, shifted)
            }
            Command::NextYear { date } => {
                let instant = self.parse(&date)?;
                let shifted = self
                    .engine
                    .next_year(instant)
                    .with_context(|| format!("next year of '{date}' is out of range"))?;
                self.emit_shifted(&date, shifted)
            }
            Command::PreviousYear { date } => {
                let instant = self.parse(&date)?;
                let shifted = self
                    .engine
                    .previous_year(instant)
                    .with_context(|| format!("previous year of '{date}' is out of range"))?;
                self.emit_shifted(&date, shifted)
            }
            Command::Between { start, end } => {
                let breakdown = self
                    .engine
                    .breakdown_between(self.parse(&start)?, self.parse(&end)?);
                self.emit(&breakdown, || breakdown.to_string())
            }
            Command::Compare { reference, other } => {
                let ordering = self
                    .engine
                    .compare(self.parse(&reference)?, self.parse(&other)?);
                self.emit(&serde_json::json!({ "ordering": ordering }), || {
                    ordering.to_string()
                })
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!(tz = %cli.tz, pattern = %cli.pattern, "datecalc starting");

    let calendar = ZonedCalendar::from_name(&cli.tz).context("invalid --tz")?;
    let app = App {
        engine: DateEngine::new(calendar),
        pattern: cli.pattern,
        json: cli.json,
    };
    app.run(cli.command)
}
