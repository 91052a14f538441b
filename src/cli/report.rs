use std::fmt::Display;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::debug;

use crate::{
    report::{
        daily_summary,
        render::{render_daily, render_weekly, ChartStyle},
        weekly_counts,
    },
    storage::log_store::{CsvLogStore, LogStore},
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(
        long = "date",
        short,
        help = "Day to report on. For weekly reports the last day of the week. Examples are \"yesterday\", \"monday\", \"15/03/2025\""
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, help = "Print the report as json")]
    json: bool,
}

/// Processes the `today` command: tasks logged on a single day.
pub async fn process_daily_command(store: &CsvLogStore, command: ReportCommand) -> Result<()> {
    let date = parse_report_date(command.date, command.date_style)?;
    let summary = daily_summary(&store.read_all().await?, date);
    if command.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_daily(&summary));
    }
    Ok(())
}

/// Processes the `week` command: task counts for the seven days ending at the given date.
pub async fn process_weekly_command(
    store: &CsvLogStore,
    command: ReportCommand,
    style: ChartStyle,
) -> Result<()> {
    let end = parse_report_date(command.date, command.date_style)?;
    let counts = weekly_counts(&store.read_all().await?, end);
    debug!("{} tasks in the week ending {end}", counts.total());
    if command.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        print!("{}", render_weekly(&counts, &style));
    }
    Ok(())
}

/// Defaults to today when no date is given.
fn parse_report_date(date: Option<String>, date_style: DateStyle) -> Result<NaiveDate> {
    let now = Local::now();
    match date.map(|s| parse_date_string(&s, now, date_style.into())) {
        Some(Ok(v)) => Ok(v.with_timezone(&Local).date_naive()),
        Some(Err(e)) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {e}"),
            )
            .into()),
        None => Ok(now.date_naive()),
    }
}
