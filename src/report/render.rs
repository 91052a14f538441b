use std::fmt::Write;

use ansi_term::Colour;

use crate::utils::time::{format_record_date, format_record_time};

use super::{DailySummary, WeeklyCounts};

pub const WEEKLY_CHART_TITLE: &str = "Tasks Logged in the Past Week";

const BAR_SYMBOL: char = '█';
const DATE_COLUMN: &str = "Date";
const COUNT_COLUMN: &str = "Number of Tasks";

#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub color: bool,
    /// Length of the longest bar.
    pub width: usize,
}

/// ```text
/// Tasks for 2018-07-04: 2
/// 09:30 - standup
/// 11:00 - review
/// ```
pub fn render_daily(summary: &DailySummary) -> String {
    let mut out = format!(
        "Tasks for {}: {}\n",
        format_record_date(summary.date),
        summary.count()
    );
    for entry in &summary.entries {
        let _ = writeln!(out, "{} - {}", format_record_time(entry.time), entry.text);
    }
    out
}

/// Horizontal bar chart, one line per day. Bars are scaled so the busiest day spans
/// [ChartStyle::width]; any non-zero day gets at least one block.
pub fn render_weekly(counts: &WeeklyCounts, style: &ChartStyle) -> String {
    let max = counts.max();
    let date_width = "YYYY-MM-DD".len();

    let mut out = format!("{WEEKLY_CHART_TITLE}\n");
    let _ = writeln!(out, "{DATE_COLUMN:<date_width$} | {COUNT_COLUMN}");

    for day in counts.days() {
        let length = bar_length(day.count, max, style.width);
        let bar = BAR_SYMBOL.to_string().repeat(length);
        let bar = if style.color {
            Colour::Cyan.paint(bar).to_string()
        } else {
            bar
        };
        let separator = if length > 0 { " " } else { "" };
        let _ = writeln!(
            out,
            "{} | {bar}{separator}{}",
            format_record_date(day.date),
            day.count
        );
    }
    out
}

fn bar_length(count: usize, max: usize, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    (count * width / max).max(1)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use crate::{
        report::{daily_summary, weekly_counts},
        storage::entities::TaskRecord,
    };

    use super::{bar_length, render_daily, render_weekly, ChartStyle};

    fn record(day: u32, hour: u32, minute: u32, text: &str) -> TaskRecord {
        TaskRecord {
            date: NaiveDate::from_ymd_opt(2018, 7, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
            text: text.into(),
        }
    }

    #[test]
    fn test_render_daily() {
        let records = vec![
            record(4, 9, 30, "standup"),
            record(3, 10, 0, "yesterday"),
            record(4, 11, 5, "review, then merge"),
        ];
        let summary = daily_summary(&records, NaiveDate::from_ymd_opt(2018, 7, 4).unwrap());
        assert_eq!(
            render_daily(&summary),
            "Tasks for 2018-07-04: 2\n09:30 - standup\n11:05 - review, then merge\n"
        );
    }

    #[test]
    fn test_render_weekly() {
        let records = vec![
            record(4, 9, 0, "a"),
            record(4, 10, 0, "b"),
            record(4, 11, 0, "c"),
            record(4, 12, 0, "d"),
            record(2, 9, 0, "e"),
        ];
        let counts = weekly_counts(&records, NaiveDate::from_ymd_opt(2018, 7, 4).unwrap());
        let chart = render_weekly(
            &counts,
            &ChartStyle {
                color: false,
                width: 8,
            },
        );

        assert_eq!(
            chart,
            "Tasks Logged in the Past Week\n\
             Date       | Number of Tasks\n\
             2018-06-28 | 0\n\
             2018-06-29 | 0\n\
             2018-06-30 | 0\n\
             2018-07-01 | 0\n\
             2018-07-02 | ██ 1\n\
             2018-07-03 | 0\n\
             2018-07-04 | ████████ 4\n"
        );
    }

    #[test]
    fn test_bar_length() {
        assert_eq!(bar_length(0, 0, 10), 0);
        assert_eq!(bar_length(0, 5, 10), 0);
        assert_eq!(bar_length(1, 100, 10), 1);
        assert_eq!(bar_length(5, 5, 10), 10);
    }
}
