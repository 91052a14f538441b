//! Reminder countdown. The timer itself is a plain state machine driven by one second ticks, which
//! keeps it free of any runtime concerns. [crate::shell] owns the only instance and feeds it ticks.

use std::{fmt::Display, num::NonZeroU32, str::FromStr};

use anyhow::{anyhow, Result};

use crate::utils::time::format_countdown;

const SECONDS_PER_MINUTE: u64 = 60;

pub const REMINDER_TITLE: &str = "Task Reminder";
pub const REMINDER_MESSAGE: &str = "It's time to log your task!";

/// Reminder interval in whole minutes. Zero is not a valid interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReminderInterval(NonZeroU32);

impl ReminderInterval {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        NonZeroU32::new(minutes).map(Self)
    }

    pub fn minutes(&self) -> u32 {
        self.0.get()
    }

    pub fn as_seconds(&self) -> u64 {
        u64::from(self.minutes()) * SECONDS_PER_MINUTE
    }
}

impl Display for ReminderInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} minutes", self.minutes())
    }
}

impl FromStr for ReminderInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_minutes)
            .ok_or_else(|| anyhow!("Please enter a valid number for minutes."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    Running {
        interval: ReminderInterval,
        /// Seconds left until the next reminder.
        remaining: u64,
    },
}

impl Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerStatus::Idle => write!(f, "idle"),
            TimerStatus::Running {
                interval,
                remaining,
            } => write!(
                f,
                "running every {interval}, next reminder in {}",
                format_countdown(*remaining)
            ),
        }
    }
}

/// Produced every time the countdown elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reminder {
    pub interval: ReminderInterval,
}

impl Reminder {
    pub fn title(&self) -> &'static str {
        REMINDER_TITLE
    }

    pub fn message(&self) -> &'static str {
        REMINDER_MESSAGE
    }
}

#[derive(Debug)]
pub struct ReminderTimer {
    status: TimerStatus,
}

impl Default for ReminderTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderTimer {
    pub fn new() -> Self {
        Self {
            status: TimerStatus::Idle,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, TimerStatus::Running { .. })
    }

    /// Starts or restarts the countdown from a full interval.
    pub fn start(&mut self, interval: ReminderInterval) {
        self.status = TimerStatus::Running {
            interval,
            remaining: interval.as_seconds(),
        };
    }

    /// Parses user input and starts the timer. Invalid input leaves the timer untouched.
    pub fn start_from_input(&mut self, input: &str) -> Result<ReminderInterval> {
        let interval = input.parse::<ReminderInterval>()?;
        self.start(interval);
        Ok(interval)
    }

    pub fn stop(&mut self) {
        self.status = TimerStatus::Idle;
    }

    /// Advances the countdown by one second. When it reaches zero a [Reminder] is returned and the
    /// countdown is reloaded with the configured interval.
    pub fn tick(&mut self) -> Option<Reminder> {
        let TimerStatus::Running {
            interval,
            remaining,
        } = &mut self.status
        else {
            return None;
        };

        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return None;
        }
        *remaining = interval.as_seconds();
        Some(Reminder {
            interval: *interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Reminder, ReminderInterval, ReminderTimer, TimerStatus};

    fn ticks_until_reminders(timer: &mut ReminderTimer, ticks: u64) -> Vec<u64> {
        (1..=ticks)
            .filter(|_| timer.tick().is_some())
            .collect::<Vec<_>>()
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!("15".parse::<ReminderInterval>().unwrap().minutes(), 15);
        assert_eq!(" 5 \n".parse::<ReminderInterval>().unwrap().as_seconds(), 300);
        assert!("".parse::<ReminderInterval>().is_err());
        assert!("abc".parse::<ReminderInterval>().is_err());
        assert!("1.5".parse::<ReminderInterval>().is_err());
        assert!("0".parse::<ReminderInterval>().is_err());
        assert!("-3".parse::<ReminderInterval>().is_err());
    }

    #[test]
    fn test_idle_timer_never_fires() {
        let mut timer = ReminderTimer::new();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert!(ticks_until_reminders(&mut timer, 500).is_empty());
    }

    #[test]
    fn test_fires_every_interval() {
        let mut timer = ReminderTimer::new();
        timer.start(ReminderInterval::from_minutes(1).unwrap());
        assert_eq!(ticks_until_reminders(&mut timer, 180), vec![60, 120, 180]);
    }

    #[test]
    fn test_resets_right_after_firing() {
        let interval = ReminderInterval::from_minutes(2).unwrap();
        let mut timer = ReminderTimer::new();
        timer.start(interval);
        for _ in 0..119 {
            assert_eq!(timer.tick(), None);
        }
        assert_eq!(timer.tick(), Some(Reminder { interval }));
        assert_eq!(
            timer.status(),
            TimerStatus::Running {
                interval,
                remaining: 120
            }
        );
    }

    #[test]
    fn test_invalid_input_keeps_timer_idle() {
        let mut timer = ReminderTimer::new();
        assert!(timer.start_from_input("soon").is_err());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_restart_resets_countdown() {
        let mut timer = ReminderTimer::new();
        timer.start_from_input("1").unwrap();
        ticks_until_reminders(&mut timer, 30);
        timer.start_from_input("1").unwrap();
        assert_eq!(ticks_until_reminders(&mut timer, 60), vec![60]);
    }

    #[test]
    fn test_stop_halts_countdown() {
        let mut timer = ReminderTimer::new();
        timer.start_from_input("1").unwrap();
        ticks_until_reminders(&mut timer, 59);
        timer.stop();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert!(ticks_until_reminders(&mut timer, 120).is_empty());
    }
}
