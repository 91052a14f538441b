//! Interactive front end. The shell is a single loop consuming [ShellEvent]s from three producers:
//!  - [input::InputModule] turns stdin lines into commands.
//!  - [ticker::TickerModule] emits a tick every second.
//!  - [shutdown::detect_shutdown] reacts to Ctrl-C and SIGTERM.
//!
//! Only the loop touches the reminder timer and the log store. Every way of quitting ends up
//! cancelling the same [CancellationToken], which all producers observe.

pub mod alert;
pub mod command;
pub mod input;
pub mod shutdown;
pub mod ticker;

use std::{io::Write, path::PathBuf, time::Duration};

use alert::{Alerter, DesktopAlerter};
use ansi_term::Colour;
use anyhow::Result;
use command::{ShellCommand, ShellEvent, HELP};
use input::InputModule;
use ticker::TickerModule;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    report::{
        daily_summary,
        render::{render_daily, render_weekly, ChartStyle},
        weekly_counts,
    },
    storage::{
        entities::{TaskRecord, TaskText},
        log_store::{CsvLogStore, LogStore},
    },
    timer::{Reminder, ReminderInterval, ReminderTimer},
    utils::{
        clock::{Clock, DefaultClock},
        time::format_record_time,
    },
};

const TICK_FREQUENCY: Duration = Duration::from_secs(1);

/// Everything needed to assemble a shell. Produced by the CLI from config and flags.
#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub log_path: PathBuf,
    pub default_interval: ReminderInterval,
    /// Start reminders right away instead of waiting for `start`.
    pub start_tracking: bool,
    pub sound: bool,
    pub notifications: bool,
    pub style: ChartStyle,
}

/// Represents the starting point for the interactive shell.
pub async fn start_shell(settings: ShellSettings) -> Result<()> {
    let store = CsvLogStore::open(settings.log_path.clone()).await?;
    info!("Using task log {:?}", store.path());

    let (sender, receiver) = mpsc::channel::<ShellEvent>(16);
    let shutdown_token = CancellationToken::new();

    if settings.start_tracking {
        sender
            .send(ShellEvent::Command(ShellCommand::Start(None)))
            .await?;
    }

    let ticker = create_ticker(sender.clone(), &shutdown_token, DefaultClock);
    let input = InputModule::new(tokio::io::stdin(), sender, shutdown_token.clone());
    let shell = TaskShell::new(
        store,
        Box::new(DesktopAlerter::new(settings.sound, settings.notifications)),
        Box::new(DefaultClock),
        std::io::stdout(),
        &settings,
        shutdown_token.clone(),
    );

    let (signal_result, ticker_result, input_result, shell_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        ticker.run(),
        input.run(),
        shell.run(receiver),
    );

    if let Err(e) = signal_result {
        error!("Signal handling got an error {e:?}");
    }

    if let Err(e) = ticker_result {
        error!("Ticker got an error {e:?}");
    }

    if let Err(e) = input_result {
        error!("Input module got an error {e:?}");
    }

    shell_result.inspect_err(|e| error!("Shell got an error {e:?}"))
}

fn create_ticker(
    sender: mpsc::Sender<ShellEvent>,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> TickerModule {
    TickerModule::new(
        sender,
        shutdown_token.clone(),
        TICK_FREQUENCY,
        Box::new(clock),
    )
}

#[derive(Debug, Clone, Copy)]
enum DialogKind {
    Info,
    Warning,
    Error,
}

/// Owner of all mutable state: the reminder timer and the log store handle.
pub struct TaskShell<S: LogStore, W: Write> {
    store: S,
    timer: ReminderTimer,
    alerter: Box<dyn Alerter>,
    clock: Box<dyn Clock>,
    out: W,
    default_interval: ReminderInterval,
    style: ChartStyle,
    shutdown: CancellationToken,
}

impl<S: LogStore, W: Write> TaskShell<S, W> {
    pub fn new(
        store: S,
        alerter: Box<dyn Alerter>,
        clock: Box<dyn Clock>,
        out: W,
        settings: &ShellSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            timer: ReminderTimer::new(),
            alerter,
            clock,
            out,
            default_interval: settings.default_interval,
            style: settings.style,
            shutdown,
        }
    }

    /// Executes the shell event loop. Returns once the shutdown token is cancelled, every sender
    /// is gone or handling an event fails.
    pub async fn run(mut self, mut events: mpsc::Receiver<ShellEvent>) -> Result<()> {
        let _guard = self.shutdown.clone().drop_guard();
        writeln!(self.out, "Task Logger. Type 'help' for the list of commands.")?;
        self.out.flush()?;

        loop {
            let event = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                event = events.recv() => event,
            };
            let Some(event) = event else {
                break;
            };
            self.handle(event).await?;
            self.out.flush()?;
        }

        self.timer.stop();
        info!("Shell stopped");
        Ok(())
    }

    async fn handle(&mut self, event: ShellEvent) -> Result<()> {
        match event {
            ShellEvent::Tick => {
                if let Some(reminder) = self.timer.tick() {
                    self.remind(reminder)?;
                }
                Ok(())
            }
            ShellEvent::InputClosed => {
                self.shutdown.cancel();
                Ok(())
            }
            ShellEvent::Command(command) => self.execute(command).await,
        }
    }

    #[instrument(skip(self))]
    async fn execute(&mut self, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::Start(input) => self.start_tracking(input),
            ShellCommand::Stop => {
                let message = if self.timer.is_running() {
                    "Reminders are off."
                } else {
                    "Reminders were not running."
                };
                self.timer.stop();
                self.dialog(DialogKind::Info, "Tracking Stopped", message)
            }
            ShellCommand::Save(text) => self.save_task(&text).await,
            ShellCommand::Daily => self.show_daily_stats().await,
            ShellCommand::Weekly => self.show_weekly_graph().await,
            ShellCommand::Status => {
                writeln!(self.out, "Tracking: {}", self.timer.status())?;
                Ok(())
            }
            ShellCommand::Help => {
                writeln!(self.out, "{HELP}")?;
                Ok(())
            }
            ShellCommand::Quit => {
                info!("Quit requested");
                self.shutdown.cancel();
                Ok(())
            }
            ShellCommand::Unknown(verb) => self.dialog(
                DialogKind::Warning,
                "Unknown Command",
                &format!("'{verb}' is not a command. Type 'help' for the list of commands."),
            ),
        }
    }

    fn start_tracking(&mut self, input: Option<String>) -> Result<()> {
        let interval = match input {
            Some(input) => match self.timer.start_from_input(&input) {
                Ok(interval) => interval,
                Err(e) => {
                    warn!("Rejected interval {input:?}");
                    return self.dialog(DialogKind::Error, "Invalid Input", &e.to_string());
                }
            },
            None => {
                self.timer.start(self.default_interval);
                self.default_interval
            }
        };
        info!("Tracking started with interval {interval}");
        self.dialog(
            DialogKind::Info,
            "Tracking Started",
            &format!("Reminders set for every {interval}."),
        )
    }

    async fn save_task(&mut self, text: &str) -> Result<()> {
        let text = match text.parse::<TaskText>() {
            Ok(text) => text,
            Err(e) => return self.dialog(DialogKind::Warning, "Empty Input", &e.to_string()),
        };
        let record = TaskRecord::new(self.clock.time().naive_local(), text);
        let time = record.time;
        self.store.append(record).await?;
        self.dialog(
            DialogKind::Info,
            "Task Saved",
            &format!("Task logged at {}", format_record_time(time)),
        )
    }

    async fn show_daily_stats(&mut self) -> Result<()> {
        let records = self.store.read_all().await?;
        let summary = daily_summary(&records, self.clock.time().date_naive());
        write!(self.out, "{}", render_daily(&summary))?;
        Ok(())
    }

    async fn show_weekly_graph(&mut self) -> Result<()> {
        let records = self.store.read_all().await?;
        let counts = weekly_counts(&records, self.clock.time().date_naive());
        debug!("{} tasks in the past week", counts.total());
        write!(self.out, "{}", render_weekly(&counts, &self.style))?;
        Ok(())
    }

    /// Visual part of the reminder goes to the shell output, the rest is up to the [Alerter].
    fn remind(&mut self, reminder: Reminder) -> Result<()> {
        info!("Reminder fired");
        self.dialog(DialogKind::Warning, reminder.title(), reminder.message())?;
        if let Err(e) = self.alerter.alert(&reminder) {
            error!("Failed to alert {e:?}");
        }
        Ok(())
    }

    fn dialog(&mut self, kind: DialogKind, title: &str, message: &str) -> Result<()> {
        let title = if self.style.color {
            let colour = match kind {
                DialogKind::Info => Colour::Green,
                DialogKind::Warning => Colour::Yellow,
                DialogKind::Error => Colour::Red,
            };
            colour.bold().paint(title).to_string()
        } else {
            title.to_string()
        };
        writeln!(self.out, "{title}: {message}")?;
        Ok(())
    }
}
