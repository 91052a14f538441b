pub mod process;
pub mod report;

use std::{env, path::PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use process::stop_running_shells;
use report::{process_daily_command, process_weekly_command, ReportCommand};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    report::render::ChartStyle,
    shell::{start_shell, ShellSettings},
    storage::{
        entities::{TaskRecord, TaskText},
        log_store::{CsvLogStore, LogStore},
    },
    timer::ReminderInterval,
    utils::{
        config::Config,
        dir::resolve_application_path,
        logging::{enable_logging, LogTarget},
        time::format_record_time,
    },
};

#[derive(Parser, Debug)]
#[command(name = "tasklog", version, long_about = None)]
#[command(about = "Log what you are working on and get reminded to do it", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Task log file. Overrides log_file from config.json"
    )]
    file: Option<PathBuf>,
    #[arg(long = "no-color", global = true, help = "Disable colored output")]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start the interactive task logger")]
    Shell {
        #[arg(
            long,
            short,
            help = "Reminder interval in minutes. Defaults to interval_minutes from config.json"
        )]
        interval: Option<String>,
        #[arg(long, help = "Start reminders immediately")]
        start: bool,
    },
    #[command(about = "Log a task")]
    Log {
        #[arg(required = true, num_args = 1.., help = "Task description")]
        text: Vec<String>,
    },
    #[command(about = "Show tasks logged today", visible_alias = "daily")]
    Today {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Show a chart of tasks logged in the past week", visible_alias = "weekly")]
    Week {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Stop running shells")]
    Stop {},
}

impl Commands {
    fn log_target(&self) -> LogTarget {
        match self {
            Commands::Shell { .. } => LogTarget::Shell,
            _ => LogTarget::Cli,
        }
    }
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = resolve_application_path(args.dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(args.commands.log_target(), &app_dir, logging_level, args.log)?;

    let config = Config::load(&app_dir)?;

    let log_path = args.file.unwrap_or_else(|| config.log_path(&app_dir));
    let style = ChartStyle {
        color: !args.no_color,
        width: config.chart_width,
    };

    match args.commands {
        Commands::Shell { interval, start } => {
            let default_interval = match interval {
                Some(interval) => parse_interval(&interval)?,
                None => config.default_interval()?,
            };
            start_shell(ShellSettings {
                log_path,
                default_interval,
                start_tracking: start,
                sound: config.sound,
                notifications: config.notifications,
                style,
            })
            .await
        }
        Commands::Log { text } => {
            let text = parse_task(&text.join(" "))?;
            let store = CsvLogStore::open(log_path).await?;
            let record = TaskRecord::new(chrono::Local::now().naive_local(), text);
            let time = record.time;
            store.append(record).await?;
            println!("Task logged at {}", format_record_time(time));
            Ok(())
        }
        Commands::Today { command } => {
            let store = CsvLogStore::open(log_path).await?;
            process_daily_command(&store, command).await
        }
        Commands::Week { command } => {
            let store = CsvLogStore::open(log_path).await?;
            process_weekly_command(&store, command, style).await
        }
        Commands::Stop {} => {
            let process_name = env::current_exe()?;
            let stopped = stop_running_shells(&process_name)?;
            info!("Stopped {stopped} shells");
            println!("Stopped {stopped} running shell(s)");
            Ok(())
        }
    }
}

fn parse_task(text: &str) -> Result<TaskText> {
    text.parse::<TaskText>().map_err(|e| {
        Args::command()
            .error(clap::error::ErrorKind::ValueValidation, e.to_string())
            .into()
    })
}

fn parse_interval(interval: &str) -> Result<ReminderInterval> {
    interval.parse::<ReminderInterval>().map_err(|e| {
        Args::command()
            .error(clap::error::ErrorKind::ValueValidation, e.to_string())
            .into()
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::utils::logging::LogTarget;

    use super::{parse_interval, parse_task, Args, Commands};

    #[test]
    fn test_cli_validation() {
        assert_eq!(&*parse_task(" a task ").unwrap(), "a task");
        assert!(parse_task("   ").is_err());
        assert_eq!(parse_interval("45").unwrap().minutes(), 45);
        assert!(parse_interval("soon").is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["tasklog", "log", "write", "the", "docs", "--no-color"]);
        assert!(args.no_color);
        assert_eq!(args.commands.log_target(), LogTarget::Cli);
        match args.commands {
            Commands::Log { text } => assert_eq!(text.join(" "), "write the docs"),
            other => panic!("Unexpected command {other:?}"),
        }

        let args = Args::parse_from(["tasklog", "--dir", "/tmp/x", "shell", "-i", "25", "--start"]);
        assert_eq!(args.commands.log_target(), LogTarget::Shell);
        match args.commands {
            Commands::Shell { interval, start } => {
                assert_eq!(interval.as_deref(), Some("25"));
                assert!(start);
            }
            other => panic!("Unexpected command {other:?}"),
        }

        assert!(Args::try_parse_from(["tasklog", "log"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
