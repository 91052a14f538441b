/// A line of user input turned into an action. Arguments are kept raw, validation happens when the
/// command is executed so that errors can be reported the same way as for the one-shot CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Start tracking. Without an argument the configured interval is used.
    Start(Option<String>),
    Stop,
    Save(String),
    Daily,
    Weekly,
    Status,
    Help,
    Quit,
    Unknown(String),
}

/// Messages consumed by the shell loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Command(ShellCommand),
    Tick,
    InputClosed,
}

pub const HELP: &str = "\
Commands:
  start [MINUTES]   remind to log a task every MINUTES (default from config)
  stop              stop reminders
  save TEXT         log a task (alias: log)
  today             tasks logged today (alias: daily)
  week              tasks per day for the past week (alias: weekly)
  status            show reminder state
  help              show this message
  quit              exit (alias: exit)";

impl ShellCommand {
    /// Returns [None] for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let command = match verb.to_lowercase().as_str() {
            "start" if rest.is_empty() => ShellCommand::Start(None),
            "start" => ShellCommand::Start(Some(rest.to_string())),
            "stop" => ShellCommand::Stop,
            "save" | "log" => ShellCommand::Save(rest.to_string()),
            "today" | "daily" => ShellCommand::Daily,
            "week" | "weekly" => ShellCommand::Weekly,
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            _ => ShellCommand::Unknown(verb.to_string()),
        };
        Some(command)
    }
}
