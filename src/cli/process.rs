use std::{ffi::OsStr, path::Path};

use anyhow::{anyhow, Result};
use sysinfo::{get_current_pid, Signal, System};
use tracing::info;

/// Name of the subcommand that runs the interactive shell. Used to tell shells apart from
/// short-lived invocations of the same executable.
pub const SHELL_SUBCOMMAND: &str = "shell";

/// Asks every running `tasklog shell` started from `name` to terminate. Shells treat SIGTERM like
/// `quit`. Where terminating isn't supported the process is killed. Returns the number of shells
/// that were stopped.
pub fn stop_running_shells(name: &Path) -> Result<usize> {
    let system = System::new_all();
    let current_id = get_current_pid().map_err(|e| anyhow!("Can't get current pid: {e}"))?;
    let mut stopped = 0;
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }

        let same_executable = process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some();
        let is_shell = process
            .cmd()
            .iter()
            .any(|arg| arg.as_os_str() == OsStr::new(SHELL_SUBCOMMAND));

        if same_executable && is_shell {
            info!("Stopping shell {pid}");
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
            stopped += 1;
        }
    }
    Ok(stopped)
}
