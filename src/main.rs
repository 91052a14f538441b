use anyhow::Result;
use tracing::error;
use tasklog::{cli::run_cli, utils::runtime::multi_thread_runtime};

fn main() -> Result<()> {
    let runtime = multi_thread_runtime()?;
    let result = runtime.block_on(run_cli()).inspect_err(|e| {
        error!("Error running cli {e:?}");
    });
    // A pending stdin read would otherwise keep the process alive after quitting.
    runtime.shutdown_background();
    result
}
