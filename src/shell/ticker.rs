use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::utils::clock::Clock;

use super::command::ShellEvent;

/// Sends [ShellEvent::Tick] on a fixed schedule. Ticks are aligned to the start instant, so a slow
/// shell doesn't make the schedule drift.
pub struct TickerModule {
    next: mpsc::Sender<ShellEvent>,
    shutdown: CancellationToken,
    frequency: Duration,
    time_provider: Box<dyn Clock>,
}

impl TickerModule {
    pub fn new(
        next: mpsc::Sender<ShellEvent>,
        shutdown: CancellationToken,
        frequency: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            shutdown,
            frequency,
            time_provider,
        }
    }

    /// Executes the ticker event loop.
    pub async fn run(self) -> Result<()> {
        let _guard = self.shutdown.clone().drop_guard();
        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.frequency;

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(tick_point) => ()
            }

            trace!("Tick");
            if self.next.send(ShellEvent::Tick).await.is_err() {
                debug!("Shell is gone, stopping ticker");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use chrono::NaiveDate;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::{
        shell::command::ShellEvent,
        utils::{clock::FixedClock, logging::TEST_LOGGING},
    };

    use super::TickerModule;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_second_until_cancelled() -> Result<()> {
        *TEST_LOGGING;
        let (sender, mut receiver) = mpsc::channel(100);
        let shutdown = CancellationToken::new();
        let ticker = TickerModule::new(
            sender,
            shutdown.clone(),
            Duration::from_secs(1),
            Box::new(FixedClock::at(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), 12, 0)),
        );

        let (result, _) = tokio::join!(ticker.run(), async {
            tokio::time::sleep(Duration::from_millis(5500)).await;
            shutdown.cancel();
        });
        result?;

        let mut ticks = 0;
        while let Some(event) = receiver.recv().await {
            assert_eq!(event, ShellEvent::Tick);
            ticks += 1;
        }
        assert_eq!(ticks, 5);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_receiver_dropped() -> Result<()> {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let shutdown = CancellationToken::new();
        let ticker = TickerModule::new(
            sender,
            shutdown.clone(),
            Duration::from_secs(1),
            Box::new(FixedClock::at(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), 12, 0)),
        );

        ticker.run().await?;
        assert!(shutdown.is_cancelled());
        Ok(())
    }
}
