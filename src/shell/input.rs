use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::mpsc,
};
use tokio_stream::{wrappers::SplitStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::command::{ShellCommand, ShellEvent};

/// Reads user input line by line and forwards it to the shell as [ShellEvent]s.
pub struct InputModule<R> {
    reader: R,
    next: mpsc::Sender<ShellEvent>,
    shutdown: CancellationToken,
}

impl<R: AsyncRead + Unpin> InputModule<R> {
    pub fn new(reader: R, next: mpsc::Sender<ShellEvent>, shutdown: CancellationToken) -> Self {
        Self {
            reader,
            next,
            shutdown,
        }
    }

    /// End of input is reported as [ShellEvent::InputClosed] so that commands sent before it are
    /// still handled. Only a read failure cancels the shutdown token directly. Lines that aren't
    /// valid UTF-8 are decoded lossily.
    pub async fn run(self) -> Result<()> {
        let mut lines = SplitStream::new(BufReader::new(self.reader).split(b'\n'));
        loop {
            let line = tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                line = lines.next() => line,
            };

            let event = match line {
                Some(Ok(line)) => match ShellCommand::parse(&decode_line(&line)) {
                    Some(command) => ShellEvent::Command(command),
                    None => continue,
                },
                Some(Err(e)) => {
                    self.shutdown.cancel();
                    return Err(e.into());
                }
                None => {
                    info!("Input closed");
                    ShellEvent::InputClosed
                }
            };

            debug!("Sending {event:?}");
            let closed = event == ShellEvent::InputClosed;
            if self.next.send(event).await.is_err() || closed {
                return Ok(());
            }
        }
    }
}

fn decode_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    match std::str::from_utf8(line) {
        Ok(line) => line.to_string(),
        Err(e) => {
            warn!("Input line is not valid UTF-8 {e}");
            String::from_utf8_lossy(line).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::shell::command::{ShellCommand, ShellEvent};

    use super::InputModule;

    #[tokio::test]
    async fn test_lines_become_events() -> Result<()> {
        let input: &[u8] = b"start 5\n\n   \nsave write docs\nquit\n";
        let (sender, mut receiver) = mpsc::channel(10);
        InputModule::new(input, sender, CancellationToken::new())
            .run()
            .await?;

        let mut events = vec![];
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                ShellEvent::Command(ShellCommand::Start(Some("5".into()))),
                ShellEvent::Command(ShellCommand::Save("write docs".into())),
                ShellEvent::Command(ShellCommand::Quit),
                ShellEvent::InputClosed,
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_keeps_reading() -> Result<()> {
        let input: &[u8] = b"save caf\xe9\r\nsave after\n";
        let (sender, mut receiver) = mpsc::channel(10);
        let shutdown = CancellationToken::new();
        InputModule::new(input, sender, shutdown.clone())
            .run()
            .await?;

        let mut events = vec![];
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
        assert!(!shutdown.is_cancelled());
        assert_eq!(
            events,
            vec![
                ShellEvent::Command(ShellCommand::Save("caf\u{FFFD}".into())),
                ShellEvent::Command(ShellCommand::Save("after".into())),
                ShellEvent::InputClosed,
            ]
        );
        Ok(())
    }
}
