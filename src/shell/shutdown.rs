use anyhow::Result;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Cancels `cancelation` on Ctrl-C or, on unix, SIGTERM (which is what `tasklog stop` sends).
/// Returns as soon as the token gets cancelled from elsewhere.
pub async fn detect_shutdown(cancelation: CancellationToken) -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        select! {
            _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C"),
            _ = terminate.recv() => info!("Received SIGTERM"),
            _ = cancelation.cancelled() => return Ok(()),
        };
    }
    #[cfg(not(unix))]
    {
        select! {
            _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C"),
            _ = cancelation.cancelled() => return Ok(()),
        };
    }
    cancelation.cancel();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use tokio_util::sync::CancellationToken;

    use super::detect_shutdown;

    #[tokio::test]
    async fn test_returns_when_cancelled_elsewhere() -> Result<()> {
        let token = CancellationToken::new();
        let detector = tokio::spawn(detect_shutdown(token.clone()));

        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), detector).await???;
        assert!(token.is_cancelled());
        Ok(())
    }
}
