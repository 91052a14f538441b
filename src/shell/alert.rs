use std::io::Write;

use anyhow::Result;
use notify_rust::{Notification, Timeout};
use tracing::{debug, warn};

use crate::timer::Reminder;

const NOTIFICATION_TIMEOUT_MS: u32 = 10_000;

/// Side effects of an elapsed reminder that live outside the shell output.
#[cfg_attr(test, mockall::automock)]
pub trait Alerter {
    fn alert(&mut self, reminder: &Reminder) -> Result<()>;
}

/// Rings the terminal bell, plays a system sound when a player is available and shows a desktop
/// notification.
pub struct DesktopAlerter {
    sound: bool,
    notifications: bool,
}

impl DesktopAlerter {
    pub fn new(sound: bool, notifications: bool) -> Self {
        Self {
            sound,
            notifications,
        }
    }
}

impl Alerter for DesktopAlerter {
    fn alert(&mut self, reminder: &Reminder) -> Result<()> {
        if self.sound {
            let mut stdout = std::io::stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
            play_sound();
        }

        if self.notifications {
            if let Err(e) = Notification::new()
                .summary(reminder.title())
                .body(reminder.message())
                .appname(env!("CARGO_PKG_NAME"))
                .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
                .show()
            {
                warn!("Failed to show notification {e:?}");
            }
        }
        Ok(())
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "macos")] {
        const SOUND_PLAYERS: &[(&str, &str)] = &[("afplay", "/System/Library/Sounds/Glass.aiff")];
    } else if #[cfg(unix)] {
        const SOUND_PLAYERS: &[(&str, &str)] = &[
            ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
            ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
        ];
    } else {
        const SOUND_PLAYERS: &[(&str, &str)] = &[];
    }
}

/// Tries the first sound player that exists on this platform. Errors are only logged, the bell
/// has already been rung. Has to be called from within the tokio runtime.
fn play_sound() {
    let Some((player, sound)) = SOUND_PLAYERS
        .iter()
        .find(|(_, sound)| std::path::Path::new(sound).exists())
    else {
        debug!("No sound file available");
        return;
    };

    // Dropped tokio children are reaped by the runtime once they exit.
    let spawned = tokio::process::Command::new(player)
        .arg(sound)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
    if let Err(e) = spawned {
        debug!("Failed to run {player} {e:?}");
    }
}
