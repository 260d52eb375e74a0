//! The boundary notifications leave the engine through.

use crate::scheduler::Notification;

/// The notification sound could not be played.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("notification sound unavailable: {0}")]
pub struct SoundError(String);

impl SoundError {
    /// Creates an error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Displays notifications and plays the notification sound.
pub trait Notifier {
    /// Shows a popup for the notification.
    fn popup(&mut self, notification: &Notification);

    /// Plays the notification sound.
    ///
    /// # Errors
    ///
    /// Returns an error if no audio channel is available. The scheduler
    /// ignores it.
    fn play_sound(&mut self) -> Result<(), SoundError>;
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn popup(&mut self, notification: &Notification) {
        (**self).popup(notification);
    }

    fn play_sound(&mut self) -> Result<(), SoundError> {
        (**self).play_sound()
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn popup(&mut self, notification: &Notification) {
        (**self).popup(notification);
    }

    fn play_sound(&mut self) -> Result<(), SoundError> {
        (**self).play_sound()
    }
}

/// Keeps every popup in memory and counts sounds.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    popups: Vec<Notification>,
    sounds: usize,
    muted: bool,
}

impl RecordingNotifier {
    /// Creates a notifier with a working sound channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier whose sound channel always fails.
    #[must_use]
    pub fn muted() -> Self {
        Self {
            muted: true,
            ..Self::default()
        }
    }

    /// Popups shown so far, oldest first.
    #[must_use]
    pub fn popups(&self) -> &[Notification] {
        &self.popups
    }

    /// Number of sounds successfully played.
    #[must_use]
    pub const fn sounds(&self) -> usize {
        self.sounds
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.popups.clear();
        self.sounds = 0;
    }
}

impl Notifier for RecordingNotifier {
    fn popup(&mut self, notification: &Notification) {
        self.popups.push(notification.clone());
    }

    fn play_sound(&mut self) -> Result<(), SoundError> {
        if self.muted {
            return Err(SoundError::new("muted"));
        }
        self.sounds += 1;
        Ok(())
    }
}
