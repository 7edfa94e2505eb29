//! Notification and sound collaborators.
//!
//! The core never talks to an OS notification center or an audio device;
//! it calls these traits and lets the embedding application decide what
//! they mean. Denied permission and playback failures degrade silently.

use crate::activity::Mode;
use crate::storage::Settings;

/// Outcome of a notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Delivers completion notifications.
pub trait Notifier {
    fn request_permission(&mut self) -> Permission;
    fn notify(&mut self, message: &str);
}

/// Plays the completion cue. Fire-and-forget; implementations swallow
/// playback failures.
pub trait SoundPlayer {
    fn play_cue(&mut self);
}

/// Notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn request_permission(&mut self) -> Permission {
        Permission::Denied
    }

    fn notify(&mut self, _message: &str) {}
}

/// Sound player that stays silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play_cue(&mut self) {}
}

/// Announce a finished interval through the collaborators, honoring the
/// user's settings. Called once per completed activity.
pub fn announce_completion(
    settings: &Settings,
    finished: Mode,
    notifier: &mut dyn Notifier,
    sound: &mut dyn SoundPlayer,
) {
    if settings.notifications && notifier.request_permission() == Permission::Granted {
        notifier.notify(&format!("{finished} finished!"));
    }
    if settings.sound {
        sound.play_cue();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        permission: bool,
        asked: u32,
        messages: Vec<String>,
        cues: u32,
    }

    impl Notifier for Recorder {
        fn request_permission(&mut self) -> Permission {
            self.asked += 1;
            if self.permission {
                Permission::Granted
            } else {
                Permission::Denied
            }
        }

        fn notify(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    impl SoundPlayer for Recorder {
        fn play_cue(&mut self) {
            self.cues += 1;
        }
    }

    #[test]
    fn announces_when_granted() {
        let settings = Settings::default();
        let mut notifier = Recorder { permission: true, ..Default::default() };
        let mut sound = Recorder::default();
        announce_completion(&settings, Mode::Work, &mut notifier, &mut sound);
        assert_eq!(notifier.messages, vec!["Work finished!"]);
        assert_eq!(sound.cues, 1);
    }

    #[test]
    fn denied_permission_degrades_silently() {
        let settings = Settings::default();
        let mut notifier = Recorder::default();
        let mut sound = Recorder::default();
        announce_completion(&settings, Mode::ShortBreak, &mut notifier, &mut sound);
        assert_eq!(notifier.asked, 1);
        assert!(notifier.messages.is_empty());
        assert_eq!(sound.cues, 1);
    }

    #[test]
    fn disabled_settings_skip_the_collaborators() {
        let mut settings = Settings::default();
        settings.notifications = false;
        settings.sound = false;
        let mut notifier = Recorder { permission: true, ..Default::default() };
        let mut sound = Recorder::default();
        announce_completion(&settings, Mode::LongBreak, &mut notifier, &mut sound);
        assert_eq!(notifier.asked, 0);
        assert!(notifier.messages.is_empty());
        assert_eq!(sound.cues, 0);
    }
}
