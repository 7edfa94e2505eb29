//! User settings.
//!
//! Persisted as the flat `pomodoroSettings` record in the string-keyed
//! store (camelCase field names, matching the data the original front end
//! wrote). Settings only change through the engine's commit boundary,
//! which validates the draft and resets the timer.

use serde::{Deserialize, Serialize};

use crate::activity::Mode;
use crate::error::ValidationError;

/// Timer durations and behavior toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Label given to work activities.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Start the next interval immediately when one finishes.
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Completed work intervals per long break. Zero disables long breaks.
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

fn default_title() -> String {
    "Work".into()
}
fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: default_title(),
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            auto_start: false,
            notifications: true,
            sound: true,
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Settings {
    /// Target duration of one interval of `mode`, in whole seconds.
    pub fn duration_secs(&self, mode: Mode) -> i64 {
        let minutes = match mode {
            Mode::Work => self.work_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        };
        i64::from(minutes) * 60
    }

    /// Label for an activity in `mode`; only work intervals carry one.
    pub fn title_for(&self, mode: Mode) -> Option<String> {
        mode.is_work().then(|| self.title.clone())
    }

    /// Commit-boundary validation. Rejects drafts a timer cannot run with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, minutes) in [
            ("workMinutes", self.work_minutes),
            ("shortBreakMinutes", self.short_break_minutes),
            ("longBreakMinutes", self.long_break_minutes),
        ] {
            if minutes == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "duration must be at least one minute".into(),
                });
            }
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "title must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Get a settings value as a string by its camelCase field name.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by its camelCase field name, parsing the string
    /// against the field's existing type. The result is a draft: callers
    /// still have to pass it through the engine's commit boundary.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        let mut json = serde_json::to_value(&*self).map_err(|_| unknown(key))?;
        let obj = json.as_object_mut().ok_or_else(|| unknown(key))?;
        let existing = obj.get(key).ok_or_else(|| unknown(key))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => {
                let parsed = value.parse::<bool>().map_err(|_| ValidationError::InvalidValue {
                    field: key.into(),
                    message: format!("cannot parse '{value}' as bool"),
                })?;
                serde_json::Value::Bool(parsed)
            }
            serde_json::Value::Number(_) => {
                let parsed = value.parse::<u64>().map_err(|_| ValidationError::InvalidValue {
                    field: key.into(),
                    message: format!("cannot parse '{value}' as number"),
                })?;
                serde_json::Value::Number(parsed.into())
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(key.to_string(), new_value);
        *self = serde_json::from_value(json).map_err(|e| ValidationError::InvalidValue {
            field: key.into(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn unknown(key: &str) -> ValidationError {
    ValidationError::UnknownKey(key.into())
}
