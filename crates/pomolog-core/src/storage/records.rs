//! Persisted records and their keys.
//!
//! Three records come from the original front end and keep its
//! localStorage keys so existing data stays readable: settings,
//! activities, and the legacy sessions array (read-only, never written).
//! The fourth record is the engine's runtime snapshot, which lets
//! separate CLI invocations share one timer.
//!
//! Loads never fail: a missing or corrupt record logs a warning and falls
//! back to the default. Saves return errors for the caller to log and
//! swallow; a failed write must not disturb in-memory state.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::settings::Settings;
use super::store::KvStore;
use crate::activity::ActivityLedger;
use crate::error::StorageError;
use crate::timer::TimerEngine;

pub const SETTINGS_KEY: &str = "pomodoroSettings";
pub const ACTIVITIES_KEY: &str = "pomodoroActivities";
pub const LEGACY_SESSIONS_KEY: &str = "pomodoroSessions";
pub const TIMER_KEY: &str = "timerState";

/// Entry of the legacy sessions array. Retained for backward
/// compatibility only; current logic never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySession {
    pub date: DateTime<Utc>,
    pub pomodoros: u32,
}

fn load_or<T: DeserializeOwned>(store: &dyn KvStore, key: &str, fallback: impl FnOnce() -> T) -> T {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("corrupt record '{key}', falling back to default: {e}");
                fallback()
            }
        },
        Ok(None) => fallback(),
        Err(e) => {
            log::warn!("could not read record '{key}', falling back to default: {e}");
            fallback()
        }
    }
}

fn save<T: Serialize>(store: &mut dyn KvStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

pub fn load_settings(store: &dyn KvStore) -> Settings {
    load_or(store, SETTINGS_KEY, Settings::default)
}

pub fn save_settings(store: &mut dyn KvStore, settings: &Settings) -> Result<(), StorageError> {
    save(store, SETTINGS_KEY, settings)
}

pub fn load_ledger(store: &dyn KvStore) -> ActivityLedger {
    load_or(store, ACTIVITIES_KEY, ActivityLedger::new)
}

pub fn save_ledger(store: &mut dyn KvStore, ledger: &ActivityLedger) -> Result<(), StorageError> {
    save(store, ACTIVITIES_KEY, ledger)
}

/// Engine runtime snapshot; `None` when absent or unreadable.
pub fn load_timer(store: &dyn KvStore) -> Option<TimerEngine> {
    load_or(store, TIMER_KEY, || None)
}

pub fn save_timer(store: &mut dyn KvStore, engine: &TimerEngine) -> Result<(), StorageError> {
    save(store, TIMER_KEY, engine)
}

pub fn load_legacy_sessions(store: &dyn KvStore) -> Vec<LegacySession> {
    load_or(store, LEGACY_SESSIONS_KEY, Vec::new)
}
