//! Interfaces the deferral scheduler is wired to.
//!
//! Everything outside the session itself (alarms, the radio-state broadcast,
//! notifications, toasts, persisted settings, the hosting window) is handed in
//! at construction as one of these traits. Implementations are expected to be
//! thin wrappers over the platform; the session logic lives in
//! [`DeferralScheduler`](super::DeferralScheduler).

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::session::SessionEnd;
use crate::radio::RadioState;

/// Work that can be scheduled to run later, outside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeferredAction {
    /// Turn the radio back on.
    RestoreRadio,
}

impl DeferredAction {
    /// Label of the affordance that runs this action immediately.
    pub fn label(self) -> &'static str {
        match self {
            DeferredAction::RestoreRadio => "Turn on now",
        }
    }
}

/// Identifies a scheduled alarm.
///
/// Handles are keyed by the action, so scheduling the same action again
/// replaces the earlier alarm, and a handle can be rebuilt to cancel an
/// alarm left over from an earlier session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlarmHandle {
    pub action: DeferredAction,
}

impl AlarmHandle {
    pub fn for_action(action: DeferredAction) -> Self {
        Self { action }
    }
}

/// OS-level one-shot alarms.
pub trait DeferredActionScheduler {
    fn schedule_one_shot(&mut self, at: DateTime<Local>, action: DeferredAction) -> AlarmHandle;

    /// Cancels the alarm if it is still pending; unknown handles are ignored.
    fn cancel(&mut self, handle: &AlarmHandle);
}

pub type RadioStateHandler = Box<dyn Fn(RadioState) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription(pub u64);

/// Delivers "radio state changed" broadcasts.
pub trait ExternalSignalBus {
    fn subscribe(&mut self, handler: RadioStateHandler) -> Subscription;

    /// Drops the handler. Unsubscribing twice is harmless.
    fn unsubscribe(&mut self, subscription: Subscription);
}

/// The persistent status-bar indicator.
pub trait NotificationSurface {
    /// Shows (or replaces) the indicator. `primary_action` runs when the user
    /// taps it.
    fn show(&mut self, message: &str, primary_action: DeferredAction);

    fn dismiss(&mut self);
}

/// Short-lived overlay messages (toasts).
pub trait TransientMessageSurface {
    fn show(&mut self, message: &str);
}

/// Small typed key/value store for user preferences.
pub trait KeyValueSettings {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn set_int(&mut self, key: &str, value: i64);
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn set_bool(&mut self, key: &str, value: bool);
}

/// The window or screen hosting the session.
pub trait SessionHost {
    /// Whether the device is locked; a locked host shows the picker full-screen.
    fn is_locked_context(&self) -> bool;

    /// Called exactly once, after the session is torn down.
    fn on_session_end(&mut self, end: &SessionEnd);
}

pub type TimeoutCallback = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Fire-and-forget one-shot timers.
pub trait TimeoutTimer {
    /// Runs `on_fire` once after `after` unless cancelled first. Never blocks.
    fn start(&mut self, after: Duration, on_fire: TimeoutCallback) -> TimerHandle;

    /// Cancels a pending timer. Cancelling a fired or already cancelled timer
    /// is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Everything a session needs from the outside world.
pub struct Collaborators {
    pub alarms: Box<dyn DeferredActionScheduler>,
    pub signals: Box<dyn ExternalSignalBus>,
    pub notifications: Box<dyn NotificationSurface>,
    pub messages: Box<dyn TransientMessageSurface>,
    pub settings: Box<dyn KeyValueSettings>,
    pub host: Box<dyn SessionHost>,
    pub timer: Box<dyn TimeoutTimer>,
}
