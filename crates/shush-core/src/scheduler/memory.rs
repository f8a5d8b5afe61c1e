//! In-memory collaborators.
//!
//! Each type is a cheap handle over shared state: clone one into
//! [`Collaborators`](super::Collaborators) and keep the other to inspect what
//! the session did. Used by tests and by the CLI's dry-run session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local};

use super::collaborators::{
    AlarmHandle, DeferredAction, DeferredActionScheduler, KeyValueSettings, NotificationSurface,
    SessionHost, TimeoutCallback, TimeoutTimer, TimerHandle, TransientMessageSurface,
};
use super::session::SessionEnd;
use crate::picker::RedrawRequester;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ignores redraw requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedraw;

impl RedrawRequester for NoRedraw {
    fn request_redraw(&self) {}
}

#[derive(Debug, Default)]
struct AlarmBook {
    pending: HashMap<DeferredAction, DateTime<Local>>,
    scheduled: usize,
    cancelled: usize,
}

/// Alarms that never fire on their own.
#[derive(Debug, Clone, Default)]
pub struct MemoryAlarms {
    book: Arc<Mutex<AlarmBook>>,
}

impl MemoryAlarms {
    /// Pending alarms, earliest first.
    pub fn pending(&self) -> Vec<(DeferredAction, DateTime<Local>)> {
        let mut pending: Vec<_> = lock(&self.book)
            .pending
            .iter()
            .map(|(action, at)| (*action, *at))
            .collect();
        pending.sort_by_key(|(_, at)| *at);
        pending
    }

    pub fn scheduled_count(&self) -> usize {
        lock(&self.book).scheduled
    }

    /// Cancellations that actually removed a pending alarm.
    pub fn cancelled_count(&self) -> usize {
        lock(&self.book).cancelled
    }
}

impl DeferredActionScheduler for MemoryAlarms {
    fn schedule_one_shot(&mut self, at: DateTime<Local>, action: DeferredAction) -> AlarmHandle {
        let mut book = lock(&self.book);
        book.pending.insert(action, at);
        book.scheduled += 1;
        AlarmHandle::for_action(action)
    }

    fn cancel(&mut self, handle: &AlarmHandle) {
        let mut book = lock(&self.book);
        if book.pending.remove(&handle.action).is_some() {
            book.cancelled += 1;
        }
    }
}

#[derive(Debug, Default)]
struct NotificationTray {
    current: Option<(String, DeferredAction)>,
    shown: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryNotifications {
    tray: Arc<Mutex<NotificationTray>>,
}

impl MemoryNotifications {
    pub fn current(&self) -> Option<(String, DeferredAction)> {
        lock(&self.tray).current.clone()
    }

    pub fn shown_count(&self) -> usize {
        lock(&self.tray).shown
    }
}

impl NotificationSurface for MemoryNotifications {
    fn show(&mut self, message: &str, primary_action: DeferredAction) {
        let mut tray = lock(&self.tray);
        tray.current = Some((message.to_string(), primary_action));
        tray.shown += 1;
    }

    fn dismiss(&mut self) {
        lock(&self.tray).current = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMessages {
    shown: Arc<Mutex<Vec<String>>>,
}

impl MemoryMessages {
    pub fn shown(&self) -> Vec<String> {
        lock(&self.shown).clone()
    }
}

impl TransientMessageSurface for MemoryMessages {
    fn show(&mut self, message: &str) {
        lock(&self.shown).push(message.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    locked: bool,
    ends: Arc<Mutex<Vec<SessionEnd>>>,
}

impl MemoryHost {
    /// A host on a locked device.
    pub fn locked() -> Self {
        Self {
            locked: true,
            ..Self::default()
        }
    }

    pub fn ends(&self) -> Vec<SessionEnd> {
        lock(&self.ends).clone()
    }
}

impl SessionHost for MemoryHost {
    fn is_locked_context(&self) -> bool {
        self.locked
    }

    fn on_session_end(&mut self, end: &SessionEnd) {
        lock(&self.ends).push(end.clone());
    }
}

#[derive(Default)]
struct TimerBook {
    next_id: u64,
    pending: HashMap<u64, (Duration, TimeoutCallback)>,
}

/// Timers that fire only when told to.
#[derive(Clone, Default)]
pub struct ManualTimer {
    book: Arc<Mutex<TimerBook>>,
}

impl std::fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualTimer")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl ManualTimer {
    pub fn pending_count(&self) -> usize {
        lock(&self.book).pending.len()
    }

    /// Delays of the pending timers, shortest first.
    pub fn pending_delays(&self) -> Vec<Duration> {
        let mut delays: Vec<_> = lock(&self.book).pending.values().map(|(d, _)| *d).collect();
        delays.sort();
        delays
    }

    /// Fires every pending timer and returns how many fired.
    pub fn fire_all(&self) -> usize {
        let fired: Vec<_> = lock(&self.book).pending.drain().collect();
        let count = fired.len();
        // callbacks run outside the lock; they may start new timers
        for (_, (_, on_fire)) in fired {
            on_fire();
        }
        count
    }
}

impl TimeoutTimer for ManualTimer {
    fn start(&mut self, after: Duration, on_fire: TimeoutCallback) -> TimerHandle {
        let mut book = lock(&self.book);
        book.next_id += 1;
        let id = book.next_id;
        book.pending.insert(id, (after, on_fire));
        TimerHandle(id)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        lock(&self.book).pending.remove(&handle.0);
    }
}

#[derive(Debug, Default)]
struct SettingsBook {
    ints: HashMap<String, i64>,
    bools: HashMap<String, bool>,
    writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    book: Arc<Mutex<SettingsBook>>,
}

impl MemorySettings {
    /// Number of `set_*` calls so far.
    pub fn write_count(&self) -> usize {
        lock(&self.book).writes
    }
}

impl KeyValueSettings for MemorySettings {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        lock(&self.book).ints.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        let mut book = lock(&self.book);
        book.ints.insert(key.to_string(), value);
        book.writes += 1;
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        lock(&self.book).bools.get(key).copied().unwrap_or(default)
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        let mut book = lock(&self.book);
        book.bools.insert(key.to_string(), value);
        book.writes += 1;
    }
}
