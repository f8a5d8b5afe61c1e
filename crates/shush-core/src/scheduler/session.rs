//! The deferral scheduler: one picker session from arm to teardown.
//!
//! ## State Transitions
//!
//! ```text
//! Armed -> (Committed | Cancelled | TimedOut) -> Disposed
//! ```
//!
//! Four independent sources can end a session: the confirm button, the cancel
//! button, a radio-state broadcast and the timeout. Whichever is processed
//! first wins; every entry point checks the phase first and returns `None`
//! once the session has left `Armed`.
//!
//! ## Usage
//!
//! ```ignore
//! let queue = SessionQueue::new();
//! let (mut scheduler, armed) =
//!     DeferralScheduler::arm(picker, collaborators, options, Local::now(), queue.sink());
//! let events = queue.drive(&mut scheduler).await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::collaborators::{
    AlarmHandle, Collaborators, DeferredAction, Subscription, TimerHandle,
};
use super::message::{disabled_indefinitely, disabled_until};
use crate::error::SessionError;
use crate::events::Event;
use crate::picker::{ClockPicker, Color, PointerPhase, SavedPickerState, Surface};
use crate::radio::RadioState;
use crate::storage::{Config, DEFAULT_MINUTES, KEY_COLOR, KEY_MINUTES, KEY_NOTIFICATIONS_ENABLED};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MESSAGE_LINGER: Duration = Duration::from_secs(2);

/// Externally observable session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Armed,
    Committed,
    Cancelled,
    /// Nobody decided in time. Torn down exactly like a silent cancel.
    TimedOut,
}

/// How the host shows the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// A floating dialog over whatever is on screen.
    Dialog,
    /// Full screen, on top of the lock screen.
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    User,
    /// The radio came back on by other means.
    RadioEnabledExternally,
    /// Confirmed with nothing selected.
    ZeroDuration,
}

/// Where a commit's "disabled until" message went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDelivery {
    Notification,
    Transient,
}

/// Anything that can happen to an armed session. All sources are marshalled
/// into this one type so a single worker can process them in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum SessionSignal {
    Pointer { phase: PointerPhase, x: f32, y: f32 },
    Confirm,
    Cancel { show_message: bool },
    RadioStateChanged { state: RadioState },
    Timeout,
}

/// Entry into the session's queue. Callbacks handed to collaborators at arm
/// time only ever push through this; they never touch the scheduler.
pub type SignalSink = Arc<dyn Fn(SessionSignal) + Send + Sync>;

/// Wall clock used to stamp events after arm.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

fn system_clock() -> Clock {
    Arc::new(Local::now)
}

/// Per-session settings that do not live in [`KeyValueSettings`](super::KeyValueSettings).
#[derive(Clone)]
pub struct SessionOptions {
    pub timeout: Duration,
    /// How long a full-screen session keeps its final message up.
    pub message_linger: Duration,
    /// Name used in user-facing messages, e.g. "Wi-Fi".
    pub radio_name: String,
    pub use_24h_clock: bool,
    /// Selection saved by an earlier host instance of the same session.
    pub restore: Option<SavedPickerState>,
    pub clock: Clock,
}

impl std::fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOptions")
            .field("timeout", &self.timeout)
            .field("message_linger", &self.message_linger)
            .field("radio_name", &self.radio_name)
            .field("use_24h_clock", &self.use_24h_clock)
            .field("restore", &self.restore)
            .finish_non_exhaustive()
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            message_linger: DEFAULT_MESSAGE_LINGER,
            radio_name: "Wi-Fi".to_string(),
            use_24h_clock: true,
            restore: None,
            clock: system_clock(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.session.timeout_secs),
            message_linger: Duration::from_secs(config.session.message_linger_secs),
            radio_name: config.session.radio_name.clone(),
            use_24h_clock: config.ui.use_24h_clock,
            restore: None,
            clock: system_clock(),
        }
    }
}

/// Handed to [`SessionHost::on_session_end`](super::SessionHost::on_session_end)
/// once teardown is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEnd {
    pub session_id: Uuid,
    pub outcome: SessionStatus,
    pub presentation: Presentation,
    /// The message shown to the user, if any.
    pub message: Option<String>,
    /// Keep the host up this long before closing so the message stays readable.
    pub linger: Option<Duration>,
}

/// What only an armed session holds. Dropping it is what makes the picker
/// unreachable after teardown.
struct ArmedSession {
    picker: ClockPicker,
    subscription: Subscription,
    timer: TimerHandle,
}

enum Phase {
    Armed(Box<ArmedSession>),
    /// Fully torn down, remembering how the session ended.
    Disposed(SessionStatus),
}

pub struct DeferralScheduler {
    session_id: Uuid,
    armed_at: DateTime<Local>,
    timeout_deadline: DateTime<Local>,
    presentation: Presentation,
    notifications_enabled: bool,
    options: SessionOptions,
    collaborators: Collaborators,
    phase: Phase,
    end: Option<SessionEnd>,
}

impl std::fmt::Debug for DeferralScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferralScheduler")
            .field("session_id", &self.session_id)
            .field("status", &self.status())
            .field("armed_at", &self.armed_at)
            .field("presentation", &self.presentation)
            .finish_non_exhaustive()
    }
}

impl DeferralScheduler {
    /// Starts a session at `now`.
    ///
    /// Clears whatever an earlier session left behind (a pending restore and
    /// its notification), loads the persisted defaults into the picker,
    /// subscribes to radio broadcasts and starts the timeout. Both
    /// subscriptions report back through `sink`.
    pub fn arm(
        mut picker: ClockPicker,
        mut collaborators: Collaborators,
        options: SessionOptions,
        now: DateTime<Local>,
        sink: SignalSink,
    ) -> (Self, Event) {
        let session_id = Uuid::new_v4();

        collaborators
            .alarms
            .cancel(&AlarmHandle::for_action(DeferredAction::RestoreRadio));
        collaborators.notifications.dismiss();

        let presentation = if collaborators.host.is_locked_context() {
            Presentation::Fullscreen
        } else {
            Presentation::Dialog
        };

        let settings = &collaborators.settings;
        let minutes = settings
            .get_int(KEY_MINUTES, i64::from(DEFAULT_MINUTES))
            .clamp(0, i64::from(crate::geometry::MINUTES_PER_HALF_DAY));
        let color = u32::try_from(settings.get_int(KEY_COLOR, i64::from(Color::ACCENT_BLUE.0)))
            .map(Color)
            .unwrap_or(Color::ACCENT_BLUE);
        let notifications_enabled = settings.get_bool(KEY_NOTIFICATIONS_ENABLED, true);

        picker.set_start(now);
        picker.set_duration(minutes as u32);
        picker.set_color(color);
        picker.set_use_24h_clock(options.use_24h_clock);
        if let Some(saved) = options.restore {
            picker.restore(saved);
        }

        let radio_sink = sink.clone();
        let subscription = collaborators.signals.subscribe(Box::new(move |state| {
            radio_sink(SessionSignal::RadioStateChanged { state })
        }));
        let timer = collaborators
            .timer
            .start(options.timeout, Box::new(move || sink(SessionSignal::Timeout)));

        let timeout_deadline = chrono::Duration::from_std(options.timeout)
            .ok()
            .and_then(|timeout| now.checked_add_signed(timeout))
            .unwrap_or(now);

        tracing::info!(
            %session_id,
            minutes = picker.duration(),
            ?presentation,
            timeout_secs = options.timeout.as_secs(),
            "session armed"
        );

        let event = Event::SessionArmed {
            session_id,
            minutes: picker.duration(),
            starts_at: picker.start(),
            timeout_at: timeout_deadline,
            presentation,
            at: now.with_timezone(&Utc),
        };

        let scheduler = Self {
            session_id,
            armed_at: now,
            timeout_deadline,
            presentation,
            notifications_enabled,
            options,
            collaborators,
            phase: Phase::Armed(Box::new(ArmedSession {
                picker,
                subscription,
                timer,
            })),
            end: None,
        };
        (scheduler, event)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn status(&self) -> SessionStatus {
        match &self.phase {
            Phase::Armed(_) => SessionStatus::Armed,
            Phase::Disposed(outcome) => *outcome,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, Phase::Armed(_))
    }

    /// True once teardown has completed, whatever the outcome.
    pub fn is_disposed(&self) -> bool {
        matches!(self.phase, Phase::Disposed(_))
    }

    pub fn armed_at(&self) -> DateTime<Local> {
        self.armed_at
    }

    pub fn timeout_deadline(&self) -> DateTime<Local> {
        self.timeout_deadline
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// What the host was told at teardown. Hosts that cannot block inside
    /// [`SessionHost::on_session_end`](super::SessionHost::on_session_end)
    /// read the linger from here once the queue has drained.
    pub fn session_end(&self) -> Option<&SessionEnd> {
        self.end.as_ref()
    }

    /// The picker, while the session is armed.
    pub fn picker(&self) -> Option<&ClockPicker> {
        match &self.phase {
            Phase::Armed(armed) => Some(&armed.picker),
            Phase::Disposed(_) => None,
        }
    }

    pub fn picker_mut(&mut self) -> Option<&mut ClockPicker> {
        match &mut self.phase {
            Phase::Armed(armed) => Some(&mut armed.picker),
            Phase::Disposed(_) => None,
        }
    }

    // ── Signals ──────────────────────────────────────────────────────

    /// Routes one queued signal to its handler.
    pub fn dispatch(&mut self, signal: SessionSignal) -> Option<Event> {
        match signal {
            SessionSignal::Pointer { phase, x, y } => self.pointer(phase, x, y),
            SessionSignal::Confirm => self.commit(),
            SessionSignal::Cancel { show_message } => self.cancel(show_message),
            SessionSignal::RadioStateChanged { state } => self.on_external_signal(state),
            SessionSignal::Timeout => self.on_timeout(),
        }
    }

    /// Forwards a touch to the picker. Emits an event only when the selection
    /// changed.
    pub fn pointer(&mut self, phase: PointerPhase, x: f32, y: f32) -> Option<Event> {
        let Some(picker) = self.picker_mut() else {
            return self.stale("pointer");
        };
        let before = picker.duration();
        picker.handle_pointer_event(phase, x, y);
        let minutes = picker.duration();
        if minutes == before {
            return None;
        }
        let ends_at = picker.end();
        Some(Event::DurationSelected {
            session_id: self.session_id,
            minutes,
            ends_at,
            at: self.stamp(),
        })
    }

    /// Draws the picker. Returns `false` once the session is gone.
    pub fn render(&mut self, surface: &mut dyn Surface) -> bool {
        match self.picker_mut() {
            Some(picker) => {
                picker.render(surface);
                true
            }
            None => false,
        }
    }

    /// A radio-state broadcast arrived. Re-enablement by other means ends the
    /// session without a message; the state change is feedback enough.
    pub fn on_external_signal(&mut self, state: RadioState) -> Option<Event> {
        if !self.is_armed() {
            return self.stale("radio_state_changed");
        }
        if state.is_disabling() {
            tracing::debug!(session_id = %self.session_id, %state, "ignoring radio state");
            return None;
        }
        self.cancel_with(CancelReason::RadioEnabledExternally, false)
    }

    pub fn on_timeout(&mut self) -> Option<Event> {
        if !self.is_armed() {
            return self.stale("timeout");
        }
        self.finish(SessionStatus::TimedOut, None);
        tracing::info!(session_id = %self.session_id, "session timed out");
        Some(Event::SessionTimedOut {
            session_id: self.session_id,
            at: self.stamp(),
        })
    }

    /// Schedules the restore for the picker's end time and closes the session.
    ///
    /// A zero selection schedules nothing and counts as a cancel with message.
    pub fn commit(&mut self) -> Option<Event> {
        let Some(picker) = self.picker() else {
            return self.stale("commit");
        };
        let minutes = picker.duration();
        let restore_at = picker.end();
        if minutes == 0 {
            return self.cancel_with(CancelReason::ZeroDuration, true);
        }

        let collaborators = &mut self.collaborators;
        collaborators
            .alarms
            .schedule_one_shot(restore_at, DeferredAction::RestoreRadio);
        collaborators.settings.set_int(KEY_MINUTES, i64::from(minutes));

        let message = disabled_until(
            &self.options.radio_name,
            &restore_at,
            self.options.use_24h_clock,
        );
        let delivery = if self.notifications_enabled {
            collaborators
                .notifications
                .show(&message, DeferredAction::RestoreRadio);
            MessageDelivery::Notification
        } else {
            MessageDelivery::Transient
        };

        self.finish(SessionStatus::Committed, Some((message.clone(), delivery)));
        tracing::info!(session_id = %self.session_id, minutes, %restore_at, "session committed");
        Some(Event::SessionCommitted {
            session_id: self.session_id,
            minutes,
            restore_at,
            message,
            delivery,
            at: self.stamp(),
        })
    }

    /// The user dismissed the picker. With `show_message` they are told the
    /// radio stays off indefinitely.
    pub fn cancel(&mut self, show_message: bool) -> Option<Event> {
        self.cancel_with(CancelReason::User, show_message)
    }

    fn cancel_with(&mut self, reason: CancelReason, show_message: bool) -> Option<Event> {
        if !self.is_armed() {
            return self.stale("cancel");
        }
        let message = show_message.then(|| disabled_indefinitely(&self.options.radio_name));
        self.finish(
            SessionStatus::Cancelled,
            message.clone().map(|m| (m, MessageDelivery::Transient)),
        );
        tracing::info!(session_id = %self.session_id, ?reason, "session cancelled");
        Some(Event::SessionCancelled {
            session_id: self.session_id,
            reason,
            message,
            at: self.stamp(),
        })
    }

    fn stamp(&self) -> DateTime<Utc> {
        (self.options.clock)().with_timezone(&Utc)
    }

    // ── Teardown ─────────────────────────────────────────────────────

    fn finish(&mut self, outcome: SessionStatus, message: Option<(String, MessageDelivery)>) {
        self.disarm(outcome);

        if let Some((text, MessageDelivery::Transient)) = &message {
            self.collaborators.messages.show(text);
        }
        let linger = match (self.presentation, &message) {
            (Presentation::Fullscreen, Some(_)) => Some(self.options.message_linger),
            _ => None,
        };
        let end = SessionEnd {
            session_id: self.session_id,
            outcome,
            presentation: self.presentation,
            message: message.map(|(text, _)| text),
            linger,
        };
        self.collaborators.host.on_session_end(&end);
        self.end = Some(end);
    }

    /// Detaches from the signal bus, stops the timeout and drops the picker.
    /// Calling it on a disposed session changes nothing.
    fn disarm(&mut self, outcome: SessionStatus) {
        let Phase::Armed(_) = self.phase else {
            return;
        };
        if let Phase::Armed(armed) = std::mem::replace(&mut self.phase, Phase::Disposed(outcome)) {
            let ArmedSession {
                picker,
                subscription,
                timer,
            } = *armed;
            self.collaborators.signals.unsubscribe(subscription);
            self.collaborators.timer.cancel(timer);
            drop(picker);
        }
    }

    fn stale(&self, operation: &'static str) -> Option<Event> {
        let err = SessionError::StaleSession {
            session_id: self.session_id,
        };
        tracing::debug!(operation, status = ?self.status(), "{err}");
        None
    }
}
