//! Deferral scheduling for a disabled radio.
//!
//! A session is armed when the radio goes off. It owns a [`ClockPicker`](crate::picker::ClockPicker)
//! and ends in exactly one of three ways:
//! - the user confirms, scheduling a one-shot restore at the picker's end time
//! - the user cancels (or the radio comes back on by other means)
//! - nothing happens before the timeout
//!
//! The session's surroundings are passed in as [`Collaborators`]; the
//! [`memory`] module has in-memory versions of all of them.

mod collaborators;
pub mod memory;
mod message;
mod session;

pub use collaborators::{
    AlarmHandle, Collaborators, DeferredAction, DeferredActionScheduler, ExternalSignalBus,
    KeyValueSettings, NotificationSurface, RadioStateHandler, SessionHost, Subscription,
    TimeoutCallback, TimeoutTimer, TimerHandle, TransientMessageSurface,
};
pub use message::{disabled_indefinitely, disabled_until};
pub use session::{
    CancelReason, Clock, DeferralScheduler, MessageDelivery, Presentation, SessionEnd,
    SessionOptions, SessionSignal, SessionStatus, SignalSink, DEFAULT_MESSAGE_LINGER,
    DEFAULT_TIMEOUT,
};
