//! The wireless radio: its broadcast states, the control interface, and the
//! two entry points that run outside any picker session.
//!
//! - [`restore_radio`] is what the deferred alarm (or the notification's
//!   "turn on now" action) executes.
//! - [`on_radio_broadcast`] reacts to system-wide radio state changes: a
//!   freshly disabled radio should open a new session, a re-enabled one
//!   makes any pending restore pointless.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RadioError;
use crate::scheduler::{AlarmHandle, DeferredAction, DeferredActionScheduler, NotificationSurface};

/// State carried by a "radio state changed" broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioState {
    EnablingExternally,
    EnabledExternally,
    DisablingExternally,
    DisabledExternally,
}

impl RadioState {
    /// The radio is on, or on its way there.
    pub fn is_enabling(self) -> bool {
        matches!(self, RadioState::EnablingExternally | RadioState::EnabledExternally)
    }

    /// The radio is off, or on its way there.
    pub fn is_disabling(self) -> bool {
        !self.is_enabling()
    }
}

impl fmt::Display for RadioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RadioState::EnablingExternally => "enabling",
            RadioState::EnabledExternally => "enabled",
            RadioState::DisablingExternally => "disabling",
            RadioState::DisabledExternally => "disabled",
        };
        f.write_str(s)
    }
}

impl FromStr for RadioState {
    type Err = RadioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enabling" => Ok(RadioState::EnablingExternally),
            "enabled" | "on" => Ok(RadioState::EnabledExternally),
            "disabling" => Ok(RadioState::DisablingExternally),
            "disabled" | "off" => Ok(RadioState::DisabledExternally),
            other => Err(RadioError::UnknownState(other.to_string())),
        }
    }
}

/// Switches the radio on and off.
pub trait RadioControl {
    fn is_enabled(&self) -> Result<bool, RadioError>;
    fn set_enabled(&mut self, enabled: bool) -> Result<(), RadioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreOutcome {
    /// Someone already turned the radio back on.
    AlreadyEnabled,
    Restored,
}

/// Turns the radio back on unless it already is.
pub fn restore_radio(radio: &mut dyn RadioControl) -> Result<RestoreOutcome, RadioError> {
    if radio.is_enabled()? {
        tracing::debug!("radio already enabled, nothing to restore");
        return Ok(RestoreOutcome::AlreadyEnabled);
    }
    radio.set_enabled(true)?;
    tracing::info!("radio restored");
    Ok(RestoreOutcome::Restored)
}

impl DeferredAction {
    /// Executes the action against the radio.
    pub fn run(self, radio: &mut dyn RadioControl) -> Result<RestoreOutcome, RadioError> {
        match self {
            DeferredAction::RestoreRadio => restore_radio(radio),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastOutcome {
    /// The radio went off; the host should open a picker session.
    StartSession,
    /// The radio came back on; the pending restore and its indicator are gone.
    ClearedPending,
}

/// Reacts to a system-wide radio state change outside of any session.
pub fn on_radio_broadcast(
    state: RadioState,
    alarms: &mut dyn DeferredActionScheduler,
    notifications: &mut dyn NotificationSurface,
) -> BroadcastOutcome {
    if state.is_disabling() {
        tracing::info!(%state, "radio disabled, requesting a session");
        return BroadcastOutcome::StartSession;
    }
    notifications.dismiss();
    alarms.cancel(&AlarmHandle::for_action(DeferredAction::RestoreRadio));
    tracing::info!(%state, "radio enabled, cleared pending restore");
    BroadcastOutcome::ClearedPending
}
