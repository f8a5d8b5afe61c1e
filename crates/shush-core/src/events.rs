use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::radio::{BroadcastOutcome, RadioState, RestoreOutcome};
use crate::scheduler::{CancelReason, MessageDelivery, Presentation};

/// Every state change in the system produces an Event.
/// Hosts log or display them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionArmed {
        session_id: Uuid,
        minutes: u32,
        starts_at: DateTime<Local>,
        timeout_at: DateTime<Local>,
        presentation: Presentation,
        at: DateTime<Utc>,
    },
    /// The picker's selection changed.
    DurationSelected {
        session_id: Uuid,
        minutes: u32,
        ends_at: DateTime<Local>,
        at: DateTime<Utc>,
    },
    /// A restore was scheduled and the session closed.
    SessionCommitted {
        session_id: Uuid,
        minutes: u32,
        restore_at: DateTime<Local>,
        message: String,
        delivery: MessageDelivery,
        at: DateTime<Utc>,
    },
    SessionCancelled {
        session_id: Uuid,
        reason: CancelReason,
        message: Option<String>,
        at: DateTime<Utc>,
    },
    /// Nobody acted within the session timeout.
    SessionTimedOut {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    RadioBroadcast {
        state: RadioState,
        outcome: BroadcastOutcome,
        at: DateTime<Utc>,
    },
    RadioRestored {
        outcome: RestoreOutcome,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Session this event belongs to, if any.
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            Event::SessionArmed { session_id, .. }
            | Event::DurationSelected { session_id, .. }
            | Event::SessionCommitted { session_id, .. }
            | Event::SessionCancelled { session_id, .. }
            | Event::SessionTimedOut { session_id, .. } => Some(*session_id),
            Event::RadioBroadcast { .. } | Event::RadioRestored { .. } => None,
        }
    }

    /// Whether this event ends a session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::SessionCommitted { .. }
                | Event::SessionCancelled { .. }
                | Event::SessionTimedOut { .. }
        )
    }
}
