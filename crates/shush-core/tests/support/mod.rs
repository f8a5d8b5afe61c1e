//! Shared wiring for session tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use shush_core::scheduler::memory::{
    ManualTimer, MemoryAlarms, MemoryHost, MemoryMessages, MemoryNotifications, MemorySettings,
    NoRedraw,
};
use shush_core::scheduler::{Collaborators, KeyValueSettings, TimeoutTimer};
use shush_core::storage::KEY_MINUTES;
use shush_core::{ClockPicker, LocalSignalBus};

pub fn ten_am() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

pub fn picker() -> ClockPicker {
    ClockPicker::new(ten_am(), Arc::new(NoRedraw))
}

/// Handles onto every in-memory collaborator a session was given.
#[derive(Clone, Default)]
pub struct World {
    pub alarms: MemoryAlarms,
    pub signals: LocalSignalBus,
    pub notifications: MemoryNotifications,
    pub messages: MemoryMessages,
    pub settings: MemorySettings,
    pub host: MemoryHost,
    pub timer: ManualTimer,
}

impl World {
    pub fn with_minutes(minutes: i64) -> Self {
        let world = Self::default();
        world.settings.clone().set_int(KEY_MINUTES, minutes);
        world
    }

    pub fn collaborators(&self) -> Collaborators {
        self.collaborators_with_timer(Box::new(self.timer.clone()))
    }

    pub fn collaborators_with_timer(&self, timer: Box<dyn TimeoutTimer>) -> Collaborators {
        Collaborators {
            alarms: Box::new(self.alarms.clone()),
            signals: Box::new(self.signals.clone()),
            notifications: Box::new(self.notifications.clone()),
            messages: Box::new(self.messages.clone()),
            settings: Box::new(self.settings.clone()),
            host: Box::new(self.host.clone()),
            timer,
        }
    }
}
