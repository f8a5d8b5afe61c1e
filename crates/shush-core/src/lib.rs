//! # Shush Core Library
//!
//! Core logic for "turn the radio off for a while": a circular duration
//! picker and the session that turns the user's choice into a deferred
//! "turn it back on" action. Everything is usable headless; the `shush-cli`
//! binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Geometry**: pure angle/duration math for a 12-hour dial
//! - **Picker**: the dial's state machine, hit testing and rendering onto an
//!   abstract [`Surface`](picker::Surface)
//! - **Scheduler**: one session from arm to teardown, racing confirm, cancel,
//!   radio broadcasts and a timeout
//! - **Runtime**: tokio queue, timer and signal bus that drive a session
//! - **Storage**: TOML configuration and the settings store
//!
//! ## Key Components
//!
//! - [`ClockPicker`]: the duration picker
//! - [`DeferralScheduler`]: the session state machine
//! - [`SessionQueue`]: the single worker that serializes all session signals
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod geometry;
pub mod picker;
pub mod radio;
pub mod runtime;
pub mod scheduler;
pub mod storage;

pub use error::{ConfigError, CoreError, GeometryError, RadioError, Result, SessionError};
pub use events::Event;
pub use picker::{ClockPicker, Color, PointerPhase, RedrawRequester, SavedPickerState, Surface};
pub use radio::{on_radio_broadcast, restore_radio, RadioControl, RadioState};
pub use runtime::{LocalSignalBus, SessionQueue, TokioTimeout};
pub use scheduler::{Collaborators, DeferralScheduler, SessionOptions, SessionSignal, SessionStatus};
pub use storage::{Config, SettingsStore};
