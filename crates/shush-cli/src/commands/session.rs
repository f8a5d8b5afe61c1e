use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::{Subcommand, ValueEnum};
use shush_core::scheduler::memory::{MemoryAlarms, NoRedraw};
use shush_core::scheduler::{Collaborators, DeferredActionScheduler, KeyValueSettings};
use shush_core::{
    ClockPicker, Config, DeferralScheduler, LocalSignalBus, RadioState, SessionOptions,
    SessionQueue, SessionSignal, SettingsStore, TokioTimeout,
};

use crate::platform::{ConsoleHost, ConsoleMessages, ConsoleNotifications, FileAlarms};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Arm a session, feed it one action and print every event as JSON
    Run {
        /// What ends the session
        #[arg(long, value_enum, default_value = "confirm")]
        action: EndAction,
        /// Select this many minutes before the action (default: last used)
        #[arg(long)]
        minutes: Option<u32>,
        /// Behave as if the screen were locked (full-screen presentation)
        #[arg(long)]
        locked: bool,
        /// Override the session timeout, in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Keep the restore and the settings in memory only
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndAction {
    /// Press confirm
    Confirm,
    /// Press cancel
    Cancel,
    /// The radio comes back on by other means
    RadioOn,
    /// Do nothing until the timeout
    Wait,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run {
            action,
            minutes,
            locked,
            timeout,
            dry_run,
        } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(run_session(action, minutes, locked, timeout, dry_run))
        }
    }
}

async fn run_session(
    action: EndAction,
    minutes: Option<u32>,
    locked: bool,
    timeout: Option<u64>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (settings, alarms): (Box<dyn KeyValueSettings>, Box<dyn DeferredActionScheduler>) =
        if dry_run {
            (
                Box::new(SettingsStore::in_memory(Config::load_or_default())),
                Box::new(MemoryAlarms::default()),
            )
        } else {
            (
                Box::new(SettingsStore::open_default()?),
                Box::new(FileAlarms::open_default()?),
            )
        };

    let config = Config::load_or_default();
    let mut options = SessionOptions::from_config(&config);
    if let Some(secs) = timeout {
        options.timeout = Duration::from_secs(secs);
    }

    let bus = LocalSignalBus::default();
    let collaborators = Collaborators {
        alarms,
        signals: Box::new(bus.clone()),
        notifications: Box::new(ConsoleNotifications),
        messages: Box::new(ConsoleMessages),
        settings,
        host: Box::new(ConsoleHost { locked }),
        timer: Box::new(TokioTimeout::default()),
    };

    let now = Local::now();
    let picker = ClockPicker::new(now, Arc::new(NoRedraw));
    let queue = SessionQueue::new();
    let (mut scheduler, armed) =
        DeferralScheduler::arm(picker, collaborators, options, now, queue.sink());

    let mut events = vec![armed];
    if let (Some(minutes), Some(picker)) = (minutes, scheduler.picker_mut()) {
        picker.set_duration(minutes);
        tracing::debug!(minutes = picker.duration(), "selection overridden");
    }

    match action {
        EndAction::Confirm => queue.sink()(SessionSignal::Confirm),
        EndAction::Cancel => queue.sink()(SessionSignal::Cancel { show_message: true }),
        EndAction::RadioOn => bus.publish(RadioState::EnabledExternally),
        EndAction::Wait => {}
    }

    events.extend(queue.drive(&mut scheduler).await);
    hold_final_message(scheduler.session_end().and_then(|end| end.linger)).await;
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

/// Keeps a full-screen session's last message up before the process exits.
async fn hold_final_message(linger: Option<Duration>) {
    if let Some(linger) = linger {
        tracing::debug!(?linger, "holding final message");
        tokio::time::sleep(linger).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn final_message_waits_on_the_runtime_clock() {
        let started = Instant::now();
        hold_final_message(Some(Duration::from_secs(2))).await;
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn no_linger_returns_at_once() {
        let started = Instant::now();
        hold_final_message(None).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
