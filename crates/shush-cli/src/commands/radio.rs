use chrono::{Local, Utc};
use clap::Subcommand;
use shush_core::radio::BroadcastOutcome;
use shush_core::scheduler::DeferredAction;
use shush_core::{on_radio_broadcast, Event, RadioControl, RadioState};

use crate::platform::{ConsoleNotifications, FileAlarms, NmcliRadio};

#[derive(Subcommand)]
pub enum RadioAction {
    /// Print whether the radio is on and any pending restore
    Status,
    /// Turn the radio back on now and drop the pending restore
    Restore {
        /// Only act if the pending restore is due (for cron or a systemd timer)
        #[arg(long)]
        if_due: bool,
    },
    /// React to a radio state change (enabled, enabling, disabled, disabling)
    Changed {
        state: RadioState,
    },
}

pub fn run(action: RadioAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut alarms = FileAlarms::open_default()?;
    match action {
        RadioAction::Status => {
            let radio = NmcliRadio;
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "enabled": radio.is_enabled()?,
                "pending_restore": alarms.pending(),
            }))?;
            println!("{json}");
        }
        RadioAction::Restore { if_due } => {
            let pending = alarms.pending();
            if if_due && !pending.as_ref().is_some_and(|p| p.is_due(Local::now())) {
                match pending {
                    Some(p) => eprintln!("restore not due until {}", p.at.format("%H:%M")),
                    None => eprintln!("no pending restore"),
                }
                return Ok(());
            }

            let action = pending.map(|p| p.action).unwrap_or(DeferredAction::RestoreRadio);
            let outcome = action.run(&mut NmcliRadio)?;
            alarms.clear();
            let event = Event::RadioRestored {
                outcome,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        RadioAction::Changed { state } => {
            let outcome = on_radio_broadcast(state, &mut alarms, &mut ConsoleNotifications);
            if outcome == BroadcastOutcome::StartSession {
                eprintln!("radio is off; run `shush-cli session run` to pick how long");
            }
            let event = Event::RadioBroadcast {
                state,
                outcome,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
