use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveTime};
use clap::{Subcommand, ValueEnum};
use shush_core::picker::{preferred_size, DisplayList, Size, SvgSurface};
use shush_core::scheduler::memory::NoRedraw;
use shush_core::{ClockPicker, Color, Config, PointerPhase};

#[derive(Subcommand)]
pub enum DialAction {
    /// Render the dial as SVG
    Render {
        #[command(flatten)]
        dial: DialArgs,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Apply one pointer event and print the picker state as JSON
    Touch {
        #[command(flatten)]
        dial: DialArgs,
        #[arg(long, value_enum, default_value = "down")]
        phase: PhaseArg,
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, allow_negative_numbers = true)]
        y: f32,
    },
}

#[derive(clap::Args)]
pub struct DialArgs {
    /// Start time as HH:MM (today); defaults to now
    #[arg(long)]
    start: Option<String>,
    /// Selected duration in minutes
    #[arg(long)]
    minutes: Option<u32>,
    /// Available width in pixels
    #[arg(long, default_value = "400")]
    width: u32,
    /// Available height in pixels
    #[arg(long, default_value = "400")]
    height: u32,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Down,
    Move,
    Up,
}

impl From<PhaseArg> for PointerPhase {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::Down => PointerPhase::Down,
            PhaseArg::Move => PointerPhase::Move,
            PhaseArg::Up => PointerPhase::Up,
        }
    }
}

/// Parses "HH:MM" as a time today.
pub fn parse_start(value: &str) -> Result<DateTime<Local>, Box<dyn std::error::Error>> {
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| format!("invalid start '{value}' (expected HH:MM): {e}"))?;
    Local::now()
        .date_naive()
        .and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| format!("{value} does not exist today in the local time zone").into())
}

impl DialArgs {
    fn picker(&self, config: &Config) -> Result<ClockPicker, Box<dyn std::error::Error>> {
        let start = match &self.start {
            Some(value) => parse_start(value)?,
            None => Local::now(),
        };
        let mut picker = ClockPicker::new(start, Arc::new(NoRedraw));
        picker.set_duration(self.minutes.unwrap_or(config.minutes));
        picker.set_color(Color(config.color));
        picker.set_use_24h_clock(config.ui.use_24h_clock);
        Ok(picker)
    }

    fn size(&self) -> Size {
        preferred_size(self.width, self.height)
    }
}

pub fn run(action: DialAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    match action {
        DialAction::Render { dial, out } => {
            let mut picker = dial.picker(&config)?;
            let mut svg = SvgSurface::new(dial.size());
            picker.render(&mut svg);
            let document = svg.finish();
            match out {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    eprintln!("wrote {}", path.display());
                }
                None => println!("{document}"),
            }
        }
        DialAction::Touch { dial, phase, x, y } => {
            let mut picker = dial.picker(&config)?;
            // hit testing needs a measured layout
            picker.render(&mut DisplayList::new(dial.size()));
            let claimed = picker.handle_pointer_event(phase.into(), x, y);
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "claimed": claimed,
                "state": picker.state(),
            }))?;
            println!("{json}");
        }
    }
    Ok(())
}
