use clap::Subcommand;
use shush_core::geometry::MINUTES_PER_HALF_DAY;
use shush_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "minutes", "session.timeout_secs")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            check_ranges(&config)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Values a session cannot work with, even though they parse.
fn check_ranges(config: &Config) -> Result<(), ConfigError> {
    let invalid = |key: &str, message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    if config.minutes > MINUTES_PER_HALF_DAY {
        return Err(invalid(
            "minutes",
            format!("the dial holds at most {MINUTES_PER_HALF_DAY} minutes"),
        ));
    }
    if config.session.timeout_secs == 0 {
        return Err(invalid(
            "session.timeout_secs",
            "a session needs at least one second to be answered".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass() {
        assert!(check_ranges(&Config::default()).is_ok());
    }

    #[test]
    fn minutes_must_fit_the_dial() {
        let mut config = Config::default();
        config.set("minutes", "720").unwrap();
        assert!(check_ranges(&config).is_ok());

        config.set("minutes", "735").unwrap();
        assert!(matches!(
            check_ranges(&config),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "minutes"
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.set("session.timeout_secs", "0").unwrap();
        assert!(matches!(
            check_ranges(&config),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "session.timeout_secs"
        ));
    }
}
