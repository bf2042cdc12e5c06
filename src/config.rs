/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Floor;

/***************************************/
/*              Constants              */
/***************************************/
pub const MAX_CAPACITY: usize = 6;
pub const MOVE_TIME: u64 = 400; // ms per floor
pub const DOOR_HOLD: u64 = 400; // ms between OPEN and CLOSE
pub const INITIAL_FLOOR: i32 = 1;
pub const N_ELEVATORS: u8 = 6;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub elevator: ElevatorConfig,
    pub dispatcher: DispatcherConfig,
    pub input: InputConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub max_capacity: usize,
    pub move_time: u64,
    pub door_hold: u64,
    pub initial_floor: i32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DispatcherConfig {
    pub n_elevators: u8,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub replay_timestamps: bool,
}

impl Default for ElevatorConfig {
    fn default() -> ElevatorConfig {
        ElevatorConfig {
            max_capacity: MAX_CAPACITY,
            move_time: MOVE_TIME,
            door_hold: DOOR_HOLD,
            initial_floor: INITIAL_FLOOR,
        }
    }
}

impl ElevatorConfig {
    pub fn move_time(&self) -> Duration {
        Duration::from_millis(self.move_time)
    }

    pub fn door_hold(&self) -> Duration {
        Duration::from_millis(self.door_hold)
    }
}

impl Default for DispatcherConfig {
    fn default() -> DispatcherConfig {
        DispatcherConfig {
            n_elevators: N_ELEVATORS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "failed to read configuration file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse configuration file: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/***************************************/
/*             Public API              */
/***************************************/

/// Reads the configuration at `path`. A missing file falls back to the built-in constants.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_str = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("No configuration at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => return Err(ConfigError::Read(e)),
    };
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str).map_err(ConfigError::Parse)?;
    validate(&config)?;
    Ok(config)
}

/// Rejects values that would leave an elevator unable to serve or stop.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.elevator.max_capacity == 0 {
        return Err(ConfigError::Invalid("elevator.max_capacity must be at least 1".into()));
    }
    if config.dispatcher.n_elevators == 0 {
        return Err(ConfigError::Invalid("dispatcher.n_elevators must be at least 1".into()));
    }
    Floor::new(config.elevator.initial_floor)
        .map_err(|e| ConfigError::Invalid(format!("elevator.initial_floor: {}", e)))?;
    Ok(())
}
