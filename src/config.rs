/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*             Constants               */
/***************************************/
/// Number of landings served by the cabin.
pub const N_FLOORS: u8 = 5;
pub const MAX_FLOOR: u8 = N_FLOORS - 1;
/// Control cycles needed to travel between two adjacent floors.
pub const TRANSIT_TICKS: u8 = 4;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub elevator: ElevatorConfig,
    pub clock: ClockConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Parameters of the motion core.
///
/// `n_floors` and `transit_ticks` are fixed at build time and cannot be set
/// from the configuration file; they live here so the core can be built for
/// other shapes in tests.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorConfig {
    #[serde(skip, default = "default_n_floors")]
    pub n_floors: u8,
    #[serde(skip, default = "default_transit_ticks")]
    pub transit_ticks: u8,
    #[serde(default)]
    pub clear_requests_on_reset: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ClockConfig {
    pub reference_period_us: u64,
    pub divide_by: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_n_floors() -> u8 {
    N_FLOORS
}

fn default_transit_ticks() -> u8 {
    TRANSIT_TICKS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ElevatorConfig {
    pub fn max_floor(&self) -> u8 {
        self.n_floors - 1
    }
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            n_floors: N_FLOORS,
            transit_ticks: TRANSIT_TICKS,
            clear_requests_on_reset: false,
        }
    }
}

impl ClockConfig {
    /// Period of one control cycle.
    pub fn control_period(&self) -> Duration {
        Duration::from_micros(self.reference_period_us) * self.divide_by
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.elevator.n_floors < 2 {
        return Err(ConfigError::Invalid("at least two floors are required".into()));
    }
    if config.elevator.transit_ticks == 0 {
        return Err(ConfigError::Invalid("transit_ticks must be at least 1".into()));
    }
    if config.clock.reference_period_us == 0 {
        return Err(ConfigError::Invalid(
            "clock.reference_period_us must be at least 1".into(),
        ));
    }
    if config.clock.divide_by == 0 {
        return Err(ConfigError::Invalid("clock.divide_by must be at least 1".into()));
    }
    Ok(())
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        // Arrange
        let config_str = r#"
            [elevator]
            clear_requests_on_reset = true

            [clock]
            reference_period_us = 1000
            divide_by = 250

            [log]
            level = "debug"
        "#;

        // Act
        let config = parse_config(config_str).unwrap();

        // Assert
        assert!(config.elevator.clear_requests_on_reset);
        assert_eq!(config.elevator.n_floors, N_FLOORS);
        assert_eq!(config.elevator.transit_ticks, TRANSIT_TICKS);
        assert_eq!(config.clock.control_period(), Duration::from_millis(250));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_floor_count_is_not_configurable() {
        let config_str = r#"
            [elevator]
            n_floors = 9

            [clock]
            reference_period_us = 10
            divide_by = 1
        "#;

        let config = parse_config(config_str).unwrap();

        assert_eq!(config.elevator.n_floors, N_FLOORS);
        assert_eq!(config.elevator.max_floor(), MAX_FLOOR);
        assert!(!config.elevator.clear_requests_on_reset);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_rejects_zero_divider() {
        let config_str = r#"
            [clock]
            reference_period_us = 1000
            divide_by = 0
        "#;

        match parse_config(config_str) {
            Err(ConfigError::Invalid(_)) => {}
            other => panic!("expected invalid configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        match load_config("this/file/does/not/exist.toml") {
            Err(ConfigError::Io { path, .. }) => assert!(path.ends_with("exist.toml")),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
