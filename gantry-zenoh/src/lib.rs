pub mod error;
pub mod logging;

use error::BusError;
use std::path::PathBuf;

/// Topic carrying inbound command names
pub const COMMAND_TOPIC: &str = "gantry/command";
/// Command name published by the self-trigger heartbeat
pub const HEARTBEAT_COMMAND: &str = "test";

pub fn load_zenoh_config(path: &Option<PathBuf>) -> Result<zenoh_config::Config, BusError> {
    match path {
        Some(path) => zenoh_config::Config::from_file(path).map_err(BusError::Zenoh),
        None => Ok(zenoh_config::Config::default()),
    }
}
