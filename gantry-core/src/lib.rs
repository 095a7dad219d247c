//! Core logic for the gantry command relay.
//!
//! Resolves named motion commands to path payloads and delivers them to the
//! robot controller over a short-lived TCP connection.

pub mod command_store;
pub mod path_command;
pub mod relay;
pub mod relay_config;
pub mod robot_transport;
