// ABOUTME: Library half of the hwssh tool
// ABOUTME: Exposes configuration loading and the offline inspection commands

pub mod commands;
pub mod config;

pub use config::Config;
