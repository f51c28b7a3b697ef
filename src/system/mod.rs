//! Time keeping and configuration

pub mod config;
pub mod tick;
pub mod time;
