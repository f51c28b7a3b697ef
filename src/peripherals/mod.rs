//! Board support for the PineTime

pub(crate) mod backlight;
pub(crate) mod button;
pub(crate) mod config;
pub(crate) mod display;
