//! Watchface for the PineTime
//!
//! Hardware-independent part of the firmware: time keeping, the minute tick
//! service and the watchface itself, drawn onto any `embedded-graphics`
//! target. The board support lives in the firmware binary.

#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod system;
pub mod ui;
