//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};

use crate::system::tick::TimeUnits;

mod default_watchface;
pub mod format;
pub mod layer;

pub use default_watchface::{DefaultWatchface, DATE_BUF_LEN, TIME_BUF_LEN};

/// Pixel format of the PineTime display
pub type ColorMode = Rgb565;

/// Display width and height in pixels
pub const LCD_W: u32 = 240;
pub const LCD_H: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Text did not fit into its buffer
    BufferOverflow,
}

/// Event handlers of a watchface
pub trait WatchFace {
    /// The watchface became visible, create its layers
    fn on_show(&mut self);

    /// A subscribed time unit changed
    fn on_tick(&mut self, units_changed: TimeUnits);

    /// The watchface is no longer visible, release its layers
    fn on_hide(&mut self);

    /// Render the visible layers. Does nothing while hidden.
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>;
}
