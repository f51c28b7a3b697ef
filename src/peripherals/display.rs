//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::{AnyPin, Output},
    spim::{self, Spim},
};
use embassy_time::Delay;
use embedded_graphics::{pixelcolor::RgbColor, prelude::*};
use mipidsi::{models::ST7789, Builder, Orientation};

use pinetime_watchface::ui::{ColorMode, WatchFace, LCD_H, LCD_W};

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, AnyPin>, Output<'a, AnyPin>>,
    ST7789,
    Output<'a, AnyPin>,
>;

pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Configure the ST7789 panel and blank it
    pub fn init(
        spim: Spim<'a, SPI>,
        cs: Output<'a, AnyPin>,
        dc: Output<'a, AnyPin>,
        rst: Output<'a, AnyPin>,
        delay: &mut Delay,
    ) -> Self {
        let lcd = defmt::unwrap!(Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W as u16, LCD_H as u16)
            .with_orientation(Orientation::Portrait(false))
            .init(delay, Some(rst))
            .ok());

        let mut display = Self { lcd };
        if display.clear().is_err() {
            defmt::warn!("Failed to clear display");
        }
        display
    }

    /// Fill the screen with black
    pub fn clear(&mut self) -> Result<(), mipidsi::Error> {
        self.lcd.clear(ColorMode::BLACK)
    }

    /// Draw the watchface onto the panel
    pub fn render<W: WatchFace>(&mut self, face: &W) -> Result<(), mipidsi::Error> {
        face.draw(&mut self.lcd)
    }
}
