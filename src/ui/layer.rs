//! Layers the watchface is composed of

use core::fmt::{self, Write};

use embedded_graphics::{
    image::{Image, ImageRawBE},
    mono_font::MonoTextStyle,
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder},
};

use super::{ColorMode, Error};

/// Fixed capacity text, always followed by a NUL byte.
///
/// At most `N - 1` bytes of text fit.
#[derive(Clone)]
pub struct TextBuffer<const N: usize> {
    str_buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for TextBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TextBuffer<N> {
    /// Capacity including the terminator
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self {
            str_buf: [0; N],
            len: 0,
        }
    }

    /// Replace the contents with formatted text.
    ///
    /// Text that does not fit leaves the buffer empty, the way strftime
    /// reports a short buffer.
    pub fn write(&mut self, args: fmt::Arguments) -> Result<&str, Error> {
        let capacity = N.saturating_sub(1);
        let written = format_no_std::show(&mut self.str_buf[..capacity], args).map(str::len);

        match written {
            Ok(len) => {
                self.terminate(len);
                Ok(self.as_str())
            }
            Err(_) => {
                self.clear();
                Err(Error::BufferOverflow)
            }
        }
    }

    /// Replace the contents with a plain string
    pub fn set(&mut self, text: &str) -> Result<&str, Error> {
        self.write(format_args!("{}", text))
    }

    pub fn clear(&mut self) {
        self.terminate(0);
    }

    pub fn as_str(&self) -> &str {
        // Only whole `str`s are ever copied in by `format_no_std`
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or_default()
    }

    /// Text including the NUL terminator
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        let end = (self.len + 1).min(N);
        &self.str_buf[..end]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn terminate(&mut self, len: usize) {
        self.len = len;
        if let Some(nul) = self.str_buf.get_mut(len) {
            *nul = 0;
        }
    }
}

impl<const N: usize> fmt::Debug for TextBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextBuffer").field(&self.as_str()).finish()
    }
}

/// A region of the screen showing a single line of text
pub struct TextLayer<'a, const N: usize> {
    text: TextBuffer<N>,
    bounds: Rectangle,
    character_style: MonoTextStyle<'a, ColorMode>,
    text_style: TextStyle,
}

impl<'a, const N: usize> TextLayer<'a, N> {
    /// Create new text layer.
    ///
    /// Text is left aligned to the top of `bounds`. A character style
    /// without background color leaves the layers below visible.
    pub fn new(bounds: Rectangle, character_style: MonoTextStyle<'a, ColorMode>) -> Self {
        Self {
            text: TextBuffer::new(),
            bounds,
            character_style,
            text_style: TextStyleBuilder::new()
                .alignment(Alignment::Left)
                .baseline(Baseline::Top)
                .build(),
        }
    }

    /// Replace the displayed text
    pub fn set_text(&mut self, text: impl fmt::Display) -> Result<(), Error> {
        self.text.write(format_args!("{}", text)).map(|_| ())
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn buffer(&self) -> &TextBuffer<N> {
        &self.text
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Draw the text, clipped to the layer bounds
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        let mut clipped = target.clipped(&self.bounds);
        Text::with_text_style(
            self.text(),
            self.bounds.top_left,
            self.character_style,
            self.text_style,
        )
        .draw(&mut clipped)?;
        Ok(())
    }
}

/// Full screen background image
pub struct BitmapLayer<'a> {
    bitmap: ImageRawBE<'a, ColorMode>,
    bounds: Rectangle,
}

impl<'a> BitmapLayer<'a> {
    pub fn new(bounds: Rectangle, bitmap: ImageRawBE<'a, ColorMode>) -> Self {
        Self { bitmap, bounds }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Draw the bitmap at the layer origin, clipped to the layer bounds
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        let mut clipped = target.clipped(&self.bounds);
        Image::new(&self.bitmap, self.bounds.top_left).draw(&mut clipped)
    }
}

impl<const N: usize> Write for TextBuffer<N> {
    /// Appends, unlike [`TextBuffer::write`]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end >= N {
            return Err(fmt::Error);
        }
        self.str_buf[self.len..end].copy_from_slice(s.as_bytes());
        self.terminate(end);
        Ok(())
    }
}
