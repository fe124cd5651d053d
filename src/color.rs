use std::fmt::Display;

use crate::error::Error;

/// An RGBA color with 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel::new(0, 0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha == u8::MAX
    }
}

impl Display for Pixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// A quantized grid cell: either a real color or the background marker.
///
/// The background marker lives outside the color space, so no quantized
/// [`Pixel`] can ever compare equal to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Color(Pixel),
    Background,
}

impl Cell {
    pub fn is_background(&self) -> bool {
        matches!(self, Cell::Background)
    }

    /// Resolves the cell to a concrete color, using `background` for the marker.
    pub fn color_or(&self, background: Pixel) -> Pixel {
        match self {
            Cell::Color(pixel) => *pixel,
            Cell::Background => background,
        }
    }
}

/// A color whose channels are expressed relative to an arbitrary maximum,
/// as found in PPM files.
pub struct RangeColor {
    max: u16,
    red: u16,
    green: u16,
    blue: u16,
}

impl RangeColor {
    pub fn new(max: u16, red: u16, green: u16, blue: u16) -> crate::Result<Self> {
        for value in [red, green, blue] {
            if value > max {
                return Err(Error::ColorValueExceedsMaximum(value, max));
            }
        }
        Ok(RangeColor {
            max,
            red,
            green,
            blue,
        })
    }

    fn scale_channel(&self, value: u16) -> u8 {
        if self.max == 0 {
            return 0;
        }
        let max = self.max as u32;
        ((value as u32 * 255 + max / 2) / max) as u8
    }
}

impl From<&RangeColor> for Pixel {
    fn from(value: &RangeColor) -> Self {
        Pixel::opaque(
            value.scale_channel(value.red),
            value.scale_channel(value.green),
            value.scale_channel(value.blue),
        )
    }
}

impl From<RangeColor> for Pixel {
    fn from(value: RangeColor) -> Self {
        Pixel::from(&value)
    }
}
