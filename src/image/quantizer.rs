use clap::builder::PossibleValue;
use clap::ValueEnum;

use super::Grid;
use crate::{
    color::{Cell, Pixel},
    error::Error,
    Result,
};

pub const DEFAULT_STEP: u16 = 16;
pub const DEFAULT_BACKGROUND_THRESHOLD: u8 = 127;
const BINARY_ALPHA_THRESHOLD: u8 = 127;

/// How the alpha channel is treated during quantization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    /// Alpha is quantized like the color channels.
    Continuous,
    /// Alpha collapses to opaque or transparent; every non-opaque pixel
    /// becomes [`Pixel::TRANSPARENT`].
    Binary,
    /// Alpha is passed through untouched.
    None,
    /// Pixels with alpha at or below `threshold` become [`Cell::Background`];
    /// the rest are quantized as in `Continuous`.
    Background { threshold: u8 },
}

impl ValueEnum for AlphaMode {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Continuous,
            Self::Binary,
            Self::None,
            Self::Background {
                threshold: DEFAULT_BACKGROUND_THRESHOLD,
            },
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Continuous => Some(PossibleValue::new("Continuous")),
            Self::Binary => Some(PossibleValue::new("Binary")),
            Self::None => Some(PossibleValue::new("None")),
            Self::Background { .. } => Some(PossibleValue::new("Background")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantizationOptions {
    pub step: u16,
    pub alpha_mode: AlphaMode,
}

impl Default for QuantizationOptions {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            alpha_mode: AlphaMode::Continuous,
        }
    }
}

pub struct Quantizer<'a> {
    options: &'a QuantizationOptions,
}

impl<'a> Quantizer<'a> {
    pub fn new(options: &'a QuantizationOptions) -> Result<Self> {
        if options.step == 0 || options.step > u8::MAX as u16 {
            return Err(Error::InvalidQuantizationStep(options.step));
        }
        Ok(Self { options })
    }

    pub fn quantize(&self, grid: &Grid<Pixel>) -> Grid<Cell> {
        grid.map(|&pixel| self.quantize_pixel(pixel))
    }

    /// Validates row lengths before quantizing.
    pub fn quantize_rows(&self, rows: Vec<Vec<Pixel>>) -> Result<Grid<Cell>> {
        let grid = Grid::from_rows(rows)?;
        Ok(self.quantize(&grid))
    }

    pub fn quantize_pixel(&self, pixel: Pixel) -> Cell {
        match self.options.alpha_mode {
            AlphaMode::Continuous => Cell::Color(self.quantize_all_channels(pixel)),
            AlphaMode::None => Cell::Color(Pixel {
                alpha: pixel.alpha,
                ..self.quantize_all_channels(pixel)
            }),
            AlphaMode::Binary => {
                let alpha = if pixel.alpha > BINARY_ALPHA_THRESHOLD {
                    u8::MAX
                } else {
                    0
                };
                let thresholded = Pixel {
                    alpha,
                    ..self.quantize_all_channels(pixel)
                };
                if thresholded.is_opaque() {
                    Cell::Color(thresholded)
                } else {
                    Cell::Color(Pixel::TRANSPARENT)
                }
            }
            AlphaMode::Background { threshold } => {
                if pixel.alpha <= threshold {
                    Cell::Background
                } else {
                    Cell::Color(self.quantize_all_channels(pixel))
                }
            }
        }
    }

    fn quantize_all_channels(&self, pixel: Pixel) -> Pixel {
        Pixel::new(
            self.quantize_channel(pixel.red),
            self.quantize_channel(pixel.green),
            self.quantize_channel(pixel.blue),
            self.quantize_channel(pixel.alpha),
        )
    }

    /// Rounds half-up to the nearest multiple of the step, clamped to 255.
    fn quantize_channel(&self, value: u8) -> u8 {
        let step = self.options.step as u32;
        let rounded = (value as u32 + step / 2) / step * step;
        rounded.min(u8::MAX as u32) as u8
    }
}
