//! Maps raster rectangles to y-up geometric constraint records.

use crate::{color::Pixel, error::Error, image::Rectangle, Result};

pub mod writer;

pub const DEFAULT_SCALE: f64 = 0.1;

/// Axis-aligned bounds of one rectangle in output space, where `y` grows
/// upward and one grid cell spans `scale` units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintRecord {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub color: Pixel,
    pub opacity: f64,
}

pub struct CoordinateMapper {
    canvas_height: usize,
    scale: f64,
}

impl CoordinateMapper {
    pub fn new(canvas_height: usize, scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidScaleFactor(scale));
        }
        Ok(Self {
            canvas_height,
            scale,
        })
    }

    /// Maps every rectangle in order. Output order is input order.
    pub fn map_all(&self, rectangles: &[Rectangle]) -> Vec<ConstraintRecord> {
        rectangles.iter().map(|r| self.map(r)).collect()
    }

    pub fn map(&self, rectangle: &Rectangle) -> ConstraintRecord {
        let top = self.canvas_height as f64 - rectangle.y as f64;
        ConstraintRecord {
            x_min: self.scaled(rectangle.x as f64),
            x_max: self.scaled((rectangle.x + rectangle.width) as f64),
            y_min: self.scaled(top - rectangle.height as f64),
            y_max: self.scaled(top),
            color: rectangle.color,
            opacity: opacity(rectangle.color.alpha),
        }
    }

    fn scaled(&self, value: f64) -> f64 {
        self.snap(value * self.scale)
    }

    /// Snaps `value` to the nearest multiple of the scale. Dividing by the
    /// inverse keeps decimal scales such as 0.1 free of representation noise.
    fn snap(&self, value: f64) -> f64 {
        let inverse = 1.0 / self.scale;
        (value * inverse).round() / inverse
    }
}

/// Alpha as a fraction of 255, rounded to two decimal places.
fn opacity(alpha: u8) -> f64 {
    (alpha as f64 / 255.0 * 100.0).round() / 100.0
}
