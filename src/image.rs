use crate::{color::Pixel, error::Error, Result};

pub mod decomposer;
pub mod quantizer;
pub mod reader;

pub trait ImageReader<T> {
    fn read_image(&mut self) -> Result<Grid<T>>;
}

/// A rectangular, row-major grid of cells.
///
/// Every row has exactly `width` cells; the constructors reject anything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    pub fn new(width: usize, height: usize, cells: Vec<T>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(Error::CellCountMismatch {
                expected: usize::MAX,
                actual: cells.len(),
            })?;
        if cells.len() != expected {
            return Err(Error::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }

    /// Builds a grid from nested rows, failing on the first row whose length
    /// differs from the first one.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(Error::JaggedGrid {
                    row: row_index,
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the grid has no cells, e.g. 0x0 or Nx0.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, column_index: usize, row_index: usize) -> &T {
        &self.cells[column_index + row_index * self.width]
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

/// An axis-aligned block of uniformly colored cells in raster coordinates.
///
/// `(x, y)` is the top-left cell; `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub color: Pixel,
}

impl Rectangle {
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, column_index: usize, row_index: usize) -> bool {
        column_index >= self.x
            && column_index < self.x + self.width
            && row_index >= self.y
            && row_index < self.y + self.height
    }
}
