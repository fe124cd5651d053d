//! Greedy decomposition of a quantized grid into monochrome rectangles.
//!
//! The scan walks the grid in raster order. At each unconsumed cell it seeds
//! a width from the single-row run of equal cells, extends that seed
//! downward while every row of the seed matches, then narrows the width to
//! the tightest horizontal run across the rows it covers. The result is a
//! heuristic partition, not a minimal one.
//!
//! Worst case cost is O(W²·H²): every seed may probe the remaining width and
//! height of the grid. [`DecomposerOptions::max_side`] bounds the input so
//! this stays predictable.

use super::{Grid, Rectangle};
use crate::{
    color::{Cell, Pixel},
    error::Error,
    Result,
};

pub const DEFAULT_MAX_SIDE: usize = 512;
pub const DEFAULT_ROWS_PER_BATCH: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecomposerOptions {
    /// Consume background cells without emitting them and prepend a single
    /// full-canvas rectangle of `background_color` instead.
    pub exclude_background: bool,
    /// Color reported for [`Cell::Background`] cells.
    pub background_color: Pixel,
    /// Largest accepted width or height.
    pub max_side: usize,
    /// Number of rows scanned between two observer batch notifications.
    pub rows_per_batch: usize,
}

impl Default for DecomposerOptions {
    fn default() -> Self {
        Self {
            exclude_background: false,
            background_color: Pixel::WHITE,
            max_side: DEFAULT_MAX_SIDE,
            rows_per_batch: DEFAULT_ROWS_PER_BATCH,
        }
    }
}

/// Receives progress from a running decomposition. Every method defaults to
/// doing nothing.
pub trait DecompositionObserver {
    /// Called for each rectangle appended to the result, in output order.
    fn on_rectangle(&mut self, _rectangle: &Rectangle) {}

    /// Called after each batch of rows has been scanned. This is the point
    /// where a caller on a cooperative scheduler may yield.
    fn on_batch_complete(&mut self, _rows_done: usize, _total_rows: usize) {}

    /// Polled between cells; returning true aborts the scan.
    fn is_cancelled(&self) -> bool {
        false
    }
}

pub struct NoopObserver;

impl DecompositionObserver for NoopObserver {}

/// Forwards decomposition progress to the `log` facade.
pub struct LoggingObserver {
    label: String,
    rectangles: usize,
}

impl LoggingObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rectangles: 0,
        }
    }
}

impl DecompositionObserver for LoggingObserver {
    fn on_rectangle(&mut self, rectangle: &Rectangle) {
        self.rectangles += 1;
        log::trace!(
            "{}: rectangle {}x{} at ({}, {}) in {}",
            self.label,
            rectangle.width,
            rectangle.height,
            rectangle.x,
            rectangle.y,
            rectangle.color
        );
    }

    fn on_batch_complete(&mut self, rows_done: usize, total_rows: usize) {
        log::debug!(
            "{}: scanned {}/{} rows, {} rectangles so far",
            self.label,
            rows_done,
            total_rows,
            self.rectangles
        );
    }
}

/// Working copy of the grid. Consumed cells are tracked beside the colors,
/// never inside them.
struct WorkingGrid<'a> {
    grid: &'a Grid<Cell>,
    consumed: Vec<bool>,
}

impl<'a> WorkingGrid<'a> {
    fn new(grid: &'a Grid<Cell>) -> Self {
        Self {
            grid,
            consumed: vec![false; grid.cells().len()],
        }
    }

    fn index(&self, column_index: usize, row_index: usize) -> usize {
        column_index + row_index * self.grid.width()
    }

    fn is_consumed(&self, column_index: usize, row_index: usize) -> bool {
        self.consumed[self.index(column_index, row_index)]
    }

    /// A consumed cell matches nothing.
    fn matches(&self, column_index: usize, row_index: usize, color: &Cell) -> bool {
        !self.is_consumed(column_index, row_index)
            && self.grid.cell(column_index, row_index) == color
    }

    /// Length of the run of `color` in `row_index` starting at `column_index`.
    fn find_horizontal_run(&self, column_index: usize, row_index: usize, color: &Cell) -> usize {
        let mut width = 0;
        while column_index + width < self.grid.width()
            && self.matches(column_index + width, row_index, color)
        {
            width += 1;
        }
        width
    }

    /// Number of consecutive rows from `row_index` whose `width` cells all
    /// match `color`.
    fn find_vertical_rect(
        &self,
        column_index: usize,
        row_index: usize,
        width: usize,
        color: &Cell,
    ) -> usize {
        let mut height = 0;
        while row_index + height < self.grid.height()
            && (column_index..column_index + width)
                .all(|x| self.matches(x, row_index + height, color))
        {
            height += 1;
        }
        height
    }

    /// Tightest horizontal run across the `height` rows starting at
    /// `row_index`, never wider than `seed_width`.
    fn find_horizontal_rect(
        &self,
        column_index: usize,
        row_index: usize,
        height: usize,
        seed_width: usize,
        color: &Cell,
    ) -> usize {
        (row_index..row_index + height).fold(seed_width, |width, row| {
            width.min(self.find_horizontal_run(column_index, row, color))
        })
    }

    fn consume(&mut self, column_index: usize, row_index: usize, width: usize, height: usize) {
        for row in row_index..row_index + height {
            let start = self.index(column_index, row);
            self.consumed[start..start + width].fill(true);
        }
    }
}

pub struct RectangleDecomposer<'a> {
    options: &'a DecomposerOptions,
}

impl<'a> RectangleDecomposer<'a> {
    pub fn new(options: &'a DecomposerOptions) -> Result<Self> {
        if options.rows_per_batch == 0 {
            return Err(Error::InvalidBatchSize);
        }
        Ok(Self { options })
    }

    pub fn decompose(&self, grid: &Grid<Cell>) -> Result<Vec<Rectangle>> {
        self.decompose_with_observer(grid, &mut NoopObserver)
    }

    pub fn decompose_rows(&self, rows: Vec<Vec<Cell>>) -> Result<Vec<Rectangle>> {
        let grid = Grid::from_rows(rows)?;
        self.decompose(&grid)
    }

    /// Decomposes `grid` into rectangles in raster order of their top-left
    /// cells. The output is fully determined by the grid and the options.
    pub fn decompose_with_observer(
        &self,
        grid: &Grid<Cell>,
        observer: &mut dyn DecompositionObserver,
    ) -> Result<Vec<Rectangle>> {
        self.check_dimensions(grid)?;
        if grid.is_empty() {
            return Ok(Vec::new());
        }
        let mut rectangles = Vec::new();
        if self.options.exclude_background {
            let canvas = Rectangle {
                x: 0,
                y: 0,
                width: grid.width(),
                height: grid.height(),
                color: self.options.background_color,
            };
            observer.on_rectangle(&canvas);
            rectangles.push(canvas);
        }
        let mut working_grid = WorkingGrid::new(grid);
        let total_rows = grid.height();
        for batch_start in (0..total_rows).step_by(self.options.rows_per_batch) {
            let batch_end = (batch_start + self.options.rows_per_batch).min(total_rows);
            for row_index in batch_start..batch_end {
                self.scan_row(&mut working_grid, row_index, &mut rectangles, observer)?;
            }
            observer.on_batch_complete(batch_end, total_rows);
        }
        Ok(rectangles)
    }

    fn check_dimensions(&self, grid: &Grid<Cell>) -> Result<()> {
        let max_side = self.options.max_side;
        if grid.width() > max_side || grid.height() > max_side {
            return Err(Error::GridTooLarge {
                width: grid.width(),
                height: grid.height(),
                max_side,
            });
        }
        Ok(())
    }

    fn scan_row(
        &self,
        working_grid: &mut WorkingGrid,
        row_index: usize,
        rectangles: &mut Vec<Rectangle>,
        observer: &mut dyn DecompositionObserver,
    ) -> Result<()> {
        let width = working_grid.grid.width();
        let mut column_index = 0;
        while column_index < width {
            if observer.is_cancelled() {
                return Err(Error::DecompositionCancelled { row: row_index });
            }
            if working_grid.is_consumed(column_index, row_index) {
                column_index += 1;
                continue;
            }
            let color = *working_grid.grid.cell(column_index, row_index);
            let seed_width = working_grid.find_horizontal_run(column_index, row_index, &color);
            let rect_height =
                working_grid.find_vertical_rect(column_index, row_index, seed_width, &color);
            let rect_width = working_grid.find_horizontal_rect(
                column_index,
                row_index,
                rect_height,
                seed_width,
                &color,
            );
            if rect_width == 0 || rect_height == 0 {
                column_index += 1;
                continue;
            }
            working_grid.consume(column_index, row_index, rect_width, rect_height);
            if !(self.options.exclude_background && color.is_background()) {
                let rectangle = Rectangle {
                    x: column_index,
                    y: row_index,
                    width: rect_width,
                    height: rect_height,
                    color: color.color_or(self.options.background_color),
                };
                observer.on_rectangle(&rectangle);
                rectangles.push(rectangle);
            }
            column_index += rect_width;
        }
        Ok(())
    }
}
