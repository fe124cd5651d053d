use pixel_rect_decomposer::color::{Cell, Pixel};
use pixel_rect_decomposer::constraint::CoordinateMapper;
use pixel_rect_decomposer::image::decomposer::{DecomposerOptions, RectangleDecomposer};
use pixel_rect_decomposer::image::quantizer::{AlphaMode, QuantizationOptions, Quantizer};
use pixel_rect_decomposer::image::{Grid, Rectangle};
use pixel_rect_decomposer::{grid_to_records, PipelineOptions};

const PALETTE: [Pixel; 4] = [
    Pixel::opaque(200, 30, 30),
    Pixel::opaque(30, 200, 30),
    Pixel::opaque(30, 30, 200),
    Pixel::new(0, 0, 0, 0),
];

/// Fixed-seed linear congruential generator, so every run sees the same grids.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// Blocky random grid: each cell repeats its left or upper neighbour most of
/// the time, so larger rectangles appear alongside single cells. Fresh cells
/// are drawn from the first `colors` palette entries plus the background
/// marker.
fn random_grid(width: usize, height: usize, seed: u64, colors: usize) -> Grid<Cell> {
    let mut rng = Lcg(seed);
    let mut cells: Vec<Cell> = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let roll = rng.next() % 10;
            let cell = if roll < 4 && x > 0 {
                cells[cells.len() - 1]
            } else if roll < 7 && y > 0 {
                cells[cells.len() - width]
            } else {
                let choice = (rng.next() as usize) % (colors + 1);
                if choice == colors {
                    Cell::Background
                } else {
                    Cell::Color(PALETTE[choice])
                }
            };
            cells.push(cell);
        }
    }
    Grid::new(width, height, cells).unwrap()
}

fn decompose(grid: &Grid<Cell>) -> Vec<Rectangle> {
    decompose_with(grid, &DecomposerOptions::default())
}

fn decompose_with(grid: &Grid<Cell>, options: &DecomposerOptions) -> Vec<Rectangle> {
    RectangleDecomposer::new(options)
        .unwrap()
        .decompose(grid)
        .unwrap()
}

/// Checks that `rectangles` cover every cell accepted by `covered` exactly
/// once, no other cell, and only cells of their own color.
fn assert_exact_cover<F>(grid: &Grid<Cell>, rectangles: &[Rectangle], background: Pixel, covered: F)
where
    F: Fn(&Cell) -> bool,
{
    for rectangle in rectangles {
        assert!(rectangle.width >= 1 && rectangle.height >= 1);
        assert!(rectangle.x + rectangle.width <= grid.width());
        assert!(rectangle.y + rectangle.height <= grid.height());
    }
    let covered_area: usize = rectangles.iter().map(Rectangle::area).sum();
    let expected_area = grid.cells().iter().filter(|cell| covered(cell)).count();
    assert_eq!(covered_area, expected_area, "covered area differs");
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.cell(x, y);
            let owners: Vec<&Rectangle> =
                rectangles.iter().filter(|r| r.contains(x, y)).collect();
            let expected_owners = if covered(cell) { 1 } else { 0 };
            assert_eq!(
                owners.len(),
                expected_owners,
                "cell ({}, {}) covered {} times",
                x,
                y,
                owners.len()
            );
            if let Some(owner) = owners.first() {
                assert_eq!(
                    cell.color_or(background),
                    owner.color,
                    "cell ({}, {}) differs from {:?}",
                    x,
                    y,
                    owner
                );
            }
        }
    }
}

fn assert_partition(grid: &Grid<Cell>, rectangles: &[Rectangle]) {
    assert_exact_cover(grid, rectangles, Pixel::WHITE, |_| true);
}

#[test]
fn random_grids_are_partitioned_into_monochrome_rectangles() {
    for seed in 0..40 {
        let width = 1 + (seed as usize * 7) % 23;
        let height = 1 + (seed as usize * 11) % 19;
        let colors = 2 + seed as usize % 3;
        let grid = random_grid(width, height, seed, colors);
        let rectangles = decompose(&grid);
        assert_partition(&grid, &rectangles);
    }
}

#[test]
fn random_grids_with_background_exclusion_cover_foreground_once() {
    let background_color = Pixel::opaque(250, 250, 250);
    let options = DecomposerOptions {
        exclude_background: true,
        background_color,
        ..Default::default()
    };
    let mut saw_background = false;
    for seed in 0..40 {
        let width = 1 + (seed as usize * 5) % 21;
        let height = 1 + (seed as usize * 3) % 17;
        let colors = 1 + seed as usize % 4;
        let grid = random_grid(width, height, seed, colors);
        saw_background |= grid.cells().iter().any(Cell::is_background);
        let rectangles = decompose_with(&grid, &options);
        assert_eq!(
            rectangles[0],
            Rectangle {
                x: 0,
                y: 0,
                width,
                height,
                color: background_color,
            },
            "first rectangle must be the canvas"
        );
        assert_exact_cover(&grid, &rectangles[1..], background_color, |cell| {
            !cell.is_background()
        });
    }
    assert!(saw_background, "no grid contained background cells");
}

#[test]
fn decomposition_is_deterministic() {
    let grid = random_grid(31, 17, 99, 3);
    let first = decompose(&grid);
    let second = decompose(&grid);
    assert_eq!(first, second);
}

#[test]
fn rectangles_are_ordered_by_top_left_cell() {
    let grid = random_grid(20, 20, 7, 4);
    let rectangles = decompose(&grid);
    let origins: Vec<(usize, usize)> = rectangles.iter().map(|r| (r.y, r.x)).collect();
    let mut sorted = origins.clone();
    sorted.sort();
    assert_eq!(origins, sorted);
}

#[test]
fn solid_grid_is_a_single_rectangle() {
    let color = Pixel::opaque(64, 128, 192);
    let grid = Grid::new(9, 4, vec![Cell::Color(color); 36]).unwrap();
    assert_eq!(
        decompose(&grid),
        vec![Rectangle {
            x: 0,
            y: 0,
            width: 9,
            height: 4,
            color,
        }]
    );
}

#[test]
fn checkerboard_is_one_rectangle_per_cell() {
    let (width, height) = (8, 5);
    let cells = (0..width * height)
        .map(|index| Cell::Color(PALETTE[(index % width + index / width) % 2]))
        .collect();
    let grid = Grid::new(width, height, cells).unwrap();
    let rectangles = decompose(&grid);
    assert_eq!(rectangles.len(), width * height);
    assert_partition(&grid, &rectangles);
}

#[test]
fn mapped_coordinates_round_trip() {
    let mapper = CoordinateMapper::new(10, 0.5).unwrap();
    let record = mapper.map(&Rectangle {
        x: 2,
        y: 3,
        width: 4,
        height: 2,
        color: Pixel::WHITE,
    });
    assert_eq!(
        (record.x_min, record.x_max, record.y_min, record.y_max),
        (1.0, 3.0, 2.5, 3.5)
    );
}

#[test]
fn quantization_is_idempotent_on_random_pixels() {
    let mut rng = Lcg(2024);
    let pixels = (0..64 * 64)
        .map(|_| {
            let value = rng.next();
            Pixel::new(
                value as u8,
                (value >> 8) as u8,
                (value >> 16) as u8,
                (value >> 24) as u8,
            )
        })
        .collect();
    let grid = Grid::new(64, 64, pixels).unwrap();
    let options = QuantizationOptions {
        step: 16,
        alpha_mode: AlphaMode::Continuous,
    };
    let quantizer = Quantizer::new(&options).unwrap();
    let once = quantizer.quantize(&grid);
    let twice = quantizer.quantize(&once.map(|cell| cell.color_or(Pixel::TRANSPARENT)));
    assert_eq!(once, twice);
}

#[test]
fn binary_alpha_merges_all_transparent_pixels() {
    let grid = Grid::from_rows(vec![
        vec![Pixel::new(255, 0, 0, 10), Pixel::new(0, 255, 0, 90)],
        vec![Pixel::new(0, 0, 255, 0), Pixel::new(9, 9, 9, 127)],
    ])
    .unwrap();
    let options = PipelineOptions {
        quantization: QuantizationOptions {
            step: 16,
            alpha_mode: AlphaMode::Binary,
        },
        scale: 1.0,
        ..Default::default()
    };
    let records = grid_to_records(&grid, &options, "transparent").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].color, Pixel::TRANSPARENT);
    assert_eq!(records[0].opacity, 0.0);
}

#[test]
fn empty_input_yields_no_records() {
    let grid: Grid<Pixel> = Grid::empty();
    let records = grid_to_records(&grid, &PipelineOptions::default(), "empty").unwrap();
    assert!(records.is_empty());
    assert!(decompose(&Grid::empty()).is_empty());
}
