use std::time::{Duration, Instant};

use pixel_rect_decomposer::color::{Cell, Pixel};
use pixel_rect_decomposer::image::decomposer::{DecomposerOptions, RectangleDecomposer};
use pixel_rect_decomposer::image::Grid;

const GRID_SIDE: usize = 256;
const NUMBER_OF_ROUNDS: u32 = 10;

const DARK: Cell = Cell::Color(Pixel::opaque(16, 16, 16));
const LIGHT: Cell = Cell::Color(Pixel::opaque(240, 240, 240));

fn create_checkerboard() -> Grid<Cell> {
    let cells = (0..GRID_SIDE * GRID_SIDE)
        .map(|index| {
            let x = index % GRID_SIDE;
            let y = index / GRID_SIDE;
            if (x + y) % 2 == 0 {
                DARK
            } else {
                LIGHT
            }
        })
        .collect();
    Grid::new(GRID_SIDE, GRID_SIDE, cells).unwrap()
}

/// Long horizontal runs that end one row short of each other, so every seed
/// probes a full row before failing.
fn create_staircase() -> Grid<Cell> {
    let cells = (0..GRID_SIDE * GRID_SIDE)
        .map(|index| {
            let x = index % GRID_SIDE;
            let y = index / GRID_SIDE;
            if x + y < GRID_SIDE {
                DARK
            } else {
                LIGHT
            }
        })
        .collect();
    Grid::new(GRID_SIDE, GRID_SIDE, cells).unwrap()
}

fn calculate_std_deviation_in_micros(mean: &Duration, measurements: &[Duration]) -> u64 {
    let mean_micros = mean.as_micros() as i128;
    let sum = measurements
        .iter()
        .map(|m| m.as_micros() as i128 - mean_micros)
        .map(|v| v.pow(2).unsigned_abs())
        .sum::<u128>();
    let variance = sum / measurements.len() as u128;
    (variance as f64).sqrt().round() as u64
}

fn time_decomposition(name: &str, grid: &Grid<Cell>) {
    let options = DecomposerOptions::default();
    let decomposer = RectangleDecomposer::new(&options).unwrap();
    println!("Starting {} decomposition", name);
    let mut durations: Vec<Duration> = Vec::new();
    let mut rectangles = 0;

    for round in 1..=NUMBER_OF_ROUNDS {
        let start = Instant::now();
        rectangles = decomposer.decompose(grid).unwrap().len();
        let duration = start.elapsed();

        println!(
            "Finished round {} after {} microseconds",
            round,
            duration.as_micros(),
        );
        durations.push(duration);
    }

    let min_duration = durations.iter().min().unwrap();
    let max_duration = durations.iter().max().unwrap();
    let avg_duration = durations.iter().sum::<Duration>() / NUMBER_OF_ROUNDS;
    let std_deviation = calculate_std_deviation_in_micros(&avg_duration, &durations);

    println!(
        "{} ({} rectangles) Min: {}, Max: {}, Average: {}, Std Deviation: {}",
        name,
        rectangles,
        min_duration.as_micros(),
        max_duration.as_micros(),
        avg_duration.as_micros(),
        std_deviation,
    );
}

fn main() {
    println!("Creating test grids");
    let checkerboard = create_checkerboard();
    let staircase = create_staircase();
    time_decomposition("checkerboard", &checkerboard);
    time_decomposition("staircase", &staircase);
}
