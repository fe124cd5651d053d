use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
pub use error::{Error, ErrorKind};
use threadpool::ThreadPool;

use color::Pixel;
use constraint::{writer::RecordWriter, ConstraintRecord, CoordinateMapper};
use image::{
    decomposer::{DecomposerOptions, LoggingObserver, RectangleDecomposer},
    quantizer::{AlphaMode, QuantizationOptions, Quantizer},
    reader::ppm::PPMImageReader,
    Grid, ImageReader,
};

pub mod batch;
mod cli;
pub mod color;
pub mod constraint;
mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

const OUTPUT_FILE_EXTENSION: &str = "rects";

pub struct Arguments {
    input_files: Vec<PathBuf>,
    output_directory: Option<PathBuf>,
    quantization_step: u16,
    alpha_mode: AlphaMode,
    exclude_background: bool,
    scale: f64,
    max_side: usize,
    number_of_threads: usize,
}

/// Settings for one run of the quantize, decompose and map pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineOptions {
    pub quantization: QuantizationOptions,
    pub decomposer: DecomposerOptions,
    pub scale: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            quantization: QuantizationOptions::default(),
            decomposer: DecomposerOptions::default(),
            scale: constraint::DEFAULT_SCALE,
        }
    }
}

impl From<&Arguments> for PipelineOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            quantization: QuantizationOptions {
                step: value.quantization_step,
                alpha_mode: value.alpha_mode,
            },
            decomposer: DecomposerOptions {
                exclude_background: value.exclude_background,
                max_side: value.max_side,
                ..Default::default()
            },
            scale: value.scale,
        }
    }
}

/// Quantizes `grid`, decomposes it into rectangles and maps them to
/// constraint records. All options are validated before any work is done.
pub fn grid_to_records(
    grid: &Grid<Pixel>,
    options: &PipelineOptions,
    label: &str,
) -> Result<Vec<ConstraintRecord>> {
    let quantizer = Quantizer::new(&options.quantization)?;
    let decomposer = RectangleDecomposer::new(&options.decomposer)?;
    let mapper = CoordinateMapper::new(grid.height(), options.scale)?;
    let quantized = quantizer.quantize(grid);
    let mut observer = LoggingObserver::new(label);
    let rectangles = decomposer.decompose_with_observer(&quantized, &mut observer)?;
    logger::log_decomposition_summary(label, grid.width(), grid.height(), rectangles.len());
    Ok(mapper.map_all(&rectangles))
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

fn output_path(input_file: &Path, output_directory: Option<&Path>) -> PathBuf {
    let output_file = input_file.with_extension(OUTPUT_FILE_EXTENSION);
    match (output_directory, output_file.file_name()) {
        (Some(directory), Some(file_name)) => directory.join(file_name),
        _ => output_file,
    }
}

pub fn convert_ppm_file(
    input_file: &Path,
    output_file: &Path,
    options: &PipelineOptions,
) -> Result<()> {
    let input = open_input_file(input_file)?;
    let grid = PPMImageReader::new(BufReader::new(input)).read_image()?;
    let label = input_file.display().to_string();
    let records = grid_to_records(&grid, options, &label)?;
    let output = open_output_file(output_file)?;
    let mut writer = RecordWriter::new(BufWriter::new(output));
    writer.write_records(grid.width(), grid.height(), &records)
}

/// Converts every input file in parallel and returns the written output
/// paths in input order. Fails with the first error encountered.
pub fn convert_ppm_to_records(arguments: &Arguments) -> Result<Vec<PathBuf>> {
    let options = PipelineOptions::from(arguments);
    Quantizer::new(&options.quantization)?;
    RectangleDecomposer::new(&options.decomposer)?;
    CoordinateMapper::new(0, options.scale)?;
    let pool = ThreadPool::new(arguments.number_of_threads.max(1));
    let output_directory = arguments.output_directory.clone();
    let results = batch::run_batch(&pool, &arguments.input_files, move |input_file| {
        let output_file = output_path(input_file, output_directory.as_deref());
        convert_ppm_file(input_file, &output_file, &options)?;
        Ok(output_file)
    });
    results.into_iter().collect()
}
