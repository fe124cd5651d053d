use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    JaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },
    CellCountMismatch {
        expected: usize,
        actual: usize,
    },
    GridTooLarge {
        width: usize,
        height: usize,
        max_side: usize,
    },
    InvalidQuantizationStep(u16),
    InvalidScaleFactor(f64),
    InvalidBatchSize,
    DecompositionCancelled {
        row: usize,
    },
    PPMFileDoesNotContainRequiredToken(&'static str),
    ParsingOfTokenFailed(&'static str),
    IncompletePixelParsed(usize),
    MismatchOfSizeBetweenHeaderAndValues,
    ColorValueExceedsMaximum(u16, u16),
    FailedToReadInput(std::io::Error),
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToWriteRecords(std::io::Error),
    WorkerPanicked(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Shape,
    ResourceLimit,
    Config,
    Cancelled,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::JaggedGrid { .. } | Self::CellCountMismatch { .. } => ErrorKind::Shape,
            Self::GridTooLarge { .. } => ErrorKind::ResourceLimit,
            Self::InvalidQuantizationStep(_)
            | Self::InvalidScaleFactor(_)
            | Self::InvalidBatchSize => ErrorKind::Config,
            Self::DecompositionCancelled { .. } => ErrorKind::Cancelled,
            Self::PPMFileDoesNotContainRequiredToken(_)
            | Self::ParsingOfTokenFailed(_)
            | Self::IncompletePixelParsed(_)
            | Self::MismatchOfSizeBetweenHeaderAndValues
            | Self::ColorValueExceedsMaximum(_, _)
            | Self::FailedToReadInput(_)
            | Self::UnableToOpenInputFileForReading(_, _)
            | Self::UnableToOpenOutputFileForWriting(_, _)
            | Self::FailedToWriteRecords(_)
            | Self::WorkerPanicked(_) => ErrorKind::Io,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JaggedGrid {
                row,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Row {} has {} cells, but the first row has {}",
                    row, actual, expected
                )
            }
            Self::CellCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Grid dimensions require {} cells, but {} were given",
                    expected, actual
                )
            }
            Self::GridTooLarge {
                width,
                height,
                max_side,
            } => {
                write!(
                    f,
                    "Grid of {}x{} exceeds the maximum side length of {}",
                    width, height, max_side
                )
            }
            Self::InvalidQuantizationStep(step) => {
                write!(
                    f,
                    "Quantization step must be between 1 and 255, but was {}",
                    step
                )
            }
            Self::InvalidScaleFactor(scale) => {
                write!(f, "Scale factor must be positive and finite, but was {}", scale)
            }
            Self::InvalidBatchSize => write!(f, "Rows per batch must be greater than zero"),
            Self::DecompositionCancelled { row } => {
                write!(f, "Decomposition cancelled while scanning row {}", row)
            }
            Self::PPMFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in PPM file", token_name)
            }
            Self::ParsingOfTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::IncompletePixelParsed(number_of_tokens_parsed) => {
                write!(
                    f,
                    "Incomplete pixel parsed. Expected 3 components, but got {}.",
                    number_of_tokens_parsed
                )
            }
            Self::MismatchOfSizeBetweenHeaderAndValues => {
                write!(
                    f,
                    "Number of pixels does not match the size provided in header"
                )
            }
            Self::ColorValueExceedsMaximum(value, max) => {
                write!(
                    f,
                    "Color value {} is greater than the maximum value of {}",
                    value, max
                )
            }
            Self::FailedToReadInput(error) => {
                write!(f, "Failed to read input image: {}", error)
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToWriteRecords(error) => {
                write!(f, "Failed to write constraint records: {}", error)
            }
            Self::WorkerPanicked(path) => {
                write!(f, "Worker processing '{}' terminated unexpectedly", path)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToReadInput(error)
            | Self::FailedToWriteRecords(error) => Some(error),
            _ => None,
        }
    }
}
