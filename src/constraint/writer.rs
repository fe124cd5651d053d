use std::io::Write;

use super::ConstraintRecord;
use crate::{error::Error, Result};

/// Writes constraint records as whitespace separated text, one record per
/// line: `x_min x_max y_min y_max #rrggbb opacity`.
pub struct RecordWriter<T: Write> {
    writer: T,
}

impl<T: Write> RecordWriter<T> {
    pub fn new(writer: T) -> Self {
        Self { writer }
    }

    pub fn write_records(
        &mut self,
        canvas_width: usize,
        canvas_height: usize,
        records: &[ConstraintRecord],
    ) -> Result<()> {
        self.write_header(canvas_width, canvas_height, records.len())
            .map_err(Error::FailedToWriteRecords)?;
        for record in records {
            self.write_record(record)
                .map_err(Error::FailedToWriteRecords)?;
        }
        self.writer.flush().map_err(Error::FailedToWriteRecords)
    }

    pub fn into_inner(self) -> T {
        self.writer
    }

    fn write_header(
        &mut self,
        canvas_width: usize,
        canvas_height: usize,
        count: usize,
    ) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "# canvas {}x{}, {} records",
            canvas_width, canvas_height, count
        )
    }

    fn write_record(&mut self, record: &ConstraintRecord) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} {} {} {} {} {}",
            record.x_min, record.x_max, record.y_min, record.y_max, record.color, record.opacity
        )
    }
}
