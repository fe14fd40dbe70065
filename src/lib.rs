use anyhow::{anyhow, Error, Result};
use config::{Precision, WriterConfig};
use log::{trace, warn};
use record::PointRecord;
use std::io::{BufRead, Write};
use std::time::Instant;

pub mod config;
pub mod escape;
pub mod field_value;
pub mod point;
pub mod point_builder;
pub mod record;

pub use field_value::FieldValue;
pub use point::Point;
pub use point_builder::PointBuilder;

/// Reads newline-delimited JSON records and writes one line protocol line per
/// record as soon as it is parsed. Records with an empty measurement or no
/// fields are skipped. A malformed record stops processing; lines for the
/// records before it have already been written. Returns the number of lines
/// written.
#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn handle_input<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &WriterConfig,
    precision: &Precision,
) -> Result<usize, Error> {
    let function_start = Instant::now();

    let mut written: usize = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = PointRecord::from_json(&line)
            .map_err(|error| anyhow!("Failed to parse record on line {}: {}", index + 1, error))?;
        let measurement = record.measurement.clone();
        match record.into_point(precision)? {
            Some(point) => {
                point.write_to(output, config)?;
                output.write_all(b"\n")?;
                written += 1;
            }
            None if measurement.is_empty() => {
                warn!("Skipping record on line {}: empty measurement", index + 1)
            }
            None => warn!(
                "Skipping record on line {} for measurement {}: no fields",
                index + 1,
                measurement
            ),
        }
    }

    output.flush()?;

    trace!("handle_input duration: {:?}", function_start.elapsed());
    Ok(written)
}
