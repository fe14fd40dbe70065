use crate::config::WriterConfig;
use crate::escape::{escape_key, escape_measurement};
use crate::field_value::FieldValue;
use anyhow::{Error, Result};
use log::trace;
use std::io;
use std::time::Instant;

/// A single line protocol record.
///
/// Tags and fields keep the order in which they were first inserted; that
/// order is the order they are written in. A `Point` always has a non-empty
/// measurement and at least one field. Tags with an empty key or value are
/// kept but not written, since ingestion rejects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    measurement: String,
    tags: Vec<(String, String)>,
    fields: Vec<(String, FieldValue)>,
    timestamp: Option<i64>,
}

impl Point {
    /// Returns `None` when `measurement` or `fields` is empty, as such a line
    /// cannot be written.
    pub fn new(
        measurement: String,
        tags: Vec<(String, String)>,
        fields: Vec<(String, FieldValue)>,
        timestamp: Option<i64>,
    ) -> Option<Self> {
        if measurement.is_empty() || fields.is_empty() {
            return None;
        }

        Some(Point {
            measurement,
            tags,
            fields,
            timestamp,
        })
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Writes the line, without a trailing newline, to any `fmt::Write` sink.
    pub fn write_fmt_to<W: std::fmt::Write>(
        &self,
        writer: &mut W,
        config: &WriterConfig,
    ) -> std::fmt::Result {
        writer.write_str(&escape_measurement(&self.measurement))?;

        for (key, value) in self.tags.iter() {
            if key.is_empty() || value.is_empty() {
                continue;
            }
            writer.write_char(',')?;
            writer.write_str(&escape_key(key))?;
            writer.write_char('=')?;
            writer.write_str(&escape_key(value))?;
        }

        writer.write_char(' ')?;

        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                writer.write_char(',')?;
            }
            writer.write_str(&escape_key(key))?;
            writer.write_char('=')?;
            writer.write_str(&value.to_line_protocol(config))?;
        }

        if let Some(timestamp) = self.timestamp {
            write!(writer, " {}", timestamp)?;
        }

        Ok(())
    }

    pub fn to_line_protocol(&self, config: &WriterConfig) -> String {
        let mut line = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_fmt_to(&mut line, config);
        line
    }

    /// Writes the line, without a trailing newline, to a byte sink.
    ///
    /// The line is rendered in memory first, so the only failure is the sink
    /// rejecting the write.
    #[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
    pub fn write_to<W: io::Write>(&self, writer: &mut W, config: &WriterConfig) -> Result<(), Error> {
        writer.write_all(self.to_line_protocol(config).as_bytes())?;
        Ok(())
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.write_fmt_to(f, &WriterConfig::default())
    }
}

/// Writes every point as its own `\n`-terminated line.
#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn write_points<W: io::Write>(
    points: &[Point],
    writer: &mut W,
    config: &WriterConfig,
) -> Result<usize, Error> {
    let function_start = Instant::now();

    let mut body = String::new();
    for point in points.iter() {
        body.push_str(&point.to_line_protocol(config));
        body.push('\n');
    }
    writer.write_all(body.as_bytes())?;

    trace!(
        "write_points wrote {} lines in {:?}",
        points.len(),
        function_start.elapsed()
    );
    Ok(points.len())
}
