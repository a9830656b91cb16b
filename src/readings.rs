//! Session log of sampled temperatures and its table export.
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local};
use serde_derive::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single sampled temperature. Immutable once recorded.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    timestamp: DateTime<Local>,
    x: usize,
    y: usize,
    temperature: f64,
}

impl TemperatureReading {
    pub fn new(timestamp: DateTime<Local>, x: usize, y: usize, temperature: f64) -> Self {
        TemperatureReading {
            timestamp,
            x,
            y,
            temperature,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    /// Celsius.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

/// Append-only, ordered sequence of readings for one
/// analysis session.
#[derive(Debug, Default, Clone)]
pub struct ReadingLog {
    readings: Vec<TemperatureReading>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading stamped with the current local time.
    pub fn record(&mut self, x: usize, y: usize, temperature: f64) -> &TemperatureReading {
        self.push(TemperatureReading::new(Local::now(), x, y, temperature))
    }

    pub fn push(&mut self, reading: TemperatureReading) -> &TemperatureReading {
        self.readings.push(reading);
        &self.readings[self.readings.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemperatureReading> {
        self.readings.iter()
    }

    pub fn as_slice(&self) -> &[TemperatureReading] {
        &self.readings
    }

    /// Write every reading, in recording order.
    pub fn export<S: ReadingSink>(&self, sink: &mut S) -> Result<()> {
        for reading in self.iter() {
            sink.write_reading(reading)?;
        }
        sink.finish()
    }
}

/// Anything that can store readings as table rows.
pub trait ReadingSink {
    fn write_reading(&mut self, reading: &TemperatureReading) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One exported row: `timestamp,x,y,temperature_celsius`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReadingRow {
    pub timestamp: String,
    pub x: usize,
    pub y: usize,
    pub temperature_celsius: f64,
}

impl From<&TemperatureReading> for ReadingRow {
    fn from(reading: &TemperatureReading) -> Self {
        ReadingRow {
            timestamp: reading.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            x: reading.x,
            y: reading.y,
            temperature_celsius: reading.temperature,
        }
    }
}

/// CSV export with a header row.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        CsvSink {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flushing csv: {}", e.error()))
    }
}

impl<W: Write> ReadingSink for CsvSink<W> {
    fn write_reading(&mut self, reading: &TemperatureReading) -> Result<()> {
        self.writer.serialize(ReadingRow::from(reading))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
