//! Map thermal camera images to temperatures.
//!
//! The crate turns an 8-bit or 16-bit grayscale capture into
//! (1) an 8-bit [normalized](normalize) intensity grid, (2) a
//! false-color rendering with the [inferno](colormap)
//! palette, and (3) a linear [mapping](temperature) from any
//! pixel to a temperature within user supplied bounds.
//! Sampled temperatures are collected in a [`ReadingLog`]
//! that can be exported as CSV.
//!
//! # Usage
//!
//! ```rust
//! # fn test_compile() -> anyhow::Result<()> {
//! use thermal_map::{Analysis, AnalysisSettings, ReadingLog};
//!
//! let analysis = Analysis::from_path("frame.tif", &AnalysisSettings::default())?;
//! let mut log = ReadingLog::new();
//! let reading = analysis.sample(&mut log, 10, 20)?;
//! println!("{:.1}°C", reading.temperature());
//! # Ok(())
//! # }
//! ```
//!
//! ## Normalization
//!
//! 16-bit sources are stretched so that their observed
//! minimum and maximum become 0 and 255 (halves round up);
//! flat images become mid-gray. 8-bit sources are used as
//! they are. Color images are first reduced to BT.601 luma.
//!
//! ## Temperatures
//!
//! `temperature = min + v / 255 * (max - min)`, see
//! [`pixel_to_temperature`].

pub mod colormap;
pub mod enhance;
pub mod error;
pub mod image;
pub mod normalize;
pub mod pipeline;
pub mod readings;
pub mod settings;
pub mod temperature;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::error::Error;
pub use crate::image::{detect_bit_depth, BitDepth, SourceImage};
pub use crate::pipeline::Analysis;
pub use crate::readings::{CsvSink, ReadingLog, ReadingSink, TemperatureReading};
pub use crate::settings::AnalysisSettings;
pub use crate::temperature::{pixel_to_temperature, TemperatureBounds};
