//! The full analysis run: decode, normalize, optionally
//! enhance, colorize, and then sample temperatures.
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::{
    colormap::{colorize, ColorizedImage},
    enhance::enhance,
    error::Error,
    image::{BitDepth, SourceImage},
    normalize::{normalize, NormalizedImage},
    readings::{ReadingLog, TemperatureReading},
    settings::AnalysisSettings,
    temperature::TemperatureBounds,
};

/// Result of one pipeline run over one image.
///
/// Fresh buffers are produced for every run; nothing is
/// shared between analyses.
#[derive(Debug, Clone)]
pub struct Analysis {
    bit_depth: BitDepth,
    bounds: TemperatureBounds,
    normalized: NormalizedImage,
    colorized: ColorizedImage,
}

/// Paths written by [`Analysis::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub normalized: PathBuf,
    pub colorized: PathBuf,
}

impl Analysis {
    #[instrument(level = "debug", skip(path, settings), fields(path = %path.as_ref().display()))]
    pub fn from_path<P: AsRef<Path>>(path: P, settings: &AnalysisSettings) -> Result<Self> {
        let source = SourceImage::from_path(path)?;
        Ok(Self::from_source(&source, settings))
    }

    pub fn from_source(source: &SourceImage, settings: &AnalysisSettings) -> Self {
        let bit_depth = source.bit_depth();
        let mut normalized = normalize(source);
        if bit_depth == BitDepth::SixteenBit && settings.enhance.enabled {
            normalized = enhance(normalized, &settings.enhance);
        }
        let colorized = colorize(&normalized);
        let (height, width) = normalized.dim();
        debug!(width, height, bits = bit_depth.bits(), "analysis ready");

        Analysis {
            bit_depth,
            bounds: settings.bounds,
            normalized,
            colorized,
        }
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn bounds(&self) -> TemperatureBounds {
        self.bounds
    }

    pub fn normalized(&self) -> &NormalizedImage {
        &self.normalized
    }

    pub fn colorized(&self) -> &ColorizedImage {
        &self.colorized
    }

    pub fn width(&self) -> usize {
        self.normalized.dim().1
    }

    pub fn height(&self) -> usize {
        self.normalized.dim().0
    }

    /// Temperature of the mean intensity; `None` for an
    /// empty image.
    pub fn average_temperature(&self) -> Option<f64> {
        let t = self.bounds.temperature_transform();
        self.normalized.mean().map(t)
    }

    /// Temperature at pixel `(x, y)`, rejecting coordinates
    /// outside the image.
    pub fn temperature_at(&self, x: usize, y: usize) -> Result<f64> {
        let intensity = self.normalized.get(x, y).ok_or(Error::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        })?;
        Ok(self.bounds.temperature_of(intensity))
    }

    /// Pull an arbitrary coordinate onto the nearest pixel.
    /// `None` for an empty image.
    pub fn clamp_coordinate(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        if self.width() == 0 || self.height() == 0 {
            return None;
        }
        let clamp = |v: i64, len: usize| v.max(0).min(len as i64 - 1) as usize;
        Some((clamp(x, self.width()), clamp(y, self.height())))
    }

    /// Sample `(x, y)` and append the reading to `log`.
    pub fn sample<'a>(
        &self,
        log: &'a mut ReadingLog,
        x: usize,
        y: usize,
    ) -> Result<&'a TemperatureReading> {
        let temperature = self.temperature_at(x, y)?;
        Ok(log.record(x, y, temperature))
    }

    /// Write both images as PNGs named after `stem` into
    /// `dir`.
    #[instrument(level = "debug", skip(self, dir))]
    pub fn save<P: AsRef<Path>>(&self, dir: P, stem: &str) -> Result<OutputPaths> {
        let dir = dir.as_ref();
        let paths = OutputPaths {
            normalized: dir.join(format!("{}.normalized.png", stem)),
            colorized: dir.join(format!("{}.inferno.png", stem)),
        };

        let gray: Vec<u8> = self.normalized.grid().iter().copied().collect();
        write_png(
            &paths.normalized,
            self.width(),
            self.height(),
            png::ColorType::Grayscale,
            &gray,
        )?;
        write_png(
            &paths.colorized,
            self.width(),
            self.height(),
            png::ColorType::RGB,
            &self.colorized.to_rgb_bytes(),
        )?;

        Ok(paths)
    }
}

fn write_png(
    path: &Path,
    width: usize,
    height: usize,
    color: png::ColorType,
    data: &[u8],
) -> Result<()> {
    let image_writer =
        BufWriter::new(File::create(path).with_context(|| format!("creating {}", path.display()))?);
    let mut png_writer = {
        let mut encoder = png::Encoder::new(image_writer, width as u32, height as u32);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header()?
    };
    png_writer.write_image_data(data)?;
    Ok(())
}
