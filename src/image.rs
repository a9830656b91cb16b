//! Decoding source images into intensity grids.
//!
//! Any raster format understood by the [`image`] crate is
//! accepted as long as its samples are 8 or 16 bits wide.
//! Multi-channel images are reduced to one intensity per
//! pixel with the BT.601 luma weights, keeping the native
//! sample width.
use std::path::Path;

use anyhow::{Context, Result};
use image::{io::Reader, ColorType, DynamicImage, GenericImageView};
use ndarray::Array2;
use serde_derive::*;
use tracing::debug;

use crate::error::Error;

/// Native storage width of the samples in a [`SourceImage`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BitDepth {
    EightBit,
    SixteenBit,
}

impl BitDepth {
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::EightBit => 8,
            BitDepth::SixteenBit => 16,
        }
    }

    fn of_color(color: ColorType) -> Result<Self, Error> {
        let bits = 8 * color.bytes_per_pixel() as u32 / color.channel_count().max(1) as u32;
        match bits {
            8 => Ok(BitDepth::EightBit),
            16 => Ok(BitDepth::SixteenBit),
            _ => Err(Error::UnsupportedFormat(format!(
                "{}-bit samples ({:?})",
                bits, color
            ))),
        }
    }
}

// ITU-R BT.601
const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Intensity samples of a decoded image, indexed `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceImage {
    EightBit(Array2<u8>),
    SixteenBit(Array2<u16>),
}

impl SourceImage {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = Reader::open(path)
            .and_then(|r| r.with_guessed_format())
            .with_context(|| format!("reading {}", path.display()))?;
        let image = reader
            .decode()
            .map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
        let source = Self::from_dynamic(image)?;
        debug!(
            path = %path.display(),
            bits = source.bit_depth().bits(),
            width = source.width(),
            height = source.height(),
            "decoded source image"
        );
        Ok(source)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image =
            image::load_from_memory(bytes).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
        Self::from_dynamic(image)
    }

    /// Reduce a decoded image to a single intensity channel.
    ///
    /// Gray (and gray-alpha) images keep their samples as
    /// they are; color images go through the luma weights.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let color = image.color();
        let depth = BitDepth::of_color(color)?;
        let is_gray = color.channel_count() <= 2;
        let (width, height) = (image.width() as usize, image.height() as usize);

        let source = match depth {
            BitDepth::EightBit => {
                let samples = if is_gray {
                    image.to_luma8().into_raw()
                } else {
                    weighted_luma(&image.to_rgb8().into_raw(), |v| v as u8)
                };
                SourceImage::EightBit(Array2::from_shape_vec((height, width), samples)?)
            }
            BitDepth::SixteenBit => {
                let samples = if is_gray {
                    image.to_luma16().into_raw()
                } else {
                    weighted_luma(&image.to_rgb16().into_raw(), |v| v as u16)
                };
                SourceImage::SixteenBit(Array2::from_shape_vec((height, width), samples)?)
            }
        };
        Ok(source)
    }

    pub fn bit_depth(&self) -> BitDepth {
        match self {
            SourceImage::EightBit(_) => BitDepth::EightBit,
            SourceImage::SixteenBit(_) => BitDepth::SixteenBit,
        }
    }

    /// `(height, width)`, as for [`Array2::dim`].
    pub fn dim(&self) -> (usize, usize) {
        match self {
            SourceImage::EightBit(grid) => grid.dim(),
            SourceImage::SixteenBit(grid) => grid.dim(),
        }
    }

    pub fn width(&self) -> usize {
        self.dim().1
    }

    pub fn height(&self) -> usize {
        self.dim().0
    }
}

/// Detect the sample width of the image at `path`.
pub fn detect_bit_depth<P: AsRef<Path>>(path: P) -> Result<BitDepth> {
    Ok(SourceImage::from_path(path)?.bit_depth())
}

fn weighted_luma<T, F>(rgb: &[T], cast: F) -> Vec<T>
where
    T: Copy + Into<f64>,
    F: Fn(f64) -> T,
{
    rgb.chunks_exact(3)
        .map(|px| {
            let luma = LUMA_WEIGHTS
                .iter()
                .zip(px)
                .map(|(w, &c)| w * c.into())
                .sum::<f64>();
            cast(luma.round())
        })
        .collect()
}
