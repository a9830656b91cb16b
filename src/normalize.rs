//! Dynamic-range normalization to the 8-bit domain.
use ndarray::Array2;
use tracing::{debug, warn};

use crate::image::SourceImage;

/// Output value for every sample of a flat image.
pub const FLAT_VALUE: u8 = 128;

/// An 8-bit intensity grid, indexed `(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage(pub Array2<u8>);

impl NormalizedImage {
    pub fn grid(&self) -> &Array2<u8> {
        &self.0
    }

    pub fn into_grid(self) -> Array2<u8> {
        self.0
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.0.get((y, x)).copied()
    }

    /// Mean intensity; `None` for an empty image.
    pub fn mean(&self) -> Option<f64> {
        use rayon::prelude::*;
        let count = self.0.len();
        if count == 0 {
            return None;
        }
        let sum: u64 = self.0.par_iter().map(|&v| v as u64).sum();
        Some(sum as f64 / count as f64)
    }
}

/// Bring a source image into the 8-bit domain.
///
/// 8-bit sources pass through unchanged; 16-bit sources are
/// rescaled with [`normalize_u16`].
pub fn normalize(source: &SourceImage) -> NormalizedImage {
    match source {
        SourceImage::EightBit(grid) => NormalizedImage(grid.clone()),
        SourceImage::SixteenBit(grid) => NormalizedImage(normalize_u16(grid)),
    }
}

/// Linearly rescale so the observed minimum maps to 0 and the
/// observed maximum to 255.
///
/// Halves round up: with min 1000 and max 5000, a sample of
/// 3000 lands on 127.5 and becomes 128. A flat grid becomes
/// [`FLAT_VALUE`] everywhere.
pub fn normalize_u16(grid: &Array2<u16>) -> Array2<u8> {
    let (min, max) = match observed_range(grid) {
        Some(range) => range,
        None => return Array2::zeros(grid.dim()),
    };
    debug!(min, max, "observed 16-bit range");

    if min == max {
        warn!(value = min, "flat image, using constant mid-gray");
        return Array2::from_elem(grid.dim(), FLAT_VALUE);
    }

    let range = (max - min) as f64;
    let scale = u8::MAX as f64;
    // All operands are non-negative, so `round` is round-half-up.
    grid.mapv(|v| {
        let scaled = (scale * (v - min) as f64 / range).round();
        scaled.max(0.).min(scale) as u8
    })
}

fn observed_range(grid: &Array2<u16>) -> Option<(u16, u16)> {
    grid.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
