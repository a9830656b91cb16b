//! False-color rendering with the inferno palette.
use lazy_static::lazy_static;
use ndarray::Array2;

use crate::normalize::NormalizedImage;

pub type Rgb = [u8; 3];

lazy_static! {
    /// The inferno palette sampled at 256 evenly spaced
    /// points, indexed by 8-bit intensity.
    pub static ref INFERNO: [Rgb; 256] = {
        let mut table = [[0u8; 3]; 256];
        for (idx, entry) in table.iter_mut().enumerate() {
            *entry = colorous::INFERNO.eval_rational(idx, table_len()).as_array();
        }
        table
    };
}

const fn table_len() -> usize {
    u8::MAX as usize + 1
}

/// Color of a single intensity.
#[inline]
pub fn inferno(value: u8) -> Rgb {
    INFERNO[value as usize]
}

/// An RGB grid, indexed `(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorizedImage(pub Array2<Rgb>);

impl ColorizedImage {
    pub fn grid(&self) -> &Array2<Rgb> {
        &self.0
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    /// Interleaved `RGBRGB...` bytes in row-major order.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|px| px.iter().copied()).collect()
    }
}

pub fn colorize(image: &NormalizedImage) -> ColorizedImage {
    ColorizedImage(image.grid().mapv(inferno))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn table_is_total_and_stable() {
        for value in 0..=u8::MAX {
            assert_eq!(inferno(value), inferno(value));
            assert_eq!(inferno(value), INFERNO[value as usize]);
        }
    }

    #[test]
    fn dark_to_bright() {
        let [r, g, b] = inferno(0);
        assert!((r as u32 + g as u32 + b as u32) < 30, "{:?}", inferno(0));
        let [r, g, _] = inferno(255);
        assert!(r > 240 && g > 240, "{:?}", inferno(255));
    }

    #[test]
    fn colorize_indexes_table() {
        let image = NormalizedImage(array![[0u8, 64], [128, 255]]);
        let colored = colorize(&image);
        assert_eq!(colored.dim(), (2, 2));
        assert_eq!(colored.grid()[(1, 0)], inferno(128));
        assert_eq!(colored.grid()[(0, 1)], inferno(64));

        let bytes = colored.to_rgb_bytes();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[9..12], &inferno(255));
    }
}
