//! Optional clean-up of normalized 16-bit captures.
//!
//! Each step only runs when a simple image statistic says it
//! is needed:
//!
//! 1. low contrast (standard deviation below a threshold):
//!    histogram equalization;
//! 2. noisy (variance of the Laplacian above a threshold):
//!    3x3 median filter, then a gaussian blur if still noisy;
//! 3. too dark or too bright (mean outside a band): scale
//!    intensities so the mean moves to mid-gray.
use image::GrayImage;
use imageproc::{
    contrast::equalize_histogram,
    filter::{gaussian_blur_f32, median_filter},
};
use ndarray::{s, Array2};
use serde_derive::*;
use tracing::debug;

use crate::normalize::NormalizedImage;

const MID_GRAY: f64 = 128.;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EnhanceSettings {
    pub enabled: bool,
    pub min_contrast_std: f64,
    pub max_laplacian_variance: f64,
    pub blur_sigma: f32,
    pub brightness_band: (f64, f64),
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        EnhanceSettings {
            enabled: false,
            min_contrast_std: 40.,
            max_laplacian_variance: 100.,
            blur_sigma: 1.,
            brightness_band: (80., 180.),
        }
    }
}

pub fn enhance(image: NormalizedImage, settings: &EnhanceSettings) -> NormalizedImage {
    let grid = image.into_grid();
    if grid.is_empty() {
        return NormalizedImage(grid);
    }
    let (height, width) = grid.dim();
    let mut gray = match to_gray_image(&grid) {
        Some(gray) => gray,
        None => return NormalizedImage(grid),
    };

    let std_dev = std_dev(&grid);
    if std_dev < settings.min_contrast_std {
        debug!(std_dev, "equalizing histogram");
        gray = equalize_histogram(&gray);
    }

    let variance = laplacian_variance(&from_gray_image(&gray, height, width));
    if variance > settings.max_laplacian_variance {
        debug!(variance, "median filtering");
        gray = median_filter(&gray, 1, 1);
        let variance = laplacian_variance(&from_gray_image(&gray, height, width));
        if variance > settings.max_laplacian_variance {
            debug!(variance, sigma = settings.blur_sigma, "gaussian blur");
            gray = gaussian_blur_f32(&gray, settings.blur_sigma);
        }
    }

    let mut grid = from_gray_image(&gray, height, width);
    let mean = grid.iter().map(|&v| v as f64).sum::<f64>() / grid.len() as f64;
    let (low, high) = settings.brightness_band;
    if (mean < low || mean > high) && mean > 0. {
        let factor = MID_GRAY / mean;
        debug!(mean, factor, "adjusting brightness");
        grid.mapv_inplace(|v| (v as f64 * factor).round().min(u8::MAX as f64) as u8);
    }

    NormalizedImage(grid)
}

fn to_gray_image(grid: &Array2<u8>) -> Option<GrayImage> {
    let (height, width) = grid.dim();
    GrayImage::from_raw(width as u32, height as u32, grid.iter().copied().collect())
}

fn from_gray_image(gray: &GrayImage, height: usize, width: usize) -> Array2<u8> {
    Array2::from_shape_fn((height, width), |(row, col)| {
        gray.get_pixel(col as u32, row as u32)[0]
    })
}

fn std_dev(grid: &Array2<u8>) -> f64 {
    grid.mapv(|v| v as f64).std(0.)
}

/// Variance of the 4-neighbour Laplacian over interior pixels.
fn laplacian_variance(grid: &Array2<u8>) -> f64 {
    let (height, width) = grid.dim();
    if height < 3 || width < 3 {
        return 0.;
    }
    let g = grid.mapv(|v| v as f64);
    let center = g.slice(s![1..-1, 1..-1]);
    let laplacian = &g.slice(s![..-2, 1..-1])
        + &g.slice(s![2.., 1..-1])
        + &g.slice(s![1..-1, ..-2])
        + &g.slice(s![1..-1, 2..])
        - &(&center * 4.);
    laplacian.std(0.).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn enabled() -> EnhanceSettings {
        EnhanceSettings {
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn smooth_laplacian_is_zero() {
        // a linear ramp has no curvature
        let grid = Array2::from_shape_fn((5, 6), |(r, c)| (10 * r + 5 * c) as u8);
        assert_eq!(laplacian_variance(&grid), 0.);
    }

    #[test]
    fn checkerboard_is_noisy() {
        let grid = Array2::from_shape_fn((8, 8), |(r, c)| if (r + c) % 2 == 0 { 0 } else { 255 });
        assert!(laplacian_variance(&grid) > 100.);
    }

    #[test]
    fn dark_image_is_brightened() {
        // high contrast, smooth, but dark
        let grid = Array2::from_shape_fn((4, 64), |(_, c)| c as u8);
        let before = grid.mapv(|v| v as f64).mean().unwrap();
        assert!(before < 80.);

        let out = enhance(NormalizedImage(grid), &EnhanceSettings {
            min_contrast_std: 0.,
            ..enabled()
        });
        let after = out.grid().mapv(|v| v as f64).mean().unwrap();
        assert!((after - MID_GRAY).abs() < 2., "mean {}", after);
    }

    #[test]
    fn balanced_image_untouched() {
        let grid = array![[100u8, 150, 100], [150, 100, 150], [100, 150, 100]];
        let settings = EnhanceSettings {
            min_contrast_std: 0.,
            max_laplacian_variance: f64::INFINITY,
            ..enabled()
        };
        let out = enhance(NormalizedImage(grid.clone()), &settings);
        assert_eq!(out.into_grid(), grid);
    }

    #[test]
    fn low_contrast_is_equalized() {
        let grid = Array2::from_shape_fn((8, 8), |(r, c)| 120 + ((r + c) % 4) as u8);
        let before = std_dev(&grid);
        assert!(before < 40.);

        let settings = EnhanceSettings {
            max_laplacian_variance: f64::INFINITY,
            brightness_band: (0., 255.),
            ..enabled()
        };
        let out = enhance(NormalizedImage(grid), &settings);
        let after = std_dev(out.grid());
        assert!(after > 5. * before, "std {} -> {}", before, after);
    }

    #[test]
    fn isolated_spike_is_median_filtered() {
        let flat = Array2::from_elem((8, 8), 100u8);
        let mut grid = flat.clone();
        grid[(4, 4)] = 255;
        assert!(laplacian_variance(&grid) > 100.);

        let settings = EnhanceSettings {
            min_contrast_std: 0.,
            brightness_band: (0., 255.),
            ..enabled()
        };
        let out = enhance(NormalizedImage(grid), &settings);
        assert_eq!(out.into_grid(), flat);
    }

    #[test]
    fn checkerboard_is_blurred() {
        // a 3x3 median leaves a checkerboard's interior as it is,
        // so only the gaussian pass can smooth it
        let grid = Array2::from_shape_fn((8, 8), |(r, c)| if (r + c) % 2 == 0 { 0 } else { 255 });
        let before = laplacian_variance(&grid);

        let settings = EnhanceSettings {
            min_contrast_std: 0.,
            brightness_band: (0., 255.),
            ..enabled()
        };
        let out = enhance(NormalizedImage(grid), &settings);
        let after = laplacian_variance(out.grid());
        assert!(after < settings.max_laplacian_variance, "{} -> {}", before, after);
        assert!(after < before / 100.);
    }

    #[test]
    fn keeps_dimensions() {
        let grid = Array2::from_shape_fn((7, 9), |(r, c)| ((r * 31 + c * 17) % 256) as u8);
        let out = enhance(NormalizedImage(grid), &enabled());
        assert_eq!(out.dim(), (7, 9));
    }
}
