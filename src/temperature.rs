//! Functions to compute temperature from 8-bit intensities.
//!
//! The camera's calibrated range is given as a pair of
//! bounds in celsius; intensity 0 maps onto the lower bound
//! and 255 onto the upper one, linearly in between.

use serde_derive::*;

/// Default lower bound, celsius.
pub const DEFAULT_MIN_TEMP: f64 = 0.;
/// Default upper bound, celsius.
pub const DEFAULT_MAX_TEMP: f64 = 600.;

const INTENSITY_SPAN: f64 = u8::MAX as f64;

/// Temperature range represented by the intensity range.
///
/// `min < max` is expected but not checked: swapped bounds
/// simply give a decreasing mapping.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TemperatureBounds {
    #[serde(rename = "min_temp", default = "default_min")]
    pub min: f64,
    #[serde(rename = "max_temp", default = "default_max")]
    pub max: f64,
}

fn default_min() -> f64 {
    DEFAULT_MIN_TEMP
}

fn default_max() -> f64 {
    DEFAULT_MAX_TEMP
}

impl Default for TemperatureBounds {
    fn default() -> Self {
        TemperatureBounds {
            min: DEFAULT_MIN_TEMP,
            max: DEFAULT_MAX_TEMP,
        }
    }
}

impl TemperatureBounds {
    pub fn new(min: f64, max: f64) -> Self {
        TemperatureBounds { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn temperature_transform(&self) -> impl Fn(f64) -> f64 {
        let Self { min, max } = *self;
        move |intensity| pixel_to_temperature(intensity, min, max)
    }

    pub fn temperature_of(&self, intensity: u8) -> f64 {
        pixel_to_temperature(intensity as f64, self.min, self.max)
    }
}

// temp = min + v / 255 * (max - min)
pub fn pixel_to_temperature(intensity: f64, min: f64, max: f64) -> f64 {
    min + (intensity / INTENSITY_SPAN) * (max - min)
}
