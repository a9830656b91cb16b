//! Analysis configuration.
//!
//! Settings can be read from a JSON file; every field is
//! optional and falls back to its default. Command-line
//! options override file values.
use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde_derive::*;

use crate::{enhance::EnhanceSettings, temperature::TemperatureBounds};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    #[serde(flatten)]
    pub bounds: TemperatureBounds,
    pub enhance: EnhanceSettings,
}

impl AnalysisSettings {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing settings from {}", path.display()))
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        if let Some(min) = min {
            self.bounds.min = min;
        }
        if let Some(max) = max {
            self.bounds.max = max;
        }
        self
    }
}
