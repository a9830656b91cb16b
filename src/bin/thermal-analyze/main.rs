mod args;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::iter::ParallelIterator;
use serde_derive::*;
use tracing::info;

use thermal_map::{
    cli::{init_logging, process_paths_par, AnalysisInput},
    BitDepth, TemperatureBounds,
};

use args::Args;

fn main() -> Result<()> {
    init_logging();
    let Args {
        paths,
        output,
        settings,
    } = Args::from_cmd_line()?;

    std::fs::create_dir_all(&output)
        .with_context(|| format!("creating {}", output.display()))?;

    let mut reports = process_paths_par(paths, settings)
        .map(|try_input| -> Result<_> {
            let input = try_input?;
            ImageReport::from_input(&input, &output)
        })
        .collect::<Result<Vec<_>>>()?;
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    info!(count = reports.len(), "processed images");
    serde_json::to_writer(std::io::stdout().lock(), &reports)?;

    Ok(())
}

#[derive(Serialize, Debug)]
pub struct ImageReport {
    path: PathBuf,
    width: usize,
    height: usize,
    bit_depth: BitDepth,
    bounds: TemperatureBounds,
    average_temperature: Option<f64>,
    normalized: PathBuf,
    inferno: PathBuf,
}

impl ImageReport {
    pub fn from_input(input: &AnalysisInput, output: &Path) -> Result<Self> {
        let analysis = &input.analysis;
        let written = analysis.save(output, &input.stem())?;
        let average_temperature = analysis.average_temperature();
        info!(
            path = %input.path.display(),
            average = ?average_temperature,
            "analyzed image"
        );

        Ok(ImageReport {
            path: input.path.clone(),
            width: analysis.width(),
            height: analysis.height(),
            bit_depth: analysis.bit_depth(),
            bounds: analysis.bounds(),
            average_temperature,
            normalized: written.normalized,
            inferno: written.colorized,
        })
    }
}
