mod args;

use std::{
    convert::TryFrom,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use thermal_map::{cli::init_logging, Analysis, CsvSink, ReadingLog};

use args::Args;

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;

    let analysis = Analysis::from_path(&args.image, &args.settings)?;
    let mut log = ReadingLog::new();

    for &(x, y) in &args.points {
        let (px, py) = if args.clamp {
            let clamped = analysis
                .clamp_coordinate(x, y)
                .ok_or_else(|| anyhow!("{} has no pixels", args.image.display()))?;
            if (clamped.0 as i64, clamped.1 as i64) != (x, y) {
                warn!(x, y, clamped = ?clamped, "clamped sample point");
            }
            clamped
        } else {
            (to_index(x)?, to_index(y)?)
        };
        let reading = analysis.sample(&mut log, px, py)?;
        debug!(x = px, y = py, temperature = reading.temperature(), "sampled");
    }

    let mut sink = CsvSink::new(open_output(args.csv.as_deref())?);
    log.export(&mut sink)?;

    if let Some(average) = analysis.average_temperature() {
        eprintln!("Average temperature: {:.1} C", average);
    }
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout()),
    })
}

fn to_index(v: i64) -> Result<usize> {
    usize::try_from(v).map_err(|_| anyhow!("negative coordinate {} (use --clamp)", v))
}
