//! Helpers shared by the accompanying binaries.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::path::PathBuf;

use anyhow::{Context, Result};
pub use clap::{App, Arg};
use indicatif::{ProgressBar, ProgressStyle};
pub use inflector::Inflector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing_subscriber::EnvFilter;

use crate::{pipeline::Analysis, settings::AnalysisSettings};

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Shared options for analysis front ends: a settings file
/// plus per-bound overrides.
///
/// Names are spelled out since the returned `App` outlives
/// the strings `opt!` would build.
pub fn bound_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.setting(clap::AppSettings::AllowLeadingHyphen)
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .value_name("CONFIG")
                .help("JSON settings file (default: built-in settings)"),
        )
        .arg(
            Arg::with_name("min temp")
                .long("min-temp")
                .value_name("MIN_TEMP")
                .help("Temperature in celsius of intensity 0.  Default is 0"),
        )
        .arg(
            Arg::with_name("max temp")
                .long("max-temp")
                .value_name("MAX_TEMP")
                .help("Temperature in celsius of intensity 255.  Default is 600"),
        )
        .arg(
            Arg::with_name("enhance")
                .long("enhance")
                .short("e")
                .help("Enhance normalized 16-bit images (contrast, denoise, brightness)"),
        )
}

/// Build [`AnalysisSettings`] from the options added by
/// [`bound_args`].
pub fn settings_from_matches(matches: &clap::ArgMatches) -> Result<AnalysisSettings> {
    let mut settings = match matches.value_of("config") {
        Some(path) => AnalysisSettings::from_json_path(path)?,
        None => AnalysisSettings::default(),
    };

    let parse_bound = |name: &str| -> Result<Option<f64>> {
        matches
            .value_of(name)
            .map(|v| {
                v.parse::<i32>()
                    .map(f64::from)
                    .with_context(|| {
                        format!(
                            "`--{}` expects an integer, got {:?}",
                            name.to_kebab_case(),
                            v
                        )
                    })
            })
            .transpose()
    };
    settings = settings.with_bounds(parse_bound("min temp")?, parse_bound("max temp")?);
    if matches.is_present("enhance") {
        settings.enhance.enabled = true;
    }
    Ok(settings)
}

pub struct AnalysisInput {
    pub path: PathBuf,
    pub analysis: Analysis,
}

impl AnalysisInput {
    pub fn try_from_path(path: PathBuf, settings: &AnalysisSettings) -> Result<Self> {
        let analysis = Analysis::from_path(&path, settings)
            .with_context(|| format!("could not analyze {}", path.display()))?;
        Ok(AnalysisInput { path, analysis })
    }

    /// File stem used to name output images.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".into())
    }
}

pub fn process_paths_par(
    paths: Vec<PathBuf>,
    settings: AnalysisSettings,
) -> impl ParallelIterator<Item = Result<AnalysisInput>> {
    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );

    paths
        .into_par_iter()
        .map(move |p| AnalysisInput::try_from_path(p, &settings))
        .inspect(move |_| bar.inc(1))
}
