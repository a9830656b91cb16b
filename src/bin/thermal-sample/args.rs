use anyhow::{anyhow, Context, Result};
use clap::value_t_or_exit;
use std::{ffi::OsString, path::PathBuf};
use thermal_map::{
    arg, args_parser,
    cli::{bound_args, settings_from_matches, Arg},
    opt, AnalysisSettings,
};

pub struct Args {
    pub image: PathBuf,
    pub points: Vec<(i64, i64)>,
    pub clamp: bool,
    pub csv: Option<PathBuf>,
    pub settings: AnalysisSettings,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        Self::from_iter(std::env::args_os())
    }

    pub fn from_iter<I, T>(args: I) -> Result<Args>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = bound_args(args_parser!("thermal-sample"))
            .about("Sample pixel temperatures and export them as CSV.")
            .arg(
                opt!("at")
                    .short("a")
                    .required(true)
                    .multiple(true)
                    .number_of_values(1)
                    .help("Pixel to sample as `X,Y` (column, row); may be repeated"),
            )
            .arg(
                Arg::with_name("clamp")
                    .long("clamp")
                    .help("Move out-of-range points onto the image edge instead of failing"),
            )
            .arg(opt!("csv").help("Write readings to this file (default: stdout)"))
            .arg(arg!("image").required(true).help("Image path"))
            .get_matches_from(args);

        let image = value_t_or_exit!(matches, "image", PathBuf);
        let points = matches
            .values_of("at")
            .unwrap()
            .map(parse_point)
            .collect::<Result<_>>()?;
        let clamp = matches.is_present("clamp");
        let csv = matches.value_of("csv").map(PathBuf::from);
        let settings = settings_from_matches(&matches)?;

        Ok(Args {
            image,
            points,
            clamp,
            csv,
            settings,
        })
    }
}

fn parse_point(value: &str) -> Result<(i64, i64)> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected `X,Y`, got {:?}", value))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i64>()
            .with_context(|| format!("bad coordinate in {:?}", value))
    };
    Ok((parse(x)?, parse(y)?))
}
