use anyhow::Result;
use clap::value_t_or_exit;
use std::path::PathBuf;
use thermal_map::{
    arg, args_parser,
    cli::{bound_args, settings_from_matches},
    opt, AnalysisSettings,
};

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub output: PathBuf,
    pub settings: AnalysisSettings,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = bound_args(args_parser!("thermal-analyze"))
            .about("Normalize, colorize and summarize thermal images.")
            .arg(
                opt!("output")
                    .short("o")
                    .required(true)
                    .help("Directory for the normalized and inferno images"),
            )
            .arg(
                arg!("images")
                    .required(true)
                    .multiple(true)
                    .help("Image paths"),
            )
            .get_matches();

        let paths = matches
            .values_of("images")
            .unwrap()
            .map(|f| f.into())
            .collect();
        let output = value_t_or_exit!(matches, "output", PathBuf);
        let settings = settings_from_matches(&matches)?;

        Ok(Args {
            paths,
            output,
            settings,
        })
    }
}
