use std::path::PathBuf;

use countymander::{DEFAULT_FULL_THRESHOLD, DEFAULT_PRECISION, MAX_PRECISION};

/// County coverage CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "countymander", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Classify the counties overlapping one district
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// District boundaries (GeoJSON FeatureCollection, WGS84)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub districts: PathBuf,

    /// County boundaries (GeoJSON FeatureCollection, WGS84)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub counties: PathBuf,

    /// Two-digit state FIPS code used to pre-filter counties, e.g. 21
    #[arg(short, long)]
    pub state: String,

    /// District number as published, e.g. 06
    #[arg(short, long)]
    pub district: String,

    /// Display code for the district, defaults to "<STATE>-<DISTRICT>"
    #[arg(long)]
    pub code: Option<String>,

    /// Coverage ratio above which a county counts as fully covered
    #[arg(short, long, default_value_t = DEFAULT_FULL_THRESHOLD)]
    pub threshold: f64,

    /// Decimals kept for displayed coverage ratios
    #[arg(long, default_value_t = DEFAULT_PRECISION,
        value_parser = clap::value_parser!(u32).range(0..=MAX_PRECISION as i64))]
    pub precision: u32,

    /// Multiplier converting native squared-degree areas to the report unit
    #[arg(long, default_value_t = 1.0)]
    pub area_factor: f64,

    /// Label of the report area unit, e.g. km2
    #[arg(long)]
    pub area_unit: Option<String>,

    /// Output report file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the simplified district boundary and county overlaps as GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub boundary: Option<PathBuf>,

    /// Douglas-Peucker tolerance (degrees) for the exported boundary; 0 keeps it exact
    #[arg(long, default_value_t = 0.001)]
    pub tolerance: f64,

    /// Overwrite output files if they exist
    #[arg(long)]
    pub force: bool,
}
