use anyhow::{Context, Result};
use tracing::info;

use countymander::io::{
    counties_from_features, read_features, report_to_geojson, select_district, simplify_region,
    write_json, BoundaryStats,
};
use countymander::{build_report_with, find_overlaps, District, DistrictCode, ReportOptions};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::AnalyzeArgs) -> Result<()> {
    let code = match &args.code {
        Some(code) => code.parse::<DistrictCode>()?,
        None => DistrictCode::new(&args.state, &args.district),
    };

    info!("[analyze] loading districts from {}", args.districts.display());
    let districts = read_features(&args.districts)?;
    let feature = select_district(&districts, &args.district)?;
    let district = District::new(code, feature.geometry.clone());
    if let Some(stats) = BoundaryStats::of(&district.region) {
        info!("[analyze] {} boundary: {} parts, {} points, W {:.4} S {:.4} E {:.4} N {:.4}",
            district.code, stats.parts, stats.coords, stats.west, stats.south, stats.east, stats.north);
    }

    info!("[analyze] loading counties from {}", args.counties.display());
    let counties = counties_from_features(&read_features(&args.counties)?, &args.state)?;
    info!("[analyze] {} candidate counties in state {}", counties.len(), args.state);

    let records = find_overlaps(&district, &counties)
        .with_context(|| format!("Overlap analysis failed for {}", district.code))?;

    let options = ReportOptions {
        full_threshold: args.threshold,
        precision: args.precision,
        area_factor: args.area_factor,
        area_unit: args.area_unit.clone(),
    };
    let report = build_report_with(&district.code, &records, &options)?;

    match &args.output {
        Some(path) => {
            info!("[analyze] writing report to {}", path.display());
            write_json(path, &serde_json::to_value(&report)?, args.force)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(path) = &args.boundary {
        let simplified = simplify_region(&district.region, args.tolerance);
        if let Some(stats) = BoundaryStats::of(&simplified) {
            info!("[analyze] simplified boundary at tolerance {}: {} points", args.tolerance, stats.coords);
        }
        info!("[analyze] writing boundary to {}", path.display());
        write_json(path, &report_to_geojson(&report, &simplified, &records), args.force)?;
    }

    Ok(())
}
