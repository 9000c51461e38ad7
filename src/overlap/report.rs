use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{OverlapError, Result};
use crate::types::DistrictCode;

use super::engine::OverlapRecord;

/// Default boundary above which a county counts as fully covered.
pub const DEFAULT_FULL_THRESHOLD: f64 = 0.95;

/// Default number of decimals kept for displayed coverage ratios.
pub const DEFAULT_PRECISION: u32 = 4;

/// Most decimals an `f64` ratio can meaningfully carry.
pub const MAX_PRECISION: u32 = 15;

/// Coverage label of an intersecting county.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Full,
    Partial,
}

impl Coverage {
    #[inline] pub fn is_full(&self) -> bool { matches!(self, Coverage::Full) }

    pub fn to_str(&self) -> &'static str {
        match self {
            Coverage::Full => "full",
            Coverage::Partial => "partial",
        }
    }
}

/// Classify a coverage ratio: full iff `ratio > threshold` (strict).
#[inline]
pub fn classify(ratio: f64, threshold: f64) -> Coverage {
    if ratio > threshold { Coverage::Full } else { Coverage::Partial }
}

/// Knobs for report construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub full_threshold: f64,
    pub precision: u32,             // Decimals kept for displayed ratios
    pub area_factor: f64,           // Multiplier from native squared units to the report unit
    pub area_unit: Option<String>,  // Label for the report unit, e.g. "km2"
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            full_threshold: DEFAULT_FULL_THRESHOLD,
            precision: DEFAULT_PRECISION,
            area_factor: 1.0,
            area_unit: None,
        }
    }
}

impl ReportOptions {
    pub fn with_threshold(full_threshold: f64) -> Self {
        Self { full_threshold, ..Self::default() }
    }
}

/// One intersecting county, as shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyEntry {
    pub name: String,
    pub geo_id: String,
    pub coverage_ratio: f64,
    pub coverage: Coverage,
    pub area: f64,          // County area in the report unit
    pub overlap_area: f64,  // Intersection area in the report unit
}

/// County coverage summary for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub district: String,
    pub full_threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_unit: Option<String>,
    pub total_counties: usize,
    pub full_counties: usize,
    pub partial_counties: usize,
    pub counties: Vec<CountyEntry>,
}

impl Report {
    /// Entries labelled with the given coverage, in report order.
    pub fn entries(&self, coverage: Coverage) -> impl Iterator<Item = &CountyEntry> {
        self.counties.iter().filter(move |entry| entry.coverage == coverage)
    }
}

/// Build a report with the given threshold and default display options.
pub fn build_report<R>(code: &DistrictCode, records: &[OverlapRecord<R>], full_threshold: f64) -> Result<Report> {
    build_report_with(code, records, &ReportOptions::with_threshold(full_threshold))
}

/// Classify, order and summarize overlap records.
///
/// Entries are sorted by coverage ratio descending, ties broken by county name
/// and then GEOID, so the same records always yield the same report.
pub fn build_report_with<R>(code: &DistrictCode, records: &[OverlapRecord<R>], options: &ReportOptions) -> Result<Report> {
    let threshold = options.full_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(OverlapError::ThresholdOutOfRange(threshold));
    }
    if options.precision > MAX_PRECISION {
        return Err(OverlapError::PrecisionOutOfRange(options.precision));
    }

    let mut ordered = records.iter().collect::<Vec<_>>();
    ordered.sort_by(|a, b| compare_records(a, b));

    let counties = ordered.into_iter()
        .map(|record| {
            let ratio = record.clamped_ratio();
            CountyEntry {
                name: record.county().name.to_string(),
                geo_id: record.county().geo_id.id().to_string(),
                coverage_ratio: round_to(ratio, options.precision),
                coverage: classify(ratio, threshold),
                area: record.county_area() * options.area_factor,
                overlap_area: record.intersection_area() * options.area_factor,
            }
        })
        .collect::<Vec<_>>();

    let full_counties = counties.iter().filter(|entry| entry.coverage.is_full()).count();
    let report = Report {
        district: code.to_string(),
        full_threshold: threshold,
        area_unit: options.area_unit.clone(),
        total_counties: counties.len(),
        full_counties,
        partial_counties: counties.len() - full_counties,
        counties,
    };

    info!("[build_report] {}: {} counties ({} full, {} partial)",
        report.district, report.total_counties, report.full_counties, report.partial_counties);
    Ok(report)
}

/// Total order: ratio descending, then name ascending, then GEOID ascending.
fn compare_records<R>(a: &OverlapRecord<R>, b: &OverlapRecord<R>) -> Ordering {
    b.clamped_ratio().total_cmp(&a.clamped_ratio())
        .then_with(|| a.county().name.cmp(&b.county().name))
        .then_with(|| a.county().geo_id.cmp(&b.county().geo_id))
}

#[inline]
fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (value * scale).round() / scale
}
