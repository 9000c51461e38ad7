mod engine;
mod report;

pub use engine::{find_overlaps, OverlapRecord};
pub use report::{
    build_report, build_report_with, classify,
    Coverage, CountyEntry, Report, ReportOptions,
    DEFAULT_FULL_THRESHOLD, DEFAULT_PRECISION, MAX_PRECISION,
};
