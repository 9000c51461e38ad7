#![doc = "Countymander public API"]
mod error;
mod geom;
pub mod io;
mod overlap;
mod types;

#[doc(inline)]
pub use error::{OverlapError, Result, RingDefect};

#[doc(inline)]
pub use geom::{check_ring, Region};

#[doc(inline)]
pub use overlap::{
    build_report, build_report_with, classify, find_overlaps,
    Coverage, CountyEntry, OverlapRecord, Report, ReportOptions,
    DEFAULT_FULL_THRESHOLD, DEFAULT_PRECISION, MAX_PRECISION,
};

#[doc(inline)]
pub use types::{County, CountyInfo, District, DistrictCode, GeoId, GeoType};
