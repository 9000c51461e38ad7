//! GeoJSON interchange and export helpers around the overlap core.
//!
//! - `geojson` - reading district/county FeatureCollections, writing reports
//! - `boundary` - lossy boundary simplification and extent statistics
//! - `fs` - atomic file output

mod boundary;
mod fs;
mod geojson;

pub use boundary::{simplify_region, BoundaryStats};
pub use fs::write_atomic;
pub use geojson::{
    counties_from_features, multipolygon_to_geojson, parse_features, read_features,
    report_to_geojson, select_district, write_json, Feature,
};
