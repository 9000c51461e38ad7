use geo::MultiPolygon;
use rayon::prelude::*;
use rstar::RTree;
use tracing::{debug, info, warn};

use crate::error::{OverlapError, Result};
use crate::geom::{envelope_of, BoundingBox, Region};
use crate::types::{County, CountyInfo, District};

use super::report::classify;

/// Ratios above 1.0 by more than this are logged; all are clamped on read.
const RATIO_SLACK: f64 = 1e-9;

/// The overlap of one county with the district. Immutable once computed.
#[derive(Debug, Clone)]
pub struct OverlapRecord<R = MultiPolygon<f64>> {
    county: CountyInfo,
    intersection: R,
    county_area: f64,
    intersection_area: f64,
    coverage_ratio: f64,
}

impl<R> OverlapRecord<R> {
    pub(crate) fn new(county: CountyInfo, intersection: R, county_area: f64, intersection_area: f64) -> Self {
        Self {
            county,
            intersection,
            county_area,
            intersection_area,
            coverage_ratio: intersection_area / county_area,
        }
    }

    #[inline] pub fn county(&self) -> &CountyInfo { &self.county }

    #[inline] pub fn intersection(&self) -> &R { &self.intersection }

    #[inline] pub fn county_area(&self) -> f64 { self.county_area }

    #[inline] pub fn intersection_area(&self) -> f64 { self.intersection_area }

    /// Raw `intersection_area / county_area`; may exceed 1.0 by floating-point noise.
    #[inline] pub fn coverage_ratio(&self) -> f64 { self.coverage_ratio }

    /// Coverage ratio clamped into (0, 1].
    #[inline]
    pub fn clamped_ratio(&self) -> f64 { self.coverage_ratio.min(1.0) }

    /// Whether this county counts as fully covered at the given threshold.
    #[inline]
    pub fn is_full(&self, threshold: f64) -> bool {
        classify(self.clamped_ratio(), threshold).is_full()
    }
}

/// Find every county that shares area with the district.
///
/// Counties are expected to be pre-filtered to the district's state. The result
/// holds one record per intersecting county, in candidate order; counties that
/// only touch the district, or whose own area is degenerate, are left out.
pub fn find_overlaps<R: Region>(district: &District<R>, counties: &[County<R>]) -> Result<Vec<OverlapRecord<R>>> {
    district.region.validate().map_err(|reason| OverlapError::MalformedRegion {
        record: format!("district {}", district.code),
        reason,
    })?;
    for county in counties {
        county.region.validate().map_err(|reason| OverlapError::MalformedRegion {
            record: format!("county {} ({})", county.name(), county.geo_id().id()),
            reason,
        })?;
    }

    let dissolved = district.region.dissolve();
    let region = dissolved.as_ref().unwrap_or(&district.region);

    let district_area = region.area();
    if !(district_area > 0.0 && district_area.is_finite()) {
        return Err(OverlapError::DegenerateDistrict { code: district.code.to_string() });
    }

    if counties.is_empty() {
        info!("[find_overlaps] {}: no candidate counties", district.code);
        return Ok(Vec::new());
    }

    let candidates = candidate_indices(region, counties);
    debug!("[find_overlaps] {}: {} of {} counties pass the bounding-box filter",
        district.code, candidates.len(), counties.len());

    // collect() keeps candidate order regardless of which worker finishes first.
    let records: Vec<OverlapRecord<R>> = candidates.par_iter()
        .filter_map(|&i| overlap_of(region, &counties[i]))
        .collect();

    info!("[find_overlaps] {}: {} intersecting counties", district.code, records.len());
    Ok(records)
}

/// Indices of counties whose bounding boxes meet the district's, in ascending order.
/// Counties without an envelope are always kept.
fn candidate_indices<R: Region>(district: &R, counties: &[County<R>]) -> Vec<usize> {
    let Some(bounds) = district.envelope() else { return (0..counties.len()).collect() };

    let mut unboxed = Vec::new();
    let mut boxes = Vec::with_capacity(counties.len());
    for (i, county) in counties.iter().enumerate() {
        match county.region.envelope() {
            Some(rect) => boxes.push(BoundingBox::new(i, rect)),
            None => unboxed.push(i),
        }
    }

    let rtree = RTree::bulk_load(boxes);
    let mut indices = rtree.locate_in_envelope_intersecting(&envelope_of(&bounds))
        .map(|bb| bb.idx())
        .chain(unboxed)
        .collect::<Vec<_>>();
    indices.sort_unstable();
    indices
}

/// Evaluate a single county against the district.
fn overlap_of<R: Region>(district: &R, county: &County<R>) -> Option<OverlapRecord<R>> {
    let dissolved = county.region.dissolve();
    let region = dissolved.as_ref().unwrap_or(&county.region);

    let county_area = region.area();
    if !(county_area > 0.0 && county_area.is_finite()) {
        warn!("[find_overlaps] skipping county {} ({}): degenerate area {county_area}",
            county.name(), county.geo_id().id());
        return None;
    }

    if !region.intersects(district) { return None }

    let intersection = region.intersection(district);
    let intersection_area = intersection.area();
    if !(intersection_area > 0.0) {
        debug!("[find_overlaps] county {} intersects with zero area, skipping", county.geo_id().id());
        return None;
    }

    let record = OverlapRecord::new(county.info.clone(), intersection, county_area, intersection_area);
    if record.coverage_ratio() > 1.0 + RATIO_SLACK {
        debug!("[find_overlaps] county {} ratio {} exceeds 1, reported as 1.0",
            county.geo_id().id(), record.coverage_ratio());
    }
    debug!("[find_overlaps] county {} ({}): ratio {:.6}",
        county.name(), county.geo_id().id(), record.coverage_ratio());
    Some(record)
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use crate::error::{OverlapError, RingDefect};
    use crate::types::{County, CountyInfo, District, DistrictCode, GeoId};
    use super::find_overlaps;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0),
        ]])
    }

    fn county(name: &str, geo_id: &str, region: MultiPolygon<f64>) -> County {
        County::new(CountyInfo::new(name, GeoId::county(geo_id)), region)
    }

    fn district() -> District {
        District::new(DistrictCode::new("KY", "06"), square(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn empty_candidates_yield_no_records() {
        assert!(find_overlaps(&district(), &[]).unwrap().is_empty());
    }

    #[test]
    fn disjoint_and_touching_counties_are_excluded() {
        let counties = vec![
            county("Far", "21001", square(20.0, 20.0, 22.0, 22.0)),
            county("Edge", "21003", square(10.0, 0.0, 12.0, 10.0)),
            county("Corner", "21005", square(10.0, 10.0, 11.0, 11.0)),
        ];
        assert!(find_overlaps(&district(), &counties).unwrap().is_empty());
    }

    #[test]
    fn contained_county_has_unit_ratio() {
        let counties = vec![county("Inner", "21001", square(2.0, 2.0, 4.0, 4.0))];
        let records = find_overlaps(&district(), &counties).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].coverage_ratio() - 1.0).abs() < 1e-9);
        assert!((records[0].intersection_area() - 4.0).abs() < 1e-9);
        assert!((records[0].county_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn multipart_county_ratio_uses_whole_region() {
        // One 4x4 part inside, one 4x4 part outside: half the county is covered.
        let mut region = square(1.0, 1.0, 5.0, 5.0);
        region.0.extend(square(20.0, 20.0, 24.0, 24.0).0);
        let records = find_overlaps(&district(), &[county("Split", "21001", region)]).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].coverage_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn overlapping_parts_count_once() {
        let mut doubled = square(2.0, 2.0, 4.0, 4.0);
        doubled.0.extend(square(2.0, 2.0, 4.0, 4.0).0);
        let records = find_overlaps(&district(), &[county("Doubled", "21001", doubled)]).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].county_area() - 4.0).abs() < 1e-9);
        assert_eq!(records[0].coverage_ratio(), 1.0);
    }

    #[test]
    fn skewed_contained_county_is_exactly_covered() {
        let skewed = MultiPolygon(vec![polygon![
            (x: 2.123456789, y: 3.987654321), (x: 7.31415926, y: 2.71828182),
            (x: 8.1, y: 7.77777777), (x: 3.3333333, y: 8.9999999), (x: 2.123456789, y: 3.987654321),
        ]]);
        let records = find_overlaps(&district(), &[county("Skewed", "21001", skewed)]).unwrap();
        assert_eq!(records[0].coverage_ratio(), 1.0);
        assert!(records[0].is_full(0.999_999_999_999));
    }

    #[test]
    fn multipart_district_counts_both_parts() {
        let mut region = square(0.0, 0.0, 4.0, 4.0);
        region.0.extend(square(6.0, 0.0, 10.0, 4.0).0);
        let district = District::new(DistrictCode::new("KY", "06"), region);
        // 6 x 4 county: 2 x 4 inside each part.
        let records = find_overlaps(&district, &[county("Span", "21001", square(2.0, 0.0, 8.0, 4.0))]).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].intersection_area() - 16.0).abs() < 1e-9);
        assert!((records[0].coverage_ratio() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_county_is_skipped() {
        let flat = MultiPolygon(vec![polygon![
            (x: 1.0, y: 1.0), (x: 3.0, y: 1.0), (x: 5.0, y: 1.0), (x: 1.0, y: 1.0),
        ]]);
        let counties = vec![
            county("Flat", "21001", flat),
            county("Inner", "21003", square(2.0, 2.0, 4.0, 4.0)),
        ];
        let records = find_overlaps(&district(), &counties).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(&*records[0].county().name, "Inner");
    }

    #[test]
    fn malformed_county_fails_fast() {
        let counties = vec![
            county("Good", "21001", square(2.0, 2.0, 4.0, 4.0)),
            county("Bad", "21003", MultiPolygon(vec![])),
        ];
        let err = find_overlaps(&district(), &counties).unwrap_err();
        assert_eq!(err, OverlapError::MalformedRegion {
            record: "county Bad (21003)".into(),
            reason: RingDefect::Empty,
        });
    }

    #[test]
    fn degenerate_district_is_an_error() {
        let flat = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 0.0, y: 0.0),
        ]]);
        let district = District::new(DistrictCode::new("KY", "06"), flat);
        let counties = vec![county("Inner", "21001", square(2.0, 2.0, 4.0, 4.0))];
        assert!(matches!(find_overlaps(&district, &counties), Err(OverlapError::DegenerateDistrict { .. })));
    }

    #[test]
    fn records_follow_candidate_order() {
        let counties = (0..16)
            .map(|i| {
                let x = i as f64 * 0.5;
                county(&format!("C{i:02}"), &format!("21{i:03}"), square(x, 1.0, x + 0.5, 2.0))
            })
            .collect::<Vec<_>>();
        let records = find_overlaps(&district(), &counties).unwrap();
        let names = records.iter().map(|r| r.county().name.to_string()).collect::<Vec<_>>();
        let expected = (0..16).map(|i| format!("C{i:02}")).collect::<Vec<_>>();
        assert_eq!(names, expected);
    }

    #[test]
    fn is_full_uses_clamped_ratio() {
        let counties = vec![county("Inner", "21001", square(2.0, 2.0, 4.0, 4.0))];
        let record = &find_overlaps(&district(), &counties).unwrap()[0];
        assert!(record.clamped_ratio() <= 1.0);
        assert!(record.is_full(0.95));
        assert!(record.is_full(0.999));
    }
}
