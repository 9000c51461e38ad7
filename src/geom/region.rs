use geo::{Area, BooleanOps, BoundingRect, Coord, MultiPolygon, Rect, Relate};

use crate::error::RingDefect;

/// The geometry capability the overlap engine consumes.
///
/// Any geometry engine can back a region as long as it can answer these three
/// questions over regions in one shared coordinate reference.
pub trait Region: Send + Sync + Sized {
    /// True iff the two regions share interior area.
    /// Regions that only touch along an edge or at a point do not intersect.
    fn intersects(&self, other: &Self) -> bool;

    /// The (possibly empty) region common to both.
    fn intersection(&self, other: &Self) -> Self;

    /// Planar area in the native squared unit of the coordinate reference.
    fn area(&self) -> f64;

    /// Bounding box used to prune candidates. `None` disables pruning.
    fn envelope(&self) -> Option<Rect<f64>> { None }

    /// Check the ring invariants. Engines that enforce them on construction keep the default.
    fn validate(&self) -> Result<(), RingDefect> { Ok(()) }

    /// The region as the union of its parts, or `None` when it is already a single part.
    /// Area and intersection are only measured on dissolved regions.
    fn dissolve(&self) -> Option<Self> { None }
}

impl Region for MultiPolygon<f64> {
    fn intersects(&self, other: &Self) -> bool {
        // Overlap (including containment/equality) = intersects but not merely touching.
        let im = self.relate(other);
        im.is_intersects() && !im.is_touches()
    }

    fn intersection(&self, other: &Self) -> Self {
        // Containment returns the contained input untouched, so its area matches exactly.
        let im = self.relate(other);
        if im.is_coveredby() { return self.clone() }
        if im.is_covers() { return other.clone() }
        BooleanOps::intersection(self, other)
    }

    #[inline]
    fn area(&self) -> f64 { self.unsigned_area() }

    #[inline]
    fn envelope(&self) -> Option<Rect<f64>> { self.bounding_rect() }

    fn dissolve(&self) -> Option<Self> {
        if self.0.len() < 2 { return None }
        self.0.iter()
            .map(|polygon| MultiPolygon(vec![polygon.clone()]))
            .reduce(|a, b| a.union(&b))
    }

    fn validate(&self) -> Result<(), RingDefect> {
        if self.0.is_empty() { return Err(RingDefect::Empty) }

        for (part, polygon) in self.0.iter().enumerate() {
            let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
            for (ring, ls) in rings.enumerate() {
                check_ring(&ls.0).map_err(|defect| defect.at(part, ring))?;
            }
        }
        Ok(())
    }
}

/// Check a single ring: at least 4 finite coordinates, first equal to last.
/// Reports position `(0, 0)`; callers place the defect with `RingDefect::at`.
pub fn check_ring(coords: &[Coord<f64>]) -> Result<(), RingDefect> {
    if coords.len() < 4 {
        return Err(RingDefect::TooFewCoords { part: 0, ring: 0, count: coords.len() });
    }
    if coords.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(RingDefect::NonFinite { part: 0, ring: 0 });
    }
    if coords[0] != coords[coords.len() - 1] {
        return Err(RingDefect::Unclosed { part: 0, ring: 0 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Coord, LineString, MultiPolygon, Polygon};

    use crate::error::RingDefect;
    use super::{check_ring, Region};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0),
        ]])
    }

    #[test]
    fn overlapping_squares_intersect() {
        assert!(square(0.0, 0.0, 2.0, 2.0).intersects(&square(1.0, 1.0, 3.0, 3.0)));
    }

    #[test]
    fn shared_edge_is_not_an_intersection() {
        assert!(!square(0.0, 0.0, 1.0, 1.0).intersects(&square(1.0, 0.0, 2.0, 1.0)));
    }

    #[test]
    fn shared_corner_is_not_an_intersection() {
        assert!(!square(0.0, 0.0, 1.0, 1.0).intersects(&square(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn containment_is_an_intersection() {
        assert!(square(0.0, 0.0, 10.0, 10.0).intersects(&square(2.0, 2.0, 4.0, 4.0)));
        assert!(square(2.0, 2.0, 4.0, 4.0).intersects(&square(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn intersection_area_of_offset_squares() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);
        assert!((a.intersection(&b).area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn contained_intersection_is_the_inner_region() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let inner = MultiPolygon(vec![polygon![
            (x: 2.123456789, y: 3.987654321), (x: 7.31415926, y: 2.71828182),
            (x: 8.1, y: 7.77777777), (x: 3.3333333, y: 8.9999999), (x: 2.123456789, y: 3.987654321),
        ]]);
        assert_eq!(inner.intersection(&outer), inner);
        assert_eq!(outer.intersection(&inner), inner);
    }

    #[test]
    fn dissolve_merges_overlapping_parts() {
        let mut doubled = square(2.0, 2.0, 4.0, 4.0);
        doubled.0.extend(square(2.0, 2.0, 4.0, 4.0).0);
        let mut overlapping = square(0.0, 0.0, 2.0, 2.0);
        overlapping.0.extend(square(1.0, 0.0, 3.0, 2.0).0);

        assert!((doubled.dissolve().unwrap().area() - 4.0).abs() < 1e-9);
        assert!((overlapping.dissolve().unwrap().area() - 6.0).abs() < 1e-9);
        assert!(square(0.0, 0.0, 1.0, 1.0).dissolve().is_none());
    }

    #[test]
    fn area_subtracts_holes() {
        let outer = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let hole = LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)]);
        let mp = MultiPolygon(vec![Polygon::new(outer, vec![hole])]);
        assert!((mp.area() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn validate_accepts_square() {
        assert_eq!(square(0.0, 0.0, 1.0, 1.0).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_region() {
        assert_eq!(MultiPolygon::<f64>(vec![]).validate(), Err(RingDefect::Empty));
    }

    #[test]
    fn validate_reports_short_hole_position() {
        let outer = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let hole = LineString::from(vec![(1.0, 1.0), (2.0, 1.0)]); // closes to 3 coords
        let mp = MultiPolygon(vec![Polygon::new(outer, vec![hole])]);
        assert_eq!(mp.validate(), Err(RingDefect::TooFewCoords { part: 0, ring: 1, count: 3 }));
    }

    #[test]
    fn check_ring_rejects_open_ring() {
        let coords = [
            Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 }, Coord { x: 0.0, y: 1.0 },
        ];
        assert_eq!(check_ring(&coords), Err(RingDefect::Unclosed { part: 0, ring: 0 }));
    }

    #[test]
    fn check_ring_rejects_nan() {
        let coords = [
            Coord { x: 0.0, y: 0.0 }, Coord { x: f64::NAN, y: 0.0 },
            Coord { x: 1.0, y: 1.0 }, Coord { x: 0.0, y: 0.0 },
        ];
        assert_eq!(check_ring(&coords), Err(RingDefect::NonFinite { part: 0, ring: 0 }));
    }
}
