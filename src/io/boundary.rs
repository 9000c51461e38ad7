use geo::{BoundingRect, CoordsIter, LineString, MultiPolygon, Polygon, Simplify};

/// Simplify every ring of `region` with Douglas-Peucker at `tolerance` (in coordinate units).
///
/// Lossy, for display only: never feed the result back into area computations.
/// Holes that collapse below 4 coordinates are dropped, and so are parts whose
/// exterior collapses.
pub fn simplify_region(region: &MultiPolygon<f64>, tolerance: f64) -> MultiPolygon<f64> {
    if !(tolerance > 0.0) { return region.clone() }

    let keep = |ring: &LineString<f64>| ring.0.len() >= 4;
    let polygons = region.0.iter()
        .filter_map(|polygon| {
            let exterior = polygon.exterior().simplify(&tolerance);
            if !keep(&exterior) { return None }
            let interiors = polygon.interiors().iter()
                .map(|ring| ring.simplify(&tolerance))
                .filter(keep)
                .collect();
            Some(Polygon::new(exterior, interiors))
        })
        .collect();
    MultiPolygon(polygons)
}

/// Extent and complexity of a boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryStats {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub parts: usize,
    pub coords: usize,
}

impl BoundaryStats {
    /// Statistics of `region`, or `None` when it is empty.
    pub fn of(region: &MultiPolygon<f64>) -> Option<Self> {
        let rect = region.bounding_rect()?;
        Some(Self {
            west: rect.min().x,
            south: rect.min().y,
            east: rect.max().x,
            north: rect.max().y,
            parts: region.0.len(),
            coords: region.coords_count(),
        })
    }
}
