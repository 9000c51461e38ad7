use std::sync::Arc;

use geo::MultiPolygon;

use super::{geo_id::GeoId, geo_type::GeoType};

/// Identity attributes of a county, carried into every overlap record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountyInfo {
    pub name: Arc<str>,
    pub geo_id: GeoId,
    pub state: GeoId,
}

impl CountyInfo {
    /// Build the identity from a county GEOID, deriving the owning state from its prefix.
    pub fn new(name: impl Into<Arc<str>>, geo_id: GeoId) -> Self {
        let state = geo_id.to_parent(GeoType::State);
        Self { name: name.into(), geo_id, state }
    }

    /// Override the owning state, for sources whose GEOIDs are not FIPS-prefixed.
    pub fn with_state(mut self, state: GeoId) -> Self {
        self.state = state;
        self
    }
}

/// A county region plus its identity.
#[derive(Debug, Clone)]
pub struct County<R = MultiPolygon<f64>> {
    pub info: CountyInfo,
    pub region: R,
}

impl<R> County<R> {
    pub fn new(info: CountyInfo, region: R) -> Self {
        Self { info, region }
    }

    #[inline] pub fn name(&self) -> &str { &self.info.name }

    #[inline] pub fn geo_id(&self) -> &GeoId { &self.info.geo_id }

    #[inline] pub fn state(&self) -> &GeoId { &self.info.state }
}
