use std::{fmt, sync::Arc};

use super::geo_type::GeoType;

/// Stable key for a state or county.
/// Keep the original GEOID text (with leading zeros) but avoid repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeoId {
    pub ty: GeoType,
    pub id: Arc<str>, // e.g., "21" for a state, "21067" for a county
}

impl GeoId {
    pub fn new(ty: GeoType, id: impl Into<Arc<str>>) -> Self {
        Self { ty, id: id.into() }
    }

    pub fn county(id: impl Into<Arc<str>>) -> Self { Self::new(GeoType::County, id) }

    pub fn state(id: impl Into<Arc<str>>) -> Self { Self::new(GeoType::State, id) }

    #[inline] pub fn id(&self) -> &str { &self.id }

    /// Returns a new `GeoId` corresponding to the higher-level `GeoType`
    /// by truncating this GeoId's string to the correct prefix length.
    pub fn to_parent(&self, parent_ty: GeoType) -> GeoId {
        let len = parent_ty.id_len();

        // If the id is shorter than expected, just take the full id.
        let prefix: Arc<str> = Arc::from(&self.id[..self.id.len().min(len)]);

        GeoId {
            ty: parent_ty,
            id: prefix,
        }
    }
}

impl fmt::Display for GeoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ty.to_str(), self.id)
    }
}
