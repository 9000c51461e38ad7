mod bbox;
mod region;

pub(crate) use bbox::{envelope_of, BoundingBox};
pub use region::{check_ring, Region};
