mod county;
mod district;
mod geo_id;
mod geo_type;

pub use county::{County, CountyInfo};
pub use district::{District, DistrictCode};
pub use geo_id::GeoId;
pub use geo_type::GeoType;
