#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeoType {
    State,      // Highest-level entity
    County,     // County -> State
}

impl GeoType {
    pub fn to_str(&self) -> &'static str {
        match self {
            GeoType::State => "state",
            GeoType::County => "county",
        }
    }

    /// Length of a census GEOID at this level ("21" for a state, "21067" for a county).
    pub fn id_len(&self) -> usize {
        match self {
            GeoType::State => 2,
            GeoType::County => 5,
        }
    }
}
