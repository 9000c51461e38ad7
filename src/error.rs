use thiserror::Error;

/// A violation of the ring invariants every region must satisfy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RingDefect {
    #[error("region has no polygons")]
    Empty,

    #[error("part {part}, ring {ring} is not closed")]
    Unclosed { part: usize, ring: usize },

    #[error("part {part}, ring {ring} has {count} coordinates (at least 4 required)")]
    TooFewCoords { part: usize, ring: usize, count: usize },

    #[error("part {part}, ring {ring} contains a non-finite coordinate")]
    NonFinite { part: usize, ring: usize },
}

impl RingDefect {
    /// The same defect, placed at ring `ring` of part `part`.
    pub fn at(self, part: usize, ring: usize) -> Self {
        match self {
            RingDefect::Empty => RingDefect::Empty,
            RingDefect::Unclosed { .. } => RingDefect::Unclosed { part, ring },
            RingDefect::TooFewCoords { count, .. } => RingDefect::TooFewCoords { part, ring, count },
            RingDefect::NonFinite { .. } => RingDefect::NonFinite { part, ring },
        }
    }
}

/// Structural failures of an overlap run. Per-county anomalies never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlapError {
    #[error("malformed region for {record}: {reason}")]
    MalformedRegion { record: String, reason: RingDefect },

    #[error("district {code} has zero or negative area")]
    DegenerateDistrict { code: String },

    #[error("full-coverage threshold {0} is outside (0, 1]")]
    ThresholdOutOfRange(f64),

    #[error("display precision {0} exceeds 15 decimals")]
    PrecisionOutOfRange(u32),
}

pub type Result<T> = std::result::Result<T, OverlapError>;
