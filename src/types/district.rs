use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail};
use geo::MultiPolygon;

/// Identifying code of an electoral district, e.g. `KY-06`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistrictCode {
    pub state: String,  // Postal abbreviation or FIPS code
    pub number: String, // District number as published, e.g. "06"
}

impl DistrictCode {
    pub fn new(state: impl Into<String>, number: impl Into<String>) -> Self {
        Self { state: state.into(), number: number.into() }
    }
}

impl fmt::Display for DistrictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.state, self.number)
    }
}

impl FromStr for DistrictCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (state, number) = s.trim().split_once(['-', '_'])
            .ok_or_else(|| anyhow!("District code must look like ST-NN, got {s:?}"))?;
        if state.is_empty() || number.is_empty() {
            bail!("District code must look like ST-NN, got {s:?}");
        }
        Ok(Self::new(state.to_ascii_uppercase(), number))
    }
}

/// The district being analyzed: one region plus its code.
#[derive(Debug, Clone)]
pub struct District<R = MultiPolygon<f64>> {
    pub code: DistrictCode,
    pub region: R,
}

impl<R> District<R> {
    pub fn new(code: DistrictCode, region: R) -> Self {
        Self { code, region }
    }
}
