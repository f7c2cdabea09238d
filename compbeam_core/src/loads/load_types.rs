//! Load case tags for composite floor beams.
//!
//! The ASCE 7 categories plus the construction-stage cases (CD, CL) and
//! partition live load (Lp) that composite design distinguishes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CalcError;

/// Load case tag.
///
/// Serialized as the standard abbreviation (`"D"`, `"CL"`, ...); the full
/// variant name is accepted as an alias on input.
///
/// # Example
/// ```
/// use compbeam_core::loads::LoadType;
///
/// assert_eq!(LoadType::ConstructionDead.code(), "CD");
/// assert_eq!("lp".parse::<LoadType>().unwrap(), LoadType::PartitionLive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoadType {
    /// D - Dead load of the completed floor (slab, finishes, MEP)
    #[serde(rename = "D", alias = "Dead")]
    Dead,
    /// CD - Construction dead load (wet concrete, deck) carried by the bare steel
    #[serde(rename = "CD", alias = "ConstructionDead")]
    ConstructionDead,
    /// L - Occupancy live load
    #[serde(rename = "L", alias = "Live")]
    Live,
    /// CL - Construction live load (workers, equipment during the pour)
    #[serde(rename = "CL", alias = "ConstructionLive")]
    ConstructionLive,
    /// Lp - Partition live load
    #[serde(rename = "Lp", alias = "PartitionLive")]
    PartitionLive,
    /// LLR - Roof live load
    #[serde(rename = "LLR", alias = "RoofLive")]
    RoofLive,
    /// S - Snow load
    #[serde(rename = "S", alias = "Snow")]
    Snow,
    /// R - Rain load
    #[serde(rename = "R", alias = "Rain")]
    Rain,
    /// W - Wind load
    #[serde(rename = "W", alias = "Wind")]
    Wind,
    /// E - Seismic load
    #[serde(rename = "E", alias = "Seismic")]
    Seismic,
}

impl LoadType {
    pub const ALL: [LoadType; 10] = [
        LoadType::Dead,
        LoadType::ConstructionDead,
        LoadType::Live,
        LoadType::ConstructionLive,
        LoadType::PartitionLive,
        LoadType::RoofLive,
        LoadType::Snow,
        LoadType::Rain,
        LoadType::Wind,
        LoadType::Seismic,
    ];

    /// Cases that take part in factoring. Partition live load is folded into
    /// `Live` before combinations are applied, so it never carries a factor.
    pub const FACTORED: [LoadType; 9] = [
        LoadType::Dead,
        LoadType::ConstructionDead,
        LoadType::ConstructionLive,
        LoadType::Live,
        LoadType::RoofLive,
        LoadType::Snow,
        LoadType::Rain,
        LoadType::Wind,
        LoadType::Seismic,
    ];

    /// Standard abbreviation
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "D",
            LoadType::ConstructionDead => "CD",
            LoadType::Live => "L",
            LoadType::ConstructionLive => "CL",
            LoadType::PartitionLive => "Lp",
            LoadType::RoofLive => "LLR",
            LoadType::Snow => "S",
            LoadType::Rain => "R",
            LoadType::Wind => "W",
            LoadType::Seismic => "E",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Dead load",
            LoadType::ConstructionDead => "Construction dead load",
            LoadType::Live => "Live load",
            LoadType::ConstructionLive => "Construction live load",
            LoadType::PartitionLive => "Partition live load",
            LoadType::RoofLive => "Roof live load",
            LoadType::Snow => "Snow load",
            LoadType::Rain => "Rain load",
            LoadType::Wind => "Wind load",
            LoadType::Seismic => "Seismic load",
        }
    }

    /// Whether the case acts only before the slab has cured
    pub fn is_construction(&self) -> bool {
        matches!(self, LoadType::ConstructionDead | LoadType::ConstructionLive)
    }

    /// Wind and seismic may act in either direction, so negative magnitudes are legal.
    pub fn is_directional(&self) -> bool {
        matches!(self, LoadType::Wind | LoadType::Seismic)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for LoadType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        LoadType::ALL
            .iter()
            .find(|lt| lt.code().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| {
                CalcError::invalid_input(
                    "load_type",
                    trimmed,
                    "Expected one of D, CD, L, CL, Lp, LLR, S, R, W, E",
                )
            })
    }
}
