//! Loads and load combinations for composite floor beams
//!
//! # Overview
//!
//! - [`LoadType`] - load case tags (D, CD, L, CL, Lp, LLR, S, R, W, E)
//! - [`UniformLoad`] - a named uniformly distributed load over part of the span
//! - [`LoadIntensities`] - one intensity per load case, the input to factoring
//! - [`LoadCombination`] and the static ASCE 7 tables
//! - [`FactoringContext`] - the four stages a composite beam is checked at
//!
//! # Example
//!
//! ```
//! use compbeam_core::loads::{max_factored, LoadIntensities, LoadType, LRFD_COMBINATIONS};
//!
//! let floor = LoadIntensities::new()
//!     .with_load(LoadType::Dead, 0.5)
//!     .with_load(LoadType::Live, 1.3);
//!
//! // 1.2D + 1.6L governs
//! let wu = max_factored(&floor, &LRFD_COMBINATIONS);
//! assert!((wu - 2.68).abs() < 1e-9);
//! ```

pub mod combinations;
pub mod load_types;

pub use combinations::{
    envelope_max, envelope_min, factor, find_governing_combination, find_minimum_combination,
    max_factored, min_factored, FactoringContext, Governing, LoadCombination, ResultArray,
    LRFD_COMBINATIONS, PRE_COMPOSITE_FACTORED, PRE_COMPOSITE_SERVICE, SERVICE_COMBINATIONS,
};
pub use load_types::LoadType;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{CalcError, CalcResult};

/// Intensity per load case (klf), defaulting to zero for absent cases.
///
/// # Example
/// ```
/// use compbeam_core::loads::{LoadIntensities, LoadType};
///
/// let mut w = LoadIntensities::new().with_load(LoadType::Dead, 0.5);
/// w.add(LoadType::Dead, 0.026);
///
/// assert!((w.get(LoadType::Dead) - 0.526).abs() < 1e-12);
/// assert_eq!(w.get(LoadType::Snow), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadIntensities {
    pub loads: HashMap<LoadType, f64>,
}

impl LoadIntensities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a case intensity (builder pattern)
    pub fn with_load(mut self, load_type: LoadType, value: f64) -> Self {
        self.loads.insert(load_type, value);
        self
    }

    /// Accumulate into a case intensity
    pub fn add(&mut self, load_type: LoadType, value: f64) {
        *self.loads.entry(load_type).or_insert(0.0) += value;
    }

    /// Intensity of a case, 0.0 if not set
    pub fn get(&self, load_type: LoadType) -> f64 {
        self.loads.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Check if a case is defined (even if zero)
    pub fn has(&self, load_type: LoadType) -> bool {
        self.loads.contains_key(&load_type)
    }
}

/// Uniformly distributed load over `[start_ft, end_ft]`.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Slab", "load_type": "CD", "magnitude_klf": 0.5, "start_ft": 0.0, "end_ft": 30.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformLoad {
    /// User description (e.g., "Wet concrete")
    pub name: String,

    pub load_type: LoadType,

    /// Intensity (kip/ft), positive acts downward
    pub magnitude_klf: f64,

    /// Start location from the left support (ft)
    pub start_ft: f64,

    /// End location from the left support (ft)
    pub end_ft: f64,
}

impl UniformLoad {
    pub fn new(
        name: impl Into<String>,
        load_type: LoadType,
        magnitude_klf: f64,
        start_ft: f64,
        end_ft: f64,
    ) -> Self {
        UniformLoad {
            name: name.into(),
            load_type,
            magnitude_klf,
            start_ft,
            end_ft,
        }
    }

    /// Load over the whole span
    pub fn full_span(
        name: impl Into<String>,
        load_type: LoadType,
        magnitude_klf: f64,
        span_ft: f64,
    ) -> Self {
        UniformLoad::new(name, load_type, magnitude_klf, 0.0, span_ft)
    }

    /// Check `0 <= start < end <= span` and a finite magnitude.
    pub fn validate(&self, span_ft: f64) -> CalcResult<()> {
        if !self.magnitude_klf.is_finite() {
            return Err(CalcError::invalid_input(
                format!("loads.{}.magnitude_klf", self.name),
                self.magnitude_klf.to_string(),
                "Load magnitude must be finite",
            ));
        }
        if !(self.start_ft >= 0.0 && self.start_ft < self.end_ft && self.end_ft <= span_ft) {
            return Err(CalcError::invalid_input(
                format!("loads.{}", self.name),
                format!("{}..{}", self.start_ft, self.end_ft),
                format!("Load extent must satisfy 0 <= start < end <= span ({} ft)", span_ft),
            ));
        }
        Ok(())
    }

    /// Loaded length (ft)
    pub fn length_ft(&self) -> f64 {
        self.end_ft - self.start_ft
    }

    /// Whether the load covers the whole span
    pub fn is_full_span(&self, span_ft: f64) -> bool {
        self.start_ft <= 0.0 && self.end_ft >= span_ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensities_default_zero() {
        let w = LoadIntensities::new().with_load(LoadType::Dead, 1.0);
        assert_eq!(w.get(LoadType::Dead), 1.0);
        assert_eq!(w.get(LoadType::Live), 0.0);
        assert!(w.has(LoadType::Dead));
        assert!(!w.has(LoadType::Live));
    }

    #[test]
    fn test_intensities_accumulate() {
        let mut w = LoadIntensities::new();
        w.add(LoadType::Live, 1.0);
        w.add(LoadType::Live, 0.3);
        assert!((w.get(LoadType::Live) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_intensities_serde() {
        let w = LoadIntensities::new().with_load(LoadType::ConstructionDead, 0.5);
        let json = serde_json::to_string(&w).unwrap();
        assert!(json.contains("\"CD\""));
        let parsed: LoadIntensities = serde_json::from_str(&json).unwrap();
        assert_eq!(w, parsed);
    }

    #[test]
    fn test_uniform_load_validate() {
        let ok = UniformLoad::full_span("Slab", LoadType::Dead, 0.5, 30.0);
        assert!(ok.validate(30.0).is_ok());
        assert!(ok.is_full_span(30.0));
        assert_eq!(ok.length_ft(), 30.0);

        let reversed = UniformLoad::new("Bad", LoadType::Live, 1.0, 20.0, 10.0);
        assert_eq!(reversed.validate(30.0).unwrap_err().error_code(), "INVALID_INPUT");

        let beyond = UniformLoad::new("Bad", LoadType::Live, 1.0, 0.0, 31.0);
        assert!(beyond.validate(30.0).is_err());

        let negative_start = UniformLoad::new("Bad", LoadType::Live, 1.0, -1.0, 10.0);
        assert!(negative_start.validate(30.0).is_err());

        let infinite = UniformLoad::full_span("Bad", LoadType::Live, f64::INFINITY, 30.0);
        assert!(infinite.validate(30.0).is_err());
    }

    #[test]
    fn test_uniform_load_partial() {
        let partial = UniformLoad::new("Equipment", LoadType::Live, 2.0, 10.0, 20.0);
        assert!(partial.validate(30.0).is_ok());
        assert!(!partial.is_full_span(30.0));
    }

    #[test]
    fn test_uniform_load_json() {
        let json = r#"{ "name": "Slab", "load_type": "CD", "magnitude_klf": 0.5, "start_ft": 0.0, "end_ft": 30.0 }"#;
        let load: UniformLoad = serde_json::from_str(json).unwrap();
        assert_eq!(load.load_type, LoadType::ConstructionDead);
    }
}
