//! ASCE 7 Load Combinations for Composite Floor Beams
//!
//! Four fixed tables, built once and shared read-only:
//!
//! - [`LRFD_COMBINATIONS`] - strength design, ASCE 7 §2.3.1
//! - [`SERVICE_COMBINATIONS`] - service level, ASCE 7 §2.4.1 factors
//! - [`PRE_COMPOSITE_FACTORED`] / [`PRE_COMPOSITE_SERVICE`] - the reduced
//!   construction-stage tables (CD alone, CD + CL) checked against the bare
//!   steel section before the slab cures
//!
//! A table whose combinations reference only cases absent from the
//! intensities yields 0.0: the stage simply does not apply.
//!
//! Envelopes ([`envelope_max`] / [`envelope_min`]) bound a family of
//! per-combination diagrams sharing one coordinate axis.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::load_types::LoadType;
use super::LoadIntensities;
use crate::errors::{CalcError, CalcResult};

/// A named load combination: factors keyed by load case.
///
/// # Example
/// ```
/// use compbeam_core::loads::{LoadCombination, LoadIntensities, LoadType};
///
/// let combo = LoadCombination::new("LRFD-2", "1.2D + 1.6L")
///     .with_factor(LoadType::Dead, 1.2)
///     .with_factor(LoadType::Live, 1.6);
///
/// let loads = LoadIntensities::new()
///     .with_load(LoadType::Dead, 0.5)
///     .with_load(LoadType::Live, 1.0);
///
/// assert!((combo.apply(&loads) - 2.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "LRFD-2a")
    pub name: String,

    /// Human-readable equation (e.g., "1.2D + 1.6L + 0.5LLR")
    pub equation: String,

    /// Load factors keyed by load case
    pub factors: HashMap<LoadType, f64>,
}

impl LoadCombination {
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: HashMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Factored resultant of this combination for the given intensities
    pub fn apply(&self, intensities: &LoadIntensities) -> f64 {
        factor(intensities, self)
    }

    /// Factor for a load case (0.0 if not in the combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }
}

/// Weighted sum Σ intensity × factor over the factored load cases.
///
/// Cases absent from either side contribute zero.
pub fn factor(intensities: &LoadIntensities, combination: &LoadCombination) -> f64 {
    LoadType::FACTORED
        .iter()
        .map(|lt| intensities.get(*lt) * combination.get_factor(*lt))
        .sum()
}

// ============================================================================
// Combination Tables
// ============================================================================

/// ASCE 7 strength (LRFD) combinations
pub static LRFD_COMBINATIONS: Lazy<Vec<LoadCombination>> = Lazy::new(|| {
    use LoadType::*;

    let mut combos = vec![LoadCombination::new("LRFD-1", "1.4D").with_factor(Dead, 1.4)];

    // 2. 1.2D + 1.6L + 0.5(Lr or S or R)
    for (suffix, roof) in [("a", RoofLive), ("b", Snow), ("c", Rain)] {
        combos.push(
            LoadCombination::new(format!("LRFD-2{}", suffix), format!("1.2D + 1.6L + 0.5{}", roof))
                .with_factor(Dead, 1.2)
                .with_factor(Live, 1.6)
                .with_factor(roof, 0.5),
        );
    }

    // 3. 1.2D + 1.6(Lr or S or R) + (L or 0.5W)
    let mut suffix = b'a';
    for roof in [RoofLive, Snow, Rain] {
        for (companion, companion_factor) in [(Live, 1.0), (Wind, 0.5)] {
            let companion_label = if companion == Wind { "0.5W" } else { "L" };
            combos.push(
                LoadCombination::new(
                    format!("LRFD-3{}", suffix as char),
                    format!("1.2D + 1.6{} + {}", roof, companion_label),
                )
                .with_factor(Dead, 1.2)
                .with_factor(roof, 1.6)
                .with_factor(companion, companion_factor),
            );
            suffix += 1;
        }
    }

    // 4. 1.2D + 1.0W + L + 0.5(Lr or S or R)
    for (suffix, roof) in [("a", RoofLive), ("b", Snow), ("c", Rain)] {
        combos.push(
            LoadCombination::new(format!("LRFD-4{}", suffix), format!("1.2D + 1.0W + L + 0.5{}", roof))
                .with_factor(Dead, 1.2)
                .with_factor(Wind, 1.0)
                .with_factor(Live, 1.0)
                .with_factor(roof, 0.5),
        );
    }

    combos.push(
        LoadCombination::new("LRFD-5", "0.9D + 1.0W")
            .with_factor(Dead, 0.9)
            .with_factor(Wind, 1.0),
    );
    combos.push(
        LoadCombination::new("LRFD-6", "1.2D + 1.0E + L + 0.2S")
            .with_factor(Dead, 1.2)
            .with_factor(Seismic, 1.0)
            .with_factor(Live, 1.0)
            .with_factor(Snow, 0.2),
    );
    combos.push(
        LoadCombination::new("LRFD-7", "0.9D + 1.0E")
            .with_factor(Dead, 0.9)
            .with_factor(Seismic, 1.0),
    );

    combos
});

/// ASCE 7 service-level combinations
pub static SERVICE_COMBINATIONS: Lazy<Vec<LoadCombination>> = Lazy::new(|| {
    use LoadType::*;

    let mut combos = vec![
        LoadCombination::new("SVC-1", "D").with_factor(Dead, 1.0),
        LoadCombination::new("SVC-2", "D + L")
            .with_factor(Dead, 1.0)
            .with_factor(Live, 1.0),
    ];

    for (suffix, roof) in [("a", RoofLive), ("b", Snow), ("c", Rain)] {
        combos.push(
            LoadCombination::new(format!("SVC-3{}", suffix), format!("D + {}", roof))
                .with_factor(Dead, 1.0)
                .with_factor(roof, 1.0),
        );
    }

    for (suffix, roof) in [("a", RoofLive), ("b", Snow), ("c", Rain)] {
        combos.push(
            LoadCombination::new(format!("SVC-4{}", suffix), format!("D + 0.75L + 0.75{}", roof))
                .with_factor(Dead, 1.0)
                .with_factor(Live, 0.75)
                .with_factor(roof, 0.75),
        );
    }

    combos.push(
        LoadCombination::new("SVC-5a", "D + 0.6W")
            .with_factor(Dead, 1.0)
            .with_factor(Wind, 0.6),
    );
    combos.push(
        LoadCombination::new("SVC-5b", "D + 0.7E")
            .with_factor(Dead, 1.0)
            .with_factor(Seismic, 0.7),
    );

    // 6. D + 0.75L + 0.75(0.6W) + 0.75(Lr or S or R)
    for (suffix, roof) in [("a", RoofLive), ("b", Snow), ("c", Rain)] {
        combos.push(
            LoadCombination::new(
                format!("SVC-6{}", suffix),
                format!("D + 0.75L + 0.45W + 0.75{}", roof),
            )
            .with_factor(Dead, 1.0)
            .with_factor(Live, 0.75)
            .with_factor(Wind, 0.45)
            .with_factor(roof, 0.75),
        );
    }

    combos.push(
        LoadCombination::new("SVC-7", "D + 0.75L + 0.525E + 0.75S")
            .with_factor(Dead, 1.0)
            .with_factor(Live, 0.75)
            .with_factor(Seismic, 0.525)
            .with_factor(Snow, 0.75),
    );
    combos.push(
        LoadCombination::new("SVC-8", "0.6D + 0.6W")
            .with_factor(Dead, 0.6)
            .with_factor(Wind, 0.6),
    );
    combos.push(
        LoadCombination::new("SVC-9", "0.6D + 0.7E")
            .with_factor(Dead, 0.6)
            .with_factor(Seismic, 0.7),
    );

    combos
});

/// Construction-stage strength combinations on the bare steel
pub static PRE_COMPOSITE_FACTORED: Lazy<Vec<LoadCombination>> = Lazy::new(|| {
    vec![
        LoadCombination::new("PRE-LRFD-1", "1.4CD").with_factor(LoadType::ConstructionDead, 1.4),
        LoadCombination::new("PRE-LRFD-2", "1.2CD + 1.6CL")
            .with_factor(LoadType::ConstructionDead, 1.2)
            .with_factor(LoadType::ConstructionLive, 1.6),
    ]
});

/// Construction-stage service combinations on the bare steel
pub static PRE_COMPOSITE_SERVICE: Lazy<Vec<LoadCombination>> = Lazy::new(|| {
    vec![
        LoadCombination::new("PRE-SVC-1", "CD").with_factor(LoadType::ConstructionDead, 1.0),
        LoadCombination::new("PRE-SVC-2", "CD + CL")
            .with_factor(LoadType::ConstructionDead, 1.0)
            .with_factor(LoadType::ConstructionLive, 1.0),
    ]
});

// ============================================================================
// Factoring Contexts
// ============================================================================

/// The four stages a composite beam is checked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoringContext {
    /// Bare steel carrying construction loads, strength level
    PreCompositeFactored,
    /// Bare steel carrying construction loads, service level
    PreCompositeService,
    /// Composite section carrying in-service loads, strength level
    CompositeFactored,
    /// Composite section carrying in-service loads, service level
    CompositeService,
}

impl FactoringContext {
    pub const ALL: [FactoringContext; 4] = [
        FactoringContext::PreCompositeFactored,
        FactoringContext::PreCompositeService,
        FactoringContext::CompositeFactored,
        FactoringContext::CompositeService,
    ];

    /// Stable name, also used as the finite-element combination name
    pub fn name(&self) -> &'static str {
        match self {
            FactoringContext::PreCompositeFactored => "pre_composite_factored",
            FactoringContext::PreCompositeService => "pre_composite_service",
            FactoringContext::CompositeFactored => "composite_factored",
            FactoringContext::CompositeService => "composite_service",
        }
    }

    /// Combination table governing this context
    pub fn combinations(&self) -> &'static [LoadCombination] {
        match self {
            FactoringContext::PreCompositeFactored => &PRE_COMPOSITE_FACTORED,
            FactoringContext::PreCompositeService => &PRE_COMPOSITE_SERVICE,
            FactoringContext::CompositeFactored => &LRFD_COMBINATIONS,
            FactoringContext::CompositeService => &SERVICE_COMBINATIONS,
        }
    }

    pub fn is_pre_composite(&self) -> bool {
        matches!(
            self,
            FactoringContext::PreCompositeFactored | FactoringContext::PreCompositeService
        )
    }

    pub fn is_factored(&self) -> bool {
        matches!(
            self,
            FactoringContext::PreCompositeFactored | FactoringContext::CompositeFactored
        )
    }
}

impl std::fmt::Display for FactoringContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Governing Combinations
// ============================================================================

/// Governing factored value and the combination that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Governing {
    pub value: f64,
    pub combination: String,
}

/// Combination with the largest signed resultant.
///
/// Ties go to the combination listed first. An empty table governs with
/// `0.0` and an empty name.
pub fn find_governing_combination(
    intensities: &LoadIntensities,
    combinations: &[LoadCombination],
) -> Governing {
    select(intensities, combinations, |candidate, best| candidate > best)
}

/// Combination with the smallest signed resultant (critical for uplift)
pub fn find_minimum_combination(
    intensities: &LoadIntensities,
    combinations: &[LoadCombination],
) -> Governing {
    select(intensities, combinations, |candidate, best| candidate < best)
}

fn select(
    intensities: &LoadIntensities,
    combinations: &[LoadCombination],
    replaces: impl Fn(f64, f64) -> bool,
) -> Governing {
    combinations
        .iter()
        .map(|combo| (combo.apply(intensities), combo))
        .fold(None, |best: Option<(f64, &LoadCombination)>, (value, combo)| match best {
            Some((best_value, _)) if !replaces(value, best_value) => best,
            _ => Some((value, combo)),
        })
        .map(|(value, combo)| Governing {
            value,
            combination: combo.name.clone(),
        })
        .unwrap_or(Governing {
            value: 0.0,
            combination: String::new(),
        })
}

/// Maximum signed factored resultant over a table
pub fn max_factored(intensities: &LoadIntensities, combinations: &[LoadCombination]) -> f64 {
    find_governing_combination(intensities, combinations).value
}

/// Minimum signed factored resultant over a table
pub fn min_factored(intensities: &LoadIntensities, combinations: &[LoadCombination]) -> f64 {
    find_minimum_combination(intensities, combinations).value
}

// ============================================================================
// Envelopes
// ============================================================================

/// A result diagram sampled along the span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultArray {
    /// Sample positions (ft)
    pub x: Vec<f64>,
    /// Result value at each position
    pub values: Vec<f64>,
}

impl ResultArray {
    pub fn new(x: Vec<f64>, values: Vec<f64>) -> CalcResult<Self> {
        if x.len() != values.len() {
            return Err(CalcError::invalid_input(
                "values",
                values.len().to_string(),
                format!("Expected {} values to match the coordinate axis", x.len()),
            ));
        }
        Ok(ResultArray { x, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest |value| with its sign and position
    pub fn abs_max(&self) -> Option<(f64, f64)> {
        self.x
            .iter()
            .zip(&self.values)
            .fold(None, |best: Option<(f64, f64)>, (&x, &v)| match best {
                Some((_, bv)) if v.abs() <= bv.abs() => best,
                _ => Some((x, v)),
            })
    }
}

/// Pointwise value of greatest magnitude across combinations, sign preserved.
///
/// On ties the earlier combination (by name order) wins.
pub fn envelope_max(per_combination: &BTreeMap<String, ResultArray>) -> CalcResult<ResultArray> {
    envelope(per_combination, |candidate, current| candidate.abs() > current.abs())
}

/// Pointwise value of least magnitude across combinations, sign preserved.
pub fn envelope_min(per_combination: &BTreeMap<String, ResultArray>) -> CalcResult<ResultArray> {
    envelope(per_combination, |candidate, current| candidate.abs() < current.abs())
}

fn envelope(
    per_combination: &BTreeMap<String, ResultArray>,
    replaces: impl Fn(f64, f64) -> bool,
) -> CalcResult<ResultArray> {
    let mut arrays = per_combination.iter();
    let (_, first) = arrays.next().ok_or_else(|| {
        CalcError::invalid_input("per_combination", "0", "Envelope needs at least one result array")
    })?;

    let mut result = first.clone();
    for (name, array) in arrays {
        if array.len() != result.len() {
            return Err(CalcError::invalid_input(
                name.as_str(),
                array.len().to_string(),
                format!("Result array length differs from {}", result.len()),
            ));
        }
        for (current, &candidate) in result.values.iter_mut().zip(&array.values) {
            if replaces(candidate, *current) {
                *current = candidate;
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn loads(pairs: &[(LoadType, f64)]) -> LoadIntensities {
        pairs
            .iter()
            .fold(LoadIntensities::new(), |acc, (lt, v)| acc.with_load(*lt, *v))
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(LRFD_COMBINATIONS.len(), 16);
        assert_eq!(SERVICE_COMBINATIONS.len(), 16);
        assert_eq!(PRE_COMPOSITE_FACTORED.len(), 2);
        assert_eq!(PRE_COMPOSITE_SERVICE.len(), 2);
    }

    #[test]
    fn test_combination_names_unique() {
        for table in FactoringContext::ALL.iter().map(|c| c.combinations()) {
            let mut names: Vec<&str> = table.iter().map(|c| c.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), table.len());
        }
    }

    #[test]
    fn test_factor_weighted_sum() {
        let combo = LoadCombination::new("T", "1.2D + 1.6L")
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.6);
        let l = loads(&[(LoadType::Dead, 10.0), (LoadType::Live, 20.0), (LoadType::Snow, 99.0)]);
        assert_relative_eq!(factor(&l, &combo), 44.0, epsilon = 1e-9);
    }

    #[test]
    fn test_factor_ignores_partition_live() {
        let combo = LoadCombination::new("T", "Lp").with_factor(LoadType::PartitionLive, 1.0);
        let l = loads(&[(LoadType::PartitionLive, 10.0)]);
        assert_eq!(factor(&l, &combo), 0.0);
    }

    #[test]
    fn test_factor_is_linear() {
        let base = loads(&[(LoadType::Dead, 20.0), (LoadType::Live, 40.0), (LoadType::Snow, 10.0)]);
        let scaled = base.clone().with_load(LoadType::Live, 120.0);
        for combo in LRFD_COMBINATIONS.iter() {
            let delta = combo.apply(&scaled) - combo.apply(&base);
            assert_relative_eq!(delta, 80.0 * combo.get_factor(LoadType::Live), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_max_factored_lrfd() {
        let lrfd = &LRFD_COMBINATIONS;
        assert_relative_eq!(max_factored(&loads(&[(LoadType::Dead, 20.0)]), lrfd), 28.0, epsilon = 1e-9);
        assert_relative_eq!(
            max_factored(
                &loads(&[(LoadType::Dead, 20.0), (LoadType::Live, 40.0), (LoadType::RoofLive, 20.0)]),
                lrfd
            ),
            98.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            max_factored(
                &loads(&[
                    (LoadType::Dead, 20.0),
                    (LoadType::Live, 40.0),
                    (LoadType::Seismic, 20.0),
                    (LoadType::Snow, 10.0)
                ]),
                lrfd
            ),
            93.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_min_factored_lrfd() {
        let lrfd = &LRFD_COMBINATIONS;
        assert_relative_eq!(min_factored(&loads(&[(LoadType::Dead, 20.0)]), lrfd), 18.0, epsilon = 1e-9);
        assert_relative_eq!(
            min_factored(
                &loads(&[(LoadType::Dead, 20.0), (LoadType::Live, 40.0), (LoadType::RoofLive, 20.0)]),
                lrfd
            ),
            18.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            min_factored(
                &loads(&[
                    (LoadType::Dead, 20.0),
                    (LoadType::Live, 40.0),
                    (LoadType::Wind, 50.0),
                    (LoadType::Seismic, 60.0),
                    (LoadType::Snow, 10.0)
                ]),
                lrfd
            ),
            28.0,
            epsilon = 1e-9
        );
        let uplift = find_minimum_combination(
            &loads(&[
                (LoadType::Dead, 20.0),
                (LoadType::Live, 40.0),
                (LoadType::Seismic, -20.0),
                (LoadType::Snow, 10.0),
            ]),
            lrfd,
        );
        assert_relative_eq!(uplift.value, -2.0, epsilon = 1e-12);
        assert_eq!(uplift.combination, "LRFD-7");
    }

    #[test]
    fn test_construction_cases_not_applicable_to_lrfd() {
        let cd = loads(&[(LoadType::ConstructionDead, 20.0)]);
        let cd_cl = cd.clone().with_load(LoadType::ConstructionLive, 20.0);
        assert_eq!(max_factored(&cd, &LRFD_COMBINATIONS), 0.0);
        assert_eq!(max_factored(&cd_cl, &LRFD_COMBINATIONS), 0.0);
        assert_eq!(min_factored(&cd_cl, &SERVICE_COMBINATIONS), 0.0);
    }

    #[test]
    fn test_pre_composite_tables() {
        let cd = loads(&[(LoadType::ConstructionDead, 20.0)]);
        let cd_cl = cd.clone().with_load(LoadType::ConstructionLive, 20.0);

        assert_relative_eq!(max_factored(&cd, &PRE_COMPOSITE_FACTORED), 28.0, epsilon = 1e-9);
        assert_relative_eq!(max_factored(&cd_cl, &PRE_COMPOSITE_FACTORED), 56.0, epsilon = 1e-9);
        assert_relative_eq!(max_factored(&cd, &PRE_COMPOSITE_SERVICE), 20.0, epsilon = 1e-9);
        assert_relative_eq!(max_factored(&cd_cl, &PRE_COMPOSITE_SERVICE), 40.0, epsilon = 1e-9);

        assert_relative_eq!(min_factored(&cd, &PRE_COMPOSITE_FACTORED), 24.0, epsilon = 1e-9);
        assert_relative_eq!(min_factored(&cd_cl, &PRE_COMPOSITE_FACTORED), 28.0, epsilon = 1e-9);
        assert_relative_eq!(min_factored(&cd, &PRE_COMPOSITE_SERVICE), 20.0, epsilon = 1e-9);
        assert_relative_eq!(min_factored(&cd_cl, &PRE_COMPOSITE_SERVICE), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_not_below_min() {
        let l = loads(&[
            (LoadType::Dead, 0.7),
            (LoadType::Live, 1.1),
            (LoadType::Wind, -0.4),
            (LoadType::Snow, 0.2),
        ]);
        for ctx in FactoringContext::ALL {
            assert!(max_factored(&l, ctx.combinations()) >= min_factored(&l, ctx.combinations()));
        }
    }

    #[test]
    fn test_empty_table_governs_with_zero() {
        let g = find_governing_combination(&loads(&[(LoadType::Dead, 5.0)]), &[]);
        assert_eq!(g.value, 0.0);
        assert!(g.combination.is_empty());
    }

    #[test]
    fn test_governing_names_combination() {
        let g = find_governing_combination(
            &loads(&[(LoadType::Dead, 20.0), (LoadType::Live, 40.0), (LoadType::RoofLive, 20.0)]),
            &LRFD_COMBINATIONS,
        );
        assert_eq!(g.combination, "LRFD-2a");

        // 2a, 2b and 2c tie without roof loads
        let tied = find_governing_combination(
            &loads(&[(LoadType::Dead, 20.0), (LoadType::Live, 40.0)]),
            &LRFD_COMBINATIONS,
        );
        assert_eq!(tied.combination, "LRFD-2a");
    }

    #[test]
    fn test_context_names_and_tables() {
        assert_eq!(FactoringContext::CompositeFactored.name(), "composite_factored");
        assert_eq!(FactoringContext::PreCompositeService.combinations().len(), 2);
        assert!(FactoringContext::PreCompositeFactored.is_pre_composite());
        assert!(FactoringContext::CompositeFactored.is_factored());
        assert!(!FactoringContext::CompositeService.is_factored());
        let json = serde_json::to_string(&FactoringContext::CompositeService).unwrap();
        assert_eq!(json, "\"composite_service\"");
    }

    fn arrays(pairs: &[(&str, Vec<f64>)]) -> BTreeMap<String, ResultArray> {
        pairs
            .iter()
            .map(|(name, values)| {
                let x = (0..values.len()).map(|i| i as f64).collect();
                (name.to_string(), ResultArray::new(x, values.clone()).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_envelope_max_preserves_sign() {
        let per_combo = arrays(&[
            ("a", vec![1.0, -5.0, 3.0]),
            ("b", vec![-2.0, 4.0, 3.0]),
            ("c", vec![0.5, 0.0, -3.5]),
        ]);
        let env = envelope_max(&per_combo).unwrap();
        assert_eq!(env.values, vec![-2.0, -5.0, -3.5]);
        assert_eq!(env.x, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_envelope_min() {
        let per_combo = arrays(&[("a", vec![1.0, -5.0, 3.0]), ("b", vec![-2.0, 4.0, -0.5])]);
        let env = envelope_min(&per_combo).unwrap();
        assert_eq!(env.values, vec![1.0, 4.0, -0.5]);
    }

    #[test]
    fn test_envelope_ties_keep_first() {
        let per_combo = arrays(&[("a", vec![2.0]), ("b", vec![-2.0])]);
        assert_eq!(envelope_max(&per_combo).unwrap().values, vec![2.0]);
        assert_eq!(envelope_min(&per_combo).unwrap().values, vec![2.0]);
    }

    #[test]
    fn test_envelope_errors() {
        assert!(envelope_max(&BTreeMap::new()).is_err());
        let mismatched = arrays(&[("a", vec![1.0, 2.0]), ("b", vec![1.0])]);
        assert_eq!(envelope_max(&mismatched).unwrap_err().error_code(), "INVALID_INPUT");
        assert!(ResultArray::new(vec![0.0], vec![]).is_err());
    }

    #[test]
    fn test_abs_max() {
        let arr = ResultArray::new(vec![0.0, 5.0, 10.0], vec![1.0, -7.0, 6.0]).unwrap();
        assert_eq!(arr.abs_max(), Some((5.0, -7.0)));
        assert_eq!(ResultArray::new(vec![], vec![]).unwrap().abs_max(), None);
    }
}
