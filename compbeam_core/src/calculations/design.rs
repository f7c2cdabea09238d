//! Demand/capacity summary of an analyzed composite beam, and the JSON
//! report built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CalcResult;
use crate::loads::{FactoringContext, Governing};
use crate::units::{Feet, Inches};

use super::composite_beam::{CompositeBeamInput, CompositeSteelBeam};

/// Live load deflection limit, span / 360
pub const LIVE_DEFLECTION_LIMIT: f64 = 360.0;

/// One strength check: factored moment against design strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageCheck {
    /// Governing factored intensity (klf)
    pub design_load_klf: f64,

    /// Combination that produced it
    pub governing_combination: String,

    /// Mu (kip-ft)
    pub demand_kip_ft: f64,

    /// φMn (kip-ft)
    pub capacity_kip_ft: f64,

    /// Mu / φMn, must be ≤ 1.0
    pub unity: f64,
}

impl StageCheck {
    fn new(governing: Option<&Governing>, demand_kip_ft: f64, capacity_kip_ft: f64) -> Self {
        let (design_load_klf, governing_combination) = governing
            .map(|g| (g.value, g.combination.clone()))
            .unwrap_or_default();
        StageCheck {
            design_load_klf,
            governing_combination,
            demand_kip_ft,
            capacity_kip_ft,
            unity: demand_kip_ft.abs() / capacity_kip_ft,
        }
    }

    pub fn passes(&self) -> bool {
        self.unity <= 1.0
    }
}

/// Stud requirement at the configured composite ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudSummary {
    /// Qn per stud (kips)
    pub qn_kips: f64,
    pub min_ratio: f64,
    pub min_count: u32,
    pub max_ratio: f64,
    pub max_count: u32,
}

/// Everything an engineer checks on a composite beam, in one place.
///
/// ## JSON Example
///
/// ```json
/// {
///   "beam": "B-1",
///   "shape": "W16X26",
///   "span_ft": 30.0,
///   "web_compact": true,
///   "flange_compact": true,
///   "effective_width_ft": 7.5,
///   "modular_ratio": 7.96,
///   "plastic_neutral_axis_in": 3.8,
///   "compressive_force_kips": 384.0,
///   "stress_block_depth_in": 1.25,
///   "pre_composite": { "demand_kip_ft": 107.0, "capacity_kip_ft": 165.75, "unity": 0.65, "...": "..." },
///   "composite": { "demand_kip_ft": 305.0, "capacity_kip_ft": 395.2, "unity": 0.77, "...": "..." },
///   "max_shear_kips": 40.7,
///   "service_deflection_in": 3.81,
///   "service_deflection_ratio": 94.4,
///   "lower_bound_inertia_in4": 1024.1,
///   "live_deflection_in": 0.80,
///   "live_deflection_ratio": 451.2,
///   "studs": { "qn_kips": 17.2, "min_ratio": 0.25, "min_count": 12, "max_ratio": 1.0, "max_count": 46 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub beam: String,
    pub shape: String,
    pub span_ft: f64,
    pub shored: bool,

    // === Section ===
    pub web_compact: bool,
    pub flange_compact: bool,

    // === Composite section ===
    pub effective_width_ft: f64,
    pub modular_ratio: f64,
    pub plastic_neutral_axis_in: f64,
    pub compressive_force_kips: f64,
    pub stress_block_depth_in: f64,

    /// Governing intensity per context
    pub factored_loads: BTreeMap<FactoringContext, Governing>,

    // === Strength checks ===
    /// Bare steel under construction loads; absent when the beam is shored
    pub pre_composite: Option<StageCheck>,

    pub composite: StageCheck,

    /// Vu for the composite factored stage (kips)
    pub max_shear_kips: f64,

    // === Serviceability ===
    /// Composite service deflection on the steel section alone (in), for reference
    pub service_deflection_in: f64,

    /// span / service deflection, absent when the beam does not deflect
    pub service_deflection_ratio: Option<f64>,

    /// Ilb of the composite section (in⁴)
    pub lower_bound_inertia_in4: f64,

    /// L + Lp deflection on Ilb (in)
    pub live_deflection_in: f64,

    /// span / live deflection, checked against [`LIVE_DEFLECTION_LIMIT`]
    pub live_deflection_ratio: Option<f64>,

    pub studs: StudSummary,
}

impl DesignSummary {
    /// Live load deflection is within span/360
    pub fn live_deflection_passes(&self) -> bool {
        self.live_deflection_ratio.map_or(true, |ratio| ratio >= LIVE_DEFLECTION_LIMIT)
    }

    /// Strength checks and the live load deflection limit all pass
    pub fn passes(&self) -> bool {
        self.composite.passes()
            && self.pre_composite.as_ref().map_or(true, StageCheck::passes)
            && self.live_deflection_passes()
    }

    /// Highest strength unity ratio
    pub fn governing_unity(&self) -> f64 {
        self.pre_composite
            .as_ref()
            .map_or(self.composite.unity, |pre| pre.unity.max(self.composite.unity))
    }
}

impl CompositeSteelBeam {
    /// Collect capacities and demands. Requires [`analyze`](Self::analyze).
    pub fn design_summary(&self) -> CalcResult<DesignSummary> {
        let composite_mu = self.max_moment(FactoringContext::CompositeFactored)?;
        let composite = StageCheck::new(
            self.governing(FactoringContext::CompositeFactored),
            composite_mu,
            self.full_comp_moment_capacity()?,
        );

        // Shoring carries the wet concrete, so the bare steel check does not apply
        let pre_composite = if self.is_shored() {
            None
        } else {
            Some(StageCheck::new(
                self.governing(FactoringContext::PreCompositeFactored),
                self.max_moment(FactoringContext::PreCompositeFactored)?,
                self.pre_composite_strength()?,
            ))
        };

        let span_in = Inches::from(Feet(self.span_ft())).value();
        let ratio = |deflection: f64| (deflection.abs() > 0.0).then(|| span_in / deflection.abs());
        let service_deflection_in = self.max_deflection(FactoringContext::CompositeService)?;
        let live_deflection_in = self.live_load_deflection()?;

        let compressive_force_kips = self.full_comp_c()?;
        let studs = self.studs();

        Ok(DesignSummary {
            beam: self.name().to_string(),
            shape: self.shape().label.clone(),
            span_ft: self.span_ft(),
            shored: self.is_shored(),
            web_compact: self.web_is_compact(),
            flange_compact: self.flange_is_compact(),
            effective_width_ft: self.effective_width(),
            modular_ratio: self.modular_ratio(),
            plastic_neutral_axis_in: self.plastic_neutral_axis()?,
            compressive_force_kips,
            stress_block_depth_in: self.stress_block_depth(compressive_force_kips, None)?,
            factored_loads: self.factored_loads().clone(),
            pre_composite,
            composite,
            max_shear_kips: self.max_shear(FactoringContext::CompositeFactored)?.abs(),
            service_deflection_in,
            service_deflection_ratio: ratio(service_deflection_in),
            lower_bound_inertia_in4: self.lower_bound_inertia()?,
            live_deflection_in,
            live_deflection_ratio: ratio(live_deflection_in),
            studs: StudSummary {
                qn_kips: self.stud_strength(),
                min_ratio: studs.min_composite_ratio,
                min_count: self.studs_required(studs.min_composite_ratio)?,
                max_ratio: studs.max_composite_ratio,
                max_count: self.studs_required(studs.max_composite_ratio)?,
            },
        })
    }
}

/// A timestamped design record: the input that produced it and the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub generated_at: DateTime<Utc>,

    /// compbeam_core version that produced the report
    pub engine_version: String,

    pub input: CompositeBeamInput,
    pub summary: DesignSummary,
}

impl DesignReport {
    pub fn new(beam: &CompositeSteelBeam) -> CalcResult<Self> {
        Ok(DesignReport {
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            input: beam.to_input(),
            summary: beam.design_summary()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{LoadType, UniformLoad};
    use crate::materials::{builtin_w_shapes, Concrete};
    use approx::assert_relative_eq;

    fn analyzed(shored: bool) -> CompositeSteelBeam {
        let input = CompositeBeamInput {
            shored,
            concrete: Concrete::normal_weight(4.0, 145.0).unwrap(),
            loads: vec![
                UniformLoad::full_span("Dead", LoadType::Dead, 0.5, 30.0),
                UniformLoad::full_span("Wet concrete", LoadType::ConstructionDead, 0.5, 30.0),
                UniformLoad::full_span("Live", LoadType::Live, 1.3, 30.0),
                UniformLoad::full_span("Construction live", LoadType::ConstructionLive, 0.2, 30.0),
            ],
            ..CompositeBeamInput::reference()
        };
        let mut beam = CompositeSteelBeam::new(input, &builtin_w_shapes()).unwrap();
        beam.analyze().unwrap();
        beam
    }

    #[test]
    fn test_summary_values() {
        let summary = analyzed(false).design_summary().unwrap();

        assert!(summary.web_compact && summary.flange_compact);
        assert_relative_eq!(summary.effective_width_ft, 7.5, epsilon = 1e-12);
        assert_relative_eq!(summary.compressive_force_kips, 384.0, epsilon = 1e-9);

        assert_relative_eq!(summary.composite.demand_kip_ft, 2.7112 * 900.0 / 8.0, max_relative = 1e-9);
        assert_eq!(summary.composite.governing_combination, "LRFD-2a");
        let pre = summary.pre_composite.as_ref().unwrap();
        assert_relative_eq!(pre.demand_kip_ft, 0.9512 * 900.0 / 8.0, max_relative = 1e-9);
        assert_relative_eq!(pre.capacity_kip_ft, 165.75, epsilon = 1e-9);
        assert_eq!(pre.governing_combination, "PRE-LRFD-2");

        assert_relative_eq!(summary.max_shear_kips, 2.7112 * 15.0, max_relative = 1e-9);
        assert_eq!(summary.studs.max_count, 46);
        assert_eq!(summary.studs.min_count, 12);
    }

    #[test]
    fn test_summary_verdict() {
        let summary = analyzed(false).design_summary().unwrap();
        assert!(summary.composite.passes());
        assert!(summary.governing_unity() < 1.0);
        assert!(summary.live_deflection_passes());
        assert!(summary.passes());

        // Total service load on the bare steel is reported, not checked
        assert!(summary.service_deflection_ratio.unwrap() < LIVE_DEFLECTION_LIMIT);
    }

    #[test]
    fn test_live_deflection_uses_composite_inertia() {
        let beam = analyzed(false);
        let summary = beam.design_summary().unwrap();

        // 5wL⁴/384EIlb for 1.3 klf over 360 in
        let w = 1.3 / 12.0;
        let expected = 5.0 * w * 360.0_f64.powi(4) / (384.0 * 29000.0 * summary.lower_bound_inertia_in4);
        assert_relative_eq!(summary.live_deflection_in, expected, max_relative = 1e-9);
        assert!(summary.live_deflection_ratio.unwrap() > 440.0);

        // Same load on the bare steel would exceed span/360
        let bare = expected * summary.lower_bound_inertia_in4 / 301.0;
        assert!(360.0 / bare < LIVE_DEFLECTION_LIMIT);
    }

    #[test]
    fn test_heavy_live_load_fails_deflection() {
        let input = CompositeBeamInput {
            concrete: Concrete::normal_weight(4.0, 145.0).unwrap(),
            loads: vec![UniformLoad::full_span("Live", LoadType::Live, 2.5, 30.0)],
            ..CompositeBeamInput::reference()
        };
        let mut beam = CompositeSteelBeam::new(input, &builtin_w_shapes()).unwrap();
        beam.analyze().unwrap();
        let summary = beam.design_summary().unwrap();

        assert!(!summary.live_deflection_passes());
        assert!(!summary.passes());
    }

    #[test]
    fn test_partition_live_counts_toward_live_deflection() {
        let mut beam = analyzed(false);
        let base = beam.design_summary().unwrap().live_deflection_in;

        let mut input = beam.to_input();
        input.loads.push(UniformLoad::full_span("Partitions", LoadType::PartitionLive, 1.3, 30.0));
        beam = CompositeSteelBeam::new(input, &builtin_w_shapes()).unwrap();
        beam.analyze().unwrap();

        assert_relative_eq!(beam.live_load_klf(), 2.6, epsilon = 1e-12);
        assert_relative_eq!(beam.design_summary().unwrap().live_deflection_in, 2.0 * base, max_relative = 1e-9);
    }

    #[test]
    fn test_shored_skips_pre_composite() {
        let summary = analyzed(true).design_summary().unwrap();
        assert!(summary.shored);
        assert!(summary.pre_composite.is_none());
        assert_eq!(summary.governing_unity(), summary.composite.unity);
    }

    #[test]
    fn test_summary_requires_analysis() {
        let beam = CompositeSteelBeam::new(CompositeBeamInput::reference(), &builtin_w_shapes()).unwrap();
        assert_eq!(beam.design_summary().unwrap_err().error_code(), "NOT_ANALYZED");
        assert!(DesignReport::new(&beam).is_err());
    }

    #[test]
    fn test_report_serialization() {
        let report = DesignReport::new(&analyzed(false)).unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("generated_at"));
        assert!(json.contains("composite_factored"));
        assert!(json.contains("\"shape\": \"W16X26\""));

        let parsed: DesignReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
