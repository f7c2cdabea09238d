//! # Flexural Capacity
//!
//! Capacity side of the composite beam check, per AISC 360:
//!
//! - effective slab width (I3.1a) and modular ratio
//! - plastic stress distribution for full composite action (I3.2a)
//! - web and flange compactness (Table B4.1b)
//! - bare-steel strength before the slab cures (F2 and F3)
//! - headed stud strength (I8.2a)
//! - lower-bound composite inertia for live load deflection (Commentary I3.2)
//!
//! Forces are in kips, lengths in inches and moments are reported in kip-ft.
//! Deck running parallel to the beam is reported as `Unsupported` wherever
//! the result depends on it.

use std::f64::consts::PI;

use crate::errors::{CalcError, CalcResult};
use crate::materials::{Material, SteelShape};
use crate::units::{Feet, Inches, KipFt, KipIn};

use super::composite_beam::{CompositeSteelBeam, DeckOrientation, NeighborCondition, TributarySide};

/// Resistance factor for flexure (AISC F1, I3.2a)
pub const PHI_B: f64 = 0.9;

/// Stud group factor Rg, one stud per rib
const STUD_RG: f64 = 1.0;

/// Stud position factor Rp, deck ribs perpendicular to the beam
const STUD_RP_PERPENDICULAR: f64 = 0.6;

/// Stud position factor Rp, deck ribs parallel to the beam
const STUD_RP_PARALLEL: f64 = 0.75;

impl CompositeSteelBeam {
    // ========================
    // Slab
    // ========================

    /// Effective slab width (ft).
    ///
    /// Each side contributes the lesser of span/8 and half the distance to a
    /// neighbouring beam, or the full distance to a slab edge.
    pub fn effective_width(&self) -> f64 {
        let side = |side: &TributarySide| {
            let reach = match side.condition {
                NeighborCondition::Beam => side.distance_ft / 2.0,
                NeighborCondition::Edge => side.distance_ft,
            };
            (self.span_ft() / 8.0).min(reach)
        };
        side(&self.layout().left) + side(&self.layout().right)
    }

    fn effective_width_in(&self) -> f64 {
        Inches::from(Feet(self.effective_width())).value()
    }

    /// Es / Ec
    pub fn modular_ratio(&self) -> f64 {
        self.steel().elastic_modulus_ksi() / self.concrete().elastic_modulus_ksi()
    }

    fn require_perpendicular_deck(&self, calculation: &str) -> CalcResult<()> {
        match self.deck().orientation {
            DeckOrientation::Perpendicular => Ok(()),
            DeckOrientation::Parallel => Err(CalcError::unsupported(
                calculation,
                "deck ribs parallel to the beam (orientation 0)",
            )),
        }
    }

    /// Neutral axis of the transformed section, measured down from the slab top (in).
    ///
    /// Concrete below the top of the deck is neglected.
    pub fn plastic_neutral_axis(&self) -> CalcResult<f64> {
        self.require_perpendicular_deck("plastic_neutral_axis")?;
        let deck = self.deck();
        let shape = self.shape();

        let concrete_area = self.effective_width_in() * deck.t_s_in / self.modular_ratio();
        let concrete_y = deck.t_s_in / 2.0;
        let steel_y = deck.t_s_in + deck.deck_height_in + shape.depth_in / 2.0;

        Ok((concrete_area * concrete_y + shape.area_in2 * steel_y) / (concrete_area + shape.area_in2))
    }

    // ========================
    // Full composite action
    // ========================

    /// Compression force for full composite action, C (kips).
    ///
    /// Lesser of steel yield As·Fy and slab crushing 0.85·f'c·Ac.
    pub fn full_comp_c(&self) -> CalcResult<f64> {
        self.require_perpendicular_deck("full_comp_c")?;
        let steel_yield = self.shape().area_in2 * self.steel().fy_ksi();
        let slab_crushing = 0.85 * self.concrete().fc_ksi() * self.effective_width_in() * self.deck().t_s_in;
        Ok(steel_yield.min(slab_crushing))
    }

    /// Depth of the concrete stress block carrying `force` (in).
    ///
    /// `width_in` defaults to the effective width.
    pub fn stress_block_depth(&self, force_kips: f64, width_in: Option<f64>) -> CalcResult<f64> {
        let width = width_in.unwrap_or_else(|| self.effective_width_in());
        if !(width > 0.0) {
            return Err(CalcError::invalid_input(
                "width_in",
                width.to_string(),
                "Stress block width must be positive",
            ));
        }
        if !(force_kips.is_finite() && force_kips >= 0.0) {
            return Err(CalcError::invalid_input(
                "force_kips",
                force_kips.to_string(),
                "Compression force must be finite and non-negative",
            ));
        }
        Ok(force_kips / (0.85 * self.concrete().fc_ksi() * width))
    }

    /// φMn for full composite action (kip-ft).
    ///
    /// The tension resultant sits at mid-depth of the steel; compression acts
    /// at the centre of the stress block.
    pub fn full_comp_moment_capacity(&self) -> CalcResult<f64> {
        let c = self.full_comp_c()?;
        let a = self.stress_block_depth(c, None)?;
        let deck = self.deck();
        let lever_arm = self.shape().depth_in / 2.0 + deck.t_s_in + deck.deck_height_in - a / 2.0;
        Ok(KipFt::from(KipIn(PHI_B * c * lever_arm)).value())
    }

    /// Lower-bound moment of inertia of the composite section, Ilb (in⁴).
    ///
    /// AISC Commentary Eq. C-I3-3 with ΣQn taken at the maximum composite
    /// ratio. Slab concrete enters as the equivalent steel area ΣQn/Fy at the
    /// stress block resultant; the elastic neutral axis is measured up from
    /// the bottom of the steel.
    pub fn lower_bound_inertia(&self) -> CalcResult<f64> {
        let sum_qn = self.studs().max_composite_ratio * self.full_comp_c()?;
        let a = self.stress_block_depth(sum_qn, None)?;
        let deck = self.deck();
        let shape = self.shape();

        // Concrete resultant above the top of steel, and steel centroid above its bottom
        let d1 = deck.t_s_in + deck.deck_height_in - a / 2.0;
        let d3 = shape.depth_in / 2.0;
        let concrete_area = sum_qn / self.steel().fy_ksi();
        let concrete_y = shape.depth_in + d1;

        let y_ena = (shape.area_in2 * d3 + concrete_area * concrete_y) / (shape.area_in2 + concrete_area);
        Ok(shape.ix_in4 + shape.area_in2 * (y_ena - d3).powi(2) + concrete_area * (concrete_y - y_ena).powi(2))
    }

    // ========================
    // Compactness
    // ========================

    /// h/tw ≤ 3.76·√(E/Fy)
    pub fn web_is_compact(&self) -> bool {
        self.shape().h_tw() <= web_compact_limit(self.steel().e_ksi(), self.steel().fy_ksi())
    }

    /// bf/2tf ≤ 0.38·√(E/Fy)
    pub fn flange_is_compact(&self) -> bool {
        self.shape().bf_2tf() <= flange_compact_limit(self.steel().e_ksi(), self.steel().fy_ksi())
    }

    // ========================
    // Pre-composite
    // ========================

    /// φMn of the bare steel while the slab is wet (kip-ft).
    ///
    /// Perpendicular deck braces the compression flange continuously, so
    /// lateral-torsional buckling cannot govern and flange local buckling
    /// caps the plastic moment.
    pub fn pre_composite_strength(&self) -> CalcResult<f64> {
        self.require_perpendicular_deck("pre_composite_strength")?;
        let ltb = self.lateral_torsional_strength(0.0, 1.0)?;
        Ok(ltb.min(self.flange_local_buckling_strength()?))
    }

    /// φMn for lateral-torsional buckling over an unbraced length (kip-ft), AISC F2.
    pub fn lateral_torsional_strength(&self, lb_ft: f64, cb: f64) -> CalcResult<f64> {
        if !(lb_ft.is_finite() && lb_ft >= 0.0) {
            return Err(CalcError::invalid_input("lb_ft", lb_ft.to_string(), "Unbraced length cannot be negative"));
        }
        if !(cb.is_finite() && cb >= 1.0) {
            return Err(CalcError::invalid_input("cb", cb.to_string(), "Cb must be at least 1.0"));
        }
        self.require_compact_web("lateral_torsional_strength")?;

        let mn = ltb_nominal_moment(
            self.shape(),
            self.steel().e_ksi(),
            self.steel().fy_ksi(),
            Inches::from(Feet(lb_ft)).value(),
            cb,
        );
        Ok(KipFt::from(KipIn(PHI_B * mn)).value())
    }

    /// φMn for compression flange local buckling (kip-ft), AISC F3.
    pub fn flange_local_buckling_strength(&self) -> CalcResult<f64> {
        self.require_compact_web("flange_local_buckling_strength")?;
        let mn = flb_nominal_moment(self.shape(), self.steel().e_ksi(), self.steel().fy_ksi());
        Ok(KipFt::from(KipIn(PHI_B * mn)).value())
    }

    fn require_compact_web(&self, calculation: &str) -> CalcResult<()> {
        if self.web_is_compact() {
            Ok(())
        } else {
            Err(CalcError::unsupported(
                calculation,
                format!("{} has a noncompact web (F4/F5 sections)", self.shape().label),
            ))
        }
    }

    /// Plastic moment Mp = Fy·Zx (kip-ft), unfactored
    pub fn plastic_moment(&self) -> f64 {
        KipFt::from(KipIn(self.steel().fy_ksi() * self.shape().zx_in3)).value()
    }

    // ========================
    // Shear studs
    // ========================

    /// Nominal strength of one stud, Qn (kips).
    ///
    /// Qn = 0.5·Asa·√(f'c·Ec) ≤ Rg·Rp·Asa·Fu
    pub fn stud_strength(&self) -> f64 {
        let asa = self.studs().area_in2();
        let concrete = self.concrete();
        let rp = match self.deck().orientation {
            DeckOrientation::Perpendicular => STUD_RP_PERPENDICULAR,
            DeckOrientation::Parallel => STUD_RP_PARALLEL,
        };
        let crushing = 0.5 * asa * (concrete.fc_ksi() * concrete.ec_ksi()).sqrt();
        let fracture = STUD_RG * rp * asa * self.studs().fu_ksi;
        crushing.min(fracture)
    }

    /// Studs over the whole span to develop `ratio` of full composite action.
    ///
    /// Each half span, between the support and midspan, carries ratio·C.
    pub fn studs_required(&self, ratio: f64) -> CalcResult<u32> {
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(CalcError::invalid_input(
                "ratio",
                ratio.to_string(),
                "Composite ratio must lie in (0, 1]",
            ));
        }
        let per_half = (ratio * self.full_comp_c()? / self.stud_strength()).ceil();
        Ok(2 * per_half as u32)
    }
}

/// Web compact limit λp = 3.76·√(E/Fy)
pub fn web_compact_limit(e_ksi: f64, fy_ksi: f64) -> f64 {
    3.76 * (e_ksi / fy_ksi).sqrt()
}

/// Flange compact limit λpf = 0.38·√(E/Fy)
pub fn flange_compact_limit(e_ksi: f64, fy_ksi: f64) -> f64 {
    0.38 * (e_ksi / fy_ksi).sqrt()
}

/// Flange noncompact limit λrf = 1.0·√(E/Fy)
pub fn flange_noncompact_limit(e_ksi: f64, fy_ksi: f64) -> f64 {
    (e_ksi / fy_ksi).sqrt()
}

/// Limiting unbraced length for yielding, Lp (in)
pub fn lp_in(shape: &SteelShape, e_ksi: f64, fy_ksi: f64) -> f64 {
    1.76 * shape.ry_in * (e_ksi / fy_ksi).sqrt()
}

/// Limiting unbraced length for inelastic LTB, Lr (in), with c = 1 for doubly symmetric I-shapes
pub fn lr_in(shape: &SteelShape, e_ksi: f64, fy_ksi: f64) -> f64 {
    let jc_sxho = shape.j_in4 / (shape.sx_in3 * shape.ho_in);
    let stress_ratio = 0.7 * fy_ksi / e_ksi;
    1.95 * shape.rts_in * (e_ksi / (0.7 * fy_ksi))
        * (jc_sxho + (jc_sxho.powi(2) + 6.76 * stress_ratio.powi(2)).sqrt()).sqrt()
}

/// Nominal LTB moment Mn (kip-in), AISC F2-1 to F2-4
fn ltb_nominal_moment(shape: &SteelShape, e_ksi: f64, fy_ksi: f64, lb_in: f64, cb: f64) -> f64 {
    let mp = fy_ksi * shape.zx_in3;
    let lp = lp_in(shape, e_ksi, fy_ksi);
    let lr = lr_in(shape, e_ksi, fy_ksi);

    let mn = if lb_in <= lp {
        mp
    } else if lb_in <= lr {
        let my_reduced = 0.7 * fy_ksi * shape.sx_in3;
        cb * (mp - (mp - my_reduced) * (lb_in - lp) / (lr - lp))
    } else {
        let slenderness = lb_in / shape.rts_in;
        let jc_sxho = shape.j_in4 / (shape.sx_in3 * shape.ho_in);
        let fcr = cb * PI.powi(2) * e_ksi / slenderness.powi(2)
            * (1.0 + 0.078 * jc_sxho * slenderness.powi(2)).sqrt();
        fcr * shape.sx_in3
    };
    mn.min(mp)
}

/// Nominal flange local buckling moment Mn (kip-in), AISC F3-1 and F3-2
fn flb_nominal_moment(shape: &SteelShape, e_ksi: f64, fy_ksi: f64) -> f64 {
    let mp = fy_ksi * shape.zx_in3;
    let lambda = shape.bf_2tf();
    let lambda_pf = flange_compact_limit(e_ksi, fy_ksi);
    let lambda_rf = flange_noncompact_limit(e_ksi, fy_ksi);

    if lambda <= lambda_pf {
        mp
    } else if lambda <= lambda_rf {
        let my_reduced = 0.7 * fy_ksi * shape.sx_in3;
        mp - (mp - my_reduced) * (lambda - lambda_pf) / (lambda_rf - lambda_pf)
    } else {
        let kc = (4.0 / shape.h_tw().sqrt()).clamp(0.35, 0.76);
        0.9 * e_ksi * kc * shape.sx_in3 / lambda.powi(2)
    }
}
