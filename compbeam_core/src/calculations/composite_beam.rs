//! # Composite Steel Beam
//!
//! A rolled steel beam acting with a concrete slab on metal deck, simply
//! supported over one span.
//!
//! Construction resolves the shape, validates the configuration and factors
//! every load combination for the four [`FactoringContext`]s. Demands come
//! from [`CompositeSteelBeam::analyze`], which builds and solves a frame
//! model; the capacity side lives in [`super::flexure`].
//!
//! ## Example
//!
//! ```rust
//! use compbeam_core::calculations::composite_beam::*;
//! use compbeam_core::loads::{FactoringContext, LoadType, UniformLoad};
//! use compbeam_core::materials::builtin_w_shapes;
//!
//! let input = CompositeBeamInput {
//!     loads: vec![
//!         UniformLoad::full_span("Slab", LoadType::Dead, 0.5, 30.0),
//!         UniformLoad::full_span("Office", LoadType::Live, 1.3, 30.0),
//!     ],
//!     ..CompositeBeamInput::reference()
//! };
//!
//! let mut beam = CompositeSteelBeam::new(input, &builtin_w_shapes()).unwrap();
//! beam.analyze().unwrap();
//!
//! let mu = beam.max_moment(FactoringContext::CompositeFactored).unwrap();
//! assert!(mu > 300.0 && mu < 310.0);
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::fea::{self, DistributedLoad, FrameModel, LoadCombo, LoadDirection, Member, Node, Quantity, Section, Support};
use crate::loads::{
    envelope_max, envelope_min, find_governing_combination, FactoringContext, Governing, LoadIntensities, LoadType,
    ResultArray, UniformLoad,
};
use crate::materials::{Concrete, SectionProvider, Steel, SteelShape};
use crate::units::{Feet, Inches, KipFt, KipIn, KipPerIn, KlF, PlF};

/// Sample count for diagrams used by the `max_*` queries (spacing of span/100)
pub const DEFAULT_DIAGRAM_POINTS: usize = 101;

const NODE_I: &str = "N1";
const NODE_J: &str = "N2";
const MEMBER: &str = "M1";
const STEEL: &str = "Steel";
const SECTION: &str = "Shape";

/// Unfactored composite-stage live load (L + Lp), solved for deflection only
const LIVE_CASE: &str = "composite_live";

// ============================================================================
// Configuration
// ============================================================================

/// What lies beyond one side of the beam's tributary strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeighborCondition {
    /// Another parallel beam; the slab between is shared
    Beam,
    /// A free slab edge
    Edge,
}

impl FromStr for NeighborCondition {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Beam" | "beam" => Ok(NeighborCondition::Beam),
            "Edge" | "edge" => Ok(NeighborCondition::Edge),
            other => Err(CalcError::invalid_input(
                "layout.condition",
                other,
                "Condition must be 'Beam' or 'Edge'",
            )),
        }
    }
}

impl fmt::Display for NeighborCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighborCondition::Beam => write!(f, "Beam"),
            NeighborCondition::Edge => write!(f, "Edge"),
        }
    }
}

/// One side of the tributary layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TributarySide {
    pub condition: NeighborCondition,

    /// Distance to the neighbouring beam or slab edge (ft)
    pub distance_ft: f64,
}

impl TributarySide {
    pub fn new(condition: NeighborCondition, distance_ft: f64) -> Self {
        TributarySide {
            condition,
            distance_ft,
        }
    }

    pub fn beam(distance_ft: f64) -> Self {
        TributarySide::new(NeighborCondition::Beam, distance_ft)
    }

    pub fn edge(distance_ft: f64) -> Self {
        TributarySide::new(NeighborCondition::Edge, distance_ft)
    }
}

/// Left and right tributary extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub left: TributarySide,
    pub right: TributarySide,
}

impl Layout {
    pub fn new(left: TributarySide, right: TributarySide) -> Self {
        Layout { left, right }
    }

    /// Same side mirrored
    pub fn swapped(&self) -> Self {
        Layout::new(self.right, self.left)
    }
}

fn default_min_ratio() -> f64 {
    0.25
}

fn default_max_ratio() -> f64 {
    1.0
}

/// Headed shear stud parameters.
///
/// ## JSON Example
///
/// ```json
/// { "fu_ksi": 65.0, "diameter_in": 0.75, "length_in": 5.0,
///   "min_composite_ratio": 0.25, "max_composite_ratio": 1.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudConfig {
    /// Stud tensile strength (ksi)
    pub fu_ksi: f64,

    /// Shank diameter (in)
    pub diameter_in: f64,

    /// Length after welding (in)
    pub length_in: f64,

    /// Lowest partial-composite ratio considered (ΣQn / C)
    #[serde(default = "default_min_ratio")]
    pub min_composite_ratio: f64,

    #[serde(default = "default_max_ratio")]
    pub max_composite_ratio: f64,
}

impl StudConfig {
    /// Shank area Asa (in²)
    pub fn area_in2(&self) -> f64 {
        std::f64::consts::PI * self.diameter_in.powi(2) / 4.0
    }
}

/// Deck rib direction relative to the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum DeckOrientation {
    /// Ribs run along the beam (0°)
    Parallel,
    /// Ribs cross the beam (90°)
    Perpendicular,
}

impl DeckOrientation {
    pub fn degrees(&self) -> f64 {
        match self {
            DeckOrientation::Parallel => 0.0,
            DeckOrientation::Perpendicular => 90.0,
        }
    }
}

impl TryFrom<f64> for DeckOrientation {
    type Error = CalcError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        if degrees == 0.0 {
            Ok(DeckOrientation::Parallel)
        } else if degrees == 90.0 {
            Ok(DeckOrientation::Perpendicular)
        } else {
            Err(CalcError::invalid_input(
                "deck.orientation",
                degrees.to_string(),
                "Deck orientation must be 0 (parallel) or 90 (perpendicular) degrees",
            ))
        }
    }
}

impl From<DeckOrientation> for f64 {
    fn from(orientation: DeckOrientation) -> f64 {
        orientation.degrees()
    }
}

/// Slab and deck geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Slab thickness above the deck flutes, t_s (in)
    pub t_s_in: f64,

    /// Deck rib height, hr (in)
    pub deck_height_in: f64,

    /// Rib direction, serialized as 0 or 90 degrees
    pub orientation: DeckOrientation,
}

/// Complete description of one composite beam, as read from an input file.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "B-1",
///   "span_ft": 30.0,
///   "shape": "W16X26",
///   "shored": false,
///   "layout": {
///     "left": { "condition": "Beam", "distance_ft": 8.0 },
///     "right": { "condition": "Beam", "distance_ft": 8.0 }
///   },
///   "studs": { "fu_ksi": 65.0, "diameter_in": 0.75, "length_in": 5.0 },
///   "deck": { "t_s_in": 3.5, "deck_height_in": 3.0, "orientation": 90 },
///   "steel": { "fy_ksi": 50.0, "fu_ksi": 65.0 },
///   "concrete": { "fc_ksi": 4.0, "density_pcf": 145.0 },
///   "loads": [
///     { "name": "Slab", "load_type": "D", "magnitude_klf": 0.5, "start_ft": 0.0, "end_ft": 30.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeBeamInput {
    /// User label (e.g., "B-1")
    pub name: String,

    pub span_ft: f64,

    /// Section label resolved through a [`SectionProvider`]
    pub shape: String,

    /// Temporary shoring carries the construction loads
    #[serde(default)]
    pub shored: bool,

    pub layout: Layout,
    pub studs: StudConfig,
    pub deck: DeckConfig,

    #[serde(default)]
    pub steel: Steel,

    #[serde(default)]
    pub concrete: Concrete,

    #[serde(default)]
    pub loads: Vec<UniformLoad>,
}

impl CompositeBeamInput {
    /// A 30 ft W16X26 on 3 in deck with 3.5 in of normal weight topping,
    /// beams at 8 ft each side and no applied loads.
    pub fn reference() -> Self {
        CompositeBeamInput {
            name: "Composite Beam".to_string(),
            span_ft: 30.0,
            shape: "W16X26".to_string(),
            shored: false,
            layout: Layout::new(TributarySide::beam(8.0), TributarySide::beam(8.0)),
            studs: StudConfig {
                fu_ksi: 65.0,
                diameter_in: 0.75,
                length_in: 5.0,
                min_composite_ratio: default_min_ratio(),
                max_composite_ratio: default_max_ratio(),
            },
            deck: DeckConfig {
                t_s_in: 3.5,
                deck_height_in: 3.0,
                orientation: DeckOrientation::Perpendicular,
            },
            steel: Steel::default(),
            concrete: Concrete::default(),
            loads: Vec::new(),
        }
    }

    /// Check every range the calculations rely on.
    pub fn validate(&self) -> CalcResult<()> {
        fn positive(field: &str, value: f64, what: &str) -> CalcResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(CalcError::invalid_input(field, value.to_string(), format!("{} must be positive", what)))
            }
        }

        positive("span_ft", self.span_ft, "Span")?;
        positive("deck.t_s_in", self.deck.t_s_in, "Slab thickness")?;
        if !(self.deck.deck_height_in.is_finite() && self.deck.deck_height_in >= 0.0) {
            return Err(CalcError::invalid_input(
                "deck.deck_height_in",
                self.deck.deck_height_in.to_string(),
                "Deck height cannot be negative",
            ));
        }
        positive("layout.left.distance_ft", self.layout.left.distance_ft, "Tributary distance")?;
        positive("layout.right.distance_ft", self.layout.right.distance_ft, "Tributary distance")?;

        positive("studs.fu_ksi", self.studs.fu_ksi, "Stud tensile strength")?;
        positive("studs.diameter_in", self.studs.diameter_in, "Stud diameter")?;
        positive("studs.length_in", self.studs.length_in, "Stud length")?;
        let (min_ratio, max_ratio) = (self.studs.min_composite_ratio, self.studs.max_composite_ratio);
        if !(min_ratio > 0.0 && min_ratio <= max_ratio && max_ratio <= 1.0) {
            return Err(CalcError::invalid_input(
                "studs.min_composite_ratio",
                format!("{}..{}", min_ratio, max_ratio),
                "Composite ratios must satisfy 0 < min <= max <= 1",
            ));
        }

        for load in &self.loads {
            load.validate(self.span_ft)?;
        }
        Ok(())
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A validated composite beam with its governing load per factoring context.
///
/// Frame analysis results are absent until [`analyze`](Self::analyze) runs;
/// every demand query fails with `NotAnalyzed` before then.
#[derive(Debug, Clone)]
pub struct CompositeSteelBeam {
    name: String,
    span_ft: f64,
    shape: SteelShape,
    shored: bool,
    layout: Layout,
    studs: StudConfig,
    deck: DeckConfig,
    steel: Steel,
    concrete: Concrete,
    loads: Vec<UniformLoad>,
    factored_loads: BTreeMap<FactoringContext, Governing>,
    fea: Option<FrameModel>,
}

/// Pointwise bounds of the moment diagrams across every context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentEnvelope {
    pub max: ResultArray,
    pub min: ResultArray,
}

impl CompositeSteelBeam {
    /// Validate `input`, resolve its shape and factor every context.
    pub fn new(input: CompositeBeamInput, sections: &dyn SectionProvider) -> CalcResult<Self> {
        input.validate()?;
        let shape = sections.section(&input.shape)?;
        shape.validate()?;

        if input.studs.length_in < input.deck.deck_height_in + 1.5 {
            warn!(
                "{}: {:.2} in studs extend less than 1.5 in above the {:.2} in deck ribs",
                input.name, input.studs.length_in, input.deck.deck_height_in
            );
        }
        for load in input.loads.iter().filter(|l| !l.is_full_span(input.span_ft)) {
            warn!(
                "{}: partial-span load '{}' ({:.2}..{:.2} ft) is applied at full intensity over the whole span",
                input.name, load.name, load.start_ft, load.end_ft
            );
        }

        let mut beam = CompositeSteelBeam {
            name: input.name,
            span_ft: input.span_ft,
            shape,
            shored: input.shored,
            layout: input.layout,
            studs: input.studs,
            deck: input.deck,
            steel: input.steel,
            concrete: input.concrete,
            loads: input.loads,
            factored_loads: BTreeMap::new(),
            fea: None,
        };

        for context in FactoringContext::ALL {
            let governing = find_governing_combination(&beam.intensities(context), context.combinations());
            debug!(
                "{}: {} governs at {:.4} klf ({})",
                beam.name, context, governing.value, governing.combination
            );
            beam.factored_loads.insert(context, governing);
        }

        Ok(beam)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn span_ft(&self) -> f64 {
        self.span_ft
    }

    pub fn shape(&self) -> &SteelShape {
        &self.shape
    }

    pub fn is_shored(&self) -> bool {
        self.shored
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn studs(&self) -> &StudConfig {
        &self.studs
    }

    pub fn deck(&self) -> &DeckConfig {
        &self.deck
    }

    pub fn steel(&self) -> &Steel {
        &self.steel
    }

    pub fn concrete(&self) -> &Concrete {
        &self.concrete
    }

    pub fn loads(&self) -> &[UniformLoad] {
        &self.loads
    }

    /// Input document that rebuilds this beam
    pub fn to_input(&self) -> CompositeBeamInput {
        CompositeBeamInput {
            name: self.name.clone(),
            span_ft: self.span_ft,
            shape: self.shape.label.clone(),
            shored: self.shored,
            layout: self.layout,
            studs: self.studs,
            deck: self.deck,
            steel: self.steel.clone(),
            concrete: self.concrete.clone(),
            loads: self.loads.clone(),
        }
    }

    /// Steel self-weight (klf)
    pub fn self_weight_klf(&self) -> f64 {
        KlF::from(PlF(self.shape.weight_plf)).value()
    }

    /// Unfactored intensity per load case for one context.
    ///
    /// Pre-composite contexts see only the construction cases, with the steel
    /// self-weight carried as construction dead load. Composite contexts see
    /// every other case; self-weight joins `D` and partition live load joins `L`.
    pub fn intensities(&self, context: FactoringContext) -> LoadIntensities {
        let mut w = LoadIntensities::new();
        if context.is_pre_composite() {
            w.add(LoadType::ConstructionDead, self.self_weight_klf());
            for load in self.loads.iter().filter(|l| l.load_type.is_construction()) {
                w.add(load.load_type, load.magnitude_klf);
            }
        } else {
            w.add(LoadType::Dead, self.self_weight_klf());
            for load in self.loads.iter().filter(|l| !l.load_type.is_construction()) {
                let case = match load.load_type {
                    LoadType::PartitionLive => LoadType::Live,
                    other => other,
                };
                w.add(case, load.magnitude_klf);
            }
        }
        w
    }

    /// Governing uniform intensity (klf) for a context
    pub fn factored_load(&self, context: FactoringContext) -> f64 {
        self.factored_loads.get(&context).map(|g| g.value).unwrap_or(0.0)
    }

    /// Governing value and combination name for a context
    pub fn governing(&self, context: FactoringContext) -> Option<&Governing> {
        self.factored_loads.get(&context)
    }

    pub fn factored_loads(&self) -> &BTreeMap<FactoringContext, Governing> {
        &self.factored_loads
    }

    // ========================
    // Frame analysis
    // ========================

    /// Build and solve the simply supported frame model.
    ///
    /// Each context's governing intensity is applied over the full span under
    /// a unit-factor combination named after the context, alongside one
    /// unfactored live load case for the deflection check. Any earlier model is
    /// discarded first, so a failed analysis leaves the beam unanalyzed.
    pub fn analyze(&mut self) -> CalcResult<()> {
        self.fea = None;

        let span_in = Inches::from(Feet(self.span_ft)).value();
        let mut model = FrameModel::new();
        model.add_node(NODE_I, Node::new(0.0, 0.0, 0.0))?;
        model.add_node(NODE_J, Node::new(span_in, 0.0, 0.0))?;
        model.add_material(STEEL, fea::Material::from_properties(&self.steel))?;
        model.add_section(
            SECTION,
            Section::new(self.shape.area_in2, self.shape.iy_in4, self.shape.ix_in4, self.shape.j_in4),
        )?;
        model.add_member(MEMBER, Member::new(NODE_I, NODE_J, STEEL, SECTION))?;
        model.add_support(NODE_I, Support::pinned_torsion())?;
        model.add_support(NODE_J, Support::pinned_torsion())?;

        for (context, governing) in &self.factored_loads {
            let w = KipPerIn::from(KlF(governing.value)).value();
            // Positive intensities act downward, against local y
            model.add_member_dist_load(
                MEMBER,
                DistributedLoad::new(-w, 0.0, span_in, LoadDirection::Fy, context.name()),
            )?;
            model.add_load_combo(LoadCombo::single(context.name(), context.name()))?;
        }

        let live = KipPerIn::from(KlF(self.live_load_klf())).value();
        model.add_member_dist_load(
            MEMBER,
            DistributedLoad::new(-live, 0.0, span_in, LoadDirection::Fy, LIVE_CASE),
        )?;
        model.add_load_combo(LoadCombo::single(LIVE_CASE, LIVE_CASE))?;

        model.analyze_linear()?;
        info!("{}: frame analysis complete ({} on {:.1} ft)", self.name, self.shape.label, self.span_ft);
        self.fea = Some(model);
        Ok(())
    }

    pub fn is_analyzed(&self) -> bool {
        self.fea.is_some()
    }

    fn model(&self, query: &str) -> CalcResult<&FrameModel> {
        self.fea.as_ref().ok_or_else(|| CalcError::not_analyzed(query))
    }

    fn position_in(&self, x_ft: f64) -> CalcResult<f64> {
        if !(x_ft.is_finite() && (0.0..=self.span_ft).contains(&x_ft)) {
            return Err(CalcError::invalid_input(
                "x_ft",
                x_ft.to_string(),
                format!("Position must lie within the {} ft span", self.span_ft),
            ));
        }
        Ok(Inches::from(Feet(x_ft)).value())
    }

    /// Bending moment (kip-ft, sagging positive) at `x_ft` from the left support
    pub fn moment_at(&self, context: FactoringContext, x_ft: f64) -> CalcResult<f64> {
        let model = self.model("moment_at")?;
        let m = model.member_moment_z(MEMBER, self.position_in(x_ft)?, context.name())?;
        Ok(KipFt::from(KipIn(m)).value())
    }

    /// Shear (kips) at `x_ft`
    pub fn shear_at(&self, context: FactoringContext, x_ft: f64) -> CalcResult<f64> {
        let model = self.model("shear_at")?;
        Ok(model.member_shear_y(MEMBER, self.position_in(x_ft)?, context.name())?)
    }

    /// Deflection (in, downward positive) at `x_ft`
    pub fn deflection_at(&self, context: FactoringContext, x_ft: f64) -> CalcResult<f64> {
        let model = self.model("deflection_at")?;
        Ok(-model.member_deflection_y(MEMBER, self.position_in(x_ft)?, context.name())?)
    }

    fn diagram(&self, context: FactoringContext, points: usize, quantity: Quantity, query: &str) -> CalcResult<ResultArray> {
        let model = self.model(query)?;
        let (x_in, raw) = model.member_diagram(MEMBER, context.name(), points, quantity)?;
        let x = x_in.into_iter().map(|x| Feet::from(Inches(x)).value()).collect();
        let values = match quantity {
            Quantity::Moment => raw.into_iter().map(|m| KipFt::from(KipIn(m)).value()).collect(),
            Quantity::Shear => raw,
            Quantity::Deflection => raw.into_iter().map(|v| -v).collect(),
        };
        ResultArray::new(x, values)
    }

    /// Moment diagram (ft, kip-ft) at `points` evenly spaced stations
    pub fn moment_diagram(&self, context: FactoringContext, points: usize) -> CalcResult<ResultArray> {
        self.diagram(context, points, Quantity::Moment, "moment_diagram")
    }

    pub fn shear_diagram(&self, context: FactoringContext, points: usize) -> CalcResult<ResultArray> {
        self.diagram(context, points, Quantity::Shear, "shear_diagram")
    }

    pub fn deflection_diagram(&self, context: FactoringContext, points: usize) -> CalcResult<ResultArray> {
        self.diagram(context, points, Quantity::Deflection, "deflection_diagram")
    }

    fn peak(&self, context: FactoringContext, quantity: Quantity, query: &str) -> CalcResult<f64> {
        let diagram = self.diagram(context, DEFAULT_DIAGRAM_POINTS, quantity, query)?;
        Ok(diagram.abs_max().map(|(_, v)| v).unwrap_or(0.0))
    }

    /// Moment of greatest magnitude along the span (kip-ft, sign kept)
    pub fn max_moment(&self, context: FactoringContext) -> CalcResult<f64> {
        self.peak(context, Quantity::Moment, "max_moment")
    }

    /// Shear of greatest magnitude along the span (kips, sign kept)
    pub fn max_shear(&self, context: FactoringContext) -> CalcResult<f64> {
        self.peak(context, Quantity::Shear, "max_shear")
    }

    /// Deflection of greatest magnitude along the span (in, downward positive)
    pub fn max_deflection(&self, context: FactoringContext) -> CalcResult<f64> {
        self.peak(context, Quantity::Deflection, "max_deflection")
    }

    /// Peak live load deflection of the composite section (in, downward positive).
    ///
    /// The frame model carries the bare steel, so its live load deflection is
    /// scaled by Ix / Ilb.
    pub fn live_load_deflection(&self) -> CalcResult<f64> {
        let model = self.model("live_load_deflection")?;
        let (x, raw) = model.member_diagram(MEMBER, LIVE_CASE, DEFAULT_DIAGRAM_POINTS, Quantity::Deflection)?;
        let diagram = ResultArray::new(x, raw.into_iter().map(|v| -v).collect())?;
        let steel_deflection = diagram.abs_max().map(|(_, v)| v).unwrap_or(0.0);
        Ok(steel_deflection * self.shape.ix_in4 / self.lower_bound_inertia()?)
    }

    /// Moment envelope over the four contexts
    pub fn moment_envelope(&self, points: usize) -> CalcResult<MomentEnvelope> {
        let diagrams = FactoringContext::ALL
            .iter()
            .map(|ctx| Ok((ctx.name().to_string(), self.moment_diagram(*ctx, points)?)))
            .collect::<CalcResult<BTreeMap<String, ResultArray>>>()?;
        Ok(MomentEnvelope {
            max: envelope_max(&diagrams)?,
            min: envelope_min(&diagrams)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::builtin_w_shapes;
    use approx::assert_relative_eq;

    fn loaded_input() -> CompositeBeamInput {
        CompositeBeamInput {
            loads: vec![
                UniformLoad::full_span("Dead", LoadType::Dead, 0.5, 30.0),
                UniformLoad::full_span("Wet concrete", LoadType::ConstructionDead, 0.5, 30.0),
                UniformLoad::full_span("Live", LoadType::Live, 1.3, 30.0),
                UniformLoad::full_span("Construction live", LoadType::ConstructionLive, 0.2, 30.0),
            ],
            ..CompositeBeamInput::reference()
        }
    }

    fn beam() -> CompositeSteelBeam {
        CompositeSteelBeam::new(loaded_input(), &builtin_w_shapes()).unwrap()
    }

    #[test]
    fn test_factored_loads() {
        let beam = beam();
        // Self-weight 26 plf joins the dead cases
        assert_relative_eq!(beam.factored_load(FactoringContext::PreCompositeFactored), 0.9512, epsilon = 1e-9);
        assert_relative_eq!(beam.factored_load(FactoringContext::PreCompositeService), 0.726, epsilon = 1e-9);
        assert_relative_eq!(beam.factored_load(FactoringContext::CompositeFactored), 2.7112, epsilon = 1e-9);
        assert_relative_eq!(beam.factored_load(FactoringContext::CompositeService), 1.826, epsilon = 1e-9);
        assert_eq!(beam.factored_loads().len(), 4);
    }

    #[test]
    fn test_zero_loads_leave_self_weight() {
        let beam = CompositeSteelBeam::new(CompositeBeamInput::reference(), &builtin_w_shapes()).unwrap();
        assert_relative_eq!(beam.factored_load(FactoringContext::PreCompositeFactored), 1.4 * 0.026, epsilon = 1e-12);
        assert_relative_eq!(beam.factored_load(FactoringContext::PreCompositeService), 0.026, epsilon = 1e-12);
        assert_relative_eq!(beam.factored_load(FactoringContext::CompositeFactored), 1.4 * 0.026, epsilon = 1e-12);
        assert_relative_eq!(beam.factored_load(FactoringContext::CompositeService), 0.026, epsilon = 1e-12);
    }

    #[test]
    fn test_partition_live_joins_live() {
        let mut input = loaded_input();
        input.loads.push(UniformLoad::full_span("Partitions", LoadType::PartitionLive, 0.15, 30.0));
        let beam = CompositeSteelBeam::new(input, &builtin_w_shapes()).unwrap();

        let w = beam.intensities(FactoringContext::CompositeFactored);
        assert_relative_eq!(w.get(LoadType::Live), 1.45, epsilon = 1e-12);
        assert_eq!(w.get(LoadType::PartitionLive), 0.0);
        assert_eq!(beam.intensities(FactoringContext::PreCompositeFactored).get(LoadType::Live), 0.0);
    }

    #[test]
    fn test_construction_cases_stay_out_of_composite_stage() {
        let beam = beam();
        let composite = beam.intensities(FactoringContext::CompositeService);
        assert!(!composite.has(LoadType::ConstructionDead));
        assert!(!composite.has(LoadType::ConstructionLive));

        let pre = beam.intensities(FactoringContext::PreCompositeService);
        assert!(!pre.has(LoadType::Dead));
        assert_relative_eq!(pre.get(LoadType::ConstructionDead), 0.526, epsilon = 1e-12);
    }

    #[test]
    fn test_queries_require_analysis() {
        let beam = beam();
        assert!(!beam.is_analyzed());
        let err = beam.max_moment(FactoringContext::CompositeFactored).unwrap_err();
        assert_eq!(err.error_code(), "NOT_ANALYZED");
        assert!(err.to_string().contains("max_moment"));
        assert_eq!(
            beam.moment_at(FactoringContext::CompositeFactored, 15.0).unwrap_err().error_code(),
            "NOT_ANALYZED"
        );
        assert!(beam.moment_envelope(11).is_err());
        assert!(beam.shear_diagram(FactoringContext::CompositeFactored, 11).is_err());
        assert!(beam.deflection_diagram(FactoringContext::CompositeService, 11).is_err());
        assert_eq!(beam.live_load_deflection().unwrap_err().error_code(), "NOT_ANALYZED");
    }

    #[test]
    fn test_analyze_demands() {
        let mut beam = beam();
        beam.analyze().unwrap();
        assert!(beam.is_analyzed());

        let wu = 2.7112;
        let mu = beam.max_moment(FactoringContext::CompositeFactored).unwrap();
        assert_relative_eq!(mu, wu * 30.0 * 30.0 / 8.0, max_relative = 1e-9);

        let vu = beam.max_shear(FactoringContext::CompositeFactored).unwrap();
        assert_relative_eq!(vu.abs(), wu * 30.0 / 2.0, max_relative = 1e-9);

        // 5wL⁴/384EI with w in kip/in and L in inches
        let w = 1.826 / 12.0;
        let expected = 5.0 * w * 360.0_f64.powi(4) / (384.0 * 29000.0 * 301.0);
        let delta = beam.max_deflection(FactoringContext::CompositeService).unwrap();
        assert_relative_eq!(delta, expected, max_relative = 1e-9);
        assert_relative_eq!(
            beam.deflection_at(FactoringContext::CompositeService, 15.0).unwrap(),
            expected,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_position_outside_span() {
        let mut beam = beam();
        beam.analyze().unwrap();
        let err = beam.moment_at(FactoringContext::CompositeFactored, 31.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(beam.shear_at(FactoringContext::CompositeFactored, -0.1).is_err());
    }

    #[test]
    fn test_moment_envelope() {
        let mut beam = beam();
        beam.analyze().unwrap();
        let envelope = beam.moment_envelope(7).unwrap();
        assert_eq!(envelope.max.len(), 7);

        // Composite factored governs everywhere, pre-composite service is the least
        let factored = beam.moment_diagram(FactoringContext::CompositeFactored, 7).unwrap();
        let service = beam.moment_diagram(FactoringContext::PreCompositeService, 7).unwrap();
        for i in 1..6 {
            assert_relative_eq!(envelope.max.values[i], factored.values[i], max_relative = 1e-12);
            assert_relative_eq!(envelope.min.values[i], service.values[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_shear_and_deflection_diagrams() {
        let mut beam = beam();
        beam.analyze().unwrap();

        let wu = 2.7112;
        let shear = beam.shear_diagram(FactoringContext::CompositeFactored, 11).unwrap();
        assert_eq!(shear.len(), 11);
        assert_relative_eq!(shear.x[10], 30.0, epsilon = 1e-12);
        // Reaction acts up at the left support and the right end mirrors it
        assert_relative_eq!(shear.values[0], wu * 15.0, max_relative = 1e-9);
        assert_relative_eq!(shear.values[10], -wu * 15.0, max_relative = 1e-9);
        assert!(shear.values[5].abs() < 1e-9);

        let deflection = beam.deflection_diagram(FactoringContext::CompositeService, 11).unwrap();
        assert!(deflection.values[0].abs() < 1e-9);
        assert!(deflection.values[10].abs() < 1e-9);
        assert!(deflection.values[5] > deflection.values[2] && deflection.values[2] > 0.0);
        assert_relative_eq!(
            deflection.values[5],
            beam.max_deflection(FactoringContext::CompositeService).unwrap(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_reanalysis_replaces_model() {
        let mut beam = beam();
        beam.analyze().unwrap();
        let first = beam.max_moment(FactoringContext::CompositeFactored).unwrap();
        beam.analyze().unwrap();
        assert_eq!(beam.max_moment(FactoringContext::CompositeFactored).unwrap(), first);
    }

    #[test]
    fn test_unknown_shape() {
        let input = CompositeBeamInput {
            shape: "W99X999".to_string(),
            ..CompositeBeamInput::reference()
        };
        let err = CompositeSteelBeam::new(input, &builtin_w_shapes()).unwrap_err();
        assert_eq!(err.error_code(), "SHAPE_NOT_FOUND");
    }

    #[test]
    fn test_configuration_errors() {
        let db = builtin_w_shapes();

        let mut input = CompositeBeamInput::reference();
        input.span_ft = 0.0;
        assert_eq!(CompositeSteelBeam::new(input, &db).unwrap_err().error_code(), "INVALID_INPUT");

        let mut input = CompositeBeamInput::reference();
        input.deck.t_s_in = -1.0;
        assert!(CompositeSteelBeam::new(input, &db).is_err());

        let mut input = CompositeBeamInput::reference();
        input.studs.min_composite_ratio = 0.8;
        input.studs.max_composite_ratio = 0.5;
        assert!(CompositeSteelBeam::new(input, &db).is_err());

        let mut input = CompositeBeamInput::reference();
        input.loads.push(UniformLoad::new("Beyond", LoadType::Live, 1.0, 0.0, 40.0));
        assert!(CompositeSteelBeam::new(input, &db).is_err());
    }

    #[test]
    fn test_orientation_parsing() {
        assert_eq!(DeckOrientation::try_from(90.0).unwrap(), DeckOrientation::Perpendicular);
        assert_eq!(DeckOrientation::try_from(0.0).unwrap(), DeckOrientation::Parallel);
        assert_eq!(DeckOrientation::try_from(45.0).unwrap_err().error_code(), "INVALID_INPUT");

        let deck: DeckConfig = serde_json::from_str(r#"{ "t_s_in": 3.5, "deck_height_in": 3.0, "orientation": 90 }"#).unwrap();
        assert_eq!(deck.orientation, DeckOrientation::Perpendicular);
        assert!(serde_json::from_str::<DeckConfig>(r#"{ "t_s_in": 3.5, "deck_height_in": 3.0, "orientation": 30 }"#).is_err());
    }

    #[test]
    fn test_condition_parsing() {
        assert_eq!("Beam".parse::<NeighborCondition>().unwrap(), NeighborCondition::Beam);
        assert_eq!("edge".parse::<NeighborCondition>().unwrap(), NeighborCondition::Edge);
        assert_eq!("Wall".parse::<NeighborCondition>().unwrap_err().error_code(), "INVALID_INPUT");
        assert!(serde_json::from_str::<TributarySide>(r#"{ "condition": "Column", "distance_ft": 8.0 }"#).is_err());
    }

    #[test]
    fn test_input_json_roundtrip() {
        let input = loaded_input();
        let json = serde_json::to_string_pretty(&input).unwrap();
        assert!(json.contains("\"orientation\": 90.0"));
        let parsed: CompositeBeamInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, input);

        let beam = CompositeSteelBeam::new(parsed, &builtin_w_shapes()).unwrap();
        assert_eq!(beam.to_input(), input);
    }

    #[test]
    fn test_stud_defaults() {
        let studs: StudConfig = serde_json::from_str(r#"{ "fu_ksi": 65.0, "diameter_in": 0.75, "length_in": 5.0 }"#).unwrap();
        assert_eq!(studs.min_composite_ratio, 0.25);
        assert_eq!(studs.max_composite_ratio, 1.0);
        assert_relative_eq!(studs.area_in2(), 0.441786, epsilon = 1e-6);
    }
}
