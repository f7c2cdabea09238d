//! # Composite Beam Calculations
//!
//! Each beam follows the same flow:
//!
//! - [`CompositeBeamInput`] - JSON-serializable description of the beam
//! - [`CompositeSteelBeam::new`] - validate, resolve the shape, factor loads
//! - [`CompositeSteelBeam::analyze`] - frame analysis for the demands
//! - [`CompositeSteelBeam::design_summary`] - capacities against demands
//!
//! ## Modules
//!
//! - [`composite_beam`] - configuration types, the beam entity and its demands
//! - [`flexure`] - effective width, stress block, compactness, bare steel and stud strength
//! - [`design`] - summary and timestamped report

pub mod composite_beam;
pub mod design;
pub mod flexure;

pub use composite_beam::{
    CompositeBeamInput, CompositeSteelBeam, DeckConfig, DeckOrientation, Layout, MomentEnvelope,
    NeighborCondition, StudConfig, TributarySide,
};
pub use design::{DesignReport, DesignSummary, StageCheck, StudSummary};
pub use flexure::PHI_B;
