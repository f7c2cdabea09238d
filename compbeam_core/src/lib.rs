//! # compbeam_core - Composite Steel Beam Design Engine
//!
//! Checks a simply supported steel beam acting compositely with a concrete
//! slab on metal deck, for both the construction stage (bare steel, wet
//! concrete) and the final composite stage. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Quick Start
//!
//! ```rust
//! use compbeam_core::calculations::{CompositeBeamInput, CompositeSteelBeam};
//! use compbeam_core::loads::{LoadType, UniformLoad};
//! use compbeam_core::materials::builtin_w_shapes;
//!
//! let input = CompositeBeamInput {
//!     loads: vec![
//!         UniformLoad::full_span("Dead", LoadType::Dead, 0.5, 30.0),
//!         UniformLoad::full_span("Wet concrete", LoadType::ConstructionDead, 0.5, 30.0),
//!         UniformLoad::full_span("Live", LoadType::Live, 1.3, 30.0),
//!         UniformLoad::full_span("Construction live", LoadType::ConstructionLive, 0.2, 30.0),
//!     ],
//!     ..CompositeBeamInput::reference()
//! };
//!
//! let mut beam = CompositeSteelBeam::new(input, &builtin_w_shapes()).unwrap();
//! beam.analyze().unwrap();
//!
//! let summary = beam.design_summary().unwrap();
//! assert!(summary.composite.unity < 1.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - the composite beam, its capacities and design summary
//! - [`loads`] - load cases, ASCE 7 combinations and envelopes
//! - [`materials`] - steel, concrete and the W-shape table
//! - [`fea`] - linear frame solver used for demands
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types
//! - [`file_io`] - input documents and atomic report saves

pub mod calculations;
pub mod errors;
pub mod fea;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CompositeBeamInput, CompositeSteelBeam, DesignReport, DesignSummary};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_input, save_report};
