//! # Frame Analysis
//!
//! A small 3D frame solver (direct stiffness method, 12-DOF members) used to
//! compute moment, shear and deflection along a beam. Uniform member loads may
//! cover part of a member; fixed-end reactions are integrated numerically from
//! the Hermite shape functions.
//!
//! ## Example
//!
//! ```
//! use compbeam_core::fea::*;
//!
//! let mut model = FrameModel::new();
//! model.add_node("N1", Node::new(0.0, 0.0, 0.0)).unwrap();
//! model.add_node("N2", Node::new(240.0, 0.0, 0.0)).unwrap();
//! model.add_material("Steel", Material::new(29000.0, 11200.0, 0.3, 0.0)).unwrap();
//! model.add_section("W", Section::new(7.68, 9.59, 301.0, 0.262)).unwrap();
//! model.add_member("M1", Member::new("N1", "N2", "Steel", "W")).unwrap();
//! model.add_support("N1", Support::pinned_torsion()).unwrap();
//! model.add_support("N2", Support::pinned_torsion()).unwrap();
//! model.add_member_dist_load("M1", DistributedLoad::downward(0.1, 0.0, 240.0, "D")).unwrap();
//! model.add_load_combo(LoadCombo::single("1.0D", "D")).unwrap();
//! model.analyze_linear().unwrap();
//!
//! // wL²/8
//! let m = model.member_moment_z("M1", 120.0, "1.0D").unwrap();
//! assert!((m - 720.0).abs() < 1e-6);
//! ```

pub mod elements;
pub mod error;
pub mod math;
pub mod model;

pub use elements::{DistributedLoad, LoadCombo, LoadDirection, Material, Member, Node, Section, Support};
pub use error::{FeaError, FeaResult};
pub use model::{FrameModel, Quantity};
