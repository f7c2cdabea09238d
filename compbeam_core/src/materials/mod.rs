//! # Materials
//!
//! Immutable material records for the two halves of a composite section,
//! plus the AISC section-property table that resolves shape labels.
//!
//! - [`Steel`] - structural steel grade (E, G, Fy, Fu)
//! - [`Concrete`] - slab concrete with ACI-derived modulus Ec
//! - [`SteelShapeDb`] - W-shape properties keyed by AISC label
//!
//! Both material types implement [`Material`], the capability the
//! finite-element adapter needs (E, G, density, Poisson ratio).
//!
//! ## Example
//!
//! ```rust
//! use compbeam_core::materials::{Concrete, Material, Steel};
//!
//! let steel = Steel::default();
//! let concrete = Concrete::default();
//!
//! let n = steel.elastic_modulus_ksi() / concrete.elastic_modulus_ksi();
//! assert!(n > 7.0 && n < 8.0);
//! ```

pub mod concrete;
pub mod steel;

pub use concrete::{Concrete, ConcreteProps};
pub use steel::{builtin_w_shapes, SectionProvider, ShapeType, Steel, SteelProps, SteelShape, SteelShapeDb};

use crate::errors::{CalcError, CalcResult};

/// Reject any value that is not a positive, finite number
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a positive, finite number",
        ));
    }
    Ok(())
}

/// Poisson's ratio must lie in [0, 0.5)
pub(crate) fn require_poisson_ratio(field: &str, value: f64) -> CalcResult<()> {
    if !(0.0..0.5).contains(&value) {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Poisson's ratio must lie in [0, 0.5)",
        ));
    }
    Ok(())
}

/// Elastic material capability shared by steel and concrete.
///
/// Units are ksi for moduli and lb/ft³ (pcf) for density.
pub trait Material {
    /// Display name of the material
    fn name(&self) -> &str;

    /// Modulus of elasticity (ksi)
    fn elastic_modulus_ksi(&self) -> f64;

    /// Shear modulus (ksi)
    fn shear_modulus_ksi(&self) -> f64;

    /// Unit weight (pcf)
    fn density_pcf(&self) -> f64;

    /// Poisson's ratio
    fn poisson_ratio(&self) -> f64;
}
