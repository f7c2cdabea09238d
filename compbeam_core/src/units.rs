//! # Unit Types
//!
//! Type-safe wrappers for the handful of US customary units the composite
//! beam calculations move between. Inputs arrive in the units an engineer
//! writes on a framing plan (ft, klf, ksi, pcf); the mechanics run in
//! inches and kips; moments are reported in kip-ft.
//!
//! ## Example
//!
//! ```rust
//! use compbeam_core::units::{Feet, Inches, KipFt, KipIn};
//!
//! let width: Inches = Feet(7.5).into();
//! assert_eq!(width.0, 90.0);
//!
//! let m: KipFt = KipIn(1200.0).into();
//! assert_eq!(m.0, 100.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Cubic inches per cubic foot
pub const IN3_PER_FT3: f64 = 1728.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kip-feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipFt(pub f64);

/// Moment in kip-inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipIn(pub f64);

impl From<KipFt> for KipIn {
    fn from(kipft: KipFt) -> Self {
        KipIn(kipft.0 * 12.0)
    }
}

impl From<KipIn> for KipFt {
    fn from(kipin: KipIn) -> Self {
        KipFt(kipin.0 / 12.0)
    }
}

// ============================================================================
// Distributed Load Units
// ============================================================================

/// Distributed load in pounds per linear foot (plf)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlF(pub f64);

/// Distributed load in kips per linear foot (klf)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KlF(pub f64);

/// Distributed load in kips per linear inch
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipPerIn(pub f64);

impl From<PlF> for KlF {
    fn from(plf: PlF) -> Self {
        KlF(plf.0 / 1000.0)
    }
}

impl From<KlF> for PlF {
    fn from(klf: KlF) -> Self {
        PlF(klf.0 * 1000.0)
    }
}

impl From<KlF> for KipPerIn {
    fn from(klf: KlF) -> Self {
        KipPerIn(klf.0 / 12.0)
    }
}

// ============================================================================
// Density Units
// ============================================================================

/// Density in pounds per cubic foot
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pcf(pub f64);

/// Density in kips per cubic inch (consistent with ksi and inches)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KipPerIn3(pub f64);

impl From<Pcf> for KipPerIn3 {
    fn from(pcf: Pcf) -> Self {
        KipPerIn3(pcf.0 / 1000.0 / IN3_PER_FT3)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(KipFt);
impl_arithmetic!(KipIn);
impl_arithmetic!(PlF);
impl_arithmetic!(KlF);
impl_arithmetic!(KipPerIn);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_to_inches() {
        let inches: Inches = Feet(7.5).into();
        assert_eq!(inches.0, 90.0);
        let back: Feet = inches.into();
        assert_eq!(back.0, 7.5);
    }

    #[test]
    fn test_self_weight_plf_to_klf() {
        let klf: KlF = PlF(26.0).into();
        assert!((klf.0 - 0.026).abs() < 1e-12);
    }

    #[test]
    fn test_klf_to_kip_per_inch() {
        let w: KipPerIn = KlF(1.2).into();
        assert!((w.0 - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_density_conversion() {
        let rho: KipPerIn3 = Pcf(1728.0).into();
        assert!((rho.0 - 0.001).abs() < 1e-15);
    }

    #[test]
    fn test_arithmetic() {
        let a = KipFt(10.0);
        let b = KipFt(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).value(), 20.0);
        assert_eq!((a / 2.0).value(), 5.0);
    }
}
