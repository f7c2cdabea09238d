//! Slab concrete per ACI 318-19.
//!
//! The modulus of elasticity is derived once at construction from unit weight
//! and strength (ACI 318-19 Eq. 19.2.2.1.a) and cannot drift afterwards:
//! fields are private and deserialization goes through the same validating
//! constructor.

use serde::{Deserialize, Serialize};

use super::{require_poisson_ratio, require_positive, Material};
use crate::errors::{CalcError, CalcResult};

/// Lightweight modification factor (lambda) for lightweight concrete
pub const LIGHTWEIGHT_FACTOR: f64 = 0.75;

/// Concrete material.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Concrete", "fc_ksi": 4.0, "density_pcf": 145.0, "lightweight": false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConcreteProps", into = "ConcreteProps")]
pub struct Concrete {
    name: String,
    fc_ksi: f64,
    fy_ksi: f64,
    fyt_ksi: f64,
    lw_mod_factor: f64,
    poisson_ratio: f64,
    density_pcf: f64,
    ec_ksi: f64,
}

/// Serialized form of [`Concrete`]; `Ec` is always recomputed, never read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcreteProps {
    /// Display name
    pub name: String,
    /// Specified compressive strength f'c (ksi)
    pub fc_ksi: f64,
    /// Longitudinal reinforcement yield strength (ksi)
    pub fy_ksi: f64,
    /// Transverse reinforcement yield strength (ksi)
    pub fyt_ksi: f64,
    /// Lightweight concrete flag (lambda = 0.75 when set)
    pub lightweight: bool,
    /// Poisson's ratio
    pub poisson_ratio: f64,
    /// Unit weight (pcf)
    pub density_pcf: f64,
}

impl Default for ConcreteProps {
    fn default() -> Self {
        ConcreteProps {
            name: "Concrete".to_string(),
            fc_ksi: 4.0,
            fy_ksi: 60.0,
            fyt_ksi: 60.0,
            lightweight: false,
            poisson_ratio: 0.2,
            density_pcf: 150.0,
        }
    }
}

impl Concrete {
    /// Create a concrete material, validating strengths and density.
    pub fn new(props: ConcreteProps) -> CalcResult<Self> {
        let checks = [
            ("concrete.fc_ksi", props.fc_ksi),
            ("concrete.density_pcf", props.density_pcf),
            ("concrete.fy_ksi", props.fy_ksi),
            ("concrete.fyt_ksi", props.fyt_ksi),
        ];
        for (field, value) in checks {
            require_positive(field, value)?;
        }
        require_poisson_ratio("concrete.poisson_ratio", props.poisson_ratio)?;

        let ec_ksi = modulus_of_elasticity_ksi(props.density_pcf, props.fc_ksi);
        Ok(Concrete {
            name: props.name,
            fc_ksi: props.fc_ksi,
            fy_ksi: props.fy_ksi,
            fyt_ksi: props.fyt_ksi,
            lw_mod_factor: if props.lightweight { LIGHTWEIGHT_FACTOR } else { 1.0 },
            poisson_ratio: props.poisson_ratio,
            density_pcf: props.density_pcf,
            ec_ksi,
        })
    }

    /// Normal-weight concrete with the given strength and unit weight
    pub fn normal_weight(fc_ksi: f64, density_pcf: f64) -> CalcResult<Self> {
        Concrete::new(ConcreteProps {
            fc_ksi,
            density_pcf,
            ..ConcreteProps::default()
        })
    }

    /// Specified compressive strength f'c (ksi)
    pub fn fc_ksi(&self) -> f64 {
        self.fc_ksi
    }

    /// Longitudinal reinforcement yield (ksi)
    pub fn fy_ksi(&self) -> f64 {
        self.fy_ksi
    }

    /// Transverse reinforcement yield (ksi)
    pub fn fyt_ksi(&self) -> f64 {
        self.fyt_ksi
    }

    /// Lightweight modification factor lambda
    pub fn lw_mod_factor(&self) -> f64 {
        self.lw_mod_factor
    }

    /// Whether this is lightweight concrete
    pub fn is_lightweight(&self) -> bool {
        self.lw_mod_factor < 1.0
    }

    /// Modulus of elasticity Ec (ksi)
    pub fn ec_ksi(&self) -> f64 {
        self.ec_ksi
    }
}

impl Default for Concrete {
    fn default() -> Self {
        let props = ConcreteProps::default();
        Concrete {
            ec_ksi: modulus_of_elasticity_ksi(props.density_pcf, props.fc_ksi),
            name: props.name,
            fc_ksi: props.fc_ksi,
            fy_ksi: props.fy_ksi,
            fyt_ksi: props.fyt_ksi,
            lw_mod_factor: 1.0,
            poisson_ratio: props.poisson_ratio,
            density_pcf: props.density_pcf,
        }
    }
}

impl TryFrom<ConcreteProps> for Concrete {
    type Error = CalcError;

    fn try_from(props: ConcreteProps) -> CalcResult<Self> {
        Concrete::new(props)
    }
}

impl From<Concrete> for ConcreteProps {
    fn from(c: Concrete) -> Self {
        ConcreteProps {
            lightweight: c.is_lightweight(),
            name: c.name,
            fc_ksi: c.fc_ksi,
            fy_ksi: c.fy_ksi,
            fyt_ksi: c.fyt_ksi,
            poisson_ratio: c.poisson_ratio,
            density_pcf: c.density_pcf,
        }
    }
}

impl Material for Concrete {
    fn name(&self) -> &str {
        &self.name
    }

    fn elastic_modulus_ksi(&self) -> f64 {
        self.ec_ksi
    }

    fn shear_modulus_ksi(&self) -> f64 {
        self.ec_ksi / (2.0 * (1.0 + self.poisson_ratio))
    }

    fn density_pcf(&self) -> f64 {
        self.density_pcf
    }

    fn poisson_ratio(&self) -> f64 {
        self.poisson_ratio
    }
}

/// Ec = wc^1.5 * 33 * sqrt(f'c in psi), returned in ksi.
pub fn modulus_of_elasticity_ksi(density_pcf: f64, fc_ksi: f64) -> f64 {
    density_pcf.powf(1.5) * 33.0 * (fc_ksi * 1000.0).sqrt() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ec_normal_weight() {
        let concrete = Concrete::normal_weight(4.0, 150.0).unwrap();
        assert_relative_eq!(concrete.ec_ksi(), 3834.25, max_relative = 0.1);
        // Exact value of the ACI expression
        assert_relative_eq!(concrete.ec_ksi(), 3834.254, max_relative = 1e-4);
    }

    #[test]
    fn test_lightweight_factor() {
        let lw = Concrete::new(ConcreteProps {
            lightweight: true,
            density_pcf: 115.0,
            ..ConcreteProps::default()
        })
        .unwrap();
        assert_eq!(lw.lw_mod_factor(), 0.75);
        assert!(lw.is_lightweight());
        assert_eq!(Concrete::default().lw_mod_factor(), 1.0);
    }

    #[test]
    fn test_rejects_non_positive_strength() {
        let err = Concrete::normal_weight(0.0, 150.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(Concrete::normal_weight(4.0, -1.0).is_err());
        assert!(Concrete::normal_weight(f64::NAN, 150.0).is_err());
    }

    #[test]
    fn test_rejects_invalid_reinforcement_and_poisson() {
        let with = |props: ConcreteProps| Concrete::new(props).map(|_| ()).map_err(|e| e.error_code());

        assert_eq!(with(ConcreteProps { fy_ksi: f64::NAN, ..ConcreteProps::default() }), Err("INVALID_INPUT"));
        assert!(with(ConcreteProps { fyt_ksi: f64::INFINITY, ..ConcreteProps::default() }).is_err());
        assert!(with(ConcreteProps { poisson_ratio: 0.5, ..ConcreteProps::default() }).is_err());
        assert!(with(ConcreteProps { poisson_ratio: -0.2, ..ConcreteProps::default() }).is_err());
        assert!(with(ConcreteProps { poisson_ratio: f64::NAN, ..ConcreteProps::default() }).is_err());
        assert!(with(ConcreteProps { poisson_ratio: 0.0, ..ConcreteProps::default() }).is_ok());

        let json = r#"{ "fc_ksi": 4.0, "poisson_ratio": 0.6 }"#;
        assert!(serde_json::from_str::<Concrete>(json).is_err());
    }

    #[test]
    fn test_deserialize_recomputes_ec() {
        let json = r#"{ "fc_ksi": 4.0, "density_pcf": 145.0 }"#;
        let concrete: Concrete = serde_json::from_str(json).unwrap();
        assert_relative_eq!(
            concrete.ec_ksi(),
            modulus_of_elasticity_ksi(145.0, 4.0),
            max_relative = 1e-12
        );
        assert_eq!(concrete.fy_ksi(), 60.0);
        assert_eq!(concrete.fyt_ksi(), 60.0);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let json = r#"{ "fc_ksi": -4.0 }"#;
        assert!(serde_json::from_str::<Concrete>(json).is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let concrete = Concrete::normal_weight(5.0, 145.0).unwrap();
        let json = serde_json::to_string(&concrete).unwrap();
        let parsed: Concrete = serde_json::from_str(&json).unwrap();
        assert_eq!(concrete, parsed);
    }

    #[test]
    fn test_shear_modulus() {
        let concrete = Concrete::default();
        assert_relative_eq!(
            concrete.shear_modulus_ksi(),
            concrete.ec_ksi() / 2.4,
            max_relative = 1e-12
        );
    }
}
