//! Model building blocks: nodes, supports, materials, sections, members,
//! member loads and load combinations.
//!
//! Units are whatever the caller uses consistently; the composite beam
//! builds its model in kips and inches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::materials::Material as MaterialProperties;
use crate::units::{KipPerIn3, Pcf};

/// A node in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Node {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Node { x, y, z }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2) + (other.z - self.z).powi(2)).sqrt()
    }
}

/// Support conditions at a node; `true` restrains the DOF
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Support {
    pub dx: bool,
    pub dy: bool,
    pub dz: bool,
    pub rx: bool,
    pub ry: bool,
    pub rz: bool,
}

impl Support {
    /// All six DOFs restrained
    pub fn fixed() -> Self {
        Support::with_restraints(true, true, true, true, true, true)
    }

    /// Translations restrained, rotations free
    pub fn pinned() -> Self {
        Support::with_restraints(true, true, true, false, false, false)
    }

    /// Translations and torsion restrained; bending rotations free
    pub fn pinned_torsion() -> Self {
        Support::with_restraints(true, true, true, true, false, false)
    }

    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Support { dx, dy, dz, rx, ry, rz }
    }

    pub fn as_array(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    pub fn is_supported(&self) -> bool {
        self.as_array().iter().any(|r| *r)
    }
}

/// Linear-elastic isotropic material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Mass density
    pub rho: f64,
}

impl Material {
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Material { e, g, nu, rho }
    }

    /// From a design material record, in ksi and kip/in³.
    pub fn from_properties(props: &dyn MaterialProperties) -> Self {
        let rho: KipPerIn3 = Pcf(props.density_pcf()).into();
        Material::new(
            props.elastic_modulus_ksi(),
            props.shear_modulus_ksi(),
            props.poisson_ratio(),
            rho.0,
        )
    }
}

/// Cross-section stiffness properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Area
    pub a: f64,
    /// Moment of inertia about local y (weak axis for a horizontal beam)
    pub iy: f64,
    /// Moment of inertia about local z (strong axis for a horizontal beam)
    pub iz: f64,
    /// Torsional constant
    pub j: f64,
}

impl Section {
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Section { a, iy, iz, j }
    }
}

/// A two-node frame member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub i_node: String,
    pub j_node: String,
    pub material: String,
    pub section: String,

    #[serde(skip)]
    pub(crate) length: Option<f64>,

    /// Local end forces by combination
    /// [Fx_i, Fy_i, Fz_i, Mx_i, My_i, Mz_i, Fx_j, Fy_j, Fz_j, Mx_j, My_j, Mz_j]
    #[serde(skip)]
    pub(crate) local_forces: HashMap<String, [f64; 12]>,

    /// Local end displacements by combination
    #[serde(skip)]
    pub(crate) local_displacements: HashMap<String, [f64; 12]>,
}

impl Member {
    pub fn new(i_node: &str, j_node: &str, material: &str, section: &str) -> Self {
        Member {
            i_node: i_node.to_string(),
            j_node: j_node.to_string(),
            material: material.to_string(),
            section: section.to_string(),
            length: None,
            local_forces: HashMap::new(),
            local_displacements: HashMap::new(),
        }
    }

    /// Length, available once the model has been prepared for analysis
    pub fn length(&self) -> Option<f64> {
        self.length
    }
}

/// Direction of a member load in member-local axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDirection {
    /// Along the member axis
    Fx,
    /// Local y (transverse, "up" for a horizontal member)
    Fy,
    /// Local z (transverse, out of plane)
    Fz,
}

impl LoadDirection {
    pub(crate) fn index(&self) -> usize {
        match self {
            LoadDirection::Fx => 0,
            LoadDirection::Fy => 1,
            LoadDirection::Fz => 2,
        }
    }
}

/// Uniformly distributed member load over `[x1, x2]` (distances from the i-node)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Intensity, signed along `direction`
    pub w: f64,
    pub x1: f64,
    pub x2: f64,
    pub direction: LoadDirection,
    /// Load case name
    pub case: String,
}

impl DistributedLoad {
    pub fn new(w: f64, x1: f64, x2: f64, direction: LoadDirection, case: &str) -> Self {
        DistributedLoad {
            w,
            x1,
            x2,
            direction,
            case: case.to_string(),
        }
    }

    /// Gravity load acting in local -y over `[x1, x2]`
    pub fn downward(w: f64, x1: f64, x2: f64, case: &str) -> Self {
        DistributedLoad::new(-w.abs(), x1, x2, LoadDirection::Fy, case)
    }

    pub fn total_force(&self) -> f64 {
        self.w * (self.x2 - self.x1)
    }
}

/// Named combination of load cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombo {
    pub name: String,
    /// Factor per load case name
    pub factors: HashMap<String, f64>,
}

impl LoadCombo {
    pub fn new(name: &str) -> Self {
        LoadCombo {
            name: name.to_string(),
            factors: HashMap::new(),
        }
    }

    /// One case at factor 1.0
    pub fn single(name: &str, case: &str) -> Self {
        LoadCombo::new(name).with_case(case, 1.0)
    }

    pub fn with_case(mut self, case: &str, factor: f64) -> Self {
        self.factors.insert(case.to_string(), factor);
        self
    }

    /// Factor for a case (0.0 if absent)
    pub fn factor(&self, case: &str) -> f64 {
        self.factors.get(case).copied().unwrap_or(0.0)
    }
}
