//! Structural Steel and Rolled Shapes (AISC)
//!
//! Two things live here: the [`Steel`] grade used for the beam, and the
//! section-property table that resolves a shape label such as `"W16X26"` to
//! its published AISC properties.
//!
//! ## Data Source
//!
//! Built-in properties come from the AISC Shapes Database v16.0. A full
//! database export (CSV) can be loaded with [`SteelShapeDb::load_from_csv`];
//! only doubly-symmetric I-shapes (W, M, S, HP) are kept because those are
//! the only sections the composite calculations handle.
//!
//! ## Example
//!
//! ```rust
//! use compbeam_core::materials::steel::{builtin_w_shapes, SectionProvider};
//!
//! let db = builtin_w_shapes();
//! let w16 = db.section("w16x26").unwrap();
//!
//! assert_eq!(w16.area_in2, 7.68);
//! assert_eq!(w16.t_in, 13.625);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::{require_poisson_ratio, require_positive, Material};
use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Steel Material
// ============================================================================

/// Structural steel grade.
///
/// Immutable after creation: fields are private and deserialization runs the
/// same validation as [`Steel::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SteelProps", into = "SteelProps")]
pub struct Steel {
    name: String,
    e_ksi: f64,
    g_ksi: f64,
    fy_ksi: f64,
    fu_ksi: f64,
    poisson_ratio: f64,
    density_pcf: f64,
}

/// Serialized form of [`Steel`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SteelProps {
    pub name: String,
    pub e_ksi: f64,
    pub g_ksi: f64,
    pub fy_ksi: f64,
    pub fu_ksi: f64,
    pub poisson_ratio: f64,
    pub density_pcf: f64,
}

impl Default for SteelProps {
    fn default() -> Self {
        SteelProps {
            name: "Steel".to_string(),
            e_ksi: 29000.0,
            g_ksi: 11200.0,
            fy_ksi: 50.0,
            fu_ksi: 65.0,
            poisson_ratio: 0.3,
            density_pcf: 490.0,
        }
    }
}

impl Steel {
    /// Create a steel grade, rejecting non-positive moduli and strengths.
    pub fn new(props: SteelProps) -> CalcResult<Self> {
        let checks = [
            ("steel.e_ksi", props.e_ksi),
            ("steel.g_ksi", props.g_ksi),
            ("steel.fy_ksi", props.fy_ksi),
            ("steel.fu_ksi", props.fu_ksi),
            ("steel.density_pcf", props.density_pcf),
        ];
        for (field, value) in checks {
            require_positive(field, value)?;
        }
        require_poisson_ratio("steel.poisson_ratio", props.poisson_ratio)?;
        if props.fu_ksi < props.fy_ksi {
            return Err(CalcError::invalid_input(
                "steel.fu_ksi",
                props.fu_ksi.to_string(),
                format!("Ultimate stress must not be below yield ({} ksi)", props.fy_ksi),
            ));
        }

        Ok(Steel {
            name: props.name,
            e_ksi: props.e_ksi,
            g_ksi: props.g_ksi,
            fy_ksi: props.fy_ksi,
            fu_ksi: props.fu_ksi,
            poisson_ratio: props.poisson_ratio,
            density_pcf: props.density_pcf,
        })
    }

    /// Steel with the given yield and ultimate stress, defaults otherwise
    pub fn with_strengths(fy_ksi: f64, fu_ksi: f64) -> CalcResult<Self> {
        Steel::new(SteelProps {
            fy_ksi,
            fu_ksi,
            ..SteelProps::default()
        })
    }

    pub fn e_ksi(&self) -> f64 {
        self.e_ksi
    }

    pub fn g_ksi(&self) -> f64 {
        self.g_ksi
    }

    /// Yield stress Fy (ksi)
    pub fn fy_ksi(&self) -> f64 {
        self.fy_ksi
    }

    /// Ultimate stress Fu (ksi)
    pub fn fu_ksi(&self) -> f64 {
        self.fu_ksi
    }
}

impl Default for Steel {
    fn default() -> Self {
        let p = SteelProps::default();
        Steel {
            name: p.name,
            e_ksi: p.e_ksi,
            g_ksi: p.g_ksi,
            fy_ksi: p.fy_ksi,
            fu_ksi: p.fu_ksi,
            poisson_ratio: p.poisson_ratio,
            density_pcf: p.density_pcf,
        }
    }
}

impl TryFrom<SteelProps> for Steel {
    type Error = CalcError;

    fn try_from(props: SteelProps) -> CalcResult<Self> {
        Steel::new(props)
    }
}

impl From<Steel> for SteelProps {
    fn from(s: Steel) -> Self {
        SteelProps {
            name: s.name,
            e_ksi: s.e_ksi,
            g_ksi: s.g_ksi,
            fy_ksi: s.fy_ksi,
            fu_ksi: s.fu_ksi,
            poisson_ratio: s.poisson_ratio,
            density_pcf: s.density_pcf,
        }
    }
}

impl Material for Steel {
    fn name(&self) -> &str {
        &self.name
    }

    fn elastic_modulus_ksi(&self) -> f64 {
        self.e_ksi
    }

    fn shear_modulus_ksi(&self) -> f64 {
        self.g_ksi
    }

    fn density_pcf(&self) -> f64 {
        self.density_pcf
    }

    fn poisson_ratio(&self) -> f64 {
        self.poisson_ratio
    }
}

// ============================================================================
// Shapes
// ============================================================================

/// I-shaped section families handled by the composite calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    /// Wide flange beam (W-shape)
    W,
    /// Miscellaneous shape (M-shape)
    M,
    /// American Standard beam (S-shape)
    S,
    /// H-pile (HP-shape)
    HP,
}

impl ShapeType {
    /// Parse from AISC type code. Non I-shaped families return `None`.
    pub fn from_aisc_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "W" => Some(ShapeType::W),
            "M" => Some(ShapeType::M),
            "S" => Some(ShapeType::S),
            "HP" => Some(ShapeType::HP),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeType::W => "Wide Flange (W)",
            ShapeType::M => "Miscellaneous (M)",
            ShapeType::S => "American Standard (S)",
            ShapeType::HP => "H-Pile (HP)",
        }
    }
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Rolled I-shape with the section properties used in composite design.
///
/// Field names follow the AISC Shapes Database columns; all dimensions are
/// in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelShape {
    pub shape_type: ShapeType,

    /// AISC Manual label (e.g., "W16X26")
    pub label: String,

    /// Nominal weight (lb/ft)
    pub weight_plf: f64,

    /// Cross-sectional area (in²)
    pub area_in2: f64,

    /// Overall depth d (in)
    pub depth_in: f64,

    /// Flange width bf (in)
    pub bf_in: f64,

    /// Flange thickness tf (in)
    pub tf_in: f64,

    /// Web thickness tw (in)
    pub tw_in: f64,

    /// Clear web depth between fillets, AISC "T" (in)
    pub t_in: f64,

    /// Moment of inertia about X-axis (in⁴)
    pub ix_in4: f64,

    /// Elastic section modulus about X-axis (in³)
    pub sx_in3: f64,

    /// Plastic section modulus about X-axis (in³)
    pub zx_in3: f64,

    /// Moment of inertia about Y-axis (in⁴)
    pub iy_in4: f64,

    /// Radius of gyration about Y-axis (in)
    pub ry_in: f64,

    /// Torsional constant J (in⁴)
    pub j_in4: f64,

    /// Effective radius of gyration for LTB (in)
    pub rts_in: f64,

    /// Distance between flange centroids (in)
    pub ho_in: f64,
}

impl SteelShape {
    /// Flange slenderness bf / 2tf
    pub fn bf_2tf(&self) -> f64 {
        self.bf_in / (2.0 * self.tf_in)
    }

    /// Web slenderness T / tw
    pub fn h_tw(&self) -> f64 {
        self.t_in / self.tw_in
    }

    /// Check that every property the flexural calculations divide by is present.
    pub fn validate(&self) -> CalcResult<()> {
        let required = [
            ("area_in2", self.area_in2),
            ("depth_in", self.depth_in),
            ("bf_in", self.bf_in),
            ("tf_in", self.tf_in),
            ("tw_in", self.tw_in),
            ("t_in", self.t_in),
            ("ix_in4", self.ix_in4),
            ("sx_in3", self.sx_in3),
            ("zx_in3", self.zx_in3),
            ("iy_in4", self.iy_in4),
            ("ry_in", self.ry_in),
            ("j_in4", self.j_in4),
            ("rts_in", self.rts_in),
            ("ho_in", self.ho_in),
        ];
        for (field, value) in required {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", self.label, field),
                    value.to_string(),
                    "Section property must be positive",
                ));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for SteelShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (A={:.2} in², d={:.2} in, Ix={:.1} in⁴)",
            self.label, self.area_in2, self.depth_in, self.ix_in4
        )
    }
}

// ============================================================================
// Section-Property Provider
// ============================================================================

/// Resolves a shape label to its section properties.
pub trait SectionProvider {
    /// Look up a shape. Unknown labels fail with `ShapeNotFound`.
    fn section(&self, label: &str) -> CalcResult<SteelShape>;
}

/// Steel shapes table, indexed by uppercase AISC label.
#[derive(Debug, Clone, Default)]
pub struct SteelShapeDb {
    shapes: HashMap<String, SteelShape>,

    /// Database version (e.g., "16.0")
    pub version: Option<String>,
}

impl SteelShapeDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load shapes from an AISC Shapes Database CSV export.
    pub fn load_from_csv(path: &str) -> CalcResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("open", path, format!("Failed to read CSV: {}", e))
        })?;
        Self::from_csv_str(&contents).map_err(|e| match e {
            CalcError::InvalidInput { reason, .. } => CalcError::file_error("parse", path, reason),
            other => other,
        })
    }

    /// Parse shapes from CSV text with an AISC header row.
    ///
    /// Rows of non I-shaped families (HSS, angles, channels, ...) are skipped.
    pub fn from_csv_str(contents: &str) -> CalcResult<Self> {
        let mut lines = contents.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| CalcError::invalid_input("csv", "", "CSV is empty"))?;

        let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
        // AISC uses "T" and "t" for different columns, so prefer an exact match.
        let col_index = |name: &str| -> Option<usize> {
            headers
                .iter()
                .position(|h| *h == name)
                .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
        };

        let type_idx = col_index("Type")
            .ok_or_else(|| CalcError::invalid_input("csv", "", "Missing 'Type' column"))?;
        let label_idx = col_index("AISC_Manual_Label").ok_or_else(|| {
            CalcError::invalid_input("csv", "", "Missing 'AISC_Manual_Label' column")
        })?;

        let w_idx = col_index("W");
        let a_idx = col_index("A");
        let d_idx = col_index("d");
        let bf_idx = col_index("bf");
        let tf_idx = col_index("tf");
        let tw_idx = col_index("tw");
        let t_idx = col_index("T");
        let ix_idx = col_index("Ix");
        let sx_idx = col_index("Sx");
        let zx_idx = col_index("Zx");
        let iy_idx = col_index("Iy");
        let ry_idx = col_index("ry");
        let j_idx = col_index("J");
        let rts_idx = col_index("rts");
        let ho_idx = col_index("ho");

        let mut db = SteelShapeDb::new();

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();

            let type_str = fields.get(type_idx).copied().unwrap_or("");
            let label = fields.get(label_idx).copied().unwrap_or("").trim().to_string();
            if label.is_empty() {
                continue;
            }
            let Some(shape_type) = ShapeType::from_aisc_code(type_str) else {
                continue;
            };

            let get_f64 = |idx: Option<usize>| -> f64 {
                idx.and_then(|i| fields.get(i))
                    .and_then(|v| parse_optional_f64(v))
                    .unwrap_or(0.0)
            };

            db.insert(SteelShape {
                shape_type,
                label,
                weight_plf: get_f64(w_idx),
                area_in2: get_f64(a_idx),
                depth_in: get_f64(d_idx),
                bf_in: get_f64(bf_idx),
                tf_in: get_f64(tf_idx),
                tw_in: get_f64(tw_idx),
                t_in: get_f64(t_idx),
                ix_in4: get_f64(ix_idx),
                sx_in3: get_f64(sx_idx),
                zx_in3: get_f64(zx_idx),
                iy_in4: get_f64(iy_idx),
                ry_in: get_f64(ry_idx),
                j_in4: get_f64(j_idx),
                rts_in: get_f64(rts_idx),
                ho_in: get_f64(ho_idx),
            });
        }

        log::debug!("Loaded {} I-shapes from CSV", db.len());
        Ok(db)
    }

    /// Insert a shape into the database
    pub fn insert(&mut self, shape: SteelShape) {
        self.shapes.insert(shape.label.to_uppercase(), shape);
    }

    /// Look up a shape by its AISC label (case-insensitive)
    pub fn lookup(&self, label: &str) -> CalcResult<&SteelShape> {
        self.shapes
            .get(&label.trim().to_uppercase())
            .ok_or_else(|| CalcError::shape_not_found(label))
    }

    /// All W-shapes, lightest first
    pub fn w_shapes(&self) -> Vec<&SteelShape> {
        let mut shapes: Vec<&SteelShape> = self
            .shapes
            .values()
            .filter(|s| s.shape_type == ShapeType::W)
            .collect();
        shapes.sort_by(|a, b| {
            a.weight_plf
                .partial_cmp(&b.weight_plf)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Prefix search (e.g., "W16" matches all W16 shapes)
    pub fn search(&self, pattern: &str) -> Vec<&SteelShape> {
        let pattern_upper = pattern.to_uppercase();
        self.shapes
            .iter()
            .filter(|(k, _)| k.starts_with(&pattern_upper))
            .map(|(_, v)| v)
            .collect()
    }
}

impl SectionProvider for SteelShapeDb {
    fn section(&self, label: &str) -> CalcResult<SteelShape> {
        self.lookup(label).cloned()
    }
}

/// Returns None for empty strings, dashes, or invalid numbers.
fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "–" || trimmed == "—" {
        return None;
    }
    f64::from_str(trimmed).ok()
}

// ============================================================================
// Built-in W-Shapes (for use without CSV file)
// ============================================================================

/// Database with common floor-beam W-shapes pre-loaded (AISC Manual 16th Ed).
pub fn builtin_w_shapes() -> SteelShapeDb {
    let mut db = SteelShapeDb::new();

    // label, W, A, d, bf, tf, tw, T, Ix, Sx, Zx, Iy, ry, J, rts, ho
    let common_w_shapes = [
        ("W12X26", 26.0, 7.65, 12.2, 6.49, 0.380, 0.230, 10.375, 204.0, 33.4, 37.2, 17.3, 1.51, 0.300, 1.75, 11.8),
        ("W14X22", 22.0, 6.49, 13.7, 5.00, 0.335, 0.230, 11.625, 199.0, 29.0, 33.2, 7.00, 1.04, 0.208, 1.27, 13.4),
        ("W14X30", 30.0, 8.85, 13.8, 6.73, 0.385, 0.270, 11.625, 291.0, 42.0, 47.3, 19.6, 1.49, 0.380, 1.77, 13.4),
        ("W16X26", 26.0, 7.68, 15.7, 5.50, 0.345, 0.250, 13.625, 301.0, 38.4, 44.2, 9.59, 1.12, 0.262, 1.38, 15.4),
        ("W16X31", 31.0, 9.13, 15.9, 5.53, 0.440, 0.275, 13.625, 375.0, 47.2, 54.0, 12.4, 1.17, 0.461, 1.39, 15.4),
        ("W16X36", 36.0, 10.6, 15.9, 6.99, 0.430, 0.295, 13.625, 448.0, 56.5, 64.0, 24.5, 1.52, 0.545, 1.79, 15.4),
        ("W18X35", 35.0, 10.3, 17.7, 6.00, 0.425, 0.300, 15.5, 510.0, 57.6, 66.5, 15.3, 1.22, 0.506, 1.51, 17.3),
        ("W18X40", 40.0, 11.8, 17.9, 6.02, 0.525, 0.315, 15.5, 612.0, 68.4, 78.4, 19.1, 1.27, 0.810, 1.56, 17.4),
        ("W18X50", 50.0, 14.7, 18.0, 7.50, 0.570, 0.355, 15.5, 800.0, 88.9, 101.0, 40.1, 1.65, 1.24, 1.98, 17.4),
        ("W21X44", 44.0, 13.0, 20.7, 6.50, 0.450, 0.350, 18.375, 843.0, 81.6, 95.4, 20.7, 1.26, 0.770, 1.57, 20.2),
        ("W21X50", 50.0, 14.7, 20.8, 6.53, 0.535, 0.380, 18.375, 984.0, 94.5, 110.0, 24.9, 1.30, 1.14, 1.60, 20.3),
        ("W24X55", 55.0, 16.2, 23.6, 7.01, 0.505, 0.395, 20.75, 1350.0, 114.0, 134.0, 29.1, 1.34, 1.18, 1.68, 23.1),
        ("W24X68", 68.0, 20.1, 23.7, 8.97, 0.585, 0.415, 20.75, 1830.0, 154.0, 177.0, 70.4, 1.87, 1.87, 2.30, 23.2),
    ];

    for (label, w, a, d, bf, tf, tw, t, ix, sx, zx, iy, ry, j, rts, ho) in common_w_shapes {
        db.insert(SteelShape {
            shape_type: ShapeType::W,
            label: label.to_string(),
            weight_plf: w,
            area_in2: a,
            depth_in: d,
            bf_in: bf,
            tf_in: tf,
            tw_in: tw,
            t_in: t,
            ix_in4: ix,
            sx_in3: sx,
            zx_in3: zx,
            iy_in4: iy,
            ry_in: ry,
            j_in4: j,
            rts_in: rts,
            ho_in: ho,
        });
    }

    db.version = Some("builtin-w".to_string());
    db
}
