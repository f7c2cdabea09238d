//! Matrix utilities for the 12-DOF frame element
//!
//! Sign conventions: local x runs i → j, local y is "up" for
//! horizontal members, and fixed-end reactions (FER) are the forces the
//! supports of a fully fixed member would exert.

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector, Vector3};

use super::error::{FeaError, FeaResult};

pub type Mat = DMatrix<f64>;
pub type Vector = DVector<f64>;
pub type Mat3 = Matrix3<f64>;

/// 12x12 matrix for member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Relative pivot size below which the stiffness matrix is treated as singular
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

/// 3-point Gauss-Legendre rule on [-1, 1], exact for quintics.
const GAUSS_POINTS: [(f64, f64); 3] = [
    (-0.774_596_669_241_483_4, 5.0 / 9.0),
    (0.0, 8.0 / 9.0),
    (0.774_596_669_241_483_4, 5.0 / 9.0),
];

/// Transformation matrix from global to local coordinates.
///
/// Horizontal members take local y = global Y. Vertical members take local
/// y along ∓X depending on direction. Inclined members keep local z horizontal.
pub fn member_transformation_matrix(i_node: &[f64; 3], j_node: &[f64; 3]) -> FeaResult<Mat12> {
    let d = Vector3::new(j_node[0] - i_node[0], j_node[1] - i_node[1], j_node[2] - i_node[2]);
    let length = d.norm();
    if length < 1e-10 {
        return Err(FeaError::InvalidGeometry("Member has zero length".to_string()));
    }
    let x = d / length;

    let (y, z) = if x[0].abs() < 1e-10 && x[2].abs() < 1e-10 {
        let y = if x[1] > 0.0 {
            Vector3::new(-1.0, 0.0, 0.0)
        } else {
            Vector3::new(1.0, 0.0, 0.0)
        };
        (y, Vector3::new(0.0, 0.0, 1.0))
    } else if d[1].abs() < 1e-10 {
        let y = Vector3::new(0.0, 1.0, 0.0);
        (y, x.cross(&y).normalize())
    } else {
        let proj = Vector3::new(d[0], 0.0, d[2]);
        let z = if x[1] > 0.0 {
            proj.cross(&x).normalize()
        } else {
            x.cross(&proj).normalize()
        };
        (z.cross(&x).normalize(), z)
    };

    let r = Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]);

    let mut t = Mat12::zeros();
    for block in 0..4 {
        t.fixed_view_mut::<3, 3>(block * 3, block * 3).copy_from(&r);
    }
    Ok(t)
}

/// Local stiffness matrix of a 3D frame element (Euler-Bernoulli).
pub fn member_local_stiffness(e: f64, g: f64, a: f64, iy: f64, iz: f64, j: f64, l: f64) -> Mat12 {
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;
    let (y3, y2, y1) = (e * iy / l3, e * iy / l2, e * iy / l);
    let (z3, z2, z1) = (e * iz / l3, e * iz / l2, e * iz / l);

    #[rustfmt::skip]
    let data = [
        ea_l,  0.0,       0.0,       0.0,   0.0,      0.0,      -ea_l, 0.0,       0.0,       0.0,   0.0,      0.0,
        0.0,   12.0*z3,   0.0,       0.0,   0.0,      6.0*z2,   0.0,   -12.0*z3,  0.0,       0.0,   0.0,      6.0*z2,
        0.0,   0.0,       12.0*y3,   0.0,   -6.0*y2,  0.0,      0.0,   0.0,       -12.0*y3,  0.0,   -6.0*y2,  0.0,
        0.0,   0.0,       0.0,       gj_l,  0.0,      0.0,      0.0,   0.0,       0.0,       -gj_l, 0.0,      0.0,
        0.0,   0.0,       -6.0*y2,   0.0,   4.0*y1,   0.0,      0.0,   0.0,       6.0*y2,    0.0,   2.0*y1,   0.0,
        0.0,   6.0*z2,    0.0,       0.0,   0.0,      4.0*z1,   0.0,   -6.0*z2,   0.0,       0.0,   0.0,      2.0*z1,
        -ea_l, 0.0,       0.0,       0.0,   0.0,      0.0,      ea_l,  0.0,       0.0,       0.0,   0.0,      0.0,
        0.0,   -12.0*z3,  0.0,       0.0,   0.0,      -6.0*z2,  0.0,   12.0*z3,   0.0,       0.0,   0.0,      -6.0*z2,
        0.0,   0.0,       -12.0*y3,  0.0,   6.0*y2,   0.0,      0.0,   0.0,       12.0*y3,   0.0,   6.0*y2,   0.0,
        0.0,   0.0,       0.0,       -gj_l, 0.0,      0.0,      0.0,   0.0,       0.0,       gj_l,  0.0,      0.0,
        0.0,   0.0,       -6.0*y2,   0.0,   2.0*y1,   0.0,      0.0,   0.0,       6.0*y2,    0.0,   4.0*y1,   0.0,
        0.0,   6.0*z2,    0.0,       0.0,   0.0,      2.0*z1,   0.0,   -6.0*z2,   0.0,       0.0,   0.0,      4.0*z1,
    ];

    Mat12::from_row_slice(&data)
}

/// Hermite cubic shape functions [N1, N2, N3, N4] at distance `x` along a member.
fn hermite(x: f64, l: f64) -> [f64; 4] {
    let s = x / l;
    let s2 = s * s;
    let s3 = s2 * s;
    [
        1.0 - 3.0 * s2 + 2.0 * s3,
        l * (s - 2.0 * s2 + s3),
        3.0 * s2 - 2.0 * s3,
        l * (s3 - s2),
    ]
}

/// Fixed end reactions for a uniform load `w` over `[x1, x2]`.
///
/// Work-equivalent nodal loads are integrated exactly (Gauss) against the
/// element shape functions; the reactions are their negatives.
pub fn fer_uniform_load(w: f64, x1: f64, x2: f64, length: f64, direction: usize) -> Vec12 {
    let mut fer = Vec12::zeros();
    let (a, b) = (x1.max(0.0), x2.min(length));
    if b <= a {
        return fer;
    }

    let half = (b - a) / 2.0;
    let mid = (a + b) / 2.0;
    let mut axial = [0.0; 2];
    let mut bending = [0.0; 4];
    for (xi, weight) in GAUSS_POINTS {
        let x = mid + half * xi;
        let wx = w * weight * half;
        let s = x / length;
        axial[0] += wx * (1.0 - s);
        axial[1] += wx * s;
        for (acc, n) in bending.iter_mut().zip(hermite(x, length)) {
            *acc += wx * n;
        }
    }

    match direction {
        0 => {
            fer[0] = -axial[0];
            fer[6] = -axial[1];
        }
        1 => {
            fer[1] = -bending[0];
            fer[5] = -bending[1];
            fer[7] = -bending[2];
            fer[11] = -bending[3];
        }
        2 => {
            fer[2] = -bending[0];
            fer[4] = bending[1];
            fer[8] = -bending[2];
            fer[10] = bending[3];
        }
        _ => {}
    }

    fer
}

/// Solve `a · x = b` by LU decomposition, rejecting (near-)singular systems.
pub fn solve_linear_system(a: &Mat, b: &Vector) -> FeaResult<Vector> {
    let lu = a.clone().lu();

    let u = lu.u();
    let pivots = u.diagonal();
    let largest = pivots.iter().fold(0.0_f64, |m, p| m.max(p.abs()));
    let smallest = pivots.iter().fold(f64::INFINITY, |m, p| m.min(p.abs()));
    if largest == 0.0 || smallest < SINGULARITY_TOLERANCE * largest {
        return Err(FeaError::Unstable(format!(
            "stiffness matrix is singular (pivot ratio {:.3e}); check supports",
            if largest == 0.0 { 0.0 } else { smallest / largest }
        )));
    }

    lu.solve(b).ok_or(FeaError::SingularMatrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_matrix_horizontal() {
        let t = member_transformation_matrix(&[0.0, 0.0, 0.0], &[10.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(t, Mat12::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_matrix_vertical() {
        let t = member_transformation_matrix(&[0.0, 0.0, 0.0], &[0.0, 10.0, 0.0]).unwrap();
        assert_relative_eq!(t[(0, 1)], 1.0);
        assert_relative_eq!(t[(1, 0)], -1.0);
        assert_relative_eq!(t[(2, 2)], 1.0);
    }

    #[test]
    fn test_transformation_is_orthogonal() {
        let t = member_transformation_matrix(&[0.0, 0.0, 0.0], &[3.0, 4.0, 5.0]).unwrap();
        assert_relative_eq!(t * t.transpose(), Mat12::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_length_member() {
        let err = member_transformation_matrix(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, FeaError::InvalidGeometry(_)));
    }

    #[test]
    fn test_local_stiffness_symmetric() {
        let k = member_local_stiffness(29000.0, 11200.0, 7.68, 9.59, 301.0, 0.262, 360.0);
        assert_relative_eq!(k, k.transpose(), epsilon = 1e-9);
        assert_relative_eq!(k[(5, 5)], 4.0 * 29000.0 * 301.0 / 360.0, max_relative = 1e-12);
    }

    #[test]
    fn test_fer_full_span_matches_closed_form() {
        let (w, l) = (-0.1, 360.0);
        let fer = fer_uniform_load(w, 0.0, l, l, 1);
        assert_relative_eq!(fer[1], -w * l / 2.0, max_relative = 1e-12);
        assert_relative_eq!(fer[5], -w * l * l / 12.0, max_relative = 1e-12);
        assert_relative_eq!(fer[7], -w * l / 2.0, max_relative = 1e-12);
        assert_relative_eq!(fer[11], w * l * l / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_fer_partial_span_statics() {
        // Load on the first half: reactions sum to the applied force
        let (w, l) = (-2.0, 10.0);
        let fer = fer_uniform_load(w, 0.0, 5.0, l, 1);
        assert_relative_eq!(fer[1] + fer[7], -w * 5.0, max_relative = 1e-12);
        // Fixed-fixed, load over left half: M_i = 11wL²/192, M_j = 5wL²/192
        assert_relative_eq!(fer[5].abs(), 11.0 * w.abs() * l * l / 192.0, max_relative = 1e-12);
        assert_relative_eq!(fer[11].abs(), 5.0 * w.abs() * l * l / 192.0, max_relative = 1e-12);
    }

    #[test]
    fn test_fer_axial_and_z() {
        let fer = fer_uniform_load(1.0, 0.0, 10.0, 10.0, 0);
        assert_relative_eq!(fer[0], -5.0, max_relative = 1e-12);
        assert_relative_eq!(fer[6], -5.0, max_relative = 1e-12);

        let fer = fer_uniform_load(1.0, 0.0, 10.0, 10.0, 2);
        assert_relative_eq!(fer[4], 100.0 / 12.0, max_relative = 1e-12);
        assert_relative_eq!(fer[10], -100.0 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_fer_outside_member_is_zero() {
        assert_eq!(fer_uniform_load(1.0, 12.0, 15.0, 10.0, 1), Vec12::zeros());
    }

    #[test]
    fn test_solve_linear_system() {
        let a = Mat::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = Vector::from_vec(vec![1.0, 2.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 1.0 / 11.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 7.0 / 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_singular_system() {
        let a = Mat::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = Vector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(FeaError::Unstable(_)) | Err(FeaError::SingularMatrix)
        ));
    }
}
