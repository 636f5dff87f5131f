//! Thin-plate bending math
//!
//! Kirchhoff-Love theory expresses the bending state entirely through the
//! transverse deflection w: curvatures are second derivatives of w, and the
//! moments follow from the bending constitutive matrix. With one space
//! dimension the same operators describe a beam of unit width.

use nalgebra::DMatrix;

use crate::error::{FEAError, FEAResult};

/// Poisson ratios this close to (or beyond) 0.5 are rejected on the
/// compliance path
const NU_LIMIT: f64 = 0.5 - 1e-9;

/// Number of stress-resultant components for `nsd` space dimensions
/// (1 for beams, 3 for plates)
pub fn num_resultants(nsd: usize) -> usize {
    nsd * (nsd + 1) / 2
}

/// Isotropic bending constitutive matrix
///
/// For a plate (`nsd = 2`) this is the 3x3 matrix
///
/// ```text
///     E t^3            | 1  nu  0          |
/// ------------------ * | nu  1  0          |
/// 12 (1 - nu^2)        | 0   0  (1 - nu)/2 |
/// ```
///
/// mapping curvatures (kappa_xx, kappa_yy, 2*kappa_xy) to the moments
/// (m_xx, m_yy, m_xy). For a beam (`nsd = 1`) it degenerates to the 1x1
/// flexural rigidity E t^3 / 12.
pub fn bending_constitutive_matrix(e: f64, nu: f64, t: f64, nsd: usize) -> DMatrix<f64> {
    let t3_12 = t.powi(3) / 12.0;
    if nsd == 1 {
        return DMatrix::from_element(1, 1, e * t3_12);
    }
    let f = e * t3_12 / (1.0 - nu * nu);
    let mut c = DMatrix::zeros(3, 3);
    c[(0, 0)] = f;
    c[(1, 1)] = f;
    c[(0, 1)] = f * nu;
    c[(1, 0)] = f * nu;
    c[(2, 2)] = f * (1.0 - nu) / 2.0;
    c
}

/// Closed-form inverse of the bending constitutive matrix
///
/// Used to recover curvatures from known moments. Fails with
/// `UnsupportedParameter` for a Poisson ratio outside `[0, 0.5)`; behavior
/// at the incompressible limit is deliberately not inferred.
pub fn bending_compliance_matrix(e: f64, nu: f64, t: f64, nsd: usize) -> FEAResult<DMatrix<f64>> {
    if !(0.0..NU_LIMIT).contains(&nu) {
        return Err(FEAError::UnsupportedParameter(format!(
            "Poisson ratio {nu} outside [0, 0.5) on the compliance path"
        )));
    }
    if e <= 0.0 || t <= 0.0 {
        return Err(FEAError::UnsupportedParameter(format!(
            "non-positive stiffness data (E = {e}, t = {t})"
        )));
    }
    let t3_12 = t.powi(3) / 12.0;
    if nsd == 1 {
        return Ok(DMatrix::from_element(1, 1, 1.0 / (e * t3_12)));
    }
    let g = 1.0 / (e * t3_12);
    let mut s = DMatrix::zeros(3, 3);
    s[(0, 0)] = g;
    s[(1, 1)] = g;
    s[(0, 1)] = -g * nu;
    s[(1, 0)] = -g * nu;
    s[(2, 2)] = g * 2.0 * (1.0 + nu);
    Ok(s)
}

/// Curvature-displacement matrix B from basis function second derivatives
///
/// `d2n_dx2` is `nen x nsd*nsd` with entry `(a, i*nsd + j)` holding
/// d2N_a/dx_i dx_j. The rows of B are (kappa_xx, kappa_yy, 2*kappa_xy);
/// the twist row sums the two mixed derivatives so that an asymmetric
/// storage of the mixed term still produces the engineering twist.
///
/// Fails with `DegenerateGeometry` when the second-derivative data is
/// absent or does not match the declared space dimension.
pub fn curvature_b_matrix(d2n_dx2: &DMatrix<f64>, nsd: usize) -> FEAResult<DMatrix<f64>> {
    let nen = d2n_dx2.nrows();
    if nen == 0 || d2n_dx2.ncols() != nsd * nsd {
        return Err(FEAError::DegenerateGeometry(format!(
            "second-derivative basis data is {}x{}, expected nen x {}",
            nen,
            d2n_dx2.ncols(),
            nsd * nsd
        )));
    }
    let mut b = DMatrix::zeros(num_resultants(nsd), nen);
    for a in 0..nen {
        b[(0, a)] = d2n_dx2[(a, 0)];
        if nsd == 2 {
            b[(1, a)] = d2n_dx2[(a, 3)];
            b[(2, a)] = d2n_dx2[(a, 1)] + d2n_dx2[(a, 2)];
        }
    }
    Ok(b)
}
