//! Integration-point context supplied by the external assembler
//!
//! The integrand never computes basis functions itself; the assembler
//! precomputes values, derivatives, and quadrature data for each point and
//! hands them over in a [`FiniteElement`]. The derivative order the
//! integrand requires is declared through
//! [`Integrand::derivative_order`](crate::integrands::Integrand::derivative_order).

use nalgebra::{DMatrix, DVector};

/// Finite element data at one integration point
///
/// Second derivatives are stored as an `nen x nsd*nsd` matrix where entry
/// `(a, i*nsd + j)` holds d2N_a/dx_i dx_j.
#[derive(Debug, Clone)]
pub struct FiniteElement {
    /// Global integration point index (unique across the whole model)
    pub ip: usize,
    /// Basis function values, length `nen`
    pub n: DVector<f64>,
    /// First derivatives of the basis functions, `nen x nsd`
    pub dn_dx: DMatrix<f64>,
    /// Second derivatives of the basis functions, `nen x nsd*nsd`
    pub d2n_dx2: DMatrix<f64>,
    /// Jacobian determinant times integration point weight
    pub det_jxw: f64,
}

impl FiniteElement {
    /// Create a zero-initialized context for `nen` basis functions in
    /// `nsd` space dimensions, with unit integration weight
    pub fn new(nen: usize, nsd: usize) -> Self {
        Self {
            ip: 0,
            n: DVector::zeros(nen),
            dn_dx: DMatrix::zeros(nen, nsd),
            d2n_dx2: DMatrix::zeros(nen, nsd * nsd),
            det_jxw: 1.0,
        }
    }

    /// Number of basis functions covered by this point
    pub fn nen(&self) -> usize {
        self.n.len()
    }

    /// Second derivative d2N_a/dx_i dx_j for the given space dimension
    pub fn d2(&self, nsd: usize, a: usize, i: usize, j: usize) -> f64 {
        self.d2n_dx2[(a, i * nsd + j)]
    }
}

/// Time domain parameters for transient and nonlinear simulations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeDomain {
    /// Current simulation time
    pub t: f64,
    /// Current time step size
    pub dt: f64,
}

impl TimeDomain {
    /// Time domain for a stationary (time-independent) problem
    pub fn stationary() -> Self {
        Self::default()
    }

    /// Time domain at time `t` with step size `dt`
    pub fn new(t: f64, dt: f64) -> Self {
        Self { t, dt }
    }
}
