//! Integrand capability traits
//!
//! An integrand is the per-point rule producing element matrix/vector
//! contributions for one analysis type. The set of integrand kinds is fixed
//! per run and selected at configuration time, so the seams are plain
//! traits over concrete containers rather than an open inheritance
//! hierarchy.

mod elastic;
mod plate;
mod plate_norm;

pub use elastic::{ElasticBase, NewmarkParams};
pub use plate::KirchhoffLovePlate;
pub use plate_norm::KirchhoffLovePlateNorm;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::FEAResult;
use crate::fe::{FiniteElement, TimeDomain};
use crate::integral::{ElementMats, NormVals};

/// Solution mode driving which element matrix/vector slots are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolutionMode {
    /// Linear static analysis
    #[default]
    Static,
    /// Implicit dynamic analysis
    Dynamic,
    /// Free vibration (generalized eigenvalue) analysis
    Vibration,
    /// Linearized buckling analysis
    Buckling,
    /// Right-hand-side (load vector) assembly only
    RhsOnly,
    /// Internal force evaluation only
    IntForces,
}

/// Finite element quantities an integrand needs at each point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrandType {
    /// Basis values and first derivatives suffice
    Standard,
    /// Second derivatives of the basis functions are required
    SecondDerivatives,
}

/// Capabilities common to all integrands
pub trait Integrand {
    /// Which finite element quantities must be precomputed by the assembler
    fn integrand_type(&self) -> IntegrandType {
        IntegrandType::Standard
    }

    /// Derivative order of the differential operator
    fn derivative_order(&self) -> usize {
        1
    }

    /// Whether this integrand has explicit boundary contributions
    fn has_boundary_terms(&self) -> bool {
        false
    }
}

/// Integrand producing element matrix/vector contributions
pub trait ElementIntegrand: Integrand {
    /// Fresh local integral container for an element with `nen` basis
    /// functions; `neumann` restricts it to load-vector assembly
    fn new_local_integral(&self, nen: usize, neumann: bool) -> ElementMats;

    /// Evaluate the integrand at an interior integration point
    fn eval_int(
        &self,
        elm: &mut ElementMats,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
    ) -> FEAResult<()>;

    /// Evaluate the integrand at a boundary integration point
    fn eval_bou(
        &self,
        elm: &mut ElementMats,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
        normal: &Vector3<f64>,
    ) -> FEAResult<()>;

    /// Finalize the element matrices after numerical integration
    fn finalize_element(&self, elm: &mut ElementMats, time: &TimeDomain) -> FEAResult<()>;
}

/// Integrand accumulating element-level norm quantities
pub trait NormIntegrand: Integrand {
    /// Fresh norm accumulator; the caller fills in the element solution
    fn new_local_integral(&self) -> NormVals;

    /// Evaluate the norm integrand at an interior integration point
    fn eval_int(
        &self,
        nv: &mut NormVals,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
    ) -> FEAResult<()>;

    /// Evaluate the norm integrand at a boundary integration point
    fn eval_bou(
        &self,
        nv: &mut NormVals,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
        normal: &Vector3<f64>,
    ) -> FEAResult<()>;

    /// Derive scalar outputs from the accumulated sums; returns `false`
    /// when a prerequisite sum is absent
    fn finalize_element(&self, nv: &mut NormVals) -> bool;

    /// Number of norm groups (`group = 0`) or the size of a group
    fn num_fields(&self, group: usize) -> usize;

    /// Name of norm quantity `j` of the given group (both one-based)
    fn norm_name(&self, group: usize, j: usize, prefix: Option<&str>) -> String;
}
