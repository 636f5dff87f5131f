//! Element-scoped containers for integrated matrix/vector contributions

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};
use crate::integrands::SolutionMode;

/// Indices into the element matrix/vector slots of an [`ElementMats`]
///
/// The indices are 1-based; the value zero signals a non-existing
/// matrix/vector. They are identical for all elements in a model and are
/// assigned only when the solution mode is set, so they can be read
/// concurrently during multi-threaded element evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixSlots {
    /// Material stiffness matrix
    pub km: usize,
    /// Geometric stiffness matrix
    pub kg: usize,
    /// Mass matrix
    pub m: usize,
    /// External load vector
    pub s: usize,
    /// Internal force vector
    pub fi: usize,
}

impl MatrixSlots {
    /// Slot assignment for the given solution mode
    ///
    /// In `Dynamic` mode the first matrix is reserved for the effective
    /// (Newton) operator formed during element finalization.
    pub fn for_mode(mode: SolutionMode) -> Self {
        match mode {
            SolutionMode::Static => Self { km: 1, kg: 0, m: 0, s: 1, fi: 2 },
            SolutionMode::Dynamic => Self { km: 2, kg: 3, m: 4, s: 1, fi: 2 },
            SolutionMode::Vibration => Self { km: 1, kg: 0, m: 2, s: 0, fi: 0 },
            SolutionMode::Buckling => Self { km: 1, kg: 2, m: 0, s: 0, fi: 0 },
            SolutionMode::RhsOnly => Self { km: 0, kg: 0, m: 0, s: 1, fi: 0 },
            SolutionMode::IntForces => Self { km: 0, kg: 0, m: 0, s: 0, fi: 1 },
        }
    }

    /// Number of element matrices implied by the active slots
    pub fn num_mats(&self) -> usize {
        self.km.max(self.kg).max(self.m)
    }

    /// Number of element vectors implied by the active slots
    pub fn num_vecs(&self) -> usize {
        self.s.max(self.fi)
    }

    /// Check that active slot indices are unique within each family
    pub fn validate(&self) -> FEAResult<()> {
        let mats = [self.km, self.kg, self.m];
        for (i, &a) in mats.iter().enumerate() {
            for &b in mats.iter().skip(i + 1) {
                if a != 0 && a == b {
                    return Err(FEAError::InvalidSlotIndex(format!(
                        "matrix slot {a} assigned twice"
                    )));
                }
            }
        }
        if self.s != 0 && self.s == self.fi {
            return Err(FEAError::InvalidSlotIndex(format!(
                "vector slot {} assigned twice",
                self.s
            )));
        }
        Ok(())
    }
}

/// Local integral container for one element
///
/// Holds the matrix and vector slots that the integrand accumulates into
/// during numerical integration, plus the element-level solution vectors
/// gathered by the assembler (displacement first, then velocity and
/// acceleration when tracked). A fresh container is created per element and
/// is exclusively owned by the calling thread until its contents are
/// accumulated into the global system.
#[derive(Debug, Clone, Default)]
pub struct ElementMats {
    /// Element matrices (stiffness, mass, ...), all `ndof x ndof`
    pub a: Vec<DMatrix<f64>>,
    /// Element vectors (load, internal force), all of length `ndof`
    pub b: Vec<DVector<f64>>,
    /// Element-level solution vectors, assigned by the assembler
    pub sol: Vec<DVector<f64>>,
    /// Whether only right-hand-side (load) terms are assembled
    pub rhs_only: bool,
}

impl ElementMats {
    /// Create a container with `n_mats` matrices and `n_vecs` vectors,
    /// all sized for `ndof` degrees of freedom
    pub fn new(n_mats: usize, n_vecs: usize, ndof: usize) -> Self {
        Self {
            a: (0..n_mats).map(|_| DMatrix::zeros(ndof, ndof)).collect(),
            b: (0..n_vecs).map(|_| DVector::zeros(ndof)).collect(),
            sol: Vec::new(),
            rhs_only: false,
        }
    }

    /// Element matrix for a 1-based slot index, if present
    pub fn mat(&self, slot: usize) -> Option<&DMatrix<f64>> {
        slot.checked_sub(1).and_then(|i| self.a.get(i))
    }

    /// Mutable element matrix for a 1-based slot index, if present
    pub fn mat_mut(&mut self, slot: usize) -> Option<&mut DMatrix<f64>> {
        slot.checked_sub(1).and_then(|i| self.a.get_mut(i))
    }

    /// Element vector for a 1-based slot index, if present
    pub fn vec(&self, slot: usize) -> Option<&DVector<f64>> {
        slot.checked_sub(1).and_then(|i| self.b.get(i))
    }

    /// Mutable element vector for a 1-based slot index, if present
    pub fn vec_mut(&mut self, slot: usize) -> Option<&mut DVector<f64>> {
        slot.checked_sub(1).and_then(|i| self.b.get_mut(i))
    }

    /// The matrix handed to the global solver (first matrix slot)
    pub fn newton(&self) -> Option<&DMatrix<f64>> {
        self.a.first()
    }
}

/// Accumulator for element-level norm quantities
///
/// The entries hold squared partial sums during integration; taking the
/// square root of the globally accumulated values is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct NormVals {
    /// Norm quantity accumulators, fixed layout per norm integrand
    pub values: Vec<f64>,
    /// Element-level primary solution vector
    pub sol: DVector<f64>,
}

impl NormVals {
    /// Create an accumulator with `n` zeroed norm quantities
    pub fn new(n: usize) -> Self {
        Self {
            values: vec![0.0; n],
            sol: DVector::zeros(0),
        }
    }
}
