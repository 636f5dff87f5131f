//! plate-fea - per-element integrands for Kirchhoff-Love plate bending
//!
//! This library provides the element-level numerical integrand layer of a
//! structural finite element analysis: given precomputed basis function
//! values/derivatives and quadrature data at an integration point, it forms
//! element stiffness, mass and load contributions for thin plate (and thin
//! beam) bending, and evaluates derived quantities - moments, curvatures,
//! energy and error norms - from a computed solution.
//!
//! Mesh generation, global assembly, linear/eigen solvers and file I/O are
//! external collaborators; the integrand only sees one integration point at
//! a time and writes into an element-local container owned by the caller.
//!
//! ## Example
//! ```rust
//! use nalgebra::{DMatrix, DVector, Point3};
//! use plate_fea::prelude::*;
//!
//! // a thin steel plate under uniform pressure
//! let steel = Isotropic::steel();
//! let pressure = ConstantPressure(-1000.0);
//!
//! let mut plate = KirchhoffLovePlate::new(2);
//! plate.set_material(&steel);
//! plate.set_thickness(0.01);
//! plate.set_pressure(&pressure);
//! plate.set_mode(SolutionMode::Static).unwrap();
//! plate.init_integration(4, 0);
//!
//! // the assembler supplies basis data per integration point; a single
//! // basis function with unit second derivative serves as a stand-in here
//! let mut fe = FiniteElement::new(1, 2);
//! fe.n = DVector::from_element(1, 1.0);
//! fe.d2n_dx2 = DMatrix::from_row_slice(1, 4, &[1.0, 0.0, 0.0, 1.0]);
//!
//! let mut elm = plate.new_local_integral(1, false);
//! plate
//!     .eval_int(&mut elm, &fe, &TimeDomain::stationary(), &Point3::origin())
//!     .unwrap();
//!
//! let slots = plate.base().slots();
//! assert!(elm.mat(slots.km).unwrap()[(0, 0)] > 0.0);
//! assert!(plate.has_traction_values());
//! ```

pub mod bdf;
pub mod error;
pub mod fe;
pub mod integral;
pub mod integrands;
pub mod loads;
pub mod material;
pub mod math;
pub mod output;

// Re-export common types
pub mod prelude {
    pub use crate::bdf::Bdf2;
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::fe::{FiniteElement, TimeDomain};
    pub use crate::integral::{ElementMats, MatrixSlots, NormVals};
    pub use crate::integrands::{
        ElasticBase, ElementIntegrand, Integrand, IntegrandType, KirchhoffLovePlate,
        KirchhoffLovePlateNorm, NewmarkParams, NormIntegrand, SolutionMode,
    };
    pub use crate::loads::{ConstantPressure, ScalarField, StressResultantField};
    pub use crate::material::{Isotropic, Material};
    pub use crate::output::{ConstantRotation, LocalSystem, MemorySink, ResultSink, VectorBlock};
}
