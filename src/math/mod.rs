//! Mathematical utilities for the plate integrands

pub mod bending;

pub use bending::{
    bending_compliance_matrix, bending_constitutive_matrix, curvature_b_matrix, num_resultants,
};
