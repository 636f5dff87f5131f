//! Result output collaborators
//!
//! Local coordinate systems rotate stress resultants into a user frame
//! before they are reported; visualization sinks receive named result
//! blocks. Both are external collaborators: this crate owns no file format.

use nalgebra::{Matrix2, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::FEAResult;

/// Rotation provider for transforming result quantities into a local frame
pub trait LocalSystem: Sync {
    /// In-plane rotation at the given point; columns are the local axes
    fn rotation(&self, x: &Point3<f64>) -> Matrix2<f64>;
}

/// A local system rotated by a fixed angle about the plate normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantRotation {
    /// Rotation angle in radians
    pub angle: f64,
}

impl LocalSystem for ConstantRotation {
    fn rotation(&self, _x: &Point3<f64>) -> Matrix2<f64> {
        let (s, c) = self.angle.sin_cos();
        Matrix2::new(c, -s, s, c)
    }
}

/// A named block of per-point vector results for one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorBlock {
    /// Result name, e.g. "Pressure"
    pub name: String,
    /// Load/time step identifier
    pub step: usize,
    /// Geometry block number assigned by the sink
    pub geometry_block: usize,
    /// Result block number assigned by the sink
    pub result_block: usize,
    /// Sampled (position, vector) pairs
    pub samples: Vec<(Point3<f64>, Vector3<f64>)>,
}

/// Sink for visualization result blocks
///
/// The running geometry and result block counters are owned by the caller
/// and advanced by each write.
pub trait ResultSink {
    /// Write one named vector result block for the given step
    fn write_vector_block(
        &mut self,
        name: &str,
        step: usize,
        samples: &[(Point3<f64>, Vector3<f64>)],
        geo_blk: &mut usize,
        n_block: &mut usize,
    ) -> FEAResult<()>;
}

/// In-memory sink collecting blocks, for tests and post-processing
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// All blocks written so far, in write order
    pub blocks: Vec<VectorBlock>,
}

impl ResultSink for MemorySink {
    fn write_vector_block(
        &mut self,
        name: &str,
        step: usize,
        samples: &[(Point3<f64>, Vector3<f64>)],
        geo_blk: &mut usize,
        n_block: &mut usize,
    ) -> FEAResult<()> {
        *geo_blk += 1;
        *n_block += 1;
        self.blocks.push(VectorBlock {
            name: name.to_string(),
            step,
            geometry_block: *geo_blk,
            result_block: *n_block,
            samples: samples.to_vec(),
        });
        Ok(())
    }
}
