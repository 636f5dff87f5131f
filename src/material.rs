//! Material properties

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Point-wise provider of elastic material data
///
/// The integrand borrows the material and never releases it; the caller
/// keeps it alive for the duration of every evaluation call. `Sync` is
/// required so elements can be evaluated in parallel.
pub trait Material: Sync {
    /// Modulus of elasticity (Young's modulus) at a point, in Pa
    fn young(&self, x: &Point3<f64>) -> f64;
    /// Poisson's ratio at a point
    fn poisson(&self, x: &Point3<f64>) -> f64;
    /// Mass density at a point, in kg/m3
    fn density(&self, x: &Point3<f64>) -> f64;
}

/// Homogeneous isotropic material
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Isotropic {
    /// Modulus of elasticity in Pa
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m3
    pub rho: f64,
}

impl Isotropic {
    /// Create a new isotropic material from E, nu and density
    pub fn new(e: f64, nu: f64, rho: f64) -> Self {
        Self { e, nu, rho }
    }

    /// Shear modulus, G = E / (2 * (1 + nu))
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }

    /// Standard structural steel
    pub fn steel() -> Self {
        Self::new(200e9, 0.3, 7850.0)
    }

    /// Aluminum (6061-T6)
    pub fn aluminum() -> Self {
        Self::new(68.9e9, 0.33, 2700.0)
    }
}

impl Default for Isotropic {
    fn default() -> Self {
        Self::steel()
    }
}

impl Material for Isotropic {
    fn young(&self, _x: &Point3<f64>) -> f64 {
        self.e
    }

    fn poisson(&self, _x: &Point3<f64>) -> f64 {
        self.nu
    }

    fn density(&self, _x: &Point3<f64>) -> f64 {
        self.rho
    }
}
