//! Load field collaborators
//!
//! Pressure loads and analytical reference fields are position- and
//! time-dependent functions owned by the caller. The integrand only borrows
//! them and queries values; any closure with the right signature qualifies.

use nalgebra::{DVector, Point3};

/// Scalar field callable at (position, time), e.g. a surface pressure
pub trait ScalarField: Sync {
    /// Field value at position `x` and time `t`
    fn eval(&self, x: &Point3<f64>, t: f64) -> f64;
}

impl<F> ScalarField for F
where
    F: Fn(&Point3<f64>, f64) -> f64 + Sync,
{
    fn eval(&self, x: &Point3<f64>, t: f64) -> f64 {
        self(x, t)
    }
}

/// A uniform pressure, constant in space and time
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConstantPressure(pub f64);

impl ScalarField for ConstantPressure {
    fn eval(&self, _x: &Point3<f64>, _t: f64) -> f64 {
        self.0
    }
}

/// Analytical stress-resultant field callable at (position, time)
///
/// Returns the moment components in the same ordering the integrand uses
/// for its secondary solution (m_xx for beams; m_xx, m_yy, m_xy for
/// plates).
pub trait StressResultantField: Sync {
    /// Stress resultant components at position `x` and time `t`
    fn eval(&self, x: &Point3<f64>, t: f64) -> DVector<f64>;
}

impl<F> StressResultantField for F
where
    F: Fn(&Point3<f64>, f64) -> DVector<f64> + Sync,
{
    fn eval(&self, x: &Point3<f64>, t: f64) -> DVector<f64> {
        self(x, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_pressure_ignores_position_and_time() {
        let p = ConstantPressure(-1000.0);
        assert_eq!(p.eval(&Point3::new(1.0, 2.0, 0.0), 0.0), -1000.0);
        assert_eq!(p.eval(&Point3::origin(), 7.5), -1000.0);
    }

    #[test]
    fn closures_are_scalar_fields() {
        let ramp = |x: &Point3<f64>, t: f64| x[0] * t;
        assert_eq!(ramp.eval(&Point3::new(2.0, 0.0, 0.0), 3.0), 6.0);
    }
}
