//! Variable-step BDF history for second time derivatives
//!
//! Tracks the two most recent step sizes and exposes the backward
//! difference coefficients approximating d2u/dt2 at the new time level.
//! The coefficients are a pure function of the step-size history; nothing
//! else feeds into them.

use serde::{Deserialize, Serialize};

/// Second-derivative backward difference scheme of order up to 2
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bdf2 {
    dt: f64,
    dtn: f64,
    steps: usize,
}

impl Bdf2 {
    /// Advance the scheme one step: `dt` is the new step size, `dtn` the
    /// previous one
    pub fn advance_step(&mut self, dt: f64, dtn: f64) {
        self.dt = dt;
        self.dtn = dtn;
        self.steps += 1;
    }

    /// Number of steps advanced so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Current scheme order (1 on the first step, 2 afterwards)
    pub fn order(&self) -> usize {
        self.steps.min(2)
    }

    /// Backward difference coefficients for d2u/dt2, ordered from the new
    /// time level backwards: `c[0]*u_{n+1} + c[1]*u_n + c[2]*u_{n-1}`
    ///
    /// For uniform steps h the order-2 coefficients reduce to
    /// `[1, -2, 1] / h^2`.
    pub fn coefs(&self) -> [f64; 3] {
        match self.order() {
            0 => [0.0; 3],
            1 => {
                let h2 = self.dt * self.dt;
                [1.0 / h2, -1.0 / h2, 0.0]
            }
            _ => {
                let (h1, h2) = (self.dt, self.dtn);
                [
                    2.0 / (h1 * (h1 + h2)),
                    -2.0 / (h1 * h2),
                    2.0 / (h2 * (h1 + h2)),
                ]
            }
        }
    }
}
