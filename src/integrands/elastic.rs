//! Shared state for elasticity integrands

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::bdf::Bdf2;
use crate::error::{FEAError, FEAResult};
use crate::fe::TimeDomain;
use crate::integral::{ElementMats, MatrixSlots};
use crate::integrands::SolutionMode;

/// Named Newmark time integration coefficients
///
/// `beta` and `gamma` are the classical Newmark parameters; the damping
/// fields add mass- and stiffness-proportional (Rayleigh) damping to the
/// effective operator. With `use_bdf` set, the mass scale comes from the
/// backward-difference step history instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewmarkParams {
    /// Mass-proportional damping factor (alpha_1)
    pub mass_damping: f64,
    /// Stiffness-proportional damping factor (alpha_2)
    pub stiffness_damping: f64,
    /// Newmark beta
    pub beta: f64,
    /// Newmark gamma
    pub gamma: f64,
    /// Derive the mass scale from the BDF step history instead of Newmark
    pub use_bdf: bool,
}

impl Default for NewmarkParams {
    fn default() -> Self {
        Self {
            mass_damping: 0.0,
            stiffness_damping: 0.0,
            beta: 0.25,
            gamma: 0.5,
            use_bdf: false,
        }
    }
}

/// Cross-cutting bookkeeping shared by elasticity integrands
///
/// Owns the gravity vector, the active matrix/vector slot assignment, the
/// time integration coefficients and the step-size history. Concrete
/// integrands embed one of these; all fields are configured up front and
/// read-only during element evaluation.
#[derive(Debug, Clone)]
pub struct ElasticBase {
    gravity: Vector3<f64>,
    mode: SolutionMode,
    slots: MatrixSlots,
    /// Number of consecutive solution vectors tracked per DOF
    n_solutions: usize,
    /// Number of primary field components per node
    components: usize,
    newmark: NewmarkParams,
    bdf: Bdf2,
}

impl ElasticBase {
    /// Create the shared state for an integrand with the given number of
    /// primary field components per node
    pub fn new(components: usize) -> Self {
        Self {
            gravity: Vector3::zeros(),
            mode: SolutionMode::Static,
            slots: MatrixSlots::for_mode(SolutionMode::Static),
            n_solutions: 1,
            components,
            newmark: NewmarkParams::default(),
            bdf: Bdf2::default(),
        }
    }

    /// Define the gravitation vector
    pub fn set_gravity(&mut self, g: Vector3<f64>) {
        self.gravity = g;
    }

    /// Define the gravitation vector from components
    pub fn set_gravity_components(&mut self, gx: f64, gy: f64, gz: f64) {
        self.gravity = Vector3::new(gx, gy, gz);
    }

    /// Current gravitation vector
    pub fn gravity(&self) -> &Vector3<f64> {
        &self.gravity
    }

    /// Define how many consecutive solution vectors are tracked per DOF
    pub fn set_num_solution_vectors(&mut self, n: usize) {
        self.n_solutions = n;
    }

    /// Number of consecutive solution vectors tracked per DOF
    pub fn num_solution_vectors(&self) -> usize {
        self.n_solutions
    }

    /// Define the solution mode before element assembly starts
    ///
    /// This is the only place the slot indices change.
    pub fn set_mode(&mut self, mode: SolutionMode) -> FEAResult<()> {
        let slots = MatrixSlots::for_mode(mode);
        slots.validate()?;
        self.mode = mode;
        self.slots = slots;
        log::debug!("solution mode set to {mode:?}, slots {slots:?}");
        Ok(())
    }

    /// Current solution mode
    pub fn mode(&self) -> SolutionMode {
        self.mode
    }

    /// Active element matrix/vector slot indices
    pub fn slots(&self) -> MatrixSlots {
        self.slots
    }

    /// Define the time integration coefficients
    pub fn set_newmark(&mut self, params: NewmarkParams) {
        self.newmark = params;
    }

    /// Current time integration coefficients
    pub fn newmark(&self) -> &NewmarkParams {
        &self.newmark
    }

    /// Advance the BDF step-size history one step forward
    ///
    /// Purely a history update; `dt` is the new step size and `dtn` the
    /// previous one.
    pub fn advance_step(&mut self, dt: f64, dtn: f64) {
        self.bdf.advance_step(dt, dtn);
    }

    /// Current BDF step history
    pub fn bdf(&self) -> &Bdf2 {
        &self.bdf
    }

    /// Scale factors `(c_m, c_k)` for the effective dynamic operator
    /// `c_k * (K + K_g) + c_m * M` at step size `h`
    pub fn effective_coefs(&self, h: f64) -> FEAResult<(f64, f64)> {
        if h <= 0.0 {
            return Err(FEAError::UnsupportedParameter(format!(
                "non-positive time step {h}"
            )));
        }
        if self.newmark.use_bdf {
            if self.bdf.steps() == 0 {
                return Err(FEAError::UnsupportedParameter(
                    "BDF operator requested with an empty step history".into(),
                ));
            }
            return Ok((self.bdf.coefs()[0], 1.0));
        }
        let NewmarkParams {
            mass_damping,
            stiffness_damping,
            beta,
            gamma,
            ..
        } = self.newmark;
        if beta <= 0.0 {
            return Err(FEAError::UnsupportedParameter(format!(
                "Newmark beta must be positive, got {beta}"
            )));
        }
        let c_m = 1.0 / (beta * h * h) + mass_damping * gamma / (beta * h);
        let c_k = 1.0 + stiffness_damping * gamma / (beta * h);
        Ok((c_m, c_k))
    }

    /// Combine mass, material-stiffness and geometric-stiffness slot
    /// contents into the effective operator in the first matrix slot
    ///
    /// A no-op outside `Dynamic` mode. Fails with `InvalidSlotIndex` when
    /// a required slot is inactive for the current mode.
    pub fn finalize_element(&self, elm: &mut ElementMats, time: &TimeDomain) -> FEAResult<()> {
        if self.mode != SolutionMode::Dynamic || elm.rhs_only {
            return Ok(());
        }
        let MatrixSlots { km, kg, m, .. } = self.slots;
        if km == 0 || m == 0 {
            return Err(FEAError::InvalidSlotIndex(format!(
                "dynamic finalization needs stiffness and mass slots, got km = {km}, m = {m}"
            )));
        }
        let (c_m, c_k) = self.effective_coefs(time.dt)?;
        let mut newton = elm
            .mat(km)
            .ok_or_else(|| FEAError::InvalidSlotIndex(format!("matrix slot {km} missing")))?
            * c_k;
        if kg != 0 {
            if let Some(kgm) = elm.mat(kg) {
                newton += kgm * c_k;
            }
        }
        newton += elm
            .mat(m)
            .ok_or_else(|| FEAError::InvalidSlotIndex(format!("matrix slot {m} missing")))?
            * c_m;
        elm.a[0] = newton;
        Ok(())
    }

    /// Number of primary solution field components
    pub fn num_primary_fields(&self) -> usize {
        self.components
    }

    /// Display label for primary field component `i`
    pub fn primary_field_name(&self, i: usize, prefix: Option<&str>) -> String {
        let name = match i {
            0 => "u_x".to_string(),
            1 => "u_y".to_string(),
            2 => "u_z".to_string(),
            _ => format!("u_{}", i + 1),
        };
        match prefix {
            Some(p) => format!("{p} {name}"),
            None => name,
        }
    }
}
