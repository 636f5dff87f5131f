//! Energy and error norms for the Kirchhoff-Love plate integrand

use nalgebra::{Point3, Vector3};

use crate::error::{FEAError, FEAResult};
use crate::fe::{FiniteElement, TimeDomain};
use crate::integral::NormVals;
use crate::integrands::{Integrand, IntegrandType, KirchhoffLovePlate, NormIntegrand};
use crate::loads::StressResultantField;

/// Accumulator layout: solution norms first, error norms when an
/// analytical field is available
mod idx {
    /// Energy norm a(w^h, w^h)
    pub const ENERGY: usize = 0;
    /// External energy (p, w^h)
    pub const EXTERNAL: usize = 1;
    /// L2 norm of the numerical moments
    pub const MOMENT_L2: usize = 2;
    /// Exact energy norm a(w, w), via the compliance matrix
    pub const EXACT_ENERGY: usize = 3;
    /// Energy norm of the error a(e, e)
    pub const ERROR_ENERGY: usize = 4;
    /// L2 norm of the exact moments
    pub const EXACT_MOMENT_L2: usize = 5;
    /// Effectivity index, filled in by element finalization
    pub const EFFECTIVITY: usize = 6;
    /// Total accumulator count
    pub const COUNT: usize = 7;
}

const GROUP_SIZES: [usize; 2] = [3, 4];

const SOLUTION_NAMES: [&str; 3] = ["a(w^h,w^h)^0.5", "(p,w^h)^0.5", "|m^h|_L2"];
const ERROR_NAMES: [&str; 4] = [
    "a(w,w)^0.5",
    "a(e,e)^0.5, e=w-w^h",
    "|m|_L2",
    "effectivity index",
];

/// Integrand of Kirchhoff-Love energy and error norms
///
/// Recomputes curvatures and moments from the element solution using the
/// parent plate integrand's operators and accumulates squared partial sums
/// per element. The optional analytical stress-resultant field enables the
/// error norms and the effectivity index.
pub struct KirchhoffLovePlateNorm<'a> {
    plate: &'a KirchhoffLovePlate<'a>,
    anasol: Option<&'a dyn StressResultantField>,
}

impl<'a> KirchhoffLovePlateNorm<'a> {
    /// Create the norm integrand for a plate problem, optionally with an
    /// analytical stress-resultant field
    pub fn new(
        plate: &'a KirchhoffLovePlate<'a>,
        anasol: Option<&'a dyn StressResultantField>,
    ) -> Self {
        Self { plate, anasol }
    }

    /// Whether an analytical reference field is available
    pub fn has_reference(&self) -> bool {
        self.anasol.is_some()
    }
}

impl Integrand for KirchhoffLovePlateNorm<'_> {
    fn integrand_type(&self) -> IntegrandType {
        IntegrandType::SecondDerivatives
    }

    fn derivative_order(&self) -> usize {
        2
    }

    fn has_boundary_terms(&self) -> bool {
        true
    }
}

impl NormIntegrand for KirchhoffLovePlateNorm<'_> {
    fn new_local_integral(&self) -> NormVals {
        NormVals::new(idx::COUNT)
    }

    fn eval_int(
        &self,
        nv: &mut NormVals,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
    ) -> FEAResult<()> {
        if nv.sol.len() != fe.nen() {
            return Err(FEAError::UnsupportedParameter(format!(
                "element solution has {} entries, expected {}",
                nv.sol.len(),
                fe.nen()
            )));
        }
        let b = self.plate.b_matrix(fe)?;
        let c = self.plate.constitutive_matrix(x, false)?;
        let kappa = &b * &nv.sol;
        let m = &c * &kappa;
        let w = fe.n.dot(&nv.sol);
        let p = self.plate.pressure_at(x, time.t);

        nv.values[idx::ENERGY] += m.dot(&kappa) * fe.det_jxw;
        nv.values[idx::EXTERNAL] += p * w * fe.det_jxw;
        nv.values[idx::MOMENT_L2] += m.dot(&m) * fe.det_jxw;

        if let Some(ana) = self.anasol {
            let m_exact = ana.eval(x, time.t);
            if m_exact.len() != m.len() {
                return Err(FEAError::UnsupportedParameter(format!(
                    "analytical field has {} components, expected {}",
                    m_exact.len(),
                    m.len()
                )));
            }
            let s = self.plate.constitutive_matrix(x, true)?;
            let err = &m_exact - &m;
            nv.values[idx::EXACT_ENERGY] += m_exact.dot(&(&s * &m_exact)) * fe.det_jxw;
            nv.values[idx::ERROR_ENERGY] += err.dot(&(&s * &err)) * fe.det_jxw;
            nv.values[idx::EXACT_MOMENT_L2] += m_exact.dot(&m_exact) * fe.det_jxw;
        }
        Ok(())
    }

    fn eval_bou(
        &self,
        nv: &mut NormVals,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
        _normal: &Vector3<f64>,
    ) -> FEAResult<()> {
        if nv.sol.len() != fe.nen() {
            return Err(FEAError::UnsupportedParameter(format!(
                "element solution has {} entries, expected {}",
                nv.sol.len(),
                fe.nen()
            )));
        }
        // boundary pressure contributes to the external energy only
        let p = self.plate.pressure_at(x, time.t);
        if p != 0.0 {
            let w = fe.n.dot(&nv.sol);
            nv.values[idx::EXTERNAL] += p * w * fe.det_jxw;
        }
        Ok(())
    }

    /// Derive the effectivity index from the accumulated sums
    ///
    /// The error estimate is the Galerkin gap `|a(w,w) - a(w^h,w^h)|^0.5`;
    /// the index relates it to the true error energy. Returns `false` when
    /// the prerequisite sums are absent (no analytical field, or a
    /// vanishing true error).
    fn finalize_element(&self, nv: &mut NormVals) -> bool {
        if self.anasol.is_none() {
            return false;
        }
        let true_err = nv.values[idx::ERROR_ENERGY];
        if true_err <= 0.0 {
            return false;
        }
        let estimate = (nv.values[idx::EXACT_ENERGY] - nv.values[idx::ENERGY]).abs();
        nv.values[idx::EFFECTIVITY] = (estimate / true_err).sqrt();
        true
    }

    fn num_fields(&self, group: usize) -> usize {
        match group {
            0 => {
                if self.anasol.is_some() {
                    2
                } else {
                    1
                }
            }
            1 => GROUP_SIZES[0],
            2 => {
                if self.anasol.is_some() {
                    GROUP_SIZES[1]
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    fn norm_name(&self, group: usize, j: usize, prefix: Option<&str>) -> String {
        let name = match group {
            1 => SOLUTION_NAMES.get(j.wrapping_sub(1)).copied(),
            2 => ERROR_NAMES.get(j.wrapping_sub(1)).copied(),
            _ => None,
        }
        .unwrap_or("?");
        match prefix {
            Some(p) => format!("{p} {name}"),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::ConstantPressure;
    use crate::material::Isotropic;
    use approx::assert_relative_eq;
    use nalgebra::{DMatrix, DVector};

    /// One-dimensional quadratic Lagrange basis on [0, len]
    fn quadratic_beam_fe(len: f64, x: f64, det_jxw: f64) -> FiniteElement {
        let s = x / len;
        let mut fe = FiniteElement::new(3, 1);
        fe.det_jxw = det_jxw;
        fe.n = DVector::from_vec(vec![
            2.0 * s * s - 3.0 * s + 1.0,
            -4.0 * s * s + 4.0 * s,
            2.0 * s * s - s,
        ]);
        fe.dn_dx = DMatrix::from_vec(3, 1, vec![
            (4.0 * s - 3.0) / len,
            (-8.0 * s + 4.0) / len,
            (4.0 * s - 1.0) / len,
        ]);
        fe.d2n_dx2 = DMatrix::from_vec(3, 1, vec![
            4.0 / (len * len),
            -8.0 / (len * len),
            4.0 / (len * len),
        ]);
        fe
    }

    /// Nodal values of w = x^2/2 at the three nodes of [0, len]
    fn parabolic_sol(len: f64) -> DVector<f64> {
        DVector::from_vec(vec![0.0, (len / 2.0) * (len / 2.0) / 2.0, len * len / 2.0])
    }

    fn beam_with_steel() -> (KirchhoffLovePlate<'static>, f64) {
        static MAT: Isotropic = Isotropic { e: 12.0, nu: 0.0, rho: 1.0 };
        let mut beam = KirchhoffLovePlate::new(1);
        beam.set_material(&MAT);
        beam.set_thickness(1.0);
        // flexural rigidity E t^3 / 12 = 1
        (beam, 1.0)
    }

    #[test]
    fn exact_solution_has_zero_error() {
        let (beam, rigidity) = beam_with_steel();
        let exact = |_x: &Point3<f64>, _t: f64| DVector::from_vec(vec![rigidity]);
        let norm = beam.norm_integrand(Some(&exact));

        let mut nv = NormIntegrand::new_local_integral(&norm);
        nv.sol = parabolic_sol(2.0);

        // 2-point Gauss on [0, 2]
        let gp = 1.0 / 3.0_f64.sqrt();
        for &xi in &[0.5 - gp / 2.0, 0.5 + gp / 2.0] {
            let fe = quadratic_beam_fe(2.0, 2.0 * xi, 1.0);
            norm.eval_int(&mut nv, &fe, &TimeDomain::stationary(), &Point3::new(2.0 * xi, 0.0, 0.0))
                .unwrap();
        }

        // w = x^2/2 gives kappa = 1, m = 1: energy = len, error = 0
        assert_relative_eq!(nv.values[idx::ENERGY], 2.0, max_relative = 1e-12);
        assert_relative_eq!(nv.values[idx::EXACT_ENERGY], 2.0, max_relative = 1e-12);
        assert_relative_eq!(nv.values[idx::MOMENT_L2], 2.0, max_relative = 1e-12);
        assert!(nv.values[idx::ERROR_ENERGY].abs() < 1e-20);

        // vanishing true error: the effectivity index cannot be formed
        assert!(!norm.finalize_element(&mut nv));
    }

    #[test]
    fn perturbed_solution_yields_an_effectivity_index() {
        let (beam, rigidity) = beam_with_steel();
        let exact = |_x: &Point3<f64>, _t: f64| DVector::from_vec(vec![rigidity]);
        let norm = beam.norm_integrand(Some(&exact));

        let mut nv = NormIntegrand::new_local_integral(&norm);
        let mut sol = parabolic_sol(2.0);
        sol[1] += 0.05;
        nv.sol = sol;

        let gp = 1.0 / 3.0_f64.sqrt();
        for &xi in &[0.5 - gp / 2.0, 0.5 + gp / 2.0] {
            let fe = quadratic_beam_fe(2.0, 2.0 * xi, 1.0);
            norm.eval_int(&mut nv, &fe, &TimeDomain::stationary(), &Point3::new(2.0 * xi, 0.0, 0.0))
                .unwrap();
        }
        assert!(nv.values[idx::ERROR_ENERGY] > 0.0);
        assert!(norm.finalize_element(&mut nv));
        let eta = nv.values[idx::EFFECTIVITY];
        assert!(eta.is_finite() && eta > 0.0);
    }

    #[test]
    fn no_reference_field_means_one_group() {
        let (beam, _) = beam_with_steel();
        let norm = beam.norm_integrand(None);
        assert_eq!(norm.num_fields(0), 1);
        assert_eq!(norm.num_fields(1), 3);
        assert_eq!(norm.num_fields(2), 0);
        assert!(!norm.has_reference());

        let mut nv = NormIntegrand::new_local_integral(&norm);
        nv.sol = parabolic_sol(2.0);
        assert!(!norm.finalize_element(&mut nv));
    }

    #[test]
    fn external_energy_uses_the_pressure_field() {
        let (mut beam, _) = beam_with_steel();
        static P: ConstantPressure = ConstantPressure(3.0);
        beam.set_pressure(&P);
        let norm = beam.norm_integrand(None);

        let mut nv = NormIntegrand::new_local_integral(&norm);
        nv.sol = DVector::from_vec(vec![1.0, 1.0, 1.0]); // w = 1 everywhere

        let fe = quadratic_beam_fe(2.0, 1.0, 2.0);
        norm.eval_int(&mut nv, &fe, &TimeDomain::stationary(), &Point3::new(1.0, 0.0, 0.0))
            .unwrap();
        // p * w * detJxW = 3 * 1 * 2
        assert_relative_eq!(nv.values[idx::EXTERNAL], 6.0, max_relative = 1e-12);

        // boundary contribution accumulates into the same sum
        let fe_b = quadratic_beam_fe(2.0, 0.0, 0.5);
        norm.eval_bou(
            &mut nv,
            &fe_b,
            &TimeDomain::stationary(),
            &Point3::origin(),
            &Vector3::new(-1.0, 0.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(nv.values[idx::EXTERNAL], 6.0 + 1.5, max_relative = 1e-12);
    }

    #[test]
    fn norm_names_are_deterministic() {
        let (beam, _) = beam_with_steel();
        let norm = beam.norm_integrand(None);
        assert_eq!(norm.norm_name(1, 1, None), "a(w^h,w^h)^0.5");
        assert_eq!(norm.norm_name(2, 4, None), "effectivity index");
        assert_eq!(norm.norm_name(1, 3, Some("plate")), "plate |m^h|_L2");
        assert_eq!(norm.norm_name(3, 1, None), "?");
    }

    #[test]
    fn norm_integrand_needs_second_derivatives() {
        let (beam, _) = beam_with_steel();
        let norm = beam.norm_integrand(None);
        assert_eq!(norm.integrand_type(), IntegrandType::SecondDerivatives);
        assert!(norm.has_boundary_terms());
    }

    #[test]
    fn mismatched_solution_vector_is_rejected() {
        let (beam, _) = beam_with_steel();
        let norm = beam.norm_integrand(None);
        let mut nv = NormIntegrand::new_local_integral(&norm);
        nv.sol = DVector::zeros(2);
        let fe = quadratic_beam_fe(2.0, 1.0, 1.0);
        let err = norm.eval_int(&mut nv, &fe, &TimeDomain::stationary(), &Point3::origin());
        assert!(matches!(err, Err(FEAError::UnsupportedParameter(_))));
    }
}
