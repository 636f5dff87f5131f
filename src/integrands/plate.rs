//! Kirchhoff-Love thin plate integrand
//!
//! The formulation expresses bending entirely through the transverse
//! deflection and therefore needs second derivatives of the basis
//! functions. With one space dimension the integrand describes a thin beam
//! of unit width.

use std::sync::Mutex;

use nalgebra::{DMatrix, DVector, Matrix2, Point3, Vector3};

use crate::error::{FEAError, FEAResult};
use crate::fe::{FiniteElement, TimeDomain};
use crate::integral::ElementMats;
use crate::integrands::{
    ElasticBase, ElementIntegrand, Integrand, IntegrandType, KirchhoffLovePlateNorm, SolutionMode,
};
use crate::loads::{ScalarField, StressResultantField};
use crate::material::Material;
use crate::math::bending::{
    bending_compliance_matrix, bending_constitutive_matrix, curvature_b_matrix, num_resultants,
};
use crate::output::{LocalSystem, ResultSink};

type PressureCell = Mutex<Option<(Point3<f64>, f64)>>;

/// Integrand of linear Kirchhoff-Love thin plate problems
///
/// All collaborators (material, pressure field, local system) are borrowed
/// and must outlive every evaluation call. Evaluation methods take `&self`
/// so elements can be processed in parallel; the pressure-value cache is
/// written through per-cell locks at disjoint, externally assigned point
/// indices.
pub struct KirchhoffLovePlate<'a> {
    base: ElasticBase,
    /// Number of space dimensions (1 = beam, 2 = plate)
    nsd: usize,
    thickness: f64,
    material: Option<&'a dyn Material>,
    pressure: Option<&'a dyn ScalarField>,
    local_system: Option<&'a dyn LocalSystem>,
    /// Pressure samples per integration point, for visualization export
    pres_val: Vec<PressureCell>,
}

impl<'a> KirchhoffLovePlate<'a> {
    /// Create a plate integrand for `nsd` space dimensions
    /// (1 = beam, 2 = plate); all collaborators start unset
    pub fn new(nsd: usize) -> Self {
        assert!(nsd == 1 || nsd == 2, "plate integrand needs nsd of 1 or 2");
        Self {
            base: ElasticBase::new(1),
            nsd,
            thickness: 0.1,
            material: None,
            pressure: None,
            local_system: None,
            pres_val: Vec::new(),
        }
    }

    /// Shared elasticity state
    pub fn base(&self) -> &ElasticBase {
        &self.base
    }

    /// Mutable shared elasticity state
    pub fn base_mut(&mut self) -> &mut ElasticBase {
        &mut self.base
    }

    /// Number of space dimensions
    pub fn nsd(&self) -> usize {
        self.nsd
    }

    /// Define the plate thickness
    pub fn set_thickness(&mut self, t: f64) {
        self.thickness = t;
    }

    /// Current plate thickness
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Define the gravitation constant acting along the transverse axis
    pub fn set_gravity(&mut self, g: f64) {
        let mut gv = *self.base.gravity();
        gv[self.transverse_axis()] = g;
        self.base.set_gravity(gv);
    }

    /// Gravitation constant along the transverse axis
    pub fn gravity(&self) -> f64 {
        self.base.gravity()[self.transverse_axis()]
    }

    /// Define the material properties
    pub fn set_material(&mut self, mat: &'a dyn Material) {
        self.material = Some(mat);
    }

    /// Define the pressure field
    pub fn set_pressure(&mut self, p: &'a dyn ScalarField) {
        self.pressure = Some(p);
    }

    /// Define the local coordinate system for stress resultant output
    pub fn set_local_system(&mut self, cs: &'a dyn LocalSystem) {
        self.local_system = Some(cs);
    }

    /// Define the solution mode before element assembly starts
    ///
    /// Also resets the pressure-value cache; `init_integration` must be
    /// called again before evaluations that record pressure.
    pub fn set_mode(&mut self, mode: SolutionMode) -> FEAResult<()> {
        self.base.set_mode(mode)?;
        for cell in &mut self.pres_val {
            *cell = Mutex::new(None);
        }
        Ok(())
    }

    /// Initialize the integrand with the total number of interior (`n_gp`)
    /// and boundary (`n_bp`) integration points
    pub fn init_integration(&mut self, n_gp: usize, n_bp: usize) {
        self.pres_val = (0..n_gp + n_bp).map(|_| Mutex::new(None)).collect();
    }

    /// Log the problem definition
    pub fn log_definition(&self) {
        log::info!(
            "Kirchhoff-Love {}: thickness {}, gravity {}, material {}, pressure {}",
            if self.nsd == 1 { "beam" } else { "plate" },
            self.thickness,
            self.gravity(),
            if self.material.is_some() { "set" } else { "unset" },
            if self.pressure.is_some() { "set" } else { "unset" },
        );
    }

    /// Index of the transverse (deflection) axis: y for beams, z for plates
    fn transverse_axis(&self) -> usize {
        self.nsd
    }

    /// Evaluate the pressure field (zero if unset)
    pub fn pressure_at(&self, x: &Point3<f64>, t: f64) -> f64 {
        self.pressure.map_or(0.0, |p| p.eval(x, t))
    }

    /// Whether an external load (gravity or pressure) is defined
    pub fn has_loads(&self) -> bool {
        self.gravity() != 0.0 || self.pressure.is_some()
    }

    /// Whether any pressure values have been cached for export
    pub fn has_traction_values(&self) -> bool {
        self.pres_val
            .iter()
            .any(|cell| cell.lock().unwrap_or_else(|e| e.into_inner()).is_some())
    }

    /// Set up the bending constitutive matrix at the given point
    ///
    /// With `inverse` set, the compliance matrix (recovering curvatures
    /// from moments) is established instead.
    pub fn constitutive_matrix(&self, x: &Point3<f64>, inverse: bool) -> FEAResult<DMatrix<f64>> {
        let mat = self.material.ok_or(FEAError::MissingMaterial)?;
        let (e, nu) = (mat.young(x), mat.poisson(x));
        if inverse {
            bending_compliance_matrix(e, nu, self.thickness, self.nsd)
        } else {
            Ok(bending_constitutive_matrix(e, nu, self.thickness, self.nsd))
        }
    }

    /// Curvature-displacement matrix B at the current point
    pub fn b_matrix(&self, fe: &FiniteElement) -> FEAResult<DMatrix<f64>> {
        curvature_b_matrix(&fe.d2n_dx2, self.nsd)
    }

    /// Mass per unit area `rho * t` at the given point
    fn mass_coefficient(&self, x: &Point3<f64>) -> FEAResult<f64> {
        let mat = self.material.ok_or(FEAError::MissingMaterial)?;
        Ok(mat.density(x) * self.thickness)
    }

    /// Record a pressure sample at the global integration point index
    fn record_pressure(&self, ip: usize, x: &Point3<f64>, p: f64) {
        if let Some(cell) = self.pres_val.get(ip) {
            *cell.lock().unwrap_or_else(|e| e.into_inner()) = Some((*x, p));
        } else {
            log::debug!("pressure sample at point {ip} dropped, cache holds {}", self.pres_val.len());
        }
    }

    /// Evaluate the secondary solution (stress resultants) from an element
    /// solution vector
    ///
    /// Curvatures come from the B matrix, moments from the constitutive
    /// matrix. With `to_local` set and a local system defined, the result
    /// is rotated into the local frame.
    pub fn eval_sol_vec(
        &self,
        ev: &DVector<f64>,
        fe: &FiniteElement,
        x: &Point3<f64>,
        to_local: bool,
    ) -> FEAResult<DVector<f64>> {
        if ev.len() != fe.nen() {
            return Err(FEAError::UnsupportedParameter(format!(
                "element solution has {} entries, expected {}",
                ev.len(),
                fe.nen()
            )));
        }
        let b = self.b_matrix(fe)?;
        let c = self.constitutive_matrix(x, false)?;
        let kappa = &b * ev;
        let mut m = &c * &kappa;

        if to_local && self.nsd == 2 {
            if let Some(cs) = self.local_system {
                let t = cs.rotation(x);
                let mt = Matrix2::new(m[0], m[2], m[2], m[1]);
                let ml = t.transpose() * mt * t;
                m[0] = ml[(0, 0)];
                m[1] = ml[(1, 1)];
                m[2] = ml[(0, 1)];
            }
        }
        Ok(m)
    }

    /// Evaluate the secondary solution at a result point, gathering the
    /// element solution from `solution` through the nodal correspondence
    /// `mnpc`; transforms to the local system when one is defined
    pub fn eval_sol(
        &self,
        fe: &FiniteElement,
        x: &Point3<f64>,
        mnpc: &[usize],
        solution: &DVector<f64>,
    ) -> FEAResult<DVector<f64>> {
        let mut ev = DVector::zeros(mnpc.len());
        for (i, &node) in mnpc.iter().enumerate() {
            ev[i] = *solution.get(node).ok_or_else(|| {
                FEAError::UnsupportedParameter(format!(
                    "nodal index {node} outside solution vector of length {}",
                    solution.len()
                ))
            })?;
        }
        self.eval_sol_vec(&ev, fe, x, true)
    }

    /// Write cached surface pressure samples for a time step as a vector
    /// result block; returns `Ok(false)` when nothing has been cached
    pub fn write_traction_values(
        &self,
        sink: &mut dyn ResultSink,
        step: usize,
        geo_blk: &mut usize,
        n_block: &mut usize,
    ) -> FEAResult<bool> {
        let mut axis = Vector3::zeros();
        axis[self.transverse_axis()] = 1.0;
        let samples: Vec<(Point3<f64>, Vector3<f64>)> = self
            .pres_val
            .iter()
            .filter_map(|cell| *cell.lock().unwrap_or_else(|e| e.into_inner()))
            .map(|(x, p)| (x, axis * p))
            .collect();
        if samples.is_empty() {
            return Ok(false);
        }
        sink.write_vector_block("Pressure", step, &samples, geo_blk, n_block)?;
        Ok(true)
    }

    /// Paired integrand evaluating energy and error norms for this plate
    ///
    /// `anasol` is an optional analytical stress-resultant field.
    pub fn norm_integrand<'b>(
        &'b self,
        anasol: Option<&'b dyn StressResultantField>,
    ) -> KirchhoffLovePlateNorm<'b>
    where
        'a: 'b,
    {
        KirchhoffLovePlateNorm::new(self, anasol)
    }

    /// Number of primary (`fld = 1`) or secondary (`fld = 2`) solution
    /// field components
    pub fn num_fields(&self, fld: usize) -> usize {
        match fld {
            1 => 1,
            2 => num_resultants(self.nsd),
            _ => 0,
        }
    }

    /// Name of the primary solution field (the deflection)
    pub fn primary_field_name(&self, prefix: Option<&str>) -> String {
        match prefix {
            Some(p) => format!("{p} w"),
            None => "w".to_string(),
        }
    }

    /// Name of secondary solution field component `i`
    pub fn secondary_field_name(&self, i: usize, prefix: Option<&str>) -> String {
        let name = ["m_xx", "m_yy", "m_xy"]
            .get(i)
            .copied()
            .unwrap_or("m_?");
        match prefix {
            Some(p) => format!("{p} {name}"),
            None => name.to_string(),
        }
    }
}

impl Integrand for KirchhoffLovePlate<'_> {
    fn integrand_type(&self) -> IntegrandType {
        IntegrandType::SecondDerivatives
    }

    fn derivative_order(&self) -> usize {
        2
    }
}

impl ElementIntegrand for KirchhoffLovePlate<'_> {
    fn new_local_integral(&self, nen: usize, neumann: bool) -> ElementMats {
        let slots = self.base.slots();
        let ndof = nen * self.base.num_primary_fields();
        if neumann {
            let mut elm = ElementMats::new(0, slots.s, ndof);
            elm.rhs_only = true;
            elm
        } else {
            ElementMats::new(slots.num_mats(), slots.num_vecs(), ndof)
        }
    }

    fn eval_int(
        &self,
        elm: &mut ElementMats,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
    ) -> FEAResult<()> {
        let slots = self.base.slots();

        if slots.m != 0 && elm.mat(slots.m).is_some() {
            let coef = self.mass_coefficient(x)? * fe.det_jxw;
            elm.mat_mut(slots.m).unwrap().ger(coef, &fe.n, &fe.n, 1.0);
        }

        let want_stiffness = slots.km != 0 && elm.mat(slots.km).is_some();
        let want_int_force =
            slots.fi != 0 && elm.vec(slots.fi).is_some() && !elm.sol.is_empty();
        if want_stiffness || want_int_force {
            let b = self.b_matrix(fe)?;
            let c = self.constitutive_matrix(x, false)?;
            if want_stiffness {
                let cb = &c * &b;
                let ek = elm.mat_mut(slots.km).unwrap();
                ek.gemm_tr(fe.det_jxw, &b, &cb, 1.0);
            }
            if want_int_force {
                let contrib = {
                    let ev = &elm.sol[0];
                    if ev.len() != fe.nen() {
                        return Err(FEAError::UnsupportedParameter(format!(
                            "element solution has {} entries, expected {}",
                            ev.len(),
                            fe.nen()
                        )));
                    }
                    let m = &c * (&b * ev);
                    b.tr_mul(&m) * fe.det_jxw
                };
                *elm.vec_mut(slots.fi).unwrap() += contrib;
            }
        }

        if slots.s != 0 && elm.vec(slots.s).is_some() {
            let g = self.gravity();
            if g != 0.0 {
                let mat = self.material.ok_or(FEAError::MissingMaterial)?;
                let coef = mat.density(x) * self.thickness * g * fe.det_jxw;
                elm.vec_mut(slots.s).unwrap().axpy(coef, &fe.n, 1.0);
            }
            if let Some(p) = self.pressure {
                let pv = p.eval(x, time.t);
                elm.vec_mut(slots.s).unwrap().axpy(pv * fe.det_jxw, &fe.n, 1.0);
                self.record_pressure(fe.ip, x, pv);
            }
        }
        Ok(())
    }

    fn eval_bou(
        &self,
        elm: &mut ElementMats,
        fe: &FiniteElement,
        time: &TimeDomain,
        x: &Point3<f64>,
        _normal: &Vector3<f64>,
    ) -> FEAResult<()> {
        // boundary points carry load terms only
        let slots = self.base.slots();
        if slots.s == 0 || elm.vec(slots.s).is_none() {
            return Ok(());
        }
        if let Some(p) = self.pressure {
            let pv = p.eval(x, time.t);
            elm.vec_mut(slots.s).unwrap().axpy(pv * fe.det_jxw, &fe.n, 1.0);
            self.record_pressure(fe.ip, x, pv);
        }
        Ok(())
    }

    fn finalize_element(&self, elm: &mut ElementMats, time: &TimeDomain) -> FEAResult<()> {
        self.base.finalize_element(elm, time)
    }
}
