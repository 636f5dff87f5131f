//! Cantilever-grade verification of the beam bending integrand
//!
//! Integrates the element stiffness of a two-node Hermite beam with
//! 2-point Gauss quadrature and compares against the closed-form
//! Euler-Bernoulli stiffness matrix. The basis data is supplied exactly as
//! an isogeometric assembler would: values, first and second derivatives,
//! and the weighted Jacobian determinant per integration point.

use approx::assert_relative_eq;
use nalgebra::{DMatrix, DVector, Point3};
use plate_fea::prelude::*;

/// Hermite cubic basis on [0, len] at parameter s = x / len
///
/// Four basis functions: deflection and slope at each end node.
fn hermite_fe(len: f64, s: f64, det_jxw: f64) -> FiniteElement {
    let l = len;
    let mut fe = FiniteElement::new(4, 1);
    fe.det_jxw = det_jxw;
    fe.n = DVector::from_vec(vec![
        1.0 - 3.0 * s * s + 2.0 * s * s * s,
        l * (s - 2.0 * s * s + s * s * s),
        3.0 * s * s - 2.0 * s * s * s,
        l * (-s * s + s * s * s),
    ]);
    fe.dn_dx = DMatrix::from_vec(4, 1, vec![
        (-6.0 * s + 6.0 * s * s) / l,
        1.0 - 4.0 * s + 3.0 * s * s,
        (6.0 * s - 6.0 * s * s) / l,
        -2.0 * s + 3.0 * s * s,
    ]);
    fe.d2n_dx2 = DMatrix::from_vec(4, 1, vec![
        (-6.0 + 12.0 * s) / (l * l),
        (-4.0 + 6.0 * s) / l,
        (6.0 - 12.0 * s) / (l * l),
        (-2.0 + 6.0 * s) / l,
    ]);
    fe
}

/// 2-point Gauss rule on [0, 1] as (parameter, weight) pairs
fn gauss2() -> [(f64, f64); 2] {
    let gp = 1.0 / (2.0 * 3.0_f64.sqrt());
    [(0.5 - gp, 0.5), (0.5 + gp, 0.5)]
}

#[test]
fn hermite_beam_stiffness_matches_euler_bernoulli() {
    let _ = env_logger::builder().is_test(true).try_init();

    // E t^3 / 12 = EI for a unit-width strip
    let mat = Isotropic::new(12.0e9, 0.0, 7850.0);
    let len = 2.5;
    let t: f64 = 0.1;
    let ei = mat.e * t.powi(3) / 12.0;

    let mut beam = KirchhoffLovePlate::new(1);
    beam.set_material(&mat);
    beam.set_thickness(t);
    beam.set_mode(SolutionMode::Static).unwrap();
    beam.log_definition();

    let mut elm = beam.new_local_integral(4, false);
    for (ip, (s, w)) in gauss2().into_iter().enumerate() {
        let mut fe = hermite_fe(len, s, w * len);
        fe.ip = ip;
        beam.eval_int(&mut elm, &fe, &TimeDomain::stationary(), &Point3::new(s * len, 0.0, 0.0))
            .unwrap();
    }

    let k = elm.mat(beam.base().slots().km).unwrap();
    let c = ei / len.powi(3);
    let expect = DMatrix::from_row_slice(4, 4, &[
        12.0 * c, 6.0 * len * c, -12.0 * c, 6.0 * len * c,
        6.0 * len * c, 4.0 * len * len * c, -6.0 * len * c, 2.0 * len * len * c,
        -12.0 * c, -6.0 * len * c, 12.0 * c, -6.0 * len * c,
        6.0 * len * c, 2.0 * len * len * c, -6.0 * len * c, 4.0 * len * len * c,
    ]);

    for i in 0..4 {
        for j in 0..4 {
            assert_relative_eq!(k[(i, j)], expect[(i, j)], max_relative = 1e-10, epsilon = c * 1e-10);
        }
    }
}

#[test]
fn uniform_load_gives_consistent_end_forces() {
    let mat = Isotropic::new(12.0e9, 0.0, 7850.0);
    let pressure = ConstantPressure(-5000.0);
    let len = 2.0;

    let mut beam = KirchhoffLovePlate::new(1);
    beam.set_material(&mat);
    beam.set_thickness(0.1);
    beam.set_pressure(&pressure);
    beam.set_mode(SolutionMode::Static).unwrap();
    beam.init_integration(2, 0);

    let mut elm = beam.new_local_integral(4, false);
    for (ip, (s, w)) in gauss2().into_iter().enumerate() {
        let mut fe = hermite_fe(len, s, w * len);
        fe.ip = ip;
        beam.eval_int(&mut elm, &fe, &TimeDomain::stationary(), &Point3::new(s * len, 0.0, 0.0))
            .unwrap();
    }

    // consistent load vector of a uniform line load q on a Hermite beam:
    // [q L/2, q L^2/12, q L/2, -q L^2/12]
    let q = -5000.0;
    let s = elm.vec(beam.base().slots().s).unwrap();
    assert_relative_eq!(s[0], q * len / 2.0, max_relative = 1e-10);
    assert_relative_eq!(s[1], q * len * len / 12.0, max_relative = 1e-10);
    assert_relative_eq!(s[2], q * len / 2.0, max_relative = 1e-10);
    assert_relative_eq!(s[3], -q * len * len / 12.0, max_relative = 1e-10);
}

#[test]
fn quadratic_deflection_recovers_a_constant_moment() {
    let mat = Isotropic::new(12.0e9, 0.0, 7850.0);
    let len = 2.5;
    let t: f64 = 0.1;
    let ei = mat.e * t.powi(3) / 12.0;

    let mut beam = KirchhoffLovePlate::new(1);
    beam.set_material(&mat);
    beam.set_thickness(t);

    // w = x^2/2: nodal values [w(0), w'(0), w(L), w'(L)]
    let ev = DVector::from_vec(vec![0.0, 0.0, len * len / 2.0, len]);
    for (s, _) in gauss2() {
        let fe = hermite_fe(len, s, 1.0);
        let x = Point3::new(s * len, 0.0, 0.0);
        let m = beam.eval_sol_vec(&ev, &fe, &x, false).unwrap();
        assert_eq!(m.len(), 1);
        assert_relative_eq!(m[0], ei, max_relative = 1e-9);
    }
}

#[test]
fn dynamic_mode_produces_an_effective_operator() {
    let mat = Isotropic::new(12.0e9, 0.0, 7850.0);
    let len = 2.0;

    let mut beam = KirchhoffLovePlate::new(1);
    beam.set_material(&mat);
    beam.set_thickness(0.1);
    beam.set_mode(SolutionMode::Dynamic).unwrap();
    beam.base_mut().set_newmark(NewmarkParams {
        beta: 0.25,
        gamma: 0.5,
        ..NewmarkParams::default()
    });

    let slots = beam.base().slots();
    let mut elm = beam.new_local_integral(4, false);
    for (ip, (s, w)) in gauss2().into_iter().enumerate() {
        let mut fe = hermite_fe(len, s, w * len);
        fe.ip = ip;
        beam.eval_int(&mut elm, &fe, &TimeDomain::new(0.0, 0.01), &Point3::new(s * len, 0.0, 0.0))
            .unwrap();
    }
    beam.finalize_element(&mut elm, &TimeDomain::new(0.0, 0.01)).unwrap();

    // N = c_k K + c_m M with c_k = 1, c_m = 1/(beta dt^2)
    let c_m = 1.0 / (0.25 * 0.01 * 0.01);
    let k = elm.mat(slots.km).unwrap();
    let m = elm.mat(slots.m).unwrap();
    let newton = elm.newton().unwrap();
    for i in 0..4 {
        for j in 0..4 {
            assert_relative_eq!(
                newton[(i, j)],
                k[(i, j)] + c_m * m[(i, j)],
                max_relative = 1e-10,
                epsilon = 1e-6,
            );
        }
    }
}
