//! Element-parallel evaluation contract
//!
//! Elements are evaluated concurrently with no coordination: configuration
//! is frozen before the parallel region, each thread owns its element's
//! local integral, and the pressure cache is written at disjoint global
//! point indices. Reading the cache only happens after the parallel region
//! (the caller's barrier).

use nalgebra::{DMatrix, DVector, Point3};
use plate_fea::prelude::*;
use rayon::prelude::*;

const ELEMS: usize = 8;
const POINTS_PER_ELEM: usize = 4;

/// Minimal one-basis-function point data; each element covers a distinct
/// range of global point indices
fn point_fe(ip: usize) -> FiniteElement {
    let mut fe = FiniteElement::new(1, 2);
    fe.ip = ip;
    fe.n = DVector::from_element(1, 1.0);
    fe.d2n_dx2 = DMatrix::from_row_slice(1, 4, &[1.0, 0.5, 0.5, 1.0]);
    fe.det_jxw = 0.25;
    fe
}

fn eval_element(plate: &KirchhoffLovePlate, elem: usize) -> ElementMats {
    let mut elm = plate.new_local_integral(1, false);
    for p in 0..POINTS_PER_ELEM {
        let ip = elem * POINTS_PER_ELEM + p;
        let x = Point3::new(ip as f64, 0.0, 0.0);
        plate
            .eval_int(&mut elm, &point_fe(ip), &TimeDomain::stationary(), &x)
            .unwrap();
    }
    elm
}

#[test]
fn parallel_evaluation_matches_serial_and_fills_the_cache() {
    let _ = env_logger::builder().is_test(true).try_init();

    let steel = Isotropic::steel();
    let pressure = |x: &Point3<f64>, _t: f64| -100.0 - x[0];

    let mut plate = KirchhoffLovePlate::new(2);
    plate.set_material(&steel);
    plate.set_thickness(0.01);
    plate.set_pressure(&pressure);
    plate.set_mode(SolutionMode::Static).unwrap();
    plate.init_integration(ELEMS * POINTS_PER_ELEM, 0);

    // configuration is frozen here; evaluation below is &self only
    let serial: Vec<ElementMats> = (0..ELEMS).map(|e| eval_element(&plate, e)).collect();
    assert!(plate.has_traction_values());

    // fresh cache, then the same elements concurrently
    plate.init_integration(ELEMS * POINTS_PER_ELEM, 0);
    assert!(!plate.has_traction_values());
    let shared = &plate;
    let parallel: Vec<ElementMats> = (0..ELEMS)
        .into_par_iter()
        .map(|e| eval_element(shared, e))
        .collect();

    let slots = plate.base().slots();
    for (s, p) in serial.iter().zip(&parallel) {
        assert_eq!(s.vec(slots.s).unwrap(), p.vec(slots.s).unwrap());
        assert_eq!(s.mat(slots.km).unwrap(), p.mat(slots.km).unwrap());
    }

    // barrier passed: every point of every element produced a cache entry
    let mut sink = MemorySink::default();
    let (mut geo, mut blk) = (0, 0);
    assert!(plate
        .write_traction_values(&mut sink, 1, &mut geo, &mut blk)
        .unwrap());
    assert_eq!(sink.blocks[0].samples.len(), ELEMS * POINTS_PER_ELEM);
}
