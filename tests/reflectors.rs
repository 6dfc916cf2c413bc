#![allow(non_snake_case)]

use half::{bf16, f16};
use halfeig::algebra::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// A reflector generated from (α, x) maps that vector onto (β, 0, …, 0).
// The reflector is applied with larf1f in the working format and the result
// is checked in f64.

fn inputs(rng: &mut ChaCha8Rng, n: usize, outlier: f64, tiny: f64) -> Vec<(&'static str, Vec<f64>)> {
    vec![
        // small enough to take the rescaling path
        ("tiny", (0..n).map(|i| tiny * (1 + i % 3) as f64).collect()),
        ("random", (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()),
        ("all equal", vec![0.75; n]),
        ("all zero", vec![0.; n]),
        ("outlier", (0..n).map(|i| if i == n / 2 { outlier } else { 1e-3 }).collect()),
        ("negative alpha", (0..n).map(|i| if i == 0 { -2. } else { 0.25 }).collect()),
    ]
}

fn check_generate_reflector<T: FloatT>(outlier: f64) {
    let eps = T::epsilon().to_f64().unwrap();
    let tiny = 4. * T::min_positive_value().to_f64().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for n in 1..=16 {
        for (case, v) in inputs(&mut rng, n, outlier, tiny) {
            let orig: Vec<T> = v.iter().map(|x| x.as_T()).collect();
            let mut x = orig.clone();
            let (head, tail) = x.split_at_mut(1);
            let tau = larfg(n, &mut head[0], tail, 1);
            let beta = x[0];

            // H (α, x) with H = I - τ v vᵀ and v(0) = 1
            let mut v = x.clone();
            v[0] = T::one();
            let mut C = Matrix::<T>::new_from_slice((n, 1), &orig);
            let mut work = vec![T::zero(); 1];
            larf1f(MatrixSide::Left, &v, tau, C.rb_mut(), &mut work).unwrap();

            let scale = orig.iter().fold(0f64, |m, a| f64::max(m, a.to_f64().unwrap().abs()));
            let t = 4. * (n as f64) * eps * scale;
            let hx = C.col(0);
            assert!((hx[0].to_f64().unwrap() - beta.to_f64().unwrap()).abs() <= t, "n = {n}, {case}");
            for (i, h) in hx.iter().enumerate().skip(1) {
                assert!(h.to_f64().unwrap().abs() <= t, "n = {n}, {case}, entry {i}");
            }

            // |β| is the norm of the input, and the identity is returned
            // when there is nothing to annihilate
            let norm = orig.iter().fold(0f64, |r, a| r.hypot(a.to_f64().unwrap()));
            assert!((beta.to_f64().unwrap().abs() - norm).abs() <= t, "n = {n}, {case}");
            if orig[1..].iter().all(|&a| a == T::zero()) {
                assert_eq!(tau, T::zero());
            } else {
                let tau = tau.to_f64().unwrap();
                assert!((1. - 2. * eps..=2. + 2. * eps).contains(&tau), "n = {n}, {case}");
            }
        }
    }
}

#[test]
fn test_generate_reflector_f16() {
    check_generate_reflector::<f16>(1e4);
}

#[test]
fn test_generate_reflector_bf16() {
    check_generate_reflector::<bf16>(1e30);
}

#[test]
fn test_generate_reflector_f32() {
    check_generate_reflector::<f32>(1e30);
}

#[test]
fn test_generate_reflector_f64() {
    check_generate_reflector::<f64>(1e300);
}
