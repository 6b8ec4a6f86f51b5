use super::*;
use crate::{Ode, Vector};

const TAU: f64 = core::f64::consts::TAU;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

// ẋ = −2x − 2, x(0) = 0  ⇒  x(t) = e^(−2t) − 1
fn decay(_t: f64, x: &Vector<f64, 1>) -> Vector<f64, 1> {
    Vector::from_array([-2.0 * x[0] - 2.0])
}

fn decay_exact(t: f64) -> f64 {
    (-2.0 * t).exp() - 1.0
}

fn oscillator(_t: f64, y: &Vector<f64, 2>) -> Vector<f64, 2> {
    Vector::from_array([y[1], -y[0]])
}

// ═══════════════════════════════════════════════════════════════
// Tableaux
// ═══════════════════════════════════════════════════════════════

#[test]
fn presets_are_consistent() {
    fn check<const K: usize>(tab: &Tableau<f64, K>) {
        let bsum: f64 = tab.b.iter().sum();
        assert_near(bsum, 1.0, 1e-15, "weights sum");
        for i in 0..K {
            let rsum: f64 = tab.a[i][..i].iter().sum();
            assert_near(rsum, tab.c[i], 1e-15, "row sum matches c");
        }
    }
    check(&Tableau::<f64, 2>::midpoint());
    check(&Tableau::<f64, 3>::kutta3());
    check(&Tableau::<f64, 4>::classic4());
    assert_eq!(Tableau::<f64, 4>::classic4().stages(), 4);
}

// ═══════════════════════════════════════════════════════════════
// Fixed-step accuracy
// ═══════════════════════════════════════════════════════════════

#[test]
fn rk4_linear_decay() {
    let mut rk = RungeKutta::rk4(decay);
    rk.init(0.0, &Vector::from_array([0.0]));
    for _ in 0..100 {
        rk.step(0.01).unwrap();
    }
    assert_near(rk.time(), 1.0, 1e-12, "time");
    assert_near(rk.state()[0], decay_exact(1.0), 1e-6, "rk4 x(1)");
}

#[test]
fn rk3_linear_decay() {
    let mut rk = RungeKutta::rk3(decay);
    rk.init(0.0, &Vector::from_array([0.0]));
    let xs = rk.solve(0.01, 100).unwrap();
    assert_near(xs[100][0], decay_exact(1.0), 1e-5, "rk3 x(1)");
}

#[test]
fn rk2_linear_decay() {
    let mut rk = RungeKutta::rk2(decay);
    rk.init(0.0, &Vector::from_array([0.0]));
    let xs = rk.solve(0.01, 100).unwrap();
    assert_near(xs[100][0], decay_exact(1.0), 1e-4, "rk2 x(1)");
}

#[test]
fn higher_order_is_more_accurate() {
    let x0 = Vector::from_array([0.0]);
    let err = |x: f64| (x - decay_exact(1.0)).abs();

    let mut rk2 = RungeKutta::rk2(decay);
    rk2.init(0.0, &x0);
    let mut rk3 = RungeKutta::rk3(decay);
    rk3.init(0.0, &x0);
    let mut rk4 = RungeKutta::rk4(decay);
    rk4.init(0.0, &x0);

    let e2 = err(rk2.solve(0.01, 100).unwrap()[100][0]);
    let e3 = err(rk3.solve(0.01, 100).unwrap()[100][0]);
    let e4 = err(rk4.solve(0.01, 100).unwrap()[100][0]);
    assert!(e4 < e3 && e3 < e2, "errors {} {} {}", e2, e3, e4);
}

#[test]
fn stage_times_follow_c() {
    // ẋ = cos t  ⇒  x = sin t; exercises the time offsets of each stage
    let f = |t: f64, _x: &Vector<f64, 1>| Vector::from_array([t.cos()]);
    let mut rk = RungeKutta::rk4(f);
    rk.init(0.0, &Vector::from_array([0.0]));
    let xs = rk.solve(0.01, 100).unwrap();
    assert_near(xs[100][0], 1.0_f64.sin(), 1e-10, "sin(1)");

    let mut rk = RungeKutta::rk3(f);
    rk.init(0.0, &Vector::from_array([0.0]));
    let xs = rk.solve(0.01, 100).unwrap();
    assert_near(xs[100][0], 1.0_f64.sin(), 1e-7, "rk3 sin(1)");
}

#[test]
fn custom_tableau() {
    let ralston = Tableau::new(
        [0.0, 2.0 / 3.0],
        [0.25, 0.75],
        [[0.0, 0.0], [2.0 / 3.0, 0.0]],
    );
    let mut rk = RungeKutta::new(decay, ralston);
    rk.init(0.0, &Vector::from_array([0.0]));
    let xs = rk.solve(0.01, 100).unwrap();
    assert_near(xs[100][0], decay_exact(1.0), 1e-4, "ralston x(1)");
    assert_eq!(rk.tableau(), &ralston);
}

#[test]
fn backward_steps() {
    let mut rk = RungeKutta::rk4(oscillator);
    rk.init(0.0, &Vector::from_array([1.0, 0.0]));
    for _ in 0..1000 {
        rk.step(-TAU / 1000.0).unwrap();
    }
    assert_near(rk.time(), -TAU, 1e-12, "time");
    assert_near(rk.state()[0], 1.0, 1e-8, "y");
    assert_near(rk.state()[1], 0.0, 1e-8, "y'");
}

#[test]
fn f32_integration() {
    let f = |_t: f32, x: &Vector<f32, 1>| Vector::from_array([-2.0 * x[0] - 2.0]);
    let mut rk = RungeKutta::rk4(f);
    rk.init(0.0, &Vector::from_array([0.0]));
    for _ in 0..100 {
        rk.step(0.01).unwrap();
    }
    let exact = (-2.0_f32).exp() - 1.0;
    assert!((rk.state()[0] - exact).abs() < 1e-4);
}

// ═══════════════════════════════════════════════════════════════
// Lifecycle
// ═══════════════════════════════════════════════════════════════

#[test]
fn uninitialized_is_an_error() {
    let mut rk = RungeKutta::rk4(decay);
    assert_eq!(rk.step(0.1).unwrap_err(), OdeError::NotInitialized);
    assert_eq!(rk.solve(0.1, 3).unwrap_err(), OdeError::NotInitialized);
    assert!(matches!(rk.generate(0.1, 3), Err(OdeError::NotInitialized)));
}

#[test]
fn solve_leaves_integrator_untouched() {
    let mut rk = RungeKutta::rk4(decay);
    rk.init(0.5, &Vector::from_array([0.25]));
    let a = rk.solve(0.01, 50).unwrap();
    let b = rk.solve(0.01, 50).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 51);
    assert_eq!(a[0][0], 0.25);
    assert_eq!(rk.time(), 0.5);
    assert_eq!(rk.state()[0], 0.25);
}

#[test]
fn solve_zero_steps() {
    let mut rk = RungeKutta::rk2(decay);
    rk.init(0.0, &Vector::from_array([3.0]));
    let xs = rk.solve(0.1, 0).unwrap();
    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0][0], 3.0);
}

#[test]
fn generate_drives_the_integrator() {
    let mut rk = RungeKutta::rk4(decay);
    rk.init(0.0, &Vector::from_array([0.0]));
    let expected = rk.solve(0.01, 100).unwrap();

    let traj = rk.generate(0.01, 100).unwrap();
    assert_eq!(traj.len(), 100);
    let lazy: Vec<_> = traj.collect();
    assert_eq!(lazy.len(), 100);
    assert_eq!(&lazy[..], &expected[1..]);

    // consumed: the integrator now sits at the last point
    assert_near(rk.time(), 1.0, 1e-12, "time after generate");
    assert_eq!(rk.state(), &expected[100]);

    // a second pass continues from there rather than replaying
    let next = rk.generate(0.01, 1).unwrap().next().unwrap();
    assert!(next[0] < expected[100][0]);
}

#[test]
fn generate_partial_consumption() {
    let mut rk = RungeKutta::rk4(decay);
    rk.init(0.0, &Vector::from_array([0.0]));
    let mut traj = rk.generate(0.1, 10).unwrap();
    traj.next();
    traj.next();
    assert_eq!(traj.len(), 8);
    drop(traj);
    assert_near(rk.time(), 0.2, 1e-12, "two steps taken");
}

#[test]
fn reinit_restarts() {
    let mut rk = RungeKutta::rk4(decay);
    rk.init(0.0, &Vector::from_array([0.0]));
    let first: Vec<_> = rk.generate(0.01, 20).unwrap().collect();
    rk.init(0.0, &Vector::from_array([0.0]));
    let second: Vec<_> = rk.generate(0.01, 20).unwrap().collect();
    assert_eq!(first, second);
}

// ═══════════════════════════════════════════════════════════════
// Systems
// ═══════════════════════════════════════════════════════════════

#[test]
fn odes_list_matches_closure() {
    let pos = |_t: f64, y: &Vector<f64, 2>| y[1];
    let vel = |_t: f64, y: &Vector<f64, 2>| -y[0];
    let sys = Odes([&pos as &dyn Ode<f64, 2>, &vel]);

    let y0 = Vector::from_array([1.0, 0.0]);
    let mut a = RungeKutta::rk4(sys);
    a.init(0.0, &y0);
    let mut b = RungeKutta::rk4(oscillator);
    b.init(0.0, &y0);

    let xa = a.solve(TAU / 1000.0, 1000).unwrap();
    let xb = b.solve(TAU / 1000.0, 1000).unwrap();
    assert_eq!(xa, xb);
    assert_near(xa[1000][0], 1.0, 1e-9, "period y");
    assert_near(xa[1000][1], 0.0, 1e-9, "period y'");
}

#[test]
fn odes_see_time() {
    let growth = |t: f64, _y: &Vector<f64, 2>| 2.0 * t;
    let coupled = |_t: f64, y: &Vector<f64, 2>| y[0];
    let sys = Odes([&growth as &dyn Ode<f64, 2>, &coupled]);
    let mut rk = RungeKutta::rk3(sys);
    rk.init(0.0, &Vector::from_array([0.0, 0.0]));
    for _ in 0..10 {
        rk.step(0.1).unwrap();
    }
    // y₀ = t², y₁ = t³/3; third order is exact for these polynomials
    assert_near(rk.state()[0], 1.0, 1e-12, "t^2");
    assert_near(rk.state()[1], 1.0 / 3.0, 1e-12, "t^3/3");
}

#[test]
fn error_display() {
    let msg = format!("{}", OdeError::NotInitialized);
    assert!(msg.contains("init"));
}
