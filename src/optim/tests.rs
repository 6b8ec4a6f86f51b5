use super::*;
use crate::{FuncNd, Vector};

const LOOSE_TOL: f64 = 1e-4;

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

fn opts() -> OptimalOptions<f64> {
    OptimalOptions::default()
}

fn quad(x: &Vector<f64, 2>) -> f64 {
    60.0 - 10.0 * x[0] - 4.0 * x[1] + x[0] * x[0] + x[1] * x[1] - x[0] * x[1]
}

fn rosenbrock(x: &Vector<f64, 2>) -> f64 {
    100.0 * (x[1] - x[0] * x[0]).powi(2) + (1.0 - x[0]).powi(2)
}

// ═══════════════════════════════════════════════════════════════════
// Derivatives
// ═══════════════════════════════════════════════════════════════════

#[test]
fn derivative_central() {
    let f = |x: f64| x.powi(7) - x.powi(5);
    assert_near(derivative(&f, 1.0, &opts()), 2.0, 1e-3, "central");
}

#[test]
fn derivative_ridders_is_sharper() {
    let f = |x: f64| x.powi(7) - x.powi(5);
    let central = derivative(&f, 1.0, &opts());
    let ridders = derivative(
        &f,
        1.0,
        &OptimalOptions {
            diff_mode: DiffMode::Ridders,
            ..opts()
        },
    );
    assert_near(ridders, 2.0, 1e-10, "ridders");
    assert!((ridders - 2.0).abs() < (central - 2.0).abs());
}

#[test]
fn derivative_f32() {
    let f = |x: f32| x.sin();
    let d = derivative(&f, 0.0f32, &OptimalOptions::<f32>::default());
    assert!((d - 1.0).abs() < 1e-3, "f32 derivative {}", d);
}

#[test]
fn grad_of_quadratic_is_exact() {
    let g = grad(&quad, &Vector::from_array([1.0, 2.0]), &opts());
    // ∂f/∂x0 = -10 + 2x0 - x1, ∂f/∂x1 = -4 + 2x1 - x0
    assert_near(g[0], -10.0, 1e-9, "g0");
    assert_near(g[1], -1.0, 1e-9, "g1");
}

#[test]
fn jacobian_of_map() {
    let f = |x: &Vector<f64, 2>| Vector::from_array([x[0] * x[1], x[0].exp(), x[1]]);
    let x = Vector::from_array([0.5, -1.5]);
    let j = jacobian(&f, &x, &opts());
    assert_near(j[(0, 0)], -1.5, 1e-9, "d(x0 x1)/dx0");
    assert_near(j[(0, 1)], 0.5, 1e-9, "d(x0 x1)/dx1");
    assert_near(j[(1, 0)], 0.5f64.exp(), 1e-4, "d exp/dx0");
    assert_near(j[(1, 1)], 0.0, 1e-12, "d exp/dx1");
    assert_near(j[(2, 1)], 1.0, 1e-12, "identity row");
}

fn ridders() -> OptimalOptions<f64> {
    OptimalOptions {
        diff_mode: DiffMode::Ridders,
        ..opts()
    }
}

#[test]
fn grad_ridders_is_sharper() {
    let f = |x: &Vector<f64, 1>| x[0].powi(5);
    let x = Vector::from_array([1.0]);
    // Central with dx = 1e-2 carries a 60·dx²/6 = 1e-3 truncation error
    let central = grad(&f, &x, &opts())[0];
    assert!((central - 5.0).abs() > 5e-4, "central {}", central);
    assert_near(grad(&f, &x, &ridders())[0], 5.0, 1e-9, "ridders");
}

#[test]
fn jacobian_ridders() {
    let f = |x: &Vector<f64, 2>| Vector::from_array([x[0].powi(5), x[0] * x[1].powi(3)]);
    let x = Vector::from_array([1.0, 2.0]);
    let j = jacobian(&f, &x, &ridders());
    assert_near(j[(0, 0)], 5.0, 1e-9, "d(x0^5)/dx0");
    assert_near(j[(0, 1)], 0.0, 1e-12, "d(x0^5)/dx1");
    assert_near(j[(1, 0)], 8.0, 1e-9, "d(x0 x1^3)/dx0");
    assert_near(j[(1, 1)], 12.0, 1e-9, "d(x0 x1^3)/dx1");

    let central = jacobian(&f, &x, &opts());
    assert!((central[(0, 0)] - 5.0).abs() > 5e-4);
}

#[test]
fn row_gradient_ridders() {
    let f = |x: &Vector<f64, 2>| Vector::from_array([x[0].powi(5), x[0] * x[1].powi(3)]);
    let x = Vector::from_array([1.0, 2.0]);
    let g = super::diff::row_gradient::<f64, _, 2, 2>(&f, &x, 1, &ridders());
    assert_near(g[0], 8.0, 1e-9, "d/dx0");
    assert_near(g[1], 12.0, 1e-9, "d/dx1");
}

// ═══════════════════════════════════════════════════════════════════
// Scalar search
// ═══════════════════════════════════════════════════════════════════

#[test]
fn region_brackets_parabola() {
    let f = |x: f64| x * x - 4.0 * x + 7.0;
    let (a, b) = region(&f, -5.0, 1.0).unwrap();
    assert_eq!((a, b), (-2.0, 10.0));
}

#[test]
fn region_negative_step() {
    let f = |x: f64| (x - 3.0).powi(2);
    let (a, b) = region(&f, 10.0, -0.5).unwrap();
    assert!(a < b);
    assert!(a < 3.0 && 3.0 < b, "bracket [{}, {}]", a, b);
}

#[test]
fn region_flat_start() {
    let f = |x: f64| (x.abs() - 1.0).max(0.0);
    assert_eq!(region(&f, 0.0, 0.25).unwrap(), (0.0, 0.25));
}

#[test]
fn region_unbounded() {
    let f = |x: f64| -x;
    assert_eq!(region(&f, 0.0, 1.0).unwrap_err(), OptimError::BracketNotFound);
}

#[test]
fn region_invalid_step() {
    let f = |x: f64| x * x;
    assert_eq!(region(&f, 0.0, 0.0).unwrap_err(), OptimError::InvalidArgument);
    assert_eq!(
        region(&f, 0.0, f64::NAN).unwrap_err(),
        OptimError::InvalidArgument
    );
}

#[test]
fn region_nan_objective() {
    let f = |x: f64| if x > 1.5 { f64::NAN } else { -x };
    assert_eq!(region(&f, 0.0, 1.0).unwrap_err(), OptimError::NotFinite);
}

#[test]
fn fminbnd_parabola() {
    let f = |x: f64| x * x - 4.0 * x + 7.0;
    let (a, b) = region(&f, -5.0, 1.0).unwrap();
    let r = fminbnd(&f, a, b, &opts());
    assert!(r.converged);
    assert_near(r.x, 2.0, LOOSE_TOL, "argmin");
    assert_near(r.fx, 3.0, LOOSE_TOL, "min");
}

#[test]
fn fminbnd_reversed_bounds() {
    let r = fminbnd(&|x: f64| x.cos(), 4.0, 2.0, &opts());
    assert_near(r.x, core::f64::consts::PI, 1e-5, "cos minimum");
}

#[test]
fn fminbnd_minimum_at_edge() {
    // Monotone on the interval: converges onto the lower bound
    let r = fminbnd(&|x: f64| x, 1.0, 2.0, &opts());
    assert!(r.converged);
    assert_near(r.x, 1.0, 1e-5, "edge");
}

#[test]
fn fzero_both_roots() {
    let f = |x: f64| x * x - 4.0;
    for (x0, root) in [(2.5, 2.0), (1.5, 2.0), (-1.5, -2.0)] {
        let r = fzero(&f, x0, &opts()).unwrap();
        assert!(r.converged);
        assert_near(r.x, root, 1e-6, "root");
        assert!(r.fx.abs() < 1e-5);
    }
}

#[test]
fn fzero_exact_start() {
    let r = fzero(&|x: f64| x - 1.0, 1.0, &opts()).unwrap();
    assert_eq!(r.iterations, 0);
    assert_eq!(r.x, 1.0);
}

#[test]
fn fzero_flat_function() {
    let r = fzero(&|_: f64| 1.0, 0.0, &opts());
    assert_eq!(r.unwrap_err(), OptimError::NotFinite);
}

// ═══════════════════════════════════════════════════════════════════
// Unconstrained minimization
// ═══════════════════════════════════════════════════════════════════

#[test]
fn fminunc_conj_grad_quadratic() {
    let r = fminunc(&quad, &Vector::from_array([0.0, 0.0]), &opts()).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 8.0, LOOSE_TOL, "x0");
    assert_near(r.x[1], 6.0, LOOSE_TOL, "x1");
    assert_near(r.fx, 8.0, LOOSE_TOL, "f");
    // Exact line searches on a 2-D quadratic: two directions suffice
    assert!(r.iterations <= 3, "iterations {}", r.iterations);
}

#[test]
fn fminunc_conj_grad_stall_not_converged() {
    // Central differences at dx = 1e-2 bias the gradient near the valley
    // floor, so the line search runs out of progress before ‖∇f‖ < tol
    let start = Vector::from_array([0.0, 0.0]);
    let r = fminunc(&rosenbrock, &start, &opts()).unwrap();
    assert!(!r.converged);
    assert!(r.iterations < opts().max_iter);
    assert_near(r.x[0], 1.0, 2e-2, "x0");
    assert_near(r.x[1], 1.0, 2e-2, "x1");
    assert!(r.fx < 1e-3);
}

#[test]
fn fminunc_conj_grad_ridders_rosenbrock() {
    let r = fminunc(&rosenbrock, &Vector::from_array([0.0, 0.0]), &ridders()).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 1.0, 1e-5, "x0");
    assert_near(r.x[1], 1.0, 1e-5, "x1");
}

#[test]
fn fminunc_simplex_quadratic() {
    let o = OptimalOptions {
        fmin_mode: FminMode::Simplex,
        ..opts()
    };
    let r = fminunc(&quad, &Vector::from_array([0.0, 0.0]), &o).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 8.0, 1e-3, "x0");
    assert_near(r.x[1], 6.0, 1e-3, "x1");
    assert_near(r.fx, 8.0, LOOSE_TOL, "f");
}

#[test]
fn fminunc_simplex_rosenbrock() {
    let o = OptimalOptions {
        fmin_mode: FminMode::Simplex,
        ..opts()
    };
    let r = fminunc(&rosenbrock, &Vector::from_array([1.0, -2.0]), &o).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 1.0, 1e-3, "x0");
    assert_near(r.x[1], 1.0, 1e-3, "x1");
}

#[test]
fn fminunc_simplex_budget() {
    let o = OptimalOptions {
        fmin_mode: FminMode::Simplex,
        max_iter: 5,
        ..opts()
    };
    let start = Vector::from_array([1.0, -2.0]);
    let r = fminunc(&rosenbrock, &start, &o).unwrap();
    assert!(!r.converged);
    assert_eq!(r.iterations, 5);
    // Best vertex never gets worse than the start
    assert!(r.fx <= rosenbrock(&start));
}

#[test]
fn fminunc_three_dimensions() {
    let f = |x: &Vector<f64, 3>| {
        (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 2.0).powi(2) + 3.0 * (x[2] - 0.5).powi(2)
    };
    let x0 = Vector::from_array([0.0, 0.0, 0.0]);
    for mode in [FminMode::ConjGrad, FminMode::Simplex] {
        let o = OptimalOptions {
            fmin_mode: mode,
            ..opts()
        };
        let r = fminunc(&f, &x0, &o).unwrap();
        assert!(r.converged, "{:?}", mode);
        assert_near(r.x[0], 1.0, 1e-3, "x0");
        assert_near(r.x[1], -2.0, 1e-3, "x1");
        assert_near(r.x[2], 0.5, 1e-3, "x2");
    }
}

#[test]
fn fminunc_unbounded_objective() {
    let f = |x: &Vector<f64, 2>| x[0] + x[1];
    let r = fminunc(&f, &Vector::from_array([0.0, 0.0]), &opts());
    assert_eq!(r.unwrap_err(), OptimError::BracketNotFound);
}

// ═══════════════════════════════════════════════════════════════════
// Constrained minimization
// ═══════════════════════════════════════════════════════════════════

#[test]
fn fmincon_without_constraints_matches_fminunc() {
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    let x0 = Vector::from_array([0.0, 0.0]);
    for mode in [FminMode::ConjGrad, FminMode::Simplex] {
        let o = OptimalOptions {
            fmin_mode: mode,
            ..opts()
        };
        let a = fminunc(&quad, &x0, &o).unwrap();
        let b = fmincon(&quad, &x0, &none, &none, &o).unwrap();
        assert_eq!(a.x, b.x);
        assert_eq!(a.fx, b.fx);
    }
}

#[test]
fn fmincon_penalty_equality() {
    let on_line = |x: &Vector<f64, 2>| x[0] + x[1] - 10.0;
    let ceq: [&dyn FuncNd<f64, 2>; 1] = [&on_line];
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    let r = fmincon(&quad, &Vector::from_array([0.0, 0.0]), &none, &ceq, &opts()).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 6.0, 1e-3, "x0");
    assert_near(r.x[1], 4.0, 1e-3, "x1");
    assert_near(r.fx, 12.0, 1e-3, "f");
    assert!(r.iterations <= opts().outer_iter);
}

#[test]
fn fmincon_penalty_inactive_inequalities() {
    // The unconstrained minimum (8, 6) is feasible; the penalty must not move it
    let c1 = |x: &Vector<f64, 2>| -x[0] - x[1] + 10.0;
    let c2 = |x: &Vector<f64, 2>| 2.0 * x[0] + x[1] - 30.0;
    let c3 = |x: &Vector<f64, 2>| -x[0] + x[1] - 5.0;
    let c: [&dyn FuncNd<f64, 2>; 3] = [&c1, &c2, &c3];
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    let r = fmincon(&quad, &Vector::from_array([5.0, 5.0]), &c, &none, &opts()).unwrap();
    assert!(r.converged);
    assert_eq!(r.iterations, 1);
    assert_near(r.x[0], 8.0, LOOSE_TOL, "x0");
    assert_near(r.x[1], 6.0, LOOSE_TOL, "x1");
}

#[test]
fn fmincon_penalty_active_inequality() {
    let below = |x: &Vector<f64, 2>| x[0] + x[1] - 10.0;
    let c: [&dyn FuncNd<f64, 2>; 1] = [&below];
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    for mode in [FminMode::ConjGrad, FminMode::Simplex] {
        let o = OptimalOptions {
            fmin_mode: mode,
            ..opts()
        };
        let r = fmincon(&quad, &Vector::from_array([0.0, 0.0]), &c, &none, &o).unwrap();
        assert!(r.converged, "{:?}", mode);
        assert_near(r.x[0], 6.0, 1e-3, "x0");
        assert_near(r.x[1], 4.0, 1e-3, "x1");
        assert!(below(&r.x) < 1e-6);
    }
}

#[test]
fn fmincon_unconverged_subproblem_is_reported() {
    // Feasible throughout, but one simplex step cannot settle
    let below = |x: &Vector<f64, 2>| x[0] + x[1] - 100.0;
    let c: [&dyn FuncNd<f64, 2>; 1] = [&below];
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    let o = OptimalOptions {
        max_iter: 1,
        fmin_mode: FminMode::Simplex,
        ..opts()
    };
    let r = fmincon(&quad, &Vector::from_array([0.0, 0.0]), &c, &none, &o).unwrap();
    assert!(!r.converged);
    assert_eq!(r.iterations, 1);
}

#[test]
fn fmincon_lagrangian_equality() {
    let on_line = |x: &Vector<f64, 2>| x[0] + x[1] - 10.0;
    let ceq: [&dyn FuncNd<f64, 2>; 1] = [&on_line];
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    let o = OptimalOptions {
        fmincon_mode: FminconMode::Lagrangian,
        ..opts()
    };
    let r = fmincon(&quad, &Vector::from_array([0.0, 0.0]), &none, &ceq, &o).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 6.0, 1e-3, "x0");
    assert_near(r.x[1], 4.0, 1e-3, "x1");
}

#[test]
fn fmincon_lagrangian_active_inequality() {
    let below = |x: &Vector<f64, 2>| x[0] + x[1] - 10.0;
    let c: [&dyn FuncNd<f64, 2>; 1] = [&below];
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    let o = OptimalOptions {
        fmincon_mode: FminconMode::Lagrangian,
        ..opts()
    };
    let r = fmincon(&quad, &Vector::from_array([0.0, 0.0]), &c, &none, &o).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 6.0, 1e-3, "x0");
    assert_near(r.x[1], 4.0, 1e-3, "x1");
    assert!(below(&r.x) < 1e-6);
}

#[test]
fn fmincon_outer_budget() {
    let on_line = |x: &Vector<f64, 2>| x[0] + x[1] - 10.0;
    let ceq: [&dyn FuncNd<f64, 2>; 1] = [&on_line];
    let none: [&dyn FuncNd<f64, 2>; 0] = [];
    let o = OptimalOptions {
        outer_iter: 1,
        ..opts()
    };
    let r = fmincon(&quad, &Vector::from_array([0.0, 0.0]), &none, &ceq, &o).unwrap();
    // One penalty solve at μ = 1e3 leaves a violation near 1e-3
    assert!(!r.converged);
    assert_eq!(r.iterations, 1);
    assert_near(r.x[0], 6.0, 1e-2, "x0");
}

// ═══════════════════════════════════════════════════════════════════
// Least squares
// ═══════════════════════════════════════════════════════════════════

fn linear_residuals(x: &Vector<f64, 2>) -> Vector<f64, 2> {
    Vector::from_array([x[0] + x[1] - 6.0, x[0] - x[1] - 4.0])
}

fn sine_residuals(x: &Vector<f64, 4>) -> Vector<f64, 60> {
    Vector::from_array(core::array::from_fn(|i| {
        let t = i as f64;
        let observed = 0.8 * (0.19 * t - 0.2).sin() + 1.29;
        x[0] * (x[1] * t + x[2]).sin() + x[3] - observed
    }))
}

#[test]
fn lsqnonlin_gauss_newton_linear() {
    let r = lsqnonlin(&linear_residuals, &Vector::from_array([0.0, 0.0]), &opts()).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 5.0, 1e-3, "x0");
    assert_near(r.x[1], 1.0, 1e-3, "x1");
    assert!(r.cost < 1e-10);
}

#[test]
fn lsqnonlin_levenberg_marquardt_linear() {
    let o = OptimalOptions {
        lsq_mode: LsqMode::LevenbergMarquardt,
        ..opts()
    };
    let r = lsqnonlin(&linear_residuals, &Vector::from_array([0.0, 0.0]), &o).unwrap();
    assert!(r.converged);
    assert_near(r.x[0], 5.0, 1e-3, "x0");
    assert_near(r.x[1], 1.0, 1e-3, "x1");
}

#[test]
fn lsqnonlin_residual_list() {
    let r0 = |x: &Vector<f64, 2>| x[0] + x[1] - 6.0;
    let r1 = |x: &Vector<f64, 2>| x[0] - x[1] - 4.0;
    let r = Residuals([&r0 as &dyn FuncNd<f64, 2>, &r1]);
    let fit = lsqnonlin(&r, &Vector::from_array([0.0, 0.0]), &opts()).unwrap();
    assert_near(fit.x[0], 5.0, 1e-3, "x0");
    assert_near(fit.x[1], 1.0, 1e-3, "x1");
}

#[test]
fn lsqnonlin_sine_fit_all_modes() {
    let x0 = Vector::from_array([1.0, 0.2, 0.0, 1.0]);
    for mode in [
        LsqMode::GaussNewton,
        LsqMode::LevenbergMarquardt,
        LsqMode::SubsampledGaussNewton,
    ] {
        let o = OptimalOptions {
            lsq_mode: mode,
            subsample: 20,
            seed: 7,
            ..opts()
        };
        let r = lsqnonlin(&sine_residuals, &x0, &o).unwrap();
        assert!(r.converged, "{:?}", mode);
        assert_near(r.x[0], 0.8, LOOSE_TOL, "amplitude");
        assert_near(r.x[1], 0.19, LOOSE_TOL, "frequency");
        assert_near(r.x[2], -0.2, 1e-3, "phase");
        assert_near(r.x[3], 1.29, LOOSE_TOL, "offset");
    }
}

#[test]
fn lsqnonlin_subsampled_is_reproducible() {
    let x0 = Vector::from_array([1.0, 0.2, 0.0, 1.0]);
    let o = OptimalOptions {
        lsq_mode: LsqMode::SubsampledGaussNewton,
        seed: 42,
        ..opts()
    };
    let a = lsqnonlin(&sine_residuals, &x0, &o).unwrap();
    let b = lsqnonlin(&sine_residuals, &x0, &o).unwrap();
    assert_eq!(a.x, b.x);
    assert_eq!(a.iterations, b.iterations);
}

#[test]
fn lsqnonlin_underdetermined_is_singular() {
    let r = |x: &Vector<f64, 2>| Vector::from_array([x[0] + x[1] - 1.0]);
    let err = lsqnonlin(&r, &Vector::from_array([0.0, 0.0]), &opts()).unwrap_err();
    assert_eq!(err, OptimError::Singular);
}

// ── Robust least squares ────────────────────────────────────────────

/// y = 2t + 1 plus a small ripple, with three gross outliers.
fn contaminated_line(x: &Vector<f64, 2>) -> Vector<f64, 20> {
    Vector::from_array(core::array::from_fn(|i| {
        let t = i as f64;
        let mut y = 2.0 * t + 1.0 + 0.1 * (3.0 * t).sin();
        match i {
            3 => y += 30.0,
            11 => y -= 25.0,
            17 => y += 40.0,
            _ => {}
        }
        x[0] * t + x[1] - y
    }))
}

#[test]
fn robust_modes_reject_outliers() {
    let x0 = Vector::from_array([0.0, 0.0]);
    let plain = lsqnonlin(&contaminated_line, &x0, &opts()).unwrap();
    // Least squares gets dragged by the outliers
    assert!((plain.x[1] - 1.0).abs() > 0.5);

    for mode in [RobustMode::Huber, RobustMode::Tukey] {
        let o = OptimalOptions {
            robust_mode: mode,
            ..opts()
        };
        let r = lsqnonlin_rkf(&contaminated_line, &x0, &o).unwrap();
        assert!(r.converged, "{:?}", mode);
        assert!(r.iterations > 1);
        assert_near(r.x[0], 2.0, 1e-2, "slope");
        assert_near(r.x[1], 1.0, 2e-2, "intercept");
    }
}

#[test]
fn robust_none_is_plain_least_squares() {
    let x0 = Vector::from_array([0.0, 0.0]);
    let plain = lsqnonlin(&contaminated_line, &x0, &opts()).unwrap();
    let none = lsqnonlin_rkf(&contaminated_line, &x0, &opts()).unwrap();
    assert_eq!(plain.x, none.x);
}

#[test]
fn robust_weights() {
    assert_eq!(robust::huber(0.5, 1.345), 1.0);
    assert_near(robust::huber(2.69, 1.345), 0.5, 1e-12, "huber tail");
    assert_eq!(robust::tukey(0.0, 4.685), 1.0);
    assert_eq!(robust::tukey(5.0, 4.685), 0.0);
    assert_near(robust::tukey(-4.685 / 2.0, 4.685), 0.5625, 1e-12, "tukey mid");
}
