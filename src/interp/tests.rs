use super::*;

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

// ── Polynomial ──────────────────────────────────────────────────────

#[test]
fn polynomial_horner() {
    let p = Polynomial::new([1.0_f64, 2.0, 3.0]);
    assert_eq!(p.eval(0.0), 1.0);
    assert_eq!(p.eval(1.0), 6.0);
    assert_eq!(p.eval(2.0), 17.0);
    assert_eq!(p.degree(), 2);
}

#[test]
fn polynomial_edge_cases() {
    let empty: Polynomial<f64> = Polynomial::new(Vec::new());
    assert_eq!(empty.eval(3.0), 0.0);
    assert_eq!(empty.degree(), 0);

    let c = Polynomial::new([4.5_f64]);
    assert_eq!(c.eval(-100.0), 4.5);
    assert!(c.derivative().coeffs().is_empty());
}

#[test]
fn polynomial_derivative() {
    // d/dx (x³ - 2x + 5) = 3x² - 2
    let p = Polynomial::new([5.0_f64, -2.0, 0.0, 1.0]);
    let dp = p.derivative();
    assert_eq!(dp.coeffs(), &[-2.0, 0.0, 3.0]);
    assert_eq!(dp.eval(2.0), 10.0);
}

// ── Newton interpolation ────────────────────────────────────────────

#[test]
fn newton_reproduces_nodes() {
    let xs = [0.3_f64, -1.2, 2.5, 4.0, 0.9];
    let ys = [1.0, -2.0, 0.5, 3.0, -0.25];
    let f = Interpolator::new(&xs, &ys).unwrap();
    for (&x, &y) in xs.iter().zip(&ys) {
        assert_near(f.eval(x), y, 1e-12, "node value");
    }
    assert_eq!(f.len(), 5);
    assert_eq!(f.nodes(), &xs);
}

#[test]
fn newton_three_then_four_nodes() {
    let mut f = Interpolator::new(&[1.0_f64, 2.0, 3.0], &[0.0, 1.0, 0.0]).unwrap();
    assert_near(f.eval(0.0), -3.0, 1e-12, "quadratic at 0");

    f.add(0.0, 1.0).unwrap();
    assert_near(f.eval(4.0), -7.0, 1e-12, "cubic at 4");
    assert_near(f.eval(0.0), 1.0, 1e-12, "new node");
}

#[test]
fn newton_incremental_matches_batch() {
    // Samples of 2x³ - x + 1; four nodes pin the cubic everywhere
    let p = Polynomial::new([1.0_f64, -1.0, 0.0, 2.0]);
    let xs = [-1.0_f64, 0.5, 2.0, 3.0];
    let ys = xs.map(|x| p.eval(x));

    let batch = Interpolator::new(&xs, &ys).unwrap();
    let mut inc = Interpolator::new(&xs[..1], &ys[..1]).unwrap();
    inc.add(xs[1], ys[1]).unwrap().add(xs[2], ys[2]).unwrap().add(xs[3], ys[3]).unwrap();

    let batch_coeffs: Vec<f64> = batch.coefficients().collect();
    let inc_coeffs: Vec<f64> = inc.coefficients().collect();
    assert_eq!(batch_coeffs, inc_coeffs);

    for x in [-3.0, -0.2, 1.7, 5.0] {
        assert_near(inc.eval(x), p.eval(x), 1e-10, "cubic reproduced");
    }
}

#[test]
fn newton_rejects_bad_input() {
    assert_eq!(
        Interpolator::<f64>::new(&[], &[]).unwrap_err(),
        InterpError::Empty
    );
    assert_eq!(
        Interpolator::new(&[1.0_f64, 2.0], &[1.0]).unwrap_err(),
        InterpError::LengthMismatch
    );
    assert_eq!(
        Interpolator::new(&[1.0_f64, 2.0, 1.0], &[1.0, 2.0, 3.0]).unwrap_err(),
        InterpError::DuplicateNode
    );

    let mut f = Interpolator::new(&[1.0_f64, 2.0], &[1.0, 2.0]).unwrap();
    assert_eq!(f.add(2.0, 5.0).unwrap_err(), InterpError::DuplicateNode);
    assert_eq!(f.len(), 2, "rejected node must not be stored");
}

#[test]
fn newton_as_func1d() {
    use crate::Func1d;
    let f = Interpolator::new(&[0.0_f64, 1.0], &[1.0, 3.0]).unwrap();
    assert_eq!(Func1d::eval(&f, 0.5), 2.0);
}

// ── Curve fitting ───────────────────────────────────────────────────

#[test]
fn fit_line() {
    let fit = CurveFitter::new(
        &[1.0_f64, 2.0, 3.0, 4.0],
        &[0.0, 2.0, 1.0, 3.0],
        Basis::new([0, 1]).unwrap(),
    )
    .unwrap();
    assert_near(fit.coeffs()[0], -0.5, 1e-12, "intercept");
    assert_near(fit.coeffs()[1], 0.8, 1e-12, "slope");
    assert_near(fit.eval(0.625), 0.0, 1e-12, "zero crossing");
    assert_eq!(fit.samples(), 4);
}

#[test]
fn fit_sparse_basis() {
    // y = 2 - 0.5x² exactly; the basis skips the linear term
    let xs = [-2.0_f64, -1.0, 0.0, 1.5, 3.0];
    let ys = xs.map(|x| 2.0 - 0.5 * x * x);
    let fit = CurveFitter::new(&xs, &ys, Basis::new([0, 2]).unwrap()).unwrap();
    assert_near(fit.coeffs()[0], 2.0, 1e-12, "c0");
    assert_near(fit.coeffs()[1], -0.5, 1e-12, "c2");
    assert_eq!(fit.basis().exponents(), &[0, 2]);
}

#[test]
fn fit_incremental_add() {
    let basis = Basis::<3>::dense();
    let f = |x: f64| 1.0 + 2.0 * x - 0.25 * x * x;
    let mut fit = CurveFitter::new(&[0.0, 1.0, 2.0], &[f(0.0), f(1.0), f(2.0)], basis).unwrap();
    fit.add(3.0, f(3.0)).unwrap().add(4.0, f(4.0)).unwrap();
    assert_eq!(fit.samples(), 5);
    assert_near(fit.eval(10.0), f(10.0), 1e-9, "extrapolated quadratic");
}

#[test]
fn fit_rejects_bad_input() {
    assert_eq!(Basis::new([1, 1]).unwrap_err(), InterpError::InvalidBasis);
    assert_eq!(Basis::new([2, 0]).unwrap_err(), InterpError::InvalidBasis);
    assert_eq!(Basis::<0>::new([]).unwrap_err(), InterpError::InvalidBasis);

    let quad = Basis::<3>::dense();
    assert_eq!(
        CurveFitter::new(&[1.0_f64, 2.0], &[1.0, 2.0], quad).unwrap_err(),
        InterpError::TooFewSamples
    );
    assert_eq!(
        CurveFitter::new(&[1.0_f64, 2.0], &[1.0], quad).unwrap_err(),
        InterpError::LengthMismatch
    );
}

#[test]
fn fit_degenerate_samples_singular() {
    // Three samples but a single distinct abscissa cannot pin a line
    let r = CurveFitter::new(&[2.0_f64, 2.0, 2.0], &[1.0, 1.5, 0.5], Basis::<2>::dense());
    assert_eq!(r.unwrap_err(), InterpError::Singular);
}

#[test]
fn named_bases() {
    assert_eq!(Basis::linear(), Basis::<2>::dense());
    assert_eq!(Basis::quadratic().exponents(), &[0, 1, 2]);
    assert_eq!(Basis::new([0, 1, 2]).unwrap(), Basis::quadratic());
}
