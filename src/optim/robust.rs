use core::cmp::Ordering;

use crate::matrix::vector::Vector;
use crate::traits::{FloatScalar, FuncNds};

use super::lsq::{lsqnonlin, weighted};
use super::{LsqResult, OptimError, OptimalOptions, RobustMode};

/// Scales the median absolute deviation to a Gaussian standard deviation.
const MAD_SCALE: f64 = 1.4826;

/// Huber weight of a scaled residual `u`.
pub(super) fn huber<T: FloatScalar>(u: T, k: T) -> T {
    if u.abs() <= k {
        T::one()
    } else {
        k / u.abs()
    }
}

/// Tukey biweight of a scaled residual `u`.
pub(super) fn tukey<T: FloatScalar>(u: T, c: T) -> T {
    if u.abs() < c {
        let t = T::one() - (u / c).powi(2);
        t * t
    } else {
        T::zero()
    }
}

fn median_abs<T: FloatScalar, const M: usize>(r: &Vector<T, M>) -> T {
    let mut a = r.to_array().map(|v| v.abs());
    a.sort_unstable_by(|p, q| p.partial_cmp(q).unwrap_or(Ordering::Equal));
    if M == 0 {
        T::zero()
    } else if M % 2 == 1 {
        a[M / 2]
    } else {
        (a[M / 2 - 1] + a[M / 2]) * T::lit(0.5)
    }
}

/// Robust nonlinear least squares by iteratively reweighted least squares.
///
/// Each round solves the weighted problem `min Σ wᵢ rᵢ(x)²` with the
/// solver chosen by `options.lsq_mode`, warm-started from the previous
/// round. The residuals are then scaled by `s = 1.4826·median|r|` (never
/// below `tol`) and the weights recomputed from `u = r/s`:
///
/// - [`RobustMode::Huber`]: `w = 1` for `|u| ≤ huber_threshold`, else
///   `huber_threshold/|u|`.
/// - [`RobustMode::Tukey`]: `w = (1 − (u/c)²)²` for `|u| < c =
///   tukey_threshold`, else `0`. Gross outliers drop out entirely.
/// - [`RobustMode::None`]: plain [`lsqnonlin`].
///
/// Stops when no weight moves by more than `tol`, or after `irls_iter`
/// rounds. `iterations` counts rounds, `cost` is the unweighted `‖r‖²`.
///
/// ```
/// use numcal::optim::{lsqnonlin_rkf, OptimalOptions, RobustMode};
/// use numcal::Vector;
///
/// // y ≈ 2t + 1 with one gross outlier at t = 3
/// let r = |x: &Vector<f64, 2>| {
///     Vector::from_array(core::array::from_fn::<f64, 8, _>(|i| {
///         let t = i as f64;
///         let y = if i == 3 { 50.0 } else { 2.0 * t + 1.0 + 0.05 * (3.0 * t).sin() };
///         x[0] * t + x[1] - y
///     }))
/// };
/// let opts = OptimalOptions { robust_mode: RobustMode::Tukey, ..OptimalOptions::default() };
/// let fit = lsqnonlin_rkf(&r, &Vector::from_array([0.0, 0.0]), &opts).unwrap();
/// assert!((fit.x[0] - 2.0).abs() < 0.02);
/// assert!((fit.x[1] - 1.0).abs() < 0.02);
/// ```
pub fn lsqnonlin_rkf<T, F, const N: usize, const M: usize>(
    r: &F,
    x0: &Vector<T, N>,
    options: &OptimalOptions<T>,
) -> Result<LsqResult<T, N>, OptimError>
where
    T: FloatScalar,
    F: FuncNds<T, N, M> + ?Sized,
{
    if options.robust_mode == RobustMode::None {
        return lsqnonlin(r, x0, options);
    }
    let weight = |u: T| match options.robust_mode {
        RobustMode::None => T::one(),
        RobustMode::Huber => huber(u, options.huber_threshold),
        RobustMode::Tukey => tukey(u, options.tukey_threshold),
    };

    let mad_scale = T::lit(MAD_SCALE);
    let mut w = [T::one(); M];
    let mut x = *x0;

    for round in 0..options.irls_iter {
        x = weighted(r, &x, &w, options)?.x;

        let res = r.eval(&x);
        let scale = (mad_scale * median_abs(&res)).max(options.tol);
        let next: [T; M] = core::array::from_fn(|i| weight(res[i] / scale));
        let change = (0..M).fold(T::zero(), |m, i| m.max((next[i] - w[i]).abs()));
        w = next;
        tracing::trace!(round, scale = ?scale, change = ?change, "irls reweight");

        if change < options.tol {
            tracing::debug!(
                mode = ?options.robust_mode,
                rounds = round + 1,
                "lsqnonlin_rkf converged"
            );
            return Ok(LsqResult {
                x,
                cost: res.norm_squared(),
                iterations: round + 1,
                converged: true,
            });
        }
    }

    tracing::warn!(irls_iter = options.irls_iter, "lsqnonlin_rkf weights did not settle");
    Ok(LsqResult {
        x,
        cost: r.eval(&x).norm_squared(),
        iterations: options.irls_iter,
        converged: false,
    })
}
