/// How [`derivative`](super::derivative), [`grad`](super::grad) and
/// [`jacobian`](super::jacobian) difference a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffMode {
    /// `(f(x + h) - f(x - h)) / 2h`.
    #[default]
    Central,
    /// Central differences at `2h`, `h`, `h/2` combined by Richardson
    /// extrapolation.
    Ridders,
}

/// Unconstrained search strategy used by [`fminunc`](super::fminunc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FminMode {
    /// Nelder–Mead simplex. Derivative free.
    Simplex,
    /// Polak–Ribière conjugate gradient with a bracketing line search.
    #[default]
    ConjGrad,
}

/// Constraint handling used by [`fmincon`](super::fmincon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FminconMode {
    /// Quadratic exterior penalty with a growing weight.
    #[default]
    ExteriorPenalty,
    /// Augmented Lagrangian with multiplier updates.
    Lagrangian,
}

/// Base solver used by [`lsqnonlin`](super::lsqnonlin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LsqMode {
    #[default]
    GaussNewton,
    LevenbergMarquardt,
    /// Gauss-Newton with the Jacobian built from a random subset of rows
    /// each iteration.
    SubsampledGaussNewton,
}

/// Loss used by [`lsqnonlin_rkf`](super::lsqnonlin_rkf).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobustMode {
    /// Plain squared loss; `lsqnonlin_rkf` reduces to `lsqnonlin`.
    #[default]
    None,
    Huber,
    Tukey,
}

/// Shared configuration for every routine in [`optim`](super).
///
/// Override individual fields with struct update syntax:
///
/// ```
/// use numcal::optim::{FminMode, OptimalOptions};
///
/// let opts = OptimalOptions {
///     fmin_mode: FminMode::Simplex,
///     tol: 1e-9,
///     ..OptimalOptions::default()
/// };
/// assert_eq!(opts.max_iter, 1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OptimalOptions<T> {
    pub diff_mode: DiffMode,
    pub fmin_mode: FminMode,
    pub fmincon_mode: FminconMode,
    pub lsq_mode: LsqMode,
    pub robust_mode: RobustMode,
    /// Iteration budget of each inner solver.
    pub max_iter: usize,
    /// Convergence tolerance (gradient norm, step length, simplex spread,
    /// constraint violation, weight change).
    pub tol: T,
    /// Finite-difference step for gradients and Jacobians. The initial
    /// simplex edge is `100 * dx`.
    pub dx: T,
    /// Forward-difference step of the secant update in [`fzero`](super::fzero).
    pub secant_step: T,
    /// Initial exterior penalty weight.
    pub exterior: T,
    /// Initial penalty weight of the augmented Lagrangian.
    pub lagrangian_mu: T,
    /// Factor applied to the penalty weight between outer iterations.
    pub penalty_growth: T,
    /// Outer iteration budget of constrained minimization.
    pub outer_iter: usize,
    /// Initial Levenberg-Marquardt damping.
    pub lm_lambda: T,
    /// Damping factor on a rejected step.
    pub lm_increase: T,
    /// Damping factor on an accepted step.
    pub lm_decrease: T,
    /// Rows per subsampled Gauss-Newton iteration. `0` picks half the
    /// residuals, rounded up. Never fewer than the number of unknowns.
    pub subsample: usize,
    /// Seed of the row sampler. The same seed reproduces the same run.
    pub seed: u64,
    pub huber_threshold: T,
    pub tukey_threshold: T,
    /// Reweighting budget of robust least squares.
    pub irls_iter: usize,
}

impl Default for OptimalOptions<f64> {
    fn default() -> Self {
        Self {
            diff_mode: DiffMode::Central,
            fmin_mode: FminMode::ConjGrad,
            fmincon_mode: FminconMode::ExteriorPenalty,
            lsq_mode: LsqMode::GaussNewton,
            robust_mode: RobustMode::None,
            max_iter: 1000,
            tol: 1e-6,
            dx: 1e-2,
            secant_step: 1e-3,
            exterior: 1e3,
            lagrangian_mu: 10.0,
            penalty_growth: 10.0,
            outer_iter: 20,
            lm_lambda: 1e-3,
            lm_increase: 10.0,
            lm_decrease: 0.1,
            subsample: 0,
            seed: 0,
            huber_threshold: 1.345,
            tukey_threshold: 4.685,
            irls_iter: 50,
        }
    }
}

impl Default for OptimalOptions<f32> {
    fn default() -> Self {
        Self {
            diff_mode: DiffMode::Central,
            fmin_mode: FminMode::ConjGrad,
            fmincon_mode: FminconMode::ExteriorPenalty,
            lsq_mode: LsqMode::GaussNewton,
            robust_mode: RobustMode::None,
            max_iter: 1000,
            tol: 1e-4,
            dx: 1e-2,
            secant_step: 1e-3,
            exterior: 1e3,
            lagrangian_mu: 10.0,
            penalty_growth: 10.0,
            outer_iter: 20,
            lm_lambda: 1e-3,
            lm_increase: 10.0,
            lm_decrease: 0.1,
            subsample: 0,
            seed: 0,
            huber_threshold: 1.345,
            tukey_threshold: 4.685,
            irls_iter: 50,
        }
    }
}
