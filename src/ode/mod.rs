//! Fixed-step explicit Runge-Kutta integration.
//!
//! A [`RungeKutta`] integrator pairs a right-hand side ([`OdeSystem`]) with
//! a Butcher [`Tableau`]. Every method shares one stepping routine; the
//! presets differ only in their coefficients:
//!
//! | Constructor              | Tableau                   | Order |
//! |--------------------------|---------------------------|-------|
//! | [`RungeKutta::rk2`]      | [`Tableau::midpoint`]     | 2     |
//! | [`RungeKutta::rk3`]      | [`Tableau::kutta3`]       | 3     |
//! | [`RungeKutta::rk4`]      | [`Tableau::classic4`]     | 4     |
//!
//! Any other explicit tableau goes through [`RungeKutta::new`].
//!
//! The right-hand side is either a closure returning the whole derivative
//! vector or an [`Odes`] list of scalar equations, one per component.
//!
//! # Example
//!
//! ```
//! use numcal::ode::RungeKutta;
//! use numcal::Vector;
//!
//! // Harmonic oscillator: [y, y'] with dy/dt = [y', -y]
//! let mut rk = RungeKutta::rk4(|_t: f64, y: &Vector<f64, 2>| Vector::from_array([y[1], -y[0]]));
//! rk.init(0.0, &Vector::from_array([1.0, 0.0]));
//! let n = 1000;
//! let h = core::f64::consts::TAU / n as f64;
//! for _ in 0..n {
//!     rk.step(h).unwrap();
//! }
//! assert!((rk.state()[0] - 1.0).abs() < 1e-9);
//! assert!(rk.state()[1].abs() < 1e-9);
//! ```

mod runge_kutta;
mod system;
mod tableau;

#[cfg(all(test, feature = "std"))]
mod tests;

pub use runge_kutta::{RungeKutta, Trajectory};
pub use system::{OdeSystem, Odes};
pub use tableau::Tableau;

use core::fmt;

/// Errors from ODE integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OdeError {
    /// Stepping was requested before [`RungeKutta::init`].
    NotInitialized,
}

impl fmt::Display for OdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "integrator stepped before init"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OdeError {}
