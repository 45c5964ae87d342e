//! Stochastic order-flow generators
//!
//! Time-inhomogeneous event simulators for a single instrument: a memoryless
//! Poisson baseline, a univariate self-exciting (Hawkes) process, and a
//! six-dimensional Hawkes process with cross-excitation, all simulated with
//! Ogata's thinning algorithm over exponential memory kernels.
//!
//! Every process owns its own seeded generator; identical parameters and
//! seed reproduce identical event sequences.

pub mod error;
pub mod hawkes_multivariate;
pub mod hawkes_univariate;
mod marks;
pub mod poisson;

pub use error::{ProcessError, Result};
pub use hawkes_multivariate::{HawkesMultivariateProcess, MultivariateHawkesConfig};
pub use hawkes_univariate::{HawkesConfig, HawkesUnivariateProcess};
pub use poisson::{PoissonConfig, PoissonProcess};

use lobsim_core::Event;

/// Anything that can produce the next order-book event.
///
/// `next` returns an event stamped at or after `now` (strictly after in
/// practice, arrivals being continuous) and advances internal state to the
/// returned timestamp, so a later call behaves correctly whether or not the
/// caller actually applied the event. Implementations are stateful and not
/// safe for concurrent use without external synchronization.
pub trait EventProcess {
    fn next(&mut self, now: f64) -> Event;
}
