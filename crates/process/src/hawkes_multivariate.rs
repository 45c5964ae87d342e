//! Six-dimensional self-exciting generator
//!
//! One intensity per (side, kind) combination of the event taxonomy, with
//! cross-excitation: an accepted event in dimension k instantaneously raises
//! every dimension i's statistic by α[i][k]. Each statistic decays at its
//! own diagonal rate β[i][i]; off-diagonal decay entries are accepted as
//! configuration but not used in the decay update. Cross-excitation
//! magnitude is governed by α while its fade rate is approximated by the
//! receiving dimension's own rate, a deliberate modeling simplification.
//!
//! An externally supplied weight vector scales each intensity before use in
//! both the thinning bound and the dimension-selection draw, which lets a
//! driver couple effective rates to live order-book conditions without
//! touching the excitation structure.

use crate::EventProcess;
use crate::error::{ProcessError, Result};
use crate::marks::{exp_draw, validate_quantity_bounds};
use lobsim_core::{Dimension, Event};
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

const DIM: usize = Dimension::COUNT;

/// Configuration for the six-dimensional Hawkes generator.
///
/// `baseline` must hold exactly six rates and the matrices must be 6×6,
/// indexed in [`Dimension`] order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultivariateHawkesConfig {
    /// Baseline intensity μᵢ per dimension (each > 0)
    pub baseline: Vec<f64>,
    /// Excitation matrix α: event in column k raises dimension i by α[i][k]
    pub excitation: Vec<Vec<f64>>,
    /// Decay matrix β; only the diagonal drives the decay update
    pub decay: Vec<Vec<f64>>,
    /// Inclusive quantity bounds
    pub qty_min: u32,
    pub qty_max: u32,
    /// Seed for the process-owned generator
    pub seed: u64,
}

impl Default for MultivariateHawkesConfig {
    fn default() -> Self {
        Self {
            baseline: vec![1.5, 1.5, 0.8, 0.8, 1.0, 1.0],
            excitation: vec![
                vec![0.6, 0.1, 0.1, 0.0, 0.2, 0.0],
                vec![0.1, 0.6, 0.0, 0.1, 0.0, 0.2],
                vec![0.1, 0.0, 0.4, 0.1, 0.1, 0.0],
                vec![0.0, 0.1, 0.1, 0.4, 0.0, 0.1],
                vec![0.2, 0.0, 0.1, 0.0, 0.5, 0.1],
                vec![0.0, 0.2, 0.0, 0.1, 0.1, 0.5],
            ],
            decay: vec![vec![1.5; DIM]; DIM],
            qty_min: 5,
            qty_max: 50,
            seed: 42,
        }
    }
}

/// Six-dimensional Hawkes event generator with state-dependent weighting
pub struct HawkesMultivariateProcess {
    mu: [f64; DIM],
    alpha: [[f64; DIM]; DIM],
    beta: [[f64; DIM]; DIM],
    /// Decayed cumulative excitation per dimension
    excitation: [f64; DIM],
    weights: [f64; DIM],
    last_time: f64,
    quantity: Uniform<u32>,
    rng: StdRng,
}

impl HawkesMultivariateProcess {
    pub fn new(config: &MultivariateHawkesConfig) -> Result<Self> {
        let mu = copy_vector(&config.baseline, "baseline")?;
        let alpha = copy_matrix(&config.excitation, "excitation")?;
        let beta = copy_matrix(&config.decay, "decay")?;

        for (i, &rate) in mu.iter().enumerate() {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ProcessError::InvalidParameter(format!(
                    "baseline[{i}] must be finite and positive, got {rate}"
                )));
            }
        }
        validate_quantity_bounds(config.qty_min, config.qty_max)?;

        Ok(Self {
            mu,
            alpha,
            beta,
            excitation: [0.0; DIM],
            weights: [1.0; DIM],
            last_time: 0.0,
            quantity: Uniform::new_inclusive(config.qty_min, config.qty_max),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Replace the per-dimension weight vector.
    ///
    /// Fails when the slice is not exactly six entries long. Non-finite or
    /// non-positive entries are snapped to 1.0 so the thinning bound stays
    /// usable; range clamping beyond that is the caller's policy.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        if weights.len() != DIM {
            return Err(ProcessError::DimensionMismatch {
                expected: DIM,
                actual: weights.len(),
            });
        }
        for (slot, &weight) in self.weights.iter_mut().zip(weights) {
            *slot = if weight.is_finite() && weight > 0.0 {
                weight
            } else {
                1.0
            };
        }
        Ok(())
    }

    /// Currently effective weight vector
    pub fn weights(&self) -> [f64; DIM] {
        self.weights
    }

    /// Intensity of one dimension at the internally tracked time, floored
    /// at zero for numerical safety
    pub fn intensity(&self, dimension: Dimension) -> f64 {
        let i = dimension.index();
        (self.mu[i] + self.excitation[i]).max(0.0)
    }

    fn decay_to(&mut self, time: f64) {
        if time <= self.last_time {
            return;
        }
        let dt = time - self.last_time;
        for i in 0..DIM {
            self.excitation[i] *= (-self.beta[i][i] * dt).exp();
        }
        self.last_time = time;
    }

    fn total_weighted_intensity(&self) -> f64 {
        Dimension::ALL
            .iter()
            .map(|&dimension| self.weights[dimension.index()] * self.intensity(dimension))
            .sum()
    }

    /// Weighted categorical draw over the per-dimension intensities.
    /// Rounding leftovers fall through to the last dimension.
    fn sample_dimension(&mut self) -> Dimension {
        let total = self.total_weighted_intensity();
        if !(total > 0.0) {
            return Dimension::BidAdd;
        }

        let draw = self.rng.r#gen::<f64>() * total;
        let mut cumulative = 0.0;
        for &dimension in Dimension::ALL.iter() {
            let mass = self.weights[dimension.index()] * self.intensity(dimension);
            if mass <= 0.0 {
                continue;
            }
            cumulative += mass;
            if draw <= cumulative {
                return dimension;
            }
        }
        Dimension::MarketSell
    }
}

impl EventProcess for HawkesMultivariateProcess {
    fn next(&mut self, now: f64) -> Event {
        self.decay_to(now);
        let mut current = now;

        loop {
            let mut bound = self.total_weighted_intensity();
            if !bound.is_finite() || bound <= 0.0 {
                // Recover with neutral weights; if the statistics themselves
                // are corrupt, restart them from the baseline.
                self.weights = [1.0; DIM];
                bound = self.total_weighted_intensity();
                if !bound.is_finite() || bound <= 0.0 {
                    self.excitation = [0.0; DIM];
                    self.last_time = current;
                    bound = self.total_weighted_intensity();
                }
            }

            let wait = exp_draw(&mut self.rng, bound);
            let candidate = current + wait;
            self.decay_to(candidate);

            let candidate_total = self.total_weighted_intensity();
            let accept: f64 = self.rng.r#gen();

            if accept <= candidate_total / bound {
                let fired = self.sample_dimension();

                // One event in `fired` excites every dimension by its
                // row entry in the fired column.
                for i in 0..DIM {
                    self.excitation[i] += self.alpha[i][fired.index()];
                }

                return Event {
                    time: candidate,
                    kind: fired.kind(),
                    side: fired.side(),
                    // The driver prices Add/Cancel from live book state
                    price: 0.0,
                    quantity: self.quantity.sample(&mut self.rng),
                };
            }
            // Rejected: time advances, no excitation
            current = candidate;
        }
    }
}

fn copy_vector(values: &[f64], name: &str) -> Result<[f64; DIM]> {
    let array: [f64; DIM] = values
        .try_into()
        .map_err(|_| ProcessError::DimensionMismatch {
            expected: DIM,
            actual: values.len(),
        })?;
    for (i, &value) in array.iter().enumerate() {
        if !value.is_finite() {
            return Err(ProcessError::InvalidParameter(format!(
                "{name}[{i}] must be finite, got {value}"
            )));
        }
    }
    Ok(array)
}

fn copy_matrix(rows: &[Vec<f64>], name: &str) -> Result<[[f64; DIM]; DIM]> {
    if rows.len() != DIM {
        return Err(ProcessError::DimensionMismatch {
            expected: DIM,
            actual: rows.len(),
        });
    }
    let mut matrix = [[0.0; DIM]; DIM];
    for (i, row) in rows.iter().enumerate() {
        matrix[i] = copy_vector(row, name)?;
    }
    Ok(matrix)
}
