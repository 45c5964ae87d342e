//! Simulation driver loop
//!
//! The core event loop that couples a generator to the book: derive
//! book-state weights (six-dimensional process only), generate the next
//! event, keep the book two-sided, price the event, apply it, and record
//! the outcome.

use crate::config::{ProcessSelection, SimulationConfig};
use crate::error::Result;
use crate::placement::PlacementPolicy;
use crate::recorder::CsvRecorder;
use crate::weights::derive_weights;
use lobsim_book::OrderBook;
use lobsim_core::{Event, Side};
use lobsim_process::{
    EventProcess, HawkesConfig, HawkesMultivariateProcess, HawkesUnivariateProcess,
    MultivariateHawkesConfig, PoissonConfig, PoissonProcess,
};

/// The generator variants the runner can drive.
///
/// Only the six-dimensional variant consumes book-state weights; the other
/// two price their own events and ignore the weighting step.
pub enum SimProcess {
    Poisson(PoissonProcess),
    Hawkes(HawkesUnivariateProcess),
    Hawkes6(HawkesMultivariateProcess),
}

impl SimProcess {
    fn from_config(config: &SimulationConfig) -> Result<Self> {
        let process = match &config.process {
            ProcessSelection::Poisson { rate } => SimProcess::Poisson(PoissonProcess::new(
                &PoissonConfig {
                    rate: *rate,
                    price_center: config.price_center,
                    tick_size: config.tick_size,
                    qty_min: config.qty_min,
                    qty_max: config.qty_max,
                    seed: config.seed,
                },
            )?),
            ProcessSelection::Hawkes { mu, alpha, beta } => {
                SimProcess::Hawkes(HawkesUnivariateProcess::new(&HawkesConfig {
                    mu: *mu,
                    alpha: *alpha,
                    beta: *beta,
                    price_center: config.price_center,
                    tick_size: config.tick_size,
                    qty_min: config.qty_min,
                    qty_max: config.qty_max,
                    seed: config.seed,
                })?)
            }
            ProcessSelection::Hawkes6 {
                baseline,
                excitation,
                decay,
            } => SimProcess::Hawkes6(HawkesMultivariateProcess::new(&MultivariateHawkesConfig {
                baseline: baseline.clone(),
                excitation: excitation.clone(),
                decay: decay.clone(),
                qty_min: config.qty_min,
                qty_max: config.qty_max,
                seed: config.seed,
            })?),
        };
        Ok(process)
    }
}

impl EventProcess for SimProcess {
    fn next(&mut self, now: f64) -> Event {
        match self {
            SimProcess::Poisson(process) => process.next(now),
            SimProcess::Hawkes(process) => process.next(now),
            SimProcess::Hawkes6(process) => process.next(now),
        }
    }
}

/// Aggregate results of a bounded run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub events_generated: u64,
    pub events_applied: u64,
    pub events_rejected: u64,
    /// Safety-net quotes injected when a side emptied
    pub refills: u64,
    /// Simulation clock after the last event
    pub end_time: f64,
    /// Average spread over the steps where both sides quoted
    pub avg_spread: f64,
    pub final_mid: Option<f64>,
}

/// Owns the book, the generator, and the recording for one simulation run
pub struct SimulationRunner {
    config: SimulationConfig,
    book: OrderBook,
    process: SimProcess,
    placement: PlacementPolicy,
    recorder: Option<CsvRecorder>,
    clock: f64,
    spread_sum: f64,
    spread_samples: u64,
    summary: RunSummary,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let process = SimProcess::from_config(&config)?;
        let book = OrderBook::new(config.tick_size);
        let placement = PlacementPolicy::new(config.placement.clone());
        let recorder = match &config.output {
            Some(path) => Some(CsvRecorder::create(path)?),
            None => None,
        };

        let mut runner = Self {
            config,
            book,
            process,
            placement,
            recorder,
            clock: 0.0,
            spread_sum: 0.0,
            spread_samples: 0,
            summary: RunSummary::default(),
        };
        runner.seed_book();
        Ok(runner)
    }

    /// Rest `seed_levels` quotes per side around the center before the run
    fn seed_book(&mut self) {
        let tick = self.book.tick_size();
        for level in 1..=self.config.seed_levels {
            let offset = f64::from(level) * tick;
            self.book.apply(&Event::add(
                0.0,
                Side::Bid,
                self.config.price_center - offset,
                self.config.seed_level_qty,
            ));
            self.book.apply(&Event::add(
                0.0,
                Side::Ask,
                self.config.price_center + offset,
                self.config.seed_level_qty,
            ));
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Run the configured number of events and return the final summary
    pub fn run(&mut self) -> Result<RunSummary> {
        for _ in 0..self.config.num_events {
            self.step()?;
        }
        if let Some(recorder) = &mut self.recorder {
            recorder.flush()?;
        }

        self.summary.end_time = self.clock;
        self.summary.final_mid = self.book.metrics().mid;
        self.summary.avg_spread = if self.spread_samples > 0 {
            self.spread_sum / self.spread_samples as f64
        } else {
            0.0
        };
        Ok(self.summary.clone())
    }

    /// One generate → refill → place → apply → record iteration
    pub fn step(&mut self) -> Result<Event> {
        if let SimProcess::Hawkes6(process) = &mut self.process {
            let weights = derive_weights(&self.book, &self.config.weights);
            process.set_weights(&weights)?;
        }

        let mut event = self.process.next(self.clock);
        self.clock = event.time;
        self.summary.events_generated += 1;

        self.refill_empty_sides();

        // Generators without book sight leave the sentinel price in place
        if event.uses_price() && event.price == 0.0 {
            self.placement.assign_price(&mut event, &self.book);
        }

        if self.book.apply(&event) {
            self.summary.events_applied += 1;
        } else {
            self.summary.events_rejected += 1;
            log::debug!("rejected event {event:?}");
        }

        let metrics = self.book.metrics();
        if let Some(spread) = metrics.spread {
            self.spread_sum += spread;
            self.spread_samples += 1;
        }

        if let Some(recorder) = &mut self.recorder {
            recorder.record(&event, &self.book.top(), &metrics)?;
        }

        if self.summary.events_generated % 100 == 0 {
            if let (Some(mid), Some(spread)) = (metrics.mid, metrics.spread) {
                log::debug!(
                    "t={:.3} mid={:.3} spread={:.3} applied={}",
                    self.clock,
                    mid,
                    spread,
                    self.summary.events_applied
                );
            }
        }

        Ok(event)
    }

    /// Never let the book go one-sided: quote a single level back in one
    /// tick from the center when a side empties
    fn refill_empty_sides(&mut self) {
        let tick = self.book.tick_size();
        let top = self.book.top();
        if top.bid.is_none() {
            self.book.apply(&Event::add(
                self.clock,
                Side::Bid,
                self.config.price_center - tick,
                self.config.refill_qty,
            ));
            self.summary.refills += 1;
        }
        if top.ask.is_none() {
            self.book.apply(&Event::add(
                self.clock,
                Side::Ask,
                self.config.price_center + tick,
                self.config.refill_qty,
            ));
            self.summary.refills += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_processes_every_event() {
        let config = SimulationConfig {
            num_events: 200,
            ..Default::default()
        };
        let mut runner = SimulationRunner::new(config).unwrap();
        let summary = runner.run().unwrap();

        assert_eq!(summary.events_generated, 200);
        assert_eq!(
            summary.events_applied + summary.events_rejected,
            summary.events_generated
        );
        assert!(summary.end_time > 0.0);
        assert!(summary.avg_spread >= 0.0);
    }

    #[test]
    fn test_safety_net_engages_on_thin_book() {
        let config = SimulationConfig {
            num_events: 400,
            seed_levels: 2,
            seed_level_qty: 10,
            ..Default::default()
        };
        let mut runner = SimulationRunner::new(config).unwrap();
        let summary = runner.run().unwrap();

        // Seeded liquidity is far too thin to survive 400 events
        assert!(summary.refills > 0);
        // A single event consumes at most one side, and both were refilled
        // before it applied, so the book never ends fully empty
        assert!(runner.book().bid_levels() + runner.book().ask_levels() >= 1);
    }

    #[test]
    fn test_empty_seed_triggers_refill() {
        let config = SimulationConfig {
            num_events: 1,
            seed_levels: 0,
            ..Default::default()
        };
        let mut runner = SimulationRunner::new(config).unwrap();
        runner.run().unwrap();

        assert!(runner.summary().refills >= 2);
        assert!(runner.book().top().bid.is_some());
        assert!(runner.book().top().ask.is_some());
    }

    #[test]
    fn test_deterministic_runs() {
        let config = SimulationConfig {
            num_events: 300,
            seed: 7,
            ..Default::default()
        };

        let mut first = SimulationRunner::new(config.clone()).unwrap();
        let mut second = SimulationRunner::new(config).unwrap();
        let summary_a = first.run().unwrap();
        let summary_b = second.run().unwrap();

        assert_eq!(summary_a.events_applied, summary_b.events_applied);
        assert_eq!(summary_a.events_rejected, summary_b.events_rejected);
        assert_eq!(summary_a.end_time, summary_b.end_time);
        assert_eq!(first.book().top(), second.book().top());
        assert_eq!(summary_a.final_mid, summary_b.final_mid);
    }

    #[test]
    fn test_poisson_and_univariate_paths() {
        for process in [
            ProcessSelection::Poisson { rate: 5.0 },
            ProcessSelection::Hawkes {
                mu: 1.2,
                alpha: 0.6,
                beta: 1.5,
            },
        ] {
            let config = SimulationConfig {
                num_events: 150,
                process,
                ..Default::default()
            };
            let mut runner = SimulationRunner::new(config).unwrap();
            let summary = runner.run().unwrap();
            assert_eq!(summary.events_generated, 150);
            // These generators price their own events; most should land
            assert!(summary.events_applied > 0);
        }
    }

    #[test]
    fn test_invalid_process_parameters_fail_construction() {
        let config = SimulationConfig {
            process: ProcessSelection::Poisson { rate: -1.0 },
            ..Default::default()
        };
        assert!(SimulationRunner::new(config).is_err());

        let config = SimulationConfig {
            process: ProcessSelection::Hawkes6 {
                baseline: vec![1.0; 4],
                excitation: vec![vec![0.0; 6]; 6],
                decay: vec![vec![1.5; 6]; 6],
            },
            ..Default::default()
        };
        assert!(SimulationRunner::new(config).is_err());
    }
}
