//! Monte Carlo sampling of field line curvature against end point displacement.

use crate::{
    geometry::Idx3,
    grid::FieldGrid,
    num::{self, BFloat},
    random,
    tracing::{curvature::CurvatureEstimator3, stepping::LatticeStepper3, trace_lattice_field_line},
};
use rand::Rng;
use thiserror::Error;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Configuration parameters for curvature sampling.
#[derive(Clone, Debug)]
pub struct CurvatureSamplerConfig {
    /// Number of samples to produce.
    pub n_trials: usize,
    /// Number of start points to try for a single trial before giving up.
    pub max_attempts_per_trial: usize,
    /// Smallest number of steps to trace in a trial (at least `MIN_TRACE_LENGTH_OFFSET`).
    pub trace_length_offset: usize,
}

impl CurvatureSamplerConfig {
    pub const DEFAULT_N_TRIALS: usize = 100000;
    pub const DEFAULT_MAX_ATTEMPTS_PER_TRIAL: usize = 10000;
    pub const DEFAULT_TRACE_LENGTH_OFFSET: usize = 2;
    pub const MIN_TRACE_LENGTH_OFFSET: usize = 2;

    fn validate(&self) {
        assert!(
            self.max_attempts_per_trial > 0,
            "Maximum number of attempts per trial must be larger than zero."
        );
        assert!(
            self.trace_length_offset >= Self::MIN_TRACE_LENGTH_OFFSET,
            "Trace length offset must be at least {}.",
            Self::MIN_TRACE_LENGTH_OFFSET
        );
    }
}

impl Default for CurvatureSamplerConfig {
    fn default() -> Self {
        CurvatureSamplerConfig {
            n_trials: Self::DEFAULT_N_TRIALS,
            max_attempts_per_trial: Self::DEFAULT_MAX_ATTEMPTS_PER_TRIAL,
            trace_length_offset: Self::DEFAULT_TRACE_LENGTH_OFFSET,
        }
    }
}

/// Outcome of a single completed trial.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct CurvatureSample<F: BFloat> {
    /// Index where tracing started.
    pub start: Idx3<usize>,
    /// Index where the final curvature was estimated.
    pub end: Idx3<usize>,
    /// Number of steps taken before tracing stopped.
    pub n_steps: usize,
    /// Distance between the start and end positions in local coordinates.
    pub distance: F,
    pub initial_curvature: F,
    pub final_curvature: F,
    pub average_curvature: F,
}

/// Counts accumulated over a sampling run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// Number of trials that produced a sample.
    pub completed_trials: usize,
    /// Number of drawn start points that were discarded.
    pub discarded_attempts: usize,
}

/// Failure of a sampling run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SamplingError {
    #[error("No usable start point found for trial {trial} after {attempts} attempts")]
    StartPointsExhausted { trial: usize, attempts: usize },
}

/// Sampler repeatedly tracing field lines from random lattice cells and recording
/// how far they get versus how much they bend.
#[derive(Clone, Debug)]
pub struct CurvatureSampler<St: LatticeStepper3> {
    config: CurvatureSamplerConfig,
    estimator: CurvatureEstimator3<St>,
}

impl<St: LatticeStepper3> CurvatureSampler<St> {
    /// Creates a new sampler with the given configuration, using the given stepper
    /// both for tracing and for curvature estimation.
    pub fn new(config: CurvatureSamplerConfig, stepper: St) -> Self {
        config.validate();
        CurvatureSampler {
            config,
            estimator: CurvatureEstimator3::new(stepper),
        }
    }

    /// Returns the configuration of the sampler.
    pub fn config(&self) -> &CurvatureSamplerConfig {
        &self.config
    }

    /// Returns the curvature estimator used by the sampler.
    pub fn estimator(&self) -> &CurvatureEstimator3<St> {
        &self.estimator
    }

    /// Performs all configured trials.
    ///
    /// # Parameters
    ///
    /// - `grid`: Grid holding the field to sample.
    /// - `rng`: Random number generator for start points and trace lengths.
    /// - `handle_sample`: Closure called with each sample as soon as it is produced.
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains the statistics of the run.
    /// - `Err`: Contains a `SamplingError` if some trial ran out of attempts.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    /// - `R`: Type of random number generator.
    /// - `H`: Function type taking a sample.
    pub fn run<F, R, H>(
        &self,
        grid: &FieldGrid<F>,
        rng: &mut R,
        mut handle_sample: H,
    ) -> Result<SamplingStats, SamplingError>
    where
        F: BFloat,
        R: Rng + ?Sized,
        H: FnMut(CurvatureSample<F>),
    {
        let mut stats = SamplingStats::default();
        for _ in 0..self.config.n_trials {
            let sample = self.draw_sample(grid, rng, &mut stats)?;
            stats.completed_trials += 1;
            handle_sample(sample);
        }
        Ok(stats)
    }

    /// Performs a single trial, redrawing the start point until it succeeds
    /// or the attempt budget is spent.
    ///
    /// Discarded attempts are added to the given statistics.
    pub fn draw_sample<F, R>(
        &self,
        grid: &FieldGrid<F>,
        rng: &mut R,
        stats: &mut SamplingStats,
    ) -> Result<CurvatureSample<F>, SamplingError>
    where
        F: BFloat,
        R: Rng + ?Sized,
    {
        for _ in 0..self.config.max_attempts_per_trial {
            if let Some(sample) = self.attempt_trial(grid, rng) {
                return Ok(sample);
            }
            stats.discarded_attempts += 1;
        }
        Err(SamplingError::StartPointsExhausted {
            trial: stats.completed_trials,
            attempts: self.config.max_attempts_per_trial,
        })
    }

    fn attempt_trial<F, R>(&self, grid: &FieldGrid<F>, rng: &mut R) -> Option<CurvatureSample<F>>
    where
        F: BFloat,
        R: Rng + ?Sized,
    {
        let max_steps =
            random::draw_trace_length(rng, grid.min_extent(), self.config.trace_length_offset);
        let start = random::draw_lattice_index(rng, grid.shape());

        let initial_curvature = self.estimator.curvature(grid, &start)?;

        let line = trace_lattice_field_line(self.estimator.stepper(), grid, &start, max_steps);

        // Fall back to earlier cells when the line ends too close to where it stops
        let (end, final_curvature) = line
            .recent_indices()
            .iter()
            .find_map(|&indices| {
                self.estimator
                    .curvature(grid, indices)
                    .map(|curvature| (*indices, curvature))
            })?;

        let distance = grid.position(&start).distance_to(grid.position(&end));
        let average_curvature = (initial_curvature + final_curvature) / num::from_f64(2.0);

        Some(CurvatureSample {
            start,
            end,
            n_steps: line.n_steps(),
            distance,
            initial_curvature,
            final_curvature,
            average_curvature,
        })
    }
}
