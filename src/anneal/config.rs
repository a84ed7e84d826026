//! Annealer configuration.

use crate::error::ConfigError;
use std::num::NonZeroUsize;

/// Configuration for temperature calibration and the parallel annealer.
///
/// The wall-clock deadline is not part of the configuration; it is supplied
/// to [`super::TravellingSalesmanProblem`] by the caller.
///
/// # Examples
///
/// ```
/// use u_zonetour::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_calibration_steps(500)
///     .with_workers(4)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.worker_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct AnnealConfig {
    /// Moves per calibration trial.
    pub calibration_steps: usize,

    /// Acceptance ratio that defines `Tmax`.
    pub target_acceptance: f64,

    /// Factor by which calibration raises or lowers the temperature between
    /// trials. Must be greater than 1.
    pub temperature_step: f64,

    /// Moves tried while looking for a first nonzero energy change before
    /// calibration gives up.
    pub seed_search_limit: usize,

    /// Trials allowed in each calibration adjust loop.
    pub max_calibration_trials: usize,

    /// Steps between wall-clock reads in the annealing loop.
    pub check_interval: usize,

    /// Candidate moves tried per move call before it becomes a no-op.
    pub move_attempts: usize,

    /// Worker threads. `None` uses the available parallelism.
    pub workers: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// Per-worker generators are derived from it, so runs with the same seed
    /// differ only through thread timing.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            calibration_steps: 2000,
            target_acceptance: 0.98,
            temperature_step: 1.5,
            seed_search_limit: 100_000,
            max_calibration_trials: 10_000,
            check_interval: 1000,
            move_attempts: 10,
            workers: None,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_calibration_steps(mut self, n: usize) -> Self {
        self.calibration_steps = n;
        self
    }

    pub fn with_target_acceptance(mut self, ratio: f64) -> Self {
        self.target_acceptance = ratio;
        self
    }

    pub fn with_temperature_step(mut self, factor: f64) -> Self {
        self.temperature_step = factor;
        self
    }

    pub fn with_seed_search_limit(mut self, n: usize) -> Self {
        self.seed_search_limit = n;
        self
    }

    pub fn with_max_calibration_trials(mut self, n: usize) -> Self {
        self.max_calibration_trials = n;
        self
    }

    pub fn with_check_interval(mut self, n: usize) -> Self {
        self.check_interval = n;
        self
    }

    pub fn with_move_attempts(mut self, n: usize) -> Self {
        self.move_attempts = n;
        self
    }

    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of worker threads the annealer will start.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calibration_steps == 0 {
            return Err(ConfigError::ZeroCalibrationSteps);
        }
        if !(self.target_acceptance > 0.0 && self.target_acceptance < 1.0) {
            return Err(ConfigError::TargetAcceptance(self.target_acceptance));
        }
        if !(self.temperature_step > 1.0) {
            return Err(ConfigError::TemperatureStep(self.temperature_step));
        }
        if self.seed_search_limit == 0 {
            return Err(ConfigError::ZeroSeedSearchLimit);
        }
        if self.max_calibration_trials == 0 {
            return Err(ConfigError::ZeroCalibrationTrials);
        }
        if self.check_interval == 0 {
            return Err(ConfigError::ZeroCheckInterval);
        }
        if self.move_attempts == 0 {
            return Err(ConfigError::ZeroMoveAttempts);
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}
