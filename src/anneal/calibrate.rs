//! Automatic temperature calibration.
//!
//! # Procedure
//!
//! 1. Apply moves until one changes the energy; its magnitude seeds `T`.
//! 2. Run a probe of `calibration_steps` Metropolis moves at `T` and record
//!    the acceptance and improvement ratios.
//! 3. Cool (divide by `temperature_step`) while acceptance is above the
//!    target, or heat (multiply) while it is below. The result is `Tmax`.
//! 4. From `Tmax`, cool until a probe accepts no improving move. That is
//!    `Tmin`.
//! 5. Leave the state at the best route seen during calibration.
//!
//! Every loop is capped so that a degenerate instance produces an error
//! instead of spinning.

use super::config::AnnealConfig;
use super::moves::Neighborhood;
use crate::error::{CalibrationError, CalibrationPhase, ConfigError};
use crate::model::Route;
use rand::Rng;

/// Temperature range for the annealing schedule.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    /// Temperature at which roughly `target_acceptance` of moves are kept.
    pub t_max: f64,
    /// Temperature at which no improving move is accepted any more.
    pub t_min: f64,
}

impl Temperatures {
    /// Checks `0 < t_min <= t_max` with both values finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.t_min.is_finite()
            && self.t_max.is_finite()
            && self.t_min > 0.0
            && self.t_min <= self.t_max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::Temperatures {
                t_max: self.t_max,
                t_min: self.t_min,
            })
        }
    }
}

/// Outcome of one calibration probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialStats {
    /// Energy of the probe's state when it finished.
    pub energy: i64,
    /// Fraction of moves that were kept.
    pub acceptance: f64,
    /// Fraction of moves that strictly lowered the energy.
    pub improvement: f64,
}

/// Result of a full calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub temperatures: Temperatures,
    /// Probe statistics measured at `t_max`.
    pub at_max: TrialStats,
    /// Number of probes run, the seed search excluded.
    pub trials: usize,
}

/// Calibrates the temperature range on `state`.
///
/// Whether calibration succeeds or fails, `state` is left at the best route
/// seen while probing.
pub fn calibrate<'c, R: Rng>(
    state: &mut Route<'c>,
    moves: &Neighborhood<'_>,
    config: &AnnealConfig,
    rng: &mut R,
) -> Result<Calibration, CalibrationError> {
    if state.len() < 3 {
        return Err(CalibrationError::EmptyRoute);
    }

    let mut probe = Probe {
        moves,
        steps: config.calibration_steps,
        prev: state.clone(),
        best: state.clone(),
    };

    let result = probe.bracket(state, config, rng);
    state.clone_from(&probe.best);

    match &result {
        Ok(cal) => log::debug!(
            "calibrated t_max={:.4} (acceptance {:.4}) t_min={:.6} after {} trials, best energy {}",
            cal.temperatures.t_max,
            cal.at_max.acceptance,
            cal.temperatures.t_min,
            cal.trials,
            state.total_cost()
        ),
        Err(err) => log::debug!("calibration stopped: {err}, best energy {}", state.total_cost()),
    }
    result
}

fn bump(n: usize, limit: usize, phase: CalibrationPhase) -> Result<usize, CalibrationError> {
    if n >= limit {
        return Err(CalibrationError::TrialLimit { phase, trials: n });
    }
    Ok(n + 1)
}

struct Probe<'a, 'n, 'c> {
    moves: &'n Neighborhood<'a>,
    steps: usize,
    prev: Route<'c>,
    best: Route<'c>,
}

impl<'c> Probe<'_, '_, 'c> {
    fn note_best(&mut self, state: &Route<'c>) {
        if state.total_cost() < self.best.total_cost() {
            self.best.clone_from(state);
        }
    }

    /// Seeds `T`, then brackets `t_max` and `t_min` around it.
    fn bracket<R: Rng>(
        &mut self,
        state: &mut Route<'c>,
        config: &AnnealConfig,
        rng: &mut R,
    ) -> Result<Calibration, CalibrationError> {
        let mut t = self.seed_temperature(state, config.seed_search_limit, rng)?;
        let target = config.target_acceptance;
        let factor = config.temperature_step;
        let limit = config.max_calibration_trials;
        let mut trials = 1;

        let mut stats = self.run(state, t, rng);

        if stats.acceptance > target {
            let mut n = 0;
            while stats.acceptance > target {
                n = bump(n, limit, CalibrationPhase::Cooling)?;
                t /= factor;
                stats = self.run(state, t, rng);
            }
            trials += n;
        } else if stats.acceptance < target {
            let mut n = 0;
            while stats.acceptance < target {
                n = bump(n, limit, CalibrationPhase::Heating)?;
                t *= factor;
                stats = self.run(state, t, rng);
            }
            trials += n;
        }
        let t_max = t;
        let at_max = stats;

        let mut n = 0;
        while stats.improvement > 0.0 {
            n = bump(n, limit, CalibrationPhase::Quench)?;
            t /= factor;
            stats = self.run(state, t, rng);
        }
        trials += n;

        Ok(Calibration {
            temperatures: Temperatures { t_max, t_min: t },
            at_max,
            trials,
        })
    }

    /// Moves `state` until its energy changes and returns the magnitude.
    fn seed_temperature<R: Rng>(
        &mut self,
        state: &mut Route<'c>,
        limit: usize,
        rng: &mut R,
    ) -> Result<f64, CalibrationError> {
        let start = state.total_cost();
        for step in 1..=limit {
            self.moves.apply(step, state, rng);
            self.note_best(state);
            let delta = (state.total_cost() - start).abs();
            if delta != 0 {
                return Ok(delta as f64);
            }
        }
        Err(CalibrationError::NoEnergyChange { attempts: limit })
    }

    /// One Metropolis probe at temperature `t`.
    fn run<R: Rng>(&mut self, state: &mut Route<'c>, t: f64, rng: &mut R) -> TrialStats {
        self.prev.clone_from(state);
        let mut accepts = 0usize;
        let mut improves = 0usize;

        for step in 1..=self.steps {
            self.moves.apply(step, state, rng);
            let delta = state.total_cost() - self.prev.total_cost();
            self.note_best(state);

            if delta > 0 && (-(delta as f64) / t).exp() < rng.random::<f64>() {
                state.clone_from(&self.prev);
            } else {
                accepts += 1;
                if delta < 0 {
                    improves += 1;
                }
                self.prev.clone_from(state);
            }
        }

        TrialStats {
            energy: state.total_cost(),
            acceptance: accepts as f64 / self.steps as f64,
            improvement: improves as f64 / self.steps as f64,
        }
    }
}
