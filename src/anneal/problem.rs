//! Calibrate-then-anneal session for one instance.

use super::calibrate::{calibrate, Calibration, Temperatures};
use super::config::AnnealConfig;
use super::moves::Neighborhood;
use super::runner::{AnnealResult, AnnealRunner};
use crate::error::{CalibrationError, ConfigError, SolveError};
use crate::model::{CostTable, Instance, RegionGroups, Route};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Temperature range used until [`TravellingSalesmanProblem::auto`] runs.
pub const DEFAULT_TEMPERATURES: Temperatures = Temperatures {
    t_max: 25_000.0,
    t_min: 2.5,
};

/// One optimization session: the current state, the data it is priced
/// against, the temperature range and the wall-clock deadline.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use u_zonetour::anneal::{AnnealConfig, TravellingSalesmanProblem};
/// use u_zonetour::io::parse_instance;
///
/// let text = "2 A\nhome\nA\nrest\nB C\nA B 1 10\nA C 1 30\nB A 2 10\nC A 2 10\n";
/// let instance = parse_instance(text.as_bytes()).unwrap();
/// let deadline = Instant::now() + Duration::from_millis(30);
/// let config = AnnealConfig::default().with_workers(2).with_seed(7);
///
/// let mut tsp = TravellingSalesmanProblem::from_instance(&instance, deadline, config).unwrap();
/// tsp.auto(200).unwrap();
/// let result = tsp.resolve().unwrap();
/// assert_eq!(result.best_cost, 20);
/// ```
#[derive(Debug)]
pub struct TravellingSalesmanProblem<'a> {
    pub t_max: f64,
    pub t_min: f64,
    state: Route<'a>,
    costs: &'a CostTable,
    groups: &'a RegionGroups,
    deadline: Instant,
    multi_zone: bool,
    config: AnnealConfig,
    rng: StdRng,
}

impl<'a> TravellingSalesmanProblem<'a> {
    /// Session over an explicit starting route.
    pub fn new(
        initial_state: Route<'a>,
        groups: &'a RegionGroups,
        multi_zone: bool,
        deadline: Instant,
        config: AnnealConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            t_max: DEFAULT_TEMPERATURES.t_max,
            t_min: DEFAULT_TEMPERATURES.t_min,
            costs: initial_state.costs(),
            state: initial_state,
            groups,
            deadline,
            multi_zone,
            config,
            rng,
        })
    }

    /// Session starting from the instance's randomized initial route.
    pub fn from_instance(
        instance: &'a Instance,
        deadline: Instant,
        config: AnnealConfig,
    ) -> Result<Self, ConfigError> {
        let mut tsp = Self::new(
            Route::new(&instance.costs),
            &instance.groups,
            instance.is_multi_zone(),
            deadline,
            config,
        )?;
        tsp.state = instance.initial_route(&mut tsp.rng);
        Ok(tsp)
    }

    /// Energy of the current state.
    pub fn energy(&self) -> i64 {
        self.state.total_cost()
    }

    pub fn state(&self) -> &Route<'a> {
        &self.state
    }

    pub fn costs(&self) -> &'a CostTable {
        self.costs
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = deadline;
    }

    pub fn is_multi_zone(&self) -> bool {
        self.multi_zone
    }

    pub fn temperatures(&self) -> Temperatures {
        Temperatures {
            t_max: self.t_max,
            t_min: self.t_min,
        }
    }

    fn neighborhood(&self) -> Neighborhood<'a> {
        Neighborhood::new(self.groups, self.multi_zone, self.config.move_attempts)
    }

    /// Calibrates `t_max`/`t_min` with probes of `steps` moves.
    ///
    /// The state is left at the best route seen while probing.
    pub fn auto(&mut self, steps: usize) -> Result<Calibration, CalibrationError> {
        let moves = self.neighborhood();
        let config = self.config.clone().with_calibration_steps(steps.max(1));
        let calibration = calibrate(&mut self.state, &moves, &config, &mut self.rng)?;
        self.t_max = calibration.temperatures.t_max;
        self.t_min = calibration.temperatures.t_min;
        Ok(calibration)
    }

    /// Anneals in parallel until the deadline and adopts the best route.
    pub fn resolve(&mut self) -> Result<AnnealResult<'a>, SolveError> {
        let moves = self.neighborhood();
        let result = AnnealRunner::run(
            &self.state,
            &moves,
            self.temperatures(),
            self.deadline,
            &self.config,
            &mut self.rng,
        )?;
        self.state.clone_from(&result.best);
        Ok(result)
    }

    /// Calibrates with the configured probe size, then resolves.
    pub fn solve(&mut self) -> Result<AnnealResult<'a>, SolveError> {
        self.auto(self.config.calibration_steps)?;
        self.resolve()
    }

    pub fn into_state(self) -> Route<'a> {
        self.state
    }
}
