//! Parallel, deadline-driven annealing loop.
//!
//! # Algorithm
//!
//! Every worker runs its own trajectory from a copy of the initial route:
//!
//! 1. Every `check_interval` steps, read the clock and stop once the
//!    deadline has passed.
//! 2. Derive the temperature from elapsed wall-clock time:
//!    `T = Tmax * exp(-ln(Tmax / Tmin) * elapsed / total)`.
//! 3. Apply one move and publish the state if it ties or beats the shared
//!    best.
//! 4. Metropolis acceptance: a worsening move survives with probability
//!    `exp(-dE / T)`, otherwise the state reverts to the last accepted one.
//! 5. If the worker's own best is behind the shared best, restart from a
//!    copy of the shared best.
//!
//! Workers only meet at the shared [`BestRoute`]; there is no other
//! cross-worker ordering.

use super::calibrate::Temperatures;
use super::config::AnnealConfig;
use super::incumbent::BestRoute;
use super::moves::Neighborhood;
use crate::error::SolveError;
use crate::model::Route;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Result of a parallel annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<'c> {
    /// The best route found by any worker.
    pub best: Route<'c>,

    /// Energy of `best`.
    pub best_cost: i64,

    /// Steps executed, summed over all workers.
    pub iterations: usize,

    /// Number of workers that ran.
    pub workers: usize,

    /// Lowest energy each worker's own trajectory reached, in worker order.
    pub worker_best: Vec<i64>,

    /// Temperature range the schedule used.
    pub temperatures: Temperatures,

    /// Wall-clock time spent in the run.
    pub elapsed: Duration,
}

/// Wall-clock keyed geometric cooling from `t_max` down to `t_min`.
#[derive(Debug, Clone, Copy)]
pub struct CoolingSchedule {
    t_max: f64,
    factor: f64,
    start: Instant,
    total: Duration,
}

impl CoolingSchedule {
    pub fn new(temperatures: Temperatures, start: Instant, deadline: Instant) -> Self {
        let Temperatures { t_max, t_min } = temperatures;
        Self {
            t_max,
            factor: -(t_max / t_min).ln(),
            start,
            total: deadline.saturating_duration_since(start),
        }
    }

    /// Fraction of the window elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.total.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.total.as_secs_f64()).min(1.0)
    }

    #[inline]
    pub fn temperature(&self, now: Instant) -> f64 {
        self.t_max * (self.factor * self.progress(now)).exp()
    }
}

/// Executes the parallel annealer.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Anneals `initial` until `deadline` on `config.worker_count()` threads.
    ///
    /// Per-worker generators are seeded from `rng`. A deadline that has
    /// already passed still gives every worker one check cycle, so the call
    /// returns promptly with a route no worse than `initial`.
    pub fn run<'c, R: Rng>(
        initial: &Route<'c>,
        moves: &Neighborhood<'_>,
        temperatures: Temperatures,
        deadline: Instant,
        config: &AnnealConfig,
        rng: &mut R,
    ) -> Result<AnnealResult<'c>, SolveError> {
        config.validate()?;
        temperatures.validate()?;

        let workers = config.worker_count();
        let seeds: Vec<u64> = (0..workers).map(|_| rng.random()).collect();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("anneal-{i}"))
            .build()?;

        let start = Instant::now();
        if deadline <= start {
            log::warn!("deadline already passed, running a single check cycle");
        }
        let schedule = CoolingSchedule::new(temperatures, start, deadline);
        let best = BestRoute::new(initial.clone());

        let reports: Vec<WorkerReport> = pool.install(|| {
            seeds
                .into_par_iter()
                .with_max_len(1)
                .map(|seed| {
                    let worker = Worker {
                        moves,
                        best: &best,
                        schedule,
                        deadline,
                        check_interval: config.check_interval,
                    };
                    worker.run(initial, StdRng::seed_from_u64(seed))
                })
                .collect()
        });
        let iterations: usize = reports.iter().map(|r| r.steps).sum();
        let worker_best: Vec<i64> = reports.iter().map(|r| r.best).collect();

        let best = best.into_inner();
        let elapsed = start.elapsed();
        log::debug!(
            "annealed {iterations} steps on {workers} workers in {} ms, best energy {}",
            elapsed.as_millis(),
            best.total_cost()
        );

        Ok(AnnealResult {
            best_cost: best.total_cost(),
            best,
            iterations,
            workers,
            worker_best,
            temperatures,
            elapsed,
        })
    }
}

struct WorkerReport {
    steps: usize,
    best: i64,
}

struct Worker<'r, 'a, 'c> {
    moves: &'r Neighborhood<'a>,
    best: &'r BestRoute<'c>,
    schedule: CoolingSchedule,
    deadline: Instant,
    check_interval: usize,
}

impl<'c> Worker<'_, '_, 'c> {
    /// Runs one trajectory until the deadline.
    fn run(&self, initial: &Route<'c>, mut rng: StdRng) -> WorkerReport {
        let mut current = initial.clone();
        let mut prev = current.clone();
        let mut local_best = current.total_cost();
        let mut reached = local_best;

        let mut now = Instant::now();
        let mut step = 0usize;
        let mut stop = false;

        while !stop {
            if step % self.check_interval == 0 {
                now = Instant::now();
                stop = now >= self.deadline;
            }

            let t = self.schedule.temperature(now);
            self.moves.apply(step, &mut current, &mut rng);
            let delta = current.total_cost() - prev.total_cost();
            reached = reached.min(current.total_cost());

            if current.total_cost() <= self.best.energy() && self.best.offer(&current) {
                local_best = current.total_cost();
            }

            if delta > 0 && (-(delta as f64) / t).exp() < rng.random::<f64>() {
                current.clone_from(&prev);
            } else {
                prev.clone_from(&current);
            }

            if local_best > self.best.energy() {
                self.best.copy_into(&mut current);
                prev.clone_from(&current);
                local_best = current.total_cost();
            }

            step += 1;
        }

        WorkerReport {
            steps: step,
            best: reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CostTable, RegionGroups, RegionId, RegionIndex};

    struct Ring {
        ids: Vec<RegionId>,
        groups: RegionGroups,
        costs: CostTable,
    }

    /// Eight single-member groups on a ring: neighbours cost 1, everything
    /// else costs the ring distance squared.
    fn ring() -> Ring {
        let mut index = RegionIndex::new();
        let mut groups = RegionGroups::new();
        let ids: Vec<RegionId> = (0..8).map(|i| index.intern(&format!("P{i}"))).collect();
        for (i, &id) in ids.iter().enumerate() {
            groups.add_region(&format!("g{i}"), &[id]);
        }
        let mut costs = CostTable::new();
        for (i, &from) in ids.iter().enumerate() {
            for (j, &to) in ids.iter().enumerate() {
                if i != j {
                    let d = (i as i64 - j as i64).rem_euclid(8).min((j as i64 - i as i64).rem_euclid(8));
                    costs.add_cost(from, to, 0, d * d);
                }
            }
        }
        Ring { ids, groups, costs }
    }

    fn scrambled(ring: &Ring) -> Route<'_> {
        let order = [0, 4, 2, 6, 1, 5, 3, 7, 0];
        Route::from_regions(&ring.costs, order.iter().map(|&i| ring.ids[i]))
    }

    fn temps() -> Temperatures {
        Temperatures {
            t_max: 20.0,
            t_min: 0.05,
        }
    }

    #[test]
    fn test_schedule_endpoints() {
        let start = Instant::now();
        let deadline = start + Duration::from_secs(10);
        let schedule = CoolingSchedule::new(temps(), start, deadline);
        assert!((schedule.temperature(start) - 20.0).abs() < 1e-9);
        assert!((schedule.temperature(deadline) - 0.05).abs() < 1e-9);
        let mid = schedule.temperature(start + Duration::from_secs(5));
        assert!((mid - (20.0f64 * 0.05).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_schedule_with_elapsed_deadline() {
        let start = Instant::now();
        let schedule = CoolingSchedule::new(temps(), start, start);
        assert_eq!(schedule.progress(start), 1.0);
        assert!((schedule.temperature(start) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_run_improves_scrambled_ring() {
        let ring = ring();
        let initial = scrambled(&ring);
        let moves = Neighborhood::new(&ring.groups, false, 10);
        let config = AnnealConfig::default().with_workers(2).with_seed(42);
        let mut rng = StdRng::seed_from_u64(42);
        let deadline = Instant::now() + Duration::from_millis(150);

        let result =
            AnnealRunner::run(&initial, &moves, temps(), deadline, &config, &mut rng).unwrap();

        assert!(result.best_cost < initial.total_cost());
        assert_eq!(result.best_cost, result.best.recompute_cost());
        assert_eq!(result.best.region(0), ring.ids[0]);
        assert_eq!(result.best.region(8), ring.ids[0]);
        assert_eq!(result.workers, 2);
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_elapsed_deadline_returns_promptly() {
        let ring = ring();
        let initial = scrambled(&ring);
        let moves = Neighborhood::new(&ring.groups, false, 10);
        let config = AnnealConfig::default().with_workers(3);
        let mut rng = StdRng::seed_from_u64(1);
        let deadline = Instant::now();

        let result =
            AnnealRunner::run(&initial, &moves, temps(), deadline, &config, &mut rng).unwrap();

        assert!(result.best_cost <= initial.total_cost());
        // one step per worker
        assert_eq!(result.iterations, 3);
        assert!(result.elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_zero_t_min_is_rejected() {
        let ring = ring();
        let initial = scrambled(&ring);
        let moves = Neighborhood::new(&ring.groups, false, 10);
        let config = AnnealConfig::default().with_workers(1);
        let mut rng = StdRng::seed_from_u64(1);
        let bad = Temperatures {
            t_max: 5.0,
            t_min: 0.0,
        };
        let err = AnnealRunner::run(&initial, &moves, bad, Instant::now(), &config, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SolveError::Config(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let ring = ring();
        let initial = scrambled(&ring);
        let moves = Neighborhood::new(&ring.groups, false, 10);
        let config = AnnealConfig::default().with_check_interval(0);
        let mut rng = StdRng::seed_from_u64(1);
        let err = AnnealRunner::run(&initial, &moves, temps(), Instant::now(), &config, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SolveError::Config(_)));
    }

    #[test]
    fn test_result_beats_every_worker() {
        let ring = ring();
        let initial = scrambled(&ring);
        let moves = Neighborhood::new(&ring.groups, false, 10);
        let config = AnnealConfig::default().with_workers(4).with_seed(8);
        let mut rng = StdRng::seed_from_u64(8);
        let deadline = Instant::now() + Duration::from_millis(80);

        let result =
            AnnealRunner::run(&initial, &moves, temps(), deadline, &config, &mut rng).unwrap();

        assert_eq!(result.worker_best.len(), 4);
        for &reached in &result.worker_best {
            assert!(reached <= initial.total_cost());
            assert!(result.best_cost <= reached);
        }
        assert_eq!(Some(&result.best_cost), result.worker_best.iter().min());
    }
}
