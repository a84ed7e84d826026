//! Parallel simulated annealing over zone tours.
//!
//! A session first calibrates its temperature range on the live state
//! ([`calibrate`]) and then races one annealing trajectory per worker
//! against a shared best route until a wall-clock deadline
//! ([`AnnealRunner`]). Cooling is keyed to elapsed time rather than step
//! count, so workers of different speed follow the same temperature curve.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod calibrate;
mod config;
mod incumbent;
mod moves;
mod problem;
mod runner;

pub use calibrate::{calibrate, Calibration, Temperatures, TrialStats};
pub use config::AnnealConfig;
pub use incumbent::BestRoute;
pub use moves::Neighborhood;
pub use problem::{TravellingSalesmanProblem, DEFAULT_TEMPERATURES};
pub use runner::{AnnealResult, AnnealRunner, CoolingSchedule};
