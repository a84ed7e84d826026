//! Parallel simulated annealing for day-dependent zone tours.
//!
//! A tour leaves a start region, visits exactly one region out of every
//! group of substitutable regions, and returns to the start. Leg `k` of the
//! tour is flown on day `k`, and every leg is priced by a
//! `(from, to, day)` cost table with a day-independent fallback.
//!
//! - **Model** ([`model`]): interned region ids, the cost table, region
//!   groups and the incrementally priced [`model::Route`].
//! - **Annealing** ([`anneal`]): the two neighborhood moves, automatic
//!   temperature calibration, and the deadline-driven parallel annealer
//!   racing several workers against one shared best route.
//! - **I/O** ([`io`]): the plain-text instance reader and route report.
//!
//! # Architecture
//!
//! The optimizer never touches region names; they are interned once at
//! parse time and only resolved again for output. Cost lookups are
//! lock-free reads of an immutable table, so workers contend only when one
//! of them publishes a new best route.

pub mod anneal;
pub mod error;
pub mod io;
pub mod model;

pub use anneal::{AnnealConfig, AnnealResult, TravellingSalesmanProblem};
pub use error::{CalibrationError, ConfigError, ParseError, SolveError};
pub use model::{CostTable, Instance, RegionGroups, RegionId, Route};
