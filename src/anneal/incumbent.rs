//! Best route shared by all annealing workers.

use crate::model::Route;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// Mutex-guarded best route with a lock-free energy mirror.
///
/// Workers compare against [`BestRoute::energy`] without locking and only
/// take the lock to publish or to copy the route out. Readers always get a
/// full copy, so no worker ever observes a half-written route. The stored
/// energy never increases over the holder's lifetime.
#[derive(Debug)]
pub struct BestRoute<'c> {
    route: Mutex<Route<'c>>,
    energy: AtomicI64,
}

impl<'c> BestRoute<'c> {
    pub fn new(route: Route<'c>) -> Self {
        Self {
            energy: AtomicI64::new(route.total_cost()),
            route: Mutex::new(route),
        }
    }

    /// Energy of the current best route.
    #[inline]
    pub fn energy(&self) -> i64 {
        self.energy.load(Ordering::Acquire)
    }

    /// Publishes a copy of `candidate` if it is no worse than the holder.
    ///
    /// Ties replace the stored route so that workers drifting across a
    /// plateau keep refreshing it. Returns whether the candidate was stored.
    pub fn offer(&self, candidate: &Route<'c>) -> bool {
        let cost = candidate.total_cost();
        if cost > self.energy() {
            return false;
        }

        let mut best = self.route.lock();
        if cost > best.total_cost() {
            return false;
        }
        best.clone_from(candidate);
        self.energy.store(cost, Ordering::Release);
        log::trace!("new best route energy {cost}");
        true
    }

    /// Overwrites `target` with a copy of the best route.
    pub fn copy_into(&self, target: &mut Route<'c>) {
        target.clone_from(&self.route.lock());
    }

    /// Copy of the best route.
    pub fn snapshot(&self) -> Route<'c> {
        self.route.lock().clone()
    }

    pub fn into_inner(self) -> Route<'c> {
        self.route.into_inner()
    }
}
