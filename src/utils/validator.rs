use fixedbitset::FixedBitSet;

use crate::problem::Load;
use crate::solution::{itinerary_time, route_cost, Route};
use crate::utils::Tolerance;

#[derive(Debug)]
pub enum Violation {
    /// a load of the input that no route serves (sequence number)
    Unrouted(usize),
    /// a routed load that is not in the input, or served twice (sequence number)
    Unexpected(usize),
    ShiftLimit { route: usize, excess: f64 },
    TimeMismatch { route: usize, recomputed: f64 },
    CostMismatch { route: usize },
}

#[derive(Debug)]
pub enum ValidatorResult {
    /// total driving time over all routes
    Valid(f64),
    ConstraintViolation(Violation),
}

impl ValidatorResult {
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Valid(_) => true,
            _ => false,
        }
    }

    pub fn assert_valid(&self) {
        match self {
            Self::Valid(_) => {}
            Self::ConstraintViolation(violation) => {
                assert!(false, "{:?}", violation)
            }
        }
    }
}

/// Checks that `routes` serve every load of `loads` exactly once, that only single-load routes
/// exceed `shift_limit` and that the stored times and costs match a recomputation.
pub fn validate_routes(loads: &[Load], routes: &[Route], shift_limit: f64) -> ValidatorResult {
    use ValidatorResult::*;
    use Violation::*;

    let mut served = FixedBitSet::with_capacity(loads.len());
    let mut total_time = 0.0;

    for (route_idx, route) in routes.iter().enumerate() {
        for load in route.loads() {
            let idx = (0..loads.len()).find(|&i| !served.contains(i) && &loads[i] == load);
            match idx {
                Some(idx) => served.insert(idx),
                None => return ConstraintViolation(Unexpected(load.sequence_number)),
            }
        }

        let recomputed = itinerary_time(route.loads());
        if (recomputed - route.total_time()).abs() > f64::tol() {
            return ConstraintViolation(TimeMismatch {
                route: route_idx,
                recomputed,
            });
        }
        if route.cost() != route_cost(route) {
            return ConstraintViolation(CostMismatch { route: route_idx });
        }
        if route.len() > 1 && route.total_time() > shift_limit + f64::tol() {
            return ConstraintViolation(ShiftLimit {
                route: route_idx,
                excess: route.total_time() - shift_limit,
            });
        }
        total_time += route.total_time();
    }

    if let Some(idx) = (0..loads.len()).find(|&i| !served.contains(i)) {
        return ConstraintViolation(Unrouted(loads[idx].sequence_number));
    }

    Valid(total_time)
}
