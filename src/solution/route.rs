use serde::Serialize;

use crate::problem::{euclidean_distance, Load, Point, DEPOT};

/// A finalized driver assignment. Loads are kept in insertion order and `total_time` includes
/// both depot legs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    loads: Vec<Load>,
    total_time: f64,
    cost: f64,
}

impl Route {
    pub fn loads(&self) -> &[Load] {
        &self.loads
    }
    pub fn len(&self) -> usize {
        self.loads.len()
    }
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
    pub fn cost(&self) -> f64 {
        self.cost
    }
    pub fn sequence_numbers(&self) -> Vec<usize> {
        self.loads.iter().map(|it| it.sequence_number).collect()
    }
}

/// Variable cost of a finished route: driving time maps 1:1 onto cost.
pub fn route_cost(route: &Route) -> f64 {
    route.total_time
}

/// Recomputes depot -> pickup -> dropoff -> ... -> depot for a sequence of loads.
pub fn itinerary_time(loads: &[Load]) -> f64 {
    if loads.is_empty() {
        return 0.0;
    }
    let mut position = DEPOT;
    let mut time = 0.0;
    for load in loads {
        time += euclidean_distance(&position, &load.pickup) + load.own_distance();
        position = load.dropoff;
    }
    time + euclidean_distance(&position, &DEPOT)
}

/// The route currently being grown by the construction. It is open until `close` turns it into
/// an immutable [`Route`].
#[derive(Debug, Default)]
pub struct OpenRoute {
    loads: Vec<Load>,
    total_time: f64,
}

impl OpenRoute {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Where the driver stands after the last dropoff (the depot while empty).
    pub fn position(&self) -> Point {
        self.loads.last().map(|it| it.dropoff).unwrap_or(DEPOT)
    }

    /// Driving time of the route if `load` were appended, without the return leg.
    pub fn time_with(&self, load: &Load) -> f64 {
        self.total_time + euclidean_distance(&self.position(), &load.pickup) + load.own_distance()
    }

    pub fn push(&mut self, load: Load) {
        self.total_time = self.time_with(&load);
        self.loads.push(load);
    }

    /// Adds the leg back to the depot and finalizes the cost.
    pub fn close(self) -> Route {
        let total_time = self.total_time + euclidean_distance(&self.position(), &DEPOT);
        let mut route = Route {
            loads: self.loads,
            total_time,
            cost: 0.0,
        };
        route.cost = route_cost(&route);
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Tolerance;

    fn load(sequence_number: usize, pickup: (f64, f64), dropoff: (f64, f64)) -> Load {
        Load::new(sequence_number, pickup, dropoff, "route.txt", 1)
    }

    #[test]
    fn close_adds_return_leg_and_cost() {
        let mut open = OpenRoute::new();
        assert!(open.is_empty());
        assert_eq!(open.position(), DEPOT);

        open.push(load(1, (0.0, 0.0), (10.0, 0.0)));
        open.push(load(2, (10.0, 0.0), (20.0, 0.0)));
        assert_eq!(open.total_time(), 20.0);
        assert_eq!(open.position(), Point::new(20.0, 0.0));

        let route = open.close();
        assert_eq!(route.total_time(), 40.0);
        assert_eq!(route.cost(), 40.0);
        assert_eq!(route_cost(&route), route.total_time());
        assert_eq!(route.sequence_numbers(), vec![1, 2]);
    }

    #[test]
    fn time_with_does_not_modify_route() {
        let mut open = OpenRoute::new();
        open.push(load(1, (3.0, 4.0), (3.0, 0.0)));
        let candidate = load(2, (6.0, 4.0), (6.0, 0.0));

        assert!((open.time_with(&candidate) - (9.0 + 5.0 + 4.0)).abs() < f64::tol());
        assert!((open.total_time() - 9.0).abs() < f64::tol());
    }

    #[test]
    fn itinerary_time_matches_incremental_bookkeeping() {
        let loads = vec![
            load(4, (1.0, 2.0), (-3.0, 5.5)),
            load(9, (7.0, -1.0), (2.0, 2.0)),
            load(1, (0.5, 0.5), (12.0, 3.0)),
        ];
        let mut open = OpenRoute::new();
        for it in loads.iter().cloned() {
            open.push(it);
        }
        let route = open.close();
        assert!((itinerary_time(route.loads()) - route.total_time()).abs() < f64::tol());
        assert_eq!(itinerary_time(&[]), 0.0);
    }
}
