use std::cmp::Ordering;

use fixedbitset::FixedBitSet;
use itertools::Itertools;
use log::trace;

use crate::problem::{euclidean_distance, Load, Point, DEPOT};
use crate::solution::{OpenRoute, Route};
use crate::solver::settings::{Settings, TieBreak};

/// Greedy route construction: a route always continues with the remaining load whose pickup is
/// closest to the last dropoff, and is closed as soon as that load (plus the way home) would
/// exceed the shift limit. Loads are never rejected; a load that cannot fit a shift on its own is
/// routed alone.
pub struct NearestSuccessorConstruction<'a> {
    pub settings: &'a Settings,
}

impl<'a> NearestSuccessorConstruction<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn construct(&self, loads: &[Load]) -> Vec<Route> {
        // the order only decides which load seeds a new route
        let sorted: Vec<&Load> = loads
            .iter()
            .sorted_by(|a, b| {
                a.own_distance()
                    .total_cmp(&b.own_distance())
                    .then(a.sequence_number.cmp(&b.sequence_number))
            })
            .collect();

        let mut routed = FixedBitSet::with_capacity(sorted.len());
        let mut num_remaining = sorted.len();
        let mut routes = Vec::new();
        let mut current = OpenRoute::new();

        while num_remaining > 0 {
            let idx = if current.is_empty() {
                match (0..sorted.len()).find(|&i| !routed.contains(i)) {
                    Some(idx) => idx,
                    None => break,
                }
            } else {
                let position = current.position();
                let idx = match self.nearest_remaining(&sorted, &routed, &position) {
                    Some(idx) => idx,
                    None => break,
                };
                let load = sorted[idx];
                let return_distance = euclidean_distance(&load.dropoff, &DEPOT);
                if current.time_with(load) + return_distance > self.settings.shift_limit {
                    let route = std::mem::take(&mut current).close();
                    trace!(
                        "closed route {} with {} loads ({:.2})",
                        routes.len() + 1,
                        route.len(),
                        route.total_time()
                    );
                    routes.push(route);
                    // the candidate is re-evaluated against the next route
                    continue;
                }
                idx
            };

            current.push(sorted[idx].clone());
            routed.insert(idx);
            num_remaining -= 1;
        }

        if !current.is_empty() {
            routes.push(current.close());
        }
        routes
    }

    fn nearest_remaining(
        &self,
        sorted: &[&Load],
        routed: &FixedBitSet,
        position: &Point,
    ) -> Option<usize> {
        // `min_by` keeps the first of equal elements, i.e. the earliest sorted position
        (0..sorted.len())
            .filter(|&i| !routed.contains(i))
            .map(|i| (i, euclidean_distance(position, &sorted[i].pickup)))
            .min_by(|(a, da), (b, db)| {
                da.total_cmp(db)
                    .then_with(|| self.tie_break(sorted[*a], sorted[*b]))
            })
            .map(|(i, _)| i)
    }

    fn tie_break(&self, a: &Load, b: &Load) -> Ordering {
        match self.settings.tie_break {
            TieBreak::SequenceNumber => a.sequence_number.cmp(&b.sequence_number),
            TieBreak::SortedOrder => Ordering::Equal,
        }
    }
}
