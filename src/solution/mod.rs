use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;

pub use route::{itinerary_time, route_cost, OpenRoute, Route};

use crate::problem::InstanceKey;

pub mod route;

/// Routes of a single instance together with their costs.
#[derive(Clone, Debug)]
pub struct InstanceResult {
    pub key: InstanceKey,
    pub routes: Vec<Route>,
    pub duration: Duration,
    pub(crate) total_time: f64,
    pub(crate) cost: f64,
}

impl InstanceResult {
    /// `cost = fixed_cost_per_driver * #routes + sum of route times`
    pub fn new(
        key: InstanceKey,
        routes: Vec<Route>,
        duration: Duration,
        fixed_cost_per_driver: f64,
    ) -> Self {
        let total_time: f64 = routes.iter().map(|it| it.total_time()).sum();
        let cost = fixed_cost_per_driver * routes.len() as f64 + total_time;
        Self {
            key,
            routes,
            duration,
            total_time,
            cost,
        }
    }
    pub fn number_of_drivers(&self) -> usize {
        self.routes.len()
    }
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
    pub fn cost(&self) -> f64 {
        self.cost
    }
    pub fn number_of_loads(&self) -> usize {
        self.routes.iter().map(|it| it.len()).sum()
    }

    pub fn get_summary_string(&self) -> String {
        format!(
            "{}/{:.2}/{:.2}",
            self.number_of_drivers(),
            self.total_time(),
            self.cost()
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Kpis {
    pub number_of_drivers: usize,
    pub total_cost: f64,
    pub mean_cost: f64,
    /// seconds of wall-clock time for the whole batch
    pub time_taken: f64,
    #[serde(rename = "drivers_per_file")]
    pub drivers_per_instance: IndexMap<InstanceKey, usize>,
    /// seconds per instance
    #[serde(rename = "file_durations")]
    pub instance_durations: IndexMap<InstanceKey, f64>,
    #[serde(rename = "file_costs")]
    pub instance_costs: IndexMap<InstanceKey, f64>,
}

/// Merged outcome of all instances of one batch.
#[derive(Clone, Debug, Serialize)]
pub struct BatchResult {
    #[serde(rename = "drivers")]
    pub routes: Vec<Route>,
    pub kpis: Kpis,
    #[serde(skip)]
    pub instances: Vec<InstanceResult>,
}

impl BatchResult {
    /// Merges per-instance results in the given order; `time_taken` is measured by the caller
    /// around the whole pass.
    pub fn merge(instances: Vec<InstanceResult>, time_taken: Duration) -> Self {
        let mut drivers_per_instance = IndexMap::with_capacity(instances.len());
        let mut instance_durations = IndexMap::with_capacity(instances.len());
        let mut instance_costs = IndexMap::with_capacity(instances.len());

        for result in instances.iter() {
            drivers_per_instance.insert(result.key.clone(), result.number_of_drivers());
            instance_durations.insert(result.key.clone(), result.duration.as_secs_f64());
            instance_costs.insert(result.key.clone(), result.cost());
        }

        let routes: Vec<Route> = instances
            .iter()
            .flat_map(|it| it.routes.iter().cloned())
            .collect();
        let total_cost: f64 = instances.iter().map(|it| it.cost()).sum();
        let mean_cost = if instances.is_empty() {
            0.0
        } else {
            total_cost / instances.len() as f64
        };

        Self {
            kpis: Kpis {
                number_of_drivers: routes.len(),
                total_cost,
                mean_cost,
                time_taken: time_taken.as_secs_f64(),
                drivers_per_instance,
                instance_durations,
                instance_costs,
            },
            routes,
            instances,
        }
    }

    pub fn number_of_instances(&self) -> usize {
        self.instances.len()
    }

    pub fn get_summary_string(&self) -> String {
        format!(
            "{}/{:.2}/{:.2}",
            self.kpis.number_of_drivers, self.kpis.total_cost, self.kpis.mean_cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Load;
    use crate::utils::Tolerance;

    fn single_load_route(sequence_number: usize, x: f64) -> Route {
        let mut open = OpenRoute::new();
        open.push(Load::new(sequence_number, (0.0, 0.0), (x, 0.0), "r.txt", 1));
        open.close()
    }

    #[test]
    fn instance_cost_adds_fixed_cost_per_route() {
        let routes = vec![single_load_route(1, 10.0), single_load_route(2, 25.0)];
        let result = InstanceResult::new("a.txt".into(), routes, Duration::ZERO, 500.0);

        assert_eq!(result.number_of_drivers(), 2);
        assert_eq!(result.number_of_loads(), 2);
        assert!((result.total_time() - 70.0).abs() < f64::tol());
        assert!((result.cost() - 1070.0).abs() < f64::tol());
    }

    #[test]
    fn empty_instance_costs_nothing() {
        let result = InstanceResult::new("empty.txt".into(), vec![], Duration::ZERO, 500.0);
        assert_eq!(result.number_of_drivers(), 0);
        assert_eq!(result.total_time(), 0.0);
        assert_eq!(result.cost(), 0.0);
    }

    #[test]
    fn three_equal_instances_average_to_their_cost() {
        // one route of 100 time units plus 500 fixed cost each
        let instances = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|key| {
                InstanceResult::new(
                    key.to_string(),
                    vec![single_load_route(1, 50.0)],
                    Duration::from_millis(2),
                    500.0,
                )
            })
            .collect();
        let batch = BatchResult::merge(instances, Duration::from_millis(7));

        assert_eq!(batch.kpis.number_of_drivers, 3);
        assert!((batch.kpis.total_cost - 1800.0).abs() < f64::tol());
        assert!((batch.kpis.mean_cost - 600.0).abs() < f64::tol());
        assert!((batch.kpis.time_taken - 0.007).abs() < f64::tol());
        assert_eq!(batch.number_of_instances(), 3);
        let keys: Vec<&String> = batch.kpis.instance_costs.keys().collect();
        assert_eq!(keys, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn merging_no_instances_has_zero_mean() {
        let batch = BatchResult::merge(vec![], Duration::ZERO);
        assert_eq!(batch.kpis.number_of_drivers, 0);
        assert_eq!(batch.kpis.total_cost, 0.0);
        assert_eq!(batch.kpis.mean_cost, 0.0);
    }

    #[test]
    fn serializes_with_result_field_names() -> anyhow::Result<()> {
        let instances = vec![InstanceResult::new(
            "a.txt".into(),
            vec![single_load_route(3, 10.0)],
            Duration::ZERO,
            500.0,
        )];
        let batch = BatchResult::merge(instances, Duration::ZERO);
        let value = serde_json::to_value(&batch)?;

        assert_eq!(value["kpis"]["number_of_drivers"], 1);
        assert_eq!(value["kpis"]["drivers_per_file"]["a.txt"], 1);
        assert_eq!(value["kpis"]["file_costs"]["a.txt"], 520.0);
        assert_eq!(value["drivers"][0]["total_time"], 20.0);
        assert_eq!(value["drivers"][0]["loads"][0]["sequence_number"], 3);
        assert!(value.get("instances").is_none());
        Ok(())
    }
}
