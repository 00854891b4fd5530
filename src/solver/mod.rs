use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use took::Timer;

use crate::construction::nearest_successor::NearestSuccessorConstruction;
use crate::problem::{group_by_instance, Instance, ProblemId};
use crate::solution::{BatchResult, InstanceResult};
use crate::solver::settings::Settings;
use crate::store::LoadStore;
use crate::utils::logging::{format_log_batch, format_log_instance_timed};
#[cfg(feature = "search_assertions")]
use crate::utils::validator::validate_routes;

pub mod settings;

/// Routes a single instance and measures how long that took.
pub fn solve_instance(instance: &Instance, settings: &Settings) -> InstanceResult {
    let timer = Timer::new();
    let routes = NearestSuccessorConstruction::new(settings).construct(&instance.loads);
    let took = timer.took();

    #[cfg(feature = "search_assertions")]
    validate_routes(&instance.loads, &routes, settings.shift_limit).assert_valid();

    let result = InstanceResult::new(
        instance.key.clone(),
        routes,
        took.as_std().clone(),
        settings.fixed_cost_per_driver,
    );
    debug!("{}", format_log_instance_timed(&result, took));
    result
}

/// Routes every instance independently and merges the outcomes. Instances share nothing, so with
/// the `parallel` feature they are solved concurrently; the merge keeps the input order either way.
pub fn aggregate(instances: &[Instance], settings: &Settings) -> BatchResult {
    let timer = Timer::new();

    #[cfg(feature = "parallel")]
    let iter = instances.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = instances.iter();

    let results: Vec<InstanceResult> = iter.map(|it| solve_instance(it, settings)).collect();

    let took = timer.took();
    let batch = BatchResult::merge(results, took.as_std().clone());
    info!("{}, took: {}", format_log_batch(&batch), took);
    batch
}

/// Fetches all loads of a stored problem and aggregates them per instance. Store failures are
/// returned unchanged; nothing is computed in that case.
pub fn solve_problem(
    store: &impl LoadStore,
    problem_id: ProblemId,
    settings: &Settings,
) -> anyhow::Result<BatchResult> {
    let load_timer = Timer::new();
    let loads = store.loads_of(problem_id)?;
    let instances = group_by_instance(loads);
    info!(
        "problem {}: {} instances loaded after {}",
        problem_id,
        instances.len(),
        load_timer.took()
    );
    Ok(aggregate(&instances, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Load;
    use crate::store::MemoryStore;
    use crate::utils::validator::validate_routes;
    use crate::utils::Tolerance;

    fn load(sequence_number: usize, pickup: (f64, f64), dropoff: (f64, f64), key: &str) -> Load {
        Load::new(sequence_number, pickup, dropoff, key, 1)
    }

    #[test]
    fn equal_instances_share_the_mean() {
        // one load per instance with a round trip of 100: 500 + 100 each
        let instances: Vec<Instance> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .map(|key| Instance::new(*key, vec![load(1, (0.0, 0.0), (50.0, 0.0), key)]))
            .collect();
        let batch = aggregate(&instances, &Settings::default());

        assert_eq!(batch.kpis.number_of_drivers, 3);
        assert!((batch.kpis.total_cost - 1800.0).abs() < f64::tol());
        assert!((batch.kpis.mean_cost - 600.0).abs() < f64::tol());
        for key in ["a.txt", "b.txt", "c.txt"] {
            assert_eq!(batch.kpis.drivers_per_instance[key], 1);
            assert!((batch.kpis.instance_costs[key] - 600.0).abs() < f64::tol());
            assert!(batch.kpis.instance_durations[key] >= 0.0);
        }
    }

    #[test]
    fn empty_instance_contributes_nothing() {
        let instances = vec![
            Instance::new("full.txt", vec![load(1, (0.0, 0.0), (50.0, 0.0), "full.txt")]),
            Instance::new("empty.txt", vec![]),
        ];
        let batch = aggregate(&instances, &Settings::default());

        assert_eq!(batch.kpis.drivers_per_instance["empty.txt"], 0);
        assert_eq!(batch.kpis.instance_costs["empty.txt"], 0.0);
        assert_eq!(batch.instances[1].total_time(), 0.0);
        assert!((batch.kpis.total_cost - 600.0).abs() < f64::tol());
        assert!((batch.kpis.mean_cost - 300.0).abs() < f64::tol());
    }

    #[test]
    fn instance_cost_is_fixed_cost_plus_driving_time() {
        let settings = Settings::default();
        let loads: Vec<Load> = (1..=12)
            .map(|i| {
                let x = (i * 37 % 200) as f64 - 100.0;
                let y = (i * 53 % 200) as f64 - 100.0;
                load(i, (x, y), (y, -x), "mixed.txt")
            })
            .collect();
        let instances = vec![Instance::new("mixed.txt", loads.clone())];
        let batch = aggregate(&instances, &settings);

        let result = &batch.instances[0];
        let driving: f64 = result.routes.iter().map(|it| it.total_time()).sum();
        assert_eq!(
            result.cost(),
            settings.fixed_cost_per_driver * result.number_of_drivers() as f64 + driving
        );
        assert_eq!(batch.routes.len(), result.number_of_drivers());
        validate_routes(&loads, &result.routes, settings.shift_limit).assert_valid();
    }

    #[test]
    fn routes_never_mix_instances() {
        let instances = vec![
            Instance::new("a.txt", vec![load(1, (1.0, 0.0), (2.0, 0.0), "a.txt")]),
            Instance::new("b.txt", vec![load(1, (2.0, 0.0), (3.0, 0.0), "b.txt")]),
        ];
        let batch = aggregate(&instances, &Settings::default());
        assert_eq!(batch.routes.len(), 2);
        for route in batch.routes.iter() {
            let key = &route.loads()[0].instance_key;
            assert!(route.loads().iter().all(|it| &it.instance_key == key));
        }
    }

    #[test]
    fn solve_problem_groups_stored_loads() -> anyhow::Result<()> {
        let mut store = MemoryStore::new();
        let problem_id = store.create_problem()?;
        let loads = vec![
            Load::new(1, (0.0, 0.0), (10.0, 0.0), "first.txt", problem_id),
            Load::new(1, (5.0, 5.0), (6.0, 6.0), "second.txt", problem_id),
            Load::new(2, (10.0, 0.0), (20.0, 0.0), "first.txt", problem_id),
        ];
        store.insert_loads(problem_id, &loads)?;

        let batch = solve_problem(&store, problem_id, &Settings::default())?;
        assert_eq!(batch.number_of_instances(), 2);
        let keys: Vec<&String> = batch.kpis.drivers_per_instance.keys().collect();
        assert_eq!(keys, vec!["first.txt", "second.txt"]);
        assert_eq!(batch.routes[0].sequence_numbers(), vec![1, 2]);
        assert!((batch.routes[0].total_time() - 40.0).abs() < f64::tol());
        Ok(())
    }

    #[test]
    fn solve_problem_propagates_store_errors() {
        let store = MemoryStore::new();
        assert!(solve_problem(&store, 99, &Settings::default()).is_err());
    }
}
