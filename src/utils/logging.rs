use took::Took;

use crate::solution::{BatchResult, InstanceResult};

pub fn format_log_instance_timed(result: &InstanceResult, took: Took) -> String {
    format!(
        "{} - {}, took: {took}",
        result.key,
        format_log_instance(result)
    )
}

pub fn format_log_instance(result: &InstanceResult) -> String {
    format!(
        "{} loads on {} (drivers/time/cost)",
        result.number_of_loads(),
        result.get_summary_string(),
    )
}

pub fn format_log_batch(result: &BatchResult) -> String {
    format!(
        "{} instances, {} (drivers/total cost/mean cost)",
        result.number_of_instances(),
        result.get_summary_string(),
    )
}
