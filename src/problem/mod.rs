use indexmap::IndexMap;

pub use geometry::{euclidean_distance, Point, DEPOT};
pub use load::Load;

pub mod geometry;
pub mod load;

/// Identifier of one independently routed load set (the source file name).
pub type InstanceKey = String;

/// Identifier of a submitted batch of instances.
pub type ProblemId = u64;

/// Problem id of loads that are read but not stored yet; stored problems are numbered from 1.
pub const UNASSIGNED_PROBLEM: ProblemId = 0;

/// All loads of one instance, in the order they were read.
#[derive(Clone, Debug)]
pub struct Instance {
    pub key: InstanceKey,
    pub loads: Vec<Load>,
}

impl Instance {
    pub fn new(key: impl Into<InstanceKey>, loads: Vec<Load>) -> Self {
        Self {
            key: key.into(),
            loads,
        }
    }

    pub fn num_loads(&self) -> usize {
        self.loads.len()
    }
}

/// Groups loads by their instance key. Groups appear in the order their first load was seen and
/// loads keep their relative order inside a group, so downstream breakdowns are stable across runs.
pub fn group_by_instance(loads: impl IntoIterator<Item = Load>) -> Vec<Instance> {
    let mut groups: IndexMap<InstanceKey, Vec<Load>> = IndexMap::new();
    for load in loads {
        groups
            .entry(load.instance_key.clone())
            .or_insert_with(Vec::new)
            .push(load);
    }
    groups
        .into_iter()
        .map(|(key, loads)| Instance { key, loads })
        .collect()
}
