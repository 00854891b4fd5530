use anyhow::bail;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use file_store::FileStore;

use crate::problem::{Load, ProblemId};

pub mod file_store;

/// A submitted batch of instances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub created_at: DateTime<Utc>,
}

/// Storage of submitted problems and their loads. Implementations are handed explicitly to
/// whatever needs them; loads come back in insertion order.
pub trait LoadStore {
    fn create_problem(&mut self) -> anyhow::Result<ProblemId>;
    fn insert_loads(&mut self, problem_id: ProblemId, loads: &[Load]) -> anyhow::Result<()>;
    fn list_problems(&self) -> anyhow::Result<Vec<Problem>>;
    fn loads_of(&self, problem_id: ProblemId) -> anyhow::Result<Vec<Load>>;
}

pub(crate) fn check_loads_belong_to(problem_id: ProblemId, loads: &[Load]) -> anyhow::Result<()> {
    if let Some(load) = loads.iter().find(|it| it.problem_id != problem_id) {
        bail!(
            "load {} of {} is tagged with problem {}, expected {}",
            load.sequence_number,
            load.instance_key,
            load.problem_id,
            problem_id
        );
    }
    Ok(())
}

/// Keeps everything in memory; used for one-shot solves and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    problems: IndexMap<ProblemId, (Problem, Vec<Load>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadStore for MemoryStore {
    fn create_problem(&mut self) -> anyhow::Result<ProblemId> {
        let id = self.problems.keys().max().map_or(1, |it| it + 1);
        let problem = Problem {
            id,
            created_at: Utc::now(),
        };
        self.problems.insert(id, (problem, Vec::new()));
        Ok(id)
    }

    fn insert_loads(&mut self, problem_id: ProblemId, loads: &[Load]) -> anyhow::Result<()> {
        check_loads_belong_to(problem_id, loads)?;
        match self.problems.get_mut(&problem_id) {
            Some((_, stored)) => {
                stored.extend_from_slice(loads);
                Ok(())
            }
            None => bail!("unknown problem {}", problem_id),
        }
    }

    fn list_problems(&self) -> anyhow::Result<Vec<Problem>> {
        Ok(self
            .problems
            .values()
            .map(|(problem, _)| problem.clone())
            .collect())
    }

    fn loads_of(&self, problem_id: ProblemId) -> anyhow::Result<Vec<Load>> {
        match self.problems.get(&problem_id) {
            Some((_, loads)) => Ok(loads.clone()),
            None => bail!("unknown problem {}", problem_id),
        }
    }
}
