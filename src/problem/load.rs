use serde::{Deserialize, Serialize};

use crate::problem::geometry::{euclidean_distance, Point};
use crate::problem::{InstanceKey, ProblemId};

/// A single transport request: drive to `pickup`, carry the load to `dropoff`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// caller-assigned number, unique within its instance only
    pub sequence_number: usize,
    pub pickup: Point,
    pub dropoff: Point,
    pub instance_key: InstanceKey,
    pub problem_id: ProblemId,
}

impl Load {
    pub fn new(
        sequence_number: usize,
        pickup: impl Into<Point>,
        dropoff: impl Into<Point>,
        instance_key: impl Into<InstanceKey>,
        problem_id: ProblemId,
    ) -> Self {
        Self {
            sequence_number,
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            instance_key: instance_key.into(),
            problem_id,
        }
    }

    /// Moves a load read ahead of its problem into the problem it is stored with.
    pub fn assigned_to(self, problem_id: ProblemId) -> Self {
        Self { problem_id, ..self }
    }

    /// Driving time from this load's pickup to its dropoff.
    #[inline(always)]
    pub fn own_distance(&self) -> f64 {
        euclidean_distance(&self.pickup, &self.dropoff)
    }
}
