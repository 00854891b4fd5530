use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Every route starts and ends here.
pub const DEPOT: Point = Point { x: 0.0, y: 0.0 };

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub fn distance_to(&self, other: &Point) -> f64 {
        euclidean_distance(self, other)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Travel time between two points; time and distance are the same scalar.
#[inline(always)]
pub fn euclidean_distance(from: &Point, to: &Point) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    (dx * dx + dy * dy).sqrt()
}
