use serde::{Deserialize, Serialize};

use crate::Point;
use crate::stone::Stone;

/// A stone placement: color plus board coordinate.
///
/// A move is immutable once recorded, and only meaningful relative to a
/// specific board position: the same move replayed against a different
/// position can capture differently or be illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub stone: Stone,
    pub point: Point,
}

impl Move {
    pub fn new(stone: Stone, point: Point) -> Self {
        Move { stone, point }
    }
}
