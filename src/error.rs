use std::fmt;

use crate::Point;

/// Why an interactive move was refused. Always recoverable: the engine
/// state is untouched when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// The target point is off the board or already occupied.
    Occupied,
    /// The move would leave its own group without liberties and captures nothing.
    Suicide,
    /// Single-stone retake that would restore the position from one ply earlier.
    Ko,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::Occupied => write!(f, "point is occupied or off the board"),
            MoveRejection::Suicide => write!(f, "suicide"),
            MoveRejection::Ko => write!(f, "ko violation"),
        }
    }
}

impl std::error::Error for MoveRejection {}

/// Emitted by the relaxed replay path when a loaded record contains an
/// illegal position. Replay proceeds; the caller decides what to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayWarning {
    OccupiedDuringReplay { index: usize, point: Point },
    SuicideDuringReplay { index: usize, point: Point },
}

impl fmt::Display for ReplayWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayWarning::OccupiedDuringReplay { index, point } => {
                write!(f, "move {} replays onto an occupied point {:?}", index + 1, point)
            }
            ReplayWarning::SuicideDuringReplay { index, point } => {
                write!(f, "move {} is a suicide at {:?}", index + 1, point)
            }
        }
    }
}

impl std::error::Error for ReplayWarning {}
