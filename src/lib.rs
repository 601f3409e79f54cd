pub mod board;
pub mod coords;
pub mod error;
pub mod record;
pub mod replay;
pub mod rules;
pub mod sgf;
pub mod stone;
pub mod tree;
pub mod turn;

/// Board coordinate as (row, col), zero-based from the top-left corner.
pub type Point = (u8, u8);

pub use board::{Board, Group};
pub use error::{MoveRejection, ReplayWarning};
pub use record::{GameInfo, GameRecord};
pub use replay::{Replay, ViewState};
pub use rules::{Captures, MoveOutcome, RulesEngine};
pub use sgf::ParseDiagnostic;
pub use stone::Stone;
pub use tree::{DEFAULT_BOARD_SIZE, GameTree, MAX_BOARD_SIZE, NodeId, Prop, RecordNode};
pub use turn::Move;
