use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Point;
use crate::coords;
use crate::error::{MoveRejection, ReplayWarning};
use crate::rules::{Captures, MoveOutcome, RulesEngine};
use crate::stone::Stone;
use crate::tree::{GameTree, NodeId, Prop};
use crate::turn::Move;

/// Snapshot of the active position for a renderer or host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Flat row-major cells (1 = black, -1 = white, 0 = empty).
    pub board: Vec<i8>,
    pub size: u8,
    pub captures: Captures,
    pub to_play: Stone,
    /// Path slots consumed so far; 0 is the starting position.
    pub move_number: usize,
    /// Move-bearing children of the active node, in stored order.
    pub variations: Vec<Move>,
}

/// Navigation cursor over a game tree.
///
/// Owns the tree and a rules engine and is the sole mutator of both. The
/// active line (`path`) is the chain of selected children from the root;
/// `active` indexes into it, with -1 meaning the starting position.
/// Jumps rebuild the engine from scratch, so the board and capture
/// tallies are always exactly what replaying the visible prefix yields.
#[derive(Debug, Clone)]
pub struct Replay {
    tree: GameTree,
    engine: RulesEngine,
    path: Vec<NodeId>,
    active: isize,
    warnings: Vec<ReplayWarning>,
}

impl Replay {
    /// Start navigating a tree, positioned at the end of the active line.
    pub fn new(tree: GameTree) -> Self {
        let engine = RulesEngine::new(tree.board_size());
        let path = tree.selected_path();
        let mut replay = Replay {
            tree,
            engine,
            path,
            active: -1,
            warnings: Vec::new(),
        };
        replay.to_latest();
        replay
    }

    // -- Accessors --

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn into_tree(self) -> GameTree {
        self.tree
    }

    /// Number of path slots consumed; 0 at the starting position.
    pub fn move_number(&self) -> usize {
        (self.active + 1) as usize
    }

    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    /// Problems found while replaying the visible prefix of a flawed
    /// record. Recomputed on every jump.
    pub fn warnings(&self) -> &[ReplayWarning] {
        &self.warnings
    }

    /// The side whose turn it is at the active position: the opponent of
    /// the last move played, else the root PL property, else Black.
    pub fn to_play(&self) -> Stone {
        if self.active >= 0 {
            for i in (0..=self.active as usize).rev() {
                if let Some(mv) = self.tree.move_data(self.path[i]) {
                    return mv.stone.opp();
                }
            }
        }
        self.tree
            .player_to_play(self.tree.root())
            .unwrap_or(Stone::Black)
    }

    pub fn view_state(&self) -> ViewState {
        let current = self.active_node();
        let variations = self
            .tree
            .node(current)
            .children
            .iter()
            .filter_map(|&child| self.tree.move_data(child))
            .collect();
        ViewState {
            board: self.engine.board().cells().to_vec(),
            size: self.engine.size(),
            captures: self.engine.captures().clone(),
            to_play: self.to_play(),
            move_number: self.move_number(),
            variations,
        }
    }

    // -- Navigation --

    /// Move the cursor to a path index (-1 is the starting position),
    /// clamping out-of-range targets.
    ///
    /// The engine is rebuilt from scratch: reset, root setup stones, then
    /// every move node up to and including the target through the relaxed
    /// replay path. Nodes without a move occupy their slot but apply
    /// nothing. Capture tallies and warnings are recomputed from zero.
    pub fn jump_to(&mut self, index: isize) {
        let target = index.clamp(-1, self.path.len() as isize - 1);

        self.engine.reset(self.tree.board_size());
        self.warnings.clear();
        for (stone, point) in self.tree.setup_stones(self.tree.root()) {
            self.engine.place_setup(stone, &[point]);
        }

        for i in 0..=target {
            let node = self.path[i as usize];
            if let Some(mv) = self.tree.move_data(node) {
                if let Some(warning) = self.engine.replay_move(mv.stone, mv.point, i as usize) {
                    warn!(%warning, "record contains an illegal move");
                    self.warnings.push(warning);
                }
            }
        }
        self.active = target;
    }

    pub fn advance(&mut self) {
        self.jump_to(self.active + 1);
    }

    pub fn retreat(&mut self) {
        self.jump_to(self.active - 1);
    }

    pub fn to_start(&mut self) {
        self.jump_to(-1);
    }

    pub fn to_latest(&mut self) {
        self.jump_to(self.path.len() as isize - 1);
    }

    /// Switch the active node's continuation to the child at `index` and
    /// re-derive the path beyond the cursor. The position itself does not
    /// change. Returns false when the index is out of range.
    pub fn choose_variation(&mut self, index: usize) -> bool {
        let current = self.active_node();
        if self.tree.select_variation(current, index) {
            self.path = self.tree.selected_path();
            true
        } else {
            false
        }
    }

    // -- Play --

    /// Play an interactive move at the active position.
    ///
    /// The color is the side to move. Legality is strict; on rejection
    /// nothing changes. On success the move lands in the tree: an existing
    /// child recording the same move is reused and selected, otherwise a
    /// new variation is created, and the cursor advances onto it.
    pub fn play(&mut self, point: Point) -> Result<MoveOutcome, MoveRejection> {
        let stone = self.to_play();
        let outcome = self.engine.apply_move(stone, point)?;

        let current = self.active_node();
        let mv = Move::new(stone, point);
        let index = match self.tree.find_child_by_move(current, &mv) {
            Some((_, index)) => index,
            None => {
                self.tree.create_child(
                    current,
                    vec![Prop::new(stone.letter(), coords::to_sgf(point))],
                );
                self.tree.node(current).children.len() - 1
            }
        };
        self.tree.select_variation(current, index);
        self.path = self.tree.selected_path();
        self.active += 1;
        Ok(outcome)
    }

    fn active_node(&self) -> NodeId {
        if self.active >= 0 {
            self.path[self.active as usize]
        } else {
            self.tree.root()
        }
    }
}
