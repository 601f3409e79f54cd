use serde::{Deserialize, Serialize};

use crate::Point;
use crate::board::Board;
use crate::error::{MoveRejection, ReplayWarning};
use crate::stone::Stone;

/// Stones captured so far, indexed by the capturing color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn get(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.black += count,
            Stone::White => self.white += count,
        }
    }
}

/// The result of a successfully applied move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub stone: Stone,
    pub point: Point,
    /// Opponent stones removed by this move.
    pub captured: Vec<Point>,
}

/// Owns the current board, the capture tallies and the position history
/// used for repetition checks. Knows nothing about the game tree and
/// performs no I/O; every operation is a plain state transition.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    board: Board,
    captures: Captures,
    /// Position signatures, seeded with the starting position and extended
    /// after every applied move. history[len-2] is the position one ply
    /// before the current one.
    history: Vec<Vec<i8>>,
}

impl RulesEngine {
    pub fn new(size: u8) -> Self {
        let board = Board::new(size);
        let history = vec![board.signature()];
        RulesEngine {
            board,
            captures: Captures::default(),
            history,
        }
    }

    // -- Accessors --

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> u8 {
        self.board.size()
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.board.stone_at(point)
    }

    /// Number of moves applied since the last reset.
    pub fn moves_applied(&self) -> usize {
        self.history.len() - 1
    }

    // -- State transitions --

    /// Clear board, history and capture tallies atomically, switching to a
    /// fresh board of the given size.
    pub fn reset(&mut self, size: u8) {
        self.board = Board::new(size);
        self.captures = Captures::default();
        self.history = vec![self.board.signature()];
    }

    /// Write setup stones straight onto the board: no captures, no legality,
    /// no history entries. Only valid before any move has been applied; the
    /// seeded starting-position signature is refreshed.
    pub fn place_setup(&mut self, stone: Stone, points: &[Point]) {
        for &p in points {
            self.board.set_stone(p, stone);
        }
        if self.history.len() == 1 {
            self.history[0] = self.board.signature();
        }
    }

    /// Validate and apply one interactive move.
    ///
    /// On any rejection nothing is mutated: legality is decided on a
    /// candidate copy of the board that is only committed on success.
    pub fn apply_move(&mut self, stone: Stone, point: Point) -> Result<MoveOutcome, MoveRejection> {
        if !self.board.on_board(point) || self.board.stone_at(point).is_some() {
            return Err(MoveRejection::Occupied);
        }

        let (candidate, captured) = self.resolve_placement(stone, point);

        let own = candidate
            .group(point)
            .expect("just-placed stone has a group");
        if own.liberties == 0 && captured.is_empty() {
            return Err(MoveRejection::Suicide);
        }

        // Simple ko: a single-stone capture that restores the position from
        // exactly one ply before the current one. Not full superko.
        let signature = candidate.signature();
        if captured.len() == 1
            && self.history.len() >= 2
            && signature == self.history[self.history.len() - 2]
        {
            return Err(MoveRejection::Ko);
        }

        self.board = candidate;
        self.history.push(signature);
        if !captured.is_empty() {
            self.captures.add(stone, captured.len() as u32);
        }
        Ok(MoveOutcome {
            stone,
            point,
            captured,
        })
    }

    /// Relaxed variant used only for deterministic replay of records.
    ///
    /// A well-formed record is assumed already legal, so instead of
    /// rejecting this reports problems as warnings and keeps going:
    /// an occupied target is skipped, a suicide leaves the stone on the
    /// board, and no repetition check is performed. `index` identifies
    /// the move's position in the replayed sequence for diagnostics.
    pub fn replay_move(
        &mut self,
        stone: Stone,
        point: Point,
        index: usize,
    ) -> Option<ReplayWarning> {
        if !self.board.on_board(point) || self.board.stone_at(point).is_some() {
            return Some(ReplayWarning::OccupiedDuringReplay { index, point });
        }

        let (candidate, captured) = self.resolve_placement(stone, point);

        let own = candidate
            .group(point)
            .expect("just-placed stone has a group");
        let warning = if own.liberties == 0 && captured.is_empty() {
            Some(ReplayWarning::SuicideDuringReplay { index, point })
        } else {
            None
        };

        self.board = candidate;
        self.history.push(self.board.signature());
        if !captured.is_empty() {
            self.captures.add(stone, captured.len() as u32);
        }
        warning
    }

    /// Place the stone on a candidate board and remove any opponent groups
    /// left without liberties. Shared by the strict and relaxed paths.
    fn resolve_placement(&self, stone: Stone, point: Point) -> (Board, Vec<Point>) {
        let mut candidate = self.board.clone();
        candidate.set_stone(point, stone);

        let mut captured = Vec::new();
        for n in candidate.neighbors(point) {
            // A neighbor already removed as part of an earlier chain reads
            // as empty here and is skipped.
            if candidate.stone_at(n) != Some(stone.opp()) {
                continue;
            }
            if let Some(group) = candidate.group(n) {
                if group.liberties == 0 {
                    for &p in &group.stones {
                        candidate.clear_stone(p);
                    }
                    captured.extend(group.stones);
                }
            }
        }

        (candidate, captured)
    }
}
