use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::Point;
use crate::stone::Stone;

/// A connected set of same-colored stones together with its liberty count.
///
/// Transient value, recomputed on demand. Liberties are counted as distinct
/// empty coordinates adjacent to any member, never once per edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub stones: Vec<Point>,
    pub liberties: usize,
    pub stone: Stone,
}

/// An N×N board stored as a flat row-major array of i8 cells
/// (1 = black, -1 = white, 0 = empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<i8>,
    size: u8,
}

impl Board {
    pub fn new(size: u8) -> Self {
        Board {
            cells: vec![0i8; size as usize * size as usize],
            size,
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    /// Canonical position signature: the full cell sequence.
    pub fn signature(&self) -> Vec<i8> {
        self.cells.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    pub fn on_board(&self, (row, col): Point) -> bool {
        row < self.size && col < self.size
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        if self.on_board(point) {
            Stone::from_int(self.cells[self.idx(point)])
        } else {
            None
        }
    }

    pub(crate) fn set_stone(&mut self, point: Point, stone: Stone) {
        if self.on_board(point) {
            let i = self.idx(point);
            self.cells[i] = stone.to_int();
        }
    }

    pub(crate) fn clear_stone(&mut self, point: Point) {
        if self.on_board(point) {
            let i = self.idx(point);
            self.cells[i] = 0;
        }
    }

    /// The 4-connected neighbors that are on the board.
    pub fn neighbors(&self, (row, col): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if row > 0 {
            result.push((row - 1, col));
        }
        if row + 1 < self.size {
            result.push((row + 1, col));
        }
        if col > 0 {
            result.push((row, col - 1));
        }
        if col + 1 < self.size {
            result.push((row, col + 1));
        }
        result
    }

    /// Compute the connected group containing `point` by breadth-first
    /// traversal. Returns `None` when the cell is empty or off the board.
    pub fn group(&self, point: Point) -> Option<Group> {
        let stone = self.stone_at(point)?;

        let mut visited = vec![false; self.cells.len()];
        let mut liberty_seen = vec![false; self.cells.len()];
        let mut stones = Vec::new();
        let mut liberties = 0;

        let mut queue = VecDeque::new();
        queue.push_back(point);
        visited[self.idx(point)] = true;

        while let Some(p) = queue.pop_front() {
            stones.push(p);
            for n in self.neighbors(p) {
                let ni = self.idx(n);
                match self.stone_at(n) {
                    None => {
                        if !liberty_seen[ni] {
                            liberty_seen[ni] = true;
                            liberties += 1;
                        }
                    }
                    Some(s) if s == stone && !visited[ni] => {
                        visited[ni] = true;
                        queue.push_back(n);
                    }
                    _ => {}
                }
            }
        }

        Some(Group {
            stones,
            liberties,
            stone,
        })
    }

    #[inline]
    fn idx(&self, (row, col): Point) -> usize {
        row as usize * self.size as usize + col as usize
    }
}
