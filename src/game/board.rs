use crate::models::Placement;

/// Cells per side of the square board
pub const BOARD_SIDE: usize = 15;
/// Total cell count
pub const BOARD_CELLS: usize = BOARD_SIDE * BOARD_SIDE;
/// Index of the center star, the mandatory first-move cell
pub const CENTER_CELL: usize = 112;

/// Premium multipliers attached to a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Premium {
    pub word: i32,
    pub letter: i32,
}

impl Premium {
    const PLAIN: Premium = Premium { word: 1, letter: 1 };
}

/// The 15x15 playing surface. Cells are row-major: `(x, y) = (i % 15, i / 15)`.
///
/// The board only exposes reads plus the static premium lookup; writes go
/// through `set`, which is reserved for the session commit path.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Option<char>>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: vec![None; BOARD_CELLS],
        }
    }

    /// Letter occupying a cell, if any. Out-of-range indexes read as empty.
    pub fn letter(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    /// Write a letter during move commit
    pub fn set(&mut self, index: usize, letter: char) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Some(letter);
        }
    }

    pub fn cells(&self) -> &[Option<char>] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Copy of the board with a move projected onto it. Used by the
    /// validator and scorer so the real board stays untouched until commit.
    pub fn with_placements(&self, placements: &[Placement]) -> Board {
        let mut projected = self.clone();
        for p in placements {
            projected.set(p.index, p.letter);
        }
        projected
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Premium layout as a pure function of the cell index.
///
/// The layout is the classic dihedral-symmetric one: triple-word corners
/// and edge midpoints, double-word diagonals meeting at the center star,
/// triple- and double-letter cells at fixed offsets. Folding a cell's
/// coordinates into one board octant collapses the whole table to a few
/// equivalence classes.
pub fn premium(index: usize) -> Premium {
    if index >= BOARD_CELLS {
        return Premium::PLAIN;
    }
    let (x, y) = (index % BOARD_SIDE, index / BOARD_SIDE);
    let fx = x.min(BOARD_SIDE - 1 - x);
    let fy = y.min(BOARD_SIDE - 1 - y);
    let (a, b) = (fx.min(fy), fx.max(fy));

    match (a, b) {
        (0, 0) | (0, 7) => Premium { word: 3, letter: 1 },
        (1, 1) | (2, 2) | (3, 3) | (4, 4) | (7, 7) => Premium { word: 2, letter: 1 },
        (1, 5) | (5, 5) => Premium { word: 1, letter: 3 },
        (0, 3) | (2, 6) | (3, 7) | (6, 6) => Premium { word: 1, letter: 2 },
        _ => Premium::PLAIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(x: usize, y: usize) -> usize {
        y * BOARD_SIDE + x
    }

    #[test]
    fn test_center_is_double_word() {
        assert_eq!(CENTER_CELL, idx(7, 7));
        assert_eq!(premium(CENTER_CELL), Premium { word: 2, letter: 1 });
    }

    #[test]
    fn test_corners_are_triple_word() {
        for index in [idx(0, 0), idx(14, 0), idx(0, 14), idx(14, 14)] {
            assert_eq!(premium(index), Premium { word: 3, letter: 1 });
        }
    }

    #[test]
    fn test_edge_midpoints_are_triple_word() {
        for index in [idx(7, 0), idx(0, 7), idx(14, 7), idx(7, 14)] {
            assert_eq!(premium(index), Premium { word: 3, letter: 1 });
        }
    }

    #[test]
    fn test_diagonal_cells_are_double_word() {
        for index in [idx(1, 1), idx(13, 1), idx(4, 10), idx(12, 12)] {
            assert_eq!(premium(index), Premium { word: 2, letter: 1 });
        }
    }

    #[test]
    fn test_cells_right_of_center_are_plain() {
        // The opener row: 113..=115 carry no premium at all
        for index in 113..=115 {
            assert_eq!(premium(index), Premium::PLAIN);
        }
    }

    #[test]
    fn test_letter_premiums() {
        assert_eq!(premium(idx(5, 1)), Premium { word: 1, letter: 3 });
        assert_eq!(premium(idx(9, 9)), Premium { word: 1, letter: 3 });
        assert_eq!(premium(idx(3, 0)), Premium { word: 1, letter: 2 });
        assert_eq!(premium(idx(11, 7)), Premium { word: 1, letter: 2 });
        assert_eq!(premium(idx(8, 2)), Premium { word: 1, letter: 2 });
    }

    #[test]
    fn test_layout_is_symmetric() {
        for y in 0..BOARD_SIDE {
            for x in 0..BOARD_SIDE {
                let p = premium(idx(x, y));
                assert_eq!(p, premium(idx(14 - x, y)));
                assert_eq!(p, premium(idx(x, 14 - y)));
                assert_eq!(p, premium(idx(y, x)));
            }
        }
    }

    #[test]
    fn test_out_of_range_lookups_are_plain_and_empty() {
        assert_eq!(premium(BOARD_CELLS), Premium::PLAIN);
        let board = Board::new();
        assert_eq!(board.letter(BOARD_CELLS + 10), None);
    }

    #[test]
    fn test_projection_leaves_original_untouched() {
        let board = Board::new();
        let placements = vec![
            Placement {
                index: CENTER_CELL,
                letter: 'A',
            },
            Placement {
                index: CENTER_CELL + 1,
                letter: 'B',
            },
        ];
        let projected = board.with_placements(&placements);
        assert_eq!(projected.letter(CENTER_CELL), Some('A'));
        assert_eq!(projected.tile_count(), 2);
        assert_eq!(board.tile_count(), 0);
    }
}
