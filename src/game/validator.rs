use std::collections::HashSet;

use thiserror::Error;

use crate::{
    dictionary::Dictionary,
    game::board::{Board, BOARD_CELLS, BOARD_SIDE, CENTER_CELL},
    models::Placement,
};

/// Why a proposed move was rejected. The messages are what the player sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no tiles were placed")]
    Empty,
    #[error("tile placed outside the board")]
    OutOfBounds,
    #[error("that cell is already occupied")]
    CellOccupied,
    #[error("tiles must form a single line")]
    NotInLine,
    #[error("the first word must cross the center star")]
    MissedCenter,
    #[error("the word must connect to tiles already on the board")]
    Disconnected,
    #[error("you do not hold these tiles: {0}")]
    MissingTiles(String),
    #[error("'{0}' is not a playable word")]
    UnknownWord(String),
}

/// Legality checks for a proposed placement, run in a fixed order and
/// short-circuiting on the first failure. A rejected move leaves board,
/// rack and bag untouched; nothing here mutates anything.
pub struct MoveValidator<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> MoveValidator<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    pub fn validate(
        &self,
        board: &Board,
        rack: &[char],
        placements: &[Placement],
        first_move: bool,
    ) -> Result<(), MoveError> {
        if placements.is_empty() {
            return Err(MoveError::Empty);
        }

        // Target cells must exist, be empty, and be named at most once
        let mut seen = HashSet::new();
        for p in placements {
            if p.index >= BOARD_CELLS {
                return Err(MoveError::OutOfBounds);
            }
            if board.letter(p.index).is_some() || !seen.insert(p.index) {
                return Err(MoveError::CellOccupied);
            }
        }

        let same_column = placements
            .iter()
            .all(|p| p.index % BOARD_SIDE == placements[0].index % BOARD_SIDE);
        let same_row = placements
            .iter()
            .all(|p| p.index / BOARD_SIDE == placements[0].index / BOARD_SIDE);
        if !same_column && !same_row {
            return Err(MoveError::NotInLine);
        }

        if first_move {
            if !placements.iter().any(|p| p.index == CENTER_CELL) {
                return Err(MoveError::MissedCenter);
            }
        } else if !Self::touches_existing(board, placements) {
            return Err(MoveError::Disconnected);
        }

        self.check_rack(rack, placements)?;
        self.check_words(board, placements)
    }

    /// Index-arithmetic adjacency: a neighbor is `index +/- 1` or
    /// `index +/- 15`, bounds-checked only against the cell range. The
    /// last cell of a row therefore counts as adjacent to the first cell
    /// of the next row, matching the observed behavior of the game.
    fn touches_existing(board: &Board, placements: &[Placement]) -> bool {
        const DIRECTIONS: [isize; 4] = [-1, 1, -(BOARD_SIDE as isize), BOARD_SIDE as isize];
        placements.iter().any(|p| {
            DIRECTIONS.iter().any(|dir| {
                let neighbor = p.index as isize + dir;
                neighbor >= 0
                    && (neighbor as usize) < BOARD_CELLS
                    && board.letter(neighbor as usize).is_some()
            })
        })
    }

    /// Every used letter must be in the rack, counted with multiplicity,
    /// checked against a disposable copy so the live rack is never touched
    fn check_rack(&self, rack: &[char], placements: &[Placement]) -> Result<(), MoveError> {
        let mut available = rack.to_vec();
        let mut missing = Vec::new();
        for p in placements {
            match available.iter().position(|&t| t == p.letter) {
                Some(pos) => {
                    available.remove(pos);
                }
                None => missing.push(p.letter),
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            let mut dedup = HashSet::new();
            missing.retain(|c| dedup.insert(*c));
            Err(MoveError::MissingTiles(missing.into_iter().collect()))
        }
    }

    /// Project the move and collect the maximal horizontal and vertical
    /// runs through every new cell; each distinct run of two or more
    /// letters must be a dictionary word
    fn check_words(&self, board: &Board, placements: &[Placement]) -> Result<(), MoveError> {
        let projected = board.with_placements(placements);
        let mut words = HashSet::new();
        for p in placements {
            for step in [1isize, BOARD_SIDE as isize] {
                let word = run_through(&projected, p.index, step);
                if word.chars().count() >= 2 {
                    words.insert(word);
                }
            }
        }
        for word in words {
            if !self.dictionary.contains(&word) {
                return Err(MoveError::UnknownWord(word));
            }
        }
        Ok(())
    }
}

/// The maximal run of contiguous occupied cells through `start`, walking
/// by raw index steps. Shares the adjacency arithmetic above, so a run
/// may continue across a row boundary.
pub fn run_through(board: &Board, start: usize, step: isize) -> String {
    let mut begin = start as isize;
    loop {
        let prev = begin - step;
        if prev < 0 || prev >= BOARD_CELLS as isize || board.letter(prev as usize).is_none() {
            break;
        }
        begin = prev;
    }

    let mut word = String::new();
    let mut i = begin;
    while i >= 0 && (i as usize) < BOARD_CELLS {
        match board.letter(i as usize) {
            Some(letter) => word.push(letter),
            None => break,
        }
        i += step;
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(cells: &[(usize, char)]) -> Vec<Placement> {
        cells
            .iter()
            .map(|&(index, letter)| Placement { index, letter })
            .collect()
    }

    fn board_with(cells: &[(usize, char)]) -> Board {
        let mut board = Board::new();
        for &(index, letter) in cells {
            board.set(index, letter);
        }
        board
    }

    fn full_rack() -> Vec<char> {
        vec!['C', 'H', 'E', 'F', 'A', 'U', 'S']
    }

    #[test]
    fn test_first_move_through_center_is_valid() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let board = Board::new();
        let chef = place(&[(112, 'C'), (113, 'H'), (114, 'E'), (115, 'F')]);
        assert_eq!(validator.validate(&board, &full_rack(), &chef, true), Ok(()));
    }

    #[test]
    fn test_empty_move_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        assert_eq!(
            validator.validate(&Board::new(), &full_rack(), &[], true),
            Err(MoveError::Empty)
        );
    }

    #[test]
    fn test_bent_move_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let bent = place(&[(112, 'C'), (113, 'H'), (128, 'E')]);
        assert_eq!(
            validator.validate(&Board::new(), &full_rack(), &bent, true),
            Err(MoveError::NotInLine)
        );
    }

    #[test]
    fn test_first_move_off_center_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let off = place(&[(113, 'C'), (114, 'H'), (115, 'E'), (116, 'F')]);
        assert_eq!(
            validator.validate(&Board::new(), &full_rack(), &off, true),
            Err(MoveError::MissedCenter)
        );
    }

    #[test]
    fn test_disconnected_second_move_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let board = board_with(&[(112, 'C'), (113, 'H'), (114, 'E'), (115, 'F')]);
        let far_away = place(&[(0, 'T'), (1, 'E'), (2, 'E')]);
        assert_eq!(
            validator.validate(&board, &['T', 'E', 'E'], &far_away, false),
            Err(MoveError::Disconnected)
        );
    }

    #[test]
    fn test_extension_touching_existing_tiles_is_valid() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let board = board_with(&[(112, 'C'), (113, 'H'), (114, 'E'), (115, 'F')]);
        // HAUS downward from the H at (8,7)
        let haus = place(&[(128, 'A'), (143, 'U'), (158, 'S')]);
        assert_eq!(
            validator.validate(&board, &full_rack(), &haus, false),
            Ok(())
        );
    }

    #[test]
    fn test_row_wrap_counts_as_adjacent() {
        // Cell 14 ends row 0 and cell 15 starts row 1, yet raw index
        // arithmetic treats them as neighbors and as one run: placing an E
        // on 14 next to an I on 15 connects and spells EI
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let board = board_with(&[(15, 'I')]);
        let wrap = place(&[(14, 'E')]);
        assert_eq!(validator.validate(&board, &['E'], &wrap, false), Ok(()));
    }

    #[test]
    fn test_rack_multiplicity_is_enforced() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        // Rack holds a single F; the move wants two
        let rack = ['F', 'E', 'C', 'H'];
        let doubled = place(&[(112, 'F'), (113, 'F')]);
        assert_eq!(
            validator.validate(&Board::new(), &rack, &doubled, true),
            Err(MoveError::MissingTiles("F".to_string()))
        );
    }

    #[test]
    fn test_occupied_cell_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let board = board_with(&[(112, 'C')]);
        let overlap = place(&[(112, 'X')]);
        assert_eq!(
            validator.validate(&board, &['X'], &overlap, false),
            Err(MoveError::CellOccupied)
        );
    }

    #[test]
    fn test_duplicate_cell_in_move_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let doubled = place(&[(112, 'E'), (112, 'I')]);
        assert_eq!(
            validator.validate(&Board::new(), &['E', 'I'], &doubled, true),
            Err(MoveError::CellOccupied)
        );
    }

    #[test]
    fn test_out_of_bounds_cell_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let outside = place(&[(300, 'A')]);
        assert_eq!(
            validator.validate(&Board::new(), &['A'], &outside, true),
            Err(MoveError::OutOfBounds)
        );
    }

    #[test]
    fn test_gibberish_word_is_rejected() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let gibberish = place(&[(112, 'X'), (113, 'Q')]);
        assert_eq!(
            validator.validate(&Board::new(), &['X', 'Q'], &gibberish, true),
            Err(MoveError::UnknownWord("XQ".to_string()))
        );
    }

    #[test]
    fn test_single_center_tile_forms_no_word() {
        // A lone first tile yields no run of length two, so there is
        // nothing to look up and the move stands
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let lone = place(&[(112, 'E')]);
        assert_eq!(validator.validate(&Board::new(), &['E'], &lone, true), Ok(()));
    }

    #[test]
    fn test_rejection_does_not_touch_the_board() {
        let dict = Dictionary::fallback();
        let validator = MoveValidator::new(&dict);
        let board = board_with(&[(112, 'C')]);
        let overlap = place(&[(112, 'X'), (113, 'Q')]);
        let _ = validator.validate(&board, &['X', 'Q'], &overlap, false);
        assert_eq!(board.letter(112), Some('C'));
        assert_eq!(board.letter(113), None);
        assert_eq!(board.tile_count(), 1);
    }
}
