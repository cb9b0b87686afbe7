use std::collections::HashSet;

use crate::{
    game::board::{premium, Board, BOARD_SIDE},
    game::validator::run_through,
    models::{Placement, RACK_SIZE},
    utils::letters::letter_value,
};

/// Flat bonus for emptying a full rack in a single move
pub const BINGO_BONUS: i32 = 50;

/// Point computation for an already-validated move.
///
/// A pure function of the pre-move board and the placements: projecting
/// the move, walking the runs it creates, and applying premiums. Premiums
/// only ever fire on cells placed this turn; letters already on the board
/// contribute their base value and are never re-multiplied.
pub struct Scorer;

impl Scorer {
    pub fn score_move(board: &Board, placements: &[Placement]) -> i32 {
        if placements.is_empty() {
            return 0;
        }

        let projected = board.with_placements(placements);
        let new_cells: HashSet<usize> = placements.iter().map(|p| p.index).collect();
        let first = placements[0].index;

        let mut total = 0;
        if placements.len() >= 2 {
            // Orientation comes from the first two placed cells
            let horizontal = first / BOARD_SIDE == placements[1].index / BOARD_SIDE;
            let (main_step, cross_step) = if horizontal {
                (1, BOARD_SIDE as isize)
            } else {
                (BOARD_SIDE as isize, 1)
            };

            total += Self::run_score(&projected, &new_cells, first, main_step);
            for p in placements {
                total += Self::run_score(&projected, &new_cells, p.index, cross_step);
            }
        } else {
            // A single tile may complete a word in both directions at once
            total += Self::run_score(&projected, &new_cells, first, 1);
            total += Self::run_score(&projected, &new_cells, first, BOARD_SIDE as isize);
        }

        if placements.len() == RACK_SIZE {
            total += BINGO_BONUS;
        }
        total
    }

    /// Score of the maximal run through `start`: letter values, letter
    /// premiums on new cells, and the product of word premiums of new
    /// cells in this run. Runs shorter than two letters are not words
    /// and score nothing.
    fn run_score(board: &Board, new_cells: &HashSet<usize>, start: usize, step: isize) -> i32 {
        let word = run_through(board, start, step);
        if word.chars().count() < 2 {
            return 0;
        }

        // Re-find the run start the same way run_through does
        let mut begin = start as isize;
        while begin - step >= 0 && board.letter((begin - step) as usize).is_some() {
            begin -= step;
        }

        let mut score = 0;
        let mut word_multiplier = 1;
        let mut i = begin;
        while i >= 0 && board.letter(i as usize).is_some() {
            let index = i as usize;
            let letter = board.letter(index).unwrap_or_default();
            let mut value = i32::from(letter_value(letter));
            if new_cells.contains(&index) {
                let bonus = premium(index);
                value *= bonus.letter;
                word_multiplier *= bonus.word;
            }
            score += value;
            i += step;
        }
        score * word_multiplier
    }
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

    #[test]
    fn test_opening_chef_scores_22() {
        // C(4) + H(2) + E(1) + F(4) = 11, doubled by the center star
        let board = Board::new();
        let chef = place(&[(112, 'C'), (113, 'H'), (114, 'E'), (115, 'F')]);
        assert_eq!(Scorer::score_move(&board, &chef), 22);
    }

    #[test]
    fn test_scoring_is_pure() {
        let board = Board::new();
        let chef = place(&[(112, 'C'), (113, 'H'), (114, 'E'), (115, 'F')]);
        assert_eq!(
            Scorer::score_move(&board, &chef),
            Scorer::score_move(&board, &chef)
        );
        assert_eq!(board.tile_count(), 0);
    }

    #[test]
    fn test_existing_premium_is_not_reapplied() {
        // An A already sits on the center star; extending it downward
        // must not double the new word again
        let board = board_with(&[(112, 'A')]);
        let extend = place(&[(127, 'T')]);
        // A(1, base only) + T(1) vertically; horizontal run is length 1
        assert_eq!(Scorer::score_move(&board, &extend), 2);
    }

    #[test]
    fn test_single_tile_scores_both_orientations() {
        // A tiles left of and above the center; a T on the star completes
        // AT in both directions, each doubled by the star's word premium
        let board = board_with(&[(111, 'A'), (97, 'A')]);
        let bridge = place(&[(112, 'T')]);
        assert_eq!(Scorer::score_move(&board, &bridge), 8);
    }

    #[test]
    fn test_vertical_extension_with_letter_premium() {
        // Board holds CHEF across row 7; HAUS grows down from the H.
        // The A lands on a double-letter cell at (8,8).
        let board = board_with(&[(112, 'C'), (113, 'H'), (114, 'E'), (115, 'F')]);
        let haus = place(&[(128, 'A'), (143, 'U'), (158, 'S')]);
        // H(2, old) + A(1x2) + U(1) + S(1) = 6, no cross-words
        assert_eq!(Scorer::score_move(&board, &haus), 6);
    }

    #[test]
    fn test_cross_word_counts_once_per_new_cell() {
        // An E at (8,8); laying EI on row 9 forms the main word EI
        // (I on the triple-letter at (9,9)) plus the vertical EE cross
        let board = board_with(&[(128, 'E')]);
        let ei = place(&[(143, 'E'), (144, 'I')]);
        // Main: E(1) + I(1x3) = 4; cross through 143: E(1, old) + E(1) = 2
        assert_eq!(Scorer::score_move(&board, &ei), 6);
    }

    #[test]
    fn test_full_rack_earns_the_bonus() {
        let board = Board::new();
        let seven: Vec<Placement> = (108..115).map(|index| Placement { index, letter: 'E' }).collect();
        // E(1x2 on the double-letter at (3,7)) + five E(1) + E(1) = 8,
        // doubled by the center star, plus the 50-point bonus
        assert_eq!(Scorer::score_move(&board, &seven), 66);
    }

    #[test]
    fn test_six_tiles_earn_no_bonus() {
        let board = Board::new();
        let six: Vec<Placement> = (108..114).map(|index| Placement { index, letter: 'E' }).collect();
        // 2 + 1 + 1 + 1 + 1 + 1 = 7, doubled by the center star
        assert_eq!(Scorer::score_move(&board, &six), 14);
    }

    #[test]
    fn test_lone_tile_on_empty_board_scores_zero() {
        let board = Board::new();
        let lone = place(&[(112, 'Q')]);
        assert_eq!(Scorer::score_move(&board, &lone), 0);
    }
}
