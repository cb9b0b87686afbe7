use rand::seq::SliceRandom;

use crate::utils::letters::TILE_DISTRIBUTION;

/// The pool of undrawn tiles for one game.
///
/// Starts as the full fixed distribution, permuted once. Tiles returned by
/// a swap are appended and the whole pool is reshuffled so nobody can
/// predict what comes back.
#[derive(Debug, Clone)]
pub struct TileBag {
    tiles: Vec<char>,
}

impl TileBag {
    /// A freshly filled and shuffled bag
    pub fn full() -> Self {
        let tiles = TILE_DISTRIBUTION
            .iter()
            .flat_map(|(letter, count)| std::iter::repeat(*letter).take(*count))
            .collect();
        let mut bag = Self { tiles };
        bag.shuffle();
        bag
    }

    #[cfg(test)]
    pub fn from_tiles(tiles: Vec<char>) -> Self {
        Self { tiles }
    }

    /// Uniform Fisher-Yates permutation, a no-op for 0 or 1 tiles
    pub fn shuffle(&mut self) {
        self.tiles.shuffle(&mut rand::rng());
    }

    /// Remove and return up to `count` tiles. A short draw from a nearly
    /// empty bag is normal, never an error.
    pub fn draw(&mut self, count: usize) -> Vec<char> {
        let take = count.min(self.tiles.len());
        self.tiles.split_off(self.tiles.len() - take)
    }

    /// Put swapped tiles back and reshuffle the whole pool
    pub fn return_and_reshuffle(&mut self, tiles: &[char]) {
        self.tiles.extend_from_slice(tiles);
        self.shuffle();
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
