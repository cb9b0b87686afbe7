use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Letter values of the German tile set
pub static LETTER_VALUES: Lazy<HashMap<char, u8>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // 1 point letters
    for ch in ['A', 'D', 'E', 'I', 'N', 'R', 'S', 'T', 'U'] {
        map.insert(ch, 1);
    }

    // 2 points
    for ch in ['G', 'H', 'L', 'O'] {
        map.insert(ch, 2);
    }

    // 3 points
    for ch in ['B', 'M', 'W', 'Z'] {
        map.insert(ch, 3);
    }

    // 4 points
    for ch in ['C', 'F', 'K', 'P'] {
        map.insert(ch, 4);
    }

    // 6 points
    for ch in ['J', 'V'] {
        map.insert(ch, 6);
    }

    // 8 points
    map.insert('X', 8);

    // 10 points
    for ch in ['Q', 'Y'] {
        map.insert(ch, 10);
    }

    map
});

/// How many copies of each letter the bag starts with
pub static TILE_DISTRIBUTION: &[(char, usize)] = &[
    ('E', 15),
    ('N', 9),
    ('S', 7),
    ('I', 6),
    ('R', 6),
    ('T', 6),
    ('U', 6),
    ('A', 5),
    ('D', 4),
    ('H', 4),
    ('M', 4),
    ('G', 3),
    ('L', 3),
    ('O', 3),
    ('B', 2),
    ('C', 2),
    ('F', 2),
    ('K', 2),
    ('J', 1),
    ('P', 1),
    ('Q', 1),
    ('V', 1),
    ('W', 1),
    ('X', 1),
    ('Y', 1),
    ('Z', 1),
];

/// Get the point value for a letter
pub fn letter_value(letter: char) -> u8 {
    let upper = letter.to_ascii_uppercase();
    *LETTER_VALUES.get(&upper).unwrap_or(&1)
}

/// Number of tiles a freshly filled bag contains
pub fn total_tile_count() -> usize {
    TILE_DISTRIBUTION.iter().map(|(_, count)| count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_values() {
        assert_eq!(letter_value('E'), 1);
        assert_eq!(letter_value('H'), 2);
        assert_eq!(letter_value('C'), 4);
        assert_eq!(letter_value('F'), 4);
        assert_eq!(letter_value('Q'), 10);
        assert_eq!(letter_value('Y'), 10);
        assert_eq!(letter_value('x'), 8);
    }

    #[test]
    fn test_total_tile_count() {
        assert_eq!(total_tile_count(), 97);
    }

    #[test]
    fn test_every_distributed_letter_has_a_value() {
        for (letter, count) in TILE_DISTRIBUTION {
            assert!(*count > 0);
            assert!(
                LETTER_VALUES.contains_key(letter),
                "no value for letter {}",
                letter
            );
        }
    }
}
