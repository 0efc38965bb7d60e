//! Pure move-legality rules shared by containers and the table.
use crate::card::Card;

/// Descending by exactly one rank with alternating colors, e.g. `T♠ 9♦ 8♠`.
pub fn tableau_sequence_is_valid(cards: &[Card]) -> bool {
    cards
        .windows(2)
        .all(|pair| pair[0].is_higher_by_one_than(&pair[1]) && !pair[0].has_same_color(&pair[1]))
}

/// Ascending by exactly one rank within one suit, e.g. `A♥ 2♥ 3♥`.
pub fn foundation_sequence_is_valid(cards: &[Card]) -> bool {
    cards
        .windows(2)
        .all(|pair| pair[1].is_higher_by_one_than(&pair[0]) && pair[1].has_same_suit(&pair[0]))
}

/// Maximum number of cards movable as one unit with the given free slots.
///
/// Every empty pile can stage a whole run of the size the cells allow.
pub fn supermove_bound(empty_cells: usize, empty_piles: usize) -> usize {
    (empty_cells + 1) * (empty_piles + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        chars
            .chunks(2)
            .map(|pair| Card::parse(pair[0], pair[1]).unwrap())
            .collect()
    }

    #[test]
    fn test_tableau_sequence() {
        assert!(tableau_sequence_is_valid(&cards("T♠9♦8♠")));
        assert!(!tableau_sequence_is_valid(&cards("T♠9♠8♦")));
        assert!(!tableau_sequence_is_valid(&cards("T♠8♦")));
        assert!(!tableau_sequence_is_valid(&cards("9♦T♠")));
        assert!(tableau_sequence_is_valid(&cards("K♥")));
        assert!(tableau_sequence_is_valid(&[]));
    }

    #[test]
    fn test_foundation_sequence() {
        assert!(foundation_sequence_is_valid(&cards("A♥2♥3♥")));
        assert!(!foundation_sequence_is_valid(&cards("A♥2♠")));
        assert!(!foundation_sequence_is_valid(&cards("A♥2♦")));
        assert!(!foundation_sequence_is_valid(&cards("A♥3♥")));
        assert!(!foundation_sequence_is_valid(&cards("2♥A♥")));
    }

    #[test]
    fn test_supermove_bound() {
        assert_eq!(supermove_bound(0, 0), 1);
        assert_eq!(supermove_bound(2, 1), 6);
        assert_eq!(supermove_bound(2, 0), 3);
        assert_eq!(supermove_bound(4, 8), 45);
    }
}
