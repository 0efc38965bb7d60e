use anyhow::{Context, Result};

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

const SUITS: [char; 4] = ['♣', '♦', '♥', '♠'];
const ASCII_SUITS: [char; 4] = ['C', 'D', 'H', 'S'];
const RANKS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

    pub fn color(self) -> Color {
        match self {
            Suit::Heart | Suit::Diamond => Color::Red,
            Suit::Club | Suit::Spade => Color::Black,
        }
    }

    pub fn symbol(self) -> char {
        SUITS[self as usize]
    }

    fn from_index(index: u8) -> Self {
        Self::ALL[(index % MAX_SUIT) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Card rank, ordered `Ace = 1` through `King = 13`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> char {
        RANKS[(self.value() - 1) as usize]
    }

    fn from_index(index: u8) -> Self {
        Self::ALL[(index % MAX_RANK) as usize]
    }
}

/// A playing card packed into a single byte: `suit * 13 + (rank - 1)`.
///
/// Each of the 52 ids exists once per game, so value equality doubles as
/// card identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self(suit as u8 * MAX_RANK + rank.value() - 1)
    }

    pub fn from_id(id: u8) -> Option<Self> {
        (id < MAX_CARD).then_some(Self(id))
    }

    /// All 52 cards, suit-major: clubs A..K, diamonds, hearts, spades.
    pub fn deck() -> impl Iterator<Item = Card> {
        (0..MAX_CARD).map(Card)
    }

    pub fn parse(rank: char, suit: char) -> Result<Self> {
        let rank_idx = RANKS
            .iter()
            .position(|&r| r == rank.to_ascii_uppercase())
            .with_context(|| format!("Invalid rank at card {rank}{suit}"))?;
        let suit_idx = SUITS
            .iter()
            .position(|&s| s == suit)
            .or_else(|| {
                ASCII_SUITS
                    .iter()
                    .position(|&s| s == suit.to_ascii_uppercase())
            })
            .with_context(|| format!("Invalid suit at card {rank}{suit}"))?;
        Ok(Card::new(
            Rank::from_index(rank_idx as u8),
            Suit::from_index(suit_idx as u8),
        ))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn rank(&self) -> Rank {
        Rank::from_index(self.0 % MAX_RANK)
    }

    pub fn suit(&self) -> Suit {
        Suit::from_index(self.0 / MAX_RANK)
    }

    pub fn color(&self) -> Color {
        self.suit().color()
    }

    pub fn is_ace(&self) -> bool {
        self.rank() == Rank::Ace
    }

    pub fn has_same_color(&self, other: &Card) -> bool {
        self.color() == other.color()
    }

    pub fn has_same_suit(&self, other: &Card) -> bool {
        self.suit() == other.suit()
    }

    /// `rank(self) - rank(other)`.
    pub fn rank_difference(&self, other: &Card) -> i8 {
        self.rank().value() as i8 - other.rank().value() as i8
    }

    pub fn is_higher_by_one_than(&self, other: &Card) -> bool {
        self.rank_difference(other) == 1
    }

    pub fn to_pretty_string(&self) -> String {
        format!("{}{}", self.rank().symbol(), self.suit().symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_encoding() {
        let card = Card::new(Rank::Queen, Suit::Heart);
        assert_eq!(card.rank(), Rank::Queen);
        assert_eq!(card.suit(), Suit::Heart);
        assert_eq!(card.color(), Color::Red);
        assert_eq!(Card::from_id(card.id()), Some(card));
        assert_eq!(Card::from_id(MAX_CARD), None);
        assert_eq!(Card::deck().count(), MAX_CARD as usize);
    }

    #[test]
    fn test_parse_card() {
        let card = Card::parse('T', '♠').unwrap();
        assert_eq!(card, Card::new(Rank::Ten, Suit::Spade));
        assert_eq!(Card::parse('a', 'd').unwrap(), Card::new(Rank::Ace, Suit::Diamond));
        assert_eq!(card.to_pretty_string(), "T♠");
        assert!(Card::parse('1', '♠').is_err());
        assert!(Card::parse('K', 'X').is_err());
    }

    #[test]
    fn test_adjacency() {
        let ten_spade = Card::new(Rank::Ten, Suit::Spade);
        let nine_diamond = Card::new(Rank::Nine, Suit::Diamond);
        let nine_club = Card::new(Rank::Nine, Suit::Club);
        let eight_spade = Card::new(Rank::Eight, Suit::Spade);

        assert!(ten_spade.is_higher_by_one_than(&nine_diamond));
        assert!(!nine_diamond.is_higher_by_one_than(&ten_spade));
        assert!(!ten_spade.is_higher_by_one_than(&eight_spade));
        assert_eq!(ten_spade.rank_difference(&eight_spade), 2);
        assert_eq!(eight_spade.rank_difference(&ten_spade), -2);

        assert!(ten_spade.has_same_color(&nine_club));
        assert!(!ten_spade.has_same_color(&nine_diamond));
        assert!(ten_spade.has_same_suit(&eight_spade));
        assert!(!ten_spade.has_same_suit(&nine_club));
    }
}
