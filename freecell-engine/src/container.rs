use smallvec::SmallVec;

use crate::card::Card;
use crate::validator::{foundation_sequence_is_valid, tableau_sequence_is_valid};

const CONTAINER_SIZE: usize = 19;

pub type Cards = SmallVec<[Card; CONTAINER_SIZE]>;

/// Stable handle to one container of a table. Indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerId {
    Tableau(usize),
    Foundation(usize),
    FreeCell(usize),
    Deck,
}

impl ContainerId {
    pub fn kind(&self) -> ContainerKind {
        match self {
            ContainerId::Tableau(_) => ContainerKind::Tableau,
            ContainerId::Foundation(_) => ContainerKind::Foundation,
            ContainerId::FreeCell(_) => ContainerKind::FreeCell,
            ContainerId::Deck => ContainerKind::Deck,
        }
    }

    /// Short notation: `T1`, `F2`, `C3`, `D`.
    pub fn to_short_string(&self) -> String {
        match self {
            ContainerId::Tableau(i) => format!("T{}", i + 1),
            ContainerId::Foundation(i) => format!("F{}", i + 1),
            ContainerId::FreeCell(i) => format!("C{}", i + 1),
            ContainerId::Deck => "D".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Tableau,
    Foundation,
    FreeCell,
    Deck,
}

/// An ordered holder of cards; index 0 is the bottom, the last card is on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    kind: ContainerKind,
    cards: Cards,
}

impl Container {
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            cards: SmallVec::new(),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn position(&self, card: &Card) -> Option<usize> {
        self.cards.iter().position(|c| c == card)
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.position(card).is_some()
    }

    /// Whether `cards` form a run this container could hold.
    ///
    /// For free cells the answer also depends on the cell being empty.
    pub fn sequence_is_valid(&self, cards: &[Card]) -> bool {
        match self.kind {
            ContainerKind::Tableau => tableau_sequence_is_valid(cards),
            ContainerKind::Foundation => foundation_sequence_is_valid(cards),
            ContainerKind::FreeCell => cards.len() == 1 && self.is_empty(),
            ContainerKind::Deck => true,
        }
    }

    /// Authoritative check for dropping `cards` on top of this container.
    pub fn can_accept(&self, cards: &[Card]) -> bool {
        if cards.is_empty() {
            return false;
        }
        match (self.kind, self.peek_top()) {
            (ContainerKind::Deck, _) => true,
            (ContainerKind::FreeCell, _) => self.sequence_is_valid(cards),
            (ContainerKind::Foundation, None) => cards.len() == 1 && cards[0].is_ace(),
            (ContainerKind::Tableau, None) => self.sequence_is_valid(cards),
            (_, Some(&top)) => {
                let mut run: Cards = SmallVec::with_capacity(cards.len() + 1);
                run.push(top);
                run.extend_from_slice(cards);
                self.sequence_is_valid(&run)
            }
        }
    }

    /// Whether the whole contents obey this container's rule as if built up
    /// from empty.
    pub fn is_well_formed(&self) -> bool {
        match self.kind {
            ContainerKind::Tableau | ContainerKind::Deck => true,
            ContainerKind::FreeCell => self.cards.len() <= 1,
            ContainerKind::Foundation => {
                self.cards.first().is_none_or(|card| card.is_ace())
                    && foundation_sequence_is_valid(&self.cards)
            }
        }
    }

    /// Single-card probe; appends only when the card is accepted.
    pub fn add_card(&mut self, card: Card) -> bool {
        if !self.can_accept(&[card]) {
            return false;
        }
        self.cards.push(card);
        true
    }

    pub fn remove_card(&mut self, card: &Card) {
        if let Some(idx) = self.position(card) {
            self.cards.remove(idx);
        }
    }

    /// Unconditional append for trusted paths: the deal and undo.
    pub fn push_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub(crate) fn take_all(&mut self) -> Cards {
        std::mem::take(&mut self.cards)
    }
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

    fn container(kind: ContainerKind, s: &str) -> Container {
        let mut container = Container::new(kind);
        for card in cards(s) {
            container.push_card(card);
        }
        container
    }

    #[test]
    fn test_tableau_accept() {
        let empty = Container::new(ContainerKind::Tableau);
        assert!(empty.can_accept(&cards("9♦8♠7♥")));
        assert!(!empty.can_accept(&cards("9♦8♦")));
        assert!(!empty.can_accept(&[]));

        let pile = container(ContainerKind::Tableau, "3♣T♠");
        assert!(pile.can_accept(&cards("9♦8♠")));
        assert!(pile.can_accept(&cards("9♥")));
        assert!(!pile.can_accept(&cards("9♠")));
        assert!(!pile.can_accept(&cards("8♦")));
    }

    #[test]
    fn test_foundation_accept() {
        let empty = Container::new(ContainerKind::Foundation);
        assert!(empty.can_accept(&cards("A♥")));
        assert!(!empty.can_accept(&cards("2♥")));
        assert!(!empty.can_accept(&cards("A♥2♥")));

        let foundation = container(ContainerKind::Foundation, "A♥2♥");
        assert!(foundation.can_accept(&cards("3♥")));
        assert!(!foundation.can_accept(&cards("3♦")));
        assert!(!foundation.can_accept(&cards("4♥")));
        assert!(foundation.is_well_formed());
        assert!(!container(ContainerKind::Foundation, "2♥3♥").is_well_formed());
    }

    #[test]
    fn test_free_cell_capacity() {
        let mut cell = Container::new(ContainerKind::FreeCell);
        assert!(!cell.can_accept(&cards("9♦8♠")));
        assert!(cell.add_card(cards("9♦")[0]));
        assert!(!cell.add_card(cards("8♠")[0]));
        assert_eq!(cell.cards(), cards("9♦").as_slice());
        assert!(cell.is_well_formed());
    }

    #[test]
    fn test_add_card_probe() {
        let mut pile = container(ContainerKind::Tableau, "T♠");
        assert!(!pile.add_card(cards("9♣")[0]));
        assert_eq!(pile.len(), 1);
        assert!(pile.add_card(cards("9♥")[0]));
        assert_eq!(pile.cards(), cards("T♠9♥").as_slice());

        let mut deck = Container::new(ContainerKind::Deck);
        assert!(deck.add_card(cards("9♣")[0]));
        assert!(deck.add_card(cards("2♦")[0]));
    }

    #[test]
    fn test_remove_and_push() {
        let mut pile = container(ContainerKind::Tableau, "T♠9♥8♣");
        pile.remove_card(&cards("9♥")[0]);
        assert_eq!(pile.cards(), cards("T♠8♣").as_slice());
        pile.remove_card(&cards("K♦")[0]);
        assert_eq!(pile.len(), 2);
        pile.push_card(cards("2♦")[0]);
        assert_eq!(pile.peek_top(), Some(&cards("2♦")[0]));
    }

    #[test]
    fn test_short_string() {
        assert_eq!(ContainerId::Tableau(0).to_short_string(), "T1");
        assert_eq!(ContainerId::FreeCell(3).to_short_string(), "C4");
        assert_eq!(ContainerId::Foundation(1).kind(), ContainerKind::Foundation);
    }
}
