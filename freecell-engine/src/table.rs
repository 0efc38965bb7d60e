use anyhow::Result;
use log::{debug, info, trace};
use rand::Rng;
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};

use crate::action::MoveRecord;
use crate::card::{Card, MAX_CARD};
use crate::config::TableConfig;
use crate::container::{Cards, Container, ContainerId, ContainerKind};
use crate::validator::supermove_bound;

/// Cards picked up for the move in flight: a valid run on top of `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub source: ContainerId,
    pub cards: Cards,
}

/// The playing surface. Owns every container, the card to container index
/// and the active selection.
#[derive(Debug, Clone)]
pub struct Table {
    config: TableConfig,
    pub(crate) tableaus: Vec<Container>,
    pub(crate) foundations: Vec<Container>,
    pub(crate) free_cells: Vec<Container>,
    pub(crate) deck: Container,
    pub(crate) owners: FxHashMap<Card, ContainerId>,
    selection: Option<Selection>,
}

impl Table {
    /// Creates a table with every card in the deck.
    pub fn new(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let mut table = Self {
            config,
            tableaus: vec![Container::new(ContainerKind::Tableau); config.tableaus],
            foundations: vec![Container::new(ContainerKind::Foundation); config.foundations],
            free_cells: vec![Container::new(ContainerKind::FreeCell); config.free_cells],
            deck: Container::new(ContainerKind::Deck),
            owners: FxHashMap::default(),
            selection: None,
        };
        table.fill_deck();
        Ok(table)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn tableaus(&self) -> &[Container] {
        &self.tableaus
    }

    pub fn foundations(&self) -> &[Container] {
        &self.foundations
    }

    pub fn free_cells(&self) -> &[Container] {
        &self.free_cells
    }

    pub fn deck(&self) -> &Container {
        &self.deck
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        match id {
            ContainerId::Tableau(i) => self.tableaus.get(i),
            ContainerId::Foundation(i) => self.foundations.get(i),
            ContainerId::FreeCell(i) => self.free_cells.get(i),
            ContainerId::Deck => Some(&self.deck),
        }
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        match id {
            ContainerId::Tableau(i) => self.tableaus.get_mut(i),
            ContainerId::Foundation(i) => self.foundations.get_mut(i),
            ContainerId::FreeCell(i) => self.free_cells.get_mut(i),
            ContainerId::Deck => Some(&mut self.deck),
        }
    }

    /// Every container id, free cells first, then foundations, tableau piles
    /// and the deck.
    pub fn container_ids(&self) -> impl Iterator<Item = ContainerId> + use<> {
        let (cells, foundations, tableaus) = (
            self.free_cells.len(),
            self.foundations.len(),
            self.tableaus.len(),
        );
        (0..cells)
            .map(ContainerId::FreeCell)
            .chain((0..foundations).map(ContainerId::Foundation))
            .chain((0..tableaus).map(ContainerId::Tableau))
            .chain(std::iter::once(ContainerId::Deck))
    }

    pub fn owner_of(&self, card: &Card) -> Option<ContainerId> {
        self.owners.get(card).copied()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_cards(&self) -> &[Card] {
        self.selection
            .as_ref()
            .map(|s| s.cards.as_slice())
            .unwrap_or_default()
    }

    pub fn has_selected_cards(&self) -> bool {
        self.selection.is_some()
    }

    /// Gathers every card back into the deck in suit-major order.
    pub fn fill_deck(&mut self) {
        self.selection = None;
        for container in self
            .tableaus
            .iter_mut()
            .chain(self.foundations.iter_mut())
            .chain(self.free_cells.iter_mut())
        {
            container.take_all();
        }
        self.deck.take_all();
        self.owners.clear();
        for card in Card::deck() {
            self.deck.push_card(card);
            self.owners.insert(card, ContainerId::Deck);
        }
    }

    /// Deals the whole deck round-robin onto the tableau piles in a uniformly
    /// random order.
    pub fn distribute_cards<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.selection = None;
        let deck = self.deck.take_all();
        let total = deck.len();
        let mut used = vec![false; total];
        for i in 0..total {
            let mut idx = rng.random_range(0..total);
            while used[idx] {
                idx = rng.random_range(0..total);
            }
            used[idx] = true;

            let card = deck[idx];
            let pile_idx = i % self.tableaus.len();
            self.tableaus[pile_idx].push_card(card);
            self.owners.insert(card, ContainerId::Tableau(pile_idx));
        }
        info!(
            "dealt {total} cards onto {} tableau piles",
            self.tableaus.len()
        );
    }

    /// The largest run that may move as one unit onto `destination`.
    ///
    /// Recomputed from current occupancy on every call. An empty destination
    /// pile cannot also serve as a staging slot, so it is not counted.
    pub fn allowed_cards_to_move(&self, destination: Option<ContainerId>) -> usize {
        let empty_cells = self.free_cells.iter().filter(|c| c.is_empty()).count();
        let mut empty_piles = self.tableaus.iter().filter(|c| c.is_empty()).count();
        if let Some(ContainerId::Tableau(i)) = destination
            && self.tableaus.get(i).is_some_and(|pile| pile.is_empty())
        {
            empty_piles -= 1;
        }
        supermove_bound(empty_cells, empty_piles)
    }

    /// Picks up `anchor` and whatever the container's rule drags along with
    /// it. Returns `false` and leaves nothing selected when the rule refuses.
    pub fn select(&mut self, id: ContainerId, anchor: Card) -> bool {
        self.selection = None;
        let Some(container) = self.container(id) else {
            debug!("select: no container {id:?}");
            return false;
        };
        let Some(idx) = container.position(&anchor) else {
            debug!(
                "select: {} is not in {}",
                anchor.to_pretty_string(),
                id.to_short_string()
            );
            return false;
        };

        let cards: Cards = match container.kind() {
            ContainerKind::Tableau => {
                let run = &container.cards()[idx..];
                let allowed = self.allowed_cards_to_move(None);
                if !container.sequence_is_valid(run) {
                    debug!(
                        "select: run from {} in {} is not ordered",
                        anchor.to_pretty_string(),
                        id.to_short_string()
                    );
                    return false;
                }
                if run.len() > allowed {
                    debug!("select: run of {} exceeds limit {allowed}", run.len());
                    return false;
                }
                SmallVec::from_slice(run)
            }
            ContainerKind::Foundation => {
                if idx + 1 != container.len() || self.allowed_cards_to_move(None) < 1 {
                    debug!("select: only the top of a foundation can be taken");
                    return false;
                }
                smallvec![anchor]
            }
            ContainerKind::FreeCell => smallvec![anchor],
            ContainerKind::Deck => {
                debug!("select: the deck is not playable");
                return false;
            }
        };

        trace!(
            "selected {} card(s) from {}",
            cards.len(),
            id.to_short_string()
        );
        self.selection = Some(Selection { source: id, cards });
        true
    }

    pub fn unselect(&mut self) {
        self.selection = None;
    }

    /// Moves the selection onto `destination` if the move is legal.
    ///
    /// A refused move leaves the table and the selection untouched.
    pub fn transfer_cards(&mut self, destination: ContainerId) -> Option<MoveRecord> {
        let selection = self.selection.as_ref()?;
        if destination.kind() == ContainerKind::Deck {
            debug!("transfer: the deck is not a drop target");
            return None;
        }
        let Some(target) = self.container(destination) else {
            debug!("transfer: no container {destination:?}");
            return None;
        };
        if selection.source == destination {
            debug!("transfer: {} is already the source", destination.to_short_string());
            return None;
        }
        let allowed = self.allowed_cards_to_move(Some(destination));
        if selection.cards.len() > allowed {
            debug!(
                "transfer: {} card(s) exceed limit {allowed} for {}",
                selection.cards.len(),
                destination.to_short_string()
            );
            return None;
        }
        if !target.can_accept(&selection.cards) {
            debug!("transfer: {} refuses the selection", destination.to_short_string());
            return None;
        }

        let Selection { source, cards } = self.selection.take()?;
        if let Some(from) = self.container_mut(source) {
            for card in &cards {
                from.remove_card(card);
            }
        }
        if let Some(to) = self.container_mut(destination) {
            for &card in &cards {
                let accepted = to.add_card(card);
                debug_assert!(accepted, "validated run must be accepted card by card");
            }
        }
        for &card in &cards {
            self.owners.insert(card, destination);
        }

        Some(MoveRecord {
            cards: cards.to_vec(),
            from: source,
            to: destination,
        })
    }

    /// Re-homes a committed move's cards onto its source, bypassing the
    /// acceptance rules. The cards must still sit in the destination.
    pub fn undo_move(&mut self, record: &MoveRecord) -> bool {
        self.selection = None;
        if self.container(record.from).is_none() || self.container(record.to).is_none() {
            debug!("undo: unknown container in {}", record.to_short_string());
            return false;
        }
        if !record
            .cards
            .iter()
            .all(|card| self.owner_of(card) == Some(record.to))
        {
            debug!("undo: cards of {} have moved on", record.to_short_string());
            return false;
        }
        for &card in &record.cards {
            if let Some(to) = self.container_mut(record.to) {
                to.remove_card(&card);
            }
            if let Some(from) = self.container_mut(record.from) {
                from.push_card(card);
            }
            self.owners.insert(card, record.from);
        }
        true
    }

    pub fn card_fits_in_foundation(&self, card: Card) -> Option<ContainerId> {
        self.foundations
            .iter()
            .position(|f| f.can_accept(&[card]))
            .map(ContainerId::Foundation)
    }

    pub fn card_fits_in_store(&self, card: Card) -> Option<ContainerId> {
        self.free_cells
            .iter()
            .position(|c| c.can_accept(&[card]))
            .map(ContainerId::FreeCell)
    }

    /// Checks exclusive ownership of all 52 cards, the owner index, each
    /// container's own rule and the selection.
    pub fn is_consistent(&self) -> bool {
        let mut seen = [false; MAX_CARD as usize];
        let mut count = 0;
        for id in self.container_ids() {
            let Some(container) = self.container(id) else {
                return false;
            };
            if !container.is_well_formed() {
                return false;
            }
            for card in container.cards() {
                let idx = card.id() as usize;
                if seen[idx] || self.owner_of(card) != Some(id) {
                    return false;
                }
                seen[idx] = true;
                count += 1;
            }
        }
        if count != MAX_CARD as usize || self.owners.len() != count {
            return false;
        }
        match &self.selection {
            None => true,
            Some(selection) => self.container(selection.source).is_some_and(|source| {
                source.cards().ends_with(&selection.cards)
                    && (source.kind() != ContainerKind::Tableau
                        || source.sequence_is_valid(&selection.cards))
            }),
        }
    }
}
