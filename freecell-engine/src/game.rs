use anyhow::Result;
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::action::{ActionLog, Command, MoveRecord};
use crate::analyzer::GameAnalyzer;
use crate::card::Card;
use crate::config::TableConfig;
use crate::container::ContainerId;
use crate::event::{Event, EventBus};
use crate::table::Table;

/// One game session: the table plus its undo ledger, move counter and
/// outbound events.
#[derive(Debug)]
pub struct Game {
    table: Table,
    log: ActionLog,
    analyzer: GameAnalyzer,
    events: EventBus,
    rng: StdRng,
    seed: u64,
    won: bool,
}

impl Game {
    /// Creates a session with a full deck. Call [`Game::deal`] to start.
    pub fn new(config: TableConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            table: Table::new(config)?,
            log: ActionLog::new(),
            analyzer: GameAnalyzer::new(),
            events: EventBus::default(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            won: false,
        })
    }

    /// Continues from an existing table, e.g. one parsed from a layout.
    pub fn from_table(table: Table) -> Self {
        Self {
            table,
            log: ActionLog::new(),
            analyzer: GameAnalyzer::new(),
            events: EventBus::default(),
            rng: StdRng::seed_from_u64(0),
            seed: 0,
            won: false,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn moves(&self) -> u32 {
        self.analyzer.moves()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn has_won(&self) -> bool {
        self.analyzer.has_won(&self.table)
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.events.drain()
    }

    /// Gathers all cards and deals a fresh game from the session's rng.
    pub fn deal(&mut self) {
        self.table.fill_deck();
        self.table.distribute_cards(&mut self.rng);
        self.log.clear();
        self.analyzer.reset();
        self.won = false;
        info!("new deal from seed {}", self.seed);
        self.events.push(Event::Dealt { seed: self.seed });
    }

    pub fn select(&mut self, container: ContainerId, card: Card) -> bool {
        self.table.select(container, card)
    }

    pub fn unselect(&mut self) {
        self.table.unselect();
    }

    /// Drops the selection on `destination`. Whatever the outcome, nothing
    /// stays selected afterwards.
    pub fn drop_on(&mut self, destination: ContainerId) -> bool {
        let record = self.table.transfer_cards(destination);
        self.table.unselect();
        match record {
            Some(record) => {
                self.commit(record);
                true
            }
            None => false,
        }
    }

    /// Double-click placement: the first foundation that takes `card`,
    /// otherwise the first free cell. A card already in a cell only goes to
    /// a foundation.
    pub fn auto_place(&mut self, card: Card) -> bool {
        let Some(owner) = self.table.owner_of(&card) else {
            return false;
        };
        let Some(destination) = self
            .table
            .card_fits_in_foundation(card)
            .or_else(|| match owner {
                ContainerId::FreeCell(_) => None,
                _ => self.table.card_fits_in_store(card),
            })
        else {
            debug!("auto place: no room for {}", card.to_pretty_string());
            return false;
        };
        if !self.table.select(owner, card) {
            return false;
        }
        self.drop_on(destination)
    }

    /// Reverts the most recent committed move.
    pub fn undo(&mut self) -> bool {
        if self.analyzer.moves() == 0 {
            return false;
        }
        let Some(record) = self.log.back().cloned() else {
            return false;
        };
        if !self.table.undo_move(&record) {
            return false;
        }
        self.log.pop();
        self.analyzer.inc_moves(-1);
        self.events.push(Event::Undone(record));
        true
    }

    pub fn apply_command(&mut self, command: &Command) -> bool {
        match *command {
            Command::Transfer { from, to, count } => {
                let Some(anchor) = self.table.container(from).and_then(|container| {
                    let cards = container.cards();
                    cards.len().checked_sub(count).map(|idx| cards[idx])
                }) else {
                    return false;
                };
                self.select(from, anchor) && self.drop_on(to)
            }
            Command::AutoPlace(from) => {
                let Some(&card) = self.table.container(from).and_then(|c| c.peek_top()) else {
                    return false;
                };
                self.auto_place(card)
            }
            Command::Undo => self.undo(),
        }
    }

    fn commit(&mut self, record: MoveRecord) {
        debug!("committed {}", record.describe());
        self.log.add(record.clone());
        self.analyzer.inc_moves(1);
        self.events.push(Event::Moved(record));
        if !self.won && self.analyzer.has_won(&self.table) {
            self.won = true;
            let moves = self.analyzer.moves();
            info!("game won in {moves} moves");
            self.events.push(Event::Won { moves });
        }
    }
}
