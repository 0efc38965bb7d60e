//! Game-state and move-legality engine for FreeCell-style patience.
//!
//! The engine owns the logical state only: which container holds which card,
//! the active selection, the undo ledger and the win check. Rendering and
//! pointer handling live in the caller, which feeds resolved intents in and
//! drains [`Event`]s out.
pub mod action;
pub mod analyzer;
pub mod card;
pub mod config;
pub mod container;
pub mod event;
pub mod game;
pub mod table;
pub mod validator;

mod layout;

pub use crate::action::{ActionLog, Command, MoveRecord, format_moves, parse_commands};
pub use crate::analyzer::GameAnalyzer;
pub use crate::card::{Card, Color, Rank, Suit};
pub use crate::config::TableConfig;
pub use crate::container::{Container, ContainerId, ContainerKind};
pub use crate::event::{Event, EventBus};
pub use crate::game::Game;
pub use crate::table::{Selection, Table};
