use anyhow::{Context, Result, bail};

use crate::card::Card;
use crate::container::ContainerId;

/// A committed transfer. Failed or abandoned attempts are never recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub cards: Vec<Card>,
    pub from: ContainerId,
    pub to: ContainerId,
}

impl MoveRecord {
    pub fn to_short_string(&self) -> String {
        let mut str = format!("{}:{}", self.from.to_short_string(), self.to.to_short_string());
        if self.cards.len() > 1 {
            str.push_str(&format!("@{}", self.cards.len()));
        }
        str
    }

    pub fn describe(&self) -> String {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_pretty_string())
            .collect::<Vec<_>>()
            .join("");
        format!(
            "({}) {cards} -> ({})",
            self.from.to_short_string(),
            self.to.to_short_string()
        )
    }
}

/// Append-only ledger of committed moves, consumed newest first by undo.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    records: Vec<MoveRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn back(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn as_slice(&self) -> &[MoveRecord] {
        &self.records
    }
}

pub fn format_moves(records: &[MoveRecord]) -> String {
    let list: Vec<String> = records.iter().map(|r| r.to_short_string()).collect();

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.push('\n');
    }

    output
}

/// One step of a move script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the top `count` cards of `from` onto `to`.
    Transfer {
        from: ContainerId,
        to: ContainerId,
        count: usize,
    },
    /// Send the top card of a container to the first foundation, else the
    /// first free cell, that takes it.
    AutoPlace(ContainerId),
    Undo,
}

impl Command {
    pub fn to_short_string(&self) -> String {
        match self {
            Command::Transfer { from, to, count } => {
                let mut str = format!("{}:{}", from.to_short_string(), to.to_short_string());
                if *count > 1 {
                    str.push_str(&format!("@{count}"));
                }
                str
            }
            Command::AutoPlace(from) => format!("*{}", from.to_short_string()),
            Command::Undo => "U".to_string(),
        }
    }
}

/// Parses whitespace separated commands: `T1:T4@3`, `C2:F1`, `*T5`, `U`.
pub fn parse_commands(s: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for part in s.split_whitespace() {
        let part_ctx = || format!("Failed to parse move part: '{part}'");
        if part.eq_ignore_ascii_case("U") {
            commands.push(Command::Undo);
        } else if let Some(rest) = part.strip_prefix('*') {
            let from = parse_container_id(rest).with_context(part_ctx)?;
            commands.push(Command::AutoPlace(from));
        } else if let Some((from_str, to_part)) = part.split_once(':') {
            let from = parse_container_id(from_str).with_context(part_ctx)?;
            let (to_str, count) = match to_part.split_once('@') {
                Some((to_s, count_s)) => {
                    (to_s, count_s.parse::<usize>().with_context(part_ctx)?)
                }
                None => (to_part, 1),
            };
            if count == 0 {
                bail!("Move count must be positive: '{part}'");
            }
            let to = parse_container_id(to_str).with_context(part_ctx)?;
            commands.push(Command::Transfer { from, to, count });
        } else {
            bail!("Unknown move format: {}", part);
        }
    }
    Ok(commands)
}

fn parse_container_id(s: &str) -> Result<ContainerId> {
    let mut chars = s.chars();
    let prefix = chars.next().map(|c| c.to_ascii_uppercase());
    let digits = chars.as_str();
    let num = digits
        .parse::<usize>()
        .with_context(|| format!("Invalid container index: {digits}"))?;
    if num == 0 {
        bail!("Container indices start at 1: {}", s);
    }
    match prefix {
        Some('T') => Ok(ContainerId::Tableau(num - 1)),
        Some('F') => Ok(ContainerId::Foundation(num - 1)),
        Some('C') => Ok(ContainerId::FreeCell(num - 1)),
        _ => bail!("Invalid container identifier: {}", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn record(count: usize, from: ContainerId, to: ContainerId) -> MoveRecord {
        MoveRecord {
            cards: Card::deck().take(count).collect(),
            from,
            to,
        }
    }

    #[test]
    fn test_action_log() {
        let mut log = ActionLog::new();
        assert!(log.is_empty());
        assert!(log.back().is_none());
        log.add(record(1, ContainerId::Tableau(0), ContainerId::FreeCell(0)));
        log.add(record(2, ContainerId::Tableau(1), ContainerId::Tableau(2)));
        assert_eq!(log.len(), 2);
        assert_eq!(log.back().map(|r| r.from), Some(ContainerId::Tableau(1)));
        let popped = log.pop().unwrap();
        assert_eq!(popped.to, ContainerId::Tableau(2));
        assert_eq!(log.len(), 1);
        assert_eq!(log.iter().count(), 1);
    }

    #[test]
    fn test_format_moves() {
        let records = vec![
            record(1, ContainerId::Tableau(0), ContainerId::FreeCell(1)),
            record(3, ContainerId::Tableau(2), ContainerId::Tableau(7)),
            record(1, ContainerId::FreeCell(1), ContainerId::Foundation(0)),
        ];
        assert_eq!(format_moves(&records), "T1:C2   T3:T8@3 C2:F1   \n");
        assert_eq!(format_moves(&[]), "");
    }

    #[test]
    fn test_describe() {
        let record = MoveRecord {
            cards: vec![
                Card::new(Rank::Nine, Suit::Diamond),
                Card::new(Rank::Eight, Suit::Spade),
            ],
            from: ContainerId::Tableau(0),
            to: ContainerId::Tableau(3),
        };
        assert_eq!(record.describe(), "(T1) 9♦8♠ -> (T4)");
    }

    #[test]
    fn test_parse_commands() {
        let commands = parse_commands("T1:T4@3 c2:f1\n*T5 U").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Transfer {
                    from: ContainerId::Tableau(0),
                    to: ContainerId::Tableau(3),
                    count: 3,
                },
                Command::Transfer {
                    from: ContainerId::FreeCell(1),
                    to: ContainerId::Foundation(0),
                    count: 1,
                },
                Command::AutoPlace(ContainerId::Tableau(4)),
                Command::Undo,
            ]
        );
        assert!(parse_commands("T0:T1").is_err());
        assert!(parse_commands("T1:T2@0").is_err());
        assert!(parse_commands("X1:T2").is_err());
        assert!(parse_commands("T1-T2").is_err());
        assert!(parse_commands("T1:D").is_err());
        assert!(parse_commands("*D").is_err());
        assert!(parse_commands("").unwrap().is_empty());

        let text: Vec<String> = commands.iter().map(|c| c.to_short_string()).collect();
        assert_eq!(text, vec!["T1:T4@3", "C2:F1", "*T5", "U"]);
    }
}
