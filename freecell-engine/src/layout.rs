use anyhow::{Context, Result, bail};

use crate::card::{Card, MAX_CARD};
use crate::config::TableConfig;
use crate::container::ContainerId;
use crate::table::Table;

impl Table {
    /// Builds a table from its text layout, e.g.
    ///
    /// ```text
    /// FreeCell1: 5♦
    /// Foundation1: A♣2♣
    /// Tableau1: 4♣K♦Q♠J♥
    /// Deck: 9♠
    /// ```
    ///
    /// Cards the layout does not mention end up in the deck.
    pub fn parse(config: TableConfig, content: &str) -> Result<Self> {
        let mut table = Table::new(config)?;
        let mut placements: Vec<(ContainerId, Vec<Card>)> = Vec::new();
        let mut seen = [false; MAX_CARD as usize];

        for line in content
            .split('\n')
            .map(|v| v.trim())
            .filter(|l| !l.is_empty())
        {
            let line_context = || format!("Failed to parse at '{line}'");
            let (name, rest) = line
                .split_once(':')
                .context("Missing ':' separator")
                .with_context(line_context)?;
            let id = parse_container_name(name.trim()).with_context(line_context)?;
            if table.container(id).is_none() {
                bail!("No such container in this table: '{line}'");
            }
            let cards = parse_cards(rest.trim()).with_context(line_context)?;
            for card in &cards {
                let idx = card.id() as usize;
                if seen[idx] {
                    bail!("Duplicate card {} at '{line}'", card.to_pretty_string());
                }
                seen[idx] = true;
            }
            placements.push((id, cards));
        }

        let remaining: Vec<Card> = table
            .deck
            .take_all()
            .into_iter()
            .filter(|card| !seen[card.id() as usize])
            .collect();
        for (id, cards) in placements {
            for card in cards {
                table.place(id, card);
            }
            if let Some(container) = table.container(id)
                && !container.is_well_formed()
            {
                bail!("Invalid cards for {}", id.to_short_string());
            }
        }
        for card in remaining {
            table.place(ContainerId::Deck, card);
        }

        Ok(table)
    }

    fn place(&mut self, id: ContainerId, card: Card) {
        if let Some(container) = self.container_mut(id) {
            container.push_card(card);
            self.owners.insert(card, id);
        }
    }

    pub fn to_pretty_string(&self) -> String {
        let mut output = String::new();

        for id in self.container_ids() {
            let Some(container) = self.container(id) else {
                continue;
            };
            if container.is_empty() {
                continue;
            }
            let name = match id {
                ContainerId::FreeCell(i) => format!("FreeCell{}", i + 1),
                ContainerId::Foundation(i) => format!("Foundation{}", i + 1),
                ContainerId::Tableau(i) => format!("Tableau{}", i + 1),
                ContainerId::Deck => "Deck".to_string(),
            };
            output.push_str(&format!("{name}: "));
            for card in container.cards() {
                output.push_str(&card.to_pretty_string());
            }
            output.push('\n');
        }

        output.trim_end().to_string()
    }
}

fn parse_container_name(name: &str) -> Result<ContainerId> {
    if name == "Deck" {
        return Ok(ContainerId::Deck);
    }
    let (make, digits): (fn(usize) -> ContainerId, &str) =
        if let Some(rest) = name.strip_prefix("FreeCell") {
            (ContainerId::FreeCell, rest)
        } else if let Some(rest) = name.strip_prefix("Foundation") {
            (ContainerId::Foundation, rest)
        } else if let Some(rest) = name.strip_prefix("Tableau") {
            (ContainerId::Tableau, rest)
        } else {
            bail!("Unknown container '{name}'");
        };
    let idx = digits
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid index for '{name}'"))?;
    if idx == 0 {
        bail!("Container indices start at 1: '{name}'");
    }
    Ok(make(idx - 1))
}

fn parse_cards(s: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c1) = chars.peek() {
        if c1.is_whitespace() {
            chars.next();
            continue;
        }
        let rank = c1;
        chars.next();
        let suit = match chars.next() {
            Some(s) => s,
            None => bail!("Missing suit after '{rank}'"),
        };
        cards.push(Card::parse(rank, suit)?);
    }
    Ok(cards)
}
