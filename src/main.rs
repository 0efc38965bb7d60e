use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use freecell_engine::{Event, Game, TableConfig, format_moves, parse_commands};

use std::io::{IsTerminal, Read, stdin};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deal a game and print the table
    Deal {
        #[command(flatten)]
        table: TableArgs,
    },
    /// Deal a game and replay moves on it (e.g. `T1:T4@3 C2:F1 *T5 U`)
    Play {
        #[command(flatten)]
        table: TableArgs,
        /// Moves to play; read from stdin when omitted
        moves: Vec<String>,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Seed for the deal; random when omitted
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
    /// Number of tableau piles
    #[arg(long, default_value_t = 8, value_name = "NUM")]
    tableaus: usize,
    /// Number of foundations
    #[arg(long, default_value_t = 4, value_name = "NUM")]
    foundations: usize,
    /// Number of free cells
    #[arg(long, default_value_t = 4, value_name = "NUM")]
    free_cells: usize,
}

impl TableArgs {
    fn new_game(&self) -> Result<Game> {
        let config = TableConfig {
            tableaus: self.tableaus,
            foundations: self.foundations,
            free_cells: self.free_cells,
        };
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut game = Game::new(config, seed).context("Invalid table configuration")?;
        game.deal();
        Ok(game)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Deal { table } => {
            let game = table.new_game()?;
            println!("GameId: {}", game.seed());
            println!("{}", game.table().to_pretty_string());
        }
        Commands::Play { table, moves } => {
            let mut game = table.new_game()?;
            let script = if !moves.is_empty() {
                moves.join(" ")
            } else if !stdin().is_terminal() {
                let mut content = String::new();
                stdin()
                    .read_to_string(&mut content)
                    .context("Failed to read from stdin")?;
                content
            } else {
                anyhow::bail!("No moves provided.");
            };
            let commands = parse_commands(&script).context("Failed to parse moves")?;
            play(&mut game, &commands);
        }
    }

    Ok(())
}

fn play(game: &mut Game, commands: &[freecell_engine::Command]) {
    println!("GameId: {}", game.seed());
    println!("{}\n", game.table().to_pretty_string());

    let mut rejected = 0;
    for (i, command) in commands.iter().enumerate() {
        if !game.apply_command(command) {
            rejected += 1;
            println!("✗ Move {} rejected: {}", i + 1, command.to_short_string());
        }
    }

    let won = game
        .drain_events()
        .find_map(|event| match event {
            Event::Won { moves } => Some(moves),
            _ => None,
        });

    println!(
        r#"
===== TABLE =====
{}

===== MOVES =====
{}"#,
        game.table().to_pretty_string(),
        format_moves(game.log().as_slice())
    );
    match won {
        Some(moves) => println!("✓ Won in {moves} moves"),
        None => println!("Moves: {}, Rejected: {rejected}", game.moves()),
    }
}
