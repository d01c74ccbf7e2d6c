//! Command-line card inventory and deck management.

mod editions;
mod prompt;

use std::path::PathBuf;

use cardbox::{Card, DeckState, InUseStates, SqliteStore, Store};
use cardbox_engine::{DecisionProvider, Engine, Error};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::editions::ScryfallResolver;
use crate::prompt::TerminalPrompter;

/// Personal card inventory and deck management.
#[derive(Parser, Debug)]
#[command(name = "cardbox")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the inventory database
    #[arg(long, default_value = "cardbox.db")]
    db: PathBuf,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a vendor CSV export and reconcile it with the inventory
    Import {
        /// The CSV file to import
        file: PathBuf,

        /// Override the Scryfall API base URL
        #[arg(long)]
        scryfall_url: Option<String>,
    },

    /// Find and merge duplicate inventory rows
    Dedupe {
        /// Show the planned merges without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// List decks with their owned and wishlisted totals
    Decks,

    /// List cards with committed and free copies
    Cards,

    /// Add copies of one card
    Add {
        name: String,
        edition: String,

        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Collector number
        #[arg(long, default_value = "")]
        number: String,

        /// Condition code (NM, SP, ...)
        #[arg(long, default_value = "NM")]
        condition: String,

        /// Language code (en, de, ...)
        #[arg(long, default_value = "en")]
        language: String,

        #[arg(long)]
        foil: bool,
    },

    /// Remove owned copies from a card
    Remove {
        card_id: i64,
        #[arg(default_value_t = 1)]
        amount: u32,
    },

    /// Create a deck
    CreateDeck {
        name: String,

        /// Deck state: broken-down, partial, or complete
        #[arg(long, default_value = "complete")]
        state: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let store = SqliteStore::open(&args.db)?;
    let engine = Engine::new(store);
    info!(db = %args.db.display(), "inventory opened");

    let outcome = match args.command {
        Command::Import { file, scryfall_url } => import(&engine, &file, scryfall_url.as_deref()),
        Command::Dedupe { dry_run } => dedupe(&engine, dry_run),
        Command::Decks => decks(&engine),
        Command::Cards => cards(&engine),
        Command::Add {
            name,
            edition,
            count,
            number,
            condition,
            language,
            foil,
        } => {
            let mut card = Card::new(name, edition)
                .with_count(count)
                .with_number(number)
                .with_condition(condition);
            card.language = language;
            card.flags.foil = foil;
            add(&engine, card)
        }
        Command::Remove { card_id, amount } => remove(&engine, card_id, amount),
        Command::CreateDeck { name, state } => create_deck(&engine, &name, &state),
    };

    match outcome {
        Err(Error::Cancelled) => {
            println!("cancelled, nothing changed");
            Ok(())
        }
        other => Ok(other?),
    }
}

fn import(
    engine: &Engine<SqliteStore>,
    file: &std::path::Path,
    scryfall_url: Option<&str>,
) -> Result<(), Error> {
    let resolver = ScryfallResolver::new(scryfall_url)?;
    let prompter = TerminalPrompter::new();

    match engine.import().run(file, &resolver, &prompter)? {
        Some(report) => {
            println!(
                "applied: {} created, {} counts updated, {} metadata updated",
                report.created, report.counts_updated, report.ids_updated
            );
            if report.removed_from_decks + report.moved_to_wishlist + report.moved_to_owned > 0 {
                println!(
                    "decks: {} removals, {} to wishlist, {} to owned",
                    report.removed_from_decks, report.moved_to_wishlist, report.moved_to_owned
                );
            }
            for failure in &report.failures {
                eprintln!("failed: {}: {}", failure.operation, failure.error);
            }
        }
        None => println!("nothing to do"),
    }
    Ok(())
}

fn dedupe(engine: &Engine<SqliteStore>, dry_run: bool) -> Result<(), Error> {
    let plan = engine.maintenance().plan()?;
    if plan.is_empty() {
        println!("no duplicate rows");
        return Ok(());
    }

    for merge in &plan.merges {
        println!(
            "{}: {} stale rows into #{}{}",
            merge.name,
            merge.delete_ids.len(),
            merge.canonical_id,
            match merge.new_count {
                Some(count) => format!(", count -> {count}"),
                None => String::new(),
            }
        );
    }

    if dry_run {
        return Ok(());
    }

    let report = engine.maintenance().merge(&plan)?;
    println!(
        "merged {} groups, deleted {} rows, retargeted {} usages",
        report.groups_merged, report.cards_deleted, report.usages_retargeted
    );
    for failure in &report.failures {
        eprintln!("failed: {}: {}", failure.operation, failure.error);
    }
    Ok(())
}

fn decks(engine: &Engine<SqliteStore>) -> Result<(), Error> {
    let decks = engine.store().decks()?;
    let entries = engine.store().all_cards()?;

    for deck in decks {
        let (owned, wishlisted) = entries
            .iter()
            .flat_map(|e| &e.usages)
            .filter(|u| u.deck_id == deck.id)
            .fold((0, 0), |(o, w), u| (o + u.count, w + u.wishlist_count));
        println!(
            "#{} {} [{}]: {} owned, {} wishlisted",
            deck.id, deck.name, deck.state, owned, wishlisted
        );
    }
    Ok(())
}

fn cards(engine: &Engine<SqliteStore>) -> Result<(), Error> {
    let states = InUseStates::default();
    for entry in engine.store().all_cards()? {
        let id = entry.card.id.unwrap_or_default();
        println!(
            "#{} {} x{} ({} in use, {} free)",
            id,
            entry.card.display_name(),
            entry.card.count,
            entry.in_use(&states),
            entry.free(&states)
        );
    }
    Ok(())
}

fn add(engine: &Engine<SqliteStore>, card: Card) -> Result<(), Error> {
    match engine.inventory().add(card)? {
        cardbox_engine::AddOutcome::Created { card_id } => println!("created #{card_id}"),
        cardbox_engine::AddOutcome::Incremented { card_id, new_count } => {
            println!("#{card_id} now x{new_count}")
        }
    }
    Ok(())
}

fn remove(engine: &Engine<SqliteStore>, card_id: i64, amount: u32) -> Result<(), Error> {
    let prompter = TerminalPrompter::new();
    let outcome = engine.inventory().remove_copies(card_id, amount, &prompter)?;

    println!("#{card_id} now x{}", outcome.new_count);
    if outcome.deletable {
        let delete = prompter.confirm("row is at zero with no deck usages; delete it?")?;
        if delete {
            engine.store().delete_card(card_id)?;
            println!("deleted #{card_id}");
        }
    }
    Ok(())
}

fn create_deck(engine: &Engine<SqliteStore>, name: &str, state: &str) -> Result<(), Error> {
    let state = DeckState::parse(state)
        .ok_or_else(|| Error::Conflict(format!("unknown deck state '{state}'")))?;
    let deck = engine.store().create_deck(name, state)?;
    println!("created deck #{} {}", deck.id, deck.name);
    Ok(())
}
