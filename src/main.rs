// =============================================================================
// CARDSTATS — Point d'entrée en ligne de commande
// =============================================================================
//
//   cardstats ingest AllSets.json          → reconstruit la base
//   cardstats ask "#[[type:Land,min:cmc]]" → répond à un message
//   cardstats repl                         → un message par ligne sur stdin
//
// Le mode repl tient lieu de transport de chat : chaque ligne lue est un
// message, chaque réponse est écrite sur stdout. Les journaux vont sur
// stderr.
//
// =============================================================================

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cardstats::backend::sqlite::SqliteStore;
use cardstats::config::Config;
use cardstats::engine::{Engine, EngineSettings};
use cardstats::ingest;

#[derive(Parser, Debug)]
#[command(name = "cardstats")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Fichier de configuration TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base SQLite (remplace `database` du fichier)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Avertit des clauses et termes ignorés
    #[arg(long)]
    strict: bool,

    /// Filtre de journalisation (remplace `log_level` du fichier)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruit la base à partir d'un export AllSets.json
    Ingest { export: PathBuf },
    /// Répond à un message
    Ask { message: String },
    /// Lit les messages sur stdin, un par ligne
    Repl,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    if let Some(db) = args.db {
        config.database = db;
    }
    if args.strict {
        config.strict = true;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(io::stderr)
        .init();

    match args.command {
        Command::Ingest { export } => {
            let sets = ingest::load_sets(&export)
                .with_context(|| format!("reading {}", export.display()))?;
            let mut store = SqliteStore::open(&config.database)
                .with_context(|| format!("opening {}", config.database.display()))?;
            let stats = ingest::import(&mut store, &sets).context("importing card export")?;
            info!(
                sets = stats.sets,
                skipped = stats.skipped_sets,
                printings = stats.printings,
                "ingestion terminée"
            );
        }
        Command::Ask { message } => {
            let store = open_store(&config)?;
            let engine = Engine::new(&store, EngineSettings::from(&config));
            if let Some(reply) = engine.respond(&message) {
                println!("{}", reply);
            }
        }
        Command::Repl => {
            let store = open_store(&config)?;
            let engine = Engine::new(&store, EngineSettings::from(&config));
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            for line in stdin.lock().lines() {
                let line = line.context("reading stdin")?;
                if let Some(reply) = engine.respond(&line) {
                    writeln!(stdout, "{}", reply)?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    let store = SqliteStore::open(&config.database)
        .with_context(|| format!("opening {}", config.database.display()))?;
    store.migrate().context("preparing schema")?;
    Ok(store)
}
