//! Wordle Server - CLI
//!
//! Runs the multi-player telnet server, or inspects a player's stored results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use wordle_server::{
    config::{
        DEFAULT_DB_PATH, DEFAULT_DIFFICULTY, DEFAULT_HOST, DEFAULT_PORT, ServerConfig,
        StoreConfig, WordList, WordSourceConfig, parse_difficulty,
    },
    output::print_player_stats,
    results::{ResultStore, SledResultStore},
    session::{Identifier, IdentitySeed, SessionDirectory},
    transport::TelnetServer,
    words::DEFAULT_API_BASE,
};

#[derive(Parser)]
#[command(
    name = "wordle_server",
    about = "Multi-player Wordle for remote terminals",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Accept telnet clients and serve games (default)
    Serve(ServeArgs),

    /// Print a player's stored results
    Stats {
        /// Results database directory
        #[arg(long, default_value = DEFAULT_DB_PATH)]
        db: PathBuf,

        /// Player identifier (64 hex digits)
        #[arg(long, conflicts_with = "seed")]
        identifier: Option<String>,

        /// Player name to derive the identifier from
        #[arg(long)]
        seed: Option<String>,

        /// Word length the histogram is laid out for
        #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY, value_parser = parse_difficulty)]
        difficulty: usize,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Use the remote word API instead of the built-in lists
    #[arg(long)]
    api: bool,

    /// Base URL of the word API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Query string appended to every API request, e.g. an access key
    #[arg(long, default_value = "")]
    api_auth: String,

    /// Wordlist: 'all' (default), 'answers', or path to file
    #[arg(short = 'w', long, default_value = "all")]
    wordlist: String,

    /// Secret word length; the board has one more row than this
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY, value_parser = parse_difficulty)]
    difficulty: usize,

    /// Results database directory
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Keep results in memory only
    #[arg(long)]
    memory: bool,

    /// Render without colours
    #[arg(long)]
    monochrome: bool,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api: false,
            api_base: DEFAULT_API_BASE.to_string(),
            api_auth: String::new(),
            wordlist: "all".to_string(),
            difficulty: DEFAULT_DIFFICULTY,
            db: PathBuf::from(DEFAULT_DB_PATH),
            memory: false,
            monochrome: false,
        }
    }
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        let words = if args.api {
            WordSourceConfig::Remote {
                base: args.api_base,
                auth: args.api_auth,
            }
        } else {
            WordSourceConfig::Static(WordList::parse(&args.wordlist))
        };
        let store = if args.memory {
            StoreConfig::Memory
        } else {
            StoreConfig::Sled(args.db)
        };
        Self {
            host: args.host,
            port: args.port,
            difficulty: args.difficulty,
            words,
            store,
            monochrome: args.monochrome,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Default to serving if no command given
    let command = cli.command.unwrap_or(Commands::Serve(ServeArgs::default()));

    match command {
        Commands::Serve(args) => run_serve_command(args.into()).await,
        Commands::Stats {
            db,
            identifier,
            seed,
            difficulty,
        } => run_stats_command(&db, identifier.as_deref(), seed.as_deref(), difficulty).await,
    }
}

async fn run_serve_command(config: ServerConfig) -> Result<()> {
    config.validate()?;
    let words = config.word_source().context("failed to set up word source")?;
    let store = config.result_store().context("failed to open results store")?;

    let directory = SessionDirectory::new(words, store, config.difficulty, config.theme());
    let server = TelnetServer::bind(config.bind_addr(), directory)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

    info!(
        addr = %server.local_addr()?,
        difficulty = config.difficulty,
        "wordle server listening"
    );
    server.run(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for ctrl-c; stopping");
    }
}

async fn run_stats_command(
    db: &Path,
    identifier: Option<&str>,
    seed: Option<&str>,
    difficulty: usize,
) -> Result<()> {
    let identifier = match (identifier, seed) {
        (Some(hex), _) => Identifier::from_hex(hex)
            .with_context(|| format!("'{hex}' is not a 64-digit hex identifier"))?,
        (None, Some(seed)) => IdentitySeed::fallback(seed).identifier(),
        (None, None) => bail!("pass --identifier or --seed"),
    };

    let store = SledResultStore::open(db)
        .with_context(|| format!("failed to open results store at {}", db.display()))?;
    let history = store.read_all(&identifier).await?;
    print_player_stats(&identifier, &history, difficulty + 1);
    Ok(())
}
