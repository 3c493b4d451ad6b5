use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tcg_meta::api::state::AppState;
use tcg_meta::calculate::table::{sort_rows, ArchetypeColumn, SortState};
use tcg_meta::calculate::{archetype_summaries, RoundClassifier, Snapshot};
use tcg_meta::config::AppConfig;
use tcg_meta::storage::{load_dataset, StorageConfig};

#[derive(Parser)]
#[command(name = "tcg-meta")]
#[command(about = "Metagame statistics for a trading card game tournament")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Directory holding the JSON exports (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the archetype and metagame tables
    Summary,

    /// Validate the configuration and the exports
    Check,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(level, cli.json_logs);

    tracing::info!("Starting tcg-meta v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::from_app_config(&config);
    let classifier = RoundClassifier::from_config(&config.tournament);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let state = AppState::load(storage, classifier, config.server.cors_origin.clone())
                .context("Failed to load tournament exports")?;
            let app = tcg_meta::api::build_router(state);

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Serving API on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Summary => {
            let dataset = load_dataset(&storage).context("Failed to load tournament exports")?;
            print_summary(&Snapshot::build(dataset, classifier));
        }
        Commands::Check => {
            config.validate()?;
            println!("Config OK ({:?})", cli.config);

            let dataset = load_dataset(&storage).context("Failed to load tournament exports")?;
            let snapshot = Snapshot::build(dataset, classifier);
            print_check(&snapshot);
        }
    }

    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    let overview = snapshot.overview();
    println!("=== Tournament ({}) ===\n", overview.fingerprint);
    println!("  Players:    {}", overview.total_players);
    println!("  Archetypes: {}", overview.total_archetypes);
    println!("  Matches:    {}", overview.total_matches);
    println!("  Decklists:  {}", overview.decklists);
    println!("  Results:    {}", overview.results);

    let mut archetypes = archetype_summaries(&snapshot.dataset.analysis);
    sort_rows(&mut archetypes, &SortState::<ArchetypeColumn>::default());

    println!("\n=== Archetypes ===\n");
    println!(
        "  {:<32} {:>7} {:>9} {:>8} {:>8}",
        "Archetype", "Players", "Record", "Win %", "Game %"
    );
    for row in &archetypes {
        println!(
            "  {:<32} {:>7} {:>9} {:>7.1}% {:>7.1}%",
            row.archetype,
            row.players,
            format!("{}-{}-{}", row.wins, row.losses, row.draws),
            row.win_rate * 100.0,
            row.game_win_rate * 100.0
        );
    }

    println!("\n=== Metagame ===\n");
    println!(
        "  {:<32} {:>6} {:>7} {:>6} {:>7} {:>10}",
        "Archetype", "Day 1", "Share", "Day 2", "Share", "Conversion"
    );
    for row in snapshot.metagame() {
        println!(
            "  {:<32} {:>6} {:>6.1}% {:>6} {:>6.1}% {:>9.1}%",
            row.archetype,
            row.day1_players,
            row.day1_percentage,
            row.day2_players,
            row.day2_percentage,
            row.conversion_rate
        );
    }
}

fn print_check(snapshot: &Snapshot) {
    let dataset = &snapshot.dataset;
    println!(
        "Exports OK: {} results, {} decklists, {} archetypes ({})",
        dataset.results.len(),
        dataset.decklists.len(),
        dataset.analysis.archetype_counts.len(),
        dataset.fingerprint
    );

    let duplicates = snapshot.index.duplicates();
    if duplicates.is_empty() {
        println!("No duplicate players");
    } else {
        println!("\n{} duplicate players:", duplicates.len());
        for dup in duplicates {
            println!(
                "  {}: kept '{}' ({}), ignored '{}' ({})",
                dup.normalized,
                dup.kept.player,
                dup.kept.archetype,
                dup.ignored.player,
                dup.ignored.archetype
            );
        }
    }

    let unmatched: BTreeSet<&str> = dataset
        .results
        .iter()
        .flat_map(|m| [m.player1.as_str(), m.player2.as_str()])
        .filter(|name| snapshot.index.get(name).is_none())
        .collect();
    if unmatched.is_empty() {
        println!("Every player in the results has a decklist");
    } else {
        println!("\n{} players in the results have no decklist:", unmatched.len());
        for name in unmatched {
            println!("  {}", name);
        }
    }
}
