use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gamba_ledger::{rank_cached, valuate_cached, CostModel, RankBy, RankOrder};
use gamba_models::{AggregateTotals, GambaConfig, Session};
use gamba_prices::{Clock, SystemClock};
use gamba_store::StoreError;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gamba",
    about = "Gamble session ledger - records sessions and reports totals and leaderboards"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/gamba.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a gamble session and print its value
    Record {
        #[arg(long)]
        user: String,
        /// Number of hands played this session
        #[arg(long)]
        hands: u64,
        /// Raw gold won
        #[arg(long, default_value_t = 0)]
        gold: u64,
        /// Ectos won
        #[arg(long, default_value_t = 0)]
        ectos: u64,
        /// Runes won
        #[arg(long, default_value_t = 0)]
        runes: u64,
    },
    /// Totals for one user, or for the whole ledger
    Stats {
        #[arg(long)]
        user: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Ranked list of users by gamble value
    Leaderboard {
        #[arg(long, value_enum, default_value = "net")]
        by: ByArg,

        #[arg(long, value_enum, default_value = "descending")]
        order: OrderArg,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// A user's latest sessions, newest first
    Recent {
        #[arg(long)]
        user: String,

        #[arg(long, default_value_t = 5)]
        limit: u64,
    },
    /// Delete a user's most recent session
    Undo {
        #[arg(long)]
        user: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ByArg {
    Net,
    Average,
}

impl From<ByArg> for RankBy {
    fn from(by: ByArg) -> Self {
        match by {
            ByArg::Net => RankBy::Net,
            ByArg::Average => RankBy::Average,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Descending,
    Ascending,
}

impl From<OrderArg> for RankOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Descending => RankOrder::Descending,
            OrderArg::Ascending => RankOrder::Ascending,
        }
    }
}

fn load_config(path: &str) -> Result<GambaConfig> {
    match std::fs::read_to_string(path) {
        Ok(config_str) => {
            toml::from_str(&config_str).with_context(|| format!("Failed to parse config: {path}"))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path, "Config file not found, using defaults");
            Ok(GambaConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read config: {path}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let cost = CostModel::from(&config.costs);

    match cli.command {
        Command::Record {
            user,
            hands,
            gold,
            ectos,
            runes,
        } => {
            let store = gamba::open_store(&config)
                .with_context(|| format!("Failed to open store: {}", config.store.sqlite_path))?;
            let session = Session {
                user,
                hands,
                gold,
                ectoplasm: ectos,
                runes,
                recorded_at: SystemClock.now(),
            };
            store.append(&session).context("Failed to record session")?;

            let cache = gamba::build_price_cache(&config)?;
            let totals = AggregateTotals::from(session);
            let valuation = valuate_cached(&totals, &cache, &cost).await?;
            let (net, average) = valuation.rounded();
            println!(
                "Recorded {} hands for {}: net {} gold ({} per hand)",
                totals.hands, totals.user, net, average
            );
        }

        Command::Stats { user, json } => {
            let store = gamba::open_store(&config)
                .with_context(|| format!("Failed to open store: {}", config.store.sqlite_path))?;
            let totals = match &user {
                Some(u) => store.sum_for_user(u)?,
                None => store.sum_all()?,
            };
            let Some(totals) = totals else {
                println!(
                    "No sessions recorded for {} yet",
                    user.as_deref().unwrap_or("anyone")
                );
                return Ok(());
            };

            let cache = gamba::build_price_cache(&config)?;
            let valuation = valuate_cached(&totals, &cache, &cost).await?;
            if json {
                let output = serde_json::json!({
                    "totals": totals,
                    "valuation": valuation,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let (net, average) = valuation.rounded();
                println!(
                    "{}: {} hands, {} gold, {} ectos, {} runes",
                    totals.user, totals.hands, totals.gold, totals.ectoplasm, totals.runes
                );
                println!(
                    "net {} gold ({} per hand), last played {}",
                    net, average, totals.last_recorded_at
                );
            }
        }

        Command::Leaderboard {
            by,
            order,
            limit,
            json,
        } => {
            let store = gamba::open_store(&config)
                .with_context(|| format!("Failed to open store: {}", config.store.sqlite_path))?;
            let grouped = store.sum_grouped_by_user()?;
            if grouped.is_empty() {
                println!("No sessions recorded yet");
                return Ok(());
            }

            let cache = gamba::build_price_cache(&config)?;
            let ranked = rank_cached(&grouped, &cache, &cost, by.into(), order.into(), limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                for (i, entry) in ranked.iter().enumerate() {
                    let (net, average) = entry.valuation.rounded();
                    println!(
                        "{}. {}: net {} gold ({} per hand over {} hands)",
                        i + 1,
                        entry.totals.user,
                        net,
                        average,
                        entry.totals.hands
                    );
                }
            }
        }

        Command::Recent { user, limit } => {
            let store = gamba::open_store(&config)
                .with_context(|| format!("Failed to open store: {}", config.store.sqlite_path))?;
            let sessions = store.recent_for_user(&user, limit)?;
            if sessions.is_empty() {
                println!("No sessions recorded for {user} yet");
                return Ok(());
            }
            for session in sessions {
                println!(
                    "{} - {} hands: {} gold, {} ectos, {} runes",
                    session.recorded_at,
                    session.hands,
                    session.gold,
                    session.ectoplasm,
                    session.runes
                );
            }
        }

        Command::Undo { user } => {
            let mut store = gamba::open_store(&config)
                .with_context(|| format!("Failed to open store: {}", config.store.sqlite_path))?;
            match store.delete_most_recent_for_user(&user) {
                Ok(removed) => println!(
                    "Removed session from {}: {} hands, {} gold, {} ectos, {} runes",
                    removed.recorded_at,
                    removed.hands,
                    removed.gold,
                    removed.ectoplasm,
                    removed.runes
                ),
                Err(StoreError::NothingToDelete(_)) => {
                    println!("No sessions recorded for {user}");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
