//! LOGSCOPE CLI
//!
//! Command-line playground for the LOGSCOPE expiring cache.

mod repl;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logscope_cache::{spawn_sweeper, CacheConfig, ExpiringCache, ManualClock};

use crate::repl::ReplCommand;

/// LOGSCOPE - expiring cache playground
#[derive(Parser)]
#[command(name = "logscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Entry lifetime in seconds (overrides config and environment)
    #[arg(long, global = true)]
    ttl: Option<f64>,

    /// JSON config file (otherwise read from the environment)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read cache commands from stdin, one per line
    Repl,

    /// Fill a cache, let it expire on a simulated clock, and print its statistics
    StatsDemo {
        /// Number of keys to write
        #[arg(short = 'n', long, default_value = "1000")]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "logscope=debug,info"
    } else {
        "logscope=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config.as_deref(), cli.ttl)?;

    match cli.command {
        Commands::Repl => cmd_repl(&config).await,
        Commands::StatsDemo { count } => cmd_stats_demo(&config, count),
    }
}

/// Resolves config from a file or the environment, then applies `--ttl`.
fn load_config(path: Option<&Path>, ttl: Option<f64>) -> Result<CacheConfig> {
    let mut config = match path {
        Some(path) => CacheConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CacheConfig::from_env().context("Invalid cache configuration in environment")?,
    };

    if let Some(ttl) = ttl {
        config.ttl_seconds = ttl;
        config.validate().context("Invalid --ttl")?;
    }

    info!(ttl_seconds = config.ttl_seconds, sweep = ?config.sweep_interval_seconds, "cache configured");
    Ok(config)
}

/// Interactive (or piped) cache session
async fn cmd_repl(config: &CacheConfig) -> Result<()> {
    let cache = Arc::new(ExpiringCache::<String>::with_config(config)?);

    let sweeper = match config.sweep_interval() {
        Some(period) => Some(spawn_sweeper(Arc::clone(&cache), period)?),
        None => None,
    };

    eprintln!(
        "{} ttl={:?}, type `help` for commands",
        "🗄️  logscope cache".cyan().bold(),
        cache.ttl()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ReplCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{} {e}", "error:".red());
                continue;
            }
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Sleep(d) => tokio::time::sleep(d).await,
            _ => {}
        }

        match command.execute(cache.as_ref()) {
            Ok(out) if out == "(nil)" => println!("{}", out.dimmed()),
            Ok(out) => println!("{out}"),
            Err(e) => println!("{} {e:#}", "error:".red()),
        }
    }

    if let Some(sweeper) = sweeper {
        sweeper.shutdown().await;
    }
    Ok(())
}

/// Simulated expiry run
fn cmd_stats_demo(config: &CacheConfig, count: usize) -> Result<()> {
    println!("{} {} keys", "📊 Filling cache with".cyan().bold(), count);

    let ttl = config.ttl()?;
    let clock = ManualClock::new();
    let cache = ExpiringCache::with_clock(ttl, clock.clone())?;

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );
    for i in 0..count {
        cache.set(format!("session:{i}"), i);
        pb.inc(1);
    }
    pb.finish();

    // Read every other key while fresh.
    for i in (0..count).step_by(2) {
        cache.get(&format!("session:{i}"));
    }

    println!("\n{} {:?}", "⏩ Advancing simulated clock by".dimmed(), ttl);
    clock.advance(ttl + Duration::from_millis(1));

    // Touch a tenth of the keys, evicting them on read.
    for i in (0..count).step_by(10) {
        cache.get(&format!("session:{i}"));
    }
    let latent = cache.len();
    let purged = cache.purge_expired();

    println!("   ✓ {} expired entries were still allocated", latent);
    println!("   ✓ purge removed {}", purged);
    println!("\n{}", "📈 Stats:".green().bold());
    println!("{}", serde_json::to_string_pretty(&cache.stats())?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ttl_flag_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ttl_seconds": 60, "sweep_interval_seconds": 5 }}"#).unwrap();

        let config = load_config(Some(file.path()), Some(2.0)).unwrap();
        assert_eq!(config.ttl().unwrap(), Duration::from_secs(2));
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(5)));

        assert!(load_config(Some(file.path()), Some(0.0)).is_err());
    }

    #[test]
    fn test_huge_ttl_flag_builds_usable_cache() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ttl_seconds": 60 }}"#).unwrap();

        let config = load_config(Some(file.path()), Some(1e19)).unwrap();
        let cache = ExpiringCache::<String>::with_config(&config).unwrap();
        cache.set("k", "v".to_string());
        assert_eq!(cache.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["logscope", "--ttl", "1.5", "stats-demo", "-n", "10"]).unwrap();
        assert_eq!(cli.ttl, Some(1.5));
        assert!(matches!(cli.command, Commands::StatsDemo { count: 10 }));
    }
}
