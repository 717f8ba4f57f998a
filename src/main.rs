//! news-similarity CLI
//!
//! ```bash
//! # fit the model from data/*.csv and publish artifacts/
//! news-similarity build
//!
//! # top 5 articles similar to article 42
//! news-similarity recommend 42 -k 5
//!
//! # keyword search
//! news-similarity search "oil prices"
//!
//! # HTTP service
//! news-similarity serve --port 8000
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use news_similarity::{
    articles::search::DEFAULT_SEARCH_LIMIT,
    config::Config,
    pipeline::{build_artifacts, Artifacts},
    server,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "news-similarity")]
#[command(about = "Recommend textually similar news articles")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artifacts directory (overrides the config file)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the vectorizer and index, then publish the artifacts
    Build {
        /// Input CSV (default: first *.csv in the data directory)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print articles similar to one article
    Recommend {
        /// Article index
        idx: usize,

        /// Number of recommendations
        #[arg(short, default_value = "3")]
        k: usize,
    },

    /// Keyword search over the article text
    Search {
        query: String,

        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Run the HTTP service
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.artifacts {
        config.artifacts_dir = dir.clone();
    }
    Ok(config)
}

fn load_artifacts(config: &Config) -> Result<Artifacts> {
    Artifacts::load(&config.artifacts_dir)
        .context("run `news-similarity build` first")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Build { input } => {
            let artifacts = build_artifacts(&config, input.as_deref())?;
            println!(
                "Built {} articles, {} terms -> {}",
                artifacts.len(),
                artifacts.vectorizer().vocab_size(),
                config.artifacts_dir.display()
            );
        }

        Commands::Recommend { idx, k } => {
            let artifacts = load_artifacts(&config)?;
            let title = artifacts.articles().title(idx).unwrap_or_default().to_string();
            let recs = artifacts.recommend(idx, k)?;
            println!("Similar to [{idx}] {title}:");
            for rec in recs {
                println!("  [{}] {} ({})", rec.idx, rec.title, rec.reason);
            }
        }

        Commands::Search { query, limit } => {
            let artifacts = load_artifacts(&config)?;
            let hits = artifacts.search(&query, limit);
            println!("{} hits for {query:?}", hits.len());
            for hit in hits {
                println!("  [{}] {}", hit.idx, hit.title);
                if !hit.description.is_empty() {
                    println!("      {}", hit.description);
                }
            }
        }

        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(&config).await?;
        }
    }

    Ok(())
}
