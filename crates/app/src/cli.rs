use clap::{Parser, Subcommand};
use horizon_core::common::{Symbol, Timeframe};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "horizon")]
#[command(about = "Horizon stock dashboard: price history and symbol comparison charts", long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults to ./horizon.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a close-price chart as Chart.js JSON on stdout
    Chart {
        /// Ticker to chart; restores the most recent search when omitted
        ticker: Option<Symbol>,
        /// Lookback window: 1m, 3m, 6m, 1y or 2y
        #[arg(short, long)]
        timeframe: Option<Timeframe>,
        /// Extra symbols to compare against the ticker
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        compare: Vec<Symbol>,
    },
    /// Search active stock tickers by name or symbol
    Search {
        query: String,
    },
    /// Show the most recent search if it is still fresh
    Last {
        /// Forget the stored search instead of showing it
        #[arg(long)]
        clear: bool,
    },
}
