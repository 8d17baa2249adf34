pub mod browse;
pub mod config;
pub mod export;
pub mod load;
pub mod report;
pub mod saved;
pub mod status;

use clap::{Args, Parser, Subcommand};

use tencents::error::{Result, TenCentsError};
use tencents::models::{parse_date, DateRange, Filters, KindFilter};
use tencents::settings::Settings;

#[derive(Parser)]
#[command(
    name = "tencents",
    version,
    about = "See where the money went: category and note breakdowns of transaction exports."
)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a CSV export, replacing the saved transactions.
    Load {
        /// Path to the .csv file
        file: String,
    },
    /// Print the category breakdown of the saved transactions.
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        /// Show the notes under this category (repeatable)
        #[arg(long)]
        expand: Vec<String>,
        /// Show the notes under every category that has them
        #[arg(long, conflicts_with = "expand")]
        expand_all: bool,
    },
    /// Explore the breakdown interactively.
    Browse {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List saved transactions, optionally searching names and notes.
    Saved {
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete one saved transaction by its index in `saved`.
    Delete { index: usize },
    /// Delete every saved transaction.
    Clear {
        /// Skip the safety refusal
        #[arg(long)]
        yes: bool,
    },
    /// Write saved transactions to a CSV file.
    Export {
        /// Output path (default: <data_dir>/exports/saved-expenses.csv)
        #[arg(long, short)]
        output: Option<String>,
    },
    /// Show settings, database location, and the last load.
    Status,
    /// Show settings, or change them with --set key=value.
    Config {
        #[arg(long)]
        set: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// expense, income, or all (default from settings)
    #[arg(long)]
    pub kind: Option<String>,
}

impl FilterArgs {
    pub fn to_filters(&self, settings: &Settings) -> Result<Filters> {
        for bound in [&self.from_date, &self.to_date].into_iter().flatten() {
            if parse_date(bound).is_none() {
                return Err(TenCentsError::Other(format!("Invalid date '{bound}'")));
            }
        }
        let kind = match &self.kind {
            Some(k) => k.parse::<KindFilter>()?,
            None => settings.kind_filter(),
        };
        Ok(Filters {
            range: DateRange::new(self.from_date.clone(), self.to_date.clone()),
            kind,
        })
    }
}
