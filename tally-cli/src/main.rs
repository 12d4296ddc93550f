use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use tally_core::Direction;
use tally_finance::{Statement, Workbench};

mod categories_cmd;
mod config;
mod logging;
mod render;
mod review;
mod state;

use categories_cmd::CategoriesCommand;
use config::Config;
use render::Style;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Categorize bank statement spending with keywords learned from your corrections"
)]
struct Cli {
    /// Category store file (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "tally_core=info"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a statement and fix categories interactively
    Review {
        #[arg(long)]
        csv: PathBuf,
    },

    /// Load a statement, categorize it, and print every row
    Categorize {
        #[arg(long)]
        csv: PathBuf,

        /// Print the batch as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Per-category totals for one side of a statement
    Summary {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long, value_enum, default_value_t = DirectionArg::Debit)]
        direction: DirectionArg,
    },

    /// Manage categories and keywords
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },

    /// Write ~/.tally/config.toml with defaults
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Debit,
    Credit,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Debit => Direction::Debit,
            DirectionArg::Credit => Direction::Credit,
        }
    }
}

fn main() -> Result<()> {
    let Cli {
        store,
        config: config_flag,
        log_level,
        command,
    } = Cli::parse();

    let cfg = config::resolve_config(config_flag.as_deref(), state::default_config_path)?;
    logging::setup_logging(log_level.as_deref(), &cfg.logging.level);
    let style = Style::from(&cfg.display);

    match command {
        Command::Review { csv } => {
            let mut wb = open_workbench(store, &cfg)?;
            let mut stmt = load(&mut wb, &csv)?;
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            review::run_review(&mut wb, &mut stmt, &style, stdin.lock(), &mut stdout)?;
            print!("{}", render::summary(&stmt.summary(Direction::Debit), &style));
        }

        Command::Categorize { csv, json } => {
            let mut wb = open_workbench(store, &cfg)?;
            let stmt = load(&mut wb, &csv)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&stmt.transactions).context("serialize batch")?
                );
            } else {
                println!("## Expenses (Debit)\n");
                println!("{}", render::transactions(stmt.rows(Direction::Debit), &style));
                println!("## Payments (Credit)\n");
                println!("{}", render::transactions(stmt.rows(Direction::Credit), &style));
            }
        }

        Command::Summary { csv, direction } => {
            let mut wb = open_workbench(store, &cfg)?;
            let stmt = load(&mut wb, &csv)?;
            let direction = Direction::from(direction);
            println!("## {direction} totals\n");
            print!("{}", render::summary(&wb.summary(&stmt.transactions, direction), &style));
        }

        Command::Categories { command } => {
            let mut wb = open_workbench(store, &cfg)?;
            categories_cmd::run(&mut wb, command)?;
        }

        Command::InitConfig => {
            let path = match config_flag {
                Some(p) => p,
                None => state::default_config_path()?,
            };
            let store = match store {
                Some(p) => p,
                None => state::default_store_path()?,
            };
            config::init_config(&path, store)?;
        }
    }

    Ok(())
}

/// `--store` wins over the config file; only the fallback needs `HOME`.
fn open_workbench(store: Option<PathBuf>, cfg: &Config) -> Result<Workbench> {
    let path = match store {
        Some(p) => p,
        None => cfg.store_path()?,
    };
    tracing::debug!("using category store {}", path.display());
    Ok(Workbench::open(path))
}

/// Load and categorize, reporting what the batch taught the store.
fn load(wb: &mut Workbench, csv: &Path) -> Result<Statement> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }

    let stmt = wb
        .load_and_categorize(csv)
        .with_context(|| format!("error loading {}", csv.display()))?;

    if stmt.is_empty() {
        eprintln!("No transactions in {}", csv.display());
    } else {
        let open = stmt.transactions.iter().filter(|t| t.is_uncategorized()).count();
        eprintln!(
            "Loaded {} transactions from {} ({open} uncategorized)",
            stmt.len(),
            csv.display()
        );
    }
    if !stmt.learned.is_empty() {
        eprintln!("Learned {} new keyword(s)", stmt.learned.len());
    }
    if let Some(e) = &stmt.save_error {
        eprintln!("warning: learned keywords were not saved: {e}");
    }
    Ok(stmt)
}
