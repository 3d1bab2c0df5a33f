//! `cmsrep`: price decompounded CMS claims by static replication.
//!
//! # Commands
//!
//! - `cmsrep price` prices cells of the SABR / discount / swap-rate tables
//! - `cmsrep quote` prices one cell given explicit market inputs

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cms_replication::marketdata::CsvMarketData;
use cms_replication::pricing::{price_cell, price_snapshot};
use cms_replication::pricingengines::{CmsReplicationEngine, MarketSnapshot, Scenario};
use cms_replication::report::{render_table, ScenarioReport};
use cms_replication::settings::load_config;

/// CMS static replication against SABR-priced IRR-settled swaptions
#[derive(Parser)]
#[command(name = "cmsrep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Replication settings (TOML); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price cells of the market data tables
    Price {
        /// SABR table: Expiry,Tenor,Alpha,Rho,Nu
        #[arg(long)]
        sabr: PathBuf,

        /// Discount table: Tenor,OIS Discount Factor
        #[arg(long)]
        discount: PathBuf,

        /// Forward swap rate table: Expiry,Tenor,Swap_Rate
        #[arg(long)]
        swap_rates: PathBuf,

        /// Option expiry, e.g. 5Y; every SABR cell when omitted
        #[arg(long, requires = "tenor")]
        expiry: Option<String>,

        /// Swap tenor, e.g. 10Y
        #[arg(long, requires = "expiry")]
        tenor: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Price a single cell from explicit inputs
    Quote {
        /// Forward swap rate F
        #[arg(long)]
        forward: f64,

        /// Discount factor D to the payment date
        #[arg(long)]
        discount: f64,

        /// SABR alpha
        #[arg(long)]
        alpha: f64,

        /// SABR rho
        #[arg(long, allow_hyphen_values = true)]
        rho: f64,

        /// SABR nu
        #[arg(long)]
        nu: f64,

        /// Option expiry in years
        #[arg(long)]
        expiry_years: f64,

        /// Swap tenor in years
        #[arg(long)]
        tenor_years: f64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Which claim to price
    #[arg(long, value_enum, default_value_t = ScenarioArg::Both)]
    scenario: ScenarioArg,

    /// Exercise threshold L of the capped claim; the payoff's zero strike
    /// when omitted
    #[arg(long)]
    threshold: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScenarioArg {
    Unconditional,
    Capped,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl OutputArgs {
    fn scenarios(&self) -> Vec<Scenario> {
        let capped = Scenario::Capped {
            threshold: self.threshold,
        };
        match self.scenario {
            ScenarioArg::Unconditional => vec![Scenario::Unconditional],
            ScenarioArg::Capped => vec![capped],
            ScenarioArg::Both => vec![Scenario::Unconditional, capped],
        }
    }

    fn emit(&self, reports: &[ScenarioReport]) -> Result<()> {
        match self.format {
            OutputFormat::Table => print!("{}", render_table(reports)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reports)?),
        }
        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let engine = CmsReplicationEngine::new(config).context("invalid replication settings")?;

    match cli.command {
        Commands::Price {
            sabr,
            discount,
            swap_rates,
            expiry,
            tenor,
            output,
        } => {
            let data = CsvMarketData::from_paths(&sabr, &discount, &swap_rates)?;
            let cells = match (expiry, tenor) {
                (Some(e), Some(t)) => vec![(e, t)],
                _ => data.cells(),
            };
            if cells.is_empty() {
                bail!("{} holds no SABR quotes", sabr.display());
            }
            info!(cells = cells.len(), "pricing from tables");
            let scenarios = output.scenarios();
            let mut reports = Vec::new();
            for (e, t) in &cells {
                reports.extend(price_cell(&engine, &data, e, t, &scenarios)?);
            }
            output.emit(&reports)
        }
        Commands::Quote {
            forward,
            discount,
            alpha,
            rho,
            nu,
            expiry_years,
            tenor_years,
            output,
        } => {
            let config = engine.config();
            let snapshot =
                MarketSnapshot::new(discount, forward, expiry_years, config.frequency, tenor_years)?;
            let params = config.sabr_parameters(alpha, rho, nu)?;
            let reports = price_snapshot(
                &engine,
                &snapshot,
                &params,
                &format!("{expiry_years}Y"),
                &format!("{tenor_years}Y"),
                &output.scenarios(),
            )?;
            output.emit(&reports)
        }
    }
}
