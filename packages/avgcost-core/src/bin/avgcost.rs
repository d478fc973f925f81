//! Avgcost CLI - Command line interface for the average cost calculator.
//!
//! Prints JSON responses on stdout; logs go to stderr.

use anyhow::Result;
use avgcost_core::{
    csv_document, export_file_name,
    format::{format_currency, format_shares, target_summary},
    ApiResponse, Calculation, Config, FormState, ScenarioRecord, StateStore,
    TradeMode,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "avgcost")]
#[command(about = "Average cost calculator - size a purchase and see the new average")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invest a cash amount (fees excluded)
    Invest {
        #[command(flatten)]
        position: PositionArgs,
        /// Cash to invest
        #[arg(short = 'm', long)]
        amount: String,
    },
    /// Buy a number of shares
    Shares {
        #[command(flatten)]
        position: PositionArgs,
        /// Shares to buy
        #[arg(short, long)]
        quantity: String,
    },
    /// Solve for the purchase that reaches a target average
    Target {
        #[command(flatten)]
        position: PositionArgs,
        /// Desired average cost
        #[arg(short, long)]
        target: String,
    },
    /// Re-run the last calculation
    Last {
        /// Append the scenario to the log
        #[arg(long)]
        log: bool,
    },
    /// Clear the saved form, keeping the selected mode
    Reset,
    /// Scenario log commands
    Log {
        #[command(subcommand)]
        action: LogAction,
    },
}

#[derive(Args)]
struct PositionArgs {
    /// Shares currently held
    #[arg(short = 'n', long)]
    shares: String,
    /// Current average cost per share
    #[arg(short, long)]
    avg: String,
    /// Price per share for the new purchase
    #[arg(short, long)]
    price: String,
    /// Fixed fee per trade (defaults to config)
    #[arg(long)]
    fixed_fee: Option<String>,
    /// Fee percentage, e.g. 0.25 for 0.25% (defaults to config)
    #[arg(long)]
    fee_pct: Option<String>,
    /// Append the scenario to the log
    #[arg(long)]
    log: bool,
}

#[derive(Subcommand)]
enum LogAction {
    /// List saved scenarios, newest first
    List,
    /// Delete every saved scenario
    Clear {
        /// Confirm the deletion; it cannot be undone
        #[arg(long)]
        yes: bool,
    },
    /// Export saved scenarios as CSV
    Export {
        /// Output file (defaults to avg-price-scenarios-<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let store = StateStore::from_config(&config);

    let output = match cli.command {
        Commands::Invest { position, amount } => {
            let log = position.log;
            let mut form = position.into_form(&config, TradeMode::Invest);
            form.invest_amount = amount;
            handle_calculation(&store, form, log)
        }
        Commands::Shares { position, quantity } => {
            let log = position.log;
            let mut form = position.into_form(&config, TradeMode::Shares);
            form.add_shares = quantity;
            handle_calculation(&store, form, log)
        }
        Commands::Target { position, target } => {
            let log = position.log;
            let mut form = position.into_form(&config, TradeMode::Target);
            form.target_avg = target;
            handle_calculation(&store, form, log)
        }
        Commands::Last { log } => handle_calculation(&store, store.load_form(), log),
        Commands::Reset => handle_reset(&store),
        Commands::Log { action } => handle_log(&store, action),
    };

    println!("{}", output);
    Ok(())
}

impl PositionArgs {
    fn into_form(self, config: &Config, mode: TradeMode) -> FormState {
        let defaults = config.default_fees();
        FormState {
            current_shares: self.shares,
            current_avg: self.avg,
            price: self.price,
            mode,
            fee_fixed: self
                .fixed_fee
                .unwrap_or_else(|| defaults.fixed_fee.to_string()),
            fee_pct: self
                .fee_pct
                .unwrap_or_else(|| defaults.pct_fee_percent().to_string()),
            ..FormState::default()
        }
    }
}

fn respond<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!(r#"{{"ok":false,"error":"{}"}}"#, e))
}

fn error(message: impl Into<String>) -> String {
    respond(&ApiResponse::<()>::err(message))
}

fn handle_calculation(store: &StateStore, form: FormState, log: bool) -> String {
    if let Err(e) = store.save_form(&form) {
        tracing::warn!(error = %e, "could not save form state");
    }

    let inputs = match form.parse() {
        Ok(inputs) => inputs,
        Err(e) => return error(e.to_string()),
    };
    let calculation = match inputs.compute() {
        Ok(calculation) => calculation,
        Err(e) => return error(e.to_string()),
    };

    let summary = match &calculation {
        Calculation::Target(outcome) => target_summary(outcome, inputs.price, &inputs.fees),
        Calculation::Invest(result) | Calculation::Shares(result) => format!(
            "New average {} on {} shares (total cost {}).",
            format_currency(result.new_average),
            format_shares(result.total_shares),
            format_currency(result.total_cost),
        ),
    };

    let mut logged = false;
    if log {
        let mut ledger = store.load_ledger();
        logged = ledger.append(ScenarioRecord::now(inputs));
        if logged {
            if let Err(e) = store.save_ledger(&ledger) {
                return error(e.to_string());
            }
        }
    }

    respond(&ApiResponse::ok(json!({
        "inputs": inputs,
        "calculation": calculation,
        "summary": summary,
        "logged": logged,
    })))
}

fn handle_reset(store: &StateStore) -> String {
    let mut form = store.load_form();
    form.reset();
    match store.save_form(&form) {
        Ok(()) => respond(&ApiResponse::ok(json!({ "form": form }))),
        Err(e) => error(e.to_string()),
    }
}

fn handle_log(store: &StateStore, action: LogAction) -> String {
    let mut ledger = store.load_ledger();

    match action {
        LogAction::List => {
            let scenarios: Vec<_> = ledger.records().collect();
            respond(&ApiResponse::ok(json!({
                "count": ledger.len(),
                "scenarios": scenarios,
            })))
        }
        LogAction::Clear { yes } => {
            if !yes {
                return error(format!(
                    "Refusing to clear {} saved scenarios without --yes. This cannot be undone.",
                    ledger.len()
                ));
            }
            let removed = ledger.clear();
            if let Err(e) = store.save_ledger(&ledger) {
                return error(e.to_string());
            }
            respond(&ApiResponse::ok(json!({ "removed": removed })))
        }
        LogAction::Export { output } => {
            if ledger.is_empty() {
                return error("No saved scenarios to export");
            }
            let path =
                output.unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now().date_naive())));
            let document = csv_document(&ledger.to_export_rows());
            match fs::write(&path, document) {
                Ok(()) => respond(&ApiResponse::ok(json!({
                    "path": path,
                    "rows": ledger.len(),
                }))),
                Err(e) => error(format!("Failed to write {}: {}", path.display(), e)),
            }
        }
    }
}
