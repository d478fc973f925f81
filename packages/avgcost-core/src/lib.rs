//! Avgcost Core - Fee-aware average cost calculator.
//!
//! This crate answers "what happens to my average cost if I buy more?":
//!
//! - **Engine**: invest a cash amount, buy a number of shares, or solve for the
//!   purchase that reaches a target average, all with optional fees
//! - **Ledger**: append-only scenario history with display-formatted CSV export
//! - **Store**: best-effort JSON persistence of the ledger and form inputs
//!
//! # Example
//!
//! ```rust
//! use avgcost_core::{compute_target_average, FeeModel, Position, TargetOutcome};
//!
//! let position = Position::new(10.0, 5.0);
//! let outcome = compute_target_average(&position, 4.0, &FeeModel::zero(), 4.5).unwrap();
//!
//! match outcome {
//!     TargetOutcome::Reached { required_notional, result } => {
//!         println!("Invest ${required_notional:.2} for a new average of {}", result.new_average);
//!     }
//!     TargetOutcome::RequiresSale { .. } => println!("You would need to sell"),
//!     TargetOutcome::Impractical => println!("Target is out of reach at this price"),
//! }
//! ```

pub mod config;
pub mod engine;
pub mod form;
pub mod format;
pub mod input;
pub mod ledger;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, CalcResult, Calculation, FeeModel, Position, ScenarioInputs, TargetOutcome,
    TradeMode, TradeSpec,
};

// Re-export main functionality
pub use config::Config;
pub use engine::{compute, compute_invest, compute_shares, compute_target_average, cost, CalcError};
pub use form::FormState;
pub use format::{format_currency, format_shares, PLACEHOLDER};
pub use input::{parse_decimal, parse_fee_model};
pub use ledger::{
    append_scenario, clear_ledger, csv_document, export_csv, export_file_name, ExportRow,
    ScenarioLedger, ScenarioRecord, ScenarioStatus,
};
pub use store::StateStore;

/// Error types for avgcost-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Missing value: {0}")]
    MissingField(String),

    #[error("Invalid calculation: {0}")]
    Calc(#[from] CalcError),
}

/// Result type for avgcost-core operations.
pub type Result<T> = std::result::Result<T, Error>;
