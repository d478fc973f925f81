//! Display projection of scenario records for export.

use super::record::ScenarioRecord;
use crate::format::{format_currency, format_fee_percent, format_shares};
use crate::types::TradeSpec;
use chrono::SecondsFormat;

/// Export columns, in output order.
pub const COLUMNS: [&str; 14] = [
    "mode",
    "currentShares",
    "currentAvg",
    "price",
    "investAmount",
    "addShares",
    "targetAvg",
    "addedShares",
    "totalShares",
    "totalCost",
    "newAvg",
    "feeFixed",
    "feePct",
    "timestamp",
];

/// An ordered mapping from column name to display text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    cells: Vec<(String, String)>,
}

impl ExportRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any existing value for the column in place.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Builder form of [`ExportRow::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExportRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl ScenarioRecord {
    /// Render the record as display text, one cell per entry of [`COLUMNS`].
    ///
    /// Amount fields belonging to other modes are blank, as are the result
    /// fields of scenarios without a resulting position.
    pub fn to_export_row(&self) -> ExportRow {
        let inputs = self.inputs();
        let (invest_amount, add_shares, target_avg) = match inputs.trade {
            TradeSpec::Invest { cash_amount } => {
                (format_currency(cash_amount), String::new(), String::new())
            }
            TradeSpec::Shares { quantity } => {
                (String::new(), format_shares(quantity), String::new())
            }
            TradeSpec::TargetAverage { target } => {
                (String::new(), String::new(), format_currency(target))
            }
        };

        let (added_shares, total_shares, total_cost, new_average) = match self.result() {
            Some(r) => (
                format_shares(r.added_shares),
                format_shares(r.total_shares),
                format_currency(r.total_cost),
                format_currency(r.new_average),
            ),
            None => Default::default(),
        };

        let values = [
            inputs.trade.mode().as_str().to_string(),
            format_shares(inputs.position.shares),
            format_currency(inputs.position.avg_cost),
            format_currency(inputs.price),
            invest_amount,
            add_shares,
            target_avg,
            added_shares,
            total_shares,
            total_cost,
            new_average,
            format_currency(inputs.fees.fixed_fee),
            format_fee_percent(inputs.fees.pct_fee),
            self.created_at().to_rfc3339_opts(SecondsFormat::Millis, true),
        ];

        COLUMNS.iter().copied().zip(values).collect()
    }
}
