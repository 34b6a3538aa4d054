//! Aggregate reports over the ledger, as JSON or as a CSV download.

mod aggregation;
mod export;
pub(crate) mod endpoints;

pub use aggregation::{MonthlySummary, Report, Totals};
pub use endpoints::{export_report_endpoint, get_report_endpoint};
