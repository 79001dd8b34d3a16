//! Per-kind builders turning back-office records into exchange payloads.
//!
//! Every builder takes a sequence and returns a sequence; a single record
//! is just a one-element slice.

pub mod contracts;
pub mod devices;
pub mod metering_points;
pub mod partners;
pub mod readings;

pub use contracts::assemble_contracts;
pub use devices::assemble_devices;
pub use metering_points::assemble_metering_points;
pub use partners::{assemble_partners, CompanyPrefixes};
pub use readings::assemble_readings;

use serde_json::Value;

use crate::transform::prune;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Absent values are stripped, as the exchange format expects.
    #[default]
    Pruned,
    /// Payloads are returned exactly as assembled, nulls included.
    Raw,
}

#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    pub mode: OutputMode,
    /// Export this contractual version instead of each contract's active one.
    pub contract_version: Option<i64>,
    /// Use this address instead of each partner's first address on file.
    pub partner_address: Option<i64>,
}

fn finish(payload: Value, mode: OutputMode) -> Value {
    match mode {
        OutputMode::Pruned => prune(&payload),
        OutputMode::Raw => payload,
    }
}

fn record_assembled(kind: &'static str, count: usize) {
    metrics::counter!("amon_payloads_assembled_total", "kind" => kind).increment(count as u64);
}
