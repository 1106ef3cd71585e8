//! JSON Report Generator
//!
//! Full-fidelity, machine-readable rendering of a run.

use crate::error::Result;
use apexscan_scanner::RunResult;

/// Generate the pretty-printed JSON document.
///
/// Field order follows the result types, so an identical `RunResult` always
/// renders to identical bytes.
pub fn generate(result: &RunResult) -> Result<String> {
    let json = serde_json::to_string_pretty(result)?;
    Ok(json)
}
