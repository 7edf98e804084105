//! Panel construction: entity keys, (entity, year) index, cleaning.
//!
//! Mirrors the preprocessing contract of the trade-panel pipeline:
//! 1. entity key = `{country}_{code}`
//! 2. index = (entity, year), which must be unique
//! 3. drop `country`, `code`, `const`
//! 4. replace ±inf with missing
//! 5. drop any row with a missing value in any remaining column
//!
//! Cleaning is an unconditional drop — nothing is ever imputed, and dropped
//! rows are not reported (compare `RawTable::height()` with the output's
//! `n_obs()` if the count matters). The table is taken by value: the caller
//! gives up the raw table and gets a fresh `PanelFrame` back, so there is no
//! half-transformed state to observe.

use crate::error::{PanelError, Result};
use crate::frame::{PanelFrame, RawTable};

/// Name of the discarded constant column that inputs are required to carry.
pub const CONST_COLUMN: &str = "const";

/// Build a cleaned panel frame from a raw table.
///
/// Fails if the table shape is inconsistent, the `const` column is absent,
/// or the cleaned (entity, year) index contains duplicates.
pub fn preprocess_panel(table: RawTable) -> Result<PanelFrame> {
    table.validate_shape()?;

    let const_pos = table
        .columns
        .iter()
        .position(|(name, _)| name == CONST_COLUMN)
        .ok_or_else(|| PanelError::MissingColumn(CONST_COLUMN.to_string()))?;

    let n = table.height();
    let RawTable {
        country,
        code,
        year,
        mut columns,
    } = table;

    // Step (c): const is discarded; country/code are consumed by the key.
    columns.remove(const_pos);
    let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
    let k = names.len();

    // Steps (a), (d), (e) per row: synthesize the key, treat ±inf as
    // missing, keep only fully-observed rows.
    let mut entities = Vec::with_capacity(n);
    let mut years = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n * k);

    for i in 0..n {
        let row_ok = columns.iter().all(|(_, v)| v[i].is_finite());
        if !row_ok {
            continue;
        }
        entities.push(format!("{}_{}", country[i], code[i]));
        years.push(year[i]);
        for (_, v) in &columns {
            values.push(v[i]);
        }
    }

    // Step (b): the frame constructor enforces index uniqueness.
    PanelFrame::new(entities, years, names, values)
}
