// Equality filters over a loaded dataset. Each filter narrows the row set in
// place and preserves the original row order. A filter naming a column the
// dataset does not have is an error rather than silently matching nothing.

use anyhow::{Result, bail};
use serde_json::Value;

use crate::dataset::Dataset;

/// Keep rows whose `year` column equals `year` numerically. Works for both
/// integer- and float-typed year columns (a CSV year column containing empty
/// cells is inferred as float, pandas-style).
pub fn filter_by_year(dataset: &mut Dataset, year: i64) -> Result<()> {
    require_column(dataset, "year")?;
    dataset.rows.retain(|row| match row.get("year") {
        Some(Value::Number(n)) => n.as_i64() == Some(year) || n.as_f64() == Some(year as f64),
        _ => false,
    });
    Ok(())
}

/// Keep rows whose `column` cell equals `value` as an exact string.
pub fn filter_by_string(dataset: &mut Dataset, column: &str, value: &str) -> Result<()> {
    require_column(dataset, column)?;
    dataset
        .rows
        .retain(|row| row.get(column).and_then(Value::as_str) == Some(value));
    Ok(())
}

fn require_column(dataset: &Dataset, column: &str) -> Result<()> {
    if !dataset.has_column(column) {
        bail!("Column '{}' not found in dataset", column);
    }
    Ok(())
}
