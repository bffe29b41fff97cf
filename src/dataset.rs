// Data loader: fetches the remote CSV document and parses it into an
// in-memory table of flat JSON records. Invoked once per request, no caching.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use reqwest::Client;
use serde_json::{Map, Value};

/// One row of the dataset: column name -> cell value.
pub type Record = Map<String, Value>;

/// The full in-memory table parsed from the remote CSV. Rows keep the
/// document's original order; empty cells are `Value::Null` until
/// [`Dataset::fill_null_with_empty`] runs.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Replace every null cell with an empty string, across all columns.
    pub fn fill_null_with_empty(&mut self) {
        for row in &mut self.rows {
            for value in row.values_mut() {
                if value.is_null() {
                    *value = Value::String(String::new());
                }
            }
        }
    }
}

/// Fetch the dataset from `url` and parse it. A single attempt: no retries,
/// no timeout beyond the transport defaults.
pub async fn load(client: &Client, url: &str) -> Result<Dataset> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch dataset from {}", url))?
        .error_for_status()
        .context("Dataset endpoint returned an error status")?;

    let body = response
        .text()
        .await
        .context("Failed to read dataset response body")?;

    parse_csv(&body).context("Failed to parse dataset CSV")
}

/// Parse CSV text into a [`Dataset`]. Cell types are inferred per column: a
/// column whose non-empty cells all parse as integers is numeric, likewise
/// for floats; everything else stays a string. Empty cells become null.
pub fn parse_csv(content: &str) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new().from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    // Buffer the raw records first; column types can only be inferred once
    // every cell of a column has been seen.
    let mut raw_rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record at row {}", index + 1))?;
        raw_rows.push(record);
    }

    let column_types: Vec<ColumnType> = (0..headers.len())
        .map(|col| infer_column_type(raw_rows.iter().map(|r| r.get(col).unwrap_or(""))))
        .collect();

    let rows = raw_rows
        .iter()
        .map(|record| {
            headers
                .iter()
                .zip(&column_types)
                .enumerate()
                .map(|(col, (header, &column_type))| {
                    let cell = record.get(col).unwrap_or("");
                    (header.clone(), cell_to_value(cell, column_type))
                })
                .collect::<Record>()
        })
        .collect();

    Ok(Dataset { headers, rows })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Int,
    Float,
    Text,
}

fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: Iterator<Item = &'a str>,
{
    let mut saw_value = false;
    let mut all_int = true;
    let mut all_float = true;

    for cell in cells {
        if cell.is_empty() {
            continue; // Empty cells carry no type information
        }
        saw_value = true;
        if all_int && cell.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_float && !cell.parse::<f64>().is_ok_and(f64::is_finite) {
            all_float = false;
        }
        if !all_int && !all_float {
            break;
        }
    }

    if !saw_value {
        ColumnType::Text
    } else if all_int {
        ColumnType::Int
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

fn cell_to_value(cell: &str, column_type: ColumnType) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match column_type {
        // Inference guarantees these parses succeed; fall back to null rather
        // than panicking if a cell slips through.
        ColumnType::Int => cell.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
        ColumnType::Float => cell
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnType::Text => Value::String(cell.to_string()),
    }
}
