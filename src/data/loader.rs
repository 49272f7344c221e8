use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, RawTable};

/// Failures that stop a dataset from loading at all.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the required columns (default)
/// * `.parquet` – any column types Arrow can cast to text
/// * `.json`    – `[{ "id": ..., "price": ..., ... }, ...]`
///
/// A missing file fails with [`LoadError::MissingInput`] before anything is
/// opened.
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(LoadError::MissingInput {
            path: path.to_path_buf(),
        }
        .into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_csv(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string()).into()),
    };

    let dataset = Dataset::from_raw(table)
        .with_context(|| format!("parsing listings from {}", path.display()))?;
    if dataset.is_empty() {
        log::warn!("{} contains no listings", path.display());
    }
    log::info!(
        "Loaded {} listings from {} (extra columns: {:?})",
        dataset.len(),
        path.display(),
        dataset.extra_columns
    );
    Ok(dataset)
}

/// Whether an error chain bottoms out in a missing input file.
pub fn is_missing_input(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::MissingInput { .. })
    )
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// The header row is the union of keys over all records.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file of listings.
///
/// Every column is cast to UTF-8 through Arrow so integer, float, and string
/// encodings of the same field parse identically. Works with files written
/// by both **Pandas** (`df.to_parquet()`) and **Polars**.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let columns = batch
            .columns()
            .iter()
            .zip(&headers)
            .map(|(col, name)| {
                cast(col, &DataType::Utf8).with_context(|| format!("casting column '{name}' to text"))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            rows.push(
                columns
                    .iter()
                    .map(|col| {
                        if col.is_null(row) {
                            String::new()
                        } else {
                            col.as_string::<i32>().value(row).to_string()
                        }
                    })
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}
