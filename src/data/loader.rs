use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::RecordSet;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a band-power table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`               – comma-separated, header row first
/// * `.tsv` / `.tab`      – tab-separated, header row first
/// * `.parquet` / `.pq`   – flat numeric columns plus a string group column
/// * `.json`              – `[{ "main.disorder": "...", "AB.A.delta.a.FP1": 1.2, ... }, ...]`
///
/// Header names are trimmed. The grouping column must be present.
pub fn load_file(path: &Path, group_column: &str) -> Result<RecordSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_delimited(path, b',', group_column),
        "tsv" | "tab" => load_delimited(path, b'\t', group_column),
        "parquet" | "pq" => load_parquet(path, group_column),
        "json" => load_json(path, group_column),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows, {} columns, {} groups from {}",
        records.len(),
        records.schema().len(),
        records.group_labels().len(),
        path.display()
    );
    Ok(records)
}

// ---------------------------------------------------------------------------
// Column assembly shared by every format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Group,
    Value,
    /// A repeated header; its cells are dropped.
    Duplicate,
}

/// Accumulates cells into columns, indexed by header position.
struct TableBuilder {
    group_column: String,
    names: Vec<String>,
    slots: Vec<Slot>,
    groups: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl TableBuilder {
    fn new(headers: Vec<String>, group_column: &str) -> Result<Self> {
        let mut seen = HashSet::new();
        let slots: Vec<Slot> = headers
            .iter()
            .map(|h| {
                if !seen.insert(h.as_str()) {
                    log::warn!("Duplicate column '{h}' ignored; keeping the first");
                    Slot::Duplicate
                } else if h == group_column {
                    Slot::Group
                } else {
                    Slot::Value
                }
            })
            .collect();

        if !slots.contains(&Slot::Group) {
            bail!("missing grouping column '{group_column}'");
        }

        Ok(TableBuilder {
            group_column: group_column.to_string(),
            columns: vec![Vec::new(); headers.len()],
            names: headers,
            slots,
            groups: Vec::new(),
        })
    }

    fn is_group(&self, idx: usize) -> bool {
        self.slots.get(idx) == Some(&Slot::Group)
    }

    fn push_group(&mut self, label: String) {
        self.groups.push(label);
    }

    fn push_value(&mut self, idx: usize, value: Option<f64>) {
        if self.slots.get(idx) == Some(&Slot::Value) {
            self.columns[idx].push(value);
        }
    }

    fn extend_values(&mut self, idx: usize, values: Vec<Option<f64>>) {
        if self.slots.get(idx) == Some(&Slot::Value) {
            self.columns[idx].extend(values);
        }
    }

    fn finish(self) -> RecordSet {
        let mut schema = Vec::new();
        let mut values = BTreeMap::new();
        for ((name, slot), column) in self.names.into_iter().zip(self.slots).zip(self.columns) {
            match slot {
                Slot::Duplicate => {}
                Slot::Group => schema.push(name),
                Slot::Value => {
                    values.insert(name.clone(), column);
                    schema.push(name);
                }
            }
        }
        RecordSet::from_columns(self.group_column, schema, self.groups, values)
    }
}

/// Parse a numeric cell. Empty, unparsable and NaN cells are missing.
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8, group_column: &str) -> Result<RecordSet> {
    let file = std::fs::File::open(path).context("opening file")?;
    read_delimited(file, delimiter, group_column)
}

/// Header row first, one record per line. Records must be valid UTF-8 and
/// have as many fields as the header.
fn read_delimited<R: Read>(input: R, delimiter: u8, group_column: &str) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut table = TableBuilder::new(headers, group_column)?;

    for (row_no, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let record = result.with_context(|| format!("reading line {}", row_no + 2))?;
        for (idx, cell) in record.iter().enumerate() {
            if table.is_group(idx) {
                table.push_group(cell.to_string());
            } else {
                table.push_value(idx, parse_number(cell));
            }
        }
    }

    Ok(table.finish())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat columns, as written by `df.to_parquet()`.
///
/// Numeric Arrow types become values; any other type is kept in the schema
/// with every cell missing. The group column is read as text.
fn load_parquet(path: &Path, group_column: &str) -> Result<RecordSet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().trim().to_string())
        .collect();
    let mut table = TableBuilder::new(headers, group_column)?;

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (idx, col) in batch.columns().iter().enumerate() {
            if table.is_group(idx) {
                for row in 0..col.len() {
                    table.push_group(group_label(col, row)?);
                }
            } else {
                table.extend_values(idx, numeric_cells(col));
            }
        }
    }

    Ok(table.finish())
}

fn group_label(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    array_value_to_string(col, row).with_context(|| format!("row {row}: unreadable group label"))
}

fn numeric_cells(col: &ArrayRef) -> Vec<Option<f64>> {
    if !col.data_type().is_numeric() {
        return vec![None; col.len()];
    }
    match arrow::compute::cast(col, &DataType::Float64) {
        Ok(cast) => cast
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect(),
        Err(e) => {
            log::warn!("Column of type {:?} not readable as numbers: {e}", col.data_type());
            vec![None; col.len()]
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "main.disorder": "Mood disorder", "AB.A.delta.a.FP1": 35.9, ... },
///   ...
/// ]
/// ```
///
/// The schema is the union of keys across records in first-seen order. Keys
/// that collide after trimming keep the first value in each record. Missing
/// keys, `null` and non-numeric values are missing cells.
fn load_json(path: &Path, group_column: &str) -> Result<RecordSet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut headers: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for obj in &objects {
        for key in obj.keys() {
            let name = key.trim();
            if !index.contains_key(name) {
                index.insert(name.to_string(), headers.len());
                headers.push(name.to_string());
            }
        }
    }
    let mut table = TableBuilder::new(headers, group_column)?;
    let width = index.len();
    let mut warned: HashSet<usize> = HashSet::new();

    for obj in &objects {
        let mut group = String::new();
        let mut cells = vec![None; width];
        let mut filled = vec![false; width];
        for (key, val) in obj.iter() {
            let idx = index[key.trim()];
            if std::mem::replace(&mut filled[idx], true) {
                if warned.insert(idx) {
                    log::warn!("Duplicate column '{}' ignored; keeping the first", key.trim());
                }
                continue;
            }
            if table.is_group(idx) {
                group = json_label(val);
            } else {
                cells[idx] = val.as_f64().filter(|v| !v.is_nan());
            }
        }
        table.push_group(group);
        for (idx, cell) in cells.into_iter().enumerate() {
            table.push_value(idx, cell);
        }
    }

    Ok(table.finish())
}

fn json_label(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
