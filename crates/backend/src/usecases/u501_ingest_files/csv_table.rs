use std::collections::HashMap;
use std::io::Read;

use sea_orm::Value;
use thiserror::Error;

use crate::shared::data::table_writer::{ColumnDef, ColumnType, TableData};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file has no header row")]
    EmptyHeader,
}

/// Cell spellings read as NULL, besides the empty cell
const NULL_MARKERS: [&str; 6] = ["NaN", "nan", "NULL", "null", "N/A", "#N/A"];

fn is_null(cell: &str) -> bool {
    cell.is_empty() || NULL_MARKERS.contains(&cell)
}

/// A parsed flat file: header names and raw cells, NULL as `None`
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<Option<String>>>,
}

pub fn read_csv<R: Read>(reader: R) -> Result<CsvTable, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(CsvError::EmptyHeader);
    }
    let headers = normalize_headers(raw_headers.iter());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(
            record
                .iter()
                .map(|cell| (!is_null(cell)).then(|| cell.to_string()))
                .collect(),
        );
    }

    Ok(CsvTable { headers, records })
}

/// Header names as they become column names: BOM stripped, blanks named
/// `Unnamed: <index>`, repeats suffixed `.1`, `.2`, ...
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.enumerate()
        .map(|(idx, name)| {
            let name = name.trim_start_matches('\u{FEFF}');
            let base = if name.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name.to_string()
            };
            let count = seen.entry(base.to_ascii_lowercase()).or_insert(0);
            let unique = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut column_type = ColumnType::Integer;
    for cell in cells {
        let cell = cell.trim();
        match column_type {
            ColumnType::Integer if cell.parse::<i64>().is_ok() => {}
            ColumnType::Integer | ColumnType::Real if cell.parse::<f64>().is_ok() => {
                column_type = ColumnType::Real;
            }
            _ => return ColumnType::Text,
        }
    }
    column_type
}

fn to_value(cell: Option<String>, column_type: ColumnType) -> Value {
    match column_type {
        ColumnType::Integer => Value::BigInt(cell.and_then(|c| c.trim().parse().ok())),
        ColumnType::Real => Value::Double(cell.and_then(|c| c.trim().parse().ok())),
        ColumnType::Text => Value::String(cell.map(Box::new)),
    }
}

impl CsvTable {
    /// Column types over the non-NULL cells: INTEGER if every cell is an
    /// integer, REAL if every cell is a number, TEXT otherwise.
    /// A column of only NULLs is REAL.
    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.headers.len())
            .map(|idx| {
                let mut cells = self
                    .records
                    .iter()
                    .filter_map(|record| record.get(idx).and_then(|c| c.as_deref()))
                    .peekable();
                if cells.peek().is_none() {
                    ColumnType::Real
                } else {
                    infer_type(cells)
                }
            })
            .collect()
    }

    /// Convert to typed rows, moving the cells out of the table
    pub fn into_table_data(self) -> TableData {
        let types = self.column_types();
        let columns = self
            .headers
            .into_iter()
            .zip(&types)
            .map(|(name, column_type)| ColumnDef::new(name, *column_type))
            .collect();
        let rows = self
            .records
            .into_iter()
            .map(|record| {
                let mut cells = record.into_iter();
                types
                    .iter()
                    .map(|column_type| to_value(cells.next().flatten(), *column_type))
                    .collect()
            })
            .collect();
        TableData { columns, rows }
    }
}
