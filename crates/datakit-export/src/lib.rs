//! # datakit-export — Dataset Dump Exporter
//!
//! Groups a dataset's resources by resource type, preserving query order
//! for both the group keys and the records within each group, then
//! renders the grouping either as JSON (the grouped mapping verbatim) or
//! as an xlsx workbook with one sheet per resource type.
//!
//! ## Spreadsheet Layout
//!
//! The header row is the union of record keys in first-seen order, so
//! homogeneous records (the common case) produce exactly the keys of the
//! first record. A record missing a header key leaves that cell empty;
//! a record with a new key extends the header. Nested objects and arrays
//! are written as serialized JSON text.

use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::{Map, Value};
use thiserror::Error;

use datakit_core::Resource;

/// Excel's hard limit on worksheet name length.
const MAX_SHEET_NAME: usize = 31;

/// Error during export rendering.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The spreadsheet writer rejected the workbook.
    #[error("spreadsheet write failed: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Group resource values by resource type.
///
/// Group keys appear in first-seen order; each group holds its records'
/// values in the order the resources were supplied.
pub fn group_by_type(resources: &[Resource]) -> Map<String, Value> {
    let mut grouped = Map::new();
    for resource in resources {
        match grouped.get_mut(&resource.resource_type) {
            Some(Value::Array(records)) => records.push(resource.value.clone()),
            _ => {
                grouped.insert(
                    resource.resource_type.clone(),
                    Value::Array(vec![resource.value.clone()]),
                );
            }
        }
    }
    grouped
}

/// Render the grouped mapping as JSON.
pub fn dump_to_json(resources: &[Resource]) -> Value {
    Value::Object(group_by_type(resources))
}

/// Render the grouped mapping as an xlsx workbook, returned as bytes.
///
/// One sheet per resource type; empty groups are skipped (the grouping
/// step never produces one, but header derivation must not index into an
/// empty record list).
pub fn dump_to_xlsx(resources: &[Resource]) -> Result<Vec<u8>, ExportError> {
    let grouped = group_by_type(resources);
    let mut workbook = Workbook::new();

    for (resource_type, records) in &grouped {
        let Some(records) = records.as_array() else {
            continue;
        };
        if records.is_empty() {
            continue;
        }

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(resource_type))?;

        let header = sheet_header(records);
        for (col, key) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, key)?;
        }

        for (row, record) in records.iter().enumerate() {
            let row = (row + 1) as u32;
            let fields = match record.as_object() {
                Some(fields) => fields,
                // Non-object records have no keyed cells; leave the row blank.
                None => continue,
            };
            for (col, key) in header.iter().enumerate() {
                if let Some(cell) = fields.get(key) {
                    write_cell(worksheet, row, col as u16, cell)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Union of record keys in first-seen order.
fn sheet_header(records: &[Value]) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();
    for record in records {
        if let Some(fields) = record.as_object() {
            for key in fields.keys() {
                if !header.iter().any(|k| k == key) {
                    header.push(key.clone());
                }
            }
        }
    }
    header
}

/// Reduce a resource type to a legal worksheet name: characters Excel
/// forbids in sheet names become `_`, then the result is truncated to
/// the length limit.
fn sheet_name(resource_type: &str) -> String {
    resource_type
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME)
        .collect()
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &Value,
) -> Result<(), XlsxError> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => {
            // i64/u64 outside f64's exact range lose precision here; Excel
            // cells are f64 natively, so this matches what Excel can hold.
            worksheet.write_number(row, col, n.as_f64().unwrap_or(f64::NAN))?;
        }
        Value::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        nested @ (Value::Array(_) | Value::Object(_)) => {
            worksheet.write_string(row, col, nested.to_string())?;
        }
    }
    Ok(())
}
