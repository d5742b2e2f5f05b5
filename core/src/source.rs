//! Corpus source readers: CSV tables and JSON / JSON Lines course dumps.

use crate::error::{SchemaError, SourceError};
use crate::record::CourseRow;
use csv::StringRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

pub const REQUIRED_COLUMNS: &[&str] = &[
    "course_id", "title", "url", "provider", "level", "duration",
    "rating", "is_paid", "subscribers", "reviews", "lectures", "subject",
];

pub const COMBINED_TEXT_COLUMN: &str = "text_for_tfidf";

/// Columns decoded as free text. JSON sources may carry them as numbers or
/// booleans; CSV cells are already text.
const TEXT_COLUMNS: &[&str] = &[
    "title", "url", "price", "level", "published_timestamp", "subject",
    "provider", "description", "skills", "text_for_tfidf",
];
const FALLBACK_TEXT_COLUMNS: &[&str] = &["description", "skills"];

/// Check that the columns needed to build the index are present.
pub fn check_columns<'a, I>(columns: I) -> Result<(), SchemaError>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = columns.into_iter().collect();
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(c))
        .map(|c| c.to_string())
        .collect();
    if !present.contains(&COMBINED_TEXT_COLUMN) {
        missing.extend(
            FALLBACK_TEXT_COLUMNS
                .iter()
                .filter(|c| !present.contains(c))
                .map(|c| c.to_string()),
        );
    }
    if missing.is_empty() { Ok(()) } else { Err(SchemaError::MissingColumns { missing }) }
}

/// Load course rows, picking the reader from the file extension.
pub fn load_rows(path: &Path) -> Result<Vec<CourseRow>, SourceError> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    let f = File::open(path)?;
    let rows = match ext.as_str() {
        "csv" => read_csv(f)?,
        "jsonl" => read_json_lines(BufReader::new(f))?,
        "json" => read_json(BufReader::new(f))?,
        other => return Err(SourceError::UnsupportedFormat(other.to_string())),
    };
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded corpus source");
    Ok(rows)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<CourseRow>, SourceError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: StringRecord = rdr
        .headers()
        .map_err(|e| unreadable(0, e))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    check_columns(headers.iter())?;
    rdr.set_headers(headers);

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<CourseRow>().enumerate() {
        rows.push(result.map_err(|e| unreadable(i + 1, e))?);
    }
    Ok(rows)
}

pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<CourseRow>, SourceError> {
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let value: serde_json::Value = serde_json::from_str(&line).map_err(|e| unreadable(i + 1, e))?;
        rows.push(row_from_value(value, i + 1)?);
    }
    Ok(rows)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<CourseRow>, SourceError> {
    let json: serde_json::Value = serde_json::from_reader(reader).map_err(|e| unreadable(0, e))?;
    match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .enumerate()
            .map(|(i, v)| row_from_value(v, i + 1).map_err(SourceError::from))
            .collect(),
        serde_json::Value::Object(_) => Ok(vec![row_from_value(json, 1)?]),
        _ => Err(SchemaError::NotAnObject { found: "scalar" }.into()),
    }
}

fn row_from_value(value: serde_json::Value, row: usize) -> Result<CourseRow, SchemaError> {
    let obj = match &value {
        serde_json::Value::Object(obj) => obj,
        serde_json::Value::Array(_) => return Err(SchemaError::NotAnObject { found: "array" }),
        _ => return Err(SchemaError::NotAnObject { found: "scalar" }),
    };
    let keys: Vec<String> = obj.keys().map(|k| k.trim().to_lowercase()).collect();
    check_columns(keys.iter().map(String::as_str))?;
    let normalized: serde_json::Map<String, serde_json::Value> = obj
        .iter()
        .map(|(k, v)| {
            let key = k.trim().to_lowercase();
            let value = if TEXT_COLUMNS.contains(&key.as_str()) { scalar_to_text(v) } else { v.clone() };
            (key, value)
        })
        .collect();
    serde_json::from_value(serde_json::Value::Object(normalized)).map_err(|e| unreadable(row, e))
}

fn scalar_to_text(v: &serde_json::Value) -> serde_json::Value {
    match v {
        serde_json::Value::Number(n) => serde_json::Value::String(n.to_string()),
        serde_json::Value::Bool(b) => serde_json::Value::String(b.to_string()),
        other => other.clone(),
    }
}

fn unreadable(row: usize, e: impl std::fmt::Display) -> SchemaError {
    SchemaError::Unreadable { row, reason: e.to_string() }
}
