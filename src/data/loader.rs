use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, FieldNames};
use crate::color::PaletteKind;
use crate::error::LoadError;

/// Tokens read as a missing value, matching the usual data-frame defaults.
pub const DEFAULT_NULL_VALUES: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

const USER_AGENT: &str = concat!("sleepscope/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Source & options
// ---------------------------------------------------------------------------

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// `http://` and `https://` are URLs; anything else is a local path.
    pub fn parse(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::Path(PathBuf::from(s))
        }
    }

    fn extension(&self) -> Option<String> {
        let path = match self {
            Source::Url(url) => {
                let no_query = url.split(['?', '#']).next().unwrap_or(url);
                Path::new(no_query).to_path_buf()
            }
            Source::Path(p) => p.clone(),
        };
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Knobs for [`load`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub fields: FieldNames,
    pub null_values: Vec<String>,
    pub timeout: Duration,
    pub palette: PaletteKind,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            fields: FieldNames::default(),
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(30),
            palette: PaletteKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row plus one record per line (also the default for URLs)
/// * `.json` – `[{ "vore": "herbi", "bodywt": 1.2, ... }, ...]`
pub fn load(source: &Source, opts: &LoadOptions) -> Result<Dataset, LoadError> {
    let format = match (source, source.extension().as_deref()) {
        (_, Some("csv")) => Format::Csv,
        (_, Some("json")) => Format::Json,
        (Source::Url(_), _) => Format::Csv,
        (Source::Path(_), other) => {
            return Err(LoadError::UnsupportedFormat(other.unwrap_or("").to_string()))
        }
    };

    log::info!("Loading dataset from {source}");
    let bytes = match source {
        Source::Url(url) => fetch(url, opts.timeout)?,
        Source::Path(path) => std::fs::read(path).map_err(|e| LoadError::Io {
            path: path.clone(),
            source: e,
        })?,
    };

    let dataset = match format {
        Format::Csv => load_csv(bytes.as_slice(), opts)?,
        Format::Json => load_json(&bytes, opts)?,
    };
    log::info!(
        "Loaded {} rows ({} dropped without '{}'), {} categories",
        dataset.len(),
        dataset.dropped(),
        opts.fields.category,
        dataset.categories().len()
    );
    Ok(dataset)
}

fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let fetch_err = |e| LoadError::Fetch {
        url: url.to_string(),
        source: e,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(fetch_err)?;
    let response = client.get(url).send().map_err(fetch_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().map_err(fetch_err)?;
    Ok(body.to_vec())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one row per record.
/// A blank header cell (the unnamed row-number column of R exports) becomes
/// `Unnamed: {i}`.
pub fn load_csv<R: Read>(input: R, opts: &LoadOptions) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = h.trim();
            if h.is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut table = Vec::new();
    for result in reader.records() {
        let record = result?;
        table.push(
            record
                .iter()
                .map(|cell| guess_cell_type(cell, &opts.null_values))
                .collect(),
        );
    }

    Dataset::from_table(columns, table, opts.fields.clone(), opts.palette)
}

fn guess_cell_type(s: &str, null_values: &[String]) -> CellValue {
    let s = s.trim();
    if null_values.iter().any(|n| n == s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "TRUE" | "True" => CellValue::Bool(true),
        "false" | "FALSE" | "False" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of the record keys in first-seen order.
pub fn load_json(bytes: &[u8], opts: &LoadOptions) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = match root {
        JsonValue::Array(records) => records,
        _ => return Err(LoadError::NotAnObject { row: 0 }),
    };

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (row, rec) in records.into_iter().enumerate() {
        let JsonValue::Object(obj) = rec else {
            return Err(LoadError::NotAnObject { row });
        };
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let table = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Dataset::from_table(columns, table, opts.fields.clone(), opts.palette)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}
