//! Result shaping.
//!
//! [`ResultFormat`] is the closed set of output shapes. Each capability
//! supports a subset of them (see [`Capability::supported_formats`]) and maps
//! every supported variant to a dedicated conversion.

use crate::catalog::Capability;
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultFormat {
    /// Column-aligned table of inputs and outputs (`"table"`, or `"pd"`).
    Table,
    /// Map from input index to a JSON object (`"dict"`).
    Dict,
    /// First output as a bare string (`"text"`, or `"str"`).
    Text,
    /// One numeric vector per input (`"array"`, or `"np"`).
    Array,
}

impl ResultFormat {
    pub const ALL: &'static [ResultFormat] = &[
        ResultFormat::Table,
        ResultFormat::Dict,
        ResultFormat::Text,
        ResultFormat::Array,
    ];

    /// Every accepted format name, short aliases included.
    pub const NAMES: &'static [&'static str] =
        &["table", "pd", "dict", "text", "str", "array", "np"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultFormat::Table => "table",
            ResultFormat::Dict => "dict",
            ResultFormat::Text => "text",
            ResultFormat::Array => "array",
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" | "pd" => Ok(ResultFormat::Table),
            "dict" => Ok(ResultFormat::Dict),
            "text" | "str" => Ok(ResultFormat::Text),
            "array" | "np" => Ok(ResultFormat::Array),
            other => Err(Error::invalid_format(other, ResultFormat::NAMES.to_vec())),
        }
    }
}

impl Capability {
    /// Output shapes this capability can produce. The first one is the default.
    pub fn supported_formats(&self) -> &'static [ResultFormat] {
        match self {
            Capability::Classification => &[ResultFormat::Table, ResultFormat::Dict],
            Capability::Completion => &[ResultFormat::Text, ResultFormat::Table],
            Capability::Encoding => &[ResultFormat::Array, ResultFormat::Dict],
            Capability::Pipeline => &[ResultFormat::Dict],
            Capability::Transformation => &[ResultFormat::Table, ResultFormat::Dict],
        }
    }

    pub fn default_format(&self) -> ResultFormat {
        self.supported_formats()[0]
    }

    pub(crate) fn unsupported_format(&self, format: ResultFormat) -> Error {
        Error::invalid_format(
            format.as_str(),
            self.supported_formats().iter().map(|f| f.as_str()).collect(),
        )
    }
}

/// A formatted result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Formatted {
    Table(Table),
    Dict(BTreeMap<usize, Value>),
    Text(String),
    Array(Vec<Vec<f64>>),
}

impl Formatted {
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Formatted::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<usize, Value>> {
        match self {
            Formatted::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Formatted::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Vec<f64>]> {
        match self {
            Formatted::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// Column-aligned rows. Missing cells are `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Single-column table, one row per value.
    pub fn from_column(name: &str, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            columns: vec![name.to_string()],
            rows: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    /// Table from result rows. An array row fills the columns left to right;
    /// a scalar row fills the first column. Short rows are padded with `null`.
    pub fn from_rows(columns: &[&str], rows: &[Value]) -> Result<Self> {
        let width = columns.len();
        let mut out = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let mut cells = match row {
                Value::Array(items) => items.clone(),
                scalar => vec![scalar.clone()],
            };
            if cells.len() > width {
                return Err(Error::unexpected_response_with_context(
                    format!("{} values in a row, expected at most {}", cells.len(), width),
                    ErrorContext::new()
                        .with_field_path(format!("results[{}]", i))
                        .with_source("table_builder"),
                ));
            }
            cells.resize(width, Value::Null);
            out.push(cells);
        }
        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: out,
        })
    }

    /// Side-by-side concatenation aligned on row index.
    pub fn concat(self, right: Table) -> Self {
        let height = self.rows.len().max(right.rows.len());
        let (lw, rw) = (self.columns.len(), right.columns.len());
        let mut left_rows = self.rows.into_iter();
        let mut right_rows = right.rows.into_iter();
        let rows = (0..height)
            .map(|_| {
                let mut row = left_rows.next().unwrap_or_else(|| vec![Value::Null; lw]);
                row.extend(right_rows.next().unwrap_or_else(|| vec![Value::Null; rw]));
                row
            })
            .collect();
        let mut columns = self.columns;
        columns.extend(right.columns);
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// The `results` array of a raw API result.
pub(crate) fn results_array<'a>(result: &'a Value, source: &str) -> Result<&'a [Value]> {
    result
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| {
            Error::unexpected_response_with_context(
                "missing 'results' array",
                ErrorContext::new()
                    .with_field_path("results")
                    .with_source(source),
            )
        })
}

/// Element `index` of `results`, or an error naming the missing index.
pub(crate) fn result_at<'a>(results: &'a [Value], index: usize, source: &str) -> Result<&'a Value> {
    results.get(index).ok_or_else(|| {
        Error::unexpected_response_with_context(
            format!("{} results for more inputs", results.len()),
            ErrorContext::new()
                .with_field_path(format!("results[{}]", index))
                .with_source(source),
        )
    })
}
