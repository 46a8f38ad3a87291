//! Encoding result shaping: one embedding vector per input text.

use crate::catalog::{Capability, EncodingModel};
use crate::format::{result_at, results_array, Formatted, ResultFormat};
use crate::{Error, ErrorContext, Result};
use serde_json::{json, Value};

const SOURCE: &str = "encoding_formatter";

pub fn list_models() -> Vec<&'static str> {
    EncodingModel::list()
}

pub(crate) fn format(texts: &[String], result: &Value, format: ResultFormat) -> Result<Formatted> {
    let results = results_array(result, SOURCE)?;
    match format {
        ResultFormat::Array => results
            .iter()
            .enumerate()
            .map(|(i, row)| vector(row, i))
            .collect::<Result<Vec<_>>>()
            .map(Formatted::Array),
        ResultFormat::Dict => {
            let mut out = std::collections::BTreeMap::new();
            for (i, text) in texts.iter().enumerate() {
                let embedding = vector(result_at(results, i, SOURCE)?, i)?;
                out.insert(i, json!({"text": text, "embedding": embedding}));
            }
            Ok(Formatted::Dict(out))
        }
        ResultFormat::Table | ResultFormat::Text => {
            Err(Capability::Encoding.unsupported_format(format))
        }
    }
}

fn vector(row: &Value, index: usize) -> Result<Vec<f64>> {
    let not_numeric = || {
        Error::unexpected_response_with_context(
            "embedding is not a numeric array",
            ErrorContext::new()
                .with_field_path(format!("results[{}]", index))
                .with_source(SOURCE),
        )
    };
    row.as_array()
        .ok_or_else(not_numeric)?
        .iter()
        .map(|v| v.as_f64().ok_or_else(not_numeric))
        .collect()
}
