//! Classification result shaping.
//!
//! The label columns depend on the model: two columns for the filter and tag
//! models, four for emotions, a single `label` for topics. Topic models see
//! all input texts joined by newlines as one document.

use crate::catalog::{Capability, ClassificationModel};
use crate::format::{result_at, results_array, Formatted, ResultFormat, Table};
use crate::{Error, ErrorContext, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

const SOURCE: &str = "classification_formatter";

pub fn list_models() -> Vec<&'static str> {
    ClassificationModel::list()
}

pub(crate) fn format(
    model: ClassificationModel,
    texts: &[String],
    result: &Value,
    format: ResultFormat,
) -> Result<Formatted> {
    let results = results_array(result, SOURCE)?;
    let labels = model.labels();
    let inputs: Vec<String> = if model.joins_inputs() {
        vec![texts.join("\n")]
    } else {
        texts.to_vec()
    };

    match format {
        ResultFormat::Table => {
            let input = Table::from_column("text", inputs.into_iter().map(Value::String));
            Ok(Formatted::Table(input.concat(Table::from_rows(labels, results)?)))
        }
        ResultFormat::Dict if model.joins_inputs() => {
            let label = result_at(results, 0, SOURCE)?;
            let out = inputs
                .iter()
                .enumerate()
                .map(|(i, text)| (i, json!({"text": text, "output": {"label": label}})))
                .collect();
            Ok(Formatted::Dict(out))
        }
        ResultFormat::Dict => {
            let mut out = BTreeMap::new();
            for (i, text) in inputs.iter().enumerate() {
                let output = labeled(labels, result_at(results, i, SOURCE)?, i)?;
                out.insert(i, json!({"text": text, "output": output}));
            }
            Ok(Formatted::Dict(out))
        }
        ResultFormat::Text | ResultFormat::Array => {
            Err(Capability::Classification.unsupported_format(format))
        }
    }
}

fn labeled(labels: &[&str], row: &Value, index: usize) -> Result<Map<String, Value>> {
    let values = match row {
        Value::Array(items) => items.as_slice(),
        scalar => std::slice::from_ref(scalar),
    };
    if values.len() > labels.len() {
        return Err(Error::unexpected_response_with_context(
            format!("{} values for {} labels", values.len(), labels.len()),
            ErrorContext::new()
                .with_field_path(format!("results[{}]", index))
                .with_source(SOURCE),
        ));
    }
    Ok(labels
        .iter()
        .zip(values)
        .map(|(label, value)| (label.to_string(), value.clone()))
        .collect())
}
