//! Transformation result shaping: each input text maps to one output text.

use crate::catalog::{Capability, TransformationModel};
use crate::format::{result_at, results_array, Formatted, ResultFormat, Table};
use crate::Result;
use serde_json::{json, Value};
use std::collections::BTreeMap;

const SOURCE: &str = "transformation_formatter";

pub fn list_models() -> Vec<&'static str> {
    TransformationModel::list()
}

pub(crate) fn format(texts: &[String], result: &Value, format: ResultFormat) -> Result<Formatted> {
    let results = results_array(result, SOURCE)?;
    match format {
        ResultFormat::Table => {
            let input = Table::from_column("text", texts.iter().cloned().map(Value::String));
            Ok(Formatted::Table(input.concat(Table::from_rows(&["output"], results)?)))
        }
        ResultFormat::Dict => texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                result_at(results, i, SOURCE).map(|out| (i, json!({"text": text, "output": out})))
            })
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Formatted::Dict),
        ResultFormat::Text | ResultFormat::Array => {
            Err(Capability::Transformation.unsupported_format(format))
        }
    }
}
