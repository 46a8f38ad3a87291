//! Completion result shaping. The default is the first completion as a string.

use crate::catalog::{Capability, CompletionModel};
use crate::format::{result_at, results_array, Formatted, ResultFormat, Table};
use crate::Result;
use serde_json::Value;

const SOURCE: &str = "completion_formatter";

pub fn list_models() -> Vec<&'static str> {
    CompletionModel::list()
}

pub(crate) fn format(prompt: &str, result: &Value, format: ResultFormat) -> Result<Formatted> {
    let results = results_array(result, SOURCE)?;
    match format {
        ResultFormat::Text => {
            let text = match result_at(results, 0, SOURCE)? {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(Formatted::Text(text))
        }
        ResultFormat::Table => {
            let input = Table::from_column("prompt", [Value::String(prompt.to_string())]);
            Ok(Formatted::Table(input.concat(Table::from_rows(&["output"], results)?)))
        }
        ResultFormat::Dict | ResultFormat::Array => {
            Err(Capability::Completion.unsupported_format(format))
        }
    }
}
