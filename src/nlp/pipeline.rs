//! Pipeline result shaping. Only the index-keyed raw form is supported.

use crate::catalog::{Capability, PipelineModel};
use crate::format::{result_at, results_array, Formatted, ResultFormat};
use crate::Result;
use serde_json::Value;
use std::collections::BTreeMap;

const SOURCE: &str = "pipeline_formatter";

pub fn list_models() -> Vec<&'static str> {
    PipelineModel::list()
}

pub(crate) fn format(texts: &[String], result: &Value, format: ResultFormat) -> Result<Formatted> {
    let results = results_array(result, SOURCE)?;
    match format {
        ResultFormat::Dict => (0..texts.len())
            .map(|i| result_at(results, i, SOURCE).map(|r| (i, r.clone())))
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Formatted::Dict),
        ResultFormat::Table | ResultFormat::Text | ResultFormat::Array => {
            Err(Capability::Pipeline.unsupported_format(format))
        }
    }
}
