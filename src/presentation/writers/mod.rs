use crate::domain::{
    comparison::ComparisonResult, ports::OutputWriter, value_objects::OutputFormat,
};
use anyhow::Result;

use self::{json::JsonWriter, summary::SummaryWriter};

pub mod json;
pub mod summary;

pub fn writer_for(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter),
        OutputFormat::Summary => Box::new(SummaryWriter),
    }
}

/// The values exposed to the automation pipeline after a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutputs {
    /// JSON document or summary text, per the requested format.
    pub diff_result: String,
    /// `"true"` or `"false"`.
    pub has_changes: &'static str,
}

pub fn render_outputs(result: &ComparisonResult, format: OutputFormat) -> Result<ActionOutputs> {
    Ok(ActionOutputs {
        diff_result: writer_for(format).format(result)?,
        has_changes: if result.has_changes() { "true" } else { "false" },
    })
}
