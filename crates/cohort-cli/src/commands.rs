use anyhow::{Context, Result};
use tracing::info;

use cohort_cli::pipeline::{BuildResult, load_variables, run_build};
use cohort_model::SchemaEntry;

use crate::cli::{BuildArgs, SchemaArgs};

pub fn run_build_command(args: &BuildArgs) -> Result<BuildResult> {
    let options = args.overrides().options();
    run_build(&args.data, &args.schema, &options, args.endpoint.into())
}

pub fn render_json(result: &BuildResult) -> Result<String> {
    serde_json::to_string_pretty(&result.summary()).context("serialize build report")
}

pub fn run_schema(args: &SchemaArgs) -> Result<Vec<SchemaEntry>> {
    let entries = load_variables(&args.schema)?;
    info!(
        entries = entries.len(),
        selected = entries.iter().filter(|entry| entry.kind.is_selected()).count(),
        "schema loaded"
    );
    Ok(entries)
}
