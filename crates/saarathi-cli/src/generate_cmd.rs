//! One-shot lesson plan generation from the command line.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;

use saarathi_core::backend::GenerationBackend;
use saarathi_core::render::render_document;
use saarathi_core::{
    ClassLevel, Difficulty, GenerationClient, GenerationConfig, GenerationRequest, LessonPlan,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Standalone printable HTML document
    Html,
    /// The decoded plan as pretty-printed JSON
    Json,
}

pub struct GenerateArgs {
    pub class: ClassLevel,
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub format: OutputFormat,
    pub output: Option<String>,
}

/// Generate one plan and write it to `--output` or stdout.
pub async fn run_generate(
    backend: Arc<dyn GenerationBackend>,
    config: &GenerationConfig,
    args: &GenerateArgs,
) -> Result<()> {
    let request = GenerationRequest::new(args.class, &args.subject, &args.topic, args.difficulty)
        .map_err(|e| anyhow::anyhow!("{} ({e})", e.user_message()))?;

    let client = GenerationClient::new(backend, config);
    let plan = client
        .generate(&request)
        .await
        .context("Failed to generate plan. Please try again.")?;

    let rendered = render_output(&plan, args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(Path::new(path), &rendered)
                .with_context(|| format!("failed to write {path}"))?;
            println!("Lesson plan written to {path}");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

pub fn render_output(plan: &LessonPlan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(render_document(plan)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(plan).context("failed to serialize lesson plan")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Print the response schema sent with every generation request.
pub fn run_schema() -> Result<()> {
    let schema = saarathi_core::lesson_plan_response_schema();
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).context("failed to serialize schema")?
    );
    Ok(())
}
