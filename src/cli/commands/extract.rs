//! Extract command - run the full pipeline on one transcript.

use crate::cli::Output;
use crate::config::Settings;
use crate::export::{format_responses, OutputFormat};
use crate::extraction::InterviewContext;
use crate::orchestrator::{Orchestrator, QualityGrade};
use crate::store::ResponseStore;
use anyhow::Result;

/// Arguments describing the interview behind a transcript.
pub struct ExtractArgs {
    pub input: String,
    pub client_id: Option<String>,
    pub company: String,
    pub interviewee: String,
    pub deal_status: String,
    pub date: Option<String>,
    pub output: Option<String>,
    pub format: String,
    pub no_store: bool,
}

/// Run the extract command.
pub async fn run_extract(args: ExtractArgs, settings: Settings) -> Result<()> {
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let text = std::fs::read_to_string(&args.input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input, e))?;

    let client_id = args
        .client_id
        .clone()
        .unwrap_or_else(|| args.company.clone());
    let date = args
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%m/%d/%Y").to_string());

    let context = InterviewContext::new(
        &client_id,
        &args.company,
        &args.interviewee,
        &args.deal_status,
        &date,
    );

    let store = if args.no_store {
        None
    } else {
        Some(ResponseStore::new(&settings.sqlite_path())?)
    };

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Extracting quotes for {}...", context.company));
    let outcome = orchestrator.process_transcript(&text, &context).await?;
    spinner.finish_and_clear();

    Output::success(&format!(
        "Extracted {} responses from {} chunks ({} format)",
        outcome.responses.len(),
        outcome.stats.chunks_total,
        outcome.format
    ));
    if outcome.stats.chunks_skipped > 0 {
        Output::info(&format!("{} chunk(s) skipped", outcome.stats.chunks_skipped));
    }
    if outcome.stats.chunks_failed > 0 {
        Output::warning(&format!(
            "{} chunk(s) failed and contributed no rows",
            outcome.stats.chunks_failed
        ));
    }
    for record in outcome
        .quality
        .iter()
        .filter(|r| r.grade == QualityGrade::Low)
    {
        Output::info(&format!("Chunk {}: {}", record.chunk_index, record.notes));
    }

    if let Some(store) = store {
        let run_id = store.record_run(&context.company, &context.interviewee_name, &outcome.responses)?;
        Output::info(&format!("Recorded run {}", run_id));
    }

    let rendered = format_responses(&outcome.responses, format);
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            Output::success(&format!("Wrote {}", path));
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
