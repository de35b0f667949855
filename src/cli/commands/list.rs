//! List command - show recorded extraction runs.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::ResponseStore;
use anyhow::Result;

/// Run the list command.
pub fn run_list(settings: Settings) -> Result<()> {
    let store = ResponseStore::new(&settings.sqlite_path())?;
    let runs = store.list_runs()?;

    if runs.is_empty() {
        Output::info("No extraction runs recorded yet.");
        Output::info("Run 'sitat extract <file> ...' to process a transcript.");
        return Ok(());
    }

    Output::header(&format!("Recorded Runs ({})", runs.len()));
    for run in &runs {
        Output::run_info(
            &run.run_id,
            &run.company,
            &run.interviewee_name,
            run.response_count,
            &run.created_at.format("%Y-%m-%d %H:%M").to_string(),
        );
    }

    Ok(())
}
