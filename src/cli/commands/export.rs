//! Export command - render stored responses to CSV or JSON.

use crate::cli::Output;
use crate::config::Settings;
use crate::export::{format_responses, OutputFormat};
use crate::store::ResponseStore;
use anyhow::Result;

/// Run the export command.
pub fn run_export(
    id: &str,
    by_company: bool,
    output: Option<String>,
    format: &str,
    settings: Settings,
) -> Result<()> {
    let format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let store = ResponseStore::new(&settings.sqlite_path())?;
    let responses = if by_company {
        store.get_by_company(id)?
    } else {
        store.get_by_run(id)?
    };

    if responses.is_empty() {
        Output::warning(&format!(
            "No stored responses for {} '{}'",
            if by_company { "company" } else { "run" },
            id
        ));
        Output::info("Use 'sitat list' to see recorded runs.");
        return Ok(());
    }

    let rendered = format_responses(&responses, format);
    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            Output::success(&format!("Wrote {} responses to {}", responses.len(), path));
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
