use anyhow::Result;
use serde_json::json;
use usersearch::{GateState, Outcome};

/// Render a gate state the way the search view would.
pub(crate) fn format_plain(state: &GateState, min_length: usize) -> String {
    match state {
        GateState::Idle { rejection: None } => String::new(),
        GateState::Idle {
            rejection: Some(rejection),
        } => rejection.hint(min_length).unwrap_or_default(),
        GateState::Pending { query, .. } => format!("Searching for '{query}'..."),
        GateState::Settled { outcome, .. } => match outcome {
            Outcome::Failed { error } => format!("Error: {error}"),
            Outcome::Results { records } if records.is_empty() => "No results found".to_string(),
            Outcome::Results { records } => records
                .iter()
                .map(|record| format!("{}\t{}", record.name, record.email))
                .collect::<Vec<_>>()
                .join("\n"),
        },
    }
}

pub(crate) fn print_plain(state: &GateState, min_length: usize) {
    let rendered = format_plain(state, min_length);
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}

/// Format a state as a single-line JSON object.
///
/// `revision` is present for streamed updates and absent for final reports.
pub(crate) fn format_json(state: &GateState, revision: Option<u64>) -> Result<String> {
    let payload = json!({
        "revision": revision,
        "loading": state.is_loading(),
        "error": state.error().map(|err| err.message.clone()),
        "results": state.results(),
        "gate": state,
    });

    Ok(serde_json::to_string(&payload)?)
}

pub(crate) fn print_json(state: &GateState, revision: Option<u64>) -> Result<()> {
    println!("{}", format_json(state, revision)?);
    Ok(())
}
