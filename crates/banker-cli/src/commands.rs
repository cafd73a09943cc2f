//! Command implementations shared by the one-shot subcommands and the
//! interactive session

use crate::output::{
    render_sequences, render_table, sequence_json, sequences_json, snapshot_json, Output,
};
use banker_core::{
    check_safety, enumerate_safe_sequences, submit_request, Grant, RequestOutcome, ResourceState,
    Units,
};
use serde_json::Value;

/// Show the current table
pub fn status(state: &ResourceState, json: bool) -> Output {
    let snapshot = state.snapshot();
    Output::new(json)
        .field_u64("processes", state.process_count() as u64)
        .field_u64("resources", state.resource_count() as u64)
        .field_value("state", snapshot_json(&snapshot))
        .message(&format!(
            "processes: {}\nresources: {}\n{}",
            state.process_count(),
            state.resource_count(),
            render_table(&snapshot)
        ))
}

/// Find one safe sequence
pub fn check(state: &ResourceState, json: bool) -> Output {
    let result = check_safety(state);
    let message = if result.safe {
        format!("Safe sequence exists: {}", result.sequence)
    } else if result.sequence.is_empty() {
        "No safe sequence exists: no process can finish".to_string()
    } else {
        format!("No safe sequence exists: stalled after {}", result.sequence)
    };

    Output::new(json)
        .field_bool("safe", result.safe)
        .field_value("sequence", sequence_json(&result.sequence))
        .message(&message)
}

/// List every safe sequence, up to `limit` of them
pub fn enumerate(state: &ResourceState, limit: Option<usize>, json: bool) -> Output {
    let all = enumerate_safe_sequences(state);
    let shown = &all[..limit.unwrap_or(all.len()).min(all.len())];

    let mut message = format!(
        "The number of all safe sequences is {}, as follows:",
        all.len()
    );
    if !shown.is_empty() {
        message.push('\n');
        message.push_str(&render_sequences(shown));
    }
    if shown.len() < all.len() {
        message.push_str(&format!("\n  ... {} more", all.len() - shown.len()));
    }

    Output::new(json)
        .field_u64("count", all.len() as u64)
        .field_value("sequences", sequences_json(shown))
        .message(&message)
}

/// Submit one request and report the outcome with the resulting table
pub fn request(state: &mut ResourceState, pid: usize, units: &[Units], json: bool) -> Output {
    let result = submit_request(state, pid, units);
    let outcome = RequestOutcome::from(&result);

    let mut output = Output::new(json)
        .field_value(
            "outcome",
            serde_json::to_value(outcome).unwrap_or(Value::Null),
        )
        .field_bool("granted", outcome.is_granted());

    let headline = match &result {
        Ok(Grant::Granted { sequence }) => {
            output = output.field_value("sequence", sequence_json(sequence));
            format!(
                "Safe, allocated {:?} to P{} (witness: {})",
                units, pid, sequence
            )
        }
        Ok(Grant::Completed { sequence, released }) => {
            output = output
                .field_value("sequence", sequence_json(sequence))
                .field_value("released", serde_json::json!(released));
            format!("P{} is completed and released {:?}", pid, released)
        }
        Err(e) => {
            output = output.field("error", &e.to_string());
            format!("Rejected: {}", e)
        }
    };

    let snapshot = state.snapshot();
    output
        .field_value("state", snapshot_json(&snapshot))
        .message(&format!("{}\n{}", headline, render_table(&snapshot)))
}
