//! Output formatting

use banker_core::{SafeSequence, Snapshot, Units};
use serde_json::{json, Map, Value};

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a boolean field to the output
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Add a u64 field to the output
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Render to a string without a trailing newline
    pub fn render(&self) -> String {
        if self.json_mode {
            serde_json::to_string_pretty(&self.fields).unwrap_or_default()
        } else {
            self.message.clone().unwrap_or_default()
        }
    }

    /// Print the output
    pub fn print(self) {
        let rendered = self.render();
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }
}

/// Width of one numeric cell
const CELL: usize = 4;

fn format_row(row: &[Units]) -> String {
    row.iter()
        .map(|v| format!("{:>width$}", v, width = CELL))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the PID / Max / Alloc / Need / Available table
///
/// Available is printed once, on the first row. Completed processes are
/// marked with `*`.
pub fn render_table(snapshot: &Snapshot) -> String {
    let m = snapshot.total.len();
    let group = (m * (CELL + 1)).saturating_sub(1);

    let mut lines = Vec::with_capacity(snapshot.processes.len() + 2);
    lines.push(format!(
        "{:>5} | {:^g$} | {:^g$} | {:^g$} | {:^g$}",
        "PID",
        "Max",
        "Alloc",
        "Need",
        "Available",
        g = group
    ));
    lines.push("-".repeat(5 + 4 * (group + 3)));

    for (i, label) in snapshot.processes.iter().enumerate() {
        let marker = match snapshot.status.get(i) {
            Some(banker_core::ProcessStatus::Completed) => "*",
            _ => " ",
        };
        let mut line = format!(
            "{:>4}{} | {} | {} | {} |",
            label,
            marker,
            format_row(&snapshot.max[i]),
            format_row(&snapshot.allocation[i]),
            format_row(&snapshot.need[i]),
        );
        if i == 0 {
            line.push(' ');
            line.push_str(&format_row(&snapshot.available));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// JSON form of a snapshot
pub fn snapshot_json(snapshot: &Snapshot) -> Value {
    serde_json::to_value(snapshot).unwrap_or_else(|_| json!({}))
}

/// Render sequences one per line, numbered
pub fn render_sequences(sequences: &[SafeSequence]) -> String {
    sequences
        .iter()
        .enumerate()
        .map(|(i, seq)| format!("{:>4}. {}", i + 1, seq))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON form of sequences as lists of labels
pub fn sequences_json(sequences: &[SafeSequence]) -> Value {
    Value::Array(sequences.iter().map(sequence_json).collect())
}

/// JSON form of one sequence as a list of labels
pub fn sequence_json(sequence: &SafeSequence) -> Value {
    Value::Array(
        sequence
            .iter()
            .map(|pid| Value::String(pid.label()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::{ProcessId, ProcessStatus};

    fn small_snapshot() -> Snapshot {
        Snapshot {
            processes: vec!["P0".into(), "P1".into()],
            status: vec![ProcessStatus::Active, ProcessStatus::Completed],
            max: vec![vec![7, 5], vec![3, 2]],
            allocation: vec![vec![0, 1], vec![0, 0]],
            need: vec![vec![7, 4], vec![0, 0]],
            available: vec![3, 3],
            total: vec![3, 4],
        }
    }

    #[test]
    fn test_output_text_and_json() {
        let out = Output::new(false).field("a", "b").message("hello");
        assert_eq!(out.render(), "hello");

        let out = Output::new(true)
            .field("a", "b")
            .field_bool("safe", true)
            .field_u64("count", 3)
            .message("hello");
        let value: Value = serde_json::from_str(&out.render()).unwrap();
        assert_eq!(value["a"], "b");
        assert_eq!(value["safe"], true);
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&small_snapshot());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("PID"));
        assert!(lines[0].contains("Available"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("  P0 "));
        assert!(lines[2].ends_with("   3    3"));
        assert!(lines[3].starts_with("  P1*"));
        assert!(lines[3].ends_with("   0    0 |"));
    }

    #[test]
    fn test_render_sequences() {
        let seqs = vec![
            SafeSequence::new(vec![ProcessId(1), ProcessId(0)]),
            SafeSequence::new(vec![ProcessId(0), ProcessId(1)]),
        ];
        assert_eq!(render_sequences(&seqs), "   1. P1 -> P0\n   2. P0 -> P1");
        assert_eq!(sequences_json(&seqs), json!([["P1", "P0"], ["P0", "P1"]]));
    }
}
