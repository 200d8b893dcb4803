//! Text and JSON presentation of a board snapshot.

use std::fmt::Write as _;

use board_core::BoardSnapshot;
use clap::ValueEnum;
use shared::domain::{Column, GroupKey, GroupLabel, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn priority_label(priority: i64) -> &'static str {
    match priority {
        4 => "Urgent",
        3 => "High",
        2 => "Medium",
        1 => "Low",
        _ => "No priority",
    }
}

pub fn column_title(label: &GroupLabel) -> String {
    match label {
        GroupLabel::Priority(priority) => priority_label(*priority).to_string(),
        other => other.to_string(),
    }
}

pub fn render(snapshot: &BoardSnapshot, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(snapshot)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
    }
}

pub fn render_text(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Grouping: {}  Ordering: {}",
        snapshot.group_by, snapshot.order_by
    );

    for column in snapshot.view.iter() {
        out.push('\n');
        render_column(&mut out, snapshot, column);
    }
    out
}

fn render_column(out: &mut String, snapshot: &BoardSnapshot, column: &Column) {
    let _ = writeln!(
        out,
        "== {} ({}) ==",
        column_title(&column.label),
        column.tickets.len()
    );

    if column.tickets.is_empty() {
        let _ = writeln!(out, "  No data available for this {}.", snapshot.group_by);
        return;
    }

    for ticket in &column.tickets {
        render_card(out, snapshot, ticket);
    }
}

// Cards omit whatever the column already tells you.
fn render_card(out: &mut String, snapshot: &BoardSnapshot, ticket: &Ticket) {
    let mut header = format!("  [{}]", ticket.id);
    if snapshot.group_by != GroupKey::User {
        let owner = snapshot
            .user(ticket.user_id.as_ref())
            .map(|user| user.name.as_str())
            .unwrap_or("unassigned");
        let _ = write!(header, " @{owner}");
    }
    let _ = writeln!(out, "{header}");

    if snapshot.group_by == GroupKey::Status {
        let _ = writeln!(out, "    {}", ticket.title);
    } else {
        let _ = writeln!(out, "    ({}) {}", ticket.status, ticket.title);
    }

    let mut footer = Vec::new();
    if snapshot.group_by != GroupKey::Priority {
        footer.push(priority_label(ticket.priority).to_string());
    }
    if !ticket.tag.is_empty() {
        footer.push(ticket.tag.join(", "));
    }
    if !footer.is_empty() {
        let _ = writeln!(out, "    {}", footer.join(" | "));
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
