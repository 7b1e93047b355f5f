//! Format change reports and sync status as text.

use crate::sync::{ChangeReport, ChangeType, SyncStatus};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn colored_change(change_type: ChangeType) -> String {
    match change_type {
        ChangeType::Added => format!("{}", "added".green()),
        ChangeType::Modified => format!("{}", "modified".yellow()),
        ChangeType::Deleted => format!("{}", "deleted".red()),
    }
}

fn short(fingerprint: Option<&String>) -> String {
    fingerprint
        .map(|f| f[..f.len().min(8)].to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format a change report as human-readable text.
pub fn format_changes_text(report: &ChangeReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Design Changes")));

    if !report.has_changes() {
        out.push_str("  No changes since last sync.\n");
        return out;
    }

    out.push_str(&format!(
        "  Total: {} ({} added, {} modified, {} deleted)\n\n",
        report.total_changes, report.added, report.modified, report.deleted
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Node", "Change", "Old", "New", "Files"]);
    for change in &report.changes {
        table.add_row(vec![
            change.node_id.clone(),
            colored_change(change.change_type),
            short(change.old_fingerprint.as_ref()),
            short(change.new_fingerprint.as_ref()),
            change.affected_files.join(", "),
        ]);
    }
    out.push_str(&format!("{}\n", table));

    if !report.affected_files.is_empty() {
        out.push_str(&format!(
            "\n{}\n\n",
            format_section_heading("Affected files")
        ));
        for file in &report.affected_files {
            out.push_str(&format!("  {}\n", file));
        }
    }
    out
}

/// Format the sync snapshot summary as human-readable text.
pub fn format_sync_status_text(status: &SyncStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Sync Status")));
    out.push_str(&format!("  Sync file: {}\n", status.sync_file.display()));
    let last_sync = status
        .last_sync
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    out.push_str(&format!("  Last sync: {}\n", last_sync));
    out.push_str(&format!("  Tracked nodes: {}\n", status.tracked_nodes));

    if !status.nodes.is_empty() {
        out.push('\n');
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Node", "Name", "Generated file", "Assets"]);
        for node in &status.nodes {
            table.add_row(vec![
                node.node_id.clone(),
                node.name.clone(),
                node.generated_file.clone(),
                node.asset_count.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{ChangeRecord, TrackedNode};
    use std::path::PathBuf;

    #[test]
    fn test_no_changes_message() {
        let text = format_changes_text(&ChangeReport::from_changes(Vec::new()));
        assert!(text.contains("No changes since last sync."));
    }

    #[test]
    fn test_changes_list_files() {
        let report = ChangeReport::from_changes(vec![ChangeRecord {
            node_id: "9:9".to_string(),
            change_type: ChangeType::Deleted,
            old_fingerprint: Some("0123456789abcdef".to_string()),
            new_fingerprint: None,
            affected_files: vec!["Logo.tsx".to_string()],
        }]);
        let text = format_changes_text(&report);
        assert!(text.contains("9:9"));
        assert!(text.contains("01234567"));
        assert!(text.contains("Logo.tsx"));
        assert!(text.contains("1 deleted"));
    }

    #[test]
    fn test_sync_status_never_synced() {
        let status = SyncStatus {
            sync_file: PathBuf::from(".aiwork/figma-sync.json"),
            last_sync: None,
            tracked_nodes: 0,
            nodes: Vec::<TrackedNode>::new(),
        };
        let text = format_sync_status_text(&status);
        assert!(text.contains("Last sync: never"));
        assert!(text.contains("Tracked nodes: 0"));
    }
}
