use std::fmt::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::{DauSummary, PercentChange, StatusChangeSummary};

const RULE_WIDTH: usize = 60;

/// Everything the analysis reports on the console, in text or JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub feature_name: String,
    pub cutoff_timestamp: i64,
    pub daily_active_users: DauSummary,
    pub status_changes: StatusChangeSummary,
    pub files: Vec<PathBuf>,
}

pub fn banner(feature_name: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "{rule}\nSHIPTIVITY ANALYTICS - {} FEATURE ANALYSIS\n{rule}",
        feature_name.to_uppercase()
    )
}

pub fn describe_change(change: PercentChange) -> String {
    match change {
        PercentChange::Computed(percent) => format!("{percent:+.1}%"),
        PercentChange::NoBaseline => "N/A (no baseline data)".to_string(),
    }
}

pub fn build_dau_summary(feature_name: &str, path: &Path, summary: &DauSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Daily Active Users Graph saved to {}", path.display());
    let _ = writeln!(
        output,
        "  - Before {}: {:.2} avg DAU ({} days)",
        feature_name, summary.before_mean, summary.before_days
    );
    let _ = writeln!(
        output,
        "  - After {}: {:.2} avg DAU ({} days)",
        feature_name, summary.after_mean, summary.after_days
    );
    let _ = writeln!(output, "  - Change: {}", describe_change(summary.change));

    output
}

pub fn build_status_summary(path: &Path, summary: &StatusChangeSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Status Changes Graph saved to {}", path.display());
    let _ = writeln!(
        output,
        "  - Total cards with status changes: {}",
        summary.items_with_changes
    );

    match &summary.most_active {
        Some(item) => {
            let _ = writeln!(
                output,
                "  - Most active card: Card {} ({} changes)",
                item.item_id, item.total_changes
            );
        }
        None => {
            let _ = writeln!(output, "  - Most active card: none recorded");
        }
    }

    match summary.mean_changes_per_item {
        Some(mean) => {
            let _ = writeln!(output, "  - Average changes per card: {mean:.2}");
        }
        None => {
            let _ = writeln!(output, "  - Average changes per card: N/A");
        }
    }

    output
}

/// Closing block printed once both charts are on disk.
pub fn build_footer(files: &[PathBuf]) -> String {
    let mut output = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(output, "{rule}");
    let _ = writeln!(output, "GRAPHS GENERATED SUCCESSFULLY!");
    let _ = writeln!(output, "{rule}");
    let _ = writeln!(output, "Files created:");
    for file in files {
        let _ = writeln!(output, "  - {}", file.display());
    }

    output
}
