use std::collections::BTreeSet;

use colored::Colorize;
use humansize::BINARY;

use crate::core::TransferSummary;

/// Format byte counts in human-readable form (KiB, MiB, GiB)
pub fn format_size(size: u64) -> String {
    humansize::format_size(size, BINARY)
}

/// Collapse consecutive numbers into ranges: `E01-E03, E05`
pub fn format_number_ranges(numbers: &BTreeSet<u32>, prefix: &str) -> String {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for &n in numbers {
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == n => *end = n,
            _ => ranges.push((n, n)),
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| {
            if start == end {
                format!("{}{:02}", prefix, start)
            } else {
                format!("{}{:02}-{}{:02}", prefix, start, prefix, end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_episodes(episodes: &BTreeSet<u32>) -> String {
    format_number_ranges(episodes, "E")
}

pub fn format_seasons(seasons: &BTreeSet<u32>) -> String {
    format_number_ranges(seasons, "S")
}

/// One-line colored run summary
pub fn format_summary(summary: &TransferSummary) -> String {
    let failed = format!("{} failed", summary.failed);
    let mut line = format!(
        "{} total, {}, {}, {}",
        summary.total,
        format!("{} transferred", summary.transferred).green(),
        format!("{} skipped", summary.skipped).yellow(),
        if summary.failed > 0 {
            failed.red()
        } else {
            failed.normal()
        }
    );
    if summary.unrecorded > 0 {
        line.push_str(&format!(
            ", {}",
            format!("{} not in history", summary.unrecorded).yellow()
        ));
    }
    line
}
