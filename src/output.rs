//! CLI output formatting for the gallery commands.
//!
//! # Information-First Display
//!
//! Every case study leads with its positional index and title; the
//! screenshot directory and written files are indented context lines. Within
//! a case study, screenshots are listed per group in display order, so the
//! output reads like the gallery it describes.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! 001 Midway Music Hall (12 screenshots)
//!     Source: public/case-studies/mmh
//!     pagespeed 4, public 3, admin 4, mobile 1
//!     → mmh/index.html
//!     → mmh/screenshots.json
//!
//! Built 2 case studies, 21 screenshots
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 Midway Music Hall (12 screenshots)
//!     Source: public/case-studies/mmh
//!     pagespeed
//!         001 mmh-pagespeed-desktopbefore
//!             Caption: Desktop score before the rebuild.
//!             Fallback: /case-studies/mmh/mmh-pagespeed-desktopbefore-1800.webp (1800w)
//!     Missing captions
//!         mmh-public-home
//!     2 issues
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::CaseStudyConfig;
use crate::manifest::{ScreenshotManifest, ValidationReport};
use crate::scan::PLACEHOLDER_CAPTION;
use crate::types::ScreenshotAsset;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a case-study header: positional index + title + screenshot count.
///
/// ```text
/// 001 Midway Music Hall (12 screenshots)
/// ```
fn entity_header(index: usize, title: &str, count: usize) -> String {
    let noun = if count == 1 { "screenshot" } else { "screenshots" };
    format!("{} {} ({} {})", format_index(index), title, count, noun)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn source_line(study: &CaseStudyConfig) -> String {
    format!("{}Source: {}", indent(1), study.screenshot_dir.display())
}

/// Per-group counts on one line, in display order.
fn group_counts(manifest: &ScreenshotManifest) -> String {
    manifest
        .groups
        .iter()
        .map(|(group, items)| format!("{} {}", group, items.len()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Number of individual findings in a report.
fn issue_count(report: &ValidationReport) -> usize {
    report.missing_captions.len()
        + report.orphaned_captions.len()
        + report.orphaned_technical_notes.len()
        + report.duplicate_variants.len()
}

// ============================================================================
// Build output
// ============================================================================

/// Format one built case study with the files written for it.
pub fn format_build_output(
    index: usize,
    study: &CaseStudyConfig,
    manifest: &ScreenshotManifest,
) -> Vec<String> {
    vec![
        entity_header(index, &study.title, manifest.len()),
        source_line(study),
        format!("{}{}", indent(1), group_counts(manifest)),
        format!("{}→ {}/index.html", indent(1), study.slug),
        format!("{}→ {}/screenshots.json", indent(1), study.slug),
    ]
}

/// Closing line of a build.
pub fn format_build_summary(studies: usize, screenshots: usize, output_dir: &Path) -> Vec<String> {
    let noun = if studies == 1 { "case study" } else { "case studies" };
    vec![
        String::new(),
        format!("Built {studies} {noun}, {screenshots} screenshots"),
        format!("Output: {}", output_dir.display()),
    ]
}

pub fn print_build_output(index: usize, study: &CaseStudyConfig, manifest: &ScreenshotManifest) {
    for line in format_build_output(index, study, manifest) {
        println!("{}", line);
    }
}

pub fn print_build_summary(studies: usize, screenshots: usize, output_dir: &Path) {
    for line in format_build_summary(studies, screenshots, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

fn asset_lines(position: usize, asset: &ScreenshotAsset) -> Vec<String> {
    let mut lines = vec![format!("{}{} {}", indent(2), format_index(position), asset.id)];
    if asset.caption == PLACEHOLDER_CAPTION {
        lines.push(format!("{}Caption: (missing)", indent(3)));
    } else {
        lines.push(format!("{}Caption: {}", indent(3), truncate_desc(&asset.caption, 60)));
    }
    if asset.technical_note.is_some() {
        lines.push(format!("{}Technical note: yes", indent(3)));
    }
    lines.push(format!(
        "{}Fallback: {} ({}w)",
        indent(3),
        asset.fallback_src,
        asset.fallback_width
    ));
    lines
}

/// Format the validation report, one section per non-empty finding list.
pub fn format_report(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();
    let sections: [(&str, &[String]); 3] = [
        ("Missing captions", &report.missing_captions),
        ("Orphaned captions", &report.orphaned_captions),
        ("Orphaned technical notes", &report.orphaned_technical_notes),
    ];
    for (title, ids) in sections {
        if ids.is_empty() {
            continue;
        }
        lines.push(format!("{}{}", indent(1), title));
        for id in ids {
            lines.push(format!("{}{}", indent(2), id));
        }
    }

    if !report.duplicate_variants.is_empty() {
        lines.push(format!("{}Duplicate variants", indent(1)));
        for dup in &report.duplicate_variants {
            lines.push(format!("{}{} {} {}w", indent(2), dup.id, dup.format, dup.width));
            for src in &dup.sources {
                lines.push(format!("{}Source: {}", indent(3), src));
            }
        }
    }

    let issues = issue_count(report);
    lines.push(match issues {
        0 => format!("{}OK", indent(1)),
        1 => format!("{}1 issue", indent(1)),
        n => format!("{}{} issues", indent(1), n),
    });
    lines
}

/// Format one case study's contents and its validation report.
pub fn format_check_output(
    index: usize,
    study: &CaseStudyConfig,
    manifest: &ScreenshotManifest,
) -> Vec<String> {
    let mut lines = vec![
        entity_header(index, &study.title, manifest.len()),
        source_line(study),
    ];
    for (group, items) in manifest.groups.iter() {
        if items.is_empty() {
            continue;
        }
        lines.push(format!("{}{}", indent(1), group));
        for (i, asset) in items.iter().enumerate() {
            lines.extend(asset_lines(i + 1, asset));
        }
    }
    lines.extend(format_report(&manifest.report));
    lines
}

pub fn print_check_output(index: usize, study: &CaseStudyConfig, manifest: &ScreenshotManifest) {
    for line in format_check_output(index, study, manifest) {
        println!("{}", line);
    }
}
