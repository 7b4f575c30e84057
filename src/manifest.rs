//! The screenshot manifest builder.
//!
//! Correlates three loosely structured inputs for one case study into the
//! grouped, ordered gallery data the case-study page renders:
//!
//! ```text
//! captions.md ───────┐
//! technical-notes.md ├──▶ build_manifest ──▶ ScreenshotManifest
//! public/…/*.png|webp┘                         ├─ groups: pagespeed | public | admin | mobile
//!                                              └─ report: gaps found along the way
//! ```
//!
//! ## Pipeline
//!
//! 1. Parse captions (with per-group discovery order) and technical notes.
//! 2. Discover variant files and group them into entries ([`crate::scan`]).
//! 3. Flatten each entry into a [`ScreenshotAsset`]: WebP and PNG src-sets,
//!    width ascending, and a single fallback image.
//! 4. Bucket by group and order each bucket by its priority list.
//!
//! ## Fallback image
//!
//! PNG at the preferred width (1200 by default), else the widest PNG, else
//! the widest WebP, else nothing (`""` / `0`).
//!
//! ## Ordering
//!
//! A group's priority list is the case study's manual ordering when one is
//! configured for that group, otherwise the order ids first appear in the
//! captions file. Listed ids keep the list's order; everything else follows,
//! alphabetically.
//!
//! ## Gaps are not errors
//!
//! An image without a caption gets [`crate::scan::PLACEHOLDER_CAPTION`]; a caption without
//! an image is dropped. Both, plus duplicate `(id, format, width)` files, are
//! listed in the [`ValidationReport`] so a build step can warn about them.
//! Only unreadable inputs fail the build.
//!
//! Nothing is cached. Each call re-reads the disk and returns a fresh value.

use crate::captions::{self, BlockMap, CaptionIndex};
use crate::naming::DEFAULT_WIDTHS;
use crate::scan::{self, ScanError};
use crate::types::{GroupMap, ImageFormat, ScreenshotAsset, ScreenshotEntry, ScreenshotGroup, Variant};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

/// Width picked as fallback image when a PNG of that width exists.
pub const DEFAULT_FALLBACK_WIDTH: u32 = 1200;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Cannot read captions file {}: {source}", .path.display())]
    ReadCaptions {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot read technical notes file {}: {source}", .path.display())]
    ReadTechnicalNotes {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}

/// Everything the builder needs to know about one case study.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub caption_file: PathBuf,
    pub technical_notes_file: PathBuf,
    /// Directory scanned (recursively) for variant files.
    pub public_screenshot_dir: PathBuf,
    /// URL path the screenshot directory is served under, e.g. `/case-studies/mmh`.
    pub public_screenshot_base: String,
    /// Prefix every id starts with, e.g. `mmh-`.
    pub id_prefix: String,
    /// Per-group display order. An empty list means "use caption order".
    pub manual_ordering: GroupMap<Vec<String>>,
    pub widths: Vec<u32>,
    pub preferred_fallback_width: u32,
}

impl LoaderConfig {
    /// Config with default widths, fallback width and no manual ordering.
    pub fn new(
        caption_file: impl Into<PathBuf>,
        technical_notes_file: impl Into<PathBuf>,
        public_screenshot_dir: impl Into<PathBuf>,
        public_screenshot_base: impl Into<String>,
        id_prefix: impl Into<String>,
    ) -> Self {
        Self {
            caption_file: caption_file.into(),
            technical_notes_file: technical_notes_file.into(),
            public_screenshot_dir: public_screenshot_dir.into(),
            public_screenshot_base: public_screenshot_base.into(),
            id_prefix: id_prefix.into(),
            manual_ordering: GroupMap::default(),
            widths: DEFAULT_WIDTHS.to_vec(),
            preferred_fallback_width: DEFAULT_FALLBACK_WIDTH,
        }
    }

    pub fn with_manual_ordering(mut self, ordering: GroupMap<Vec<String>>) -> Self {
        self.manual_ordering = ordering;
        self
    }
}

/// A file that claims the same `(id, format, width)` as another.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateVariant {
    pub id: String,
    pub format: ImageFormat,
    pub width: u32,
    /// Every source claiming the slot, in enumeration order.
    pub sources: Vec<String>,
}

/// Data-completeness gaps found while building. Never affects the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Ids rendered with the placeholder caption.
    pub missing_captions: Vec<String>,
    /// Caption keys with no matching image.
    pub orphaned_captions: Vec<String>,
    /// Technical-note keys with no matching image.
    pub orphaned_technical_notes: Vec<String>,
    pub duplicate_variants: Vec<DuplicateVariant>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.missing_captions.is_empty()
            && self.orphaned_captions.is_empty()
            && self.orphaned_technical_notes.is_empty()
            && self.duplicate_variants.is_empty()
    }
}

/// Grouped gallery data for one case study.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenshotManifest {
    pub groups: GroupMap<Vec<ScreenshotAsset>>,
    pub report: ValidationReport,
}

impl ScreenshotManifest {
    pub fn group(&self, group: ScreenshotGroup) -> &[ScreenshotAsset] {
        self.groups.get(group)
    }

    /// Total number of screenshots across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reusable builder bound to one case study's configuration.
///
/// Holds no state besides the config: every [`load`](Self::load) reads the
/// inputs again, so edits to captions or images show up on the next call.
#[derive(Debug, Clone)]
pub struct ScreenshotLoader {
    config: LoaderConfig,
}

impl ScreenshotLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn load(&self) -> Result<ScreenshotManifest, ManifestError> {
        build_manifest(&self.config)
    }
}

/// Build the grouped manifest for one case study.
pub fn build_manifest(config: &LoaderConfig) -> Result<ScreenshotManifest, ManifestError> {
    let caption_index = captions::read_captions(&config.caption_file, &config.id_prefix)
        .map_err(|source| ManifestError::ReadCaptions {
            path: config.caption_file.clone(),
            source,
        })?;
    let notes = captions::read_technical_notes(&config.technical_notes_file, &config.id_prefix)
        .map_err(|source| ManifestError::ReadTechnicalNotes {
            path: config.technical_notes_file.clone(),
            source,
        })?;

    let files = scan::discover_files(&config.public_screenshot_dir)?;
    let entries = scan::collect_entries(config, &files, &caption_index.blocks, &notes);

    let report = validate(&entries, &caption_index.blocks, &notes);
    let groups = assemble(
        entries.values(),
        config.preferred_fallback_width,
        &priority_lists(config, &caption_index),
    );

    Ok(ScreenshotManifest { groups, report })
}

/// Effective priority list per group: manual override, else caption order.
fn priority_lists(config: &LoaderConfig, captions: &CaptionIndex) -> GroupMap<Vec<String>> {
    let mut lists = GroupMap::<Vec<String>>::default();
    for group in ScreenshotGroup::ALL {
        let manual = config.manual_ordering.get(group);
        *lists.get_mut(group) = if manual.is_empty() {
            captions.order_by_group.get(group).clone()
        } else {
            manual.clone()
        };
    }
    lists
}

/// Flatten entries into assets, bucket them and order each bucket.
fn assemble<'a>(
    entries: impl IntoIterator<Item = &'a ScreenshotEntry>,
    preferred_width: u32,
    priorities: &GroupMap<Vec<String>>,
) -> GroupMap<Vec<ScreenshotAsset>> {
    let mut groups = GroupMap::<Vec<ScreenshotAsset>>::default();
    for entry in entries {
        groups.get_mut(entry.group).push(to_asset(entry, preferred_width));
    }
    for group in ScreenshotGroup::ALL {
        sort_by_priority(groups.get_mut(group), priorities.get(group));
    }
    groups
}

fn to_asset(entry: &ScreenshotEntry, preferred_width: u32) -> ScreenshotAsset {
    let fallback = select_fallback(&entry.variants.png, &entry.variants.webp, preferred_width);
    ScreenshotAsset {
        id: entry.id.clone(),
        group: entry.group,
        caption: entry.caption.clone(),
        technical_note: entry.technical_note.clone(),
        webp_src_set: build_src_set(&entry.variants.webp),
        png_src_set: build_src_set(&entry.variants.png),
        fallback_src: fallback.map(|v| v.src.clone()).unwrap_or_default(),
        fallback_width: fallback.map(|v| v.width).unwrap_or(0),
    }
}

/// Variants sorted by width; equal widths keep enumeration order.
fn by_width(variants: &[Variant]) -> Vec<&Variant> {
    let mut sorted: Vec<&Variant> = variants.iter().collect();
    sorted.sort_by_key(|v| v.width);
    sorted
}

/// `"<src> <width>w"` pairs, width ascending, comma separated.
pub fn build_src_set(variants: &[Variant]) -> String {
    by_width(variants)
        .iter()
        .map(|v| format!("{} {}w", v.src, v.width))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pick the single image for consumers that can't use a src-set.
pub fn select_fallback<'a>(
    png: &'a [Variant],
    webp: &'a [Variant],
    preferred_width: u32,
) -> Option<&'a Variant> {
    let png = by_width(png);
    png.iter()
        .find(|v| v.width == preferred_width)
        .or_else(|| png.last())
        .copied()
        .or_else(|| by_width(webp).last().copied())
}

/// Order assets by `priority`; unlisted ids go last, alphabetically.
pub fn sort_by_priority(items: &mut [ScreenshotAsset], priority: &[String]) {
    let rank = |id: &str| priority.iter().position(|p| p == id);
    items.sort_by(|a, b| match (rank(&a.id), rank(&b.id)) {
        (Some(ia), Some(ib)) => ia.cmp(&ib),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .id
            .to_lowercase()
            .cmp(&b.id.to_lowercase())
            .then_with(|| a.id.cmp(&b.id)),
    });
}

fn validate(
    entries: &BTreeMap<String, ScreenshotEntry>,
    captions: &BlockMap,
    notes: &BlockMap,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for entry in entries.values() {
        if captions.lookup(&entry.id).is_none() {
            log::debug!("{}: no caption, using placeholder", entry.id);
            report.missing_captions.push(entry.id.clone());
        }
        for format in [ImageFormat::Png, ImageFormat::Webp] {
            let mut by_width: BTreeMap<u32, Vec<String>> = BTreeMap::new();
            for v in entry.variants.get(format) {
                by_width.entry(v.width).or_default().push(v.src.clone());
            }
            for (width, sources) in by_width {
                if sources.len() > 1 {
                    log::debug!("{}: {} files claim {} {}w", entry.id, sources.len(), format, width);
                    report.duplicate_variants.push(DuplicateVariant {
                        id: entry.id.clone(),
                        format,
                        width,
                        sources,
                    });
                }
            }
        }
    }

    let known: HashSet<&str> = entries.keys().map(String::as_str).collect();
    let orphans = |blocks: &BlockMap| -> Vec<String> {
        blocks
            .keys()
            .iter()
            .filter(|k| !known.contains(k.to_lowercase().as_str()))
            .cloned()
            .collect()
    };
    report.orphaned_captions = orphans(captions);
    report.orphaned_technical_notes = orphans(notes);
    for key in report
        .orphaned_captions
        .iter()
        .chain(&report.orphaned_technical_notes)
    {
        log::debug!("{key}: text block has no matching image");
    }

    report
}
