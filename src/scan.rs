//! Screenshot directory discovery.
//!
//! Walks the public screenshot directory of one case study and turns matching
//! image files into [`ScreenshotEntry`] values. The directory is scanned
//! recursively with no depth limit; nesting is only used for organisation and
//! carries over into the served path:
//!
//! ```text
//! public/case-studies/mmh/                        # public_screenshot_dir
//! ├── mmh-admin-dashboard-600.png                 # → /case-studies/mmh/mmh-admin-dashboard-600.png
//! ├── mmh-admin-dashboard-1200.png
//! ├── mmh-admin-dashboard-1200.webp
//! ├── pagespeed/
//! │   └── mmh-pagespeed-desktopbefore-1800.webp   # → /case-studies/mmh/pagespeed/mmh-pagespeed-…
//! └── notes.txt                                   # not a variant, ignored
//! ```
//!
//! ## Entries
//!
//! Variants are grouped by their lowercased base name. The first file seen
//! for a base decides the entry's display id, group, caption and technical
//! note; later files only add variants. Directories are visited in file-name
//! order so that "first" is the same on every platform.
//!
//! An image with no caption block still produces an entry, captioned
//! [`PLACEHOLDER_CAPTION`]. Captions without images are not this module's
//! concern: they simply never match a file.

use crate::captions::BlockMap;
use crate::manifest::LoaderConfig;
use crate::naming::parse_variant_name;
use crate::types::{ScreenshotEntry, ScreenshotGroup, Variant, Variants};
use crate::urls::public_src;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Caption shown for a screenshot nobody has written a caption for yet.
pub const PLACEHOLDER_CAPTION: &str = "[caption needed]";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Screenshot directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
}

/// List every non-directory entry below `dir`, recursively.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Path of `file` relative to `dir`, always with `/` separators.
fn relative_path(dir: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(dir).ok()?;
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(segments.join("/"))
}

/// Group variant files into entries keyed by lowercased base id.
pub fn collect_entries(
    config: &LoaderConfig,
    files: &[PathBuf],
    captions: &BlockMap,
    notes: &BlockMap,
) -> BTreeMap<String, ScreenshotEntry> {
    let dir = config.public_screenshot_dir.as_path();
    let mut entries: BTreeMap<String, ScreenshotEntry> = BTreeMap::new();

    for file in files {
        let Some(file_name) = file.file_name().map(|n| n.to_string_lossy()) else {
            continue;
        };
        let Some(name) = parse_variant_name(&file_name, &config.id_prefix, &config.widths) else {
            log::debug!("ignoring {}: not a screenshot variant", file.display());
            continue;
        };
        let Some(rel) = relative_path(dir, file) else {
            continue;
        };

        let entry = entries.entry(name.key()).or_insert_with(|| ScreenshotEntry {
            caption: captions
                .lookup(&name.base)
                .unwrap_or(PLACEHOLDER_CAPTION)
                .to_string(),
            technical_note: notes.lookup(&name.base).map(String::from),
            group: ScreenshotGroup::classify(&name.base),
            id: name.base.clone(),
            variants: Variants::default(),
        });

        entry.variants.push(
            name.format,
            Variant {
                width: name.width,
                src: public_src(&config.public_screenshot_base, &rel),
            },
        );
    }

    entries
}
