//! Shared test utilities.
//!
//! Fixture builders for case-study directories and lookups into built
//! manifests. Lookups panic with the available ids on a miss so a failing
//! assertion says what *was* there.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::manifest::{LoaderConfig, ScreenshotManifest};
use crate::types::{ScreenshotAsset, ScreenshotGroup};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy the checked-in `fixtures/` project to a temp directory.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Create an empty file at `root/rel`. The scanner never reads image bytes.
pub fn touch(root: &Path, rel: &str) -> PathBuf {
    write_file(root, rel, "")
}

/// Create `<base>-<width>.<ext>` in `dir` for every width.
pub fn touch_variants(dir: &Path, base: &str, widths: &[u32], ext: &str) {
    for width in widths {
        touch(dir, &format!("{base}-{width}.{ext}"));
    }
}

/// Loader config pointing at `dir` for screenshots, with no caption files.
pub fn loader_config(dir: &Path, prefix: &str) -> LoaderConfig {
    LoaderConfig::new(
        dir.join("captions.md"),
        dir.join("notes.md"),
        dir,
        "/case-studies/test",
        prefix,
    )
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Ids of one group, in display order.
pub fn group_ids(manifest: &ScreenshotManifest, group: ScreenshotGroup) -> Vec<&str> {
    manifest
        .group(group)
        .iter()
        .map(|a| a.id.as_str())
        .collect()
}

/// Find an asset by id within a group. Panics if not found.
pub fn find_asset<'a>(
    manifest: &'a ScreenshotManifest,
    group: ScreenshotGroup,
    id: &str,
) -> &'a ScreenshotAsset {
    manifest
        .group(group)
        .iter()
        .find(|a| a.id == id)
        .unwrap_or_else(|| {
            let ids = group_ids(manifest, group);
            panic!("asset '{id}' not found in group '{group}'. Available: {ids:?}")
        })
}
