//! Gallery configuration module.
//!
//! Handles loading, validating, and layering `gallery.toml`. Stock defaults
//! are the base layer; the project's `gallery.toml` is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `gallery.toml` lives in the project root (`--source`). Every path inside it
//! is resolved relative to that root:
//!
//! ```text
//! site/
//! ├── gallery.toml
//! ├── content/case-studies/midway-music-hall/
//! │   ├── mmh-captions.md
//! │   └── mmh-technical-notes.md
//! └── public/case-studies/mmh/
//!     ├── mmh-admin-dashboard-600.png
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [images]
//! widths = [600, 1200, 1800]       # Widths a variant filename may carry
//! preferred_fallback_width = 1200  # PNG width used as <img src> when present
//!
//! [tabs.pagespeed]
//! label = "PageSpeed results"
//! description = ""
//!
//! [[case_studies]]
//! slug = "mmh"
//! title = "Midway Music Hall"
//! id_prefix = "mmh-"
//! caption_file = "content/case-studies/midway-music-hall/mmh-captions.md"
//! technical_notes_file = "content/case-studies/midway-music-hall/mmh-technical-notes.md"
//! screenshot_dir = "public/case-studies/mmh"
//! public_base = "/case-studies/mmh"
//! site_url = "https://midwaymusichall.net"   # optional, enables the PageSpeed link
//! summary_file = "content/mmh-summary.md"    # optional Markdown intro
//! default_tab = "pagespeed"                  # optional
//!
//! [case_studies.ordering]
//! admin = ["mmh-admin-dashboard", "mmh-admin-eventeditor"]
//!
//! [case_studies.tabs.admin]
//! description = "Operational tooling for staff."
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::manifest::LoaderConfig;
use crate::naming::DEFAULT_WIDTHS;
use crate::types::{GroupMap, ScreenshotGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Variant naming and fallback selection.
    pub images: ImagesConfig,
    /// Tab labels and descriptions shared by every case study.
    pub tabs: GroupMap<TabConfig>,
    pub case_studies: Vec<CaseStudyConfig>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            images: ImagesConfig::default(),
            tabs: default_tabs(),
            case_studies: Vec::new(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.widths.is_empty() {
            return Err(ConfigError::Validation(
                "images.widths must not be empty".into(),
            ));
        }
        if self.images.widths.contains(&0) {
            return Err(ConfigError::Validation(
                "images.widths values must be non-zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for study in &self.case_studies {
            if study.slug.is_empty() {
                return Err(ConfigError::Validation(
                    "case_studies.slug must not be empty".into(),
                ));
            }
            if study.slug.contains(['/', '\\']) || study.slug == "." || study.slug == ".." {
                return Err(ConfigError::Validation(format!(
                    "case study slug '{}' must be a plain directory name",
                    study.slug
                )));
            }
            if study.id_prefix.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "case study '{}': id_prefix must not be empty",
                    study.slug
                )));
            }
            if !seen.insert(study.slug.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate case study slug '{}'",
                    study.slug
                )));
            }
        }
        Ok(())
    }

    pub fn find_case_study(&self, slug: &str) -> Option<&CaseStudyConfig> {
        self.case_studies.iter().find(|s| s.slug == slug)
    }
}

/// Variant naming and fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Widths a variant filename may carry (`<id>-<width>.<ext>`).
    pub widths: Vec<u32>,
    /// PNG width preferred for the single fallback `<img src>`.
    pub preferred_fallback_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            widths: DEFAULT_WIDTHS.to_vec(),
            preferred_fallback_width: 1200,
        }
    }
}

/// Label and blurb shown for one gallery tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TabConfig {
    pub label: String,
    pub description: String,
}

impl TabConfig {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            description: String::new(),
        }
    }
}

/// Stock tab labels, no descriptions.
pub fn default_tabs() -> GroupMap<TabConfig> {
    GroupMap {
        pagespeed: TabConfig::new("PageSpeed results"),
        public: TabConfig::new("Public views"),
        admin: TabConfig::new("Admin views"),
        mobile: TabConfig::new("Mobile views"),
    }
}

/// Partial per-case-study tab override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TabOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One case study: where its captions and screenshots live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseStudyConfig {
    /// Output directory name and `--case-study` selector.
    pub slug: String,
    pub title: String,
    /// Prefix every screenshot id starts with, e.g. `mmh-`.
    pub id_prefix: String,
    pub caption_file: PathBuf,
    pub technical_notes_file: PathBuf,
    pub screenshot_dir: PathBuf,
    /// URL path `screenshot_dir` is served under.
    pub public_base: String,
    /// Live site, linked to a PageSpeed report from the pagespeed tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Markdown introduction rendered above the gallery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tab: Option<ScreenshotGroup>,
    /// Manual display order per group; omitted groups use caption order.
    #[serde(default)]
    pub ordering: GroupMap<Vec<String>>,
    #[serde(default)]
    pub tabs: GroupMap<TabOverride>,
}

impl CaseStudyConfig {
    /// Builder input for this case study, paths resolved against `root`.
    pub fn loader_config(&self, root: &Path, images: &ImagesConfig) -> LoaderConfig {
        LoaderConfig {
            caption_file: root.join(&self.caption_file),
            technical_notes_file: root.join(&self.technical_notes_file),
            public_screenshot_dir: root.join(&self.screenshot_dir),
            public_screenshot_base: self.public_base.clone(),
            id_prefix: self.id_prefix.clone(),
            manual_ordering: self.ordering.clone(),
            widths: images.widths.clone(),
            preferred_fallback_width: images.preferred_fallback_width,
        }
    }

    /// Site-wide tab config with this case study's overrides applied.
    pub fn resolved_tab(&self, shared: &GroupMap<TabConfig>, group: ScreenshotGroup) -> TabConfig {
        let base = shared.get(group);
        let over = self.tabs.get(group);
        TabConfig {
            label: over.label.clone().unwrap_or_else(|| base.label.clone()),
            description: over
                .description
                .clone()
                .unwrap_or_else(|| base.description.clone()),
        }
    }

    /// Read the Markdown summary, if one is configured.
    pub fn read_summary(&self, root: &Path) -> Result<Option<String>, ConfigError> {
        match &self.summary_file {
            Some(path) => Ok(Some(fs::read_to_string(root.join(path))?)),
            None => Ok(None),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `gallery.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `gallery.toml` from the project root on top of stock defaults.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `gallery.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Case Study Gallery Configuration
# ================================
# All settings are optional. Values shown below are the defaults.
# Paths are relative to the directory holding this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Screenshot variants
# ---------------------------------------------------------------------------
[images]
# Widths a variant filename may carry: <prefix><slug>-<width>.<png|webp>
widths = [600, 1200, 1800]

# PNG width used as the plain <img src>. Without it, the widest PNG is used,
# then the widest WebP.
preferred_fallback_width = 1200

# ---------------------------------------------------------------------------
# Gallery tabs (shared by all case studies, overridable per case study)
# ---------------------------------------------------------------------------
[tabs.pagespeed]
label = "PageSpeed results"
description = ""

[tabs.public]
label = "Public views"
description = ""

[tabs.admin]
label = "Admin views"
description = ""

[tabs.mobile]
label = "Mobile views"
description = ""

# ---------------------------------------------------------------------------
# Case studies (repeat the block for each one)
# ---------------------------------------------------------------------------
# [[case_studies]]
# slug = "mmh"
# title = "Midway Music Hall"
# id_prefix = "mmh-"
# caption_file = "content/case-studies/midway-music-hall/mmh-captions.md"
# technical_notes_file = "content/case-studies/midway-music-hall/mmh-technical-notes.md"
# screenshot_dir = "public/case-studies/mmh"
# public_base = "/case-studies/mmh"
# site_url = "https://example.com"
# summary_file = "content/case-studies/midway-music-hall/summary.md"
# default_tab = "pagespeed"
#
# [case_studies.ordering]
# pagespeed = ["mmh-pagespeed-desktopbefore", "mmh-pagespeed-desktopafter"]
#
# [case_studies.tabs.admin]
# description = "Operational tooling for staff."
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    const STUDY: &str = r#"
[[case_studies]]
slug = "trbg"
title = "Thunder Road Bar and Grill"
id_prefix = "trbg-"
caption_file = "docs/captions.md"
technical_notes_file = "docs/notes.md"
screenshot_dir = "public/case-studies/trbg"
public_base = "/case-studies/trbg"
"#;

    #[test]
    fn default_config_has_image_settings() {
        let config = GalleryConfig::default();
        assert_eq!(config.images.widths, vec![600, 1200, 1800]);
        assert_eq!(config.images.preferred_fallback_width, 1200);
        assert!(config.case_studies.is_empty());
    }

    #[test]
    fn default_tab_labels() {
        let config = GalleryConfig::default();
        assert_eq!(config.tabs.pagespeed.label, "PageSpeed results");
        assert_eq!(config.tabs.public.label, "Public views");
        assert_eq!(config.tabs.admin.label, "Admin views");
        assert_eq!(config.tabs.mobile.label, "Mobile views");
    }

    #[test]
    fn parse_case_study() {
        let config: GalleryConfig = toml::from_str(STUDY).unwrap();
        let study = &config.case_studies[0];
        assert_eq!(study.slug, "trbg");
        assert_eq!(study.id_prefix, "trbg-");
        assert_eq!(study.default_tab, None);
        assert!(study.ordering.public.is_empty());
    }

    #[test]
    fn parse_ordering_and_default_tab() {
        let toml = format!(
            r#"{STUDY}
default_tab = "admin"

[case_studies.ordering]
public = ["trbg-public-b", "trbg-public-a"]
"#
        );
        let config: GalleryConfig = toml::from_str(&toml).unwrap();
        let study = &config.case_studies[0];
        assert_eq!(study.default_tab, Some(ScreenshotGroup::Admin));
        assert_eq!(study.ordering.public, vec!["trbg-public-b", "trbg-public-a"]);
        assert!(study.ordering.admin.is_empty());
    }

    #[test]
    fn loader_config_resolves_paths() {
        let config: GalleryConfig = toml::from_str(STUDY).unwrap();
        let loader = config.case_studies[0].loader_config(Path::new("/site"), &config.images);
        assert_eq!(loader.caption_file, Path::new("/site/docs/captions.md"));
        assert_eq!(
            loader.public_screenshot_dir,
            Path::new("/site/public/case-studies/trbg")
        );
        assert_eq!(loader.public_screenshot_base, "/case-studies/trbg");
        assert_eq!(loader.widths, vec![600, 1200, 1800]);
    }

    #[test]
    fn tab_override_merges_with_shared() {
        let toml = format!(
            r#"{STUDY}
[case_studies.tabs.admin]
description = "Kitchen tools"
"#
        );
        let config: GalleryConfig = toml::from_str(&toml).unwrap();
        let study = &config.case_studies[0];
        let admin = study.resolved_tab(&config.tabs, ScreenshotGroup::Admin);
        assert_eq!(admin.label, "Admin views");
        assert_eq!(admin.description, "Kitchen tools");
        let public = study.resolved_tab(&config.tabs, ScreenshotGroup::Public);
        assert_eq!(public, config.tabs.public);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert!(config.case_studies.is_empty());
        assert_eq!(config.images.widths, vec![600, 1200, 1800]);
    }

    #[test]
    fn load_config_partial_tabs_keep_defaults() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            CONFIG_FILE,
            r#"
[tabs.admin]
description = "Staff tooling"
"#,
        );
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.tabs.admin.label, "Admin views");
        assert_eq!(config.tabs.admin.description, "Staff tooling");
        assert_eq!(config.tabs.mobile.label, "Mobile views");
    }

    #[test]
    fn load_config_reads_case_studies() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), CONFIG_FILE, STUDY);
        let config = load_config(tmp.path()).unwrap();
        assert!(config.find_case_study("trbg").is_some());
        assert!(config.find_case_study("mmh").is_none());
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), CONFIG_FILE, "this is not valid toml [[[");
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<GalleryConfig, _> = toml::from_str("[images]\nwidth = [600]\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_group_rejected() {
        let result: Result<GalleryConfig, _> = toml::from_str("[tabs.tablet]\nlabel = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_case_study_key_rejected() {
        let toml = format!("{STUDY}\nprefix = \"x\"\n");
        let result: Result<GalleryConfig, _> = toml::from_str(&toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_default_tab_rejected() {
        let toml = format!("{STUDY}\ndefault_tab = \"tablet\"\n");
        let result: Result<GalleryConfig, _> = toml::from_str(&toml);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(GalleryConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_widths_empty() {
        let mut config = GalleryConfig::default();
        config.images.widths = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_width_zero() {
        let mut config = GalleryConfig::default();
        config.images.widths = vec![0, 600];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("non-zero"));
    }

    #[test]
    fn validate_empty_prefix() {
        let mut config: GalleryConfig = toml::from_str(STUDY).unwrap();
        config.case_studies[0].id_prefix.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_duplicate_slug() {
        let toml = format!("{STUDY}{STUDY}");
        let config: GalleryConfig = toml::from_str(&toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn validate_slug_with_separator() {
        let mut config: GalleryConfig = toml::from_str(STUDY).unwrap();
        config.case_studies[0].slug = "../escape".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_slug_dot_segments() {
        for slug in [".", ".."] {
            let mut config: GalleryConfig = toml::from_str(STUDY).unwrap();
            config.case_studies[0].slug = slug.to_string();
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("plain directory name"), "{slug}: {err}");
        }
    }

    #[test]
    fn validate_slug_with_dots_inside_passes() {
        let mut config: GalleryConfig = toml::from_str(STUDY).unwrap();
        config.case_studies[0].slug = "trbg.v2".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), CONFIG_FILE, "[images]\nwidths = []\n");
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[images]\nwidths = [600]\npreferred_fallback_width = 1200\n").unwrap();
        let overlay: toml::Value = toml::from_str("[images]\npreferred_fallback_width = 600\n").unwrap();
        let merged = merge_toml(base, overlay);
        let images = merged.get("images").unwrap();
        assert_eq!(images.get("preferred_fallback_width").unwrap().as_integer(), Some(600));
        assert_eq!(images.get("widths").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("widths = [600, 1200, 1800]").unwrap();
        let overlay: toml::Value = toml::from_str("widths = [400]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("widths").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Summary and stock config
    // =========================================================================

    #[test]
    fn read_summary_from_root() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "docs/summary.md", "# Thunder Road\n");
        let mut config: GalleryConfig = toml::from_str(STUDY).unwrap();
        config.case_studies[0].summary_file = Some(PathBuf::from("docs/summary.md"));
        let summary = config.case_studies[0].read_summary(tmp.path()).unwrap();
        assert_eq!(summary.as_deref(), Some("# Thunder Road\n"));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.get("images").is_some());
        assert!(val.get("tabs").is_some());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.images.widths, vec![600, 1200, 1800]);
        assert_eq!(config.images.preferred_fallback_width, 1200);
        assert_eq!(config.tabs, default_tabs());
        assert!(config.case_studies.is_empty());
    }

    #[test]
    fn fixture_config_loads() {
        let tmp = crate::test_helpers::setup_fixtures();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.case_studies.len(), 1);
        assert_eq!(config.case_studies[0].slug, "trbg");
    }
}
