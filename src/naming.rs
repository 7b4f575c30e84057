//! Filename parsing for the screenshot variant convention.
//!
//! Every screenshot is exported at several widths and in two formats. Each
//! file carries its identity in the name:
//!
//! ```text
//! <prefix><slug>-<width>.<ext>
//!
//! mmh-admin-dashboard-1200.png   → base "mmh-admin-dashboard", 1200, png
//! trbg-public-menu-600.webp      → base "trbg-public-menu",     600, webp
//! ```
//!
//! The slug is ASCII letters, digits and dashes. Width must be one of the
//! configured widths (`600`, `1200`, `1800` by default) written without
//! padding. Prefix, slug and extension compare case-insensitively; the base
//! keeps the case found on disk so it can serve as the display id.
//!
//! Anything else is not a screenshot variant and is ignored by the scanner.

use crate::types::ImageFormat;

/// Widths exported for every screenshot unless configured otherwise.
pub const DEFAULT_WIDTHS: [u32; 3] = [600, 1200, 1800];

/// Result of parsing a variant filename like `mmh-admin-dashboard-1200.png`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantName {
    /// `<prefix><slug>` exactly as written in the filename.
    pub base: String,
    pub width: u32,
    pub format: ImageFormat,
}

impl VariantName {
    /// Grouping key: variants of the same screenshot share the lowercased base.
    pub fn key(&self) -> String {
        self.base.to_lowercase()
    }
}

/// Parse a filename against the `<prefix><slug>-<width>.<ext>` convention.
///
/// Returns `None` for anything that doesn't match exactly:
/// - `"mmh-admin-dashboard-1200.png"` → base="mmh-admin-dashboard", width=1200, png
/// - `"MMH-Admin-Dashboard-600.WEBP"` → base="MMH-Admin-Dashboard", width=600, webp
/// - `"mmh-admin-dashboard-800.png"` → None (width not in set)
/// - `"mmh-admin-dashboard.png"` → None (no width)
/// - `"other-dashboard-1200.png"` → None (wrong prefix)
/// - `"mmh-admin_dashboard-1200.png"` → None (underscore in slug)
pub fn parse_variant_name(file_name: &str, id_prefix: &str, widths: &[u32]) -> Option<VariantName> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let format = ImageFormat::from_extension(ext)?;

    let (base, width_str) = stem.rsplit_once('-')?;
    let width: u32 = width_str.parse().ok()?;
    // Reject "0600" and "+600": the digits must be the canonical spelling
    if !widths.contains(&width) || width.to_string() != width_str {
        return None;
    }

    let head = base.get(..id_prefix.len())?;
    if !head.eq_ignore_ascii_case(id_prefix) {
        return None;
    }
    let slug = &base[id_prefix.len()..];
    if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }

    Some(VariantName {
        base: base.to_string(),
        width,
        format,
    })
}
