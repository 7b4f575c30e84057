//! Shared data model for the screenshot manifest.
//!
//! [`ScreenshotEntry`] is the intermediate shape built while scanning: one per
//! logical screenshot, with every discovered variant attached. [`ScreenshotAsset`]
//! is the flattened, render-ready projection handed to page rendering and
//! serialized into `screenshots.json`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse gallery category, one tab per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotGroup {
    Pagespeed,
    Public,
    Admin,
    Mobile,
}

impl ScreenshotGroup {
    /// All groups in display order.
    pub const ALL: [ScreenshotGroup; 4] = [
        ScreenshotGroup::Pagespeed,
        ScreenshotGroup::Public,
        ScreenshotGroup::Admin,
        ScreenshotGroup::Mobile,
    ];

    /// Classify an entry id by substring.
    ///
    /// Precedence is `pagespeed`, then `mobile`, then `admin`; anything else is
    /// `public`. Mobile is tested before admin, so `mmh-admin-dashboardmobile`
    /// lands in the mobile tab.
    pub fn classify(id: &str) -> Self {
        let lower = id.to_lowercase();
        if lower.contains("pagespeed") {
            ScreenshotGroup::Pagespeed
        } else if lower.contains("mobile") {
            ScreenshotGroup::Mobile
        } else if lower.contains("admin") {
            ScreenshotGroup::Admin
        } else {
            ScreenshotGroup::Public
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenshotGroup::Pagespeed => "pagespeed",
            ScreenshotGroup::Public => "public",
            ScreenshotGroup::Admin => "admin",
            ScreenshotGroup::Mobile => "mobile",
        }
    }
}

impl fmt::Display for ScreenshotGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per [`ScreenshotGroup`], always holding all four.
///
/// Serializes as an object keyed by group name in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct GroupMap<T> {
    pub pagespeed: T,
    pub public: T,
    pub admin: T,
    pub mobile: T,
}

impl<T> GroupMap<T> {
    pub fn get(&self, group: ScreenshotGroup) -> &T {
        match group {
            ScreenshotGroup::Pagespeed => &self.pagespeed,
            ScreenshotGroup::Public => &self.public,
            ScreenshotGroup::Admin => &self.admin,
            ScreenshotGroup::Mobile => &self.mobile,
        }
    }

    pub fn get_mut(&mut self, group: ScreenshotGroup) -> &mut T {
        match group {
            ScreenshotGroup::Pagespeed => &mut self.pagespeed,
            ScreenshotGroup::Public => &mut self.public,
            ScreenshotGroup::Admin => &mut self.admin,
            ScreenshotGroup::Mobile => &mut self.mobile,
        }
    }

    /// Iterate `(group, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ScreenshotGroup, &T)> {
        ScreenshotGroup::ALL.into_iter().map(move |g| (g, self.get(g)))
    }
}

/// Image encodings the builder recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Webp,
}

impl ImageFormat {
    /// Parse a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("png") {
            Some(ImageFormat::Png)
        } else if ext.eq_ignore_ascii_case("webp") {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single concrete image file: one width of one format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub width: u32,
    pub src: String,
}

/// Discovered variants of an entry, partitioned by format.
///
/// Lists keep enumeration order; sorting by width happens at assembly time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variants {
    pub png: Vec<Variant>,
    pub webp: Vec<Variant>,
}

impl Variants {
    pub fn get(&self, format: ImageFormat) -> &[Variant] {
        match format {
            ImageFormat::Png => &self.png,
            ImageFormat::Webp => &self.webp,
        }
    }

    pub fn push(&mut self, format: ImageFormat, variant: Variant) {
        match format {
            ImageFormat::Png => self.png.push(variant),
            ImageFormat::Webp => self.webp.push(variant),
        }
    }
}

/// Intermediate per-screenshot record, built during directory discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotEntry {
    /// Base filename as found on disk, e.g. `mmh-admin-dashboard`.
    pub id: String,
    pub caption: String,
    pub technical_note: Option<String>,
    pub group: ScreenshotGroup,
    pub variants: Variants,
}

/// Render-ready screenshot: caption, note and responsive source sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotAsset {
    pub id: String,
    pub group: ScreenshotGroup,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_note: Option<String>,
    /// `"<src> <width>w"` pairs, width ascending. Empty when no WebP exists.
    pub webp_src_set: String,
    /// Same as `webp_src_set` for PNG.
    pub png_src_set: String,
    /// Single best image for consumers without responsive support, or empty.
    pub fallback_src: String,
    /// Width of `fallback_src`, `0` when there is none.
    pub fallback_width: u32,
}
