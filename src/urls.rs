//! URL construction for served screenshots and PageSpeed reports.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PAGESPEED_REPORT: &str = "https://pagespeed.web.dev/report?url=";

/// Percent-encode a single path segment or query value.
pub fn encode_component(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// Build the servable source path for a file below the screenshot directory.
///
/// `relative_path` may use `/` or `\` separators. Empty segments are dropped
/// and every remaining segment is encoded on its own, so directory names with
/// spaces survive as `%20` while the separators stay literal.
///
/// ```text
/// public_src("/case-studies/mmh", "before after/mmh-home-600.png")
///   → "/case-studies/mmh/before%20after/mmh-home-600.png"
/// ```
pub fn public_src(base: &str, relative_path: &str) -> String {
    let path = relative_path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Link to a fresh PageSpeed Insights run for `target_url`.
pub fn pagespeed_report_url(target_url: &str) -> String {
    format!("{}{}", PAGESPEED_REPORT, encode_component(target_url))
}
