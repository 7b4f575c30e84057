//! HTML rendering of case-study galleries.
//!
//! Takes a built [`ScreenshotManifest`] and renders it as a tabbed gallery,
//! one tab per [`ScreenshotGroup`], either as a standalone case-study page or
//! as a fragment to drop into a host page.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── gallery.css                # Gallery styles, for host pages embedding the fragment
//! ├── mmh/
//! │   ├── index.html             # Case-study page (styles inlined)
//! │   └── screenshots.json       # The manifest the page was rendered from
//! └── trbg/
//!     └── ...
//! ```
//!
//! ## Tabs
//!
//! Tab switching needs no JavaScript: each tab is a hidden radio input
//! followed by a `<label role="tab">`, and `static/gallery.css` shows the panel
//! whose input is checked. Every responsive-aware image is a `<picture>`
//! carrying only the sources that exist, with the manifest's fallback image
//! as the plain `<img>`.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! captions and technical notes are always escaped. Only the Markdown summary
//! is inserted pre-rendered.

use crate::config::{CaseStudyConfig, TabConfig};
use crate::manifest::ScreenshotManifest;
use crate::types::{GroupMap, ScreenshotAsset, ScreenshotGroup};
use crate::urls::pagespeed_report_url;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const GALLERY_CSS: &str = include_str!("../static/gallery.css");

const EMPTY_TAB_TEXT: &str = "No screenshots are available for this view yet.";
const PICTURE_SIZES: &str = "(min-width: 1024px) 45vw, 90vw";

/// One gallery tab: a group's label, blurb and ordered screenshots.
#[derive(Debug, Clone)]
pub struct GalleryTab<'a> {
    pub group: ScreenshotGroup,
    pub label: String,
    pub description: String,
    pub items: &'a [ScreenshotAsset],
}

/// Build the four tabs in display order.
pub fn gallery_tabs<'a>(
    manifest: &'a ScreenshotManifest,
    tabs: &GroupMap<TabConfig>,
) -> Vec<GalleryTab<'a>> {
    tabs.iter()
        .map(|(group, tab)| GalleryTab {
            group,
            label: tab.label.clone(),
            description: tab.description.clone(),
            items: manifest.group(group),
        })
        .collect()
}

/// Tabs for one case study, with its per-tab overrides applied.
pub fn case_study_tabs<'a>(
    study: &CaseStudyConfig,
    manifest: &'a ScreenshotManifest,
    tabs: &GroupMap<TabConfig>,
) -> Vec<GalleryTab<'a>> {
    let mut resolved = tabs.clone();
    for group in ScreenshotGroup::ALL {
        *resolved.get_mut(group) = study.resolved_tab(tabs, group);
    }
    gallery_tabs(manifest, &resolved)
}

// ============================================================================
// Disk output
// ============================================================================

/// Write `<output>/<slug>/index.html` and `<output>/<slug>/screenshots.json`.
///
/// Returns the case study's output directory.
pub fn write_case_study(
    output_dir: &Path,
    study: &CaseStudyConfig,
    summary: Option<&str>,
    manifest: &ScreenshotManifest,
    tabs: &GroupMap<TabConfig>,
) -> Result<PathBuf, RenderError> {
    let study_dir = output_dir.join(&study.slug);
    fs::create_dir_all(&study_dir)?;

    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(study_dir.join("screenshots.json"), json)?;

    let page = render_case_study_page(study, summary, manifest, tabs, GALLERY_CSS);
    fs::write(study_dir.join("index.html"), page.into_string())?;
    log::debug!("wrote {}", study_dir.display());

    Ok(study_dir)
}

/// Write the shared stylesheet to `<output>/gallery.css`.
pub fn write_stylesheet(output_dir: &Path) -> Result<PathBuf, RenderError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("gallery.css");
    fs::write(&path, GALLERY_CSS)?;
    Ok(path)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders a full case-study page: title, summary, PageSpeed link, gallery.
pub fn render_case_study_page(
    study: &CaseStudyConfig,
    summary: Option<&str>,
    manifest: &ScreenshotManifest,
    tabs: &GroupMap<TabConfig>,
    css: &str,
) -> Markup {
    let gallery_tabs = case_study_tabs(study, manifest, tabs);
    let gallery_name = format!("gallery-{}", study.slug);

    let content = html! {
        main.case-study {
            header.case-study-header {
                h1 { (study.title) }
                @if let Some(url) = &study.site_url {
                    p.pagespeed-link {
                        a href=(pagespeed_report_url(url)) target="_blank" rel="noopener noreferrer" {
                            "PageSpeed live check ↗"
                        }
                    }
                }
            }
            @if let Some(markdown) = summary {
                section.case-study-summary {
                    (render_markdown(markdown))
                }
            }
            section.case-study-gallery {
                (render_gallery(&gallery_tabs, study.default_tab, &gallery_name))
            }
        }
    };

    base_document(&study.title, css, content)
}

fn render_markdown(markdown: &str) -> Markup {
    let parser = Parser::new(markdown);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    PreEscaped(body_html)
}

/// Renders the tab switcher. `name` must be unique per page.
///
/// An unknown or missing `default_tab` selects the first tab; no tabs renders
/// nothing.
pub fn render_gallery(
    tabs: &[GalleryTab<'_>],
    default_tab: Option<ScreenshotGroup>,
    name: &str,
) -> Markup {
    let Some(first) = tabs.first() else {
        return html! {};
    };
    let active = default_tab
        .filter(|g| tabs.iter().any(|t| t.group == *g))
        .unwrap_or(first.group);

    html! {
        div.screenshot-tabs {
            @for tab in tabs {
                input.tab-toggle type="radio" name=(name) id=(tab_id(name, tab.group))
                    checked[tab.group == active];
            }
            div.tab-list role="tablist" aria-label="Screenshot categories" {
                @for tab in tabs {
                    label.tab
                        for=(tab_id(name, tab.group))
                        id=(format!("{}-label", tab_id(name, tab.group)))
                        role="tab"
                        aria-controls=(format!("{}-panel", tab_id(name, tab.group))) {
                        (tab.label)
                    }
                }
            }
            div.tab-panels {
                @for tab in tabs {
                    (render_panel(tab, name))
                }
            }
        }
    }
}

fn tab_id(name: &str, group: ScreenshotGroup) -> String {
    format!("{name}-{group}")
}

fn render_panel(tab: &GalleryTab<'_>, name: &str) -> Markup {
    let id = tab_id(name, tab.group);
    html! {
        section.tab-panel
            id=(format!("{id}-panel"))
            role="tabpanel"
            aria-labelledby=(format!("{id}-label"))
            data-group=(tab.group.as_str()) {
            @if !tab.description.is_empty() {
                p.tab-description { (tab.description) }
            }
            @if tab.items.is_empty() {
                p.tab-empty { (EMPTY_TAB_TEXT) }
            } @else {
                div.screenshot-grid {
                    @for item in tab.items {
                        (render_screenshot(item))
                    }
                }
            }
        }
    }
}

/// Renders one screenshot as a figure with a responsive picture.
pub fn render_screenshot(item: &ScreenshotAsset) -> Markup {
    html! {
        figure.screenshot id=(item.id) {
            picture {
                @if !item.webp_src_set.is_empty() {
                    source type="image/webp" srcset=(item.webp_src_set) sizes=(PICTURE_SIZES);
                }
                @if !item.png_src_set.is_empty() {
                    source type="image/png" srcset=(item.png_src_set) sizes=(PICTURE_SIZES);
                }
                img src=(item.fallback_src) alt=(item.caption) loading="lazy";
            }
            figcaption {
                p { (item.caption) }
                @if let Some(note) = &item.technical_note {
                    details.technical-note {
                        summary { "Technical note" }
                        p { (note) }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GalleryConfig, default_tabs};
    use crate::manifest::ValidationReport;

    fn asset(id: &str, group: ScreenshotGroup) -> ScreenshotAsset {
        ScreenshotAsset {
            id: id.to_string(),
            group,
            caption: format!("Caption for {id}"),
            technical_note: None,
            webp_src_set: String::new(),
            png_src_set: format!("/shots/{id}-1200.png 1200w"),
            fallback_src: format!("/shots/{id}-1200.png"),
            fallback_width: 1200,
        }
    }

    fn manifest(items: Vec<ScreenshotAsset>) -> ScreenshotManifest {
        let mut groups = GroupMap::<Vec<ScreenshotAsset>>::default();
        for item in items {
            groups.get_mut(item.group).push(item);
        }
        ScreenshotManifest {
            groups,
            report: ValidationReport::default(),
        }
    }

    fn study() -> CaseStudyConfig {
        let config: GalleryConfig = toml::from_str(
            r#"
[[case_studies]]
slug = "mmh"
title = "Midway Music Hall"
id_prefix = "mmh-"
caption_file = "captions.md"
technical_notes_file = "notes.md"
screenshot_dir = "shots"
public_base = "/case-studies/mmh"
"#,
        )
        .unwrap();
        config.case_studies[0].clone()
    }

    #[test]
    fn tabs_in_display_order_with_labels() {
        let m = manifest(vec![asset("mmh-admin-a", ScreenshotGroup::Admin)]);
        let tabs = gallery_tabs(&m, &default_tabs());
        let labels: Vec<_> = tabs.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["PageSpeed results", "Public views", "Admin views", "Mobile views"]
        );
        assert_eq!(tabs[2].items.len(), 1);
    }

    #[test]
    fn case_study_overrides_apply() {
        let mut study = study();
        study.tabs.mobile.label = Some("Phones".to_string());
        let m = manifest(vec![]);
        let tabs = case_study_tabs(&study, &m, &default_tabs());
        assert_eq!(tabs[3].label, "Phones");
        assert_eq!(tabs[0].label, "PageSpeed results");
    }

    #[test]
    fn no_tabs_renders_nothing() {
        let html = render_gallery(&[], None, "g").into_string();
        assert!(html.is_empty());
    }

    #[test]
    fn default_tab_checked() {
        let m = manifest(vec![]);
        let tabs = gallery_tabs(&m, &default_tabs());
        let html = render_gallery(&tabs, Some(ScreenshotGroup::Admin), "g").into_string();
        assert!(html.contains(r#"id="g-admin" checked"#));
        assert!(!html.contains(r#"id="g-pagespeed" checked"#));
    }

    #[test]
    fn unknown_default_tab_falls_back_to_first() {
        let m = manifest(vec![]);
        let tabs: Vec<_> = gallery_tabs(&m, &default_tabs())
            .into_iter()
            .filter(|t| t.group != ScreenshotGroup::Mobile)
            .collect();
        let html = render_gallery(&tabs, Some(ScreenshotGroup::Mobile), "g").into_string();
        assert!(html.contains(r#"id="g-pagespeed" checked"#));
        assert!(!html.contains("g-mobile"));
    }

    #[test]
    fn tabs_have_aria_roles() {
        let m = manifest(vec![]);
        let html = render_gallery(&gallery_tabs(&m, &default_tabs()), None, "g").into_string();
        assert!(html.contains(r#"role="tablist""#));
        assert!(html.contains(r#"role="tab""#));
        assert!(html.contains(r#"role="tabpanel""#));
        assert!(html.contains(r#"aria-controls="g-public-panel""#));
    }

    #[test]
    fn empty_group_shows_message() {
        let m = manifest(vec![asset("mmh-public-home", ScreenshotGroup::Public)]);
        let html = render_gallery(&gallery_tabs(&m, &default_tabs()), None, "g").into_string();
        assert_eq!(html.matches(EMPTY_TAB_TEXT).count(), 3);
    }

    #[test]
    fn picture_sources_only_when_present() {
        let mut item = asset("mmh-pagespeed-desktop", ScreenshotGroup::Pagespeed);
        item.png_src_set.clear();
        item.webp_src_set = "/shots/mmh-pagespeed-desktop-1800.webp 1800w".to_string();
        let html = render_screenshot(&item).into_string();
        assert!(html.contains(r#"type="image/webp""#));
        assert!(!html.contains(r#"type="image/png""#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains(r#"alt="Caption for mmh-pagespeed-desktop""#));
    }

    #[test]
    fn technical_note_in_details() {
        let mut item = asset("mmh-admin-auditlog", ScreenshotGroup::Admin);
        let without = render_screenshot(&item).into_string();
        assert!(!without.contains("<details"));

        item.technical_note = Some("Append-only table.".to_string());
        let html = render_screenshot(&item).into_string();
        assert!(html.contains("<summary>Technical note</summary>"));
        assert!(html.contains("Append-only table."));
    }

    #[test]
    fn captions_are_escaped() {
        let mut item = asset("mmh-public-home", ScreenshotGroup::Public);
        item.caption = "<script>alert(1)</script>".to_string();
        let html = render_screenshot(&item).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn page_includes_summary_and_pagespeed_link() {
        let mut study = study();
        study.site_url = Some("https://midwaymusichall.net".to_string());
        let m = manifest(vec![]);
        let html = render_case_study_page(
            &study,
            Some("Built for **Midway**."),
            &m,
            &default_tabs(),
            "body {}",
        )
        .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Midway Music Hall</title>"));
        assert!(html.contains("<strong>Midway</strong>"));
        assert!(html.contains(
            "https://pagespeed.web.dev/report?url=https%3A%2F%2Fmidwaymusichall.net"
        ));
        assert!(html.contains(r#"name="gallery-mmh""#));
    }

    #[test]
    fn page_without_site_url_has_no_pagespeed_link() {
        let m = manifest(vec![]);
        let html = render_case_study_page(&study(), None, &m, &default_tabs(), "").into_string();
        assert!(!html.contains("pagespeed.web.dev"));
        assert!(!html.contains("case-study-summary"));
    }

    #[test]
    fn write_case_study_outputs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let m = manifest(vec![asset("mmh-public-home", ScreenshotGroup::Public)]);
        let dir = write_case_study(tmp.path(), &study(), None, &m, &default_tabs()).unwrap();

        assert_eq!(dir, tmp.path().join("mmh"));
        let json = fs::read_to_string(dir.join("screenshots.json")).unwrap();
        assert!(json.contains("\"fallbackSrc\""));
        assert!(dir.join("index.html").exists());

        let css = write_stylesheet(tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(css).unwrap(), GALLERY_CSS);
    }
}
