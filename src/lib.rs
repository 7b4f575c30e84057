//! # Case Study Gallery
//!
//! Builds the screenshot galleries shown on case-study pages. Each case study
//! has two hand-written Markdown files (captions and technical notes) and a
//! directory of screenshots exported at a few widths in PNG and WebP. This
//! crate matches them up and produces ordered, grouped gallery data, then
//! renders it as a tabbed HTML gallery.
//!
//! # Architecture
//!
//! ```text
//! gallery.toml ──▶ config ──▶ LoaderConfig (one per case study)
//!                                  │
//!     captions.md ──▶ captions ────┤
//!     notes.md ─────▶ captions ────┼──▶ manifest ──▶ ScreenshotManifest ──▶ render ──▶ dist/
//!     public/…/ ────▶ scan/naming ─┘                        │
//!                                                           └──▶ screenshots.json
//! ```
//!
//! The builder in [`manifest`] is the core: a pure function of two text files
//! and one directory tree. Nothing is cached; every call re-reads the disk.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared data model: groups, formats, variants, entries and render-ready assets |
//! | [`naming`] | `<prefix><slug>-<width>.<png\|webp>` filename parser |
//! | [`captions`] | Block parser for the captions and technical-notes files |
//! | [`scan`] | Recursive screenshot discovery, grouping variants into entries |
//! | [`urls`] | Servable image paths and PageSpeed report links |
//! | [`manifest`] | The manifest builder: src-sets, fallback images, ordering, validation report |
//! | [`config`] | `gallery.toml` loading, validation and stock defaults |
//! | [`render`] | Tabbed gallery and case-study page HTML using Maud |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Gaps Are Not Errors
//!
//! Screenshots get added before their captions are written, and captions
//! outlive screenshots that were removed. A missing caption renders as
//! `[caption needed]` and an orphaned caption is dropped; both show up in the
//! [`manifest::ValidationReport`] so `check` can flag them. Only unreadable
//! inputs stop a build.
//!
//! ## Filenames Carry the Structure
//!
//! Group, width and format all come from the filename. There is no sidecar
//! metadata and no image decoding: the scanner never opens an image file.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Captions are
//! free text written by people, and Maud escapes every interpolation, so a
//! stray `<` in a caption can't break the page.

pub mod captions;
pub mod config;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod types;
pub mod urls;

#[cfg(test)]
pub(crate) mod test_helpers;
