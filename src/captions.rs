//! Caption and technical-note parsing.
//!
//! Both files are loosely structured Markdown written by hand. A block starts
//! at any line beginning with the case study's id prefix; its body is every
//! following non-blank line up to a horizontal rule or the next id line:
//!
//! ```text
//! mmh-admin-dashboard
//! Staff land on a single dashboard with upcoming events
//! and pending seat requests.
//! ---
//! mmh-admin-auditlog-source
//! Technical note:
//! Every write goes through one audited service layer.
//! ```
//!
//! Body lines are joined with single spaces. A trailing `-source` on the id
//! line is dropped, so `mmh-admin-auditlog-source` keys `mmh-admin-auditlog`.
//! In the technical-notes file, `Technical note` label lines are skipped.
//!
//! Keys are stored both as written and lowercased, because lookups come from
//! filenames, which are usually lowercase, while the prose files are not.

use crate::types::{GroupMap, ScreenshotGroup};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Lines that end a block.
pub const HORIZONTAL_RULES: &[&str] = &["---", "\u{2E3B}"];

const SOURCE_SUFFIX: &str = "-source";
const TECHNICAL_NOTE_LABEL: &str = "technical note";

/// Which file is being parsed. Only technical notes carry label lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Captions,
    TechnicalNotes,
}

/// Parsed blocks from one text file.
#[derive(Debug, Clone, Default)]
pub struct BlockMap {
    entries: HashMap<String, String>,
    /// Non-empty block keys as written, first occurrence order.
    keys: Vec<String>,
}

impl BlockMap {
    /// Look up a block by exact id, falling back to the lowercased id.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries
            .get(id)
            .or_else(|| self.entries.get(&id.to_lowercase()))
            .map(String::as_str)
    }

    /// Keys of non-empty blocks, in the order they first appear.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn insert(&mut self, key: &str, text: String) {
        let lowered = key.to_lowercase();
        if lowered != key {
            self.entries.insert(lowered, text.clone());
        }
        self.entries.insert(key.to_string(), text);
        if !self.keys.iter().any(|k| k == key) {
            self.keys.push(key.to_string());
        }
    }
}

/// Captions plus the per-group order in which ids were first mentioned.
///
/// The discovery order is the default gallery order when a case study
/// configures no manual ordering for a group.
#[derive(Debug, Clone, Default)]
pub struct CaptionIndex {
    pub blocks: BlockMap,
    pub order_by_group: GroupMap<Vec<String>>,
}

/// A block header found while scanning lines.
struct Block {
    key: String,
    text: String,
    /// Index of the first line after the block.
    next: usize,
}

/// Walk the file, yielding every id-prefixed block in order.
fn scan_blocks(content: &str, prefix: &str, kind: BlockKind) -> Vec<Block> {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();
        if !trimmed.starts_with(prefix) {
            i += 1;
            continue;
        }

        let key = trimmed.strip_suffix(SOURCE_SUFFIX).unwrap_or(trimmed);
        let (text, next) = collect_block(&lines, i + 1, prefix, kind);
        blocks.push(Block {
            key: key.to_string(),
            text,
            next,
        });
        i = next;
    }

    blocks
}

/// Gather body lines starting at `start`.
///
/// Returns the joined text and the index to resume scanning from: just past a
/// horizontal rule, or on the next id line so it opens its own block.
fn collect_block(lines: &[&str], start: usize, prefix: &str, kind: BlockKind) -> (String, usize) {
    let mut buffer: Vec<&str> = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let trimmed = lines[i].trim();
        if trimmed.is_empty() {
            i += 1;
            continue;
        }
        if HORIZONTAL_RULES.contains(&trimmed) {
            i += 1;
            break;
        }
        if trimmed.starts_with(prefix) {
            break;
        }
        if kind == BlockKind::TechnicalNotes
            && trimmed.to_lowercase().starts_with(TECHNICAL_NOTE_LABEL)
        {
            i += 1;
            continue;
        }
        buffer.push(trimmed);
        i += 1;
    }

    (buffer.join(" ").trim().to_string(), i)
}

/// Parse every block in `content` keyed by `prefix`. Empty blocks are dropped.
pub fn parse_blocks(content: &str, prefix: &str, kind: BlockKind) -> BlockMap {
    let mut map = BlockMap::default();
    for block in scan_blocks(content, prefix, kind) {
        if !block.text.is_empty() {
            map.insert(&block.key, block.text);
        }
    }
    map
}

/// Parse a captions file, recording per-group discovery order.
///
/// Ids enter the order even when their caption block is empty, so a
/// placeholder screenshot keeps the slot the writer gave it.
pub fn parse_captions(content: &str, prefix: &str) -> CaptionIndex {
    let mut index = CaptionIndex::default();
    for block in scan_blocks(content, prefix, BlockKind::Captions) {
        let order = index
            .order_by_group
            .get_mut(ScreenshotGroup::classify(&block.key));
        if !order.contains(&block.key) {
            order.push(block.key.clone());
        }
        if !block.text.is_empty() {
            index.blocks.insert(&block.key, block.text);
        }
    }
    index
}

pub fn read_captions(path: &Path, prefix: &str) -> std::io::Result<CaptionIndex> {
    let content = fs::read_to_string(path)?;
    Ok(parse_captions(&content, prefix))
}

pub fn read_technical_notes(path: &Path, prefix: &str) -> std::io::Result<BlockMap> {
    let content = fs::read_to_string(path)?;
    Ok(parse_blocks(&content, prefix, BlockKind::TechnicalNotes))
}
