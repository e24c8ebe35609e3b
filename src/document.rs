//! The bounded document model produced by the parser.
//!
//! ## Core Types
//!
//! - [`Document`]: title, top-level metadata and links, sections, parse counters
//! - [`Section`]: title, content, and its own metadata, links and images
//! - [`Metadata`], [`Link`], [`Image`]: two-field entries
//! - [`ParseStats`]: total, parsed and error line counts
//!
//! Every string field is a [`FixedStr`] and every list a [`FixedVec`], with the
//! capacities defined by the constants in this module. A document is created
//! once with [`Document::new`] (the only point where storage is allocated),
//! filled during a single parse pass and read-only afterwards.
//!
//! ```rust
//! use mml_bounded::{Document, MAX_SECTIONS};
//!
//! let doc = Document::new();
//! assert!(doc.title.is_empty());
//! assert!(doc.sections.is_empty());
//! assert_eq!(doc.sections.capacity(), MAX_SECTIONS);
//! ```

use crate::fixed::{FixedStr, FixedVec, Slot};
use serde::Serialize;

/// Longest line the tokenizer keeps, including the sentinel slot.
pub const MAX_LINE_LENGTH: usize = 256;
/// Sections per document.
pub const MAX_SECTIONS: usize = 32;
/// Metadata entries per document and per section.
pub const MAX_METADATA: usize = 64;
/// Links per document and per section.
pub const MAX_LINKS: usize = 8;
/// Images per section.
pub const MAX_IMAGES: usize = 4;
/// Section content buffer.
pub const MAX_CONTENT_LENGTH: usize = 512;
/// Document and section title buffers.
pub const MAX_TITLE_LENGTH: usize = 128;
/// Metadata key and value buffers.
pub const METADATA_FIELD_LENGTH: usize = MAX_LINE_LENGTH / 4;
/// Link text/url and image description/url buffers.
pub const LINK_FIELD_LENGTH: usize = MAX_LINE_LENGTH / 2;

pub type Title = FixedStr<MAX_TITLE_LENGTH>;
pub type Content = FixedStr<MAX_CONTENT_LENGTH>;

/// A key/value pair from an `M:` directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub key: FixedStr<METADATA_FIELD_LENGTH>,
    pub value: FixedStr<METADATA_FIELD_LENGTH>,
}

impl Slot for Metadata {
    fn reset(&mut self) {
        self.key.clear();
        self.value.clear();
    }
}

/// A text/url pair from an `L:` directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: FixedStr<LINK_FIELD_LENGTH>,
    pub url: FixedStr<LINK_FIELD_LENGTH>,
}

impl Slot for Link {
    fn reset(&mut self) {
        self.text.clear();
        self.url.clear();
    }
}

/// A description/url pair from an `IMG:` directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Image {
    pub description: FixedStr<LINK_FIELD_LENGTH>,
    pub url: FixedStr<LINK_FIELD_LENGTH>,
}

impl Slot for Image {
    fn reset(&mut self) {
        self.description.clear();
        self.url.clear();
    }
}

/// A section opened by an `H:` directive.
///
/// `content` holds only the most recent paragraph, code or quote directive;
/// each one overwrites the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: Title,
    pub content: Content,
    pub metadata: FixedVec<Metadata, MAX_METADATA>,
    pub links: FixedVec<Link, MAX_LINKS>,
    pub images: FixedVec<Image, MAX_IMAGES>,
}

impl Slot for Section {
    fn reset(&mut self) {
        self.title.clear();
        self.content.clear();
        self.metadata.clear();
        self.links.clear();
        self.images.clear();
    }
}

/// Line counters maintained by the parser.
///
/// Blank lines are not counted. For every parse,
/// `total_lines == parsed_lines + error_lines`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub total_lines: usize,
    pub parsed_lines: usize,
    pub error_lines: usize,
}

impl ParseStats {
    pub(crate) fn record(&mut self, accepted: bool) {
        self.total_lines += 1;
        if accepted {
            self.parsed_lines += 1;
        } else {
            self.error_lines += 1;
        }
    }
}

/// A parsed MML document.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::parse;
///
/// let doc = parse("T:Report\nH:Intro\nP:Hello\nM:Key|Val\n");
///
/// assert_eq!(doc.title, "Report");
/// let intro = doc.sections.get(0).unwrap();
/// assert_eq!(intro.title, "Intro");
/// assert_eq!(intro.content, "Hello");
/// assert_eq!(intro.metadata.get(0).unwrap().value, "Val");
/// assert_eq!(doc.stats.error_lines, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: Title,
    pub metadata: FixedVec<Metadata, MAX_METADATA>,
    pub sections: FixedVec<Section, MAX_SECTIONS>,
    pub links: FixedVec<Link, MAX_LINKS>,
    pub stats: ParseStats,
}

impl Document {
    /// Creates an empty document with all container storage allocated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document to its freshly created state, keeping its storage.
    pub fn reset(&mut self) {
        self.title.clear();
        self.metadata.clear();
        self.sections.clear();
        self.links.clear();
        self.stats = ParseStats::default();
    }

    #[must_use]
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}
