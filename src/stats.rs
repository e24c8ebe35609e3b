//! Document statistics.
//!
//! [`Statistics::collect`] walks a document once and returns an owned summary.
//! Nothing is cached between calls, so collecting statistics for different
//! documents from different threads is safe.
//!
//! ```rust
//! use mml_bounded::{parse, Statistics};
//!
//! let doc = parse("T:Report\nM:a|1\nH:Intro\nM:b|2\nIMG:Fig|f.png");
//! let stats = Statistics::collect(&doc);
//!
//! assert!(stats.has_title);
//! assert_eq!(stats.metadata, 2);
//! assert_eq!(stats.images, 1);
//! assert!(stats.summary().as_str().starts_with("Title: yes\nSections: 1\n"));
//! ```

use crate::document::Document;
use crate::fixed::FixedStr;
use serde::Serialize;
use std::fmt::{self, Write};

/// Buffer size of [`Statistics::summary`].
pub const STATS_SUMMARY_LENGTH: usize = 512;

/// Aggregate counts over a document and its parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub has_title: bool,
    pub sections: usize,
    /// Document and section metadata entries.
    pub metadata: usize,
    /// Document and section links.
    pub links: usize,
    /// Section images.
    pub images: usize,
    pub total_lines: usize,
    pub parsed_lines: usize,
    pub error_lines: usize,
}

impl Statistics {
    #[must_use]
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Statistics {
            has_title: doc.has_title(),
            sections: doc.sections.len(),
            metadata: doc.metadata.len(),
            links: doc.links.len(),
            images: 0,
            total_lines: doc.stats.total_lines,
            parsed_lines: doc.stats.parsed_lines,
            error_lines: doc.stats.error_lines,
        };
        for section in &doc.sections {
            stats.metadata += section.metadata.len();
            stats.links += section.links.len();
            stats.images += section.images.len();
        }
        stats
    }

    /// Renders the `Label: value` summary into a bounded string.
    #[must_use]
    pub fn summary(&self) -> FixedStr<STATS_SUMMARY_LENGTH> {
        let mut out = FixedStr::new();
        // eight short lines always fit; an overflow would only cut the tail
        let written = write!(out, "{self}");
        debug_assert!(written.is_ok(), "statistics summary truncated");
        out
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", if self.has_title { "yes" } else { "no" })?;
        writeln!(f, "Sections: {}", self.sections)?;
        writeln!(f, "Metadata: {}", self.metadata)?;
        writeln!(f, "Links: {}", self.links)?;
        writeln!(f, "Images: {}", self.images)?;
        writeln!(f, "Total lines: {}", self.total_lines)?;
        writeln!(f, "Parsed lines: {}", self.parsed_lines)?;
        write!(f, "Errors: {}", self.error_lines)
    }
}
