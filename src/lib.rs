//! # mml_bounded
//!
//! A bounded parser and serializer for MML (Minimal Markup Language), built for
//! memory-constrained targets.
//!
//! ## What is MML?
//!
//! MML is a line-oriented markup dialect: one directive per line, written as
//! `MNEMONIC:content`. See [`syntax`] for the full directive reference.
//!
//! ```text
//! T:Incident report
//! M:Author|Field team
//! H:Situation
//! P:Fire in the north sector
//! L:Sector map|maps/sector-7.png
//! ```
//!
//! ## Key Features
//!
//! - **Bounded**: every string and list has a fixed capacity; over-long values
//!   are truncated and full lists reject new entries
//! - **Allocation-free passes**: storage is allocated once when a [`Document`]
//!   is created; parsing and serialization never allocate
//! - **Resilient**: a bad line is counted in [`ParseStats::error_lines`] and the
//!   pass continues
//! - **Four outputs**: JSON, an HTML page, the compact MMLC line format and
//!   plain text, all written into caller-supplied buffers
//! - **No unsafe code**
//!
//! ## Quick Start
//!
//! ```rust
//! use mml_bounded::{parse, to_json, validate, Statistics};
//!
//! let doc = parse("T:Report\nH:Intro\nP:Hello\nM:Key|Val\n");
//! assert!(validate(&doc));
//! assert_eq!(doc.stats.parsed_lines, 4);
//!
//! let mut out = [0u8; 256];
//! let len = to_json(&doc, &mut out).unwrap();
//! assert_eq!(
//!     &out[..len],
//!     br#"{"title":"Report","metadata":[],"sections":[{"title":"Intro","content":"Hello","metadata":[{"key":"Key","value":"Val"}]}]}"#
//! );
//!
//! let stats = Statistics::collect(&doc);
//! assert_eq!(stats.sections, 1);
//! ```
//!
//! ## Truncation counts as an error
//!
//! A value longer than its field is stored truncated, and the directive that
//! wrote it is still counted as an error line:
//!
//! ```rust
//! use mml_bounded::parse;
//!
//! let long_title = format!("T:{}", "x".repeat(200));
//! let doc = parse(&long_title);
//!
//! assert_eq!(doc.title.len(), 127);
//! assert_eq!(doc.stats.error_lines, 1);
//! ```
//!
//! ## Escaping
//!
//! The serializers write field values verbatim, with no JSON or HTML escaping.
//! URL percent-encoding for HTML links and images is available through
//! [`HtmlOptions::encode_urls`].

pub mod document;
pub mod encode;
pub mod error;
pub mod fixed;
pub mod options;
pub mod parser;
pub mod ser;
pub mod stats;
pub mod syntax;
pub mod validate;

pub use document::{
    Document, Image, Link, Metadata, ParseStats, Section, LINK_FIELD_LENGTH, MAX_CONTENT_LENGTH,
    MAX_IMAGES, MAX_LINE_LENGTH, MAX_LINKS, MAX_METADATA, MAX_SECTIONS, MAX_TITLE_LENGTH,
    METADATA_FIELD_LENGTH,
};
pub use encode::percent_encode;
pub use error::{Error, Result};
pub use fixed::{FixedStr, FixedVec, Slot};
pub use options::{HtmlOptions, ParserOptions};
pub use parser::{split_pair, Lines, Parser, SectionCursor, Tag};
pub use ser::{
    serialize, to_compact, to_html, to_html_with_options, to_json, to_text, OutputBuffer,
    OutputFormat,
};
pub use stats::Statistics;
pub use validate::validate;

/// Parses MML text with default options.
///
/// Never fails: rejected lines are counted in the returned document's
/// [`ParseStats`].
///
/// # Examples
///
/// ```rust
/// use mml_bounded::parse;
///
/// let doc = parse("M:OnlyKey\n");
/// let entry = doc.metadata.get(0).unwrap();
/// assert_eq!(entry.key, "OnlyKey");
/// assert_eq!(entry.value, "");
/// ```
#[must_use]
pub fn parse(input: impl AsRef<[u8]>) -> Document {
    Parser::new().parse(input)
}

/// Parses MML text with custom options.
#[must_use]
pub fn parse_with_options(input: impl AsRef<[u8]>, options: ParserOptions) -> Document {
    Parser::with_options(options).parse(input)
}

/// Checks that every line of `input` is accepted and the result validates.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::check;
///
/// assert!(check("T:Valid\nH:Intro\nP:Document").is_ok());
/// assert!(check("P:no section yet").is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::ParseError`] if any line was rejected or the document fails
/// [`validate`].
pub fn check(input: impl AsRef<[u8]>) -> Result<()> {
    let doc = parse(input);
    let valid = validate(&doc);
    if doc.stats.error_lines > 0 || !valid {
        log::debug!(
            "check failed: {} rejected lines, valid={}",
            doc.stats.error_lines,
            valid
        );
        return Err(Error::ParseError);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_model_is_thread_safe() {
        assert_send_sync::<Document>();
        assert_send_sync::<Parser>();
        assert_send_sync::<Statistics>();
    }

    #[test]
    fn test_parse_simple_document() {
        let doc = parse("T:Test Document\nH:Section\nP:Content");
        assert_eq!(doc.title, "Test Document");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections.get(0).unwrap().title, "Section");
    }

    #[test]
    fn test_parse_accepts_bytes() {
        let doc = parse(b"T:Bytes\xFF".as_slice());
        assert_eq!(doc.title.as_bytes(), b"Bytes\xFF");
        assert_eq!(doc.title.as_str(), "Bytes");
    }

    #[test]
    fn test_check_valid_and_invalid() {
        assert!(check("T:Valid\nM:k|v").is_ok());
        assert_eq!(check("INVALID"), Err(Error::ParseError));
        assert_eq!(check("H:\nP:untitled"), Err(Error::ParseError));
    }

    #[test]
    fn test_independent_documents_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let doc = parse(format!("T:Doc {i}\nH:S\nP:body"));
                    let mut out = [0u8; 256];
                    let len = to_compact(&doc, &mut out).unwrap();
                    String::from_utf8(out[..len].to_vec()).unwrap()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("1:Doc {i}\n2:S\n4:body\n"));
        }
    }
}
