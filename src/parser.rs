//! MML parsing.
//!
//! This module turns raw MML text into a [`Document`] in a single forward pass.
//!
//! ## Pipeline
//!
//! 1. [`Lines`] splits the input on runs of `\n`/`\r`, caps every line at
//!    `MAX_LINE_LENGTH - 1` bytes, trims ASCII whitespace and skips blanks.
//! 2. [`Parser::dispatch_line`] finds the `:` separator, maps the mnemonic to a
//!    [`Tag`] and applies the directive to the document.
//! 3. The result of each line bumps `parsed_lines` or `error_lines`.
//!
//! A rejected line never stops the pass unless [`ParserOptions::strict`] is
//! set.
//!
//! ## Attachment
//!
//! A [`SectionCursor`] tracks the most recently opened section. Metadata and
//! links attach to the document until the first `H:` directive and to the
//! current section afterwards; paragraph, code, quote and image directives
//! need an open section. The cursor only moves forward.
//!
//! ```rust
//! use mml_bounded::parse;
//!
//! let doc = parse("M:Author|Ada\nH:Notes\nM:Draft|yes\n");
//!
//! assert_eq!(doc.metadata.len(), 1);
//! assert_eq!(doc.sections.get(0).unwrap().metadata.len(), 1);
//! ```

use crate::document::{Document, Section, MAX_LINE_LENGTH};
use crate::{Error, ParserOptions, Result};
use std::fmt;

/// Prefix written in front of `Q:` content.
pub const QUOTE_MARKER: &[u8] = b"> ";

/// Separator between the two fields of `M:`, `L:` and `IMG:` content.
pub const PAIR_DELIMITER: u8 = b'|';

/// Directive kinds, keyed by their case-sensitive mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `T:` document title
    Title,
    /// `H:` opens a section
    Section,
    /// `P:` section content
    Paragraph,
    /// `M:` key|value
    Metadata,
    /// `L:` text|url
    Link,
    /// `IMG:` description|url
    Image,
    /// `C:` code, stored like a paragraph
    Code,
    /// `Q:` quote, stored as `> ` plus the content
    Quote,
    /// `CFG:` reserved
    Config,
    /// `PKT:` reserved
    Packet,
    /// Any other mnemonic
    Unknown,
}

impl Tag {
    /// Looks up a mnemonic. Anything unmapped becomes [`Tag::Unknown`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mml_bounded::Tag;
    ///
    /// assert_eq!(Tag::from_mnemonic(b"IMG"), Tag::Image);
    /// assert_eq!(Tag::from_mnemonic(b"img"), Tag::Unknown);
    /// ```
    #[must_use]
    pub fn from_mnemonic(mnemonic: &[u8]) -> Self {
        match mnemonic {
            b"T" => Tag::Title,
            b"H" => Tag::Section,
            b"P" => Tag::Paragraph,
            b"M" => Tag::Metadata,
            b"L" => Tag::Link,
            b"IMG" => Tag::Image,
            b"C" => Tag::Code,
            b"Q" => Tag::Quote,
            b"CFG" => Tag::Config,
            b"PKT" => Tag::Packet,
            _ => Tag::Unknown,
        }
    }

    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Tag::Title => "T",
            Tag::Section => "H",
            Tag::Paragraph => "P",
            Tag::Metadata => "M",
            Tag::Link => "L",
            Tag::Image => "IMG",
            Tag::Code => "C",
            Tag::Quote => "Q",
            Tag::Config => "CFG",
            Tag::Packet => "PKT",
            Tag::Unknown => "UNKNOWN",
        }
    }

    /// Numeric prefix used for this kind in MMLC output, if it has one.
    ///
    /// Section content written by `P`, `C` or `Q` is emitted under the
    /// paragraph code.
    #[must_use]
    pub const fn compact_code(self) -> Option<u8> {
        match self {
            Tag::Title => Some(b'1'),
            Tag::Section => Some(b'2'),
            Tag::Metadata => Some(b'3'),
            Tag::Paragraph => Some(b'4'),
            _ => None,
        }
    }

    /// Whether the directive fails when no section has been opened.
    #[must_use]
    pub const fn requires_section(self) -> bool {
        matches!(
            self,
            Tag::Paragraph | Tag::Code | Tag::Quote | Tag::Image
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[inline]
fn is_line_break(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

#[inline]
fn is_trimmed(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// Strips leading and trailing space, tab, CR and LF.
#[must_use]
pub fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| !is_trimmed(b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&b| !is_trimmed(b))
        .map_or(start, |last| last + 1);
    &bytes[start..end]
}

fn strip_leading_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Splits `content` at the first `delimiter`.
///
/// Without a delimiter the whole content is the left part and the right part
/// is empty.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::split_pair;
///
/// assert_eq!(split_pair(b"Key|Val|ue", b'|'), (&b"Key"[..], &b"Val|ue"[..]));
/// assert_eq!(split_pair(b"OnlyKey", b'|'), (&b"OnlyKey"[..], &b""[..]));
/// ```
#[must_use]
pub fn split_pair(content: &[u8], delimiter: u8) -> (&[u8], &[u8]) {
    match content.iter().position(|&b| b == delimiter) {
        Some(at) => (&content[..at], &content[at + 1..]),
        None => (content, &[]),
    }
}

/// Iterator over the trimmed, non-blank lines of an input.
///
/// Lines longer than `MAX_LINE_LENGTH - 1` bytes are cut to that length before
/// trimming; the rest of such a line is discarded.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Lines<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Lines { rest: input }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = match self.rest.iter().position(|&b| !is_line_break(b)) {
                Some(start) => start,
                None => {
                    self.rest = &[];
                    return None;
                }
            };
            let rest = &self.rest[start..];
            let end = rest
                .iter()
                .position(|&b| is_line_break(b))
                .unwrap_or(rest.len());
            let (raw, tail) = rest.split_at(end);
            self.rest = tail;

            let line = trim(&raw[..raw.len().min(MAX_LINE_LENGTH - 1)]);
            if !line.is_empty() {
                return Some(line);
            }
        }
    }
}

/// Forward-only pointer to the most recently opened section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCursor {
    current: Option<usize>,
}

impl SectionCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the open section, or `None` before the first `H:` directive.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    fn advance_to(&mut self, index: usize) {
        debug_assert!(self.current.map_or(true, |current| index > current));
        self.current = Some(index);
    }
}

/// The MML parser.
///
/// A parser holds only its options; all pass state lives in the
/// [`Document`] and a [`SectionCursor`], so one parser can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Parser { options }
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses `input` into a newly created document.
    pub fn parse(&self, input: impl AsRef<[u8]>) -> Document {
        let mut doc = Document::new();
        self.parse_into(input.as_ref(), &mut doc);
        doc
    }

    /// Resets `doc` and parses `input` into it, reusing its storage.
    ///
    /// Returns the line counters of the pass (also stored in `doc.stats`).
    pub fn parse_into(&self, input: &[u8], doc: &mut Document) -> crate::ParseStats {
        doc.reset();
        let mut cursor = SectionCursor::new();

        for line in Lines::new(input) {
            let result = self.dispatch_line(line, doc, &mut cursor);
            doc.stats.record(result.is_ok());
            match result {
                Ok(tag) => log::trace!("directive {} accepted ({})", doc.stats.total_lines, tag),
                Err(err) => {
                    debug_assert!(err.is_line_error(), "{err:?} is not a line error");
                    log::debug!("directive {} rejected: {}", doc.stats.total_lines, err);
                    if self.options.strict {
                        log::debug!("strict mode: stopping after first rejected directive");
                        break;
                    }
                }
            }
        }

        log::debug!(
            "parsed {} directives: {} accepted, {} rejected",
            doc.stats.total_lines,
            doc.stats.parsed_lines,
            doc.stats.error_lines
        );
        doc.stats
    }

    /// Applies one trimmed, non-blank line to `doc`.
    ///
    /// Returns the directive kind on success. On error the document is left
    /// unchanged, except for [`Error::Truncated`], where the truncated value
    /// has been stored.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTag`] if the line has no `:`
    /// - [`Error::NoOpenSection`] for section-only directives before any `H:`
    /// - [`Error::TooManySections`], [`Error::TooManyMetadata`],
    ///   [`Error::TooManyLinks`], [`Error::TooManyImages`] when the target list
    ///   is full
    /// - [`Error::Truncated`] when a field value did not fit
    /// - [`Error::UnknownTag`] for unmapped mnemonics, only with
    ///   [`ParserOptions::reject_unknown`]
    pub fn dispatch_line(
        &self,
        line: &[u8],
        doc: &mut Document,
        cursor: &mut SectionCursor,
    ) -> Result<Tag> {
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(Error::InvalidTag)?;
        let tag = Tag::from_mnemonic(trim(&line[..colon]));
        let content = strip_leading_blanks(&line[colon + 1..]);

        self.apply(tag, content, doc, cursor)?;
        Ok(tag)
    }

    fn apply(
        &self,
        tag: Tag,
        content: &[u8],
        doc: &mut Document,
        cursor: &mut SectionCursor,
    ) -> Result<()> {
        if tag.requires_section() && cursor.current().is_none() {
            return Err(Error::NoOpenSection);
        }

        match tag {
            Tag::Title => stored(doc.title.copy_from(content)),
            Tag::Section => {
                let index = doc.sections.len();
                let section = doc.sections.claim().ok_or(Error::TooManySections)?;
                let complete = section.title.copy_from(content);
                cursor.advance_to(index);
                stored(complete)
            }
            Tag::Paragraph | Tag::Code => {
                let section = open_section(doc, cursor)?;
                stored(section.content.copy_from(content))
            }
            Tag::Quote => {
                let section = open_section(doc, cursor)?;
                let marker = section.content.copy_from(QUOTE_MARKER);
                let body = section.content.push_bytes(content);
                stored(marker && body)
            }
            Tag::Metadata => {
                let (key, value) = split_pair(content, PAIR_DELIMITER);
                let list = match cursor.current() {
                    Some(index) => &mut section_at(doc, index)?.metadata,
                    None => &mut doc.metadata,
                };
                let entry = list.claim().ok_or(Error::TooManyMetadata)?;
                let key_done = entry.key.copy_from(key);
                let value_done = entry.value.copy_from(value);
                stored(key_done && value_done)
            }
            Tag::Link => {
                let (text, url) = split_pair(content, PAIR_DELIMITER);
                let list = match cursor.current() {
                    Some(index) => &mut section_at(doc, index)?.links,
                    None => &mut doc.links,
                };
                let entry = list.claim().ok_or(Error::TooManyLinks)?;
                let text_done = entry.text.copy_from(text);
                let url_done = entry.url.copy_from(url);
                stored(text_done && url_done)
            }
            Tag::Image => {
                let section = open_section(doc, cursor)?;
                let (description, url) = split_pair(content, PAIR_DELIMITER);
                let entry = section.images.claim().ok_or(Error::TooManyImages)?;
                let description_done = entry.description.copy_from(description);
                let url_done = entry.url.copy_from(url);
                stored(description_done && url_done)
            }
            Tag::Config | Tag::Packet => Ok(()),
            Tag::Unknown if self.options.reject_unknown => Err(Error::UnknownTag),
            Tag::Unknown => Ok(()),
        }
    }
}

fn stored(complete: bool) -> Result<()> {
    if complete {
        Ok(())
    } else {
        Err(Error::Truncated)
    }
}

fn section_at(doc: &mut Document, index: usize) -> Result<&mut Section> {
    doc.sections.get_mut(index).ok_or(Error::NoOpenSection)
}

fn open_section<'d>(doc: &'d mut Document, cursor: &SectionCursor) -> Result<&'d mut Section> {
    let index = cursor.current().ok_or(Error::NoOpenSection)?;
    section_at(doc, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MAX_IMAGES, MAX_LINKS, MAX_SECTIONS, METADATA_FIELD_LENGTH};

    fn lines(input: &str) -> Vec<&[u8]> {
        Lines::new(input.as_bytes()).collect()
    }

    fn dispatch_all(parser: &Parser, input: &[&str]) -> (Document, Vec<Result<Tag>>) {
        let mut doc = Document::new();
        let mut cursor = SectionCursor::new();
        let results = input
            .iter()
            .map(|line| parser.dispatch_line(line.as_bytes(), &mut doc, &mut cursor))
            .collect();
        (doc, results)
    }

    #[test]
    fn test_lines_split_on_any_break_run() {
        let got = lines("T:a\r\nH:b\n\n\rP:c");
        assert_eq!(got, vec![&b"T:a"[..], b"H:b", b"P:c"]);
    }

    #[test]
    fn test_lines_trim_and_skip_blank() {
        let got = lines("  T:a \t\n   \n\t\n P:b  ");
        assert_eq!(got, vec![&b"T:a"[..], b"P:b"]);
    }

    #[test]
    fn test_lines_truncate_before_trim() {
        let mut input = String::from("P:");
        input.push_str(&"x".repeat(400));
        input.push_str("\nT:next");
        let got = lines(&input);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].len(), MAX_LINE_LENGTH - 1);
        assert_eq!(got[1], b"T:next");
    }

    #[test]
    fn test_truncated_line_trailing_space_is_trimmed() {
        let mut input = "T:".to_string();
        input.push_str(&"y".repeat(MAX_LINE_LENGTH - 4));
        input.push_str("    tail");
        let got = lines(&input);
        assert_eq!(got[0].len(), MAX_LINE_LENGTH - 2);
        assert!(got[0].ends_with(b"y"));
    }

    #[test]
    fn test_lines_empty_input() {
        assert!(lines("").is_empty());
        assert!(lines("\n\r\n  \n").is_empty());
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(b" \t a b \r\n"), b"a b");
        assert_eq!(trim(b"   "), b"");
        assert_eq!(trim(b""), b"");
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair(b"a|b", b'|'), (&b"a"[..], &b"b"[..]));
        assert_eq!(split_pair(b"|b", b'|'), (&b""[..], &b"b"[..]));
        assert_eq!(split_pair(b"a|", b'|'), (&b"a"[..], &b""[..]));
        assert_eq!(split_pair(b" a | b ", b'|'), (&b" a "[..], &b" b "[..]));
    }

    #[test]
    fn test_tag_lookup_round_trip() {
        let tags = [
            Tag::Title,
            Tag::Section,
            Tag::Paragraph,
            Tag::Metadata,
            Tag::Link,
            Tag::Image,
            Tag::Code,
            Tag::Quote,
            Tag::Config,
            Tag::Packet,
        ];
        for tag in tags {
            assert_eq!(Tag::from_mnemonic(tag.mnemonic().as_bytes()), tag);
        }
        assert_eq!(Tag::from_mnemonic(b"t"), Tag::Unknown);
        assert_eq!(Tag::from_mnemonic(b""), Tag::Unknown);
        assert_eq!(Tag::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_requires_section_gates_dispatch() {
        let parser = Parser::new();
        for mnemonic in ["T", "H", "P", "M", "L", "IMG", "C", "Q", "CFG", "PKT", "ZZ"] {
            let tag = Tag::from_mnemonic(mnemonic.as_bytes());
            let line = format!("{mnemonic}:x|y");
            let (doc, results) = dispatch_all(&parser, &[line.as_str()]);
            if tag.requires_section() {
                assert_eq!(results[0], Err(Error::NoOpenSection), "{mnemonic}");
                assert_eq!(doc, Document::new());
            } else {
                assert_eq!(results[0], Ok(tag), "{mnemonic}");
            }
        }
    }

    #[test]
    fn test_every_rejection_is_a_line_error() {
        let parser = Parser::with_options(ParserOptions::new().with_reject_unknown(true));
        let long = format!("T:{}", "t".repeat(300));
        let (_, results) = dispatch_all(&parser, &["no colon", "P:orphan", "ZZ:odd", long.as_str()]);
        for result in results {
            let err = result.unwrap_err();
            assert!(err.is_line_error(), "{err:?}");
        }
    }

    #[test]
    fn test_missing_colon_is_invalid_tag() {
        let (_, results) = dispatch_all(&Parser::new(), &["no separator here"]);
        assert_eq!(results[0], Err(Error::InvalidTag));
    }

    #[test]
    fn test_mnemonic_is_trimmed_and_content_left_stripped() {
        let (doc, results) = dispatch_all(&Parser::new(), &["T \t:\t  Spaced  "]);
        assert_eq!(results[0], Ok(Tag::Title));
        assert_eq!(doc.title, "Spaced  ");
    }

    #[test]
    fn test_content_keeps_later_colons() {
        let (doc, _) = dispatch_all(&Parser::new(), &["H:Links", "L:Site|https://example.com"]);
        let link = doc.sections.get(0).unwrap().links.get(0).unwrap();
        assert_eq!(link.url, "https://example.com");
    }

    #[test]
    fn test_unknown_accepted_by_default() {
        let (doc, results) = dispatch_all(&Parser::new(), &["XYZ:whatever"]);
        assert_eq!(results[0], Ok(Tag::Unknown));
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn test_unknown_rejected_when_configured() {
        let parser = Parser::with_options(ParserOptions::new().with_reject_unknown(true));
        let (_, results) = dispatch_all(&parser, &["XYZ:whatever", "CFG:reserved"]);
        assert_eq!(results[0], Err(Error::UnknownTag));
        assert_eq!(results[1], Ok(Tag::Config));
    }

    #[test]
    fn test_reserved_tags_have_no_effect() {
        let (doc, results) = dispatch_all(&Parser::new(), &["CFG:a=1", "PKT:0xff"]);
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn test_section_only_directives_need_open_section() {
        let (doc, results) =
            dispatch_all(&Parser::new(), &["P:text", "C:code", "Q:quote", "IMG:a|b"]);
        assert!(results.iter().all(|r| *r == Err(Error::NoOpenSection)));
        assert_eq!(doc, Document::new());
    }

    #[test]
    fn test_paragraph_code_quote_overwrite() {
        let (doc, _) = dispatch_all(&Parser::new(), &["H:S", "P:first", "C:let x = 1;"]);
        assert_eq!(doc.sections.get(0).unwrap().content, "let x = 1;");

        let (doc, _) = dispatch_all(&Parser::new(), &["H:S", "P:first", "Q:wise words"]);
        assert_eq!(doc.sections.get(0).unwrap().content, "> wise words");
    }

    #[test]
    fn test_cursor_targets_latest_section() {
        let (doc, _) = dispatch_all(
            &Parser::new(),
            &["L:Top|/", "H:One", "H:Two", "M:k|v", "L:In|/two"],
        );
        assert_eq!(doc.links.len(), 1);
        let one = doc.sections.get(0).unwrap();
        let two = doc.sections.get(1).unwrap();
        assert!(one.metadata.is_empty());
        assert_eq!(two.metadata.len(), 1);
        assert_eq!(two.links.get(0).unwrap().text, "In");
    }

    #[test]
    fn test_section_capacity() {
        let parser = Parser::new();
        let mut doc = Document::new();
        let mut cursor = SectionCursor::new();
        for _ in 0..MAX_SECTIONS {
            assert!(parser.dispatch_line(b"H:s", &mut doc, &mut cursor).is_ok());
        }
        assert_eq!(
            parser.dispatch_line(b"H:overflow", &mut doc, &mut cursor),
            Err(Error::TooManySections)
        );
        assert_eq!(doc.sections.len(), MAX_SECTIONS);
        assert_eq!(cursor.current(), Some(MAX_SECTIONS - 1));
    }

    #[test]
    fn test_link_and_image_capacity() {
        let parser = Parser::new();
        let mut doc = Document::new();
        let mut cursor = SectionCursor::new();
        parser.dispatch_line(b"H:s", &mut doc, &mut cursor).unwrap();
        for _ in 0..MAX_LINKS {
            parser.dispatch_line(b"L:a|b", &mut doc, &mut cursor).unwrap();
        }
        for _ in 0..MAX_IMAGES {
            parser.dispatch_line(b"IMG:a|b", &mut doc, &mut cursor).unwrap();
        }
        assert_eq!(
            parser.dispatch_line(b"L:a|b", &mut doc, &mut cursor),
            Err(Error::TooManyLinks)
        );
        assert_eq!(
            parser.dispatch_line(b"IMG:a|b", &mut doc, &mut cursor),
            Err(Error::TooManyImages)
        );
    }

    #[test]
    fn test_truncated_key_is_stored_and_reported() {
        let long_key = "k".repeat(METADATA_FIELD_LENGTH + 10);
        let line = format!("M:{long_key}|value");
        let (doc, results) = dispatch_all(&Parser::new(), &[line.as_str()]);
        assert_eq!(results[0], Err(Error::Truncated));
        let entry = doc.metadata.get(0).unwrap();
        assert_eq!(entry.key.len(), METADATA_FIELD_LENGTH - 1);
        assert_eq!(entry.value, "value");
    }

    #[test]
    fn test_truncated_section_title_still_opens_section() {
        let line = format!("H:{}", "h".repeat(200));
        let (doc, results) = dispatch_all(&Parser::new(), &[line.as_str(), "P:body"]);
        assert_eq!(results[0], Err(Error::Truncated));
        assert_eq!(results[1], Ok(Tag::Paragraph));
        assert_eq!(doc.sections.get(0).unwrap().content, "body");
    }

    #[test]
    fn test_parse_into_reuses_document() {
        let parser = Parser::new();
        let mut doc = parser.parse("T:First\nH:A\nH:B");
        let stats = parser.parse_into(b"T:Second", &mut doc);
        assert_eq!(doc.title, "Second");
        assert!(doc.sections.is_empty());
        assert_eq!(stats.total_lines, 1);
        assert_eq!(doc.stats, stats);
    }

    #[test]
    fn test_strict_mode_stops_at_first_error() {
        let parser = Parser::with_options(ParserOptions::strict());
        let doc = parser.parse("T:One\nP:orphan\nT:Two\n");
        assert_eq!(doc.title, "One");
        assert_eq!(doc.stats.total_lines, 2);
        assert_eq!(doc.stats.error_lines, 1);
    }
}
