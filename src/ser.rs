//! Document serialization.
//!
//! Four independent serializers write a [`Document`] into a caller-supplied
//! byte buffer:
//!
//! - [`to_json`]: a JSON object with title, metadata and sections
//! - [`to_html`]: a minimal HTML page
//! - [`to_compact`]: MMLC, a numeric-prefixed re-encoding of the MML input
//! - [`to_text`]: readable plain text with underlined headings
//!
//! ## Buffer contract
//!
//! All writes go through an [`OutputBuffer`], which checks the remaining room
//! before every write and keeps the last byte of the buffer for a zero
//! sentinel. The first write that does not fit aborts the serializer with
//! [`Error::BufferOverflow`]; whatever was written before that point is not
//! valid output. On success the serializer returns the number of bytes
//! written, and `out[len]` is zero.
//!
//! Field values are written verbatim. Nothing is escaped for JSON or HTML, so
//! a `"` or `<` in the input reaches the output as-is.
//!
//! ## Usage
//!
//! ```rust
//! use mml_bounded::{parse, to_compact};
//!
//! let doc = parse("T:Report\nH:Intro\nP:Hello\nM:Key|Val");
//! let mut out = [0u8; 128];
//! let len = to_compact(&doc, &mut out).unwrap();
//!
//! assert_eq!(&out[..len], b"1:Report\n2:Intro\n4:Hello\n3:Key|Val\n");
//! ```

use crate::document::{Document, Metadata, MAX_TITLE_LENGTH};
use crate::encode::encode_into;
use crate::parser::Tag;
use crate::{Error, HtmlOptions, Result};
use serde::{Deserialize, Serialize};

/// A bounded writer over a caller-owned byte buffer.
///
/// One byte is always kept free for the trailing sentinel, so a buffer of
/// length `n` accepts at most `n - 1` bytes of output.
#[derive(Debug)]
pub struct OutputBuffer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> OutputBuffer<'a> {
    /// Wraps `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty buffer.
    pub fn new(buf: &'a mut [u8]) -> Result<Self> {
        if buf.is_empty() {
            return Err(Error::InvalidInput);
        }
        Ok(OutputBuffer { buf, pos: 0 })
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Bytes that can still be written.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - 1 - self.pos
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Appends `bytes` entirely or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if `bytes` does not fit.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(Error::BufferOverflow);
        }
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    /// Writes the sentinel and returns the output length.
    pub fn finish(self) -> usize {
        self.buf[self.pos] = 0;
        self.pos
    }
}

/// The output formats supported by [`serialize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
    Compact,
    Text,
}

impl OutputFormat {
    /// Conventional file extension for the format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Compact => "mmlc",
            OutputFormat::Text => "txt",
        }
    }
}

/// Serializes `doc` in the given `format`. HTML uses default options.
///
/// # Errors
///
/// Same as the format-specific serializer.
pub fn serialize(doc: &Document, format: OutputFormat, out: &mut [u8]) -> Result<usize> {
    match format {
        OutputFormat::Json => to_json(doc, out),
        OutputFormat::Html => to_html(doc, out),
        OutputFormat::Compact => to_compact(doc, out),
        OutputFormat::Text => to_text(doc, out),
    }
}

fn finish_or_log(result: Result<()>, out: OutputBuffer<'_>, format: OutputFormat) -> Result<usize> {
    match result {
        Ok(()) => Ok(out.finish()),
        Err(err) => {
            log::debug!(
                "{} output aborted after {} bytes: {}",
                format.extension(),
                out.len(),
                err
            );
            Err(err)
        }
    }
}

fn write_json_metadata(out: &mut OutputBuffer<'_>, entries: &[Metadata]) -> Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.write(b",")?;
        }
        out.write(b"{\"key\":\"")?;
        out.write(entry.key.as_bytes())?;
        out.write(b"\",\"value\":\"")?;
        out.write(entry.value.as_bytes())?;
        out.write(b"\"}")?;
    }
    Ok(())
}

fn write_json(doc: &Document, out: &mut OutputBuffer<'_>) -> Result<()> {
    out.write(b"{\"title\":\"")?;
    out.write(doc.title.as_bytes())?;
    out.write(b"\",\"metadata\":[")?;
    write_json_metadata(out, doc.metadata.as_slice())?;
    out.write(b"],\"sections\":[")?;

    for (i, section) in doc.sections.iter().enumerate() {
        if i > 0 {
            out.write(b",")?;
        }
        out.write(b"{\"title\":\"")?;
        out.write(section.title.as_bytes())?;
        out.write(b"\",\"content\":\"")?;
        out.write(section.content.as_bytes())?;
        out.write(b"\",\"metadata\":[")?;
        write_json_metadata(out, section.metadata.as_slice())?;
        out.write(b"]}")?;
    }

    out.write(b"]}")
}

/// Serializes `doc` as a compact JSON object.
///
/// Shape: `{"title":…,"metadata":[{"key":…,"value":…}],"sections":[{"title":…,"content":…,"metadata":[…]}]}`.
/// The title is always present (empty when unset). Links and images are not
/// part of the JSON form.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an empty buffer, [`Error::BufferOverflow`] when
/// the output does not fit.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::{to_json, Document};
///
/// let mut out = [0u8; 64];
/// let len = to_json(&Document::new(), &mut out).unwrap();
/// assert_eq!(&out[..len], br#"{"title":"","metadata":[],"sections":[]}"#);
/// ```
pub fn to_json(doc: &Document, out: &mut [u8]) -> Result<usize> {
    let mut buf = OutputBuffer::new(out)?;
    let result = write_json(doc, &mut buf);
    finish_or_log(result, buf, OutputFormat::Json)
}

fn write_url(out: &mut OutputBuffer<'_>, url: &[u8], options: &HtmlOptions) -> Result<()> {
    if options.encode_urls {
        encode_into(url, out)
    } else {
        out.write(url)
    }
}

fn write_html(doc: &Document, out: &mut OutputBuffer<'_>, options: &HtmlOptions) -> Result<()> {
    out.write(b"<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>")?;
    out.write(doc.title.as_bytes())?;
    out.write(b"</title>\n</head>\n<body>\n")?;

    if doc.has_title() {
        out.write(b"<h1>")?;
        out.write(doc.title.as_bytes())?;
        out.write(b"</h1>\n")?;
    }

    for section in &doc.sections {
        out.write(b"<h2>")?;
        out.write(section.title.as_bytes())?;
        out.write(b"</h2>\n")?;

        if !section.content.is_empty() {
            out.write(b"<p>")?;
            out.write(section.content.as_bytes())?;
            out.write(b"</p>\n")?;
        }

        for link in &section.links {
            out.write(b"<p><a href=\"")?;
            write_url(out, link.url.as_bytes(), options)?;
            out.write(b"\">")?;
            out.write(link.text.as_bytes())?;
            out.write(b"</a></p>\n")?;
        }

        for image in &section.images {
            out.write(b"<figure>\n<img src=\"")?;
            write_url(out, image.url.as_bytes(), options)?;
            out.write(b"\" alt=\"")?;
            out.write(image.description.as_bytes())?;
            out.write(b"\">\n<figcaption>")?;
            out.write(image.description.as_bytes())?;
            out.write(b"</figcaption>\n</figure>\n")?;
        }
    }

    out.write(b"</body>\n</html>\n")
}

/// Serializes `doc` as a minimal HTML page with default [`HtmlOptions`].
///
/// The page has a doctype, a head carrying the title and a body. A non-empty
/// title adds an `<h1>`. Each section renders its `<h2>` title, its content
/// paragraph when non-empty, one paragraph per link and one `<figure>` per
/// image. Document-level links are not rendered.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an empty buffer, [`Error::BufferOverflow`] when
/// the output does not fit.
pub fn to_html(doc: &Document, out: &mut [u8]) -> Result<usize> {
    to_html_with_options(doc, &HtmlOptions::default(), out)
}

/// Serializes `doc` as HTML with custom options.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::{parse, to_html_with_options, HtmlOptions};
///
/// let doc = parse("H:Refs\nL:Search|/find?q=a b");
/// let options = HtmlOptions::new().with_encode_urls(true);
/// let mut out = [0u8; 512];
/// let len = to_html_with_options(&doc, &options, &mut out).unwrap();
///
/// let html = std::str::from_utf8(&out[..len]).unwrap();
/// assert!(html.contains("<a href=\"%2Ffind%3Fq%3Da%20b\">Search</a>"));
/// ```
///
/// # Errors
///
/// Same as [`to_html`].
pub fn to_html_with_options(doc: &Document, options: &HtmlOptions, out: &mut [u8]) -> Result<usize> {
    let mut buf = OutputBuffer::new(out)?;
    let result = write_html(doc, &mut buf, options);
    finish_or_log(result, buf, OutputFormat::Html)
}

fn write_compact_line(out: &mut OutputBuffer<'_>, tag: Tag, parts: &[&[u8]]) -> Result<()> {
    let code = tag.compact_code().ok_or(Error::InvalidTag)?;
    out.write(&[code, b':'])?;
    for part in parts {
        out.write(part)?;
    }
    out.write(b"\n")
}

fn write_compact_metadata(out: &mut OutputBuffer<'_>, entries: &[Metadata]) -> Result<()> {
    for entry in entries {
        write_compact_line(
            out,
            Tag::Metadata,
            &[entry.key.as_bytes(), b"|", entry.value.as_bytes()],
        )?;
    }
    Ok(())
}

fn write_compact(doc: &Document, out: &mut OutputBuffer<'_>) -> Result<()> {
    if doc.has_title() {
        write_compact_line(out, Tag::Title, &[doc.title.as_bytes()])?;
    }
    write_compact_metadata(out, doc.metadata.as_slice())?;

    for section in &doc.sections {
        write_compact_line(out, Tag::Section, &[section.title.as_bytes()])?;
        if !section.content.is_empty() {
            write_compact_line(out, Tag::Paragraph, &[section.content.as_bytes()])?;
        }
        write_compact_metadata(out, section.metadata.as_slice())?;
    }
    Ok(())
}

/// Serializes `doc` as MMLC.
///
/// Lines, in order: `1:title` (only if set), `3:key|value` per document
/// metadata entry, then per section `2:title`, `4:content` (only if set) and
/// `3:key|value` per section metadata entry. Links and images are dropped.
/// There is no MMLC decoder.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an empty buffer, [`Error::BufferOverflow`] when
/// the output does not fit.
pub fn to_compact(doc: &Document, out: &mut [u8]) -> Result<usize> {
    let mut buf = OutputBuffer::new(out)?;
    let result = write_compact(doc, &mut buf);
    finish_or_log(result, buf, OutputFormat::Compact)
}

const TITLE_RULE: [u8; MAX_TITLE_LENGTH] = [b'='; MAX_TITLE_LENGTH];
const SECTION_RULE: [u8; MAX_TITLE_LENGTH] = [b'-'; MAX_TITLE_LENGTH];
const BULLET: &[u8] = "\u{2022} ".as_bytes();

/// Starts a text block, separating it from the previous one by a blank line.
fn begin_block(out: &mut OutputBuffer<'_>, started: &mut bool) -> Result<()> {
    if *started {
        out.write(b"\n\n")?;
    }
    *started = true;
    Ok(())
}

// Titles are shorter than MAX_TITLE_LENGTH, so the rule slice is in bounds.
fn write_heading(out: &mut OutputBuffer<'_>, title: &[u8], rule: &[u8]) -> Result<()> {
    out.write(title)?;
    out.write(b"\n")?;
    out.write(&rule[..title.len()])
}

fn write_text(doc: &Document, out: &mut OutputBuffer<'_>) -> Result<()> {
    let mut started = false;

    if doc.has_title() {
        begin_block(out, &mut started)?;
        write_heading(out, doc.title.as_bytes(), &TITLE_RULE)?;
    }

    for section in &doc.sections {
        begin_block(out, &mut started)?;
        write_heading(out, section.title.as_bytes(), &SECTION_RULE)?;

        if !section.content.is_empty() {
            begin_block(out, &mut started)?;
            out.write(section.content.as_bytes())?;
        }

        for (i, link) in section.links.iter().enumerate() {
            if i == 0 {
                begin_block(out, &mut started)?;
            } else {
                out.write(b"\n")?;
            }
            out.write(BULLET)?;
            out.write(link.text.as_bytes())?;
            out.write(b": ")?;
            out.write(link.url.as_bytes())?;
        }
    }
    Ok(())
}

/// Serializes `doc` as plain text.
///
/// The title is underlined with `=` and each section title with `-`, one rule
/// byte per title byte. A section is followed by its content when set and by
/// one `• text: url` line per link. Blocks are separated by a blank
/// line and the output has no trailing newline. Metadata, images and
/// document-level links are not rendered.
///
/// # Errors
///
/// [`Error::InvalidInput`] for an empty buffer, [`Error::BufferOverflow`] when
/// the output does not fit.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::{parse, to_text};
///
/// let doc = parse("T:Memo\nH:Notes\nP:Call back");
/// let mut out = [0u8; 128];
/// let len = to_text(&doc, &mut out).unwrap();
///
/// assert_eq!(&out[..len], b"Memo\n====\n\nNotes\n-----\n\nCall back");
/// ```
pub fn to_text(doc: &Document, out: &mut [u8]) -> Result<usize> {
    let mut buf = OutputBuffer::new(out)?;
    let result = write_text(doc, &mut buf);
    finish_or_log(result, buf, OutputFormat::Text)
}
