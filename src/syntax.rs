//! MML Directive Reference
//!
//! This module documents the MML dialect as implemented by this library. It
//! contains no code.
//!
//! # Lines
//!
//! Input is treated as bytes. Lines are separated by any run of `\n` and `\r`
//! bytes, so `\r\n` and blank lines between directives need no special care.
//!
//! **Rules**:
//! - A line keeps at most 255 bytes; the rest of a longer line is dropped
//!   before trimming
//! - Leading and trailing space, tab, CR and LF are trimmed
//! - Blank lines are skipped and not counted
//! - Every other line is a directive and counts toward `total_lines`
//!
//! # Directives
//!
//! A directive is `MNEMONIC:content`. The mnemonic is everything before the
//! first `:`, trimmed, matched case-sensitively. Content is everything after
//! the first `:` with leading spaces and tabs removed; later colons stay in
//! the content (`L:Site|https://example.com` works).
//!
//! | Mnemonic | Kind | Effect |
//! |----------|------|--------|
//! | `T` | Title | Sets the document title (last one wins) |
//! | `H` | Section | Opens a new section with the given title |
//! | `P` | Paragraph | Sets the current section's content |
//! | `C` | Code | Same as `P` |
//! | `Q` | Quote | Sets the current section's content to `> ` plus the text |
//! | `M` | Metadata | `key|value` on the current section, or the document before any `H` |
//! | `L` | Link | `text|url` on the current section, or the document before any `H` |
//! | `IMG` | Image | `description|url` on the current section |
//! | `CFG` | Config | Reserved, no effect |
//! | `PKT` | Packet | Reserved, no effect |
//!
//! Any other mnemonic is accepted and ignored, unless the parser is configured
//! with `reject_unknown`.
//!
//! `P`, `C` and `Q` replace the section content rather than appending to it:
//!
//! ```text
//! H:Notes
//! P:first         # content is "first"
//! P:second        # content is now "second"
//! Q:remember      # content is now "> remember"
//! ```
//!
//! ## Pairs
//!
//! `M`, `L` and `IMG` split their content at the first `|`. Without a `|`, the
//! whole content is the first field and the second is empty. Neither field is
//! trimmed.
//!
//! # Failures
//!
//! A directive is counted in `error_lines` when:
//!
//! - the line has no `:`
//! - `P`, `C`, `Q` or `IMG` appear before the first `H`
//! - the target list is full
//! - a value was longer than its field (the truncated value is still stored)
//!
//! # Capacities
//!
//! | Field | Max bytes |
//! |-------|-----------|
//! | Document and section title | 127 |
//! | Section content | 511 |
//! | Metadata key, value | 63 |
//! | Link text, url; image description, url | 127 |
//!
//! | List | Max entries |
//! |------|-------------|
//! | Sections | 32 |
//! | Metadata (document, each section) | 64 |
//! | Links (document, each section) | 8 |
//! | Images (each section) | 4 |
//!
//! # MMLC
//!
//! The compact output replaces mnemonics with digits and drops links and
//! images:
//!
//! ```text
//! 1:Report        # title, only when set
//! 3:Author|Ada    # document metadata
//! 2:Intro         # section
//! 4:Hello         # section content, only when set
//! 3:Key|Val       # section metadata
//! ```
//!
//! There is no MMLC parser.
