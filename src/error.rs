//! Error types for MML parsing and serialization.
//!
//! Every failure in this crate is one of a small, fixed set of kinds. Errors are
//! `Copy`, carry no payload and never allocate, so they can be produced on the
//! parse and serialization hot paths without touching the heap.
//!
//! ## Error Categories
//!
//! - **Directive errors**: a line is not a directive, or targets a section that
//!   does not exist yet
//! - **Capacity errors**: a bounded container is already full
//! - **Truncation**: a field value was longer than its buffer (the truncated
//!   value is still stored)
//! - **Output errors**: a serializer ran out of room in the caller's buffer
//!
//! Errors do not carry a source line number. Callers that need localized
//! diagnostics track the line themselves; the parser logs the line index at
//! `debug` level when a directive is rejected.
//!
//! ## Examples
//!
//! ```rust
//! use mml_bounded::{to_json, Document, Error};
//!
//! let doc = Document::new();
//! let mut out = [0u8; 8];
//!
//! let err = to_json(&doc, &mut out).unwrap_err();
//! assert_eq!(err, Error::BufferOverflow);
//! assert_eq!(err.message(), "Buffer overflow");
//! ```

use thiserror::Error;

/// All failure kinds produced by the parser, validator and serializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// The caller supplied unusable input, such as a zero-length output buffer.
    #[error("Invalid input")]
    InvalidInput,

    /// Serialized output does not fit in the caller's buffer.
    #[error("Buffer overflow")]
    BufferOverflow,

    /// A line has no `:` separator and is not a directive.
    #[error("Invalid tag")]
    InvalidTag,

    /// The document already holds the maximum number of sections.
    #[error("Too many sections")]
    TooManySections,

    /// The targeted metadata list is full.
    #[error("Too many metadata entries")]
    TooManyMetadata,

    /// The targeted link list is full.
    #[error("Too many links")]
    TooManyLinks,

    /// The current section's image list is full.
    #[error("Too many images")]
    TooManyImages,

    /// The directive needs an open section and none has been declared yet.
    #[error("No open section")]
    NoOpenSection,

    /// A field value was cut to fit its buffer.
    #[error("Field truncated")]
    Truncated,

    /// The mnemonic is not recognized and unknown directives are rejected.
    #[error("Unknown tag")]
    UnknownTag,

    /// Whole-input check failed.
    #[error("Parse error")]
    ParseError,
}

impl Error {
    /// Returns the static human-readable message for this error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mml_bounded::Error;
    ///
    /// assert_eq!(Error::TooManySections.message(), "Too many sections");
    /// ```
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Error::InvalidInput => "Invalid input",
            Error::BufferOverflow => "Buffer overflow",
            Error::InvalidTag => "Invalid tag",
            Error::TooManySections => "Too many sections",
            Error::TooManyMetadata => "Too many metadata entries",
            Error::TooManyLinks => "Too many links",
            Error::TooManyImages => "Too many images",
            Error::NoOpenSection => "No open section",
            Error::Truncated => "Field truncated",
            Error::UnknownTag => "Unknown tag",
            Error::ParseError => "Parse error",
        }
    }

    /// Returns `true` for errors raised while applying a single directive.
    ///
    /// These are the errors that increment a document's `error_lines` counter.
    #[must_use]
    pub const fn is_line_error(&self) -> bool {
        !matches!(
            self,
            Error::InvalidInput | Error::BufferOverflow | Error::ParseError
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
