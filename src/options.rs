//! Configuration options for parsing and HTML output.
//!
//! - [`ParserOptions`]: strictness and unknown-directive policy
//! - [`HtmlOptions`]: opt-in URL encoding for the HTML serializer
//!
//! Both types are plain builders and derive `serde` traits, so a host program
//! can load them from whatever configuration format it already uses.
//!
//! ## Examples
//!
//! ```rust
//! use mml_bounded::{Parser, ParserOptions};
//!
//! // Stop at the first rejected line and reject unknown mnemonics
//! let options = ParserOptions::strict().with_reject_unknown(true);
//! let doc = Parser::with_options(options).parse("T:Ok\nZZ:nope\nT:Never");
//!
//! assert_eq!(doc.title, "Ok");
//! assert_eq!(doc.stats.error_lines, 1);
//! ```

use serde::{Deserialize, Serialize};

/// Options controlling how the parser reacts to rejected directives.
///
/// The defaults keep parsing resilient: a rejected line is counted and the
/// pass continues, and unknown mnemonics are accepted as no-ops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Stop the pass at the first rejected line.
    pub strict: bool,
    /// Count directives with an unrecognized mnemonic as errors.
    pub reject_unknown: bool,
}

impl ParserOptions {
    /// Creates default options (resilient, unknown directives accepted).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mml_bounded::ParserOptions;
    ///
    /// let options = ParserOptions::new();
    /// assert!(!options.strict);
    /// assert!(!options.reject_unknown);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that stop at the first rejected line.
    #[must_use]
    pub fn strict() -> Self {
        ParserOptions {
            strict: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn with_reject_unknown(mut self, reject: bool) -> Self {
        self.reject_unknown = reject;
        self
    }
}

/// Options for [`to_html_with_options`](crate::to_html_with_options).
///
/// By default the HTML serializer writes every field verbatim.
/// Enabling `encode_urls` percent-encodes link `href` and image `src` values,
/// which changes output bytes for URLs containing reserved characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    pub encode_urls: bool,
}

impl HtmlOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether link and image URLs are percent-encoded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mml_bounded::HtmlOptions;
    ///
    /// let options = HtmlOptions::new().with_encode_urls(true);
    /// assert!(options.encode_urls);
    /// ```
    #[must_use]
    pub fn with_encode_urls(mut self, encode: bool) -> Self {
        self.encode_urls = encode;
        self
    }
}
