//! Post-parse structural checks.

use crate::document::{Document, MAX_METADATA, MAX_SECTIONS};

/// Checks that `doc` is structurally consistent.
///
/// Re-checks list sizes against their maxima and requires every section to
/// have a non-empty title. Returns a single verdict without listing the
/// violations.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::{parse, validate};
///
/// assert!(validate(&parse("T:Ok\nH:Intro\nP:Text")));
/// assert!(!validate(&parse("H:\nP:untitled")));
/// ```
#[must_use]
pub fn validate(doc: &Document) -> bool {
    if doc.sections.len() > MAX_SECTIONS || doc.metadata.len() > MAX_METADATA {
        return false;
    }
    doc.sections
        .iter()
        .all(|section| !section.title.is_empty() && section.metadata.len() <= MAX_METADATA)
}
