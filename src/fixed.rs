//! Fixed-capacity storage for document fields and lists.
//!
//! This module provides the two bounded containers every part of the document
//! model is built from:
//!
//! - [`FixedStr`]: an inline byte string with a compile-time capacity
//! - [`FixedVec`]: an ordered list with a compile-time maximum length
//!
//! ## Capacity and the sentinel byte
//!
//! A `FixedStr<N>` owns `N` bytes but stores at most `N - 1` of them. The last
//! slot is reserved for a terminating zero byte, which is always written after
//! the stored value. This keeps the layout identical to a classic
//! zero-terminated buffer of size `N`.
//!
//! ## Truncation is reported, not hidden
//!
//! Writing a value that does not fit stores the longest prefix that does and
//! returns `false`. The data is kept; the caller decides what a truncated write
//! means. The parser counts it as a failed directive.
//!
//! ```rust
//! use mml_bounded::FixedStr;
//!
//! let mut name = FixedStr::<6>::new();
//! assert!(name.copy_from(b"Alice"));
//! assert!(!name.copy_from(b"Bernadette"));
//! assert_eq!(name.as_str(), "Berna");
//! ```
//!
//! ## Slot reuse
//!
//! `FixedVec` allocates all of its slots once, when it is created. Appending
//! with [`FixedVec::claim`] resets and hands out the next free slot, so filling
//! a list never allocates.

use serde::ser::{Serialize, Serializer};
use std::fmt;

/// A byte string stored inline with a fixed capacity of `N - 1` bytes.
///
/// Contents are bytes, not guaranteed UTF-8: truncation may cut a multi-byte
/// character in half. [`FixedStr::as_str`] returns the longest valid UTF-8
/// prefix for display purposes.
#[derive(Clone, Copy)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> FixedStr<N> {
    const NON_EMPTY: () = assert!(N > 0, "FixedStr needs room for its sentinel byte");

    /// Creates an empty string.
    #[must_use]
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        FixedStr {
            bytes: [0; N],
            len: 0,
        }
    }

    /// Maximum number of bytes this string can hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The stored bytes, without the sentinel.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The longest valid UTF-8 prefix of the stored bytes.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match std::str::from_utf8(self.as_bytes()) {
            Ok(s) => s,
            // valid_up_to marks a char boundary, so the second decode cannot fail
            Err(e) => std::str::from_utf8(&self.bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Empties the string.
    pub fn clear(&mut self) {
        self.len = 0;
        self.bytes[0] = 0;
    }

    /// Replaces the contents with `src`.
    ///
    /// Returns `false` if `src` was longer than [`capacity`](Self::capacity);
    /// the truncated prefix is stored either way.
    pub fn copy_from(&mut self, src: &[u8]) -> bool {
        self.len = 0;
        self.push_bytes(src)
    }

    /// Appends `src` to the current contents.
    ///
    /// Same truncation rule as [`copy_from`](Self::copy_from).
    pub fn push_bytes(&mut self, src: &[u8]) -> bool {
        let room = self.capacity() - self.len;
        let take = src.len().min(room);
        self.bytes[self.len..self.len + take].copy_from_slice(&src[..take]);
        self.len += take;
        self.bytes[self.len] = 0;
        take == src.len()
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq for FixedStr<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> Eq for FixedStr<N> {}

impl<const N: usize> PartialEq<str> for FixedStr<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> PartialEq<&str> for FixedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatting into a `FixedStr` fails once the capacity is reached, after
/// storing whatever prefix fit.
impl<const N: usize> fmt::Write for FixedStr<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.push_bytes(s.as_bytes()) {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

impl<const N: usize> Serialize for FixedStr<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A value that can live in a [`FixedVec`] slot and be reset for reuse.
pub trait Slot: Default + Clone {
    /// Returns the slot to its empty state without releasing any storage.
    fn reset(&mut self);
}

/// An ordered list holding at most `N` items.
///
/// All `N` slots are allocated when the list is created; afterwards the list
/// only hands out and resets existing slots.
#[derive(Clone)]
pub struct FixedVec<T, const N: usize> {
    slots: Box<[T]>,
    len: usize,
}

impl<T: Slot, const N: usize> FixedVec<T, N> {
    #[must_use]
    pub fn new() -> Self {
        FixedVec {
            slots: vec![T::default(); N].into_boxed_slice(),
            len: 0,
        }
    }

    /// Resets the next free slot, appends it and returns it for filling.
    ///
    /// Returns `None` when the list is full; nothing changes in that case.
    pub fn claim(&mut self) -> Option<&mut T> {
        if self.len == N {
            return None;
        }
        let slot = &mut self.slots[self.len];
        slot.reset();
        self.len += 1;
        Some(slot)
    }

    /// Forgets every item. Slot storage is kept.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<T, const N: usize> FixedVec<T, N> {
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots[..self.len].get_mut(index)
    }
}

impl<T: Slot, const N: usize> Default for FixedVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq, const N: usize> PartialEq for FixedVec<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for FixedVec<T, N> {}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a FixedVec<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Serialize, const N: usize> Serialize for FixedVec<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}
