//! Shared UTF-8 string payload with code-point indexing.
//!
//! The language indexes strings by Unicode code point, not by byte. To keep
//! `s[i]` cheap for repeated access the wrapper builds a per-string table of
//! code-point byte offsets the first time an index (or the code-point
//! length) is requested; after that both are O(1). Clones share the text and
//! the table.

use std::rc::Rc;

use once_cell::unsync::OnceCell;

#[derive(Debug)]
struct StrData {
    text: String,
    /// Byte offset of each code point, plus a terminal `text.len()` entry.
    /// Built lazily on first indexed access.
    char_offsets: OnceCell<Vec<usize>>,
}

/// Shared, code-point-indexable UTF-8 text.
#[derive(Debug, Clone)]
pub struct Utf8String {
    inner: Rc<StrData>,
}

impl Utf8String {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(StrData {
                text: text.into(),
                char_offsets: OnceCell::new(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner.text
    }

    pub fn is_empty(&self) -> bool {
        self.inner.text.is_empty()
    }

    /// Byte length of the underlying text.
    pub fn byte_len(&self) -> usize {
        self.inner.text.len()
    }

    fn offsets(&self) -> &[usize] {
        self.inner.char_offsets.get_or_init(|| {
            let text = &self.inner.text;
            let mut offsets: Vec<usize> = text.char_indices().map(|(pos, _)| pos).collect();
            offsets.push(text.len());
            offsets
        })
    }

    /// Number of Unicode code points.
    pub fn char_len(&self) -> usize {
        self.offsets().len() - 1
    }

    /// The one-code-point substring at code-point index `index`, or `None`
    /// when out of range.
    pub fn char_at(&self, index: usize) -> Option<&str> {
        let offsets = self.offsets();
        if index + 1 < offsets.len() {
            Some(&self.inner.text[offsets[index]..offsets[index + 1]])
        } else {
            None
        }
    }
}

impl PartialEq for Utf8String {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Utf8String {}

impl PartialOrd for Utf8String {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Utf8String {
    // Byte order on UTF-8 equals code-point order, so plain `str` comparison
    // gives the lexicographic-by-code-point ordering the language specifies.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl From<&str> for Utf8String {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Utf8String {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── char_len / char_at ────────────────────────────────────────────────────

    #[test]
    fn test_string_char_len_counts_code_points() {
        let s = Utf8String::new("héllo");
        assert_eq!(s.char_len(), 5);
        assert_eq!(s.byte_len(), 6);
    }

    #[test]
    fn test_string_char_at_multibyte() {
        let s = Utf8String::new("héllo");
        assert_eq!(s.char_at(0), Some("h"));
        assert_eq!(s.char_at(1), Some("é"));
        assert_eq!(s.char_at(4), Some("o"));
    }

    #[test]
    fn test_string_char_at_out_of_range_is_none() {
        let s = Utf8String::new("ab");
        assert_eq!(s.char_at(2), None);
        assert_eq!(s.char_at(100), None);
    }

    #[test]
    fn test_string_empty() {
        let s = Utf8String::new("");
        assert!(s.is_empty());
        assert_eq!(s.char_len(), 0);
        assert_eq!(s.char_at(0), None);
    }

    // ── sharing / ordering ────────────────────────────────────────────────────

    #[test]
    fn test_string_clone_shares_text() {
        let a = Utf8String::new("shared");
        let b = a.clone();
        assert!(Rc::ptr_eq(&a.inner, &b.inner));
        assert_eq!(a, b);
    }

    #[test]
    fn test_string_ordering_is_code_point_lexicographic() {
        let a = Utf8String::new("abc");
        let b = Utf8String::new("abd");
        assert!(a < b);
        assert!(Utf8String::new("a") < Utf8String::new("é"));
    }
}
