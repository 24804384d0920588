//! Delimited-block scanning over raw text.
//!
//! Memory files are loosely structured XML written by several tools, so they
//! are read by marker scanning rather than a strict parser: a file that is not
//! well-formed still yields every block that is.

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// A start/end marker pair delimiting one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Markers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// `<name>` / `</name>`.
    pub fn element(name: &str) -> Self {
        Self::new(format!("<{name}>"), format!("</{name}>"))
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One delimited span of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    /// Byte offset of the start marker in the source.
    pub offset: usize,
    /// Exact source span, markers included.
    pub raw: &'a str,
    /// Text between the markers.
    pub inner: &'a str,
}

/// Every `start ... end` span in `text`, in source order.
///
/// Scanning resumes after each end marker. A start marker with no matching end
/// marker ends the scan; the unterminated tail yields nothing.
pub fn extract_blocks<'a>(text: &'a str, markers: &Markers) -> Vec<Block<'a>> {
    let mut blocks = Vec::new();
    if markers.start.is_empty() || markers.end.is_empty() {
        return blocks;
    }

    let mut pos = 0;
    while let Some(found) = text[pos..].find(&markers.start) {
        let start = pos + found;
        let inner_start = start + markers.start.len();
        let Some(end_offset) = text[inner_start..].find(&markers.end) else {
            break;
        };
        let inner_end = inner_start + end_offset;
        let end = inner_end + markers.end.len();
        blocks.push(Block {
            offset: start,
            raw: &text[start..end],
            inner: &text[inner_start..inner_end],
        });
        pos = end;
    }
    blocks
}

/// Trimmed, entity-decoded text of the first `<name>...</name>` in `text`.
pub fn element_text(text: &str, name: &str) -> Option<String> {
    extract_blocks(text, &Markers::element(name))
        .first()
        .map(|b| decode_entities(b.inner.trim()))
}

/// Decode the five predefined XML entities.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_blocks_in_order() {
        let text = "head <s>one</s> mid <s>two</s> tail";
        let blocks = extract_blocks(text, &Markers::element("s"));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].inner, "one");
        assert_eq!(blocks[0].raw, "<s>one</s>");
        assert_eq!(blocks[0].offset, 5);
        assert_eq!(blocks[1].inner, "two");
    }

    #[test]
    fn unterminated_tail_is_dropped() {
        let text = "<s>one</s><s>two";
        let blocks = extract_blocks(text, &Markers::element("s"));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].inner, "one");
    }

    #[test]
    fn custom_markers() {
        let text = "--- a ---\n--- b ---";
        let blocks = extract_blocks(text, &Markers::new("---", "---"));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].inner, " a ");
        assert_eq!(blocks[1].inner, " b ");
    }

    #[test]
    fn empty_markers_yield_nothing() {
        assert!(extract_blocks("abc", &Markers::new("", "x")).is_empty());
    }

    #[test]
    fn element_text_trims_and_decodes() {
        let text = "<entry><issue>\n  a &lt; b &amp;&amp; c\n</issue></entry>";
        assert_eq!(element_text(text, "issue").as_deref(), Some("a < b && c"));
        assert_eq!(element_text(text, "missing"), None);
    }

    #[test]
    fn decode_does_not_double_decode() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }
}
