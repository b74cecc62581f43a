//! Mapping speech boundary offsets back onto text nodes.
//!
//! Offsets are counted in UTF-16 code units, the unit used by DOM ranges and
//! by speech boundary events.

use dom::{NodeKey, TextNode};

/// A position inside a text node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextPosition {
    pub node: NodeKey,
    pub offset: usize,
}

/// A range between two text positions, start inclusive and end exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

/// Length of `text` in UTF-16 code units.
pub(crate) fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Resolve `[char_index, char_index + char_length)` of the flattened text of
/// `text_nodes` to a [`TextRange`].
///
/// The start lands in the node that holds the character at `char_index`; the
/// end lands in the first node whose cumulative length reaches the end offset.
/// Offsets past the end of the text clamp to the end of the last node. Returns
/// `None` only when there are no text nodes.
pub fn resolve_word_range(text_nodes: &[TextNode], char_index: usize, char_length: usize) -> Option<TextRange> {
    let last = text_nodes.last()?;
    let last_end = TextPosition {
        node: last.node,
        offset: utf16_len(&last.text),
    };
    let end_index = char_index.saturating_add(char_length);
    let mut consumed = 0_usize;
    let mut start: Option<TextPosition> = None;

    for text_node in text_nodes {
        let length = utf16_len(&text_node.text);
        if start.is_none() && consumed + length > char_index {
            start = Some(TextPosition {
                node: text_node.node,
                offset: char_index - consumed,
            });
        }
        if let Some(found) = start.filter(|_| consumed + length >= end_index) {
            return Some(TextRange {
                start: found,
                end: TextPosition {
                    node: text_node.node,
                    offset: end_index - consumed,
                },
            });
        }
        consumed += length;
    }

    Some(TextRange {
        start: start.unwrap_or(last_end),
        end: last_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(parts: &[&str]) -> Vec<TextNode> {
        parts
            .iter()
            .enumerate()
            .map(|(index, text)| TextNode {
                node: NodeKey(index as u64 + 1),
                text: (*text).to_owned(),
            })
            .collect()
    }

    fn pos(node: u64, offset: usize) -> TextPosition {
        TextPosition {
            node: NodeKey(node),
            offset,
        }
    }

    #[test]
    fn word_inside_a_single_node() {
        let text = nodes(&["hello world"]);
        let range = resolve_word_range(&text, 6, 5);
        assert_eq!(range, Some(TextRange { start: pos(1, 6), end: pos(1, 11) }));
    }

    #[test]
    fn word_starting_on_a_node_boundary_starts_in_the_next_node() {
        let text = nodes(&["Hello ", "world", "!"]);
        let range = resolve_word_range(&text, 6, 5);
        assert_eq!(range, Some(TextRange { start: pos(2, 0), end: pos(2, 5) }));
    }

    #[test]
    fn word_spanning_nodes() {
        let text = nodes(&["desk", "top publishing"]);
        let range = resolve_word_range(&text, 0, 7);
        assert_eq!(range, Some(TextRange { start: pos(1, 0), end: pos(2, 3) }));
    }

    #[test]
    fn offsets_past_the_end_clamp_to_the_last_node() {
        let text = nodes(&["one ", "two"]);
        assert_eq!(
            resolve_word_range(&text, 4, 50),
            Some(TextRange { start: pos(2, 0), end: pos(2, 3) })
        );
        assert_eq!(
            resolve_word_range(&text, 99, 1),
            Some(TextRange { start: pos(2, 3), end: pos(2, 3) })
        );
        assert_eq!(
            resolve_word_range(&text, usize::MAX, usize::MAX),
            Some(TextRange { start: pos(2, 3), end: pos(2, 3) })
        );
    }

    #[test]
    fn empty_nodes_are_skipped() {
        let text = nodes(&["", "abc"]);
        assert_eq!(
            resolve_word_range(&text, 0, 3),
            Some(TextRange { start: pos(2, 0), end: pos(2, 3) })
        );
    }

    #[test]
    fn no_text_nodes_resolves_to_nothing() {
        assert_eq!(resolve_word_range(&[], 0, 1), None);
    }

    #[test]
    fn lengths_are_utf16_units_not_bytes() {
        assert_eq!(utf16_len("hello"), 5);
        assert_eq!(utf16_len("café"), 4);
        assert_eq!(utf16_len("😀 hi"), 5);
        assert_eq!("😀 hi".len(), 7);
    }

    #[test]
    fn offsets_count_utf16_units() {
        let text = nodes(&["😀 hi"]);
        assert_eq!(
            resolve_word_range(&text, 3, 2),
            Some(TextRange { start: pos(1, 3), end: pos(1, 5) })
        );
    }
}
