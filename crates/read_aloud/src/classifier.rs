//! Detection of top-level readable elements.
//!
//! A readable element is the unit the assistant hovers and speaks. Candidates
//! are elements that own a non-blank text node directly. Each candidate is
//! promoted through chains of only-children so that wrappers such as
//! `<div><blockquote>text</blockquote></div>` are read as the outer `div`.
//! The result never contains an element nested inside another result.

use dom::{Document, NodeKey, Rect};
use std::collections::HashSet;

/// Tags that are never readable and never serve as a promotion target.
pub const BLOCK_LIST: [&str; 12] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "button", "label", "span", "img", "pre", "script",
];

/// Whether `tag` is in [`BLOCK_LIST`], ignoring ASCII case.
pub fn is_block_listed(tag: &str) -> bool {
    BLOCK_LIST
        .iter()
        .any(|blocked| blocked.eq_ignore_ascii_case(tag))
}

/// Whether one of the node's direct children is a text node with non-whitespace content.
pub fn has_direct_text<D: Document + ?Sized>(document: &D, node: NodeKey) -> bool {
    document
        .child_nodes(node)
        .into_iter()
        .filter_map(|child| document.text(child))
        .any(|text| !text.trim().is_empty())
}

/// Return the top-level readable elements below the document body, in document order.
///
/// Pages without a `<body>` are scanned from the document node instead. The
/// scan root itself is never returned.
pub fn classify<D: Document + ?Sized>(document: &D) -> Vec<NodeKey> {
    let scope = document.body().unwrap_or_else(|| document.root());
    let mut collected: Vec<NodeKey> = Vec::new();
    let mut seen: HashSet<NodeKey> = HashSet::new();

    for element in document.descendant_elements(scope) {
        let Some(tag) = document.tag_name(element) else {
            continue;
        };
        if is_block_listed(&tag) || !has_direct_text(document, element) {
            continue;
        }
        let Some(target) = promote(document, element, scope) else {
            log::trace!(target: "read_aloud::classifier", "{element:?} promoted into a block-listed parent");
            continue;
        };
        if seen.contains(&target) || inside_collected(document, target, &seen) {
            continue;
        }
        seen.insert(target);
        collected.push(target);
    }

    log::debug!(target: "read_aloud::classifier", "classified {} readable elements", collected.len());
    collected
}

/// Walk up while the current element is its parent's only child element.
///
/// Stops below `scope`. Returns `None` when the chain runs into a block-listed
/// parent: the text then belongs to a control and is not read on its own.
fn promote<D: Document + ?Sized>(document: &D, element: NodeKey, scope: NodeKey) -> Option<NodeKey> {
    let mut current = element;
    loop {
        let Some(parent) = document.parent(current) else {
            return Some(current);
        };
        if parent == scope || document.element_children(parent).len() != 1 {
            return Some(current);
        }
        match document.tag_name(parent) {
            Some(tag) if is_block_listed(&tag) => return None,
            Some(_) => current = parent,
            None => return Some(current),
        }
    }
}

fn inside_collected<D: Document + ?Sized>(document: &D, node: NodeKey, seen: &HashSet<NodeKey>) -> bool {
    let mut current = document.parent(node);
    while let Some(ancestor) = current {
        if seen.contains(&ancestor) {
            return true;
        }
        current = document.parent(ancestor);
    }
    false
}

/// A readable element described for the embedding UI.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadableElement {
    pub node: NodeKey,
    pub tag: String,
    /// Page-coordinate bounds, `None` while the element is not laid out.
    pub bounds: Option<Rect>,
    pub text: String,
}

/// Describe a node as a [`ReadableElement`]; `None` if it is not an element.
pub fn describe<D: Document + ?Sized>(document: &D, node: NodeKey) -> Option<ReadableElement> {
    let tag = document.tag_name(node)?;
    Some(ReadableElement {
        node,
        tag,
        bounds: document.page_bounds(node),
        text: document.text_content(node),
    })
}
