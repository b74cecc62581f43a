//! HTML ingestion through html5ever.
//!
//! The parsed document is replayed as a stream of [`DOMUpdate`]s so that any
//! [`DOMSubscriber`] can mirror it; [`parse_html`] feeds them into a [`PageTree`].

use crate::tree::PageTree;
use crate::{DOMSubscriber, DOMUpdate, NodeKey, NodeKeyMinter};
use anyhow::Result;
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::rc::Rc;

/// Parse a full HTML document into a fresh [`PageTree`].
///
/// # Errors
/// Returns an error if the input cannot be read or the update stream is rejected.
pub fn parse_html(html: &str) -> Result<PageTree> {
    let mut tree = PageTree::new();
    tree.apply_batch(html_to_updates(html)?)?;
    Ok(tree)
}

/// Parse HTML and return the update stream that rebuilds it, ending with
/// [`DOMUpdate::EndOfDocument`].
///
/// Doctypes, comments and processing instructions are dropped. Whitespace-only
/// text is kept so that text offsets match what the page renders.
///
/// # Errors
/// Returns an error if html5ever fails to read the input.
pub fn html_to_updates(html: &str) -> Result<Vec<DOMUpdate>> {
    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    let mut emitter = UpdateEmitter::default();
    emitter.convert_document(&dom.document);
    emitter.updates.push(DOMUpdate::EndOfDocument);
    log::debug!(target: "dom", "parsed {} bytes into {} updates", html.len(), emitter.updates.len());
    Ok(emitter.updates)
}

/// Pending node: the rcdom handle, the key of its parent and its insert position.
type PendingNode = (Handle, NodeKey, usize);

#[derive(Default)]
struct UpdateEmitter {
    keys: NodeKeyMinter,
    updates: Vec<DOMUpdate>,
}

impl UpdateEmitter {
    /// Emit the whole document in pre-order using an explicit work stack, so
    /// nesting depth is bounded by the heap rather than the call stack.
    fn convert_document(&mut self, document: &Handle) {
        let mut stack: Vec<PendingNode> = Vec::new();
        push_children(&mut stack, document, NodeKey::ROOT);
        while let Some((rc_node, parent, pos)) = stack.pop() {
            if let Some(node) = self.convert_node(&rc_node, parent, pos) {
                push_children(&mut stack, &rc_node, node);
            }
        }
    }

    /// Emit updates for one node; returns the new key when its children must follow.
    fn convert_node(&mut self, rc_node: &Handle, parent: NodeKey, pos: usize) -> Option<NodeKey> {
        match &rc_node.data {
            NodeData::Text { contents } => {
                let node = self.keys.mint();
                self.updates.push(DOMUpdate::InsertText {
                    parent,
                    node,
                    text: contents.borrow().to_string(),
                    pos,
                });
                None
            }
            NodeData::Element { name, attrs, .. } => {
                let node = self.keys.mint();
                self.updates.push(DOMUpdate::InsertElement {
                    parent,
                    node,
                    tag: name.local.to_string(),
                    pos,
                });
                for attr in attrs.borrow().iter() {
                    self.updates.push(DOMUpdate::SetAttr {
                        node,
                        name: attr.name.local.to_string(),
                        value: attr.value.to_string(),
                    });
                }
                Some(node)
            }
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => None,
        }
    }
}

fn is_mirrored(rc_node: &Handle) -> bool {
    matches!(rc_node.data, NodeData::Text { .. } | NodeData::Element { .. })
}

/// Queue the mirrored children of `rc_node` so that they pop in document order.
fn push_children(stack: &mut Vec<PendingNode>, rc_node: &Handle, parent: NodeKey) {
    let children = rc_node.children.borrow();
    let queued: Vec<PendingNode> = children
        .iter()
        .filter(|child| is_mirrored(child))
        .enumerate()
        .map(|(pos, child)| (Rc::clone(child), parent, pos))
        .collect();
    stack.extend(queued.into_iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn builds_html_head_body() -> Result<()> {
        let tree = parse_html("<p id=intro>Hello <b>there</b></p>")?;
        assert!(tree.is_finished());
        let body = tree.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
        let paragraph = tree
            .get_element_by_id("intro")
            .ok_or_else(|| anyhow::anyhow!("no paragraph"))?;
        assert_eq!(tree.parent(paragraph), Some(body));
        assert_eq!(tree.tag_name(paragraph).as_deref(), Some("p"));
        assert_eq!(tree.text_content(paragraph), "Hello there");
        Ok(())
    }

    #[test]
    fn keeps_whitespace_and_drops_comments() -> Result<()> {
        let tree = parse_html("<div> <!-- note --> <p>a</p>\n</div>")?;
        let div = tree
            .get_elements_by_tag_name("div")
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no div"))?;
        let kinds: Vec<bool> = tree
            .child_nodes(div)
            .into_iter()
            .map(|child| tree.is_element(child))
            .collect();
        assert_eq!(kinds, vec![false, false, true, false]);
        assert_eq!(tree.text_content(div), "  a\n");
        Ok(())
    }

    #[test]
    fn deeply_nested_markup_is_mirrored() -> Result<()> {
        let depth = 20_000;
        let html = format!("{}text{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let tree = parse_html(&html)?;
        let body = tree.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
        let outer = tree
            .element_children(body)
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no outer div"))?;
        assert_eq!(tree.tag_name(outer).as_deref(), Some("div"));
        assert_eq!(tree.get_elements_by_tag_name("div").len(), depth);
        assert_eq!(tree.text_content(outer), "text");
        Ok(())
    }

    #[test]
    fn updates_end_with_end_of_document() -> Result<()> {
        let updates = html_to_updates("")?;
        assert!(matches!(updates.last(), Some(DOMUpdate::EndOfDocument)));
        Ok(())
    }
}
