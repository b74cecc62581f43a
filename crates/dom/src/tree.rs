//! In-process page mirror.
//!
//! `PageTree` subscribes to [`DOMUpdate`] batches and keeps the node graph in an
//! `indextree` arena keyed by [`NodeKey`]. Hosts that do their own layout attach
//! viewport rectangles and the scroll offset, which is all the geometry the
//! [`Document`] capability exposes.

use crate::document::Document;
use crate::geometry::Rect;
use crate::style::ComputedStyle;
use crate::{DOMSubscriber, DOMUpdate, NodeKey};
use anyhow::{Result, anyhow};
use indextree::{Arena, Node, NodeId};
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PageNode {
    pub key: NodeKey,
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

impl PageNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug)]
pub struct PageTree {
    arena: Arena<PageNode>,
    root: NodeId,
    ids: HashMap<NodeKey, NodeId>,
    layout: HashMap<NodeKey, Rect>,
    style_overrides: HashMap<NodeKey, ComputedStyle>,
    scroll: (f64, f64),
    finished: bool,
}

impl Default for PageTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(PageNode::default());
        let mut ids = HashMap::new();
        ids.insert(NodeKey::ROOT, root);
        Self {
            arena,
            root,
            ids,
            layout: HashMap::new(),
            style_overrides: HashMap::new(),
            scroll: (0.0, 0.0),
            finished: false,
        }
    }

    /// Whether an [`DOMUpdate::EndOfDocument`] has been applied.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn contains(&self, node: NodeKey) -> bool {
        self.ids.contains_key(&node)
    }

    pub fn node(&self, node: NodeKey) -> Option<&PageNode> {
        let id = self.ids.get(&node)?;
        self.arena.get(*id).map(Node::get)
    }

    pub fn attribute(&self, node: NodeKey, name: &str) -> Option<&str> {
        self.node(node)?.attr(name)
    }

    /// Find the first element with the given `id` attribute, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeKey> {
        self.root
            .descendants(&self.arena)
            .filter_map(|node_id| self.arena.get(node_id))
            .map(Node::get)
            .find(|node| node.attr("id") == Some(id))
            .map(|node| node.key)
    }

    /// Elements with the given tag name (ASCII case-insensitive), in document order.
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Vec<NodeKey> {
        self.root
            .descendants(&self.arena)
            .filter_map(|node_id| self.arena.get(node_id))
            .map(Node::get)
            .filter(|node| matches!(&node.kind, NodeKind::Element { tag: name } if name.eq_ignore_ascii_case(tag)))
            .map(|node| node.key)
            .collect()
    }

    /// Record the viewport-relative border box of a node.
    pub fn set_layout(&mut self, node: NodeKey, rect: Rect) {
        self.layout.insert(node, rect);
    }

    pub fn clear_layout(&mut self, node: NodeKey) {
        self.layout.remove(&node);
    }

    pub fn set_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        self.scroll = (scroll_x, scroll_y);
    }

    /// Replace the inline-style cascade for a node with a host-computed style.
    pub fn set_computed_style(&mut self, node: NodeKey, style: ComputedStyle) {
        self.style_overrides.insert(node, style);
    }

    fn id_of(&self, node: NodeKey) -> Result<NodeId> {
        self.ids
            .get(&node)
            .copied()
            .ok_or_else(|| anyhow!("unknown node {node:?}"))
    }

    fn insert(&mut self, parent: NodeKey, node: NodeKey, kind: NodeKind, pos: usize) -> Result<()> {
        if self.ids.contains_key(&node) {
            return Err(anyhow!("node {node:?} inserted twice"));
        }
        let parent_id = self.id_of(parent)?;
        if matches!(self.arena[parent_id].get().kind, NodeKind::Text { .. }) {
            return Err(anyhow!("text node {parent:?} cannot have children"));
        }
        let child_id = self.arena.new_node(PageNode {
            key: node,
            kind,
            attrs: SmallVec::new(),
        });
        let sibling = parent_id.children(&self.arena).nth(pos);
        let attached = match sibling {
            Some(sibling_id) => sibling_id.checked_insert_before(child_id, &mut self.arena),
            None => parent_id.checked_append(child_id, &mut self.arena),
        };
        attached.map_err(|err| anyhow!("failed to attach {node:?} to {parent:?}: {err}"))?;
        self.ids.insert(node, child_id);
        Ok(())
    }

    fn remove(&mut self, node: NodeKey) -> Result<()> {
        if node == NodeKey::ROOT {
            return Err(anyhow!("the document node cannot be removed"));
        }
        let id = self.id_of(node)?;
        let removed: Vec<NodeKey> = id
            .descendants(&self.arena)
            .filter_map(|node_id| self.arena.get(node_id))
            .map(|entry| entry.get().key)
            .collect();
        id.remove_subtree(&mut self.arena);
        for key in removed {
            self.ids.remove(&key);
            self.layout.remove(&key);
            self.style_overrides.remove(&key);
        }
        Ok(())
    }

    fn set_attr(&mut self, node: NodeKey, name: String, value: String) -> Result<()> {
        let id = self.id_of(node)?;
        let entry = self.arena[id].get_mut();
        if !matches!(entry.kind, NodeKind::Element { .. }) {
            return Err(anyhow!("attribute {name} set on non-element {node:?}"));
        }
        if let Some(existing) = entry
            .attrs
            .iter_mut()
            .find(|(attr_name, _)| attr_name.eq_ignore_ascii_case(&name))
        {
            existing.1 = value;
        } else {
            entry.attrs.push((name, value));
        }
        Ok(())
    }
}

impl DOMSubscriber for PageTree {
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()> {
        match update {
            DOMUpdate::InsertElement {
                parent,
                node,
                tag,
                pos,
            } => self.insert(parent, node, NodeKind::Element { tag }, pos),
            DOMUpdate::InsertText {
                parent,
                node,
                text,
                pos,
            } => self.insert(parent, node, NodeKind::Text { text }, pos),
            DOMUpdate::SetAttr { node, name, value } => self.set_attr(node, name, value),
            DOMUpdate::RemoveNode { node } => self.remove(node),
            DOMUpdate::EndOfDocument => {
                self.finished = true;
                log::debug!(target: "dom", "document finished with {} nodes", self.ids.len());
                Ok(())
            }
        }
    }
}

impl Document for PageTree {
    fn root(&self) -> NodeKey {
        NodeKey::ROOT
    }

    fn body(&self) -> Option<NodeKey> {
        let html = self
            .element_children(NodeKey::ROOT)
            .into_iter()
            .find(|node| self.tag_is(*node, "html"))?;
        self.element_children(html)
            .into_iter()
            .find(|node| self.tag_is(*node, "body"))
    }

    fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        let id = self.ids.get(&node)?;
        let parent = self.arena.get(*id)?.parent()?;
        self.arena.get(parent).map(|entry| entry.get().key)
    }

    fn child_nodes(&self, node: NodeKey) -> Vec<NodeKey> {
        let Some(id) = self.ids.get(&node) else {
            return Vec::new();
        };
        id.children(&self.arena)
            .filter_map(|child| self.arena.get(child))
            .map(|entry| entry.get().key)
            .collect()
    }

    fn tag_name(&self, node: NodeKey) -> Option<String> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag } => Some(tag.clone()),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }

    fn text(&self, node: NodeKey) -> Option<String> {
        match &self.node(node)?.kind {
            NodeKind::Text { text } => Some(text.clone()),
            NodeKind::Document | NodeKind::Element { .. } => None,
        }
    }

    fn bounding_client_rect(&self, node: NodeKey) -> Option<Rect> {
        if !self.contains(node) {
            return None;
        }
        self.layout.get(&node).copied()
    }

    /// Host overrides win; otherwise inline `style` attributes are cascaded
    /// from the document down, starting at the initial values.
    fn computed_style(&self, node: NodeKey) -> Option<ComputedStyle> {
        if !self.is_element(node) {
            return None;
        }
        if let Some(style) = self.style_overrides.get(&node) {
            return Some(*style);
        }
        let mut chain = vec![node];
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            if self.style_overrides.contains_key(&ancestor) || !self.is_element(ancestor) {
                break;
            }
            chain.push(ancestor);
            current = self.parent(ancestor);
        }
        let base = current
            .and_then(|ancestor| self.style_overrides.get(&ancestor).copied())
            .unwrap_or_default();
        let style = chain.iter().rev().fold(base, |parent_style, element| {
            parent_style.inherit_with(self.attribute(*element, "style"))
        });
        Some(style)
    }

    fn scroll_offset(&self) -> (f64, f64) {
        self.scroll
    }
}

impl PageTree {
    fn tag_is(&self, node: NodeKey, tag: &str) -> bool {
        matches!(self.node(node).map(|entry| &entry.kind), Some(NodeKind::Element { tag: name }) if name.eq_ignore_ascii_case(tag))
    }
}
