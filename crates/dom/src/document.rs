//! The query-only page capability consumed by the reading assistant.

use crate::geometry::Rect;
use crate::style::ComputedStyle;
use crate::NodeKey;
use std::cell::RefCell;
use std::rc::Rc;

/// A text node captured together with its content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode {
    pub node: NodeKey,
    pub text: String,
}

/// Read access to a rendered page owned by someone else.
///
/// Implementations answer for the page as it is at the moment of the call;
/// nodes may disappear between calls, in which case the accessors return
/// `None` or empty collections. Every accessor returns owned data so that
/// implementations can sit behind `RefCell` without leaking borrows.
pub trait Document {
    /// The document node.
    fn root(&self) -> NodeKey;

    /// The `<body>` element, if the page has one.
    fn body(&self) -> Option<NodeKey>;

    fn parent(&self, node: NodeKey) -> Option<NodeKey>;

    /// All child nodes (elements and text) in document order.
    fn child_nodes(&self, node: NodeKey) -> Vec<NodeKey>;

    /// Tag name as stored by the page, `None` for non-elements.
    fn tag_name(&self, node: NodeKey) -> Option<String>;

    /// Character data, `None` for non-text nodes.
    fn text(&self, node: NodeKey) -> Option<String>;

    /// Border box relative to the viewport, `None` when the node is not laid out.
    fn bounding_client_rect(&self, node: NodeKey) -> Option<Rect>;

    fn computed_style(&self, node: NodeKey) -> Option<ComputedStyle>;

    /// Current scroll position of the viewport as `(x, y)`.
    fn scroll_offset(&self) -> (f64, f64);

    fn is_element(&self, node: NodeKey) -> bool {
        self.tag_name(node).is_some()
    }

    /// Child elements only, the equivalent of `Element.children`.
    fn element_children(&self, node: NodeKey) -> Vec<NodeKey> {
        self.child_nodes(node)
            .into_iter()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Every element strictly below `node`, in document (pre-)order.
    fn descendant_elements(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.element_children(node).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.element_children(current).into_iter().rev());
        }
        out
    }

    /// Text nodes at or below `node`, in document order.
    fn text_nodes(&self, node: NodeKey) -> Vec<TextNode> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(text) = self.text(current) {
                out.push(TextNode {
                    node: current,
                    text,
                });
                continue;
            }
            stack.extend(self.child_nodes(current).into_iter().rev());
        }
        out
    }

    /// Concatenated text of every descendant text node (`textContent`).
    fn text_content(&self, node: NodeKey) -> String {
        self.text_nodes(node)
            .into_iter()
            .map(|text_node| text_node.text)
            .collect()
    }

    /// Bounding box in page coordinates: the viewport box offset by the scroll position.
    fn page_bounds(&self, node: NodeKey) -> Option<Rect> {
        let (scroll_x, scroll_y) = self.scroll_offset();
        self.bounding_client_rect(node)
            .map(|rect| rect.translated(scroll_x, scroll_y))
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    fn is_ancestor_of(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }
}

macro_rules! forward_document {
    ($target:ty, $inner:ident => $access:expr) => {
        impl<D: Document + ?Sized> Document for $target {
            fn root(&self) -> NodeKey {
                let $inner = self;
                $access.root()
            }
            fn body(&self) -> Option<NodeKey> {
                let $inner = self;
                $access.body()
            }
            fn parent(&self, node: NodeKey) -> Option<NodeKey> {
                let $inner = self;
                $access.parent(node)
            }
            fn child_nodes(&self, node: NodeKey) -> Vec<NodeKey> {
                let $inner = self;
                $access.child_nodes(node)
            }
            fn tag_name(&self, node: NodeKey) -> Option<String> {
                let $inner = self;
                $access.tag_name(node)
            }
            fn text(&self, node: NodeKey) -> Option<String> {
                let $inner = self;
                $access.text(node)
            }
            fn bounding_client_rect(&self, node: NodeKey) -> Option<Rect> {
                let $inner = self;
                $access.bounding_client_rect(node)
            }
            fn computed_style(&self, node: NodeKey) -> Option<ComputedStyle> {
                let $inner = self;
                $access.computed_style(node)
            }
            fn scroll_offset(&self) -> (f64, f64) {
                let $inner = self;
                $access.scroll_offset()
            }
        }
    };
}

forward_document!(&D, this => (**this));
forward_document!(Rc<D>, this => (**this));
forward_document!(RefCell<D>, this => this.borrow());
