//! Query-only view of a rendered page and the primitives used to mirror it.
//!
//! The reading assistant never owns the page it inspects. Hosts describe the
//! page through the [`Document`] capability and deliver pointer motion through
//! [`PointerEvents`]. [`PageTree`] and [`Window`] are the in-process
//! implementations used by embedders without a live browser and by tests.

#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

use anyhow::Result;

pub mod document;
pub mod geometry;
pub mod parser;
pub mod style;
pub mod tree;
pub mod window;

pub use document::{Document, TextNode};
pub use geometry::Rect;
pub use parser::parse_html;
pub use style::{ComputedStyle, LineHeight};
pub use tree::PageTree;
pub use window::{ListenerId, PointerEvents, PointerListener, PointerMove, Window};

/// A 64-bit stable key for DOM nodes, shared by every subsystem that refers to the page.
/// The default key is [`NodeKey::ROOT`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Default)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The document node key (always present).
    pub const ROOT: Self = Self(0);
}

/// Mints sequential node keys for a single producer.
#[derive(Debug, Clone)]
pub struct NodeKeyMinter {
    next: u64,
}

impl NodeKeyMinter {
    /// Start minting right after [`NodeKey::ROOT`].
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Return a fresh key.
    pub fn mint(&mut self) -> NodeKey {
        let key = NodeKey(self.next);
        self.next = self.next.wrapping_add(1);
        key
    }
}

impl Default for NodeKeyMinter {
    fn default() -> Self {
        Self::new()
    }
}

/// A batchable mutation applied to a page mirror.
#[derive(Debug, Clone)]
pub enum DOMUpdate {
    InsertElement { parent: NodeKey, node: NodeKey, tag: String, pos: usize },
    InsertText { parent: NodeKey, node: NodeKey, text: String, pos: usize },
    SetAttr { node: NodeKey, name: String, value: String },
    RemoveNode { node: NodeKey },
    EndOfDocument,
}

/// A subscriber that receives [`DOMUpdate`] values and mirrors them into its own state.
pub trait DOMSubscriber {
    /// Apply a single update to the subscriber state.
    ///
    /// # Errors
    /// Returns an error when the update references nodes the subscriber does not know.
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()>;

    /// Apply a batch of updates in order, stopping at the first failure.
    ///
    /// # Errors
    /// Propagates the first error returned by [`DOMSubscriber::apply_update`].
    fn apply_batch(&mut self, batch: Vec<DOMUpdate>) -> Result<()> {
        for update in batch {
            self.apply_update(update)?;
        }
        Ok(())
    }
}
