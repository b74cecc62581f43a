//! Hover tracking over the readable elements.
//!
//! [`next_hover_state`] is the pure reducer: it maps one pointer move onto the
//! element list and returns the new state. [`HoverTracker`] owns the window
//! listener that runs the reducer on every move and publishes the result.

use crate::config::ReaderConfig;
use dom::{Document, ListenerId, NodeKey, PointerEvents, PointerListener, PointerMove};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The hovered readable element and where to anchor UI next to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverInfo {
    pub element: NodeKey,
    /// Top edge in page coordinates.
    pub top: f64,
    /// Left edge in page coordinates.
    pub left: f64,
    /// Used line height of the element's first rendered line of text.
    pub height_of_first_line: f64,
}

/// `None` means no readable element is hovered.
pub type HoverState = Option<HoverInfo>;

/// Used line height of the first line of text inside `element`.
///
/// The line is measured with the computed style of the element that directly
/// holds the first non-blank text node; elements without text use their own
/// style. `line-height: normal` is approximated as `normal_factor × font-size`.
pub fn line_height_of_first_line<D: Document + ?Sized>(
    document: &D,
    element: NodeKey,
    normal_factor: f64,
) -> f64 {
    let holder = document
        .text_nodes(element)
        .into_iter()
        .find(|text_node| !text_node.text.trim().is_empty())
        .and_then(|text_node| document.parent(text_node.node))
        .unwrap_or(element);
    document
        .computed_style(holder)
        .or_else(|| document.computed_style(element))
        .unwrap_or_default()
        .line_height_px(normal_factor)
}

/// The first element of `elements`, in sequence order, whose page bounds contain the point.
pub fn hit_test<D: Document + ?Sized>(document: &D, elements: &[NodeKey], x: f64, y: f64) -> Option<NodeKey> {
    elements.iter().copied().find(|element| {
        document
            .page_bounds(*element)
            .is_some_and(|bounds| bounds.contains_point(x, y))
    })
}

/// Compute the hover state after `event`.
///
/// The state is recomputed from scratch; `previous` is only consulted to log
/// transitions.
pub fn next_hover_state<D: Document + ?Sized>(
    previous: Option<&HoverInfo>,
    event: PointerMove,
    elements: &[NodeKey],
    document: &D,
    normal_factor: f64,
) -> HoverState {
    let next = hit_test(document, elements, event.x, event.y).and_then(|element| {
        let bounds = document.page_bounds(element)?;
        Some(HoverInfo {
            element,
            top: bounds.top(),
            left: bounds.left(),
            height_of_first_line: line_height_of_first_line(document, element, normal_factor),
        })
    });
    let before = previous.map(|info| info.element);
    let after = next.as_ref().map(|info| info.element);
    if before != after {
        log::debug!(target: "read_aloud::hover", "hover {before:?} -> {after:?} at ({}, {})", event.x, event.y);
    }
    next
}

/// Handle returned by [`HoverTracker::watch`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

type Watcher = Rc<dyn Fn(Option<&HoverInfo>)>;

struct TrackerShared {
    elements: RefCell<Vec<NodeKey>>,
    state: Cell<HoverState>,
    watchers: RefCell<Vec<(WatchId, Watcher)>>,
    next_watch: Cell<u64>,
}

impl TrackerShared {
    fn publish(&self, next: HoverState) {
        self.state.set(next);
        let watchers: Vec<Watcher> = self
            .watchers
            .borrow()
            .iter()
            .map(|(_, watcher)| Rc::clone(watcher))
            .collect();
        for watcher in watchers {
            watcher(next.as_ref());
        }
    }
}

/// Tracks which readable element the pointer is over.
///
/// Attaching registers exactly one pointer-move listener on the event source;
/// [`HoverTracker::dispose`] or dropping the tracker removes it exactly once
/// and clears the state.
pub struct HoverTracker<E: PointerEvents> {
    shared: Rc<TrackerShared>,
    events: E,
    listener: Option<ListenerId>,
}

impl<E: PointerEvents> HoverTracker<E> {
    /// Start tracking `elements` of `document` on the `events` source.
    pub fn attach<D>(events: E, document: D, elements: Vec<NodeKey>, config: &ReaderConfig) -> Self
    where
        D: Document + 'static,
    {
        let shared = Rc::new(TrackerShared {
            elements: RefCell::new(elements),
            state: Cell::new(None),
            watchers: RefCell::new(Vec::new()),
            next_watch: Cell::new(0),
        });
        let normal_factor = config.normal_line_height_factor;
        let listener_shared = Rc::clone(&shared);
        let listener: PointerListener = Rc::new(move |event| {
            let previous = listener_shared.state.get();
            let next = {
                let elements = listener_shared.elements.borrow();
                next_hover_state(previous.as_ref(), event, &elements, &document, normal_factor)
            };
            listener_shared.publish(next);
        });
        let id = events.add_pointer_move_listener(listener);
        log::debug!(target: "read_aloud::hover", "attached pointer listener {id:?}");
        Self {
            shared,
            events,
            listener: Some(id),
        }
    }

    /// The current hover state.
    pub fn state(&self) -> HoverState {
        self.shared.state.get()
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// The element sequence currently hit-tested against.
    pub fn elements(&self) -> Vec<NodeKey> {
        self.shared.elements.borrow().clone()
    }

    /// Replace the element sequence after the page changed.
    ///
    /// The listener stays attached and a hover on an element that is still in
    /// the new sequence is left alone until the next pointer move. A hovered
    /// element missing from the new sequence is dropped immediately: the hover
    /// state must always name a member of the tracked sequence, and that takes
    /// precedence over leaving the state untouched between pointer moves.
    pub fn set_elements(&self, elements: Vec<NodeKey>) {
        let stale = self
            .shared
            .state
            .get()
            .is_some_and(|info| !elements.contains(&info.element));
        *self.shared.elements.borrow_mut() = elements;
        if stale {
            self.shared.publish(None);
        }
    }

    /// Call `watcher` with the new state after every pointer move.
    pub fn watch(&self, watcher: impl Fn(Option<&HoverInfo>) + 'static) -> WatchId {
        let id = WatchId(self.shared.next_watch.get());
        self.shared.next_watch.set(id.0.wrapping_add(1));
        self.shared.watchers.borrow_mut().push((id, Rc::new(watcher)));
        id
    }

    /// Stop notifying a watcher; returns `false` if it was not registered.
    pub fn unwatch(&self, id: WatchId) -> bool {
        let mut watchers = self.shared.watchers.borrow_mut();
        let before = watchers.len();
        watchers.retain(|(existing, _)| *existing != id);
        watchers.len() != before
    }

    /// Detach the listener and clear the state.
    pub fn dispose(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        if !self.events.remove_pointer_move_listener(id) {
            log::warn!(target: "read_aloud::hover", "pointer listener {id:?} was already gone");
        }
        if self.shared.state.get().is_some() {
            self.shared.publish(None);
        }
        log::debug!(target: "read_aloud::hover", "detached pointer listener {id:?}");
    }
}

impl<E: PointerEvents> Drop for HoverTracker<E> {
    fn drop(&mut self) {
        self.detach();
    }
}
