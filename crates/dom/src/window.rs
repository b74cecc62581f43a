//! Window-scoped pointer events.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A pointer-move event in page coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerMove {
    pub x: f64,
    pub y: f64,
}

impl PointerMove {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Handle returned when a listener is attached; needed to detach it again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type PointerListener = Rc<dyn Fn(PointerMove)>;

/// A source of pointer-move events, such as the browser window.
///
/// Single-threaded: listeners run synchronously, one event at a time.
pub trait PointerEvents {
    /// Attach a pointer-move listener.
    fn add_pointer_move_listener(&self, listener: PointerListener) -> ListenerId;

    /// Detach a listener; returns `false` if it was not attached.
    fn remove_pointer_move_listener(&self, id: ListenerId) -> bool;
}

impl<E: PointerEvents + ?Sized> PointerEvents for Rc<E> {
    fn add_pointer_move_listener(&self, listener: PointerListener) -> ListenerId {
        (**self).add_pointer_move_listener(listener)
    }

    fn remove_pointer_move_listener(&self, id: ListenerId) -> bool {
        (**self).remove_pointer_move_listener(id)
    }
}

/// In-process window that fans pointer events out to its listeners.
#[derive(Default)]
pub struct Window {
    listeners: RefCell<Vec<(ListenerId, PointerListener)>>,
    next_id: Cell<u64>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently attached pointer-move listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver a pointer move to every listener attached at the time of the call.
    ///
    /// Listeners may attach or detach listeners while being dispatched to; those
    /// changes apply from the next event on.
    pub fn dispatch_pointer_move(&self, x: f64, y: f64) {
        let event = PointerMove::new(x, y);
        let snapshot: Vec<PointerListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        log::trace!(target: "window", "pointer move ({x}, {y}) to {} listeners", snapshot.len());
        for listener in snapshot {
            listener(event);
        }
    }
}

impl PointerEvents for Window {
    fn add_pointer_move_listener(&self, listener: PointerListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_pointer_move_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}
