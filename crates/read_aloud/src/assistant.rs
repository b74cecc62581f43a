//! The mounted reading assistant for one page.

use crate::classifier::{ReadableElement, classify, describe};
use crate::config::ReaderConfig;
use crate::hover::{HoverInfo, HoverState, HoverTracker, WatchId};
use crate::placement::{ControlPlacement, control_placement};
use crate::playback::{HighlightRegistry, PlayOutcome, PlaybackTrigger, SpeechSynthesis};
use dom::{Document, NodeKey, PointerEvents};
use std::rc::Rc;

/// Classifier, hover tracker and playback wired to one document and window.
///
/// `D` is usually a shared handle such as `Rc<PageTree>` or
/// `Rc<RefCell<PageTree>>`; the tracker keeps its own clone for the lifetime
/// of the mount.
pub struct ReadAloud<D, E>
where
    D: Document + Clone + 'static,
    E: PointerEvents,
{
    document: D,
    tracker: HoverTracker<E>,
    playback: PlaybackTrigger,
    config: ReaderConfig,
}

impl<D, E> ReadAloud<D, E>
where
    D: Document + Clone + 'static,
    E: PointerEvents,
{
    /// Classify the page and start tracking the pointer on `events`.
    pub fn mount(
        document: D,
        events: E,
        speech: Option<Rc<dyn SpeechSynthesis>>,
        highlights: Rc<dyn HighlightRegistry>,
        config: ReaderConfig,
    ) -> Self {
        let elements = classify(&document);
        log::info!(target: "read_aloud", "mounted with {} readable elements", elements.len());
        let tracker = HoverTracker::attach(events, document.clone(), elements, &config);
        let playback = PlaybackTrigger::new(speech, highlights, &config);
        Self {
            document,
            tracker,
            playback,
            config,
        }
    }

    /// Reclassify after the page changed; returns the new element count.
    pub fn refresh(&self) -> usize {
        let elements = classify(&self.document);
        let count = elements.len();
        self.tracker.set_elements(elements);
        log::debug!(target: "read_aloud", "refreshed: {count} readable elements");
        count
    }

    /// The readable elements currently tracked.
    pub fn elements(&self) -> Vec<NodeKey> {
        self.tracker.elements()
    }

    /// The tracked elements with tag, bounds and text.
    pub fn describe_elements(&self) -> Vec<ReadableElement> {
        self.tracker
            .elements()
            .into_iter()
            .filter_map(|node| describe(&self.document, node))
            .collect()
    }

    pub fn hover(&self) -> HoverState {
        self.tracker.state()
    }

    /// Where to draw the play control, `None` while nothing is hovered.
    pub fn placement(&self) -> Option<ControlPlacement> {
        self.tracker
            .state()
            .map(|info| control_placement(&info, &self.config))
    }

    pub fn watch(&self, watcher: impl Fn(Option<&HoverInfo>) + 'static) -> WatchId {
        self.tracker.watch(watcher)
    }

    pub fn unwatch(&self, id: WatchId) -> bool {
        self.tracker.unwatch(id)
    }

    pub fn speech_available(&self) -> bool {
        self.playback.is_available()
    }

    /// Read the hovered element aloud.
    pub fn play(&self) -> PlayOutcome {
        let hover = self.tracker.state();
        self.playback.play(&self.document, hover.as_ref())
    }

    pub fn stop(&self) {
        self.playback.stop();
    }

    /// Stop speech, clear highlights and detach the pointer listener.
    pub fn unmount(self) {
        self.playback.stop();
        self.tracker.dispose();
        log::info!(target: "read_aloud", "unmounted");
    }
}
