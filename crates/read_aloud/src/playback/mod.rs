//! Speaking the hovered block and highlighting the spoken word.
//!
//! Speech and highlighting are platform capabilities injected as trait
//! objects. Boundary and end notifications may arrive long after the block
//! stopped being hovered, or after it left the page, so every utterance carries
//! a snapshot of the text nodes it was built from and a generation number that
//! silences it once a newer utterance has started.

pub mod word_range;

pub use word_range::{TextPosition, TextRange, resolve_word_range};

use word_range::utf16_len;

use crate::config::ReaderConfig;
use crate::hover::HoverInfo;
use dom::{Document, NodeKey, TextNode};
use std::cell::Cell;
use std::rc::Rc;

/// What a named highlight covers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HighlightRange {
    /// The whole node and its contents.
    Node(NodeKey),
    Text(TextRange),
}

/// Platform highlight registry (the CSS Custom Highlight API in browsers).
pub trait HighlightRegistry {
    /// Create or replace the highlight called `name`.
    fn set(&self, name: &str, range: HighlightRange);
    /// Remove every highlight.
    fn clear(&self);
}

/// Callbacks for one utterance. Offsets are UTF-16 code units into the spoken text.
pub trait UtteranceEvents {
    fn on_boundary(&self, char_index: usize, char_length: usize);
    fn on_end(&self);
}

/// Platform speech synthesis.
pub trait SpeechSynthesis {
    /// Queue `text`; `events` receives the boundary and end notifications.
    fn speak(&self, text: &str, events: Rc<dyn UtteranceEvents>);
    /// Stop the current utterance and drop queued ones.
    fn cancel(&self);
}

/// Result of a play request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Started { element: NodeKey, text: String },
    NothingHovered,
    /// The element has no readable text.
    NoText,
    /// The platform offers no speech synthesis.
    SpeechUnavailable,
}

/// Highlights words of one utterance as the speech engine reports them.
struct UtteranceHighlighter {
    generation: u64,
    current: Rc<Cell<u64>>,
    text_nodes: Vec<TextNode>,
    highlights: Rc<dyn HighlightRegistry>,
    word_highlight: String,
}

impl UtteranceHighlighter {
    fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}

impl UtteranceEvents for UtteranceHighlighter {
    fn on_boundary(&self, char_index: usize, char_length: usize) {
        if !self.is_current() {
            log::trace!(target: "read_aloud::playback", "ignoring boundary of superseded utterance {}", self.generation);
            return;
        }
        if let Some(range) = resolve_word_range(&self.text_nodes, char_index, char_length) {
            self.highlights
                .set(&self.word_highlight, HighlightRange::Text(range));
        }
    }

    fn on_end(&self) {
        if !self.is_current() {
            return;
        }
        log::debug!(target: "read_aloud::playback", "utterance {} ended", self.generation);
        self.highlights.clear();
    }
}

/// Starts speech for a readable element.
pub struct PlaybackTrigger {
    speech: Option<Rc<dyn SpeechSynthesis>>,
    highlights: Rc<dyn HighlightRegistry>,
    generation: Rc<Cell<u64>>,
    word_highlight: String,
    block_highlight: String,
}

impl PlaybackTrigger {
    /// `speech` is `None` when the platform has no speech synthesis.
    pub fn new(
        speech: Option<Rc<dyn SpeechSynthesis>>,
        highlights: Rc<dyn HighlightRegistry>,
        config: &ReaderConfig,
    ) -> Self {
        if speech.is_none() {
            log::warn!(target: "read_aloud::playback", "speech synthesis is not available; playback disabled");
        }
        Self {
            speech,
            highlights,
            generation: Rc::new(Cell::new(0)),
            word_highlight: config.word_highlight.clone(),
            block_highlight: config.block_highlight.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.speech.is_some()
    }

    /// Read the hovered element, if any.
    pub fn play<D: Document + ?Sized>(&self, document: &D, hover: Option<&HoverInfo>) -> PlayOutcome {
        match hover {
            Some(info) => self.play_element(document, info.element),
            None => PlayOutcome::NothingHovered,
        }
    }

    /// Cancel whatever is playing, then read `element` aloud.
    pub fn play_element<D: Document + ?Sized>(&self, document: &D, element: NodeKey) -> PlayOutcome {
        let Some(speech) = self.speech.as_ref() else {
            log::warn!(target: "read_aloud::playback", "cannot read {element:?}: speech synthesis unavailable");
            return PlayOutcome::SpeechUnavailable;
        };
        let text_nodes = document.text_nodes(element);
        let text: String = text_nodes.iter().map(|node| node.text.as_str()).collect();
        if text.trim().is_empty() {
            return PlayOutcome::NoText;
        }

        speech.cancel();
        self.highlights.clear();
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        self.highlights
            .set(&self.block_highlight, HighlightRange::Node(element));
        let events = Rc::new(UtteranceHighlighter {
            generation,
            current: Rc::clone(&self.generation),
            text_nodes,
            highlights: Rc::clone(&self.highlights),
            word_highlight: self.word_highlight.clone(),
        });
        log::debug!(target: "read_aloud::playback", "utterance {generation} reading {element:?} ({} UTF-16 units)", utf16_len(&text));
        speech.speak(&text, events);
        PlayOutcome::Started { element, text }
    }

    /// Cancel speech and remove all highlights.
    pub fn stop(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(speech) = self.speech.as_ref() {
            speech.cancel();
        }
        self.highlights.clear();
    }
}
