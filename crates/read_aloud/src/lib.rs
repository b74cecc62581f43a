//! Hover-to-listen reading assistant.
//!
//! The assistant finds the top-level readable blocks of a page, follows the
//! pointer across them and reads the hovered block aloud, highlighting each
//! spoken word. Page access, pointer events, speech and highlighting are all
//! injected capabilities; see the `dom` crate for the page side.

#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod assistant;
pub mod classifier;
pub mod config;
pub mod hover;
pub mod placement;
pub mod playback;

pub use assistant::ReadAloud;
pub use classifier::{BLOCK_LIST, ReadableElement, classify, describe, is_block_listed};
pub use config::ReaderConfig;
pub use hover::{HoverInfo, HoverState, HoverTracker, WatchId, hit_test, line_height_of_first_line, next_hover_state};
pub use placement::{ControlPlacement, control_placement};
pub use playback::{
    HighlightRange, HighlightRegistry, PlayOutcome, PlaybackTrigger, SpeechSynthesis, TextPosition, TextRange,
    UtteranceEvents, resolve_word_range,
};
