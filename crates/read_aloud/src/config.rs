//! Configuration settings for the reading assistant.
//!
//! Configuration can be loaded from environment variables or constructed
//! programmatically. Invalid values fall back to the defaults.

use std::env;

/// Multiplier applied to the font size when `line-height` is `normal`.
pub const DEFAULT_LINE_HEIGHT_FACTOR: f64 = 1.2;
/// Highlight name used for the word currently being spoken.
pub const DEFAULT_WORD_HIGHLIGHT: &str = "read-aloud-word";
/// Highlight name used for the block being read.
pub const DEFAULT_BLOCK_HIGHLIGHT: &str = "read-aloud-block";
/// Horizontal gap between the play control and the block, in CSS pixels.
pub const DEFAULT_CONTROL_GAP: f64 = 8.0;

/// Runtime configuration for the reading assistant.
#[derive(Clone, Debug, PartialEq)]
pub struct ReaderConfig {
    /// Approximation factor for `line-height: normal`
    pub normal_line_height_factor: f64,
    /// Highlight name for the spoken word
    pub word_highlight: String,
    /// Highlight name for the whole block
    pub block_highlight: String,
    /// Gap between the play control and the hovered block
    pub control_gap: f64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            normal_line_height_factor: DEFAULT_LINE_HEIGHT_FACTOR,
            word_highlight: DEFAULT_WORD_HIGHLIGHT.to_owned(),
            block_highlight: DEFAULT_BLOCK_HIGHLIGHT.to_owned(),
            control_gap: DEFAULT_CONTROL_GAP,
        }
    }
}

impl ReaderConfig {
    /// Construct a new `ReaderConfig` with explicit values.
    ///
    /// # Arguments
    ///
    /// * `normal_line_height_factor` - Must be positive and finite, otherwise the default is used
    /// * `word_highlight` - Highlight name for the spoken word; empty means the default
    /// * `block_highlight` - Highlight name for the block; empty means the default
    /// * `control_gap` - Must be non-negative and finite, otherwise the default is used
    #[must_use]
    pub fn new(
        normal_line_height_factor: f64,
        word_highlight: &str,
        block_highlight: &str,
        control_gap: f64,
    ) -> Self {
        Self {
            normal_line_height_factor: valid_factor(normal_line_height_factor)
                .unwrap_or(DEFAULT_LINE_HEIGHT_FACTOR),
            word_highlight: non_empty(word_highlight).unwrap_or(DEFAULT_WORD_HIGHLIGHT).to_owned(),
            block_highlight: non_empty(block_highlight)
                .unwrap_or(DEFAULT_BLOCK_HIGHLIGHT)
                .to_owned(),
            control_gap: valid_gap(control_gap).unwrap_or(DEFAULT_CONTROL_GAP),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `READ_ALOUD_LINE_HEIGHT_FACTOR`: factor for `line-height: normal` (default: 1.2)
    /// - `READ_ALOUD_WORD_HIGHLIGHT`: word highlight name (default: `read-aloud-word`)
    /// - `READ_ALOUD_BLOCK_HIGHLIGHT`: block highlight name (default: `read-aloud-block`)
    /// - `READ_ALOUD_CONTROL_GAP`: gap in pixels next to the play control (default: 8)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ReaderConfig::from_env`], reading values through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let normal_line_height_factor = lookup("READ_ALOUD_LINE_HEIGHT_FACTOR")
            .and_then(|val| val.trim().parse::<f64>().ok())
            .and_then(valid_factor)
            .unwrap_or(DEFAULT_LINE_HEIGHT_FACTOR);
        let word_highlight = lookup("READ_ALOUD_WORD_HIGHLIGHT")
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WORD_HIGHLIGHT.to_owned());
        let block_highlight = lookup("READ_ALOUD_BLOCK_HIGHLIGHT")
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BLOCK_HIGHLIGHT.to_owned());
        let control_gap = lookup("READ_ALOUD_CONTROL_GAP")
            .and_then(|val| val.trim().parse::<f64>().ok())
            .and_then(valid_gap)
            .unwrap_or(DEFAULT_CONTROL_GAP);
        Self {
            normal_line_height_factor,
            word_highlight,
            block_highlight,
            control_gap,
        }
    }
}

fn valid_factor(factor: f64) -> Option<f64> {
    (factor.is_finite() && factor > 0.0).then_some(factor)
}

fn valid_gap(gap: f64) -> Option<f64> {
    (gap.is_finite() && gap >= 0.0).then_some(gap)
}

fn non_empty(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("READ_ALOUD_LINE_HEIGHT_FACTOR", "1.5"),
            ("READ_ALOUD_WORD_HIGHLIGHT", "spoken"),
            ("READ_ALOUD_CONTROL_GAP", " 4 "),
        ]
        .into_iter()
        .collect();
        let config = ReaderConfig::from_lookup(|name| vars.get(name).map(|val| (*val).to_owned()));
        assert!((config.normal_line_height_factor - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.word_highlight, "spoken");
        assert_eq!(config.block_highlight, DEFAULT_BLOCK_HIGHLIGHT);
        assert!((config.control_gap - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ReaderConfig::from_lookup(|name| match name {
            "READ_ALOUD_LINE_HEIGHT_FACTOR" => Some("-2".to_owned()),
            "READ_ALOUD_CONTROL_GAP" => Some("wide".to_owned()),
            "READ_ALOUD_BLOCK_HIGHLIGHT" => Some("   ".to_owned()),
            _ => None,
        });
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn explicit_construction_validates() {
        let config = ReaderConfig::new(f64::NAN, "", "block", -1.0);
        assert!((config.normal_line_height_factor - DEFAULT_LINE_HEIGHT_FACTOR).abs() < f64::EPSILON);
        assert_eq!(config.word_highlight, DEFAULT_WORD_HIGHLIGHT);
        assert_eq!(config.block_highlight, "block");
        assert!((config.control_gap - DEFAULT_CONTROL_GAP).abs() < f64::EPSILON);
    }
}
