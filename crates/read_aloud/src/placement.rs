//! Where the play control sits relative to the hovered block.

use crate::config::ReaderConfig;
use crate::hover::HoverInfo;

/// Page-coordinate square for the play control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPlacement {
    pub top: f64,
    pub left: f64,
    /// Edge length of the control, equal to the first line height.
    pub size: f64,
}

/// Place the control in the left margin, aligned with the first line of the block.
///
/// The control never moves past the left edge of the page.
pub fn control_placement(hover: &HoverInfo, config: &ReaderConfig) -> ControlPlacement {
    let size = hover.height_of_first_line.max(0.0);
    ControlPlacement {
        top: hover.top,
        left: (hover.left - config.control_gap - size).max(0.0),
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::NodeKey;

    fn hover(left: f64, line: f64) -> HoverInfo {
        HoverInfo {
            element: NodeKey(7),
            top: 50.0,
            left,
            height_of_first_line: line,
        }
    }

    #[test]
    fn sits_left_of_the_block() {
        let placement = control_placement(&hover(100.0, 24.0), &ReaderConfig::default());
        assert_eq!(
            placement,
            ControlPlacement {
                top: 50.0,
                left: 68.0,
                size: 24.0
            }
        );
    }

    #[test]
    fn clamps_to_the_page_edge() {
        let placement = control_placement(&hover(20.0, 24.0), &ReaderConfig::default());
        assert!(placement.left.abs() < f64::EPSILON);
        assert!((placement.size - 24.0).abs() < f64::EPSILON);
    }
}
