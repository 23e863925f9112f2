//! Popup position relative to the selected text.
//!
//! The popup goes above the selection when there is room, otherwise below,
//! and to whichever side of the selection has more horizontal space.

pub const POPUP_WIDTH: f64 = 520.0;
pub const POPUP_HEIGHT: f64 = 180.0;
pub const MIN_DISTANCE: f64 = 24.0;
const EXTRA_LEFT_DISTANCE: f64 = MIN_DISTANCE + 32.0;

/// Bounding box of the selection in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Document coordinates of the popup's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub top: f64,
    pub left: f64,
}

pub fn place_popup(anchor: &Rect, viewport: &Viewport) -> Placement {
    let top = if anchor.top > POPUP_HEIGHT + MIN_DISTANCE {
        viewport.scroll_y + anchor.top - POPUP_HEIGHT - MIN_DISTANCE
    } else {
        viewport.scroll_y + anchor.bottom + MIN_DISTANCE
    };

    let space_left = anchor.left;
    let space_right = viewport.width - anchor.right;
    let left = if space_right >= space_left {
        let left = viewport.scroll_x + anchor.right + MIN_DISTANCE;
        if left + POPUP_WIDTH > viewport.width {
            viewport.width - POPUP_WIDTH - MIN_DISTANCE
        } else {
            left
        }
    } else {
        let left = viewport.scroll_x + anchor.left - POPUP_WIDTH - EXTRA_LEFT_DISTANCE;
        if left < 0.0 {
            EXTRA_LEFT_DISTANCE
        } else {
            left
        }
    };

    Placement { top, left }
}
