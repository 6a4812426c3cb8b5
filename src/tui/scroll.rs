// Viewport synchronizer for the entry list
//
// Keeps the highlighted item visible by issuing scroll corrections after
// the selection moves. Works in abstract row units so the correction logic
// is independent of how tall a rendered item is.

/// Scroll state for the entry list viewport
#[derive(Debug, Clone)]
pub struct ViewportSync {
    /// Row offset of the first visible line
    offset: usize,

    /// Visible window height in rows
    viewport: usize,

    /// Context rows kept between the item and the window edge after a
    /// correction
    margin: usize,
}

impl ViewportSync {
    pub fn new(margin: usize) -> Self {
        Self {
            offset: 0,
            viewport: 0,
            margin,
        }
    }

    /// Update the window height. Call each render frame with the list area.
    pub fn set_viewport(&mut self, rows: usize) {
        self.viewport = rows;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reconcile the offset with the current selection.
    ///
    /// Selection at index 0 always forces a scroll to the start - that
    /// covers a fresh search resetting the selection while the old offset
    /// points somewhere deep in the list. Otherwise the offset only moves
    /// when the selected item's edges leave the window: up so the top edge
    /// sits `margin` rows below the window top, down symmetrically.
    pub fn sync(&mut self, selected: usize, item_height: usize, total_items: usize) {
        if selected == 0 {
            self.offset = 0;
            return;
        }

        let top = selected * item_height;
        let bottom = top + item_height;

        if top < self.offset {
            self.offset = top.saturating_sub(self.margin);
        } else if bottom > self.offset + self.viewport {
            self.offset = (bottom + self.margin).saturating_sub(self.viewport);
        }

        // Never scroll past the end of the content
        let max_offset = (total_items * item_height).saturating_sub(self.viewport);
        self.offset = self.offset.min(max_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synced(margin: usize, viewport: usize, offset: usize) -> ViewportSync {
        let mut sync = ViewportSync::new(margin);
        sync.set_viewport(viewport);
        sync.offset = offset;
        sync
    }

    #[test]
    fn test_selection_zero_forces_start() {
        let mut sync = synced(8, 20, 300);
        sync.sync(0, 1, 100);
        assert_eq!(sync.offset(), 0);
    }

    #[test]
    fn test_item_above_window_scrolls_up_with_margin() {
        let mut sync = synced(8, 40, 50);
        // Item 30 (rows 30..31) is above the window starting at row 50
        sync.sync(30, 1, 100);
        assert_eq!(sync.offset(), 22); // top edge 8 rows below window top
    }

    #[test]
    fn test_item_below_window_scrolls_down_with_margin() {
        let mut sync = synced(8, 40, 0);
        // Item 60 ends at row 61, window covers 0..40
        sync.sync(60, 1, 100);
        assert_eq!(sync.offset(), 29); // 61 + 8 - 40
    }

    #[test]
    fn test_visible_item_leaves_offset_alone() {
        let mut sync = synced(8, 40, 10);
        sync.sync(25, 1, 100);
        assert_eq!(sync.offset(), 10);
    }

    #[test]
    fn test_taller_items_use_both_edges() {
        let mut sync = synced(1, 10, 0);
        // Item 4 with height 3 spans rows 12..15, below a 10-row window
        sync.sync(4, 3, 20);
        assert_eq!(sync.offset(), 6); // 15 + 1 - 10
    }

    #[test]
    fn test_offset_clamped_to_content_end() {
        let mut sync = synced(8, 40, 0);
        sync.sync(49, 1, 50);
        assert_eq!(sync.offset(), 10); // only 50 rows of content
    }
}
