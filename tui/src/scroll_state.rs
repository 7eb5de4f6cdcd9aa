/// Selection and scroll position for a vertical list of rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub selected_idx: Option<usize>,
    pub scroll_top: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.selected_idx = None;
        self.scroll_top = 0;
    }

    /// Keep the selection inside `0..len`, selecting the first row when nothing is selected.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected_idx = match len {
            0 => None,
            _ => Some(self.selected_idx.unwrap_or(0).min(len - 1)),
        };
        if len == 0 {
            self.scroll_top = 0;
        }
    }

    pub fn move_up_wrap(&mut self, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        self.selected_idx = Some(match self.selected_idx {
            Some(0) | None => len - 1,
            Some(idx) => idx - 1,
        });
    }

    pub fn move_down_wrap(&mut self, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        self.selected_idx = Some(match self.selected_idx {
            Some(idx) if idx + 1 < len => idx + 1,
            _ => 0,
        });
    }

    /// Adjust `scroll_top` so the selected row is inside a viewport of `visible_rows`.
    pub fn ensure_visible(&mut self, len: usize, visible_rows: usize) {
        if len == 0 || visible_rows == 0 {
            self.scroll_top = 0;
            return;
        }
        let Some(selected) = self.selected_idx else {
            self.scroll_top = 0;
            return;
        };
        if selected < self.scroll_top {
            self.scroll_top = selected;
        } else if selected >= self.scroll_top + visible_rows {
            self.scroll_top = selected + 1 - visible_rows;
        }
        self.scroll_top = self.scroll_top.min(len.saturating_sub(visible_rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_in_both_directions() {
        let mut state = ScrollState::new();
        state.clamp_selection(3);
        assert_eq!(state.selected_idx, Some(0));

        state.move_up_wrap(3);
        assert_eq!(state.selected_idx, Some(2));
        state.move_down_wrap(3);
        assert_eq!(state.selected_idx, Some(0));
    }

    #[test]
    fn ensure_visible_scrolls_to_selection() {
        let mut state = ScrollState::new();
        state.clamp_selection(10);
        for _ in 0..6 {
            state.move_down_wrap(10);
        }
        state.ensure_visible(10, 4);
        assert_eq!(state.selected_idx, Some(6));
        assert_eq!(state.scroll_top, 3);

        state.move_down_wrap(10);
        state.move_down_wrap(10);
        state.move_down_wrap(10);
        state.move_down_wrap(10);
        state.ensure_visible(10, 4);
        assert_eq!(state.selected_idx, Some(0));
        assert_eq!(state.scroll_top, 0);
    }

    #[test]
    fn empty_list_clears_selection() {
        let mut state = ScrollState::new();
        state.clamp_selection(2);
        state.clamp_selection(0);
        assert_eq!(state, ScrollState::new());
    }
}
