//! Suggestion dropdown rendered under the search input.
//!
//! Purely presentational: the candidate list is owned by the search box and passed in on every
//! render. The dropdown only keeps the highlighted row and scroll offset.

use artist_search_protocol::Candidate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::scroll_state::ScrollState;
use crate::text_formatting::truncate_text;

pub const MAX_DROPDOWN_ROWS: usize = 8;

const SELECTED_PREFIX: &str = "› ";
const ROW_PREFIX: &str = "  ";

#[derive(Debug, Default)]
pub struct SearchDropdown {
    state: ScrollState,
}

impl SearchDropdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called whenever the candidate list is replaced wholesale.
    pub fn on_candidates_replaced(&mut self, len: usize) {
        self.state.reset();
        self.state.clamp_selection(len);
        self.state.ensure_visible(len, MAX_DROPDOWN_ROWS.min(len));
    }

    pub fn move_up(&mut self, len: usize) {
        self.state.move_up_wrap(len);
        self.state.ensure_visible(len, MAX_DROPDOWN_ROWS.min(len));
    }

    pub fn move_down(&mut self, len: usize) {
        self.state.move_down_wrap(len);
        self.state.ensure_visible(len, MAX_DROPDOWN_ROWS.min(len));
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected_idx
    }

    pub fn required_height(len: usize) -> u16 {
        len.clamp(1, MAX_DROPDOWN_ROWS) as u16
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, candidates: &[Candidate]) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if candidates.is_empty() {
            Line::from(Span::from(format!("{ROW_PREFIX}no matches")).dim().italic())
                .render(area, buf);
            return;
        }

        let visible = usize::from(area.height).min(MAX_DROPDOWN_ROWS);
        let start = self.state.scroll_top.min(candidates.len());
        let name_width = usize::from(area.width).saturating_sub(SELECTED_PREFIX.chars().count());

        for (row, (idx, candidate)) in candidates
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .enumerate()
        {
            let row_area = Rect {
                x: area.x,
                y: area.y + row as u16,
                width: area.width,
                height: 1,
            };
            let is_selected = self.state.selected_idx == Some(idx);
            candidate_line(candidate, is_selected, name_width).render(row_area, buf);
        }
    }
}

fn candidate_line(candidate: &Candidate, is_selected: bool, max_width: usize) -> Line<'static> {
    let name = truncate_text(&candidate.display_name, max_width);
    let remaining = max_width.saturating_sub(UnicodeWidthStr::width(name.as_str()));

    let mut spans: Vec<Span<'static>> = Vec::new();
    if is_selected {
        spans.push(SELECTED_PREFIX.cyan());
        spans.push(Span::from(name).cyan().bold());
    } else {
        spans.push(ROW_PREFIX.into());
        spans.push(Span::from(name));
    }

    if let Some(comment) = candidate.comment.as_deref()
        && remaining > 3
    {
        let comment = truncate_text(&format!(" ({comment})"), remaining);
        spans.push(Span::from(comment).dim());
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_to_plain_text;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn render_rows(dropdown: &SearchDropdown, candidates: &[Candidate], area: Rect) -> String {
        let mut buf = Buffer::empty(area);
        dropdown.render(area, &mut buf, candidates);
        buffer_to_plain_text(&buf)
    }

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| Candidate::new(format!("id-{idx}"), *name))
            .collect()
    }

    #[test]
    fn renders_rows_in_relevance_order_with_highlight() {
        let rows = vec![
            Candidate::new("1", "Bruno Mars").with_comment("US singer"),
            Candidate::new("2", "Bruno Major"),
        ];
        let mut dropdown = SearchDropdown::new();
        dropdown.on_candidates_replaced(rows.len());

        assert_snapshot!(
            "dropdown_rows_in_relevance_order",
            render_rows(&dropdown, &rows, Rect::new(0, 0, 30, 3))
        );
    }

    #[test]
    fn long_names_are_truncated_before_comments() {
        let rows = vec![
            Candidate::new("1", "The Bruno Mars Experience Tribute Band").with_comment("covers"),
        ];
        let mut dropdown = SearchDropdown::new();
        dropdown.on_candidates_replaced(rows.len());

        assert_snapshot!(
            "dropdown_long_name_truncated",
            render_rows(&dropdown, &rows, Rect::new(0, 0, 20, 1))
        );
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let dropdown = SearchDropdown::new();
        assert_snapshot!(
            "dropdown_empty_placeholder",
            render_rows(&dropdown, &[], Rect::new(0, 0, 20, 1))
        );
    }

    #[test]
    fn scrolls_to_keep_selection_visible() {
        let rows = candidates(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let mut dropdown = SearchDropdown::new();
        dropdown.on_candidates_replaced(rows.len());
        dropdown.move_up(rows.len());
        assert_eq!(dropdown.selected_index(), Some(9));

        assert_snapshot!(
            "dropdown_scrolled_to_last_row",
            render_rows(&dropdown, &rows, Rect::new(0, 0, 10, 8))
        );
    }

    #[test]
    fn required_height_is_bounded() {
        assert_eq!(SearchDropdown::required_height(0), 1);
        assert_eq!(SearchDropdown::required_height(3), 3);
        assert_eq!(SearchDropdown::required_height(50), MAX_DROPDOWN_ROWS as u16);
    }
}
