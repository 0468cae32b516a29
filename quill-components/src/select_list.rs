//! Scrollable selection list

use crossterm::event::KeyCode;
use quill_core::{Component, EventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Props for [`SelectList`]
pub struct SelectListProps<'a, A> {
    /// Pre-styled rows
    pub rows: &'a [Line<'a>],
    pub selected: Option<usize>,
    pub is_focused: bool,
    pub title: Option<&'a str>,
    /// Shown instead of the list when `rows` is empty
    pub empty_text: &'a str,
    /// Intent for moving the highlight to a row
    pub on_select: fn(usize) -> A,
    /// Intent for activating the highlighted row with Enter
    pub on_activate: Option<fn(usize) -> A>,
}

/// A bordered list with keyboard navigation
///
/// j/k and the arrow keys move, g/G jump to the ends, Enter activates.
#[derive(Default)]
pub struct SelectList {
    scroll_offset: usize,
}

impl SelectList {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_visible(&mut self, selected: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + viewport_height {
            self.scroll_offset = selected + 1 - viewport_height;
        }
    }
}

impl<A> Component<A> for SelectList {
    type Props<'a> = SelectListProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        let EventKind::Key(key) = event else {
            return None;
        };
        if !props.is_focused || props.rows.is_empty() {
            return None;
        }

        let last = props.rows.len() - 1;
        let current = props.selected.map(|i| i.min(last));
        let target = match key.code {
            KeyCode::Char('j') | KeyCode::Down => current.map_or(0, |i| (i + 1).min(last)),
            KeyCode::Char('k') | KeyCode::Up => current.map_or(0, |i| i.saturating_sub(1)),
            KeyCode::Char('g') | KeyCode::Home => 0,
            KeyCode::Char('G') | KeyCode::End => last,
            KeyCode::Enter => {
                return match (current, props.on_activate) {
                    (Some(i), Some(activate)) => Some(activate(i)),
                    _ => None,
                };
            }
            _ => return None,
        };

        (Some(target) != current).then(|| (props.on_select)(target))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(if props.is_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        if let Some(title) = props.title {
            block = block.title(format!(" {title} "));
        }

        if props.rows.is_empty() {
            let empty = Paragraph::new(props.empty_text)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let viewport_height = area.height.saturating_sub(2) as usize;
        if let Some(selected) = props.selected {
            self.ensure_visible(selected, viewport_height);
        }

        let items: Vec<ListItem> = props.rows.iter().cloned().map(ListItem::new).collect();
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::Rgb(40, 60, 90))
                .add_modifier(Modifier::BOLD),
        );

        let mut state = ListState::default().with_selected(props.selected);
        *state.offset_mut() = self.scroll_offset;
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::testing::{char_key, key, RenderHarness};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Select(usize),
        Open(usize),
    }

    fn rows() -> Vec<Line<'static>> {
        vec![
            Line::raw("Revision 30"),
            Line::raw("Revision 20"),
            Line::raw("Revision 10"),
        ]
    }

    fn props<'a>(
        rows: &'a [Line<'a>],
        selected: Option<usize>,
    ) -> SelectListProps<'a, TestAction> {
        SelectListProps {
            rows,
            selected,
            is_focused: true,
            title: Some("Revisions"),
            empty_text: "Nothing here",
            on_select: TestAction::Select,
            on_activate: Some(TestAction::Open),
        }
    }

    fn press(
        list: &mut SelectList,
        spelling: &str,
        props: SelectListProps<'_, TestAction>,
    ) -> Vec<TestAction> {
        list.handle_event(&EventKind::Key(key(spelling)), props)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_navigation() {
        let mut list = SelectList::new();
        let rows = rows();

        assert_eq!(press(&mut list, "j", props(&rows, Some(0))), vec![TestAction::Select(1)]);
        assert_eq!(press(&mut list, "k", props(&rows, Some(2))), vec![TestAction::Select(1)]);
        let jump: Vec<_> = list
            .handle_event(&EventKind::Key(char_key('G')), props(&rows, Some(0)))
            .into_iter()
            .collect();
        assert_eq!(jump, vec![TestAction::Select(2)]);
        assert_eq!(press(&mut list, "end", props(&rows, Some(0))), vec![TestAction::Select(2)]);
        assert_eq!(press(&mut list, "down", props(&rows, None)), vec![TestAction::Select(0)]);
    }

    #[test]
    fn test_bounds_emit_nothing() {
        let mut list = SelectList::new();
        let rows = rows();
        assert!(press(&mut list, "k", props(&rows, Some(0))).is_empty());
        assert!(press(&mut list, "j", props(&rows, Some(2))).is_empty());
    }

    #[test]
    fn test_enter_activates() {
        let mut list = SelectList::new();
        let rows = rows();
        assert_eq!(press(&mut list, "enter", props(&rows, Some(1))), vec![TestAction::Open(1)]);
        assert!(press(&mut list, "enter", props(&rows, None)).is_empty());
    }

    #[test]
    fn test_unfocused_ignores_events() {
        let mut list = SelectList::new();
        let rows = rows();
        let mut unfocused = props(&rows, Some(0));
        unfocused.is_focused = false;
        assert!(press(&mut list, "j", unfocused).is_empty());
    }

    #[test]
    fn test_render() {
        let mut render = RenderHarness::new(30, 6);
        let mut list = SelectList::new();
        let rows = rows();

        let output = render.render_to_string_plain(|frame, area| {
            list.render(frame, area, props(&rows, Some(1)));
        });

        assert!(output.contains("Revisions"));
        assert!(output.contains("Revision 30"));
        assert!(output.contains("Revision 10"));
    }

    #[test]
    fn test_render_empty() {
        let mut render = RenderHarness::new(30, 4);
        let mut list = SelectList::new();

        let output = render.render_to_string_plain(|frame, area| {
            list.render(frame, area, props(&[], None));
        });

        assert!(output.contains("Nothing here"));
    }
}
