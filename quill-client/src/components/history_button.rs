use crossterm::event::{MouseButton, MouseEventKind};
use quill::EventKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Component;
use crate::action::Intent;
use crate::i18n::Translator;

/// Opens and closes the revisions dialog
#[derive(Default)]
pub struct HistoryButton {
    render_area: Option<Rect>,
}

pub struct HistoryButtonProps<'a> {
    pub is_dialog_visible: bool,
    /// Key bound to the toggle, shown next to the label
    pub hint: Option<&'a str>,
    pub translator: &'a Translator,
}

impl HistoryButton {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Intent> for HistoryButton {
    type Props<'a> = HistoryButtonProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        let EventKind::Mouse(mouse) = event else {
            return None;
        };
        let Some(area) = self.render_area else {
            return None;
        };
        let inside = mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height;

        (inside && matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)))
            .then_some(Intent::PostRevisionsDialogToggle)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.render_area = Some(area);

        let style = if props.is_dialog_visible {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let mut spans = vec![Span::styled(
            format!(" {} ", props.translator.translate("History")),
            style,
        )];
        if let Some(hint) = props.hint {
            spans.push(Span::styled(
                format!(" {hint}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
