//! Two-button confirmation dialog

use crossterm::event::KeyCode;
use quill_core::{Component, EventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::modal::{centered_rect, render_modal, ModalStyle};

pub struct ConfirmDialogProps<'a, A> {
    pub title: &'a str,
    pub message: &'a str,
    pub confirm_label: &'a str,
    pub cancel_label: &'a str,
    pub on_confirm: fn() -> A,
    pub on_cancel: fn() -> A,
}

/// Modal asking the user to confirm or cancel
///
/// `y`/Enter confirm while the confirm button has focus; `n`/Esc cancel.
/// Tab and the arrow keys move focus between the buttons.
#[derive(Default)]
pub struct ConfirmDialog {
    cancel_focused: bool,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return focus to the confirm button, e.g. when the dialog reopens
    pub fn reset(&mut self) {
        self.cancel_focused = false;
    }
}

impl<A> Component<A> for ConfirmDialog {
    type Props<'a> = ConfirmDialogProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Char('y') => Some((props.on_confirm)()),
            KeyCode::Char('n') | KeyCode::Esc => Some((props.on_cancel)()),
            KeyCode::Enter if self.cancel_focused => Some((props.on_cancel)()),
            KeyCode::Enter => Some((props.on_confirm)()),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.cancel_focused = !self.cancel_focused;
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let width = (props.message.len() as u16 + 6).clamp(30, 60);
        let dialog = centered_rect(width, 8, area);
        render_modal(frame, dialog, &ModalStyle::with_bg(Color::Rgb(30, 30, 40)));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", props.title));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [body, buttons] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        frame.render_widget(
            Paragraph::new(props.message).wrap(Wrap { trim: true }),
            body,
        );

        let focused = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let idle = Style::default().fg(Color::Gray);
        let (confirm_style, cancel_style) = if self.cancel_focused {
            (idle, focused)
        } else {
            (focused, idle)
        };
        let row = Line::from(vec![
            Span::styled(format!(" {} ", props.confirm_label), confirm_style),
            Span::raw("  "),
            Span::styled(format!(" {} ", props.cancel_label), cancel_style),
        ]);
        frame.render_widget(Paragraph::new(row).alignment(Alignment::Center), buttons);
    }
}
