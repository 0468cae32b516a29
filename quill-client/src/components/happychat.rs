use crossterm::event::{KeyCode, KeyModifiers};
use quill::EventKind;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::Component;
use crate::action::Intent;
use crate::i18n::Translator;
use crate::state::{ConnectionStatus, EventSource, HappychatGroup, TimelineEvent};

/// Support chat: timeline above, composer below
#[derive(Default)]
pub struct HappychatPanel;

pub struct HappychatPanelProps<'a> {
    pub timeline: &'a [TimelineEvent],
    pub connection_status: ConnectionStatus,
    pub groups: &'a [HappychatGroup],
    pub draft: &'a str,
    pub can_send: bool,
    pub translator: &'a Translator,
}

impl HappychatPanel {
    pub fn new() -> Self {
        Self
    }

    fn status_line(props: &HappychatPanelProps<'_>) -> Line<'static> {
        let t = props.translator;
        let (text, color) = match props.connection_status {
            ConnectionStatus::Uninitialized | ConnectionStatus::Connecting => {
                (t.translate("Connecting you with a Happiness Engineer..."), Color::Yellow)
            }
            ConnectionStatus::Connected if props.can_send => {
                (t.translate("Chatting with support"), Color::Green)
            }
            ConnectionStatus::Connected => {
                (t.translate("Waiting for an available operator"), Color::Yellow)
            }
            ConnectionStatus::Reconnecting => (t.translate("Reconnecting..."), Color::Yellow),
            ConnectionStatus::Disconnected => (t.translate("Chat is disconnected"), Color::Red),
        };
        let groups: Vec<&str> = props.groups.iter().map(|g| g.as_str()).collect();
        Line::from(vec![
            Span::styled(format!(" {text}"), Style::default().fg(color)),
            Span::styled(
                format!("  [{}]", groups.join(", ")),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }

    fn event_line(event: &TimelineEvent) -> Line<'static> {
        let (who, color) = match event.source {
            EventSource::Customer => ("you", Color::Cyan),
            EventSource::Operator => ("support", Color::Magenta),
            EventSource::System => ("--", Color::DarkGray),
        };
        Line::from(vec![
            Span::styled(
                format!("{who:>8} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(event.message.clone()),
        ])
    }
}

impl Component<Intent> for HappychatPanel {
    type Props<'a> = HappychatPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        let EventKind::Key(key) = event else {
            return None;
        };
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        match key.code {
            KeyCode::Char(c) => {
                let mut draft = props.draft.to_string();
                draft.push(c);
                Some(Intent::HappychatMessageSet(draft))
            }
            KeyCode::Backspace if !props.draft.is_empty() => {
                let mut draft = props.draft.to_string();
                draft.pop();
                Some(Intent::HappychatMessageSet(draft))
            }
            KeyCode::Enter if props.can_send => Some(Intent::HappychatMessageSend),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let t = props.translator;
        let [status, timeline, composer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(Self::status_line(&props)), status);

        let lines: Vec<Line> = props.timeline.iter().map(Self::event_line).collect();
        // Keep the newest messages in view
        let scroll = (lines.len() as u16).saturating_sub(timeline.height);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            timeline,
        );

        let border = if props.can_send {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", t.translate("Message")));
        let text = if props.draft.is_empty() {
            Span::styled(
                t.translate("Type a message and press enter"),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(props.draft)
        };
        frame.render_widget(Paragraph::new(Line::from(text)).block(block), composer);
    }
}
