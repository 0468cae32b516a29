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
use crate::state::{Notice, NoticeStatus};

/// Notices, connectivity and unread chat, one line each
pub struct NoticesBar;

pub struct NoticesBarProps<'a> {
    pub notices: &'a [Notice],
    pub is_online: bool,
    pub has_unread_chat: bool,
    pub translator: &'a Translator,
}

impl NoticesBar {
    /// Rows needed to show everything in `props`
    pub fn height(props: &NoticesBarProps<'_>) -> u16 {
        let extra = usize::from(!props.is_online) + usize::from(props.has_unread_chat);
        (props.notices.len() + extra) as u16
    }

    fn notice_line(notice: &Notice, t: &Translator) -> Line<'static> {
        let (icon, color) = match notice.status {
            NoticeStatus::Success => ("✓", Color::Green),
            NoticeStatus::Info => ("i", Color::Cyan),
            NoticeStatus::Warning => ("!", Color::Yellow),
            NoticeStatus::Error => ("✗", Color::Red),
        };
        Line::from(vec![
            Span::styled(
                format!(" {icon} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(t.translate(&notice.text).to_string()),
        ])
    }
}

impl Component<Intent> for NoticesBar {
    type Props<'a> = NoticesBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let t = props.translator;
        let mut lines: Vec<Line> = props
            .notices
            .iter()
            .map(|notice| Self::notice_line(notice, t))
            .collect();
        if !props.is_online {
            lines.push(Line::styled(
                format!(" ! {}", t.translate("You are offline.")),
                Style::default().fg(Color::Yellow),
            ));
        }
        if props.has_unread_chat {
            lines.push(Line::styled(
                format!(" ● {}", t.translate("New messages from support")),
                Style::default().fg(Color::Magenta),
            ));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }
}
