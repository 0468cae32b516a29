//! Post revisions: list rows and the dialog that picks one to load

use chrono::{DateTime, FixedOffset, Utc};
use crossterm::event::KeyCode;
use quill::EventKind;
use quill_components::{centered_rect, render_modal, ModalStyle, SelectList, SelectListProps};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Component;
use crate::action::Intent;
use crate::i18n::{substitute, Translator};
use crate::state::PostRevision;

/// One revision as a list row
///
/// Additions and deletions show as `+N` / `-N`; a revision that changed
/// no words is `minor`. The author appears only on multi-user sites.
pub fn revision_row(
    revision: &PostRevision,
    is_multi_user_site: bool,
    t: &Translator,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<17}", display_date(&revision.date)),
        Style::default().fg(Color::Gray),
    )];

    let changes = &revision.changes;
    if changes.added > 0 {
        spans.push(Span::styled(
            format!("+{} ", change_count(t, changes.added)),
            Style::default().fg(Color::Green),
        ));
    }
    if changes.removed > 0 {
        spans.push(Span::styled(
            format!("-{} ", change_count(t, changes.removed)),
            Style::default().fg(Color::Red),
        ));
    }
    if changes.added == 0 && changes.removed == 0 {
        spans.push(Span::styled(
            format!("{} ", t.translate("minor")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(author) = revision.author.as_ref().filter(|_| is_multi_user_site) {
        let name = t.translate_with("%(author)s", &[("author", &author.display_name)]);
        spans.push(Span::styled(
            name,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ));
    }

    Line::from(spans)
}

fn change_count(t: &Translator, count: u32) -> String {
    let template = t.translate_plural("%(changes)d", "%(changes)d", u64::from(count));
    substitute(template, &[("changes", &count.to_string())])
}

/// Minute precision, in UTC so rows from different offsets line up
pub fn display_date(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Utc).format("%Y-%m-%d %H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Highlight(usize),
    Load(usize),
}

pub struct RevisionsDialog {
    list: SelectList,
}

pub struct RevisionsDialogProps<'a> {
    /// Newest first
    pub revisions: &'a [PostRevision],
    /// `0` when nothing is selected
    pub selected_revision_id: u64,
    pub is_multi_user_site: bool,
    pub is_requesting: bool,
    pub translator: &'a Translator,
}

impl Default for RevisionsDialog {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl RevisionsDialog {
    pub fn new() -> Self {
        Self::default()
    }

    fn selected_index(props: &RevisionsDialogProps<'_>) -> Option<usize> {
        props
            .revisions
            .iter()
            .position(|revision| revision.id == props.selected_revision_id)
    }
}

impl Component<Intent> for RevisionsDialog {
    type Props<'a> = RevisionsDialogProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if key.code == KeyCode::Esc {
            return vec![Intent::PostRevisionsDialogToggle];
        }

        let rows: Vec<Line> = props
            .revisions
            .iter()
            .map(|r| revision_row(r, props.is_multi_user_site, props.translator))
            .collect();
        let list_props = SelectListProps {
            rows: &rows,
            selected: Self::selected_index(&props),
            is_focused: true,
            title: None,
            empty_text: "",
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Load),
        };
        let picks: Vec<Pick> = self.list.handle_event(event, list_props).into_iter().collect();

        let mut intents = Vec::new();
        for pick in picks {
            match pick {
                Pick::Highlight(index) => intents.push(Intent::PostRevisionsSelect {
                    revision_id: props.revisions[index].id,
                }),
                Pick::Load(_) => intents.push(Intent::PostRevisionsLoad),
            }
        }
        intents
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let t = props.translator;
        let dialog = centered_rect(64, 16, area);
        render_modal(frame, dialog, &ModalStyle::with_bg(Color::Rgb(30, 30, 40)));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", t.translate("History")));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let [body, buttons] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let rows: Vec<Line> = props
            .revisions
            .iter()
            .map(|r| revision_row(r, props.is_multi_user_site, t))
            .collect();
        let empty_text = if props.is_requesting {
            t.translate("Loading revisions...")
        } else {
            t.translate("No revisions yet.")
        };
        let list_props = SelectListProps {
            rows: &rows,
            selected: Self::selected_index(&props),
            is_focused: true,
            title: None,
            empty_text,
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Load),
        };
        self.list.render(frame, body, list_props);

        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let label = Style::default().fg(Color::DarkGray);
        let hint = Line::from(vec![
            Span::styled("enter", key),
            Span::styled(format!(" {}  ", t.translate("Load")), label),
            Span::styled("esc", key),
            Span::styled(format!(" {}", t.translate("Cancel")), label),
        ])
        .centered();
        frame.render_widget(Paragraph::new(hint), buttons);
    }
}
