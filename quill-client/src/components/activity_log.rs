use crossterm::event::KeyCode;
use quill::EventKind;
use quill_components::{ConfirmDialog, ConfirmDialogProps, SelectList, SelectListProps};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::revisions::display_date;
use super::Component;
use crate::action::Intent;
use crate::i18n::Translator;
use crate::state::{ActivityLogItem, RestoreProgress, RestoreStatus, RewindState, RewindStatus};

#[derive(Debug, Clone, Copy)]
enum Pick {
    Highlight(usize),
    Restore(usize),
}

#[derive(Debug, Clone, Copy)]
enum Choice {
    Confirm,
    Cancel,
}

/// Site activity with rewind controls
///
/// `enter` asks to restore the highlighted event, `a` activates rewind and
/// `x` dismisses a finished restore.
pub struct ActivityLog {
    list: SelectList,
    confirm: ConfirmDialog,
    selected: usize,
}

pub struct ActivityLogProps<'a> {
    pub site_id: u64,
    /// Newest first
    pub items: &'a [ActivityLogItem],
    pub rewind_status: Option<&'a RewindStatus>,
    pub rewind_status_error: Option<&'a str>,
    pub is_activating: bool,
    pub restore_progress: Option<&'a RestoreProgress>,
    /// Restore point awaiting confirmation
    pub restore_request: Option<&'a str>,
    pub translator: &'a Translator,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
            confirm: ConfirmDialog::new(),
            selected: 0,
        }
    }
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn rewind_state(props: &ActivityLogProps<'_>) -> Option<RewindState> {
        props.rewind_status.map(|status| status.state)
    }

    fn rows(items: &[ActivityLogItem]) -> Vec<Line<'static>> {
        items
            .iter()
            .map(|item| {
                let mut spans = vec![
                    Span::styled(
                        format!("{:<17}", display_date(&item.published)),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::raw(item.summary.clone()),
                ];
                if let Some(actor) = &item.actor {
                    spans.push(Span::styled(
                        format!("  {actor}"),
                        Style::default().fg(Color::Cyan),
                    ));
                }
                if item.rewind_id.is_some() {
                    spans.push(Span::styled("  ↺", Style::default().fg(Color::Green)));
                }
                Line::from(spans)
            })
            .collect()
    }

    fn status_line(props: &ActivityLogProps<'_>) -> Line<'static> {
        let t = props.translator;
        if let Some(error) = props.rewind_status_error {
            return Line::styled(
                format!("{} {error}", t.translate("Rewind status unavailable:")),
                Style::default().fg(Color::Red),
            );
        }
        if let Some(progress) = props.restore_progress {
            let (text, color) = match progress.status {
                RestoreStatus::Queued => (t.translate("Restore queued"), Color::Yellow),
                RestoreStatus::Running => (t.translate("Restoring..."), Color::Yellow),
                RestoreStatus::Finished => (t.translate("Restore finished"), Color::Green),
                RestoreStatus::Fail => (t.translate("Restore failed"), Color::Red),
            };
            return Line::styled(
                format!("{text} ({}%)", progress.percent),
                Style::default().fg(color),
            );
        }
        let text = match Self::rewind_state(props) {
            None => t.translate("Checking rewind status..."),
            Some(_) if props.is_activating => t.translate("Activating rewind..."),
            Some(RewindState::Active) => t.translate("Rewind is active"),
            Some(RewindState::Inactive) => t.translate("Rewind is off, press a to activate"),
            Some(RewindState::Provisioning) => t.translate("Rewind is being set up"),
            Some(RewindState::Unavailable) => t.translate("Rewind is not available"),
        };
        Line::styled(text.to_string(), Style::default().fg(Color::DarkGray))
    }

    fn confirm_props<'a>(t: &'a Translator, message: &'a str) -> ConfirmDialogProps<'a, Choice> {
        ConfirmDialogProps {
            title: t.translate("Restore"),
            message,
            confirm_label: t.translate("Confirm Restore"),
            cancel_label: t.translate("Cancel"),
            on_confirm: || Choice::Confirm,
            on_cancel: || Choice::Cancel,
        }
    }

    fn confirm_message(t: &Translator) -> &str {
        t.translate("This will remove all content and options created or changed since then.")
    }
}

impl Component<Intent> for ActivityLog {
    type Props<'a> = ActivityLogProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        let site_id = props.site_id;
        let t = props.translator;

        if let Some(rewind_id) = props.restore_request {
            let choice = Component::<Choice>::handle_event(
                &mut self.confirm,
                event,
                Self::confirm_props(t, Self::confirm_message(t)),
            )
            .into_iter()
            .next();
            return match choice {
                Some(Choice::Confirm) => vec![Intent::RewindRestoreConfirm {
                    site_id,
                    rewind_id: rewind_id.to_string(),
                }],
                Some(Choice::Cancel) => vec![Intent::RewindRestoreDismiss { site_id }],
                None => Vec::new(),
            };
        }

        if let EventKind::Key(key) = event {
            match key.code {
                KeyCode::Char('a')
                    if Self::rewind_state(&props) == Some(RewindState::Inactive)
                        && !props.is_activating =>
                {
                    return vec![Intent::RewindActivateRequest { site_id }];
                }
                KeyCode::Char('x')
                    if props.restore_progress.is_some_and(|p| {
                        matches!(p.status, RestoreStatus::Finished | RestoreStatus::Fail)
                    }) =>
                {
                    return vec![Intent::RewindRestoreDismissProgress { site_id }];
                }
                _ => {}
            }
        }

        let rows = Self::rows(props.items);
        self.selected = self.selected.min(rows.len().saturating_sub(1));
        let list_props = SelectListProps {
            rows: &rows,
            selected: Some(self.selected),
            is_focused: true,
            title: None,
            empty_text: "",
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Restore),
        };
        let picks: Vec<Pick> = self.list.handle_event(event, list_props).into_iter().collect();

        let can_restore = Self::rewind_state(&props) == Some(RewindState::Active)
            && props.restore_progress.is_none();
        let mut intents = Vec::new();
        for pick in picks {
            match pick {
                Pick::Highlight(index) => self.selected = index,
                Pick::Restore(index) => {
                    let rewind_id = props.items.get(index).and_then(|i| i.rewind_id.clone());
                    if let Some(rewind_id) = rewind_id.filter(|_| can_restore) {
                        self.confirm.reset();
                        intents.push(Intent::RewindRestoreRequest { site_id, rewind_id });
                    }
                }
            }
        }
        intents
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let t = props.translator;
        let [status, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

        frame.render_widget(Paragraph::new(Self::status_line(&props)), status);

        let rows = Self::rows(props.items);
        self.selected = self.selected.min(rows.len().saturating_sub(1));
        let list_props = SelectListProps {
            rows: &rows,
            selected: Some(self.selected),
            is_focused: props.restore_request.is_none(),
            title: Some(t.translate("Activity")),
            empty_text: t.translate("No activity yet."),
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Restore),
        };
        self.list.render(frame, body, list_props);

        if props.restore_request.is_some() {
            let dialog = Self::confirm_props(t, Self::confirm_message(t));
            Component::<Choice>::render(&mut self.confirm, frame, area, dialog);
        }
    }
}
