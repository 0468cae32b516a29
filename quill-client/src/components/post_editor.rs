use quill::EventKind;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{
    Component, DeletePost, DeletePostProps, HistoryButton, HistoryButtonProps, RevisionsDialog,
    RevisionsDialogProps,
};
use crate::action::Intent;
use crate::i18n::Translator;
use crate::state::{Post, PostRevision, PostStatus, PostType};

/// Editor page: ground control bar, the post, and its overlays
#[derive(Default)]
pub struct PostEditor {
    history: HistoryButton,
    delete: DeletePost,
    revisions: RevisionsDialog,
}

pub struct PostEditorProps<'a> {
    pub post: Option<&'a Post>,
    pub is_loading: bool,
    /// Holds changes not saved yet
    pub is_dirty: bool,
    pub is_trashing: bool,
    pub is_confirming_trash: bool,
    pub revisions: &'a [PostRevision],
    pub selected_revision_id: u64,
    pub is_history_visible: bool,
    pub is_requesting_revisions: bool,
    pub is_multi_user_site: bool,
    pub history_hint: Option<&'a str>,
    pub translator: &'a Translator,
}

impl<'a> PostEditorProps<'a> {
    fn delete_props(&self) -> DeletePostProps<'a> {
        DeletePostProps {
            post: self.post,
            is_trashing: self.is_trashing,
            is_confirming: self.is_confirming_trash,
            translator: self.translator,
        }
    }

    fn history_props(&self) -> HistoryButtonProps<'a> {
        HistoryButtonProps {
            is_dialog_visible: self.is_history_visible,
            hint: self.history_hint,
            translator: self.translator,
        }
    }

    fn revisions_props(&self) -> RevisionsDialogProps<'a> {
        RevisionsDialogProps {
            revisions: self.revisions,
            selected_revision_id: self.selected_revision_id,
            is_multi_user_site: self.is_multi_user_site,
            is_requesting: self.is_requesting_revisions,
            translator: self.translator,
        }
    }
}

impl PostEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an overlay is taking the keyboard
    pub fn is_modal(props: &PostEditorProps<'_>) -> bool {
        props.is_confirming_trash || props.is_history_visible
    }

    /// Run a keymap command bound in the editor
    pub fn command(&mut self, command: &str, props: &PostEditorProps<'_>) -> Option<Intent> {
        match command {
            "history" if props.post.is_some() => Some(Intent::PostRevisionsDialogToggle),
            "trash" => self.delete.request(&props.delete_props()),
            _ => None,
        }
    }

    fn header(props: &PostEditorProps<'_>) -> Line<'static> {
        let t = props.translator;
        let Some(post) = props.post else {
            return Line::default();
        };
        let kind = match post.post_type {
            PostType::Post => t.translate("Post"),
            PostType::Page => t.translate("Page"),
        };
        let status = match post.status {
            PostStatus::Draft => t.translate("Draft"),
            PostStatus::Pending => t.translate("Pending Review"),
            PostStatus::Private => t.translate("Private"),
            PostStatus::Publish => t.translate("Published"),
            PostStatus::Future => t.translate("Scheduled"),
            PostStatus::Trash => t.translate("Trashed"),
        };
        let mut spans = vec![
            Span::styled(
                format!(" {kind} "),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::styled(format!(" {status}"), Style::default().fg(Color::Gray)),
        ];
        if props.is_dirty {
            spans.push(Span::styled(
                format!("  {}", t.translate("Unsaved changes")),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }
}

impl Component<Intent> for PostEditor {
    type Props<'a> = PostEditorProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        if props.is_confirming_trash {
            return self
                .delete
                .handle_event(event, props.delete_props())
                .into_iter()
                .collect::<Vec<_>>();
        }
        if props.is_history_visible {
            return self
                .revisions
                .handle_event(event, props.revisions_props())
                .into_iter()
                .collect::<Vec<_>>();
        }
        self.history
            .handle_event(event, props.history_props())
            .into_iter()
            .collect::<Vec<_>>()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let t = props.translator;
        let [bar, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
        let [status, history, delete] = Layout::horizontal([
            Constraint::Min(10),
            Constraint::Length(14),
            Constraint::Length(16),
        ])
        .areas(bar);

        frame.render_widget(Paragraph::new(Self::header(&props)), status);
        if props.post.is_some() {
            self.history.render(frame, history, props.history_props());
        }
        self.delete.render(frame, delete, props.delete_props());

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        let content = match props.post {
            Some(post) => {
                let title = if post.title.is_empty() {
                    t.translate("(no title)").to_string()
                } else {
                    post.title.clone()
                };
                let mut lines = vec![
                    Line::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                    Line::default(),
                ];
                lines.extend(post.content.lines().map(|line| Line::raw(line.to_string())));
                Paragraph::new(lines)
            }
            None if props.is_loading => Paragraph::new(t.translate("Loading...")),
            None => Paragraph::new(t.translate("This post could not be found."))
                .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(content.block(block).wrap(Wrap { trim: false }), body);

        if props.is_history_visible {
            self.revisions.render(frame, area, props.revisions_props());
        }
        if props.is_confirming_trash {
            self.delete.render_confirm(frame, area, props.delete_props());
        }
    }
}
