use quill::EventKind;
use quill_components::{ConfirmDialog, ConfirmDialogProps};
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
use crate::state::{Post, PostStatus, PostType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Confirm,
    Cancel,
}

/// "Move to trash" control with its confirmation prompt
///
/// Renders nothing for a missing, unsaved or already trashed post. While a
/// trash request is in flight the label reads "Trashing..." and further
/// requests are ignored.
#[derive(Default)]
pub struct DeletePost {
    confirm: ConfirmDialog,
}

pub struct DeletePostProps<'a> {
    pub post: Option<&'a Post>,
    pub is_trashing: bool,
    /// The confirmation prompt is open for this post
    pub is_confirming: bool,
    pub translator: &'a Translator,
}

impl DeletePost {
    pub fn new() -> Self {
        Self::default()
    }

    fn target(post: Option<&Post>) -> Option<(u64, u64)> {
        let post = post.filter(|p| p.status != PostStatus::Trash)?;
        Some((post.site_id, post.id?))
    }

    pub fn is_visible(props: &DeletePostProps<'_>) -> bool {
        Self::target(props.post).is_some()
    }

    /// Intent for pressing the button, `None` when there is nothing to trash
    /// or a request is already pending
    pub fn request(&mut self, props: &DeletePostProps<'_>) -> Option<Intent> {
        if props.is_trashing || props.is_confirming {
            return None;
        }
        let (_, post_id) = Self::target(props.post)?;
        self.confirm.reset();
        Some(Intent::PostTrashRequest { post_id })
    }

    fn message<'t>(post: &Post, t: &'t Translator) -> &'t str {
        match post.post_type {
            PostType::Page => t.translate("Are you sure you want to trash this page?"),
            PostType::Post => t.translate("Are you sure you want to trash this post?"),
        }
    }

    fn dialog_props<'a>(t: &'a Translator, message: &'a str) -> ConfirmDialogProps<'a, Choice> {
        ConfirmDialogProps {
            title: t.translate("Trash"),
            message,
            confirm_label: t.translate("Move to trash"),
            cancel_label: t.translate("Back"),
            on_confirm: || Choice::Confirm,
            on_cancel: || Choice::Cancel,
        }
    }

    /// Draw the confirmation prompt over `area`
    pub fn render_confirm(&mut self, frame: &mut Frame, area: Rect, props: DeletePostProps<'_>) {
        let Some(post) = props.post.filter(|_| props.is_confirming) else {
            return;
        };
        let t = props.translator;
        let message = Self::message(post, t);
        let dialog = Self::dialog_props(t, message);
        Component::<Choice>::render(&mut self.confirm, frame, area, dialog);
    }
}

impl Component<Intent> for DeletePost {
    type Props<'a> = DeletePostProps<'a>;

    /// Keys go to the confirmation prompt while it is open
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        if !props.is_confirming {
            return None;
        }
        let (Some(post), Some((site_id, post_id))) = (props.post, Self::target(props.post))
        else {
            return None;
        };
        let t = props.translator;
        let message = Self::message(post, t);

        let choice = Component::<Choice>::handle_event(
            &mut self.confirm,
            event,
            Self::dialog_props(t, message),
        )
        .into_iter()
        .next();

        choice.map(|choice| match choice {
            Choice::Confirm => Intent::PostTrashConfirm { site_id, post_id },
            Choice::Cancel => Intent::PostTrashCancel,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if !Self::is_visible(&props) {
            return;
        }
        let t = props.translator;
        let (label, style) = if props.is_trashing {
            (
                t.translate("Trashing..."),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            (t.translate("Move to trash"), Style::default().fg(Color::Red))
        };
        let line = Line::from(vec![Span::styled(format!(" {label} "), style)]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
