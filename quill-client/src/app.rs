//! Root view and the services effects are carried out with

use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::event::KeyCode;
use quill::{DispatchStore, EffectContext, EventKind, EventOutcome, Keymap, Outcome, Router};
use quill_components::{ConfirmDialog, ConfirmDialogProps};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{info, warn};

use crate::action::Intent;
use crate::backend::{Backend, BackendError};
use crate::components::{
    ActivityLog, ActivityLogProps, Component, DisconnectSurvey, DisconnectSurveyProps,
    HappychatPanel, HappychatPanelProps, NextSteps, NextStepsProps, NoticesBar, NoticesBarProps,
    PostEditor, PostEditorProps,
};
use crate::effect::Effect;
use crate::i18n::Translator;
use crate::selectors::happychat::{can_user_send_messages, get_groups, has_unread_messages};
use crate::selectors::posts::{
    get_editor_post, get_post_revisions, get_post_revisions_selected_revision_id,
    is_post_revisions_dialog_visible, is_requesting_post_revisions, is_trashing_post,
};
use crate::selectors::sites::{
    get_newest_site, get_selected_site, is_single_user_site, is_site_on_paid_plan,
};
use crate::selectors::ui::{get_current_route, get_view, is_online};
use crate::selectors::users::{get_current_user, has_user_purchased_a_plan};
use crate::state::ui::EDITOR_FORM;
use crate::state::{AppState, ConnectionStatus, HappychatGroup, NoticeStatus, View};

/// Key binding contexts
#[derive(quill::BindingContext, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Editor,
    Chat,
    Page,
    /// An overlay holds the keyboard
    Dialog,
}

#[derive(Debug, Clone, Copy)]
enum Leave {
    Confirm,
    Stay,
}

fn leave_props(t: &Translator) -> ConfirmDialogProps<'_, Leave> {
    ConfirmDialogProps {
        title: t.translate("Unsaved changes"),
        message: t.translate(
            "You have unsaved changes. Are you sure you want to leave this page?",
        ),
        confirm_label: t.translate("Leave"),
        cancel_label: t.translate("Stay"),
        on_confirm: || Leave::Confirm,
        on_cancel: || Leave::Stay,
    }
}

fn translator(state: &AppState) -> Translator {
    Translator::new(state.ui.language.locale_data.clone())
}

pub struct Ui {
    keymap: Keymap<Screen>,
    editor: PostEditor,
    chat: HappychatPanel,
    survey: DisconnectSurvey,
    next_steps: NextSteps,
    activity: ActivityLog,
    notices: NoticesBar,
    leave: ConfirmDialog,
}

impl Ui {
    pub fn new(keymap: Keymap<Screen>) -> Self {
        Self {
            keymap,
            editor: PostEditor::new(),
            chat: HappychatPanel::new(),
            survey: DisconnectSurvey::new(),
            next_steps: NextSteps::new(),
            activity: ActivityLog::new(),
            notices: NoticesBar,
            leave: ConfirmDialog::new(),
        }
    }

    /// Binding context for the current state
    pub fn screen(state: &AppState) -> Screen {
        if state.ui.protect_form.pending_leave.is_some()
            || state.posts.trash_prompt.is_some()
            || is_post_revisions_dialog_visible(state)
        {
            return Screen::Dialog;
        }
        match get_view(state) {
            View::PostEditor { .. } => Screen::Editor,
            View::Happychat => Screen::Chat,
            _ => Screen::Page,
        }
    }

    fn editor_props<'a>(
        state: &'a AppState,
        hint: Option<&'a str>,
        t: &'a Translator,
    ) -> PostEditorProps<'a> {
        let post = get_editor_post(state);
        let post_id = post.and_then(|p| p.id);
        let site_id = post.map(|p| p.site_id).or(state.posts.editor.site_id);
        PostEditorProps {
            post,
            is_loading: state.posts.editor.is_loading,
            is_dirty: state.ui.protect_form.changed_forms.contains(EDITOR_FORM),
            is_trashing: post_id.is_some_and(|id| is_trashing_post(state, id)),
            is_confirming_trash: post_id.is_some() && state.posts.trash_prompt == post_id,
            revisions: post_id
                .map(|id| get_post_revisions(state, id))
                .unwrap_or_default(),
            selected_revision_id: get_post_revisions_selected_revision_id(state),
            is_history_visible: is_post_revisions_dialog_visible(state),
            is_requesting_revisions: post_id
                .is_some_and(|id| is_requesting_post_revisions(state, id)),
            // Unknown sites count as multi-user
            is_multi_user_site: !site_id
                .and_then(|id| is_single_user_site(state, id))
                .unwrap_or(false),
            history_hint: hint,
            translator: t,
        }
    }

    fn chat_props<'a>(
        state: &'a AppState,
        groups: &'a [HappychatGroup],
        t: &'a Translator,
    ) -> HappychatPanelProps<'a> {
        HappychatPanelProps {
            timeline: state.happychat.timeline.as_slice(),
            connection_status: state.happychat.connection_status,
            groups,
            draft: &state.happychat.draft,
            can_send: can_user_send_messages(state),
            translator: t,
        }
    }

    fn survey_props<'a>(state: &'a AppState, t: &'a Translator) -> DisconnectSurveyProps<'a> {
        let site = get_selected_site(state);
        DisconnectSurveyProps {
            site_slug: site.map(|s| s.slug.as_str()).unwrap_or_default(),
            is_paid_plan: site.is_some_and(|s| is_site_on_paid_plan(state, s.id)),
            translator: t,
        }
    }

    fn next_steps_props<'a>(
        state: &'a AppState,
        is_welcome: bool,
        t: &'a Translator,
    ) -> NextStepsProps<'a> {
        NextStepsProps {
            is_welcome,
            has_plan: has_user_purchased_a_plan(state),
            newest_site_slug: get_newest_site(state).map(|site| site.slug.as_str()),
            translator: t,
        }
    }

    fn activity_props<'a>(
        state: &'a AppState,
        site_id: u64,
        t: &'a Translator,
    ) -> ActivityLogProps<'a> {
        let log = &state.activity_log;
        ActivityLogProps {
            site_id,
            items: log
                .log_items
                .get(&site_id)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            rewind_status: log.rewind_status.get(&site_id),
            rewind_status_error: log.rewind_status_error.get(&site_id).map(String::as_str),
            is_activating: log
                .activation_requesting
                .get(&site_id)
                .copied()
                .unwrap_or(false),
            restore_progress: log.restore_progress.get(&site_id),
            restore_request: log.restore_request.get(&site_id).map(String::as_str),
            translator: t,
        }
    }

    fn title_bar(state: &AppState, t: &Translator) -> Line<'static> {
        let mut spans = vec![Span::styled(
            " quill ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::raw(format!(" {}", get_current_route(state))));
        if let Some(site) = get_selected_site(state) {
            spans.push(Span::styled(
                format!("  {}", site.slug),
                Style::default().fg(Color::Gray),
            ));
        }
        match get_current_user(state) {
            Some(user) => spans.push(Span::styled(
                format!("  @{}", user.username),
                Style::default().fg(Color::DarkGray),
            )),
            None => spans.push(Span::styled(
                format!("  {}", t.translate("Logged out")),
                Style::default().fg(Color::DarkGray),
            )),
        }
        Line::from(spans)
    }

    fn help_bar(&self, state: &AppState, t: &Translator) -> Line<'static> {
        let screen = Self::screen(state);
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let label = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        for (command, text) in [
            ("quit", "quit"),
            ("goto:/me/next", "next steps"),
            ("goto:/me/chat", "support"),
            ("history", "history"),
            ("trash", "trash"),
        ] {
            if let Some(hint) = self.keymap.hint(command, screen) {
                spans.push(Span::styled(format!(" {hint}"), key));
                spans.push(Span::styled(format!(" {} ", t.translate(text)), label));
            }
        }
        Line::from(spans)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let t = translator(state);
        let groups = get_groups(state, None);
        let notices_props = NoticesBarProps {
            notices: &state.notices.items,
            is_online: is_online(state),
            has_unread_chat: !matches!(get_view(state), View::Happychat)
                && has_unread_messages(state),
            translator: &t,
        };
        let [title, notices, body, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(NoticesBar::height(&notices_props)),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(Self::title_bar(state, &t)), title);
        self.notices.render(frame, notices, notices_props);

        let history_hint = self.keymap.hint("history", Screen::Editor);
        match get_view(state) {
            View::Blank => {}
            View::PostEditor { .. } => {
                let props = Self::editor_props(state, history_hint.as_deref(), &t);
                self.editor.render(frame, body, props);
            }
            View::Happychat => {
                let props = Self::chat_props(state, &groups, &t);
                self.chat.render(frame, body, props);
            }
            View::NextSteps { is_welcome } => {
                let props = Self::next_steps_props(state, *is_welcome, &t);
                self.next_steps.render(frame, body, props);
            }
            View::DisconnectSurvey => {
                let props = Self::survey_props(state, &t);
                self.survey.render(frame, body, props);
            }
            View::ActivityLog { site_id } => {
                let props = Self::activity_props(state, *site_id, &t);
                self.activity.render(frame, body, props);
            }
            View::JetpackConnect => {
                let text = t.translate("Connect a self-hosted site to WordPress.com.");
                frame.render_widget(Paragraph::new(text), body);
            }
            View::Page { title } => {
                let line = Line::styled(
                    t.translate(title).to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                );
                frame.render_widget(Paragraph::new(line), body);
            }
            View::NotFound => {
                let text = t.translate("Uh oh. Page not found.");
                frame.render_widget(
                    Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                    body,
                );
            }
        }

        if let Some(url) = &state.ui.external_url {
            let line = Line::styled(
                format!("{} {url}", t.translate("Opened outside the app:")),
                Style::default().fg(Color::Yellow),
            );
            frame.render_widget(Paragraph::new(line), help);
        } else {
            frame.render_widget(Paragraph::new(self.help_bar(state, &t)), help);
        }

        if state.ui.protect_form.pending_leave.is_some() {
            Component::<Leave>::render(&mut self.leave, frame, area, leave_props(&t));
        }
    }

    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Intent> {
        match event {
            EventKind::Resize(_, _) => return EventOutcome::needs_render(),
            EventKind::Tick => return EventOutcome::ignored(),
            _ => {}
        }
        let t = translator(state);

        if state.ui.protect_form.pending_leave.is_some() {
            let choice = Component::<Leave>::handle_event(&mut self.leave, event, leave_props(&t))
                .into_iter()
                .next();
            return match choice {
                Some(Leave::Confirm) => EventOutcome::action(Intent::ProtectFormLeaveConfirm),
                Some(Leave::Stay) => EventOutcome::action(Intent::ProtectFormLeaveCancel),
                None => EventOutcome::needs_render(),
            };
        }

        if let EventKind::Key(key) = event {
            let screen = Self::screen(state);
            if let Some(command) = self.keymap.command(key, screen).map(str::to_string) {
                return self.run_command(&command, state, &t).into();
            }
            // Esc on a page goes back to the dashboard
            if screen == Screen::Page && key.code == KeyCode::Esc {
                return EventOutcome::action(Intent::Navigate("/".into()));
            }
        }

        let history_hint = self.keymap.hint("history", Screen::Editor);
        let intents: Vec<Intent> = match get_view(state) {
            View::PostEditor { .. } => {
                let props = Self::editor_props(state, history_hint.as_deref(), &t);
                self.editor.handle_event(event, props).into_iter().collect()
            }
            View::Happychat => {
                let groups = get_groups(state, None);
                let props = Self::chat_props(state, &groups, &t);
                self.chat.handle_event(event, props).into_iter().collect()
            }
            View::NextSteps { is_welcome } => {
                let props = Self::next_steps_props(state, *is_welcome, &t);
                self.next_steps.handle_event(event, props).into_iter().collect()
            }
            View::DisconnectSurvey => {
                let props = Self::survey_props(state, &t);
                self.survey.handle_event(event, props).into_iter().collect()
            }
            View::ActivityLog { site_id } => {
                let props = Self::activity_props(state, *site_id, &t);
                self.activity.handle_event(event, props).into_iter().collect()
            }
            _ => Vec::new(),
        };
        // Local highlight changes need a frame even without an intent
        EventOutcome::from_actions(intents).with_render()
    }

    fn run_command(&mut self, command: &str, state: &AppState, t: &Translator) -> Option<Intent> {
        if let Some(path) = command.strip_prefix("goto:") {
            return Some(Intent::Navigate(path.to_string()));
        }
        match command {
            "quit" => Some(Intent::Quit),
            "notice:dismiss" => state.notices.items.last().map(|n| Intent::NoticeDismiss(n.id)),
            "history" | "trash" if matches!(get_view(state), View::PostEditor { .. }) => {
                let props = Self::editor_props(state, None, t);
                self.editor.command(command, &props)
            }
            _ => None,
        }
    }
}

/// Store listener state that reports each new route once
#[derive(Debug, Default)]
pub struct RouteWatcher {
    last: String,
}

impl RouteWatcher {
    /// The current route, if it differs from the last one observed
    pub fn observe<'s>(&mut self, state: &'s AppState) -> Option<&'s str> {
        let route = get_current_route(state);
        if route == self.last {
            return None;
        }
        self.last = route.to_string();
        Some(route)
    }
}

// ============================================================================
// Services
// ============================================================================

/// Router and backend behind the effects the reducer declares
pub struct Services {
    router: Router<AppState, Intent>,
    backend: Box<dyn Backend>,
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

impl Services {
    pub fn new(router: Router<AppState, Intent>, backend: Box<dyn Backend>) -> Self {
        Self { router, backend }
    }

    pub fn handle_effect(&mut self, effect: Effect, ctx: &mut EffectContext<'_, AppState, Intent>) {
        match effect {
            Effect::Navigate(path) => self.navigate(&path, ctx),

            Effect::LoadPost { site_id, post_id } => match self.backend.post(site_id, post_id) {
                Ok(post) => self.succeed(ctx, Intent::PostEditDidLoad(post)),
                Err(err) => {
                    self.fail(ctx, &err);
                    ctx.emit(Intent::PostEditDidFail {
                        site_id,
                        post_id,
                        error: err.to_string(),
                    });
                }
            },
            Effect::LoadRevisions { site_id, post_id } => {
                match self.backend.revisions(site_id, post_id) {
                    Ok(revisions) => self.succeed(
                        ctx,
                        Intent::PostRevisionsReceive {
                            site_id,
                            post_id,
                            revisions,
                        },
                    ),
                    Err(err) => {
                        self.fail(ctx, &err);
                        ctx.emit(Intent::PostRevisionsRequestDidFail {
                            site_id,
                            post_id,
                            error: err.to_string(),
                        });
                    }
                }
            }
            Effect::TrashPost { site_id, post_id } => {
                match self.backend.trash_post(site_id, post_id) {
                    Ok(()) => self.succeed(ctx, Intent::PostTrashDidSucceed { site_id, post_id }),
                    Err(err) => {
                        self.fail(ctx, &err);
                        ctx.emit(Intent::PostTrashDidFail {
                            site_id,
                            post_id,
                            error: err.to_string(),
                        });
                    }
                }
            }

            Effect::ConnectChat => match self.backend.connect_chat() {
                Ok(session) => {
                    ctx.emit(Intent::HappychatChatStatusReceive(session.status));
                    ctx.emit(Intent::HappychatTimelineReceive(session.timeline));
                    self.succeed(
                        ctx,
                        Intent::HappychatConnectionSetStatus(ConnectionStatus::Connected),
                    );
                }
                Err(err) => {
                    self.fail(ctx, &err);
                    ctx.emit(Intent::HappychatConnectionSetStatus(
                        ConnectionStatus::Disconnected,
                    ));
                }
            },
            Effect::SendChatMessage(text) => match self.backend.send_chat_message(&text) {
                Ok(events) => {
                    for event in events {
                        ctx.emit(Intent::HappychatMessageReceive(event));
                    }
                }
                Err(err) => {
                    self.fail(ctx, &err);
                    ctx.emit(Intent::NoticeCreate {
                        status: NoticeStatus::Error,
                        text: err.to_string(),
                        display_on_next_page: false,
                    });
                }
            },

            Effect::LoadActivityLog { site_id } => match self.backend.activity_log(site_id) {
                Ok(items) => self.succeed(ctx, Intent::ActivityLogReceive { site_id, items }),
                Err(err) => self.fail(ctx, &err),
            },
            Effect::LoadRewindStatus { site_id } => match self.backend.rewind_status(site_id) {
                Ok(status) => self.succeed(ctx, Intent::RewindStatusReceive { site_id, status }),
                Err(err) => {
                    self.fail(ctx, &err);
                    ctx.emit(Intent::RewindStatusRequestDidFail {
                        site_id,
                        error: err.to_string(),
                    });
                }
            },
            Effect::ActivateRewind { site_id } => match self.backend.activate_rewind(site_id) {
                Ok(()) => self.succeed(ctx, Intent::RewindActivateDidSucceed { site_id }),
                Err(err) => {
                    self.fail(ctx, &err);
                    ctx.emit(Intent::RewindActivateDidFail {
                        site_id,
                        error: err.to_string(),
                    });
                }
            },
            Effect::RestoreSite { site_id, rewind_id } => {
                match self.backend.restore(site_id, &rewind_id) {
                    Ok(progress) => {
                        self.succeed(ctx, Intent::RewindRestoreProgressUpdate { site_id, progress })
                    }
                    Err(err) => {
                        self.fail(ctx, &err);
                        ctx.emit(Intent::NoticeCreate {
                            status: NoticeStatus::Error,
                            text: err.to_string(),
                            display_on_next_page: false,
                        });
                        ctx.emit(Intent::RewindRestoreDismissProgress { site_id });
                    }
                }
            }
        }
    }

    fn navigate(&mut self, path: &str, ctx: &mut EffectContext<'_, AppState, Intent>) {
        if path.starts_with("http://") || path.starts_with("https://") {
            info!(url = path, "Handing off external URL");
            ctx.dispatch(Intent::UiExternalUrlSet(path.to_string()));
            return;
        }

        let was_chatting = matches!(get_view(ctx.state()), View::Happychat);
        match self.router.show(path, ctx) {
            Ok(navigation) => {
                info!(
                    path,
                    resolved = %navigation.path,
                    outcome = ?navigation.outcome,
                    redirects = navigation.redirects.len(),
                    "Navigation"
                );
                match navigation.outcome {
                    Outcome::Blocked => {
                        ctx.dispatch(Intent::ProtectFormLeaveBlock(path.to_string()));
                    }
                    Outcome::External(url) => {
                        ctx.dispatch(Intent::UiExternalUrlSet(url));
                    }
                    Outcome::Completed | Outcome::Halted => {}
                }
            }
            Err(err) => {
                warn!(path, %err, "Navigation failed");
                ctx.dispatch(Intent::NoticeCreate {
                    status: NoticeStatus::Error,
                    text: err.to_string(),
                    display_on_next_page: false,
                });
            }
        }

        let is_chatting = matches!(get_view(ctx.state()), View::Happychat);
        if was_chatting && !is_chatting {
            ctx.dispatch(Intent::HappychatBlur(now_millis()));
        } else if is_chatting && !was_chatting {
            ctx.dispatch(Intent::HappychatFocus);
        }
    }

    fn succeed(&self, ctx: &mut EffectContext<'_, AppState, Intent>, intent: Intent) {
        let state = ctx.state();
        if state.features.network_connection && state.ui.is_online == Some(false) {
            ctx.emit(Intent::NetworkConnectionSet(true));
        }
        ctx.emit(intent);
    }

    fn fail(&self, ctx: &mut EffectContext<'_, AppState, Intent>, err: &BackendError) {
        warn!(%err, "Backend request failed");
        if err.is_network() && ctx.state().features.network_connection {
            ctx.emit(Intent::NetworkConnectionSet(false));
        }
    }
}
