//! Component event tests using TestHarness

use chrono::DateTime;
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use quill::testing::*;
use quill::{assert_category_emitted, assert_emitted, assert_not_emitted, EventKind};
use quill_client::action::Intent;
use quill_client::components::{
    ActivityLog, ActivityLogProps, Component, DeletePost, DeletePostProps, DisconnectSurvey,
    DisconnectSurveyProps, HappychatPanel, HappychatPanelProps, HistoryButton,
    HistoryButtonProps, NextSteps, NextStepsProps, RevisionsDialog, RevisionsDialogProps,
};
use quill_client::i18n::Translator;
use quill_client::state::{
    ActivityLogItem, ConnectionStatus, Post, PostRevision, PostStatus, PostType,
    RevisionChanges, RewindState, RewindStatus,
};

type Harness = TestHarness<(), Intent>;

fn click(column: u16, row: u16) -> EventKind {
    EventKind::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn test_history_button_click_toggles_dialog() {
    let t = Translator::new(None);
    let mut harness = Harness::default();
    let mut button = HistoryButton::new();
    let props = || HistoryButtonProps {
        is_dialog_visible: false,
        hint: None,
        translator: &t,
    };

    // Nothing to hit before the first frame
    harness.emit_all(button.handle_event(&click(1, 0), props()));
    assert!(harness.drain_emitted().is_empty());

    let mut render = RenderHarness::new(20, 1);
    render.render(|frame, area| button.render(frame, area, props()));

    harness.emit_all(button.handle_event(&click(1, 0), props()));
    harness.emit_all(button.handle_event(&click(1, 5), props()));
    let intents = harness.drain_emitted();
    assert_eq!(intents, vec![Intent::PostRevisionsDialogToggle]);
}

fn revisions() -> Vec<PostRevision> {
    [72, 71]
        .into_iter()
        .map(|id| PostRevision {
            id,
            author: None,
            date: DateTime::parse_from_rfc3339("2017-07-02T14:20:00+00:00").unwrap(),
            changes: RevisionChanges::default(),
            title: String::new(),
            content: String::new(),
        })
        .collect()
}

#[test]
fn test_revisions_dialog_keys() {
    let t = Translator::new(None);
    let revisions = revisions();
    let mut harness = Harness::default();
    let mut dialog = RevisionsDialog::new();
    let props = |selected_revision_id| RevisionsDialogProps {
        revisions: &revisions,
        selected_revision_id,
        is_multi_user_site: true,
        is_requesting: false,
        translator: &t,
    };

    // No selection yet: Enter loads nothing, moving picks the newest
    harness.emit_all(dialog.handle_event(&key_event("enter"), props(0)));
    harness.emit_all(dialog.handle_event(&key_event("down"), props(0)));
    let intents = harness.drain_emitted();
    assert_not_emitted!(intents, Intent::PostRevisionsLoad);
    assert_emitted!(intents, Intent::PostRevisionsSelect { revision_id: 72 });

    harness.emit_all(dialog.handle_event(&key_event("down"), props(72)));
    harness.emit_all(dialog.handle_event(&key_event("enter"), props(71)));
    harness.emit_all(dialog.handle_event(&key_event("esc"), props(71)));
    let intents = harness.drain_emitted();
    assert_eq!(
        intents,
        vec![
            Intent::PostRevisionsSelect { revision_id: 71 },
            Intent::PostRevisionsLoad,
            Intent::PostRevisionsDialogToggle,
        ]
    );
    assert_category_emitted!(intents, "post_revisions");
}

#[test]
fn test_delete_post_confirmation_keys() {
    let t = Translator::new(None);
    let post = Post {
        id: Some(7),
        status: PostStatus::Publish,
        ..Post::draft(1001, PostType::Post)
    };
    let mut harness = Harness::default();
    let mut delete = DeletePost::new();
    let props = |is_confirming| DeletePostProps {
        post: Some(&post),
        is_trashing: false,
        is_confirming,
        translator: &t,
    };

    harness.emit_all(delete.handle_event(&key_event("y"), props(false)));
    assert!(harness.drain_emitted().is_empty());

    assert_eq!(
        delete.request(&props(false)),
        Some(Intent::PostTrashRequest { post_id: 7 })
    );
    assert_eq!(delete.request(&props(true)), None);

    harness.emit_all(delete.handle_event(&key_event("y"), props(true)));
    harness.emit_all(delete.handle_event(&key_event("esc"), props(true)));
    assert_eq!(
        harness.drain_emitted(),
        vec![
            Intent::PostTrashConfirm {
                site_id: 1001,
                post_id: 7
            },
            Intent::PostTrashCancel,
        ]
    );
}

#[test]
fn test_happychat_composer() {
    let t = Translator::new(None);
    let mut harness = Harness::default();
    let mut panel = HappychatPanel::new();
    let props = |draft, can_send| HappychatPanelProps {
        timeline: &[],
        connection_status: ConnectionStatus::Connected,
        groups: &[],
        draft,
        can_send,
        translator: &t,
    };

    harness.emit_all(panel.handle_event(&key_event("a"), props("hi", true)));
    harness.emit_all(panel.handle_event(&key_event("backspace"), props("hi", true)));
    harness.emit_all(panel.handle_event(&key_event("ctrl+t"), props("hi", true)));
    harness.emit_all(panel.handle_event(&key_event("enter"), props("hi", false)));
    assert_eq!(
        harness.drain_emitted(),
        vec![
            Intent::HappychatMessageSet("hia".into()),
            Intent::HappychatMessageSet("h".into()),
        ]
    );

    harness.emit_all(panel.handle_event(&key_event("enter"), props("hi", true)));
    let intents = harness.drain_emitted();
    assert_emitted!(intents, Intent::HappychatMessageSend);
}

#[test]
fn test_disconnect_survey_navigates_to_reason() {
    let t = Translator::new(None);
    let mut harness = Harness::default();
    let mut survey = DisconnectSurvey::new();
    let props = || DisconnectSurveyProps {
        site_slug: "quill-demo.example",
        is_paid_plan: false,
        translator: &t,
    };

    harness.emit_all(survey.handle_event(&key_event("down"), props()));
    harness.emit_all(survey.handle_event(&key_event("enter"), props()));
    assert_eq!(
        harness.drain_emitted(),
        vec![Intent::Navigate(
            "/settings/disconnect-site/missing-feature/quill-demo.example".into()
        )]
    );
}

#[test]
fn test_next_steps_skip_only_when_welcome() {
    let t = Translator::new(None);
    let mut harness = Harness::default();
    let mut steps = NextSteps::new();
    let props = |is_welcome| NextStepsProps {
        is_welcome,
        has_plan: true,
        newest_site_slug: Some("quill-demo.example"),
        translator: &t,
    };

    harness.emit_all(steps.handle_event(&key_event("s"), props(false)));
    assert!(harness.drain_emitted().is_empty());

    harness.emit_all(steps.handle_event(&key_event("s"), props(true)));
    harness.emit_all(steps.handle_event(&key_event("enter"), props(true)));
    assert_eq!(
        harness.drain_emitted(),
        vec![
            Intent::Navigate("/stats/insights/quill-demo.example".into()),
            Intent::Navigate("/me/chat".into()),
        ]
    );
}

#[test]
fn test_activity_log_rewind_controls() {
    let t = Translator::new(None);
    let items = vec![ActivityLogItem {
        activity_id: "a-1".into(),
        name: "post__published".into(),
        summary: "Post published".into(),
        published: DateTime::parse_from_rfc3339("2017-07-01T09:00:00+00:00").unwrap(),
        actor: None,
        rewind_id: Some("1500000000.01".into()),
    }];
    let inactive = RewindStatus {
        state: RewindState::Inactive,
        reason: None,
    };
    let active = RewindStatus {
        state: RewindState::Active,
        reason: None,
    };
    let mut harness = Harness::default();
    let mut log = ActivityLog::new();
    let props = |status, restore_request| ActivityLogProps {
        site_id: 1001,
        items: &items,
        rewind_status: Some(status),
        rewind_status_error: None,
        is_activating: false,
        restore_progress: None,
        restore_request,
        translator: &t,
    };

    harness.emit_all(log.handle_event(&key_event("a"), props(&inactive, None)));
    harness.emit_all(log.handle_event(&key_event("enter"), props(&inactive, None)));
    assert_eq!(
        harness.drain_emitted(),
        vec![Intent::RewindActivateRequest { site_id: 1001 }]
    );

    harness.emit_all(log.handle_event(&key_event("a"), props(&active, None)));
    harness.emit_all(log.handle_event(&key_event("enter"), props(&active, None)));
    assert_eq!(
        harness.drain_emitted(),
        vec![Intent::RewindRestoreRequest {
            site_id: 1001,
            rewind_id: "1500000000.01".into()
        }]
    );

    harness.emit_all(log.handle_event(&key_event("y"), props(&active, Some("1500000000.01"))));
    let intents = harness.drain_emitted();
    assert_emitted!(intents, Intent::RewindRestoreConfirm { site_id: 1001, .. });
}
