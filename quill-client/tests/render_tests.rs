//! Render tests using RenderHarness

use chrono::DateTime;
use quill::testing::*;
use quill_client::components::{
    disconnect_survey::survey_options, display_date, next_steps::sequence, revision_row,
    Component, DeletePost, DeletePostProps, DisconnectSurvey, DisconnectSurveyProps,
    HistoryButton, HistoryButtonProps, NextSteps, NextStepsProps, NoticesBar, NoticesBarProps,
};
use quill_client::i18n::Translator;
use quill_client::state::{
    Notice, NoticeStatus, Post, PostRevision, PostStatus, PostType, RevisionAuthor,
    RevisionChanges,
};

fn line_text(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn revision(added: u32, removed: u32) -> PostRevision {
    PostRevision {
        id: 1,
        author: Some(RevisionAuthor {
            display_name: "Grace Hopper".into(),
        }),
        date: DateTime::parse_from_rfc3339("2017-07-02T14:20:00+00:00").unwrap(),
        changes: RevisionChanges { added, removed },
        title: String::new(),
        content: String::new(),
    }
}

fn post(id: Option<u64>, status: PostStatus) -> Post {
    Post {
        id,
        status,
        ..Post::draft(1001, PostType::Post)
    }
}

#[test]
fn test_revision_row_changes() {
    let t = Translator::new(None);

    let minor = line_text(&revision_row(&revision(0, 0), true, &t));
    assert!(minor.starts_with("2017-07-02 14:20"));
    assert!(minor.contains("minor"));

    let both = line_text(&revision_row(&revision(12, 3), true, &t));
    assert!(both.contains("+12"));
    assert!(both.contains("-3"));
    assert!(!both.contains("minor"));

    let added = line_text(&revision_row(&revision(5, 0), true, &t));
    assert!(added.contains("+5"));
    assert!(!added.contains(" -"), "no removal count: {added}");
}

#[test]
fn test_revision_dates_display_in_utc() {
    let date = |text| DateTime::parse_from_rfc3339(text).unwrap();
    assert_eq!(display_date(&date("2017-07-02T16:20:00+02:00")), "2017-07-02 14:20");
    assert_eq!(display_date(&date("2017-07-02T00:30:00-03:00")), "2017-07-02 03:30");

    let shifted = PostRevision {
        date: date("2017-07-02T16:20:00+02:00"),
        ..revision(0, 0)
    };
    let t = Translator::new(None);
    let line = line_text(&revision_row(&shifted, true, &t));
    assert!(line.starts_with("2017-07-02 14:20"), "rendered {line:?}");
}

#[test]
fn test_revision_row_author_only_on_multi_user_sites() {
    let t = Translator::new(None);
    let multi = line_text(&revision_row(&revision(1, 1), true, &t));
    assert!(multi.contains("Grace Hopper"));

    let single = line_text(&revision_row(&revision(1, 1), false, &t));
    assert!(!single.contains("Grace Hopper"));

    let anonymous = PostRevision {
        author: None,
        ..revision(1, 1)
    };
    let line = line_text(&revision_row(&anonymous, true, &t));
    assert!(line.contains("+1"));
}

#[test]
fn test_delete_post_hidden_without_a_trashable_post() {
    let t = Translator::new(None);
    let unsaved = post(None, PostStatus::Draft);
    let trashed = post(Some(9), PostStatus::Trash);

    for candidate in [None, Some(&unsaved), Some(&trashed)] {
        let mut render = RenderHarness::new(20, 1);
        let mut component = DeletePost::new();
        let props = DeletePostProps {
            post: candidate,
            is_trashing: false,
            is_confirming: false,
            translator: &t,
        };
        assert!(!DeletePost::is_visible(&props));
        assert!(component.request(&props).is_none());

        let output = render.render_to_string_plain(|frame, area| {
            component.render(frame, area, props);
        });
        assert!(output.trim().is_empty(), "rendered {output:?}");
    }
}

#[test]
fn test_delete_post_labels() {
    let t = Translator::new(None);
    let saved = post(Some(7), PostStatus::Publish);
    let mut render = RenderHarness::new(20, 1);
    let mut component = DeletePost::new();

    let output = render.render_to_string_plain(|frame, area| {
        let props = DeletePostProps {
            post: Some(&saved),
            is_trashing: false,
            is_confirming: false,
            translator: &t,
        };
        component.render(frame, area, props);
    });
    assert!(output.contains("Move to trash"));

    let output = render.render_to_string_plain(|frame, area| {
        let props = DeletePostProps {
            post: Some(&saved),
            is_trashing: true,
            is_confirming: false,
            translator: &t,
        };
        component.render(frame, area, props);
    });
    assert!(output.contains("Trashing..."));
}

#[test]
fn test_delete_post_confirm_prompt_names_the_post_type() {
    let t = Translator::new(None);
    let page = Post {
        post_type: PostType::Page,
        ..post(Some(8), PostStatus::Draft)
    };
    let mut render = RenderHarness::new(80, 20);
    let mut component = DeletePost::new();

    let output = render.render_to_string_plain(|frame, area| {
        let props = DeletePostProps {
            post: Some(&page),
            is_trashing: false,
            is_confirming: true,
            translator: &t,
        };
        component.render_confirm(frame, area, props);
    });
    assert!(output.contains("trash this page?"));
    assert!(output.contains("Back"));
}

#[test]
fn test_disconnect_survey_too_expensive_only_on_paid_plans() {
    let free = survey_options("quill-demo.example", false);
    assert!(free.iter().all(|o| !o.href.contains("too-expensive")));
    assert_eq!(
        free.last().map(|o| o.href.as_str()),
        Some("/settings/disconnect-site/confirm/quill-demo.example?reason=troubleshooting")
    );

    let paid = survey_options("quill-demo.example", true);
    assert_eq!(paid.len(), free.len() + 1);

    let t = Translator::new(None);
    let mut render = RenderHarness::new(120, 12);
    let mut component = DisconnectSurvey::new();
    let output = render.render_to_string_plain(|frame, area| {
        let props = DisconnectSurveyProps {
            site_slug: "quill-demo.example",
            is_paid_plan: true,
            translator: &t,
        };
        component.render(frame, area, props);
    });
    assert!(output.contains("quill-demo.example"));
    assert!(output.contains("This plan is too expensive"));
}

#[test]
fn test_next_steps_welcome_intro() {
    let t = Translator::new(None);
    let mut render = RenderHarness::new(100, 20);
    let mut component = NextSteps::new();

    let output = render.render_to_string_plain(|frame, area| {
        let props = NextStepsProps {
            is_welcome: true,
            has_plan: false,
            newest_site_slug: Some("quill-demo.example"),
            translator: &t,
        };
        component.render(frame, area, props);
    });
    assert!(output.contains("Thanks for signing up for WordPress.com."));
    assert!(output.contains("Write your first post"));

    let output = render.render_to_string_plain(|frame, area| {
        let props = NextStepsProps {
            is_welcome: false,
            has_plan: true,
            newest_site_slug: Some("quill-demo.example"),
            translator: &t,
        };
        component.render(frame, area, props);
    });
    assert!(!output.contains("Thanks for signing up"));
    assert!(output.contains("Talk to a Happiness Engineer"));
}

#[test]
fn test_next_steps_sequence_depends_on_plan() {
    assert_ne!(sequence(true), sequence(false));
    assert_eq!(sequence(true).len(), sequence(false).len());
}

#[test]
fn test_history_button_label() {
    let t = Translator::new(None);
    let mut render = RenderHarness::new(20, 1);
    let mut component = HistoryButton::new();

    let output = render.render_to_string_plain(|frame, area| {
        let props = HistoryButtonProps {
            is_dialog_visible: false,
            hint: Some("h"),
            translator: &t,
        };
        component.render(frame, area, props);
    });
    assert!(output.contains("History"));
}

#[test]
fn test_notices_bar() {
    let t = Translator::new(None);
    let notices = vec![Notice {
        id: 1,
        status: NoticeStatus::Success,
        text: "Post moved to trash.".into(),
        display_on_next_page: false,
    }];
    let props = NoticesBarProps {
        notices: &notices,
        is_online: false,
        has_unread_chat: true,
        translator: &t,
    };
    assert_eq!(NoticesBar::height(&props), 3);

    let mut render = RenderHarness::new(40, 3);
    let output = render.render_to_string_plain(|frame, area| {
        NoticesBar.render(frame, area, props);
    });
    assert!(output.contains("Post moved to trash."));
    assert!(output.contains("You are offline."));
    assert!(output.contains("New messages from support"));
}
