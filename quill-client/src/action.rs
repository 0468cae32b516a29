//! Intents understood by the client
//!
//! Names follow `<Subject><Verb>` so that `#[action(infer_categories)]` groups
//! them by subject: `PostRevisionsSelect` and `PostRevisionsDialogToggle`
//! both land in `post_revisions`. A `Did` marks the result of backend work.

use quill::{ActionSummary, QueryMap};

use crate::i18n::LocaleData;
use crate::state::{
    ActivityLogItem, AspectRatio, ChatStatus, ConnectionStatus, NoticeStatus, Post, PostRevision,
    PostType, RestoreProgress, RewindStatus, Site, TimelineEvent, User, View,
};

#[derive(quill::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum Intent {
    // ===== Navigation =====
    /// Run the route chain for a client path, or hand an absolute URL off
    #[action(skip_category)]
    Navigate(String),
    RouteSet {
        path: String,
        query: QueryMap,
    },
    UiSectionSet {
        name: String,
        group: Option<String>,
    },
    UiViewSet(View),
    UiSelectedSiteSet(Option<u64>),
    UiTouchSet(bool),
    UiExternalUrlSet(String),
    NetworkConnectionSet(bool),

    // ===== Locale =====
    LocaleSet(String),
    #[action(category = "locale")]
    LocaleRawDataSet(LocaleData),

    // ===== Users and sites =====
    UserReceive(User),
    CurrentUserSetId(u64),
    CurrentUserSetFlags(Vec<String>),
    SitesReceive(Vec<Site>),

    // ===== Post editor =====
    PostEditRequest {
        site_id: u64,
        post_id: u64,
    },
    PostEditDidLoad(Post),
    PostEditDidFail {
        site_id: u64,
        post_id: u64,
        error: String,
    },
    PostEditStart {
        site_id: u64,
        post_type: PostType,
    },

    // ===== Trash =====
    /// Ask for confirmation
    PostTrashRequest {
        post_id: u64,
    },
    PostTrashCancel,
    PostTrashConfirm {
        site_id: u64,
        post_id: u64,
    },
    PostTrashDidSucceed {
        site_id: u64,
        post_id: u64,
    },
    PostTrashDidFail {
        site_id: u64,
        post_id: u64,
        error: String,
    },

    // ===== Revisions =====
    PostRevisionsRequest {
        site_id: u64,
        post_id: u64,
    },
    PostRevisionsReceive {
        site_id: u64,
        post_id: u64,
        revisions: Vec<PostRevision>,
    },
    PostRevisionsRequestDidFail {
        site_id: u64,
        post_id: u64,
        error: String,
    },
    PostRevisionsSelect {
        revision_id: u64,
    },
    PostRevisionsDialogToggle,
    /// Copy the selected revision into the editor
    PostRevisionsLoad,

    // ===== Unsaved forms =====
    ProtectFormMarkChanged(String),
    ProtectFormMarkSaved(String),
    /// A navigation to this path was held back
    ProtectFormLeaveBlock(String),
    ProtectFormLeaveConfirm,
    ProtectFormLeaveCancel,

    // ===== Notices =====
    NoticeCreate {
        status: NoticeStatus,
        text: String,
        display_on_next_page: bool,
    },
    NoticeDismiss(u64),
    NoticesClearOnNavigation,

    // ===== Support chat =====
    HappychatConnectionRequest,
    HappychatConnectionSetStatus(ConnectionStatus),
    HappychatChatStatusReceive(ChatStatus),
    HappychatTimelineReceive(Vec<TimelineEvent>),
    HappychatMessageReceive(TimelineEvent),
    /// Replace the draft
    HappychatMessageSet(String),
    HappychatMessageSend,
    /// Window lost focus at this time, in milliseconds
    HappychatBlur(i64),
    HappychatFocus,

    // ===== Activity log and rewind =====
    ActivityLogRequest {
        site_id: u64,
    },
    ActivityLogReceive {
        site_id: u64,
        items: Vec<ActivityLogItem>,
    },
    RewindStatusRequest {
        site_id: u64,
    },
    RewindStatusReceive {
        site_id: u64,
        status: RewindStatus,
    },
    RewindStatusRequestDidFail {
        site_id: u64,
        error: String,
    },
    RewindActivateRequest {
        site_id: u64,
    },
    RewindActivateDidSucceed {
        site_id: u64,
    },
    RewindActivateDidFail {
        site_id: u64,
        error: String,
    },
    RewindRestoreRequest {
        site_id: u64,
        rewind_id: String,
    },
    RewindRestoreDismiss {
        site_id: u64,
    },
    RewindRestoreConfirm {
        site_id: u64,
        rewind_id: String,
    },
    RewindRestoreProgressUpdate {
        site_id: u64,
        progress: RestoreProgress,
    },
    RewindRestoreDismissProgress {
        site_id: u64,
    },
    RewindBackupRequest {
        site_id: u64,
        rewind_id: String,
    },
    RewindBackupDismiss {
        site_id: u64,
    },

    // ===== Image editor =====
    /// Sent by an image editor view once its image has loaded. This client
    /// ships no such view, so only the state slice and selector exist.
    ImageEditorOriginalAspectRatioSet(Option<AspectRatio>),

    Quit,
}

impl ActionSummary for Intent {
    fn summary(&self) -> String {
        match self {
            Intent::LocaleRawDataSet(data) => format!(
                "LocaleRawDataSet {{ locale: {:?}, messages: {} }}",
                data.locale_slug(),
                data.len()
            ),
            Intent::HappychatTimelineReceive(events) => {
                format!("HappychatTimelineReceive({} events)", events.len())
            }
            Intent::PostRevisionsReceive {
                post_id, revisions, ..
            } => format!(
                "PostRevisionsReceive {{ post_id: {post_id}, revisions: {} }}",
                revisions.len()
            ),
            Intent::ActivityLogReceive { site_id, items } => format!(
                "ActivityLogReceive {{ site_id: {site_id}, items: {} }}",
                items.len()
            ),
            _ => format!("{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill::Action;

    #[test]
    fn test_categories_follow_subjects() {
        assert_eq!(
            Intent::PostRevisionsSelect { revision_id: 1 }.category(),
            Some("post_revisions")
        );
        assert_eq!(
            Intent::PostRevisionsDialogToggle.category(),
            Some("post_revisions")
        );
        assert_eq!(
            Intent::PostTrashDidFail {
                site_id: 1,
                post_id: 2,
                error: String::new()
            }
            .category(),
            Some("post_trash")
        );
        assert_eq!(Intent::HappychatFocus.category(), Some("happychat"));
        assert_eq!(Intent::Navigate("/".into()).category(), None);
    }

    #[test]
    fn test_summary_hides_payloads() {
        let intent = Intent::HappychatTimelineReceive(Vec::new());
        assert_eq!(intent.summary(), "HappychatTimelineReceive(0 events)");
        assert_eq!(intent.name(), "HappychatTimelineReceive");
    }
}
