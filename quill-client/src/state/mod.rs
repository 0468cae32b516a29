//! The application state tree
//!
//! One struct per domain key. Each slice module owns its types and a reducer
//! `fn(&mut Slice, &Intent) -> bool`; [`crate::reducer`] combines them.

pub mod activity_log;
pub mod happychat;
pub mod notices;
pub mod posts;
pub mod sites;
pub mod ui;
pub mod users;

pub use activity_log::{
    ActivityLogItem, ActivityLogState, RestoreProgress, RestoreStatus, RewindState, RewindStatus,
};
pub use happychat::{
    ChatStatus, ConnectionStatus, EventSource, HappychatGroup, HappychatState, Timeline,
    TimelineEvent,
};
pub use notices::{Notice, NoticeStatus, NoticesState};
pub use posts::{
    EditorState, Post, PostRevision, PostStatus, PostType, PostsState, RevisionAuthor,
    RevisionChanges, RevisionsState,
};
pub use sites::{Site, SiteOptions, SitePlan, SitesState};
pub use ui::{AspectRatio, ProtectFormState, RouteState, SectionState, UiState, View};
pub use users::{CurrentUserState, User, UsersState};

use crate::config::Features;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Flags resolved at startup, read-only afterwards
    pub features: Features,
    pub current_user: CurrentUserState,
    pub users: UsersState,
    pub sites: SitesState,
    pub posts: PostsState,
    pub happychat: HappychatState,
    pub activity_log: ActivityLogState,
    pub notices: NoticesState,
    pub ui: UiState,
}

impl AppState {
    pub fn new(features: Features) -> Self {
        Self {
            features,
            ..Default::default()
        }
    }
}
