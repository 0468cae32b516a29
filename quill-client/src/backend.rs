//! Platform backend contract and the fixture implementation behind it
//!
//! Effects call the backend synchronously and report the outcome as result
//! intents (`...Receive`, `...DidSucceed`, `...DidFail`). Nothing here talks
//! to the network: [`FixtureBackend`] serves a JSON snapshot and applies
//! writes in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::state::{
    ActivityLogItem, ChatStatus, EventSource, Post, PostRevision, PostStatus, RestoreProgress,
    RestoreStatus, RewindState, RewindStatus, Site, TimelineEvent, User,
};

/// Fixture compiled into the binary, used when `--fixture` is not given
pub const BUNDLED_FIXTURE: &str = include_str!("../fixtures/fixture.json");

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("post {post_id} not found on site {site_id}")]
    PostNotFound { site_id: u64, post_id: u64 },

    #[error("site {0} not found")]
    SiteNotFound(u64),

    #[error("post {0} is already in the trash")]
    AlreadyTrashed(u64),

    #[error("rewind is not available for site {0}")]
    RewindUnavailable(u64),

    #[error("no activity with rewind id `{0}`")]
    UnknownRewind(String),

    #[error("chat is not connected")]
    ChatOffline,

    #[error("offline")]
    Offline,

    #[error("cannot read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl BackendError {
    /// Whether the failure means the platform could not be reached at all
    pub fn is_network(&self) -> bool {
        matches!(self, BackendError::Offline)
    }
}

/// An open chat: where the conversation stands and what was said so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub status: ChatStatus,
    pub timeline: Vec<TimelineEvent>,
}

pub trait Backend {
    /// User bootstrapped with the page, `None` when logged out
    fn current_user(&self) -> Option<User>;

    fn sites(&self) -> Vec<Site>;

    // ===== Posts =====

    fn post(&self, site_id: u64, post_id: u64) -> Result<Post, BackendError>;

    /// Newest first
    fn revisions(&self, site_id: u64, post_id: u64) -> Result<Vec<PostRevision>, BackendError>;

    fn trash_post(&mut self, site_id: u64, post_id: u64) -> Result<(), BackendError>;

    // ===== Support chat =====

    fn connect_chat(&mut self) -> Result<ChatSession, BackendError>;

    /// Send a message, returning the events it produced (the echo, any reply)
    fn send_chat_message(&mut self, text: &str) -> Result<Vec<TimelineEvent>, BackendError>;

    // ===== Activity log and rewind =====

    fn activity_log(&self, site_id: u64) -> Result<Vec<ActivityLogItem>, BackendError>;

    fn rewind_status(&self, site_id: u64) -> Result<RewindStatus, BackendError>;

    fn activate_rewind(&mut self, site_id: u64) -> Result<(), BackendError>;

    fn restore(&mut self, site_id: u64, rewind_id: &str) -> Result<RestoreProgress, BackendError>;
}

// ============================================================================
// Fixture backend
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ChatFixture {
    status: ChatStatus,
    timeline: Vec<TimelineEvent>,
    /// Operator answer to every customer message
    auto_reply: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    current_user: Option<User>,
    sites: Vec<Site>,
    posts: Vec<Post>,
    /// Keyed by post id
    revisions: BTreeMap<u64, Vec<PostRevision>>,
    chat: ChatFixture,
    /// Keyed by site id
    activity: BTreeMap<u64, Vec<ActivityLogItem>>,
    /// Keyed by site id
    rewind: BTreeMap<u64, RewindStatus>,
    /// Every call fails with [`BackendError::Offline`]
    offline: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureBackend {
    data: Fixture,
    chat_connected: bool,
    next_event: u64,
}

impl FixtureBackend {
    pub fn new(data: Fixture) -> Self {
        Self {
            data,
            chat_connected: false,
            next_event: 1,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, BackendError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn load(path: &Path) -> Result<Self, BackendError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn bundled() -> Result<Self, BackendError> {
        Self::from_json(BUNDLED_FIXTURE)
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.data.offline = offline;
    }

    fn online(&self) -> Result<(), BackendError> {
        if self.data.offline {
            Err(BackendError::Offline)
        } else {
            Ok(())
        }
    }

    fn find_post_mut(&mut self, site_id: u64, post_id: u64) -> Option<&mut Post> {
        self.data
            .posts
            .iter_mut()
            .find(|p| p.site_id == site_id && p.id == Some(post_id))
    }

    fn site_known(&self, site_id: u64) -> Result<(), BackendError> {
        if self.data.sites.iter().any(|s| s.id == site_id) {
            Ok(())
        } else {
            Err(BackendError::SiteNotFound(site_id))
        }
    }

    fn event(&mut self, source: EventSource, message: String) -> TimelineEvent {
        let id = format!("local-{}", self.next_event);
        self.next_event += 1;
        TimelineEvent {
            id,
            source,
            message,
            timestamp: now_secs(),
        }
    }
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

impl Backend for FixtureBackend {
    fn current_user(&self) -> Option<User> {
        self.data.current_user.clone()
    }

    fn sites(&self) -> Vec<Site> {
        self.data.sites.clone()
    }

    fn post(&self, site_id: u64, post_id: u64) -> Result<Post, BackendError> {
        self.online()?;
        self.data
            .posts
            .iter()
            .find(|p| p.site_id == site_id && p.id == Some(post_id))
            .cloned()
            .ok_or(BackendError::PostNotFound { site_id, post_id })
    }

    fn revisions(&self, site_id: u64, post_id: u64) -> Result<Vec<PostRevision>, BackendError> {
        self.post(site_id, post_id)?;
        let mut revisions = self.data.revisions.get(&post_id).cloned().unwrap_or_default();
        revisions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(revisions)
    }

    fn trash_post(&mut self, site_id: u64, post_id: u64) -> Result<(), BackendError> {
        self.online()?;
        let post = self
            .find_post_mut(site_id, post_id)
            .ok_or(BackendError::PostNotFound { site_id, post_id })?;
        if post.status == PostStatus::Trash {
            return Err(BackendError::AlreadyTrashed(post_id));
        }
        post.status = PostStatus::Trash;
        Ok(())
    }

    fn connect_chat(&mut self) -> Result<ChatSession, BackendError> {
        self.online()?;
        self.chat_connected = true;
        Ok(ChatSession {
            status: self.data.chat.status,
            timeline: self.data.chat.timeline.clone(),
        })
    }

    fn send_chat_message(&mut self, text: &str) -> Result<Vec<TimelineEvent>, BackendError> {
        self.online()?;
        if !self.chat_connected {
            return Err(BackendError::ChatOffline);
        }
        let mut events = vec![self.event(EventSource::Customer, text.to_string())];
        if let Some(reply) = self.data.chat.auto_reply.clone() {
            events.push(self.event(EventSource::Operator, reply));
        }
        self.data.chat.timeline.extend(events.iter().cloned());
        Ok(events)
    }

    fn activity_log(&self, site_id: u64) -> Result<Vec<ActivityLogItem>, BackendError> {
        self.online()?;
        self.site_known(site_id)?;
        Ok(self.data.activity.get(&site_id).cloned().unwrap_or_default())
    }

    fn rewind_status(&self, site_id: u64) -> Result<RewindStatus, BackendError> {
        self.online()?;
        self.site_known(site_id)?;
        Ok(self
            .data
            .rewind
            .get(&site_id)
            .cloned()
            .unwrap_or(RewindStatus {
                state: RewindState::Unavailable,
                reason: None,
            }))
    }

    fn activate_rewind(&mut self, site_id: u64) -> Result<(), BackendError> {
        self.online()?;
        self.site_known(site_id)?;
        let status = self.data.rewind.entry(site_id).or_insert(RewindStatus {
            state: RewindState::Unavailable,
            reason: None,
        });
        match status.state {
            RewindState::Unavailable => Err(BackendError::RewindUnavailable(site_id)),
            _ => {
                status.state = RewindState::Active;
                Ok(())
            }
        }
    }

    fn restore(&mut self, site_id: u64, rewind_id: &str) -> Result<RestoreProgress, BackendError> {
        self.online()?;
        let active = self
            .rewind_status(site_id)
            .is_ok_and(|status| status.state == RewindState::Active);
        if !active {
            return Err(BackendError::RewindUnavailable(site_id));
        }
        let known = self
            .data
            .activity
            .get(&site_id)
            .is_some_and(|items| items.iter().any(|i| i.rewind_id.as_deref() == Some(rewind_id)));
        if !known {
            return Err(BackendError::UnknownRewind(rewind_id.to_string()));
        }
        Ok(RestoreProgress {
            rewind_id: rewind_id.to_string(),
            status: RestoreStatus::Queued,
            percent: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> FixtureBackend {
        FixtureBackend::bundled().unwrap()
    }

    #[test]
    fn test_bundled_fixture_loads() {
        let backend = backend();
        assert!(backend.current_user().is_some());
        assert!(!backend.sites().is_empty());
    }

    #[test]
    fn test_trash_twice_fails() {
        let mut backend = backend();
        backend.trash_post(1001, 7).unwrap();
        assert_eq!(backend.post(1001, 7).unwrap().status, PostStatus::Trash);
        assert!(matches!(
            backend.trash_post(1001, 7),
            Err(BackendError::AlreadyTrashed(7))
        ));
    }

    #[test]
    fn test_missing_post() {
        assert!(matches!(
            backend().post(1001, 999_999),
            Err(BackendError::PostNotFound { .. })
        ));
    }

    #[test]
    fn test_revisions_are_newest_first() {
        let revisions = backend().revisions(1001, 7).unwrap();
        assert!(revisions.len() >= 2);
        assert!(revisions.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_revisions_ordered_by_instant_across_offsets() {
        let backend = FixtureBackend::from_json(
            r#"{
                "posts": [{ "id": 1, "site_id": 10 }],
                "revisions": { "1": [
                    { "id": 11, "date": "2017-06-01T12:00:00+05:00" },
                    { "id": 12, "date": "2017-06-01T08:00:00+00:00" }
                ] }
            }"#,
        )
        .unwrap();
        let ids: Vec<u64> = backend.revisions(10, 1).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, [12, 11]);
    }

    #[test]
    fn test_chat_requires_connection() {
        let mut backend = backend();
        assert!(matches!(
            backend.send_chat_message("hi"),
            Err(BackendError::ChatOffline)
        ));
        backend.connect_chat().unwrap();
        let events = backend.send_chat_message("hi").unwrap();
        assert_eq!(events[0].source, EventSource::Customer);
        assert_eq!(events[0].message, "hi");
    }

    #[test]
    fn test_offline_is_a_network_error() {
        let mut backend = backend();
        backend.set_offline(true);
        let err = backend.post(1001, 7).unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn test_restore_needs_active_rewind() {
        let mut backend = backend();
        assert!(matches!(
            backend.restore(1002, "1500000000.01"),
            Err(BackendError::RewindUnavailable(1002))
        ));

        let progress = backend.restore(1001, "1500000000.01").unwrap();
        assert_eq!(progress.status, RestoreStatus::Queued);
        assert!(matches!(
            backend.restore(1001, "nope"),
            Err(BackendError::UnknownRewind(_))
        ));
    }
}
