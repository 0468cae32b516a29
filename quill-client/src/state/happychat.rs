//! Support chat session

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::Intent;

/// Transport status of the chat client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Uninitialized,
    Connecting,
    Connected,
    Disconnected,
    Reconnecting,
}

/// Status of the conversation with an operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    #[default]
    Default,
    Pending,
    Missed,
    Blocked,
    Abandoned,
    Assigning,
    Assigned,
    New,
    Closed,
}

impl ChatStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pending => "pending",
            Self::Missed => "missed",
            Self::Blocked => "blocked",
            Self::Abandoned => "abandoned",
            Self::Assigning => "assigning",
            Self::Assigned => "assigned",
            Self::New => "new",
            Self::Closed => "closed",
        }
    }
}

/// Operator pool a chat is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HappychatGroup {
    /// Platform support
    #[serde(rename = "WPCOM")]
    Wpcom,
    /// Partner (Jetpack) support
    #[serde(rename = "JPOP")]
    Jpop,
}

impl HappychatGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wpcom => "WPCOM",
            Self::Jpop => "JPOP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Customer,
    Operator,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub source: EventSource,
    pub message: String,
    /// Seconds since the epoch
    pub timestamp: i64,
}

pub type Timeline = Arc<Vec<TimelineEvent>>;

#[derive(Debug, Clone, Default)]
pub struct HappychatState {
    pub connection_status: ConnectionStatus,
    pub chat_status: ChatStatus,
    /// Replaced, never mutated in place, so its identity changes with its content
    pub timeline: Timeline,
    /// Milliseconds since the epoch when the chat window lost focus
    pub lost_focus_at: Option<i64>,
    /// Message being composed
    pub draft: String,
}

impl HappychatState {
    fn append(&mut self, events: impl IntoIterator<Item = TimelineEvent>) -> bool {
        let mut timeline = self.timeline.as_ref().clone();
        let before = timeline.len();
        for event in events {
            if !timeline.iter().any(|existing| existing.id == event.id) {
                timeline.push(event);
            }
        }
        if timeline.len() == before {
            return false;
        }
        timeline.sort_by_key(|event| event.timestamp);
        self.timeline = Arc::new(timeline);
        true
    }
}

pub fn reduce(state: &mut HappychatState, intent: &Intent) -> bool {
    match intent {
        Intent::HappychatConnectionRequest => {
            if state.connection_status == ConnectionStatus::Uninitialized {
                state.connection_status = ConnectionStatus::Connecting;
                true
            } else {
                false
            }
        }
        Intent::HappychatConnectionSetStatus(status) => {
            let changed = state.connection_status != *status;
            state.connection_status = *status;
            changed
        }
        Intent::HappychatChatStatusReceive(status) => {
            let changed = state.chat_status != *status;
            state.chat_status = *status;
            changed
        }
        Intent::HappychatTimelineReceive(events) => state.append(events.iter().cloned()),
        Intent::HappychatMessageReceive(event) => state.append([event.clone()]),
        Intent::HappychatMessageSet(text) => {
            if state.draft == *text {
                return false;
            }
            state.draft = text.clone();
            true
        }
        Intent::HappychatMessageSend => {
            if state.draft.trim().is_empty() {
                return false;
            }
            state.draft.clear();
            true
        }
        Intent::HappychatBlur(at) => {
            state.lost_focus_at = Some(*at);
            true
        }
        Intent::HappychatFocus => state.lost_focus_at.take().is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, timestamp: i64) -> TimelineEvent {
        TimelineEvent {
            id: id.into(),
            source: EventSource::Operator,
            message: format!("message {id}"),
            timestamp,
        }
    }

    #[test]
    fn test_timeline_identity_changes_only_with_content() {
        let mut state = HappychatState::default();
        let initial = state.timeline.clone();

        assert!(reduce(&mut state, &Intent::HappychatTimelineReceive(vec![event("1", 10)])));
        assert!(!Arc::ptr_eq(&initial, &state.timeline));

        let after_first = state.timeline.clone();
        assert!(!reduce(&mut state, &Intent::HappychatMessageReceive(event("1", 10))));
        assert!(Arc::ptr_eq(&after_first, &state.timeline));
    }

    #[test]
    fn test_timeline_is_ordered_by_timestamp() {
        let mut state = HappychatState::default();
        reduce(
            &mut state,
            &Intent::HappychatTimelineReceive(vec![event("b", 20), event("a", 10)]),
        );
        let ids: Vec<&str> = state.timeline.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_connection_request_only_from_uninitialized() {
        let mut state = HappychatState::default();
        assert!(reduce(&mut state, &Intent::HappychatConnectionRequest));
        assert_eq!(state.connection_status, ConnectionStatus::Connecting);
        assert!(!reduce(&mut state, &Intent::HappychatConnectionRequest));
    }

    #[test]
    fn test_focus_tracking() {
        let mut state = HappychatState::default();
        reduce(&mut state, &Intent::HappychatBlur(1_000));
        assert_eq!(state.lost_focus_at, Some(1_000));
        assert!(reduce(&mut state, &Intent::HappychatFocus));
        assert_eq!(state.lost_focus_at, None);
        assert!(!reduce(&mut state, &Intent::HappychatFocus));
    }

    #[test]
    fn test_send_clears_draft() {
        let mut state = HappychatState::default();
        assert!(!reduce(&mut state, &Intent::HappychatMessageSend));
        reduce(&mut state, &Intent::HappychatMessageSet("hello".into()));
        assert!(reduce(&mut state, &Intent::HappychatMessageSend));
        assert!(state.draft.is_empty());
    }
}
