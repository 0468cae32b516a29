//! Support chat selectors

use quill::Selector;

use crate::selectors::sites::{
    get_selected_or_primary_site_id, get_site, is_at_enabled, is_jetpack_site,
};
use crate::selectors::ui::get_section_name;
use crate::state::{AppState, ChatStatus, ConnectionStatus, HappychatGroup, Timeline};

/// Section whose visitors are routed to partner support
pub const JETPACK_CONNECT_SECTION: &str = "jetpackConnect";

pub fn get_happychat_timeline(state: &AppState) -> &Timeline {
    &state.happychat.timeline
}

pub fn get_happychat_chat_status(state: &AppState) -> ChatStatus {
    state.happychat.chat_status
}

pub fn get_happychat_connection_status(state: &AppState) -> ConnectionStatus {
    state.happychat.connection_status
}

pub fn is_happychat_client_connected(state: &AppState) -> bool {
    state.happychat.connection_status == ConnectionStatus::Connected
}

/// Milliseconds since the epoch, `None` while the chat has focus
pub fn get_lost_focus_timestamp(state: &AppState) -> Option<i64> {
    state.happychat.lost_focus_at
}

/// Operator groups for a site, `None` meaning the selected (or primary) site
///
/// Always exactly one group.
pub fn get_groups(state: &AppState, site_id: Option<u64>) -> Vec<HappychatGroup> {
    // Jetpack Connect visitors may not have a site yet, or not a Jetpack one
    if state.features.jetpack_happychat && get_section_name(state) == Some(JETPACK_CONNECT_SECTION)
    {
        return vec![HappychatGroup::Jpop];
    }

    let site_id = site_id.or_else(|| get_selected_or_primary_site_id(state));
    let site = site_id.and_then(|id| get_site(state, id));

    // Automated-transfer sites are Jetpack sites but stay with platform support
    if is_at_enabled(site) {
        vec![HappychatGroup::Wpcom]
    } else if site_id.is_some_and(|id| is_jetpack_site(state, id)) {
        vec![HappychatGroup::Jpop]
    } else {
        vec![HappychatGroup::Wpcom]
    }
}

/// Whether the chat is open for messages from the user
pub fn can_user_send_messages(state: &AppState) -> bool {
    is_happychat_client_connected(state)
        && !matches!(
            get_happychat_chat_status(state),
            ChatStatus::Blocked
                | ChatStatus::Default
                | ChatStatus::Pending
                | ChatStatus::Missed
                | ChatStatus::Abandoned
        )
}

fn unread_dependants(state: &AppState) -> (Timeline, Option<i64>) {
    (
        get_happychat_timeline(state).clone(),
        get_lost_focus_timestamp(state),
    )
}

fn compute_unread(state: &AppState) -> bool {
    let last_message = get_happychat_timeline(state).last().map(|e| e.timestamp);
    match (last_message, get_lost_focus_timestamp(state)) {
        // Message timestamps are seconds, focus timestamps milliseconds
        (Some(seconds), Some(lost_focus_at)) => seconds.saturating_mul(1000) >= lost_focus_at,
        _ => false,
    }
}

thread_local! {
    static HAS_UNREAD_MESSAGES: Selector<AppState, (Timeline, Option<i64>), bool> =
        const { Selector::new(unread_dependants, compute_unread) };
}

/// Whether a message arrived after the chat lost focus
///
/// Memoized on the timeline's identity and the lost-focus time.
pub fn has_unread_messages(state: &AppState) -> bool {
    HAS_UNREAD_MESSAGES.with(|selector| selector.select(state))
}

/// How often [`has_unread_messages`] has computed on this thread
pub fn has_unread_messages_computations() -> usize {
    HAS_UNREAD_MESSAGES.with(|selector| selector.computations())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Features;
    use crate::state::{
        EventSource, SectionState, Site, SiteOptions, TimelineEvent, User,
    };

    fn site(id: u64, jetpack: bool, automated_transfer: bool) -> Site {
        Site {
            id,
            slug: format!("site{id}.example"),
            name: String::new(),
            jetpack,
            single_user_site: true,
            plan: None,
            options: SiteOptions {
                is_automated_transfer: automated_transfer,
                created_at: None,
            },
        }
    }

    fn state_with_sites(sites: Vec<Site>) -> AppState {
        let mut state = AppState::default();
        for site in sites {
            state.sites.items.insert(site.id, site);
        }
        state
    }

    fn event(timestamp: i64) -> TimelineEvent {
        TimelineEvent {
            id: timestamp.to_string(),
            source: EventSource::Operator,
            message: "hello".into(),
            timestamp,
        }
    }

    #[test]
    fn test_jetpack_connect_section_routes_to_jpop() {
        let mut state = state_with_sites(vec![site(1, false, false)]);
        state.features = Features {
            jetpack_happychat: true,
            ..Features::default()
        };
        state.ui.section = Some(SectionState {
            name: JETPACK_CONNECT_SECTION.into(),
            group: None,
        });

        assert_eq!(get_groups(&state, Some(1)), vec![HappychatGroup::Jpop]);
    }

    #[test]
    fn test_jetpack_connect_needs_the_flag() {
        let mut state = state_with_sites(vec![site(1, false, false)]);
        state.features = Features {
            jetpack_happychat: false,
            ..Features::default()
        };
        state.ui.section = Some(SectionState {
            name: JETPACK_CONNECT_SECTION.into(),
            group: None,
        });

        assert_eq!(get_groups(&state, Some(1)), vec![HappychatGroup::Wpcom]);
    }

    #[test]
    fn test_automated_transfer_site_stays_with_wpcom() {
        let state = state_with_sites(vec![site(1, true, true)]);
        assert_eq!(get_groups(&state, Some(1)), vec![HappychatGroup::Wpcom]);
    }

    #[test]
    fn test_jetpack_site_goes_to_jpop() {
        let state = state_with_sites(vec![site(1, true, false)]);
        assert_eq!(get_groups(&state, Some(1)), vec![HappychatGroup::Jpop]);
    }

    #[test]
    fn test_unknown_site_goes_to_wpcom() {
        let state = AppState::default();
        assert_eq!(get_groups(&state, Some(404)), vec![HappychatGroup::Wpcom]);
        assert_eq!(get_groups(&state, None), vec![HappychatGroup::Wpcom]);
    }

    #[test]
    fn test_missing_site_id_falls_back_to_primary_site() {
        let mut state = state_with_sites(vec![site(1, false, false), site(2, true, false)]);
        state.current_user.id = Some(5);
        state.users.items.insert(
            5,
            User {
                id: 5,
                username: "ada".into(),
                display_name: "Ada".into(),
                locale_slug: None,
                primary_blog: Some(2),
                active_flags: Vec::new(),
                has_purchased_plan: false,
            },
        );
        assert_eq!(get_groups(&state, None), vec![HappychatGroup::Jpop]);

        state.ui.selected_site_id = Some(1);
        assert_eq!(get_groups(&state, None), vec![HappychatGroup::Wpcom]);
    }

    #[test]
    fn test_can_user_send_messages_truth_table() {
        let statuses = [
            (ChatStatus::Default, false),
            (ChatStatus::Pending, false),
            (ChatStatus::Missed, false),
            (ChatStatus::Blocked, false),
            (ChatStatus::Abandoned, false),
            (ChatStatus::Assigning, true),
            (ChatStatus::Assigned, true),
            (ChatStatus::New, true),
            (ChatStatus::Closed, true),
        ];
        let connections = [
            ConnectionStatus::Uninitialized,
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
            ConnectionStatus::Disconnected,
            ConnectionStatus::Reconnecting,
        ];

        for connection in connections {
            for (chat, open) in statuses {
                let mut state = AppState::default();
                state.happychat.connection_status = connection;
                state.happychat.chat_status = chat;
                let expected = connection == ConnectionStatus::Connected && open;
                assert_eq!(
                    can_user_send_messages(&state),
                    expected,
                    "{connection:?} / {chat:?}"
                );
            }
        }
    }

    #[test]
    fn test_unread_compares_seconds_to_milliseconds() {
        let mut state = AppState::default();
        assert!(!has_unread_messages(&state));

        state.happychat.timeline = Arc::new(vec![event(100)]);
        assert!(!has_unread_messages(&state), "no lost-focus time");

        state.happychat.lost_focus_at = Some(100_000);
        assert!(has_unread_messages(&state), "equal counts as unread");

        state.happychat.lost_focus_at = Some(100_001);
        assert!(!has_unread_messages(&state));

        state.happychat.timeline = Arc::new(Vec::new());
        state.happychat.lost_focus_at = Some(1);
        assert!(!has_unread_messages(&state), "empty timeline");
    }

    #[test]
    fn test_unread_recomputes_only_when_dependants_change() {
        let mut state = AppState::default();
        state.happychat.timeline = Arc::new(vec![event(50)]);
        state.happychat.lost_focus_at = Some(10_000);

        let start = has_unread_messages_computations();
        assert!(has_unread_messages(&state));
        assert!(has_unread_messages(&state));
        assert_eq!(has_unread_messages_computations(), start + 1);

        state.happychat.draft = "unrelated".into();
        has_unread_messages(&state);
        assert_eq!(has_unread_messages_computations(), start + 1);

        // Same content, new identity
        state.happychat.timeline = Arc::new(vec![event(50)]);
        has_unread_messages(&state);
        assert_eq!(has_unread_messages_computations(), start + 2);

        state.happychat.lost_focus_at = Some(90_000);
        assert!(!has_unread_messages(&state));
        assert_eq!(has_unread_messages_computations(), start + 3);
    }
}
