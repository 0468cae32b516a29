//! Effects declared by the reducer and carried out by [`crate::app::Services`]

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the route chain, or hand an absolute URL to the outside world
    Navigate(String),
    LoadPost { site_id: u64, post_id: u64 },
    LoadRevisions { site_id: u64, post_id: u64 },
    TrashPost { site_id: u64, post_id: u64 },
    ConnectChat,
    SendChatMessage(String),
    LoadActivityLog { site_id: u64 },
    LoadRewindStatus { site_id: u64 },
    ActivateRewind { site_id: u64 },
    RestoreSite { site_id: u64, rewind_id: String },
}
