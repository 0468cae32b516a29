//! Transient notices shown above the page

use crate::action::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStatus {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub status: NoticeStatus,
    /// Source text, translated when rendered
    pub text: String,
    /// Survive the next navigation once
    pub display_on_next_page: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NoticesState {
    pub items: Vec<Notice>,
    next_id: u64,
}

impl NoticesState {
    fn push(&mut self, status: NoticeStatus, text: String, display_on_next_page: bool) {
        self.next_id += 1;
        self.items.push(Notice {
            id: self.next_id,
            status,
            text,
            display_on_next_page,
        });
    }
}

pub fn reduce(state: &mut NoticesState, intent: &Intent) -> bool {
    match intent {
        Intent::NoticeCreate {
            status,
            text,
            display_on_next_page,
        } => {
            state.push(*status, text.clone(), *display_on_next_page);
            true
        }
        Intent::NoticeDismiss(id) => {
            let before = state.items.len();
            state.items.retain(|notice| notice.id != *id);
            state.items.len() != before
        }
        Intent::NoticesClearOnNavigation => {
            if state.items.is_empty() {
                return false;
            }
            state.items.retain(|notice| notice.display_on_next_page);
            for notice in &mut state.items {
                notice.display_on_next_page = false;
            }
            true
        }
        Intent::PostTrashDidSucceed { .. } => {
            state.push(NoticeStatus::Success, "Post moved to trash.".into(), false);
            true
        }
        Intent::PostTrashDidFail { error, .. } => {
            state.push(NoticeStatus::Error, error.clone(), false);
            true
        }
        Intent::PostEditDidFail { error, .. }
        | Intent::PostRevisionsRequestDidFail { error, .. } => {
            state.push(NoticeStatus::Error, error.clone(), false);
            true
        }
        _ => false,
    }
}
