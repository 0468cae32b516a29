use crate::state::{AppState, Post, PostRevision};

/// Selected revision, 0 when none is
pub fn get_post_revisions_selected_revision_id(state: &AppState) -> u64 {
    state.posts.revisions.selected_revision_id.unwrap_or(0)
}

pub fn is_post_revisions_dialog_visible(state: &AppState) -> bool {
    state.posts.revisions.is_dialog_visible
}

/// Newest first, empty when not loaded
pub fn get_post_revisions(state: &AppState, post_id: u64) -> &[PostRevision] {
    state
        .posts
        .revisions
        .items
        .get(&post_id)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub fn is_requesting_post_revisions(state: &AppState, post_id: u64) -> bool {
    state.posts.revisions.requesting.contains(&post_id)
}

pub fn get_editor_post(state: &AppState) -> Option<&Post> {
    state.posts.editor.post.as_ref()
}

pub fn get_editor_post_id(state: &AppState) -> Option<u64> {
    get_editor_post(state).and_then(|post| post.id)
}

pub fn is_trashing_post(state: &AppState, post_id: u64) -> bool {
    state.posts.is_trashing(post_id)
}
