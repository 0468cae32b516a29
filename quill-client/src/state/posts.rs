//! Posts being edited, their revisions and trash requests

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::action::Intent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Post,
    Page,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Pending,
    Private,
    Publish,
    Future,
    Trash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// `None` until the post has been saved once
    #[serde(default)]
    pub id: Option<u64>,
    pub site_id: u64,
    #[serde(rename = "type", default)]
    pub post_type: PostType,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Post {
    /// A new, unsaved post
    pub fn draft(site_id: u64, post_type: PostType) -> Self {
        Self {
            id: None,
            site_id,
            post_type,
            status: PostStatus::Draft,
            title: String::new(),
            content: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionAuthor {
    pub display_name: String,
}

/// Word counts, never negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionChanges {
    pub added: u32,
    pub removed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRevision {
    pub id: u64,
    #[serde(default)]
    pub author: Option<RevisionAuthor>,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub changes: RevisionChanges,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub site_id: Option<u64>,
    pub post: Option<Post>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RevisionsState {
    /// Newest first, keyed by post id
    pub items: BTreeMap<u64, Vec<PostRevision>>,
    pub requesting: BTreeSet<u64>,
    pub selected_revision_id: Option<u64>,
    pub is_dialog_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PostsState {
    pub editor: EditorState,
    pub revisions: RevisionsState,
    /// Posts with a trash request in flight
    pub trashing: BTreeSet<u64>,
    /// Post awaiting trash confirmation
    pub trash_prompt: Option<u64>,
}

impl PostsState {
    pub fn is_trashing(&self, post_id: u64) -> bool {
        self.trashing.contains(&post_id)
    }
}

pub fn reduce(state: &mut PostsState, intent: &Intent) -> bool {
    match intent {
        Intent::PostEditRequest { site_id, post_id } => {
            let editor = &mut state.editor;
            if editor.post.as_ref().and_then(|p| p.id) == Some(*post_id) {
                return false;
            }
            editor.site_id = Some(*site_id);
            editor.post = None;
            editor.is_loading = true;
            state.revisions.selected_revision_id = None;
            true
        }
        Intent::PostEditDidLoad(post) => {
            state.editor.site_id = Some(post.site_id);
            state.editor.post = Some(post.clone());
            state.editor.is_loading = false;
            true
        }
        Intent::PostEditDidFail { .. } => {
            state.editor.is_loading = false;
            true
        }
        Intent::PostEditStart { site_id, post_type } => {
            state.editor = EditorState {
                site_id: Some(*site_id),
                post: Some(Post::draft(*site_id, *post_type)),
                is_loading: false,
            };
            state.revisions.selected_revision_id = None;
            true
        }

        Intent::PostTrashRequest { post_id } => {
            if state.is_trashing(*post_id) || state.trash_prompt == Some(*post_id) {
                return false;
            }
            state.trash_prompt = Some(*post_id);
            true
        }
        Intent::PostTrashCancel => state.trash_prompt.take().is_some(),
        Intent::PostTrashConfirm { post_id, .. } => {
            state.trash_prompt = None;
            state.trashing.insert(*post_id)
        }
        Intent::PostTrashDidSucceed { post_id, .. } => {
            state.trashing.remove(post_id);
            if let Some(post) = state.editor.post.as_mut().filter(|p| p.id == Some(*post_id)) {
                post.status = PostStatus::Trash;
            }
            true
        }
        Intent::PostTrashDidFail { post_id, .. } => state.trashing.remove(post_id),

        Intent::PostRevisionsRequest { post_id, .. } => state.revisions.requesting.insert(*post_id),
        Intent::PostRevisionsReceive {
            post_id, revisions, ..
        } => {
            let mut revisions = revisions.clone();
            revisions.sort_by(|a, b| b.id.cmp(&a.id));
            state.revisions.requesting.remove(post_id);
            state.revisions.items.insert(*post_id, revisions);
            true
        }
        Intent::PostRevisionsRequestDidFail { post_id, .. } => {
            state.revisions.requesting.remove(post_id)
        }
        Intent::PostRevisionsSelect { revision_id } => {
            let changed = state.revisions.selected_revision_id != Some(*revision_id);
            state.revisions.selected_revision_id = Some(*revision_id);
            changed
        }
        Intent::PostRevisionsDialogToggle => {
            state.revisions.is_dialog_visible = !state.revisions.is_dialog_visible;
            true
        }
        Intent::PostRevisionsLoad => {
            let Some(selected) = state.revisions.selected_revision_id else {
                return false;
            };
            let Some(post) = state.editor.post.as_mut() else {
                return false;
            };
            let revision = post.id.and_then(|id| {
                state
                    .revisions
                    .items
                    .get(&id)
                    .and_then(|revisions| revisions.iter().find(|r| r.id == selected))
            });
            let Some(revision) = revision else {
                return false;
            };
            post.title = revision.title.clone();
            post.content = revision.content.clone();
            state.revisions.is_dialog_visible = false;
            true
        }
        _ => false,
    }
}
