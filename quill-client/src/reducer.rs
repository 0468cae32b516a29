//! Root reducer: every slice sees every intent, effects are decided on the
//! state as it was before the intent applied

use quill::DispatchResult;

use crate::action::Intent;
use crate::effect::Effect;
use crate::selectors::happychat::can_user_send_messages;
use crate::state::{
    activity_log, happychat, notices, posts, sites, ui, users, AppState, ConnectionStatus,
};

pub fn reducer(state: &mut AppState, intent: Intent) -> DispatchResult<Effect> {
    if matches!(intent, Intent::HappychatMessageSend) && !can_user_send_messages(state) {
        return DispatchResult::unchanged();
    }

    let effect = effect_for(state, &intent);

    let posts_changed = posts::reduce(&mut state.posts, &intent);
    if posts_changed && matches!(intent, Intent::PostRevisionsLoad) {
        state
            .ui
            .protect_form
            .changed_forms
            .insert(ui::EDITOR_FORM.to_string());
    }

    let changes = [
        posts_changed,
        users::reduce_current_user(&mut state.current_user, &intent),
        users::reduce_users(&mut state.users, &intent),
        sites::reduce(&mut state.sites, &intent),
        happychat::reduce(&mut state.happychat, &intent),
        activity_log::reduce(&mut state.activity_log, &intent),
        notices::reduce(&mut state.notices, &intent),
        ui::reduce(&mut state.ui, &intent),
    ];

    let result = DispatchResult::from_changed(changes.contains(&true));
    match effect {
        Some(effect) => result.with(effect),
        None => result,
    }
}

fn effect_for(state: &AppState, intent: &Intent) -> Option<Effect> {
    match intent {
        Intent::Navigate(path) => Some(Effect::Navigate(path.clone())),
        Intent::ProtectFormLeaveConfirm => state
            .ui
            .protect_form
            .pending_leave
            .clone()
            .map(Effect::Navigate),

        Intent::PostEditRequest { site_id, post_id } => {
            let editing = state.posts.editor.post.as_ref().and_then(|p| p.id);
            (editing != Some(*post_id)).then_some(Effect::LoadPost {
                site_id: *site_id,
                post_id: *post_id,
            })
        }
        Intent::PostRevisionsRequest { site_id, post_id } => {
            (!state.posts.revisions.requesting.contains(post_id)).then_some(
                Effect::LoadRevisions {
                    site_id: *site_id,
                    post_id: *post_id,
                },
            )
        }
        Intent::PostTrashConfirm { site_id, post_id } => {
            (!state.posts.is_trashing(*post_id)).then_some(Effect::TrashPost {
                site_id: *site_id,
                post_id: *post_id,
            })
        }

        Intent::HappychatConnectionRequest => (state.happychat.connection_status
            == ConnectionStatus::Uninitialized)
            .then_some(Effect::ConnectChat),
        Intent::HappychatMessageSend => {
            let text = state.happychat.draft.trim();
            (!text.is_empty()).then(|| Effect::SendChatMessage(text.to_string()))
        }

        Intent::ActivityLogRequest { site_id } => {
            Some(Effect::LoadActivityLog { site_id: *site_id })
        }
        Intent::RewindStatusRequest { site_id } => {
            Some(Effect::LoadRewindStatus { site_id: *site_id })
        }
        Intent::RewindActivateRequest { site_id } => {
            let requesting = state
                .activity_log
                .activation_requesting
                .get(site_id)
                .copied()
                .unwrap_or(false);
            (!requesting).then_some(Effect::ActivateRewind { site_id: *site_id })
        }
        Intent::RewindRestoreConfirm { site_id, rewind_id } => Some(Effect::RestoreSite {
            site_id: *site_id,
            rewind_id: rewind_id.clone(),
        }),
        _ => None,
    }
}
