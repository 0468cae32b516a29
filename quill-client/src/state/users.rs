//! Known users and the signed-in user

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::Intent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub locale_slug: Option<String>,
    #[serde(default)]
    pub primary_blog: Option<u64>,
    /// Feature flags active for this account
    #[serde(default)]
    pub active_flags: Vec<String>,
    /// Whether the user bought any paid plan
    #[serde(default)]
    pub has_purchased_plan: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UsersState {
    pub items: BTreeMap<u64, User>,
}

#[derive(Debug, Clone, Default)]
pub struct CurrentUserState {
    pub id: Option<u64>,
    pub flags: Vec<String>,
}

pub fn reduce_users(state: &mut UsersState, intent: &Intent) -> bool {
    match intent {
        Intent::UserReceive(user) => {
            let previous = state.items.insert(user.id, user.clone());
            previous.as_ref() != Some(user)
        }
        _ => false,
    }
}

pub fn reduce_current_user(state: &mut CurrentUserState, intent: &Intent) -> bool {
    match intent {
        Intent::CurrentUserSetId(id) => {
            let changed = state.id != Some(*id);
            state.id = Some(*id);
            changed
        }
        Intent::CurrentUserSetFlags(flags) => {
            let changed = state.flags != *flags;
            state.flags = flags.clone();
            changed
        }
        _ => false,
    }
}
