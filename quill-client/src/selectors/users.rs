use crate::state::{AppState, User};

pub fn get_current_user_id(state: &AppState) -> Option<u64> {
    state.current_user.id
}

pub fn get_current_user(state: &AppState) -> Option<&User> {
    get_current_user_id(state).and_then(|id| state.users.items.get(&id))
}

pub fn is_user_logged_in(state: &AppState) -> bool {
    get_current_user_id(state).is_some()
}

pub fn get_current_user_locale(state: &AppState) -> Option<&str> {
    get_current_user(state).and_then(|user| user.locale_slug.as_deref())
}

pub fn has_user_purchased_a_plan(state: &AppState) -> bool {
    get_current_user(state).is_some_and(|user| user.has_purchased_plan)
}

pub fn is_current_user_flagged(state: &AppState, flag: &str) -> bool {
    state.current_user.flags.iter().any(|f| f == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_requires_a_known_id() {
        let mut state = AppState::default();
        assert!(!is_user_logged_in(&state));
        assert!(get_current_user(&state).is_none());

        state.current_user.id = Some(3);
        assert!(is_user_logged_in(&state));
        assert!(get_current_user(&state).is_none());
        assert!(!has_user_purchased_a_plan(&state));

        state.users.items.insert(
            3,
            User {
                id: 3,
                username: "grace".into(),
                display_name: "Grace".into(),
                locale_slug: Some("fr".into()),
                primary_blog: None,
                active_flags: Vec::new(),
                has_purchased_plan: true,
            },
        );
        assert_eq!(get_current_user_locale(&state), Some("fr"));
        assert!(has_user_purchased_a_plan(&state));
    }
}
