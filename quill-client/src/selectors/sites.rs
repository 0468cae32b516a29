use crate::selectors::users::get_current_user;
use crate::state::{AppState, Site};

pub fn get_site(state: &AppState, site_id: u64) -> Option<&Site> {
    state.sites.items.get(&site_id)
}

pub fn get_site_by_slug<'a>(state: &'a AppState, slug: &str) -> Option<&'a Site> {
    state.sites.items.values().find(|site| site.slug == slug)
}

pub fn get_site_slug(state: &AppState, site_id: u64) -> Option<&str> {
    get_site(state, site_id).map(|site| site.slug.as_str())
}

pub fn is_jetpack_site(state: &AppState, site_id: u64) -> bool {
    get_site(state, site_id).is_some_and(|site| site.jetpack)
}

/// Whether the site went through automated transfer
pub fn is_at_enabled(site: Option<&Site>) -> bool {
    site.is_some_and(|site| site.options.is_automated_transfer)
}

/// `None` for sites that aren't loaded
pub fn is_single_user_site(state: &AppState, site_id: u64) -> Option<bool> {
    get_site(state, site_id).map(|site| site.single_user_site)
}

pub fn is_site_on_paid_plan(state: &AppState, site_id: u64) -> bool {
    get_site(state, site_id)
        .and_then(|site| site.plan.as_ref())
        .is_some_and(|plan| !plan.is_free)
}

pub fn get_selected_site_id(state: &AppState) -> Option<u64> {
    state.ui.selected_site_id
}

pub fn get_selected_site(state: &AppState) -> Option<&Site> {
    get_selected_site_id(state).and_then(|id| get_site(state, id))
}

pub fn get_selected_site_slug(state: &AppState) -> Option<&str> {
    get_selected_site(state).map(|site| site.slug.as_str())
}

pub fn get_primary_site_id(state: &AppState) -> Option<u64> {
    get_current_user(state).and_then(|user| user.primary_blog)
}

pub fn get_selected_or_primary_site_id(state: &AppState) -> Option<u64> {
    get_selected_site_id(state).or_else(|| get_primary_site_id(state))
}

/// Most recently created site by instant; ties go to the higher id
///
/// Sites without a creation date sort before every dated site.
pub fn get_newest_site(state: &AppState) -> Option<&Site> {
    state
        .sites
        .items
        .values()
        .max_by(|a, b| {
            a.options
                .created_at
                .cmp(&b.options.created_at)
                .then(a.id.cmp(&b.id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    use crate::state::{SiteOptions, SitePlan};

    fn site(id: u64, created_at: &str) -> Site {
        Site {
            id,
            slug: format!("site{id}.example"),
            name: format!("Site {id}"),
            jetpack: false,
            single_user_site: false,
            plan: None,
            options: SiteOptions {
                is_automated_transfer: false,
                created_at: DateTime::parse_from_rfc3339(created_at).ok(),
            },
        }
    }

    fn state(sites: Vec<Site>) -> AppState {
        let mut state = AppState::default();
        for site in sites {
            state.sites.items.insert(site.id, site);
        }
        state
    }

    #[test]
    fn test_newest_site() {
        let state = state(vec![
            site(1, "2016-01-01T00:00:00+00:00"),
            site(2, "2017-06-01T00:00:00+00:00"),
            site(3, "2015-01-01T00:00:00+00:00"),
        ]);
        assert_eq!(get_newest_site(&state).map(|s| s.id), Some(2));
        assert!(get_newest_site(&AppState::default()).is_none());
    }

    #[test]
    fn test_newest_site_compares_instants_across_offsets() {
        // 12:00+05:00 is 07:00Z, an hour before site 2
        let state = state(vec![
            site(1, "2017-06-01T12:00:00+05:00"),
            site(2, "2017-06-01T08:00:00+00:00"),
        ]);
        assert_eq!(get_newest_site(&state).map(|s| s.id), Some(2));
    }

    #[test]
    fn test_undated_site_is_never_newest() {
        let state = state(vec![site(5, ""), site(1, "2016-01-01T00:00:00+00:00")]);
        assert_eq!(get_newest_site(&state).map(|s| s.id), Some(1));
    }

    #[test]
    fn test_paid_plan() {
        let mut paid = site(1, "");
        paid.plan = Some(SitePlan {
            product_slug: "business-bundle".into(),
            is_free: false,
        });
        let mut free = site(2, "");
        free.plan = Some(SitePlan {
            product_slug: "free_plan".into(),
            is_free: true,
        });
        let state = state(vec![paid, free, site(3, "")]);

        assert!(is_site_on_paid_plan(&state, 1));
        assert!(!is_site_on_paid_plan(&state, 2));
        assert!(!is_site_on_paid_plan(&state, 3));
        assert!(!is_site_on_paid_plan(&state, 4));
    }

    #[test]
    fn test_selected_site() {
        let mut state = state(vec![site(7, "")]);
        assert!(get_selected_site(&state).is_none());

        state.ui.selected_site_id = Some(7);
        assert_eq!(get_selected_site_slug(&state), Some("site7.example"));
        assert_eq!(
            get_site_by_slug(&state, "site7.example").map(|s| s.id),
            Some(7)
        );
    }

    #[test]
    fn test_single_user_unknown_site() {
        let state = state(vec![site(1, "")]);
        assert_eq!(is_single_user_site(&state, 1), Some(false));
        assert_eq!(is_single_user_site(&state, 2), None);
    }
}
