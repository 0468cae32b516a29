//! Sites the current user can manage

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::action::Intent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePlan {
    pub product_slug: String,
    #[serde(default = "default_true")]
    pub is_free: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteOptions {
    /// Hosted site moved onto the partner stack
    #[serde(default)]
    pub is_automated_transfer: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub jetpack: bool,
    #[serde(default)]
    pub single_user_site: bool,
    #[serde(default)]
    pub plan: Option<SitePlan>,
    #[serde(default)]
    pub options: SiteOptions,
}

#[derive(Debug, Clone, Default)]
pub struct SitesState {
    pub items: BTreeMap<u64, Site>,
}

pub fn reduce(state: &mut SitesState, intent: &Intent) -> bool {
    match intent {
        Intent::SitesReceive(sites) => {
            for site in sites {
                state.items.insert(site.id, site.clone());
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_merges_by_id() {
        let mut state = SitesState::default();
        let site = |id: u64, slug: &str| Site {
            id,
            slug: slug.into(),
            name: String::new(),
            jetpack: false,
            single_user_site: true,
            plan: None,
            options: SiteOptions::default(),
        };

        reduce(&mut state, &Intent::SitesReceive(vec![site(1, "a"), site(2, "b")]));
        reduce(&mut state, &Intent::SitesReceive(vec![site(2, "renamed")]));

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[&2].slug, "renamed");
    }

    #[test]
    fn test_site_json_defaults() {
        let site: Site = serde_json::from_str(r#"{ "id": 3, "slug": "example.blog" }"#)
            .unwrap_or_else(|err| panic!("{err}"));
        assert!(!site.jetpack);
        assert!(!site.options.is_automated_transfer);
        assert_eq!(site.plan, None);
        assert_eq!(site.options.created_at, None);
    }

    #[test]
    fn test_site_created_at_keeps_its_offset() {
        let site: Site = serde_json::from_str(
            r#"{ "id": 3, "slug": "example.blog", "options": { "created_at": "2017-06-01T12:00:00+05:00" } }"#,
        )
        .unwrap_or_else(|err| panic!("{err}"));
        let created_at = site.options.created_at.unwrap_or_else(|| panic!("missing date"));
        assert_eq!(created_at.offset().local_minus_utc(), 5 * 3600);
        assert_eq!(created_at.naive_utc().to_string(), "2017-06-01 07:00:00");
    }
}
