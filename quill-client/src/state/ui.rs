//! Route, section, view and other presentation state

use std::collections::BTreeSet;
use std::sync::Arc;

use quill::QueryMap;
use serde::{Deserialize, Serialize};

use crate::action::Intent;
use crate::i18n::LocaleData;

/// Page shown in the main area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Blank,
    PostEditor {
        site_id: u64,
        post_id: Option<u64>,
    },
    Happychat,
    JetpackConnect,
    NextSteps {
        is_welcome: bool,
    },
    DisconnectSurvey,
    ActivityLog {
        site_id: u64,
    },
    /// Static page with a title only
    Page {
        title: String,
    },
    NotFound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteState {
    pub path: String,
    pub query: QueryMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionState {
    pub name: String,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LanguageState {
    pub locale_slug: Option<String>,
    /// Shared so every render can hold a cheap handle
    pub locale_data: Option<Arc<LocaleData>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ImageEditorState {
    /// `None` until the image has loaded
    pub original_aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, Default)]
pub struct ProtectFormState {
    /// Forms holding unsaved changes
    pub changed_forms: BTreeSet<String>,
    /// Navigation held back until the user confirms leaving
    pub pending_leave: Option<String>,
}

impl ProtectFormState {
    pub fn has_changes(&self) -> bool {
        !self.changed_forms.is_empty()
    }
}

/// Form name used by the post editor
pub const EDITOR_FORM: &str = "post-editor";

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub route: RouteState,
    pub section: Option<SectionState>,
    pub view: View,
    pub selected_site_id: Option<u64>,
    /// `Some` once the input capabilities are known
    pub has_touch: Option<bool>,
    /// Last URL handed off to the outside world
    pub external_url: Option<String>,
    /// `None` when connection monitoring is off
    pub is_online: Option<bool>,
    pub language: LanguageState,
    pub image_editor: ImageEditorState,
    pub protect_form: ProtectFormState,
}

pub fn reduce(state: &mut UiState, intent: &Intent) -> bool {
    match intent {
        Intent::RouteSet { path, query } => {
            state.route = RouteState {
                path: path.clone(),
                query: query.clone(),
            };
            state.external_url = None;
            true
        }
        Intent::UiSectionSet { name, group } => {
            let section = SectionState {
                name: name.clone(),
                group: group.clone(),
            };
            let changed = state.section.as_ref() != Some(&section);
            state.section = Some(section);
            changed
        }
        Intent::UiViewSet(view) => {
            let changed = state.view != *view;
            state.view = view.clone();
            changed
        }
        Intent::UiSelectedSiteSet(site_id) => {
            let changed = state.selected_site_id != *site_id;
            state.selected_site_id = *site_id;
            changed
        }
        Intent::UiTouchSet(has_touch) => {
            state.has_touch = Some(*has_touch);
            true
        }
        Intent::UiExternalUrlSet(url) => {
            state.external_url = Some(url.clone());
            true
        }
        Intent::NetworkConnectionSet(online) => {
            let changed = state.is_online != Some(*online);
            state.is_online = Some(*online);
            changed
        }
        Intent::LocaleSet(slug) => {
            let changed = state.language.locale_slug.as_deref() != Some(slug.as_str());
            state.language.locale_slug = Some(slug.clone());
            changed
        }
        Intent::LocaleRawDataSet(data) => {
            if let Some(slug) = data.locale_slug() {
                state.language.locale_slug = Some(slug.to_string());
            }
            state.language.locale_data = Some(Arc::new(data.clone()));
            true
        }
        Intent::ImageEditorOriginalAspectRatioSet(ratio) => {
            let changed = state.image_editor.original_aspect_ratio != *ratio;
            state.image_editor.original_aspect_ratio = *ratio;
            changed
        }

        Intent::ProtectFormMarkChanged(form) => {
            state.protect_form.changed_forms.insert(form.clone())
        }
        Intent::ProtectFormMarkSaved(form) => state.protect_form.changed_forms.remove(form),
        Intent::ProtectFormLeaveBlock(path) => {
            state.protect_form.pending_leave = Some(path.clone());
            true
        }
        Intent::ProtectFormLeaveConfirm => {
            state.protect_form.changed_forms.clear();
            state.protect_form.pending_leave = None;
            true
        }
        Intent::ProtectFormLeaveCancel => state.protect_form.pending_leave.take().is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_set_clears_external_url() {
        let mut state = UiState {
            external_url: Some("https://example.com".into()),
            ..Default::default()
        };
        let mut query = QueryMap::new();
        query.insert("ref".into(), "menu".into());

        reduce(
            &mut state,
            &Intent::RouteSet {
                path: "/me/next".into(),
                query: query.clone(),
            },
        );

        assert_eq!(state.route.path, "/me/next");
        assert_eq!(state.route.query, query);
        assert_eq!(state.external_url, None);
    }

    #[test]
    fn test_aspect_ratio_unset_until_loaded() {
        let mut state = UiState::default();
        assert_eq!(state.image_editor.original_aspect_ratio, None);

        let ratio = AspectRatio {
            width: 100,
            height: 200,
        };
        reduce(&mut state, &Intent::ImageEditorOriginalAspectRatioSet(Some(ratio)));
        assert_eq!(state.image_editor.original_aspect_ratio, Some(ratio));
    }

    #[test]
    fn test_protect_form_leave_flow() {
        let mut state = UiState::default();
        reduce(&mut state, &Intent::ProtectFormMarkChanged(EDITOR_FORM.into()));
        assert!(state.protect_form.has_changes());

        reduce(&mut state, &Intent::ProtectFormLeaveBlock("/me/next".into()));
        assert_eq!(state.protect_form.pending_leave.as_deref(), Some("/me/next"));

        assert!(reduce(&mut state, &Intent::ProtectFormLeaveCancel));
        assert!(state.protect_form.has_changes());

        reduce(&mut state, &Intent::ProtectFormLeaveBlock("/me/next".into()));
        reduce(&mut state, &Intent::ProtectFormLeaveConfirm);
        assert!(!state.protect_form.has_changes());
        assert_eq!(state.protect_form.pending_leave, None);
    }
}
