use quill::QueryMap;

use crate::state::{AppState, AspectRatio, View};

pub fn get_section(state: &AppState) -> Option<&crate::state::SectionState> {
    state.ui.section.as_ref()
}

pub fn get_section_name(state: &AppState) -> Option<&str> {
    get_section(state).map(|section| section.name.as_str())
}

pub fn get_section_group(state: &AppState) -> Option<&str> {
    get_section(state).and_then(|section| section.group.as_deref())
}

pub fn get_current_route(state: &AppState) -> &str {
    &state.ui.route.path
}

pub fn get_current_query_arguments(state: &AppState) -> &QueryMap {
    &state.ui.route.query
}

pub fn get_view(state: &AppState) -> &View {
    &state.ui.view
}

/// Locale in effect, `"en"` until one is set
pub fn get_current_locale_slug(state: &AppState) -> &str {
    state.ui.language.locale_slug.as_deref().unwrap_or("en")
}

/// `None` until an image editor reports its loaded image
pub fn get_image_editor_original_aspect_ratio(state: &AppState) -> Option<AspectRatio> {
    state.ui.image_editor.original_aspect_ratio
}

/// `false` only once the connection is known to be down
pub fn is_online(state: &AppState) -> bool {
    state.ui.is_online.unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SectionState;

    #[test]
    fn test_section_name() {
        let mut state = AppState::default();
        assert_eq!(get_section_name(&state), None);

        state.ui.section = Some(SectionState {
            name: "post-editor".into(),
            group: Some("editor".into()),
        });
        assert_eq!(get_section_name(&state), Some("post-editor"));
        assert_eq!(get_section_group(&state), Some("editor"));
    }

    #[test]
    fn test_aspect_ratio_defaults_to_none() {
        let mut state = AppState::default();
        assert_eq!(get_image_editor_original_aspect_ratio(&state), None);

        state.ui.image_editor.original_aspect_ratio = Some(AspectRatio {
            width: 16,
            height: 9,
        });
        assert_eq!(
            get_image_editor_original_aspect_ratio(&state),
            Some(AspectRatio {
                width: 16,
                height: 9
            })
        );
    }
}
