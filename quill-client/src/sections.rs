//! Sections of the client and the controllers behind their routes
//!
//! Each section owns a set of path prefixes. Its module, the list of route
//! controllers, is built the first time one of its paths is visited.

use quill::{Context, Params, RoutePattern, SectionDefinition, SectionError, SectionRegistry};

use crate::action::Intent;
use crate::selectors::sites::{get_site, get_site_by_slug};
use crate::state::{AppState, NoticeStatus, PostType, View};

pub type RouteContext<'a> = Context<'a, AppState, Intent>;

/// Renders a route: dispatches whatever the page needs
pub type Controller = fn(&mut RouteContext<'_>);

pub struct SectionModule {
    routes: Vec<(RoutePattern, Controller)>,
}

impl SectionModule {
    fn new(routes: &[(&str, Controller)]) -> Self {
        let routes = routes
            .iter()
            .filter_map(|(pattern, controller)| match RoutePattern::parse(pattern) {
                Ok(pattern) => Some((pattern, *controller)),
                Err(err) => {
                    tracing::warn!(%err, "Skipping section route");
                    None
                }
            })
            .collect();
        Self { routes }
    }

    /// First controller whose pattern matches, with its captures
    pub fn controller_for(&self, pathname: &str) -> Option<(Params, Controller)> {
        self.routes.iter().find_map(|(pattern, controller)| {
            pattern.matches(pathname).map(|params| (params, *controller))
        })
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

pub type Sections = SectionRegistry<SectionModule>;

pub fn registry() -> Result<Sections, SectionError> {
    let mut sections = SectionRegistry::new();
    let definitions = [
        SectionDefinition {
            name: "post-editor",
            paths: vec!["/post", "/page"],
            enable_logged_out: false,
            group: Some("editor"),
            loader: post_editor,
        },
        SectionDefinition {
            name: "happychat",
            paths: vec!["/me/chat"],
            enable_logged_out: false,
            group: Some("me"),
            loader: happychat,
        },
        SectionDefinition {
            name: "me",
            paths: vec!["/me"],
            enable_logged_out: false,
            group: Some("me"),
            loader: me,
        },
        SectionDefinition {
            name: "site-settings",
            paths: vec!["/settings"],
            enable_logged_out: false,
            group: Some("sites"),
            loader: site_settings,
        },
        SectionDefinition {
            name: "activity-log",
            paths: vec!["/activity-log"],
            enable_logged_out: false,
            group: Some("sites"),
            loader: activity_log,
        },
        SectionDefinition {
            name: "stats",
            paths: vec!["/stats"],
            enable_logged_out: false,
            group: Some("sites"),
            loader: stats,
        },
        SectionDefinition {
            name: "jetpackConnect",
            paths: vec!["/jetpack/connect"],
            enable_logged_out: true,
            group: Some("sites"),
            loader: jetpack_connect,
        },
        SectionDefinition {
            name: "login",
            paths: vec!["/log-in", "/login"],
            enable_logged_out: true,
            group: None,
            loader: login,
        },
        SectionDefinition {
            name: "auth",
            paths: vec!["/authorize"],
            enable_logged_out: true,
            group: None,
            loader: auth,
        },
        SectionDefinition {
            name: "devdocs",
            paths: vec!["/devdocs"],
            enable_logged_out: true,
            group: None,
            loader: devdocs,
        },
    ];
    for definition in definitions {
        sections.register(definition)?;
    }
    Ok(sections)
}

/// Site id for a `:site` capture, either a numeric id or a slug
fn resolve_site(state: &AppState, raw: &str) -> Option<u64> {
    match raw.parse::<u64>() {
        Ok(id) => get_site(state, id).map(|site| site.id),
        Err(_) => get_site_by_slug(state, raw).map(|site| site.id),
    }
}

fn site_param(ctx: &mut RouteContext<'_>) -> Option<u64> {
    let raw = ctx.param("site")?.to_string();
    let site_id = resolve_site(ctx.state(), &raw);
    if site_id.is_none() {
        tracing::debug!(site = %raw, "Unknown site in route");
        ctx.dispatch(Intent::UiViewSet(View::NotFound));
    }
    site_id
}

fn show_page(ctx: &mut RouteContext<'_>, title: &str) {
    ctx.dispatch(Intent::UiViewSet(View::Page {
        title: title.to_string(),
    }));
}

// ============================================================================
// Post editor
// ============================================================================

fn post_editor() -> SectionModule {
    SectionModule::new(&[
        ("/post/:site/:post", edit_post),
        ("/post/:site", new_post),
        ("/page/:site/:post", edit_page),
        ("/page/:site", new_page),
    ])
}

fn edit_post(ctx: &mut RouteContext<'_>) {
    open_editor(ctx, PostType::Post);
}

fn edit_page(ctx: &mut RouteContext<'_>) {
    open_editor(ctx, PostType::Page);
}

fn new_post(ctx: &mut RouteContext<'_>) {
    start_editor(ctx, PostType::Post);
}

fn new_page(ctx: &mut RouteContext<'_>) {
    start_editor(ctx, PostType::Page);
}

fn open_editor(ctx: &mut RouteContext<'_>, post_type: PostType) {
    let Some(site_id) = site_param(ctx) else {
        return;
    };
    let Some(post_id) = ctx.param("post").and_then(|raw| raw.parse::<u64>().ok()) else {
        ctx.dispatch(Intent::UiViewSet(View::NotFound));
        return;
    };
    tracing::debug!(site_id, post_id, ?post_type, "Opening editor");

    ctx.dispatch(Intent::UiSelectedSiteSet(Some(site_id)));
    ctx.dispatch(Intent::UiViewSet(View::PostEditor {
        site_id,
        post_id: Some(post_id),
    }));
    ctx.dispatch(Intent::PostEditRequest { site_id, post_id });
    ctx.dispatch(Intent::PostRevisionsRequest { site_id, post_id });
}

fn start_editor(ctx: &mut RouteContext<'_>, post_type: PostType) {
    let Some(site_id) = site_param(ctx) else {
        return;
    };
    ctx.dispatch(Intent::UiSelectedSiteSet(Some(site_id)));
    ctx.dispatch(Intent::UiViewSet(View::PostEditor {
        site_id,
        post_id: None,
    }));
    ctx.dispatch(Intent::PostEditStart { site_id, post_type });
}

// ============================================================================
// Account pages
// ============================================================================

fn happychat() -> SectionModule {
    SectionModule::new(&[("/me/chat", open_chat)])
}

fn open_chat(ctx: &mut RouteContext<'_>) {
    ctx.dispatch(Intent::UiViewSet(View::Happychat));
    ctx.dispatch(Intent::HappychatConnectionRequest);
}

fn me() -> SectionModule {
    SectionModule::new(&[
        ("/me/next/welcome", next_steps_welcome),
        ("/me/next", next_steps),
        ("/me", account),
    ])
}

fn next_steps(ctx: &mut RouteContext<'_>) {
    ctx.dispatch(Intent::UiViewSet(View::NextSteps { is_welcome: false }));
}

fn next_steps_welcome(ctx: &mut RouteContext<'_>) {
    ctx.dispatch(Intent::UiViewSet(View::NextSteps { is_welcome: true }));
}

fn account(ctx: &mut RouteContext<'_>) {
    show_page(ctx, "My Profile");
}

// ============================================================================
// Site pages
// ============================================================================

fn site_settings() -> SectionModule {
    SectionModule::new(&[
        ("/settings/disconnect-site/confirm/:site", disconnect_confirm),
        ("/settings/disconnect-site/:reason/:site", disconnect_reason),
        ("/settings/disconnect-site/:site", disconnect_survey),
        ("/settings/general/:site", general_settings),
    ])
}

fn disconnect_survey(ctx: &mut RouteContext<'_>) {
    let Some(site_id) = site_param(ctx) else {
        return;
    };
    ctx.dispatch(Intent::UiSelectedSiteSet(Some(site_id)));
    ctx.dispatch(Intent::UiViewSet(View::DisconnectSurvey));
}

/// A survey answer: thank the user and move on to the confirmation step
fn disconnect_reason(ctx: &mut RouteContext<'_>) {
    let Some(site_id) = site_param(ctx) else {
        return;
    };
    let reason = ctx.param("reason").unwrap_or_default().to_string();
    tracing::debug!(site_id, %reason, "Disconnect survey answered");

    let slug = ctx.param("site").unwrap_or_default().to_string();
    ctx.dispatch(Intent::NoticeCreate {
        status: NoticeStatus::Info,
        text: "Thanks for your feedback.".into(),
        display_on_next_page: true,
    });
    ctx.redirect(format!("/settings/disconnect-site/confirm/{slug}?reason={reason}"));
}

fn disconnect_confirm(ctx: &mut RouteContext<'_>) {
    let Some(site_id) = site_param(ctx) else {
        return;
    };
    let reason = ctx.query.get("reason").cloned().unwrap_or_default();
    tracing::info!(site_id, %reason, "Site disconnected");

    let slug = get_site(ctx.state(), site_id)
        .map(|site| site.slug.clone())
        .unwrap_or_default();
    ctx.dispatch(Intent::NoticeCreate {
        status: NoticeStatus::Success,
        text: "Site disconnected.".into(),
        display_on_next_page: true,
    });
    ctx.redirect(format!("/stats/insights/{slug}"));
}

fn general_settings(ctx: &mut RouteContext<'_>) {
    if let Some(site_id) = site_param(ctx) {
        ctx.dispatch(Intent::UiSelectedSiteSet(Some(site_id)));
        show_page(ctx, "Settings");
    }
}

fn activity_log() -> SectionModule {
    SectionModule::new(&[("/activity-log/:site", open_activity_log)])
}

fn open_activity_log(ctx: &mut RouteContext<'_>) {
    let Some(site_id) = site_param(ctx) else {
        return;
    };
    ctx.dispatch(Intent::UiSelectedSiteSet(Some(site_id)));
    ctx.dispatch(Intent::UiViewSet(View::ActivityLog { site_id }));
    ctx.dispatch(Intent::ActivityLogRequest { site_id });
    ctx.dispatch(Intent::RewindStatusRequest { site_id });
}

fn stats() -> SectionModule {
    SectionModule::new(&[("/stats/insights/:site", insights), ("/stats/*", insights)])
}

fn insights(ctx: &mut RouteContext<'_>) {
    let site_id = ctx
        .param("site")
        .map(str::to_string)
        .and_then(|raw| resolve_site(ctx.state(), &raw));
    if site_id.is_some() {
        ctx.dispatch(Intent::UiSelectedSiteSet(site_id));
    }
    show_page(ctx, "Insights");
}

fn jetpack_connect() -> SectionModule {
    SectionModule::new(&[("/jetpack/connect", connect_site), ("/jetpack/connect/*", connect_site)])
}

fn connect_site(ctx: &mut RouteContext<'_>) {
    ctx.dispatch(Intent::UiViewSet(View::JetpackConnect));
}

// ============================================================================
// Logged-out pages
// ============================================================================

fn login() -> SectionModule {
    SectionModule::new(&[("/log-in", log_in), ("/login", log_in)])
}

fn log_in(ctx: &mut RouteContext<'_>) {
    show_page(ctx, "Log In");
}

fn auth() -> SectionModule {
    SectionModule::new(&[("/authorize", authorize)])
}

fn authorize(ctx: &mut RouteContext<'_>) {
    show_page(ctx, "Authorize");
}

fn devdocs() -> SectionModule {
    SectionModule::new(&[("/devdocs/start", devdocs_start), ("/devdocs/*", devdocs_start)])
}

fn devdocs_start(ctx: &mut RouteContext<'_>) {
    show_page(ctx, "Developer Docs");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_section_loads() {
        let sections = registry().unwrap();
        for section in sections.iter() {
            let module = sections.load(section.name()).unwrap();
            assert!(module.route_count() > 0, "{} has no routes", section.name());
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let sections = registry().unwrap();
        let name = |path: &str| sections.section_for_path(path).map(|s| s.name());

        assert_eq!(name("/me/chat"), Some("happychat"));
        assert_eq!(name("/me/next/welcome"), Some("me"));
        assert_eq!(name("/post/quill-demo.example/7"), Some("post-editor"));
        assert_eq!(name("/media"), None);
    }

    #[test]
    fn test_controller_order_within_module() {
        let module = site_settings();
        let (params, _) = module
            .controller_for("/settings/disconnect-site/confirm/quill-demo.example")
            .unwrap();
        assert_eq!(params.get("site").map(String::as_str), Some("quill-demo.example"));
        assert!(!params.contains_key("reason"));

        let (params, _) = module
            .controller_for("/settings/disconnect-site/too-expensive/quill-demo.example")
            .unwrap();
        assert_eq!(params.get("reason").map(String::as_str), Some("too-expensive"));
    }

    #[test]
    fn test_logged_out_paths() {
        let sections = registry().unwrap();
        let paths = sections.logged_out_paths();
        assert!(paths.contains(&"/jetpack/connect"));
        assert!(paths.contains(&"/log-in"));
        assert!(!paths.contains(&"/post"));
    }
}
