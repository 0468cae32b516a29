//! Boot sequence
//!
//! Runs once before the first navigation, in this order:
//!
//! 1. [`locales`]: apply bootstrapped locale strings, switch to the user's
//!    locale when it was not bootstrapped with the page
//! 2. [`utils`]: record input capabilities
//! 3. [`configure_store`]: receive the signed-in user and their sites
//! 4. [`setup_middlewares`]: register the route middleware chain
//! 5. [`mount_sections`]: register the section controllers behind it

use std::rc::Rc;

use quill::{parse_query, parse_query_lossy, DispatchStore, QueryMap, Router, RouterError};
use tracing::debug;

use crate::action::Intent;
use crate::config::Features;
use crate::i18n::{is_default_locale, LocaleData};
use crate::sections::Sections;
use crate::selectors::ui::get_current_locale_slug;
use crate::selectors::users::is_user_logged_in;
use crate::state::{AppState, Site, User, View};

pub type Store<'a> = &'a mut dyn DispatchStore<AppState, Intent>;

#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("invalid locale strings: {0}")]
    LocaleStrings(#[source] serde_json::Error),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Sections(#[from] quill::SectionError),
}

/// Data delivered with the page
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    /// Raw locale catalog, consumed by [`locales`]
    pub locale_strings: Option<String>,
    pub current_user: Option<User>,
    pub sites: Vec<Site>,
    pub has_touch: bool,
    pub default_locale: String,
}

impl Bootstrap {
    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }
}

pub fn locales(
    bootstrap: &mut Bootstrap,
    features: &Features,
    store: Store<'_>,
) -> Result<(), BootError> {
    debug!("Executing locales");

    if let Some(raw) = bootstrap.locale_strings.take() {
        let data = LocaleData::from_json(&raw).map_err(BootError::LocaleStrings)?;
        store.dispatch(Intent::LocaleRawDataSet(data));
    }

    // Users not bootstrapped with the page get their locale applied here,
    // unless one other than the default is already set
    let current = get_current_locale_slug(store.state()).to_string();
    if !features.wpcom_user_bootstrap && is_default_locale(&current, &bootstrap.default_locale) {
        let user_locale = bootstrap
            .current_user
            .as_ref()
            .and_then(|user| user.locale_slug.clone());
        if let Some(slug) = user_locale {
            store.dispatch(Intent::LocaleSet(slug));
        }
    }
    Ok(())
}

pub fn utils(bootstrap: &Bootstrap, store: Store<'_>) {
    debug!("Executing utils");
    store.dispatch(Intent::UiTouchSet(bootstrap.has_touch));
}

pub fn configure_store(bootstrap: &Bootstrap, features: &Features, store: Store<'_>) {
    debug!("Executing configure store");

    if let Some(user) = &bootstrap.current_user {
        store.dispatch(Intent::UserReceive(user.clone()));
        store.dispatch(Intent::CurrentUserSetId(user.id));
        store.dispatch(Intent::CurrentUserSetFlags(user.active_flags.clone()));
        store.dispatch(Intent::SitesReceive(bootstrap.sites.clone()));
    }

    if features.network_connection {
        store.dispatch(Intent::NetworkConnectionSet(true));
    }
}

/// Paths an OAuth client may open without a token
const OAUTH_LOGGED_OUT_ROUTES: &[&str] = &[
    "/login",
    "/oauth",
    "/start",
    "/authorize",
    "/api/oauth/token",
];

pub fn setup_middlewares(
    router: &mut Router<AppState, Intent>,
    sections: &Rc<Sections>,
    bootstrap: &Bootstrap,
    features: &Features,
) -> Result<(), BootError> {
    debug!("Executing setup middlewares");

    setup_context_middleware(router)?;
    if features.oauth {
        oauth_token_middleware(router)?;
    }
    load_sections_middleware(router, sections)?;
    if !bootstrap.is_logged_in() {
        logged_out_middleware(router, sections, features)?;
    }
    set_route_middleware(router)?;
    clear_notices_middleware(router)?;
    unsaved_forms_middleware(router)?;
    Ok(())
}

fn setup_context_middleware(router: &mut Router<AppState, Intent>) -> Result<(), RouterError> {
    router.route("*", |ctx, next| {
        ctx.query = parse_query_lossy(&ctx.querystring);
        ctx.hash = if ctx.hashstring.is_empty() {
            QueryMap::new()
        } else {
            parse_query(&ctx.hashstring).unwrap_or_else(|err| {
                debug!(%err, "Failed to query-string parse the fragment");
                QueryMap::new()
            })
        };

        // Logging out is a full page load
        if ctx.pathname == "/wp-login.php" {
            let path = ctx.path.clone();
            ctx.navigate_external(path);
            return;
        }

        next.run(ctx);
    })?;
    Ok(())
}

/// Sends OAuth clients without a token to the authorization page
fn oauth_token_middleware(router: &mut Router<AppState, Intent>) -> Result<(), RouterError> {
    router.route("*", |ctx, next| {
        let open = OAUTH_LOGGED_OUT_ROUTES
            .iter()
            .any(|route| ctx.pathname.starts_with(route));
        if !open && !is_user_logged_in(ctx.state()) {
            ctx.redirect("/authorize");
            return;
        }
        next.run(ctx);
    })?;
    Ok(())
}

fn load_sections_middleware(
    router: &mut Router<AppState, Intent>,
    sections: &Rc<Sections>,
) -> Result<(), RouterError> {
    let sections = Rc::clone(sections);
    router.route("*", move |ctx, next| {
        if let Some(section) = sections.section_for_path(&ctx.pathname) {
            if let Err(err) = sections.load(section.name()) {
                tracing::warn!(%err, "Section failed to load");
            }
            ctx.dispatch(Intent::UiSectionSet {
                name: section.name().to_string(),
                group: section.group().map(str::to_string),
            });
        }
        next.run(ctx);
    })?;
    Ok(())
}

fn logged_out_middleware(
    router: &mut Router<AppState, Intent>,
    sections: &Rc<Sections>,
    features: &Features,
) -> Result<(), RouterError> {
    if features.desktop {
        let target = if features.oauth { "/authorize" } else { "/log-in" };
        router.route("/", move |ctx, _next| ctx.redirect(target))?;
    } else if features.devdocs_redirect_loggedout_homepage {
        router.route("/", |ctx, _next| ctx.redirect("/devdocs/start"))?;
    }

    let valid_paths = sections.logged_out_paths();
    router.route("*", move |ctx, next| {
        if valid_paths.iter().any(|path| ctx.path.starts_with(path)) {
            next.run(ctx);
        } else {
            debug!(path = %ctx.path, "Not open to logged-out visitors");
        }
    })?;
    Ok(())
}

fn set_route_middleware(router: &mut Router<AppState, Intent>) -> Result<(), RouterError> {
    router.route("*", |ctx, next| {
        ctx.dispatch(Intent::RouteSet {
            path: ctx.pathname.clone(),
            query: ctx.query.clone(),
        });
        next.run(ctx);
    })?;
    Ok(())
}

fn clear_notices_middleware(router: &mut Router<AppState, Intent>) -> Result<(), RouterError> {
    router.route("*", |ctx, next| {
        ctx.dispatch(Intent::NoticesClearOnNavigation);
        next.run(ctx);
    })?;
    Ok(())
}

/// Holds navigation away from changed, unsaved forms
fn unsaved_forms_middleware(router: &mut Router<AppState, Intent>) -> Result<(), RouterError> {
    router.exit("*", |ctx, next| {
        if ctx.state().ui.protect_form.has_changes() {
            debug!(path = %ctx.path, "Leaving unsaved changes needs confirmation");
            return;
        }
        next.run(ctx);
    })?;
    Ok(())
}

/// Route every path to the controller of the section that serves it
pub fn mount_sections(
    router: &mut Router<AppState, Intent>,
    sections: &Rc<Sections>,
) -> Result<(), BootError> {
    let sections = Rc::clone(sections);
    router.route("*", move |ctx, next| {
        let controller = sections
            .section_for_path(&ctx.pathname)
            .and_then(|section| sections.load(section.name()).ok())
            .and_then(|module| module.controller_for(&ctx.pathname));

        match controller {
            Some((params, controller)) => {
                ctx.params = params;
                controller(ctx);
            }
            None if ctx.pathname == "/" => {
                ctx.dispatch(Intent::UiViewSet(View::Blank));
            }
            None => {
                ctx.dispatch(Intent::UiViewSet(View::NotFound));
            }
        }
        next.run(ctx);
    })?;
    Ok(())
}

/// Run the whole sequence and return the router it set up
pub fn boot(
    mut bootstrap: Bootstrap,
    features: &Features,
    sections: Rc<Sections>,
    store: Store<'_>,
) -> Result<Router<AppState, Intent>, BootError> {
    locales(&mut bootstrap, features, &mut *store)?;
    utils(&bootstrap, &mut *store);
    configure_store(&bootstrap, features, &mut *store);

    let mut router = Router::new();
    setup_middlewares(&mut router, &sections, &bootstrap, features)?;
    mount_sections(&mut router, &sections)?;
    Ok(router)
}
