//! Route middleware pipeline
//!
//! Handlers are registered against path patterns and run, per navigation, in
//! registration order. Each handler receives the navigation [`Context`] and a
//! [`Next`] continuation. Calling `next.run(ctx)` hands control to the next
//! matching handler; returning without calling it halts the chain for that
//! navigation.
//!
//! ```ignore
//! let mut router = Router::new();
//! router.route("*", |ctx, next| {
//!     if ctx.pathname == "/wp-login.php" {
//!         ctx.navigate_external(ctx.path.clone());
//!         return;
//!     }
//!     next.run(ctx);
//! })?;
//! router.route("/post/:site/:id", |ctx, next| {
//!     let id = ctx.param("id").map(str::to_owned);
//!     ctx.dispatch(Intent::EditorPostOpen { id });
//!     next.run(ctx);
//! })?;
//!
//! let navigation = router.show("/post/example.com/7", &mut store)?;
//! assert_eq!(navigation.outcome, Outcome::Completed);
//! ```
//!
//! Exit handlers registered with [`Router::exit`] run against the path being
//! left before a new navigation starts. An exit handler that does not
//! continue blocks the navigation.

use std::collections::BTreeMap;

use crate::action::Action;
use crate::store::DispatchStore;

/// Parsed query-string or fragment parameters
pub type QueryMap = BTreeMap<String, String>;

/// Named captures from a route pattern
pub type Params = BTreeMap<String, String>;

/// Errors raised by the router itself
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    Pattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("redirect limit of {limit} exceeded while navigating to `{path}`")]
    TooManyRedirects { limit: usize, path: String },
}

/// Failure to decode a query string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid percent-encoding in `{0}`")]
    Encoding(String),

    #[error("empty parameter name in `{0}`")]
    EmptyKey(String),
}

/// Decode `a=1&b=two%20words` into a map
///
/// `+` decodes to a space. Later duplicates win. Fails on percent-escapes that
/// do not decode to UTF-8 and on pairs with an empty name.
pub fn parse_query(input: &str) -> Result<QueryMap, QueryError> {
    let mut map = QueryMap::new();
    for pair in input.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        if raw_key.is_empty() {
            return Err(QueryError::EmptyKey(pair.to_string()));
        }
        map.insert(decode_component(raw_key)?, decode_component(raw_value)?);
    }
    Ok(map)
}

/// Like [`parse_query`], but keeps undecodable components verbatim and skips
/// pairs with an empty name
pub fn parse_query_lossy(input: &str) -> QueryMap {
    input
        .split('&')
        .filter_map(|pair| {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            if raw_key.is_empty() {
                return None;
            }
            let key = decode_component(raw_key).unwrap_or_else(|_| raw_key.to_string());
            let value = decode_component(raw_value).unwrap_or_else(|_| raw_value.to_string());
            Some((key, value))
        })
        .collect()
}

fn decode_component(raw: &str) -> Result<String, QueryError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| QueryError::Encoding(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A compiled route pattern: `*`, `/`, `/me/next`, `/post/:site/:id`,
/// `/settings/*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, RouterError> {
        let invalid = |reason| RouterError::Pattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        for part in split_segments(pattern) {
            if matches!(segments.last(), Some(Segment::Wildcard)) {
                return Err(invalid("`*` must be the last segment"));
            }
            let segment = match part {
                "*" => Segment::Wildcard,
                param if param.starts_with(':') => {
                    let name = &param[1..];
                    if name.is_empty() {
                        return Err(invalid("parameter without a name"));
                    }
                    Segment::Param(name.to_string())
                }
                literal => Segment::Literal(literal.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a pathname, returning the named captures on success
    pub fn matches(&self, pathname: &str) -> Option<Params> {
        let parts: Vec<&str> = split_segments(pathname).collect();
        let mut params = Params::new();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => return Some(params),
                Segment::Literal(literal) => {
                    if parts.get(index) != Some(&literal.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(index)?;
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Per-navigation context shared by every handler in the chain
pub struct Context<'a, S, A: Action> {
    /// Path as navigated, including query and fragment
    pub path: String,
    /// Path without query and fragment
    pub pathname: String,
    /// Raw query string, without `?`
    pub querystring: String,
    /// Parsed query string. Filled in by middleware.
    pub query: QueryMap,
    /// Raw fragment, without `#`
    pub hashstring: String,
    /// Parsed fragment. Filled in by middleware.
    pub hash: QueryMap,
    /// Previous path, `None` on first navigation or when unchanged
    pub prev_path: Option<String>,
    /// Captures of the pattern that matched the running handler
    pub params: Params,
    store: &'a mut dyn DispatchStore<S, A>,
    redirect: Option<String>,
    external: Option<String>,
}

impl<'a, S, A: Action> Context<'a, S, A> {
    pub fn new(
        path: &str,
        prev_path: Option<String>,
        store: &'a mut dyn DispatchStore<S, A>,
    ) -> Self {
        let (before_hash, hashstring) = path.split_once('#').unwrap_or((path, ""));
        let (pathname, querystring) = before_hash.split_once('?').unwrap_or((before_hash, ""));
        let pathname = if pathname.is_empty() { "/" } else { pathname };

        Self {
            path: path.to_string(),
            pathname: pathname.to_string(),
            querystring: querystring.to_string(),
            query: QueryMap::new(),
            hashstring: hashstring.to_string(),
            hash: QueryMap::new(),
            prev_path,
            params: Params::new(),
            store,
            redirect: None,
            external: None,
        }
    }

    /// Dispatch an intent to the store
    pub fn dispatch(&mut self, action: A) -> bool {
        self.store.dispatch(action)
    }

    /// Current state snapshot
    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Navigate to another client path once the chain returns
    pub fn redirect(&mut self, path: impl Into<String>) {
        self.redirect = Some(path.into());
    }

    /// Leave the client entirely: the URL is not owned by any client route
    pub fn navigate_external(&mut self, url: impl Into<String>) {
        self.external = Some(url.into());
    }
}

type BoxedHandler<S, A> = Box<dyn FnMut(&mut Context<'_, S, A>, Next<'_, S, A>)>;

struct Route<S, A: Action> {
    pattern: RoutePattern,
    handler: BoxedHandler<S, A>,
}

/// Continuation handed to each handler
pub struct Next<'r, S, A: Action> {
    routes: &'r mut [Route<S, A>],
    finished: &'r mut bool,
}

impl<'r, S, A: Action> Next<'r, S, A> {
    /// Run the remaining matching handlers
    pub fn run(self, ctx: &mut Context<'_, S, A>) {
        let mut remaining = self.routes;
        while let Some((route, rest)) = std::mem::take(&mut remaining).split_first_mut() {
            if let Some(params) = route.pattern.matches(&ctx.pathname) {
                ctx.params = params;
                (route.handler)(
                    ctx,
                    Next {
                        routes: rest,
                        finished: self.finished,
                    },
                );
                return;
            }
            remaining = rest;
        }
        *self.finished = true;
    }
}

fn run_chain<S, A: Action>(routes: &mut [Route<S, A>], ctx: &mut Context<'_, S, A>) -> bool {
    let mut finished = false;
    Next {
        routes,
        finished: &mut finished,
    }
    .run(ctx);
    finished
}

/// How a navigation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every matching handler continued
    Completed,
    /// A handler did not call its continuation
    Halted,
    /// An exit handler for the previous path did not continue
    Blocked,
    /// A handler requested a full page load of this URL
    External(String),
}

/// Result of [`Router::show`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Final path after redirects (the requested path when blocked)
    pub path: String,
    pub outcome: Outcome,
    /// Redirect targets followed, in order
    pub redirects: Vec<String>,
}

/// Ordered route and exit handler registry
pub struct Router<S, A: Action> {
    routes: Vec<Route<S, A>>,
    exits: Vec<Route<S, A>>,
    current: Option<String>,
    max_redirects: usize,
}

impl<S, A: Action> Default for Router<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A: Action> Router<S, A> {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            exits: Vec::new(),
            current: None,
            max_redirects: 8,
        }
    }

    pub fn with_max_redirects(mut self, limit: usize) -> Self {
        self.max_redirects = limit;
        self
    }

    /// Register a handler for paths matching `pattern`
    pub fn route<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: FnMut(&mut Context<'_, S, A>, Next<'_, S, A>) + 'static,
    {
        self.routes.push(Route {
            pattern: RoutePattern::parse(pattern)?,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    /// Register a handler run when leaving paths matching `pattern`
    pub fn exit<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouterError>
    where
        F: FnMut(&mut Context<'_, S, A>, Next<'_, S, A>) + 'static,
    {
        self.exits.push(Route {
            pattern: RoutePattern::parse(pattern)?,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    /// Path of the last navigation that was not blocked or external
    pub fn current_path(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Navigate to `path`
    pub fn show(
        &mut self,
        path: &str,
        store: &mut dyn DispatchStore<S, A>,
    ) -> Result<Navigation, RouterError> {
        if let Some(current) = self.current.clone() {
            let mut ctx = Context::new(&current, None, &mut *store);
            if !run_chain(&mut self.exits, &mut ctx) {
                tracing::info!(from = %current, to = %path, "Navigation blocked by exit handler");
                return Ok(Navigation {
                    path: path.to_string(),
                    outcome: Outcome::Blocked,
                    redirects: Vec::new(),
                });
            }
        }

        let mut target = path.to_string();
        let mut redirects = Vec::new();
        loop {
            let prev_path = self.current.clone().filter(|prev| *prev != target);
            let mut ctx = Context::new(&target, prev_path, &mut *store);
            let finished = run_chain(&mut self.routes, &mut ctx);
            let external = ctx.external.take();
            let redirect = ctx.redirect.take();

            if let Some(url) = external {
                tracing::info!(path = %target, url = %url, "Leaving client routes");
                return Ok(Navigation {
                    path: target,
                    outcome: Outcome::External(url),
                    redirects,
                });
            }

            if let Some(next) = redirect {
                if redirects.len() >= self.max_redirects {
                    return Err(RouterError::TooManyRedirects {
                        limit: self.max_redirects,
                        path: next,
                    });
                }
                tracing::debug!(from = %target, to = %next, "Redirect");
                self.current = Some(target);
                redirects.push(next.clone());
                target = next;
                continue;
            }

            let outcome = if finished {
                Outcome::Completed
            } else {
                Outcome::Halted
            };
            tracing::info!(path = %target, outcome = ?outcome, "Navigation finished");
            self.current = Some(target.clone());
            return Ok(Navigation {
                path: target,
                outcome,
                redirects,
            });
        }
    }
}
