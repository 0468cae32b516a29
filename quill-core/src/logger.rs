//! Intent logging middleware with glob filters
//!
//! ```ignore
//! let filter = IntentFilter::parse(Some("PostTrash*,Happychat*"), None);
//! let logger = IntentLoggerMiddleware::new(filter).with_history(50);
//! let store = EffectStoreWithMiddleware::new(state, reducer, logger);
//! ```

use std::collections::VecDeque;

use crate::action::ActionSummary;
use crate::store::Middleware;

/// Include/exclude filter over intent names
///
/// Patterns use `*` (any run) and `?` (one character). An empty include list
/// admits everything; excludes apply afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl IntentFilter {
    /// Build from comma-separated pattern lists
    pub fn parse(include: Option<&str>, exclude: Option<&str>) -> Self {
        let split = |list: &str| {
            list.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        Self {
            include: include.map(split).unwrap_or_default(),
            exclude: exclude.map(split).unwrap_or_default(),
        }
    }

    pub fn admits(&self, name: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|p| glob_match(p, name));
        included && !self.exclude.iter().any(|p| glob_match(p, name))
    }
}

/// Match `text` against a `*`/`?` glob
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    backtrack = Some((star, matched + 1));
                    p = star + 1;
                    t = matched + 1;
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}

/// One logged intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedIntent {
    pub sequence: u64,
    pub name: &'static str,
    pub summary: String,
    /// Set once the reducer has run
    pub changed: Option<bool>,
}

/// Middleware logging admitted intents through `tracing`, optionally keeping
/// the most recent ones in memory
#[derive(Debug, Clone)]
pub struct IntentLoggerMiddleware {
    filter: IntentFilter,
    history: VecDeque<LoggedIntent>,
    capacity: usize,
    next_sequence: u64,
    pending: bool,
}

impl IntentLoggerMiddleware {
    pub fn new(filter: IntentFilter) -> Self {
        Self {
            filter,
            history: VecDeque::new(),
            capacity: 0,
            next_sequence: 0,
            pending: false,
        }
    }

    /// Keep the last `capacity` admitted intents
    pub fn with_history(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self.history = VecDeque::with_capacity(capacity);
        self
    }

    pub fn filter(&self) -> &IntentFilter {
        &self.filter
    }

    /// Newest first
    pub fn recent(&self) -> impl Iterator<Item = &LoggedIntent> {
        self.history.iter().rev()
    }
}

impl<A: ActionSummary> Middleware<A> for IntentLoggerMiddleware {
    fn before(&mut self, action: &A) {
        let name = action.name();
        self.pending = self.filter.admits(name);
        if !self.pending {
            return;
        }

        let summary = action.summary();
        tracing::debug!(intent = %name, summary = %summary, "Intent");

        if self.capacity > 0 {
            if self.history.len() == self.capacity {
                self.history.pop_front();
            }
            self.history.push_back(LoggedIntent {
                sequence: self.next_sequence,
                name,
                summary,
                changed: None,
            });
        }
        self.next_sequence += 1;
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if !self.pending {
            return;
        }
        tracing::trace!(intent = %action.name(), state_changed, "Intent applied");
        if let Some(last) = self.history.back_mut() {
            last.changed = Some(state_changed);
        }
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    #[derive(Clone, Debug)]
    enum TestAction {
        PostTrash(u64),
        HappychatBlur,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::PostTrash(_) => "PostTrash",
                TestAction::HappychatBlur => "HappychatBlur",
            }
        }
    }

    impl ActionSummary for TestAction {}

    #[test]
    fn test_glob_match() {
        assert!(glob_match("PostTrash", "PostTrash"));
        assert!(!glob_match("PostTrash", "PostTrashDidFail"));
        assert!(glob_match("Post*", "PostTrashDidFail"));
        assert!(glob_match("*Did*", "PostTrashDidFail"));
        assert!(glob_match("Happychat????", "HappychatBlur"));
        assert!(!glob_match("Happychat?", "HappychatBlur"));
        assert!(glob_match("*", ""));
        assert!(!glob_match("a*b", "acbd"));
    }

    #[test]
    fn test_filter() {
        let filter = IntentFilter::parse(Some("Post*, Happychat*"), Some("*Blur"));
        assert!(filter.admits("PostTrash"));
        assert!(!filter.admits("HappychatBlur"));
        assert!(!filter.admits("RouteSet"));

        assert!(IntentFilter::default().admits("Anything"));
    }

    #[test]
    fn test_history_is_bounded_and_records_change() {
        let mut logger =
            IntentLoggerMiddleware::new(IntentFilter::parse(None, Some("Happychat*")))
                .with_history(2);

        for id in 0..3 {
            let action = TestAction::PostTrash(id);
            logger.before(&action);
            logger.after(&action, id != 1);
        }
        let blur = TestAction::HappychatBlur;
        logger.before(&blur);
        logger.after(&blur, true);

        let recent: Vec<_> = logger.recent().collect();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].summary, "PostTrash(2)");
        assert_eq!(recent[0].changed, Some(true));
        assert_eq!(recent[1].changed, Some(false));
        assert_eq!(recent[1].sequence, 1);
    }
}
