//! Memoized selectors
//!
//! A selector is a pure function deriving a value from state. Cheap ones are
//! plain `fn(&State) -> T`. Expensive ones are wrapped in [`Selector`], which
//! caches its last result and recomputes only when one of its declared
//! dependants changed.
//!
//! Dependants are compared by *identity* where identity is meaningful:
//! `Arc<T>` compares pointers, so a reducer that wants dependent selectors to
//! recompute must replace the `Arc` (never mutate through it). Scalars compare
//! by value.
//!
//! ```ignore
//! fn deps(state: &AppState) -> (Arc<Vec<TimelineEvent>>, Option<i64>) {
//!     (state.happychat.chat.timeline.clone(), state.happychat.ui.lost_focus_at)
//! }
//!
//! fn compute(state: &AppState) -> bool { /* ... */ }
//!
//! let unread = Selector::new(deps, compute);
//! unread.select(&state); // computes
//! unread.select(&state); // cached
//! ```

use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// A value a memoized selector depends on
pub trait Dependant: Clone {
    /// Whether `self` is the same dependant as `previous`
    fn same_as(&self, previous: &Self) -> bool;
}

impl<T: ?Sized> Dependant for Arc<T> {
    fn same_as(&self, previous: &Self) -> bool {
        Arc::ptr_eq(self, previous)
    }
}

impl<T: Dependant> Dependant for Option<T> {
    fn same_as(&self, previous: &Self) -> bool {
        match (self, previous) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! scalar_dependant {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Dependant for $ty {
                fn same_as(&self, previous: &Self) -> bool {
                    self == previous
                }
            }
        )*
    };
}

scalar_dependant!(bool, char, i32, i64, u8, u32, u64, usize, &'static str, String);

impl Dependant for () {
    fn same_as(&self, _previous: &Self) -> bool {
        true
    }
}

impl<A: Dependant, B: Dependant> Dependant for (A, B) {
    fn same_as(&self, previous: &Self) -> bool {
        self.0.same_as(&previous.0) && self.1.same_as(&previous.1)
    }
}

impl<A: Dependant, B: Dependant, C: Dependant> Dependant for (A, B, C) {
    fn same_as(&self, previous: &Self) -> bool {
        self.0.same_as(&previous.0) && self.1.same_as(&previous.1) && self.2.same_as(&previous.2)
    }
}

/// A selector memoized on its dependants
///
/// Single-threaded: keep instances in a `thread_local!` or owned by the view
/// that uses them.
pub struct Selector<S, K, T> {
    dependants: fn(&S) -> K,
    compute: fn(&S) -> T,
    cache: RefCell<Option<(K, T)>>,
    computations: Cell<usize>,
}

impl<S, K: Dependant, T: Clone> Selector<S, K, T> {
    pub const fn new(dependants: fn(&S) -> K, compute: fn(&S) -> T) -> Self {
        Self {
            dependants,
            compute,
            cache: RefCell::new(None),
            computations: Cell::new(0),
        }
    }

    /// Derive the value, reusing the cached one if no dependant changed
    pub fn select(&self, state: &S) -> T {
        let key = (self.dependants)(state);
        if let Some((cached_key, value)) = &*self.cache.borrow() {
            if key.same_as(cached_key) {
                return value.clone();
            }
        }

        let value = (self.compute)(state);
        self.computations.set(self.computations.get() + 1);
        *self.cache.borrow_mut() = Some((key, value.clone()));
        value
    }

    /// How many times the value has been computed
    pub fn computations(&self) -> usize {
        self.computations.get()
    }

    /// Drop the cached value
    pub fn clear(&self) {
        self.cache.borrow_mut().take();
    }
}
