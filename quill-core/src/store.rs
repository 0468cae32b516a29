//! Centralized state container with reducer pattern

use crate::Action;
use std::marker::PhantomData;

/// A reducer function that handles intents and mutates state
///
/// Returns `true` if the state changed and a re-render is needed.
pub type Reducer<S, A> = fn(&mut S, A) -> bool;

/// Listener called with the new state after every dispatch that changed it
pub type Listener<S> = Box<dyn FnMut(&S) + Send>;

/// Handle returned by [`Store::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change listeners in subscription order
pub(crate) struct Listeners<S> {
    entries: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S> Default for Listeners<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<S> Listeners<S> {
    pub(crate) fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, state: &S) {
        for (_, listener) in &mut self.entries {
            listener(state);
        }
    }
}

/// Centralized state container with Redux-like reducer pattern
///
/// The store holds the whole application state and is the only place it
/// is mutated, through [`Store::dispatch`]. Intents are applied strictly in
/// dispatch order.
///
/// # Example
/// ```ignore
/// #[derive(Default)]
/// struct AppState {
///     drafts: u32,
/// }
///
/// #[derive(Action, Clone, Debug)]
/// enum Intent {
///     DraftCreate,
/// }
///
/// fn reducer(state: &mut AppState, intent: Intent) -> bool {
///     match intent {
///         Intent::DraftCreate => {
///             state.drafts += 1;
///             true
///         }
///     }
/// }
///
/// let mut store = Store::new(AppState::default(), reducer);
/// store.dispatch(Intent::DraftCreate);
/// assert_eq!(store.state().drafts, 1);
/// ```
pub struct Store<S, A: Action> {
    state: S,
    reducer: Reducer<S, A>,
    listeners: Listeners<S>,
    _marker: PhantomData<A>,
}

impl<S, A: Action> Store<S, A> {
    /// Create a new store with initial state and reducer
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            state,
            reducer,
            listeners: Listeners::default(),
            _marker: PhantomData,
        }
    }

    /// Dispatch an intent to the store
    ///
    /// The reducer is called with the current state and intent. Listeners are
    /// notified, in subscription order, only when the reducer reports a change.
    pub fn dispatch(&mut self, action: A) -> bool {
        let changed = (self.reducer)(&mut self.state, action);
        if changed {
            self.listeners.notify(&self.state);
        }
        changed
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state
    ///
    /// Use this sparingly - prefer dispatching intents for state changes.
    /// Listeners are not notified.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Remove a change listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// Store with middleware support
///
/// Wraps a `Store` and allows middleware to intercept intents
/// before and after they are processed by the reducer.
pub struct StoreWithMiddleware<S, A: Action, M: Middleware<A>> {
    store: Store<S, A>,
    middleware: M,
}

impl<S, A: Action, M: Middleware<A>> StoreWithMiddleware<S, A, M> {
    /// Create a new store with middleware
    pub fn new(state: S, reducer: Reducer<S, A>, middleware: M) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// Dispatch an intent through middleware and store
    pub fn dispatch(&mut self, action: A) -> bool {
        self.middleware.before(&action);
        let changed = self.store.dispatch(action.clone());
        self.middleware.after(&action, changed);
        changed
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a mutable reference to the state
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    /// Register a change listener on the inner store
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Remove a change listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

/// Object-safe view of a store, handed to route handlers and the runtime
pub trait DispatchStore<S, A: Action> {
    /// Dispatch an intent and return whether the state changed.
    fn dispatch(&mut self, action: A) -> bool;
    /// Get the current state.
    fn state(&self) -> &S;
}

impl<S, A: Action> DispatchStore<S, A> for Store<S, A> {
    fn dispatch(&mut self, action: A) -> bool {
        Store::dispatch(self, action)
    }

    fn state(&self) -> &S {
        Store::state(self)
    }
}

impl<S, A: Action, M: Middleware<A>> DispatchStore<S, A> for StoreWithMiddleware<S, A, M> {
    fn dispatch(&mut self, action: A) -> bool {
        StoreWithMiddleware::dispatch(self, action)
    }

    fn state(&self) -> &S {
        StoreWithMiddleware::state(self)
    }
}

/// Middleware trait for intercepting intents
///
/// Implement this trait to add logging or other cross-cutting
/// concerns to your store.
pub trait Middleware<A: Action> {
    /// Called before the intent is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the intent is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}
