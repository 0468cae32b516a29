//! Effect-based state management
//!
//! Reducers that need work done outside the state tree (backend calls,
//! full page navigation) return that work as data alongside the change flag.
//! Effects are declarative descriptions of work, not the work itself.
//!
//! ```ignore
//! fn reducer(state: &mut AppState, intent: Intent) -> DispatchResult<Effect> {
//!     match intent {
//!         Intent::PostTrashConfirm { site_id, post_id } => {
//!             state.posts.trashing.insert((site_id, post_id));
//!             DispatchResult::changed_with(Effect::TrashPost { site_id, post_id })
//!         }
//!         // ...
//!     }
//! }
//!
//! let mut store = EffectStore::new(AppState::default(), reducer);
//! let result = store.dispatch(Intent::PostTrashConfirm { site_id: 1, post_id: 7 });
//! for effect in result.effects {
//!     backend.handle(effect);
//! }
//! ```
//!
//! When the store is driven through the object-safe [`DispatchStore`] view
//! (route handlers do this), effects are queued instead of returned and can
//! be drained with `take_effects`.

use std::marker::PhantomData;

use crate::action::Action;
use crate::store::{DispatchStore, Listeners, Middleware, SubscriptionId};

/// Result of dispatching an intent to an effect-aware store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this intent.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// Convert a plain reducer's change flag.
    #[inline]
    pub fn from_changed(changed: bool) -> Self {
        Self {
            changed,
            effects: vec![],
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Fold another result into this one.
    #[inline]
    pub fn merge(mut self, other: DispatchResult<E>) -> Self {
        self.changed |= other.changed;
        self.effects.extend(other.effects);
        self
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// A store whose reducer returns [`DispatchResult<E>`] instead of `bool`.
pub struct EffectStore<S, A, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    queued: Vec<E>,
    listeners: Listeners<S>,
    _marker: PhantomData<A>,
}

impl<S, A, E> EffectStore<S, A, E>
where
    A: Action,
{
    /// Create a new effect store with the given initial state and reducer.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            queued: Vec::new(),
            listeners: Listeners::default(),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Use sparingly - prefer dispatching intents. Mainly for initialization.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Dispatch an intent and return the change flag plus effects.
    ///
    /// Listeners run after the reducer, and only when it reports a change.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        let result = (self.reducer)(&mut self.state, action);
        if result.changed {
            self.listeners.notify(&self.state);
        }
        result
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

    /// Drain effects queued by dispatches made through [`DispatchStore`].
    pub fn take_effects(&mut self) -> Vec<E> {
        std::mem::take(&mut self.queued)
    }
}

impl<S, A: Action, E> DispatchStore<S, A> for EffectStore<S, A, E> {
    fn dispatch(&mut self, action: A) -> bool {
        let result = EffectStore::dispatch(self, action);
        self.queued.extend(result.effects);
        result.changed
    }

    fn state(&self) -> &S {
        EffectStore::state(self)
    }
}

/// An effect store with middleware support.
///
/// Middleware sees intents and the change flag, not the effects.
pub struct EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: EffectStore<S, A, E>,
    middleware: M,
}

impl<S, A, E, M> EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    pub fn new(state: S, reducer: EffectReducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            middleware,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    #[inline]
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }

    /// Dispatch an intent through middleware and store.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = self.store.dispatch(action.clone());
        self.middleware.after(&action, result.changed);
        result
    }

    /// Drain effects queued by dispatches made through [`DispatchStore`].
    pub fn take_effects(&mut self) -> Vec<E> {
        self.store.take_effects()
    }

    /// Register a change listener on the inner store
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

impl<S, A, E, M> DispatchStore<S, A> for EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    fn dispatch(&mut self, action: A) -> bool {
        let result = EffectStoreWithMiddleware::dispatch(self, action);
        self.store.queued.extend(result.effects);
        result.changed
    }

    fn state(&self) -> &S {
        EffectStoreWithMiddleware::state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug)]
    enum TestAction {
        PostTrash(u64),
        PostTrashDidFail(u64),
        NoOp,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::PostTrash(_) => "PostTrash",
                TestAction::PostTrashDidFail(_) => "PostTrashDidFail",
                TestAction::NoOp => "NoOp",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestEffect {
        Trash(u64),
    }

    #[derive(Default)]
    struct TestState {
        trashing: Vec<u64>,
    }

    fn test_reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::PostTrash(id) => {
                if state.trashing.contains(&id) {
                    return DispatchResult::unchanged();
                }
                state.trashing.push(id);
                DispatchResult::changed_with(TestEffect::Trash(id))
            }
            TestAction::PostTrashDidFail(id) => {
                state.trashing.retain(|t| *t != id);
                DispatchResult::changed()
            }
            TestAction::NoOp => DispatchResult::unchanged(),
        }
    }

    #[test]
    fn test_dispatch_result_builders() {
        let r: DispatchResult<TestEffect> = DispatchResult::unchanged();
        assert!(!r.changed);
        assert!(!r.has_effects());

        let r = DispatchResult::effect(TestEffect::Trash(1));
        assert!(!r.changed);
        assert_eq!(r.effects, vec![TestEffect::Trash(1)]);

        let r = DispatchResult::from_changed(true).with(TestEffect::Trash(2));
        assert!(r.changed);
        assert_eq!(r.effects, vec![TestEffect::Trash(2)]);
    }

    #[test]
    fn test_merge() {
        let r = DispatchResult::<TestEffect>::unchanged()
            .merge(DispatchResult::changed_with(TestEffect::Trash(3)))
            .merge(DispatchResult::unchanged());
        assert!(r.changed);
        assert_eq!(r.effects, vec![TestEffect::Trash(3)]);
    }

    #[test]
    fn test_effect_store_returns_effects() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);

        let result = store.dispatch(TestAction::PostTrash(7));
        assert!(result.changed);
        assert_eq!(result.effects, vec![TestEffect::Trash(7)]);

        // Second trigger while the first is pending is ignored
        let result = store.dispatch(TestAction::PostTrash(7));
        assert!(!result.changed);
        assert!(result.effects.is_empty());

        let result = store.dispatch(TestAction::NoOp);
        assert!(!result.changed);
    }

    #[test]
    fn test_dispatch_store_queues_effects() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);
        {
            let dyn_store: &mut dyn DispatchStore<TestState, TestAction> = &mut store;
            assert!(dyn_store.dispatch(TestAction::PostTrash(1)));
            assert!(dyn_store.dispatch(TestAction::PostTrashDidFail(1)));
            assert!(dyn_store.dispatch(TestAction::PostTrash(1)));
        }

        assert_eq!(
            store.take_effects(),
            vec![TestEffect::Trash(1), TestEffect::Trash(1)]
        );
        assert!(store.take_effects().is_empty());
    }

    #[test]
    fn test_listeners_only_notified_on_change() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |state: &TestState| {
            sink.lock().unwrap().push(state.trashing.len());
        });

        store.dispatch(TestAction::PostTrash(1));
        store.dispatch(TestAction::PostTrash(1));
        store.dispatch(TestAction::NoOp);
        {
            let dyn_store: &mut dyn DispatchStore<TestState, TestAction> = &mut store;
            dyn_store.dispatch(TestAction::PostTrash(2));
        }
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(TestAction::PostTrashDidFail(1));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[derive(Default)]
    struct CountingMiddleware {
        after: usize,
    }

    impl Middleware<TestAction> for CountingMiddleware {
        fn before(&mut self, _action: &TestAction) {}

        fn after(&mut self, _action: &TestAction, _state_changed: bool) {
            self.after += 1;
        }
    }

    #[test]
    fn test_middleware_store_notifies_listeners() {
        let mut store = EffectStoreWithMiddleware::new(
            TestState::default(),
            test_reducer,
            CountingMiddleware::default(),
        );
        let notified = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&notified);
        store.subscribe(move |_: &TestState| *sink.lock().unwrap() += 1);

        store.dispatch(TestAction::PostTrash(3));
        store.dispatch(TestAction::NoOp);

        assert_eq!(*notified.lock().unwrap(), 1);
        assert_eq!(store.middleware().after, 2);
    }
}
