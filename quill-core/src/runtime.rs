//! Event/intent/render loop for effect-based stores
//!
//! The runtime owns the store. Terminal events are mapped to intents, intents
//! are dispatched in arrival order, effects returned by the reducer are handed
//! to the application's effect handler, and the frame is redrawn whenever the
//! state changed.

use std::collections::VecDeque;
use std::io;
use std::marker::PhantomData;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
use crate::store::{DispatchStore, Middleware};

/// Configuration for the event poller
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Timeout passed to each `crossterm::event::poll` call
    pub poll_timeout: Duration,
    /// Sleep between poll cycles
    pub loop_sleep: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            loop_sleep: Duration::from_millis(16),
        }
    }
}

/// Intents produced by an event, plus a render hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome<A> {
    pub actions: Vec<A>,
    pub needs_render: bool,
}

impl<A> EventOutcome<A> {
    pub fn ignored() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: false,
        }
    }

    pub fn needs_render() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: true,
        }
    }

    pub fn action(action: A) -> Self {
        Self {
            actions: vec![action],
            needs_render: false,
        }
    }

    /// Collect a `Component::handle_event` result
    pub fn from_actions(iter: impl IntoIterator<Item = A>) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            needs_render: false,
        }
    }

    pub fn with_render(mut self) -> Self {
        self.needs_render = true;
        self
    }
}

impl<A> Default for EventOutcome<A> {
    fn default() -> Self {
        Self::ignored()
    }
}

impl<A> From<Option<A>> for EventOutcome<A> {
    fn from(action: Option<A>) -> Self {
        Self::from_actions(action)
    }
}

impl<A> From<Vec<A>> for EventOutcome<A> {
    fn from(actions: Vec<A>) -> Self {
        Self::from_actions(actions)
    }
}

/// Effect store interface used by [`EffectRuntime`]
pub trait EffectStoreLike<S, A: Action, E>: DispatchStore<S, A> {
    /// Dispatch and return the change flag plus effects
    fn dispatch_effects(&mut self, action: A) -> DispatchResult<E>;

    /// Drain effects queued by dispatches made through [`DispatchStore`]
    fn take_effects(&mut self) -> Vec<E>;
}

impl<S, A: Action, E> EffectStoreLike<S, A, E> for EffectStore<S, A, E> {
    fn dispatch_effects(&mut self, action: A) -> DispatchResult<E> {
        EffectStore::dispatch(self, action)
    }

    fn take_effects(&mut self) -> Vec<E> {
        EffectStore::take_effects(self)
    }
}

impl<S, A: Action, E, M: Middleware<A>> EffectStoreLike<S, A, E>
    for EffectStoreWithMiddleware<S, A, E, M>
{
    fn dispatch_effects(&mut self, action: A) -> DispatchResult<E> {
        EffectStoreWithMiddleware::dispatch(self, action)
    }

    fn take_effects(&mut self) -> Vec<E> {
        EffectStoreWithMiddleware::take_effects(self)
    }
}

/// Handed to the effect handler
///
/// Implements [`DispatchStore`], so a handler can run route navigation or
/// apply a result synchronously. Intents sent with [`EffectContext::emit`]
/// are queued behind the ones already pending.
pub struct EffectContext<'a, S, A: Action> {
    action_tx: &'a mpsc::UnboundedSender<A>,
    store: &'a mut dyn DispatchStore<S, A>,
    changed: bool,
}

impl<'a, S, A: Action> EffectContext<'a, S, A> {
    pub fn new(
        action_tx: &'a mpsc::UnboundedSender<A>,
        store: &'a mut dyn DispatchStore<S, A>,
    ) -> Self {
        Self {
            action_tx,
            store,
            changed: false,
        }
    }

    /// Queue an intent
    pub fn emit(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    pub fn action_tx(&self) -> &mpsc::UnboundedSender<A> {
        self.action_tx
    }

    /// Whether a synchronous dispatch through this context changed state
    pub fn changed(&self) -> bool {
        self.changed
    }
}

impl<S, A: Action> DispatchStore<S, A> for EffectContext<'_, S, A> {
    fn dispatch(&mut self, action: A) -> bool {
        let changed = self.store.dispatch(action);
        self.changed |= changed;
        changed
    }

    fn state(&self) -> &S {
        self.store.state()
    }
}

/// Apply one intent and run its effects to completion
///
/// Effects queued by synchronous dispatches inside the handler run after the
/// effect that caused them. Returns whether the state changed.
pub fn dispatch_and_settle<S, A, E, St, F>(
    store: &mut St,
    action_tx: &mpsc::UnboundedSender<A>,
    action: A,
    handle_effect: &mut F,
) -> bool
where
    A: Action,
    St: EffectStoreLike<S, A, E>,
    F: FnMut(E, &mut EffectContext<'_, S, A>),
{
    let result = store.dispatch_effects(action);
    let mut changed = result.changed;
    let mut pending: VecDeque<E> = result.effects.into();

    while let Some(effect) = pending.pop_front() {
        let mut ctx = EffectContext::new(action_tx, &mut *store);
        handle_effect(effect, &mut ctx);
        changed |= ctx.changed;
        pending.extend(store.take_effects());
    }
    changed
}

/// Runtime for effect-based stores
pub struct EffectRuntime<S, A: Action, E, St: EffectStoreLike<S, A, E> = EffectStore<S, A, E>> {
    store: St,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    poller_config: PollerConfig,
    should_render: bool,
    _marker: PhantomData<(S, E)>,
}

impl<S: 'static, A: Action, E> EffectRuntime<S, A, E, EffectStore<S, A, E>> {
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self::from_store(EffectStore::new(state, reducer))
    }
}

impl<S: 'static, A: Action, E, St: EffectStoreLike<S, A, E>> EffectRuntime<S, A, E, St> {
    pub fn from_store(store: St) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            store,
            action_tx,
            action_rx,
            poller_config: PollerConfig::default(),
            should_render: true,
            _marker: PhantomData,
        }
    }

    pub fn with_event_poller(mut self, config: PollerConfig) -> Self {
        self.poller_config = config;
        self
    }

    /// Queue an intent for the next loop iteration
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    pub fn action_tx(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn store_mut(&mut self) -> &mut St {
        &mut self.store
    }

    /// Run the loop until `should_quit` accepts an intent or every channel closes
    pub async fn run<B, FRender, FEvent, FQuit, FEffect, R>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut render: FRender,
        mut map_event: FEvent,
        mut should_quit: FQuit,
        mut handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &S),
        FEvent: FnMut(&EventKind, &S) -> R,
        R: Into<EventOutcome<A>>,
        FQuit: FnMut(&A) -> bool,
        FEffect: FnMut(E, &mut EffectContext<'_, S, A>),
    {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
        let cancel_token = CancellationToken::new();
        let _poller = spawn_event_poller(
            event_tx,
            self.poller_config.poll_timeout,
            self.poller_config.loop_sleep,
            cancel_token.clone(),
        );

        loop {
            if self.should_render {
                let state = self.store.state();
                terminal.draw(|frame| {
                    let area = frame.area();
                    render(frame, area, state);
                })?;
                self.should_render = false;
            }

            tokio::select! {
                Some(raw_event) = event_rx.recv() => {
                    let event = process_raw_event(raw_event);
                    let outcome: EventOutcome<A> = map_event(&event, self.store.state()).into();
                    if outcome.needs_render {
                        self.should_render = true;
                    }
                    for action in outcome.actions {
                        let _ = self.action_tx.send(action);
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    if should_quit(&action) {
                        break;
                    }
                    let changed = dispatch_and_settle(
                        &mut self.store,
                        &self.action_tx,
                        action,
                        &mut handle_effect,
                    );
                    self.should_render |= changed;
                }

                else => break,
            }
        }

        cancel_token.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Navigate(String),
        RouteSet(String),
        Ping,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Navigate(_) => "Navigate",
                TestAction::RouteSet(_) => "RouteSet",
                TestAction::Ping => "Ping",
            }
        }
    }

    #[derive(Debug, PartialEq)]
    enum TestEffect {
        Navigate(String),
        Log(String),
    }

    #[derive(Default)]
    struct TestState {
        route: String,
    }

    fn reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Navigate(path) => DispatchResult::effect(TestEffect::Navigate(path)),
            TestAction::RouteSet(path) => {
                state.route = path.clone();
                DispatchResult::changed_with(TestEffect::Log(path))
            }
            TestAction::Ping => DispatchResult::unchanged(),
        }
    }

    #[test]
    fn test_effects_settle_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut store = EffectStore::new(TestState::default(), reducer);
        let mut seen = Vec::new();

        let mut handler = |effect: TestEffect, ctx: &mut EffectContext<'_, TestState, TestAction>| {
            match &effect {
                TestEffect::Navigate(path) => {
                    ctx.dispatch(TestAction::RouteSet(path.clone()));
                    ctx.emit(TestAction::Ping);
                }
                TestEffect::Log(_) => {}
            }
            seen.push(effect);
        };

        let changed = dispatch_and_settle(
            &mut store,
            &tx,
            TestAction::Navigate("/me".into()),
            &mut handler,
        );

        assert!(changed);
        assert_eq!(store.state().route, "/me");
        assert_eq!(
            seen,
            vec![
                TestEffect::Navigate("/me".into()),
                TestEffect::Log("/me".into())
            ]
        );
        assert_eq!(rx.try_recv().ok(), Some(TestAction::Ping));
    }

    #[test]
    fn test_unchanged_dispatch_reports_no_change() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut store = EffectStore::new(TestState::default(), reducer);
        let mut handler = |_: TestEffect, _: &mut EffectContext<'_, TestState, TestAction>| {};

        assert!(!dispatch_and_settle(&mut store, &tx, TestAction::Ping, &mut handler));
    }

    #[test]
    fn test_event_outcome_conversions() {
        let outcome: EventOutcome<TestAction> = Some(TestAction::Ping).into();
        assert_eq!(outcome.actions, vec![TestAction::Ping]);
        assert!(!outcome.needs_render);

        let outcome: EventOutcome<TestAction> = None.into();
        assert!(outcome.actions.is_empty());

        assert!(EventOutcome::<TestAction>::needs_render().needs_render);
        assert!(EventOutcome::action(TestAction::Ping).with_render().needs_render);
    }
}
