//! Test utilities
//!
//! - [`key`] builds a `KeyEvent` from a binding string (`key("ctrl+t")`)
//! - [`TestHarness`] captures intents emitted by views and effect handlers
//! - [`RenderHarness`] renders into an in-memory terminal for snapshot-style
//!   assertions
//! - `assert_emitted!` and friends match emitted intents by pattern
//!
//! ```ignore
//! use quill::testing::{key, RenderHarness, TestHarness};
//!
//! let mut harness = TestHarness::<AppState, Intent>::default();
//! let mut button = HistoryButton;
//! let emitted = button.handle_event(&EventKind::Key(key("h")), props);
//! harness.emit_all(emitted);
//! assert_emitted!(harness.drain_emitted(), Intent::PostRevisionsDialogToggle);
//!
//! let mut render = RenderHarness::new(40, 3);
//! let text = render.render_to_string_plain(|frame, area| button.render(frame, area, props));
//! assert!(text.contains("History"));
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::action::{Action, ActionCategory};
use crate::event::EventKind;
use crate::keymap::parse_key;

/// `KeyEvent` for a binding string
///
/// # Panics
///
/// Panics if the string does not parse.
pub fn key(spelling: &str) -> KeyEvent {
    parse_key(spelling).unwrap_or_else(|| panic!("Invalid key string: {:?}", spelling))
}

/// `EventKind::Key` for a binding string
pub fn key_event(spelling: &str) -> EventKind {
    EventKind::Key(key(spelling))
}

/// Plain character press
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Key events for each character of `text`
pub fn typed(text: &str) -> Vec<EventKind> {
    text.chars().map(|c| EventKind::Key(char_key(c))).collect()
}

/// Captures intents the way the runtime's channel would
pub struct TestHarness<S, A: Action> {
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action> TestHarness<S, A> {
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { state, tx, rx }
    }

    /// Sender to hand to code under test
    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Emit a `Component::handle_event` result
    pub fn emit_all(&self, actions: impl IntoIterator<Item = A>) {
        for action in actions {
            self.emit(action);
        }
    }

    /// Everything emitted since the last drain, oldest first
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S, A: ActionCategory> TestHarness<S, A> {
    /// Drain intents of one category, leaving the rest queued in order
    pub fn drain_category(&mut self, category: &str) -> Vec<A> {
        let (matching, rest): (Vec<A>, Vec<A>) = self
            .drain_emitted()
            .into_iter()
            .partition(|action| action.category() == Some(category));
        for action in rest {
            self.emit(action);
        }
        matching
    }
}

/// Renders into a `TestBackend`
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// # Panics
    ///
    /// Panics if the in-memory terminal cannot be created.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|err| panic!("test terminal: {err}"));
        Self { terminal }
    }

    /// Draw one frame and return its buffer
    ///
    /// # Panics
    ///
    /// Panics if drawing fails.
    pub fn render(&mut self, draw: impl FnOnce(&mut Frame, Rect)) -> &Buffer {
        self.terminal
            .draw(|frame| {
                let area = frame.area();
                draw(frame, area);
            })
            .unwrap_or_else(|err| panic!("test draw: {err}"));
        self.terminal.backend().buffer()
    }

    /// Draw one frame and return its text without styling
    pub fn render_to_string_plain(&mut self, draw: impl FnOnce(&mut Frame, Rect)) -> String {
        buffer_to_string_plain(self.render(draw))
    }
}

/// Buffer text, one line per row, trailing blanks trimmed
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()))
                .collect();
            row.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that a specific intent was emitted.
///
/// # Example
///
/// ```ignore
/// use quill::testing::assert_emitted;
///
/// let intents = harness.drain_emitted();
/// assert_emitted!(intents, Intent::PostRevisionsDialogToggle);
/// assert_emitted!(intents, Intent::PostRevisionsSelect { revision_id: 42, .. });
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected intent matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific intent was NOT emitted.
///
/// # Example
///
/// ```ignore
/// use quill::testing::assert_not_emitted;
///
/// let intents = harness.drain_emitted();
/// assert_not_emitted!(intents, Intent::PostTrashConfirm { .. });
/// ```
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected intent matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find and return the first intent matching a pattern.
///
/// # Example
///
/// ```ignore
/// use quill::testing::find_emitted;
///
/// let intents = harness.drain_emitted();
/// if let Some(Intent::PostRevisionsSelect { revision_id, .. }) = find_emitted!(intents, Intent::PostRevisionsSelect { .. }) {
///     assert_eq!(*revision_id, 42);
/// }
/// ```
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count how many intents match a pattern.
///
/// # Example
///
/// ```ignore
/// use quill::testing::count_emitted;
///
/// let intents = harness.drain_emitted();
/// assert_eq!(count_emitted!(intents, Intent::HappychatTimelineReceive { .. }), 3);
/// ```
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

/// Assert that an intent of a specific category was emitted.
///
/// This requires the intent type to implement [`ActionCategory`].
///
/// # Example
///
/// ```ignore
/// use quill::testing::assert_category_emitted;
///
/// let intents = harness.drain_emitted();
/// assert_category_emitted!(intents, "post_revisions");
/// assert_category_emitted!(intents, "happychat");
/// ```
#[macro_export]
macro_rules! assert_category_emitted {
    ($actions:expr, $category:expr) => {
        assert!(
            $actions.iter().any(|a| {
                use $crate::ActionCategory;
                a.category() == Some($category)
            }),
            "Expected intent with category `{}` to be emitted, but got: {:?}",
            $category,
            $actions
        );
    };
}
