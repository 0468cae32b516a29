//! Component trait for views

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A view rendered from props that reports user input as intents
///
/// Props carry everything the view reads: values derived by selectors, the
/// translator, focus. `handle_event` never touches the store; it returns
/// intents for the runtime to dispatch. View-local presentation state such as
/// a scroll offset may live in `&mut self`.
///
/// ```ignore
/// struct HistoryButton;
///
/// struct HistoryButtonProps<'a> {
///     label: &'a str,
///     focused: bool,
/// }
///
/// impl Component<Intent> for HistoryButton {
///     type Props<'a> = HistoryButtonProps<'a>;
///
///     fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>)
///         -> impl IntoIterator<Item = Intent>
///     {
///         match event {
///             EventKind::Key(key) if props.focused && key.code == KeyCode::Enter => {
///                 Some(Intent::PostRevisionsDialogToggle)
///             }
///             _ => None,
///         }
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
///         frame.render_widget(Paragraph::new(props.label), area);
///     }
/// }
/// ```
pub trait Component<A> {
    /// Read-only data needed to render
    type Props<'a>;

    /// Translate an input event into intents
    ///
    /// Return `None`, `Some(intent)`, an array or a `Vec`. Render-only views
    /// keep the default.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
