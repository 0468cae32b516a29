//! Modal overlay with background dimming
//!
//! The background is dimmed fresh on each frame, so views behind the dialog
//! keep updating while it is open.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier},
    widgets::{Clear, Widget},
    Frame,
};

/// Modal appearance
pub struct ModalStyle {
    /// Dim everything rendered before the modal
    pub dim_background: bool,
    /// Fill for the modal area (None clears it)
    pub bg_color: Option<Color>,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_background: true,
            bg_color: None,
        }
    }
}

impl ModalStyle {
    pub fn with_bg(bg_color: Color) -> Self {
        Self {
            bg_color: Some(bg_color),
            ..Default::default()
        }
    }
}

/// Render a modal overlay
///
/// Call this after rendering the background, then render the dialog body
/// into `area`.
///
/// ```ignore
/// posts_view.render(frame, area, props);
///
/// if state.ui.revisions_dialog_visible {
///     let dialog = centered_rect(70, 20, frame.area());
///     render_modal(frame, dialog, &ModalStyle::with_bg(Color::Rgb(30, 30, 40)));
///     revisions_dialog.render(frame, dialog, dialog_props);
/// }
/// ```
pub fn render_modal(frame: &mut Frame, area: Rect, style: &ModalStyle) {
    if style.dim_background {
        dim_buffer(frame.buffer_mut());
    }

    match style.bg_color {
        Some(bg) => frame.render_widget(BgFill(bg), area),
        None => frame.render_widget(Clear, area),
    }
}

/// Fade every cell of the buffer
pub fn dim_buffer(buffer: &mut Buffer) {
    let area = buffer.area;
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let cell = &mut buffer[(x, y)];
            cell.modifier.insert(Modifier::DIM);
            cell.fg = Color::DarkGray;
        }
    }
}

struct BgFill(Color);

impl Widget for BgFill {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                buf[(x, y)].reset();
                buf[(x, y)].set_bg(self.0);
            }
        }
    }
}

/// Centered rectangle of at most `width` x `height`, keeping a one cell margin
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::testing::RenderHarness;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_modal_renders_over_background() {
        let mut harness = RenderHarness::new(80, 24);

        let output = harness.render_to_string_plain(|frame, area| {
            frame.render_widget(Paragraph::new("Posts"), area);

            let dialog = centered_rect(40, 10, area);
            render_modal(frame, dialog, &ModalStyle::with_bg(Color::Rgb(30, 30, 40)));
            frame.render_widget(Paragraph::new("History"), dialog);
        });

        assert!(output.contains("Posts"));
        assert!(output.contains("History"));
    }

    #[test]
    fn test_background_is_dimmed() {
        let mut harness = RenderHarness::new(20, 6);

        let buffer = harness.render(|frame, area| {
            frame.render_widget(Paragraph::new("Posts"), area);
            render_modal(frame, centered_rect(6, 2, area), &ModalStyle::default());
        });

        assert!(buffer[(0, 0)].modifier.contains(Modifier::DIM));
        assert_eq!(buffer[(0, 0)].symbol(), "P");
    }

    #[test]
    fn test_modal_area_is_cleared() {
        let mut harness = RenderHarness::new(20, 6);

        let output = harness.render_to_string_plain(|frame, area| {
            frame.render_widget(Paragraph::new("XXXXXXXXXXXXXXXXXXXX\n".repeat(6)), area);
            render_modal(frame, Rect::new(5, 2, 4, 2), &ModalStyle::default());
        });

        let third = output.lines().nth(2).unwrap_or_default();
        assert_eq!(&third[5..9], "    ");
    }

    #[test]
    fn test_centered_rect() {
        let centered = centered_rect(40, 10, Rect::new(0, 0, 80, 24));

        assert_eq!(centered.width, 40);
        assert_eq!(centered.height, 10);
        assert_eq!(centered.x, 20);
        assert_eq!(centered.y, 7);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let centered = centered_rect(100, 50, Rect::new(0, 0, 30, 10));

        assert!(centered.width <= 28);
        assert!(centered.height <= 8);
    }
}
