//! Terminal input events and the background poller that produces them

use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Coarse event classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Key,
    Mouse,
    Scroll,
    Resize,
    Tick,
}

/// An input event as seen by views
#[derive(Debug, Clone)]
pub enum EventKind {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Scroll wheel with position and direction (`1` down, `-1` up)
    Scroll { column: u16, row: u16, delta: isize },
    Resize(u16, u16),
    Tick,
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Key(_) => EventType::Key,
            EventKind::Mouse(_) => EventType::Mouse,
            EventKind::Scroll { .. } => EventType::Scroll,
            EventKind::Resize(_, _) => EventType::Resize,
            EventKind::Tick => EventType::Tick,
        }
    }

    /// Ctrl+C, delivered regardless of which view has focus
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self,
            EventKind::Key(key)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
        )
    }
}

/// Event read from crossterm, before classification
#[derive(Debug)]
pub enum RawEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Classify a raw event, folding wheel motion into [`EventKind::Scroll`]
pub fn process_raw_event(raw: RawEvent) -> EventKind {
    match raw {
        RawEvent::Key(key) => EventKind::Key(key),
        RawEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: 1,
            },
            MouseEventKind::ScrollUp => EventKind::Scroll {
                column: mouse.column,
                row: mouse.row,
                delta: -1,
            },
            _ => EventKind::Mouse(mouse),
        },
        RawEvent::Resize(w, h) => EventKind::Resize(w, h),
    }
}

/// Spawn the crossterm polling task
///
/// Events are forwarded to `tx` until the token is cancelled or the receiver
/// is dropped. At most a small batch is read per cycle so a paste cannot
/// starve the action loop.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut processed = 0;
                    while processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        processed += 1;
                        let raw = match event::read() {
                            Ok(event::Event::Key(key)) => RawEvent::Key(key),
                            Ok(event::Event::Mouse(mouse)) => RawEvent::Mouse(mouse),
                            Ok(event::Event::Resize(w, h)) => RawEvent::Resize(w, h),
                            _ => continue,
                        };
                        if tx.send(raw).is_err() {
                            debug!("Event channel closed, stopping poller");
                            return;
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 4,
            row: 2,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_scroll_wheel_is_folded() {
        let down = process_raw_event(RawEvent::Mouse(mouse(MouseEventKind::ScrollDown)));
        assert!(matches!(down, EventKind::Scroll { delta: 1, column: 4, row: 2 }));

        let up = process_raw_event(RawEvent::Mouse(mouse(MouseEventKind::ScrollUp)));
        assert_eq!(up.event_type(), EventType::Scroll);

        let moved = process_raw_event(RawEvent::Mouse(mouse(MouseEventKind::Moved)));
        assert_eq!(moved.event_type(), EventType::Mouse);
    }

    #[test]
    fn test_interrupt() {
        let ctrl_c = EventKind::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        });
        assert!(ctrl_c.is_interrupt());
        assert!(!EventKind::Resize(80, 24).is_interrupt());
    }
}
