//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and forwards them over a
//! channel from a blocking reader task so the main loop stays async.

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Spawns a blocking task that reads terminal events and sends them through
/// the returned channel.  The task exits when the receiver is dropped or the
/// terminal goes away.
pub fn spawn_event_reader() -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(_) => break,
        };
        let app_event = match ev {
            CtEvent::Key(k) => AppEvent::Key(k),
            CtEvent::Mouse(m) => AppEvent::Mouse(m),
            CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
            _ => continue,
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });

    rx
}
