//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into pixels on
//! the terminal.  Row building itself lives in `core::render`; here we only
//! decide the window, draw the rows, and paint the overlays.

pub mod layout;
pub mod list_widget;
pub mod popup;
pub mod theme;
pub mod viewport;
