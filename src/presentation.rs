/*
 * The boundary towards whatever draws the deck: the event/command contract in
 * `types`, and `script`, a headless driver that replays a recorded gesture session
 * against any `DeckEventHandler`.
 */
pub mod script;
pub mod types;

pub use script::{ScriptError, ScriptRunner, ScriptStep, SessionScript};
pub use types::{DeckEvent, DeckEventHandler, PresentationCommand};
