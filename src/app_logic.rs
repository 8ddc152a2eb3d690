/*
 * This module provides the deck's interaction logic layer, centered around
 * `DeckController`, which sits between the presentation layer and the core. It
 * also includes `DeckUiState`, the cache of what the presentation layer was last
 * told. Unit tests for `DeckController` are in `handler_tests.rs`.
 */
pub mod deck_ui_state;
pub mod handler;


pub use deck_ui_state::DeckUiState;
pub use handler::DeckController;
