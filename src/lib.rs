/*
 * Interaction core of a swipeable profile-card deck. `core` holds the gesture
 * state machine and the card stack, `app_logic` wires them to the presentation
 * contract defined in `presentation`.
 */
pub mod app_logic;
pub mod core;
pub mod presentation;
