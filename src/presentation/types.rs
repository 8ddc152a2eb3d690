/*
 * This module defines the contract between the deck's interaction logic and the
 * presentation layer that draws it. The presentation layer reports pointer input,
 * frame time and button presses as `DeckEvent`s; the logic answers with
 * `PresentationCommand`s describing what to draw. Neither side knows how the other
 * is implemented, which keeps the core free of any UI framework.
 */
use crate::core::{CardTransform, Direction, DragSample, Lean, ProfileId};
use std::time::Duration;

// --- Events from the presentation layer to the logic ---

#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent {
    // The deck screen became visible; the logic answers with a full render.
    DeckShown,
    PointerMoved(DragSample),
    PointerReleased(DragSample),
    // The system cancelled the gesture, e.g. a competing recognizer won.
    GestureTerminated,
    // One frame of the animation clock has elapsed.
    FrameElapsed {
        elapsed: Duration,
    },
    UndoRequested,
    // "Refresh profiles" on the empty-state view.
    RefreshRequested,
}

// --- Commands from the logic to the presentation layer ---

#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCommand {
    // Entries to draw, bottom-to-top. The last one is interactive.
    RenderStack {
        entries: Vec<ProfileId>,
    },
    SetCardTransform {
        entry_id: ProfileId,
        transform: CardTransform,
    },
    // Highlights the "pass"/"like" label before the drag is released.
    SetLeanIndicator {
        entry_id: ProfileId,
        lean: Lean,
    },
    SetInnerScrollEnabled {
        entry_id: ProfileId,
        enabled: bool,
    },
    // A swipe was committed and its entry has left the stack.
    CardCommitted {
        direction: Direction,
        entry_id: ProfileId,
    },
    SetUndoControlVisible {
        visible: bool,
    },
    SetEmptyStateVisible {
        visible: bool,
    },
}

/*
 * Implemented by the interaction logic. The presentation layer forwards every
 * event and applies the returned commands in order.
 */
pub trait DeckEventHandler {
    fn handle_event(&mut self, event: DeckEvent) -> Vec<PresentationCommand>;
}
