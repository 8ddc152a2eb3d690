/*
 * This module defines `DeckUiState`, the presentation-side cache the controller
 * keeps so it only sends a command when something visible actually changes: the
 * lean label and inner-scroll flag of the interactive card, the undo control and
 * the empty-state view. It also composes the one-line status summary the headless
 * driver logs after each step.
 */
use crate::core::{CardStackOperations, Lean, ProfileId};
use crate::presentation::PresentationCommand;

#[derive(Debug)]
pub struct DeckUiState {
    /* Lean label last shown on the interactive card; `None` forces the next sync. */
    pub lean: Option<Lean>,
    /* Whether the interactive card's content was last told it may scroll. */
    pub inner_scroll_enabled: Option<bool>,
    /* Last undo-control visibility sent; `None` forces the next sync to emit. */
    pub undo_control_visible: Option<bool>,
    /* Last empty-state visibility sent; `None` forces the next sync to emit. */
    pub empty_state_visible: Option<bool>,
}

impl Default for DeckUiState {
    fn default() -> Self {
        DeckUiState::new()
    }
}

impl DeckUiState {
    pub fn new() -> Self {
        DeckUiState {
            lean: Some(Lean::None),
            inner_scroll_enabled: Some(true),
            undo_control_visible: None,
            empty_state_visible: None,
        }
    }

    // Forget what was sent so the next sync re-emits everything, e.g. on DeckShown.
    pub fn invalidate(&mut self) {
        self.lean = None;
        self.inner_scroll_enabled = None;
        self.undo_control_visible = None;
        self.empty_state_visible = None;
    }

    // A freshly bound card starts unleaned and scrollable.
    pub fn reset_card_feedback(&mut self) {
        self.lean = Some(Lean::None);
        self.inner_scroll_enabled = Some(true);
    }

    pub fn sync_lean(
        &mut self,
        entry_id: &ProfileId,
        lean: Lean,
    ) -> Option<PresentationCommand> {
        if self.lean == Some(lean) {
            return None;
        }
        self.lean = Some(lean);
        Some(PresentationCommand::SetLeanIndicator {
            entry_id: entry_id.clone(),
            lean,
        })
    }

    pub fn sync_inner_scroll(
        &mut self,
        entry_id: &ProfileId,
        enabled: bool,
    ) -> Option<PresentationCommand> {
        if self.inner_scroll_enabled == Some(enabled) {
            return None;
        }
        self.inner_scroll_enabled = Some(enabled);
        Some(PresentationCommand::SetInnerScrollEnabled {
            entry_id: entry_id.clone(),
            enabled,
        })
    }

    pub fn sync_undo_control(&mut self, visible: bool) -> Option<PresentationCommand> {
        if self.undo_control_visible == Some(visible) {
            return None;
        }
        self.undo_control_visible = Some(visible);
        Some(PresentationCommand::SetUndoControlVisible { visible })
    }

    pub fn sync_empty_state(&mut self, visible: bool) -> Option<PresentationCommand> {
        if self.empty_state_visible == Some(visible) {
            return None;
        }
        self.empty_state_visible = Some(visible);
        Some(PresentationCommand::SetEmptyStateVisible { visible })
    }

    /*
     * Short human-readable summary of the deck: the interactive profile, how many
     * remain, and whether undo is on offer.
     */
    pub fn compose_status_line(stack: &dyn CardStackOperations) -> String {
        let Some(front) = stack.front() else {
            return "No more profiles".to_string();
        };
        let mut status = format!(
            "{} ({}) - {} left",
            front.payload.name,
            front.id,
            stack.active().len()
        );
        if stack.undo_available() {
            status = format!("{status} - undo available");
        }
        status
    }
}
