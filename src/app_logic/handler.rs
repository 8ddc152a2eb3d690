use crate::app_logic::DeckUiState;
use crate::core::{
    AnimationCompletion, CardStackOperations, DeckConfig, Direction, DragSample, GestureTracker,
    Lean, MoveOutcome, ProfileId, ReleaseDecision,
};
use crate::presentation::{DeckEvent, DeckEventHandler, PresentationCommand};
use std::time::Duration;

/*
 * Drives the swipe deck in a platform-agnostic manner. It owns the card stack and
 * the gesture tracker bound to the stack's front-most entry, turns `DeckEvent`s from
 * the presentation layer into tracker and stack calls, and answers with the
 * `PresentationCommand`s to apply.
 *
 * Stack mutations happen only in response to an animation completion (commit) or an
 * explicit undo/refresh request, never while handling pointer movement. While the
 * tracker is dragging or animating its card stays front-most: undo and refresh are
 * ignored until it is idle again.
 */
pub struct DeckController {
    pub(crate) config: DeckConfig,
    pub(crate) stack: Box<dyn CardStackOperations>,
    pub(crate) tracker: Option<GestureTracker>,
    pub(crate) ui_state: DeckUiState,
}

impl DeckController {
    pub fn new(stack: Box<dyn CardStackOperations>, config: DeckConfig) -> Self {
        let mut controller = DeckController {
            config,
            stack,
            tracker: None,
            ui_state: DeckUiState::new(),
        };
        controller.bind_tracker_to_front();
        controller
    }

    pub fn stack(&self) -> &dyn CardStackOperations {
        self.stack.as_ref()
    }

    pub fn tracker(&self) -> Option<&GestureTracker> {
        self.tracker.as_ref()
    }

    pub fn ui_state(&self) -> &DeckUiState {
        &self.ui_state
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn status_line(&self) -> String {
        DeckUiState::compose_status_line(self.stack.as_ref())
    }

    fn tracker_is_busy(&self) -> bool {
        self.tracker.as_ref().is_some_and(|t| !t.is_idle())
    }

    /*
     * Points the tracker at the current front-most entry. A tracker that is already
     * bound to it is kept; an exhausted stack leaves no tracker at all.
     */
    fn bind_tracker_to_front(&mut self) {
        let front_id = self.stack.front().map(|e| e.id.clone());
        let bound_id = self.tracker.as_ref().map(|t| t.entry_id().clone());
        if front_id == bound_id {
            return;
        }
        match front_id {
            Some(id) => {
                log::debug!("DeckController: Front-most entry is now '{id}'");
                self.tracker = Some(GestureTracker::new(id, &self.config));
            }
            None => {
                log::debug!("DeckController: Stack exhausted, no interactive entry");
                self.tracker = None;
            }
        }
        self.ui_state.reset_card_feedback();
    }

    // Full redraw of the stack plus the controls that depend on it.
    fn push_stack_render(&mut self, commands: &mut Vec<PresentationCommand>) {
        commands.push(PresentationCommand::RenderStack {
            entries: self.stack.render_order(),
        });
        commands.extend(self.ui_state.sync_undo_control(self.stack.undo_available()));
        commands.extend(self.ui_state.sync_empty_state(self.stack.is_exhausted()));
    }

    /*
     * Full resync after the deck (re)appears. Besides the stack, the interactive
     * card's lean and inner-scroll flags are re-sent from the tracker, which may be
     * mid-gesture when the screen is shown again.
     */
    fn on_deck_shown(&mut self) -> Vec<PresentationCommand> {
        let mut commands = Vec::new();
        self.ui_state.invalidate();
        self.bind_tracker_to_front();
        self.push_stack_render(&mut commands);
        if let Some(tracker) = self.tracker.as_ref() {
            let entry_id = tracker.entry_id();
            let scroll_enabled = tracker.inner_scroll_enabled();
            commands.extend(self.ui_state.sync_inner_scroll(entry_id, scroll_enabled));
            commands.extend(self.ui_state.sync_lean(entry_id, tracker.lean()));
        }
        commands
    }

    fn on_pointer_moved(&mut self, sample: DragSample) -> Vec<PresentationCommand> {
        let mut commands = Vec::new();
        let Some(tracker) = self.tracker.as_mut() else {
            return commands;
        };
        let entry_id = tracker.entry_id().clone();
        let frame = match tracker.on_move(sample) {
            MoveOutcome::Ignored => return commands,
            MoveOutcome::Claimed(frame) => {
                commands.extend(self.ui_state.sync_inner_scroll(&entry_id, false));
                frame
            }
            MoveOutcome::Moved(frame) => frame,
        };
        commands.push(PresentationCommand::SetCardTransform {
            entry_id: entry_id.clone(),
            transform: frame.transform,
        });
        commands.extend(self.ui_state.sync_lean(&entry_id, frame.lean));
        commands
    }

    fn on_pointer_released(&mut self, sample: DragSample) -> Vec<PresentationCommand> {
        if let Some(tracker) = self.tracker.as_mut() {
            match tracker.on_release(sample) {
                Some(ReleaseDecision::Commit(direction)) => log::info!(
                    "DeckController: Committing '{}' to the {direction}",
                    tracker.entry_id()
                ),
                Some(ReleaseDecision::Cancel) => log::debug!(
                    "DeckController: Swipe on '{}' cancelled, springing back",
                    tracker.entry_id()
                ),
                None => {}
            }
        }
        Vec::new()
    }

    fn on_gesture_terminated(&mut self) -> Vec<PresentationCommand> {
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.on_terminate();
        }
        Vec::new()
    }

    fn on_frame_elapsed(&mut self, elapsed: Duration) -> Vec<PresentationCommand> {
        let mut commands = Vec::new();
        let Some(tracker) = self.tracker.as_mut() else {
            return commands;
        };
        let entry_id = tracker.entry_id().clone();
        let Some(frame) = tracker.advance(elapsed) else {
            return commands;
        };
        commands.push(PresentationCommand::SetCardTransform {
            entry_id: entry_id.clone(),
            transform: frame.transform,
        });
        match frame.completion {
            None => {}
            Some(AnimationCompletion::Settled) => {
                commands.extend(self.ui_state.sync_lean(&entry_id, Lean::None));
                commands.extend(self.ui_state.sync_inner_scroll(&entry_id, true));
            }
            Some(AnimationCompletion::Committed {
                direction,
                entry_id,
            }) => {
                commands.extend(self.ui_state.sync_lean(&entry_id, Lean::None));
                commands.extend(self.ui_state.sync_inner_scroll(&entry_id, true));
                self.apply_commit(direction, entry_id, &mut commands);
            }
        }
        commands
    }

    /*
     * Applies a finished commit to the stack. A removal the stack does not recognize
     * (a repeated completion for an entry already gone) is absorbed silently.
     */
    pub(crate) fn apply_commit(
        &mut self,
        direction: Direction,
        entry_id: ProfileId,
        commands: &mut Vec<PresentationCommand>,
    ) {
        match self.stack.remove(direction, &entry_id) {
            Ok(()) => {
                log::info!("DeckController: '{entry_id}' swiped {direction}");
                commands.push(PresentationCommand::CardCommitted {
                    direction,
                    entry_id,
                });
            }
            Err(e) => {
                log::debug!("DeckController: Absorbed commit of '{entry_id}': {e}");
            }
        }
        self.bind_tracker_to_front();
        self.push_stack_render(commands);
    }

    fn on_undo_requested(&mut self) -> Vec<PresentationCommand> {
        let mut commands = Vec::new();
        if self.tracker_is_busy() {
            log::debug!("DeckController: Ignoring undo while a swipe is in progress");
            return commands;
        }
        match self.stack.undo() {
            Ok(id) => {
                log::info!("DeckController: Undo restored '{id}'");
                self.bind_tracker_to_front();
                self.push_stack_render(&mut commands);
            }
            Err(e) => log::debug!("DeckController: Undo absorbed: {e}"),
        }
        commands
    }

    fn on_refresh_requested(&mut self) -> Vec<PresentationCommand> {
        let mut commands = Vec::new();
        if self.tracker_is_busy() {
            log::debug!("DeckController: Ignoring refresh while a swipe is in progress");
            return commands;
        }
        self.stack.reset();
        log::info!(
            "DeckController: Profiles refreshed, {} in the stack",
            self.stack.active().len()
        );
        self.bind_tracker_to_front();
        self.push_stack_render(&mut commands);
        commands
    }
}

impl DeckEventHandler for DeckController {
    fn handle_event(&mut self, event: DeckEvent) -> Vec<PresentationCommand> {
        log::trace!("DeckController: Handling {event:?}");
        match event {
            DeckEvent::DeckShown => self.on_deck_shown(),
            DeckEvent::PointerMoved(sample) => self.on_pointer_moved(sample),
            DeckEvent::PointerReleased(sample) => self.on_pointer_released(sample),
            DeckEvent::GestureTerminated => self.on_gesture_terminated(),
            DeckEvent::FrameElapsed { elapsed } => self.on_frame_elapsed(elapsed),
            DeckEvent::UndoRequested => self.on_undo_requested(),
            DeckEvent::RefreshRequested => self.on_refresh_requested(),
        }
    }
}
