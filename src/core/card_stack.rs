/*
 * This module owns the ordered card stack: the `active` entries still waiting to be
 * swiped (front-most first) and the `history` of removed entries (most recent first).
 * Entries move as whole units between the two collections, so an id is never present
 * in both. Mutation goes through `CardStackOperations`, which the controller depends
 * on, keeping it testable against a recording mock.
 */
use crate::core::models::{Direction, ProfileEntry, ProfileId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    NotFound(ProfileId),
    EmptyHistory,
    Exhausted,
    DuplicateId(ProfileId),
}

impl std::fmt::Display for StackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackError::NotFound(id) => write!(f, "Profile '{id}' is not in the active stack"),
            StackError::EmptyHistory => write!(f, "No removed profile to restore"),
            StackError::Exhausted => write!(f, "The active stack is empty"),
            StackError::DuplicateId(id) => write!(f, "Duplicate profile id '{id}'"),
        }
    }
}

impl std::error::Error for StackError {}

pub type Result<T> = std::result::Result<T, StackError>;

/*
 * When the presentation layer should offer the undo control. Some screen variants
 * only offered "go back" after a left swipe (a pass), others after any swipe.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoPolicy {
    #[default]
    AfterLeftRemoval,
    AfterAnyRemoval,
}

// A removed entry together with the direction it left in.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEntry {
    pub entry: ProfileEntry,
    pub direction: Direction,
}

pub trait CardStackOperations: Send {
    // Active entries, front-most (interactive) first.
    fn active(&self) -> &[ProfileEntry];
    fn front(&self) -> Option<&ProfileEntry>;
    fn history(&self) -> &[RemovedEntry];
    fn has_history(&self) -> bool;
    fn is_exhausted(&self) -> bool;
    fn last_removal(&self) -> Option<Direction>;
    fn undo_available(&self) -> bool;

    fn remove(&mut self, direction: Direction, id: &ProfileId) -> Result<()>;
    fn remove_front(&mut self, direction: Direction) -> Result<ProfileId>;
    fn undo(&mut self) -> Result<ProfileId>;
    fn reset(&mut self);

    /*
     * Entry ids in bottom-to-top render order, i.e. `active` reversed. The last
     * element is drawn on top and is the one receiving gestures.
     */
    fn render_order(&self) -> Vec<ProfileId> {
        self.active().iter().rev().map(|e| e.id.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct CardStack {
    fixtures: Vec<ProfileEntry>,
    active: Vec<ProfileEntry>,
    history: Vec<RemovedEntry>,
    last_removal: Option<Direction>,
    undo_offered: bool,
    undo_policy: UndoPolicy,
}

impl CardStack {
    /*
     * Seeds a stack from the fixture set in declaration order; the first-declared
     * entry becomes front-most. The same set is restored by `reset`. Fails if two
     * fixtures share an id.
     */
    pub fn new(fixtures: Vec<ProfileEntry>, undo_policy: UndoPolicy) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &fixtures {
            if !seen.insert(&entry.id) {
                log::error!(
                    "CardStack: Rejecting fixture set with duplicate id '{}'",
                    entry.id
                );
                return Err(StackError::DuplicateId(entry.id.clone()));
            }
        }
        log::debug!(
            "CardStack: Seeded with {} entries, undo policy {undo_policy:?}",
            fixtures.len()
        );
        Ok(CardStack {
            active: fixtures.clone(),
            fixtures,
            history: Vec::new(),
            last_removal: None,
            undo_offered: false,
            undo_policy,
        })
    }

    pub fn undo_policy(&self) -> UndoPolicy {
        self.undo_policy
    }

    fn position_in_active(&self, id: &ProfileId) -> Option<usize> {
        self.active.iter().position(|e| &e.id == id)
    }
}

impl CardStackOperations for CardStack {
    fn active(&self) -> &[ProfileEntry] {
        &self.active
    }

    fn front(&self) -> Option<&ProfileEntry> {
        self.active.first()
    }

    fn history(&self) -> &[RemovedEntry] {
        &self.history
    }

    fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    fn is_exhausted(&self) -> bool {
        self.active.is_empty()
    }

    fn last_removal(&self) -> Option<Direction> {
        self.last_removal
    }

    fn undo_available(&self) -> bool {
        match self.undo_policy {
            UndoPolicy::AfterAnyRemoval => self.has_history(),
            UndoPolicy::AfterLeftRemoval => self.undo_offered && self.has_history(),
        }
    }

    fn remove(&mut self, direction: Direction, id: &ProfileId) -> Result<()> {
        let Some(index) = self.position_in_active(id) else {
            log::debug!("CardStack: Ignoring removal of '{id}', not in the active stack");
            return Err(StackError::NotFound(id.clone()));
        };
        let entry = self.active.remove(index);
        log::info!("CardStack: Removed '{id}' to the {direction}");
        self.history.insert(0, RemovedEntry { entry, direction });
        self.last_removal = Some(direction);
        self.undo_offered = direction == Direction::Left;
        Ok(())
    }

    fn remove_front(&mut self, direction: Direction) -> Result<ProfileId> {
        let id = self
            .front()
            .map(|e| e.id.clone())
            .ok_or(StackError::Exhausted)?;
        self.remove(direction, &id)?;
        Ok(id)
    }

    fn undo(&mut self) -> Result<ProfileId> {
        if self.history.is_empty() {
            log::debug!("CardStack: Undo requested with empty history, nothing to do");
            return Err(StackError::EmptyHistory);
        }
        let RemovedEntry { entry, .. } = self.history.remove(0);
        let id = entry.id.clone();
        self.active.insert(0, entry);
        self.last_removal = self.history.first().map(|r| r.direction);
        self.undo_offered = !self.history.is_empty();
        log::info!("CardStack: Restored '{id}' to the front");
        Ok(id)
    }

    fn reset(&mut self) {
        self.active = self.fixtures.clone();
        self.history.clear();
        self.last_removal = None;
        self.undo_offered = false;
        log::info!("CardStack: Reset to {} entries", self.active.len());
    }
}
