/*
 * Loads the seed set of profile entries a card stack is built from, and rebuilt
 * from on reset. Fixture files are a JSON array of entries in declaration order;
 * the first entry becomes the front-most card.
 */
use crate::core::card_stack::{CardStack, StackError, UndoPolicy};
use crate::core::models::ProfileEntry;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum FixtureError {
    Io(io::Error),
    Serde(serde_json::Error),
    Empty,
    Stack(StackError),
}

impl From<io::Error> for FixtureError {
    fn from(err: io::Error) -> Self {
        FixtureError::Io(err)
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        FixtureError::Serde(err)
    }
}

impl From<StackError> for FixtureError {
    fn from(err: StackError) -> Self {
        FixtureError::Stack(err)
    }
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureError::Io(e) => write!(f, "I/O error reading profiles: {e}"),
            FixtureError::Serde(e) => write!(f, "Malformed profile fixture: {e}"),
            FixtureError::Empty => write!(f, "Profile fixture contains no entries"),
            FixtureError::Stack(e) => write!(f, "Profile fixture rejected: {e}"),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Io(e) => Some(e),
            FixtureError::Serde(e) => Some(e),
            FixtureError::Stack(e) => Some(e),
            FixtureError::Empty => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;

pub fn parse_profiles(json: &str) -> Result<Vec<ProfileEntry>> {
    let entries: Vec<ProfileEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(FixtureError::Empty);
    }
    Ok(entries)
}

pub fn load_profiles_from_path(path: &Path) -> Result<Vec<ProfileEntry>> {
    log::trace!("Fixtures: Loading profiles from {path:?}");
    let entries = parse_profiles(&fs::read_to_string(path)?)?;
    log::debug!("Fixtures: Loaded {} profiles from {path:?}", entries.len());
    Ok(entries)
}

// Loads a fixture file and seeds a stack with it; duplicate ids are rejected.
pub fn load_stack_from_path(path: &Path, undo_policy: UndoPolicy) -> Result<CardStack> {
    let entries = load_profiles_from_path(path)?;
    Ok(CardStack::new(entries, undo_policy)?)
}
