/*
 * Framework-free core of the swipe deck: the per-card gesture state machine, the
 * ordered card stack with its undo history, the animation primitives they share,
 * and the configuration and fixture loading they are built from.
 */
pub mod animation;
pub mod card_stack;
pub mod config;
pub mod fixtures;
pub mod gesture_tracker;
pub mod models;
pub mod path_utils;

pub use models::{CardTransform, Direction, Lean, ProfileEntry, ProfileId, ProfilePayload};

pub use card_stack::{CardStack, CardStackOperations, RemovedEntry, StackError, UndoPolicy};

pub use gesture_tracker::{
    AnimationCompletion, AnimationFrame, DragFrame, DragSample, GestureSession, GestureTracker,
    MoveOutcome, ReleaseDecision, TrackerState, classify_release,
};

pub use config::{
    CommitDistance, ConfigError, ConfigManagerOperations, CoreConfigManager, DeckConfig,
    RotationRange, SpringConfig,
};

pub use fixtures::{FixtureError, load_profiles_from_path, load_stack_from_path};
