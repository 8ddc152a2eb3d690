/*
 * Headless stand-in for a presentation layer. A `SessionScript` is a recorded user
 * session (drags, waits, undo and refresh presses) stored as JSON; `ScriptRunner`
 * expands each step into the `DeckEvent`s a real touch surface and frame clock
 * would produce and feeds them to a `DeckEventHandler`, collecting the commands.
 */
use crate::core::{Direction, DragSample, ProfileId};
use crate::presentation::types::{DeckEvent, DeckEventHandler, PresentationCommand};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_FRAME_MS: u64 = 16;
// Shortest frame a runner will step by.
const MIN_FRAME: Duration = Duration::from_millis(1);
const DEFAULT_DRAG_SAMPLES: u32 = 8;

#[derive(Debug)]
pub enum ScriptError {
    Io(io::Error),
    Serde(serde_json::Error),
    Invalid(String),
}

impl From<io::Error> for ScriptError {
    fn from(err: io::Error) -> Self {
        ScriptError::Io(err)
    }
}

impl From<serde_json::Error> for ScriptError {
    fn from(err: serde_json::Error) -> Self {
        ScriptError::Serde(err)
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::Io(e) => write!(f, "I/O error reading script: {e}"),
            ScriptError::Serde(e) => write!(f, "Malformed script: {e}"),
            ScriptError::Invalid(reason) => write!(f, "Invalid script: {reason}"),
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io(e) => Some(e),
            ScriptError::Serde(e) => Some(e),
            ScriptError::Invalid(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;

fn default_samples() -> u32 {
    DEFAULT_DRAG_SAMPLES
}

fn default_frame_ms() -> u64 {
    DEFAULT_FRAME_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Show,
    // A drag to (dx, dy) reported in `samples` moves, then released with `vx`.
    Drag {
        dx: f64,
        #[serde(default)]
        dy: f64,
        vx: f64,
        #[serde(default = "default_samples")]
        samples: u32,
    },
    // Same movement, but the system takes the gesture away instead of a release.
    DragAndTerminate {
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(default)]
        vx: f64,
        #[serde(default = "default_samples")]
        samples: u32,
    },
    Wait {
        ms: u64,
    },
    Undo,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    // Overrides the configured screen width when present.
    #[serde(default)]
    pub screen_width: Option<f64>,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    pub steps: Vec<ScriptStep>,
}

impl SessionScript {
    pub fn from_json(json: &str) -> Result<Self> {
        let script: SessionScript = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        log::trace!("SessionScript: Loading {path:?}");
        let reader = BufReader::new(File::open(path)?);
        let script: SessionScript = serde_json::from_reader(reader)?;
        script.validate()?;
        log::debug!(
            "SessionScript: Loaded {} steps from {path:?}",
            script.steps.len()
        );
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            return Err(ScriptError::Invalid("frame_ms must be positive".into()));
        }
        if let Some(width) = self.screen_width {
            if !(width.is_finite() && width > 0.0) {
                return Err(ScriptError::Invalid(format!(
                    "screen_width must be positive, got {width}"
                )));
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let ScriptStep::Drag { samples: 0, .. }
            | ScriptStep::DragAndTerminate { samples: 0, .. } = step
            {
                return Err(ScriptError::Invalid(format!(
                    "step {index}: a drag needs at least one sample"
                )));
            }
        }
        Ok(())
    }
}

// What a whole script run produced.
#[derive(Debug, Default)]
pub struct ScriptReport {
    pub steps_run: usize,
    pub commands: Vec<PresentationCommand>,
    pub committed: Vec<(Direction, ProfileId)>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScriptRunner {
    frame: Duration,
}

impl ScriptRunner {
    // A zero frame would never advance the clock; it is raised to one millisecond.
    pub fn new(frame: Duration) -> Self {
        if frame < MIN_FRAME {
            log::warn!("ScriptRunner: Frame of {frame:?} is too short, using {MIN_FRAME:?}");
        }
        ScriptRunner {
            frame: frame.max(MIN_FRAME),
        }
    }

    pub fn for_script(script: &SessionScript) -> Self {
        ScriptRunner::new(Duration::from_millis(script.frame_ms))
    }

    pub fn events_for_step(&self, step: &ScriptStep) -> Vec<DeckEvent> {
        match *step {
            ScriptStep::Show => vec![DeckEvent::DeckShown],
            ScriptStep::Drag {
                dx,
                dy,
                vx,
                samples,
            } => {
                let mut events = Self::drag_moves(dx, dy, vx, samples);
                events.push(DeckEvent::PointerReleased(DragSample::new(dx, dy, vx)));
                events
            }
            ScriptStep::DragAndTerminate {
                dx,
                dy,
                vx,
                samples,
            } => {
                let mut events = Self::drag_moves(dx, dy, vx, samples);
                events.push(DeckEvent::GestureTerminated);
                events
            }
            ScriptStep::Wait { ms } => self.frames_for(Duration::from_millis(ms)),
            ScriptStep::Undo => vec![DeckEvent::UndoRequested],
            ScriptStep::Refresh => vec![DeckEvent::RefreshRequested],
        }
    }

    pub fn run_step(
        &self,
        step: &ScriptStep,
        handler: &mut dyn DeckEventHandler,
    ) -> Vec<PresentationCommand> {
        let mut commands = Vec::new();
        for event in self.events_for_step(step) {
            let produced = handler.handle_event(event);
            for command in &produced {
                log::trace!("ScriptRunner: -> {command:?}");
            }
            commands.extend(produced);
        }
        commands
    }

    pub fn run(
        &self,
        script: &SessionScript,
        handler: &mut dyn DeckEventHandler,
    ) -> ScriptReport {
        let mut report = ScriptReport::default();
        for step in &script.steps {
            let commands = self.run_step(step, handler);
            for command in &commands {
                if let PresentationCommand::CardCommitted {
                    direction,
                    entry_id,
                } = command
                {
                    report.committed.push((*direction, entry_id.clone()));
                }
            }
            report.commands.extend(commands);
            report.steps_run += 1;
        }
        report
    }

    // Evenly spaced move samples ending at (dx, dy).
    fn drag_moves(dx: f64, dy: f64, vx: f64, samples: u32) -> Vec<DeckEvent> {
        (1..=samples)
            .map(|i| {
                let t = f64::from(i) / f64::from(samples);
                DeckEvent::PointerMoved(DragSample::new(dx * t, dy * t, vx))
            })
            .collect()
    }

    fn frames_for(&self, total: Duration) -> Vec<DeckEvent> {
        let mut events = Vec::new();
        let mut remaining = total;
        while !remaining.is_zero() {
            let elapsed = remaining.min(self.frame);
            events.push(DeckEvent::FrameElapsed { elapsed });
            remaining -= elapsed;
        }
        events
    }
}
