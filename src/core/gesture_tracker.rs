/*
 * Per-card gesture state machine. A `GestureTracker` is bound to one profile entry
 * and turns the pointer samples of a single-finger drag into a decision: commit to
 * the left, commit to the right, or spring back. It then runs the matching
 * animation, stepped by the caller's frame clock, and reports how it ended.
 *
 * States:
 *   Idle      -> Dragging   first predominantly horizontal move
 *   Dragging  -> Animating  release (commit or cancel) or system termination
 *   Animating -> Idle       exit tween finished, or spring at rest
 *
 * The tracker never touches the card stack. A commit is only reported through
 * `AnimationCompletion::Committed` once the exit animation has finished, and the
 * caller applies the stack mutation from there.
 */
use crate::core::animation::{LinearTween, Spring, rotation_for_offset};
use crate::core::config::DeckConfig;
use crate::core::models::{CardTransform, Direction, Lean, ProfileId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/*
 * One pointer sample, relative to where the gesture started. `vx` is the
 * instantaneous horizontal velocity in units per millisecond.
 */
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragSample {
    pub dx: f64,
    pub dy: f64,
    pub vx: f64,
}

impl DragSample {
    pub fn new(dx: f64, dy: f64, vx: f64) -> Self {
        DragSample { dx, dy, vx }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Dragging,
    Animating,
}

/*
 * Ephemeral state of one drag, alive from activation until the resulting animation
 * has completed.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub origin_offset: f64,
    pub current_offset: f64,
    pub raw_dx: f64,
    pub velocity: f64,
    pub lean: Lean,
}

impl GestureSession {
    fn start() -> Self {
        GestureSession {
            origin_offset: 0.0,
            current_offset: 0.0,
            raw_dx: 0.0,
            velocity: 0.0,
            lean: Lean::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    Commit(Direction),
    Cancel,
}

// Result of feeding a move sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    // Not (yet) a horizontal swipe, or the card is busy animating.
    Ignored,
    // This sample activated the drag.
    Claimed(DragFrame),
    Moved(DragFrame),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub transform: CardTransform,
    pub lean: Lean,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationCompletion {
    Committed {
        direction: Direction,
        entry_id: ProfileId,
    },
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub transform: CardTransform,
    pub completion: Option<AnimationCompletion>,
}

#[derive(Debug, Clone)]
enum Animation {
    Exit {
        direction: Direction,
        offset: LinearTween,
        opacity: LinearTween,
    },
    SpringBack {
        spring: Spring,
    },
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Dragging(GestureSession),
    Animating {
        session: GestureSession,
        animation: Animation,
    },
}

/*
 * Decides the outcome of a released drag from the raw (unscaled) horizontal delta
 * and the release velocity. Distance and velocity must both pass, in the same
 * direction, for a commit.
 */
pub fn classify_release(config: &DeckConfig, dx: f64, vx: f64) -> ReleaseDecision {
    let distance = config.commit_distance_px();
    let velocity = config.commit_velocity;
    if dx < -distance && vx < -velocity {
        ReleaseDecision::Commit(Direction::Left)
    } else if dx > distance && vx > velocity {
        ReleaseDecision::Commit(Direction::Right)
    } else {
        ReleaseDecision::Cancel
    }
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    entry_id: ProfileId,
    config: DeckConfig,
    phase: Phase,
}

impl GestureTracker {
    pub fn new(entry_id: ProfileId, config: &DeckConfig) -> Self {
        log::trace!("GestureTracker: Bound to entry '{entry_id}'");
        GestureTracker {
            entry_id,
            config: config.clone(),
            phase: Phase::Idle,
        }
    }

    pub fn entry_id(&self) -> &ProfileId {
        &self.entry_id
    }

    pub fn state(&self) -> TrackerState {
        match self.phase {
            Phase::Idle => TrackerState::Idle,
            Phase::Dragging(_) => TrackerState::Dragging,
            Phase::Animating { .. } => TrackerState::Animating,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn session(&self) -> Option<&GestureSession> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Dragging(session) | Phase::Animating { session, .. } => Some(session),
        }
    }

    pub fn lean(&self) -> Lean {
        self.session().map(|s| s.lean).unwrap_or_default()
    }

    // The card's inner content may only scroll while no swipe is in progress.
    pub fn inner_scroll_enabled(&self) -> bool {
        self.is_idle()
    }

    pub fn transform(&self) -> CardTransform {
        match &self.phase {
            Phase::Idle => CardTransform::IDENTITY,
            Phase::Dragging(session) => self.transform_at(session.current_offset, 1.0),
            Phase::Animating { animation, .. } => match animation {
                Animation::Exit {
                    offset, opacity, ..
                } => self.transform_at(offset.value(), opacity.value()),
                Animation::SpringBack { spring } => self.transform_at(spring.position(), 1.0),
            },
        }
    }

    /*
     * Activation test for a move arriving while idle: the horizontal displacement
     * must exceed the activation threshold while the vertical one stays below it.
     * Anything else is left to the vertical scroll of the card content.
     */
    pub fn is_predominantly_horizontal(&self, sample: &DragSample) -> bool {
        let threshold = self.config.activation_threshold;
        sample.dx.abs() > threshold && sample.dy.abs() < threshold
    }

    pub fn on_move(&mut self, sample: DragSample) -> MoveOutcome {
        match &mut self.phase {
            Phase::Idle => {
                if !self.is_predominantly_horizontal(&sample) {
                    return MoveOutcome::Ignored;
                }
                log::debug!(
                    "GestureTracker: Drag on '{}' activated at dx={}, dy={}",
                    self.entry_id,
                    sample.dx,
                    sample.dy
                );
                let mut session = GestureSession::start();
                Self::apply_sample(&self.config, &mut session, &sample);
                let frame = self.drag_frame(&session);
                self.phase = Phase::Dragging(session);
                MoveOutcome::Claimed(frame)
            }
            Phase::Dragging(session) => {
                Self::apply_sample(&self.config, session, &sample);
                let session = session.clone();
                MoveOutcome::Moved(self.drag_frame(&session))
            }
            Phase::Animating { .. } => {
                log::debug!(
                    "GestureTracker: Ignoring move on '{}' while animating",
                    self.entry_id
                );
                MoveOutcome::Ignored
            }
        }
    }

    /*
     * Ends the drag with the final sample. Returns the decision that was taken, or
     * `None` if no drag was in progress (a tap, or a card already animating).
     */
    pub fn on_release(&mut self, sample: DragSample) -> Option<ReleaseDecision> {
        let Phase::Dragging(session) = &mut self.phase else {
            log::debug!(
                "GestureTracker: Ignoring release on '{}' in state {:?}",
                self.entry_id,
                self.state()
            );
            return None;
        };
        Self::apply_sample(&self.config, session, &sample);
        let decision = classify_release(&self.config, sample.dx, sample.vx);
        log::debug!(
            "GestureTracker: Release on '{}' at dx={}, vx={} -> {decision:?}",
            self.entry_id,
            sample.dx,
            sample.vx
        );
        self.start_animation(decision);
        Some(decision)
    }

    // The system took the gesture away (e.g. a competing recognizer). Same as a cancel.
    pub fn on_terminate(&mut self) -> Option<ReleaseDecision> {
        if !matches!(self.phase, Phase::Dragging(_)) {
            log::debug!(
                "GestureTracker: Ignoring termination on '{}' in state {:?}",
                self.entry_id,
                self.state()
            );
            return None;
        }
        log::debug!("GestureTracker: Drag on '{}' terminated", self.entry_id);
        self.start_animation(ReleaseDecision::Cancel);
        Some(ReleaseDecision::Cancel)
    }

    /*
     * Steps the running animation by `dt`. Returns `None` when nothing is animating.
     * The frame that finishes an animation carries its completion; the tracker is
     * idle again afterwards, with offset and opacity reset.
     */
    pub fn advance(&mut self, dt: Duration) -> Option<AnimationFrame> {
        let Phase::Animating { animation, .. } = &mut self.phase else {
            return None;
        };
        let completion = match animation {
            Animation::Exit {
                direction,
                offset,
                opacity,
            } => {
                let done = offset.advance(dt);
                opacity.advance(dt);
                done.then(|| AnimationCompletion::Committed {
                    direction: *direction,
                    entry_id: self.entry_id.clone(),
                })
            }
            Animation::SpringBack { spring } => {
                spring.advance(dt).then_some(AnimationCompletion::Settled)
            }
        };
        let transform = self.transform();
        log::trace!(
            "GestureTracker: Frame for '{}': x={:.2} rot={:.2} opacity={:.2}",
            self.entry_id,
            transform.translate_x,
            transform.rotate_deg,
            transform.opacity
        );
        if let Some(completion) = &completion {
            log::debug!(
                "GestureTracker: Animation on '{}' completed: {completion:?}",
                self.entry_id
            );
            self.phase = Phase::Idle;
        }
        Some(AnimationFrame {
            transform,
            completion,
        })
    }

    fn start_animation(&mut self, decision: ReleaseDecision) {
        let session = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(session) => session,
            other => {
                self.phase = other;
                return;
            }
        };
        let animation = match decision {
            ReleaseDecision::Commit(direction) => Animation::Exit {
                direction,
                offset: LinearTween::new(
                    session.current_offset,
                    direction.sign() * self.config.screen_width,
                    self.config.exit_duration(),
                ),
                opacity: LinearTween::new(1.0, 0.0, self.config.exit_duration()),
            },
            ReleaseDecision::Cancel => Animation::SpringBack {
                spring: Spring::new(session.current_offset, 0.0, self.config.spring),
            },
        };
        self.phase = Phase::Animating { session, animation };
    }

    fn apply_sample(config: &DeckConfig, session: &mut GestureSession, sample: &DragSample) {
        session.raw_dx = sample.dx;
        session.velocity = sample.vx;
        session.current_offset = session.origin_offset + sample.dx * config.resistance;
        let lean_distance = config.lean_distance_px();
        session.lean = if sample.dx < -lean_distance {
            Lean::Left
        } else if sample.dx > lean_distance {
            Lean::Right
        } else {
            Lean::None
        };
    }

    fn drag_frame(&self, session: &GestureSession) -> DragFrame {
        DragFrame {
            transform: self.transform_at(session.current_offset, 1.0),
            lean: session.lean,
        }
    }

    fn transform_at(&self, offset: f64, opacity: f64) -> CardTransform {
        CardTransform {
            translate_x: offset,
            rotate_deg: rotation_for_offset(offset, &self.config.rotation),
            opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn tracker() -> GestureTracker {
        GestureTracker::new(ProfileId::new("card"), &DeckConfig::default())
    }

    fn dragging_tracker(dx: f64, vx: f64) -> GestureTracker {
        let mut t = tracker();
        assert!(matches!(
            t.on_move(DragSample::new(dx.signum() * 20.0, 0.0, vx)),
            MoveOutcome::Claimed(_)
        ));
        t.on_move(DragSample::new(dx, 0.0, vx));
        t
    }

    fn run_to_completion(t: &mut GestureTracker) -> AnimationFrame {
        for _ in 0..1_000 {
            let frame = t.advance(ms(16)).expect("animation should be running");
            if frame.completion.is_some() {
                return frame;
            }
        }
        panic!("animation never completed");
    }

    #[test]
    fn test_activation_requires_horizontal_dominance() {
        let mut t = tracker();
        assert_eq!(t.on_move(DragSample::new(8.0, 0.0, 0.0)), MoveOutcome::Ignored);
        assert_eq!(t.on_move(DragSample::new(30.0, 12.0, 0.0)), MoveOutcome::Ignored);
        assert_eq!(t.on_move(DragSample::new(10.0, 0.0, 0.0)), MoveOutcome::Ignored);
        assert_eq!(t.on_move(DragSample::new(-11.0, 10.0, 0.0)), MoveOutcome::Ignored);
        assert_eq!(t.state(), TrackerState::Idle);
        assert!(t.inner_scroll_enabled());

        assert!(matches!(
            t.on_move(DragSample::new(-11.0, 9.0, 0.0)),
            MoveOutcome::Claimed(_)
        ));
        assert_eq!(t.state(), TrackerState::Dragging);
        assert!(!t.inner_scroll_enabled());

        // Once dragging, vertical drift no longer matters.
        assert!(matches!(
            t.on_move(DragSample::new(-40.0, 60.0, 0.0)),
            MoveOutcome::Moved(_)
        ));
    }

    #[test]
    fn test_move_applies_resistance_and_rotation() {
        let mut t = tracker();
        t.on_move(DragSample::new(20.0, 0.0, 0.1));
        let MoveOutcome::Moved(frame) = t.on_move(DragSample::new(100.0, 0.0, 0.2)) else {
            panic!("expected a move frame");
        };
        assert!((frame.transform.translate_x - 70.0).abs() < 1e-9);
        assert!((frame.transform.rotate_deg - 1.75).abs() < 1e-9);
        assert_eq!(frame.transform.opacity, 1.0);
        let session = t.session().unwrap();
        assert_eq!(session.origin_offset, 0.0);
        assert_eq!(session.raw_dx, 100.0);
        assert_eq!(session.velocity, 0.2);
    }

    #[test]
    fn test_lean_uses_unscaled_delta() {
        // Lean distance is 390 - 250 = 140 on the raw delta.
        let mut t = tracker();
        t.on_move(DragSample::new(-20.0, 0.0, 0.0));
        assert_eq!(t.lean(), Lean::None);
        let MoveOutcome::Moved(frame) = t.on_move(DragSample::new(-141.0, 0.0, 0.0)) else {
            panic!("expected a move frame");
        };
        assert_eq!(frame.lean, Lean::Left);
        t.on_move(DragSample::new(-140.0, 0.0, 0.0));
        assert_eq!(t.lean(), Lean::None);
        t.on_move(DragSample::new(150.0, 0.0, 0.0));
        assert_eq!(t.lean(), Lean::Right);
    }

    #[test]
    fn test_commit_left_runs_exit_animation_then_reports() {
        let mut t = dragging_tracker(-200.0, -0.5);
        assert_eq!(
            t.on_release(DragSample::new(-200.0, 3.0, -0.8)),
            Some(ReleaseDecision::Commit(Direction::Left))
        );
        assert_eq!(t.state(), TrackerState::Animating);
        assert_eq!(t.lean(), Lean::Left);
        assert!(!t.inner_scroll_enabled());

        let half = t.advance(ms(100)).unwrap();
        assert!(half.completion.is_none());
        assert!((half.transform.translate_x - -265.0).abs() < 1e-9);
        assert!((half.transform.opacity - 0.5).abs() < 1e-9);
        assert_eq!(half.transform.rotate_deg, -5.0);

        let last = t.advance(ms(100)).unwrap();
        assert_eq!(
            last.completion,
            Some(AnimationCompletion::Committed {
                direction: Direction::Left,
                entry_id: ProfileId::new("card"),
            })
        );
        assert_eq!(last.transform.translate_x, -390.0);
        assert_eq!(last.transform.opacity, 0.0);

        assert_eq!(t.state(), TrackerState::Idle);
        assert_eq!(t.transform(), CardTransform::IDENTITY);
        assert!(t.session().is_none());
        assert!(t.advance(ms(16)).is_none());
    }

    #[test]
    fn test_commit_right_exits_to_the_right() {
        let mut t = dragging_tracker(180.0, 0.4);
        assert_eq!(
            t.on_release(DragSample::new(180.0, 0.0, 0.4)),
            Some(ReleaseDecision::Commit(Direction::Right))
        );
        let frame = run_to_completion(&mut t);
        assert_eq!(frame.transform.translate_x, 390.0);
        assert!(matches!(
            frame.completion,
            Some(AnimationCompletion::Committed {
                direction: Direction::Right,
                ..
            })
        ));
    }

    #[test]
    fn test_small_slow_drag_cancels_and_springs_home() {
        let mut t = dragging_tracker(-50.0, -0.1);
        assert_eq!(
            t.on_release(DragSample::new(-50.0, 0.0, -0.1)),
            Some(ReleaseDecision::Cancel)
        );
        let frame = run_to_completion(&mut t);
        assert_eq!(frame.completion, Some(AnimationCompletion::Settled));
        assert_eq!(frame.transform.translate_x, 0.0);
        assert_eq!(t.transform(), CardTransform::IDENTITY);
        assert!(t.is_idle());
    }

    #[test]
    fn test_large_slow_drag_and_fast_flick_both_cancel() {
        let config = DeckConfig::default();
        assert_eq!(classify_release(&config, -300.0, -0.2), ReleaseDecision::Cancel);
        assert_eq!(classify_release(&config, -60.0, -2.0), ReleaseDecision::Cancel);
        assert_eq!(classify_release(&config, 300.0, -0.9), ReleaseDecision::Cancel);
    }

    #[test]
    fn test_release_thresholds_hold_for_random_drags() {
        let config = DeckConfig::default();
        let distance = config.commit_distance_px();
        let mut rng = rand::rng();
        for _ in 0..500 {
            let dx = rng.random_range(-2.0 * config.screen_width..-distance - 1e-6);
            let vx = rng.random_range(-4.0..-0.300_001);
            assert_eq!(
                classify_release(&config, dx, vx),
                ReleaseDecision::Commit(Direction::Left)
            );
            assert_eq!(
                classify_release(&config, -dx, -vx),
                ReleaseDecision::Commit(Direction::Right)
            );
        }
        for _ in 0..500 {
            let dx = rng.random_range(-2.0 * config.screen_width..2.0 * config.screen_width);
            let vx = rng.random_range(-4.0..4.0);
            let left = dx < -distance && vx < -0.3;
            let right = dx > distance && vx > 0.3;
            if !left && !right {
                assert_eq!(classify_release(&config, dx, vx), ReleaseDecision::Cancel);
            }
        }
    }

    #[test]
    fn test_inset_commit_distance_variant() {
        let config = DeckConfig {
            commit_distance: crate::core::config::CommitDistance::InsetFromEdge(150.0),
            commit_velocity: 0.7,
            ..DeckConfig::default()
        };
        assert_eq!(classify_release(&config, -200.0, -1.0), ReleaseDecision::Cancel);
        assert_eq!(
            classify_release(&config, -241.0, -0.71),
            ReleaseDecision::Commit(Direction::Left)
        );
    }

    #[test]
    fn test_termination_mid_drag_springs_back_without_commit() {
        let mut t = dragging_tracker(300.0, 1.0);
        assert_eq!(t.on_terminate(), Some(ReleaseDecision::Cancel));
        let frame = run_to_completion(&mut t);
        assert_eq!(frame.completion, Some(AnimationCompletion::Settled));
        assert!(t.is_idle());
    }

    #[test]
    fn test_events_outside_a_drag_are_ignored() {
        let mut t = tracker();
        assert_eq!(t.on_release(DragSample::new(-300.0, 0.0, -2.0)), None);
        assert_eq!(t.on_terminate(), None);
        assert!(t.advance(ms(16)).is_none());

        let mut t = dragging_tracker(-200.0, -1.0);
        t.on_release(DragSample::new(-200.0, 0.0, -1.0));
        assert_eq!(t.on_move(DragSample::new(50.0, 0.0, 1.0)), MoveOutcome::Ignored);
        assert_eq!(t.on_release(DragSample::new(50.0, 0.0, 1.0)), None);
        assert_eq!(t.on_terminate(), None);
        assert_eq!(t.state(), TrackerState::Animating);
    }

    #[test]
    fn test_transform_rotation_is_clamped_during_drag() {
        let mut t = tracker();
        t.on_move(DragSample::new(20.0, 0.0, 0.0));
        t.on_move(DragSample::new(1_000.0, 0.0, 0.0));
        let transform = t.transform();
        assert!((transform.translate_x - 700.0).abs() < 1e-9);
        assert_eq!(transform.rotate_deg, 5.0);
    }
}
