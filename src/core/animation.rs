/*
 * Time-driven animation primitives used by the gesture tracker. Nothing here owns a
 * clock: the presentation layer reports elapsed frame time and each primitive is
 * stepped by that amount. `LinearTween` drives the commit exit, `Spring` the
 * snap-back after a cancelled drag.
 */
use crate::core::config::{RotationRange, SpringConfig};
use std::time::Duration;

// Largest integration step for the spring, in seconds.
const SPRING_MAX_STEP_SECS: f64 = 0.001;
// A spring still moving after this long is snapped onto its target.
const SPRING_MAX_SETTLE_SECS: f64 = 3.0;

/*
 * Maps a horizontal offset to a card rotation. Linear between
 * `-offset_extent..=offset_extent` and clamped outside it.
 */
pub fn rotation_for_offset(offset: f64, range: &RotationRange) -> f64 {
    if range.offset_extent <= 0.0 {
        return 0.0;
    }
    let t = (offset / range.offset_extent).clamp(-1.0, 1.0);
    t * range.max_degrees
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTween {
    from: f64,
    to: f64,
    duration: Duration,
    elapsed: Duration,
}

impl LinearTween {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        LinearTween {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    // Returns true once the tween has reached its end value.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    pub fn value(&self) -> f64 {
        self.from + (self.to - self.from) * self.progress()
    }
}

/*
 * Damped harmonic spring pulling `position` towards `target`. Integrated with
 * semi-implicit Euler in sub-steps of at most one millisecond, so the trajectory
 * does not depend on how the caller slices frame time. Once both displacement and
 * speed fall under the rest thresholds the spring snaps exactly onto its target.
 * The same snap happens unconditionally after `SPRING_MAX_SETTLE_SECS`.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    config: SpringConfig,
    at_rest: bool,
    elapsed_secs: f64,
}

impl Spring {
    pub fn new(position: f64, target: f64, config: SpringConfig) -> Self {
        let mut spring = Spring {
            position,
            velocity: 0.0,
            target,
            config,
            at_rest: false,
            elapsed_secs: 0.0,
        };
        spring.settle_if_resting();
        spring
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    // Returns true once the spring has come to rest on its target.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.at_rest {
            return true;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 && !self.at_rest {
            let step = remaining.min(SPRING_MAX_STEP_SECS);
            self.integrate(step);
            remaining -= step;
            self.elapsed_secs += step;
            self.settle_if_resting();
            if !self.at_rest && self.elapsed_secs >= SPRING_MAX_SETTLE_SECS {
                log::warn!(
                    "Spring: Not at rest after {SPRING_MAX_SETTLE_SECS}s (x={:.3}), snapping",
                    self.position
                );
                self.snap_to_target();
            }
        }
        self.at_rest
    }

    fn integrate(&mut self, step: f64) {
        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;
        let displacement = self.position - self.target;
        let acceleration = (-stiffness * displacement - damping * self.velocity) / mass;
        self.velocity += acceleration * step;
        self.position += self.velocity * step;
    }

    fn settle_if_resting(&mut self) {
        let near = (self.position - self.target).abs() <= self.config.rest_displacement;
        let slow = self.velocity.abs() <= self.config.rest_speed;
        if near && slow {
            self.snap_to_target();
        }
    }

    fn snap_to_target(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }
}
