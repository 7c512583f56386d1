//! Shared values and their in-flight transitions.
//!
//! Every position the engine tracks is a [`SharedValue`]: a logical value used
//! for synchronous geometry math, a display value the host renders, and an
//! optional [`Transition`] that moves the display value over time.
//!
//! # Invariants
//!
//! 1. A running transition only ever writes the display value.
//! 2. The logical value is authoritative only while [`SharedValue::is_settled`]
//!    returns true. Owners commit the logical value themselves once `tick`
//!    reports [`Tick::Finished`].
//! 3. [`SharedValue::stop`] freezes the display value where it is and commits
//!    it to the logical value, so both views agree after a stop.
//!
//! Time is driven by the host through `tick(dt)`; there is no clock inside
//! the engine.

use std::time::Duration;

/// Nominal frame length used by the decay rest detection.
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Per-frame movement below which a decay is considered at rest.
const DECAY_REST_DELTA: f64 = 0.1;

/// Easing curves for timed transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Damped spring-like overshoot; `bounciness` 1 gives a single soft bounce.
    Elastic { bounciness: f64 },
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto eased progress.
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Elastic { bounciness } => {
                let p = bounciness * std::f64::consts::PI;
                1.0 - (t * std::f64::consts::FRAC_PI_2).cos().powi(3) * (t * p).cos()
            }
        }
    }
}

/// How a transition moves its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Move to `to` over `duration`.
    Timing {
        to: f64,
        duration: Duration,
        easing: Easing,
    },
    /// Coast with an initial `velocity` (units per ms) that decays by
    /// `deceleration` every millisecond.
    Decay { velocity: f64, deceleration: f64 },
}

impl Motion {
    pub fn timing(to: f64, duration: Duration, easing: Easing) -> Self {
        Motion::Timing {
            to,
            duration,
            easing,
        }
    }

    pub fn decay(velocity: f64, deceleration: f64) -> Self {
        Motion::Decay {
            velocity,
            deceleration,
        }
    }
}

/// An in-flight transition of a display value.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: f64,
    motion: Motion,
    elapsed: Duration,
}

impl Transition {
    pub fn new(from: f64, motion: Motion) -> Self {
        Self {
            from,
            motion,
            elapsed: Duration::ZERO,
        }
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Value at the current elapsed time.
    pub fn sample(&self) -> f64 {
        self.value_at(self.elapsed.as_secs_f64() * 1000.0)
    }

    /// Value the transition rests at once finished.
    pub fn end_value(&self) -> f64 {
        self.value_at(self.end_ms())
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed.as_secs_f64() * 1000.0 >= self.end_ms()
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    fn end_ms(&self) -> f64 {
        match self.motion {
            Motion::Timing { duration, .. } => duration.as_secs_f64() * 1000.0,
            Motion::Decay {
                velocity,
                deceleration,
            } => {
                let k = 1.0 - deceleration;
                let frame_delta = velocity.abs() * FRAME_MS;
                if k <= 0.0 || frame_delta < DECAY_REST_DELTA {
                    0.0
                } else {
                    (frame_delta / DECAY_REST_DELTA).ln() / k
                }
            }
        }
    }

    fn value_at(&self, ms: f64) -> f64 {
        match self.motion {
            Motion::Timing {
                to,
                duration,
                easing,
            } => {
                let total = duration.as_secs_f64() * 1000.0;
                let progress = if total <= 0.0 { 1.0 } else { ms / total };
                self.from + (to - self.from) * easing.ease(progress)
            }
            Motion::Decay {
                velocity,
                deceleration,
            } => {
                let k = 1.0 - deceleration;
                if k <= 0.0 {
                    return self.from;
                }
                let ms = ms.min(self.end_ms());
                self.from + (velocity / k) * (1.0 - (-k * ms).exp())
            }
        }
    }
}

/// Outcome of advancing a [`SharedValue`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// No transition was running.
    Idle,
    /// A transition is still in flight.
    Running,
    /// The transition finished this tick at the given value.
    Finished(f64),
}

/// A logical value paired with an animatable display value.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedValue {
    value: f64,
    display: f64,
    transition: Option<Transition>,
}

impl SharedValue {
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            display: initial,
            transition: None,
        }
    }

    /// The logical value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value currently presented.
    #[inline]
    pub fn display(&self) -> f64 {
        self.display
    }

    /// True when no transition is in flight.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.transition.is_none()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Update the logical value only.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Update the display value only. Any running transition is dropped.
    pub fn set_display(&mut self, display: f64) {
        self.transition = None;
        self.display = display;
    }

    /// Update both views at once.
    pub fn set(&mut self, value: f64) {
        self.set_display(value);
        self.value = value;
    }

    /// Start a transition from the current display value, replacing any
    /// running one.
    pub fn animate(&mut self, motion: Motion) {
        self.transition = Some(Transition::new(self.display, motion));
    }

    /// Stop a running transition and commit its current position.
    ///
    /// Returns true if a transition was running.
    pub fn stop(&mut self) -> bool {
        match self.transition.take() {
            Some(_) => {
                self.value = self.display;
                true
            }
            None => false,
        }
    }

    /// Advance the running transition by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Tick {
        let Some(transition) = self.transition.as_mut() else {
            return Tick::Idle;
        };

        transition.advance(dt);
        if transition.is_finished() {
            let end = transition.end_value();
            self.display = end;
            self.transition = None;
            Tick::Finished(end)
        } else {
            self.display = transition.sample();
            Tick::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_setters_are_independent() {
        let mut value = SharedValue::new(0.0);
        assert_eq!(value.value(), 0.0);
        assert_eq!(value.display(), 0.0);

        value.set_value(1.0);
        assert_eq!(value.value(), 1.0);
        assert_eq!(value.display(), 0.0);

        value.set_display(2.0);
        assert_eq!(value.value(), 1.0);
        assert_eq!(value.display(), 2.0);

        value.set(3.0);
        assert_eq!((value.value(), value.display()), (3.0, 3.0));
    }

    #[test]
    fn test_elastic_easing_endpoints() {
        let easing = Easing::Elastic { bounciness: 1.0 };
        assert!(easing.ease(0.0).abs() < EPSILON);
        assert!((easing.ease(1.0) - 1.0).abs() < EPSILON);
        assert_eq!(Easing::Linear.ease(0.25), 0.25);
    }

    #[test]
    fn test_timing_defers_logical_value() {
        let mut value = SharedValue::new(0.0);
        value.animate(Motion::timing(100.0, Duration::from_millis(500), Easing::Linear));

        assert_eq!(value.tick(Duration::from_millis(250)), Tick::Running);
        assert!((value.display() - 50.0).abs() < EPSILON);
        assert_eq!(value.value(), 0.0);
        assert!(!value.is_settled());

        assert_eq!(value.tick(Duration::from_millis(250)), Tick::Finished(100.0));
        assert_eq!(value.display(), 100.0);
        assert_eq!(value.value(), 0.0);
        assert!(value.is_settled());
    }

    #[test]
    fn test_stop_commits_current_position() {
        let mut value = SharedValue::new(0.0);
        value.animate(Motion::timing(100.0, Duration::from_millis(100), Easing::Linear));
        value.tick(Duration::from_millis(40));

        assert!(value.stop());
        assert!((value.value() - 40.0).abs() < EPSILON);
        assert_eq!(value.value(), value.display());
        assert!(!value.stop());
    }

    #[test]
    fn test_tick_without_transition_is_idle() {
        let mut value = SharedValue::new(7.0);
        assert_eq!(value.tick(Duration::from_millis(16)), Tick::Idle);
    }

    #[test]
    fn test_decay_moves_towards_rest_and_finishes() {
        let mut value = SharedValue::new(0.0);
        value.animate(Motion::decay(1.0, 0.994));

        let rest = value.transition().map(Transition::end_value).unwrap_or_default();
        assert!(rest > 0.0 && rest < 1.0 / 0.006);

        let mut previous = 0.0;
        let mut finished = None;
        for _ in 0..10_000 {
            match value.tick(Duration::from_millis(16)) {
                Tick::Running => {
                    assert!(value.display() >= previous);
                    previous = value.display();
                }
                Tick::Finished(end) => {
                    finished = Some(end);
                    break;
                }
                Tick::Idle => unreachable!(),
            }
        }

        assert_eq!(finished, Some(rest));
    }

    #[test]
    fn test_decay_without_velocity_finishes_immediately() {
        let mut value = SharedValue::new(12.0);
        value.animate(Motion::decay(0.0, 0.994));
        assert_eq!(value.tick(Duration::from_millis(1)), Tick::Finished(12.0));
    }
}
