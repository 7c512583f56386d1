//! Restartable one-shot delay driven by host ticks.

use std::time::Duration;

/// A cancellable, restartable delay.
///
/// The owner decides what happens when it fires; the timer only reports it.
#[derive(Debug, Clone)]
pub struct SettleTimer {
    delay: Duration,
    remaining: Option<Duration>,
}

impl SettleTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            remaining: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Arm the timer with the full delay, replacing any pending countdown.
    pub fn start(&mut self) {
        self.remaining = Some(self.delay);
    }

    /// Disarm without firing.
    pub fn clear(&mut self) {
        self.remaining = None;
    }

    /// Restart the countdown if one is pending.
    pub fn restart(&mut self) {
        if self.is_pending() {
            self.start();
        }
    }

    /// Advance by `dt`. Returns true exactly once, when the delay elapses.
    pub fn tick(&mut self, dt: Duration) -> bool {
        match self.remaining {
            Some(remaining) if remaining <= dt => {
                self.remaining = None;
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - dt);
                false
            }
            None => false,
        }
    }

    /// Fire immediately if pending.
    pub fn fire_now(&mut self) -> bool {
        self.remaining.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timer = SettleTimer::new(Duration::from_millis(2000));
        timer.start();

        assert!(!timer.tick(Duration::from_millis(1999)));
        assert!(timer.tick(Duration::from_millis(1)));
        assert!(!timer.tick(Duration::from_millis(5000)));
    }

    #[test]
    fn test_clear_cancels() {
        let mut timer = SettleTimer::new(Duration::from_millis(100));
        timer.start();
        timer.clear();
        assert!(!timer.tick(Duration::from_millis(200)));
    }

    #[test]
    fn test_restart_only_when_pending() {
        let mut timer = SettleTimer::new(Duration::from_millis(100));
        timer.restart();
        assert!(!timer.is_pending());

        timer.start();
        timer.tick(Duration::from_millis(90));
        timer.restart();
        assert!(!timer.tick(Duration::from_millis(90)));
        assert!(timer.tick(Duration::from_millis(10)));
    }

    #[test]
    fn test_fire_now() {
        let mut timer = SettleTimer::new(Duration::from_millis(100));
        assert!(!timer.fire_now());
        timer.start();
        assert!(timer.fire_now());
        assert!(!timer.is_pending());
    }
}
