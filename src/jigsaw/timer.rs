use crate::utils::prelude::*;

/// A tick-driven clock. With a reset duration it behaves as a countdown
/// whose progress runs 0 to 1; without one it is a plain stopwatch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Timer {
    elapsed: Duration,
    reset: Option<Duration>,
}

impl Timer {
    /// A clock that only counts up.
    pub fn stopwatch() -> Timer {
        Timer { elapsed: Duration::ZERO, reset: None }
    }

    /// A clock that expires once `reset` has elapsed.
    pub fn countdown(reset: Duration) -> Timer {
        Timer { elapsed: Duration::ZERO, reset: Some(reset) }
    }

    /// Advances the clock by one tick's worth of time.
    pub fn update(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    /// Elapsed time as a fraction of the reset duration, unclamped.
    /// Stopwatches report 0.
    pub fn progress(&self) -> f64 {
        match self.reset {
            Some(reset) if !reset.is_zero() => self.elapsed.as_secs_f64() / reset.as_secs_f64(),
            _                               => 0.0
        }
    }

    /// Time left before expiry, saturating at zero.
    pub fn remaining(&self) -> Duration {
        self.reset.unwrap_or_default().saturating_sub(self.elapsed)
    }

    /// Whether a countdown has run out. Stopwatches never expire.
    pub fn expired(&self) -> bool {
        self.reset.is_some_and(|reset| self.elapsed >= reset)
    }

    /// Rewinds the clock to zero, keeping the reset duration.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Installs a new reset duration without rewinding.
    pub fn set_reset(&mut self, reset: Duration) {
        self.reset = Some(reset);
    }

    /// Forces the clock to its expiry point so `remaining` reads zero.
    pub fn expire(&mut self) {
        if let Some(reset) = self.reset {
            self.elapsed = reset;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

// A timer slot typing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKey {
    /// The overall game clock: stopwatch in a race, deadline in time attack.
    Game = 0,
    /// Paces one cpu placement; reset to the solver's jittered delay.
    CpuMove = 1,
    /// Drives the synchronized scramble animation.
    Scramble = 2,
}

/// The fixed set of clocks a board carries, indexed by key.
#[derive(Clone, Copy, Debug)]
pub struct TimerSet {
    timers: [Timer; 3],
}

impl TimerSet {
    /// Builds the set around a preconfigured game clock; the cpu-move timer
    /// starts as a bare stopwatch until a solver installs its delay, and the
    /// scramble countdown is fixed.
    pub fn new(game: Timer, scramble: Duration) -> TimerSet {
        TimerSet {
            timers: [game, Timer::stopwatch(), Timer::countdown(scramble)],
        }
    }

    pub fn get(&self, key: TimerKey) -> &Timer {
        &self.timers[key as usize]
    }

    pub fn get_mut(&mut self, key: TimerKey) -> &mut Timer {
        &mut self.timers[key as usize]
    }

    /// Advances a single clock.
    pub fn update(&mut self, key: TimerKey, dt: Duration) {
        self.timers[key as usize].update(dt);
    }

    /// Advances every clock at once.
    pub fn update_all(&mut self, dt: Duration) {
        for timer in &mut self.timers {
            timer.update(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_progress_and_expiry() {
        let mut t = Timer::countdown(Duration::from_millis(1000));
        t.update(Duration::from_millis(250));
        assert!((t.progress() - 0.25).abs() < 1e-9);
        assert!(!t.expired());
        t.update(Duration::from_millis(750));
        assert!(t.expired());
        assert_eq!(t.remaining(), Duration::ZERO);
    }

    #[test]
    fn expire_clamps_remaining_to_zero() {
        let mut t = Timer::countdown(Duration::from_millis(500));
        t.update(Duration::from_millis(100));
        t.expire();
        assert_eq!(t.remaining(), Duration::ZERO);
        assert!(t.expired());
    }

    #[test]
    fn stopwatch_never_expires() {
        let mut t = Timer::stopwatch();
        t.update(Duration::from_secs(3600));
        assert!(!t.expired());
        assert_eq!(t.progress(), 0.0);
        assert_eq!(t.elapsed(), Duration::from_secs(3600));
    }

    #[test]
    fn set_indexes_by_key() {
        let mut set = TimerSet::new(Timer::stopwatch(), Duration::from_millis(1000));
        set.get_mut(TimerKey::CpuMove).set_reset(Duration::from_millis(200));
        set.update(TimerKey::CpuMove, Duration::from_millis(100));
        assert!((set.get(TimerKey::CpuMove).progress() - 0.5).abs() < 1e-9);
        assert_eq!(set.get(TimerKey::Game).elapsed(), Duration::ZERO);
    }
}
