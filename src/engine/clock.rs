/// Input time base
///
/// Provides the millisecond clock the input manager stamps recordings and
/// playback with. The clock is either driven by the system monotonic timer or
/// advanced explicitly by the caller; the mode is fixed at construction.
use std::time::Instant;

/// How the input clock advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Read the system monotonic timer
    #[default]
    System,
    /// Advanced only through `advance()`
    External,
}

/// Monotonic millisecond clock
#[derive(Debug, Clone)]
pub struct InputClock {
    mode: ClockMode,

    /// Time when the clock was created (system mode)
    start_time: Instant,

    /// Whole milliseconds accumulated (external mode)
    elapsed_ms: u64,

    /// Sub-millisecond remainder carried between advances
    remainder_ms: f64,

    /// Number of ticks (one per manager update)
    tick_count: u64,
}

impl InputClock {
    /// Create a new clock in the given mode
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            start_time: Instant::now(),
            elapsed_ms: 0,
            remainder_ms: 0.0,
            tick_count: 0,
        }
    }

    /// Clock mode selected at construction
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Current time in milliseconds since the clock started
    pub fn now_ms(&self) -> u64 {
        match self.mode {
            ClockMode::System => {
                Instant::now().duration_since(self.start_time).as_millis() as u64
            }
            ClockMode::External => self.elapsed_ms,
        }
    }

    /// Advance an external clock by `delta_seconds`.
    ///
    /// Returns false (and leaves the clock untouched) for a system clock.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        if self.mode != ClockMode::External {
            return false;
        }
        // Also rejects NaN and infinite steps
        if !(delta_seconds.is_finite() && delta_seconds > 0.0) {
            return true;
        }

        let total = f64::from(delta_seconds) * 1000.0 + self.remainder_ms;
        let whole = total.trunc();
        self.remainder_ms = total - whole;
        self.elapsed_ms += whole as u64;
        true
    }

    /// Record one manager update
    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    /// Number of manager updates so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for InputClock {
    fn default() -> Self {
        Self::new(ClockMode::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_clock_creation() {
        let clock = InputClock::new(ClockMode::External);
        assert_eq!(clock.mode(), ClockMode::External);
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.tick_count(), 0);
    }

    #[test]
    fn test_external_advance_carries_remainder() {
        let mut clock = InputClock::new(ClockMode::External);

        // 0.4ms three times: 1.2ms in total
        assert!(clock.advance(0.0004));
        assert!(clock.advance(0.0004));
        assert_eq!(clock.now_ms(), 0);
        assert!(clock.advance(0.0004));
        assert_eq!(clock.now_ms(), 1);
    }

    #[test]
    fn test_external_advance_whole_frames() {
        let mut clock = InputClock::new(ClockMode::External);
        clock.advance(0.016);
        clock.advance(0.016);
        assert_eq!(clock.now_ms(), 32);
    }

    #[test]
    fn test_external_advance_ignores_invalid_steps() {
        let mut clock = InputClock::new(ClockMode::External);
        clock.advance(0.0104);
        for step in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.5] {
            assert!(clock.advance(step));
        }
        assert_eq!(clock.now_ms(), 10);

        // The carried remainder survives
        clock.advance(0.0008);
        assert_eq!(clock.now_ms(), 11);
    }

    #[test]
    fn test_system_clock_ignores_advance() {
        let mut clock = InputClock::new(ClockMode::System);
        assert!(!clock.advance(10.0));
        assert!(clock.now_ms() < 10_000);
    }

    #[test]
    fn test_system_clock_elapsed() {
        let clock = InputClock::new(ClockMode::System);
        thread::sleep(Duration::from_millis(10));
        assert!(clock.now_ms() >= 10);
    }

    #[test]
    fn test_tick_counting() {
        let mut clock = InputClock::default();
        clock.tick();
        clock.tick();
        assert_eq!(clock.tick_count(), 2);
    }
}
