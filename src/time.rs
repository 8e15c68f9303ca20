//! Fixed-timestep clock for the answer countdown.
//!
//! `draw_web()` fires at display refresh rate with a variable delta; the
//! clock turns that into whole ticks of `tick_ms` so session logic only ever
//! sees discrete steps.

use crate::games::quiz::config::TimerConfig;

/// Longest frame gap credited to the clock. A backgrounded tab resumes
/// without a burst of timeouts.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct TickClock {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    last_timestamp: Option<f64>,
}

impl TickClock {
    pub fn new(config: &TimerConfig) -> Self {
        Self {
            ms_per_tick: config.ms_per_tick(),
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a `performance.now()` timestamp; returns ticks due this frame.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> TickClock {
        TickClock::new(&TimerConfig::default())
    }

    #[test]
    fn first_frame_is_zero() {
        let mut c = clock();
        assert_eq!(c.advance(12_345.0), 0);
    }

    #[test]
    fn one_tick_per_200ms() {
        let mut c = clock();
        c.advance(0.0);
        assert_eq!(c.advance(199.0), 0);
        assert_eq!(c.advance(200.0), 1);
    }

    #[test]
    fn remainder_carries() {
        let mut c = clock();
        c.advance(0.0);
        assert_eq!(c.advance(300.0), 1);
        assert_eq!(c.advance(400.0), 1);
    }

    #[test]
    fn long_gap_is_clamped() {
        let mut c = clock();
        c.advance(0.0);
        assert_eq!(c.advance(60_000.0), 2);
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let mut c = clock();
        c.advance(1000.0);
        assert_eq!(c.advance(900.0), 0);
        assert_eq!(c.advance(1100.0), 1);
    }

    #[test]
    fn steady_60fps_gives_five_ticks_a_second() {
        let mut c = clock();
        c.advance(0.0);
        let total: u32 = (1..=60).map(|i| c.advance(i as f64 * 16.667)).sum();
        assert!((4..=6).contains(&total), "expected ~5 ticks, got {}", total);
    }

    #[test]
    fn custom_tick_length() {
        let mut c = TickClock::new(&TimerConfig { tick_ms: 100, seconds_per_tick: 0.1 });
        c.advance(0.0);
        assert_eq!(c.advance(350.0), 3);
    }

    #[test]
    fn tick_length_need_not_divide_a_second() {
        let mut c = TickClock::new(&TimerConfig { tick_ms: 300, seconds_per_tick: 0.3 });
        c.advance(0.0);
        assert_eq!(c.advance(299.0), 0);
        assert_eq!(c.advance(300.0), 1);
        assert_eq!(c.advance(600.0), 1);

        let mut c = TickClock::new(&TimerConfig { tick_ms: 400, seconds_per_tick: 0.4 });
        c.advance(0.0);
        assert_eq!(c.advance(400.0), 1);
        assert_eq!(c.advance(800.0), 1);
    }
}
