use std::time::Duration;

use crate::game::GameConfig;
use crate::game::config::{MAX_TICK_RATE, MIN_TICK_RATE};

/// Picks how long to wait before the next tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickScheduler {
    normal: Duration,
    boosted: Duration,
    menu: Duration,
}

impl TickScheduler {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            normal: period(config.normal_tick_rate),
            boosted: period(config.boosted_tick_rate),
            menu: period(config.menu_tick_rate),
        }
    }

    /// Wait before the next tick.
    ///
    /// Overlays (pause menu, confirmation, game over) use the menu rate so the
    /// UI stays responsive; otherwise the boost decides between the two game rates.
    pub fn interval(&self, overlay_shown: bool, boosted: bool) -> Duration {
        if overlay_shown {
            self.menu
        } else if boosted {
            self.boosted
        } else {
            self.normal
        }
    }
}

/// Time between ticks at `rate_hz`, clamped to the accepted rate range
fn period(rate_hz: f64) -> Duration {
    let slowest = Duration::from_secs_f64(1.0 / MIN_TICK_RATE);
    Duration::try_from_secs_f64(1.0 / rate_hz.clamp(MIN_TICK_RATE, MAX_TICK_RATE))
        .unwrap_or(slowest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals() {
        let scheduler = TickScheduler::new(&GameConfig::default());

        assert_eq!(scheduler.interval(false, false), Duration::from_millis(200));
        assert_eq!(scheduler.interval(false, true), Duration::from_millis(100));
        assert_eq!(
            scheduler.interval(true, false),
            Duration::from_secs_f64(1.0 / 30.0)
        );
    }

    #[test]
    fn test_overlay_ignores_boost() {
        let scheduler = TickScheduler::new(&GameConfig::default());
        assert_eq!(scheduler.interval(true, true), scheduler.interval(true, false));
    }

    #[test]
    fn test_boost_is_faster() {
        let config = GameConfig {
            normal_tick_rate: 8.0,
            boosted_tick_rate: 12.0,
            ..Default::default()
        };
        let scheduler = TickScheduler::new(&config);
        assert!(scheduler.interval(false, true) < scheduler.interval(false, false));
    }

    #[test]
    fn test_degenerate_rates_are_clamped() {
        let config = GameConfig {
            normal_tick_rate: 1e-320,
            boosted_tick_rate: f64::INFINITY,
            menu_tick_rate: f64::NAN,
            ..Default::default()
        };
        let scheduler = TickScheduler::new(&config);

        assert_eq!(scheduler.interval(false, false), Duration::from_secs(10));
        let fastest = scheduler.interval(false, true);
        assert!(fastest > Duration::from_micros(999) && fastest < Duration::from_micros(1001));
        assert_eq!(scheduler.interval(true, false), Duration::from_secs(10));
    }
}
