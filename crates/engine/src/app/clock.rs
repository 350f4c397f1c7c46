use std::thread;
use std::time::{Duration, Instant};

/// Frame pacer: sleeps to honour a frame-rate cap and reports the elapsed
/// time since the previous tick, clamped to `max_frame_delta`.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    max_frame_delta: Duration,
}

impl FrameClock {
    pub fn new(max_frame_delta: Duration) -> Self {
        Self {
            last_tick: Instant::now(),
            max_frame_delta: normalize_non_zero_duration(
                max_frame_delta,
                Duration::from_millis(250),
            ),
        }
    }

    pub fn tick(&mut self, target_fps: Option<u32>) -> Duration {
        let elapsed = Instant::now().saturating_duration_since(self.last_tick);
        let cap_sleep = compute_cap_sleep(elapsed, target_frame_duration(target_fps));
        if cap_sleep > Duration::ZERO {
            thread::sleep(cap_sleep);
        }

        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        clamp_frame_delta(raw_frame_dt, self.max_frame_delta)
    }
}

pub(crate) fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

pub(crate) fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

pub(crate) fn normalize_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_fps: Option<u32>) -> Option<Duration> {
    normalize_fps_cap(max_fps).map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(600), max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn target_frame_duration_ignores_missing_or_zero_cap() {
        assert_eq!(target_frame_duration(None), None);
        assert_eq!(target_frame_duration(Some(0)), None);
        let duration = target_frame_duration(Some(60)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn cap_sleep_only_when_under_budget() {
        let target = target_frame_duration(Some(60));
        assert_eq!(compute_cap_sleep(Duration::from_millis(20), target), Duration::ZERO);
        assert!(compute_cap_sleep(Duration::from_millis(5), target) > Duration::ZERO);
    }

    #[test]
    fn tick_never_exceeds_max_frame_delta() {
        let mut clock = FrameClock::new(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(10));
        assert!(clock.tick(None) <= Duration::from_millis(5));
    }
}
