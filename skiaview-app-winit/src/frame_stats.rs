//! Tracks frame timing for a skiaview App

use std::time;

// Weight of the previous estimate when smoothing frames per second
const SMOOTHING_FACTOR: f32 = 0.95;

/// Frame timing captured on every redraw: when the app started, how long the previous frame took
/// and an estimate of frames per second
pub struct FrameStats {
    app_start_instant: time::Instant,
    current_instant: time::Instant,
    previous_frame_time: time::Duration,
    frames_per_second: f32,
    frames_per_second_smoothed: f32,
    frame_count: u64,
}

impl FrameStats {
    /// Create a new FrameStats. Default is not allowed because the current time affects the object
    #[allow(clippy::new_without_default)]
    pub fn new() -> FrameStats {
        let now_instant = time::Instant::now();
        FrameStats {
            app_start_instant: now_instant,
            current_instant: now_instant,
            previous_frame_time: time::Duration::ZERO,
            frames_per_second: 0.0,
            frames_per_second_smoothed: 0.0,
            frame_count: 0,
        }
    }

    /// Call once per frame to capture time passing
    pub fn update(&mut self) {
        let now_instant = time::Instant::now();
        let elapsed = now_instant.saturating_duration_since(self.current_instant);
        self.record_frame(elapsed);
    }

    /// Records a frame that took `elapsed`
    pub fn record_frame(
        &mut self,
        elapsed: time::Duration,
    ) {
        self.current_instant += elapsed;
        self.previous_frame_time = elapsed;

        let dt = elapsed.as_secs_f32();
        let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };

        self.frames_per_second = fps;
        self.frames_per_second_smoothed = (self.frames_per_second_smoothed * SMOOTHING_FACTOR)
            + (fps * (1.0 - SMOOTHING_FACTOR));

        self.frame_count += 1;
    }

    /// `std::time::Instant` at the start of the most recent frame
    pub fn current_instant(&self) -> time::Instant {
        self.current_instant
    }

    /// Time passed since the app started, as accumulated by frames
    pub fn total_time(&self) -> time::Duration {
        self.current_instant - self.app_start_instant
    }

    pub fn previous_frame_time(&self) -> time::Duration {
        self.previous_frame_time
    }

    /// estimate of frames per second based on the previous frame
    pub fn frames_per_second(&self) -> f32 {
        self.frames_per_second
    }

    /// estimate of frames per second smoothed over time
    pub fn frames_per_second_smoothed(&self) -> f32 {
        self.frames_per_second_smoothed
    }

    /// Total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    #[test]
    fn records_frame_time_and_fps() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(20));

        assert_eq!(stats.frame_count(), 1);
        assert_eq!(stats.previous_frame_time(), Duration::from_millis(20));
        assert_eq!(stats.total_time(), Duration::from_millis(20));
        assert_relative_eq!(stats.frames_per_second(), 50.0, epsilon = 1e-3);
        assert_relative_eq!(stats.frames_per_second_smoothed(), 2.5, epsilon = 1e-3);
    }

    #[test]
    fn total_time_starts_at_zero() {
        let stats = FrameStats::new();
        assert_eq!(stats.total_time(), Duration::ZERO);
        assert_eq!(stats.frame_count(), 0);
    }

    #[test]
    fn zero_length_frame_has_zero_fps() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::ZERO);
        assert_eq!(stats.frames_per_second(), 0.0);
        assert_eq!(stats.frame_count(), 1);
    }

    #[test]
    fn smoothed_estimate_converges() {
        let mut stats = FrameStats::new();
        for _ in 0..500 {
            stats.record_frame(Duration::from_millis(10));
        }
        assert_relative_eq!(stats.frames_per_second_smoothed(), 100.0, epsilon = 0.1);
        assert_eq!(stats.total_time(), Duration::from_secs(5));
    }
}
