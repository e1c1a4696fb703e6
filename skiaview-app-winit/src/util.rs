//! Handy utilities

/// Useful for cases where you want to do something once per time interval.
#[derive(Default)]
pub struct PeriodicEvent {
    last_time_triggered: Option<std::time::Instant>,
}

impl PeriodicEvent {
    /// Call try_take_event to see if the required time has elapsed. It will return true only once
    /// enough time has passed since it last returned true.
    pub fn try_take_event(
        &mut self,
        current_time: std::time::Instant,
        wait_duration: std::time::Duration,
    ) -> bool {
        match self.last_time_triggered {
            None => {
                self.last_time_triggered = Some(current_time);
                true
            }
            Some(last_time_triggered) => {
                if current_time.saturating_duration_since(last_time_triggered) >= wait_duration {
                    self.last_time_triggered = Some(current_time);
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn fires_first_time_then_once_per_interval() {
        let start = Instant::now();
        let second = Duration::from_secs(1);
        let mut event = PeriodicEvent::default();

        assert!(event.try_take_event(start, second));
        assert!(!event.try_take_event(start + Duration::from_millis(500), second));
        assert!(event.try_take_event(start + Duration::from_millis(1000), second));
        assert!(!event.try_take_event(start + Duration::from_millis(1999), second));
        assert!(event.try_take_event(start + Duration::from_millis(2500), second));
    }

    #[test]
    fn earlier_instant_does_not_fire() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut event = PeriodicEvent::default();
        assert!(event.try_take_event(start, Duration::from_secs(1)));
        assert!(!event.try_take_event(start - Duration::from_secs(5), Duration::from_secs(1)));
    }
}
