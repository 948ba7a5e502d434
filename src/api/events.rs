use std::time::{Duration, Instant};

use tracing::debug;

use super::throttle::ResizeThrottle;

/// Host event listeners of one chart: window resize and legend clicks.
///
/// Attaching and detaching are idempotent; a detached binding ignores
/// every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventBinding {
    resize: Option<ResizeThrottle>,
}

impl EventBinding {
    pub fn attach(&mut self, throttle: Duration) {
        if self.resize.is_none() {
            debug!(throttle_ms = throttle.as_millis() as u64, "attach event handlers");
            self.resize = Some(ResizeThrottle::new(throttle));
        }
    }

    pub fn detach(&mut self) {
        if self.resize.take().is_some() {
            debug!("detach event handlers");
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.resize.is_some()
    }

    pub fn on_window_resize(&mut self, now: Instant) -> bool {
        self.resize
            .as_mut()
            .is_some_and(|throttle| throttle.on_event(now))
    }

    pub fn poll_resize(&mut self, now: Instant) -> bool {
        self.resize
            .as_mut()
            .is_some_and(|throttle| throttle.poll(now))
    }
}

#[cfg(test)]
mod tests {
    use super::EventBinding;
    use std::time::{Duration, Instant};

    #[test]
    fn detached_binding_ignores_events() {
        let mut binding = EventBinding::default();
        assert!(!binding.on_window_resize(Instant::now()));
        binding.attach(Duration::from_millis(10));
        binding.attach(Duration::from_millis(999));
        assert!(binding.on_window_resize(Instant::now()));
        binding.detach();
        binding.detach();
        assert!(!binding.is_attached());
    }
}
