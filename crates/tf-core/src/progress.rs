use std::time::{Duration, Instant};

/// Fixed period of the simulated progress timer.
pub const TICK_PERIOD: Duration = Duration::from_millis(2500);

/// Client-side progress simulation for an in-flight generation request.
///
/// The step index advances on a fixed cadence, independent of actual server
/// progress, and never advances past the last step on its own. The response
/// handler either forces completion or halts the simulation where it stands,
/// so a hung request leaves the bar visibly stalled below 100%.
#[derive(Debug, Clone)]
pub struct ProgressSim {
    steps: &'static [&'static str],
    current: usize,
    running: bool,
    last_advance: Instant,
}

impl ProgressSim {
    pub fn start(steps: &'static [&'static str]) -> Self {
        Self::start_at(steps, Instant::now())
    }

    pub fn start_at(steps: &'static [&'static str], now: Instant) -> Self {
        Self {
            steps,
            current: 0,
            running: true,
            last_advance: now,
        }
    }

    /// Advance the step index if a full period has elapsed. Returns whether
    /// the index changed. The index stops one short of the step count; only
    /// `complete` can take it the rest of the way.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.running || self.current + 1 >= self.steps.len() {
            return false;
        }
        if now.duration_since(self.last_advance) < TICK_PERIOD {
            return false;
        }
        self.current += 1;
        self.last_advance = now;
        true
    }

    /// A response arrived successfully: stop the timer and jump to 100%.
    pub fn complete(&mut self) {
        self.current = self.steps.len();
        self.running = false;
    }

    /// The request failed: stop the timer without completing.
    pub fn halt(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.current == self.steps.len()
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn steps(&self) -> &'static [&'static str] {
        self.steps
    }

    pub fn fraction(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.current as f32 / self.steps.len() as f32
    }

    /// Label of the step currently in progress, if any.
    pub fn current_label(&self) -> Option<&'static str> {
        self.steps.get(self.current).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GenerationMode;

    #[test]
    fn test_advances_once_per_period() {
        let t0 = Instant::now();
        let mut sim = ProgressSim::start_at(GenerationMode::Full.steps(), t0);

        assert_eq!(sim.current_step(), 0);
        assert!(!sim.tick(t0 + Duration::from_millis(2400)));
        assert!(sim.tick(t0 + TICK_PERIOD));
        assert_eq!(sim.current_step(), 1);
        assert!(!sim.tick(t0 + TICK_PERIOD + Duration::from_millis(100)));
    }

    #[test]
    fn test_stalls_one_short_of_completion() {
        let t0 = Instant::now();
        let mut sim = ProgressSim::start_at(GenerationMode::Full.steps(), t0);

        for i in 1..20u32 {
            sim.tick(t0 + TICK_PERIOD * i);
        }

        // 4 steps: the simulation parks at index 3, never reaching 4 alone.
        assert_eq!(sim.current_step(), 3);
        assert!(sim.is_running());
        assert!(!sim.is_complete());
        assert!(sim.fraction() < 1.0);
    }

    #[test]
    fn test_complete_forces_full_progress() {
        let t0 = Instant::now();
        let mut sim = ProgressSim::start_at(GenerationMode::ImageOnly.steps(), t0);
        sim.tick(t0 + TICK_PERIOD);

        sim.complete();

        assert!(sim.is_complete());
        assert_eq!(sim.current_step(), 3);
        assert_eq!(sim.fraction(), 1.0);
        assert!(!sim.is_running());
        assert!(!sim.tick(t0 + TICK_PERIOD * 10));
    }

    #[test]
    fn test_halt_stops_further_increments() {
        let t0 = Instant::now();
        let mut sim = ProgressSim::start_at(GenerationMode::Full.steps(), t0);
        sim.tick(t0 + TICK_PERIOD);
        sim.halt();

        let before = sim.current_step();
        assert!(!sim.tick(t0 + TICK_PERIOD * 5));
        assert_eq!(sim.current_step(), before);
        assert!(!sim.is_complete());
    }

    #[test]
    fn test_current_label_tracks_step() {
        let t0 = Instant::now();
        let mut sim = ProgressSim::start_at(GenerationMode::Full.steps(), t0);
        assert_eq!(sim.current_label(), Some("Analyzing person photo"));

        sim.tick(t0 + TICK_PERIOD);
        assert_eq!(sim.current_label(), Some("Analyzing style guide"));

        sim.complete();
        assert_eq!(sim.current_label(), None);
    }
}
